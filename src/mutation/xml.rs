/// Parser for structured mutation XML reports (PIT-style).
///
/// Structure:
///   <mutations>
///     <mutation detected="true" status="KILLED">
///       <sourceFile>Foo.java</sourceFile>
///       <mutatedClass>com.example.Foo</mutatedClass>
///       <mutatedMethod>doStuff</mutatedMethod>
///       <lineNumber>10</lineNumber>
///       <mutator>org.pitest...ReturnValsMutator</mutator>
///       <killingTest>FooTest</killingTest>
///     </mutation>
///     ...
///   </mutations>
///
/// Optional `<originalText>`/`<mutatedText>` children are captured when
/// present; unknown children are ignored. The `status` attribute must be
/// one of the closed keyword set; anything else aborts the parse. Ids
/// are synthesized as `<sourceFile>:<line>:<ordinal>` since the format
/// carries none.
use quick_xml::events::Event;

use crate::error::{CovgateError, Result};
use crate::parsers::{get_attr, xml_err, xml_reader};

use super::{Mutant, MutantStatus, MutationReport};

/// Field accumulator for one `<mutation>` element.
#[derive(Default)]
struct PendingMutant {
    status_keyword: Option<String>,
    source_file: Option<String>,
    line: Option<u32>,
    mutator: Option<String>,
    killed_by: Vec<String>,
    original_text: Option<String>,
    mutated_text: Option<String>,
}

impl PendingMutant {
    fn into_mutant(self, ordinal: usize) -> Result<Mutant> {
        let source_file = self.source_file.unwrap_or_default();
        let line = self.line.unwrap_or(0);
        let id = format!("{source_file}:{line}:{ordinal}");

        let keyword = self.status_keyword.ok_or_else(|| {
            CovgateError::Parse(format!("mutation element {id} is missing a status attribute"))
        })?;
        let status = MutantStatus::parse(&keyword, &id)?;

        Ok(Mutant {
            id,
            source_file,
            line,
            mutator_kind: self.mutator.unwrap_or_default(),
            status,
            killed_by: self.killed_by,
            original_text: self.original_text,
            mutated_text: self.mutated_text,
        })
    }
}

/// Parse structured mutation XML from raw bytes.
pub fn parse(input: &[u8]) -> Result<MutationReport> {
    let mut xml = xml_reader(input);
    let mut buf = Vec::new();

    let mut mutants: Vec<Mutant> = Vec::new();
    let mut pending: Option<PendingMutant> = None;
    let mut current_field: Option<Vec<u8>> = None;

    loop {
        let event = xml.read_event_into(&mut buf);
        let is_empty_event = matches!(&event, Ok(Event::Empty(_)));
        match event {
            Err(e) => return Err(xml_err(e, &xml)),
            Ok(Event::Eof) => break,
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                b"mutation" => {
                    let p = PendingMutant {
                        status_keyword: get_attr(e, b"status"),
                        ..Default::default()
                    };
                    // A self-closing <mutation/> gets no End event.
                    if is_empty_event {
                        mutants.push(p.into_mutant(mutants.len())?);
                    } else {
                        pending = Some(p);
                    }
                }
                name if pending.is_some() => {
                    current_field = Some(name.to_vec());
                }
                _ => {}
            },
            Ok(Event::Text(ref t)) => {
                if let (Some(p), Some(field)) = (pending.as_mut(), current_field.as_deref()) {
                    let text = t
                        .unescape()
                        .map_err(|e| xml_err(e, &xml))?
                        .into_owned();
                    match field {
                        b"sourceFile" => p.source_file = Some(text),
                        // A non-numeric line number degrades to 0 rather
                        // than failing the parse.
                        b"lineNumber" => p.line = text.trim().parse().ok().or(Some(0)),
                        b"mutator" => p.mutator = Some(text),
                        b"killingTest" => {
                            if !text.trim().is_empty() {
                                p.killed_by.push(text);
                            }
                        }
                        b"originalText" => p.original_text = Some(text),
                        b"mutatedText" => p.mutated_text = Some(text),
                        // mutatedClass, mutatedMethod, description, ...
                        _ => {}
                    }
                }
            }
            Ok(Event::End(ref e)) => {
                if e.name().as_ref() == b"mutation" {
                    if let Some(p) = pending.take() {
                        let mutant = p.into_mutant(mutants.len())?;
                        mutants.push(mutant);
                    }
                } else {
                    current_field = None;
                }
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(MutationReport::from_mutants(mutants))
}
