/// Parser for hierarchical XML coverage reports (JaCoCo-style).
///
/// Structure:
///   <report name="...">
///     <package name="com/example">
///       <sourcefile name="Foo.java">
///         <line nr="10" mi="0" ci="3" mb="0" cb="2"/>
///         ...
///       </sourcefile>
///     </package>
///   </report>
///
/// Line-level data lives inside `<sourcefile>` elements. Each `<line>` has
/// `nr` (line number), `mi`/`ci` (missed/covered instructions) and
/// `mb`/`cb` (missed/covered branches). There is no per-line hit counter;
/// a line is covered iff `ci > 0`, independent of branch counts. Lines
/// with no instructions at all are not instrumentable and are skipped.
///
/// File keys are synthesized as `<package-path>/<file-name>` with forward
/// slashes regardless of the separator used in the input.
use quick_xml::events::Event;

use crate::error::Result;
use crate::model::{CoverageReport, FileCoverage, LineRecord};

use super::{get_attr, Parser};

/// Hierarchical XML format parser.
pub struct JacocoParser;

impl Parser for JacocoParser {
    fn parse(&self, input: &[u8]) -> Result<CoverageReport> {
        parse(input)
    }
}

/// Normalize a package name to a forward-slash path component.
fn package_path(name: &str) -> String {
    name.replace(['\\', '.'], "/")
}

/// Parse hierarchical XML coverage data from raw bytes.
pub fn parse(input: &[u8]) -> Result<CoverageReport> {
    let mut xml = super::xml_reader(input);
    let mut buf = Vec::new();

    let mut report = CoverageReport::new();
    let mut current_package: Option<String> = None;
    let mut current_file: Option<FileCoverage> = None;

    loop {
        let event = xml.read_event_into(&mut buf);
        match event {
            Err(e) => return Err(super::xml_err(e, &xml)),
            Ok(Event::Eof) => break,
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                b"package" => {
                    current_package = get_attr(e, b"name").map(|n| package_path(&n));
                }
                b"sourcefile" => {
                    if let Some(name) = get_attr(e, b"name") {
                        let path = match &current_package {
                            Some(pkg) if !pkg.is_empty() => format!("{pkg}/{name}"),
                            _ => name,
                        };
                        current_file = Some(FileCoverage::new(path));
                    }
                }
                b"line" => {
                    if let Some(file) = current_file.as_mut() {
                        let nr = get_attr(e, b"nr").and_then(|v| v.parse::<u32>().ok());
                        let ci: u64 = get_attr(e, b"ci")
                            .and_then(|v| v.parse().ok())
                            .unwrap_or(0);
                        let mi: u64 = get_attr(e, b"mi")
                            .and_then(|v| v.parse().ok())
                            .unwrap_or(0);

                        // A malformed nr skips this element only. Lines
                        // with ci + mi == 0 carry no instructions (blank
                        // lines, comments) and are not instrumentable.
                        if let Some(line_number) = nr {
                            if line_number > 0 && ci + mi > 0 {
                                file.lines.push(LineRecord::new(line_number, ci));
                            }
                        }
                    }
                }
                _ => {}
            },
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                b"package" => {
                    current_package = None;
                }
                b"sourcefile" => {
                    if let Some(file) = current_file.take() {
                        report.add_file(file);
                    }
                }
                _ => {}
            },
            _ => {}
        }
        buf.clear();
    }

    // Handle an unclosed sourcefile.
    if let Some(file) = current_file.take() {
        report.add_file(file);
    }

    report.finalize();
    Ok(report)
}
