pub mod jacoco;
pub mod lcov;

use quick_xml::events::BytesStart;
use quick_xml::reader::Reader;

use crate::error::Result;
use crate::model::CoverageReport;

/// Every line-coverage format parser implements this trait. Both parsers
/// produce the same [`CoverageReport`] shape so downstream components are
/// format-agnostic.
pub trait Parser {
    /// Parse the input bytes into the uniform coverage model.
    fn parse(&self, input: &[u8]) -> Result<CoverageReport>;
}

/// Build an XML reader over raw bytes with the settings shared by all
/// XML-based parsers.
pub(crate) fn xml_reader(input: &[u8]) -> Reader<&[u8]> {
    let mut reader = Reader::from_reader(input);
    reader.trim_text(true);
    reader
}

/// Fetch an attribute value from an element, unescaped.
pub(crate) fn get_attr(e: &BytesStart, name: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == name)
        .and_then(|a| a.unescape_value().ok())
        .map(|v| v.into_owned())
}

/// Wrap a quick-xml error with the reader's byte position.
pub(crate) fn xml_err(source: quick_xml::Error, reader: &Reader<&[u8]>) -> crate::error::CovgateError {
    crate::error::CovgateError::Xml {
        source,
        position: reader.buffer_position(),
    }
}
