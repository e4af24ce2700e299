use quick_xml::events::Event;
use quick_xml::{Reader, Writer};

use super::encoding::utf8_document;
use crate::error::Error;

/// Trim the whitespace around character data and drop character data that is
/// only whitespace.
///
/// Adjacent text and references are trimmed as one piece of character data.
/// CDATA sections are kept as they are.
pub fn trim_text(document: &str) -> Result<String, Error> {
    let mut reader = Reader::from_str(document);
    let mut writer = Writer::new(Vec::with_capacity(document.len()));
    let mut text = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Text(content) => text.extend_from_slice(&content),
            Event::GeneralRef(reference) => {
                text.push(b'&');
                text.extend_from_slice(&reference);
                text.push(b';');
            }
            event => {
                writer.get_mut().extend_from_slice(trim_whitespace(&text));
                text.clear();
                if matches!(event, Event::Eof) {
                    break;
                }
                writer.write_event(event)?;
            }
        }
    }
    utf8_document(writer.into_inner())
}

fn trim_whitespace(text: &[u8]) -> &[u8] {
    let is_whitespace = |byte: &u8| matches!(byte, b' ' | b'\t' | b'\r' | b'\n');
    let start = text.iter().position(|byte| !is_whitespace(byte)).unwrap_or(text.len());
    let end = text.iter().rposition(|byte| !is_whitespace(byte)).map_or(start, |last| last + 1);
    &text[start..end]
}
