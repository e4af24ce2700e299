//! Lay out the markup produced by the XML codec according to [`WriterOptions`].
//!
//! The codec writes compact markup without a declaration or namespace
//! declarations. The events are replayed through a [`Writer`], adding the
//! declaration, declaring the namespaces on the root element, indenting
//! elements and rewriting line breaks.

use std::borrow::Cow;

use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesDecl, BytesStart, Event};
use quick_xml::{Reader, Writer};

use super::encoding::{output_encoding, utf8_document};
use super::namespaces::Namespaces;
use super::options::{NewLineHandling, WriterOptions};
use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Written {
    Nothing,
    Declaration,
    Start,
    End,
    Empty,
    Text,
}

/// Rewrite the compact `markup` into the final document, still in UTF-8.
pub fn write_document(markup: &str, options: &WriterOptions, namespaces: &Namespaces) -> Result<String, Error> {
    let mut reader = Reader::from_str(markup);
    let mut writer = Writer::new(Vec::with_capacity(markup.len() + 64));
    let mut depth = 0usize;
    let mut last = Written::Nothing;
    let mut root_written = false;

    if !options.omit_xml_declaration {
        let encoding = output_encoding(options.encoding).name();
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some(encoding), None)))?;
        last = Written::Declaration;
    }

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                if options.indent && (depth > 0 || last == Written::Declaration) && last != Written::Text {
                    new_line(writer.get_mut(), options, depth);
                }
                let declared = if root_written { None } else { Some(namespaces) };
                writer.write_event(Event::Start(rewrite_element(&start, options, declared)?))?;
                root_written = true;
                depth += 1;
                last = Written::Start;
            }
            Event::Empty(start) => {
                if options.indent && (depth > 0 || last == Written::Declaration) && last != Written::Text {
                    new_line(writer.get_mut(), options, depth);
                }
                let declared = if root_written { None } else { Some(namespaces) };
                writer.write_event(Event::Empty(rewrite_element(&start, options, declared)?))?;
                root_written = true;
                last = Written::Empty;
            }
            Event::End(end) => {
                depth = depth.saturating_sub(1);
                if options.indent && matches!(last, Written::End | Written::Empty) {
                    new_line(writer.get_mut(), options, depth);
                }
                writer.write_event(Event::End(end))?;
                last = Written::End;
            }
            Event::Text(text) => {
                let content = line_breaks(&text, options, false);
                writer.get_mut().extend_from_slice(&content);
                last = Written::Text;
            }
            Event::GeneralRef(reference) => {
                writer.write_event(Event::GeneralRef(reference))?;
                last = Written::Text;
            }
            Event::Eof => break,
            event => writer.write_event(event)?,
        }
    }

    utf8_document(writer.into_inner())
}

fn new_line(output: &mut Vec<u8>, options: &WriterOptions, depth: usize) {
    output.extend_from_slice(options.new_line_chars.as_bytes());
    for _ in 0..depth {
        output.extend_from_slice(options.indent_chars.as_bytes());
    }
}

/// Copy an element, declaring `namespaces` first if it's the root.
fn rewrite_element(
    start: &BytesStart<'_>,
    options: &WriterOptions,
    namespaces: Option<&Namespaces>,
) -> Result<BytesStart<'static>, Error> {
    let attributes = start.attributes().collect::<Result<Vec<_>, _>>().map_err(quick_xml::Error::from)?;
    let mut rewritten = start.clone().into_owned();
    rewritten.clear_attributes();

    for (name, uri) in namespaces.into_iter().flat_map(Namespaces::declarations) {
        if attributes.iter().all(|attribute| attribute.key.as_ref() != name.as_bytes()) {
            let uri = quick_xml::escape::escape(uri);
            rewritten.push_attribute((name.as_bytes(), uri.as_bytes()));
        }
    }
    for attribute in attributes {
        let value = line_breaks(&attribute.value, options, true).into_owned();
        rewritten.push_attribute(Attribute { key: attribute.key, value: Cow::Owned(value) });
    }
    Ok(rewritten)
}

/// Apply the line break handling to escaped content.
///
/// Attribute values never keep literal line breaks unless line breaks are
/// preserved, because readers normalize them to spaces.
fn line_breaks<'a>(content: &'a [u8], options: &WriterOptions, attribute: bool) -> Cow<'a, [u8]> {
    let entitize = match options.new_line_handling {
        NewLineHandling::Preserve => return Cow::Borrowed(content),
        NewLineHandling::Replace => attribute,
        NewLineHandling::Entitize => true,
    };
    if !content.iter().any(|byte| matches!(byte, b'\r' | b'\n')) {
        return Cow::Borrowed(content);
    }

    let mut output = Vec::with_capacity(content.len() + 8);
    let mut bytes = content.iter().copied().peekable();
    while let Some(byte) = bytes.next() {
        match byte {
            b'\r' if entitize => output.extend_from_slice(b"&#xD;"),
            b'\n' if entitize => output.extend_from_slice(b"&#xA;"),
            b'\r' => {
                bytes.next_if_eq(&b'\n');
                output.extend_from_slice(options.new_line_chars.as_bytes());
            }
            b'\n' => output.extend_from_slice(options.new_line_chars.as_bytes()),
            byte => output.push(byte),
        }
    }
    Cow::Owned(output)
}
