//! Well-formedness scan of a whole document, run before it's mapped to a value.
//!
//! The scan decides whether a document can be deserialized at all: malformed
//! documents are errors, documents without a root element are absent, and the
//! root element's name and namespace are reported for the compatibility check.
//! It also collects the `id`/`href` cross references for the unreferenced
//! object hook and, unless they're ignored, the comments inside the root.

use std::collections::HashSet;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::namespaces::{Namespaces, XML_NAMESPACE, XSI_NAMESPACE};
use super::options::ReaderOptions;
use crate::error::{Error, StructureError};

/// The root element of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootElement {
    pub local_name: String,
    pub namespace: Option<String>,
    /// The element carries `xsi:nil="true"`.
    pub nil: bool,
}

/// What the compatibility check and the hooks need to know about a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outline {
    pub root: Option<RootElement>,
    /// `(id, element name)` of elements whose `id` is never referenced, in document order.
    pub unreferenced: Vec<(String, String)>,
    /// Paths of the elements holding a comment, relative to the root, in document order.
    pub comments: Vec<String>,
}

/// Scan the entire `document`.
///
/// `scope` holds the namespace bindings that are in effect before the root
/// element's own declarations.
pub fn outline(document: &str, options: &ReaderOptions, scope: Option<&Namespaces>) -> Result<Outline, Error> {
    let mut reader = Reader::from_str(document);
    reader.config_mut().trim_text(true);
    reader.config_mut().check_end_names = true;

    let mut open: Vec<String> = Vec::new();
    let mut root = None;
    let mut ids = Vec::new();
    let mut references = HashSet::new();
    let mut comments = Vec::new();
    let mut entity_characters = 0u64;

    loop {
        let event = reader.read_event()?;
        let element = match &event {
            Event::Start(start) | Event::Empty(start) => Some(start),
            _ => None,
        };
        if let Some(start) = element {
            let name = qualified_name(start);
            if open.is_empty() {
                if root.is_some() {
                    return Err(StructureError::MultipleRoots(name).into());
                }
                root = Some(root_element(start, scope)?);
            }
            if options.max_depth.is_some_and(|max_depth| open.len() >= max_depth) {
                return Err(StructureError::TooDeep(open.len()).into());
            }
            collect_references(start, &name, &mut ids, &mut references)?;
            if let Some(limit) = options.max_characters_from_entities {
                entity_characters += attribute_references(start)?;
                check_entity_characters(entity_characters, limit)?;
            }
            if matches!(event, Event::Start(_)) {
                open.push(name);
            }
            continue;
        }
        match event {
            Event::End(_) => {
                open.pop();
            }
            Event::Text(text) if open.is_empty() => {
                if !text.iter().all(u8::is_ascii_whitespace) {
                    return Err(StructureError::TextOutsideRoot.into());
                }
            }
            Event::CData(_) | Event::GeneralRef(_) if open.is_empty() => {
                return Err(StructureError::TextOutsideRoot.into());
            }
            Event::GeneralRef(_) => {
                if let Some(limit) = options.max_characters_from_entities {
                    entity_characters += 1;
                    check_entity_characters(entity_characters, limit)?;
                }
            }
            Event::Comment(_) if !open.is_empty() && !options.ignore_comments => {
                comments.push(element_path(&open));
            }
            Event::DocType(_) if options.prohibit_dtd => return Err(StructureError::DtdProhibited.into()),
            Event::Eof => break,
            _ => {}
        }
    }
    if let Some(unclosed) = open.pop() {
        return Err(StructureError::UnclosedElement(unclosed).into());
    }

    let unreferenced = ids.into_iter().filter(|(id, _)| !references.contains(id)).collect();
    Ok(Outline { root, unreferenced, comments })
}

fn qualified_name(start: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(start.name().as_ref()).into_owned()
}

fn split_qualified_name(name: &str) -> (&str, &str) {
    name.split_once(':').unwrap_or(("", name))
}

/// Local names of the open elements below the root, like `inventory.item`.
fn element_path(open: &[String]) -> String {
    itertools::join(open.iter().skip(1).map(|name| split_qualified_name(name).1), ".")
}

/// References in attribute values. Each one expands to a single character.
fn attribute_references(start: &BytesStart<'_>) -> Result<u64, Error> {
    let mut count = 0;
    for attribute in start.attributes() {
        let attribute = attribute.map_err(quick_xml::Error::from)?;
        count += attribute.value.iter().filter(|byte| **byte == b'&').count() as u64;
    }
    Ok(count)
}

fn check_entity_characters(count: u64, limit: u64) -> Result<(), Error> {
    match count > limit {
        true => Err(StructureError::TooManyEntityCharacters(limit).into()),
        false => Ok(()),
    }
}

/// Resolve the root element's namespace and `xsi:nil` marker.
fn root_element(start: &BytesStart<'_>, scope: Option<&Namespaces>) -> Result<RootElement, Error> {
    let mut declared = Namespaces::new();
    let mut attributes = Vec::new();
    for attribute in start.attributes() {
        let attribute = attribute.map_err(quick_xml::Error::from)?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute.unescape_value()?.into_owned();
        match split_qualified_name(&key) {
            ("", "xmlns") => declared = declared.add("", value),
            ("xmlns", prefix) => declared = declared.add(prefix, value),
            _ => attributes.push((key, value)),
        }
    }
    let resolve = |prefix: &str| -> Option<String> {
        match prefix {
            "xml" => Some(XML_NAMESPACE.to_string()),
            prefix => declared.resolve(prefix).or_else(|| scope.and_then(|scope| scope.resolve(prefix))).map(String::from),
        }
    };

    let name = qualified_name(start);
    let (prefix, local_name) = split_qualified_name(&name);
    let namespace = resolve(prefix);
    if namespace.is_none() && !prefix.is_empty() {
        return Err(StructureError::UnboundPrefix(prefix.to_string()).into());
    }

    let nil = attributes.iter().any(|(key, value)| {
        let (prefix, local_name) = split_qualified_name(key);
        local_name == "nil"
            && !prefix.is_empty()
            && resolve(prefix).as_deref() == Some(XSI_NAMESPACE)
            && matches!(value.trim(), "true" | "1")
    });

    Ok(RootElement { local_name: local_name.to_string(), namespace, nil })
}

/// Record `id` attributes and `href="#id"` references of an element.
fn collect_references(
    start: &BytesStart<'_>,
    name: &str,
    ids: &mut Vec<(String, String)>,
    references: &mut HashSet<String>,
) -> Result<(), Error> {
    for attribute in start.attributes() {
        let attribute = attribute.map_err(quick_xml::Error::from)?;
        match attribute.key.as_ref() {
            b"id" => ids.push((attribute.unescape_value()?.into_owned(), name.to_string())),
            b"href" => {
                if let Some(id) = attribute.unescape_value()?.strip_prefix('#') {
                    references.insert(id.to_string());
                }
            }
            _ => {}
        }
    }
    Ok(())
}
