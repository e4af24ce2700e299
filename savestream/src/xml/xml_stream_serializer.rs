use std::io::{Read, Write};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::encoding::{decode_document, encode_document};
use super::format::write_document;
use super::hooks::{DeserializationHooks, UnreferencedObject};
use super::namespaces::{Namespaces, XSI_NAMESPACE};
use super::options::{ParserContext, ReaderOptions, WriterOptions};
use super::root::{RootName, probe, short_type_name};
use super::scan::outline;
use super::whitespace::trim_text;
use crate::error::Error;
use crate::io::{ScopedWriter, read_document};
use crate::ser_de::StreamSerializer;

/// Reads and writes values as XML documents.
///
/// Values are mapped to markup by their serde implementation: structs become
/// elements named after the struct, fields become child elements, and fields
/// renamed to `@name` become attributes. Absent values are written as a root
/// element marked with `xsi:nil="true"`. Without a value there is no serde
/// name to use for that element, so it's named after the Rust type. Types
/// renamed with `#[serde(rename)]` need [`Self::with_root_name`] to write an
/// absent value that reads back as absent.
///
/// When reading, documents that are empty, or whose root element has a
/// different name or namespace than the target type, deserialize to `None`.
/// Documents that are not well-formed are always an error.
///
/// Example:
/// ```
/// use savestream::{StreamSerializer, XmlStreamSerializer};
/// use savestream::xml::{Namespaces, WriterOptions};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize, Debug, PartialEq)]
/// struct Settings {
///     volume: u32,
/// }
///
/// let serializer = XmlStreamSerializer::new()
///     .with_writer_options(WriterOptions { omit_xml_declaration: true, ..WriterOptions::default() })
///     .with_namespaces(Namespaces::new().add("", "urn:game"));
///
/// let bytes = serializer.serialize_to_vec(Some(&Settings { volume: 7 }))?;
/// assert_eq!(bytes, br#"<Settings xmlns="urn:game"><volume>7</volume></Settings>"#);
///
/// let settings: Option<Settings> = serializer.deserialize_from_slice(&bytes)?;
/// assert_eq!(settings, Some(Settings { volume: 7 }));
/// # Ok::<(), savestream::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct XmlStreamSerializer {
    writer_options: WriterOptions,
    reader_options: ReaderOptions,
    namespaces: Namespaces,
    root_name: Option<String>,
    parser_context: Option<ParserContext>,
    hooks: DeserializationHooks,
}

/// The serializable part of an [`XmlStreamSerializer`]'s configuration.
///
/// Hooks are code, so they are attached with [`XmlStreamSerializer::with_hooks`]
/// after the options are loaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct XmlOptions {
    /// How documents are written.
    pub writer: WriterOptions,
    /// Limits applied when documents are read.
    pub reader: ReaderOptions,
    /// Namespaces declared on the root element.
    pub namespaces: Namespaces,
    /// Overrides the root element name.
    pub root_name: Option<String>,
    /// Context used to interpret documents when reading.
    pub parser_context: Option<ParserContext>,
}

impl XmlStreamSerializer {
    /// Create a serializer with default options, no namespaces and no hooks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how documents are written.
    pub fn with_writer_options(self, writer_options: WriterOptions) -> Self {
        Self { writer_options, ..self }
    }

    /// Set the limits applied when documents are read.
    pub fn with_reader_options(self, reader_options: ReaderOptions) -> Self {
        Self { reader_options, ..self }
    }

    /// Set the namespaces declared on the root element.
    ///
    /// The namespace bound to the empty prefix is also the namespace the root
    /// element must be in when reading.
    pub fn with_namespaces(self, namespaces: Namespaces) -> Self {
        Self { namespaces, ..self }
    }

    /// Override the root element name, which is the serde name of the type by default.
    pub fn with_root_name(self, root_name: impl Into<String>) -> Self {
        Self { root_name: Some(root_name.into()), ..self }
    }

    /// Set the context used to interpret documents when reading.
    pub fn with_parser_context(self, parser_context: ParserContext) -> Self {
        Self { parser_context: Some(parser_context), ..self }
    }

    /// Set the callbacks invoked while reading.
    pub fn with_hooks(self, hooks: DeserializationHooks) -> Self {
        Self { hooks, ..self }
    }

    /// How documents are written.
    pub fn writer_options(&self) -> &WriterOptions {
        &self.writer_options
    }

    /// The limits applied when documents are read.
    pub fn reader_options(&self) -> &ReaderOptions {
        &self.reader_options
    }

    /// The namespaces declared on the root element.
    pub fn namespaces(&self) -> &Namespaces {
        &self.namespaces
    }

    /// The configured root element name, if any.
    pub fn root_name(&self) -> Option<&str> {
        self.root_name.as_deref()
    }

    /// The context used to interpret documents when reading.
    pub fn parser_context(&self) -> Option<&ParserContext> {
        self.parser_context.as_ref()
    }

    /// The callbacks invoked while reading.
    pub fn hooks(&self) -> &DeserializationHooks {
        &self.hooks
    }

    fn base_uri(&self) -> Option<&str> {
        self.parser_context.as_ref().and_then(|context| context.base_uri.as_deref())
    }

    /// Map `value` to compact markup.
    fn markup<Value: Serialize + ?Sized>(&self, value: Option<&Value>) -> Result<String, Error> {
        let mut markup = String::new();
        match value {
            Some(value) => {
                let serializer = match &self.root_name {
                    Some(root_name) => quick_xml::se::Serializer::with_root(&mut markup, Some(root_name.as_str()))?,
                    None => quick_xml::se::Serializer::new(&mut markup),
                };
                value.serialize(serializer)?;
            }
            None => {
                let root_name = match &self.root_name {
                    Some(root_name) => {
                        check_name(root_name)?;
                        root_name.as_str()
                    }
                    None => {
                        let type_name = core::any::type_name::<Value>();
                        let root_name = short_type_name(type_name);
                        check_name(root_name).map_err(|_| Error::NoRootName(type_name))?;
                        root_name
                    }
                };
                markup = format!(r#"<{root_name} xsi:nil="true" xmlns:xsi="{XSI_NAMESPACE}"/>"#);
            }
        }
        Ok(markup)
    }

    fn expected_root<Value: DeserializeOwned>(&self) -> Result<RootName<'_>, Error> {
        match &self.root_name {
            Some(root_name) => Ok(RootName::Named(root_name)),
            None => probe::<Value>().ok_or(Error::NoRootName(core::any::type_name::<Value>())),
        }
    }
}

/// Check that `name` can be written as an element name, the way the codec does.
fn check_name(name: &str) -> Result<(), quick_xml::SeError> {
    quick_xml::se::Serializer::with_root(&mut String::new(), Some(name)).map(drop)
}

impl From<XmlOptions> for XmlStreamSerializer {
    fn from(options: XmlOptions) -> Self {
        Self {
            writer_options: options.writer,
            reader_options: options.reader,
            namespaces: options.namespaces,
            root_name: options.root_name,
            parser_context: options.parser_context,
            hooks: DeserializationHooks::default(),
        }
    }
}

impl StreamSerializer for XmlStreamSerializer {
    type Error = Error;

    fn serialize<Value, Stream>(&self, stream: &mut Stream, value: Option<&Value>) -> Result<(), Error>
    where
        Value: Serialize + ?Sized,
        Stream: Write + ?Sized,
    {
        let type_name = core::any::type_name::<Value>();
        let _span = tracing::debug_span!("xml_serialize", type_name, absent = value.is_none()).entered();

        let markup = self.markup(value)?;
        let document = write_document(&markup, &self.writer_options, &self.namespaces)?;
        let bytes = encode_document(&document, self.writer_options.encoding);

        let mut writer = ScopedWriter::new(stream);
        writer.write_all(&bytes)?;
        writer.finish()?;
        tracing::debug!(bytes = bytes.len(), "wrote document");
        Ok(())
    }

    fn deserialize<Value, Stream>(&self, stream: &mut Stream) -> Result<Option<Value>, Error>
    where
        Value: DeserializeOwned,
        Stream: Read + ?Sized,
    {
        let type_name = core::any::type_name::<Value>();
        let base_uri = self.base_uri();
        let _span = tracing::debug_span!("xml_deserialize", type_name, base_uri).entered();

        let expected = self.expected_root::<Value>()?;
        let bytes = read_document(stream, self.reader_options.max_document_bytes)?;
        let forced_encoding = self.parser_context.as_ref().and_then(|context| context.encoding);
        let document = decode_document(&bytes, forced_encoding)?;
        let scope = self.parser_context.as_ref().map(|context| &context.namespace_scope);
        let outline = outline(&document, &self.reader_options, scope)?;

        let Some(root) = outline.root else {
            tracing::debug!("document has no root element");
            return Ok(None);
        };
        let expected_namespace = self.namespaces.default_namespace();
        if !expected.accepts(&root.local_name) || root.namespace.as_deref() != expected_namespace {
            tracing::debug!(
                found = %root.local_name,
                namespace = ?root.namespace,
                expected = %expected,
                expected_namespace,
                "root element does not match"
            );
            return Ok(None);
        }
        if root.nil {
            tracing::debug!("root element is nil");
            return Ok(None);
        }

        let document = match self.reader_options.ignore_whitespace {
            true => trim_text(&document)?,
            false => document,
        };
        let mut deserializer = quick_xml::de::Deserializer::from_str(&document);
        let value = serde_ignored::deserialize(&mut deserializer, |path| self.hooks.ignored(&path, base_uri))?;

        if self.hooks.wants_comments() {
            for path in &outline.comments {
                self.hooks.comment(path, base_uri);
            }
        }
        if self.hooks.wants_unreferenced_objects() {
            for (id, element) in &outline.unreferenced {
                self.hooks.unreferenced(&UnreferencedObject { id, element, base_uri });
            }
        }
        Ok(Some(value))
    }
}
