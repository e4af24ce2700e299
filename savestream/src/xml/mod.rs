//! The XML format.
//!
//! [`XmlStreamSerializer`] maps values with the serde support of `quick-xml`
//! and takes care of everything around the mapping: the XML declaration,
//! namespace declarations, indentation, character encodings, the
//! well-formedness checks done before a document is mapped, and the hooks that
//! report content the target type has no place for.

mod encoding;
mod format;
mod hooks;
mod namespaces;
mod options;
mod root;
mod scan;
mod whitespace;
mod xml_stream_serializer;

pub use hooks::{DeserializationHooks, NodeKind, UnknownNode, UnreferencedObject};
pub use namespaces::{Namespaces, XML_NAMESPACE, XSI_NAMESPACE};
pub use options::{NewLineHandling, ParserContext, ReaderOptions, WriterOptions};
pub use xml_stream_serializer::{XmlOptions, XmlStreamSerializer};
