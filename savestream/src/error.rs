//! Errors returned by the stream serializers.
//!
//! Failures of the underlying codecs and streams are wrapped without being
//! translated, so the original error stays reachable through
//! [`std::error::Error::source`] or by matching on [`Error`]. Use
//! [`Error::kind`] to react to the category of a failure instead of its origin.

/// The category of a serialization failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorKind {
    /// The type cannot be represented in the target format.
    Mapping,
    /// The input is not well-formed, or it exceeds a configured reader limit.
    MalformedInput,
    /// The input is well-formed but does not fit the requested type.
    IncompatibleShape,
    /// The stream failed.
    Io,
}

/// A well-formedness violation detected before the document is mapped.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StructureError {
    /// The document ended while this element was still open.
    UnclosedElement(String),
    /// A second root element was found.
    MultipleRoots(String),
    /// Character data was found outside of the root element.
    TextOutsideRoot,
    /// The document carries a document type declaration and DTDs are prohibited.
    DtdProhibited,
    /// Elements are nested deeper than the configured limit.
    TooDeep(usize),
    /// The document is longer than the configured limit in bytes.
    TooLarge(u64),
    /// Entity and character references expand to more characters than the configured limit.
    TooManyEntityCharacters(u64),
    /// The root element uses a namespace prefix that is not declared anywhere.
    UnboundPrefix(String),
    /// The bytes cannot be decoded with the detected or configured encoding.
    Undecodable(&'static str),
    /// The encoding named by the document is unknown.
    UnknownEncoding(String),
}

/// An error produced by a stream serializer.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The stream failed.
    #[error("stream error: {0}")]
    Io(#[from] std::io::Error),
    /// The XML reader or writer rejected the document.
    #[error("invalid XML: {0}")]
    Xml(#[from] quick_xml::Error),
    /// The document violates a well-formedness rule checked ahead of mapping.
    #[error("invalid XML: {0}")]
    Structure(#[from] StructureError),
    /// The XML codec failed to map a value to markup.
    #[error("cannot serialize to XML: {0}")]
    Serialize(#[from] quick_xml::SeError),
    /// The XML codec failed to map markup to a value.
    #[error("cannot deserialize from XML: {0}")]
    Deserialize(#[from] quick_xml::DeError),
    /// The JSON codec failed to map a value to text.
    #[error("cannot serialize to JSON: {0}")]
    JsonSerialize(#[source] serde_json::Error),
    /// The JSON codec failed to read a value.
    #[error("cannot deserialize from JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Neither the configuration nor the type provides a root element name.
    #[error("type `{0}` has no root element name, configure one explicitly")]
    NoRootName(&'static str),
}

//------------------------------------------------------------------------------
// Error implementations
//------------------------------------------------------------------------------

impl Error {
    /// Return the category of this error.
    pub fn kind(&self) -> ErrorKind {
        use quick_xml::{DeError, SeError};
        match self {
            Error::Io(_) => ErrorKind::Io,
            Error::Xml(quick_xml::Error::Io(_)) => ErrorKind::Io,
            Error::Xml(_) => ErrorKind::MalformedInput,
            Error::Structure(_) => ErrorKind::MalformedInput,
            Error::Serialize(SeError::Io(_)) => ErrorKind::Io,
            Error::Serialize(_) => ErrorKind::Mapping,
            Error::Deserialize(DeError::InvalidXml(quick_xml::Error::Io(_))) => ErrorKind::Io,
            Error::Deserialize(DeError::InvalidXml(_)) => ErrorKind::MalformedInput,
            Error::Deserialize(DeError::UnexpectedEof) => ErrorKind::MalformedInput,
            Error::Deserialize(_) => ErrorKind::IncompatibleShape,
            Error::JsonSerialize(err) if err.is_io() => ErrorKind::Io,
            Error::JsonSerialize(_) => ErrorKind::Mapping,
            Error::Json(err) => match err.classify() {
                serde_json::error::Category::Io => ErrorKind::Io,
                serde_json::error::Category::Syntax | serde_json::error::Category::Eof => ErrorKind::MalformedInput,
                serde_json::error::Category::Data => ErrorKind::IncompatibleShape,
            },
            Error::NoRootName(_) => ErrorKind::Mapping,
        }
    }
}

//------------------------------------------------------------------------------
// ErrorKind implementations
//------------------------------------------------------------------------------

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use ErrorKind::*;
        match self {
            Mapping => write!(f, "the type cannot be represented in the target format"),
            MalformedInput => write!(f, "the input is not well-formed"),
            IncompatibleShape => write!(f, "the input does not match the requested type"),
            Io => write!(f, "the stream failed"),
        }
    }
}

//------------------------------------------------------------------------------
// StructureError implementations
//------------------------------------------------------------------------------

impl core::error::Error for StructureError {}

impl core::fmt::Display for StructureError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use StructureError::*;
        match self {
            UnclosedElement(name) => write!(f, "element `{name}` is never closed"),
            MultipleRoots(name) => write!(f, "element `{name}` follows the root element"),
            TextOutsideRoot => write!(f, "character data is not allowed outside the root element"),
            DtdProhibited => write!(f, "document type declarations are prohibited"),
            TooDeep(limit) => write!(f, "elements are nested deeper than {limit} levels"),
            TooLarge(limit) => write!(f, "the document is longer than {limit} bytes"),
            TooManyEntityCharacters(limit) => write!(f, "references expand to more than {limit} characters"),
            UnboundPrefix(prefix) => write!(f, "namespace prefix `{prefix}` is not declared"),
            Undecodable(encoding) => write!(f, "the document is not valid {encoding}"),
            UnknownEncoding(label) => write!(f, "unknown encoding `{label}`"),
        }
    }
}
