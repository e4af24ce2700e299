use encoding_rs::{Encoding, UTF_8};
use serde::{Deserialize, Serialize};

use super::namespaces::Namespaces;

/// How line breaks inside character data and attribute values are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NewLineHandling {
    /// Line breaks in text are normalized to [`WriterOptions::new_line_chars`].
    /// Line breaks in attribute values are written as character references,
    /// otherwise a reader would normalize them to spaces.
    #[default]
    Replace,
    /// All line breaks are written as character references.
    Entitize,
    /// Line breaks are written as they are.
    Preserve,
}

/// Options that control how documents are written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterOptions {
    /// Put each element on its own line, indented by its depth.
    pub indent: bool,
    /// The characters written once per level of depth when indenting.
    pub indent_chars: String,
    /// The line break used for indentation and by [`NewLineHandling::Replace`].
    pub new_line_chars: String,
    /// How line breaks in content are written.
    pub new_line_handling: NewLineHandling,
    /// Do not write the `<?xml ...?>` declaration.
    pub omit_xml_declaration: bool,
    /// The character encoding of the output.
    ///
    /// UTF-16 output starts with a byte order mark. Encodings that cannot
    /// represent every character write unmappable characters as numeric
    /// character references.
    #[serde(with = "encoding_label")]
    pub encoding: &'static Encoding,
}

/// Options that control how documents are read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderOptions {
    /// Reject documents longer than this many bytes.
    pub max_document_bytes: Option<u64>,
    /// Reject documents with elements nested deeper than this.
    pub max_depth: Option<usize>,
    /// Reject documents that carry a document type declaration.
    pub prohibit_dtd: bool,
    /// Trim leading and trailing whitespace from character data before it's
    /// mapped. Character data that is only whitespace is dropped, so such
    /// strings read as empty.
    pub ignore_whitespace: bool,
    /// Do not report comments inside the root element to
    /// [`DeserializationHooks::on_unknown_node`](super::DeserializationHooks::on_unknown_node).
    pub ignore_comments: bool,
    /// Reject documents whose entity and character references expand to more
    /// than this many characters in total.
    ///
    /// Only the predefined entities and character references are resolved, and
    /// each expands to a single character.
    pub max_characters_from_entities: Option<u64>,
}

/// Context for interpreting a document, used only when reading.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserContext {
    /// Decode the document with this encoding instead of detecting it.
    #[serde(with = "optional_encoding_label")]
    pub encoding: Option<&'static Encoding>,
    /// Where the document came from. Reported to the deserialization hooks.
    pub base_uri: Option<String>,
    /// Namespace bindings in scope before the document's own declarations.
    pub namespace_scope: Namespaces,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            indent: false,
            indent_chars: "  ".into(),
            new_line_chars: "\n".into(),
            new_line_handling: NewLineHandling::default(),
            omit_xml_declaration: false,
            encoding: UTF_8,
        }
    }
}

impl WriterOptions {
    /// Indented output with the default indentation.
    pub fn indented() -> Self {
        Self { indent: true, ..Self::default() }
    }
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            max_document_bytes: None,
            max_depth: None,
            prohibit_dtd: true,
            ignore_whitespace: false,
            ignore_comments: true,
            max_characters_from_entities: None,
        }
    }
}

mod encoding_label {
    use encoding_rs::Encoding;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(encoding: &&'static Encoding, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(encoding.name())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<&'static Encoding, D::Error> {
        let label = String::deserialize(deserializer)?;
        Encoding::for_label(label.as_bytes()).ok_or_else(|| de::Error::custom(format!("unknown encoding `{label}`")))
    }
}

mod optional_encoding_label {
    use encoding_rs::Encoding;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(encoding: &Option<&'static Encoding>, serializer: S) -> Result<S::Ok, S::Error> {
        match encoding {
            Some(encoding) => serializer.serialize_some(encoding.name()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<&'static Encoding>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(label) => Encoding::for_label(label.as_bytes())
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("unknown encoding `{label}`"))),
            None => Ok(None),
        }
    }
}
