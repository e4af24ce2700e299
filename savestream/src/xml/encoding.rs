use encoding_rs::{Encoding, UTF_8, UTF_16BE, UTF_16LE};
use quick_xml::Reader;
use quick_xml::encoding::EncodingError;
use quick_xml::events::Event;

use crate::error::{Error, StructureError};

/// The encoding a document is actually written in when `requested` is asked for.
///
/// UTF-16 is written as is. Other encodings that cannot be produced by an
/// encoder fall back to UTF-8.
pub fn output_encoding(requested: &'static Encoding) -> &'static Encoding {
    if requested == UTF_16LE || requested == UTF_16BE { requested } else { requested.output_encoding() }
}

/// Encode a UTF-8 document into `encoding`.
pub fn encode_document(document: &str, encoding: &'static Encoding) -> Vec<u8> {
    let encoding = output_encoding(encoding);
    if encoding == UTF_16LE {
        [0xFF, 0xFE].into_iter().chain(document.encode_utf16().flat_map(u16::to_le_bytes)).collect()
    } else if encoding == UTF_16BE {
        [0xFE, 0xFF].into_iter().chain(document.encode_utf16().flat_map(u16::to_be_bytes)).collect()
    } else {
        let (bytes, _, _) = encoding.encode(document);
        bytes.into_owned()
    }
}

/// Take the output of a [`quick_xml::Writer`] that was only fed UTF-8 as text.
pub fn utf8_document(bytes: Vec<u8>) -> Result<String, Error> {
    String::from_utf8(bytes).map_err(|err| Error::from(quick_xml::Error::from(EncodingError::from(err.utf8_error()))))
}

/// Decode a document to UTF-8 and strip its byte order mark.
///
/// `forced` overrides detection. Otherwise, the encoding is taken from the
/// byte order mark, the byte pattern of a UTF-16 declaration, or the
/// declaration's `encoding` label, in that order, defaulting to UTF-8.
pub fn decode_document(bytes: &[u8], forced: Option<&'static Encoding>) -> Result<String, Error> {
    let encoding = match forced {
        Some(encoding) => encoding,
        None => detect_encoding(bytes)?,
    };
    let (text, had_errors) = encoding.decode_with_bom_removal(bytes);
    if had_errors {
        return Err(StructureError::Undecodable(encoding.name()).into());
    }
    tracing::trace!(encoding = encoding.name(), "decoded document");
    Ok(text.into_owned())
}

fn detect_encoding(bytes: &[u8]) -> Result<&'static Encoding, Error> {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return Ok(encoding);
    }
    match bytes {
        [0x3C, 0x00, 0x3F, 0x00, ..] => Ok(UTF_16LE),
        [0x00, 0x3C, 0x00, 0x3F, ..] => Ok(UTF_16BE),
        _ => Ok(declared_encoding(bytes)?.unwrap_or(UTF_8)),
    }
}

/// Read the `encoding` label of the XML declaration of an ASCII-compatible document.
fn declared_encoding(bytes: &[u8]) -> Result<Option<&'static Encoding>, Error> {
    if !bytes.starts_with(b"<?xml") {
        return Ok(None);
    }
    let mut reader = Reader::from_reader(bytes);
    let Event::Decl(declaration) = reader.read_event()? else {
        return Ok(None);
    };
    let Some(label) = declaration.encoding().transpose().map_err(quick_xml::Error::from)? else {
        return Ok(None);
    };
    match Encoding::for_label(&label) {
        // The bytes were not UTF-16 shaped, so a UTF-16 label cannot be taken literally.
        Some(encoding) => Ok(Some(encoding.output_encoding())),
        None => Err(StructureError::UnknownEncoding(String::from_utf8_lossy(&label).into_owned()).into()),
    }
}
