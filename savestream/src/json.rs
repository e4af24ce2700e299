//! The JSON format.

use std::io::{Read, Write};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Error;
use crate::io::{ScopedWriter, read_document};
use crate::ser_de::StreamSerializer;

/// Reads and writes values as JSON documents.
///
/// Absent values are written as `null`. When reading, a stream that is empty
/// or holds only whitespace deserializes to `None`, like `null` does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonStreamSerializer {
    pretty: bool,
    max_document_bytes: Option<u64>,
}

impl JsonStreamSerializer {
    /// Create a serializer that writes compact JSON.
    pub fn new() -> Self {
        Self::default()
    }

    /// Write indented JSON.
    pub fn pretty(self) -> Self {
        Self { pretty: true, ..self }
    }

    /// Reject documents longer than `limit` bytes.
    pub fn with_max_document_bytes(self, limit: u64) -> Self {
        Self { max_document_bytes: Some(limit), ..self }
    }
}

impl StreamSerializer for JsonStreamSerializer {
    type Error = Error;

    fn serialize<Value, Stream>(&self, stream: &mut Stream, value: Option<&Value>) -> Result<(), Error>
    where
        Value: Serialize + ?Sized,
        Stream: Write + ?Sized,
    {
        let type_name = core::any::type_name::<Value>();
        let _span = tracing::debug_span!("json_serialize", type_name).entered();
        let mut writer = ScopedWriter::new(stream);
        let written = match self.pretty {
            true => serde_json::to_writer_pretty(&mut writer, &value),
            false => serde_json::to_writer(&mut writer, &value),
        };
        written.map_err(Error::JsonSerialize)?;
        writer.finish()?;
        Ok(())
    }

    fn deserialize<Value, Stream>(&self, stream: &mut Stream) -> Result<Option<Value>, Error>
    where
        Value: DeserializeOwned,
        Stream: Read + ?Sized,
    {
        let type_name = core::any::type_name::<Value>();
        let _span = tracing::debug_span!("json_deserialize", type_name).entered();
        let bytes = read_document(stream, self.max_document_bytes)?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            tracing::debug!("document is empty");
            return Ok(None);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}
