use std::io::{Read, Write};

use serde::Serialize;
use serde::de::DeserializeOwned;

/// A format that converts typed values to and from byte streams.
///
/// This is the capability a save-file framework depends on. It is implemented
/// by [`crate::xml::XmlStreamSerializer`] and [`crate::json::JsonStreamSerializer`],
/// and the framework can stay unaware of which one it's using.
///
/// Implementations are configured up front and are immutable afterwards, so a
/// single instance can serve any number of concurrent calls on distinct streams.
pub trait StreamSerializer {
    /// The error returned when serialization or deserialization fails.
    type Error;

    /// Write `value` into `stream`.
    ///
    /// `None` is a valid input and is written in the format's representation
    /// of an absent value. The stream is flushed but not closed.
    fn serialize<Value, Stream>(&self, stream: &mut Stream, value: Option<&Value>) -> Result<(), Self::Error>
    where
        Value: Serialize + ?Sized,
        Stream: Write + ?Sized;

    /// Read a value of type `Value` from `stream`.
    ///
    /// Returns `Ok(None)` when the stream holds no data compatible with
    /// `Value`. Callers should treat this as "nothing to load", not as a
    /// failure.
    fn deserialize<Value, Stream>(&self, stream: &mut Stream) -> Result<Option<Value>, Self::Error>
    where
        Value: DeserializeOwned,
        Stream: Read + ?Sized;

    /// Serialize `value` into a new byte vector.
    fn serialize_to_vec<Value>(&self, value: Option<&Value>) -> Result<Vec<u8>, Self::Error>
    where
        Value: Serialize + ?Sized,
    {
        let mut bytes = Vec::new();
        self.serialize(&mut bytes, value)?;
        Ok(bytes)
    }

    /// Deserialize a value from a byte slice.
    fn deserialize_from_slice<Value>(&self, mut bytes: &[u8]) -> Result<Option<Value>, Self::Error>
    where
        Value: DeserializeOwned,
    {
        self.deserialize(&mut bytes)
    }
}
