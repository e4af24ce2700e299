//! The format-agnostic serialization capability.

mod stream_serializer;

pub use stream_serializer::StreamSerializer;
