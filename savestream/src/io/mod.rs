//! Stream helpers shared by the serializers.

mod bounded_stream;
mod scoped_writer;

pub use bounded_stream::{BoundedStream, read_document};
pub use scoped_writer::ScopedWriter;
