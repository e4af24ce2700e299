use std::io::{self, Write};

/// A writer borrowed for the duration of a single serialization call.
///
/// The stream is flushed when the writer is [finished](ScopedWriter::finish),
/// and also when it's dropped on an early exit, so bytes that were already
/// handed to the stream never linger in its buffers. The stream itself is
/// never closed: it belongs to the caller.
#[derive(Debug)]
pub struct ScopedWriter<'stream, Stream: Write + ?Sized> {
    stream: &'stream mut Stream,
    finished: bool,
}

impl<'stream, Stream: Write + ?Sized> ScopedWriter<'stream, Stream> {
    /// Borrow `stream` until the writer is finished or dropped.
    pub fn new(stream: &'stream mut Stream) -> Self {
        Self { stream, finished: false }
    }

    /// Flush the stream and release it.
    pub fn finish(mut self) -> io::Result<()> {
        self.finished = true;
        self.stream.flush()
    }
}

impl<Stream: Write + ?Sized> Write for ScopedWriter<'_, Stream> {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.stream.write(bytes)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stream.flush()
    }
}

impl<Stream: Write + ?Sized> Drop for ScopedWriter<'_, Stream> {
    fn drop(&mut self) {
        if !self.finished {
            if let Err(err) = self.stream.flush() {
                tracing::warn!(%err, "failed to flush the stream after an interrupted write");
            }
        }
    }
}
