use std::io::{self, Read};

use crate::error::{Error, StructureError};

/// A reader that refuses to yield more than a fixed number of bytes.
///
/// Unlike [`Read::take`], which silently truncates, reading past the limit
/// fails with an error wrapping [`StructureError::TooLarge`].
#[derive(Debug)]
pub struct BoundedStream<Stream> {
    stream: Stream,
    limit: u64,
    consumed: u64,
}

impl<Stream> BoundedStream<Stream> {
    /// Wrap `stream` so that at most `limit` bytes can be read from it.
    pub fn new(stream: Stream, limit: u64) -> Self {
        Self { stream, limit, consumed: 0 }
    }

    /// The number of bytes read so far.
    pub fn consumed(&self) -> u64 {
        self.consumed
    }

    /// Unwrap the underlying stream.
    pub fn into_inner(self) -> Stream {
        self.stream
    }
}

impl<Stream: Read> Read for BoundedStream<Stream> {
    fn read(&mut self, bytes: &mut [u8]) -> io::Result<usize> {
        let remaining = self.limit - self.consumed;
        if remaining == 0 {
            if bytes.is_empty() {
                return Ok(0);
            }
            // The limit is only exceeded if the stream actually has more to give.
            let mut probe = [0u8; 1];
            return match self.stream.read(&mut probe)? {
                0 => Ok(0),
                _ => Err(io::Error::new(io::ErrorKind::FileTooLarge, StructureError::TooLarge(self.limit))),
            };
        }
        let max_len = core::cmp::min(bytes.len() as u64, remaining) as usize;
        let num_read = self.stream.read(&mut bytes[..max_len])?;
        self.consumed += num_read as u64;
        Ok(num_read)
    }
}

/// Read the entire `stream`, failing if it is longer than `limit` bytes.
pub fn read_document<Stream: Read>(mut stream: Stream, limit: Option<u64>) -> Result<Vec<u8>, Error> {
    let mut bytes = Vec::new();
    let result = match limit {
        Some(limit) => BoundedStream::new(&mut stream, limit).read_to_end(&mut bytes),
        None => stream.read_to_end(&mut bytes),
    };
    match result {
        Ok(_) => Ok(bytes),
        Err(err) => match err.get_ref().and_then(|inner| inner.downcast_ref::<StructureError>()) {
            Some(structure) => Err(Error::Structure(structure.clone())),
            None => Err(err.into()),
        },
    }
}
