use bytes::{Bytes, BytesMut};
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

/// Writable request body destination
pub type Sink = Box<dyn Write + Send>;

/// Sink that accepts and drops every write
pub fn discard_sink() -> Sink {
    Box::new(io::sink())
}

/// Sink that records everything written to it
///
/// Clones share the same buffer: hand one clone to the connection and keep
/// another to inspect the captured request body.
///
/// # Examples
///
/// ```
/// use fakehttp::RecordingSink;
/// use std::io::Write;
///
/// let recorder = RecordingSink::new();
/// let mut writer = recorder.clone();
/// writer.write_all(b"payload").unwrap();
/// assert_eq!(recorder.contents(), "payload");
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    buffer: Arc<Mutex<BytesMut>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything written so far
    pub fn contents(&self) -> Bytes {
        match self.buffer.lock() {
            Ok(buffer) => Bytes::copy_from_slice(&buffer),
            Err(poisoned) => Bytes::copy_from_slice(&poisoned.into_inner()),
        }
    }

    pub fn len(&self) -> usize {
        match self.buffer.lock() {
            Ok(buffer) => buffer.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Boxes a clone for use as a connection's output stream
    pub fn sink(&self) -> Sink {
        Box::new(self.clone())
    }
}

impl Write for RecordingSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut buffer = self
            .buffer
            .lock()
            .map_err(|_| io::Error::other("recording sink poisoned"))?;
        buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
