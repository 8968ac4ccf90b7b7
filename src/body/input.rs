use bytes::{Buf, Bytes};
use std::fmt;
use std::io::{self, Read};

/// Readable byte sequence served as response or error content
///
/// # Examples
///
/// ```
/// use fakehttp::Body;
/// use std::io::Read;
///
/// let mut body = Body::from("hello");
/// let mut text = String::new();
/// body.read_to_string(&mut text).unwrap();
/// assert_eq!(text, "hello");
/// ```
pub struct Body {
    inner: Box<dyn Read + Send>,
}

impl Body {
    /// Wraps any reader
    pub fn from_reader<R>(reader: R) -> Self
    where
        R: Read + Send + 'static,
    {
        Self {
            inner: Box::new(reader),
        }
    }

    /// A body with no content
    pub fn empty() -> Self {
        Self::from(Bytes::new())
    }

    /// Reads the remaining content
    pub fn read_to_bytes(&mut self) -> io::Result<Bytes> {
        let mut buffer = Vec::new();
        self.inner.read_to_end(&mut buffer)?;
        Ok(Bytes::from(buffer))
    }
}

impl Read for Body {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Body").finish_non_exhaustive()
    }
}

impl From<Bytes> for Body {
    fn from(bytes: Bytes) -> Self {
        Self::from_reader(bytes.reader())
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from(Bytes::from(bytes))
    }
}

impl From<&'static [u8]> for Body {
    fn from(bytes: &'static [u8]) -> Self {
        Self::from(Bytes::from_static(bytes))
    }
}

impl From<&'static str> for Body {
    fn from(text: &'static str) -> Self {
        Self::from(Bytes::from_static(text.as_bytes()))
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Self::from(Bytes::from(text))
    }
}
