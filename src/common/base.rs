use crate::headers::HeaderFields;
use crate::{FakeHttpError, Result};
use http::Method;
use tracing::trace;

/// Chunk size used when chunked streaming is requested without a positive length
pub const DEFAULT_CHUNK_SIZE: i32 = 4096;

/// Default request-side state shared by connection implementations
///
/// Holds the settings a client configures before the exchange starts
/// (method, request properties, streaming mode, output enablement) and
/// enforces that they are not changed once the connection is established.
/// Concrete connections own one and delegate to it.
#[derive(Debug, Clone)]
pub struct ConnectionBase {
    connected: bool,
    method: Method,
    fixed_content_length: Option<u64>,
    chunk_length: i32,
    do_output: bool,
    request_properties: HeaderFields,
}

impl Default for ConnectionBase {
    fn default() -> Self {
        Self {
            connected: false,
            method: Method::GET,
            fixed_content_length: None,
            chunk_length: -1,
            do_output: false,
            request_properties: HeaderFields::new(),
        }
    }
}

impl ConnectionBase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }

    fn ensure_not_connected(&self) -> Result<()> {
        if self.connected {
            return Err(FakeHttpError::IllegalState("Already connected".to_string()));
        }
        Ok(())
    }

    /// Sets a fixed request body length
    ///
    /// Fails when already connected, when chunked streaming was selected,
    /// or when the length is negative.
    pub fn set_fixed_length_streaming_mode(&mut self, content_length: i64) -> Result<()> {
        self.ensure_not_connected()?;
        if self.chunk_length != -1 {
            return Err(FakeHttpError::IllegalState(
                "Chunked encoding streaming mode set".to_string(),
            ));
        }
        let length = u64::try_from(content_length).map_err(|_| {
            FakeHttpError::InvalidArgument(format!("invalid content length: {content_length}"))
        })?;
        trace!(content_length = length, "fixed length streaming mode set");
        self.fixed_content_length = Some(length);
        Ok(())
    }

    pub fn fixed_content_length(&self) -> Option<u64> {
        self.fixed_content_length
    }

    /// Enables chunked request streaming
    ///
    /// A non-positive `chunk_length` selects [`DEFAULT_CHUNK_SIZE`].
    pub fn set_chunked_streaming_mode(&mut self, chunk_length: i32) -> Result<()> {
        self.ensure_not_connected()?;
        if self.fixed_content_length.is_some() {
            return Err(FakeHttpError::IllegalState(
                "Fixed length streaming mode set".to_string(),
            ));
        }
        self.chunk_length = if chunk_length <= 0 {
            DEFAULT_CHUNK_SIZE
        } else {
            chunk_length
        };
        trace!(chunk_length = self.chunk_length, "chunked streaming mode set");
        Ok(())
    }

    /// Returns the chunk length, or `-1` when chunked streaming is not enabled
    pub fn chunk_length(&self) -> i32 {
        self.chunk_length
    }

    pub fn set_request_method(&mut self, method: Method) -> Result<()> {
        if self.connected {
            return Err(FakeHttpError::IllegalState(
                "Can't reset method: already connected".to_string(),
            ));
        }
        self.method = method;
        Ok(())
    }

    pub fn request_method(&self) -> &Method {
        &self.method
    }

    pub fn set_do_output(&mut self, do_output: bool) {
        self.do_output = do_output;
    }

    pub fn do_output(&self) -> bool {
        self.do_output
    }

    /// Replaces all values of a request property
    pub fn set_request_property(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<()> {
        self.ensure_not_connected()?;
        self.request_properties.set(name, value);
        Ok(())
    }

    /// Appends a value to a request property
    pub fn add_request_property(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<()> {
        self.ensure_not_connected()?;
        self.request_properties.append(name, value);
        Ok(())
    }

    pub fn request_property(&self, name: &str) -> Option<&str> {
        self.request_properties.first(name)
    }

    pub fn request_properties(&self) -> &HeaderFields {
        &self.request_properties
    }
}
