use crate::body::{Body, Sink, discard_sink};
use crate::common::{ConnectionBase, HttpConnection};
use crate::headers::HeaderFields;
use crate::{FakeHttpError, Result};
use http::{Method, StatusCode, Uri};
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;
use tracing::{debug, trace, warn};

use super::builder::FixtureBuilder;

/// Status code reported while the outcome of an exchange is not known
pub const HANGING_STATUS: i32 = -1;

/// Lowest status code treated as an error
pub const MIN_ERROR_STATUS: i32 = 400;

/// Fake outbound HTTP connection serving pre-configured fixtures
///
/// Each instance simulates one exchange. Create it with one of the four
/// named constructors (or [`FakeConnection::builder`]), hand it to the code
/// under test in place of a real connection, then assert on the recorded
/// flags.
///
/// Not safe for concurrent use.
///
/// # Examples
///
/// ```
/// use fakehttp::{FakeConnection, HttpConnection};
/// use std::io::Read;
///
/// let mut conn = FakeConnection::failed(None, 404, Some("not found".into())).unwrap();
/// assert_eq!(conn.response_code().unwrap(), 404);
/// assert!(conn.input_stream().is_err());
/// assert!(conn.error_stream().is_none());
///
/// conn.connect().unwrap();
/// let mut text = String::new();
/// conn.error_stream().unwrap().read_to_string(&mut text).unwrap();
/// assert_eq!(text, "not found");
/// ```
pub struct FakeConnection {
    url: Option<Uri>,
    response_code: i32,
    response_code_error: Option<Arc<io::Error>>,
    input: Option<Body>,
    error: Option<Body>,
    output: Option<Sink>,
    headers: HeaderFields,
    base: ConnectionBase,
    connected: bool,
    do_output_called: bool,
    fixed_length_int_called: bool,
    fixed_length_long_called: bool,
}

impl FakeConnection {
    fn new(
        url: Option<Uri>,
        response_code_error: Option<Arc<io::Error>>,
        response_code: i32,
        input: Option<Body>,
        error: Option<Body>,
    ) -> Self {
        Self {
            url,
            response_code,
            response_code_error,
            input,
            error,
            output: Some(discard_sink()),
            headers: HeaderFields::new(),
            base: ConnectionBase::new(),
            connected: false,
            do_output_called: false,
            fixed_length_int_called: false,
            fixed_length_long_called: false,
        }
    }

    /// Starts a [`FixtureBuilder`]
    pub fn builder() -> FixtureBuilder {
        FixtureBuilder::new()
    }

    /// A connection whose status never resolves
    ///
    /// [`response_code`](HttpConnection::response_code) keeps returning
    /// [`HANGING_STATUS`], so calling code polling for a status runs into
    /// its own timeout or cancellation path.
    pub fn hanging(url: Option<Uri>) -> Self {
        debug!(url = ?url, "created hanging fixture");
        Self::new(url, None, HANGING_STATUS, None, None)
    }

    /// A connection whose status query always fails with `error`
    ///
    /// Every call returns the same `Arc`, so tests can check identity with
    /// [`Arc::ptr_eq`].
    pub fn with_response_code_error(url: Option<Uri>, error: impl Into<Arc<io::Error>>) -> Self {
        let error = error.into();
        debug!(url = ?url, error = %error, "created response code error fixture");
        Self::new(url, Some(error), HANGING_STATUS, None, None)
    }

    /// A connection that answers with `response_code` and `body`
    ///
    /// Fails with [`FakeHttpError::InvalidArgument`] when `response_code`
    /// is above 399.
    pub fn successful(url: Option<Uri>, response_code: i32, body: Option<Body>) -> Result<Self> {
        if response_code >= MIN_ERROR_STATUS {
            warn!(response_code, "rejected successful fixture");
            return Err(FakeHttpError::InvalidArgument(format!(
                "Response code must be at most 399, but was: {response_code}"
            )));
        }
        debug!(url = ?url, response_code, "created successful fixture");
        Ok(Self::new(url, None, response_code, body, None))
    }

    /// A connection that answers with `response_code` and `error_body`
    ///
    /// Fails with [`FakeHttpError::InvalidArgument`] when `response_code`
    /// is below 400.
    pub fn failed(url: Option<Uri>, response_code: i32, error_body: Option<Body>) -> Result<Self> {
        if response_code < MIN_ERROR_STATUS {
            warn!(response_code, "rejected failed fixture");
            return Err(FakeHttpError::InvalidArgument(format!(
                "Response code must be 400 or higher, but was: {response_code}"
            )));
        }
        debug!(url = ?url, response_code, "created failed fixture");
        Ok(Self::new(url, None, response_code, None, error_body))
    }

    /// Replaces the request body sink
    ///
    /// `None` makes [`output_stream`](HttpConnection::output_stream) fail
    /// with [`FakeHttpError::Unsupported`].
    pub fn set_output_stream(&mut self, output: Option<Sink>) -> &mut Self {
        self.output = output;
        self
    }

    /// Appends a response header value
    pub fn add_header(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let name = name.into();
        let value = value.into();
        trace!(%name, %value, "added response header");
        self.headers.append(name, value);
        self
    }

    /// Appends a response header value from optional parts
    ///
    /// Fails with [`FakeHttpError::NullArgument`] when either part is missing,
    /// leaving the headers untouched.
    pub fn try_add_header<N, V>(&mut self, name: Option<N>, value: Option<V>) -> Result<&mut Self>
    where
        N: Into<String>,
        V: Into<String>,
    {
        let name = name.ok_or(FakeHttpError::NullArgument("name"))?;
        let value = value.ok_or(FakeHttpError::NullArgument("value"))?;
        Ok(self.add_header(name, value))
    }

    pub(crate) fn set_url(&mut self, url: Option<Uri>) {
        self.url = url;
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Returns whether [`set_do_output`](HttpConnection::set_do_output) was called
    pub fn do_output_called(&self) -> bool {
        self.do_output_called
    }

    pub fn is_set_fixed_length_streaming_mode_int_called(&self) -> bool {
        self.fixed_length_int_called
    }

    pub fn is_set_fixed_length_streaming_mode_long_called(&self) -> bool {
        self.fixed_length_long_called
    }

    pub fn chunk_length(&self) -> i32 {
        self.base.chunk_length()
    }

    /// Typed view of the status, `None` while hanging or when the status query fails
    pub fn status(&self) -> Option<StatusCode> {
        if self.response_code_error.is_some() {
            return None;
        }
        u16::try_from(self.response_code)
            .ok()
            .and_then(|code| StatusCode::from_u16(code).ok())
    }

    /// Request-side state the client configured
    pub fn base(&self) -> &ConnectionBase {
        &self.base
    }

    pub fn base_mut(&mut self) -> &mut ConnectionBase {
        &mut self.base
    }
}

impl fmt::Debug for FakeConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FakeConnection")
            .field("url", &self.url)
            .field("response_code", &self.response_code)
            .field("response_code_error", &self.response_code_error)
            .field("connected", &self.connected)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

impl HttpConnection for FakeConnection {
    fn url(&self) -> Option<&Uri> {
        self.url.as_ref()
    }

    fn connect(&mut self) -> Result<()> {
        debug!(url = ?self.url, "connect");
        self.connected = true;
        Ok(())
    }

    fn disconnect(&mut self) {
        debug!(url = ?self.url, "disconnect");
        self.connected = false;
    }

    fn using_proxy(&self) -> bool {
        false
    }

    fn response_code(&self) -> Result<i32> {
        if let Some(error) = &self.response_code_error {
            return Err(FakeHttpError::ResponseCode(Arc::clone(error)));
        }
        Ok(self.response_code)
    }

    fn input_stream(&mut self) -> Result<Option<&mut Body>> {
        if self.response_code < MIN_ERROR_STATUS {
            return Ok(self.input.as_mut());
        }
        Err(FakeHttpError::Io(io::Error::from(io::ErrorKind::Other)))
    }

    fn error_stream(&mut self) -> Option<&mut Body> {
        if self.connected {
            self.error.as_mut()
        } else {
            None
        }
    }

    fn output_stream(&mut self) -> Result<&mut (dyn Write + Send)> {
        let output: &mut (dyn Write + Send) = self.output.as_deref_mut().ok_or_else(|| {
            FakeHttpError::Unsupported("protocol doesn't support output".to_string())
        })?;
        Ok(output)
    }

    fn set_do_output(&mut self, _do_output: bool) {
        self.do_output_called = true;
    }

    fn set_fixed_length_streaming_mode(&mut self, content_length: i32) -> Result<()> {
        self.fixed_length_int_called = true;
        self.base.set_fixed_length_streaming_mode(i64::from(content_length))
    }

    fn set_fixed_length_streaming_mode_long(&mut self, content_length: i64) -> Result<()> {
        self.fixed_length_long_called = true;
        self.base.set_fixed_length_streaming_mode(content_length)
    }

    fn set_chunked_streaming_mode(&mut self, chunk_length: i32) -> Result<()> {
        self.base.set_chunked_streaming_mode(chunk_length)
    }

    fn set_request_method(&mut self, method: Method) -> Result<()> {
        self.base.set_request_method(method)
    }

    fn request_method(&self) -> &Method {
        self.base.request_method()
    }

    fn header_fields(&self) -> &HeaderFields {
        &self.headers
    }
}
