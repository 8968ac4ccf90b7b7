use crate::Result;
use crate::body::Body;
use crate::headers::HeaderFields;
use http::{Method, Uri};
use std::io::Write;

/// Common trait for outbound HTTP connections
///
/// This trait is the call surface HTTP client code drives: connection
/// lifecycle, status retrieval, body streams, request-side streaming
/// configuration and response header access. Client code written against
/// it can be handed a [`FakeConnection`](crate::FakeConnection) in tests.
pub trait HttpConnection {
    /// Returns the request target, if any
    fn url(&self) -> Option<&Uri>;

    /// Opens the connection
    fn connect(&mut self) -> Result<()>;

    /// Closes the connection
    fn disconnect(&mut self);

    /// Returns whether the connection goes through a proxy
    fn using_proxy(&self) -> bool;

    /// Returns the response status code, or `-1` when it is not yet known
    fn response_code(&self) -> Result<i32>;

    /// Returns the response body stream for non-error statuses
    fn input_stream(&mut self) -> Result<Option<&mut Body>>;

    /// Returns the error body stream, if one is available
    fn error_stream(&mut self) -> Option<&mut Body>;

    /// Returns the request body sink
    fn output_stream(&mut self) -> Result<&mut (dyn Write + Send)>;

    /// Requests that the connection be used for output
    fn set_do_output(&mut self, do_output: bool);

    /// Sets a fixed request body length from a 32-bit value
    fn set_fixed_length_streaming_mode(&mut self, content_length: i32) -> Result<()>;

    /// Sets a fixed request body length from a 64-bit value
    fn set_fixed_length_streaming_mode_long(&mut self, content_length: i64) -> Result<()>;

    /// Enables chunked request streaming
    fn set_chunked_streaming_mode(&mut self, chunk_length: i32) -> Result<()>;

    /// Sets the request method
    fn set_request_method(&mut self, method: Method) -> Result<()>;

    /// Returns the request method
    fn request_method(&self) -> &Method;

    /// Returns all response headers in insertion order
    fn header_fields(&self) -> &HeaderFields;

    /// Returns the first value of the named response header
    fn header_field(&self, name: &str) -> Option<&str> {
        self.header_fields().first(name)
    }
}

/// Common trait for connection factories
///
/// Client code opens connections through a factory so tests can substitute
/// one that hands out fixtures instead of sockets.
pub trait ConnectionFactory {
    type Connection: HttpConnection;

    /// Opens a connection to the given target
    fn open_connection(&mut self, url: &Uri) -> Result<Self::Connection>;
}
