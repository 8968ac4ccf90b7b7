use crate::body::{Body, Sink};
use crate::{FakeHttpError, Result};
use http::Uri;
use std::io;
use std::sync::Arc;

use super::connection::{FakeConnection, MIN_ERROR_STATUS};

/// Builder for fixtures
///
/// Picks the fixture kind from what was configured: a response code error
/// wins, no status means a hanging connection, otherwise the status decides
/// between a successful and a failed exchange.
///
/// # Examples
///
/// ```
/// use fakehttp::{FakeConnection, HttpConnection};
///
/// let conn = FakeConnection::builder()
///     .url("http://example.com/".parse().unwrap())
///     .status(201)
///     .body("created")
///     .header("Location", "/items/1")
///     .build()
///     .unwrap();
///
/// assert_eq!(conn.response_code().unwrap(), 201);
/// assert_eq!(conn.header_field("Location"), Some("/items/1"));
/// ```
#[derive(Default)]
pub struct FixtureBuilder {
    url: Option<Uri>,
    status: Option<i32>,
    body: Option<Body>,
    error_body: Option<Body>,
    response_code_error: Option<Arc<io::Error>>,
    headers: Vec<(String, String)>,
    output: Option<Option<Sink>>,
}

impl FixtureBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn url(mut self, url: Uri) -> Self {
        self.url = Some(url);
        self
    }

    pub fn status(mut self, status: i32) -> Self {
        self.status = Some(status);
        self
    }

    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn error_body(mut self, body: impl Into<Body>) -> Self {
        self.error_body = Some(body.into());
        self
    }

    pub fn response_code_error(mut self, error: impl Into<Arc<io::Error>>) -> Self {
        self.response_code_error = Some(error.into());
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Overrides the default discard sink; `None` refuses writes
    pub fn output(mut self, output: Option<Sink>) -> Self {
        self.output = Some(output);
        self
    }

    pub fn build(self) -> Result<FakeConnection> {
        let mut conn = match (self.response_code_error, self.status) {
            (Some(error), _) => FakeConnection::with_response_code_error(self.url, error),
            (None, None) => FakeConnection::hanging(self.url),
            (None, Some(status)) if status < MIN_ERROR_STATUS => {
                if self.error_body.is_some() {
                    return Err(FakeHttpError::InvalidArgument(format!(
                        "error body requires a status of 400 or higher, but was: {status}"
                    )));
                }
                FakeConnection::successful(self.url, status, self.body)?
            }
            (None, Some(status)) => {
                if self.body.is_some() {
                    return Err(FakeHttpError::InvalidArgument(format!(
                        "response body requires a status of at most 399, but was: {status}"
                    )));
                }
                FakeConnection::failed(self.url, status, self.error_body)?
            }
        };

        for (name, value) in self.headers {
            conn.add_header(name, value);
        }
        if let Some(output) = self.output {
            conn.set_output_stream(output);
        }
        Ok(conn)
    }
}
