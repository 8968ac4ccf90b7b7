//! Deterministic fake HTTP connections for testing HTTP client code.
//!
//! A [`FakeConnection`] presents the same call surface as a live outbound
//! connection ([`HttpConnection`]) while serving every response from
//! fixtures supplied by the test: a successful exchange, a failed exchange
//! with an error body, a status query that always fails, or a connection
//! that never resolves a status at all.
//!
//! ```
//! use fakehttp::{FakeConnection, HttpConnection};
//!
//! let mut conn = FakeConnection::successful(None, 200, Some("hello".into())).unwrap();
//! conn.add_header("Custom-Header", "100");
//! assert_eq!(conn.response_code().unwrap(), 200);
//! assert_eq!(conn.header_field("Custom-Header"), Some("100"));
//! ```
//!
//! Signing and verification of JSON Web Tokens live outside this crate.

use std::sync::Arc;
use thiserror::Error;

/// Error types for the fakehttp library
#[derive(Error, Debug)]
pub enum FakeHttpError {
    /// A fixture or streaming parameter was outside its valid range
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A required argument was missing
    #[error("Null argument: {0}")]
    NullArgument(&'static str),

    /// Simulated status retrieval failure, the same error on every query
    #[error("Response code error: {0}")]
    ResponseCode(Arc<std::io::Error>),

    /// I/O errors, including the refusal to expose a body on error statuses
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Unsupported operation errors
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// Request-side change attempted in the wrong connection state
    #[error("Illegal state: {0}")]
    IllegalState(String),

    /// Header name or value rejected by the `http` crate
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// A factory was asked for more connections than it was given
    #[error("No fixture available: {0}")]
    NoFixture(String),
}

/// Result type for the fakehttp library
pub type Result<T> = std::result::Result<T, FakeHttpError>;

pub mod body;
pub mod common;
pub mod fake;
pub mod headers;

// Re-export main types for convenience
pub use body::{Body, RecordingSink, Sink};
pub use common::{ConnectionBase, ConnectionFactory, HttpConnection};
pub use fake::{FakeConnection, FixtureBuilder, FixtureFactory, HANGING_STATUS, MIN_ERROR_STATUS};
pub use headers::HeaderFields;
