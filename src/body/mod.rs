//! Request and response bodies
//!
//! Response and error content are served from [`Body`] readers supplied by
//! the test. Outgoing request bytes go to a [`Sink`]; [`RecordingSink`]
//! keeps them around so a test can assert on what the client wrote.

pub mod input;
pub mod output;

pub use input::Body;
pub use output::{RecordingSink, Sink, discard_sink};
