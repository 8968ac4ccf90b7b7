//! Common traits and types used across the fakehttp library
//!
//! This module contains the capability traits a connection implements and
//! the default request-side state that connections delegate to.

pub mod base;
pub mod traits;

pub use base::{ConnectionBase, DEFAULT_CHUNK_SIZE};
pub use traits::{ConnectionFactory, HttpConnection};
