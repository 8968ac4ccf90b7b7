//! Fake connection fixtures
//!
//! This module provides [`FakeConnection`], the fixture that stands in for a
//! live outbound HTTP connection, together with a builder and a factory that
//! hands fixtures to code which opens its own connections.

pub mod builder;
pub mod connection;
pub mod factory;


pub use builder::FixtureBuilder;
pub use connection::{FakeConnection, HANGING_STATUS, MIN_ERROR_STATUS};
pub use factory::FixtureFactory;
