use crate::common::ConnectionFactory;
use crate::{FakeHttpError, Result};
use http::Uri;
use std::collections::VecDeque;
use tracing::{debug, warn};

use super::connection::FakeConnection;

/// Connection factory handing out queued fixtures in order
///
/// Each [`open_connection`](ConnectionFactory::open_connection) call takes
/// the next fixture, points it at the requested target and records that
/// target for later assertions.
///
/// # Examples
///
/// ```
/// use fakehttp::{ConnectionFactory, FakeConnection, FixtureFactory, HttpConnection};
///
/// let mut factory = FixtureFactory::new();
/// factory.push(FakeConnection::successful(None, 200, None).unwrap());
///
/// let url: http::Uri = "http://example.com/".parse().unwrap();
/// let conn = factory.open_connection(&url).unwrap();
/// assert_eq!(conn.url(), Some(&url));
/// assert!(factory.open_connection(&url).is_err());
/// ```
#[derive(Default)]
pub struct FixtureFactory {
    fixtures: VecDeque<FakeConnection>,
    opened: Vec<Uri>,
}

impl FixtureFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a fixture behind those already queued
    pub fn push(&mut self, fixture: FakeConnection) -> &mut Self {
        self.fixtures.push_back(fixture);
        self
    }

    /// Number of fixtures not yet handed out
    pub fn remaining(&self) -> usize {
        self.fixtures.len()
    }

    /// Targets of every connection opened so far, in order
    pub fn opened_urls(&self) -> &[Uri] {
        &self.opened
    }
}

impl FromIterator<FakeConnection> for FixtureFactory {
    fn from_iter<I: IntoIterator<Item = FakeConnection>>(iter: I) -> Self {
        Self {
            fixtures: iter.into_iter().collect(),
            opened: Vec::new(),
        }
    }
}

impl ConnectionFactory for FixtureFactory {
    type Connection = FakeConnection;

    fn open_connection(&mut self, url: &Uri) -> Result<FakeConnection> {
        let Some(mut fixture) = self.fixtures.pop_front() else {
            warn!(%url, opened = self.opened.len(), "fixture queue exhausted");
            return Err(FakeHttpError::NoFixture(format!(
                "no fixture queued for {url} after {} connections",
                self.opened.len()
            )));
        };
        debug!(%url, remaining = self.fixtures.len(), "handing out fixture");
        fixture.set_url(Some(url.clone()));
        self.opened.push(url.clone());
        Ok(fixture)
    }
}
