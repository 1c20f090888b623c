//! Backend abstraction for the remote catalogue and server status.

use std::future::Future;
use std::pin::Pin;

use crate::poll::PollState;
use crate::resolve::Candidate;

/// Provider state reported for a server that can no longer make progress.
pub const LOCKED_STATE: &str = "locked";

/// Number of images requested per listing page. A shorter page is the last.
pub const IMAGE_PAGE_SIZE: u32 = 100;

/// An OS image listed by a backend.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ImageSummary {
    /// Provider specific identifier.
    pub id: String,
    /// Human readable label (for example `Ubuntu 24.04 Noble Numbat`).
    pub name: String,
    /// CPU architecture of the image.
    pub arch: String,
    /// Lifecycle state; only `available` images are bootable.
    pub state: String,
    /// RFC 3339 creation timestamp, used to prefer newer images.
    pub creation_date: String,
}

impl ImageSummary {
    /// Whether the image can be used to boot a server.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.state == "available"
    }
}

impl Candidate for ImageSummary {
    fn display_name(&self) -> &str {
        &self.name
    }
}

/// Identifies a server to watch.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ServerHandle {
    /// Provider specific identifier for the server.
    pub id: String,
    /// Zone in which the server lives.
    pub zone: String,
}

/// Point-in-time view of a server.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ServerSnapshot {
    /// Provider specific identifier.
    pub id: String,
    /// Provider state string (for example `starting` or `running`).
    pub state: String,
    /// Public IPv4 address, once assigned.
    pub public_ip: Option<String>,
}

impl ServerSnapshot {
    /// Whether the server is in `state`, ignoring ASCII case.
    #[must_use]
    pub fn is_in(&self, state: &str) -> bool {
        self.state.eq_ignore_ascii_case(state)
    }
}

impl PollState for ServerSnapshot {
    type Failure = String;

    fn failure(&self) -> Option<Self::Failure> {
        self.is_in(LOCKED_STATE).then(|| self.state.clone())
    }
}

/// Future returned by backend operations.
pub type BackendFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// Minimal interface implemented by cloud backends.
pub trait Backend {
    /// Provider specific error type returned by the backend.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Lists one page of images, in provider order.
    ///
    /// Pages are numbered from 1 and hold at most [`IMAGE_PAGE_SIZE`]
    /// entries; a page past the end is empty.
    fn list_images_page(&self, page: u32) -> BackendFuture<'_, Vec<ImageSummary>, Self::Error>;

    /// Fetches the current state of a server.
    ///
    /// A server that no longer exists is reported as an error.
    fn fetch_server<'a>(
        &'a self,
        handle: &'a ServerHandle,
    ) -> BackendFuture<'a, ServerSnapshot, Self::Error>;
}
