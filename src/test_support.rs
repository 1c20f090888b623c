//! Test support utilities shared across unit and integration tests.

use std::collections::VecDeque;
use std::future::{Ready, ready};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::backend::{
    Backend, BackendFuture, IMAGE_PAGE_SIZE, ImageSummary, ServerHandle, ServerSnapshot,
};
use crate::poll::{Clock, ClockFuture, PollState};
use crate::resolve::Candidate;

/// Virtual clock whose `sleep` advances time instantly.
///
/// Clones share the same timeline, so a test can keep a handle while the
/// poller owns another.
#[derive(Clone, Debug)]
pub struct ManualClock {
    origin: Instant,
    timeline: Arc<Mutex<Timeline>>,
}

#[derive(Debug, Default)]
struct Timeline {
    elapsed: Duration,
    sleeps: Vec<Duration>,
}

impl ManualClock {
    /// Creates a clock whose virtual time starts at zero.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            timeline: Arc::default(),
        }
    }

    /// Virtual time elapsed since construction.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.with_timeline(|timeline| timeline.elapsed)
    }

    /// Every sleep requested so far, in order.
    #[must_use]
    pub fn sleeps(&self) -> Vec<Duration> {
        self.with_timeline(|timeline| timeline.sleeps.clone())
    }

    /// Moves virtual time forward without recording a sleep, simulating
    /// time spent inside a fetch.
    pub fn advance(&self, by: Duration) {
        self.with_timeline(|timeline| timeline.elapsed = timeline.elapsed.saturating_add(by));
    }

    fn with_timeline<T>(&self, f: impl FnOnce(&mut Timeline) -> T) -> T {
        let mut guard = self.timeline.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.elapsed()
    }

    fn sleep(&self, duration: Duration) -> ClockFuture<'_> {
        self.with_timeline(|timeline| {
            timeline.sleeps.push(duration);
            timeline.elapsed = timeline.elapsed.saturating_add(duration);
        });
        Box::pin(ready(()))
    }
}

/// Status snapshot used as a stand-in for a provider resource.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ScriptedStatus {
    /// Provider status string, for example `BUILD` or `ACTIVE`.
    pub status: String,
    /// Error text reported by the provider, if any.
    pub error: Option<String>,
}

impl ScriptedStatus {
    /// A healthy snapshot in `status`.
    #[must_use]
    pub fn with_status(status: &str) -> Self {
        Self {
            status: status.to_owned(),
            error: None,
        }
    }

    /// A snapshot in `status` that carries `error`.
    #[must_use]
    pub fn failed(status: &str, error: &str) -> Self {
        Self {
            status: status.to_owned(),
            error: Some(error.to_owned()),
        }
    }

    /// Whether the snapshot's status equals `status`, ignoring ASCII case.
    #[must_use]
    pub fn is(&self, status: &str) -> bool {
        self.status.eq_ignore_ascii_case(status)
    }
}

impl PollState for ScriptedStatus {
    type Failure = String;

    fn failure(&self) -> Option<Self::Failure> {
        self.error.clone()
    }
}

/// Fetch double that replays scripted results in FIFO order.
///
/// Once the script is exhausted every further fetch returns the fallback.
#[derive(Clone, Debug)]
pub struct ScriptedStates<S, E> {
    inner: Arc<Mutex<Script<S, E>>>,
}

#[derive(Debug)]
struct Script<S, E> {
    queue: VecDeque<Result<S, E>>,
    fallback: Result<S, E>,
    fetches: usize,
}

impl<S: Clone, E: Clone> ScriptedStates<S, E> {
    /// Creates a script that returns `fallback` until results are pushed.
    #[must_use]
    pub fn new(fallback: Result<S, E>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Script {
                queue: VecDeque::new(),
                fallback,
                fetches: 0,
            })),
        }
    }

    /// Queues a state.
    #[must_use]
    pub fn then_state(self, state: S) -> Self {
        self.push(Ok(state));
        self
    }

    /// Queues a fetch failure.
    #[must_use]
    pub fn then_error(self, error: E) -> Self {
        self.push(Err(error));
        self
    }

    /// Queues a raw result.
    pub fn push(&self, result: Result<S, E>) {
        self.with_script(|script| script.queue.push_back(result));
    }

    /// Number of fetches performed so far.
    #[must_use]
    pub fn fetches(&self) -> usize {
        self.with_script(|script| script.fetches)
    }

    /// Performs one scripted fetch.
    ///
    /// # Errors
    ///
    /// Returns the scripted error when the next entry is a failure.
    pub fn fetch(&self) -> Result<S, E> {
        self.with_script(|script| {
            script.fetches = script.fetches.saturating_add(1);
            script
                .queue
                .pop_front()
                .unwrap_or_else(|| script.fallback.clone())
        })
    }

    /// Adapts the script into the fetch function expected by
    /// [`crate::poll::Poller::poll`].
    pub fn fetcher(&self) -> impl FnMut() -> Ready<Result<S, E>> + '_ {
        move || ready(self.fetch())
    }

    fn with_script<T>(&self, f: impl FnOnce(&mut Script<S, E>) -> T) -> T {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}

/// Named listing entry used by resolver tests.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NamedItem {
    /// Provider identifier.
    pub id: String,
    /// Human readable name.
    pub name: String,
}

impl NamedItem {
    /// Creates an entry.
    #[must_use]
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_owned(),
            name: name.to_owned(),
        }
    }
}

impl Candidate for NamedItem {
    fn display_name(&self) -> &str {
        &self.name
    }
}

/// Error returned by [`ScriptedBackend`].
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("scripted backend failure: {0}")]
pub struct ScriptedBackendError(pub String);

/// Backend double with a fixed, paged image listing and scripted server
/// states.
#[derive(Clone, Debug)]
pub struct ScriptedBackend {
    images: Result<Vec<ImageSummary>, ScriptedBackendError>,
    page_requests: Arc<Mutex<Vec<u32>>>,
    servers: ScriptedStates<ServerSnapshot, ScriptedBackendError>,
}

impl ScriptedBackend {
    /// Creates a backend whose server stays in `state` until scripted
    /// otherwise.
    #[must_use]
    pub fn new(server_id: &str, state: &str) -> Self {
        Self {
            images: Ok(Vec::new()),
            page_requests: Arc::default(),
            servers: ScriptedStates::new(Ok(server(server_id, state))),
        }
    }

    /// Replaces the image listing. It is served in pages of
    /// [`IMAGE_PAGE_SIZE`] entries.
    #[must_use]
    pub fn with_images(mut self, images: Vec<ImageSummary>) -> Self {
        self.images = Ok(images);
        self
    }

    /// Makes image listing fail.
    #[must_use]
    pub fn with_listing_error(mut self, message: &str) -> Self {
        self.images = Err(ScriptedBackendError(message.to_owned()));
        self
    }

    /// Queues the next server state.
    pub fn push_state(&self, server_id: &str, state: &str) {
        self.servers.push(Ok(server(server_id, state)));
    }

    /// Queues a failing server fetch.
    pub fn push_fetch_error(&self, message: &str) {
        self.servers
            .push(Err(ScriptedBackendError(message.to_owned())));
    }

    /// Number of server fetches performed so far.
    #[must_use]
    pub fn fetches(&self) -> usize {
        self.servers.fetches()
    }

    /// Image pages requested so far, in order.
    #[must_use]
    pub fn page_requests(&self) -> Vec<u32> {
        self.page_requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn page(&self, page: u32) -> Result<Vec<ImageSummary>, ScriptedBackendError> {
        self.page_requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(page);
        let images = self.images.as_ref().map_err(Clone::clone)?;
        let size = usize::try_from(IMAGE_PAGE_SIZE).unwrap_or(usize::MAX);
        let index = usize::try_from(page.saturating_sub(1)).unwrap_or(usize::MAX);
        Ok(images
            .chunks(size)
            .nth(index)
            .map(<[ImageSummary]>::to_vec)
            .unwrap_or_default())
    }
}

impl Backend for ScriptedBackend {
    type Error = ScriptedBackendError;

    fn list_images_page(&self, page: u32) -> BackendFuture<'_, Vec<ImageSummary>, Self::Error> {
        Box::pin(ready(self.page(page)))
    }

    fn fetch_server<'a>(
        &'a self,
        _handle: &'a ServerHandle,
    ) -> BackendFuture<'a, ServerSnapshot, Self::Error> {
        Box::pin(ready(self.servers.fetch()))
    }
}

fn server(id: &str, state: &str) -> ServerSnapshot {
    ServerSnapshot {
        id: id.to_owned(),
        state: state.to_owned(),
        public_ip: None,
    }
}

/// Builds an image summary for listings.
#[must_use]
pub fn image(id: &str, name: &str, state: &str, creation_date: &str) -> ImageSummary {
    ImageSummary {
        id: id.to_owned(),
        name: name.to_owned(),
        arch: String::from("x86_64"),
        state: state.to_owned(),
        creation_date: creation_date.to_owned(),
    }
}
