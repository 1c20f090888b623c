//! Wires the resolver and the poller to a [`Backend`].
//!
//! The orchestrator turns an image label typed by a user into a concrete
//! image, and waits for a server to reach a requested state while reporting
//! each observed snapshot to the caller.

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::backend::{Backend, IMAGE_PAGE_SIZE, ImageSummary, ServerHandle, ServerSnapshot};
use crate::poll::{Clock, PollOutcome, Poller, TokioClock};
use crate::resolve::{Resolution, resolve};

/// Errors surfaced while waiting on a server.
#[derive(Debug, Error)]
pub enum WaitError<BackendError>
where
    BackendError: std::error::Error + 'static,
{
    /// Raised when fetching the server state fails.
    #[error("failed to fetch server state: {0}")]
    Fetch(#[source] BackendError),
    /// Raised when the provider reports the server in an error state.
    #[error("server {server_id} entered error state {state}")]
    Fault {
        /// Provider server identifier.
        server_id: String,
        /// State reported by the provider.
        state: String,
    },
    /// Raised when the budget runs out before the target state is seen.
    #[error("timeout waiting for server {server_id} to become {target}")]
    Timeout {
        /// Provider server identifier.
        server_id: String,
        /// State that was awaited.
        target: String,
    },
    /// Raised when the wait is cancelled by the caller.
    #[error("wait for server {server_id} was cancelled")]
    Cancelled {
        /// Provider server identifier.
        server_id: String,
    },
}

/// Resolves catalogue queries and watches servers through a backend.
#[derive(Debug)]
pub struct Orchestrator<B, C = TokioClock> {
    backend: B,
    poller: Poller<C>,
}

impl<B, C> Orchestrator<B, C>
where
    B: Backend,
    C: Clock,
{
    /// Creates a new orchestrator.
    #[must_use]
    pub const fn new(backend: B, poller: Poller<C>) -> Self {
        Self { backend, poller }
    }

    /// Aborts waits once `token` is cancelled.
    #[must_use]
    pub fn with_cancellation(self, token: CancellationToken) -> Self {
        Self {
            backend: self.backend,
            poller: self.poller.with_cancellation(token),
        }
    }

    /// Returns the wrapped backend.
    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Resolves an image label against the backend's listing.
    ///
    /// Only available images are considered, newest first, so an abbreviated
    /// label such as `ubuntu` picks the most recent matching release.
    ///
    /// # Errors
    ///
    /// Returns the backend error when the listing cannot be fetched.
    pub async fn resolve_image(
        &self,
        label: &str,
    ) -> Result<Resolution<ImageSummary>, B::Error> {
        let images = self.list_images().await?;
        Ok(select_image(images, label))
    }

    /// Collects every page of the backend's image listing.
    ///
    /// # Errors
    ///
    /// Returns the first backend error; pages already read are discarded.
    pub async fn list_images(&self) -> Result<Vec<ImageSummary>, B::Error> {
        let mut images = Vec::new();
        let mut page: u32 = 1;
        loop {
            let batch = self.backend.list_images_page(page).await?;
            let last = u32::try_from(batch.len()).is_ok_and(|len| len < IMAGE_PAGE_SIZE);
            images.extend(batch);
            if last || page == u32::MAX {
                break;
            }
            page += 1;
        }
        debug!(pages = page, count = images.len(), "listed images");
        Ok(images)
    }

    /// Polls `handle` until it reaches `target`, calling `on_tick` with every
    /// fetched snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`WaitError`] when a fetch fails, the server reports an error
    /// state, the budget runs out, or the wait is cancelled.
    pub async fn wait_for_state(
        &self,
        handle: &ServerHandle,
        target: &str,
        on_tick: impl FnMut(&ServerSnapshot),
    ) -> Result<ServerSnapshot, WaitError<B::Error>> {
        info!(
            server_id = %handle.id,
            zone = %handle.zone,
            target_state = target,
            "waiting for server state"
        );
        let outcome = self
            .poller
            .poll(
                || self.backend.fetch_server(handle),
                |snapshot: &ServerSnapshot| snapshot.is_in(target),
                on_tick,
            )
            .await
            .map_err(WaitError::Fetch)?;
        settle(outcome, handle, target)
    }
}

/// Picks the newest available image whose name contains `label`.
pub fn select_image(mut images: Vec<ImageSummary>, label: &str) -> Resolution<ImageSummary> {
    images.retain(ImageSummary::is_available);
    images.sort_by(|lhs, rhs| rhs.creation_date.cmp(&lhs.creation_date));
    resolve(label, images)
}

fn settle<E>(
    outcome: PollOutcome<ServerSnapshot, String>,
    handle: &ServerHandle,
    target: &str,
) -> Result<ServerSnapshot, WaitError<E>>
where
    E: std::error::Error + 'static,
{
    match outcome {
        PollOutcome::Succeeded(snapshot) => Ok(snapshot),
        PollOutcome::Failed(state) => Err(WaitError::Fault {
            server_id: handle.id.clone(),
            state,
        }),
        PollOutcome::TimedOut => Err(WaitError::Timeout {
            server_id: handle.id.clone(),
            target: target.to_owned(),
        }),
        PollOutcome::Cancelled => Err(WaitError::Cancelled {
            server_id: handle.id.clone(),
        }),
    }
}
