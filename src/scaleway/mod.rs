//! Scaleway implementation of the catalogue and server-status backend.

mod error;

use scaleway_rs::{ScalewayApi, ScalewayImage, ScalewayListInstanceImagesBuilder};
use tracing::debug;

use crate::backend::{
    Backend, BackendFuture, IMAGE_PAGE_SIZE, ImageSummary, ServerHandle, ServerSnapshot,
};
use crate::config::ScalewayConfig;

pub use error::ScalewayBackendError;

/// Backend that reads the Scaleway Instances API.
#[derive(Clone)]
pub struct ScalewayBackend {
    api: ScalewayApi,
    config: ScalewayConfig,
}

impl ScalewayBackend {
    /// Constructs a new backend from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ScalewayBackendError::Config`] when the provided configuration
    /// fails validation.
    pub fn new(config: ScalewayConfig) -> Result<Self, ScalewayBackendError> {
        config.validate()?;
        Ok(Self {
            api: ScalewayApi::new(&config.secret_key),
            config,
        })
    }

    /// Builds a handle for a server in the configured zone.
    #[must_use]
    pub fn handle(&self, server_id: &str) -> ServerHandle {
        ServerHandle {
            id: server_id.to_owned(),
            zone: self.config.default_zone.clone(),
        }
    }

    async fn fetch_images(&self, page: u32) -> Result<Vec<ImageSummary>, ScalewayBackendError> {
        let mut scoped =
            ScalewayListInstanceImagesBuilder::new(self.api.clone(), &self.config.default_zone)
                .public(true)
                .arch(&self.config.default_architecture)
                .page(page)
                .per_page(IMAGE_PAGE_SIZE);
        if let Some(project) = &self.config.default_project_id {
            scoped = scoped.project(project);
        }
        let images = scoped.run_async().await?;
        debug!(
            zone = %self.config.default_zone,
            page,
            count = images.len(),
            "listed Scaleway images"
        );
        Ok(images.into_iter().map(summarise).collect())
    }

    async fn fetch_snapshot(
        &self,
        handle: &ServerHandle,
    ) -> Result<ServerSnapshot, ScalewayBackendError> {
        let mut servers = self
            .api
            .list_instances(&handle.zone)
            .servers(&handle.id)
            .per_page(1)
            .run_async()
            .await?;

        servers
            .pop()
            .map(|server| ServerSnapshot {
                id: server.id,
                state: server.state,
                public_ip: server.public_ip.map(|ip| ip.address),
            })
            .ok_or_else(|| ScalewayBackendError::ServerNotFound {
                server_id: handle.id.clone(),
                zone: handle.zone.clone(),
            })
    }
}

fn summarise(image: ScalewayImage) -> ImageSummary {
    ImageSummary {
        id: image.id,
        name: image.name,
        arch: image.arch,
        state: image.state,
        creation_date: image.creation_date,
    }
}

impl Backend for ScalewayBackend {
    type Error = ScalewayBackendError;

    fn list_images_page(&self, page: u32) -> BackendFuture<'_, Vec<ImageSummary>, Self::Error> {
        Box::pin(self.fetch_images(page))
    }

    fn fetch_server<'a>(
        &'a self,
        handle: &'a ServerHandle,
    ) -> BackendFuture<'a, ServerSnapshot, Self::Error> {
        Box::pin(self.fetch_snapshot(handle))
    }
}
