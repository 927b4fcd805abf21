use std::sync::Arc;

use beerleo_core::image_store::ImageStore;
use beerleo_db::repositories::BeerRepository;

use crate::config::AppConfig;
use crate::host::{resolver_for, HostResolver};
use crate::usecases::{BeerService, BeerUsecase};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<AppConfig>,
    /// Beer usecase (repository + image store).
    pub beers: Arc<dyn BeerUsecase>,
    /// Source of the `scheme://host` prefix for image URLs.
    pub host_resolver: Arc<dyn HostResolver>,
}

impl AppState {
    /// Wire the usecase layer from its collaborators.
    pub fn new(
        config: Arc<AppConfig>,
        repo: Arc<dyn BeerRepository>,
        images: Arc<dyn ImageStore>,
    ) -> Self {
        let host_resolver = resolver_for(config.app().public_base_url());
        Self {
            config,
            beers: Arc::new(BeerService::new(repo, images)),
            host_resolver,
        }
    }
}
