//! Beer usecase: domain checks on top of the repository and image store.

use std::sync::Arc;

use async_trait::async_trait;
use beerleo_core::beer::{self, from_validation_errors, require_non_empty, validate_id};
use beerleo_core::error::CoreError;
use beerleo_core::image_store::{AttachedImage, ImageStore, ImageUpload};
use beerleo_core::paging::PageRequest;
use beerleo_core::types::DbId;
use beerleo_db::models::beer::{Beer, BeerFilter, CreateBeer};
use beerleo_db::repositories::BeerRepository;
use validator::Validate;

use crate::error::AppResult;

/// Operations exposed to the beer handlers.
#[async_trait]
pub trait BeerUsecase: Send + Sync {
    async fn get_beer(&self, id: DbId) -> AppResult<Beer>;

    async fn delete_beer(&self, id: DbId) -> AppResult<()>;

    /// One page of beers and the total row count.
    async fn list_beers(&self, page: PageRequest) -> AppResult<(Vec<Beer>, i64)>;

    async fn filter_beers_by_name(&self, filter: &BeerFilter) -> AppResult<Vec<Beer>>;

    /// Insert a beer without its image and return the new id.
    async fn create_beer(&self, draft: &CreateBeer) -> AppResult<DbId>;

    /// Full-row replace of a stored beer.
    async fn update_beer(&self, beer: &Beer) -> AppResult<()>;

    /// Store `upload` as the image of `beer`, removing the previous file.
    ///
    /// Sets `beer.image` to the new relative path; the caller persists it
    /// with [`BeerUsecase::update_beer`].
    async fn attach_image(
        &self,
        beer: &mut Beer,
        host: &str,
        upload: ImageUpload,
    ) -> AppResult<AttachedImage>;

    /// Verify the store is reachable.
    async fn health_check(&self) -> AppResult<()>;
}

/// Default [`BeerUsecase`] backed by a repository and an image store.
pub struct BeerService {
    repo: Arc<dyn BeerRepository>,
    images: Arc<dyn ImageStore>,
}

impl BeerService {
    pub fn new(repo: Arc<dyn BeerRepository>, images: Arc<dyn ImageStore>) -> Self {
        Self { repo, images }
    }
}

#[async_trait]
impl BeerUsecase for BeerService {
    async fn get_beer(&self, id: DbId) -> AppResult<Beer> {
        let beer = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: beer::ENTITY,
                id,
            })?;
        Ok(beer)
    }

    async fn delete_beer(&self, id: DbId) -> AppResult<()> {
        let removed = self.repo.delete(id).await?;
        tracing::debug!(id, removed, "Deleted beer");
        Ok(())
    }

    async fn list_beers(&self, page: PageRequest) -> AppResult<(Vec<Beer>, i64)> {
        Ok(self.repo.list_paged(page).await?)
    }

    async fn filter_beers_by_name(&self, filter: &BeerFilter) -> AppResult<Vec<Beer>> {
        Ok(self.repo.filter_by_name(filter).await?)
    }

    async fn create_beer(&self, draft: &CreateBeer) -> AppResult<DbId> {
        draft.validate().map_err(|e| from_validation_errors(&e))?;
        let id = self.repo.create(draft).await?;
        tracing::info!(id, name = %draft.name, "Created beer");
        Ok(id)
    }

    async fn update_beer(&self, beer: &Beer) -> AppResult<()> {
        validate_id(beer.id)?;
        require_non_empty("name", &beer.name)?;
        require_non_empty("category", &beer.category)?;

        if !self.repo.update(beer).await? {
            return Err(CoreError::NotFound {
                entity: beer::ENTITY,
                id: beer.id,
            }
            .into());
        }
        tracing::info!(id = beer.id, "Updated beer");
        Ok(())
    }

    async fn attach_image(
        &self,
        beer: &mut Beer,
        host: &str,
        upload: ImageUpload,
    ) -> AppResult<AttachedImage> {
        validate_id(beer.id)?;
        let attached = self.images.attach(beer.id, &beer.image, host, upload).await?;
        beer.image.clone_from(&attached.relative_path);
        Ok(attached)
    }

    async fn health_check(&self) -> AppResult<()> {
        Ok(self.repo.ping().await?)
    }
}
