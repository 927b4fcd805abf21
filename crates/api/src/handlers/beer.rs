//! Handlers for the `/v1/beers` resource.
//!
//! Handlers only marshal: they parse path/query/form input, call the beer
//! usecase, rewrite stored image paths to absolute URLs and translate
//! errors. Write endpoints accept `multipart/form-data`.

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, Path, Query, State};
use axum::Json;
use beerleo_core::image_store::{public_url, ImageUpload};
use beerleo_core::paging::{PageRequest, PagingResult};
use beerleo_core::types::DbId;
use beerleo_db::models::beer::{Beer, BeerFilter, CreateBeer, UpdateBeer};

use crate::error::{AppError, AppResult, ResultExt};
use crate::host::PublicHost;
use crate::query::{FilterParams, PaginationParams};
use crate::response::{MessageResponse, PagedResponse};
use crate::state::AppState;

const BIND_ERROR: &str = "Failed to bind request";

// ---------------------------------------------------------------------------
// Input parsing
// ---------------------------------------------------------------------------

/// Parse the `{id}` path segment.
pub fn parse_id(raw: &str) -> AppResult<DbId> {
    raw.parse()
        .map_err(|_| AppError::BadRequest("Invalid beer ID".into()))
}

/// Parse `?page=&limit=` into a normalized [`PageRequest`].
///
/// Absent values take the defaults; present values must be integers.
pub fn parse_page_request(params: &PaginationParams) -> AppResult<PageRequest> {
    let page = parse_optional(params.page.as_deref(), "Invalid page number")?;
    let limit = parse_optional(params.limit.as_deref(), "Invalid limit number")?;
    Ok(PageRequest::new(page, limit))
}

fn parse_optional(raw: Option<&str>, message: &str) -> AppResult<Option<i64>> {
    raw.map(|value| {
        value
            .trim()
            .parse::<i64>()
            .map_err(|_| AppError::BadRequest(message.to_string()))
    })
    .transpose()
}

/// Fields bound from a beer multipart form.
#[derive(Debug, Default)]
pub struct BeerForm {
    pub name: Option<String>,
    pub category: Option<String>,
    pub detail: Option<String>,
    pub image: Option<ImageUpload>,
}

impl BeerForm {
    /// Read every known field; unknown fields are skipped.
    ///
    /// Blank text values count as absent. An `image` part with neither a
    /// filename nor content (an empty file input) also counts as absent.
    pub async fn read(multipart: Result<Multipart, MultipartRejection>) -> AppResult<Self> {
        let mut multipart = multipart.map_err(|e| {
            tracing::debug!(error = %e, "Rejected non-multipart body");
            AppError::BadRequest(BIND_ERROR.into())
        })?;
        let mut form = BeerForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|_| AppError::BadRequest(BIND_ERROR.into()))?
        {
            let name = field.name().unwrap_or("").to_string();
            match name.as_str() {
                "image" => {
                    let file_name = field.file_name().unwrap_or("").to_string();
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|_| AppError::BadRequest(BIND_ERROR.into()))?;
                    if !(file_name.is_empty() && bytes.is_empty()) {
                        form.image = Some(ImageUpload {
                            file_name,
                            bytes: bytes.to_vec(),
                        });
                    }
                }
                "name" | "category" | "detail" => {
                    let text = field
                        .text()
                        .await
                        .map_err(|_| AppError::BadRequest(BIND_ERROR.into()))?;
                    let value = Some(text).filter(|t| !t.trim().is_empty());
                    match name.as_str() {
                        "name" => form.name = value,
                        "category" => form.category = value,
                        _ => form.detail = value,
                    }
                }
                _ => {} // ignore unknown fields
            }
        }

        Ok(form)
    }

    /// All of `name`, `category` and `detail` are required on create.
    pub fn to_draft(&self) -> AppResult<CreateBeer> {
        match (&self.name, &self.category, &self.detail) {
            (Some(name), Some(category), Some(detail)) => Ok(CreateBeer {
                name: name.clone(),
                category: category.clone(),
                detail: detail.clone(),
            }),
            _ => Err(AppError::BadRequest(BIND_ERROR.into())),
        }
    }

    /// Supplied fields only; the rest keep their stored values.
    pub fn to_update(&self) -> UpdateBeer {
        UpdateBeer {
            name: self.name.clone(),
            category: self.category.clone(),
            detail: self.detail.clone(),
        }
    }
}

/// Rewrite the stored relative image path to an absolute URL.
fn present(mut beer: Beer, host: &str) -> Beer {
    beer.image = public_url(host, &beer.image);
    beer
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /v1/beers/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    PublicHost(host): PublicHost,
    Path(raw_id): Path<String>,
) -> AppResult<Json<Beer>> {
    let id = parse_id(&raw_id)?;
    let beer = state
        .beers
        .get_beer(id)
        .await
        .or_fail("Failed to retrieve beer")?;
    Ok(Json(present(beer, &host)))
}

/// GET /v1/beers?page=&limit=
///
/// `paging.count` is the size of the whole table, not of this page.
pub async fn list(
    State(state): State<AppState>,
    PublicHost(host): PublicHost,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<PagedResponse<Beer>>> {
    let page = parse_page_request(&params)?;
    let (beers, total) = state
        .beers
        .list_beers(page)
        .await
        .or_fail("Failed to retrieve beers")?;

    let paging: PagingResult = page.summarize(total);
    let data = beers.into_iter().map(|b| present(b, &host)).collect();
    Ok(Json(PagedResponse { data, paging }))
}

/// GET /v1/beers/filter?name=
///
/// Returns every match, unpaginated. An empty result is not an error.
pub async fn filter_by_name(
    State(state): State<AppState>,
    PublicHost(host): PublicHost,
    Query(params): Query<FilterParams>,
) -> AppResult<Json<Vec<Beer>>> {
    let name = params
        .name
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AppError::BadRequest("Name query parameter is required".into()))?;

    let beers = state
        .beers
        .filter_beers_by_name(&BeerFilter { name })
        .await
        .or_fail("Failed to filter beers by name")?;

    Ok(Json(beers.into_iter().map(|b| present(b, &host)).collect()))
}

/// POST /v1/beers
///
/// Inserts the row first; the image, if any, is written under the new id
/// and recorded with a second write.
pub async fn create(
    State(state): State<AppState>,
    PublicHost(host): PublicHost,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<MessageResponse>> {
    let form = BeerForm::read(multipart).await?;
    let draft = form.to_draft()?;

    let id = state
        .beers
        .create_beer(&draft)
        .await
        .or_fail("Failed to create beer")?;

    if let Some(upload) = form.image {
        let mut beer = state
            .beers
            .get_beer(id)
            .await
            .or_fail("Failed to set beer image")?;
        state
            .beers
            .attach_image(&mut beer, &host, upload)
            .await
            .or_fail("Failed to set beer image")?;
        state
            .beers
            .update_beer(&beer)
            .await
            .or_fail("Failed to set beer image")?;
    }

    Ok(Json(MessageResponse::with_id("Beer created successfully", id)))
}

/// PUT /v1/beers/{id}
///
/// Any subset of `name`, `category`, `detail` plus an optional `image`.
pub async fn update(
    State(state): State<AppState>,
    PublicHost(host): PublicHost,
    Path(raw_id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<MessageResponse>> {
    let id = parse_id(&raw_id)?;
    let form = BeerForm::read(multipart).await?;

    let mut beer = state
        .beers
        .get_beer(id)
        .await
        .or_fail("Failed to fetch beer details")?;
    form.to_update().apply_to(&mut beer);

    if let Some(upload) = form.image {
        state
            .beers
            .attach_image(&mut beer, &host, upload)
            .await
            .or_fail("Failed to set beer image")?;
    }

    state
        .beers
        .update_beer(&beer)
        .await
        .or_fail("Failed to update beer")?;

    Ok(Json(MessageResponse::new("Beer updated successfully")))
}

/// DELETE /v1/beers/{id}
///
/// Hard-deletes the row. The image directory is left in place.
pub async fn delete(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let id = parse_id(&raw_id)?;
    state
        .beers
        .delete_beer(id)
        .await
        .or_fail("Failed to delete beer")?;
    Ok(Json(MessageResponse::new("Beer deleted successfully")))
}
