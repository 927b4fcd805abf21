//! Beer entity model and DTOs.

use beerleo_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `beers` table.
///
/// `image` is either empty or a path relative to the upload root; the HTTP
/// layer rewrites it to an absolute URL before serializing.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Beer {
    pub id: DbId,
    pub name: String,
    pub category: String,
    pub detail: String,
    pub image: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<Timestamp>,
}

/// DTO for creating a new beer.
///
/// Carries no image: the image path is namespaced by the id, so it is
/// attached with a second write once the insert has assigned one.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBeer {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub category: String,
    pub detail: String,
}

/// DTO for editing an existing beer. `None` keeps the stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBeer {
    pub name: Option<String>,
    pub category: Option<String>,
    pub detail: Option<String>,
}

impl UpdateBeer {
    /// Overlay the supplied fields onto `beer`, producing the full row to write.
    pub fn apply_to(&self, beer: &mut Beer) {
        if let Some(name) = &self.name {
            beer.name.clone_from(name);
        }
        if let Some(category) = &self.category {
            beer.category.clone_from(category);
        }
        if let Some(detail) = &self.detail {
            beer.detail.clone_from(detail);
        }
    }
}

/// Substring filter over the `name` column.
#[derive(Debug, Clone, Deserialize)]
pub struct BeerFilter {
    pub name: String,
}
