//! Repository for the `beers` table.

use async_trait::async_trait;
use beerleo_core::beer::name_filter_pattern;
use beerleo_core::paging::PageRequest;
use beerleo_core::types::DbId;
use sqlx::PgPool;

use crate::models::beer::{Beer, BeerFilter, CreateBeer};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, category, detail, image, created_at, updated_at, deleted_at";

/// Store operations for beers.
#[async_trait]
pub trait BeerRepository: Send + Sync {
    /// Find a beer by its id.
    async fn find_by_id(&self, id: DbId) -> Result<Option<Beer>, sqlx::Error>;

    /// Insert a beer and return the store-assigned id.
    async fn create(&self, input: &CreateBeer) -> Result<DbId, sqlx::Error>;

    /// Replace every mutable column of the row identified by `beer.id`.
    ///
    /// Returns `false` if no row with that id exists.
    async fn update(&self, beer: &Beer) -> Result<bool, sqlx::Error>;

    /// Delete a beer by id. Returns `true` if a row was removed.
    async fn delete(&self, id: DbId) -> Result<bool, sqlx::Error>;

    /// One page of beers plus the row count of the whole table.
    async fn list_paged(&self, page: PageRequest) -> Result<(Vec<Beer>, i64), sqlx::Error>;

    /// All beers whose name contains `filter.name`.
    async fn filter_by_name(&self, filter: &BeerFilter) -> Result<Vec<Beer>, sqlx::Error>;

    /// Verify the store is reachable.
    async fn ping(&self) -> Result<(), sqlx::Error>;
}

/// PostgreSQL implementation of [`BeerRepository`].
#[derive(Debug, Clone)]
pub struct BeerRepo {
    pool: PgPool,
}

impl BeerRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BeerRepository for BeerRepo {
    async fn find_by_id(&self, id: DbId) -> Result<Option<Beer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM beers WHERE id = $1");
        sqlx::query_as::<_, Beer>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn create(&self, input: &CreateBeer) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "INSERT INTO beers (name, category, detail)
             VALUES ($1, $2, $3)
             RETURNING id",
        )
        .bind(&input.name)
        .bind(&input.category)
        .bind(&input.detail)
        .fetch_one(&self.pool)
        .await
    }

    async fn update(&self, beer: &Beer) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE beers SET
                name = $2,
                category = $3,
                detail = $4,
                image = $5,
                updated_at = now()
             WHERE id = $1",
        )
        .bind(beer.id)
        .bind(&beer.name)
        .bind(&beer.category)
        .bind(&beer.detail)
        .bind(&beer.image)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM beers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_paged(&self, page: PageRequest) -> Result<(Vec<Beer>, i64), sqlx::Error> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM beers")
            .fetch_one(&self.pool)
            .await?;

        let query = format!("SELECT {COLUMNS} FROM beers ORDER BY id ASC LIMIT $1 OFFSET $2");
        let beers = sqlx::query_as::<_, Beer>(&query)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!(limit = page.limit, offset = page.offset(), total, "Listed beers page");
        Ok((beers, total))
    }

    async fn filter_by_name(&self, filter: &BeerFilter) -> Result<Vec<Beer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM beers WHERE name LIKE $1 ORDER BY id ASC");
        sqlx::query_as::<_, Beer>(&query)
            .bind(name_filter_pattern(&filter.name))
            .fetch_all(&self.pool)
            .await
    }

    async fn ping(&self) -> Result<(), sqlx::Error> {
        crate::health_check(&self.pool).await
    }
}
