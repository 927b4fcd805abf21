#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use beerleo_api::config::AppConfig;
use beerleo_api::router::build_app_router;
use beerleo_api::state::AppState;
use beerleo_core::image_store::LocalImageStore;
use beerleo_core::paging::PageRequest;
use beerleo_core::types::DbId;
use beerleo_db::models::beer::{Beer, BeerFilter, CreateBeer};
use beerleo_db::repositories::BeerRepository;
use chrono::Utc;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

/// Host header sent by every helper request.
pub const TEST_HOST: &str = "beers.test";

/// Public prefix image URLs are expected to carry.
pub const TEST_BASE: &str = "http://beers.test";

const BOUNDARY: &str = "beerleo-test-boundary";

// ---------------------------------------------------------------------------
// In-memory repository
// ---------------------------------------------------------------------------

/// Repository kept in memory so the HTTP contract can be exercised without
/// PostgreSQL. Mirrors the ordering and substring rules of `BeerRepo`.
#[derive(Default)]
pub struct InMemoryBeerRepo {
    rows: Mutex<Vec<Beer>>,
    next_id: Mutex<DbId>,
    filter_calls: AtomicUsize,
    failing: bool,
}

impl InMemoryBeerRepo {
    /// A repository whose every call fails like an unreachable database.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Default::default()
        }
    }

    pub fn filter_calls(&self) -> usize {
        self.filter_calls.load(Ordering::SeqCst)
    }

    pub fn row(&self, id: DbId) -> Option<Beer> {
        self.rows.lock().unwrap().iter().find(|b| b.id == id).cloned()
    }

    fn check(&self) -> Result<(), sqlx::Error> {
        if self.failing {
            Err(sqlx::Error::PoolTimedOut)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl BeerRepository for InMemoryBeerRepo {
    async fn find_by_id(&self, id: DbId) -> Result<Option<Beer>, sqlx::Error> {
        self.check()?;
        Ok(self.row(id))
    }

    async fn create(&self, input: &CreateBeer) -> Result<DbId, sqlx::Error> {
        self.check()?;
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        let now = Utc::now();
        self.rows.lock().unwrap().push(Beer {
            id: *next,
            name: input.name.clone(),
            category: input.category.clone(),
            detail: input.detail.clone(),
            image: String::new(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        });
        Ok(*next)
    }

    async fn update(&self, beer: &Beer) -> Result<bool, sqlx::Error> {
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|b| b.id == beer.id) {
            Some(row) => {
                *row = Beer {
                    updated_at: Utc::now(),
                    ..beer.clone()
                };
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: DbId) -> Result<bool, sqlx::Error> {
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|b| b.id != id);
        Ok(rows.len() != before)
    }

    async fn list_paged(&self, page: PageRequest) -> Result<(Vec<Beer>, i64), sqlx::Error> {
        self.check()?;
        let rows = self.rows.lock().unwrap();
        let data = rows
            .iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .cloned()
            .collect();
        Ok((data, rows.len() as i64))
    }

    async fn filter_by_name(&self, filter: &BeerFilter) -> Result<Vec<Beer>, sqlx::Error> {
        self.filter_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .filter(|b| b.name.contains(&filter.name))
            .cloned()
            .collect())
    }

    async fn ping(&self) -> Result<(), sqlx::Error> {
        self.check()
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// A router wired to an in-memory repository and a temporary upload root.
pub struct TestApp {
    pub router: Router,
    pub repo: Arc<InMemoryBeerRepo>,
    pub uploads: TempDir,
}

/// Build a test `AppConfig` whose upload root is `root`.
pub fn test_config(root: &std::path::Path) -> AppConfig {
    let root = root.to_string_lossy().into_owned();
    AppConfig::from_lookup(|key| match key {
        "APP_NAME" => Some("beerleo-test".to_string()),
        "APP_VERSION" => Some("9.9.9".to_string()),
        "UPLOAD_ROOT" => Some(root.clone()),
        _ => None,
    })
    .unwrap()
}

/// Build the full application router (same middleware stack as `main.rs`)
/// over the given repository.
pub fn build_test_app_with(repo: Arc<InMemoryBeerRepo>) -> TestApp {
    let uploads = tempfile::tempdir().unwrap();
    let config = Arc::new(test_config(uploads.path()));
    let images = Arc::new(LocalImageStore::new(uploads.path()));
    let state = AppState::new(Arc::clone(&config), repo.clone(), images);

    TestApp {
        router: build_app_router(state, &config),
        repo,
        uploads,
    }
}

pub fn build_test_app() -> TestApp {
    build_test_app_with(Arc::new(InMemoryBeerRepo::default()))
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Send a request through the router without a running server.
pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header("host", TEST_HOST)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn delete(app: &Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header("host", TEST_HOST)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

/// One part of a multipart form.
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        file_name: &'a str,
        bytes: &'a [u8],
    },
}

/// Encode `parts` as a `multipart/form-data` body.
pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                name,
                file_name,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// Send a multipart request with the given method.
pub async fn send_form(
    app: &Router,
    method: Method,
    uri: &str,
    parts: &[Part<'_>],
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("host", TEST_HOST)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap();
    send(app, request).await
}

/// POST a beer with the three required fields and return its id.
pub async fn create_beer(app: &Router, name: &str, category: &str, detail: &str) -> DbId {
    let response = send_form(
        app,
        Method::POST,
        "/v1/beers",
        &[
            Part::Text("name", name),
            Part::Text("category", category),
            Part::Text("detail", detail),
        ],
    )
    .await;
    assert_eq!(response.status(), 200);
    body_json(response).await["id"].as_i64().unwrap()
}
