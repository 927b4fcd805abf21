use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use beerleo_core::error::CoreError;
use beerleo_core::image_store::ImageStoreError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
///
/// Only client mistakes map to 400. Everything else, including a missing
/// beer, is reported as 500.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `beerleo_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A failure storing or replacing an image file.
    #[error(transparent)]
    Image(#[from] ImageStoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A server-side failure with a caller-facing message. The cause has
    /// already been logged by [`ResultExt::or_fail`].
    #[error("{0}")]
    Failed(&'static str),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Whether the caller caused this error.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AppError::BadRequest(_)
                | AppError::Core(CoreError::Validation(_))
                | AppError::Image(ImageStoreError::Validation(_))
        )
    }
}

/// Attach an operation-specific message to server-side failures.
pub trait ResultExt<T> {
    /// Client errors pass through unchanged. Anything else is logged and
    /// replaced by [`AppError::Failed`] carrying `message`.
    fn or_fail(self, message: &'static str) -> AppResult<T>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Into<AppError>,
{
    fn or_fail(self, message: &'static str) -> AppResult<T> {
        self.map_err(|err| {
            let err = err.into();
            if err.is_client_error() {
                return err;
            }
            match &err {
                AppError::Core(CoreError::NotFound { .. }) => {
                    tracing::warn!(error = %err, "{message}");
                }
                _ => tracing::error!(error = %err, "{message}"),
            }
            AppError::Failed(message)
        })
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
            },

            // --- Database errors ---
            AppError::Database(err) => {
                tracing::error!(error = %err, "Database error");
                internal()
            }

            // --- Image store errors ---
            AppError::Image(ImageStoreError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Image(err) => {
                tracing::error!(error = %err, "Image store error");
                internal()
            }

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::Failed(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                (*msg).to_string(),
            ),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}
