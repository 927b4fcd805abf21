use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Error raised when an environment variable cannot be parsed.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} must be a valid {expected}, got '{value}'")]
    Invalid {
        key: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Server configuration loaded from environment variables.
///
/// The rest of the crate only reads it through the accessor methods.
#[derive(Debug, Clone)]
pub struct AppConfig {
    app: AppSettings,
    db: DbSettings,
}

/// HTTP-side settings.
#[derive(Debug, Clone)]
pub struct AppSettings {
    host: String,
    port: u16,
    name: String,
    version: String,
    request_timeout: Duration,
    shutdown_timeout: Duration,
    max_upload_bytes: usize,
    cors_origins: Vec<String>,
    upload_root: PathBuf,
    public_base_url: Option<String>,
}

/// Store connection settings.
#[derive(Clone)]
pub struct DbSettings {
    url: String,
    max_connections: u32,
}

impl AppConfig {
    /// Load configuration from the process environment with defaults.
    ///
    /// | Env Var                     | Default                    |
    /// |-----------------------------|----------------------------|
    /// | `APP_HOST`                  | `0.0.0.0`                  |
    /// | `APP_PORT`                  | `3000`                     |
    /// | `APP_NAME`                  | `beerleo`                  |
    /// | `APP_VERSION`               | crate version              |
    /// | `APP_REQUEST_TIMEOUT_SECS`  | `30`                       |
    /// | `APP_SHUTDOWN_TIMEOUT_SECS` | `5`                        |
    /// | `APP_MAX_UPLOAD_BYTES`      | `10485760`                 |
    /// | `CORS_ORIGINS`              | `http://localhost:5173`    |
    /// | `UPLOAD_ROOT`               | `.`                        |
    /// | `PUBLIC_BASE_URL`           | unset (derive from request)|
    /// | `DATABASE_URL`              | built from `DB_*`          |
    /// | `DB_MAX_CONNECTIONS`        | `10`                       |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let cors_origins = var("CORS_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let public_base_url = lookup("PUBLIC_BASE_URL")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let app = AppSettings {
            host: var("APP_HOST", "0.0.0.0"),
            port: parse("APP_PORT", &var("APP_PORT", "3000"), "u16")?,
            name: var("APP_NAME", "beerleo"),
            version: var("APP_VERSION", env!("CARGO_PKG_VERSION")),
            request_timeout: Duration::from_secs(parse(
                "APP_REQUEST_TIMEOUT_SECS",
                &var("APP_REQUEST_TIMEOUT_SECS", "30"),
                "u64",
            )?),
            shutdown_timeout: Duration::from_secs(parse(
                "APP_SHUTDOWN_TIMEOUT_SECS",
                &var("APP_SHUTDOWN_TIMEOUT_SECS", "5"),
                "u64",
            )?),
            max_upload_bytes: parse(
                "APP_MAX_UPLOAD_BYTES",
                &var("APP_MAX_UPLOAD_BYTES", "10485760"),
                "usize",
            )?,
            cors_origins,
            upload_root: PathBuf::from(var("UPLOAD_ROOT", ".")),
            public_base_url,
        };

        let url = match lookup("DATABASE_URL") {
            Some(url) => url,
            None => format!(
                "postgres://{}:{}@{}:{}/{}",
                var("DB_USERNAME", "postgres"),
                var("DB_PASSWORD", ""),
                var("DB_HOST", "localhost"),
                parse::<u16>("DB_PORT", &var("DB_PORT", "5432"), "u16")?,
                var("DB_DATABASE", "beerleo"),
            ),
        };
        let db = DbSettings {
            url,
            max_connections: parse(
                "DB_MAX_CONNECTIONS",
                &var("DB_MAX_CONNECTIONS", "10"),
                "u32",
            )?,
        };

        Ok(Self { app, db })
    }

    pub fn app(&self) -> &AppSettings {
        &self.app
    }

    pub fn db(&self) -> &DbSettings {
        &self.db
    }
}

impl AppSettings {
    /// Bind address as `host:port`.
    pub fn url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Per-request timeout enforced by the middleware stack.
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Grace period for in-flight requests once shutdown starts.
    pub fn shutdown_timeout(&self) -> Duration {
        self.shutdown_timeout
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.cors_origins
    }

    /// Directory under which `uploads/beers/<id>/...` is written.
    pub fn upload_root(&self) -> &Path {
        &self.upload_root
    }

    /// Fixed base URL for image links; `None` derives it from each request.
    pub fn public_base_url(&self) -> Option<&str> {
        self.public_base_url.as_deref()
    }
}

impl DbSettings {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn max_connections(&self) -> u32 {
        self.max_connections
    }
}

impl fmt::Debug for DbSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbSettings")
            .field("url", &"<redacted>")
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

fn parse<T: FromStr>(key: &'static str, value: &str, expected: &'static str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        expected,
        value: value.to_string(),
    })
}
