use std::path::Path;

use serde::Deserialize;

use crate::error::AppError;

/// Runtime configuration.
///
/// Sources, lowest precedence first: built-in defaults, `DATABASE_URL`,
/// an optional TOML file, then `BLOG_SEARCH__*` environment variables
/// (e.g. `BLOG_SEARCH__LISTEN_ADDR`).
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Address the HTTP server binds to.
    pub listen_addr: String,
    /// Upper bound of the connection pool.
    pub max_connections: u32,
    /// Record an analytics event for every non-blank search.
    pub track_search_requests: bool,
    /// Run the idempotent schema setup before serving.
    pub ensure_schema_on_start: bool,
}

impl AppConfig {
    pub fn load(file: Option<&Path>) -> Result<Self, AppError> {
        let mut builder = config::Config::builder()
            .set_default("database_url", "postgres://localhost:5432/blog")?
            .set_default("listen_addr", "127.0.0.1:3000")?
            .set_default("max_connections", 10)?
            .set_default("track_search_requests", true)?
            .set_default("ensure_schema_on_start", true)?;

        if let Ok(url) = std::env::var("DATABASE_URL") {
            builder = builder.set_default("database_url", url)?;
        }

        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix("BLOG_SEARCH")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
