//! Configuration loaded from environment variables.

use std::env;

use anyhow::{Context, Result, bail};
use url::Url;

use crate::models::is_safe_identifier;
use crate::report::DEFAULT_MAX_DEPTH;

/// Longest table prefix accepted; leaves room for the table names under
/// PostgreSQL's 63-byte identifier limit.
const MAX_TABLE_PREFIX_LEN: usize = 40;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port (default: 3000).
    pub port: u16,

    /// PostgreSQL connection URL.
    pub database_url: String,

    /// Maximum database connections in pool (default: 10).
    pub database_max_connections: u32,

    /// Prefix of the host catalog tables (default: "wp_").
    pub table_prefix: String,

    /// Public site URL used for permalinks and edit links.
    pub site_url: Url,

    /// Deepest category nesting the filter control will walk (default: 32).
    pub category_max_depth: usize,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .context("PORT must be a valid u16")?;

        let database_url =
            env::var("DATABASE_URL").context("DATABASE_URL environment variable is required")?;

        let database_max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .context("DATABASE_MAX_CONNECTIONS must be a valid u32")?;

        let table_prefix = env::var("TABLE_PREFIX").unwrap_or_else(|_| "wp_".to_string());
        validate_table_prefix(&table_prefix)?;

        let site_url = env::var("SITE_URL").unwrap_or_else(|_| format!("http://localhost:{port}"));
        let site_url = Url::parse(&site_url).context("SITE_URL must be a valid URL")?;

        let category_max_depth = env::var("CATEGORY_MAX_DEPTH")
            .unwrap_or_else(|_| DEFAULT_MAX_DEPTH.to_string())
            .parse()
            .context("CATEGORY_MAX_DEPTH must be a valid usize")?;

        Ok(Self {
            port,
            database_url,
            database_max_connections,
            table_prefix,
            site_url,
            category_max_depth,
        })
    }
}

/// Reject table prefixes that could not be spliced safely into a table name.
pub fn validate_table_prefix(prefix: &str) -> Result<()> {
    if prefix.is_empty() {
        return Ok(());
    }
    if prefix.len() > MAX_TABLE_PREFIX_LEN || !is_safe_identifier(prefix) {
        bail!("TABLE_PREFIX must match [A-Za-z_][A-Za-z0-9_]* (max {MAX_TABLE_PREFIX_LEN} chars)");
    }
    Ok(())
}
