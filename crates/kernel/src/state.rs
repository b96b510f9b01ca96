//! Application state shared across all handlers.

use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::info;

use crate::config::Config;
use crate::db;
use crate::models::{Links, Tables};
use crate::report::ReportService;

/// Shared application state.
///
/// Wrapped in Arc internally so Clone is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// PostgreSQL connection pool.
    db: PgPool,

    /// Stock-out report service.
    report: Arc<ReportService>,
}

impl AppState {
    /// Create application state from configuration.
    pub async fn new(config: &Config) -> Result<Self> {
        let db = db::create_pool(config)
            .await
            .context("failed to create database pool")?;

        let report = ReportService::postgres(
            db.clone(),
            Tables::new(config.table_prefix.clone()),
            Links::new(config.site_url.clone()),
            config.category_max_depth,
        );

        info!(
            table_prefix = %config.table_prefix,
            site_url = %config.site_url,
            "report service initialized"
        );

        Ok(Self::from_parts(db, report))
    }

    /// Assemble state from an existing pool and report service.
    pub fn from_parts(db: PgPool, report: Arc<ReportService>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { db, report }),
        }
    }

    /// Get the report service.
    pub fn report(&self) -> &Arc<ReportService> {
        &self.inner.report
    }

    /// Check if PostgreSQL is healthy.
    pub async fn postgres_healthy(&self) -> bool {
        db::check_health(&self.inner.db).await
    }
}
