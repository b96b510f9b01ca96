//! Report service: runs the full stock-out pipeline for one request.

use std::sync::Arc;

use sqlx::PgPool;
use tracing::debug;

use super::catalog::Catalog;
use super::category_tree::{CategoryOptions, CategorySource, load_category_options};
use super::projector::RowProjector;
use super::sanitizer::sanitize;
use super::source::{PgReportSource, ReportSource};
use super::types::{PageResult, RawReportParams};
use crate::error::ReportResult;
use crate::models::{CategoryStore, Links, ProductStore, Tables};

/// Service for producing stock-out report pages.
///
/// Holds no per-request state; every call works from its own
/// [`FilterCriteria`](super::FilterCriteria).
pub struct ReportService {
    source: Arc<dyn ReportSource>,
    projector: RowProjector,
    categories: Arc<dyn CategorySource>,
    max_category_depth: usize,
}

impl ReportService {
    /// Create a service from its collaborators.
    pub fn new(
        source: Arc<dyn ReportSource>,
        catalog: Arc<dyn Catalog>,
        categories: Arc<dyn CategorySource>,
        max_category_depth: usize,
    ) -> Arc<Self> {
        Arc::new(Self {
            source,
            projector: RowProjector::new(catalog),
            categories,
            max_category_depth,
        })
    }

    /// Create a service backed by the host's PostgreSQL tables.
    pub fn postgres(
        pool: PgPool,
        tables: Tables,
        links: Links,
        max_category_depth: usize,
    ) -> Arc<Self> {
        Self::new(
            Arc::new(PgReportSource::new(pool.clone(), tables.clone())),
            Arc::new(ProductStore::new(pool.clone(), tables.clone(), links)),
            Arc::new(CategoryStore::new(pool, tables)),
            max_category_depth,
        )
    }

    /// Produce one report page from raw request parameters.
    ///
    /// The count and the page query run concurrently; either failing fails
    /// the whole page.
    pub async fn run(&self, params: &RawReportParams) -> ReportResult<PageResult> {
        let criteria = sanitize(params);
        debug!(?criteria, "running stock-out report");

        let (total, rows) = tokio::try_join!(
            self.source.count_matching(&criteria),
            self.source.fetch_page(&criteria),
        )?;

        let rows = self.projector.project_all(rows).await?;
        Ok(PageResult::new(rows, total, criteria))
    }

    /// Category filter options with `selected_id` marked.
    pub async fn category_options(&self, selected_id: i64) -> ReportResult<CategoryOptions> {
        load_category_options(
            self.categories.as_ref(),
            selected_id,
            self.max_category_depth,
        )
        .await
    }
}
