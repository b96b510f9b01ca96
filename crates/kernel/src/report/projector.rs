//! Row projector: turns grouped report rows into display rows.
//!
//! Live catalog values win over the snapshot taken by the report query.
//! A product that disappeared between the query and the lookup is rendered
//! as a placeholder row instead of failing the page.

use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::warn;

use super::catalog::Catalog;
use super::types::{DisplayRow, LabelTone, ReportRow, StockStatusLabel};
use crate::error::{ReportError, ReportResult};

/// Name shown for rows whose product no longer exists.
pub const PRODUCT_NOT_FOUND: &str = "Product not found";

/// Display format of the change date, e.g. "March 4, 2024 09:15 AM".
const CHANGE_DATE_FORMAT: &str = "%B %-d, %Y %H:%M %p";

/// Projects report rows through the live catalog.
pub struct RowProjector {
    catalog: Arc<dyn Catalog>,
}

impl RowProjector {
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self { catalog }
    }

    /// Project a page of rows, preserving their order.
    pub async fn project_all(&self, rows: Vec<ReportRow>) -> ReportResult<Vec<DisplayRow>> {
        let mut projected = Vec::with_capacity(rows.len());
        for row in rows {
            projected.push(self.project(row).await?);
        }
        Ok(projected)
    }

    /// Project a single row with one catalog lookup.
    ///
    /// Only `ProductNotFound` is recovered here; any other catalog failure
    /// propagates.
    pub async fn project(&self, row: ReportRow) -> ReportResult<DisplayRow> {
        let edit_link = self.catalog.edit_link(row.product_id);
        let change_date_display = format_change_date(row.change_date);

        let product = match self.catalog.lookup_product(row.product_id).await {
            Ok(product) => Some(product),
            Err(ReportError::ProductNotFound(id)) => {
                warn!(product_id = id, "product in stock-out report no longer exists");
                None
            }
            Err(e) => return Err(e),
        };

        let Some(product) = product else {
            return Ok(DisplayRow {
                product_id: row.product_id,
                edit_link,
                product_name: PRODUCT_NOT_FOUND.to_string(),
                permalink: String::new(),
                stock_status: status_label(&row.stock_status),
                total_sale: row.total_sale,
                change_date: row.change_date,
                change_date_display,
            });
        };

        Ok(DisplayRow {
            product_id: row.product_id,
            edit_link,
            product_name: product.name,
            permalink: product.permalink,
            stock_status: status_label(product.stock_status.as_str()),
            total_sale: product.total_sales,
            change_date: row.change_date,
            change_date_display,
        })
    }
}

/// Map a raw stock status to its display label.
pub fn status_label(status: &str) -> StockStatusLabel {
    match status {
        "instock" => StockStatusLabel {
            text: "In stock".to_string(),
            tone: LabelTone::Success,
        },
        "outofstock" => StockStatusLabel {
            text: "Out of stock".to_string(),
            tone: LabelTone::Danger,
        },
        other => StockStatusLabel {
            text: other.to_string(),
            tone: LabelTone::Neutral,
        },
    }
}

/// Format a change date for display; empty when unknown.
pub fn format_change_date(date: Option<NaiveDateTime>) -> String {
    date.map(|d| d.format(CHANGE_DATE_FORMAT).to_string())
        .unwrap_or_default()
}
