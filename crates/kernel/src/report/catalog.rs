//! Live product catalog lookups used when rendering report rows.

use async_trait::async_trait;

use crate::error::ReportResult;
use crate::models::ProductRecord;

/// Current product data, as opposed to the snapshot a report query returns.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Look up a product by ID.
    ///
    /// Returns [`ReportError::ProductNotFound`](crate::error::ReportError::ProductNotFound)
    /// when the product no longer exists.
    async fn lookup_product(&self, id: i64) -> ReportResult<ProductRecord>;

    /// Admin edit URL for a product. Built from the ID alone, so it is
    /// available even for deleted products.
    fn edit_link(&self, id: i64) -> String;

    /// Cumulative units sold.
    async fn sales_count(&self, id: i64) -> ReportResult<i64>;
}
