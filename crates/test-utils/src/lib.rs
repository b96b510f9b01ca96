//! Stock-out report test utilities.
//!
//! Helpers for integration testing: catalog fixtures (products, categories,
//! stock-change events) and assertion utilities for report JSON.

use chrono::{NaiveDate, NaiveDateTime};

/// Create a published product with default values.
///
/// Defaults to out of stock with no recorded sales and no stock-change
/// history.
pub fn test_product(id: i64, title: &str) -> TestProduct {
    TestProduct {
        id,
        title: title.to_string(),
        slug: slugify(title),
        post_type: "product".to_string(),
        post_status: "publish".to_string(),
        stock_status: Some("outofstock".to_string()),
        total_sales: None,
        categories: Vec::new(),
        changes: Vec::new(),
    }
}

/// A product fixture as the host store would hold it.
#[derive(Debug, Clone)]
pub struct TestProduct {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub post_type: String,
    pub post_status: String,
    /// Stored `_stock_status` meta value, if any.
    pub stock_status: Option<String>,
    /// Stored `total_sales` meta value. Kept as text, like the store does.
    pub total_sales: Option<String>,
    /// Directly assigned category IDs.
    pub categories: Vec<i64>,
    /// Stock-change log entries.
    pub changes: Vec<NaiveDateTime>,
}

impl TestProduct {
    /// Set the stock status.
    pub fn with_stock_status(mut self, status: &str) -> Self {
        self.stock_status = Some(status.to_string());
        self
    }

    /// Mark as in stock.
    pub fn in_stock(self) -> Self {
        self.with_stock_status("instock")
    }

    /// Remove the stock-status meta row.
    pub fn without_stock_status(mut self) -> Self {
        self.stock_status = None;
        self
    }

    /// Set the sales counter from a number.
    pub fn with_sales(mut self, sales: i64) -> Self {
        self.total_sales = Some(sales.to_string());
        self
    }

    /// Set the raw sales counter text, e.g. malformed values.
    pub fn with_raw_sales(mut self, raw: &str) -> Self {
        self.total_sales = Some(raw.to_string());
        self
    }

    /// Assign to a category.
    pub fn in_category(mut self, category_id: i64) -> Self {
        self.categories.push(category_id);
        self
    }

    /// Record a stock change.
    pub fn changed_at(mut self, at: NaiveDateTime) -> Self {
        self.changes.push(at);
        self
    }

    /// Set as draft.
    pub fn unpublished(mut self) -> Self {
        self.post_status = "draft".to_string();
        self
    }

    /// Set a different post type.
    pub fn with_post_type(mut self, post_type: &str) -> Self {
        self.post_type = post_type.to_string();
        self
    }

    /// Latest recorded stock change.
    pub fn last_change(&self) -> Option<NaiveDateTime> {
        self.changes.iter().max().copied()
    }
}

/// Create a root category.
pub fn test_category(id: i64, name: &str) -> TestCategory {
    TestCategory {
        id,
        name: name.to_string(),
        count: 0,
        parent_id: None,
    }
}

/// A category fixture.
#[derive(Debug, Clone)]
pub struct TestCategory {
    pub id: i64,
    pub name: String,
    pub count: i64,
    pub parent_id: Option<i64>,
}

impl TestCategory {
    /// Set the parent category.
    pub fn child_of(mut self, parent_id: i64) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Set the product count.
    pub fn with_count(mut self, count: i64) -> Self {
        self.count = count;
        self
    }
}

/// Build a timestamp from its parts.
///
/// # Panics
///
/// Panics on an invalid date or time.
#[allow(clippy::expect_used)]
pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(hour, minute, 0))
        .expect("valid fixture timestamp")
}

fn slugify(title: &str) -> String {
    title
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Assertion helpers for report JSON.
pub mod assert {
    use serde_json::Value;

    /// Assert that a JSON value has a specific key.
    pub fn has_key(value: &Value, key: &str) {
        assert!(
            value.get(key).is_some(),
            "Expected JSON to have key '{key}', got: {value}"
        );
    }

    /// Assert that a string contains a substring.
    pub fn contains(haystack: &str, needle: &str) {
        assert!(
            haystack.contains(needle),
            "Expected string to contain '{needle}'\nActual: {haystack}"
        );
    }

    /// Assert that a string does not contain a substring.
    pub fn not_contains(haystack: &str, needle: &str) {
        assert!(
            !haystack.contains(needle),
            "Expected string to NOT contain '{needle}'\nActual: {haystack}"
        );
    }
}
