//! Product records read from the host catalog.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use url::Url;

use super::tables::Tables;
use crate::error::{ReportError, ReportResult};
use crate::report::Catalog;

/// Current inventory status of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StockStatus {
    InStock,
    OutOfStock,
    OnBackorder,
    /// Any value the store does not define; kept verbatim.
    Other(String),
}

impl StockStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "instock" => StockStatus::InStock,
            "outofstock" => StockStatus::OutOfStock,
            "onbackorder" => StockStatus::OnBackorder,
            other => StockStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            StockStatus::InStock => "instock",
            StockStatus::OutOfStock => "outofstock",
            StockStatus::OnBackorder => "onbackorder",
            StockStatus::Other(raw) => raw,
        }
    }
}

impl From<String> for StockStatus {
    fn from(raw: String) -> Self {
        StockStatus::parse(&raw)
    }
}

impl From<StockStatus> for String {
    fn from(status: StockStatus) -> Self {
        status.as_str().to_string()
    }
}

/// A product as the catalog currently sees it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: i64,

    /// Display title.
    pub name: String,

    /// Public product URL.
    pub permalink: String,

    pub stock_status: StockStatus,

    /// Cumulative units sold.
    pub total_sales: i64,
}

/// Parse a stored sales counter.
///
/// Counters live in a text meta column; up to 18 leading digits are taken and
/// anything unparseable counts as zero. Matches the SQL sort key built by the
/// report query.
pub fn parse_counter(raw: &str) -> i64 {
    let digits: String = raw
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .take(18)
        .collect();
    digits.parse().unwrap_or(0)
}

/// Builds permalinks and admin edit links relative to the site URL.
#[derive(Debug, Clone)]
pub struct Links {
    site_url: Url,
}

impl Links {
    pub fn new(mut site_url: Url) -> Self {
        if !site_url.path().ends_with('/') {
            let path = format!("{}/", site_url.path());
            site_url.set_path(&path);
        }
        Self { site_url }
    }

    /// Public URL of a product by slug.
    pub fn permalink(&self, slug: &str) -> String {
        self.site_url
            .join(&format!("product/{slug}/"))
            .map(|u| u.to_string())
            .unwrap_or_default()
    }

    /// Admin edit URL of a product.
    pub fn edit_link(&self, id: i64) -> String {
        match self.site_url.join("wp-admin/post.php") {
            Ok(mut url) => {
                url.query_pairs_mut()
                    .append_pair("post", &id.to_string())
                    .append_pair("action", "edit");
                url.to_string()
            }
            Err(_) => String::new(),
        }
    }
}

/// Catalog backed by the host's PostgreSQL tables.
pub struct ProductStore {
    pool: PgPool,
    tables: Tables,
    links: Links,
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i64,
    post_title: String,
    post_name: String,
    stock_status: Option<String>,
    total_sales: Option<String>,
}

impl ProductStore {
    pub fn new(pool: PgPool, tables: Tables, links: Links) -> Self {
        Self {
            pool,
            tables,
            links,
        }
    }

    async fn find_row(&self, id: i64) -> ReportResult<ProductRow> {
        let posts = self.tables.name("posts");
        let postmeta = self.tables.name("postmeta");
        let sql = format!(
            r#"
            SELECT p.id, p.post_title, p.post_name,
                   (SELECT m.meta_value FROM "{postmeta}" m
                     WHERE m.post_id = p.id AND m.meta_key = $2 LIMIT 1) AS stock_status,
                   (SELECT m.meta_value FROM "{postmeta}" m
                     WHERE m.post_id = p.id AND m.meta_key = $3 LIMIT 1) AS total_sales
            FROM "{posts}" p
            WHERE p.id = $1 AND p.post_type = $4 AND p.post_status <> $5
            "#
        );

        sqlx::query_as::<_, ProductRow>(&sql)
            .bind(id)
            .bind("_stock_status")
            .bind("total_sales")
            .bind("product")
            .bind("trash")
            .fetch_optional(&self.pool)
            .await?
            .ok_or(ReportError::ProductNotFound(id))
    }
}

#[async_trait]
impl Catalog for ProductStore {
    async fn lookup_product(&self, id: i64) -> ReportResult<ProductRecord> {
        let row = self.find_row(id).await?;

        Ok(ProductRecord {
            id: row.id,
            permalink: self.links.permalink(&row.post_name),
            name: row.post_title,
            stock_status: StockStatus::parse(row.stock_status.as_deref().unwrap_or_default()),
            total_sales: row.total_sales.as_deref().map(parse_counter).unwrap_or(0),
        })
    }

    fn edit_link(&self, id: i64) -> String {
        self.links.edit_link(id)
    }

    async fn sales_count(&self, id: i64) -> ReportResult<i64> {
        let posts = self.tables.name("posts");
        let postmeta = self.tables.name("postmeta");
        let sql = format!(
            r#"
            SELECT (SELECT m.meta_value FROM "{postmeta}" m
                     WHERE m.post_id = p.id AND m.meta_key = $2 LIMIT 1)
            FROM "{posts}" p
            WHERE p.id = $1 AND p.post_type = $3 AND p.post_status <> $4
            "#
        );

        let counter = sqlx::query_scalar::<_, Option<String>>(&sql)
            .bind(id)
            .bind("total_sales")
            .bind("product")
            .bind("trash")
            .fetch_optional(&self.pool)
            .await?
            .ok_or(ReportError::ProductNotFound(id))?;

        Ok(counter.as_deref().map(parse_counter).unwrap_or(0))
    }
}
