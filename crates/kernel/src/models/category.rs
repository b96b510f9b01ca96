//! Product categories from the host taxonomy.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::tables::Tables;
use crate::error::ReportResult;
use crate::report::CategorySource;

/// Taxonomy name of product categories.
pub const PRODUCT_CATEGORY_TAXONOMY: &str = "product_cat";

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    /// Term ID.
    pub id: i64,

    /// Human-readable name.
    pub name: String,

    /// Number of products assigned to the category.
    pub count: i64,

    /// Parent category (None for root categories).
    pub parent_id: Option<i64>,
}

/// Category source backed by the host's term tables.
pub struct CategoryStore {
    pool: PgPool,
    tables: Tables,
}

impl CategoryStore {
    pub fn new(pool: PgPool, tables: Tables) -> Self {
        Self { pool, tables }
    }

    fn select_sql(&self, by_parent: bool) -> String {
        let terms = self.tables.name("terms");
        let taxonomy = self.tables.name("term_taxonomy");
        let parent_clause = if by_parent {
            "AND tt.parent = $2"
        } else {
            ""
        };
        format!(
            r#"
            SELECT t.term_id AS id, t.name, tt.count, NULLIF(tt.parent, 0) AS parent_id
            FROM "{terms}" t
            INNER JOIN "{taxonomy}" tt ON tt.term_id = t.term_id
            WHERE tt.taxonomy = $1 {parent_clause}
            ORDER BY t.name, t.term_id
            "#
        )
    }
}

#[async_trait]
impl CategorySource for CategoryStore {
    async fn list_categories(&self, parent_id: Option<i64>) -> ReportResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(&self.select_sql(true))
            .bind(PRODUCT_CATEGORY_TAXONOMY)
            .bind(parent_id.unwrap_or(0))
            .fetch_all(&self.pool)
            .await?;

        Ok(categories)
    }

    async fn list_all_categories(&self) -> ReportResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(&self.select_sql(false))
            .bind(PRODUCT_CATEGORY_TAXONOMY)
            .fetch_all(&self.pool)
            .await?;

        Ok(categories)
    }
}
