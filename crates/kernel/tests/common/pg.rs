//! PostgreSQL fixtures for tests that run against a real database.
//!
//! Tests using these helpers skip when `DATABASE_URL` is unset. Every test
//! works under its own table prefix, so tests in one binary can run in
//! parallel against the same database.

use std::sync::Arc;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use url::Url;

use stockout_kernel::models::category::PRODUCT_CATEGORY_TAXONOMY;
use stockout_kernel::models::{CategoryStore, Links, ProductStore, Tables};
use stockout_kernel::report::{DEFAULT_MAX_DEPTH, ReportService};
use stockout_test_utils::{TestCategory, TestProduct};

use super::SITE_URL;

/// Connect to `DATABASE_URL`, or `None` when it is unset.
pub async fn pool() -> Option<PgPool> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping PostgreSQL test");
        return None;
    };
    let pool = PgPoolOptions::new()
        .max_connections(4)
        .connect(&url)
        .await
        .expect("connect to DATABASE_URL");
    Some(pool)
}

/// A host catalog schema created under a test-specific prefix.
pub struct PgCatalog {
    pub pool: PgPool,
    pub tables: Tables,
}

impl PgCatalog {
    /// Create a fresh set of host tables, replacing any left by an earlier run.
    pub async fn create(pool: PgPool, prefix: &str) -> Self {
        let catalog = Self {
            pool,
            tables: Tables::new(prefix),
        };
        catalog.drop_tables().await;

        let t = |name: &str| catalog.tables.name(name);
        let statements = [
            format!(
                r#"CREATE TABLE "{}" (
                    id BIGINT PRIMARY KEY,
                    post_type TEXT NOT NULL,
                    post_status TEXT NOT NULL,
                    post_title TEXT NOT NULL,
                    post_name TEXT NOT NULL
                )"#,
                t("posts")
            ),
            format!(
                r#"CREATE TABLE "{}" (
                    meta_id BIGSERIAL PRIMARY KEY,
                    post_id BIGINT NOT NULL,
                    meta_key TEXT NOT NULL,
                    meta_value TEXT
                )"#,
                t("postmeta")
            ),
            format!(
                r#"CREATE TABLE "{}" (
                    term_id BIGINT PRIMARY KEY,
                    name TEXT NOT NULL
                )"#,
                t("terms")
            ),
            format!(
                r#"CREATE TABLE "{}" (
                    term_taxonomy_id BIGINT PRIMARY KEY,
                    term_id BIGINT NOT NULL,
                    taxonomy TEXT NOT NULL,
                    parent BIGINT NOT NULL DEFAULT 0,
                    count BIGINT NOT NULL DEFAULT 0
                )"#,
                t("term_taxonomy")
            ),
            format!(
                r#"CREATE TABLE "{}" (
                    object_id BIGINT NOT NULL,
                    term_taxonomy_id BIGINT NOT NULL,
                    PRIMARY KEY (object_id, term_taxonomy_id)
                )"#,
                t("term_relationships")
            ),
            format!(
                r#"CREATE TABLE "{}" (
                    id BIGSERIAL PRIMARY KEY,
                    product_id BIGINT NOT NULL,
                    change_date TIMESTAMP NOT NULL
                )"#,
                t("stock_change_history")
            ),
        ];

        for sql in &statements {
            sqlx::query(sql)
                .execute(&catalog.pool)
                .await
                .expect("create host table");
        }
        catalog
    }

    /// Insert a product with its meta rows, category assignments and
    /// stock-change history.
    pub async fn insert_product(&self, product: &TestProduct) {
        let sql = format!(
            r#"INSERT INTO "{}" (id, post_type, post_status, post_title, post_name)
               VALUES ($1, $2, $3, $4, $5)"#,
            self.tables.name("posts")
        );
        sqlx::query(&sql)
            .bind(product.id)
            .bind(&product.post_type)
            .bind(&product.post_status)
            .bind(&product.title)
            .bind(&product.slug)
            .execute(&self.pool)
            .await
            .expect("insert post");

        let meta = [
            ("_stock_status", &product.stock_status),
            ("total_sales", &product.total_sales),
        ];
        for (key, value) in meta {
            let Some(value) = value else { continue };
            let sql = format!(
                r#"INSERT INTO "{}" (post_id, meta_key, meta_value) VALUES ($1, $2, $3)"#,
                self.tables.name("postmeta")
            );
            sqlx::query(&sql)
                .bind(product.id)
                .bind(key)
                .bind(value)
                .execute(&self.pool)
                .await
                .expect("insert postmeta");
        }

        for category_id in &product.categories {
            let sql = format!(
                r#"INSERT INTO "{}" (object_id, term_taxonomy_id) VALUES ($1, $2)"#,
                self.tables.name("term_relationships")
            );
            sqlx::query(&sql)
                .bind(product.id)
                .bind(category_id)
                .execute(&self.pool)
                .await
                .expect("insert term relationship");
        }

        for change in &product.changes {
            let sql = format!(
                r#"INSERT INTO "{}" (product_id, change_date) VALUES ($1, $2)"#,
                self.tables.name("stock_change_history")
            );
            sqlx::query(&sql)
                .bind(product.id)
                .bind(change)
                .execute(&self.pool)
                .await
                .expect("insert stock change");
        }
    }

    /// Insert a product category. Its taxonomy row shares the term ID.
    pub async fn insert_category(&self, category: &TestCategory) {
        let sql = format!(
            r#"INSERT INTO "{}" (term_id, name) VALUES ($1, $2)"#,
            self.tables.name("terms")
        );
        sqlx::query(&sql)
            .bind(category.id)
            .bind(&category.name)
            .execute(&self.pool)
            .await
            .expect("insert term");

        let sql = format!(
            r#"INSERT INTO "{}" (term_taxonomy_id, term_id, taxonomy, parent, count)
               VALUES ($1, $1, $2, $3, $4)"#,
            self.tables.name("term_taxonomy")
        );
        sqlx::query(&sql)
            .bind(category.id)
            .bind(PRODUCT_CATEGORY_TAXONOMY)
            .bind(category.parent_id.unwrap_or(0))
            .bind(category.count)
            .execute(&self.pool)
            .await
            .expect("insert term taxonomy");
    }

    /// Insert categories first, then products.
    pub async fn seed(&self, products: &[TestProduct], categories: &[TestCategory]) {
        for category in categories {
            self.insert_category(category).await;
        }
        for product in products {
            self.insert_product(product).await;
        }
    }

    fn links() -> Links {
        Links::new(Url::parse(SITE_URL).unwrap())
    }

    /// Report service over these tables.
    pub fn service(&self) -> Arc<ReportService> {
        ReportService::postgres(
            self.pool.clone(),
            self.tables.clone(),
            Self::links(),
            DEFAULT_MAX_DEPTH,
        )
    }

    pub fn product_store(&self) -> ProductStore {
        ProductStore::new(self.pool.clone(), self.tables.clone(), Self::links())
    }

    pub fn category_store(&self) -> CategoryStore {
        CategoryStore::new(self.pool.clone(), self.tables.clone())
    }

    /// Drop every host table under this prefix.
    pub async fn drop_tables(&self) {
        for name in [
            "posts",
            "postmeta",
            "terms",
            "term_taxonomy",
            "term_relationships",
            "stock_change_history",
        ] {
            let sql = format!(r#"DROP TABLE IF EXISTS "{}""#, self.tables.name(name));
            sqlx::query(&sql)
                .execute(&self.pool)
                .await
                .expect("drop host table");
        }
    }
}
