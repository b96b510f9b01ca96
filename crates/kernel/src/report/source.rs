//! Report data source.
//!
//! [`ReportSource`] is the seam between the report service and storage.
//! [`PgReportSource`] runs the SeaQuery-built statements against PostgreSQL.

use async_trait::async_trait;
use sea_query::{Value, Values};
use sqlx::postgres::PgArguments;
use sqlx::{Arguments, PgPool};
use tracing::{debug, error};

use super::query_builder::StockOutQueryBuilder;
use super::types::{FilterCriteria, ReportRow};
use crate::error::{ReportError, ReportResult};
use crate::models::Tables;

/// Per-statement timeout for report queries.
const STATEMENT_TIMEOUT: &str = "SET LOCAL statement_timeout = '10s'";

/// Read-only access to the stock-out report data.
#[async_trait]
pub trait ReportSource: Send + Sync {
    /// One page of grouped report rows, already filtered, ordered and paged.
    async fn fetch_page(&self, criteria: &FilterCriteria) -> ReportResult<Vec<ReportRow>>;

    /// Number of products matching the criteria, ignoring paging.
    async fn count_matching(&self, criteria: &FilterCriteria) -> ReportResult<u64>;
}

/// Report source backed by the host's PostgreSQL tables.
pub struct PgReportSource {
    pool: PgPool,
    tables: Tables,
}

impl PgReportSource {
    pub fn new(pool: PgPool, tables: Tables) -> Self {
        Self { pool, tables }
    }
}

#[async_trait]
impl ReportSource for PgReportSource {
    async fn fetch_page(&self, criteria: &FilterCriteria) -> ReportResult<Vec<ReportRow>> {
        let (sql, values) = StockOutQueryBuilder::new(&self.tables, criteria).build();
        debug!(sql = %sql, "stock-out data query");
        let args = bind_values(values)?;

        let mut tx = self.pool.begin().await?;
        sqlx::query(STATEMENT_TIMEOUT).execute(&mut *tx).await?;

        let rows = sqlx::query_as_with::<_, ReportRow, _>(&sql, args)
            .fetch_all(&mut *tx)
            .await
            .map_err(|e| {
                error!(error = %e, "stock-out data query failed");
                ReportError::from(e)
            })?;

        tx.commit().await?;
        Ok(rows)
    }

    async fn count_matching(&self, criteria: &FilterCriteria) -> ReportResult<u64> {
        let (sql, values) = StockOutQueryBuilder::new(&self.tables, criteria).build_count();
        debug!(sql = %sql, "stock-out count query");
        let args = bind_values(values)?;

        let mut tx = self.pool.begin().await?;
        sqlx::query(STATEMENT_TIMEOUT).execute(&mut *tx).await?;

        let total: i64 = sqlx::query_scalar_with(&sql, args)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                error!(error = %e, "stock-out count query failed");
                ReportError::from(e)
            })?;

        tx.commit().await?;
        Ok(u64::try_from(total).unwrap_or(0))
    }
}

/// Convert SeaQuery values into sqlx arguments, in placeholder order.
///
/// Only the value types the report builder emits are accepted.
pub(crate) fn bind_values(values: Values) -> ReportResult<PgArguments> {
    let mut args = PgArguments::default();

    for value in values.0 {
        let added = match value {
            Value::String(Some(s)) => args.add(*s),
            Value::String(None) => args.add(None::<String>),
            Value::BigInt(v) => args.add(v),
            Value::Int(v) => args.add(v),
            Value::BigUnsigned(Some(u)) => {
                let v = i64::try_from(u).map_err(|_| {
                    ReportError::DataSourceUnavailable(format!(
                        "query parameter {u} exceeds the BIGINT range"
                    ))
                })?;
                args.add(v)
            }
            Value::Bool(v) => args.add(v),
            other => {
                return Err(ReportError::DataSourceUnavailable(format!(
                    "unsupported query parameter type: {other:?}"
                )));
            }
        };
        added.map_err(|e| ReportError::DataSourceUnavailable(e.to_string()))?;
    }

    Ok(args)
}
