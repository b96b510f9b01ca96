//! Stock-out query builder using SeaQuery.
//!
//! Generates the paged data query and the matching count query from
//! validated [`FilterCriteria`]. Every request-derived value is emitted as
//! a bound parameter; only table names (validated at startup) and fixed
//! column expressions appear in the SQL text.

use sea_query::{
    Alias, Expr, Func, JoinType, LikeExpr, NullOrdering, Order, PostgresQueryBuilder, Query,
    SelectStatement, SimpleExpr, Values,
};

use super::types::{FilterCriteria, SortColumn, SortDirection};
use crate::models::Tables;
use crate::models::category::PRODUCT_CATEGORY_TAXONOMY;

/// Post type of catalog products.
const PRODUCT_POST_TYPE: &str = "product";

/// Post status of visible products.
const PUBLISHED_STATUS: &str = "publish";

/// Meta key holding the stock status.
const STOCK_STATUS_KEY: &str = "_stock_status";

/// Meta key holding the cumulative sales counter.
const TOTAL_SALES_KEY: &str = "total_sales";

/// Stock status the report is restricted to.
const OUT_OF_STOCK: &str = "outofstock";

/// Numeric sort key for the text sales counter: up to 18 leading digits,
/// zero when absent or unparseable.
const TOTAL_SALE_EXPR: &str =
    "MAX(COALESCE(CAST(SUBSTRING(LTRIM(ts.meta_value) FROM '^[0-9]{1,18}') AS BIGINT), 0))";

/// Query builder for the stock-out report.
pub struct StockOutQueryBuilder<'a> {
    tables: &'a Tables,
    criteria: &'a FilterCriteria,
}

impl<'a> StockOutQueryBuilder<'a> {
    pub fn new(tables: &'a Tables, criteria: &'a FilterCriteria) -> Self {
        Self { tables, criteria }
    }

    /// Build the grouped, ordered and paged data query.
    pub fn build(&self) -> (String, Values) {
        let mut query = Query::select();

        query
            .expr_as(Expr::col((p(), Alias::new("id"))), Alias::new("product_id"))
            .expr_as(
                Expr::col((p(), Alias::new("post_title"))),
                Alias::new("product_name"),
            )
            .expr_as(
                Expr::col((pm(), Alias::new("meta_value"))),
                Alias::new("stock_status"),
            )
            .expr_as(
                Expr::col((sch(), Alias::new("change_date"))).max(),
                Alias::new("change_date"),
            )
            .expr_as(Expr::cust(TOTAL_SALE_EXPR), Alias::new("total_sale"));

        self.add_from(&mut query);

        // One history row per stock change; grouped back to the latest below
        query.join_as(
            JoinType::LeftJoin,
            self.tables.stock_change_history(),
            sch(),
            Expr::col((p(), Alias::new("id"))).equals((sch(), Alias::new("product_id"))),
        );

        query.join_as(
            JoinType::LeftJoin,
            self.tables.postmeta(),
            ts(),
            Expr::col((ts(), Alias::new("post_id")))
                .equals((p(), Alias::new("id")))
                .and(Expr::col((ts(), Alias::new("meta_key"))).eq(TOTAL_SALES_KEY)),
        );

        self.add_filters(&mut query);

        query.group_by_columns([
            (p(), Alias::new("id")),
            (p(), Alias::new("post_title")),
            (pm(), Alias::new("meta_value")),
        ]);

        self.add_sorts(&mut query);

        let pagination = self.criteria.pagination();
        query.limit(pagination.limit());
        query.offset(pagination.offset());

        query.build(PostgresQueryBuilder)
    }

    /// Build a COUNT query over the same predicates as [`Self::build`].
    pub fn build_count(&self) -> (String, Values) {
        let mut query = Query::select();

        query.expr_as(
            Expr::col((p(), Alias::new("id"))).count_distinct(),
            Alias::new("total"),
        );

        self.add_from(&mut query);
        self.add_filters(&mut query);

        query.build(PostgresQueryBuilder)
    }

    /// FROM posts joined to their stock-status meta row.
    fn add_from(&self, query: &mut SelectStatement) {
        query.from_as(self.tables.posts(), p());
        query.join_as(
            JoinType::InnerJoin,
            self.tables.postmeta(),
            pm(),
            Expr::col((p(), Alias::new("id"))).equals((pm(), Alias::new("post_id"))),
        );
    }

    fn add_filters(&self, query: &mut SelectStatement) {
        query
            .and_where(Expr::col((p(), Alias::new("post_type"))).eq(PRODUCT_POST_TYPE))
            .and_where(Expr::col((p(), Alias::new("post_status"))).eq(PUBLISHED_STATUS))
            .and_where(Expr::col((pm(), Alias::new("meta_key"))).eq(STOCK_STATUS_KEY))
            .and_where(Expr::col((pm(), Alias::new("meta_value"))).eq(OUT_OF_STOCK));

        if let Some(category_id) = self.criteria.category_filter() {
            query.and_where(self.category_condition(category_id));
        }

        if !self.criteria.search.is_empty() {
            query.and_where(
                Expr::expr(Func::lower(Expr::col((p(), Alias::new("post_title")))))
                    .like(LikeExpr::new(self.criteria.search_pattern()).escape('\\')),
            );
        }
    }

    /// `p.id IN (products directly assigned to the category)`.
    fn category_condition(&self, category_id: i64) -> SimpleExpr {
        let tr = Alias::new("tr");
        let tt = Alias::new("tt");

        let mut assigned = Query::select();
        assigned
            .column((tr.clone(), Alias::new("object_id")))
            .from_as(self.tables.term_relationships(), tr.clone())
            .join_as(
                JoinType::InnerJoin,
                self.tables.term_taxonomy(),
                tt.clone(),
                Expr::col((tr, Alias::new("term_taxonomy_id")))
                    .equals((tt.clone(), Alias::new("term_taxonomy_id"))),
            )
            .and_where(
                Expr::col((tt.clone(), Alias::new("taxonomy"))).eq(PRODUCT_CATEGORY_TAXONOMY),
            )
            .and_where(Expr::col((tt, Alias::new("term_id"))).eq(category_id));

        Expr::col((p(), Alias::new("id"))).in_subquery(assigned)
    }

    /// ORDER BY the selected column, then product ID for a stable order.
    ///
    /// Products without a stock-change entry count as the oldest: first when
    /// ascending, last when descending.
    fn add_sorts(&self, query: &mut SelectStatement) {
        let order = match self.criteria.sort_direction {
            SortDirection::Asc => Order::Asc,
            SortDirection::Desc => Order::Desc,
        };
        let column = Alias::new(self.criteria.sort_column.as_str());

        match self.criteria.sort_column {
            SortColumn::ChangeDate => {
                let nulls = match self.criteria.sort_direction {
                    SortDirection::Asc => NullOrdering::First,
                    SortDirection::Desc => NullOrdering::Last,
                };
                query.order_by_with_nulls(column, order, nulls);
            }
            _ => {
                query.order_by(column, order);
            }
        }

        if self.criteria.sort_column != SortColumn::ProductId {
            query.order_by(Alias::new("product_id"), Order::Asc);
        }
    }
}

fn p() -> Alias {
    Alias::new("p")
}

fn pm() -> Alias {
    Alias::new("pm")
}

fn sch() -> Alias {
    Alias::new("sch")
}

fn ts() -> Alias {
    Alias::new("ts")
}
