//! Stock-out report engine.
//!
//! The pipeline for one request:
//! - [`sanitize`] turns raw parameters into [`FilterCriteria`]
//! - [`StockOutQueryBuilder`] composes the paged query and its count
//! - a [`ReportSource`] executes both
//! - [`RowProjector`] resolves display fields through the [`Catalog`]
//!
//! The category filter control is built separately by
//! [`flatten_categories`] over a [`CategorySource`].

mod catalog;
mod category_tree;
mod projector;
mod query_builder;
mod sanitizer;
mod service;
mod source;
mod types;

pub use catalog::Catalog;
pub use category_tree::{
    CategoryOption, CategoryOptions, CategorySource, DEFAULT_MAX_DEPTH, flat_fallback,
    flatten_categories, load_category_options,
};
pub use projector::{PRODUCT_NOT_FOUND, RowProjector, format_change_date, status_label};
pub use query_builder::StockOutQueryBuilder;
pub use sanitizer::{escape_like_wildcards, sanitize};
pub use service::ReportService;
pub use source::{PgReportSource, ReportSource};
pub use types::{
    ColumnInfo, DisplayRow, FilterCriteria, LabelTone, PAGE_SIZE, PageResult, Pagination,
    RawReportParams, ReportRow, SortColumn, SortDirection, StockStatusLabel, report_columns,
};
