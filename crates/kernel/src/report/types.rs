//! Stock-out report types.
//!
//! Provides type definitions for the report pipeline:
//! - RawReportParams: request parameters exactly as received
//! - FilterCriteria: validated, immutable per-request criteria
//! - ReportRow: one grouped row from the data query
//! - DisplayRow / PageResult: what the view layer consumes

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::sanitizer::escape_like_wildcards;

/// Rows per report page.
pub const PAGE_SIZE: u32 = 50;

/// Columns the report can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    ProductId,
    ProductName,
    StockStatus,
    TotalSale,
    #[default]
    ChangeDate,
}

impl SortColumn {
    /// All columns in table order.
    pub const ALL: [SortColumn; 5] = [
        SortColumn::ProductId,
        SortColumn::ProductName,
        SortColumn::StockStatus,
        SortColumn::TotalSale,
        SortColumn::ChangeDate,
    ];

    /// Exact, case-sensitive match against the column keys.
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == raw)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortColumn::ProductId => "product_id",
            SortColumn::ProductName => "product_name",
            SortColumn::StockStatus => "stock_status",
            SortColumn::TotalSale => "total_sale",
            SortColumn::ChangeDate => "change_date",
        }
    }

    /// Table header text.
    pub fn header(self) -> &'static str {
        match self {
            SortColumn::ProductId => "Product ID",
            SortColumn::ProductName => "Product Name",
            SortColumn::StockStatus => "Stock Status",
            SortColumn::TotalSale => "Total Sale",
            SortColumn::ChangeDate => "Change Date",
        }
    }

    /// Whether the table header offers this column as a sort link.
    ///
    /// Stock status is constant across the report, so the header does not
    /// offer it even though `orderby=stock_status` is accepted.
    pub fn is_sortable(self) -> bool {
        !matches!(self, SortColumn::StockStatus)
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    /// Only a case-insensitive "asc" sorts ascending.
    pub fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("asc") {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Request parameters as received. Every field is optional and untrusted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawReportParams {
    /// Search text.
    pub s: Option<String>,
    /// Category ID.
    pub category: Option<String>,
    /// Sort column.
    pub orderby: Option<String>,
    /// Sort direction.
    pub order: Option<String>,
    /// Page number.
    pub paged: Option<String>,
}

impl RawReportParams {
    /// Collect parameters from decoded query pairs.
    ///
    /// A repeated key keeps its last value; unknown keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "s" => &mut params.s,
                "category" => &mut params.category,
                "orderby" => &mut params.orderby,
                "order" => &mut params.order,
                "paged" => &mut params.paged,
                _ => continue,
            };
            *slot = Some(value);
        }
        params
    }
}

/// Validated report criteria. Built once per request and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterCriteria {
    /// Literal search text; wildcard escaping happens in [`Self::search_pattern`].
    pub search: String,

    /// Category to restrict to; 0 means no category filter.
    pub category_id: i64,

    pub sort_column: SortColumn,

    pub sort_direction: SortDirection,

    /// 1-indexed page number.
    pub page: u32,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            search: String::new(),
            category_id: 0,
            sort_column: SortColumn::default(),
            sort_direction: SortDirection::default(),
            page: 1,
        }
    }
}

impl FilterCriteria {
    /// The category to filter on, if any.
    pub fn category_filter(&self) -> Option<i64> {
        (self.category_id > 0).then_some(self.category_id)
    }

    /// Case-insensitive "contains" pattern with LIKE wildcards escaped.
    pub fn search_pattern(&self) -> String {
        format!("%{}%", escape_like_wildcards(&self.search.to_lowercase()))
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.page, PAGE_SIZE)
    }

    /// Render the criteria back into request parameters, e.g. for sort and
    /// pager links. Sanitizing the result yields `self` again.
    pub fn to_params(&self) -> RawReportParams {
        RawReportParams {
            s: (!self.search.is_empty()).then(|| self.search.clone()),
            category: self.category_filter().map(|id| id.to_string()),
            orderby: Some(self.sort_column.as_str().to_string()),
            order: Some(self.sort_direction.as_str().to_string()),
            paged: Some(self.page.to_string()),
        }
    }
}

/// Page arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

impl Pagination {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page,
        }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.per_page)
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.per_page)
    }

    /// Number of pages needed for `total` rows.
    pub fn total_pages(&self, total: u64) -> u32 {
        if self.per_page == 0 {
            return 1;
        }
        let pages = total.div_ceil(u64::from(self.per_page));
        u32::try_from(pages).unwrap_or(u32::MAX)
    }
}

/// One row of the data query, grouped per product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct ReportRow {
    pub product_id: i64,
    pub product_name: String,
    /// Stock status as stored when the query ran.
    pub stock_status: String,
    /// Latest stock-change timestamp; None when the log has no entry.
    pub change_date: Option<NaiveDateTime>,
    pub total_sale: i64,
}

/// Visual treatment of a stock-status label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelTone {
    /// Green.
    Success,
    /// Red.
    Danger,
    /// Unstyled.
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockStatusLabel {
    pub text: String,
    pub tone: LabelTone,
}

/// A report row ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayRow {
    pub product_id: i64,
    /// Admin edit URL.
    pub edit_link: String,
    pub product_name: String,
    /// Public URL; empty when the product no longer exists.
    pub permalink: String,
    pub stock_status: StockStatusLabel,
    pub total_sale: i64,
    pub change_date: Option<NaiveDateTime>,
    /// Formatted change date, e.g. "March 4, 2024 09:15 AM"; empty when unknown.
    pub change_date_display: String,
}

/// One page of the report plus paging metadata.
#[derive(Debug, Clone, Serialize)]
pub struct PageResult {
    pub rows: Vec<DisplayRow>,

    /// Matching products across all pages.
    pub total: u64,

    pub per_page: u32,

    /// Current page number (1-indexed).
    pub page: u32,

    pub total_pages: u32,

    pub has_next: bool,

    pub has_prev: bool,

    /// Criteria the page was produced from.
    pub criteria: FilterCriteria,
}

impl PageResult {
    /// Create a new result with paging calculations.
    pub fn new(mut rows: Vec<DisplayRow>, total: u64, criteria: FilterCriteria) -> Self {
        let pagination = criteria.pagination();
        rows.truncate(pagination.per_page as usize);
        let total_pages = pagination.total_pages(total);

        Self {
            rows,
            total,
            per_page: pagination.per_page,
            page: pagination.page,
            total_pages,
            has_next: pagination.page < total_pages,
            has_prev: pagination.page > 1,
            criteria,
        }
    }
}

/// Column metadata for the table header.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnInfo {
    pub key: &'static str,
    pub header: &'static str,
    pub sortable: bool,
}

/// Header metadata for every report column, in table order.
pub fn report_columns() -> Vec<ColumnInfo> {
    SortColumn::ALL
        .into_iter()
        .map(|c| ColumnInfo {
            key: c.as_str(),
            header: c.header(),
            sortable: c.is_sortable(),
        })
        .collect()
}
