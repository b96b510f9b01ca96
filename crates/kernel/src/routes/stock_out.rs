//! Stock-out report routes.
//!
//! JSON input for the admin report view: one report page, the category
//! filter options and the table column metadata.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::error::AppResult;
use crate::report::{
    CategoryOptions, ColumnInfo, PageResult, RawReportParams, report_columns, sanitize,
};
use crate::state::AppState;

/// Create the stock-out report router.
pub fn router() -> Router<AppState> {
    Router::new().route("/admin/stock-out", get(stock_out_report))
}

#[derive(Serialize)]
struct StockOutResponse {
    report: PageResult,
    categories: CategoryOptions,
    columns: Vec<ColumnInfo>,
}

/// Render one page of the stock-out report.
///
/// A data-source failure fails the whole response; no partial table is
/// returned. Query parameters are taken as raw pairs so a repeated key
/// resolves to its last value instead of rejecting the request.
async fn stock_out_report(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> AppResult<Json<StockOutResponse>> {
    let params = RawReportParams::from_pairs(pairs);
    let selected_category = sanitize(&params).category_id;
    let service = state.report();

    let (report, categories) = tokio::try_join!(
        service.run(&params),
        service.category_options(selected_category),
    )?;

    Ok(Json(StockOutResponse {
        report,
        categories,
        columns: report_columns(),
    }))
}
