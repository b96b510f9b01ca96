//! Category tree flattening for the category filter control.
//!
//! Walks the category forest depth-first with an explicit stack, producing
//! each parent immediately followed by its children. Cycles and runaway
//! depth are reported as [`ReportError::MalformedHierarchy`]; callers then
//! fall back to a flat list so the rest of the page still renders.

use std::collections::HashSet;

use async_trait::async_trait;
use serde::Serialize;
use tracing::warn;

use crate::error::{ReportError, ReportResult};
use crate::models::Category;

/// Default maximum nesting depth accepted while flattening.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Indent unit per depth level in option labels (three non-breaking spaces).
const INDENT: &str = "\u{a0}\u{a0}\u{a0}";

/// Read access to the category taxonomy.
#[async_trait]
pub trait CategorySource: Send + Sync {
    /// Direct children of `parent_id`, ordered by name. `None` lists root
    /// categories.
    async fn list_categories(&self, parent_id: Option<i64>) -> ReportResult<Vec<Category>>;

    /// Every category regardless of position in the tree.
    async fn list_all_categories(&self) -> ReportResult<Vec<Category>>;
}

/// One entry of the category filter control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryOption {
    pub id: i64,
    pub name: String,
    pub count: i64,
    /// 0 for root categories.
    pub depth: usize,
    /// Whether this is the active category filter.
    pub selected: bool,
    /// Indented display label, e.g. "   Mugs (4)".
    pub label: String,
}

impl CategoryOption {
    fn new(category: Category, depth: usize, selected_id: i64) -> Self {
        let label = format!(
            "{}{} ({})",
            INDENT.repeat(depth),
            category.name,
            category.count
        );
        Self {
            selected: category.id == selected_id,
            id: category.id,
            name: category.name,
            count: category.count,
            depth,
            label,
        }
    }
}

/// Options for the category filter, plus the hierarchy error if the flat
/// fallback was used.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CategoryOptions {
    pub options: Vec<CategoryOption>,
    pub error: Option<String>,
}

/// Flatten the category forest in pre-order.
///
/// Roots start at depth 0 and every child sits one level below its parent.
/// Fails with `MalformedHierarchy` when a category is reached twice or the
/// tree is deeper than `max_depth`.
pub async fn flatten_categories(
    source: &dyn CategorySource,
    selected_id: i64,
    max_depth: usize,
) -> ReportResult<Vec<CategoryOption>> {
    let mut options = Vec::new();
    let mut visited = HashSet::new();

    let roots = source.list_categories(None).await?;
    let mut stack: Vec<(Category, usize)> = roots.into_iter().rev().map(|c| (c, 0)).collect();

    while let Some((category, depth)) = stack.pop() {
        if depth > max_depth {
            return Err(ReportError::MalformedHierarchy(format!(
                "category {} is nested deeper than {max_depth} levels",
                category.id
            )));
        }
        if !visited.insert(category.id) {
            return Err(ReportError::MalformedHierarchy(format!(
                "category {} appears more than once in the hierarchy",
                category.id
            )));
        }

        let children = source.list_categories(Some(category.id)).await?;
        options.push(CategoryOption::new(category, depth, selected_id));

        stack.extend(children.into_iter().rev().map(|c| (c, depth + 1)));
    }

    Ok(options)
}

/// Every category at depth 0, ordered by name.
pub fn flat_fallback(mut categories: Vec<Category>, selected_id: i64) -> Vec<CategoryOption> {
    categories.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
    categories
        .into_iter()
        .map(|c| CategoryOption::new(c, 0, selected_id))
        .collect()
}

/// Build the category filter options, falling back to a flat list when the
/// hierarchy is malformed. Data-source failures propagate.
pub async fn load_category_options(
    source: &dyn CategorySource,
    selected_id: i64,
    max_depth: usize,
) -> ReportResult<CategoryOptions> {
    match flatten_categories(source, selected_id, max_depth).await {
        Ok(options) => Ok(CategoryOptions {
            options,
            error: None,
        }),
        Err(ReportError::MalformedHierarchy(message)) => {
            warn!(error = %message, "category hierarchy malformed, using flat list");
            let all = source.list_all_categories().await?;
            Ok(CategoryOptions {
                options: flat_fallback(all, selected_id),
                error: Some(message),
            })
        }
        Err(e) => Err(e),
    }
}
