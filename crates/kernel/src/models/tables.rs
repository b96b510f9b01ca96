//! Host table naming.

use sea_query::Alias;

/// Validate a SQL identifier name (table/column names and prefixes).
/// Allows only `[a-zA-Z_][a-zA-Z0-9_]*` with max 63 chars (PostgreSQL limit).
pub fn is_safe_identifier(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 63
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && name.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_')
}

/// Names of the host catalog tables under a configured prefix.
///
/// The prefix is validated when configuration is loaded; no other part of a
/// table name is ever taken from outside the crate.
#[derive(Debug, Clone)]
pub struct Tables {
    prefix: String,
}

impl Tables {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Full table name for a bare table name, e.g. `posts` -> `wp_posts`.
    pub fn name(&self, table: &str) -> String {
        format!("{}{table}", self.prefix)
    }

    pub fn posts(&self) -> Alias {
        Alias::new(self.name("posts"))
    }

    pub fn postmeta(&self) -> Alias {
        Alias::new(self.name("postmeta"))
    }

    pub fn term_taxonomy(&self) -> Alias {
        Alias::new(self.name("term_taxonomy"))
    }

    pub fn term_relationships(&self) -> Alias {
        Alias::new(self.name("term_relationships"))
    }

    pub fn stock_change_history(&self) -> Alias {
        Alias::new(self.name("stock_change_history"))
    }
}

impl Default for Tables {
    fn default() -> Self {
        Self::new("wp_")
    }
}
