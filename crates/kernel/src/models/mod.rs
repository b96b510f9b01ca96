//! Host catalog models.
//!
//! The catalog tables belong to the host store; everything here is read-only.

pub mod category;
pub mod product;
pub mod tables;

pub use category::{Category, CategoryStore};
pub use product::{Links, ProductRecord, ProductStore, StockStatus};
pub use tables::{Tables, is_safe_identifier};
