//! HTTP route handlers.

pub mod health;
pub mod stock_out;
