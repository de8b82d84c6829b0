//! Meal catalog database layer
//!
//! Typed rows and runtime-checked queries over the `meals` table.

pub mod meals;
pub mod migrate;
pub mod types;

pub use sqlx::postgres::PgPool;
pub use types::*;
