//! Cafeteria meal catalog service
//!
//! Serves cached meal queries and reconciles scraped daily menus into the
//! meal store by natural key.

pub mod auth;
pub mod cache;
pub mod config;
pub mod dates;
pub mod error;
pub mod menu;
pub mod query;
pub mod reconcile;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;
pub mod types;
pub mod validation;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use error::AppError;
pub use routes::create_router;
pub use service::{MealService, ServiceError};
pub use state::AppState;
pub use store::{MealStore, PgMealStore, StoreError};
