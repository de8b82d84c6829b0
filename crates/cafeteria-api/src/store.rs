//! Meal persistence seam.
//!
//! The service talks to storage only through [`MealStore`]; production uses
//! the Postgres-backed [`PgMealStore`].

use std::fmt;

use async_trait::async_trait;
use cafeteria_db::{CreateMealParams, Meal, MealFilter, NaturalKeyParams, UpdateMealParams};
use sqlx::PgPool;

#[derive(Debug)]
pub enum StoreError {
    /// The targeted id does not exist
    NotFound,
    Database(sqlx::Error),
    /// The pool could not hand out a connection
    Unavailable(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "Record to update or delete not found"),
            Self::Database(e) => write!(f, "Database error: {e}"),
            Self::Unavailable(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Database(e) => Some(e),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                Self::Unavailable(format!("Database unavailable: {e}"))
            }
            e => Self::Database(e),
        }
    }
}

#[async_trait]
pub trait MealStore: Send + Sync {
    /// Meals in `[date_from, date_to)`, ascending by date
    async fn find_by_filter(&self, filter: &MealFilter) -> Result<Vec<Meal>, StoreError>;

    async fn find_by_natural_key(
        &self,
        key: &NaturalKeyParams,
    ) -> Result<Option<Meal>, StoreError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Meal>, StoreError>;

    async fn create(&self, params: &CreateMealParams) -> Result<Meal, StoreError>;

    /// Fails with [`StoreError::NotFound`] when `id` is absent
    async fn update(&self, id: &str, params: &UpdateMealParams) -> Result<Meal, StoreError>;

    /// Fails with [`StoreError::NotFound`] when `id` is absent
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}

pub struct PgMealStore {
    pool: PgPool,
}

impl PgMealStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MealStore for PgMealStore {
    async fn find_by_filter(&self, filter: &MealFilter) -> Result<Vec<Meal>, StoreError> {
        Ok(cafeteria_db::meals::find_by_filter(&self.pool, filter).await?)
    }

    async fn find_by_natural_key(
        &self,
        key: &NaturalKeyParams,
    ) -> Result<Option<Meal>, StoreError> {
        Ok(cafeteria_db::meals::find_by_natural_key(&self.pool, key).await?)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Meal>, StoreError> {
        Ok(cafeteria_db::meals::get(&self.pool, id).await?)
    }

    async fn create(&self, params: &CreateMealParams) -> Result<Meal, StoreError> {
        Ok(cafeteria_db::meals::create(&self.pool, params).await?)
    }

    async fn update(&self, id: &str, params: &UpdateMealParams) -> Result<Meal, StoreError> {
        cafeteria_db::meals::update(&self.pool, id, params)
            .await?
            .ok_or(StoreError::NotFound)
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        if cafeteria_db::meals::delete(&self.pool, id).await? {
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_exhaustion_maps_to_unavailable() {
        let err = StoreError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, StoreError::Unavailable(_)));
        assert!(err.to_string().starts_with("Database unavailable"));

        let err = StoreError::from(sqlx::Error::PoolClosed);
        assert!(matches!(err, StoreError::Unavailable(_)));
    }

    #[test]
    fn test_other_sqlx_errors_stay_database_errors() {
        let err = StoreError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, StoreError::Database(_)));
        assert!(std::error::Error::source(&err).is_some());
    }
}
