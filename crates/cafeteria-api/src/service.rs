//! Meal catalog operations shared by the HTTP layer.
//!
//! Reads go through the query cache; every successful write drops all cached
//! query results.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use cafeteria_db::{CreateMealParams, Meal, NaturalKeyParams, UpdateMealParams};
use menu_source_client::MenuSourceError;
use tracing::{debug, info};

use crate::cache::{CacheStats, TtlCache};
use crate::dates::{self, DateError};
use crate::menu::{self, MenuSource};
use crate::query::ParsedMealQuery;
use crate::store::{MealStore, StoreError};
use crate::types::{CreateMealPayload, ScrapeRequest, ScrapeResult, UpdateMealPayload};

/// Cache prefix covering every query result
pub(crate) const QUERY_PREFIX: &str = "query";

#[derive(Debug)]
pub enum ServiceError {
    Store(StoreError),
    MenuSource(MenuSourceError),
    InvalidDate(DateError),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Store(e) => write!(f, "{e}"),
            Self::MenuSource(e) => write!(f, "{e}"),
            Self::InvalidDate(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store(e) => Some(e),
            Self::MenuSource(e) => Some(e),
            Self::InvalidDate(e) => Some(e),
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

impl From<MenuSourceError> for ServiceError {
    fn from(e: MenuSourceError) -> Self {
        Self::MenuSource(e)
    }
}

impl From<DateError> for ServiceError {
    fn from(e: DateError) -> Self {
        Self::InvalidDate(e)
    }
}

/// Whether a natural-key write created a row or hit an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Upsert {
    Inserted,
    Updated,
}

pub struct MealService {
    pub(crate) store: Arc<dyn MealStore>,
    menu_source: Arc<dyn MenuSource>,
    pub(crate) cache: TtlCache<Arc<Vec<Meal>>>,
    cache_ttl: Duration,
}

impl MealService {
    pub fn new(
        store: Arc<dyn MealStore>,
        menu_source: Arc<dyn MenuSource>,
        cache_ttl: Duration,
        cache_capacity: u64,
    ) -> Self {
        Self {
            store,
            menu_source,
            cache: TtlCache::new(cache_capacity),
            cache_ttl,
        }
    }

    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.stats().await
    }

    /// List meals matching a parsed query, resolving "today" at call time
    pub async fn get_meals_by_query(
        &self,
        query: &ParsedMealQuery,
    ) -> Result<Arc<Vec<Meal>>, ServiceError> {
        let resolved = query.resolve(&dates::today())?;

        if let Some(meals) = self.cache.get(&resolved.cache_key).await {
            debug!(key = %resolved.cache_key, "Meal query cache hit");
            return Ok(meals);
        }

        debug!(key = %resolved.cache_key, "Meal query cache miss");
        let meals = Arc::new(self.store.find_by_filter(&resolved.filter).await?);
        self.cache
            .set(resolved.cache_key, meals.clone(), self.cache_ttl)
            .await;
        Ok(meals)
    }

    pub async fn get_meal_by_id(&self, id: &str) -> Result<Option<Meal>, ServiceError> {
        Ok(self.store.find_by_id(id).await?)
    }

    /// Create a meal, or overwrite the entry already holding its natural key
    pub async fn create_meal_entry(&self, payload: CreateMealPayload) -> Result<Meal, ServiceError> {
        let date = dates::day_boundary(&payload.date)?;
        let params = CreateMealParams {
            cafeteria_type: payload.cafeteria_type,
            meal_type: payload.meal_type,
            name: payload.name.trim().to_string(),
            menu: payload.menu,
            date,
        };

        let (meal, outcome) = self.upsert_by_natural_key(params).await?;
        self.invalidate_queries();
        debug!(id = %meal.id, ?outcome, "Saved meal entry");
        Ok(meal)
    }

    /// `Ok(None)` when no meal has this id
    pub async fn update_meal_entry(
        &self,
        id: &str,
        payload: UpdateMealPayload,
    ) -> Result<Option<Meal>, ServiceError> {
        let date = payload
            .date
            .as_deref()
            .map(dates::day_boundary)
            .transpose()?;
        let params = UpdateMealParams {
            cafeteria_type: payload.cafeteria_type,
            meal_type: payload.meal_type,
            name: payload.name,
            menu: payload.menu,
            date,
        };

        match self.store.update(id, &params).await {
            Ok(meal) => {
                self.invalidate_queries();
                Ok(Some(meal))
            }
            Err(StoreError::NotFound) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// `Ok(false)` when no meal has this id
    pub async fn delete_meal_entry(&self, id: &str) -> Result<bool, ServiceError> {
        match self.store.delete(id).await {
            Ok(()) => {
                self.invalidate_queries();
                Ok(true)
            }
            Err(StoreError::NotFound) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Pull one day's menu from the menu source and reconcile it into the store
    pub async fn scrape_and_save(&self, request: ScrapeRequest) -> Result<ScrapeResult, ServiceError> {
        let daily = self
            .menu_source
            .fetch_daily_menu(request.cafeteria, &request.date)
            .await?;
        let records = menu::flatten_daily_menu(request.cafeteria, &daily);
        info!(
            cafeteria = %request.cafeteria,
            date = %request.date,
            records = records.len(),
            "Fetched daily menu"
        );

        self.reconcile(request, records).await
    }

    /// Insert `params`, or update the row sharing its natural key
    pub(crate) async fn upsert_by_natural_key(
        &self,
        params: CreateMealParams,
    ) -> Result<(Meal, Upsert), StoreError> {
        let key = NaturalKeyParams {
            cafeteria_type: params.cafeteria_type,
            meal_type: params.meal_type,
            name: params.name.clone(),
            day_start: params.date,
            day_end: params.date + chrono::Duration::days(1),
        };

        match self.store.find_by_natural_key(&key).await? {
            Some(existing) => {
                let update = UpdateMealParams {
                    cafeteria_type: Some(params.cafeteria_type),
                    meal_type: Some(params.meal_type),
                    name: Some(params.name),
                    menu: Some(params.menu),
                    date: Some(params.date),
                };
                let meal = self.store.update(&existing.id, &update).await?;
                Ok((meal, Upsert::Updated))
            }
            None => {
                let meal = self.store.create(&params).await?;
                Ok((meal, Upsert::Inserted))
            }
        }
    }

    pub(crate) fn invalidate_queries(&self) {
        self.cache.clear_by_prefix(QUERY_PREFIX);
    }
}
