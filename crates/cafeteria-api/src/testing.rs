//! Test doubles for the store and menu source seams.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use cafeteria_db::{
    CafeteriaType, CreateMealParams, Meal, MealFilter, MealType, NaturalKeyParams,
    UpdateMealParams,
};
use chrono::Utc;
use menu_source_client::{DailyMenu, MenuSourceError};

use crate::dates;
use crate::menu::MenuSource;
use crate::service::MealService;
use crate::store::{MealStore, StoreError};

#[derive(Debug, Default)]
pub struct CallCounts {
    pub find_by_filter: AtomicUsize,
    pub find_by_natural_key: AtomicUsize,
    pub create: AtomicUsize,
    pub update: AtomicUsize,
    pub delete: AtomicUsize,
}

/// Vec-backed store with call counters and per-name write failures
#[derive(Default)]
pub struct InMemoryMealStore {
    meals: Mutex<Vec<Meal>>,
    failing_names: Mutex<HashSet<String>>,
    next_id: AtomicUsize,
    pub calls: CallCounts,
}

impl InMemoryMealStore {
    pub fn with_meals(meals: Vec<Meal>) -> Self {
        let store = Self::default();
        store.next_id.store(meals.len(), Ordering::Relaxed);
        *store.meals.lock().unwrap() = meals;
        store
    }

    /// Make every create/update touching `name` fail
    pub fn fail_writes_for(&self, name: &str) {
        self.failing_names.lock().unwrap().insert(name.to_string());
    }

    pub fn meals(&self) -> Vec<Meal> {
        self.meals.lock().unwrap().clone()
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::Relaxed)
    }

    fn check_writable(&self, name: &str) -> Result<(), StoreError> {
        if self.failing_names.lock().unwrap().contains(name) {
            return Err(StoreError::Unavailable(format!("write rejected for {name}")));
        }
        Ok(())
    }
}

#[async_trait]
impl MealStore for InMemoryMealStore {
    async fn find_by_filter(&self, filter: &MealFilter) -> Result<Vec<Meal>, StoreError> {
        self.calls.find_by_filter.fetch_add(1, Ordering::Relaxed);
        let mut found: Vec<Meal> = self
            .meals
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.cafeteria_type == filter.cafeteria_type)
            .filter(|m| filter.meal_type.map_or(true, |t| m.meal_type == t))
            .filter(|m| m.date >= filter.date_from && m.date < filter.date_to)
            .cloned()
            .collect();
        found.sort_by_key(|m| m.date);
        Ok(found)
    }

    async fn find_by_natural_key(
        &self,
        key: &NaturalKeyParams,
    ) -> Result<Option<Meal>, StoreError> {
        self.calls.find_by_natural_key.fetch_add(1, Ordering::Relaxed);
        Ok(self
            .meals
            .lock()
            .unwrap()
            .iter()
            .find(|m| {
                m.cafeteria_type == key.cafeteria_type
                    && m.meal_type == key.meal_type
                    && m.name == key.name
                    && m.date >= key.day_start
                    && m.date < key.day_end
            })
            .cloned())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Meal>, StoreError> {
        Ok(self.meals.lock().unwrap().iter().find(|m| m.id == id).cloned())
    }

    async fn create(&self, params: &CreateMealParams) -> Result<Meal, StoreError> {
        self.calls.create.fetch_add(1, Ordering::Relaxed);
        self.check_writable(&params.name)?;

        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let now = Utc::now();
        let meal = Meal {
            id: format!("meal-{id}"),
            cafeteria_type: params.cafeteria_type,
            meal_type: params.meal_type,
            name: params.name.clone(),
            menu: params.menu.clone(),
            date: params.date,
            created_at: now,
            updated_at: now,
        };
        self.meals.lock().unwrap().push(meal.clone());
        Ok(meal)
    }

    async fn update(&self, id: &str, params: &UpdateMealParams) -> Result<Meal, StoreError> {
        self.calls.update.fetch_add(1, Ordering::Relaxed);
        if let Some(name) = &params.name {
            self.check_writable(name)?;
        }

        let mut meals = self.meals.lock().unwrap();
        let meal = meals
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(StoreError::NotFound)?;
        self.check_writable(&meal.name)?;

        if let Some(cafeteria_type) = params.cafeteria_type {
            meal.cafeteria_type = cafeteria_type;
        }
        if let Some(meal_type) = params.meal_type {
            meal.meal_type = meal_type;
        }
        if let Some(name) = &params.name {
            meal.name = name.clone();
        }
        if let Some(menu) = &params.menu {
            meal.menu = menu.clone();
        }
        if let Some(date) = params.date {
            meal.date = date;
        }
        meal.updated_at = Utc::now();
        Ok(meal.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.calls.delete.fetch_add(1, Ordering::Relaxed);
        let mut meals = self.meals.lock().unwrap();
        let before = meals.len();
        meals.retain(|m| m.id != id);
        if meals.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

/// Menu source returning a fixed response
pub struct StaticMenuSource {
    response: Result<DailyMenu, String>,
    pub calls: AtomicUsize,
}

impl StaticMenuSource {
    pub fn returning(menu: DailyMenu) -> Self {
        Self {
            response: Ok(menu),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn empty() -> Self {
        Self::returning(DailyMenu::default())
    }
}

#[async_trait]
impl MenuSource for StaticMenuSource {
    async fn fetch_daily_menu(
        &self,
        _cafeteria: CafeteriaType,
        _date: &str,
    ) -> Result<DailyMenu, MenuSourceError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.response
            .clone()
            .map_err(MenuSourceError::ApiError)
    }
}

pub fn meal(
    id: &str,
    cafeteria_type: CafeteriaType,
    meal_type: MealType,
    name: &str,
    date: &str,
    menu: &[&str],
) -> Meal {
    let now = Utc::now();
    Meal {
        id: id.to_string(),
        cafeteria_type,
        meal_type,
        name: name.to_string(),
        menu: menu.iter().map(|item| item.to_string()).collect(),
        date: dates::day_boundary(date).unwrap(),
        created_at: now,
        updated_at: now,
    }
}

pub fn service_with(store: Arc<InMemoryMealStore>, menu_source: Arc<dyn MenuSource>) -> MealService {
    MealService::new(store, menu_source, Duration::from_secs(300), 1_000)
}

pub fn service(store: Arc<InMemoryMealStore>) -> MealService {
    service_with(store, Arc::new(StaticMenuSource::empty()))
}
