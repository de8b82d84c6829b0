//! Request and response types for the meal service

use cafeteria_db::{CafeteriaType, MealType};
use serde::Serialize;
use ts_rs::TS;

/// Validated body of `POST /api/meals`
#[derive(Debug, Clone, PartialEq)]
pub struct CreateMealPayload {
    pub cafeteria_type: CafeteriaType,
    pub meal_type: MealType,
    pub name: String,
    pub menu: Vec<String>,
    /// `YYYY-MM-DD` in KST
    pub date: String,
}

/// Validated body of `PATCH /api/meals/{id}`; at least one field is set
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateMealPayload {
    pub cafeteria_type: Option<CafeteriaType>,
    pub meal_type: Option<MealType>,
    pub name: Option<String>,
    pub menu: Option<Vec<String>>,
    pub date: Option<String>,
}

/// Which cafeteria and day a scrape batch targets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ScrapeRequest {
    pub cafeteria: CafeteriaType,
    pub date: String,
}

/// One freshly observed meal, before reconciliation
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapedMeal {
    pub cafeteria_type: CafeteriaType,
    pub meal_type: MealType,
    pub name: String,
    pub menu: Vec<String>,
}

/// Outcome of reconciling one scrape batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ScrapeResult {
    pub requested: ScrapeRequest,
    pub inserted: u32,
    pub updated: u32,
    pub skipped: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub errors: Option<Vec<String>>,
}

impl ScrapeResult {
    pub fn new(requested: ScrapeRequest) -> Self {
        Self {
            requested,
            inserted: 0,
            updated: 0,
            skipped: 0,
            errors: None,
        }
    }

    pub fn changed(&self) -> bool {
        self.inserted > 0 || self.updated > 0
    }
}
