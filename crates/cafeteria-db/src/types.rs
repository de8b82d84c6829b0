use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;

/// Cafeteria a meal is served at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, TS)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "cafeteria_type", rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum CafeteriaType {
    Haksik,
    Dodam,
    Faculty,
    Dormitory,
}

impl CafeteriaType {
    pub const ALL: [CafeteriaType; 4] = [
        CafeteriaType::Haksik,
        CafeteriaType::Dodam,
        CafeteriaType::Faculty,
        CafeteriaType::Dormitory,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CafeteriaType::Haksik => "haksik",
            CafeteriaType::Dodam => "dodam",
            CafeteriaType::Faculty => "faculty",
            CafeteriaType::Dormitory => "dormitory",
        }
    }
}

impl fmt::Display for CafeteriaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CafeteriaType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

/// Meal slot within a day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, TS)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "meal_type", rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealType {
    pub const ALL: [MealType; 3] = [MealType::Breakfast, MealType::Lunch, MealType::Dinner];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

/// Returned when a string does not name a known enum variant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant(pub String);

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown variant: {}", self.0)
    }
}

impl std::error::Error for UnknownVariant {}

/// Meal row returned from SELECT queries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Meal {
    pub id: String,
    pub cafeteria_type: CafeteriaType,
    pub meal_type: MealType,
    pub name: String,
    pub menu: Vec<String>,
    /// Local midnight of the serving day
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Params for inserting a meal
#[derive(Debug, Clone, PartialEq)]
pub struct CreateMealParams {
    pub cafeteria_type: CafeteriaType,
    pub meal_type: MealType,
    pub name: String,
    pub menu: Vec<String>,
    pub date: DateTime<Utc>,
}

/// Params for a partial meal update. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateMealParams {
    pub cafeteria_type: Option<CafeteriaType>,
    pub meal_type: Option<MealType>,
    pub name: Option<String>,
    pub menu: Option<Vec<String>>,
    pub date: Option<DateTime<Utc>>,
}

/// Half-open `[date_from, date_to)` listing filter
#[derive(Debug, Clone, PartialEq)]
pub struct MealFilter {
    pub cafeteria_type: CafeteriaType,
    pub meal_type: Option<MealType>,
    pub date_from: DateTime<Utc>,
    pub date_to: DateTime<Utc>,
}

/// Natural key lookup: one meal per cafeteria, meal type, name and serving day
#[derive(Debug, Clone, PartialEq)]
pub struct NaturalKeyParams {
    pub cafeteria_type: CafeteriaType,
    pub meal_type: MealType,
    pub name: String,
    pub day_start: DateTime<Utc>,
    pub day_end: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_cafeteria_type_round_trips_through_str() {
        for cafeteria in CafeteriaType::ALL {
            assert_eq!(cafeteria.as_str().parse::<CafeteriaType>(), Ok(cafeteria));
        }
        assert_eq!(
            "cafeteria".parse::<CafeteriaType>(),
            Err(UnknownVariant("cafeteria".to_string()))
        );
    }

    #[test]
    fn test_meal_type_is_case_sensitive() {
        assert_eq!("lunch".parse::<MealType>(), Ok(MealType::Lunch));
        assert!("Lunch".parse::<MealType>().is_err());
    }

    #[test]
    fn test_meal_serializes_camel_case() {
        let at = Utc.with_ymd_and_hms(2024, 6, 2, 15, 0, 0).unwrap();
        let meal = Meal {
            id: "m1".to_string(),
            cafeteria_type: CafeteriaType::Dodam,
            meal_type: MealType::Lunch,
            name: "정식".to_string(),
            menu: vec!["반계탕".to_string()],
            date: at,
            created_at: at,
            updated_at: at,
        };

        let json = serde_json::to_value(&meal).unwrap();
        assert_eq!(json["cafeteriaType"], "dodam");
        assert_eq!(json["mealType"], "lunch");
        assert_eq!(json["menu"][0], "반계탕");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("cafeteria_type").is_none());
    }
}
