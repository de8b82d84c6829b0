//! Meal listing query parsing.
//!
//! Raw query-string parameters are validated into a [`ParsedMealQuery`]. A
//! missing date stays unresolved until [`ParsedMealQuery::resolve`] substitutes
//! today's date at read time.

use std::fmt;

use cafeteria_db::{CafeteriaType, MealFilter, MealType};

use crate::cache;
use crate::dates::{self, DateError};

const ALL_MEAL_TYPES: &str = "all";

/// Raw `GET /api/meals` parameters
#[derive(Debug, Clone, Default)]
pub struct MealQueryParams {
    pub cafeteria: Option<String>,
    pub meal_type: Option<String>,
    pub date: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl MealQueryParams {
    /// Collect decoded query-string pairs. A repeated key keeps its first
    /// value; unknown keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "cafeteria" => &mut params.cafeteria,
                "mealType" => &mut params.meal_type,
                "date" => &mut params.date,
                "startDate" => &mut params.start_date,
                "endDate" => &mut params.end_date,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        params
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryMode {
    /// One day; `None` means today at resolution time
    Single { date: Option<String> },
    /// Inclusive range, `start_date <= end_date`
    Range { start_date: String, end_date: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMealQuery {
    pub cafeteria: CafeteriaType,
    pub meal_type: Option<MealType>,
    pub mode: QueryMode,
}

/// A query pinned to concrete dates
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedQuery {
    pub filter: MealFilter,
    pub cache_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryError {
    pub message: String,
}

impl QueryError {
    fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }

    pub fn code(&self) -> &'static str {
        "INVALID_QUERY"
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for QueryError {}

/// Trim and treat blank values as absent
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Validate raw parameters into a canonical query
pub fn parse_meal_query(params: &MealQueryParams) -> Result<ParsedMealQuery, QueryError> {
    let cafeteria = present(&params.cafeteria).ok_or_else(|| {
        QueryError::new("`cafeteria` is required. (haksik | dodam | faculty | dormitory)")
    })?;
    let cafeteria: CafeteriaType = cafeteria.parse().map_err(|_| {
        QueryError::new("`cafeteria` must be one of haksik, dodam, faculty, dormitory.")
    })?;

    let meal_type = present(&params.meal_type)
        .map(|m| m.parse::<MealType>())
        .transpose()
        .map_err(|_| QueryError::new("`mealType` must be one of breakfast, lunch, dinner."))?;

    let date = present(&params.date);
    let start_date = present(&params.start_date);
    let end_date = present(&params.end_date);

    if date.is_some() && (start_date.is_some() || end_date.is_some()) {
        return Err(QueryError::new(
            "`date` and `startDate`/`endDate` cannot be used together.",
        ));
    }

    if start_date.is_some() || end_date.is_some() {
        let (Some(start_date), Some(end_date)) = (start_date, end_date) else {
            return Err(QueryError::new(
                "`startDate` and `endDate` must both be provided together.",
            ));
        };
        if !dates::is_valid_calendar_date(start_date) || !dates::is_valid_calendar_date(end_date) {
            return Err(QueryError::new(
                "`startDate` and `endDate` must be in YYYY-MM-DD format.",
            ));
        }
        // Zero-padded ISO dates order lexicographically
        if start_date > end_date {
            return Err(QueryError::new(
                "`startDate` must be earlier than or equal to `endDate`.",
            ));
        }

        return Ok(ParsedMealQuery {
            cafeteria,
            meal_type,
            mode: QueryMode::Range {
                start_date: start_date.to_string(),
                end_date: end_date.to_string(),
            },
        });
    }

    if let Some(date) = date {
        if !dates::is_valid_calendar_date(date) {
            return Err(QueryError::new("`date` must be in YYYY-MM-DD format."));
        }
    }

    Ok(ParsedMealQuery {
        cafeteria,
        meal_type,
        mode: QueryMode::Single {
            date: date.map(str::to_string),
        },
    })
}

impl ParsedMealQuery {
    /// First and last calendar day covered, substituting `today` when no date was given
    pub fn date_bounds<'a>(&'a self, today: &'a str) -> (&'a str, &'a str) {
        match &self.mode {
            QueryMode::Single { date } => {
                let day = date.as_deref().unwrap_or(today);
                (day, day)
            }
            QueryMode::Range {
                start_date,
                end_date,
            } => (start_date.as_str(), end_date.as_str()),
        }
    }

    /// Pin the query to concrete dates, producing the store filter and cache key
    pub fn resolve(&self, today: &str) -> Result<ResolvedQuery, DateError> {
        let (from, to) = self.date_bounds(today);
        let (date_from, date_to) = dates::range_boundary(from, to)?;

        let cache_key = cache::build_key(&[
            "query",
            self.cafeteria.as_str(),
            self.meal_type.map_or(ALL_MEAL_TYPES, |m| m.as_str()),
            from,
            to,
        ]);

        Ok(ResolvedQuery {
            filter: MealFilter {
                cafeteria_type: self.cafeteria,
                meal_type: self.meal_type,
                date_from,
                date_to,
            },
            cache_key,
        })
    }
}
