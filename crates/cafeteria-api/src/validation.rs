//! JSON body validation for meal writes.
//!
//! Validators never fail fast: every field is checked and each problem is
//! reported as a `"<path>: <message>"` detail string.

use std::fmt;
use std::str::FromStr;

use cafeteria_db::{CafeteriaType, MealType};
use serde_json::{Map, Value};

use crate::dates;
use crate::types::{CreateMealPayload, ScrapeRequest, UpdateMealPayload};

const INVALID_PAYLOAD: &str = "Invalid payload.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadError {
    pub message: String,
    pub details: Vec<String>,
}

impl PayloadError {
    pub fn code(&self) -> &'static str {
        "INVALID_QUERY"
    }
}

impl fmt::Display for PayloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.details.join("; "))
    }
}

impl std::error::Error for PayloadError {}

#[derive(Default)]
struct Issues(Vec<String>);

impl Issues {
    fn push(&mut self, path: &str, message: impl fmt::Display) {
        self.0.push(format!("{path}: {message}"));
    }

    fn into_error(self) -> PayloadError {
        PayloadError {
            message: INVALID_PAYLOAD.to_string(),
            details: self.0,
        }
    }

    fn into_result<T>(self, value: T) -> Result<T, PayloadError> {
        if self.0.is_empty() {
            Ok(value)
        } else {
            Err(self.into_error())
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn as_object<'a>(body: &'a Value, issues: &mut Issues) -> Option<&'a Map<String, Value>> {
    match body {
        Value::Object(map) => Some(map),
        other => {
            issues.push("body", format!("Expected object, received {}", json_type(other)));
            None
        }
    }
}

/// Look up `key`, recording an issue when a required field is missing
fn field<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
    required: bool,
    issues: &mut Issues,
) -> Option<&'a Value> {
    let value = obj.get(key);
    if value.is_none() && required {
        issues.push(key, "Required");
    }
    value
}

fn string_value<'a>(key: &str, value: &'a Value, issues: &mut Issues) -> Option<&'a str> {
    match value {
        Value::String(s) => Some(s),
        other => {
            issues.push(key, format!("Expected string, received {}", json_type(other)));
            None
        }
    }
}

fn enum_value<T: FromStr>(
    key: &str,
    value: &Value,
    allowed: &[&str],
    issues: &mut Issues,
) -> Option<T> {
    let raw = string_value(key, value, issues)?;
    match raw.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            let expected = allowed
                .iter()
                .map(|v| format!("'{v}'"))
                .collect::<Vec<_>>()
                .join(" | ");
            issues.push(
                key,
                format!("Invalid enum value. Expected {expected}, received '{raw}'"),
            );
            None
        }
    }
}

fn cafeteria_value(key: &str, value: &Value, issues: &mut Issues) -> Option<CafeteriaType> {
    let allowed = CafeteriaType::ALL.map(|c| c.as_str());
    enum_value(key, value, &allowed, issues)
}

fn meal_type_value(key: &str, value: &Value, issues: &mut Issues) -> Option<MealType> {
    let allowed = MealType::ALL.map(|m| m.as_str());
    enum_value(key, value, &allowed, issues)
}

fn name_value(key: &str, value: &Value, issues: &mut Issues) -> Option<String> {
    let name = string_value(key, value, issues)?.trim();
    if name.is_empty() {
        issues.push(key, "name is required.");
        return None;
    }
    Some(name.to_string())
}

fn menu_value(key: &str, value: &Value, issues: &mut Issues) -> Option<Vec<String>> {
    let Value::Array(items) = value else {
        issues.push(key, format!("Expected array, received {}", json_type(value)));
        return None;
    };

    let before = issues.0.len();
    let mut menu = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let path = format!("{key}.{i}");
        if let Some(item) = string_value(&path, item, issues) {
            let item = item.trim();
            if item.is_empty() {
                issues.push(&path, "menu item is required.");
            } else {
                menu.push(item.to_string());
            }
        }
    }

    if items.is_empty() {
        issues.push(key, "menu must contain at least one item.");
    }

    (issues.0.len() == before).then_some(menu)
}

fn date_value(key: &str, value: &Value, issues: &mut Issues) -> Option<String> {
    let date = string_value(key, value, issues)?.trim();
    let shape_ok = date.len() == 10
        && date.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shape_ok {
        issues.push(key, "date must be in YYYY-MM-DD format.");
        return None;
    }
    if !dates::is_valid_calendar_date(date) {
        issues.push(key, "date must be a valid calendar date.");
        return None;
    }
    Some(date.to_string())
}

/// Validate a full meal creation body
pub fn parse_meal_create_payload(body: &Value) -> Result<CreateMealPayload, PayloadError> {
    let mut issues = Issues::default();
    let Some(obj) = as_object(body, &mut issues) else {
        return Err(issues.into_error());
    };

    let cafeteria_type = field(obj, "cafeteriaType", true, &mut issues)
        .and_then(|v| cafeteria_value("cafeteriaType", v, &mut issues));
    let meal_type = field(obj, "mealType", true, &mut issues)
        .and_then(|v| meal_type_value("mealType", v, &mut issues));
    let name = field(obj, "name", true, &mut issues).and_then(|v| name_value("name", v, &mut issues));
    let menu = field(obj, "menu", true, &mut issues).and_then(|v| menu_value("menu", v, &mut issues));
    let date = field(obj, "date", true, &mut issues).and_then(|v| date_value("date", v, &mut issues));

    let (Some(cafeteria_type), Some(meal_type), Some(name), Some(menu), Some(date)) =
        (cafeteria_type, meal_type, name, menu, date)
    else {
        return Err(issues.into_error());
    };

    issues.into_result(CreateMealPayload {
        cafeteria_type,
        meal_type,
        name,
        menu,
        date,
    })
}

/// Validate a partial meal update body
pub fn parse_meal_update_payload(body: &Value) -> Result<UpdateMealPayload, PayloadError> {
    let mut issues = Issues::default();
    let Some(obj) = as_object(body, &mut issues) else {
        return Err(issues.into_error());
    };

    let payload = UpdateMealPayload {
        cafeteria_type: field(obj, "cafeteriaType", false, &mut issues)
            .and_then(|v| cafeteria_value("cafeteriaType", v, &mut issues)),
        meal_type: field(obj, "mealType", false, &mut issues)
            .and_then(|v| meal_type_value("mealType", v, &mut issues)),
        name: field(obj, "name", false, &mut issues).and_then(|v| name_value("name", v, &mut issues)),
        menu: field(obj, "menu", false, &mut issues).and_then(|v| menu_value("menu", v, &mut issues)),
        date: field(obj, "date", false, &mut issues).and_then(|v| date_value("date", v, &mut issues)),
    };

    let any_field = ["cafeteriaType", "mealType", "name", "menu", "date"]
        .iter()
        .any(|key| obj.contains_key(*key));
    if !any_field {
        issues.push("body", "At least one field must be provided.");
    }

    issues.into_result(payload)
}

/// Validate a scrape trigger body
pub fn parse_meal_scrape_payload(body: &Value) -> Result<ScrapeRequest, PayloadError> {
    let mut issues = Issues::default();
    let Some(obj) = as_object(body, &mut issues) else {
        return Err(issues.into_error());
    };

    let cafeteria = field(obj, "cafeteria", true, &mut issues)
        .and_then(|v| cafeteria_value("cafeteria", v, &mut issues));
    let date = field(obj, "date", true, &mut issues).and_then(|v| date_value("date", v, &mut issues));

    let (Some(cafeteria), Some(date)) = (cafeteria, date) else {
        return Err(issues.into_error());
    };

    issues.into_result(ScrapeRequest { cafeteria, date })
}
