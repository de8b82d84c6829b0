//! Scraped menu intake: fetching from the menu source and flattening its
//! per-meal-type groupings into reconcilable records.

use async_trait::async_trait;
use cafeteria_db::{CafeteriaType, MealType};
use menu_source_client::{DailyMenu, MenuSourceClient, MenuSourceError, SourceCafeteria};
use serde_json::Value;

use crate::types::ScrapedMeal;

#[async_trait]
pub trait MenuSource: Send + Sync {
    async fn fetch_daily_menu(
        &self,
        cafeteria: CafeteriaType,
        date: &str,
    ) -> Result<DailyMenu, MenuSourceError>;
}

fn source_cafeteria(cafeteria: CafeteriaType) -> SourceCafeteria {
    match cafeteria {
        CafeteriaType::Haksik => SourceCafeteria::Haksik,
        CafeteriaType::Dodam => SourceCafeteria::Dodam,
        CafeteriaType::Faculty => SourceCafeteria::Faculty,
        CafeteriaType::Dormitory => SourceCafeteria::Dormitory,
    }
}

#[async_trait]
impl MenuSource for MenuSourceClient {
    async fn fetch_daily_menu(
        &self,
        cafeteria: CafeteriaType,
        date: &str,
    ) -> Result<DailyMenu, MenuSourceError> {
        MenuSourceClient::fetch_daily_menu(self, source_cafeteria(cafeteria), date).await
    }
}

fn item_text(item: &Value) -> String {
    match item {
        Value::String(s) => s.trim().to_string(),
        other => other.to_string().trim().to_string(),
    }
}

/// Flatten a daily menu into one record per named menu group.
///
/// Sections that are not objects, groups with a blank name, item lists that
/// are not arrays and groups left without items are skipped.
pub fn flatten_daily_menu(cafeteria: CafeteriaType, menu: &DailyMenu) -> Vec<ScrapedMeal> {
    let sections = [
        (MealType::Breakfast, &menu.breakfast),
        (MealType::Lunch, &menu.lunch),
        (MealType::Dinner, &menu.dinner),
    ];

    let mut flattened = Vec::new();
    for (meal_type, section) in sections {
        let Value::Object(groups) = section else {
            continue;
        };

        for (name, items) in groups {
            if name.trim().is_empty() {
                continue;
            }
            let Value::Array(items) = items else {
                continue;
            };

            let items: Vec<String> = items
                .iter()
                .map(item_text)
                .filter(|item| !item.is_empty())
                .collect();
            if items.is_empty() {
                continue;
            }

            flattened.push(ScrapedMeal {
                cafeteria_type: cafeteria,
                meal_type,
                name: name.clone(),
                menu: items,
            });
        }
    }
    flattened
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn daily(breakfast: Value, lunch: Value, dinner: Value) -> DailyMenu {
        DailyMenu {
            date: "2024-06-01".to_string(),
            cafeteria: "DODAM".to_string(),
            status: Some("open".to_string()),
            breakfast,
            lunch,
            dinner,
        }
    }

    #[test]
    fn test_flatten_keeps_groups_in_section_order() {
        let menu = daily(
            json!({ "조식": ["죽", "김치"] }),
            json!({ "중식1": ["반계탕", "도토리묵 양념장"], "중식2": ["비빔밥"] }),
            json!({}),
        );

        let flat = flatten_daily_menu(CafeteriaType::Dodam, &menu);
        let keys: Vec<_> = flat.iter().map(|m| (m.meal_type, m.name.as_str())).collect();
        assert_eq!(
            keys,
            vec![
                (MealType::Breakfast, "조식"),
                (MealType::Lunch, "중식1"),
                (MealType::Lunch, "중식2"),
            ]
        );
        assert!(flat.iter().all(|m| m.cafeteria_type == CafeteriaType::Dodam));
    }

    #[test]
    fn test_flatten_follows_source_group_order() {
        let menu: DailyMenu = serde_json::from_str(
            r#"{ "lunch": { "중식2": ["비빔밥"], "중식1": ["반계탕"] }, "dinner": { "B": ["카레"], "A": ["국수"] } }"#,
        )
        .unwrap();

        let names: Vec<_> = flatten_daily_menu(CafeteriaType::Dodam, &menu)
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, vec!["중식2", "중식1", "B", "A"]);
    }

    #[test]
    fn test_flatten_skips_malformed_sections() {
        let menu = daily(
            json!("closed"),
            json!({
                "  ": ["밥"],
                "특식": "not a list",
                "빈 메뉴": [" ", ""],
                "정식": [" 제육볶음 ", 1500, "", null],
            }),
            Value::Null,
        );

        let flat = flatten_daily_menu(CafeteriaType::Haksik, &menu);
        assert_eq!(flat.len(), 1);
        assert_eq!(flat[0].name, "정식");
        assert_eq!(flat[0].menu, vec!["제육볶음", "1500", "null"]);
    }
}
