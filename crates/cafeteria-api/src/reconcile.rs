//! Natural-key reconciliation of scraped meals.
//!
//! Each record is matched against the store by (cafeteria, meal type, name,
//! day) and either updates the existing entry or inserts a new one. A failing
//! record is recorded in the result and never aborts the batch. Nothing is
//! deleted here.

use cafeteria_db::CreateMealParams;
use tracing::{info, warn};

use crate::dates;
use crate::service::{MealService, ServiceError, Upsert};
use crate::types::{ScrapeRequest, ScrapeResult, ScrapedMeal};

fn clean_menu(menu: &[String]) -> Vec<String> {
    menu.iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

impl MealService {
    /// Upsert every record of one (cafeteria, date) batch.
    ///
    /// Only an unparseable request date fails the call; store faults are
    /// collected per record into [`ScrapeResult::errors`].
    pub async fn reconcile(
        &self,
        request: ScrapeRequest,
        records: Vec<ScrapedMeal>,
    ) -> Result<ScrapeResult, ServiceError> {
        let date = dates::day_boundary(&request.date)?;
        let mut result = ScrapeResult::new(request);
        let mut errors = Vec::new();

        for record in records {
            let name = record.name.trim();
            let menu = clean_menu(&record.menu);
            if name.is_empty() || menu.is_empty() {
                result.skipped += 1;
                continue;
            }

            let params = CreateMealParams {
                cafeteria_type: record.cafeteria_type,
                meal_type: record.meal_type,
                name: name.to_string(),
                menu,
                date,
            };

            match self.upsert_by_natural_key(params).await {
                Ok((_, Upsert::Inserted)) => result.inserted += 1,
                Ok((_, Upsert::Updated)) => result.updated += 1,
                Err(e) => {
                    warn!(
                        name = %name,
                        meal_type = %record.meal_type,
                        error = %e,
                        "Failed to save scraped meal"
                    );
                    errors.push(format!("{name} ({}): {e}", record.meal_type));
                    result.skipped += 1;
                }
            }
        }

        if result.changed() {
            self.invalidate_queries();
        }
        if !errors.is_empty() {
            result.errors = Some(errors);
        }

        info!(
            cafeteria = %result.requested.cafeteria,
            date = %result.requested.date,
            inserted = result.inserted,
            updated = result.updated,
            skipped = result.skipped,
            "Reconciled scrape batch"
        );
        Ok(result)
    }
}
