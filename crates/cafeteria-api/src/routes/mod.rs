pub mod health;
pub mod meals;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// Create the HTTP router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route(
            "/api/meals",
            get(meals::list_meals).post(meals::create_meal),
        )
        .route(
            "/api/meals/{meal_id}",
            get(meals::get_meal)
                .patch(meals::update_meal)
                .delete(meals::delete_meal),
        )
        .route("/api/scrape-meals", post(meals::scrape_meals))
        .with_state(state)
}
