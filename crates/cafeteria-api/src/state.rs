use std::sync::Arc;

use crate::service::MealService;

/// Shared application state passed to all route handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<MealService>,
    /// HS256 secret for write tokens; writes are refused without it
    pub jwt_secret: Option<Arc<str>>,
}

impl AppState {
    pub fn new(service: MealService, jwt_secret: Option<String>) -> Self {
        Self {
            service: Arc::new(service),
            jwt_secret: jwt_secret.map(Arc::from),
        }
    }
}
