//! Cafeteria API - meal catalog REST service
//!
//! Serves meal listings from PostgreSQL through a query cache and ingests
//! daily menus from the menu source service.

use std::sync::Arc;
use std::time::Duration;

use axum::http::{header, Method};
use cafeteria_api::{create_router, AppState, Config, MealService, PgMealStore};
use menu_source_client::MenuSourceClient;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tracing::{info, warn};
use tracing_subscriber::{prelude::*, EnvFilter};

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    let env_filter = EnvFilter::from_default_env().add_directive("cafeteria_api=info".parse()?);

    // Use JSON format for GCP Cloud Logging when LOG_FORMAT=json
    if std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false)
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_stackdriver::layer())
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    };

    let config = Config::from_env();
    info!(port = config.port, "Starting cafeteria-api");
    info!(
        ttl_secs = config.meal_cache_ttl_secs,
        max_entries = config.meal_cache_max_entries,
        "Meal query cache"
    );
    if config.jwt_secret.is_none() {
        warn!("JWT_SECRET is not set; write endpoints will reject every request");
    }

    // Connect to database
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await?;
    cafeteria_db::migrate::migrate(&pool).await?;

    let menu_source =
        MenuSourceClient::with_base_url(&config.menu_source_url, config.gpt_api_key.clone());
    let service = MealService::new(
        Arc::new(PgMealStore::new(pool)),
        Arc::new(menu_source),
        Duration::from_secs(config.meal_cache_ttl_secs),
        config.meal_cache_max_entries,
    );
    let state = AppState::new(service, config.jwt_secret.clone());

    let mut app = create_router(state).layer(cors_layer(&config.cors_origins));

    if let Some(public_path) = &config.public_path {
        info!(public_path = %public_path, "Serving static files");
        let static_files =
            ServeDir::new(public_path).fallback(ServeFile::new(format!("{public_path}/index.html")));
        app = app.fallback_service(static_files);
    }

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    info!(port = config.port, "Listening");

    axum::serve(listener, app).await?;
    Ok(())
}
