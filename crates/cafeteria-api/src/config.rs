use std::env;

/// Application configuration parsed from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub database_max_connections: u32,
    pub cors_origins: Vec<String>,
    pub menu_source_url: String,
    pub gpt_api_key: Option<String>,
    pub jwt_secret: Option<String>,
    pub meal_cache_ttl_secs: u64,
    pub meal_cache_max_entries: u64,
    pub public_path: Option<String>,
}

fn parsed_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn non_empty(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Parse configuration from environment variables
    pub fn from_env() -> Self {
        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgres://localhost/cafeteria".to_string());

        let cors_origins = env::var("CORS_ORIGINS")
            .map(|s| {
                s.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_else(|_| {
                vec![
                    "http://localhost:3000".to_string(),
                    "http://localhost:5173".to_string(),
                ]
            });

        let menu_source_url =
            env::var("MENU_SOURCE_URL").unwrap_or_else(|_| "http://localhost:3100".to_string());

        Self {
            port: parsed_or("PORT", 3000),
            database_url,
            database_max_connections: parsed_or("DATABASE_MAX_CONNECTIONS", 10),
            cors_origins,
            menu_source_url,
            gpt_api_key: non_empty("GPT_API_KEY"),
            jwt_secret: non_empty("JWT_SECRET"),
            meal_cache_ttl_secs: parsed_or("MEAL_CACHE_TTL_SECS", 300),
            meal_cache_max_entries: parsed_or("MEAL_CACHE_MAX_ENTRIES", 10_000),
            public_path: non_empty("PUBLIC_PATH"),
        }
    }
}
