use std::time::Duration;

use tracing::debug;

use crate::error::MenuSourceError;
use crate::types::{DailyMenu, MenuParser, SourceCafeteria};

const DEFAULT_BASE_URL: &str = "http://localhost:3100";
const DEFAULT_USER_AGENT: &str = "menu-source-client-rs/0.1";

/// HTTP client for the daily menu source
pub struct MenuSourceClient {
    client: reqwest::Client,
    base_url: String,
    gpt_api_key: Option<String>,
}

impl MenuSourceClient {
    /// Create a new client with default settings
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, None)
    }

    /// Create a new client against a custom menu source URL
    pub fn with_base_url(base_url: &str, gpt_api_key: Option<String>) -> Self {
        // Menu pages go through an LLM parser upstream, which can take a while
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .user_agent(DEFAULT_USER_AGENT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            gpt_api_key: gpt_api_key.filter(|k| !k.trim().is_empty()),
        }
    }

    /// Fetch the menu of one cafeteria for a `YYYY-MM-DD` date
    pub async fn fetch_daily_menu(
        &self,
        cafeteria: SourceCafeteria,
        date: &str,
    ) -> crate::Result<DailyMenu> {
        let parser = cafeteria.parser();
        if parser == MenuParser::Gpt && self.gpt_api_key.is_none() {
            return Err(MenuSourceError::MissingApiKey(parser.as_str()));
        }

        let url = self.daily_menu_url(cafeteria, date, parser);
        debug!(cafeteria = cafeteria.as_str(), date, "Fetching daily menu");

        let mut request = self.client.get(&url).header("Accept", "application/json");
        if let Some(ref key) = self.gpt_api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(MenuSourceError::ApiError(format!(
                "menu source returned status {}",
                response.status()
            )));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| MenuSourceError::Decode(e.to_string()))
    }

    fn daily_menu_url(&self, cafeteria: SourceCafeteria, date: &str, parser: MenuParser) -> String {
        format!(
            "{}/menus/daily?cafeteria={}&date={}&parser={}",
            self.base_url,
            cafeteria.as_str(),
            urlencoding::encode(date),
            parser.as_str()
        )
    }
}

impl Default for MenuSourceClient {
    fn default() -> Self {
        Self::new()
    }
}
