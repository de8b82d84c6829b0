use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Cafeteria identifiers understood by the menu source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SourceCafeteria {
    Haksik,
    Dodam,
    Faculty,
    Dormitory,
}

impl SourceCafeteria {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Haksik => "HAKSIK",
            Self::Dodam => "DODAM",
            Self::Faculty => "FACULTY",
            Self::Dormitory => "DORMITORY",
        }
    }

    /// The dormitory publishes structured menus; every other cafeteria
    /// posts free text that needs the GPT parser.
    pub fn parser(&self) -> MenuParser {
        match self {
            Self::Dormitory => MenuParser::Noop,
            _ => MenuParser::Gpt,
        }
    }
}

/// Parser the menu source applies to the scraped page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuParser {
    Gpt,
    Noop,
}

impl MenuParser {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gpt => "gpt",
            Self::Noop => "noop",
        }
    }
}

/// One day of scraped menus.
///
/// Each section maps a menu group name (e.g. `"중식1"`) to its items, but
/// the source does not guarantee that shape, so sections are kept as raw JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DailyMenu {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub cafeteria: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub breakfast: Value,
    #[serde(default)]
    pub lunch: Value,
    #[serde(default)]
    pub dinner: Value,
}
