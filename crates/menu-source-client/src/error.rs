use std::fmt;

/// Errors from the menu source client
#[derive(Debug)]
pub enum MenuSourceError {
    MissingApiKey(&'static str),
    Http(reqwest::Error),
    ApiError(String),
    Decode(String),
}

impl fmt::Display for MenuSourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingApiKey(parser) => {
                write!(f, "GPT_API_KEY is required for {parser} parser.")
            }
            Self::Http(e) => write!(f, "HTTP error: {e}"),
            Self::ApiError(msg) => write!(f, "API error: {msg}"),
            Self::Decode(msg) => write!(f, "Decode error: {msg}"),
        }
    }
}

impl std::error::Error for MenuSourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for MenuSourceError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err)
    }
}

pub type Result<T> = std::result::Result<T, MenuSourceError>;
