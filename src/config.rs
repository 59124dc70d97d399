use std::path::PathBuf;
use std::time::Duration;

/// Scryfall's named-card endpoint; accepts `?fuzzy=<name>`.
pub const SCRYFALL_NAMED_URL: &str = "https://api.scryfall.com/cards/named";

/// Base URL for mana symbol icons.
pub const SYMBOL_SVG_BASE: &str = "https://svgs.scryfall.io/card-symbols";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Key read from the provider's `prices` object.
pub const DEFAULT_CURRENCY: &str = "eur";

pub const DEFAULT_FRESHNESS_HOURS: i64 = 24;

pub fn default_user_agent() -> String {
    format!("DeckMill/{}", env!("CARGO_PKG_VERSION"))
}

pub fn default_freshness_window() -> chrono::Duration {
    chrono::Duration::hours(DEFAULT_FRESHNESS_HOURS)
}

/// Provider and freshness settings shared by the resolver and the HTTP client.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    pub api_url: String,
    pub user_agent: String,
    pub timeout: Duration,
    pub currency: String,
    pub freshness_window: chrono::Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            api_url: SCRYFALL_NAMED_URL.to_string(),
            user_agent: default_user_agent(),
            timeout: DEFAULT_TIMEOUT,
            currency: DEFAULT_CURRENCY.to_string(),
            freshness_window: default_freshness_window(),
        }
    }
}

pub fn default_database_path() -> PathBuf {
    if let Some(data) = dirs::data_dir() {
        data.join("deckmill").join("deckmill.duckdb")
    } else {
        PathBuf::from(".deckmill").join("deckmill.duckdb")
    }
}
