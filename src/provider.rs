//! External card-data provider.
//!
//! [`ScryfallClient`] calls Scryfall's fuzzy named-card endpoint with a
//! blocking HTTP client. The [`CardProvider`] trait is the seam the resolver
//! depends on, so tests can script responses without a network.

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::StatusCode;
use std::rc::Rc;
use std::time::Duration;

use crate::config::ResolverConfig;
use crate::error::{DeckmillError, Result};
use crate::models::ScryfallCard;

/// Looks up a card by free-text name.
///
/// `Ok(None)` means the provider has no matching card. Any `Err` means the
/// provider could not be consulted.
pub trait CardProvider {
    fn fetch_named(&self, name: &str) -> Result<Option<ScryfallCard>>;
}

impl<P: CardProvider + ?Sized> CardProvider for Rc<P> {
    fn fetch_named(&self, name: &str) -> Result<Option<ScryfallCard>> {
        (**self).fetch_named(name)
    }
}

impl<P: CardProvider + ?Sized> CardProvider for Box<P> {
    fn fetch_named(&self, name: &str) -> Result<Option<ScryfallCard>> {
        (**self).fetch_named(name)
    }
}

/// Blocking Scryfall client with a bounded request timeout.
pub struct ScryfallClient {
    client: Client,
    api_url: String,
    user_agent: String,
}

impl ScryfallClient {
    /// Build a client for `api_url` (the named-card endpoint).
    pub fn new(api_url: &str, user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(Self {
            client,
            api_url: api_url.to_string(),
            user_agent: user_agent.to_string(),
        })
    }

    pub fn from_config(config: &ResolverConfig) -> Result<Self> {
        Self::new(&config.api_url, &config.user_agent, config.timeout)
    }
}

impl CardProvider for ScryfallClient {
    fn fetch_named(&self, name: &str) -> Result<Option<ScryfallCard>> {
        log::debug!("Fetching '{}' from {}", name, self.api_url);

        let resp = self
            .client
            .get(&self.api_url)
            .query(&[("fuzzy", name)])
            .header(USER_AGENT, &self.user_agent)
            .header(ACCEPT, "application/json")
            .send()?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(DeckmillError::HttpStatus(status.as_u16()));
        }

        let body = resp.text()?;
        let card: ScryfallCard = serde_json::from_str(&body)?;
        Ok(Some(card))
    }
}
