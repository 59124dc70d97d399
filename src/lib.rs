//! DeckMill: card collections and decks over a freshness-aware card cache.
//!
//! Card definitions are fetched lazily from Scryfall, stored in DuckDB keyed
//! by Scryfall id, and refetched once they are incomplete or older than the
//! freshness window. Collections and decks are quantity ledgers of those ids.
//!
//! # Quick start
//!
//! ```no_run
//! use deckmill::Deckmill;
//!
//! let dm = Deckmill::builder().database("cards.duckdb").build().unwrap();
//!
//! // Resolve a typed name (local cache first, Scryfall when stale or unknown)
//! let card = dm.resolve("Sol Ring").unwrap();
//!
//! // Put four copies in a new deck
//! let containers = dm.containers();
//! let mut deck = containers.create_deck("alice", "Mono Green", None, Some("Commander")).unwrap();
//! containers.add(&mut deck, "Llanowar Elves", 4).unwrap();
//! ```

pub mod config;
pub mod connection;
pub mod containers;
pub mod error;
pub mod fetch;
pub mod freshness;
pub mod mana;
pub mod models;
pub mod observe;
pub mod provider;
pub mod resolver;
pub mod sql_builder;
pub mod store;

pub use config::ResolverConfig;
pub use connection::Connection;
pub use containers::ContainerBridge;
pub use error::{DeckmillError, Result};
pub use freshness::{Clock, FixedClock, Freshness, SystemClock};
pub use models::{CardDefinition, Container, ContainerEntry, ContainerKind};
pub use observe::{LogObserver, RecordingObserver, ResolveEvent, ResolveObserver};
pub use provider::{CardProvider, ScryfallClient};
pub use resolver::{MatchKind, Resolution, Resolver};
pub use sql_builder::SqlBuilder;
pub use store::CardStore;

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ---------------------------------------------------------------------------
// DeckmillBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`Deckmill`] instance.
///
/// Every setting that used to be a process-wide default (endpoint, user
/// agent, timeout, freshness window) lives here so tests can override it.
pub struct DeckmillBuilder {
    database: Option<PathBuf>,
    config: ResolverConfig,
    provider: Option<Box<dyn CardProvider>>,
    clock: Option<Box<dyn Clock>>,
    observer: Option<Box<dyn ResolveObserver>>,
}

impl Default for DeckmillBuilder {
    fn default() -> Self {
        Self {
            database: None,
            config: ResolverConfig::default(),
            provider: None,
            clock: None,
            observer: None,
        }
    }
}

impl DeckmillBuilder {
    /// Store data in a DuckDB file. Without this, an in-memory database is used.
    pub fn database<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.database = Some(path.as_ref().to_path_buf());
        self
    }

    /// Named-card endpoint of the provider.
    ///
    /// Defaults to [`config::SCRYFALL_NAMED_URL`].
    pub fn api_url(mut self, url: &str) -> Self {
        self.config.api_url = url.to_string();
        self
    }

    /// `User-Agent` sent with every provider request.
    pub fn user_agent(mut self, user_agent: &str) -> Self {
        self.config.user_agent = user_agent.to_string();
        self
    }

    /// Provider request timeout. Defaults to 5 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// How old a complete definition may get before it is refetched.
    ///
    /// Defaults to 24 hours.
    pub fn freshness_window(mut self, window: chrono::Duration) -> Self {
        self.config.freshness_window = window;
        self
    }

    /// Which entry of the provider's `prices` object to store. Defaults to `eur`.
    pub fn currency(mut self, currency: &str) -> Self {
        self.config.currency = currency.to_string();
        self
    }

    /// Replace the Scryfall client with another provider.
    pub fn provider(mut self, provider: Box<dyn CardProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Replace the system clock.
    pub fn clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Receive resolution events. Defaults to [`LogObserver`].
    pub fn observer(mut self, observer: Box<dyn ResolveObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Open the database and build the provider client.
    pub fn build(self) -> Result<Deckmill> {
        if self.config.freshness_window < chrono::Duration::zero() {
            return Err(DeckmillError::InvalidArgument(
                "Freshness window must not be negative".into(),
            ));
        }
        let conn = match &self.database {
            Some(path) => Connection::open(path)?,
            None => Connection::open_in_memory()?,
        };
        let provider = match self.provider {
            Some(p) => p,
            None => Box::new(ScryfallClient::from_config(&self.config)?),
        };
        Ok(Deckmill {
            conn,
            database: self.database,
            config: self.config,
            provider,
            clock: self.clock.unwrap_or_else(|| Box::new(SystemClock)),
            observer: self.observer.unwrap_or_else(|| Box::new(LogObserver)),
        })
    }
}

// ---------------------------------------------------------------------------
// Deckmill
// ---------------------------------------------------------------------------

/// The main entry point.
///
/// Owns the DuckDB [`Connection`], the provider and the injected clock and
/// observer, and hands out lightweight borrowing interfaces over them.
pub struct Deckmill {
    conn: Connection,
    database: Option<PathBuf>,
    config: ResolverConfig,
    provider: Box<dyn CardProvider>,
    clock: Box<dyn Clock>,
    observer: Box<dyn ResolveObserver>,
}

impl Deckmill {
    /// Create a new builder.
    pub fn builder() -> DeckmillBuilder {
        DeckmillBuilder::default()
    }

    /// Direct access to stored card definitions (no freshness logic).
    pub fn cards(&self) -> CardStore<'_> {
        CardStore::new(&self.conn)
    }

    /// The resolution pipeline.
    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(
            self.cards(),
            self.provider.as_ref(),
            self.clock.as_ref(),
            self.observer.as_ref(),
            &self.config,
        )
    }

    /// Collections, decks, and the add/remove bridge.
    pub fn containers(&self) -> ContainerBridge<'_> {
        ContainerBridge::new(&self.conn, self.resolver())
    }

    /// Resolve a typed card name. See [`Resolver::resolve`].
    pub fn resolve(&self, name: &str) -> Result<Option<CardDefinition>> {
        self.resolver().resolve(name)
    }

    /// Judge a definition with this instance's clock and window.
    pub fn freshness(&self, card: &CardDefinition) -> Freshness {
        freshness::evaluate(card, self.clock.now(), self.config.freshness_window)
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Return a reference to the underlying [`Connection`] for advanced usage.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl fmt::Display for Deckmill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let db = self
            .database
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| ":memory:".to_string());
        write!(
            f,
            "Deckmill(database={}, api_url={}, freshness={}h)",
            db,
            self.config.api_url,
            self.config.freshness_window.num_hours()
        )
    }
}
