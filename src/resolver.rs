//! Resolution pipeline: turn a user-typed card name into a stored definition.
//!
//! Order of attempts:
//! 1. Exact, case-insensitive name match. Fresh hits return immediately.
//! 2. Multi-word input only: a name containing every word. Fresh hits return.
//!    A single word never trusts substring matches; it goes to the provider.
//! 3. Provider fetch + upsert. If the provider has nothing or cannot be
//!    reached, a stale local match from step 1 or 2 is returned instead.

use std::fmt;

use crate::config::ResolverConfig;
use crate::error::Result;
use crate::fetch::fetch_and_upsert;
use crate::freshness::{evaluate, Clock, Freshness};
use crate::models::CardDefinition;
use crate::observe::{ResolveEvent, ResolveObserver};
use crate::provider::CardProvider;
use crate::store::CardStore;

/// How a stored definition matched the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Exact,
    Fuzzy,
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchKind::Exact => f.write_str("exact"),
            MatchKind::Fuzzy => f.write_str("fuzzy"),
        }
    }
}

/// Outcome of resolving one name.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Fresh local definition; the provider was not called.
    Local { card: CardDefinition, kind: MatchKind },
    /// Fetched from the provider and upserted.
    Fetched(CardDefinition),
    /// The provider failed; this is the stale local definition, unchanged.
    Stale(CardDefinition),
    NotFound,
}

impl Resolution {
    pub fn into_card(self) -> Option<CardDefinition> {
        match self {
            Resolution::Local { card, .. } | Resolution::Fetched(card) | Resolution::Stale(card) => {
                Some(card)
            }
            Resolution::NotFound => None,
        }
    }
}

/// Resolves card names against the store, falling back to the provider.
pub struct Resolver<'a> {
    store: CardStore<'a>,
    provider: &'a dyn CardProvider,
    clock: &'a dyn Clock,
    observer: &'a dyn ResolveObserver,
    config: &'a ResolverConfig,
}

impl<'a> Resolver<'a> {
    pub fn new(
        store: CardStore<'a>,
        provider: &'a dyn CardProvider,
        clock: &'a dyn Clock,
        observer: &'a dyn ResolveObserver,
        config: &'a ResolverConfig,
    ) -> Self {
        Self {
            store,
            provider,
            clock,
            observer,
            config,
        }
    }

    /// Resolve `raw_name` to a definition, or `None` if nothing matches.
    ///
    /// Only store failures are returned as errors; provider trouble degrades
    /// to stale data or `None`.
    pub fn resolve(&self, raw_name: &str) -> Result<Option<CardDefinition>> {
        Ok(self.resolve_detailed(raw_name)?.into_card())
    }

    /// Like [`resolve`](Self::resolve), but reports where the definition came from.
    pub fn resolve_detailed(&self, raw_name: &str) -> Result<Resolution> {
        let input = raw_name.trim();
        if input.is_empty() {
            self.emit(ResolveEvent::EmptyInput);
            return Ok(Resolution::NotFound);
        }

        let now = self.clock.now();
        let window = self.config.freshness_window;

        let local = match self.store.find_exact(input)? {
            Some(card) => Some((card, MatchKind::Exact)),
            None => {
                let tokens: Vec<&str> = input.split_whitespace().collect();
                if tokens.len() > 1 {
                    self.store
                        .find_by_tokens(&tokens)?
                        .map(|card| (card, MatchKind::Fuzzy))
                } else {
                    self.emit(ResolveEvent::FuzzySkipped {
                        input: input.to_string(),
                    });
                    None
                }
            }
        };

        let stale = match local {
            Some((card, kind)) => match evaluate(&card, now, window) {
                Freshness::Fresh => {
                    self.emit(ResolveEvent::LocalHit {
                        input: input.to_string(),
                        name: card.name.clone(),
                        kind,
                    });
                    return Ok(Resolution::Local { card, kind });
                }
                reason => {
                    self.emit(ResolveEvent::NeedsRefresh {
                        input: input.to_string(),
                        name: card.name.clone(),
                        kind,
                        reason,
                    });
                    Some(card)
                }
            },
            None => None,
        };

        self.emit(ResolveEvent::FetchStarted {
            input: input.to_string(),
        });
        match fetch_and_upsert(
            self.provider,
            &self.store,
            self.clock,
            &self.config.currency,
            input,
        ) {
            Ok(Some(card)) => {
                self.emit(ResolveEvent::Fetched {
                    input: input.to_string(),
                    external_id: card.external_id.clone(),
                    name: card.name.clone(),
                    mana_cost: card.mana_cost.clone(),
                });
                return Ok(Resolution::Fetched(card));
            }
            Ok(None) => self.emit(ResolveEvent::ProviderNotFound {
                input: input.to_string(),
            }),
            Err(e) if e.is_provider_unavailable() => {
                self.emit(ResolveEvent::ProviderUnavailable {
                    input: input.to_string(),
                    error: e.to_string(),
                })
            }
            Err(e) => return Err(e),
        }

        match stale {
            Some(card) => {
                self.emit(ResolveEvent::StaleFallback {
                    input: input.to_string(),
                    name: card.name.clone(),
                });
                Ok(Resolution::Stale(card))
            }
            None => {
                self.emit(ResolveEvent::Unresolved {
                    input: input.to_string(),
                });
                Ok(Resolution::NotFound)
            }
        }
    }

    fn emit(&self, event: ResolveEvent) {
        self.observer.on_event(&event);
    }
}
