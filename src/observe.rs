//! Resolution events and the observer seam they are reported through.

use std::cell::RefCell;
use std::rc::Rc;

use crate::freshness::Freshness;
use crate::resolver::MatchKind;

/// Something notable the resolver did while handling one lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolveEvent {
    /// Input was blank after trimming; nothing was looked up.
    EmptyInput,
    /// A stored definition was fresh and returned without a fetch.
    LocalHit {
        input: String,
        name: String,
        kind: MatchKind,
    },
    /// A stored definition matched but must be refreshed.
    NeedsRefresh {
        input: String,
        name: String,
        kind: MatchKind,
        reason: Freshness,
    },
    /// Single-word input; substring matching was not attempted.
    FuzzySkipped { input: String },
    FetchStarted { input: String },
    Fetched {
        input: String,
        external_id: String,
        name: String,
        mana_cost: Option<String>,
    },
    ProviderNotFound { input: String },
    ProviderUnavailable { input: String, error: String },
    /// The fetch failed and a stale local definition was returned instead.
    StaleFallback { input: String, name: String },
    Unresolved { input: String },
}

/// Receives resolution events.
pub trait ResolveObserver {
    fn on_event(&self, event: &ResolveEvent);
}

impl<O: ResolveObserver + ?Sized> ResolveObserver for Rc<O> {
    fn on_event(&self, event: &ResolveEvent) {
        (**self).on_event(event)
    }
}

/// Reports events through the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl ResolveObserver for LogObserver {
    fn on_event(&self, event: &ResolveEvent) {
        match event {
            ResolveEvent::EmptyInput => log::debug!("Empty card name; skipping lookup"),
            ResolveEvent::LocalHit { input, name, kind } => {
                log::info!("Cache hit ({}): '{}' for input '{}'", kind, name, input)
            }
            ResolveEvent::NeedsRefresh {
                input,
                name,
                kind,
                reason,
            } => log::info!(
                "Refreshing '{}' ({} match for '{}'): {}",
                name,
                kind,
                input,
                reason
            ),
            ResolveEvent::FuzzySkipped { input } => {
                log::debug!("Single-word input '{}'; not trusting substring matches", input)
            }
            ResolveEvent::FetchStarted { input } => log::debug!("Fetching '{}' from provider", input),
            ResolveEvent::Fetched {
                input,
                external_id,
                name,
                mana_cost,
            } => log::info!(
                "Saved '{}' [{}] for input '{}', mana: {}",
                name,
                external_id,
                input,
                mana_cost.as_deref().unwrap_or("-")
            ),
            ResolveEvent::ProviderNotFound { input } => {
                log::info!("Provider has no card matching '{}'", input)
            }
            ResolveEvent::ProviderUnavailable { input, error } => {
                log::warn!("Provider unavailable for '{}': {}", input, error)
            }
            ResolveEvent::StaleFallback { input, name } => {
                log::warn!("Serving stale '{}' for input '{}'", name, input)
            }
            ResolveEvent::Unresolved { input } => log::info!("Could not resolve '{}'", input),
        }
    }
}

/// Keeps every event in memory, in order.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: RefCell<Vec<ResolveEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ResolveEvent> {
        self.events.borrow().clone()
    }
}

impl ResolveObserver for RecordingObserver {
    fn on_event(&self, event: &ResolveEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}
