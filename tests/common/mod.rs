//! Shared test fixtures for the DeckMill integration tests.
//!
//! Provides `harness()`, which builds an in-memory `Deckmill` wired to a
//! scripted provider, a fixed clock and a recording observer, plus helpers to
//! seed card rows directly.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use deckmill::freshness::format_timestamp;
use deckmill::models::ScryfallCard;
use deckmill::{
    CardProvider, Deckmill, DeckmillError, FixedClock, RecordingObserver, ResolveEvent, Result,
};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Scripted reply for one (case-insensitive) name.
#[derive(Debug, Clone)]
pub enum Reply {
    Card(serde_json::Value),
    NotFound,
    Unavailable,
}

/// A provider that answers from a script and records every request.
///
/// Names with no script entry get `NotFound`.
#[derive(Debug, Default)]
pub struct FakeProvider {
    replies: RefCell<HashMap<String, Reply>>,
    calls: RefCell<Vec<String>>,
}

impl FakeProvider {
    pub fn reply(&self, name: &str, reply: Reply) {
        self.replies.borrow_mut().insert(name.to_lowercase(), reply);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl CardProvider for FakeProvider {
    fn fetch_named(&self, name: &str) -> Result<Option<ScryfallCard>> {
        self.calls.borrow_mut().push(name.to_string());
        let reply = self
            .replies
            .borrow()
            .get(&name.to_lowercase())
            .cloned()
            .unwrap_or(Reply::NotFound);
        match reply {
            Reply::Card(json) => Ok(Some(serde_json::from_value(json)?)),
            Reply::NotFound => Ok(None),
            Reply::Unavailable => Err(DeckmillError::HttpStatus(503)),
        }
    }
}

pub struct Harness {
    pub dm: Deckmill,
    pub provider: Rc<FakeProvider>,
    pub clock: Rc<FixedClock>,
    pub observer: Rc<RecordingObserver>,
}

impl Harness {
    pub fn events(&self) -> Vec<ResolveEvent> {
        self.observer.events()
    }

    /// Insert a row verbatim, bypassing the upsert path.
    pub fn seed(&self, card: SeedCard<'_>) {
        self.seed_raw(card, &format_timestamp(card.updated))
    }

    /// Insert a row with a hand-written `last_updated` string.
    pub fn seed_raw(&self, card: SeedCard<'_>, last_updated: &str) {
        self.dm
            .connection()
            .execute_write(
                "INSERT INTO card_definitions
                 (external_id, name, image_front, image_back, mana_cost, type_line, price, last_updated)
                 VALUES (?, ?, NULL, NULL, ?, ?, ?, ?)",
                &[
                    &card.id,
                    &card.name,
                    &card.mana_cost,
                    &card.type_line,
                    &card.price,
                    &last_updated,
                ],
            )
            .unwrap();
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SeedCard<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub mana_cost: Option<&'a str>,
    pub type_line: Option<&'a str>,
    pub price: Option<f64>,
    pub updated: DateTime<Utc>,
}

/// A complete card refreshed at `updated`.
pub fn complete<'a>(id: &'a str, name: &'a str, updated: DateTime<Utc>) -> SeedCard<'a> {
    SeedCard {
        id,
        name,
        mana_cost: Some("{1}"),
        type_line: Some("Artifact"),
        price: Some(1.5),
        updated,
    }
}

/// The instant every harness clock starts at.
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

pub fn harness() -> Harness {
    let provider = Rc::new(FakeProvider::default());
    let clock = Rc::new(FixedClock::new(t0()));
    let observer = Rc::new(RecordingObserver::new());
    let dm = Deckmill::builder()
        .provider(Box::new(provider.clone()))
        .clock(Box::new(clock.clone()))
        .observer(Box::new(observer.clone()))
        .build()
        .unwrap();
    Harness {
        dm,
        provider,
        clock,
        observer,
    }
}

/// Minimal single-faced Scryfall card object.
pub fn scryfall_card(id: &str, name: &str, mana_cost: &str, eur: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": name,
        "mana_cost": mana_cost,
        "type_line": "Artifact",
        "prices": { "eur": eur, "usd": null },
        "image_uris": { "normal": format!("https://img.example/{}.jpg", id) }
    })
}
