//! Freshness evaluation for stored card definitions.
//!
//! A definition is fresh when it has a price, a non-empty mana cost, and was
//! refreshed no longer than the freshness window ago. Missing fields are
//! checked before age so incomplete rows always get refetched.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::models::CardDefinition;

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// Source of "now" for freshness checks and upsert timestamps.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct FixedClock {
    now: Cell<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now: Cell::new(now) }
    }

    pub fn advance(&self, by: chrono::Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for Rc<C> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

// ---------------------------------------------------------------------------
// Freshness
// ---------------------------------------------------------------------------

/// Verdict on a stored definition. Anything but `Fresh` triggers a refetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Fresh,
    MissingPrice,
    MissingManaCost,
    Expired { age: chrono::Duration },
}

impl Freshness {
    pub fn is_fresh(&self) -> bool {
        matches!(self, Freshness::Fresh)
    }
}

impl fmt::Display for Freshness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Freshness::Fresh => f.write_str("fresh"),
            Freshness::MissingPrice => f.write_str("price missing"),
            Freshness::MissingManaCost => f.write_str("mana cost missing"),
            Freshness::Expired { age } => write!(f, "expired ({} minutes old)", age.num_minutes()),
        }
    }
}

/// Judge a stored definition against `now`.
///
/// `age > window` is expired; an age of exactly `window` is still fresh.
/// Timestamps in the future count as age zero.
pub fn evaluate(card: &CardDefinition, now: DateTime<Utc>, window: chrono::Duration) -> Freshness {
    if card.price.is_none() {
        return Freshness::MissingPrice;
    }
    if card.mana_cost.as_deref().map_or(true, str::is_empty) {
        return Freshness::MissingManaCost;
    }
    let age = now.signed_duration_since(card.last_updated);
    if age > window {
        return Freshness::Expired { age };
    }
    Freshness::Fresh
}

pub fn is_fresh(card: &CardDefinition, now: DateTime<Utc>, window: chrono::Duration) -> bool {
    evaluate(card, now, window).is_fresh()
}

// ---------------------------------------------------------------------------
// Timestamp normalization
// ---------------------------------------------------------------------------

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a stored timestamp into UTC.
///
/// Values with an offset are converted directly. Naive values are taken as
/// server-local time. Returns `None` when nothing matches.
pub fn normalize_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    // DuckDB renders TIMESTAMPTZ as "2024-01-01 10:00:00+00"
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%#z") {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS.iter().find_map(|fmt| {
        let naive = NaiveDateTime::parse_from_str(raw, fmt).ok()?;
        // A nonexistent local time (DST gap) has no mapping; ambiguous ones take the earlier
        Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|local| local.with_timezone(&Utc))
    })
}

/// Render a timestamp the way the store writes it.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}
