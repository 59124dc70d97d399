use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::freshness::normalize_timestamp;

// ---------------------------------------------------------------------------
// CardDefinition — Canonical card facts, one row per external identifier
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardDefinition {
    pub external_id: String,
    pub name: String,
    pub image_front: Option<String>,
    pub image_back: Option<String>,
    pub mana_cost: Option<String>,
    pub type_line: Option<String>,
    pub price: Option<f64>,
    pub last_updated: DateTime<Utc>,
}

impl CardDefinition {
    /// Mana symbols of every face, in order (e.g. `["2", "G", "G"]`).
    pub fn mana_symbols(&self) -> Vec<String> {
        self.mana_cost
            .as_deref()
            .map(crate::mana::symbols)
            .unwrap_or_default()
    }

    pub fn is_multi_faced(&self) -> bool {
        self.image_back.is_some()
            || self
                .type_line
                .as_deref()
                .is_some_and(|t| t.contains(crate::mana::FACE_SEPARATOR))
    }
}

// ---------------------------------------------------------------------------
// CardRow — card_definitions row as read back from DuckDB
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct CardRow {
    pub external_id: String,
    pub name: String,
    pub image_front: Option<String>,
    pub image_back: Option<String>,
    pub mana_cost: Option<String>,
    pub type_line: Option<String>,
    pub price: Option<f64>,
    pub last_updated: String,
}

impl From<CardRow> for CardDefinition {
    fn from(row: CardRow) -> Self {
        let last_updated = normalize_timestamp(&row.last_updated).unwrap_or_else(|| {
            log::warn!(
                "Unreadable last_updated {:?} on {}; treating as expired",
                row.last_updated,
                row.external_id
            );
            DateTime::<Utc>::default()
        });
        Self {
            external_id: row.external_id,
            name: row.name,
            image_front: row.image_front,
            image_back: row.image_back,
            mana_cost: row.mana_cost,
            type_line: row.type_line,
            price: row.price,
            last_updated,
        }
    }
}

// ---------------------------------------------------------------------------
// CardUpdate — Normalized provider data, ready to upsert
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CardUpdate {
    pub external_id: String,
    pub name: String,
    pub image_front: Option<String>,
    pub image_back: Option<String>,
    pub mana_cost: Option<String>,
    pub type_line: Option<String>,
    pub price: Option<f64>,
}

impl CardUpdate {
    /// Stamp the update with the time it was stored.
    pub fn into_definition(self, last_updated: DateTime<Utc>) -> CardDefinition {
        CardDefinition {
            external_id: self.external_id,
            name: self.name,
            image_front: self.image_front,
            image_back: self.image_back,
            mana_cost: self.mana_cost,
            type_line: self.type_line,
            price: self.price,
            last_updated,
        }
    }
}
