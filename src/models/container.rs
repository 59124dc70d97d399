use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::card::CardDefinition;

// ---------------------------------------------------------------------------
// ContainerKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerKind {
    Collection,
    Deck,
}

impl ContainerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerKind::Collection => "collection",
            ContainerKind::Deck => "deck",
        }
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Container — A collection or deck: a quantity ledger of external ids
// ---------------------------------------------------------------------------

/// A collection or deck owned by one user.
///
/// `cards` never holds a zero or negative quantity; entries are removed
/// instead. It mirrors the persisted ledger as of the last load or mutation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Container {
    pub id: i64,
    pub kind: ContainerKind,
    pub name: String,
    pub owner: String,
    pub description: Option<String>,
    /// Play format; only meaningful for decks.
    pub format: Option<String>,
    pub cards: BTreeMap<String, u32>,
}

impl Container {
    pub fn quantity(&self, external_id: &str) -> u32 {
        self.cards.get(external_id).copied().unwrap_or(0)
    }

    /// Total number of cards, counting copies.
    pub fn total_cards(&self) -> u64 {
        self.cards.values().map(|&q| u64::from(q)).sum()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContainerRow {
    pub id: i64,
    pub kind: ContainerKind,
    pub name: String,
    pub owner: String,
    pub description: Option<String>,
    pub format: Option<String>,
}

impl ContainerRow {
    pub fn with_cards(self, cards: BTreeMap<String, u32>) -> Container {
        Container {
            id: self.id,
            kind: self.kind,
            name: self.name,
            owner: self.owner,
            description: self.description,
            format: self.format,
            cards,
        }
    }
}

// ---------------------------------------------------------------------------
// ContainerEntry — A ledger line joined with its card definition
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContainerEntry {
    pub card: CardDefinition,
    pub quantity: u32,
}
