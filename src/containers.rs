//! Collections and decks, and applying resolved cards to their ledgers.
//!
//! Every mutation is persisted before it returns. Increments are a single
//! atomic upsert; decrements run update-then-prune inside one transaction so
//! a non-positive quantity is never visible.

use serde::Deserialize;
use std::collections::BTreeMap;

use crate::connection::Connection;
use crate::error::{DeckmillError, Result};
use crate::models::{CardDefinition, CardRow, Container, ContainerEntry, ContainerKind, ContainerRow};
use crate::resolver::Resolver;
use crate::sql_builder::SqlBuilder;

const INCREMENT_SQL: &str = "INSERT INTO container_cards (container_id, external_id, quantity)
    VALUES (?, ?, ?)
    ON CONFLICT (container_id, external_id) DO UPDATE SET quantity = container_cards.quantity + excluded.quantity";

const DECREMENT_SQL: &str = "UPDATE container_cards SET quantity = quantity - ?
    WHERE container_id = ? AND external_id = ?";

const PRUNE_SQL: &str = "DELETE FROM container_cards
    WHERE container_id = ? AND external_id = ? AND quantity <= 0";

const CONTAINER_SQL: &str = "SELECT * FROM containers WHERE id = ?";

const LEDGER_SQL: &str = "SELECT external_id, quantity FROM container_cards
    WHERE container_id = ?";

const CONTENTS_SQL: &str = "SELECT d.*, cc.quantity
    FROM container_cards cc
    JOIN card_definitions d ON d.external_id = cc.external_id
    WHERE cc.container_id = ?
    ORDER BY d.name ASC, d.external_id ASC";

const QUANTITY_SQL: &str = "SELECT quantity FROM container_cards
    WHERE container_id = ? AND external_id = ?";

#[derive(Debug, Deserialize)]
struct LedgerRow {
    external_id: String,
    quantity: i64,
}

#[derive(Debug, Deserialize)]
struct EntryRow {
    #[serde(flatten)]
    card: CardRow,
    quantity: i64,
}

/// Container lifecycle plus the add/remove bridge.
pub struct ContainerBridge<'a> {
    conn: &'a Connection,
    resolver: Resolver<'a>,
}

impl<'a> ContainerBridge<'a> {
    pub fn new(conn: &'a Connection, resolver: Resolver<'a>) -> Self {
        Self { conn, resolver }
    }

    // -- Lifecycle ---------------------------------------------------------

    pub fn create_collection(
        &self,
        owner: &str,
        name: &str,
        description: Option<&str>,
    ) -> Result<Container> {
        self.create(ContainerKind::Collection, owner, name, description, None)
    }

    pub fn create_deck(
        &self,
        owner: &str,
        name: &str,
        description: Option<&str>,
        format: Option<&str>,
    ) -> Result<Container> {
        self.create(ContainerKind::Deck, owner, name, description, format)
    }

    fn create(
        &self,
        kind: ContainerKind,
        owner: &str,
        name: &str,
        description: Option<&str>,
        format: Option<&str>,
    ) -> Result<Container> {
        let id = self
            .conn
            .execute_scalar(
                "INSERT INTO containers (kind, name, owner, description, format)
                 VALUES (?, ?, ?, ?, ?) RETURNING id",
                &[&kind.as_str(), &name, &owner, &description, &format],
            )?
            .and_then(|v| v.as_i64())
            .ok_or_else(|| DeckmillError::InvalidArgument("Insert returned no id".into()))?;

        log::info!("Created {} {} '{}' for {}", kind, id, name, owner);
        Ok(Container {
            id,
            kind,
            name: name.to_string(),
            owner: owner.to_string(),
            description: description.map(str::to_string),
            format: format.map(str::to_string),
            cards: BTreeMap::new(),
        })
    }

    /// Load a container and its ledger.
    pub fn get(&self, id: i64) -> Result<Option<Container>> {
        let rows: Vec<ContainerRow> = self.conn.query_into(CONTAINER_SQL, &[&id])?;
        match rows.into_iter().next() {
            Some(row) => {
                let cards = self.ledger(row.id)?;
                Ok(Some(row.with_cards(cards)))
            }
            None => Ok(None),
        }
    }

    /// Like [`get`](Self::get), but a missing container is an error.
    pub fn require(&self, id: i64) -> Result<Container> {
        self.get(id)?
            .ok_or_else(|| DeckmillError::NotFound(format!("Container {}", id)))
    }

    /// All containers owned by `owner`, oldest first.
    pub fn list_for_owner(&self, owner: &str) -> Result<Vec<Container>> {
        let (sql, params) = SqlBuilder::new("containers")
            .where_eq("owner", owner)
            .order_by(&["id ASC"])
            .build();
        let rows: Vec<ContainerRow> = self.conn.execute_into(&sql, &params)?;
        rows.into_iter()
            .map(|row| {
                let cards = self.ledger(row.id)?;
                Ok(row.with_cards(cards))
            })
            .collect()
    }

    fn ledger(&self, container_id: i64) -> Result<BTreeMap<String, u32>> {
        let rows: Vec<LedgerRow> = self.conn.query_into(LEDGER_SQL, &[&container_id])?;
        Ok(rows
            .into_iter()
            .filter_map(|r| u32::try_from(r.quantity).ok().filter(|&q| q > 0).map(|q| (r.external_id, q)))
            .collect())
    }

    // -- Bridge ------------------------------------------------------------

    /// Resolve `name` and add `quantity` copies of it to the container.
    ///
    /// Returns the resolved definition, or `None` (with nothing changed) when
    /// the name could not be resolved.
    pub fn add(
        &self,
        container: &mut Container,
        name: &str,
        quantity: u32,
    ) -> Result<Option<CardDefinition>> {
        if quantity == 0 {
            return Err(DeckmillError::InvalidArgument(
                "Quantity to add must be positive".into(),
            ));
        }
        let Some(card) = self.resolver.resolve(name)? else {
            log::info!("Not adding '{}' to container {}: unresolved", name.trim(), container.id);
            return Ok(None);
        };

        let stored = self.conn.transaction(|conn| {
            conn.execute_write(
                INCREMENT_SQL,
                &[&container.id, &card.external_id, &i64::from(quantity)],
            )?;
            stored_quantity(conn, container.id, &card.external_id)
        })?;

        sync_entry(container, &card.external_id, stored);
        log::debug!(
            "Container {} now holds {} x {}",
            container.id,
            container.quantity(&card.external_id),
            card.name
        );
        Ok(Some(card))
    }

    /// Remove up to `quantity` copies of `external_id`.
    ///
    /// Returns `false` (a no-op) when the container holds no such card. The
    /// entry is deleted once its quantity drops to zero or below.
    pub fn remove(&self, container: &mut Container, external_id: &str, quantity: u32) -> Result<bool> {
        if quantity == 0 {
            return Err(DeckmillError::InvalidArgument(
                "Quantity to remove must be positive".into(),
            ));
        }

        let outcome = self.conn.transaction(|conn| {
            let updated = conn.execute_write(
                DECREMENT_SQL,
                &[&i64::from(quantity), &container.id, &external_id],
            )?;
            if updated == 0 {
                return Ok(None);
            }
            conn.execute_write(PRUNE_SQL, &[&container.id, &external_id])?;
            Ok(Some(stored_quantity(conn, container.id, external_id)?))
        })?;

        match outcome {
            None => {
                sync_entry(container, external_id, None);
                log::debug!("Container {} holds no {}", container.id, external_id);
                Ok(false)
            }
            Some(stored) => {
                sync_entry(container, external_id, stored);
                Ok(true)
            }
        }
    }

    /// Ledger entries joined with their definitions, ordered by card name.
    pub fn contents(&self, container: &Container) -> Result<Vec<ContainerEntry>> {
        let rows: Vec<EntryRow> = self.conn.query_into(CONTENTS_SQL, &[&container.id])?;
        Ok(rows
            .into_iter()
            .filter_map(|r| {
                let quantity = u32::try_from(r.quantity).ok().filter(|&q| q > 0)?;
                Some(ContainerEntry {
                    card: CardDefinition::from(r.card),
                    quantity,
                })
            })
            .collect())
    }
}

fn stored_quantity(conn: &Connection, container_id: i64, external_id: &str) -> Result<Option<u32>> {
    let value = conn.execute_scalar(QUANTITY_SQL, &[&container_id, &external_id])?;
    Ok(value
        .and_then(|v| v.as_i64())
        .and_then(|q| u32::try_from(q).ok())
        .filter(|&q| q > 0))
}

fn sync_entry(container: &mut Container, external_id: &str, stored: Option<u32>) {
    match stored {
        Some(q) => {
            container.cards.insert(external_id.to_string(), q);
        }
        None => {
            container.cards.remove(external_id);
        }
    }
}
