//! Card definition store backed by the `card_definitions` table.

use chrono::{DateTime, Utc};

use crate::connection::Connection;
use crate::error::Result;
use crate::freshness::format_timestamp;
use crate::models::{CardDefinition, CardRow, CardUpdate};
use crate::sql_builder::SqlBuilder;

const TABLE: &str = "card_definitions";

const UPSERT_SQL: &str = "INSERT INTO card_definitions
    (external_id, name, image_front, image_back, mana_cost, type_line, price, last_updated)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?)
    ON CONFLICT (external_id) DO UPDATE SET
        name = excluded.name,
        image_front = excluded.image_front,
        image_back = excluded.image_back,
        mana_cost = excluded.mana_cost,
        type_line = excluded.type_line,
        price = excluded.price,
        last_updated = excluded.last_updated";

/// Lookup and upsert interface over stored card definitions.
pub struct CardStore<'a> {
    conn: &'a Connection,
}

impl<'a> CardStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Retrieve a definition by its external identifier.
    pub fn get(&self, external_id: &str) -> Result<Option<CardDefinition>> {
        let (sql, params) = SqlBuilder::new(TABLE)
            .where_eq("external_id", external_id)
            .limit(1)
            .build();
        self.first(&sql, &params)
    }

    /// Find a definition whose name equals `name`, ignoring case.
    ///
    /// When several printings share the name, the most recently refreshed wins.
    pub fn find_exact(&self, name: &str) -> Result<Option<CardDefinition>> {
        let (sql, params) = SqlBuilder::new(TABLE)
            .where_eq_ci("name", name)
            .order_by(&["last_updated DESC", "external_id ASC"])
            .limit(1)
            .build();
        self.first(&sql, &params)
    }

    /// Find a definition whose name contains every token, ignoring case and order.
    ///
    /// The shortest matching name wins. Returns `None` for an empty token list.
    pub fn find_by_tokens(&self, tokens: &[&str]) -> Result<Option<CardDefinition>> {
        if tokens.is_empty() {
            return Ok(None);
        }
        let mut qb = SqlBuilder::new(TABLE);
        for token in tokens {
            qb.where_contains_ci("name", token);
        }
        let (sql, params) = qb
            .order_by(&["length(name) ASC", "name ASC", "external_id ASC"])
            .limit(1)
            .build();
        self.first(&sql, &params)
    }

    /// Create or overwrite the row for `update.external_id`, stamping it with `now`.
    ///
    /// Concurrent upserts of the same identifier resolve last-writer-wins.
    pub fn upsert(&self, update: &CardUpdate, now: DateTime<Utc>) -> Result<CardDefinition> {
        let stamp = format_timestamp(now);
        self.conn.execute_write(
            UPSERT_SQL,
            &[
                &update.external_id,
                &update.name,
                &update.image_front,
                &update.image_back,
                &update.mana_cost,
                &update.type_line,
                &update.price,
                &stamp,
            ],
        )?;
        log::debug!("Upserted {} ({})", update.name, update.external_id);
        Ok(update.clone().into_definition(now))
    }

    /// Number of stored definitions.
    pub fn count(&self) -> Result<usize> {
        let value = self
            .conn
            .execute_scalar("SELECT COUNT(*) FROM card_definitions", &[])?;
        Ok(value.and_then(|v| v.as_u64()).unwrap_or(0) as usize)
    }

    fn first(&self, sql: &str, params: &[String]) -> Result<Option<CardDefinition>> {
        let rows: Vec<CardRow> = self.conn.execute_into(sql, params)?;
        Ok(rows.into_iter().next().map(CardDefinition::from))
    }
}
