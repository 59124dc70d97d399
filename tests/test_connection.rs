//! Connection integration tests: schema, raw SQL execution and transactions.

use deckmill::{Connection, DeckmillError};

fn seeded() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_write(
        "INSERT INTO card_definitions (external_id, name, mana_cost, price, last_updated)
         VALUES ('uuid-1', 'Sol Ring', '{1}', 1.5, '2025-06-01T12:00:00.000000Z'),
                ('uuid-2', 'Mox Pearl', '{0}', NULL, '2025-06-01T12:00:00.000000Z')",
        &[],
    )
    .unwrap();
    conn
}

// ---------------------------------------------------------------------------
// execute
// ---------------------------------------------------------------------------

#[test]
fn execute_returns_rows_as_maps() {
    let conn = seeded();

    let rows = conn
        .execute("SELECT * FROM card_definitions ORDER BY external_id", &[])
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["name"], "Sol Ring");
    assert_eq!(rows[0]["price"], 1.5);
    assert!(rows[1]["price"].is_null());
}

#[test]
fn execute_with_params() {
    let conn = seeded();

    let rows = conn
        .execute(
            "SELECT * FROM card_definitions WHERE external_id = ?",
            &["uuid-2".to_string()],
        )
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], "Mox Pearl");
}

#[test]
fn execute_returns_empty_for_no_matches() {
    let conn = seeded();

    let rows = conn
        .execute(
            "SELECT * FROM card_definitions WHERE external_id = ?",
            &["nonexistent".to_string()],
        )
        .unwrap();
    assert!(rows.is_empty());
}

// ---------------------------------------------------------------------------
// execute_scalar / execute_write
// ---------------------------------------------------------------------------

#[test]
fn execute_scalar_returns_single_value() {
    let conn = seeded();

    let count = conn
        .execute_scalar("SELECT COUNT(*) FROM card_definitions", &[])
        .unwrap();
    assert_eq!(count.unwrap().as_i64().unwrap(), 2);
}

#[test]
fn execute_scalar_returns_none_for_empty_result() {
    let conn = seeded();

    let result = conn
        .execute_scalar(
            "SELECT name FROM card_definitions WHERE external_id = ?",
            &[&"nonexistent"],
        )
        .unwrap();
    assert!(result.is_none());
}

#[test]
fn execute_write_reports_affected_rows() {
    let conn = seeded();

    let n = conn
        .execute_write("UPDATE card_definitions SET price = ? WHERE price IS NULL", &[&2.0_f64])
        .unwrap();
    assert_eq!(n, 1);
}

#[test]
fn container_ids_come_from_sequence() {
    let conn = Connection::open_in_memory().unwrap();

    let insert = "INSERT INTO containers (kind, name, owner) VALUES ('deck', ?, 'alice') RETURNING id";
    let a = conn.execute_scalar(insert, &[&"One"]).unwrap().unwrap();
    let b = conn.execute_scalar(insert, &[&"Two"]).unwrap().unwrap();

    assert!(b.as_i64().unwrap() > a.as_i64().unwrap());
}

// ---------------------------------------------------------------------------
// transaction
// ---------------------------------------------------------------------------

#[test]
fn transaction_commits_on_ok() {
    let conn = seeded();

    conn.transaction(|c| {
        c.execute_write("DELETE FROM card_definitions WHERE external_id = ?", &[&"uuid-1"])
    })
    .unwrap();

    let count = conn
        .execute_scalar("SELECT COUNT(*) FROM card_definitions", &[])
        .unwrap();
    assert_eq!(count.unwrap().as_i64().unwrap(), 1);
}

#[test]
fn transaction_rolls_back_on_err() {
    let conn = seeded();

    let result: deckmill::Result<()> = conn.transaction(|c| {
        c.execute_write("DELETE FROM card_definitions", &[])?;
        Err(DeckmillError::InvalidArgument("abort".into()))
    });

    assert!(matches!(result, Err(DeckmillError::InvalidArgument(_))));
    let count = conn
        .execute_scalar("SELECT COUNT(*) FROM card_definitions", &[])
        .unwrap();
    assert_eq!(count.unwrap().as_i64().unwrap(), 2);
}

#[test]
fn schema_creation_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cards.duckdb");

    drop(Connection::open(&path).unwrap());
    let conn = Connection::open(&path).unwrap();

    let count = conn
        .execute_scalar("SELECT COUNT(*) FROM containers", &[])
        .unwrap();
    assert_eq!(count.unwrap().as_i64().unwrap(), 0);
}
