//! Unit tests for the SqlBuilder query construction.

use deckmill::SqlBuilder;

// ---------------------------------------------------------------------------
// Basic construction
// ---------------------------------------------------------------------------

#[test]
fn new_creates_select_star_from_table() {
    let (sql, params) = SqlBuilder::new("card_definitions").build();
    assert_eq!(sql, "SELECT *\nFROM card_definitions");
    assert!(params.is_empty());
}

// ---------------------------------------------------------------------------
// WHERE conditions
// ---------------------------------------------------------------------------

#[test]
fn where_eq_adds_equality_with_param() {
    let (sql, params) = SqlBuilder::new("card_definitions")
        .where_eq("external_id", "uuid-123")
        .build();
    assert!(sql.contains("WHERE external_id = ?"));
    assert_eq!(params, vec!["uuid-123"]);
}

#[test]
fn where_eq_ci_lowers_both_sides() {
    let (sql, params) = SqlBuilder::new("card_definitions")
        .where_eq_ci("name", "Sol Ring")
        .build();
    assert!(sql.contains("lower(name) = lower(?)"));
    assert_eq!(params, vec!["Sol Ring"]);
}

#[test]
fn where_contains_ci_uses_contains_not_like() {
    let (sql, params) = SqlBuilder::new("card_definitions")
        .where_contains_ci("name", "50%")
        .build();
    assert!(sql.contains("contains(lower(name), lower(?))"));
    assert!(!sql.contains("LIKE"));
    assert_eq!(params, vec!["50%"]);
}

#[test]
fn multiple_conditions_joined_with_and() {
    let (sql, params) = SqlBuilder::new("card_definitions")
        .where_contains_ci("name", "sol")
        .where_contains_ci("name", "ring")
        .build();
    assert!(sql.contains(
        "WHERE contains(lower(name), lower(?)) AND contains(lower(name), lower(?))"
    ));
    assert_eq!(params, vec!["sol", "ring"]);
}

// ---------------------------------------------------------------------------
// ORDER BY / LIMIT
// ---------------------------------------------------------------------------

#[test]
fn order_by_and_limit_come_last() {
    let (sql, _) = SqlBuilder::new("card_definitions")
        .where_eq_ci("name", "Sol Ring")
        .order_by(&["last_updated DESC", "external_id ASC"])
        .limit(1)
        .build();
    assert!(sql.ends_with("ORDER BY last_updated DESC, external_id ASC\nLIMIT 1"));
}

#[test]
fn order_by_accumulates() {
    let (sql, _) = SqlBuilder::new("card_definitions")
        .order_by(&["length(name) ASC"])
        .order_by(&["name ASC"])
        .build();
    assert!(sql.contains("ORDER BY length(name) ASC, name ASC"));
}

#[test]
fn values_never_reach_the_sql_text() {
    let (sql, params) = SqlBuilder::new("card_definitions")
        .where_eq("name", "'; DROP TABLE card_definitions; --")
        .build();
    assert!(!sql.contains("DROP"));
    assert_eq!(params.len(), 1);
}
