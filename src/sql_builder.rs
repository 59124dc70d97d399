//! SQL builder with parameterized query construction.
//!
//! All user-supplied values go through DuckDB's parameter binding (`?` placeholders),
//! never through string interpolation. Builder methods return `&mut Self` for chaining.
//!
//! # Example
//!
//! ```rust
//! use deckmill::SqlBuilder;
//! let (sql, params) = SqlBuilder::new("card_definitions")
//!     .where_contains_ci("name", "sol")
//!     .where_contains_ci("name", "ring")
//!     .order_by(&["length(name) ASC"])
//!     .limit(1)
//!     .build();
//! ```

/// Builds parameterized SELECT queries.
pub struct SqlBuilder {
    from_table: String,
    where_clauses: Vec<String>,
    params: Vec<String>,
    order_by_cols: Vec<String>,
    limit_val: Option<usize>,
}

impl SqlBuilder {
    /// Create a builder targeting the given table.
    pub fn new(table: &str) -> Self {
        Self {
            from_table: table.to_string(),
            where_clauses: Vec::new(),
            params: Vec::new(),
            order_by_cols: Vec::new(),
            limit_val: None,
        }
    }

    /// Add an equality condition: `{column} = ?`.
    pub fn where_eq(&mut self, column: &str, value: &str) -> &mut Self {
        self.where_clauses.push(format!("{} = ?", column));
        self.params.push(value.to_string());
        self
    }

    /// Add a case-insensitive equality condition.
    ///
    /// Generates: `lower({column}) = lower(?)`
    pub fn where_eq_ci(&mut self, column: &str, value: &str) -> &mut Self {
        self.where_clauses
            .push(format!("lower({}) = lower(?)", column));
        self.params.push(value.to_string());
        self
    }

    /// Add a case-insensitive substring condition.
    ///
    /// Generates: `contains(lower({column}), lower(?))`. Unlike LIKE, `%` and
    /// `_` in the value match literally.
    pub fn where_contains_ci(&mut self, column: &str, value: &str) -> &mut Self {
        self.where_clauses
            .push(format!("contains(lower({}), lower(?))", column));
        self.params.push(value.to_string());
        self
    }

    /// Add ORDER BY clauses (e.g. `"name ASC"`, `"last_updated DESC"`).
    pub fn order_by(&mut self, clauses: &[&str]) -> &mut Self {
        self.order_by_cols
            .extend(clauses.iter().map(|c| c.to_string()));
        self
    }

    /// Set the maximum number of rows to return.
    pub fn limit(&mut self, n: usize) -> &mut Self {
        self.limit_val = Some(n);
        self
    }

    /// Build the final SQL string and parameter list.
    pub fn build(&self) -> (String, Vec<String>) {
        let mut parts = vec!["SELECT *".to_string(), format!("FROM {}", self.from_table)];

        if !self.where_clauses.is_empty() {
            parts.push(format!("WHERE {}", self.where_clauses.join(" AND ")));
        }

        if !self.order_by_cols.is_empty() {
            parts.push(format!("ORDER BY {}", self.order_by_cols.join(", ")));
        }

        if let Some(n) = self.limit_val {
            parts.push(format!("LIMIT {}", n));
        }

        (parts.join("\n"), self.params.clone())
    }
}
