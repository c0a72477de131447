//! Clause assembly
//!
//! `SqlBuilder` collects SQL fragments in call order and joins them with a
//! single space. It never reorders or validates fragments against each
//! other; clause order is the caller's responsibility.

use crate::error::Result;
use crate::query::{Pagination, Query};
use crate::sql::filter::CompiledFilter;
use crate::sql::sort::{OrderBy, SortDirection};
use crate::types::BoundValue;

/// Ordered SQL fragment builder
///
/// Every method appends exactly one fragment and returns the builder for
/// chaining. Table names, column lists and join conditions are trusted
/// text supplied by the calling code, never user input.
///
/// # Example
/// ```
/// use query_assembler::SqlBuilder;
///
/// let sql = SqlBuilder::new()
///     .select(["hof.title", "a.artist as artist"])
///     .from("hall_of_fame as hof")
///     .join("artist as a", "hof.artist_id = a.id")
///     .build();
///
/// assert_eq!(
///     sql,
///     "SELECT hof.title, a.artist as artist FROM hall_of_fame as hof JOIN artist as a ON hof.artist_id = a.id"
/// );
/// ```
#[derive(Debug, Default)]
#[must_use]
pub struct SqlBuilder {
    fragments: Vec<String>,
}

impl SqlBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(mut self, fragment: String) -> Self {
        self.fragments.push(fragment);
        self
    }

    /// `SELECT f1, f2, ...`, or `SELECT *` when no fields are given
    pub fn select<I, S>(self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let fields = join(fields, |f| f.as_ref().to_string());
        if fields.is_empty() {
            self.push("SELECT *".to_string())
        } else {
            self.push(format!("SELECT {}", fields))
        }
    }

    /// `SELECT *`
    pub fn select_all(self) -> Self {
        self.push("SELECT *".to_string())
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from(self, table: &str) -> Self {
        self.push(format!("FROM {}", table))
    }

    pub fn join(self, table: &str, on: &str) -> Self {
        self.push(format!("JOIN {} ON {}", table, on))
    }

    pub fn left_join(self, table: &str, on: &str) -> Self {
        self.push(format!("LEFT JOIN {} ON {}", table, on))
    }

    /// `WHERE <predicate>`
    ///
    /// The predicate must already contain its `?` placeholders; they are
    /// not counted here. Prefer [`SqlBuilder::filtered`] for compiled
    /// filters.
    pub fn where_clause(self, predicate: &str) -> Self {
        self.push(format!("WHERE {}", predicate))
    }

    /// Append the WHERE clause of a compiled filter
    ///
    /// Nothing is appended when no filter is active.
    pub fn filtered(self, filter: &CompiledFilter) -> Self {
        match filter.where_body() {
            Some(body) => self.where_clause(&body),
            None => self,
        }
    }

    pub fn order_by(self, column: &str, direction: SortDirection) -> Self {
        self.push(format!("ORDER BY {} {}", column, direction))
    }

    /// `ORDER BY` from a whitelist-resolved target
    pub fn ordered(self, order: &OrderBy) -> Self {
        self.push(format!("ORDER BY {}", order))
    }

    pub fn group_by(self, column: &str) -> Self {
        self.push(format!("GROUP BY {}", column))
    }

    /// `LIMIT n`, interpolated as text
    pub fn limit(self, limit: u64) -> Self {
        self.push(format!("LIMIT {}", limit))
    }

    /// `OFFSET n`, interpolated as text
    pub fn offset(self, offset: u64) -> Self {
        self.push(format!("OFFSET {}", offset))
    }

    /// `LIMIT n OFFSET m` as two fragments
    pub fn paginate(self, pagination: &Pagination) -> Self {
        self.limit(pagination.limit).offset(pagination.offset)
    }

    /// `INSERT INTO table (c1, c2) VALUES (?, ?)`
    pub fn insert<I, S>(self, table: &str, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let columns: Vec<String> = columns.into_iter().map(|c| c.as_ref().to_string()).collect();
        let placeholders = vec!["?"; columns.len()].join(", ");
        self.push(format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table,
            columns.join(", "),
            placeholders
        ))
    }

    /// `UPDATE table SET c1 = ?, c2 = ?`
    pub fn update<I, S>(self, table: &str, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let assignments = join(columns, |c| format!("{} = ?", c.as_ref()));
        self.push(format!("UPDATE {} SET {}", table, assignments))
    }

    pub fn delete(self, table: &str) -> Self {
        self.push(format!("DELETE FROM {}", table))
    }

    /// Fragments appended so far, in order
    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    /// Join all fragments with a single space
    pub fn build(self) -> String {
        let sql = self.fragments.join(" ");
        tracing::debug!(fragments = self.fragments.len(), sql = %sql, "built query");
        sql
    }

    /// Build and pair the SQL with its values, checking placeholder alignment
    pub fn build_query(self, values: Vec<BoundValue>) -> Result<Query> {
        Query::checked(self.build(), values)
    }
}

fn join<I, S>(items: I, render: impl Fn(&S) -> String) -> String
where
    I: IntoIterator<Item = S>,
{
    items
        .into_iter()
        .map(|item| render(&item))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QueryError;

    // =========================================================================
    // SELECT
    // =========================================================================

    #[test]
    fn test_select_without_fields() {
        let sql = SqlBuilder::new().select(Vec::<&str>::new()).build();
        assert_eq!(sql, "SELECT *");

        let sql = SqlBuilder::new().select_all().build();
        assert_eq!(sql, "SELECT *");
    }

    #[test]
    fn test_select_preserves_field_order() {
        let sql = SqlBuilder::new()
            .select(["c", "a", "b as bee"])
            .build();

        assert_eq!(sql, "SELECT c, a, b as bee");
    }

    #[test]
    fn test_select_from() {
        let sql = SqlBuilder::new().select(["x"]).from("t").build();

        assert_eq!(sql, "SELECT x FROM t");
    }

    #[test]
    fn test_select_accepts_owned_strings() {
        let fields = vec!["id".to_string(), "artist".to_string()];
        let sql = SqlBuilder::new().select(&fields).from("artist").build();

        assert_eq!(sql, "SELECT id, artist FROM artist");
    }

    // =========================================================================
    // Joins, grouping, ordering, pagination
    // =========================================================================

    #[test]
    fn test_joins() {
        let sql = SqlBuilder::new()
            .select_all()
            .from("hall_of_fame as hof")
            .join("artist as a", "hof.artist_id = a.id")
            .left_join("label as l", "hof.label_id = l.id")
            .build();

        assert_eq!(
            sql,
            "SELECT * FROM hall_of_fame as hof JOIN artist as a ON hof.artist_id = a.id LEFT JOIN label as l ON hof.label_id = l.id"
        );
    }

    #[test]
    fn test_group_order_limit_offset() {
        let sql = SqlBuilder::new()
            .select(["a.artist", "COUNT(*) as total"])
            .from("hall_of_fame as hof")
            .join("artist as a", "hof.artist_id = a.id")
            .group_by("a.artist")
            .order_by("total", SortDirection::Desc)
            .limit(10)
            .offset(20)
            .build();

        assert_eq!(
            sql,
            "SELECT a.artist, COUNT(*) as total FROM hall_of_fame as hof JOIN artist as a ON hof.artist_id = a.id GROUP BY a.artist ORDER BY total DESC LIMIT 10 OFFSET 20"
        );
    }

    #[test]
    fn test_ordered_and_paginate() {
        let sql = SqlBuilder::new()
            .select(["title"])
            .from("hall_of_fame")
            .ordered(&OrderBy::new("title", SortDirection::Asc))
            .paginate(&Pagination {
                limit: 5,
                offset: 0,
            })
            .build();

        assert_eq!(sql, "SELECT title FROM hall_of_fame ORDER BY title ASC LIMIT 5 OFFSET 0");
    }

    #[test]
    fn test_fragments_kept_in_call_order() {
        // No reordering even when the order is not valid SQL
        let builder = SqlBuilder::new().order_by("x", SortDirection::Asc).from("t");

        assert_eq!(builder.fragments(), ["ORDER BY x ASC", "FROM t"]);
        assert_eq!(builder.build(), "ORDER BY x ASC FROM t");
    }

    #[test]
    fn test_empty_builder() {
        assert_eq!(SqlBuilder::new().build(), "");
    }

    // =========================================================================
    // WHERE
    // =========================================================================

    #[test]
    fn test_where_clause_verbatim() {
        let sql = SqlBuilder::new()
            .select_all()
            .from("inducted")
            .where_clause("year = ?")
            .build();

        assert_eq!(sql, "SELECT * FROM inducted WHERE year = ?");
    }

    #[test]
    fn test_filtered_skips_empty_filter() {
        let builder = SqlBuilder::new()
            .select_all()
            .from("t")
            .filtered(&CompiledFilter::default());

        assert_eq!(builder.fragments(), ["SELECT *", "FROM t"]);
    }

    // =========================================================================
    // INSERT / UPDATE / DELETE
    // =========================================================================

    #[test]
    fn test_insert() {
        let sql = SqlBuilder::new().insert("artist", ["id", "artist"]).build();

        assert_eq!(sql, "INSERT INTO artist (id, artist) VALUES (?, ?)");
    }

    #[test]
    fn test_update() {
        let sql = SqlBuilder::new()
            .update("artist", ["artist"])
            .where_clause("id = ?")
            .build();

        assert_eq!(sql, "UPDATE artist SET artist = ? WHERE id = ?");
    }

    #[test]
    fn test_update_multiple_columns() {
        let sql = SqlBuilder::new()
            .update("hall_of_fame", ["title", "label_id"])
            .build();

        assert_eq!(sql, "UPDATE hall_of_fame SET title = ?, label_id = ?");
    }

    #[test]
    fn test_delete() {
        let sql = SqlBuilder::new()
            .delete("label")
            .where_clause("id = ?")
            .build();

        assert_eq!(sql, "DELETE FROM label WHERE id = ?");
    }

    // =========================================================================
    // build_query
    // =========================================================================

    #[test]
    fn test_build_query_aligned() {
        let query = SqlBuilder::new()
            .insert("artist", ["id", "artist"])
            .build_query(vec![1.into(), "Queen".into()])
            .unwrap();

        assert_eq!(query.values.len(), 2);
    }

    #[test]
    fn test_build_query_misaligned() {
        let result = SqlBuilder::new()
            .insert("artist", ["id", "artist"])
            .build_query(vec![1.into()]);

        assert!(matches!(
            result,
            Err(QueryError::PlaceholderMismatch {
                placeholders: 2,
                values: 1
            })
        ));
    }
}
