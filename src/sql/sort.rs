//! Whitelisted sorting
//!
//! Caller-facing sort keys never reach SQL text. They are looked up in a
//! `SortWhitelist`, and only the mapped column reference is emitted.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{QueryError, Result};
use crate::sql::sanitize::validate_column_reference;

/// Sort direction, restricted to ASC or DESC
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Parse a caller-supplied direction; anything but `desc` (any case) is ASC
    pub fn parse_lenient(direction: &str) -> Self {
        if direction.trim().eq_ignore_ascii_case("desc") {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// A resolved ORDER BY target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub direction: SortDirection,
}

impl OrderBy {
    pub fn new(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.column, self.direction)
    }
}

/// Fixed mapping from caller-facing sort keys to trusted column references
#[derive(Debug, Clone)]
pub struct SortWhitelist {
    entries: Vec<(String, String)>,
    default: OrderBy,
}

impl SortWhitelist {
    /// Create a whitelist with the ORDER BY used on a miss
    pub fn new(
        default_column: impl Into<String>,
        default_direction: SortDirection,
    ) -> Result<Self> {
        let default_column = default_column.into();
        validate_column_reference(&default_column).map_err(QueryError::validation)?;

        Ok(Self {
            entries: Vec::new(),
            default: OrderBy::new(default_column, default_direction),
        })
    }

    /// Allow `key` to sort by `column`
    ///
    /// Re-allowing an existing key replaces its column.
    pub fn allow(mut self, key: impl Into<String>, column: impl Into<String>) -> Result<Self> {
        let key = key.into();
        let column = column.into();
        validate_column_reference(&column).map_err(QueryError::validation)?;

        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = column,
            None => self.entries.push((key, column)),
        }
        Ok(self)
    }

    /// Column mapped to `key`, if whitelisted
    pub fn column(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, column)| column.as_str())
    }

    pub fn default_order(&self) -> &OrderBy {
        &self.default
    }

    /// Resolve a requested sort key and direction
    ///
    /// A whitelisted key sorts by its mapped column in the requested
    /// direction. An unknown or absent key falls back to the default column
    /// and default direction.
    pub fn resolve(&self, key: Option<&str>, direction: Option<&str>) -> OrderBy {
        match key.and_then(|k| self.column(k)) {
            Some(column) => OrderBy::new(
                column,
                direction.map(SortDirection::parse_lenient).unwrap_or_default(),
            ),
            None => {
                if let Some(requested) = key {
                    tracing::debug!(
                        requested,
                        fallback = %self.default,
                        "sort key not whitelisted, using default order"
                    );
                }
                self.default.clone()
            }
        }
    }
}
