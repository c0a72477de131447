//! Query hand-off types
//!
//! Includes the finished `Query` (SQL text plus aligned values), the
//! caller-facing `SearchRequest`, and resolved `Pagination`.

use serde::{Deserialize, Serialize};
use sqlx::sqlite::{Sqlite, SqliteArguments};

use crate::config::CompilerConfig;
use crate::error::{QueryError, Result};
use crate::sql::filter::FilterValues;
use crate::types::BoundValue;

/// Finished SQL text and the values for its `?` placeholders, in order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Query {
    pub sql: String,
    pub values: Vec<BoundValue>,
}

impl Query {
    /// Pair SQL with values without checking alignment
    pub fn new(sql: impl Into<String>, values: Vec<BoundValue>) -> Self {
        Self {
            sql: sql.into(),
            values,
        }
    }

    /// Pair SQL with values, failing when the placeholder count differs
    pub fn checked(sql: impl Into<String>, values: Vec<BoundValue>) -> Result<Self> {
        let query = Self::new(sql, values);
        let placeholders = query.placeholder_count();

        if placeholders != query.values.len() {
            tracing::warn!(
                placeholders,
                values = query.values.len(),
                sql = %query.sql,
                "placeholder count does not match bound values"
            );
            return Err(QueryError::PlaceholderMismatch {
                placeholders,
                values: query.values.len(),
            });
        }
        Ok(query)
    }

    /// Number of parameters expected, ignoring quoted text and comments
    pub fn placeholder_count(&self) -> usize {
        count_placeholders(&self.sql)
    }

    /// The query as an sqlx statement with every value bound positionally
    pub fn bind(&self) -> sqlx::query::Query<'_, Sqlite, SqliteArguments<'_>> {
        self.values
            .iter()
            .fold(sqlx::query(&self.sql), |query, value| match value {
                BoundValue::Null => query.bind(None::<String>),
                BoundValue::Integer(i) => query.bind(*i),
                BoundValue::Float(f) => query.bind(*f),
                BoundValue::Bool(b) => query.bind(*b),
                BoundValue::Text(s) => query.bind(s.as_str()),
            })
    }
}

/// Number of parameters the statement expects
///
/// Quoted text and `--` / `/* */` comments are skipped. A bare `?` takes the
/// next index after the highest seen so far and `?NNN` names its index
/// explicitly, so the result is the highest index used.
fn count_placeholders(sql: &str) -> usize {
    let mut chars = sql.chars().peekable();
    let mut highest = 0;

    while let Some(c) = chars.next() {
        match c {
            '\'' | '"' => {
                for inner in chars.by_ref() {
                    if inner == c {
                        break;
                    }
                }
            }
            '-' if chars.peek() == Some(&'-') => {
                for inner in chars.by_ref() {
                    if inner == '\n' {
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut star = false;
                for inner in chars.by_ref() {
                    if star && inner == '/' {
                        break;
                    }
                    star = inner == '*';
                }
            }
            '?' => {
                let mut digits = String::new();
                while let Some(d) = chars.next_if(|d| d.is_ascii_digit()) {
                    digits.push(d);
                }
                highest = match digits.parse::<usize>() {
                    Ok(index) => highest.max(index),
                    Err(_) => highest + 1,
                };
            }
            _ => {}
        }
    }
    highest
}

/// Resolved LIMIT and OFFSET
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: u64,
    pub offset: u64,
}

impl Pagination {
    /// Resolve caller-supplied values against the configured bounds
    ///
    /// An absent or non-positive limit becomes the default limit; larger
    /// limits are clamped to the maximum. An absent or negative offset
    /// becomes 0.
    pub fn resolve(limit: Option<i64>, offset: Option<i64>, config: &CompilerConfig) -> Self {
        let limit = match limit.and_then(|l| u64::try_from(l).ok()) {
            None | Some(0) => config.default_limit,
            Some(l) if l > config.max_limit => {
                tracing::warn!(
                    requested = l,
                    max = config.max_limit,
                    "requested limit clamped"
                );
                config.max_limit
            }
            Some(l) => l,
        };
        let offset = offset.and_then(|o| u64::try_from(o).ok()).unwrap_or(0);

        Self { limit, offset }
    }
}

/// Caller inputs for one search: optional filters, sort and pagination
///
/// Deserializes from a flat object; every key other than `sort`, `order`,
/// `limit` and `offset` is a filter value.
///
/// ```
/// use query_assembler::SearchRequest;
///
/// let request: SearchRequest = serde_json::from_value(serde_json::json!({
///     "title": "Love",
///     "sort": "artist",
///     "order": "desc",
///     "limit": 10
/// })).unwrap();
///
/// assert_eq!(request.sort.as_deref(), Some("artist"));
/// assert_eq!(request.filters.get("title"), Some(&serde_json::json!("Love")));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Whitelisted sort key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    /// `asc` or `desc`, any case
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    /// Filter values by key
    #[serde(flatten)]
    pub filters: FilterValues,
}

impl SearchRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter value
    pub fn filter(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.filters = self.filters.set(key, value);
        self
    }

    /// Set sort key and direction
    pub fn sort(mut self, key: impl Into<String>, order: impl Into<String>) -> Self {
        self.sort = Some(key.into());
        self.order = Some(order.into());
        self
    }

    /// Set pagination
    pub fn paginate(mut self, limit: i64, offset: i64) -> Self {
        self.limit = Some(limit);
        self.offset = Some(offset);
        self
    }
}
