//! Filter compilation for SQL WHERE clauses
//!
//! Turns optional, caller-supplied filter values into one conjunctive WHERE
//! body plus a positionally aligned list of bound values.
//!
//! Filters are declared once, in a fixed order, as [`FilterSpec`]s. At
//! request time each spec whose value is present becomes a typed
//! [`Predicate`], and each predicate compiles into `(fragment, value)`
//! pairs. Fragment text and values are produced together, so the `?`
//! count always matches the value count.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::CompilerConfig;
use crate::error::{QueryError, Result};
use crate::query::{Pagination, Query, SearchRequest};
use crate::sql::builder::SqlBuilder;
use crate::sql::sort::{OrderBy, SortWhitelist};
use crate::types::BoundValue;

/// Comparison forms a filter may use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    /// `column = ?`
    Equals,
    /// `column LIKE ?` with the value wrapped in `%...%`
    Like,
    /// `column >= ?`
    AtLeast,
    /// `column <= ?`
    AtMost,
}

impl Comparator {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Comparator::Equals => "=",
            Comparator::Like => "LIKE",
            Comparator::AtLeast => ">=",
            Comparator::AtMost => "<=",
        }
    }
}

impl FromStr for Comparator {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "=" => Ok(Comparator::Equals),
            ">=" => Ok(Comparator::AtLeast),
            "<=" => Ok(Comparator::AtMost),
            other if other.eq_ignore_ascii_case("LIKE") => Ok(Comparator::Like),
            other => Err(QueryError::invalid_comparator(format!(
                "'{}' is not one of =, LIKE, >=, <=",
                other
            ))),
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// One optional predicate definition: caller-facing key, column, comparator
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    pub key: String,
    pub column: String,
    pub comparator: Comparator,
}

impl FilterSpec {
    /// Declare a filter from comparator text (`=`, `LIKE`, `>=`, `<=`)
    pub fn new(
        key: impl Into<String>,
        column: impl Into<String>,
        comparator: &str,
    ) -> Result<Self> {
        Ok(Self::with(key, column, comparator.parse()?))
    }

    pub fn with(key: impl Into<String>, column: impl Into<String>, comparator: Comparator) -> Self {
        Self {
            key: key.into(),
            column: column.into(),
            comparator,
        }
    }

    pub fn equals(key: impl Into<String>, column: impl Into<String>) -> Self {
        Self::with(key, column, Comparator::Equals)
    }

    pub fn like(key: impl Into<String>, column: impl Into<String>) -> Self {
        Self::with(key, column, Comparator::Like)
    }

    pub fn at_least(key: impl Into<String>, column: impl Into<String>) -> Self {
        Self::with(key, column, Comparator::AtLeast)
    }

    pub fn at_most(key: impl Into<String>, column: impl Into<String>) -> Self {
        Self::with(key, column, Comparator::AtMost)
    }

    /// Typed predicate for this spec, or `None` when the value is absent
    pub fn predicate(&self, raw: Option<&serde_json::Value>) -> Option<Predicate> {
        let value = BoundValue::from_raw(raw?)?;
        let column = self.column.clone();

        Some(match self.comparator {
            Comparator::Equals => Predicate::Equals { column, value },
            Comparator::Like => Predicate::Like { column, value },
            Comparator::AtLeast => Predicate::Range {
                column,
                from: Some(value),
                to: None,
            },
            Comparator::AtMost => Predicate::Range {
                column,
                from: None,
                to: Some(value),
            },
        })
    }
}

/// A typed predicate over a trusted column
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Equals {
        column: String,
        value: BoundValue,
    },
    /// Substring match; the value is wrapped in `%...%` when compiled
    Like {
        column: String,
        value: BoundValue,
    },
    /// Inclusive range; either bound may be open
    Range {
        column: String,
        from: Option<BoundValue>,
        to: Option<BoundValue>,
    },
}

impl Predicate {
    /// Compile into `(fragment, value)` pairs, one per placeholder
    pub fn compile(self) -> Vec<(String, BoundValue)> {
        match self {
            Predicate::Equals { column, value } => vec![(format!("{} = ?", column), value)],
            Predicate::Like { column, value } => {
                vec![(format!("{} LIKE ?", column), value.to_like_pattern())]
            }
            Predicate::Range { column, from, to } => {
                let mut pairs = Vec::with_capacity(2);
                if let Some(from) = from {
                    pairs.push((format!("{} >= ?", column), from));
                }
                if let Some(to) = to {
                    pairs.push((format!("{} <= ?", column), to));
                }
                pairs
            }
        }
    }
}

/// Caller-supplied filter values by key
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterValues(HashMap<String, serde_json::Value>);

impl FilterValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a filter value
    pub fn set(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<serde_json::Value>> FromIterator<(K, V)> for FilterValues {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Conjunctive WHERE body and its aligned values
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompiledFilter {
    predicates: Vec<String>,
    values: Vec<BoundValue>,
}

impl CompiledFilter {
    /// Append a predicate's fragments and values
    pub fn push(&mut self, predicate: Predicate) {
        for (fragment, value) in predicate.compile() {
            self.predicates.push(fragment);
            self.values.push(value);
        }
    }

    /// Predicates joined with ` AND `, or `None` when nothing is active
    pub fn where_body(&self) -> Option<String> {
        if self.predicates.is_empty() {
            None
        } else {
            Some(self.predicates.join(" AND "))
        }
    }

    pub fn predicates(&self) -> &[String] {
        &self.predicates
    }

    pub fn values(&self) -> &[BoundValue] {
        &self.values
    }

    pub fn into_values(self) -> Vec<BoundValue> {
        self.values
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

impl FromIterator<Predicate> for CompiledFilter {
    fn from_iter<T: IntoIterator<Item = Predicate>>(iter: T) -> Self {
        let mut compiled = CompiledFilter::default();
        for predicate in iter {
            compiled.push(predicate);
        }
        compiled
    }
}

/// Everything a request contributes to a query
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledRequest {
    pub filter: CompiledFilter,
    pub order_by: OrderBy,
    pub pagination: Pagination,
}

/// Compiles requests against declared filters and a sort whitelist
///
/// Filters are compiled in declaration order, which fixes both predicate
/// order and value order.
#[derive(Debug, Clone)]
pub struct FilterCompiler {
    specs: Vec<FilterSpec>,
    sort: SortWhitelist,
    config: CompilerConfig,
}

impl FilterCompiler {
    pub fn new(sort: SortWhitelist) -> Self {
        Self {
            specs: Vec::new(),
            sort,
            config: CompilerConfig::default(),
        }
    }

    pub fn with_config(mut self, config: CompilerConfig) -> Self {
        self.config = config;
        self
    }

    /// Declare the next filter
    pub fn filter(mut self, spec: FilterSpec) -> Self {
        self.specs.push(spec);
        self
    }

    pub fn specs(&self) -> &[FilterSpec] {
        &self.specs
    }

    pub fn sort_whitelist(&self) -> &SortWhitelist {
        &self.sort
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Compile the present filter values; unknown keys are ignored
    pub fn compile_filters(&self, values: &FilterValues) -> CompiledFilter {
        let compiled: CompiledFilter = self
            .specs
            .iter()
            .filter_map(|spec| spec.predicate(values.get(&spec.key)))
            .collect();

        tracing::debug!(
            declared = self.specs.len(),
            active = compiled.predicates().len(),
            "compiled filters"
        );
        compiled
    }

    pub fn resolve_sort(&self, key: Option<&str>, direction: Option<&str>) -> OrderBy {
        self.sort.resolve(key, direction)
    }

    pub fn compile(&self, request: &SearchRequest) -> CompiledRequest {
        CompiledRequest {
            filter: self.compile_filters(&request.filters),
            order_by: self.resolve_sort(request.sort.as_deref(), request.order.as_deref()),
            pagination: Pagination::resolve(request.limit, request.offset, &self.config),
        }
    }

    /// Append WHERE, ORDER BY, LIMIT and OFFSET for `request` and build
    ///
    /// `builder` should already carry the query shape (SELECT, FROM, joins).
    pub fn apply(&self, builder: SqlBuilder, request: &SearchRequest) -> Result<Query> {
        let compiled = self.compile(request);
        builder
            .filtered(&compiled.filter)
            .ordered(&compiled.order_by)
            .paginate(&compiled.pagination)
            .build_query(compiled.filter.into_values())
    }
}
