//! SQL utilities
//!
//! Provides clause assembly, filter compilation, whitelisted sorting and
//! column reference validation.

pub mod builder;
pub mod filter;
pub mod sanitize;
pub mod sort;

pub use builder::SqlBuilder;
pub use filter::{
    Comparator, CompiledFilter, CompiledRequest, FilterCompiler, FilterSpec, FilterValues,
    Predicate,
};
pub use sanitize::validate_column_reference;
pub use sort::{OrderBy, SortDirection, SortWhitelist};
