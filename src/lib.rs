//! # query-assembler
//!
//! Parameterized SQL assembly from ordered clause calls, with optional
//! caller-supplied filters and whitelisted sorting.
//!
//! The crate produces SQL text and an aligned list of bound values. It
//! performs no I/O; executing the query belongs to the caller's database
//! layer (an sqlx SQLite statement is available through [`Query::bind`]).
//!
//! ## Features
//!
//! - **Clause Assembly**: `SqlBuilder` appends SELECT/FROM/JOIN/WHERE/ORDER BY/
//!   LIMIT/OFFSET/INSERT/UPDATE/DELETE fragments in call order
//! - **Optional Filters**: declared `FilterSpec`s become `column <op> ?`
//!   predicates only when the caller supplies a value
//! - **Aligned Values**: predicate text and bound values are produced together,
//!   in declaration order
//! - **Injection-Safe Sorting**: sort keys resolve through a `SortWhitelist`;
//!   unknown keys fall back to a declared default
//!
//! ## Quick Start
//!
//! ```rust
//! use query_assembler::{
//!     FilterCompiler, FilterSpec, SearchRequest, SortDirection, SortWhitelist, SqlBuilder,
//! };
//!
//! let sort = SortWhitelist::new("hof.title", SortDirection::Asc)?
//!     .allow("artist", "a.artist")?;
//!
//! let compiler = FilterCompiler::new(sort)
//!     .filter(FilterSpec::like("title", "hof.title"))
//!     .filter(FilterSpec::at_least("inducted_from", "ind.year"));
//!
//! let request = SearchRequest::new()
//!     .filter("title", "Love")
//!     .filter("inducted_from", "1990")
//!     .sort("artist", "desc")
//!     .paginate(10, 0);
//!
//! let shape = SqlBuilder::new()
//!     .select(["hof.title", "a.artist"])
//!     .from("hall_of_fame as hof")
//!     .join("artist as a", "hof.artist_id = a.id")
//!     .join("inducted as ind", "hof.inducted_id = ind.id");
//!
//! let query = compiler.apply(shape, &request)?;
//!
//! assert!(query.sql.ends_with(
//!     "WHERE hof.title LIKE ? AND ind.year >= ? ORDER BY a.artist DESC LIMIT 10 OFFSET 0"
//! ));
//! assert_eq!(query.values.len(), 2);
//! # Ok::<(), query_assembler::QueryError>(())
//! ```
//!
//! ## Configuration
//!
//! Pagination bounds are configured with `CompilerConfig`:
//!
//! ```rust
//! use query_assembler::CompilerConfig;
//!
//! let config = CompilerConfig::builder()
//!     .default_limit(25)   // LIMIT when none is requested
//!     .max_limit(200)      // Upper bound for requested limits
//!     .build();
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod query;
pub mod sql;
pub mod types;

// Re-export main types for convenience
pub use catalog::HallOfFame;
pub use config::{CompilerConfig, CompilerConfigBuilder};
pub use error::{QueryError, Result};
pub use query::{Pagination, Query, SearchRequest};
pub use sql::{
    Comparator, CompiledFilter, CompiledRequest, FilterCompiler, FilterSpec, FilterValues, OrderBy,
    Predicate, SortDirection, SortWhitelist, SqlBuilder,
};
pub use types::BoundValue;
