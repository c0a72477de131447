//! Hall-of-fame catalogue queries
//!
//! The catalogue joins `hall_of_fame` to its five lookup tables (`artist`,
//! `category`, `inducted`, `released`, `label`). Listing, searching and
//! per-year lookups all share that shape and differ only in the WHERE,
//! ORDER BY and pagination derived from the caller's request.

use crate::config::CompilerConfig;
use crate::error::Result;
use crate::query::{Pagination, Query, SearchRequest};
use crate::sql::builder::SqlBuilder;
use crate::sql::filter::{CompiledFilter, FilterCompiler, FilterSpec, Predicate};
use crate::sql::sort::{SortDirection, SortWhitelist};
use crate::types::BoundValue;

/// Output columns of every catalogue query
pub const LISTING_COLUMNS: &[&str] = &[
    "hof.title",
    "a.artist as artist",
    "c.category as category",
    "ind.year as inducted",
    "rel.year as released",
    "l.label as label",
];

/// Catalogue query factory
#[derive(Debug, Clone)]
pub struct HallOfFame {
    compiler: FilterCompiler,
}

impl HallOfFame {
    /// Create the catalogue with default pagination bounds
    pub fn new() -> Result<Self> {
        Self::with_config(CompilerConfig::default())
    }

    pub fn with_config(config: CompilerConfig) -> Result<Self> {
        let sort = SortWhitelist::new("hof.title", SortDirection::Asc)?
            .allow("title", "hof.title")?
            .allow("artist", "a.artist")?
            .allow("category", "c.category")?
            .allow("label", "l.label")?
            .allow("inducted", "ind.year")?
            .allow("released", "rel.year")?;

        let compiler = FilterCompiler::new(sort)
            .with_config(config)
            .filter(FilterSpec::like("title", "hof.title"))
            .filter(FilterSpec::like("artist", "a.artist"))
            .filter(FilterSpec::equals("category", "c.category"))
            .filter(FilterSpec::like("label", "l.label"))
            .filter(FilterSpec::at_least("inducted_from", "ind.year"))
            .filter(FilterSpec::at_most("inducted_to", "ind.year"))
            .filter(FilterSpec::at_least("released_from", "rel.year"))
            .filter(FilterSpec::at_most("released_to", "rel.year"));

        Ok(Self { compiler })
    }

    pub fn compiler(&self) -> &FilterCompiler {
        &self.compiler
    }

    /// SELECT and joins shared by every catalogue query
    pub fn listing() -> SqlBuilder {
        SqlBuilder::new()
            .select(LISTING_COLUMNS)
            .from("hall_of_fame as hof")
            .join("artist as a", "hof.artist_id = a.id")
            .join("category as c", "hof.category_id = c.id")
            .join("inducted as ind", "hof.inducted_id = ind.id")
            .join("released as rel", "hof.released_id = rel.id")
            .join("label as l", "hof.label_id = l.id")
    }

    /// Every entry, sorted and paginated; filter values are ignored
    pub fn list(&self, request: &SearchRequest) -> Result<Query> {
        let order_by = self
            .compiler
            .resolve_sort(request.sort.as_deref(), request.order.as_deref());
        let pagination = Pagination::resolve(request.limit, request.offset, self.compiler.config());

        Self::listing()
            .ordered(&order_by)
            .paginate(&pagination)
            .build_query(Vec::new())
    }

    /// Entries matching the request's filters, sorted and paginated
    pub fn search(&self, request: &SearchRequest) -> Result<Query> {
        self.compiler.apply(Self::listing(), request)
    }

    /// Entries inducted in `year`
    pub fn by_inducted_year(&self, year: impl Into<BoundValue>) -> Result<Query> {
        let filter: CompiledFilter = std::iter::once(Predicate::Equals {
            column: "ind.year".to_string(),
            value: year.into(),
        })
        .collect();
        let order_by = self.compiler.sort_whitelist().default_order().clone();

        let builder = Self::listing().filtered(&filter).ordered(&order_by);
        builder.build_query(filter.into_values())
    }

    /// INSERT used when loading a lookup or catalogue table
    pub fn import_row(table: &str, columns: &[&str]) -> SqlBuilder {
        SqlBuilder::new().insert(table, columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING_SQL: &str = "SELECT hof.title, a.artist as artist, c.category as category, ind.year as inducted, rel.year as released, l.label as label FROM hall_of_fame as hof JOIN artist as a ON hof.artist_id = a.id JOIN category as c ON hof.category_id = c.id JOIN inducted as ind ON hof.inducted_id = ind.id JOIN released as rel ON hof.released_id = rel.id JOIN label as l ON hof.label_id = l.id";

    #[test]
    fn test_listing_shape() {
        assert_eq!(HallOfFame::listing().build(), LISTING_SQL);
    }

    #[test]
    fn test_list_ignores_filters() {
        let catalog = HallOfFame::new().unwrap();
        let query = catalog
            .list(&SearchRequest::new().filter("title", "Love").paginate(10, 0))
            .unwrap();

        assert_eq!(
            query.sql,
            format!("{} ORDER BY hof.title ASC LIMIT 10 OFFSET 0", LISTING_SQL)
        );
        assert!(query.values.is_empty());
    }

    #[test]
    fn test_search() {
        let catalog = HallOfFame::new().unwrap();
        let request = SearchRequest::new()
            .filter("title", "Love")
            .filter("inducted_from", "1990")
            .sort("artist", "desc")
            .paginate(5, 10);

        let query = catalog.search(&request).unwrap();

        assert_eq!(
            query.sql,
            format!(
                "{} WHERE hof.title LIKE ? AND ind.year >= ? ORDER BY a.artist DESC LIMIT 5 OFFSET 10",
                LISTING_SQL
            )
        );
        assert_eq!(
            query.values,
            vec![BoundValue::from("%Love%"), BoundValue::from("1990")]
        );
    }

    #[test]
    fn test_search_all_filters_in_declared_order() {
        let catalog = HallOfFame::new().unwrap();
        let request = SearchRequest::new()
            .filter("released_to", "1979")
            .filter("released_from", "1970")
            .filter("inducted_to", "2005")
            .filter("inducted_from", "1995")
            .filter("label", "Atlantic")
            .filter("category", "Single")
            .filter("artist", "Aretha")
            .filter("title", "Respect");

        let query = catalog.search(&request).unwrap();

        assert!(query.sql.contains(
            "WHERE hof.title LIKE ? AND a.artist LIKE ? AND c.category = ? AND l.label LIKE ? AND ind.year >= ? AND ind.year <= ? AND rel.year >= ? AND rel.year <= ?"
        ));
        assert_eq!(
            query.values,
            vec![
                BoundValue::from("%Respect%"),
                BoundValue::from("%Aretha%"),
                BoundValue::from("Single"),
                BoundValue::from("%Atlantic%"),
                BoundValue::from("1995"),
                BoundValue::from("2005"),
                BoundValue::from("1970"),
                BoundValue::from("1979"),
            ]
        );
    }

    #[test]
    fn test_search_unknown_sort_key() {
        let catalog = HallOfFame::new().unwrap();
        let query = catalog
            .search(&SearchRequest::new().sort("hof.id DESC; --", "desc"))
            .unwrap();

        assert!(query.sql.contains("ORDER BY hof.title ASC"));
        assert!(!query.sql.contains("--"));
    }

    #[test]
    fn test_by_inducted_year() {
        let catalog = HallOfFame::new().unwrap();
        let query = catalog.by_inducted_year("1999").unwrap();

        assert_eq!(
            query.sql,
            format!("{} WHERE ind.year = ? ORDER BY hof.title ASC", LISTING_SQL)
        );
        assert_eq!(query.values, vec![BoundValue::from("1999")]);
    }

    #[test]
    fn test_import_row() {
        let sql = HallOfFame::import_row("label", &["id", "label"]).build();

        assert_eq!(sql, "INSERT INTO label (id, label) VALUES (?, ?)");
    }
}
