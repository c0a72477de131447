//! Column Reference Validation
//!
//! Sort whitelists map caller-facing keys to column references that end up
//! verbatim in ORDER BY. Those references are checked once, when the
//! whitelist is declared.

use std::sync::LazyLock;

use regex::Regex;

static COLUMN_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)?$")
        .expect("column reference pattern is valid")
});

/// Validate a plain or table-qualified column reference
///
/// Accepts `column` and `alias.column`, where each part starts with a letter
/// or underscore and contains only ASCII letters, digits and underscores.
///
/// # Example
/// ```
/// use query_assembler::sql::validate_column_reference;
///
/// assert!(validate_column_reference("a.artist").is_ok());
/// assert!(validate_column_reference("title").is_ok());
/// assert!(validate_column_reference("title; DROP TABLE artist").is_err());
/// ```
pub fn validate_column_reference(reference: &str) -> Result<(), String> {
    if reference.is_empty() {
        return Err("Column reference cannot be empty".to_string());
    }

    if !COLUMN_REFERENCE.is_match(reference) {
        return Err(format!(
            "Column reference '{}' is invalid. Expected 'column' or 'alias.column' made of letters, digits and underscores.",
            reference
        ));
    }

    Ok(())
}
