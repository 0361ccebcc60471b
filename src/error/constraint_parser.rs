use regex::Regex;
use std::sync::OnceLock;

/// Utility for parsing PostgreSQL constraint violation messages.
///
/// Extracts structured information (entity, field, value) from the message
/// text and constraint names PostgreSQL reports, so storage-level
/// violations can surface as typed errors instead of opaque 500s.
pub struct ConstraintParser;

/// Compiled regex patterns for constraint parsing, cached for reuse
struct RegexPatterns {
    key_value: Regex,
    table_name: Regex,
}

impl RegexPatterns {
    fn new() -> Self {
        Self {
            // Matches "Key (field)=(value)" in PostgreSQL DETAIL lines
            key_value: Regex::new(r"Key \(([^)]+)\)=\(([^)]*)\)").unwrap(),
            // Matches table names in quotes
            table_name: Regex::new(r#"table "([^"]+)""#).unwrap(),
        }
    }
}

static REGEX_PATTERNS: OnceLock<RegexPatterns> = OnceLock::new();

impl ConstraintParser {
    fn patterns() -> &'static RegexPatterns {
        REGEX_PATTERNS.get_or_init(RegexPatterns::new)
    }

    /// Parses a unique constraint violation message.
    ///
    /// The constraint name carries the entity and field (PostgreSQL names
    /// unique indexes `{table}_{column}_key`); the violating value comes
    /// from the DETAIL line.
    ///
    /// # Returns
    /// Optional tuple of (entity, field, value) if parsing succeeds
    pub fn parse_unique_violation(
        message: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String, String)> {
        if let Some(constraint) = constraint_name {
            if let Some((entity, field)) = Self::parse_constraint_name(constraint) {
                let value = Self::extract_value_from_message(message)
                    .unwrap_or_else(|| "duplicate_value".to_string());
                return Some((entity, field, value));
            }
        }

        // Fallback: parse the field and value from the message directly
        if let Some((field, value)) = Self::extract_key_value_from_message(message) {
            let entity =
                Self::extract_table_from_message(message).unwrap_or_else(|| "resource".to_string());
            return Some((entity, field, value));
        }

        None
    }

    /// Parses a foreign key constraint violation message.
    ///
    /// # Returns
    /// Optional tuple of (referenced entity, field, referenced value)
    pub fn parse_foreign_key_violation(
        message: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String, String)> {
        let (field, value) = Self::extract_key_value_from_message(message)?;
        // "insert ... on table "places" ... is not present in table "users""
        // names two tables; the referenced one comes last.
        let entity = Self::extract_referenced_table_from_message(message)
            .or_else(|| constraint_name.and_then(|c| Self::parse_constraint_name(c).map(|(e, _)| e)))
            .unwrap_or_else(|| "resource".to_string());
        Some((entity, field, value))
    }

    /// Parses a constraint name of the form `{table}_{column}_{suffix}`
    /// (e.g. `users_email_key`, `places_creator_id_fkey`) into
    /// (table, column).
    pub fn parse_constraint_name(constraint: &str) -> Option<(String, String)> {
        let rest = constraint
            .strip_suffix("_key")
            .or_else(|| constraint.strip_suffix("_fkey"))
            .or_else(|| constraint.strip_suffix("_idx"))?;

        let (table, column) = rest.split_once('_')?;
        if table.is_empty() || column.is_empty() {
            return None;
        }
        Some((table.to_string(), column.to_string()))
    }

    fn extract_key_value_from_message(message: &str) -> Option<(String, String)> {
        Self::patterns().key_value.captures(message).map(|caps| {
            (
                caps.get(1).map_or(String::new(), |m| m.as_str().to_string()),
                caps.get(2).map_or(String::new(), |m| m.as_str().to_string()),
            )
        })
    }

    fn extract_value_from_message(message: &str) -> Option<String> {
        Self::extract_key_value_from_message(message).map(|(_, value)| value)
    }

    fn extract_table_from_message(message: &str) -> Option<String> {
        Self::patterns()
            .table_name
            .captures(message)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    fn extract_referenced_table_from_message(message: &str) -> Option<String> {
        Self::patterns()
            .table_name
            .captures_iter(message)
            .last()
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }
}
