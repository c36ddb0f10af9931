//! Identifier validation and the `ConfigError`/`LookupError`
//! vocabulary the whole configuration model (`crate::config`) raises.
//!
//! Argument names, table names and column names each have their own
//! grammar. All three share the same quoting escape hatch: a
//! backtick-quoted form that accepts any character except a backtick.
//! Table names additionally allow a single dot as a schema separator in
//! their unquoted grammar.

use thiserror::Error;

/// Every way a table-landscape configuration can fail its invariants.
/// Raised synchronously at construction time; never recovered by the core.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("{kind} name must not be empty or blank")]
    BlankIdentifier { kind: &'static str },

    #[error("{kind} name '{name}' is not a valid identifier")]
    InvalidIdentifier { kind: &'static str, name: String },

    #[error("filter value '{value}' is not valid for column type {sql_type}: {source}")]
    InvalidFilterValue {
        value: String,
        sql_type: String,
        #[source]
        source: crate::coalescence::FormattingError,
    },

    #[error("duplicate filter column '{column_name}' on {table_name}")]
    DuplicateFilterColumn { table_name: String, column_name: String },

    #[error("filter column '{column_name}' on {table_name} collides with the id column or the data column it is attached to")]
    FilterReferencesOwnColumn { table_name: String, column_name: String },

    #[error("filter table '{filter_table}' does not match owning table '{owner_table}'")]
    FilterTableMismatch { owner_table: String, filter_table: String },

    #[error("argument '{arg_name}' is already mapped in table '{table_name}'")]
    DuplicateArgumentAssignment { table_name: String, arg_name: String },

    #[error("argument '{arg_name}' is unknown to the configured metadata lookup")]
    UnknownArgument { arg_name: String },

    #[error("id column '{id_column}' of table '{table_name}' may not also be a filter or data column")]
    IdColumnCollision { table_name: String, id_column: String },

    #[error("table '{table_name}' declares unique ids but assigns multi-row column '{column_name}'")]
    UniqueIdsForbidMultiRow { table_name: String, column_name: String },

    #[error("assignment of argument type {logical} to SQL type {sql} has no defined coalescence rule")]
    NotCoalescable { logical: String, sql: String },

    #[error("table collection must contain at least one table")]
    EmptyTableCollection,

    #[error("duplicate table name '{table_name}' in multi-table configuration")]
    DuplicateTableName { table_name: String },

    #[error("more than one table is marked as the primary table ('{first}' and '{second}')")]
    MultiplePrimaryTables { first: String, second: String },

    #[error("argument '{arg_name}' is mapped by both '{first_table}' and '{second_table}'")]
    DuplicateGlobalArgumentMapping {
        arg_name: String,
        first_table: String,
        second_table: String,
    },

    #[error("no auto-mapping policy in composite '{policy_name}' is applicable to argument '{arg_name}'")]
    NoApplicableAutoMappingPolicy { policy_name: String, arg_name: String },

    #[error("table '{table_name}' has no id column configured")]
    MissingIdColumn { table_name: String },
}

/// Failure of `lookupAssignment`: neither a direct mapping
/// nor an applicable auto-mapping policy exists for the argument.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("no assignment found for argument '{arg_name}'")]
pub struct LookupError {
    pub arg_name: String,
}

/// Argument names accept any non-empty, non-whitespace-only text. `*` is
/// a permitted wildcard.
pub fn validate_arg_name(name: &str) -> Result<(), ConfigError> {
    if name.trim().is_empty() {
        return Err(ConfigError::BlankIdentifier { kind: "argument" });
    }
    Ok(())
}

/// Table names: unquoted `[A-Za-z_$][A-Za-z0-9_$]*` with an optional
/// single `.`-separated schema prefix of the same grammar, or a
/// backtick-quoted form.
pub fn validate_table_name(name: &str) -> Result<(), ConfigError> {
    validate_identifier(name, "table", true)
}

/// Column names: unquoted `[A-Za-z_$][A-Za-z0-9_$]*` (no schema
/// separator), or a backtick-quoted form.
pub fn validate_column_name(name: &str) -> Result<(), ConfigError> {
    validate_identifier(name, "column", false)
}

fn validate_identifier(name: &str, kind: &'static str, allow_schema_dot: bool) -> Result<(), ConfigError> {
    if name.trim().is_empty() {
        return Err(ConfigError::BlankIdentifier { kind });
    }
    if is_quoted(name) {
        let inner = &name[1..name.len() - 1];
        if inner.contains('`') {
            return Err(ConfigError::InvalidIdentifier {
                kind,
                name: name.to_string(),
            });
        }
        return Ok(());
    }
    if name == "`" {
        return Err(ConfigError::InvalidIdentifier {
            kind,
            name: name.to_string(),
        });
    }
    let parts: Vec<&str> = if allow_schema_dot {
        name.splitn(2, '.').collect()
    } else {
        vec![name]
    };
    if parts.len() > 2 || parts.iter().any(|p| !is_plain_identifier(p)) {
        return Err(ConfigError::InvalidIdentifier {
            kind,
            name: name.to_string(),
        });
    }
    Ok(())
}

fn is_quoted(name: &str) -> bool {
    name.len() >= 2 && name.starts_with('`') && name.ends_with('`')
}

fn is_plain_identifier(part: &str) -> bool {
    let mut chars = part.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
