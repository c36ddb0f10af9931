//! Table- and column-scoped filter predicates

use crate::coalescence;
use crate::identifier::{self, ConfigError};
use crate::model::{AdlSqlType, AudlangType};

/// A predicate scoped to one table: `table_name.column_name <op> filter_value`.
/// `filter_value` is validated at construction against `column_type`'s
/// formatter, using the STRING row of the coalescence matrix — the same
/// row the upstream formatter uses to turn an arbitrary canonical literal
/// into a column-typed value. A value containing a `${...}` template
/// reference is treated as a deferred reference and passed through
/// verbatim without coalescence: the caller is
/// responsible for substituting it before execution.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterColumn {
    table_name: String,
    column_name: String,
    column_type: AdlSqlType,
    filter_value: String,
}

fn looks_like_template_reference(value: &str) -> bool {
    value.contains("${")
}

impl FilterColumn {
    pub fn new(
        table_name: impl Into<String>,
        column_name: impl Into<String>,
        column_type: AdlSqlType,
        filter_value: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let table_name = table_name.into();
        let column_name = column_name.into();
        let filter_value = filter_value.into();
        identifier::validate_table_name(&table_name)?;
        identifier::validate_column_name(&column_name)?;
        if !looks_like_template_reference(&filter_value) {
            coalescence::coalesce(AudlangType::String, column_type.sql_type(), Some(&filter_value)).map_err(|source| {
                ConfigError::InvalidFilterValue {
                    value: filter_value.clone(),
                    sql_type: column_type.name().to_string(),
                    source,
                }
            })?;
        }
        Ok(Self {
            table_name,
            column_name,
            column_type,
            filter_value,
        })
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn column_name(&self) -> &str {
        &self.column_name
    }

    pub fn column_type(&self) -> &AdlSqlType {
        &self.column_type
    }

    pub fn filter_value(&self) -> &str {
        &self.filter_value
    }

    pub fn is_template_reference(&self) -> bool {
        looks_like_template_reference(&self.filter_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_value_is_accepted() {
        let f = FilterColumn::new("t", "tenant_id", AdlSqlType::integer(), "42").unwrap();
        assert_eq!(f.filter_value(), "42");
    }

    #[test]
    fn malformed_value_is_a_config_error() {
        assert!(FilterColumn::new("t", "tenant_id", AdlSqlType::integer(), "not-a-number").is_err());
    }

    #[test]
    fn template_reference_passes_through_without_coalescence() {
        let f = FilterColumn::new("t", "tenant_id", AdlSqlType::integer(), "${TENANT}").unwrap();
        assert!(f.is_template_reference());
        assert_eq!(f.filter_value(), "${TENANT}");
    }

    #[test]
    fn invalid_table_name_rejected() {
        assert!(FilterColumn::new("bad table", "c", AdlSqlType::varchar(), "x").is_err());
    }
}
