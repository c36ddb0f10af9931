//! Physical data columns

use crate::config::filter::FilterColumn;
use crate::identifier::{self, ConfigError};
use crate::model::AdlSqlType;

/// A physical column serving argument values. Invariants enforced at
/// construction: non-empty names, no duplicate filter column names, no
/// filter referencing the data column's own name or its table's id
/// column, and every filter's `table_name` equal to this column's
/// `table_name`.
#[derive(Debug, Clone, PartialEq)]
pub struct DataColumn {
    table_name: String,
    column_name: String,
    column_type: AdlSqlType,
    is_always_known: bool,
    is_multi_row: bool,
    filters: Vec<FilterColumn>,
}

impl DataColumn {
    /// `id_column_name` is the owning table's id column, required so the
    /// "no filter may shadow the id column" invariant can be checked here
    /// rather than deferred to the owning `SingleTableConfig`.
    pub fn new(
        table_name: impl Into<String>,
        column_name: impl Into<String>,
        column_type: AdlSqlType,
        is_always_known: bool,
        is_multi_row: bool,
        filters: Vec<FilterColumn>,
        id_column_name: &str,
    ) -> Result<Self, ConfigError> {
        let table_name = table_name.into();
        let column_name = column_name.into();
        identifier::validate_table_name(&table_name)?;
        identifier::validate_column_name(&column_name)?;

        let mut seen = std::collections::HashSet::new();
        for f in &filters {
            if f.table_name() != table_name {
                return Err(ConfigError::FilterTableMismatch {
                    owner_table: table_name.clone(),
                    filter_table: f.table_name().to_string(),
                });
            }
            if f.column_name() == column_name || f.column_name() == id_column_name {
                return Err(ConfigError::FilterReferencesOwnColumn {
                    table_name: table_name.clone(),
                    column_name: f.column_name().to_string(),
                });
            }
            if !seen.insert(f.column_name().to_string()) {
                return Err(ConfigError::DuplicateFilterColumn {
                    table_name: table_name.clone(),
                    column_name: f.column_name().to_string(),
                });
            }
        }

        Ok(Self {
            table_name,
            column_name,
            column_type,
            is_always_known,
            is_multi_row,
            filters,
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

    pub fn is_always_known(&self) -> bool {
        self.is_always_known
    }

    pub fn is_multi_row(&self) -> bool {
        self.is_multi_row
    }

    pub fn filters(&self) -> &[FilterColumn] {
        &self.filters
    }
}
