//! Multi-table configuration.

use crate::config::assignment::ArgColumnAssignment;
use crate::config::table::SingleTableConfig;
use crate::context::ProcessContext;
use crate::identifier::{ConfigError, LookupError};

/// A non-empty, ordered collection of [`SingleTableConfig`]s. Table names
/// are unique, at most one table is primary, and the union of
/// argName→assignment across all member tables is globally unique. The
/// primary table, if any, is the anchor other tables join against by id.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiTableConfig {
    tables: Vec<SingleTableConfig>,
}

impl MultiTableConfig {
    pub fn builder() -> MultiTableConfigBuilder {
        MultiTableConfigBuilder::default()
    }

    pub fn tables(&self) -> &[SingleTableConfig] {
        &self.tables
    }

    pub fn number_of_tables(&self) -> usize {
        self.tables.len()
    }

    pub fn primary_table(&self) -> Option<&SingleTableConfig> {
        self.tables.iter().find(|t| t.table_nature().is_primary())
    }

    pub fn is_always_known(&self, arg_name: &str) -> bool {
        self.tables.iter().any(|t| t.is_always_known(arg_name))
    }

    pub fn is_collection(&self, arg_name: &str) -> bool {
        self.tables.iter().any(|t| t.is_collection(arg_name))
    }

    /// Tries each member table in declaration order.
    pub fn lookup_assignment(&self, arg_name: &str, ctx: &mut ProcessContext) -> Result<ArgColumnAssignment, LookupError> {
        for table in &self.tables {
            if let Ok(assignment) = table.lookup_assignment(arg_name, ctx) {
                return Ok(assignment);
            }
        }
        Err(LookupError {
            arg_name: arg_name.to_string(),
        })
    }
}

#[derive(Default)]
pub struct MultiTableConfigBuilder {
    tables: Vec<SingleTableConfig>,
}

impl MultiTableConfigBuilder {
    pub fn add_table(mut self, table: SingleTableConfig) -> Result<Self, ConfigError> {
        if self.tables.iter().any(|t| t.table_name() == table.table_name()) {
            return Err(ConfigError::DuplicateTableName {
                table_name: table.table_name().to_string(),
            });
        }
        if table.table_nature().is_primary()
            && let Some(existing) = self.tables.iter().find(|t| t.table_nature().is_primary())
        {
            return Err(ConfigError::MultiplePrimaryTables {
                first: existing.table_name().to_string(),
                second: table.table_name().to_string(),
            });
        }
        for arg_name in table.arg_column_map().keys() {
            if let Some(owner) = self.tables.iter().find(|t| t.arg_column_map().contains_key(arg_name)) {
                return Err(ConfigError::DuplicateGlobalArgumentMapping {
                    arg_name: arg_name.clone(),
                    first_table: owner.table_name().to_string(),
                    second_table: table.table_name().to_string(),
                });
            }
        }
        self.tables.push(table);
        Ok(self)
    }

    pub fn get(self) -> Result<MultiTableConfig, ConfigError> {
        if self.tables.is_empty() {
            return Err(ConfigError::EmptyTableCollection);
        }
        Ok(MultiTableConfig { tables: self.tables })
    }
}
