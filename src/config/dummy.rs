//! Dummy table configuration
//!
//! An always-present default that treats every queried argument as a
//! STRING column in a table named `DUMMY_TABLE` with id column `ID`.
//! Column names are derived by upper-casing the argument name and
//! replacing non-identifier characters with underscores; a `C_` prefix
//! guarantees the result is always a valid unquoted identifier even when
//! the argument name starts with a digit or symbol. Used for prototyping
//! before a real table landscape is configured.

use crate::automap::AutoMappingPolicy;
use crate::config::assignment::ArgColumnAssignment;
use crate::config::column::DataColumn;
use crate::config::table::SingleTableConfig;
use crate::context::ProcessContext;
use crate::identifier::ConfigError;
use crate::model::{AdlSqlType, ArgMetaInfo, AudlangType};
use std::sync::Arc;

pub const DUMMY_TABLE_NAME: &str = "DUMMY_TABLE";
pub const DUMMY_ID_COLUMN: &str = "ID";

fn derive_column_name(arg_name: &str) -> String {
    let transformed: String = arg_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
        .collect();
    format!("C_{transformed}")
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DummyAutoMappingPolicy;

impl AutoMappingPolicy for DummyAutoMappingPolicy {
    fn name(&self) -> &str {
        "DUMMY"
    }

    fn is_applicable(&self, arg_name: &str) -> bool {
        !arg_name.trim().is_empty()
    }

    fn map(&self, arg_name: &str, _ctx: &mut ProcessContext) -> Result<ArgColumnAssignment, ConfigError> {
        if arg_name.trim().is_empty() {
            return Err(ConfigError::BlankIdentifier { kind: "argument" });
        }
        let column = DataColumn::new(
            DUMMY_TABLE_NAME,
            derive_column_name(arg_name),
            AdlSqlType::varchar(),
            false,
            false,
            vec![],
            DUMMY_ID_COLUMN,
        )?;
        let arg = ArgMetaInfo::new(arg_name, AudlangType::String, false, false);
        ArgColumnAssignment::new(arg, column)
    }
}

/// Builds the always-present `DUMMY_TABLE` configuration.
pub fn dummy_table_config() -> SingleTableConfig {
    SingleTableConfig::builder(DUMMY_TABLE_NAME)
        .id_column(DUMMY_ID_COLUMN)
        .expect("DUMMY_ID_COLUMN is a constant valid identifier")
        .auto_mapping_policy(Arc::new(DummyAutoMappingPolicy))
        .get()
        .expect("dummy table config has no data columns to violate an invariant")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_any_non_blank_argument() {
        let config = dummy_table_config();
        let mut ctx = ProcessContext::new();
        let assignment = config.lookup_assignment("my.weird-arg!", &mut ctx).unwrap();
        assert_eq!(assignment.data_column().table_name(), DUMMY_TABLE_NAME);
        assert_eq!(assignment.data_column().column_name(), "C_MY_WEIRD_ARG_");
    }

    #[test]
    fn rejects_blank_argument() {
        let config = dummy_table_config();
        let mut ctx = ProcessContext::new();
        assert!(config.lookup_assignment("   ", &mut ctx).is_err());
    }
}
