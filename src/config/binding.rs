//! External collaborator traits and the assembled runtime
//! context that pairs a table-landscape configuration with a contains
//! policy.

use crate::config::multi::MultiTableConfig;
use crate::config::table::SingleTableConfig;
use crate::contains::SqlContainsPolicy;
use crate::identifier::LookupError;
use crate::model::{ArgMetaInfo, AudlangType};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("argument '{arg_name}' is unknown")]
pub struct ArgLookupFailure {
    pub arg_name: String,
}

/// Maps an argument name to its logical descriptor. Supplied by the
/// upstream Audlang compiler; the core only ever calls `get`.
pub trait ArgMetaInfoLookup {
    fn get(&self, arg_name: &str) -> Result<ArgMetaInfo, ArgLookupFailure>;
}

/// Formats a logical value into the canonical textual representation the
/// type-coalescence matrix expects as input. Supplied by the
/// upstream compiler; opaque to this crate beyond its signature.
pub trait ArgValueFormatter {
    fn format(&self, arg_name: &str, value: &str, arg_type: AudlangType) -> Result<String, ArgLookupFailure>;
}

/// Either table-landscape shape a `DataBinding` can wrap.
#[derive(Debug, Clone, PartialEq)]
pub enum TableLandscape {
    Single(SingleTableConfig),
    Multi(MultiTableConfig),
}

impl TableLandscape {
    pub fn number_of_tables(&self) -> usize {
        match self {
            TableLandscape::Single(c) => c.number_of_tables(),
            TableLandscape::Multi(c) => c.number_of_tables(),
        }
    }

    pub fn is_always_known(&self, arg_name: &str) -> bool {
        match self {
            TableLandscape::Single(c) => c.is_always_known(arg_name),
            TableLandscape::Multi(c) => c.is_always_known(arg_name),
        }
    }

    pub fn is_collection(&self, arg_name: &str) -> bool {
        match self {
            TableLandscape::Single(c) => c.is_collection(arg_name),
            TableLandscape::Multi(c) => c.is_collection(arg_name),
        }
    }

    pub fn lookup_assignment(
        &self,
        arg_name: &str,
        ctx: &mut crate::context::ProcessContext,
    ) -> Result<crate::config::assignment::ArgColumnAssignment, LookupError> {
        match self {
            TableLandscape::Single(c) => c.lookup_assignment(arg_name, ctx),
            TableLandscape::Multi(c) => c.lookup_assignment(arg_name, ctx),
        }
    }
}

impl From<SingleTableConfig> for TableLandscape {
    fn from(c: SingleTableConfig) -> Self {
        TableLandscape::Single(c)
    }
}

impl From<MultiTableConfig> for TableLandscape {
    fn from(c: MultiTableConfig) -> Self {
        TableLandscape::Multi(c)
    }
}

/// The fully assembled runtime context: a table-landscape configuration
/// plus a contains policy. Rust has no nulls, so "rejects null
/// components" reduces to requiring both fields up front at
/// construction.
#[derive(Debug, Clone)]
pub struct DataBinding {
    landscape: TableLandscape,
    contains_policy: SqlContainsPolicy,
}

impl DataBinding {
    pub fn new(landscape: impl Into<TableLandscape>, contains_policy: SqlContainsPolicy) -> Self {
        Self {
            landscape: landscape.into(),
            contains_policy,
        }
    }

    pub fn landscape(&self) -> &TableLandscape {
        &self.landscape
    }

    pub fn contains_policy(&self) -> &SqlContainsPolicy {
        &self.contains_policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AdlSqlType;

    #[test]
    fn wraps_single_table_config_and_contains_policy() {
        let table = SingleTableConfig::builder("T")
            .id_column("ID")
            .unwrap()
            .data_column("d1", AdlSqlType::varchar())
            .mapped_to_arg_name("arg1", AudlangType::String)
            .end_column()
            .unwrap()
            .get()
            .unwrap();
        let binding = DataBinding::new(table, SqlContainsPolicy::mysql());
        assert_eq!(binding.landscape().number_of_tables(), 1);
        assert_eq!(binding.contains_policy().name(), "MYSQL");
    }
}
