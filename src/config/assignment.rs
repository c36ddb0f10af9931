//! Argument-to-column bindings

use crate::coalescence;
use crate::config::column::DataColumn;
use crate::identifier::ConfigError;
use crate::model::ArgMetaInfo;

/// Binds an `ArgMetaInfo` to a `DataColumn`. The pair must be
/// type-coalescable; the effective descriptor stored here is
/// the union of "always known" and collection semantics from both sides.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgColumnAssignment {
    arg_meta_info: ArgMetaInfo,
    data_column: DataColumn,
}

impl ArgColumnAssignment {
    pub fn new(arg: ArgMetaInfo, column: DataColumn) -> Result<Self, ConfigError> {
        if !coalescence::is_coalescable(arg.arg_type(), column.column_type().sql_type()) {
            return Err(ConfigError::NotCoalescable {
                logical: arg.arg_type().to_string(),
                sql: column.column_type().name().to_string(),
            });
        }
        let effective = ArgMetaInfo::new(
            arg.arg_name().to_string(),
            arg.arg_type(),
            arg.is_always_known() || column.is_always_known(),
            arg.is_collection() || column.is_multi_row(),
        );
        Ok(Self {
            arg_meta_info: effective,
            data_column: column,
        })
    }

    pub fn arg_meta_info(&self) -> &ArgMetaInfo {
        &self.arg_meta_info
    }

    pub fn data_column(&self) -> &DataColumn {
        &self.data_column
    }

    /// Rebinds this assignment onto a different argument name, keeping
    /// the data column and always-known/collection semantics. Used by
    /// `DefaultAutoMappingPolicy::map` to turn a template assignment into
    /// a concrete one for the argument name actually looked up.
    pub fn with_arg_name(&self, arg_name: impl Into<String>) -> Self {
        Self {
            arg_meta_info: self.arg_meta_info.with_arg_name(arg_name),
            data_column: self.data_column.clone(),
        }
    }
}
