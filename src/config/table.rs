//! Single physical table configuration and its builder DSL.

use crate::automap::{self, SharedAutoMappingPolicy};
use crate::config::assignment::ArgColumnAssignment;
use crate::config::column::DataColumn;
use crate::config::filter::FilterColumn;
use crate::config::nature::TableNature;
use crate::context::ProcessContext;
use crate::identifier::{self, ConfigError, LookupError};
use crate::model::{AdlSqlType, ArgMetaInfo, AudlangType};
use std::collections::HashMap;

/// One physical table: its id column, nature, table-scoped filters, and
/// the argument→column assignments it owns. Immutable once built; the
/// only path to an instance is [`SingleTableConfig::builder`].
#[derive(Clone)]
pub struct SingleTableConfig {
    table_name: String,
    id_column_name: String,
    table_nature: TableNature,
    table_filters: Vec<FilterColumn>,
    arg_column_map: HashMap<String, ArgColumnAssignment>,
    auto_mapping_policy: SharedAutoMappingPolicy,
}

impl std::fmt::Debug for SingleTableConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SingleTableConfig")
            .field("table_name", &self.table_name)
            .field("id_column_name", &self.id_column_name)
            .field("table_nature", &self.table_nature)
            .field("table_filters", &self.table_filters)
            .field("arg_column_map", &self.arg_column_map)
            .finish()
    }
}

impl PartialEq for SingleTableConfig {
    fn eq(&self, other: &Self) -> bool {
        self.table_name == other.table_name
            && self.id_column_name == other.id_column_name
            && self.table_nature == other.table_nature
            && self.table_filters == other.table_filters
            && self.arg_column_map == other.arg_column_map
    }
}

impl SingleTableConfig {
    pub fn builder(table_name: impl Into<String>) -> SingleTableConfigBuilder {
        SingleTableConfigBuilder::new(table_name)
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn id_column_name(&self) -> &str {
        &self.id_column_name
    }

    pub fn table_nature(&self) -> TableNature {
        self.table_nature
    }

    pub fn table_filters(&self) -> &[FilterColumn] {
        &self.table_filters
    }

    pub fn arg_column_map(&self) -> &HashMap<String, ArgColumnAssignment> {
        &self.arg_column_map
    }

    pub fn number_of_tables(&self) -> usize {
        1
    }

    pub fn is_always_known(&self, arg_name: &str) -> bool {
        self.arg_column_map
            .get(arg_name)
            .is_some_and(|a| a.arg_meta_info().is_always_known())
    }

    pub fn is_collection(&self, arg_name: &str) -> bool {
        self.arg_column_map
            .get(arg_name)
            .is_some_and(|a| a.arg_meta_info().is_collection())
    }

    /// Lookup algorithm: a direct mapping wins; otherwise an
    /// applicable auto-mapping policy is consulted; otherwise a
    /// `LookupError`.
    pub fn lookup_assignment(&self, arg_name: &str, ctx: &mut ProcessContext) -> Result<ArgColumnAssignment, LookupError> {
        if let Some(assignment) = self.arg_column_map.get(arg_name) {
            return Ok(assignment.clone());
        }
        if self.auto_mapping_policy.is_applicable(arg_name) {
            return self
                .auto_mapping_policy
                .map(arg_name, ctx)
                .map_err(|_| LookupError {
                    arg_name: arg_name.to_string(),
                });
        }
        Err(LookupError {
            arg_name: arg_name.to_string(),
        })
    }
}

enum ColumnMapping {
    Arg(ArgMetaInfo),
    AutoMapped(SharedAutoMappingPolicy),
    None,
}

/// Side-effect-free builder chain for [`SingleTableConfig`]. Each
/// terminal `get()` snapshot-validates and returns an immutable value
///.
pub struct SingleTableConfigBuilder {
    table_name: String,
    id_column_name: Option<String>,
    is_primary: bool,
    contains_all_ids: bool,
    sparse: bool,
    unique_ids: bool,
    table_filters: Vec<FilterColumn>,
    assignments: Vec<(String, ArgColumnAssignment)>,
    auto_mapping_policy: SharedAutoMappingPolicy,
}

impl SingleTableConfigBuilder {
    fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            id_column_name: None,
            is_primary: false,
            contains_all_ids: false,
            sparse: false,
            unique_ids: false,
            table_filters: Vec::new(),
            assignments: Vec::new(),
            auto_mapping_policy: automap::none(),
        }
    }

    pub fn as_primary_table(mut self) -> Self {
        self.is_primary = true;
        self
    }

    pub fn that_contains_all_ids(mut self) -> Self {
        self.contains_all_ids = true;
        self
    }

    pub fn with_unique_ids(mut self) -> Self {
        self.unique_ids = true;
        self
    }

    pub fn with_sparse_data(mut self) -> Self {
        self.sparse = true;
        self
    }

    pub fn filtered_by(
        mut self,
        column_name: impl Into<String>,
        column_type: AdlSqlType,
        filter_value: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let filter = FilterColumn::new(self.table_name.clone(), column_name, column_type, filter_value)?;
        self.table_filters.push(filter);
        Ok(self)
    }

    pub fn id_column(mut self, id_column_name: impl Into<String>) -> Result<Self, ConfigError> {
        let id_column_name = id_column_name.into();
        identifier::validate_column_name(&id_column_name)?;
        self.id_column_name = Some(id_column_name);
        Ok(self)
    }

    pub fn auto_mapping_policy(mut self, policy: SharedAutoMappingPolicy) -> Self {
        self.auto_mapping_policy = policy;
        self
    }

    pub fn data_column(self, column_name: impl Into<String>, column_type: AdlSqlType) -> DataColumnBuilder {
        DataColumnBuilder {
            table_name: self.table_name.clone(),
            column_name: column_name.into(),
            column_type,
            is_always_known: false,
            is_multi_row: false,
            filters: Vec::new(),
            mapping: ColumnMapping::None,
            parent: self,
        }
    }

    pub fn get(self) -> Result<SingleTableConfig, ConfigError> {
        identifier::validate_table_name(&self.table_name)?;
        let id_column_name = self.id_column_name.ok_or_else(|| ConfigError::MissingIdColumn {
            table_name: self.table_name.clone(),
        })?;

        for (_, assignment) in &self.assignments {
            if assignment.data_column().column_name() == id_column_name {
                return Err(ConfigError::IdColumnCollision {
                    table_name: self.table_name.clone(),
                    id_column: id_column_name,
                });
            }
        }

        let mut seen_table_filters = std::collections::HashSet::new();
        for filter in &self.table_filters {
            if !seen_table_filters.insert(filter.column_name()) {
                return Err(ConfigError::DuplicateFilterColumn {
                    table_name: self.table_name.clone(),
                    column_name: filter.column_name().to_string(),
                });
            }
        }

        for filter in &self.table_filters {
            if filter.column_name() == id_column_name {
                return Err(ConfigError::IdColumnCollision {
                    table_name: self.table_name.clone(),
                    id_column: id_column_name,
                });
            }
            if self
                .assignments
                .iter()
                .any(|(_, a)| a.data_column().column_name() == filter.column_name())
            {
                return Err(ConfigError::DuplicateFilterColumn {
                    table_name: self.table_name.clone(),
                    column_name: filter.column_name().to_string(),
                });
            }
        }

        let mut arg_column_map = HashMap::new();
        let mut any_always_known_column = false;
        for (arg_name, assignment) in self.assignments {
            if self.unique_ids && assignment.data_column().is_multi_row() {
                return Err(ConfigError::UniqueIdsForbidMultiRow {
                    table_name: self.table_name.clone(),
                    column_name: assignment.data_column().column_name().to_string(),
                });
            }
            if assignment.data_column().is_always_known() {
                any_always_known_column = true;
            }
            arg_column_map.insert(arg_name, assignment);
        }

        let contains_all_ids = self.contains_all_ids || self.is_primary || any_always_known_column;
        let table_nature = TableNature::custom(self.is_primary, contains_all_ids, self.sparse, self.unique_ids);

        Ok(SingleTableConfig {
            table_name: self.table_name,
            id_column_name,
            table_nature,
            table_filters: self.table_filters,
            arg_column_map,
            auto_mapping_policy: self.auto_mapping_policy,
        })
    }
}

/// Builder for one data column, reached via
/// [`SingleTableConfigBuilder::data_column`]. `end_column` validates and
/// folds the completed column back into the parent table builder.
pub struct DataColumnBuilder {
    parent: SingleTableConfigBuilder,
    table_name: String,
    column_name: String,
    column_type: AdlSqlType,
    is_always_known: bool,
    is_multi_row: bool,
    filters: Vec<FilterColumn>,
    mapping: ColumnMapping,
}

impl DataColumnBuilder {
    pub fn always_known(mut self) -> Self {
        self.is_always_known = true;
        self
    }

    pub fn multi_row(mut self) -> Self {
        self.is_multi_row = true;
        self
    }

    pub fn filtered_by(
        mut self,
        column_name: impl Into<String>,
        column_type: AdlSqlType,
        filter_value: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let filter = FilterColumn::new(self.table_name.clone(), column_name, column_type, filter_value)?;
        self.filters.push(filter);
        Ok(self)
    }

    /// Maps this column to `arg_name` with the given logical type.
    /// `is_always_known`/`is_collection` describe the *argument's own*
    /// semantics (before unioning with this column's flags, which
    /// `ArgColumnAssignment::new` does automatically).
    pub fn mapped_to_arg_name_full(
        mut self,
        arg_name: impl Into<String>,
        arg_type: AudlangType,
        is_always_known: bool,
        is_collection: bool,
    ) -> Self {
        let arg_name = arg_name.into();
        self.mapping = ColumnMapping::Arg(ArgMetaInfo::new(arg_name, arg_type, is_always_known, is_collection));
        self
    }

    pub fn mapped_to_arg_name(self, arg_name: impl Into<String>, arg_type: AudlangType) -> Self {
        self.mapped_to_arg_name_full(arg_name, arg_type, false, false)
    }

    pub fn auto_mapped(mut self, policy: SharedAutoMappingPolicy) -> Self {
        self.mapping = ColumnMapping::AutoMapped(policy);
        self
    }

    pub fn end_column(self) -> Result<SingleTableConfigBuilder, ConfigError> {
        let mut parent = self.parent;
        let column = DataColumn::new(
            self.table_name,
            self.column_name,
            self.column_type,
            self.is_always_known,
            self.is_multi_row,
            self.filters,
            parent.id_column_name.as_deref().unwrap_or(""),
        )?;

        match self.mapping {
            ColumnMapping::Arg(arg) => {
                let arg_name = arg.arg_name().to_string();
                if parent.assignments.iter().any(|(name, _)| name == &arg_name) {
                    return Err(ConfigError::DuplicateArgumentAssignment {
                        table_name: column.table_name().to_string(),
                        arg_name,
                    });
                }
                let assignment = ArgColumnAssignment::new(arg, column)?;
                parent.assignments.push((arg_name, assignment));
            }
            ColumnMapping::AutoMapped(policy) => {
                parent.auto_mapping_policy = policy;
            }
            ColumnMapping::None => {}
        }
        Ok(parent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_table_builder_matches_spec_scenario_four() {
        let config = SingleTableConfig::builder("TBL1")
            .as_primary_table()
            .id_column("ID")
            .unwrap()
            .data_column("d1", AdlSqlType::varchar())
            .mapped_to_arg_name("arg1", AudlangType::String)
            .always_known()
            .end_column()
            .unwrap()
            .data_column("d3", AdlSqlType::bit())
            .mapped_to_arg_name("arg8", AudlangType::Integer)
            .multi_row()
            .end_column()
            .unwrap()
            .get()
            .unwrap();

        assert!(config.is_always_known("arg1"));
        assert!(config.is_collection("arg8"));
        assert_eq!(config.number_of_tables(), 1);
        assert!(config.table_nature().contains_all_ids());
    }

    #[test]
    fn missing_id_column_is_a_config_error() {
        let result = SingleTableConfig::builder("TBL1")
            .data_column("d1", AdlSqlType::varchar())
            .mapped_to_arg_name("arg1", AudlangType::String)
            .end_column()
            .unwrap()
            .get();
        assert!(matches!(result, Err(ConfigError::MissingIdColumn { .. })));
    }

    #[test]
    fn duplicate_argument_assignment_is_rejected() {
        let result = SingleTableConfig::builder("TBL1")
            .id_column("ID")
            .unwrap()
            .data_column("d1", AdlSqlType::varchar())
            .mapped_to_arg_name("arg1", AudlangType::String)
            .end_column()
            .unwrap()
            .data_column("d2", AdlSqlType::varchar())
            .mapped_to_arg_name("arg1", AudlangType::String)
            .end_column();
        assert!(matches!(
            result,
            Err(ConfigError::DuplicateArgumentAssignment { .. })
        ));
    }

    #[test]
    fn duplicate_table_filter_column_is_rejected() {
        let result = SingleTableConfig::builder("TBL1")
            .filtered_by("tenant", AdlSqlType::varchar(), "acme")
            .unwrap()
            .filtered_by("tenant", AdlSqlType::varchar(), "other")
            .unwrap()
            .id_column("ID")
            .unwrap()
            .get();
        assert!(matches!(result, Err(ConfigError::DuplicateFilterColumn { .. })));
    }

    #[test]
    fn unique_ids_forbids_multi_row_assignment() {
        let result = SingleTableConfig::builder("TBL1")
            .with_unique_ids()
            .id_column("ID")
            .unwrap()
            .data_column("d1", AdlSqlType::varchar())
            .mapped_to_arg_name("arg1", AudlangType::String)
            .multi_row()
            .end_column()
            .unwrap()
            .get();
        assert!(matches!(
            result,
            Err(ConfigError::UniqueIdsForbidMultiRow { .. })
        ));
    }

    #[test]
    fn always_known_column_forces_contains_all_ids() {
        let config = SingleTableConfig::builder("SUBSET")
            .id_column("ID")
            .unwrap()
            .data_column("d1", AdlSqlType::varchar())
            .mapped_to_arg_name("arg1", AudlangType::String)
            .always_known()
            .end_column()
            .unwrap()
            .get()
            .unwrap();
        assert!(config.table_nature().contains_all_ids());
        assert!(!config.table_nature().is_primary());
    }

    #[test]
    fn auto_mapping_policy_is_consulted_when_no_direct_mapping_exists() {
        let template_arg = ArgMetaInfo::new("template", AudlangType::Integer, false, false);
        let template_col = DataColumn::new("T", "d5", AdlSqlType::integer(), false, false, vec![], "ID").unwrap();
        let template_assignment = ArgColumnAssignment::new(template_arg, template_col).unwrap();
        let policy = std::sync::Arc::new(crate::automap::DefaultAutoMappingPolicy::new(
            "int-suffix",
            |arg_name: &str| arg_name.strip_suffix(".int").map(str::to_string),
            template_assignment,
        ));

        let config = SingleTableConfig::builder("T")
            .id_column("ID")
            .unwrap()
            .auto_mapping_policy(policy)
            .get()
            .unwrap();

        let mut ctx = ProcessContext::new();
        let assignment = config.lookup_assignment("foo.int", &mut ctx).unwrap();
        assert_eq!(assignment.data_column().column_name(), "d5");
        assert_eq!(
            ctx.get_variable(ProcessContext::local_arg_name_key()).unwrap(),
            "foo"
        );

        assert!(config.lookup_assignment("unmapped", &mut ProcessContext::new()).is_err());
    }
}
