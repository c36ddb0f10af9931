//! Builder DSL invariant violations, exercised from outside the crate
//! against the public API only — the teacher's own `tests/integration.rs`
//! drives its lint pipeline the same way, through public entry points
//! rather than `#[cfg(test)]`-only internals.

use audlang_sql_core::config::{MultiTableConfig, SingleTableConfig};
use audlang_sql_core::identifier::{self, ConfigError};
use audlang_sql_core::model::{AdlSqlType, AudlangType};

#[test]
fn duplicate_table_filter_is_rejected() {
    let result = SingleTableConfig::builder("ACCOUNT")
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
fn duplicate_argument_mapping_within_a_table_is_rejected() {
    let result = SingleTableConfig::builder("ACCOUNT")
        .id_column("ID")
        .unwrap()
        .data_column("d1", AdlSqlType::varchar())
        .mapped_to_arg_name("name", AudlangType::String)
        .end_column()
        .unwrap()
        .data_column("d2", AdlSqlType::varchar())
        .mapped_to_arg_name("name", AudlangType::String)
        .end_column();
    assert!(matches!(
        result,
        Err(ConfigError::DuplicateArgumentAssignment { .. })
    ));
}

#[test]
fn duplicate_argument_mapping_across_tables_is_rejected() {
    let t1 = SingleTableConfig::builder("T1")
        .id_column("ID")
        .unwrap()
        .data_column("d1", AdlSqlType::varchar())
        .mapped_to_arg_name("shared", AudlangType::String)
        .end_column()
        .unwrap()
        .get()
        .unwrap();
    let t2 = SingleTableConfig::builder("T2")
        .id_column("ID")
        .unwrap()
        .data_column("d1", AdlSqlType::varchar())
        .mapped_to_arg_name("shared", AudlangType::String)
        .end_column()
        .unwrap()
        .get()
        .unwrap();

    let result = MultiTableConfig::builder().add_table(t1).unwrap().add_table(t2);
    assert!(matches!(
        result,
        Err(ConfigError::DuplicateGlobalArgumentMapping { .. })
    ));
}

#[test]
fn two_primary_tables_is_rejected() {
    let primary = |name: &str| {
        SingleTableConfig::builder(name)
            .as_primary_table()
            .id_column("ID")
            .unwrap()
            .data_column("d1", AdlSqlType::varchar())
            .mapped_to_arg_name(format!("{name}_arg"), AudlangType::String)
            .end_column()
            .unwrap()
            .get()
            .unwrap()
    };
    let result = MultiTableConfig::builder()
        .add_table(primary("T1"))
        .unwrap()
        .add_table(primary("T2"));
    assert!(matches!(result, Err(ConfigError::MultiplePrimaryTables { .. })));
}

#[test]
fn unique_ids_table_rejects_a_multi_row_column() {
    let result = SingleTableConfig::builder("ACCOUNT")
        .with_unique_ids()
        .id_column("ID")
        .unwrap()
        .data_column("tags", AdlSqlType::varchar())
        .mapped_to_arg_name("tag", AudlangType::String)
        .multi_row()
        .end_column()
        .unwrap()
        .get();
    assert!(matches!(result, Err(ConfigError::UniqueIdsForbidMultiRow { .. })));
}

#[test]
fn unknown_identifier_forms_are_rejected() {
    assert!(identifier::validate_table_name("").is_err());
    assert!(identifier::validate_table_name("has space").is_err());
    assert!(identifier::validate_table_name("public.sub.table").is_err());
    assert!(identifier::validate_column_name("schema.col").is_err());
    assert!(identifier::validate_column_name("`").is_err());
    assert!(identifier::validate_arg_name("   ").is_err());
}

#[test]
fn backtick_quoted_identifiers_and_schema_qualified_tables_are_accepted() {
    assert!(identifier::validate_table_name("public.accounts").is_ok());
    assert!(identifier::validate_table_name("`weird table!`").is_ok());
    assert!(identifier::validate_column_name("`col with spaces`").is_ok());
}
