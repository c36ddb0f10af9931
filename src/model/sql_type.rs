//! SQL-side type family
//!
//! `SqlType` is a tagged variant over the JDBC type family this crate
//! understands. Interface dispatch in the source (formatter / creator /
//! applicator objects) becomes pure functions keyed on the variant — see
//! `crate::coalescence` for `create` and `crate::template::resolve` for
//! `bind`. `AdlSqlType` is the value actually stored on a column: a
//! `SqlType` plus an optional decoration that overrides the default debug
//! formatter.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use strum_macros::EnumIter;

/// The full JDBC type family this crate understands. Ordering here is
/// cosmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Serialize, Deserialize)]
pub enum SqlType {
    Bit,
    Boolean,
    TinyInt,
    SmallInt,
    Integer,
    BigInt,
    Real,
    Float,
    Double,
    Numeric,
    Decimal,
    Char,
    Varchar,
    NChar,
    NVarchar,
    LongVarChar,
    LongNVarChar,
    Date,
    Timestamp,
}

impl SqlType {
    pub fn name(&self) -> &'static str {
        match self {
            SqlType::Bit => "BIT",
            SqlType::Boolean => "BOOLEAN",
            SqlType::TinyInt => "TINYINT",
            SqlType::SmallInt => "SMALLINT",
            SqlType::Integer => "INTEGER",
            SqlType::BigInt => "BIGINT",
            SqlType::Real => "REAL",
            SqlType::Float => "FLOAT",
            SqlType::Double => "DOUBLE",
            SqlType::Numeric => "NUMERIC",
            SqlType::Decimal => "DECIMAL",
            SqlType::Char => "CHAR",
            SqlType::Varchar => "VARCHAR",
            SqlType::NChar => "NCHAR",
            SqlType::NVarchar => "NVARCHAR",
            SqlType::LongVarChar => "LONGVARCHAR",
            SqlType::LongNVarChar => "LONGNVARCHAR",
            SqlType::Date => "DATE",
            SqlType::Timestamp => "TIMESTAMP",
        }
    }

    /// `java.sql.Types` code for this variant.
    pub fn jdbc_code(&self) -> i32 {
        match self {
            SqlType::Bit => -7,
            SqlType::Boolean => 16,
            SqlType::TinyInt => -6,
            SqlType::SmallInt => 5,
            SqlType::Integer => 4,
            SqlType::BigInt => -5,
            SqlType::Real => 7,
            SqlType::Float => 6,
            SqlType::Double => 8,
            SqlType::Numeric => 2,
            SqlType::Decimal => 3,
            SqlType::Char => 1,
            SqlType::Varchar => 12,
            SqlType::NChar => -15,
            SqlType::NVarchar => -9,
            SqlType::LongVarChar => -1,
            SqlType::LongNVarChar => -16,
            SqlType::Date => 91,
            SqlType::Timestamp => 93,
        }
    }

    pub fn is_integer_family(&self) -> bool {
        matches!(
            self,
            SqlType::TinyInt | SqlType::SmallInt | SqlType::Integer | SqlType::BigInt
        )
    }

    pub fn is_decimal_family(&self) -> bool {
        matches!(
            self,
            SqlType::Numeric | SqlType::Decimal | SqlType::Float | SqlType::Real | SqlType::Double
        )
    }

    pub fn is_char_family(&self) -> bool {
        matches!(
            self,
            SqlType::Char
                | SqlType::Varchar
                | SqlType::NChar
                | SqlType::NVarchar
                | SqlType::LongVarChar
                | SqlType::LongNVarChar
        )
    }

    pub fn is_bit_or_boolean(&self) -> bool {
        matches!(self, SqlType::Bit | SqlType::Boolean)
    }

    /// `<` / `>` / `BETWEEN` are only meaningful for ordered domains:
    /// numbers, dates and timestamps. Character and boolean families do
    /// not support them.
    pub fn supports_less_than_greater_than(&self) -> bool {
        self.is_integer_family()
            || self.is_decimal_family()
            || matches!(self, SqlType::Date | SqlType::Timestamp)
    }

    /// `CONTAINS` only makes sense against a textual column.
    pub fn supports_contains(&self) -> bool {
        self.is_char_family()
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

type FormatterOverride = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// The SQL-side type actually attached to a column: a `SqlType` plus an
/// optional decoration replacing the default debug-literal formatter.
/// Decorating never changes `jdbc_code`, capability flags, or the
/// coalescence matrix in `crate::coalescence` — only how an already-coalesced
/// value is rendered for `applyUnsafe`.
#[derive(Clone)]
pub struct AdlSqlType {
    sql_type: SqlType,
    formatter_override: Option<FormatterOverride>,
}

impl fmt::Debug for AdlSqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdlSqlType")
            .field("sql_type", &self.sql_type)
            .field("decorated", &self.formatter_override.is_some())
            .finish()
    }
}

impl PartialEq for AdlSqlType {
    fn eq(&self, other: &Self) -> bool {
        self.sql_type == other.sql_type
    }
}
impl Eq for AdlSqlType {}

impl AdlSqlType {
    pub fn new(sql_type: SqlType) -> Self {
        Self {
            sql_type,
            formatter_override: None,
        }
    }

    /// Decorates this type with a replacement debug formatter, keeping the
    /// JDBC code and capability flags of the wrapped type.
    pub fn with_formatter<F>(&self, formatter: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Self {
            sql_type: self.sql_type,
            formatter_override: Some(Arc::new(formatter)),
        }
    }

    pub fn sql_type(&self) -> SqlType {
        self.sql_type
    }

    pub fn name(&self) -> &'static str {
        self.sql_type.name()
    }

    pub fn jdbc_code(&self) -> i32 {
        self.sql_type.jdbc_code()
    }

    pub fn supports_less_than_greater_than(&self) -> bool {
        self.sql_type.supports_less_than_greater_than()
    }

    pub fn supports_contains(&self) -> bool {
        self.sql_type.supports_contains()
    }

    /// Applies the decoration (if any) to an already-rendered literal.
    /// Called by `QueryParameter::to_debug_string` after coalescence has
    /// produced the canonical literal for the wrapped `sql_type`.
    pub fn decorate(&self, rendered: &str) -> String {
        match &self.formatter_override {
            Some(f) => f(rendered),
            None => rendered.to_string(),
        }
    }
}

macro_rules! adl_sql_type_const {
    ($fn_name:ident, $variant:ident) => {
        impl AdlSqlType {
            pub fn $fn_name() -> Self {
                Self::new(SqlType::$variant)
            }
        }
    };
}

adl_sql_type_const!(bit, Bit);
adl_sql_type_const!(boolean, Boolean);
adl_sql_type_const!(tinyint, TinyInt);
adl_sql_type_const!(smallint, SmallInt);
adl_sql_type_const!(integer, Integer);
adl_sql_type_const!(bigint, BigInt);
adl_sql_type_const!(real, Real);
adl_sql_type_const!(float, Float);
adl_sql_type_const!(double, Double);
adl_sql_type_const!(numeric, Numeric);
adl_sql_type_const!(decimal, Decimal);
adl_sql_type_const!(char, Char);
adl_sql_type_const!(varchar, Varchar);
adl_sql_type_const!(nchar, NChar);
adl_sql_type_const!(nvarchar, NVarchar);
adl_sql_type_const!(longvarchar, LongVarChar);
adl_sql_type_const!(longnvarchar, LongNVarChar);
adl_sql_type_const!(date, Date);
adl_sql_type_const!(timestamp, Timestamp);

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn enumerates_all_nineteen_jdbc_types() {
        assert_eq!(SqlType::iter().count(), 19);
    }

    #[test]
    fn char_family_supports_contains_but_not_ordering() {
        assert!(SqlType::Varchar.supports_contains());
        assert!(!SqlType::Varchar.supports_less_than_greater_than());
    }

    #[test]
    fn numeric_family_supports_ordering_but_not_contains() {
        assert!(SqlType::Decimal.supports_less_than_greater_than());
        assert!(!SqlType::Decimal.supports_contains());
    }

    #[test]
    fn decoration_overrides_only_rendering() {
        let base = AdlSqlType::varchar();
        let decorated = base.with_formatter(|s| format!("<<{s}>>"));
        assert_eq!(decorated.decorate("foo"), "<<foo>>");
        assert_eq!(decorated.jdbc_code(), base.jdbc_code());
        assert_eq!(decorated.sql_type(), SqlType::Varchar);
    }
}
