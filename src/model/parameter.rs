//! Query parameters and the positional-statement sink
//!
//! `QueryParameter` is the typed value carrier bound into a query template.
//! Coalescence (`crate::coalescence::coalesce`) runs once, at construction,
//! so that a malformed value is rejected eagerly rather than surfacing
//! lazily at render time — the same "fail fast at construction" posture
//! the configuration builders use (see `crate::config::table::SingleTableConfigBuilder`).

use crate::coalescence::{self, FormattingError, TypedValue};
use crate::model::arg_meta::ArgMetaInfo;
use crate::model::sql_type::AdlSqlType;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_PARAMETER_SEQ: AtomicU64 = AtomicU64::new(1001);

/// Default parameter id scheme: `P_1001`, `P_1002`, ... A process-wide
/// monotonic counter backs this. Tests that depend on stable
/// ids must call [`reset_id_sequence`] first.
pub fn next_default_id() -> String {
    format!("P_{}", NEXT_PARAMETER_SEQ.fetch_add(1, Ordering::Relaxed))
}

/// Resets the monotonic id counter to its initial value. Exposed
/// unconditionally (not gated behind `#[cfg(test)]`) since multiple
/// integration-test binaries need deterministic ids and a plain public
/// reset carries no production risk.
pub fn reset_id_sequence() {
    NEXT_PARAMETER_SEQ.store(1001, Ordering::Relaxed);
}

/// The Audlang match operator a parameter was created for, including its
/// negated forms. The compiler that produces atomic match tuples is an
/// external collaborator; this enum is the minimal shared
/// vocabulary the core needs to know whether a contains-policy applies and
/// how to render negation in debug output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchOperator {
    Equals,
    NotEquals,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    Contains,
    NotContains,
    Between,
    NotBetween,
    IsUnknown,
    IsKnown,
}

impl MatchOperator {
    pub fn is_negated(&self) -> bool {
        matches!(
            self,
            MatchOperator::NotEquals
                | MatchOperator::NotContains
                | MatchOperator::NotBetween
                | MatchOperator::IsKnown
        )
    }

    pub fn requires_contains_policy(&self) -> bool {
        matches!(self, MatchOperator::Contains | MatchOperator::NotContains)
    }

    pub fn requires_ordering(&self) -> bool {
        matches!(
            self,
            MatchOperator::LessThan
                | MatchOperator::LessThanOrEqual
                | MatchOperator::GreaterThan
                | MatchOperator::GreaterThanOrEqual
                | MatchOperator::Between
                | MatchOperator::NotBetween
        )
    }
}

/// A single typed value carrier bound into a query template.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryParameter {
    id: String,
    arg_meta_info: ArgMetaInfo,
    value: Option<String>,
    operator: MatchOperator,
    sql_type: AdlSqlType,
    /// The undecorated literal coalescence produced, kept around only to
    /// feed `sql_type.decorate(...)` in `to_debug_string`. Never used for
    /// binding — `typed` is the bind source of truth.
    bind_literal: String,
    /// The coalesced, already-typed value. `apply()` binds straight from
    /// this instead of re-deriving a type from `value`/`bind_literal`, so
    /// it can't disagree with what `coalesce()` actually decided.
    typed: TypedValue,
}

impl QueryParameter {
    /// Creates a parameter with an auto-generated `P_<seq>` id, eagerly
    /// coalescing `value` against `sql_type`. Returns a `FormattingError`
    /// if the pair is not coalescable.
    pub fn new(
        arg_meta_info: ArgMetaInfo,
        value: Option<String>,
        operator: MatchOperator,
        sql_type: AdlSqlType,
    ) -> Result<Self, FormattingError> {
        Self::with_id(next_default_id(), arg_meta_info, value, operator, sql_type)
    }

    /// Creates a parameter with an explicit id. Used when a caller needs
    /// stable, deterministic ids across test runs instead of the global
    /// counter.
    pub fn with_id(
        id: impl Into<String>,
        arg_meta_info: ArgMetaInfo,
        value: Option<String>,
        operator: MatchOperator,
        sql_type: AdlSqlType,
    ) -> Result<Self, FormattingError> {
        let rendered = coalescence::coalesce(arg_meta_info.arg_type(), sql_type.sql_type(), value.as_deref())?;
        Ok(Self {
            id: id.into(),
            arg_meta_info,
            value,
            operator,
            sql_type,
            bind_literal: rendered.literal,
            typed: rendered.typed,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn arg_meta_info(&self) -> &ArgMetaInfo {
        &self.arg_meta_info
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn operator(&self) -> MatchOperator {
        self.operator
    }

    pub fn sql_type(&self) -> &AdlSqlType {
        &self.sql_type
    }

    /// The debug-safe SQL literal, decoration applied. This output must
    /// never be executed against a live database.
    pub fn to_debug_string(&self) -> String {
        self.sql_type.decorate(&self.bind_literal)
    }

    /// Binds this parameter to `sink` at 1-based position `position`,
    /// delegating to the typed setter matching the value `coalesce()`
    /// already produced. Decoration never reaches here: it changes only
    /// `to_debug_string`'s rendering.
    pub fn apply(
        &self,
        sink: &mut dyn PreparedStatementSink,
        position: usize,
    ) -> Result<(), FormattingError> {
        match &self.typed {
            TypedValue::Null => sink.set_null(position, self.sql_type.jdbc_code()),
            TypedValue::Bit(v) => sink.set_bit(position, *v),
            TypedValue::Boolean(v) => sink.set_boolean(position, *v),
            TypedValue::TinyInt(v) => sink.set_byte(position, *v),
            TypedValue::SmallInt(v) => sink.set_short(position, *v),
            TypedValue::Int(v) => sink.set_int(position, *v),
            TypedValue::Long(v) => sink.set_long(position, *v),
            TypedValue::Float(v) => sink.set_float(position, *v),
            TypedValue::Double(v) => sink.set_double(position, *v),
            TypedValue::Decimal(v) => sink.set_big_decimal(position, v),
            TypedValue::Text(v) => sink.set_string(position, v),
            TypedValue::Date(v) => sink.set_date(position, *v),
            TypedValue::Timestamp(v) => sink.set_timestamp(position, *v),
        }
        Ok(())
    }
}

/// Rust analog of a JDBC `PreparedStatement`: a positional sink with one
/// typed setter per SQL type family. Implementations own the
/// actual driver call; the core only ever writes through this trait.
pub trait PreparedStatementSink {
    fn set_bit(&mut self, position: usize, value: bool);
    fn set_boolean(&mut self, position: usize, value: bool);
    fn set_byte(&mut self, position: usize, value: i8);
    fn set_short(&mut self, position: usize, value: i16);
    fn set_int(&mut self, position: usize, value: i32);
    fn set_long(&mut self, position: usize, value: i64);
    fn set_float(&mut self, position: usize, value: f32);
    fn set_double(&mut self, position: usize, value: f64);
    fn set_big_decimal(&mut self, position: usize, value: &str);
    fn set_string(&mut self, position: usize, value: &str);
    fn set_date(&mut self, position: usize, value: NaiveDate);
    fn set_timestamp(&mut self, position: usize, value: NaiveDateTime);
    fn set_null(&mut self, position: usize, jdbc_code: i32);
}
