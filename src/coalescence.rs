//! Type coalescence engine
//!
//! Implements the logical-type × SQL-type conversion matrix: given a
//! canonical textual value typed as an `AudlangType` and a target
//! `SqlType`, produce both a debug-renderable SQL literal and a typed
//! value ready for prepared-statement binding, or fail with a
//! `FormattingError`. Null values always short-circuit before the matrix
//! is consulted.
//!
//! Decimal precision work is delegated to `bigdecimal` for exact-precision
//! rounding; date/timestamp work is delegated to `chrono` for strict
//! ISO-8601 parsing and epoch conversion. Everything else — range checks,
//! the boolean/quote/epoch formatting rules — is plain string and integer
//! arithmetic.

use crate::model::arg_meta::AudlangType;
use crate::model::sql_type::SqlType;
use bigdecimal::{BigDecimal, RoundingMode, ToPrimitive};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::str::FromStr;
use thiserror::Error;

/// DECIMAL/NUMERIC/REAL/DOUBLE round half-up to this many fractional
/// digits. FLOAT gets a narrower budget (`FLOAT_SCALE`). The worked
/// boundary example `97834.7759871` -> `97834.775987` is the ground
/// truth this constant was picked to match; see DESIGN.md for the
/// reasoning behind resolving a "preserves 7 digits" description against
/// that concrete 6-digit result.
const DECIMAL_SCALE: i64 = 6;
const FLOAT_SCALE: i64 = 3;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum FormattingError {
    #[error("no coalescence rule from logical type {logical} to SQL type {sql}")]
    UnsupportedPair { logical: AudlangType, sql: SqlType },

    #[error("value '{value}' is not a valid {logical} literal")]
    MalformedLiteral { logical: AudlangType, value: String },

    #[error("value '{value}' is not a valid boolean literal (expected 0, 1, TRUE or FALSE)")]
    InvalidBooleanLiteral { value: String },

    #[error("value '{value}' is not a valid ISO-8601 date (expected YYYY-MM-DD)")]
    InvalidDate { value: String },

    #[error(
        "value '{value}' is not a valid timestamp (expected YYYY-MM-DD, YYYY-MM-DD hh:mm:ss, or an epoch-ms integer)"
    )]
    InvalidTimestamp { value: String },

    #[error("value {value} overflows {sql} (valid range {min}..={max})")]
    IntegerOverflow {
        sql: SqlType,
        value: String,
        min: i64,
        max: i64,
    },
}

/// A value that has passed coalescence: a debug literal plus a typed form
/// ready for `PreparedStatementSink` binding.
#[derive(Debug, Clone, PartialEq)]
pub struct Coalesced {
    pub literal: String,
    pub typed: TypedValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Null,
    Bit(bool),
    Boolean(bool),
    TinyInt(i8),
    SmallInt(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Decimal(String),
    Text(String),
    Date(NaiveDate),
    Timestamp(NaiveDateTime),
}

/// Reports whether the logical/SQL pair has any defined conversion in the
/// matrix, independent of any particular value. Used by
/// `ArgColumnAssignment::new` to validate a mapping at configuration time,
/// before any concrete value is ever coalesced.
pub fn is_coalescable(logical: AudlangType, sql: SqlType) -> bool {
    match logical {
        AudlangType::Bool => sql.is_bit_or_boolean() || sql.is_integer_family() || sql.is_char_family(),
        AudlangType::Integer => true,
        AudlangType::Decimal => {
            sql.is_integer_family() || sql.is_decimal_family() || sql.is_char_family() || matches!(sql, SqlType::Date | SqlType::Timestamp)
        }
        AudlangType::Date => {
            sql.is_integer_family()
                || (sql.is_decimal_family() && sql != SqlType::Float)
                || sql.is_char_family()
                || matches!(sql, SqlType::Date | SqlType::Timestamp)
        }
        AudlangType::String => true,
    }
}

/// Coalesces `raw_value` (already the canonical textual form produced by
/// the upstream `ArgValueFormatter`) typed as `logical` into both a debug
/// literal and a bindable typed value for `sql`. `raw_value == None` always
/// yields the literal `NULL`.
pub fn coalesce(
    logical: AudlangType,
    sql: SqlType,
    raw_value: Option<&str>,
) -> Result<Coalesced, FormattingError> {
    let Some(value) = raw_value else {
        return Ok(Coalesced {
            literal: "NULL".to_string(),
            typed: TypedValue::Null,
        });
    };

    match logical {
        AudlangType::Bool => coalesce_bool(sql, value),
        AudlangType::Integer => coalesce_integer(sql, value),
        AudlangType::Decimal => coalesce_decimal(sql, value),
        AudlangType::Date => coalesce_date(sql, value),
        AudlangType::String => coalesce_string(sql, value),
    }
}

fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn parse_bool_loose(value: &str) -> Option<bool> {
    match value {
        "0" => Some(false),
        "1" => Some(true),
        _ if value.eq_ignore_ascii_case("true") => Some(true),
        _ if value.eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    }
}

fn bit_result(b: bool) -> Coalesced {
    Coalesced {
        literal: if b { "1" } else { "0" }.to_string(),
        typed: TypedValue::Bit(b),
    }
}

fn boolean_result(b: bool) -> Coalesced {
    Coalesced {
        literal: if b { "TRUE" } else { "FALSE" }.to_string(),
        typed: TypedValue::Boolean(b),
    }
}

fn int_range(sql: SqlType) -> (i64, i64) {
    match sql {
        SqlType::TinyInt => (-128, 127),
        SqlType::SmallInt => (-32768, 32767),
        SqlType::Integer => (i32::MIN as i64, i32::MAX as i64),
        SqlType::BigInt => (i64::MIN, i64::MAX),
        _ => unreachable!("int_range called for non-integer-family type {sql}"),
    }
}

fn check_int_range(sql: SqlType, v: i64) -> Result<i64, FormattingError> {
    let (min, max) = int_range(sql);
    if v < min || v > max {
        return Err(FormattingError::IntegerOverflow {
            sql,
            value: v.to_string(),
            min,
            max,
        });
    }
    Ok(v)
}

fn integer_result(sql: SqlType, v: i64) -> Coalesced {
    let typed = match sql {
        SqlType::TinyInt => TypedValue::TinyInt(v as i8),
        SqlType::SmallInt => TypedValue::SmallInt(v as i16),
        SqlType::Integer => TypedValue::Int(v as i32),
        SqlType::BigInt => TypedValue::Long(v),
        _ => unreachable!("integer_result called for non-integer-family type {sql}"),
    };
    Coalesced {
        literal: v.to_string(),
        typed,
    }
}

fn parse_i64(value: &str, logical: AudlangType) -> Result<i64, FormattingError> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| FormattingError::MalformedLiteral {
            logical,
            value: value.to_string(),
        })
}

fn parse_decimal(value: &str, logical: AudlangType) -> Result<BigDecimal, FormattingError> {
    BigDecimal::from_str(value.trim()).map_err(|_| FormattingError::MalformedLiteral {
        logical,
        value: value.to_string(),
    })
}

fn decimal_scale_for(sql: SqlType) -> i64 {
    if sql == SqlType::Float {
        FLOAT_SCALE
    } else {
        DECIMAL_SCALE
    }
}

fn render_rounded_decimal(value: &BigDecimal, sql: SqlType) -> String {
    value
        .with_scale_round(decimal_scale_for(sql), RoundingMode::HalfUp)
        .normalized()
        .to_string()
}

fn decimal_result(value: &BigDecimal, sql: SqlType) -> Coalesced {
    let rendered = render_rounded_decimal(value, sql);
    let typed = match sql {
        SqlType::Float => TypedValue::Float(rendered.parse().unwrap_or_default()),
        SqlType::Double => TypedValue::Double(rendered.parse().unwrap_or_default()),
        _ => TypedValue::Decimal(rendered.clone()),
    };
    Coalesced {
        literal: rendered,
        typed,
    }
}

fn decimal_to_i64_truncated(
    value: &BigDecimal,
    logical: AudlangType,
    value_text: &str,
) -> Result<i64, FormattingError> {
    value
        .with_scale_round(0, RoundingMode::Down)
        .to_i64()
        .ok_or_else(|| FormattingError::MalformedLiteral {
            logical,
            value: value_text.to_string(),
        })
}

fn decimal_to_i64_rounded(
    value: &BigDecimal,
    logical: AudlangType,
    value_text: &str,
) -> Result<i64, FormattingError> {
    value
        .with_scale_round(0, RoundingMode::HalfUp)
        .to_i64()
        .ok_or_else(|| FormattingError::MalformedLiteral {
            logical,
            value: value_text.to_string(),
        })
}

pub(crate) fn parse_iso_date(value: &str) -> Result<NaiveDate, FormattingError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| FormattingError::InvalidDate {
        value: value.to_string(),
    })
}

fn date_epoch_seconds(d: NaiveDate) -> i64 {
    d.and_hms_opt(0, 0, 0)
        .expect("midnight is always a valid time")
        .and_utc()
        .timestamp()
}

fn date_epoch_millis(d: NaiveDate) -> i64 {
    d.and_hms_opt(0, 0, 0)
        .expect("midnight is always a valid time")
        .and_utc()
        .timestamp_millis()
}

fn epoch_ms_to_datetime(ms: i64) -> Option<NaiveDateTime> {
    let secs = ms.div_euclid(1000);
    let nanos = (ms.rem_euclid(1000) * 1_000_000) as u32;
    DateTime::from_timestamp(secs, nanos).map(|dt| dt.naive_utc())
}

pub(crate) fn parse_iso_timestamp(value: &str) -> Result<NaiveDateTime, FormattingError> {
    let trimmed = value.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt);
    }
    if let Ok(d) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(d
            .and_hms_opt(0, 0, 0)
            .expect("midnight is always a valid time"));
    }
    if let Ok(ms) = trimmed.parse::<i64>()
        && let Some(dt) = epoch_ms_to_datetime(ms)
    {
        return Ok(dt);
    }
    Err(FormattingError::InvalidTimestamp {
        value: value.to_string(),
    })
}

fn render_date_literal(d: NaiveDate) -> String {
    format!("DATE '{}'", d.format("%Y-%m-%d"))
}

fn render_timestamp_literal(dt: NaiveDateTime) -> String {
    format!("TIMESTAMP '{}'", dt.format("%Y-%m-%d %H:%M:%S"))
}

fn date_result(d: NaiveDate) -> Coalesced {
    Coalesced {
        literal: render_date_literal(d),
        typed: TypedValue::Date(d),
    }
}

fn timestamp_result(dt: NaiveDateTime) -> Coalesced {
    Coalesced {
        literal: render_timestamp_literal(dt),
        typed: TypedValue::Timestamp(dt),
    }
}

fn text_result(value: &str) -> Coalesced {
    Coalesced {
        literal: quote(value),
        typed: TypedValue::Text(value.to_string()),
    }
}

fn coalesce_bool(sql: SqlType, value: &str) -> Result<Coalesced, FormattingError> {
    let b = parse_bool_loose(value).ok_or_else(|| FormattingError::InvalidBooleanLiteral {
        value: value.to_string(),
    })?;
    match sql {
        SqlType::Bit => Ok(bit_result(b)),
        SqlType::Boolean => Ok(boolean_result(b)),
        _ if sql.is_integer_family() => Ok(integer_result(sql, if b { 1 } else { 0 })),
        _ if sql.is_char_family() => Ok(text_result(if b { "TRUE" } else { "FALSE" })),
        _ => Err(FormattingError::UnsupportedPair {
            logical: AudlangType::Bool,
            sql,
        }),
    }
}

fn coalesce_integer(sql: SqlType, value: &str) -> Result<Coalesced, FormattingError> {
    let n = parse_i64(value, AudlangType::Integer)?;
    match sql {
        SqlType::Bit | SqlType::Boolean => {
            if n != 0 && n != 1 {
                return Err(FormattingError::MalformedLiteral {
                    logical: AudlangType::Integer,
                    value: value.to_string(),
                });
            }
            let b = n == 1;
            Ok(if sql == SqlType::Bit {
                bit_result(b)
            } else {
                boolean_result(b)
            })
        }
        _ if sql.is_integer_family() => check_int_range(sql, n).map(|v| integer_result(sql, v)),
        _ if sql.is_decimal_family() => {
            let typed = if sql == SqlType::Float {
                TypedValue::Float(n as f32)
            } else if sql == SqlType::Double {
                TypedValue::Double(n as f64)
            } else {
                TypedValue::Decimal(format!("{n}.0"))
            };
            Ok(Coalesced {
                literal: format!("{n}.0"),
                typed,
            })
        }
        _ if sql.is_char_family() => Ok(text_result(&n.to_string())),
        SqlType::Date => {
            let dt = epoch_ms_to_datetime(n).ok_or_else(|| FormattingError::InvalidDate {
                value: value.to_string(),
            })?;
            Ok(date_result(dt.date()))
        }
        SqlType::Timestamp => {
            let dt = epoch_ms_to_datetime(n).ok_or_else(|| FormattingError::InvalidTimestamp {
                value: value.to_string(),
            })?;
            Ok(timestamp_result(dt))
        }
        _ => unreachable!("all SqlType variants handled above"),
    }
}

fn coalesce_decimal(sql: SqlType, value: &str) -> Result<Coalesced, FormattingError> {
    match sql {
        SqlType::Bit | SqlType::Boolean => Err(FormattingError::UnsupportedPair {
            logical: AudlangType::Decimal,
            sql,
        }),
        _ if sql.is_integer_family() => {
            let d = parse_decimal(value, AudlangType::Decimal)?;
            let truncated = decimal_to_i64_truncated(&d, AudlangType::Decimal, value)?;
            check_int_range(sql, truncated).map(|v| integer_result(sql, v))
        }
        _ if sql.is_decimal_family() => {
            let d = parse_decimal(value, AudlangType::Decimal)?;
            Ok(decimal_result(&d, sql))
        }
        _ if sql.is_char_family() => Ok(text_result(value)),
        SqlType::Date => {
            let d = parse_decimal(value, AudlangType::Decimal)?;
            let ms = decimal_to_i64_rounded(&d, AudlangType::Decimal, value)?;
            let dt = epoch_ms_to_datetime(ms).ok_or_else(|| FormattingError::InvalidDate {
                value: value.to_string(),
            })?;
            Ok(date_result(dt.date()))
        }
        SqlType::Timestamp => {
            let d = parse_decimal(value, AudlangType::Decimal)?;
            let ms = decimal_to_i64_rounded(&d, AudlangType::Decimal, value)?;
            let dt = epoch_ms_to_datetime(ms).ok_or_else(|| FormattingError::InvalidTimestamp {
                value: value.to_string(),
            })?;
            Ok(timestamp_result(dt))
        }
        _ => unreachable!("all SqlType variants handled above"),
    }
}

fn coalesce_date(sql: SqlType, value: &str) -> Result<Coalesced, FormattingError> {
    let d = parse_iso_date(value)?;
    match sql {
        SqlType::Bit | SqlType::Boolean => Err(FormattingError::UnsupportedPair {
            logical: AudlangType::Date,
            sql,
        }),
        _ if sql.is_integer_family() => {
            check_int_range(sql, date_epoch_seconds(d)).map(|v| integer_result(sql, v))
        }
        SqlType::Float => Err(FormattingError::UnsupportedPair {
            logical: AudlangType::Date,
            sql,
        }),
        _ if sql.is_decimal_family() => {
            let ms = date_epoch_millis(d);
            Ok(Coalesced {
                literal: ms.to_string(),
                typed: TypedValue::Decimal(ms.to_string()),
            })
        }
        _ if sql.is_char_family() => Ok(text_result(&d.format("%Y-%m-%d").to_string())),
        SqlType::Date => Ok(date_result(d)),
        SqlType::Timestamp => Ok(timestamp_result(
            d.and_hms_opt(0, 0, 0)
                .expect("midnight is always a valid time"),
        )),
        _ => unreachable!("all SqlType variants handled above"),
    }
}

fn coalesce_string(sql: SqlType, value: &str) -> Result<Coalesced, FormattingError> {
    match sql {
        SqlType::Bit | SqlType::Boolean => {
            let b = parse_bool_loose(value).ok_or_else(|| FormattingError::InvalidBooleanLiteral {
                value: value.to_string(),
            })?;
            Ok(if sql == SqlType::Bit {
                bit_result(b)
            } else {
                boolean_result(b)
            })
        }
        _ if sql.is_integer_family() => {
            let n = if let Ok(n) = parse_i64(value, AudlangType::String) {
                n
            } else {
                let d = parse_iso_date(value)?;
                date_epoch_seconds(d)
            };
            check_int_range(sql, n).map(|v| integer_result(sql, v))
        }
        _ if sql.is_decimal_family() => {
            let d = parse_decimal(value, AudlangType::String)?;
            Ok(decimal_result(&d, sql))
        }
        _ if sql.is_char_family() => Ok(text_result(value)),
        SqlType::Date => {
            let d = parse_iso_date(value)?;
            Ok(date_result(d))
        }
        SqlType::Timestamp => {
            let dt = parse_iso_timestamp(value)?;
            Ok(timestamp_result(dt))
        }
        _ => unreachable!("all SqlType variants handled above"),
    }
}
