//! Crate-wide error aggregate
//!
//! Every module in this crate raises its own precise `thiserror` enum
//! (`ConfigError`, `FormattingError`, `LookupError`, `PreparationError`) so
//! that code inside the crate — and callers who only touch one stage —
//! can match on a narrow, stage-specific error without downcasting. Some
//! callers instead drive several stages in one pass (look up an
//! assignment, coalesce a parameter, resolve a template) and want a single
//! `Result` type to propagate with `?` across all of them; `AudlangSqlError`
//! is that aggregate, plus the boundary `ArgumentInvalid` case from
//! spec.md §7 (null/blank argument names, null contexts) that doesn't
//! belong to any one stage.

use crate::coalescence::FormattingError;
use crate::contains::ContainsError;
use crate::identifier::{ConfigError, LookupError};
use crate::template::PreparationError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum AudlangSqlError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Formatting(#[from] FormattingError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error(transparent)]
    Preparation(#[from] PreparationError),

    #[error(transparent)]
    Contains(#[from] ContainsError),

    #[error("argument '{arg_name}' is invalid: {reason}")]
    ArgumentInvalid { arg_name: String, reason: String },
}

impl AudlangSqlError {
    pub fn argument_invalid(arg_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ArgumentInvalid {
            arg_name: arg_name.into(),
            reason: reason.into(),
        }
    }
}
