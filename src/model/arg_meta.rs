//! Logical argument descriptors
//!
//! `ArgMetaInfo` is the upstream, read-only description of a named Audlang
//! argument. It never carries a physical column — that binding lives in
//! `ArgColumnAssignment` (see `model::assignment`).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Logical Audlang value domain. Mirrors the five primitive types the
/// upstream parser can assign to an argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AudlangType {
    String,
    Integer,
    Decimal,
    Date,
    Bool,
}

impl AudlangType {
    pub fn name(&self) -> &'static str {
        match self {
            AudlangType::String => "STRING",
            AudlangType::Integer => "INTEGER",
            AudlangType::Decimal => "DECIMAL",
            AudlangType::Date => "DATE",
            AudlangType::Bool => "BOOL",
        }
    }
}

impl fmt::Display for AudlangType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Descriptor for a logical argument. Immutable, created by the upstream
/// argument-metadata lookup and consumed read-only by the rest of the
/// crate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArgMetaInfo {
    arg_name: String,
    arg_type: AudlangType,
    is_always_known: bool,
    is_collection: bool,
}

impl ArgMetaInfo {
    /// Creates a new descriptor. `arg_name` must be non-empty and not
    /// whitespace-only; callers that need identifier validation should run
    /// [`crate::identifier::validate_arg_name`] first — this constructor
    /// does not duplicate that check so it stays usable for trusted,
    /// already-validated call sites (e.g. deep-copying a sentinel).
    pub fn new(
        arg_name: impl Into<String>,
        arg_type: AudlangType,
        is_always_known: bool,
        is_collection: bool,
    ) -> Self {
        Self {
            arg_name: arg_name.into(),
            arg_type,
            is_always_known,
            is_collection,
        }
    }

    pub fn arg_name(&self) -> &str {
        &self.arg_name
    }

    pub fn arg_type(&self) -> AudlangType {
        self.arg_type
    }

    pub fn is_always_known(&self) -> bool {
        self.is_always_known
    }

    pub fn is_collection(&self) -> bool {
        self.is_collection
    }

    /// Returns a copy with `arg_name` replaced. Used by auto-mapping
    /// policies (`DefaultAutoMappingPolicy`) to rebind a template
    /// assignment's metadata onto the concretely-looked-up argument name.
    pub fn with_arg_name(&self, arg_name: impl Into<String>) -> Self {
        Self {
            arg_name: arg_name.into(),
            ..self.clone()
        }
    }
}
