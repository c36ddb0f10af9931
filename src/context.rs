//! Process context
//!
//! `ProcessContext` is threaded through every lookup/resolution call. It
//! carries a key/value map of global variables — the channel auto-mapping
//! policies use to publish `argName.local` — plus a set of
//! global flags. The caller owns its lifecycle; the core only ever reads
//! and, for auto-mapping, writes `global_variables`.

use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessContext {
    global_variables: HashMap<String, Value>,
    global_flags: HashSet<String>,
}

impl ProcessContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn global_variables(&self) -> &HashMap<String, Value> {
        &self.global_variables
    }

    pub fn get_variable(&self, key: &str) -> Option<&Value> {
        self.global_variables.get(key)
    }

    pub fn set_variable(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.global_variables.insert(key.into(), value.into());
    }

    pub fn global_flags(&self) -> &HashSet<String> {
        &self.global_flags
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.global_flags.contains(flag)
    }

    pub fn set_flag(&mut self, flag: impl Into<String>) {
        self.global_flags.insert(flag.into());
    }

    /// Argument name the auto-mapping channel publishes the translated,
    /// local argument name under.
    pub fn local_arg_name_key() -> &'static str {
        "argName.local"
    }
}

/// A read-only, empty context singleton for call sites that have no
/// per-lookup state of their own.
pub fn empty() -> &'static ProcessContext {
    static EMPTY: OnceLock<ProcessContext> = OnceLock::new();
    EMPTY.get_or_init(ProcessContext::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_singleton_has_no_variables_or_flags() {
        let ctx = empty();
        assert!(ctx.global_variables().is_empty());
        assert!(ctx.global_flags().is_empty());
    }

    #[test]
    fn set_variable_then_get_roundtrips() {
        let mut ctx = ProcessContext::new();
        ctx.set_variable("argName.local", "foo");
        assert_eq!(ctx.get_variable("argName.local").unwrap(), "foo");
    }

    #[test]
    fn flags_are_a_set() {
        let mut ctx = ProcessContext::new();
        ctx.set_flag("strict");
        ctx.set_flag("strict");
        assert_eq!(ctx.global_flags().len(), 1);
        assert!(ctx.has_flag("strict"));
    }
}
