//! Auto-mapping policy
//!
//! Rule-based argument-name → column assignment, consulted at lookup time
//! when an argument has no direct entry in a table's `argColumnMap`.

use crate::config::assignment::ArgColumnAssignment;
use crate::context::ProcessContext;
use crate::identifier::ConfigError;
use std::sync::Arc;

pub trait AutoMappingPolicy: Send + Sync {
    fn name(&self) -> &str;
    fn is_applicable(&self, arg_name: &str) -> bool;
    fn map(&self, arg_name: &str, ctx: &mut ProcessContext) -> Result<ArgColumnAssignment, ConfigError>;
}

pub type SharedAutoMappingPolicy = Arc<dyn AutoMappingPolicy>;

/// The sentinel policy that matches nothing.
#[derive(Debug, Clone, Copy)]
pub struct NonePolicy;

impl AutoMappingPolicy for NonePolicy {
    fn name(&self) -> &str {
        "NONE"
    }

    fn is_applicable(&self, _arg_name: &str) -> bool {
        false
    }

    fn map(&self, arg_name: &str, _ctx: &mut ProcessContext) -> Result<ArgColumnAssignment, ConfigError> {
        Err(ConfigError::NoApplicableAutoMappingPolicy {
            policy_name: self.name().to_string(),
            arg_name: arg_name.to_string(),
        })
    }
}

pub fn none() -> SharedAutoMappingPolicy {
    Arc::new(NonePolicy)
}

type Translator = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Wraps a translator `argName -> Option<argName'>` plus a template
/// assignment. When applicable, it rebinds the template's `ArgMetaInfo`
/// onto the looked-up `argName`, exposes the translated `argName'` as
/// `ctx.globalVariables["argName.local"]`, and returns the rebound
/// assignment still pointing at the template's `DataColumn`.
#[derive(Clone)]
pub struct DefaultAutoMappingPolicy {
    name: String,
    translator: Translator,
    template: ArgColumnAssignment,
}

impl DefaultAutoMappingPolicy {
    pub fn new(
        name: impl Into<String>,
        translator: impl Fn(&str) -> Option<String> + Send + Sync + 'static,
        template: ArgColumnAssignment,
    ) -> Self {
        Self {
            name: name.into(),
            translator: Arc::new(translator),
            template,
        }
    }
}

impl AutoMappingPolicy for DefaultAutoMappingPolicy {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_applicable(&self, arg_name: &str) -> bool {
        (self.translator)(arg_name).is_some()
    }

    fn map(&self, arg_name: &str, ctx: &mut ProcessContext) -> Result<ArgColumnAssignment, ConfigError> {
        let translated = (self.translator)(arg_name).ok_or_else(|| ConfigError::NoApplicableAutoMappingPolicy {
            policy_name: self.name.clone(),
            arg_name: arg_name.to_string(),
        })?;
        ctx.set_variable(ProcessContext::local_arg_name_key(), translated);
        Ok(self.template.with_arg_name(arg_name))
    }
}

/// Composes a list of policies, short-circuiting on the first applicable
/// one. If none applies and `map` is still attempted, raises a
/// configuration error.
#[derive(Clone)]
pub struct CompositeAutoMappingPolicy {
    name: String,
    members: Vec<SharedAutoMappingPolicy>,
}

impl CompositeAutoMappingPolicy {
    pub fn new(name: impl Into<String>, members: Vec<SharedAutoMappingPolicy>) -> Self {
        Self {
            name: name.into(),
            members,
        }
    }
}

impl AutoMappingPolicy for CompositeAutoMappingPolicy {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_applicable(&self, arg_name: &str) -> bool {
        self.members.iter().any(|m| m.is_applicable(arg_name))
    }

    fn map(&self, arg_name: &str, ctx: &mut ProcessContext) -> Result<ArgColumnAssignment, ConfigError> {
        for member in &self.members {
            if member.is_applicable(arg_name) {
                return member.map(arg_name, ctx);
            }
        }
        Err(ConfigError::NoApplicableAutoMappingPolicy {
            policy_name: self.name.clone(),
            arg_name: arg_name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::column::DataColumn;
    use crate::model::{AdlSqlType, ArgMetaInfo, AudlangType};

    fn template_assignment(column_name: &str) -> ArgColumnAssignment {
        let arg = ArgMetaInfo::new("template", AudlangType::Integer, false, false);
        let col = DataColumn::new("t", column_name, AdlSqlType::integer(), false, false, vec![], "id").unwrap();
        ArgColumnAssignment::new(arg, col).unwrap()
    }

    fn strip_suffix(suffix: &'static str) -> impl Fn(&str) -> Option<String> {
        move |arg_name: &str| arg_name.strip_suffix(suffix).map(str::to_string)
    }

    #[test]
    fn default_policy_rebinds_arg_name_and_publishes_local_name() {
        let policy = DefaultAutoMappingPolicy::new("int-suffix", strip_suffix(".int"), template_assignment("d5"));
        assert!(policy.is_applicable("foo.int"));
        assert!(!policy.is_applicable("foo.string"));

        let mut ctx = ProcessContext::new();
        let assignment = policy.map("foo.int", &mut ctx).unwrap();
        assert_eq!(assignment.arg_meta_info().arg_name(), "foo.int");
        assert_eq!(assignment.data_column().column_name(), "d5");
        assert_eq!(
            ctx.get_variable(ProcessContext::local_arg_name_key()).unwrap(),
            "foo"
        );
    }

    #[test]
    fn none_policy_matches_nothing() {
        let policy = none();
        assert!(!policy.is_applicable("anything"));
        let mut ctx = ProcessContext::new();
        assert!(policy.map("anything", &mut ctx).is_err());
    }

    #[test]
    fn composite_short_circuits_on_first_applicable() {
        let a = Arc::new(DefaultAutoMappingPolicy::new(
            "int-suffix",
            strip_suffix(".int"),
            template_assignment("d5"),
        ));
        let b = Arc::new(DefaultAutoMappingPolicy::new(
            "str-suffix",
            strip_suffix(".str"),
            template_assignment("d6"),
        ));
        let composite = CompositeAutoMappingPolicy::new("composite", vec![a, b]);
        let mut ctx = ProcessContext::new();
        let assignment = composite.map("x.str", &mut ctx).unwrap();
        assert_eq!(assignment.data_column().column_name(), "d6");
    }

    #[test]
    fn composite_with_no_applicable_member_is_a_config_error() {
        let composite = CompositeAutoMappingPolicy::new("composite", vec![Arc::new(NonePolicy)]);
        let mut ctx = ProcessContext::new();
        assert!(matches!(
            composite.map("anything", &mut ctx),
            Err(ConfigError::NoApplicableAutoMappingPolicy { .. })
        ));
    }
}
