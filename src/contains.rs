//! Contains policy
//!
//! A `SqlContainsPolicy` turns a substring match on a column into a
//! vendor-specific SQL snippet. It has two halves: a *preparator* that
//! sanitizes the user search literal (strip SQL wildcard characters so a
//! literal `%`/`_` in the search term cannot be mistaken for a pattern
//! metacharacter) and a *creator* that builds the instruction text from a
//! column name and a parameter placeholder. Both halves are decoratable
//! independently, mirroring `AdlSqlType::with_formatter`'s wrap-the-rest
//! approach.

use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContainsError {
    #[error("contains is not supported by policy '{policy}'")]
    NotSupported { policy: String },
}

type Preparator = Arc<dyn Fn(&str) -> String + Send + Sync>;
type Creator = Arc<dyn Fn(&str, &str) -> Result<String, ContainsError> + Send + Sync>;

#[derive(Clone)]
pub struct SqlContainsPolicy {
    name: String,
    preparator: Preparator,
    creator: Creator,
}

impl std::fmt::Debug for SqlContainsPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqlContainsPolicy").field("name", &self.name).finish()
    }
}

fn strip_wildcards(search: &str) -> String {
    search.chars().filter(|&c| c != '%' && c != '_').collect()
}

fn identity_preparator(search: &str) -> String {
    search.to_string()
}

impl SqlContainsPolicy {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sanitizes a user search literal, e.g. stripping `%`/`_` so they
    /// are not mistaken for SQL wildcard metacharacters.
    pub fn prepare_search_snippet(&self, search: &str) -> String {
        (self.preparator)(search)
    }

    /// Builds the SQL instruction for `column_name LIKE/CONTAINS
    /// parameter_placeholder`.
    pub fn create_instruction(&self, column_name: &str, parameter_placeholder: &str) -> Result<String, ContainsError> {
        (self.creator)(column_name, parameter_placeholder)
    }

    /// Returns a new policy with `preparator` substituted, keeping this
    /// policy's creator. `name` overrides the inherited name; when absent
    /// the derived name is `<parent>+preparator`.
    pub fn with_preparator_function<F>(&self, preparator: F, name: Option<&str>) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Self {
            name: name.map(str::to_string).unwrap_or_else(|| format!("{}+preparator", self.name)),
            preparator: Arc::new(preparator),
            creator: Arc::clone(&self.creator),
        }
    }

    /// Returns a new policy with `creator` substituted, keeping this
    /// policy's preparator. `name` overrides the inherited name; when
    /// absent the derived name is `<parent>+creator`.
    pub fn with_creator_function<F>(&self, creator: F, name: Option<&str>) -> Self
    where
        F: Fn(&str, &str) -> Result<String, ContainsError> + Send + Sync + 'static,
    {
        Self {
            name: name.map(str::to_string).unwrap_or_else(|| format!("{}+creator", self.name)),
            preparator: Arc::clone(&self.preparator),
            creator: Arc::new(creator),
        }
    }

    pub fn mysql() -> Self {
        Self {
            name: "MYSQL".to_string(),
            preparator: Arc::new(strip_wildcards),
            creator: Arc::new(|col, p| Ok(format!("{col} LIKE CONCAT('%', {p}, '%')"))),
        }
    }

    pub fn sql92() -> Self {
        Self {
            name: "SQL92".to_string(),
            preparator: Arc::new(strip_wildcards),
            creator: Arc::new(|col, p| Ok(format!("{col} LIKE '%' || {p} || '%'"))),
        }
    }

    pub fn sql_server() -> Self {
        Self {
            name: "SQL_SERVER".to_string(),
            preparator: Arc::new(strip_wildcards),
            creator: Arc::new(|col, p| Ok(format!("{col} LIKE '%' + {p} + '%'"))),
        }
    }

    pub fn sql_server2() -> Self {
        Self {
            name: "SQL_SERVER2".to_string(),
            preparator: Arc::new(identity_preparator),
            creator: Arc::new(|col, p| Ok(format!("CHARINDEX({p}, {col}, 0) > 0"))),
        }
    }

    pub fn unsupported() -> Self {
        Self {
            name: "UNSUPPORTED".to_string(),
            preparator: Arc::new(identity_preparator),
            creator: Arc::new(|_, _| {
                Err(ContainsError::NotSupported {
                    policy: "UNSUPPORTED".to_string(),
                })
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mysql_preparator_strips_percent_and_underscore() {
        assert_eq!(SqlContainsPolicy::mysql().prepare_search_snippet("%ABC_xyz%"), "ABCxyz");
    }

    #[test]
    fn mysql_creator_matches_spec_example() {
        assert_eq!(
            SqlContainsPolicy::mysql().create_instruction("COL1", "${bla}").unwrap(),
            "COL1 LIKE CONCAT('%', ${bla}, '%')"
        );
    }

    #[test]
    fn sql_server2_preparator_is_identity() {
        assert_eq!(SqlContainsPolicy::sql_server2().prepare_search_snippet("%abc_%"), "%abc_%");
    }

    #[test]
    fn unsupported_raises_contains_not_supported() {
        assert!(matches!(
            SqlContainsPolicy::unsupported().create_instruction("COL1", "?"),
            Err(ContainsError::NotSupported { .. })
        ));
    }

    #[test]
    fn decorating_creator_keeps_preparator_and_derives_name() {
        let decorated = SqlContainsPolicy::mysql().with_creator_function(|col, p| Ok(format!("{col} ~~ {p}")), None);
        assert_eq!(decorated.name(), "MYSQL+creator");
        assert_eq!(decorated.create_instruction("c", "?").unwrap(), "c ~~ ?");
        assert_eq!(decorated.prepare_search_snippet("a_b"), "ab");
    }

    #[test]
    fn decorating_preparator_keeps_creator_and_accepts_name_override() {
        let decorated = SqlContainsPolicy::sql92().with_preparator_function(|s| s.to_uppercase(), Some("SQL92_UPPER"));
        assert_eq!(decorated.name(), "SQL92_UPPER");
        assert_eq!(decorated.prepare_search_snippet("abc"), "ABC");
        assert_eq!(decorated.create_instruction("c", "?").unwrap(), "c LIKE '%' || ? || '%'");
    }
}
