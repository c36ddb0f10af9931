//! Query template parser and resolver
//!
//! Two stages. `parse_placeholders` scans a named-placeholder template
//! (`${name}`) and reports each occurrence in source order. `resolve`
//! consumes such a template plus a parameter list and produces a
//! positional (`?`-bearing) template ready for `applyUnsafe`/`apply`.

use crate::coalescence::FormattingError;
use crate::model::{PreparedStatementSink, QueryParameter};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum PreparationError {
    #[error("unclosed placeholder starting at offset {offset}")]
    UnclosedPlaceholder { offset: usize },

    #[error("empty placeholder '${{}}' at offset {offset}")]
    EmptyPlaceholder { offset: usize },

    #[error("no parameter supplied for placeholder '{name}'")]
    MissingParameter { name: String },

    #[error("two different parameters were supplied for placeholder '{name}'")]
    ConflictingParameter { name: String },

    #[error("position {position} does not index a '?' in the resolved template")]
    InvalidPosition { position: usize },
}

/// One `${name}` occurrence: the trimmed placeholder name, and the
/// `[begin, end)` byte range in `source` it spans (braces included).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderEvent {
    pub name: String,
    pub begin: usize,
    pub end: usize,
}

/// Scans `source` for `${name}` placeholders in order, invoking
/// `listener(name, source, begin, end)` for each. A bare `$` not followed
/// by `{` is literal text. `${` without a matching `}` or an empty `${}`
/// are preparation errors.
pub fn parse_placeholders(
    source: &str,
    mut listener: impl FnMut(&str, &str, usize, usize),
) -> Result<Vec<PlaceholderEvent>, PreparationError> {
    let bytes = source.as_bytes();
    let mut events = Vec::new();
    let mut i = 0usize;
    while i < bytes.len() {
        if bytes[i] == b'$' && i + 1 < bytes.len() && bytes[i + 1] == b'{' {
            let begin = i;
            let Some(rel_close) = source[i + 2..].find('}') else {
                return Err(PreparationError::UnclosedPlaceholder { offset: begin });
            };
            let close = i + 2 + rel_close;
            let raw_name = &source[i + 2..close];
            let trimmed = raw_name.trim();
            if trimmed.is_empty() {
                return Err(PreparationError::EmptyPlaceholder { offset: begin });
            }
            let end = close + 1;
            listener(trimmed, source, begin, end);
            events.push(PlaceholderEvent {
                name: trimmed.to_string(),
                begin,
                end,
            });
            i = end;
        } else {
            i += 1;
        }
    }
    Ok(events)
}

/// Pair of a positional (`?`-bearing) SQL template and the ordered
/// parameters/positions that belong to it.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryTemplateWithParameters {
    template: String,
    parameters: Vec<QueryParameter>,
    positions: Vec<usize>,
}

impl QueryTemplateWithParameters {
    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn parameters(&self) -> &[QueryParameter] {
        &self.parameters
    }

    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    /// Builds an already-resolved template directly, without going
    /// through placeholder resolution. Used for idempotent re-wrapping
    /// of a template that is already positional.
    fn identity(template: String) -> Self {
        Self {
            template,
            parameters: Vec::new(),
            positions: Vec::new(),
        }
    }

    /// Writes the debug-rendered SQL: every `?` position is replaced by
    /// its parameter's `to_debug_string()`. Never execute this output
    /// against a live database.
    pub fn apply_unsafe(&self) -> String {
        if self.positions.is_empty() {
            return self.template.clone();
        }
        let mut out = String::with_capacity(self.template.len());
        let mut cursor = 0usize;
        for (param, &pos) in self.parameters.iter().zip(self.positions.iter()) {
            out.push_str(&self.template[cursor..pos]);
            out.push_str(&param.to_debug_string());
            cursor = pos + 1;
        }
        out.push_str(&self.template[cursor..]);
        out
    }

    /// Binds every parameter to `sink` at its 1-based positional index,
    /// in strictly increasing order.
    pub fn apply(&self, sink: &mut dyn PreparedStatementSink) -> Result<(), FormattingError> {
        for (i, param) in self.parameters.iter().enumerate() {
            param.apply(sink, i + 1)?;
        }
        Ok(())
    }
}

/// Resolves a named-placeholder template against `parameters`. Every
/// placeholder must have exactly one matching parameter by id; a
/// duplicate placeholder occurrence of the same name shares its
/// parameter. A missing parameter is a `PreparationError`; so is
/// supplying two referentially-distinct parameters under the same name.
/// A template with no `${…}` placeholders resolves to itself unchanged,
/// with an empty parameter list.
pub fn resolve(
    template: &str,
    parameters: &[QueryParameter],
) -> Result<QueryTemplateWithParameters, PreparationError> {
    let mut by_name: std::collections::HashMap<&str, &QueryParameter> = std::collections::HashMap::new();
    for p in parameters {
        match by_name.get(p.id()) {
            Some(existing) if *existing != p => {
                return Err(PreparationError::ConflictingParameter { name: p.id().to_string() });
            }
            _ => {
                by_name.insert(p.id(), p);
            }
        }
    }

    let events = parse_placeholders(template, |_, _, _, _| {})?;
    if events.is_empty() {
        return Ok(QueryTemplateWithParameters::identity(template.to_string()));
    }

    let mut positional = String::with_capacity(template.len());
    let mut resolved_params = Vec::new();
    let mut positions = Vec::new();
    let mut cursor = 0usize;

    for ev in &events {
        positional.push_str(&template[cursor..ev.begin]);
        let param = by_name
            .get(ev.name.as_str())
            .ok_or_else(|| PreparationError::MissingParameter { name: ev.name.clone() })?;
        positions.push(positional.len());
        positional.push('?');
        resolved_params.push((*param).clone());
        cursor = ev.end;
    }
    positional.push_str(&template[cursor..]);

    Ok(QueryTemplateWithParameters {
        template: positional,
        parameters: resolved_params,
        positions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AdlSqlType, ArgMetaInfo, AudlangType, MatchOperator};

    fn param(id: &str, value: &str) -> QueryParameter {
        QueryParameter::with_id(
            id,
            ArgMetaInfo::new("arg", AudlangType::String, false, false),
            Some(value.to_string()),
            MatchOperator::Equals,
            AdlSqlType::varchar(),
        )
        .unwrap()
    }

    #[test]
    fn basic_placeholder_parse_matches_spec_example() {
        let src = "${ longP} ${xLong } $$$ {} ${ y_Long }";
        let events = parse_placeholders(src, |_, _, _, _| {}).unwrap();
        let names_and_ranges: Vec<(&str, usize, usize)> =
            events.iter().map(|e| (e.name.as_str(), e.begin, e.end)).collect();
        assert_eq!(
            names_and_ranges,
            vec![("longP", 0, 9), ("xLong", 10, 19), ("y_Long", 27, 38)]
        );
    }

    #[test]
    fn dollar_without_brace_is_literal() {
        let events = parse_placeholders("price: $5 and $6", |_, _, _, _| {}).unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn unclosed_placeholder_is_an_error() {
        assert!(matches!(
            parse_placeholders("select ${abc", |_, _, _, _| {}),
            Err(PreparationError::UnclosedPlaceholder { .. })
        ));
    }

    #[test]
    fn empty_placeholder_is_an_error() {
        assert!(matches!(
            parse_placeholders("${}", |_, _, _, _| {}),
            Err(PreparationError::EmptyPlaceholder { .. })
        ));
    }

    #[test]
    fn positional_rendering_matches_spec_example() {
        let params = vec![param("P_1", "foo"), param("P_2", "bar")];
        let template = "select id from my_table where col1=${P_1} and col2=${P_2}";
        let resolved = resolve(template, &params).unwrap();
        assert_eq!(
            resolved.apply_unsafe(),
            "select id from my_table where col1='foo' and col2='bar'"
        );
        assert_eq!(resolved.positions(), &[35, 46]);
    }

    #[test]
    fn missing_parameter_is_a_preparation_error() {
        let template = "where col = ${missing}";
        assert!(matches!(
            resolve(template, &[]),
            Err(PreparationError::MissingParameter { .. })
        ));
    }

    #[test]
    fn duplicate_occurrences_share_one_parameter() {
        let params = vec![param("P_1", "foo")];
        let template = "${P_1} = ${P_1}";
        let resolved = resolve(template, &params).unwrap();
        assert_eq!(resolved.parameters().len(), 2);
        assert_eq!(resolved.template(), "? = ?");
    }

    #[test]
    fn conflicting_parameters_under_one_id_is_an_error() {
        let p1 = param("dup", "foo");
        let p2 = param("dup", "bar");
        assert_ne!(p1, p2);
        let conflict = resolve("${dup}", &[p1, p2]);
        assert!(matches!(
            conflict,
            Err(PreparationError::ConflictingParameter { .. })
        ));
    }

    #[test]
    fn referentially_identical_duplicate_parameters_are_allowed() {
        let p1 = param("dup", "foo");
        let p2 = p1.clone();
        let resolved = resolve("${dup} ${dup}", &[p1, p2]).unwrap();
        assert_eq!(resolved.parameters().len(), 2);
    }

    #[test]
    fn idempotent_on_already_positional_template() {
        let template = "select * from t where col = ?";
        let resolved = resolve(template, &[]).unwrap();
        assert_eq!(resolved.template(), template);
        assert!(resolved.parameters().is_empty());
    }
}
