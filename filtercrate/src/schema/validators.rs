//! Grammar validators for the `select` and `sort_by` parameters.
//!
//! Both take the vocabulary of allowed external names and return a closure
//! that parses raw input against it.

use crate::core::operations::SortDirection;
use crate::validation::ValidationError;

pub const SELECT: &str = "select";
pub const SORT_BY: &str = "sort_by";

const SELECT_SHAPE: &str = "select must be 'all', a list of strings, or a comma-separated string";
const SORT_SHAPE: &str =
    "sort_by must be a string, a list of strings, or a list of (field, order) tuples";

/// Raw `select` input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectInput {
    /// `"all"` or `"a,b"`
    Text(String),
    /// One entry per repeated parameter; entries may themselves be comma-separated
    List(Vec<String>),
}

/// Raw `sort_by` input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortInput {
    /// `"name,-age"`
    Text(String),
    List(Vec<String>),
    /// Pre-formed `(name, direction)` pairs, direction `asc` or `desc`
    Pairs(Vec<(String, String)>),
}

fn tokens(parts: &[String]) -> Vec<String> {
    parts
        .iter()
        .flat_map(|part| part.split(','))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Validator for the selectable grammar.
///
/// `"all"` expands to every allowed name in vocabulary order; otherwise the
/// names are returned in the requested order.
pub fn validate_selectable_schema(
    allowed: Vec<String>,
) -> impl Fn(SelectInput) -> Result<Vec<String>, ValidationError> {
    move |input| {
        let parts = match input {
            SelectInput::Text(text) => vec![text],
            SelectInput::List(items) => items,
        };
        let names = tokens(&parts);
        if names.is_empty() {
            return Err(ValidationError::new(SELECT, SELECT_SHAPE));
        }
        if names.len() == 1 && names[0] == "all" {
            return Ok(allowed.clone());
        }
        if let Some(unknown) = names.iter().find(|name| !allowed.contains(*name)) {
            return Err(ValidationError::new(
                SELECT,
                format!("Field '{unknown}' is not selectable"),
            ));
        }
        Ok(names)
    }
}

/// Validator for the sortable grammar: `name` sorts ascending, `-name`
/// descending.
pub fn validate_sortable_schema(
    allowed: Vec<String>,
) -> impl Fn(SortInput) -> Result<Vec<(String, SortDirection)>, ValidationError> {
    move |input| {
        let terms: Vec<(String, SortDirection)> = match input {
            SortInput::Text(text) => parse_terms(&[text])?,
            SortInput::List(items) => parse_terms(&items)?,
            SortInput::Pairs(pairs) => pairs
                .into_iter()
                .map(|(name, direction)| {
                    SortDirection::parse(&direction)
                        .map(|direction| (name.trim().to_string(), direction))
                        .ok_or_else(|| {
                            ValidationError::new(
                                SORT_BY,
                                format!("Invalid sort direction '{direction}' for field '{name}'"),
                            )
                        })
                })
                .collect::<Result<_, _>>()?,
        };
        if terms.is_empty() {
            return Err(ValidationError::new(SORT_BY, SORT_SHAPE));
        }
        if let Some((unknown, _)) = terms.iter().find(|(name, _)| !allowed.contains(name)) {
            return Err(ValidationError::new(
                SORT_BY,
                format!("Field '{unknown}' is not sortable"),
            ));
        }
        Ok(terms)
    }
}

fn parse_terms(parts: &[String]) -> Result<Vec<(String, SortDirection)>, ValidationError> {
    tokens(parts)
        .into_iter()
        .map(|token| match token.strip_prefix('-') {
            Some(name) if name.trim().is_empty() => Err(ValidationError::new(SORT_BY, SORT_SHAPE)),
            Some(name) => Ok((name.trim().to_string(), SortDirection::Desc)),
            None => Ok((token, SortDirection::Asc)),
        })
        .collect()
}
