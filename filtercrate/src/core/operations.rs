//! Abstract operations understood by the filter compiler.
//!
//! These are backend-neutral: a [`PredicateBackend`](super::backend::PredicateBackend)
//! decides how each one is rendered.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Comparison operators a criterion can expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Equality (=)
    Eq,
    /// Not equal (!=)
    Neq,
    /// LIKE pattern matching, case-sensitive
    Like,
    /// LIKE pattern matching, case-insensitive
    Ilike,
    /// Contains: substring/equality for scalars, membership for arrays
    Cont,
    /// IN (comma-separated values)
    In,
    /// NOT IN (comma-separated values)
    Notin,
    /// BETWEEN (two comma-separated bounds)
    Btw,
    /// Greater than (>)
    Gt,
    /// Greater than or equal (>=)
    Gte,
    /// Less than (<)
    Lt,
    /// Less than or equal (<=)
    Lte,
    /// IS (boolean or null)
    Is,
    /// IS NULL when true, IS NOT NULL when false
    Isnull,
}

impl Operation {
    pub const ALL: [Operation; 14] = [
        Self::Eq,
        Self::Neq,
        Self::Like,
        Self::Ilike,
        Self::Cont,
        Self::In,
        Self::Notin,
        Self::Btw,
        Self::Gt,
        Self::Gte,
        Self::Lt,
        Self::Lte,
        Self::Is,
        Self::Isnull,
    ];

    /// Token used as the `__{op}` suffix of generated parameter names.
    #[must_use]
    pub fn token(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Neq => "neq",
            Self::Like => "like",
            Self::Ilike => "ilike",
            Self::Cont => "cont",
            Self::In => "in",
            Self::Notin => "notin",
            Self::Btw => "btw",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::Is => "is",
            Self::Isnull => "isnull",
        }
    }

    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.token() == token)
    }

    /// Operations whose parameter is a boolean flag, whatever the field type.
    #[must_use]
    pub fn takes_flag(self) -> bool {
        matches!(self, Self::Is | Self::Isnull)
    }

    /// Operations whose parameter is raw comma-separated text, cast per element later.
    #[must_use]
    pub fn takes_list(self) -> bool {
        matches!(self, Self::In | Self::Notin | Self::Btw | Self::Cont)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// N-ary combinator over predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicalOperator {
    And,
    #[default]
    Or,
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And => f.write_str("AND"),
            Self::Or => f.write_str("OR"),
        }
    }
}

/// Ordering direction for sort expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Case-insensitive `asc`/`desc`; anything else is rejected.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape of the pagination parameters a schema exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaginationMode {
    /// `limit` + `offset`
    OffsetBased,
    /// `page` + `page_size` (alias `size`)
    PageBased,
}
