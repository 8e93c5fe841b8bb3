//! SQL operation functions.
//!
//! Each function maps `(column, value)` to a Sea-Query predicate. `Ok(None)`
//! means "no constraint" (the operation is dropped); `Err` is reserved for
//! configuration mistakes such as BETWEEN on a text column.
//!
//! LIKE and ILIKE use the caller's pattern verbatim, declaring `\` as the
//! escape character. Wrapping search text in `%...%` is the job of the
//! q-search builders, not of these functions.

use sea_orm::Value;
use sea_orm::sea_query::{Alias, Expr, Func, LikeExpr, SimpleExpr};

use super::value::{FilterValue, parse_bool, parse_date, parse_datetime, parse_time};
use crate::database::columns::{ColumnKind, ColumnRef};
use crate::errors::ConfigurationError;

/// Result of a single operation function.
pub type OperationResult = Result<Option<SimpleExpr>, ConfigurationError>;

/// Escape character declared on every LIKE pattern built here.
pub const LIKE_ESCAPE: char = '\\';

/// Escape LIKE wildcards so `text` matches literally.
#[must_use]
pub fn escape_like(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn like_pattern(pattern: impl Into<String>) -> LikeExpr {
    LikeExpr::new(pattern).escape(LIKE_ESCAPE)
}

/// Split comma-separated input, trimming parts and dropping empty ones.
#[must_use]
pub fn split_csv(text: &str) -> Vec<&str> {
    text.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect()
}

/// Cast one list element to the column's scalar kind.
///
/// Booleans accept `true/false/1/0`, integers and floats must parse, every
/// other kind keeps the text.
#[must_use]
pub fn cast_element(kind: &ColumnKind, token: &str) -> Option<Value> {
    match kind.element() {
        ColumnKind::Boolean => match token.to_ascii_lowercase().as_str() {
            "true" | "1" => Some(true.into()),
            "false" | "0" => Some(false.into()),
            _ => None,
        },
        ColumnKind::Integer => token.parse::<i64>().ok().map(Value::from),
        ColumnKind::Float => token.parse::<f64>().ok().map(Value::from),
        _ => Some(token.to_string().into()),
    }
}

/// Cast every element, or nothing at all if a single one fails.
fn cast_all(column: &ColumnRef, text: &str) -> Option<Vec<Value>> {
    let mut values: Vec<Value> = Vec::new();
    for token in split_csv(text) {
        let Some(value) = cast_element(column.kind(), token) else {
            tracing::debug!(
                column = %column,
                element = token,
                "Dropping list operation: element does not cast to column type"
            );
            return None;
        };
        if !values.contains(&value) {
            values.push(value);
        }
    }
    if values.is_empty() { None } else { Some(values) }
}

/// OR-fold used inside composite operations; one predicate is returned as-is.
pub(crate) fn any_of(predicates: Vec<SimpleExpr>) -> Option<SimpleExpr> {
    predicates.into_iter().reduce(|acc, predicate| acc.or(predicate))
}

/// AND-fold counterpart of [`any_of`].
pub(crate) fn all_of(predicates: Vec<SimpleExpr>) -> Option<SimpleExpr> {
    predicates.into_iter().reduce(|acc, predicate| acc.and(predicate))
}

fn value_of(value: &FilterValue) -> Value {
    value.clone().into()
}

pub fn eq(column: &ColumnRef, value: &FilterValue) -> OperationResult {
    if value.is_null() {
        return Ok(Some(column.col().is_null()));
    }
    Ok(Some(column.col().eq(value_of(value))))
}

pub fn neq(column: &ColumnRef, value: &FilterValue) -> OperationResult {
    if value.is_null() {
        return Ok(Some(column.col().is_not_null()));
    }
    Ok(Some(column.col().ne(value_of(value))))
}

pub fn gt(column: &ColumnRef, value: &FilterValue) -> OperationResult {
    Ok(Some(column.col().gt(value_of(value))))
}

pub fn gte(column: &ColumnRef, value: &FilterValue) -> OperationResult {
    Ok(Some(column.col().gte(value_of(value))))
}

pub fn lt(column: &ColumnRef, value: &FilterValue) -> OperationResult {
    Ok(Some(column.col().lt(value_of(value))))
}

pub fn lte(column: &ColumnRef, value: &FilterValue) -> OperationResult {
    Ok(Some(column.col().lte(value_of(value))))
}

/// Case-sensitive LIKE with the pattern as given.
pub fn like(column: &ColumnRef, value: &FilterValue) -> OperationResult {
    Ok(Some(column.col().like(like_pattern(value.to_text()))))
}

/// Case-insensitive LIKE, rendered as `UPPER(col) LIKE UPPER(pattern)` so it
/// works on every backend.
pub fn ilike(column: &ColumnRef, value: &FilterValue) -> OperationResult {
    Ok(Some(
        Expr::expr(Func::upper(column.col())).like(like_pattern(value.to_text().to_uppercase())),
    ))
}

/// `IS` handles booleans and null directly.
pub fn is(column: &ColumnRef, value: &FilterValue) -> OperationResult {
    Ok(Some(match value {
        FilterValue::Null => column.col().is_null(),
        FilterValue::Boolean(flag) => column.col().is(*flag),
        other => column.col().is(value_of(other)),
    }))
}

/// `true` -> IS NULL, `false` -> IS NOT NULL.
pub fn is_null(column: &ColumnRef, value: &FilterValue) -> OperationResult {
    let flag = match value {
        FilterValue::Boolean(flag) => Some(*flag),
        FilterValue::String(text) => parse_bool(text),
        _ => None,
    };
    Ok(flag.map(|flag| {
        if flag {
            column.col().is_null()
        } else {
            column.col().is_not_null()
        }
    }))
}

pub fn in_list(column: &ColumnRef, value: &FilterValue) -> OperationResult {
    Ok(cast_all(column, &value.to_text()).map(|values| column.col().is_in(values)))
}

pub fn not_in_list(column: &ColumnRef, value: &FilterValue) -> OperationResult {
    Ok(cast_all(column, &value.to_text()).map(|values| column.col().is_not_in(values)))
}

/// "Contains".
///
/// Array columns test membership with `'part' = ANY(col)`; text columns use a
/// `%part%` substring match; other scalars compare for equality. Comma
/// separated input yields one predicate per part, OR-combined.
pub fn contains(column: &ColumnRef, value: &FilterValue) -> OperationResult {
    let text = value.to_text();
    let parts = split_csv(&text);
    let mut predicates = Vec::with_capacity(parts.len());

    for part in parts {
        let predicate = if column.kind().is_array() {
            let Some(element) = cast_element(column.kind(), part) else {
                return Ok(None);
            };
            Expr::val(element).eq(Expr::expr(
                Func::cust(Alias::new("ANY")).arg(column.col()),
            ))
        } else if column.kind().is_textual() {
            column.col().like(like_pattern(format!("%{}%", escape_like(part))))
        } else {
            let Some(element) = cast_element(column.kind(), part) else {
                return Ok(None);
            };
            column.col().eq(element)
        };
        predicates.push(predicate);
    }

    Ok(any_of(predicates))
}

fn min_max<T: PartialOrd + Copy>(values: &[T]) -> Option<(T, T)> {
    let first = *values.first()?;
    Some(values.iter().fold((first, first), |(low, high), &value| {
        (
            if value < low { value } else { low },
            if value > high { value } else { high },
        )
    }))
}

fn parse_bounds<T, F>(tokens: &[&str], parse: F) -> Option<(Value, Value)>
where
    T: PartialOrd + Copy + Into<Value>,
    F: Fn(&str) -> Option<T>,
{
    if tokens.len() < 2 {
        return None;
    }
    let parsed = tokens.iter().map(|token| parse(token)).collect::<Option<Vec<T>>>()?;
    min_max(&parsed).map(|(low, high)| (low.into(), high.into()))
}

/// BETWEEN over the smallest and largest of the comma-separated values, so
/// `10,1` and `1,10` produce the same bounds.
///
/// # Errors
///
/// Returns [`ConfigurationError::UnsupportedBetweenColumn`] when the column is
/// neither numeric nor temporal.
pub fn between(column: &ColumnRef, value: &FilterValue) -> OperationResult {
    let text = value.to_text();
    let tokens = split_csv(&text);

    let bounds = match column.kind().element() {
        ColumnKind::Integer => parse_bounds(&tokens, |token| token.parse::<i64>().ok()),
        ColumnKind::Float => parse_bounds(&tokens, |token| token.parse::<f64>().ok()),
        ColumnKind::Date => parse_bounds(&tokens, parse_date),
        ColumnKind::Time => parse_bounds(&tokens, parse_time),
        ColumnKind::DateTime => parse_bounds(&tokens, |token| {
            match parse_datetime(token)?.normalized() {
                FilterValue::DateTime(naive) => Some(naive),
                _ => None,
            }
        }),
        kind => {
            return Err(ConfigurationError::UnsupportedBetweenColumn {
                column: column.to_string(),
                kind: kind.clone(),
            });
        }
    };

    Ok(bounds.map(|(low, high)| column.col().between(low, high)))
}

/// Whether BETWEEN can be compiled against a column of this kind.
#[must_use]
pub fn supports_between(kind: &ColumnKind) -> bool {
    matches!(
        kind.element(),
        ColumnKind::Integer
            | ColumnKind::Float
            | ColumnKind::Date
            | ColumnKind::DateTime
            | ColumnKind::Time
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::sea_query::{Query, SqliteQueryBuilder};

    fn sql(expr: SimpleExpr) -> String {
        Query::select()
            .expr(Expr::val(1))
            .and_where(expr)
            .to_string(SqliteQueryBuilder)
            .split_once(" WHERE ")
            .map(|(_, clause)| clause.to_string())
            .unwrap_or_default()
    }

    fn col(name: &str, kind: ColumnKind) -> ColumnRef {
        ColumnRef::new("t", name, kind)
    }

    #[test]
    fn test_split_csv_drops_blank_parts() {
        assert_eq!(split_csv("x,y,,z"), vec!["x", "y", "z"]);
        assert_eq!(split_csv(" a , b "), vec!["a", "b"]);
        assert!(split_csv(",").is_empty());
    }

    #[test]
    fn test_in_boolean_dedupes_token_forms() {
        let column = col("b", ColumnKind::Boolean);
        let predicate = in_list(&column, &"true,false,0,1".into()).unwrap().unwrap();
        let expected = column.col().is_in([Value::from(true), Value::from(false)]);
        assert_eq!(predicate, expected);
    }

    #[test]
    fn test_in_integers() {
        let column = col("i", ColumnKind::Integer);
        let predicate = in_list(&column, &"1,2,3".into()).unwrap().unwrap();
        assert_eq!(predicate, column.col().is_in([1_i64, 2, 3]));
    }

    #[test]
    fn test_in_drops_whole_operation_on_bad_element() {
        let column = col("i", ColumnKind::Integer);
        assert_eq!(in_list(&column, &"a,b".into()).unwrap(), None);
        assert_eq!(in_list(&column, &"1,b".into()).unwrap(), None);
        assert_eq!(not_in_list(&column, &"a,b".into()).unwrap(), None);
    }

    #[test]
    fn test_not_in_renders_not_in() {
        let column = col("b", ColumnKind::Boolean);
        let rendered = sql(not_in_list(&column, &"true,0".into()).unwrap().unwrap());
        assert!(rendered.contains("NOT IN"), "{rendered}");
    }

    #[test]
    fn test_between_orders_bounds() {
        let column = col("i", ColumnKind::Integer);
        let forward = between(&column, &"1,10".into()).unwrap().unwrap();
        let reversed = between(&column, &"10,1".into()).unwrap().unwrap();
        assert_eq!(forward, reversed);
        assert_eq!(forward, column.col().between(1_i64, 10_i64));

        let three = between(&column, &"10,1,5".into()).unwrap().unwrap();
        assert_eq!(sql(three), r#""t"."i" BETWEEN 1 AND 10"#);
    }

    #[test]
    fn test_between_dates() {
        let column = col("d", ColumnKind::Date);
        let rendered = sql(between(&column, &"2020-01-10,2020-01-01".into()).unwrap().unwrap());
        assert!(rendered.contains("BETWEEN '2020-01-01' AND '2020-01-10'"), "{rendered}");
    }

    #[test]
    fn test_between_single_value_is_dropped() {
        let column = col("i", ColumnKind::Integer);
        assert_eq!(between(&column, &"5".into()).unwrap(), None);
    }

    #[test]
    fn test_between_rejects_text_columns() {
        let column = col("s", ColumnKind::String);
        let error = between(&column, &"a,b".into()).unwrap_err();
        assert!(matches!(
            error,
            ConfigurationError::UnsupportedBetweenColumn { .. }
        ));
        assert!(!supports_between(&ColumnKind::String));
        assert!(supports_between(&ColumnKind::Date));
    }

    #[test]
    fn test_contains_text_is_or_of_substrings() {
        let column = col("s", ColumnKind::String);
        let rendered = sql(contains(&column, &"a,b".into()).unwrap().unwrap());
        assert!(rendered.contains(r#""t"."s" LIKE '%a%'"#), "{rendered}");
        assert!(rendered.contains(" OR "), "{rendered}");
        assert!(rendered.contains(r#""t"."s" LIKE '%b%'"#), "{rendered}");
    }

    #[test]
    fn test_contains_integer_is_or_of_equalities() {
        let column = col("i", ColumnKind::Integer);
        let predicate = contains(&column, &"1,2".into()).unwrap().unwrap();
        assert_eq!(predicate, column.col().eq(1_i64).or(column.col().eq(2_i64)));
    }

    #[test]
    fn test_contains_array_uses_any() {
        let column = col("titles", ColumnKind::Array(Box::new(ColumnKind::String)));
        let rendered = sql(contains(&column, &"x,y,,z".into()).unwrap().unwrap());
        for part in ["'x'", "'y'", "'z'"] {
            assert!(rendered.contains(&format!(r#"{part} = ANY("t"."titles")"#)), "{rendered}");
        }
        assert_eq!(rendered.matches(" OR ").count(), 2, "{rendered}");
    }

    #[test]
    fn test_contains_single_part_is_unwrapped() {
        let column = col("s", ColumnKind::String);
        let predicate = contains(&column, &"li".into()).unwrap().unwrap();
        assert_eq!(predicate, column.col().like(LikeExpr::new("%li%").escape('\\')));
    }

    #[test]
    fn test_contains_text_matches_wildcards_literally() {
        let column = col("s", ColumnKind::String);
        let predicate = contains(&column, &"50%_off".into()).unwrap().unwrap();
        assert_eq!(
            predicate,
            column.col().like(LikeExpr::new(r"%50\%\_off%").escape('\\'))
        );
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("plain"), "plain");
        assert_eq!(escape_like("100%"), r"100\%");
        assert_eq!(escape_like("a_b"), r"a\_b");
        assert_eq!(escape_like(r"c:\tmp"), r"c:\\tmp");
    }

    #[test]
    fn test_like_keeps_pattern_and_ilike_uppercases() {
        let column = col("s", ColumnKind::String);
        assert_eq!(
            sql(like(&column, &"A%".into()).unwrap().unwrap()),
            r#""t"."s" LIKE 'A%' ESCAPE '\'"#
        );
        assert_eq!(
            sql(ilike(&column, &"a%".into()).unwrap().unwrap()),
            r#"UPPER("t"."s") LIKE 'A%' ESCAPE '\'"#
        );
    }

    #[test]
    fn test_is_and_isnull() {
        let column = col("b", ColumnKind::Boolean);
        assert!(sql(is(&column, &FilterValue::Null).unwrap().unwrap()).ends_with("IS NULL"));
        assert!(sql(is_null(&column, &true.into()).unwrap().unwrap()).ends_with("IS NULL"));
        assert!(sql(is_null(&column, &false.into()).unwrap().unwrap()).ends_with("IS NOT NULL"));
        assert_eq!(is(&column, &true.into()).unwrap(), Some(column.col().is(true)));
    }

    #[test]
    fn test_comparisons() {
        let column = col("i", ColumnKind::Integer);
        assert_eq!(sql(gt(&column, &FilterValue::Integer(18)).unwrap().unwrap()), r#""t"."i" > 18"#);
        assert_eq!(sql(gte(&column, &FilterValue::Integer(18)).unwrap().unwrap()), r#""t"."i" >= 18"#);
        assert_eq!(sql(lt(&column, &FilterValue::Integer(18)).unwrap().unwrap()), r#""t"."i" < 18"#);
        assert_eq!(sql(lte(&column, &FilterValue::Integer(18)).unwrap().unwrap()), r#""t"."i" <= 18"#);
        assert_eq!(sql(neq(&column, &FilterValue::Integer(18)).unwrap().unwrap()), r#""t"."i" <> 18"#);
    }
}
