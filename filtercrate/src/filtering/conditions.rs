use sea_orm::sea_query::SimpleExpr;

use crate::core::backend::PredicateBackend;
use crate::core::mapping::OperationResult;
use crate::core::operations::Operation;
use crate::core::value::FilterValue;
use crate::errors::ConfigurationError;
use crate::metadata::{FieldCriteria, PredicateSource};

/// Compile one `(criterion, operation, value)` triple into a predicate.
///
/// Timezone-aware datetimes are reduced to their naive wall-clock time first.
/// Operations without a backend mapping produce `Ok(None)`; custom filters
/// skip the mapping altogether.
///
/// # Errors
///
/// Returns a [`ConfigurationError`] when the criterion has no predicate
/// source, or when a column group's logical operator is unmapped.
pub fn compile(
    backend: &dyn PredicateBackend,
    criterion: &FieldCriteria,
    op: Operation,
    value: &FilterValue,
) -> OperationResult {
    let value = value.clone().normalized();

    let Some(source) = criterion.source() else {
        return Err(ConfigurationError::MissingPredicateSource {
            field: criterion.get_name(),
            operation: op,
        });
    };

    if let PredicateSource::Custom(filter) = source {
        return Ok(filter(criterion, &value));
    }

    if !backend.supports(op) {
        tracing::debug!(
            field = %criterion.get_field_name(op),
            "Operation has no backend mapping, skipping"
        );
        return Ok(None);
    }

    match source {
        PredicateSource::Column(column) => backend.apply(op, column, &value),
        PredicateSource::Group { columns, logical } => {
            let mut predicates = Vec::with_capacity(columns.len());
            for column in columns {
                if let Some(predicate) = backend.apply(op, column, &value)? {
                    predicates.push(predicate);
                }
            }
            backend.combine(*logical, predicates)
        }
        PredicateSource::Custom(_) => Ok(None),
    }
}

/// Compile every supplied criterion value, keeping declaration order.
///
/// Returns `Ok(None)` when nothing produced a predicate.
///
/// # Errors
///
/// Propagates the first [`ConfigurationError`] raised by [`compile`].
pub fn build_filters<'a, I>(
    backend: &dyn PredicateBackend,
    values: I,
) -> Result<Option<Vec<SimpleExpr>>, ConfigurationError>
where
    I: IntoIterator<Item = (&'a FieldCriteria, Operation, &'a FilterValue)>,
{
    let mut filters = Vec::new();
    for (criterion, op, value) in values {
        if let Some(predicate) = compile(backend, criterion, op, value)? {
            filters.push(predicate);
        }
    }
    Ok(if filters.is_empty() { None } else { Some(filters) })
}
