use sea_orm::EntityTrait;
use std::collections::HashMap;
use std::sync::Arc;

use super::filter_schema::FilterSchema;
use super::parameter::{ExtraField, ParameterKind, ParameterSpec, ValueType};
use crate::core::backend::{PredicateBackend, SqlBackend};
use crate::core::mapping::supports_between;
use crate::core::operations::{Operation, PaginationMode};
use crate::core::value::FilterValue;
use crate::database::columns::{ColumnRef, ColumnSource, EntityColumns};
use crate::errors::ConfigurationError;
use crate::filtering::pagination::{DEFAULT_PAGE, LIMIT, OFFSET, PAGE, PAGE_SIZE, SIZE};
use crate::metadata::{FieldCriteria, FieldType, SearchSpec, Selectable, SortBy};
use crate::models::Pagination;
use crate::schema::validators::{SELECT, SORT_BY};

/// Name of the free-text search parameter.
pub const Q_SEARCH: &str = "q_search";

/// One entry of the field list.
#[derive(Debug, Clone)]
enum FieldSelection {
    /// Every column of the source
    All,
    /// Named columns of the source
    Names(Vec<String>),
    Criteria(Box<FieldCriteria>),
}

/// Declarative description of a filter schema.
///
/// Build it once at startup; [`FilterConfig::build`] validates it and
/// generates the parameter model.
///
/// ```rust,ignore
/// let schema = FilterConfig::for_entity::<user::Entity>()
///     .prefix("user")
///     .field_names(["first_name", "age"])
///     .q_search(QSearch::new([user::Column::FirstName, user::Column::LastName], Operation::Ilike))
///     .pagination(PaginationMode::OffsetBased)
///     .build()?;
/// ```
pub struct FilterConfig {
    prefix: Option<String>,
    source: Option<Arc<dyn ColumnSource>>,
    fields: Vec<FieldSelection>,
    default_ops: Option<Vec<Operation>>,
    alias_as_camelcase: bool,
    q_search: Option<SearchSpec>,
    sort_by: Option<SortBy>,
    select_only: Option<Selectable>,
    pagination: Option<PaginationMode>,
    extras: Vec<ExtraField>,
    backend: Arc<dyn PredicateBackend>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterConfig {
    #[must_use]
    pub fn new() -> Self {
        Self {
            prefix: None,
            source: None,
            fields: Vec::new(),
            default_ops: None,
            alias_as_camelcase: false,
            q_search: None,
            sort_by: None,
            select_only: None,
            pagination: None,
            extras: Vec::new(),
            backend: Arc::new(SqlBackend::default()),
        }
    }

    /// Config whose field names resolve against a Sea-ORM entity.
    #[must_use]
    pub fn for_entity<E: EntityTrait>() -> Self {
        Self::new().columns(EntityColumns::<E>::new())
    }

    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Source used to resolve plain field names into columns.
    #[must_use]
    pub fn columns(mut self, source: impl ColumnSource + 'static) -> Self {
        self.source = Some(Arc::new(source));
        self
    }

    /// Expose every column of the source.
    #[must_use]
    pub fn all_fields(mut self) -> Self {
        self.fields.push(FieldSelection::All);
        self
    }

    /// Expose the named columns of the source.
    #[must_use]
    pub fn field_names<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.fields.push(FieldSelection::Names(
            names.into_iter().map(Into::into).collect(),
        ));
        self
    }

    #[must_use]
    pub fn field(mut self, criterion: FieldCriteria) -> Self {
        self.fields.push(FieldSelection::Criteria(Box::new(criterion)));
        self
    }

    /// Operations for source-resolved fields, replacing the per-type defaults.
    #[must_use]
    pub fn default_ops(mut self, operations: impl IntoIterator<Item = Operation>) -> Self {
        self.default_ops = Some(operations.into_iter().collect());
        self
    }

    /// camelCase aliases for every criterion parameter.
    #[must_use]
    pub fn alias_as_camelcase(mut self, enabled: bool) -> Self {
        self.alias_as_camelcase = enabled;
        self
    }

    #[must_use]
    pub fn q_search(mut self, search: impl Into<SearchSpec>) -> Self {
        self.q_search = Some(search.into());
        self
    }

    #[must_use]
    pub fn sort_by(mut self, sort_by: SortBy) -> Self {
        self.sort_by = Some(sort_by);
        self
    }

    #[must_use]
    pub fn select_only(mut self, selectable: Selectable) -> Self {
        self.select_only = Some(selectable);
        self
    }

    #[must_use]
    pub fn pagination(mut self, mode: PaginationMode) -> Self {
        self.pagination = Some(mode);
        self
    }

    #[must_use]
    pub fn extra_field(mut self, field: ExtraField) -> Self {
        self.extras.push(field);
        self
    }

    /// Replace the default SQL backend.
    #[must_use]
    pub fn backend(mut self, backend: impl PredicateBackend + 'static) -> Self {
        self.backend = Arc::new(backend);
        self
    }

    fn source(&self) -> Result<&dyn ColumnSource, ConfigurationError> {
        self.source
            .as_deref()
            .ok_or(ConfigurationError::MissingColumnSource)
    }

    fn resolved_criterion(&self, column: ColumnRef) -> FieldCriteria {
        let operations = match &self.default_ops {
            Some(operations) => operations.clone(),
            None => FieldType::from(column.kind()).default_operations().to_vec(),
        };
        FieldCriteria::new(column.name()).column(column).ops(operations)
    }

    fn resolve_criteria(&self) -> Result<Vec<FieldCriteria>, ConfigurationError> {
        let mut criteria = Vec::new();
        for selection in &self.fields {
            match selection {
                FieldSelection::All => {
                    for column in self.source()?.columns() {
                        criteria.push(self.resolved_criterion(column));
                    }
                }
                FieldSelection::Names(names) => {
                    let source = self.source()?;
                    for name in names {
                        let column = source
                            .column(name)
                            .ok_or_else(|| ConfigurationError::UnknownColumn(name.clone()))?;
                        criteria.push(self.resolved_criterion(column));
                    }
                }
                FieldSelection::Criteria(criterion) => criteria.push(criterion.as_ref().clone()),
            }
        }

        for criterion in &mut criteria {
            criterion.set_default_prefix(self.prefix.as_deref());
            if self.alias_as_camelcase {
                criterion.enable_camelcase();
            }
        }
        Ok(criteria)
    }

    /// Validate the configuration and generate the parameter model.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] for an empty field name, an operation
    /// without a predicate source, BETWEEN on a column that is neither
    /// numeric nor temporal, an unresolvable field name, or two parameters
    /// sharing a name or alias.
    pub fn build(self) -> Result<FilterSchema, ConfigurationError> {
        let criteria = self.resolve_criteria()?;
        for criterion in &criteria {
            validate_criterion(criterion)?;
        }

        let mut parameters = Vec::new();
        for (index, criterion) in criteria.iter().enumerate() {
            for &op in criterion.operations() {
                parameters.push(
                    ParameterSpec::new(
                        criterion.get_field_name(op),
                        ParameterKind::Criterion {
                            criterion: index,
                            operation: op,
                        },
                        ValueType::for_operation(criterion, op),
                    )
                    .alias(criterion.get_alias_name(op))
                    .required(criterion.is_required(op)),
                );
            }
        }

        for extra in &self.extras {
            parameters.push(
                ParameterSpec::new(
                    extra.name.clone(),
                    ParameterKind::Extra,
                    ValueType::Field(extra.field_type.clone()),
                )
                .default_value(extra.default.clone()),
            );
        }

        if self.q_search.is_some() {
            parameters.push(ParameterSpec::new(Q_SEARCH, ParameterKind::QSearch, ValueType::Text));
        }
        if self.sort_by.is_some() {
            parameters.push(ParameterSpec::new(SORT_BY, ParameterKind::SortBy, ValueType::Sort));
        }
        if self.select_only.is_some() {
            parameters.push(
                ParameterSpec::new(SELECT, ParameterKind::Select, ValueType::Select)
                    .default_value(Some("all".into())),
            );
        }
        match self.pagination {
            Some(PaginationMode::OffsetBased) => {
                parameters.push(
                    ParameterSpec::new(LIMIT, ParameterKind::Limit, ValueType::Integer { minimum: 1 })
                        .default_value(Some(pagination_default(Pagination::DEFAULT_LIMIT))),
                );
                parameters.push(
                    ParameterSpec::new(OFFSET, ParameterKind::Offset, ValueType::Integer { minimum: 0 })
                        .default_value(Some(pagination_default(Pagination::DEFAULT_OFFSET))),
                );
            }
            Some(PaginationMode::PageBased) => {
                parameters.push(
                    ParameterSpec::new(PAGE, ParameterKind::Page, ValueType::Integer { minimum: 1 })
                        .default_value(Some(pagination_default(DEFAULT_PAGE))),
                );
                parameters.push(
                    ParameterSpec::new(
                        PAGE_SIZE,
                        ParameterKind::PageSize,
                        ValueType::Integer { minimum: 1 },
                    )
                    .alias(SIZE)
                    .default_value(Some(pagination_default(Pagination::DEFAULT_LIMIT))),
                );
            }
            None => {}
        }

        let lookup = index_parameters(&parameters)?;
        tracing::debug!(
            criteria = criteria.len(),
            parameters = parameters.len(),
            "Built filter schema"
        );

        Ok(FilterSchema {
            criteria,
            parameters,
            lookup,
            q_search: self.q_search,
            sort_by: self.sort_by,
            select_only: self.select_only,
            pagination: self.pagination,
            backend: self.backend,
        })
    }
}

fn pagination_default(value: u64) -> FilterValue {
    FilterValue::Integer(i64::try_from(value).unwrap_or(i64::MAX))
}

fn validate_criterion(criterion: &FieldCriteria) -> Result<(), ConfigurationError> {
    if criterion.name().trim().is_empty() {
        return Err(ConfigurationError::EmptyFieldName);
    }
    for &op in criterion.operations() {
        let Some(source) = criterion.source() else {
            return Err(ConfigurationError::MissingPredicateSource {
                field: criterion.get_name(),
                operation: op,
            });
        };
        if op == Operation::Btw
            && let Some(column) = source
                .columns()
                .iter()
                .find(|column| !supports_between(column.kind()))
        {
            return Err(ConfigurationError::UnsupportedBetweenColumn {
                column: column.to_string(),
                kind: column.kind().clone(),
            });
        }
    }
    Ok(())
}

/// Map every name and alias to its parameter, rejecting collisions.
fn index_parameters(parameters: &[ParameterSpec]) -> Result<HashMap<String, usize>, ConfigurationError> {
    let mut lookup = HashMap::new();
    for (index, parameter) in parameters.iter().enumerate() {
        for key in [&parameter.name, &parameter.alias] {
            match lookup.insert(key.clone(), index) {
                Some(existing) if existing != index => {
                    return Err(ConfigurationError::DuplicateParameter(key.clone()));
                }
                _ => {}
            }
        }
    }
    Ok(lookup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::operations::LogicalOperator;
    use crate::database::columns::ColumnKind;
    use crate::metadata::QSearch;

    fn users() -> Vec<ColumnRef> {
        vec![
            ColumnRef::new("users", "first_name", ColumnKind::String),
            ColumnRef::new("users", "age", ColumnKind::Integer),
            ColumnRef::new("users", "is_working", ColumnKind::Boolean),
        ]
    }

    fn names(schema: &FilterSchema) -> Vec<&str> {
        schema.parameters().iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_all_fields_use_type_defaults_and_prefix() {
        let schema = FilterConfig::new().columns(users()).prefix("user").all_fields().build().unwrap();
        let names = names(&schema);
        assert!(names.contains(&"user__first_name__ilike"));
        assert!(names.contains(&"user__age__btw"));
        assert!(names.contains(&"user__is_working__is"));
        assert!(!names.contains(&"user__is_working__btw"));
        assert_eq!(schema.criteria().len(), 3);
    }

    #[test]
    fn test_default_ops_override() {
        let schema = FilterConfig::new()
            .columns(users())
            .field_names(["first_name", "age"])
            .default_ops([Operation::Eq, Operation::In])
            .build()
            .unwrap();
        assert_eq!(
            names(&schema),
            vec!["first_name__eq", "first_name__in", "age__eq", "age__in"]
        );
    }

    #[test]
    fn test_unknown_field_name() {
        let error = FilterConfig::new()
            .columns(users())
            .field_names(["nope"])
            .build()
            .unwrap_err();
        assert_eq!(error, ConfigurationError::UnknownColumn("nope".into()));
    }

    #[test]
    fn test_field_names_without_source() {
        let error = FilterConfig::new().field_names(["age"]).build().unwrap_err();
        assert_eq!(error, ConfigurationError::MissingColumnSource);
    }

    #[test]
    fn test_missing_predicate_source_at_build_time() {
        let error = FilterConfig::new()
            .field(FieldCriteria::new("age").of_type(FieldType::Integer).ops([Operation::Gt]))
            .build()
            .unwrap_err();
        assert_eq!(
            error,
            ConfigurationError::MissingPredicateSource {
                field: "age".into(),
                operation: Operation::Gt
            }
        );
    }

    #[test]
    fn test_between_on_text_column_rejected_at_build_time() {
        let error = FilterConfig::new()
            .field(
                FieldCriteria::new("name")
                    .column(ColumnRef::new("users", "name", ColumnKind::String))
                    .ops([Operation::Btw]),
            )
            .build()
            .unwrap_err();
        assert!(matches!(error, ConfigurationError::UnsupportedBetweenColumn { .. }));
    }

    #[test]
    fn test_empty_name_rejected() {
        let error = FilterConfig::new()
            .field(FieldCriteria::new("").column(users()[0].clone()).ops([Operation::Eq]))
            .build()
            .unwrap_err();
        assert_eq!(error, ConfigurationError::EmptyFieldName);
    }

    #[test]
    fn test_duplicate_parameters_rejected() {
        let error = FilterConfig::new()
            .columns(users())
            .field_names(["age"])
            .field(FieldCriteria::new("age").column(users()[1].clone()).ops([Operation::Gt]))
            .build()
            .unwrap_err();
        assert_eq!(error, ConfigurationError::DuplicateParameter("age__gt".into()));
    }

    #[test]
    fn test_required_ops_and_camelcase_aliases() {
        let schema = FilterConfig::new()
            .field(
                FieldCriteria::new("age")
                    .column(users()[1].clone())
                    .ops([Operation::Eq, Operation::Gt])
                    .required_ops([Operation::Eq])
                    .with_prefix("user_private"),
            )
            .alias_as_camelcase(true)
            .build()
            .unwrap();
        let eq = schema.parameter("userPrivateAgeEq").unwrap();
        assert_eq!(eq.name, "user_private__age__eq");
        assert!(eq.required);
        assert!(!schema.parameter("user_private__age__gt").unwrap().required);
    }

    #[test]
    fn test_feature_parameters() {
        let schema = FilterConfig::new()
            .q_search(QSearch::new(users(), Operation::Ilike).logical(LogicalOperator::Or))
            .sort_by(SortBy::new([("age", users()[1].clone())]))
            .select_only(Selectable::new([("age", users()[1].clone())]))
            .pagination(PaginationMode::PageBased)
            .extra_field(ExtraField::new("user__address__eq", FieldType::String).with_default("address"))
            .build()
            .unwrap();
        assert_eq!(
            names(&schema),
            vec!["user__address__eq", "q_search", "sort_by", "select", "page", "page_size"]
        );
        assert_eq!(schema.parameter("size").unwrap().name, "page_size");
    }

    #[test]
    fn test_offset_parameters() {
        let schema = FilterConfig::new()
            .pagination(PaginationMode::OffsetBased)
            .build()
            .unwrap();
        assert_eq!(names(&schema), vec!["limit", "offset"]);
    }
}
