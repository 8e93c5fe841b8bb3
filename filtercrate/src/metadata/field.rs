use sea_orm::sea_query::SimpleExpr;
use std::fmt;
use std::sync::Arc;

use crate::core::operations::{LogicalOperator, Operation};
use crate::core::value::FilterValue;
use crate::database::columns::{ColumnKind, ColumnRef};
use crate::schema::casing::to_camel_case;

/// Semantic type of a criterion's parameter values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    String,
    Integer,
    Float,
    Boolean,
    Date,
    DateTime,
    Time,
    Uuid,
    /// Value must be one of the listed variants
    Enum(Vec<String>),
}

impl FieldType {
    /// Operations exposed for a column-resolved field of this type.
    #[must_use]
    pub fn default_operations(&self) -> &'static [Operation] {
        use Operation::{Btw, Cont, Eq, Gt, Gte, Ilike, In, Is, Isnull, Like, Lt, Lte, Neq, Notin};
        match self {
            Self::String => &[Eq, Neq, Like, Ilike, In, Notin, Cont, Isnull],
            Self::Integer | Self::Float => &[Eq, Neq, Gt, Gte, Lt, Lte, In, Notin, Btw, Isnull],
            Self::Boolean => &[Eq, Is, Isnull],
            Self::Date | Self::DateTime | Self::Time => &[Eq, Neq, Gt, Gte, Lt, Lte, Btw, Isnull],
            Self::Uuid | Self::Enum(_) => &[Eq, Neq, In, Notin, Isnull],
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::DateTime => "datetime",
            Self::Time => "time",
            Self::Uuid => "uuid",
            Self::Enum(_) => "enum",
        }
    }
}

/// Closest semantic type for a column kind; arrays use their element kind and
/// anything unresolvable is treated as a string.
impl From<&ColumnKind> for FieldType {
    fn from(kind: &ColumnKind) -> Self {
        match kind.element() {
            ColumnKind::Integer => Self::Integer,
            ColumnKind::Float => Self::Float,
            ColumnKind::Boolean => Self::Boolean,
            ColumnKind::Date => Self::Date,
            ColumnKind::DateTime => Self::DateTime,
            ColumnKind::Time => Self::Time,
            ColumnKind::Uuid => Self::Uuid,
            ColumnKind::Enum(variants) => Self::Enum(variants.clone()),
            _ => Self::String,
        }
    }
}

/// Caller-supplied predicate builder, invoked with the criterion and the
/// request value. Returning `None` adds no constraint.
pub type CustomFilterFn =
    Arc<dyn Fn(&FieldCriteria, &FilterValue) -> Option<SimpleExpr> + Send + Sync>;

/// What a criterion compiles against.
#[derive(Clone)]
pub enum PredicateSource {
    /// One column, passed straight to the operation mapping
    Column(ColumnRef),
    /// Every column gets the same operation; results are combined with `logical`
    Group {
        columns: Vec<ColumnRef>,
        logical: LogicalOperator,
    },
    /// Bypasses the operation mapping entirely
    Custom(CustomFilterFn),
}

impl PredicateSource {
    /// Backing columns, empty for custom filters.
    #[must_use]
    pub fn columns(&self) -> &[ColumnRef] {
        match self {
            Self::Column(column) => std::slice::from_ref(column),
            Self::Group { columns, .. } => columns,
            Self::Custom(_) => &[],
        }
    }
}

impl fmt::Debug for PredicateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Column(column) => f.debug_tuple("Column").field(column).finish(),
            Self::Group { columns, logical } => f
                .debug_struct("Group")
                .field("columns", columns)
                .field("logical", logical)
                .finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// A named, typed field plus the operations it supports.
///
/// Each allowed operation becomes one request parameter named
/// `{prefix}__{name}__{op}` (prefix omitted when absent).
///
/// ```rust,ignore
/// let age = FieldCriteria::new("age")
///     .column(user::Column::Age)
///     .ops([Operation::Gt, Operation::Lt])
///     .required_ops([Operation::Gt])
///     .with_prefix("user");
/// assert_eq!(age.get_field_name(Operation::Gt), "user__age__gt");
/// ```
#[derive(Debug, Clone)]
pub struct FieldCriteria {
    name: String,
    field_type: Option<FieldType>,
    operations: Vec<Operation>,
    required: Vec<Operation>,
    prefix: Option<String>,
    source: Option<PredicateSource>,
    alias_as_camelcase: bool,
}

impl FieldCriteria {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: None,
            operations: Vec::new(),
            required: Vec::new(),
            prefix: None,
            source: None,
            alias_as_camelcase: false,
        }
    }

    #[must_use]
    pub fn of_type(mut self, field_type: FieldType) -> Self {
        self.field_type = Some(field_type);
        self
    }

    /// Allowed operations, in parameter generation order. Duplicates are ignored.
    #[must_use]
    pub fn ops(mut self, operations: impl IntoIterator<Item = Operation>) -> Self {
        self.operations.clear();
        for op in operations {
            if !self.operations.contains(&op) {
                self.operations.push(op);
            }
        }
        self
    }

    /// Operations whose parameter must be present in every request.
    #[must_use]
    pub fn required_ops(mut self, operations: impl IntoIterator<Item = Operation>) -> Self {
        self.required = operations.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    #[must_use]
    pub fn column(mut self, column: impl Into<ColumnRef>) -> Self {
        self.source = Some(PredicateSource::Column(column.into()));
        self
    }

    #[must_use]
    pub fn column_group<C: Into<ColumnRef>>(
        mut self,
        columns: impl IntoIterator<Item = C>,
        logical: LogicalOperator,
    ) -> Self {
        self.source = Some(PredicateSource::Group {
            columns: columns.into_iter().map(Into::into).collect(),
            logical,
        });
        self
    }

    #[must_use]
    pub fn custom_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&FieldCriteria, &FilterValue) -> Option<SimpleExpr> + Send + Sync + 'static,
    {
        self.source = Some(PredicateSource::Custom(Arc::new(filter)));
        self
    }

    #[must_use]
    pub fn alias_as_camelcase(mut self, enabled: bool) -> Self {
        self.alias_as_camelcase = enabled;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type, else the type of the first backing column, else string.
    #[must_use]
    pub fn field_type(&self) -> FieldType {
        if let Some(field_type) = &self.field_type {
            return field_type.clone();
        }
        self.source
            .as_ref()
            .and_then(|source| source.columns().first())
            .map_or(FieldType::String, |column| FieldType::from(column.kind()))
    }

    #[must_use]
    pub fn declared_type(&self) -> Option<&FieldType> {
        self.field_type.as_ref()
    }

    #[must_use]
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    #[must_use]
    pub fn required_operations(&self) -> &[Operation] {
        &self.required
    }

    #[must_use]
    pub fn is_required(&self, op: Operation) -> bool {
        self.required.contains(&op)
    }

    #[must_use]
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    #[must_use]
    pub fn source(&self) -> Option<&PredicateSource> {
        self.source.as_ref()
    }

    #[must_use]
    pub fn uses_camelcase(&self) -> bool {
        self.alias_as_camelcase
    }

    /// `{prefix}__{name}`, or just the name without a prefix.
    #[must_use]
    pub fn get_name(&self) -> String {
        match self.prefix.as_deref() {
            Some(prefix) if !prefix.is_empty() => format!("{prefix}__{}", self.name),
            _ => self.name.clone(),
        }
    }

    #[must_use]
    pub fn get_field_name(&self, op: Operation) -> String {
        format!("{}__{op}", self.get_name())
    }

    /// Public parameter name: camelCase of the field name when enabled.
    #[must_use]
    pub fn get_alias_name(&self, op: Operation) -> String {
        let field_name = self.get_field_name(op);
        if self.alias_as_camelcase {
            to_camel_case(&field_name)
        } else {
            field_name
        }
    }

    pub(crate) fn set_default_prefix(&mut self, prefix: Option<&str>) {
        if self.prefix.is_none() {
            self.prefix = prefix.map(ToString::to_string);
        }
    }

    pub(crate) fn enable_camelcase(&mut self) {
        self.alias_as_camelcase = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_with_prefix_and_camelcase_alias() {
        let criterion = FieldCriteria::new("age")
            .of_type(FieldType::Integer)
            .ops([Operation::Gt])
            .with_prefix("user")
            .alias_as_camelcase(true);
        assert_eq!(criterion.get_name(), "user__age");
        assert_eq!(criterion.get_field_name(Operation::Gt), "user__age__gt");
        assert_eq!(criterion.get_alias_name(Operation::Gt), "userAgeGt");
    }

    #[test]
    fn test_camelcase_alias_keeps_acronyms() {
        let criterion = FieldCriteria::new("userID")
            .ops([Operation::Eq])
            .alias_as_camelcase(true);
        assert_eq!(criterion.get_alias_name(Operation::Eq), "userIDEq");

        let prefixed = FieldCriteria::new("API_Key")
            .ops([Operation::Eq])
            .with_prefix("acct")
            .alias_as_camelcase(true);
        assert_eq!(prefixed.get_alias_name(Operation::Eq), "acctAPIKeyEq");
    }

    #[test]
    fn test_names_without_prefix_keep_plain_alias() {
        let criterion = FieldCriteria::new("status").ops([Operation::Eq]);
        assert_eq!(criterion.get_name(), "status");
        assert_eq!(criterion.get_field_name(Operation::Eq), "status__eq");
        assert_eq!(criterion.get_alias_name(Operation::Eq), "status__eq");
    }

    #[test]
    fn test_type_inferred_from_column() {
        let criterion = FieldCriteria::new("age").column(ColumnRef::new(
            "users",
            "age",
            ColumnKind::Integer,
        ));
        assert_eq!(criterion.field_type(), FieldType::Integer);
        assert_eq!(criterion.declared_type(), None);

        let untyped = FieldCriteria::new("plain_attr");
        assert_eq!(untyped.field_type(), FieldType::String);
    }

    #[test]
    fn test_array_and_json_columns_resolve_to_element_or_string() {
        let titles = ColumnKind::Array(Box::new(ColumnKind::String));
        assert_eq!(FieldType::from(&titles), FieldType::String);
        assert_eq!(FieldType::from(&ColumnKind::Json), FieldType::String);
        assert_eq!(
            FieldType::from(&ColumnKind::Array(Box::new(ColumnKind::Integer))),
            FieldType::Integer
        );
    }

    #[test]
    fn test_duplicate_ops_are_ignored() {
        let criterion = FieldCriteria::new("x").ops([Operation::Eq, Operation::Eq, Operation::In]);
        assert_eq!(criterion.operations(), &[Operation::Eq, Operation::In]);
    }

    #[test]
    fn test_required_ops() {
        let criterion = FieldCriteria::new("age")
            .ops([Operation::Eq, Operation::Gt])
            .required_ops([Operation::Eq]);
        assert!(criterion.is_required(Operation::Eq));
        assert!(!criterion.is_required(Operation::Gt));
    }

    #[test]
    fn test_default_operations_per_type() {
        assert!(FieldType::String.default_operations().contains(&Operation::Ilike));
        assert!(FieldType::Integer.default_operations().contains(&Operation::Btw));
        assert!(!FieldType::Boolean.default_operations().contains(&Operation::Btw));
        assert_eq!(
            FieldType::Enum(vec!["MAN".into()]).default_operations(),
            FieldType::Uuid.default_operations()
        );
    }
}
