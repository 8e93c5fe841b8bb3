use crate::core::operations::Operation;
use crate::core::value::FilterValue;
use crate::metadata::{FieldCriteria, FieldType};

/// What a parameter's raw value is coerced into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueType {
    /// The criterion's semantic type
    Field(FieldType),
    /// Boolean, whatever the field type (`isnull`)
    Flag,
    /// Boolean or `null`/`none` (`is`)
    NullableFlag,
    /// Raw comma-separated text, cast per element by the operation
    List,
    /// Free text (`q_search`)
    Text,
    /// Sortable grammar (`sort_by`)
    Sort,
    /// Selectable grammar (`select`)
    Select,
    /// Pagination number with a lower bound
    Integer { minimum: i64 },
}

impl ValueType {
    /// Value type generated for `op` on a criterion.
    #[must_use]
    pub fn for_operation(criterion: &FieldCriteria, op: Operation) -> Self {
        match op {
            Operation::Isnull => Self::Flag,
            Operation::Is => Self::NullableFlag,
            op if op.takes_list() => Self::List,
            _ => Self::Field(criterion.field_type()),
        }
    }
}

/// Role of a generated parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    /// One `(criterion, operation)` pair; `criterion` indexes the schema's criteria
    Criterion { criterion: usize, operation: Operation },
    /// Passthrough field, never compiled
    Extra,
    QSearch,
    SortBy,
    Select,
    Limit,
    Offset,
    Page,
    PageSize,
}

/// One generated request parameter.
#[derive(Debug, Clone)]
pub struct ParameterSpec {
    /// Internal name, e.g. `user__age__gt`
    pub name: String,
    /// Public name; equal to `name` unless camelCase aliasing is on
    pub alias: String,
    pub kind: ParameterKind,
    pub value_type: ValueType,
    pub required: bool,
    /// Value used when the parameter is absent
    pub default: Option<FilterValue>,
}

impl ParameterSpec {
    pub(crate) fn new(name: impl Into<String>, kind: ParameterKind, value_type: ValueType) -> Self {
        let name = name.into();
        Self {
            alias: name.clone(),
            name,
            kind,
            value_type,
            required: false,
            default: None,
        }
    }

    #[must_use]
    pub(crate) fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = alias.into();
        self
    }

    #[must_use]
    pub(crate) fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    #[must_use]
    pub(crate) fn default_value(mut self, default: Option<FilterValue>) -> Self {
        self.default = default;
        self
    }

    /// Whether `key` addresses this parameter, by name or alias.
    #[must_use]
    pub fn matches(&self, key: &str) -> bool {
        self.name == key || self.alias == key
    }
}

/// Parameter declared without criteria metadata.
///
/// It is coerced and exposed through
/// [`FilterParams::extra`](crate::schema::FilterParams::extra) but never
/// turns into a predicate.
#[derive(Debug, Clone)]
pub struct ExtraField {
    pub(crate) name: String,
    pub(crate) field_type: FieldType,
    pub(crate) default: Option<FilterValue>,
}

impl ExtraField {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            default: None,
        }
    }

    #[must_use]
    pub fn with_default(mut self, value: impl Into<FilterValue>) -> Self {
        self.default = Some(value.into());
        self
    }
}
