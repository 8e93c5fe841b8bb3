//! OpenAPI description of a generated parameter model.
//!
//! Handlers that bind a [`FilterSchema`] by hand can still document their
//! query string by appending these parameters to the path item:
//!
//! ```rust,ignore
//! let mut operation = /* utoipa path operation */;
//! operation.parameters = Some(schema.openapi_parameters());
//! ```

use utoipa::openapi::path::{Parameter, ParameterBuilder, ParameterIn};
use utoipa::openapi::schema::{KnownFormat, ObjectBuilder, Schema, SchemaFormat, SchemaType, Type};
use utoipa::openapi::{RefOr, Required};

use crate::metadata::FieldType;
use crate::schema::{FilterSchema, ParameterKind, ParameterSpec, ValueType};

impl FilterSchema {
    /// One query parameter per generated parameter, named by its alias.
    #[must_use]
    pub fn openapi_parameters(&self) -> Vec<Parameter> {
        self.parameters().iter().map(parameter).collect()
    }
}

fn parameter(spec: &ParameterSpec) -> Parameter {
    ParameterBuilder::new()
        .name(&spec.alias)
        .parameter_in(ParameterIn::Query)
        .required(if spec.required {
            Required::True
        } else {
            Required::False
        })
        .description(Some(description(spec)))
        .schema(Some(RefOr::T(Schema::Object(value_schema(spec).into()))))
        .build()
}

fn description(spec: &ParameterSpec) -> String {
    match spec.kind {
        ParameterKind::Criterion { operation, .. } if operation.takes_list() => {
            format!("`{operation}` filter, comma-separated values")
        }
        ParameterKind::Criterion { operation, .. } => format!("`{operation}` filter"),
        ParameterKind::Extra => "Passthrough value".to_string(),
        ParameterKind::QSearch => "Free-text search".to_string(),
        ParameterKind::SortBy => {
            "Comma-separated fields; a leading '-' sorts descending".to_string()
        }
        ParameterKind::Select => "'all' or comma-separated fields".to_string(),
        ParameterKind::Limit => "Maximum number of items".to_string(),
        ParameterKind::Offset => "Number of items to skip".to_string(),
        ParameterKind::Page => "1-based page number".to_string(),
        ParameterKind::PageSize => "Items per page".to_string(),
    }
}

fn value_schema(spec: &ParameterSpec) -> ObjectBuilder {
    let builder = match &spec.value_type {
        ValueType::Field(field_type) => field_schema(field_type),
        ValueType::Flag => ObjectBuilder::new().schema_type(Type::Boolean),
        ValueType::NullableFlag => {
            ObjectBuilder::new().schema_type(SchemaType::from_iter([Type::Boolean, Type::Null]))
        }
        ValueType::List | ValueType::Text | ValueType::Sort | ValueType::Select => {
            ObjectBuilder::new().schema_type(Type::String)
        }
        ValueType::Integer { minimum } => ObjectBuilder::new()
            .schema_type(Type::Integer)
            .format(Some(SchemaFormat::KnownFormat(KnownFormat::Int64)))
            .minimum(Some(*minimum)),
    };
    let default = spec
        .default
        .as_ref()
        .and_then(|value| serde_json::to_value(value).ok());
    builder.default(default)
}

fn field_schema(field_type: &FieldType) -> ObjectBuilder {
    let string = ObjectBuilder::new().schema_type(Type::String);
    match field_type {
        FieldType::String => string,
        FieldType::Integer => ObjectBuilder::new()
            .schema_type(Type::Integer)
            .format(Some(SchemaFormat::KnownFormat(KnownFormat::Int64))),
        FieldType::Float => ObjectBuilder::new()
            .schema_type(Type::Number)
            .format(Some(SchemaFormat::KnownFormat(KnownFormat::Double))),
        FieldType::Boolean => ObjectBuilder::new().schema_type(Type::Boolean),
        FieldType::Date => string.format(Some(SchemaFormat::KnownFormat(KnownFormat::Date))),
        FieldType::DateTime => {
            string.format(Some(SchemaFormat::KnownFormat(KnownFormat::DateTime)))
        }
        FieldType::Time => string.format(Some(SchemaFormat::Custom("time".to_string()))),
        FieldType::Uuid => string.format(Some(SchemaFormat::Custom("uuid".to_string()))),
        FieldType::Enum(variants) => string.enum_values(Some(variants.clone())),
    }
}
