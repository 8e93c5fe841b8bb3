/*!
# Column References

Opaque handles to backing data columns. A [`ColumnRef`] carries enough
information to render itself as a qualified column expression and to report
its declared scalar kind, which drives element casting for list operations
(`in`, `notin`, `cont`, `btw`) and parameter type resolution.

Any Sea-ORM column converts into a `ColumnRef`:

```rust,ignore
let age: ColumnRef = user::Column::Age.into();
assert_eq!(age.kind(), &ColumnKind::Integer);
```
*/

use sea_orm::sea_query::{Alias, Expr, SimpleExpr};
use sea_orm::{ColumnTrait, ColumnType, EntityTrait, Iterable};
use std::fmt;
use std::marker::PhantomData;

use crate::schema::casing::to_snake_case;

/// Declared scalar kind of a backing column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnKind {
    String,
    Integer,
    Float,
    Boolean,
    Date,
    DateTime,
    Time,
    Uuid,
    /// Enumeration with its allowed variant values
    Enum(Vec<String>),
    /// Multi-valued column holding elements of the inner kind
    Array(Box<ColumnKind>),
    Json,
    /// Anything the mapping has no special handling for
    Other,
}

impl ColumnKind {
    /// Kind of a single element: the inner kind for arrays, itself otherwise.
    #[must_use]
    pub fn element(&self) -> &ColumnKind {
        match self {
            Self::Array(inner) => inner.element(),
            other => other,
        }
    }

    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    /// Text-like kinds use substring matching for `cont`.
    #[must_use]
    pub fn is_textual(&self) -> bool {
        matches!(self, Self::String | Self::Enum(_) | Self::Json | Self::Other)
    }
}

impl From<&ColumnType> for ColumnKind {
    fn from(column_type: &ColumnType) -> Self {
        match column_type {
            ColumnType::Char(_) | ColumnType::String(_) | ColumnType::Text => Self::String,
            ColumnType::TinyInteger
            | ColumnType::SmallInteger
            | ColumnType::Integer
            | ColumnType::BigInteger
            | ColumnType::TinyUnsigned
            | ColumnType::SmallUnsigned
            | ColumnType::Unsigned
            | ColumnType::BigUnsigned => Self::Integer,
            ColumnType::Float | ColumnType::Double | ColumnType::Decimal(_) | ColumnType::Money(_) => {
                Self::Float
            }
            ColumnType::Boolean => Self::Boolean,
            ColumnType::Date => Self::Date,
            ColumnType::DateTime | ColumnType::Timestamp | ColumnType::TimestampWithTimeZone => {
                Self::DateTime
            }
            ColumnType::Time => Self::Time,
            ColumnType::Uuid => Self::Uuid,
            ColumnType::Enum { variants, .. } => {
                Self::Enum(variants.iter().map(|variant| variant.to_string()).collect())
            }
            ColumnType::Array(inner) => Self::Array(Box::new(Self::from(inner.as_ref()))),
            ColumnType::Json | ColumnType::JsonBinary => Self::Json,
            _ => Self::Other,
        }
    }
}

/// Handle to a backing column, usable as a predicate operand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    table: Option<String>,
    name: String,
    kind: ColumnKind,
}

impl ColumnRef {
    pub fn new(table: impl Into<String>, name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            table: Some(table.into()),
            name: name.into(),
            kind,
        }
    }

    /// Column without a table qualifier.
    pub fn unqualified(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            table: None,
            name: name.into(),
            kind,
        }
    }

    #[must_use]
    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn kind(&self) -> &ColumnKind {
        &self.kind
    }

    /// Column as a bare expression builder (`"table"."name"`).
    #[must_use]
    pub fn col(&self) -> Expr {
        match &self.table {
            Some(table) => Expr::col((Alias::new(table), Alias::new(&self.name))),
            None => Expr::col(Alias::new(&self.name)),
        }
    }

    #[must_use]
    pub fn expr(&self) -> SimpleExpr {
        self.col().into()
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.table {
            Some(table) => write!(f, "{table}.{}", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

impl<C> From<C> for ColumnRef
where
    C: ColumnTrait,
{
    fn from(column: C) -> Self {
        Self {
            table: Some(column.entity_name().to_string()),
            name: column.as_str().to_string(),
            kind: ColumnKind::from(column.def().get_column_type()),
        }
    }
}

/// External source of column references, used to resolve plain field names.
pub trait ColumnSource: Send + Sync {
    /// Every column of the source, in declaration order.
    fn columns(&self) -> Vec<ColumnRef>;

    /// Look up a column by name; camelCase names match their snake_case column.
    fn column(&self, name: &str) -> Option<ColumnRef> {
        let snake = to_snake_case(name);
        self.columns()
            .into_iter()
            .find(|column| column.name() == name || column.name() == snake)
    }
}

/// Column source backed by a Sea-ORM entity.
pub struct EntityColumns<E> {
    _entity: PhantomData<fn() -> E>,
}

impl<E: EntityTrait> EntityColumns<E> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            _entity: PhantomData,
        }
    }
}

impl<E: EntityTrait> Default for EntityColumns<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: EntityTrait> ColumnSource for EntityColumns<E> {
    fn columns(&self) -> Vec<ColumnRef> {
        E::Column::iter().map(ColumnRef::from).collect()
    }
}

/// Fixed list of columns, for hosts that describe their schema by hand.
impl ColumnSource for Vec<ColumnRef> {
    fn columns(&self) -> Vec<ColumnRef> {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::sea_query::{Query, SqliteQueryBuilder};

    #[test]
    fn test_array_element_kind() {
        let kind = ColumnKind::Array(Box::new(ColumnKind::String));
        assert!(kind.is_array());
        assert_eq!(kind.element(), &ColumnKind::String);
        assert_eq!(ColumnKind::Integer.element(), &ColumnKind::Integer);
    }

    #[test]
    fn test_column_type_mapping() {
        assert_eq!(ColumnKind::from(&ColumnType::Text), ColumnKind::String);
        assert_eq!(ColumnKind::from(&ColumnType::BigInteger), ColumnKind::Integer);
        assert_eq!(ColumnKind::from(&ColumnType::Double), ColumnKind::Float);
        assert_eq!(ColumnKind::from(&ColumnType::Boolean), ColumnKind::Boolean);
        assert_eq!(ColumnKind::from(&ColumnType::Date), ColumnKind::Date);
        assert_eq!(
            ColumnKind::from(&ColumnType::TimestampWithTimeZone),
            ColumnKind::DateTime
        );
        assert_eq!(ColumnKind::from(&ColumnType::Uuid), ColumnKind::Uuid);
        assert_eq!(ColumnKind::from(&ColumnType::Json), ColumnKind::Json);
    }

    #[test]
    fn test_qualified_column_renders_table() {
        let column = ColumnRef::new("users", "age", ColumnKind::Integer);
        let sql = Query::select()
            .expr(column.expr())
            .from(Alias::new("users"))
            .to_string(SqliteQueryBuilder);
        assert_eq!(sql, r#"SELECT "users"."age" FROM "users""#);
        assert_eq!(column.to_string(), "users.age");
    }

    #[test]
    fn test_vec_source_resolves_camel_case() {
        let source = vec![
            ColumnRef::new("users", "first_name", ColumnKind::String),
            ColumnRef::new("users", "age", ColumnKind::Integer),
        ];
        assert_eq!(source.column("firstName").map(|c| c.name().to_string()), Some("first_name".into()));
        assert_eq!(source.column("age").map(|c| c.name().to_string()), Some("age".into()));
        assert!(source.column("missing").is_none());
    }
}
