use std::ops::Deref;

use crate::database::columns::{ColumnRef, ColumnSource};
use crate::schema::casing::to_camel_case;

/// Ordered mapping from external names to columns.
///
/// With camelCase aliasing enabled, `first_name` is exposed and looked up as
/// `firstName`.
#[derive(Debug, Clone, Default)]
pub struct ColumnRegistry {
    entries: Vec<(String, ColumnRef)>,
    alias_as_camelcase: bool,
}

impl ColumnRegistry {
    pub fn new<N, C>(entries: impl IntoIterator<Item = (N, C)>) -> Self
    where
        N: Into<String>,
        C: Into<ColumnRef>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(name, column)| (name.into(), column.into()))
                .collect(),
            alias_as_camelcase: false,
        }
    }

    /// Every column of a source, keyed by column name.
    #[must_use]
    pub fn from_source(source: &dyn ColumnSource) -> Self {
        Self::new(
            source
                .columns()
                .into_iter()
                .map(|column| (column.name().to_string(), column)),
        )
    }

    #[must_use]
    pub fn alias_as_camelcase(mut self, enabled: bool) -> Self {
        self.alias_as_camelcase = enabled;
        self
    }

    fn external(&self, name: &str) -> String {
        if self.alias_as_camelcase {
            to_camel_case(name)
        } else {
            name.to_string()
        }
    }

    /// Allowed external names, in registry order.
    #[must_use]
    pub fn get_names(&self) -> Vec<String> {
        self.entries.iter().map(|(name, _)| self.external(name)).collect()
    }

    /// Column registered under an external name.
    #[must_use]
    pub fn get_attr(&self, name: &str) -> Option<&ColumnRef> {
        self.entries
            .iter()
            .find(|(key, _)| self.external(key) == name)
            .map(|(_, column)| column)
    }

    /// Every registered column, in registry order.
    #[must_use]
    pub fn columns(&self) -> Vec<ColumnRef> {
        self.entries.iter().map(|(_, column)| column.clone()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

macro_rules! registry_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default)]
        pub struct $name(ColumnRegistry);

        impl $name {
            pub fn new<N, C>(entries: impl IntoIterator<Item = (N, C)>) -> Self
            where
                N: Into<String>,
                C: Into<ColumnRef>,
            {
                Self(ColumnRegistry::new(entries))
            }

            #[must_use]
            pub fn from_source(source: &dyn ColumnSource) -> Self {
                Self(ColumnRegistry::from_source(source))
            }

            #[must_use]
            pub fn alias_as_camelcase(self, enabled: bool) -> Self {
                Self(self.0.alias_as_camelcase(enabled))
            }
        }

        impl Deref for $name {
            type Target = ColumnRegistry;

            fn deref(&self) -> &ColumnRegistry {
                &self.0
            }
        }

        impl From<ColumnRegistry> for $name {
            fn from(registry: ColumnRegistry) -> Self {
                Self(registry)
            }
        }
    };
}

registry_newtype!(
    /// Columns a request may order by.
    SortBy
);

registry_newtype!(
    /// Columns a request may project.
    Selectable
);
