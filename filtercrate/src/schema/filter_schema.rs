use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::coerce::coerce;
use super::parameter::{ParameterKind, ParameterSpec};
use super::validators::{SelectInput, SortInput, validate_selectable_schema, validate_sortable_schema};
use crate::core::backend::PredicateBackend;
use crate::core::operations::{Operation, PaginationMode, SortDirection};
use crate::core::value::FilterValue;
use crate::errors::{ConfigurationError, FilterError};
use crate::filtering::{
    build_filters, build_q_search, build_selected_columns, build_sorting, parse_offset, parse_page,
};
use crate::metadata::{FieldCriteria, SearchSpec, Selectable, SortBy};
use crate::models::{FilterResult, Pagination};
use crate::validation::{ValidationError, ValidationErrors};

/// Generated parameter model of a filter configuration.
///
/// Produced by [`FilterConfig::build`](super::FilterConfig::build). Immutable
/// after construction, so it can be shared across request handlers behind an
/// `Arc`.
pub struct FilterSchema {
    pub(super) criteria: Vec<FieldCriteria>,
    pub(super) parameters: Vec<ParameterSpec>,
    /// Parameter index by name and by alias
    pub(super) lookup: HashMap<String, usize>,
    pub(super) q_search: Option<SearchSpec>,
    pub(super) sort_by: Option<SortBy>,
    pub(super) select_only: Option<Selectable>,
    pub(super) pagination: Option<PaginationMode>,
    pub(super) backend: Arc<dyn PredicateBackend>,
}

impl fmt::Debug for FilterSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterSchema")
            .field("criteria", &self.criteria)
            .field("parameters", &self.parameters)
            .field("q_search", &self.q_search)
            .field("sort_by", &self.sort_by)
            .field("select_only", &self.select_only)
            .field("pagination", &self.pagination)
            .finish_non_exhaustive()
    }
}

impl FilterSchema {
    /// Generated parameters, in generation order.
    #[must_use]
    pub fn parameters(&self) -> &[ParameterSpec] {
        &self.parameters
    }

    #[must_use]
    pub fn criteria(&self) -> &[FieldCriteria] {
        &self.criteria
    }

    /// Parameter addressed by `key`, which may be its name or its alias.
    #[must_use]
    pub fn parameter(&self, key: &str) -> Option<&ParameterSpec> {
        self.lookup.get(key).map(|&index| &self.parameters[index])
    }

    #[must_use]
    pub fn pagination_mode(&self) -> Option<PaginationMode> {
        self.pagination
    }

    #[must_use]
    pub fn backend(&self) -> &dyn PredicateBackend {
        self.backend.as_ref()
    }

    /// Bind request pairs to the parameter model.
    ///
    /// Keys match a parameter's name or alias; unknown keys are ignored.
    /// Repeated `select`/`sort_by` keys form the list grammar, any other
    /// repeated key keeps its last value.
    ///
    /// # Errors
    ///
    /// Returns every validation failure of the request at once.
    pub fn parse<I, K, V>(&self, pairs: I) -> Result<FilterParams<'_>, ValidationErrors>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut raw: Vec<Vec<String>> = vec![Vec::new(); self.parameters.len()];
        for (key, value) in pairs {
            if let Some(&index) = self.lookup.get(key.as_ref()) {
                raw[index].push(value.as_ref().to_string());
            }
        }

        let mut errors = ValidationErrors::new();
        let mut params = FilterParams {
            schema: self,
            values: Vec::new(),
            q_search: None,
            sort: None,
            select: None,
            pagination: None,
        };
        let mut window: [Option<String>; 2] = [None, None];

        for (index, (spec, mut values)) in self.parameters.iter().zip(raw).enumerate() {
            if values.is_empty() && spec.required {
                errors.add(ValidationError::new(&spec.alias, "Field required"));
                continue;
            }

            match spec.kind {
                ParameterKind::Criterion { .. } | ParameterKind::Extra => {
                    let value = match values.pop() {
                        Some(raw) => match coerce(&spec.value_type, &raw) {
                            Ok(value) => value,
                            Err(message) => {
                                errors.add(ValidationError::new(&spec.alias, message));
                                continue;
                            }
                        },
                        None => match &spec.default {
                            Some(default) => default.clone(),
                            None => continue,
                        },
                    };
                    params.values.push((index, value));
                }
                ParameterKind::QSearch => params.q_search = values.pop(),
                ParameterKind::SortBy => {
                    let Some(sort_by) = &self.sort_by else { continue };
                    let input = match values.len() {
                        0 => continue,
                        1 => SortInput::Text(values.remove(0)),
                        _ => SortInput::List(values),
                    };
                    match validate_sortable_schema(sort_by.get_names())(input) {
                        Ok(terms) => params.sort = Some(terms),
                        Err(error) => errors.add(error),
                    }
                }
                ParameterKind::Select => {
                    let Some(selectable) = &self.select_only else { continue };
                    let input = match values.len() {
                        0 => SelectInput::Text(
                            spec.default
                                .as_ref()
                                .and_then(FilterValue::as_str)
                                .unwrap_or("all")
                                .to_string(),
                        ),
                        1 => SelectInput::Text(values.remove(0)),
                        _ => SelectInput::List(values),
                    };
                    match validate_selectable_schema(selectable.get_names())(input) {
                        Ok(names) => params.select = Some(names),
                        Err(error) => errors.add(error),
                    }
                }
                ParameterKind::Limit | ParameterKind::Page => window[0] = values.pop(),
                ParameterKind::Offset | ParameterKind::PageSize => window[1] = values.pop(),
            }
        }

        let [first, second] = window;
        let pagination = match self.pagination {
            Some(PaginationMode::OffsetBased) => Some(parse_offset(first.as_deref(), second.as_deref())),
            Some(PaginationMode::PageBased) => Some(parse_page(first.as_deref(), second.as_deref())),
            None => None,
        };
        match pagination {
            Some(Ok(pagination)) => params.pagination = Some(pagination),
            Some(Err(failures)) => {
                for error in failures.errors() {
                    errors.add(error.clone());
                }
            }
            None => {}
        }

        errors.result().map(|()| params)
    }

    /// Bind an urlencoded query string, e.g. `age__gt=18&sort_by=-age`.
    ///
    /// # Errors
    ///
    /// See [`FilterSchema::parse`].
    pub fn parse_query(&self, query: &str) -> Result<FilterParams<'_>, ValidationErrors> {
        self.parse(url::form_urlencoded::parse(query.as_bytes()))
    }

    /// Bind and compile in one step.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::Validation`] for bad input and
    /// [`FilterError::Configuration`] when compilation hits a backend table
    /// without the needed mapping.
    pub fn resolve<I, K, V>(&self, pairs: I) -> Result<FilterResult, FilterError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        Ok(self.parse(pairs)?.filter_result()?)
    }
}

/// One request bound to a [`FilterSchema`].
#[derive(Debug)]
pub struct FilterParams<'s> {
    schema: &'s FilterSchema,
    /// Criterion and passthrough values by parameter index, in generation order
    values: Vec<(usize, FilterValue)>,
    q_search: Option<String>,
    sort: Option<Vec<(String, SortDirection)>>,
    select: Option<Vec<String>>,
    pagination: Option<Pagination>,
}

impl<'s> FilterParams<'s> {
    #[must_use]
    pub fn schema(&self) -> &'s FilterSchema {
        self.schema
    }

    /// Value bound to a criterion or passthrough parameter, by name or alias.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&FilterValue> {
        let index = *self.schema.lookup.get(key)?;
        self.values
            .iter()
            .find(|(bound, _)| *bound == index)
            .map(|(_, value)| value)
    }

    /// Value of a passthrough field.
    #[must_use]
    pub fn extra(&self, name: &str) -> Option<&FilterValue> {
        let spec = self.schema.parameter(name)?;
        if spec.kind == ParameterKind::Extra {
            self.value(name)
        } else {
            None
        }
    }

    #[must_use]
    pub fn q_search(&self) -> Option<&str> {
        self.q_search.as_deref()
    }

    /// Validated sort terms in requested order.
    #[must_use]
    pub fn sort(&self) -> Option<&[(String, SortDirection)]> {
        self.sort.as_deref()
    }

    /// Validated selection; `"all"` is already expanded.
    #[must_use]
    pub fn select(&self) -> Option<&[String]> {
        self.select.as_deref()
    }

    #[must_use]
    pub fn pagination(&self) -> Option<Pagination> {
        self.pagination
    }

    /// Supplied criterion values as `(criterion, operation, value)`.
    pub fn criteria_values(&self) -> impl Iterator<Item = (&FieldCriteria, Operation, &FilterValue)> {
        let schema = self.schema;
        self.values.iter().filter_map(move |(index, value)| {
            match schema.parameters[*index].kind {
                ParameterKind::Criterion { criterion, operation } => {
                    Some((&schema.criteria[criterion], operation, value))
                }
                _ => None,
            }
        })
    }

    /// Compile the bound request into backend fragments.
    ///
    /// # Errors
    ///
    /// Propagates a [`ConfigurationError`] from criteria or search compilation.
    pub fn filter_result(&self) -> Result<FilterResult, ConfigurationError> {
        let backend = self.schema.backend.as_ref();

        let filters = build_filters(backend, self.criteria_values())?;
        let q_search = match &self.schema.q_search {
            Some(spec) => build_q_search(backend, spec, self.q_search())?,
            None => None,
        };
        let sorting = self
            .schema
            .sort_by
            .as_ref()
            .and_then(|sort_by| build_sorting(backend, sort_by, self.sort()));
        let selected_columns = self
            .schema
            .select_only
            .as_ref()
            .and_then(|selectable| build_selected_columns(selectable, self.select()));

        Ok(FilterResult {
            filters,
            q_search,
            sorting,
            selected_columns,
            pagination: self.pagination,
        })
    }
}
