use crate::database::columns::ColumnRef;
use crate::metadata::Selectable;

/// Resolve validated names into columns, in the requested order.
///
/// `["all"]` selects every registered column. A single unresolvable name
/// drops the whole selection rather than returning part of it.
#[must_use]
pub fn build_selected_columns(
    selectable: &Selectable,
    names: Option<&[String]>,
) -> Option<Vec<ColumnRef>> {
    let names = names?;
    if names.len() == 1 && names[0] == "all" {
        return Some(selectable.columns());
    }

    let selected = names
        .iter()
        .map(|name| selectable.get_attr(name).cloned())
        .collect::<Option<Vec<_>>>();
    if selected.is_none() {
        tracing::debug!(?names, "Selection names an unknown column, dropping it");
    }
    selected
}
