//! Server-side rendering stand-in: builds the list page the way a
//! paginated admin view would deliver it.

use listkit::config::ListConfig;
use listkit::dropdown::{DropdownConfig, DropdownOption};
use pagedom::Element;

/// ID of the page root. Partial navigations replace this element.
pub const ROOT_ID: &str = "demo-page";

/// Row IDs shown on 1-based `page`, stopping at `total` when it is known.
pub fn row_ids(page: usize, per_page: usize, total: Option<u64>) -> Vec<String> {
    let start = page.saturating_sub(1) * per_page + 1;
    let mut end = page * per_page;
    if let Some(total) = total.filter(|t| *t > 0) {
        end = end.min(usize::try_from(total).unwrap_or(usize::MAX));
    }
    (start..=end).map(|id| id.to_string()).collect()
}

/// Bulk actions offered for the list at `path`, placeholder first.
pub fn actions(path: &str) -> Vec<DropdownOption> {
    let base = path.trim_end_matches('/');
    vec![
        DropdownOption::new("", "---------"),
        DropdownOption::new(format!("{}/archive/", base), "Archive selected"),
        DropdownOption::new(format!("{}/delete/", base), "Delete selected"),
    ]
}

/// Full page: the list with its indicators and the bulk-action form.
pub fn list_page(
    ids: &[String],
    total: Option<u64>,
    actions: &[DropdownOption],
    list: &ListConfig,
    dropdown: &DropdownConfig,
) -> Element {
    let sel = &list.selectors;

    let mut table = Element::box_().id(&sel.table).child(
        Element::box_()
            .id(&sel.head_row)
            .child(Element::checkbox().id(&sel.header_checkbox))
            .child(Element::text("Name")),
    );
    if let Some(total) = total {
        table = table.data(&sel.total_attr, total.to_string());
    }
    let table = table.children(ids.iter().map(|id| {
        Element::box_()
            .id(format!("row-{}", id))
            .class(&sel.row_class)
            .child(
                Element::checkbox()
                    .id(format!("row-{}-select", id))
                    .data(&sel.row_id_attr, id.clone()),
            )
            .child(Element::text(format!("Item {}", id)))
    }));

    let container = Element::box_()
        .id(&sel.container)
        .child(table)
        .child(
            Element::button("")
                .id(&sel.select_all_trigger)
                .child(Element::text("Select all matching")),
        )
        .child(Element::text("").id(&sel.summary));

    let form = Element::form()
        .id(&sel.action_form)
        .child(action_dropdown(&sel.action_select, actions, dropdown))
        .child(Element::button("Go").id(&sel.submit));

    Element::box_().id(ROOT_ID).child(container).child(form)
}

fn action_dropdown(id: &str, actions: &[DropdownOption], config: &DropdownConfig) -> Element {
    let sel = &config.selectors;
    let anchor = Element::button("")
        .id(format!("{}-anchor", id))
        .class(&sel.anchor)
        .child(Element::text("Action").class(&sel.label))
        .child(Element::text("").class(&sel.selected_text));

    let menu = Element::box_()
        .id(format!("{}-menu", id))
        .class(&sel.menu)
        .children(actions.iter().enumerate().map(|(i, action)| {
            Element::box_()
                .id(format!("{}-item-{}", id, i))
                .class(&sel.item)
                .data(&sel.value_attr, action.value.clone())
                .child(Element::text(action.label.clone()))
        }));

    Element::box_().id(id).child(anchor).child(menu)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_ids_paginate() {
        assert_eq!(row_ids(1, 3, None), vec!["1", "2", "3"]);
        assert_eq!(row_ids(2, 3, None), vec!["4", "5", "6"]);
        assert_eq!(row_ids(2, 3, Some(5)), vec!["4", "5"]);
        assert!(row_ids(3, 3, Some(5)).is_empty());
        // Zero means unknown
        assert_eq!(row_ids(1, 2, Some(0)), vec!["1", "2"]);
    }

    #[test]
    fn test_actions_follow_path() {
        let actions = actions("/items/");
        assert!(!actions[0].is_selectable());
        assert_eq!(actions[1].value, "/items/archive/");
        assert_eq!(actions[2].value, "/items/delete/");
    }

    #[test]
    fn test_page_uses_configured_names() {
        let list = ListConfig::default();
        let root = list_page(
            &row_ids(1, 2, Some(10)),
            Some(10),
            &actions("/items/"),
            &list,
            &DropdownConfig::default(),
        );
        let table = pagedom::element::find_element(&root, &list.selectors.table).unwrap();
        assert_eq!(table.get_data("total-items").map(String::as_str), Some("10"));
        let cb = pagedom::element::find_element(&root, "row-2-select").unwrap();
        assert_eq!(cb.get_data("row-id").map(String::as_str), Some("2"));
        assert!(pagedom::element::find_element(&root, "list-action-menu").is_some());
    }
}
