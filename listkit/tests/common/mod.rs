//! Page fixtures shared by the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use listkit::prelude::*;
use pagedom::{Element, Page};

pub fn row_ids(count: usize) -> Vec<String> {
    (1..=count).map(|i| i.to_string()).collect()
}

/// The list table: head row with the page checkbox, then one row per ID.
pub fn list_table(ids: &[String], total: Option<u64>) -> Element {
    let mut table = Element::box_().id("list-table").child(
        Element::box_()
            .id("list-head")
            .child(Element::checkbox().id("list-select-page")),
    );
    if let Some(total) = total {
        table = table.data("total-items", total.to_string());
    }
    table.children(ids.iter().map(|id| {
        Element::box_()
            .id(format!("row-{id}"))
            .class("list-row")
            .child(Element::checkbox().id(format!("cb-{id}")).data("row-id", id.clone()))
            .child(Element::text(format!("Item {id}")))
    }))
}

/// A dropdown in the markup `ElementSurface` expects.
pub fn dropdown(id: &str, label: &str, options: &[(&str, &str)]) -> Element {
    Element::box_()
        .id(id)
        .child(
            Element::button("")
                .id(format!("{id}-anchor"))
                .class("dropdown__anchor")
                .child(Element::text(label).id(format!("{id}-label")).class("dropdown__label"))
                .child(
                    Element::text("")
                        .id(format!("{id}-text"))
                        .class("dropdown__selected-text"),
                ),
        )
        .child(menu(id, options))
}

/// The menu part of [`dropdown`], for re-rendering.
pub fn menu(id: &str, options: &[(&str, &str)]) -> Element {
    Element::box_()
        .id(format!("{id}-menu"))
        .class("dropdown__menu")
        .children(options.iter().enumerate().map(|(i, (value, label))| {
            Element::box_()
                .id(format!("{id}-item-{i}"))
                .class("dropdown__item")
                .data("value", *value)
                .child(Element::text(*label).id(format!("{id}-item-{i}-text")))
        }))
}

pub fn action_options() -> Vec<(&'static str, &'static str)> {
    vec![
        ("/items/archive/", "Archive"),
        ("/items/delete/", "Delete"),
    ]
}

/// A full list page: container, select-all trigger, summary and action form.
pub fn list_page(location: &str, ids: &[String], total: Option<u64>) -> Page {
    let root = Element::box_()
        .id("page")
        .child(
            Element::box_()
                .id("list")
                .child(list_table(ids, total))
                .child(
                    Element::button("")
                        .id("list-select-all")
                        .child(Element::text("Select all").id("list-select-all-label")),
                )
                .child(Element::text("").id("list-selection-count")),
        )
        .child(
            Element::form()
                .id("list-action-form")
                .child(dropdown("list-action", "Action", &action_options()))
                .child(Element::button("Run").id("list-action-submit")),
        );
    Page::from_root(root, location)
}

pub struct Harness {
    pub page: Page,
    pub store: Arc<MemoryStore>,
    pub navigator: Arc<Navigator>,
}

impl Harness {
    pub fn new(location: &str, ids: &[String], total: Option<u64>) -> Self {
        Self {
            page: list_page(location, ids, total),
            store: Arc::new(MemoryStore::new()),
            navigator: Arc::new(Navigator::new()),
        }
    }

    pub fn attach(&self) -> SelectionController {
        SelectionController::attach(
            &self.page,
            self.store.clone(),
            self.navigator.clone(),
            ListConfig::default(),
        )
        .expect("list attaches")
    }

    pub fn checked(&self, id: &str) -> bool {
        self.page.element(id).expect("element exists").checked
    }

    pub fn header(&self) -> (bool, bool) {
        let el = self.page.element("list-select-page").expect("header exists");
        (el.checked, el.indeterminate)
    }

    pub fn summary(&self) -> String {
        self.page
            .element("list-selection-count")
            .expect("summary exists")
            .text_content()
    }

    pub fn has_class(&self, id: &str, class: &str) -> bool {
        self.page
            .element(id)
            .is_some_and(|el| el.has_class(class))
    }
}
