//! Rendering surface of a dropdown.
//!
//! [`MenuSurface`] is everything the selection logic needs from the visual
//! widget. [`ElementSurface`] implements it over a `pagedom` subtree.

use std::sync::{Arc, RwLock};

use log::trace;
use pagedom::element::collect;
use pagedom::{Document, Element, Event, Page};
use serde::Deserialize;

use super::state::{ChangeDetail, DropdownOption};
use crate::store::DROPDOWN_PREFIX;

/// Data attribute marking hidden inputs that carry the dropdown's values.
const VALUE_INPUT_ATTR: &str = "listkit-dropdown-value";

/// Data attribute on the dropdown root holding the number of selected values.
pub const SELECTED_COUNT_ATTR: &str = "listkit-selected-count";

/// Capabilities of the underlying menu widget.
pub trait MenuSurface: Send + Sync {
    fn open_menu(&self);

    fn close_menu(&self);

    /// Mark one item checked or unchecked (highlight and ARIA state).
    fn set_item_selected(&self, index: usize, selected: bool);

    /// Text shown in the closed control.
    fn set_summary(&self, text: &str);

    /// Float the label above the control (and notch the outline).
    fn float_label(&self, floating: bool);

    /// Mirror the selected values into the form control.
    fn sync_value(&self, values: &[String]);

    /// Announce a selection change to ancestors.
    fn notify_change(&self, detail: &ChangeDetail);
}

/// Class names locating the parts of a dropdown inside its root element.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DropdownSelectors {
    pub anchor: String,
    pub label: String,
    pub selected_text: String,
    pub menu: String,
    pub item: String,
    /// Data attribute on items holding the option value.
    pub value_attr: String,
}

impl Default for DropdownSelectors {
    fn default() -> Self {
        Self {
            anchor: "dropdown__anchor".into(),
            label: "dropdown__label".into(),
            selected_text: "dropdown__selected-text".into(),
            menu: "dropdown__menu".into(),
            item: "dropdown__item".into(),
            value_attr: "value".into(),
        }
    }
}

/// State classes the surface toggles.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DropdownClasses {
    pub open: String,
    pub label_floating: String,
    pub item_selected: String,
}

impl Default for DropdownClasses {
    fn default() -> Self {
        Self {
            open: "dropdown--open".into(),
            label_floating: "dropdown__label--float".into(),
            item_selected: "dropdown__item--selected".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DropdownConfig {
    pub storage_prefix: String,
    /// Joins selected labels in the summary text.
    pub separator: String,
    pub selectors: DropdownSelectors,
    pub classes: DropdownClasses,
}

impl Default for DropdownConfig {
    fn default() -> Self {
        Self {
            storage_prefix: DROPDOWN_PREFIX.into(),
            separator: ",  ".into(),
            selectors: DropdownSelectors::default(),
            classes: DropdownClasses::default(),
        }
    }
}

/// First element under `root_id` carrying `class`.
pub(super) fn find_part(doc: &Document, root_id: &str, class: &str) -> Option<String> {
    let root = doc.element(root_id)?;
    collect(root, &|el: &Element| el.has_class(class))
        .first()
        .map(|el| el.id.clone())
}

/// Menu items under `root_id`, in document order.
pub(super) fn find_items<'a>(doc: &'a Document, root_id: &str, item_class: &str) -> Vec<&'a Element> {
    doc.element(root_id)
        .map(|root| collect(root, &|el: &Element| el.has_class(item_class)))
        .unwrap_or_default()
}

/// A [`MenuSurface`] drawing into a page subtree.
pub struct ElementSurface {
    page: Page,
    root: String,
    config: Arc<DropdownConfig>,
    /// Element IDs of the menu items, positionally aligned with options.
    items: RwLock<Vec<String>>,
}

impl std::fmt::Debug for ElementSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElementSurface")
            .field("root", &self.root)
            .finish()
    }
}

impl ElementSurface {
    pub fn new(page: &Page, root: impl Into<String>, config: Arc<DropdownConfig>) -> Self {
        Self {
            page: page.clone(),
            root: root.into(),
            config,
            items: RwLock::new(Vec::new()),
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    /// Read the options currently rendered in the menu.
    pub fn read_options(&self) -> Vec<DropdownOption> {
        let sel = &self.config.selectors;
        let found: Vec<(String, DropdownOption)> = self
            .page
            .read(|doc| {
                find_items(doc, &self.root, &sel.item)
                    .into_iter()
                    .map(|el| {
                        let value = el.get_data(&sel.value_attr).cloned().unwrap_or_default();
                        (el.id.clone(), DropdownOption::new(value, el.text_content().trim()))
                    })
                    .collect()
            })
            .unwrap_or_default();

        if let Ok(mut guard) = self.items.write() {
            *guard = found.iter().map(|(id, _)| id.clone()).collect();
        }
        found.into_iter().map(|(_, option)| option).collect()
    }

    /// Position of the item containing `element_id`, if any.
    pub fn item_index(&self, element_id: &str) -> Option<usize> {
        let items = self.items.read().ok()?;
        self.page
            .read(|doc| {
                items.iter().position(|item| {
                    doc.element(item)
                        .is_some_and(|el| pagedom::element::find_element(el, element_id).is_some())
                })
            })
            .flatten()
    }

    /// Whether `element_id` is the anchor or inside it.
    pub fn is_anchor(&self, element_id: &str) -> bool {
        let anchor_class = &self.config.selectors.anchor;
        self.page
            .read(|doc| {
                find_part(doc, &self.root, anchor_class)
                    .is_some_and(|anchor| pagedom::element::is_within(&doc.root, &anchor, element_id))
            })
            .unwrap_or(false)
    }

    fn set_open(&self, open: bool) {
        let sel = &self.config.selectors;
        let classes = &self.config.classes;
        self.page.write(|doc| {
            let anchor = find_part(doc, &self.root, &sel.anchor);
            if let Some(root) = doc.element_mut(&self.root) {
                root.toggle_class(&classes.open, open);
            }
            if let Some(anchor) = anchor.and_then(|id| doc.element_mut(&id)) {
                anchor.set_attr("aria-expanded", open.to_string());
            }
        });
    }
}

impl MenuSurface for ElementSurface {
    fn open_menu(&self) {
        self.set_open(true);
    }

    fn close_menu(&self) {
        self.set_open(false);
    }

    fn set_item_selected(&self, index: usize, selected: bool) {
        let Some(item) = self.items.read().ok().and_then(|g| g.get(index).cloned()) else {
            return;
        };
        let class = &self.config.classes.item_selected;
        self.page.write(|doc| {
            if let Some(el) = doc.element_mut(&item) {
                el.toggle_class(class, selected);
                el.set_attr("aria-checked", selected.to_string());
            }
        });
    }

    fn set_summary(&self, text: &str) {
        let class = &self.config.selectors.selected_text;
        self.page.write(|doc| {
            if let Some(el) = find_part(doc, &self.root, class).and_then(|id| doc.element_mut(&id)) {
                el.set_text(text);
            }
        });
    }

    fn float_label(&self, floating: bool) {
        let sel = &self.config.selectors;
        let class = &self.config.classes.label_floating;
        self.page.write(|doc| {
            if let Some(el) = find_part(doc, &self.root, &sel.label).and_then(|id| doc.element_mut(&id)) {
                el.toggle_class(class, floating);
            }
        });
    }

    fn sync_value(&self, values: &[String]) {
        self.page.write(|doc| {
            let Some(root) = doc.element_mut(&self.root) else {
                return;
            };
            // Same as a native multiple select: `value` is the first selection
            root.value = values.first().cloned();
            root.data.insert(SELECTED_COUNT_ATTR.into(), values.len().to_string());

            let Some(name) = root.name.clone() else {
                return;
            };
            root.retain_children(|c| c.get_data(VALUE_INPUT_ATTR).is_none());
            for value in values {
                root.push_child(Element::hidden_input(&name, value).data(VALUE_INPUT_ATTR, "1"));
            }
        });
    }

    fn notify_change(&self, detail: &ChangeDetail) {
        trace!("Dropdown {} changed: {:?}", self.root, detail.values);
        self.page.dispatch(Event::Change {
            target: self.root.clone(),
            indices: detail.indices.clone(),
            values: detail.values.clone(),
        });
    }
}
