//! Element selectors, state class names and form field names.
//!
//! Every name the controllers read from or write to the page is configurable.
//! Defaults match the list markup rendered by the server templates; hosts
//! override individual entries from JSON.

use serde::Deserialize;

use crate::error::ListError;
use crate::store::DEFAULT_PREFIX;

/// Where the selection controller finds its elements.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ListSelectors {
    /// Delegated click root. Required.
    pub container: String,
    pub head_row: String,
    pub header_checkbox: String,
    pub select_all_trigger: String,
    pub summary: String,
    /// Element carrying the total count data attribute.
    pub table: String,
    /// Data attribute holding the total number of matching items.
    pub total_attr: String,
    /// Data attribute on row checkboxes holding the row identifier.
    pub row_id_attr: String,
    /// Class identifying the row element that wraps a row checkbox.
    pub row_class: String,
    pub action_form: String,
    pub action_select: String,
    pub submit: String,
}

impl Default for ListSelectors {
    fn default() -> Self {
        Self {
            container: "list".into(),
            head_row: "list-head".into(),
            header_checkbox: "list-select-page".into(),
            select_all_trigger: "list-select-all".into(),
            summary: "list-selection-count".into(),
            table: "list-table".into(),
            total_attr: "total-items".into(),
            row_id_attr: "row-id".into(),
            row_class: "list-row".into(),
            action_form: "list-action-form".into(),
            action_select: "list-action".into(),
            submit: "list-action-submit".into(),
        }
    }
}

/// State classes the controller toggles.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StateClasses {
    /// Head row: something is selected.
    pub head_active: String,
    /// Head row: every matching item is selected.
    pub head_all: String,
    /// Select-all trigger: no distinction between "page" and "everything".
    pub trigger_selected: String,
    /// Row highlight.
    pub row_selected: String,
}

impl Default for StateClasses {
    fn default() -> Self {
        Self {
            head_active: "list-head--active".into(),
            head_all: "list-head--all".into(),
            trigger_selected: "list-select-all--selected".into(),
            row_selected: "list-row--selected".into(),
        }
    }
}

/// Names of the hidden fields injected on submit.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FormFields {
    pub select_all: String,
    pub id: String,
}

impl Default for FormFields {
    fn default() -> Self {
        Self {
            select_all: "select_all".into(),
            id: "pk".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ListConfig {
    pub storage_prefix: String,
    pub selectors: ListSelectors,
    pub classes: StateClasses,
    pub fields: FormFields,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            storage_prefix: DEFAULT_PREFIX.into(),
            selectors: ListSelectors::default(),
            classes: StateClasses::default(),
            fields: FormFields::default(),
        }
    }
}

impl ListConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON override; missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ListError> {
        serde_json::from_str(json).map_err(|e| ListError::Config(e.to_string()))
    }

    pub fn with_storage_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.storage_prefix = prefix.into();
        self
    }

    pub fn with_selectors(mut self, selectors: ListSelectors) -> Self {
        self.selectors = selectors;
        self
    }
}
