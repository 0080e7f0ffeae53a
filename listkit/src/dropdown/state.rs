//! Multi-select dropdown state.

use serde::{Deserialize, Serialize};

/// One option of the dropdown menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropdownOption {
    pub value: String,
    pub label: String,
}

impl DropdownOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }

    /// Options with an empty value (placeholders) are never marked selected.
    pub fn is_selectable(&self) -> bool {
        !self.value.is_empty()
    }
}

/// Payload of a `change` notification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeDetail {
    pub indices: Vec<usize>,
    pub values: Vec<String>,
}

/// Selected option indices, kept ascending and valid for `options`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultiSelectState {
    selected: Vec<usize>,
    options: Vec<DropdownOption>,
    last_toggled: Option<usize>,
}

impl MultiSelectState {
    pub fn new(options: Vec<DropdownOption>) -> Self {
        Self {
            selected: Vec::new(),
            options,
            last_toggled: None,
        }
    }

    pub fn options(&self) -> &[DropdownOption] {
        &self.options
    }

    pub fn selected(&self) -> &[usize] {
        &self.selected
    }

    pub fn last_toggled(&self) -> Option<usize> {
        self.last_toggled
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.binary_search(&index).is_ok()
    }

    /// Whether `index` names a selectable option.
    pub fn is_valid(&self, index: usize) -> bool {
        self.options.get(index).is_some_and(DropdownOption::is_selectable)
    }

    /// Flip membership of `index`. Returns the new membership, or None if
    /// the index is not selectable.
    pub fn toggle(&mut self, index: usize) -> Option<bool> {
        if !self.is_valid(index) {
            return None;
        }
        self.last_toggled = Some(index);
        match self.selected.binary_search(&index) {
            Ok(pos) => {
                self.selected.remove(pos);
                Some(false)
            }
            Err(pos) => {
                self.selected.insert(pos, index);
                Some(true)
            }
        }
    }

    /// Replace the selection. Invalid indices are dropped; if none remain
    /// the selection is left untouched and false is returned.
    pub fn set_selected(&mut self, indices: &[usize]) -> bool {
        let mut valid: Vec<usize> = indices.iter().copied().filter(|&i| self.is_valid(i)).collect();
        if valid.is_empty() {
            return false;
        }
        valid.sort_unstable();
        valid.dedup();
        self.selected = valid;
        true
    }

    /// Replace the option list, keeping every selected index that is still valid.
    pub fn set_options(&mut self, options: Vec<DropdownOption>) {
        self.options = options;
        let options = &self.options;
        self.selected
            .retain(|&i| options.get(i).is_some_and(DropdownOption::is_selectable));
        if self.last_toggled.is_some_and(|i| i >= self.options.len()) {
            self.last_toggled = None;
        }
    }

    /// Indices of the options whose value is in `values`.
    pub fn indices_of(&self, values: &[String]) -> Vec<usize> {
        self.options
            .iter()
            .enumerate()
            .filter(|(_, o)| o.is_selectable() && values.contains(&o.value))
            .map(|(i, _)| i)
            .collect()
    }

    /// Values of the selected options. Empty when nothing is selected.
    pub fn values(&self) -> Vec<String> {
        self.selected
            .iter()
            .filter_map(|&i| self.options.get(i))
            .map(|o| o.value.clone())
            .collect()
    }

    /// Labels of the selected options joined by `separator`.
    pub fn summary(&self, separator: &str) -> String {
        self.selected
            .iter()
            .filter_map(|&i| self.options.get(i))
            .map(|o| o.label.as_str())
            .collect::<Vec<_>>()
            .join(separator)
    }

    pub fn detail(&self) -> ChangeDetail {
        ChangeDetail {
            indices: self.selected.clone(),
            values: self.values(),
        }
    }
}
