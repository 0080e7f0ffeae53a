//! Selection state and its persisted form.

use std::collections::HashSet;

use log::warn;

/// Stored value meaning "every item matching the query".
pub const ALL_SENTINEL: &str = "all";

/// Selection mode for a bulk-action list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// `selected` is authoritative.
    #[default]
    Partial,
    /// Every row matching the current server-side query is selected,
    /// including rows not rendered on this page.
    AllMatching,
}

/// Selected row identifiers plus mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub mode: SelectionMode,
    /// Only meaningful in `Partial` mode.
    pub selected: HashSet<String>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all_matching() -> Self {
        Self {
            mode: SelectionMode::AllMatching,
            selected: HashSet::new(),
        }
    }

    pub fn partial(ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            mode: SelectionMode::Partial,
            selected: ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_all_matching(&self) -> bool {
        self.mode == SelectionMode::AllMatching
    }

    /// Whether any indicator should show an active selection.
    pub fn is_active(&self) -> bool {
        self.is_all_matching() || !self.selected.is_empty()
    }

    /// Whether a given row counts as selected.
    pub fn contains(&self, id: &str) -> bool {
        self.is_all_matching() || self.selected.contains(id)
    }

    /// Selected IDs, sorted for deterministic ordering.
    pub fn sorted_ids(&self) -> Vec<String> {
        let mut ids: Vec<_> = self.selected.iter().cloned().collect();
        ids.sort();
        ids
    }

    // -------------------------------------------------------------------------
    // Transitions
    // -------------------------------------------------------------------------

    /// "Select all matching" trigger.
    pub fn select_all_matching(&mut self) {
        self.mode = SelectionMode::AllMatching;
    }

    /// Header checkbox click. `checked` is the box state after the click.
    pub fn toggle_page<'a>(&mut self, checked: bool, visible: impl IntoIterator<Item = &'a str>) {
        if self.is_all_matching() {
            self.mode = SelectionMode::Partial;
            self.selected.clear();
        } else if checked {
            self.selected.extend(visible.into_iter().map(str::to_string));
        } else {
            self.selected.clear();
        }
    }

    /// Row checkbox click. `checked` is the box state after the click.
    ///
    /// Unchecking a row while every matching item is selected demotes to
    /// `Partial`, seeded from the visible rows.
    pub fn toggle_row<'a>(
        &mut self,
        id: &str,
        checked: bool,
        visible: impl IntoIterator<Item = &'a str>,
    ) {
        if checked {
            self.selected.insert(id.to_string());
            return;
        }
        if self.is_all_matching() {
            self.selected = visible.into_iter().map(str::to_string).collect();
        }
        self.selected.remove(id);
        self.mode = SelectionMode::Partial;
    }

    // -------------------------------------------------------------------------
    // Persistence
    // -------------------------------------------------------------------------

    /// Stored form: the `all` sentinel or a JSON array of IDs.
    pub fn to_stored(&self) -> String {
        if self.is_all_matching() {
            return ALL_SENTINEL.to_string();
        }
        // Vec<String> always serializes
        serde_json::to_string(&self.sorted_ids()).unwrap_or_else(|_| "[]".to_string())
    }

    /// Parse a stored value. Malformed input yields an empty selection.
    pub fn from_stored(value: &str) -> Self {
        if value == ALL_SENTINEL {
            return Self::all_matching();
        }
        match serde_json::from_str::<Vec<String>>(value) {
            Ok(ids) => Self::partial(ids),
            Err(e) => {
                warn!("Discarding malformed stored selection {:?}: {}", value, e);
                Self::new()
            }
        }
    }
}
