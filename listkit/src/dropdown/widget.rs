//! Multi-value dropdown widget.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use log::debug;

use super::state::{ChangeDetail, DropdownOption, MultiSelectState};
use super::surface::MenuSurface;

/// Default separator between selected labels in the summary text.
pub const DEFAULT_SEPARATOR: &str = ",  ";

/// A dropdown supporting zero, one or many selected options.
///
/// `MultiValueDropdown` owns the selection and drives a [`MenuSurface`] for
/// everything visual. Clones share the same state.
///
/// Typeahead is not supported in this mode.
///
/// # Example
///
/// ```ignore
/// let dropdown = MultiValueDropdown::new(surface, vec![
///     DropdownOption::new("x", "X"),
///     DropdownOption::new("y", "Y"),
/// ]);
/// dropdown.toggle_index(1, true);
/// assert_eq!(dropdown.value(), vec!["y"]);
/// ```
pub struct MultiValueDropdown<S: MenuSurface> {
    inner: Arc<RwLock<MultiSelectState>>,
    surface: Arc<S>,
    is_open: Arc<AtomicBool>,
    separator: Arc<str>,
}

impl<S: MenuSurface> std::fmt::Debug for MultiValueDropdown<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultiValueDropdown")
            .field("selected", &self.selected_indices())
            .field("is_open", &self.is_open())
            .finish()
    }
}

impl<S: MenuSurface> Clone for MultiValueDropdown<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            surface: Arc::clone(&self.surface),
            is_open: Arc::clone(&self.is_open),
            separator: Arc::clone(&self.separator),
        }
    }
}

impl<S: MenuSurface> MultiValueDropdown<S> {
    /// Create a dropdown with no selection.
    pub fn new(surface: S, options: Vec<DropdownOption>) -> Self {
        let dropdown = Self {
            inner: Arc::new(RwLock::new(MultiSelectState::new(options))),
            surface: Arc::new(surface),
            is_open: Arc::new(AtomicBool::new(false)),
            separator: Arc::from(DEFAULT_SEPARATOR),
        };
        dropdown.render_all();
        dropdown
    }

    /// Use a different summary separator.
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        let separator: String = separator.into();
        self.separator = Arc::from(separator);
        self.render_all();
        self
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    // -------------------------------------------------------------------------
    // Selection state
    // -------------------------------------------------------------------------

    /// Flip membership of `index`.
    ///
    /// Out-of-range indices and placeholder options are ignored. Emits a
    /// change notification unless `notify` is false. Returns true if the
    /// selection changed.
    pub fn toggle_index(&self, index: usize, notify: bool) -> bool {
        let outcome = self.inner.write().ok().and_then(|mut guard| {
            let selected = guard.toggle(index)?;
            Some((selected, guard.summary(&self.separator), guard.detail()))
        });

        let Some((selected, summary, detail)) = outcome else {
            debug!("Ignoring toggle of unselectable option {}", index);
            return false;
        };

        self.surface.set_item_selected(index, selected);
        self.surface.set_summary(&summary);
        self.surface.sync_value(&detail.values);
        self.surface.float_label(self.is_open() || !detail.indices.is_empty());
        if notify {
            self.surface.notify_change(&detail);
        }
        true
    }

    /// Values of the selected options. Empty when nothing is selected.
    pub fn value(&self) -> Vec<String> {
        self.inner
            .read()
            .map(|guard| guard.values())
            .unwrap_or_default()
    }

    /// Selected indices, ascending.
    pub fn selected_indices(&self) -> Vec<usize> {
        self.inner
            .read()
            .map(|guard| guard.selected().to_vec())
            .unwrap_or_default()
    }

    /// The index most recently passed to `toggle_index` that took effect.
    pub fn last_toggled(&self) -> Option<usize> {
        self.inner
            .read()
            .map(|guard| guard.last_toggled())
            .unwrap_or(None)
    }

    /// Summary text as currently rendered.
    pub fn summary(&self) -> String {
        self.inner
            .read()
            .map(|guard| guard.summary(&self.separator))
            .unwrap_or_default()
    }

    pub fn options(&self) -> Vec<DropdownOption> {
        self.inner
            .read()
            .map(|guard| guard.options().to_vec())
            .unwrap_or_default()
    }

    /// Select a single index. `None` or an unselectable index is a no-op.
    pub fn set_selected_index(&self, index: Option<usize>) -> bool {
        match index {
            Some(index) => self.set_selected_indices(&[index]),
            None => false,
        }
    }

    /// Replace the selection without notifying.
    ///
    /// An empty slice, or one with no selectable index, is a no-op.
    pub fn set_selected_indices(&self, indices: &[usize]) -> bool {
        let changed = self
            .inner
            .write()
            .map(|mut guard| guard.set_selected(indices))
            .unwrap_or(false);
        if changed {
            self.render_all();
        } else {
            debug!("Ignoring selection of {:?}", indices);
        }
        changed
    }

    /// Select the options carrying `values`, without notifying.
    pub fn set_value(&self, values: &[String]) -> bool {
        let indices = self
            .inner
            .read()
            .map(|guard| guard.indices_of(values))
            .unwrap_or_default();
        self.set_selected_indices(&indices)
    }

    /// Replace the option list after the menu re-rendered.
    ///
    /// Keeps the current selection wherever it is still valid rather than
    /// recomputing it from the new options.
    pub fn layout_options(&self, options: Vec<DropdownOption>) {
        if let Ok(mut guard) = self.inner.write() {
            guard.set_options(options);
        }
        self.render_all();
    }

    /// Current selection as a change payload.
    pub fn detail(&self) -> ChangeDetail {
        self.inner
            .read()
            .map(|guard| guard.detail())
            .unwrap_or_default()
    }

    // -------------------------------------------------------------------------
    // Open/close state
    // -------------------------------------------------------------------------

    pub fn is_open(&self) -> bool {
        self.is_open.load(Ordering::SeqCst)
    }

    pub fn open(&self) {
        if !self.is_open.swap(true, Ordering::SeqCst) {
            self.surface.open_menu();
            self.surface.float_label(true);
        }
    }

    pub fn close(&self) {
        if self.is_open.swap(false, Ordering::SeqCst) {
            self.surface.close_menu();
            let has_selection = !self.selected_indices().is_empty();
            self.surface.float_label(has_selection);
        }
    }

    pub fn toggle_menu(&self) {
        if self.is_open() {
            self.close();
        } else {
            self.open();
        }
    }

    // -------------------------------------------------------------------------
    // Rendering
    // -------------------------------------------------------------------------

    /// Push the full state to the surface.
    fn render_all(&self) {
        let Some((count, summary, detail)) = self.inner.read().ok().map(|guard| {
            (
                guard.options().len(),
                guard.summary(&self.separator),
                guard.detail(),
            )
        }) else {
            return;
        };

        for index in 0..count {
            self.surface
                .set_item_selected(index, detail.indices.binary_search(&index).is_ok());
        }
        self.surface.set_summary(&summary);
        self.surface.sync_value(&detail.values);
        self.surface
            .float_label(self.is_open() || !detail.indices.is_empty());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Surface that records what it was asked to draw.
    #[derive(Default)]
    struct RecordingSurface {
        items: Mutex<Vec<bool>>,
        summary: Mutex<String>,
        floating: Mutex<bool>,
        value: Mutex<Vec<String>>,
        changes: Mutex<Vec<ChangeDetail>>,
        open: Mutex<bool>,
    }

    impl MenuSurface for RecordingSurface {
        fn open_menu(&self) {
            *self.open.lock().unwrap() = true;
        }

        fn close_menu(&self) {
            *self.open.lock().unwrap() = false;
        }

        fn set_item_selected(&self, index: usize, selected: bool) {
            let mut items = self.items.lock().unwrap();
            if items.len() <= index {
                items.resize(index + 1, false);
            }
            items[index] = selected;
        }

        fn set_summary(&self, text: &str) {
            *self.summary.lock().unwrap() = text.to_string();
        }

        fn float_label(&self, floating: bool) {
            *self.floating.lock().unwrap() = floating;
        }

        fn sync_value(&self, values: &[String]) {
            *self.value.lock().unwrap() = values.to_vec();
        }

        fn notify_change(&self, detail: &ChangeDetail) {
            self.changes.lock().unwrap().push(detail.clone());
        }
    }

    fn xyz() -> MultiValueDropdown<RecordingSurface> {
        MultiValueDropdown::new(
            RecordingSurface::default(),
            vec![
                DropdownOption::new("x", "X"),
                DropdownOption::new("y", "Y"),
                DropdownOption::new("z", "Z"),
            ],
        )
    }

    #[test]
    fn test_toggle_round_trip() {
        let dropdown = xyz();
        assert!(dropdown.toggle_index(0, true));
        assert!(dropdown.toggle_index(2, true));
        assert_eq!(dropdown.value(), vec!["x", "z"]);
        assert_eq!(dropdown.summary(), "X,  Z");
        assert_eq!(*dropdown.surface().summary.lock().unwrap(), "X,  Z");
        assert_eq!(*dropdown.surface().items.lock().unwrap(), vec![true, false, true]);

        assert!(dropdown.toggle_index(0, true));
        assert_eq!(dropdown.value(), vec!["z"]);
        assert_eq!(dropdown.last_toggled(), Some(0));
        assert_eq!(*dropdown.surface().value.lock().unwrap(), vec!["z"]);
    }

    #[test]
    fn test_notify_can_be_suppressed() {
        let dropdown = xyz();
        dropdown.toggle_index(1, false);
        assert!(dropdown.surface().changes.lock().unwrap().is_empty());

        dropdown.toggle_index(2, true);
        let changes = dropdown.surface().changes.lock().unwrap();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].indices, vec![1, 2]);
        assert_eq!(changes[0].values, vec!["y", "z"]);
    }

    #[test]
    fn test_out_of_range_is_noop() {
        let dropdown = xyz();
        assert!(!dropdown.toggle_index(3, true));
        assert!(!dropdown.set_selected_index(Some(42)));
        assert!(!dropdown.set_selected_index(None));
        assert!(!dropdown.set_selected_indices(&[]));
        assert!(dropdown.value().is_empty());
        assert!(dropdown.surface().changes.lock().unwrap().is_empty());
    }

    #[test]
    fn test_layout_options_preserves_selection() {
        let dropdown = xyz();
        dropdown.toggle_index(1, true);
        dropdown.layout_options(vec![
            DropdownOption::new("x", "X"),
            DropdownOption::new("y", "Why"),
            DropdownOption::new("z", "Z"),
            DropdownOption::new("w", "W"),
        ]);
        assert_eq!(dropdown.selected_indices(), vec![1]);
        assert_eq!(dropdown.summary(), "Why");
        assert_eq!(
            *dropdown.surface().items.lock().unwrap(),
            vec![false, true, false, false]
        );
    }

    #[test]
    fn test_label_floats_while_open_or_selected() {
        let dropdown = xyz();
        assert!(!*dropdown.surface().floating.lock().unwrap());

        dropdown.open();
        assert!(*dropdown.surface().open.lock().unwrap());
        assert!(*dropdown.surface().floating.lock().unwrap());

        dropdown.close();
        assert!(!*dropdown.surface().floating.lock().unwrap());

        dropdown.toggle_index(0, true);
        dropdown.toggle_menu();
        dropdown.toggle_menu();
        assert!(!dropdown.is_open());
        assert!(*dropdown.surface().floating.lock().unwrap());
    }

    #[test]
    fn test_deselect_all_shows_empty_summary() {
        let dropdown = xyz();
        dropdown.toggle_index(1, true);
        dropdown.toggle_index(1, true);
        assert_eq!(dropdown.summary(), "");
        assert!(dropdown.value().is_empty());
        assert_eq!(dropdown.last_toggled(), Some(1));
    }

    #[test]
    fn test_set_value_selects_by_value() {
        let dropdown = xyz();
        assert!(dropdown.set_value(&["z".to_string(), "y".to_string()]));
        assert_eq!(dropdown.selected_indices(), vec![1, 2]);
        assert!(dropdown.surface().changes.lock().unwrap().is_empty());
    }
}
