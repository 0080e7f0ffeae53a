//! Bulk-selection controller for one list view.

use std::sync::{Arc, RwLock};

use log::{debug, trace, warn};
use pagedom::element::{closest, collect, is_within};
use pagedom::{Document, Element, Event, EventKind, Kind, ListenerId, Page};

use crate::config::ListConfig;
use crate::dropdown::SELECTED_COUNT_ATTR;
use crate::error::ListError;
use crate::navigation::{NavigateEvent, NavigationLifecycle, SubscriptionId, path_of};
use crate::store::{SessionStore, scope_key};

use super::indicator::{HeaderState, TotalCount, summary_text, trigger_selected};
use super::state::{SelectionMode, SelectionState};

/// Data attribute marking hidden fields this controller injected.
const INJECTED_ATTR: &str = "listkit-injected";

/// A row as found in the DOM during one reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowRecord {
    /// Row identifier from the checkbox's data attribute.
    pub id: String,
    /// Element ID of the row checkbox.
    pub checkbox: String,
    /// Element ID of the enclosing row, if any.
    pub row: Option<String>,
}

/// What a delegated click landed on.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ClickTarget {
    SelectAllMatching,
    Header { checked: bool },
    Row { id: String, checked: bool },
}

#[derive(Debug)]
struct ControllerInner {
    state: SelectionState,
    /// Path the controller was attached on.
    path: String,
    scope_key: String,
}

/// State shared between the controller handle and its listeners.
#[derive(Clone)]
struct Shared {
    inner: Arc<RwLock<ControllerInner>>,
    config: Arc<ListConfig>,
    store: Arc<dyn SessionStore>,
}

impl Shared {
    fn state(&self) -> SelectionState {
        self.inner
            .read()
            .map(|guard| guard.state.clone())
            .unwrap_or_default()
    }

    fn update(&self, f: impl FnOnce(&mut SelectionState)) {
        if let Ok(mut guard) = self.inner.write() {
            f(&mut guard.state);
            trace!(
                "Selection now {:?} with {} ids",
                guard.state.mode,
                guard.state.selected.len()
            );
        }
    }

    // -------------------------------------------------------------------------
    // DOM reads
    // -------------------------------------------------------------------------

    fn rows(&self, doc: &Document) -> Vec<RowRecord> {
        let sel = &self.config.selectors;
        let Some(container) = doc.element(&sel.container) else {
            return Vec::new();
        };
        let is_row_checkbox =
            |el: &Element| el.kind == Kind::Checkbox && el.get_data(&sel.row_id_attr).is_some();

        collect(container, &is_row_checkbox)
            .into_iter()
            .filter_map(|cb| {
                let id = cb.get_data(&sel.row_id_attr)?.clone();
                let row = closest(container, &cb.id, |el| el.has_class(&sel.row_class))
                    .map(|el| el.id.clone());
                Some(RowRecord {
                    id,
                    checkbox: cb.id.clone(),
                    row,
                })
            })
            .collect()
    }

    fn total(&self, doc: &Document) -> TotalCount {
        let sel = &self.config.selectors;
        TotalCount::parse(
            doc.element(&sel.table)
                .and_then(|table| table.get_data(&sel.total_attr))
                .map(String::as_str),
        )
    }

    fn classify(&self, doc: &Document, target: &str) -> Option<ClickTarget> {
        let sel = &self.config.selectors;
        if doc.element(&sel.select_all_trigger).is_some()
            && is_within(&doc.root, &sel.select_all_trigger, target)
        {
            return Some(ClickTarget::SelectAllMatching);
        }

        let el = doc.element(target)?;
        if el.kind != Kind::Checkbox {
            return None;
        }
        if el.id == sel.header_checkbox {
            return Some(ClickTarget::Header {
                checked: el.checked,
            });
        }
        let id = el.get_data(&sel.row_id_attr)?;
        Some(ClickTarget::Row {
            id: id.clone(),
            checked: el.checked,
        })
    }

    // -------------------------------------------------------------------------
    // Reconciliation
    // -------------------------------------------------------------------------

    /// Recompute every indicator from the current state.
    fn reconcile(&self, page: &Page) {
        let state = self.state();
        let sel = &self.config.selectors;
        let classes = &self.config.classes;

        page.write(|doc| {
            let rows = self.rows(doc);
            let total = self.total(doc);

            if let Some(head) = doc.element_mut(&sel.head_row) {
                head.toggle_class(&classes.head_active, state.is_active());
                head.toggle_class(&classes.head_all, state.is_all_matching());
            }

            if let Some(trigger) = doc.element_mut(&sel.select_all_trigger) {
                trigger.toggle_class(
                    &classes.trigger_selected,
                    trigger_selected(&state, total, rows.len()),
                );
            }

            if let Some(summary) = doc.element_mut(&sel.summary) {
                summary.set_text(summary_text(&state, total));
            }

            let mut visible_selected = 0;
            for row in &rows {
                let on = state.contains(&row.id);
                if on {
                    visible_selected += 1;
                }
                if let Some(cb) = doc.element_mut(&row.checkbox) {
                    cb.checked = on;
                    cb.indeterminate = false;
                }
                if let Some(el) = row.row.as_deref().and_then(|id| doc.element_mut(id)) {
                    el.toggle_class(&classes.row_selected, on);
                }
            }

            let header = HeaderState::compute(&state, rows.len(), visible_selected);
            if let Some(cb) = doc.element_mut(&sel.header_checkbox) {
                (cb.checked, cb.indeterminate) = header.flags();
            }
        });
    }

    /// Target of the bulk action, if exactly one action is chosen.
    fn chosen_action(&self, doc: &Document) -> Option<String> {
        let el = doc.element(&self.config.selectors.action_select)?;
        // Multi-value selectors report how many values are selected
        if let Some(count) = el.get_data(SELECTED_COUNT_ATTR)
            && count != "1"
        {
            return None;
        }
        el.value.clone().filter(|v| !v.is_empty())
    }

    /// Disable the submit control unless exactly one action is chosen.
    fn sync_submit_enabled(&self, page: &Page) {
        let sel = &self.config.selectors;
        page.write(|doc| {
            if doc.element(&sel.action_select).is_none() {
                return;
            }
            let chosen = self.chosen_action(doc).is_some();
            if let Some(submit) = doc.element_mut(&sel.submit) {
                submit.disabled = !chosen;
            }
        });
    }

    // -------------------------------------------------------------------------
    // Event handlers
    // -------------------------------------------------------------------------

    fn on_click(&self, page: &Page, event: &Event) {
        let Some(target) = page.read(|doc| self.classify(doc, event.target())).flatten() else {
            return;
        };
        debug!("List click: {:?}", target);

        match target {
            ClickTarget::SelectAllMatching => self.update(SelectionState::select_all_matching),
            ClickTarget::Header { checked } => {
                let rows = page.read(|doc| self.rows(doc)).unwrap_or_default();
                self.update(|state| {
                    state.toggle_page(checked, rows.iter().map(|r| r.id.as_str()))
                });
            }
            ClickTarget::Row { id, checked } => {
                let rows = page.read(|doc| self.rows(doc)).unwrap_or_default();
                self.update(|state| {
                    state.toggle_row(&id, checked, rows.iter().map(|r| r.id.as_str()))
                });
            }
        }
        self.reconcile(page);
    }

    fn on_submit(&self, page: &Page) {
        let state = self.state();
        let sel = &self.config.selectors;
        let fields = &self.config.fields;

        page.write(|doc| {
            let target = self.chosen_action(doc);

            let Some(form) = doc.element_mut(&sel.action_form) else {
                return;
            };
            form.retain_children(|c| c.get_data(INJECTED_ATTR).is_none());
            if state.is_all_matching() {
                form.push_child(Element::hidden_input(&fields.select_all, "1").data(INJECTED_ATTR, "1"));
            } else {
                for id in state.sorted_ids() {
                    form.push_child(Element::hidden_input(&fields.id, id).data(INJECTED_ATTR, "1"));
                }
            }

            match target {
                Some(target) => {
                    debug!("Submitting bulk action {}", target);
                    form.action = Some(target.clone());
                    doc.push_state(target);
                }
                None => debug!("Submitting without a single chosen bulk action"),
            }
        });
    }

    fn on_before_navigate(&self, event: &NavigateEvent) {
        let Ok(guard) = self.inner.read() else {
            return;
        };
        let result = if event.path == guard.path {
            debug!("Persisting selection for {}", guard.path);
            self.store.put(&guard.scope_key, &guard.state.to_stored())
        } else {
            debug!("Leaving {} for {}, dropping selection", guard.path, event.path);
            self.store.remove(&guard.scope_key)
        };
        if let Err(e) = result {
            warn!("Selection store failed for {}: {}", guard.scope_key, e);
        }
    }

    fn on_unload(&self) {
        let Ok(guard) = self.inner.read() else {
            return;
        };
        if let Err(e) = self.store.remove(&guard.scope_key) {
            warn!("Selection store failed for {}: {}", guard.scope_key, e);
        }
    }
}

/// Keeps a list's bulk selection and all its indicators consistent.
///
/// A controller is bound to the DOM it was attached to. When a partial-page
/// navigation swaps the list out, detach the old controller and attach a new
/// one; persisted state carries the selection across.
///
/// # Example
///
/// ```ignore
/// let controller = SelectionController::attach(
///     &page,
///     Arc::new(MemoryStore::new()),
///     navigator.clone(),
///     ListConfig::default(),
/// )?;
/// page.click("list-select-page");
/// assert_eq!(controller.summary(), "10 selected");
/// ```
pub struct SelectionController {
    shared: Shared,
    page: Page,
    navigator: Arc<dyn NavigationLifecycle>,
    listeners: Vec<ListenerId>,
    subscriptions: Vec<SubscriptionId>,
}

impl std::fmt::Debug for SelectionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionController")
            .field("state", &self.shared.state())
            .field("listeners", &self.listeners.len())
            .field("subscriptions", &self.subscriptions.len())
            .finish()
    }
}

impl SelectionController {
    /// Attach to the list on `page`, restoring any persisted selection.
    ///
    /// Only the list container is required; other elements are optional and
    /// their indicators are skipped when absent.
    pub fn attach(
        page: &Page,
        store: Arc<dyn SessionStore>,
        navigator: Arc<dyn NavigationLifecycle>,
        config: ListConfig,
    ) -> Result<Self, ListError> {
        let sel = &config.selectors;
        let (has_container, has_form, has_select) = page
            .read(|doc| {
                (
                    doc.element(&sel.container).is_some(),
                    doc.element(&sel.action_form).is_some(),
                    doc.element(&sel.action_select).is_some(),
                )
            })
            .unwrap_or_default();
        if !has_container {
            return Err(ListError::missing(&sel.container));
        }

        let location = page.location();
        let path = path_of(&location).map_err(|source| ListError::InvalidLocation {
            location: location.clone(),
            source,
        })?;
        let key = scope_key(&config.storage_prefix, &path);

        let state = match store.get(&key) {
            Ok(Some(stored)) => SelectionState::from_stored(&stored),
            Ok(None) => SelectionState::new(),
            Err(e) => {
                warn!("Could not read stored selection {}: {}", key, e);
                SelectionState::new()
            }
        };
        debug!(
            "Attaching list selection on {} ({:?}, {} ids)",
            path,
            state.mode,
            state.selected.len()
        );

        let shared = Shared {
            inner: Arc::new(RwLock::new(ControllerInner {
                state,
                path,
                scope_key: key,
            })),
            config: Arc::new(config),
            store,
        };
        shared.reconcile(page);
        shared.sync_submit_enabled(page);

        let sel = &shared.config.selectors;
        let mut listeners = Vec::new();

        let handler = shared.clone();
        listeners.push(page.add_listener(&sel.container, EventKind::Click, move |page, event| {
            handler.on_click(page, event)
        }));

        if has_form {
            let handler = shared.clone();
            listeners.push(page.add_listener(&sel.action_form, EventKind::Submit, move |page, _| {
                handler.on_submit(page)
            }));
        } else {
            debug!("No action form '{}', submission disabled", sel.action_form);
        }

        if has_select {
            let handler = shared.clone();
            listeners.push(page.add_listener(&sel.action_select, EventKind::Change, move |page, _| {
                handler.sync_submit_enabled(page)
            }));
        }

        let handler = shared.clone();
        let before = navigator.on_before_navigate(Arc::new(move |event: &NavigateEvent| {
            handler.on_before_navigate(event)
        }));
        let handler = shared.clone();
        let unload = navigator.on_unload(Arc::new(move || handler.on_unload()));

        Ok(Self {
            shared,
            page: page.clone(),
            navigator,
            listeners,
            subscriptions: vec![before, unload],
        })
    }

    /// Remove every listener and lifecycle subscription.
    pub fn detach(self) {
        for id in &self.listeners {
            self.page.remove_listener(*id);
        }
        for id in &self.subscriptions {
            self.navigator.unsubscribe(*id);
        }
        debug!("Detached list selection on {}", self.path());
    }

    /// Recompute all indicators. Idempotent.
    pub fn reconcile(&self) {
        self.shared.reconcile(&self.page);
    }

    // -------------------------------------------------------------------------
    // State access
    // -------------------------------------------------------------------------

    /// Snapshot of the current selection.
    pub fn state(&self) -> SelectionState {
        self.shared.state()
    }

    pub fn mode(&self) -> SelectionMode {
        self.state().mode
    }

    /// Selected IDs, sorted.
    pub fn selected_ids(&self) -> Vec<String> {
        self.state().sorted_ids()
    }

    pub fn path(&self) -> String {
        self.shared
            .inner
            .read()
            .map(|guard| guard.path.clone())
            .unwrap_or_default()
    }

    pub fn scope_key(&self) -> String {
        self.shared
            .inner
            .read()
            .map(|guard| guard.scope_key.clone())
            .unwrap_or_default()
    }

    /// Rows currently in the DOM.
    pub fn rows(&self) -> Vec<RowRecord> {
        self.page
            .read(|doc| self.shared.rows(doc))
            .unwrap_or_default()
    }

    pub fn total(&self) -> TotalCount {
        self.page
            .read(|doc| self.shared.total(doc))
            .unwrap_or(TotalCount::Unknown)
    }

    /// Summary text for the current state.
    pub fn summary(&self) -> String {
        summary_text(&self.state(), self.total())
    }

    /// Header checkbox state for the current state and rows.
    pub fn header_state(&self) -> HeaderState {
        let state = self.state();
        let rows = self.rows();
        let visible_selected = rows.iter().filter(|r| state.contains(&r.id)).count();
        HeaderState::compute(&state, rows.len(), visible_selected)
    }
}
