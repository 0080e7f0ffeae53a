//! Mounting a dropdown onto a page.
//!
//! The menu widget needs a realized DOM before its state can be built, so
//! construction is deferred to the page's next tick.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, OnceLock};

use log::{debug, warn};
use pagedom::{Event, EventKind, ListenerId, Page};

use super::surface::{DropdownConfig, ElementSurface, find_part};
use super::widget::MultiValueDropdown;
use crate::error::DropdownError;
use crate::navigation::{NavigateEvent, NavigationLifecycle, SubscriptionId, path_of};
use crate::store::{SessionStore, dropdown_key};

/// A dropdown drawing into the page.
pub type ElementDropdown = MultiValueDropdown<ElementSurface>;

/// Where a dropdown keeps its selected values between page loads.
#[derive(Clone)]
pub struct Persistence {
    store: Arc<dyn SessionStore>,
    key: String,
}

impl std::fmt::Debug for Persistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persistence").field("key", &self.key).finish()
    }
}

impl Persistence {
    pub fn new(store: Arc<dyn SessionStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Key scoped to the page's path and the dropdown's element ID.
    pub fn for_page(
        store: Arc<dyn SessionStore>,
        prefix: &str,
        page: &Page,
        element_id: &str,
    ) -> Result<Self, url::ParseError> {
        let path = path_of(&page.location())?;
        Ok(Self::new(store, dropdown_key(prefix, &path, element_id)))
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Stored values. Missing or malformed data yields no values.
    pub fn load(&self) -> Vec<String> {
        match self.store.get(&self.key) {
            Ok(Some(stored)) => serde_json::from_str(&stored).unwrap_or_else(|e| {
                warn!("Discarding malformed dropdown state {:?}: {}", stored, e);
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Could not read dropdown state {}: {}", self.key, e);
                Vec::new()
            }
        }
    }

    pub fn save(&self, values: &[String]) {
        let result = if values.is_empty() {
            self.store.remove(&self.key)
        } else {
            match serde_json::to_string(values) {
                Ok(json) => self.store.put(&self.key, &json),
                Err(e) => {
                    warn!("Could not encode dropdown state: {}", e);
                    return;
                }
            }
        };
        if let Err(e) = result {
            warn!("Could not write dropdown state {}: {}", self.key, e);
        }
    }

    /// Forget the stored values.
    pub fn clear(&self) {
        if let Err(e) = self.store.remove(&self.key) {
            warn!("Could not clear dropdown state {}: {}", self.key, e);
        }
    }
}

/// Handle to a dropdown whose construction may still be pending.
pub struct DropdownMount {
    page: Page,
    root: String,
    slot: Arc<OnceLock<ElementDropdown>>,
    listeners: Arc<Mutex<Vec<ListenerId>>>,
    cancelled: Arc<AtomicBool>,
    navigator: Option<Arc<dyn NavigationLifecycle>>,
    subscriptions: Vec<SubscriptionId>,
}

impl std::fmt::Debug for DropdownMount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DropdownMount")
            .field("root", &self.root)
            .field("ready", &self.is_ready())
            .finish()
    }
}

impl DropdownMount {
    /// Schedule construction of the dropdown rooted at `root_id`.
    ///
    /// The root and its menu must already be in the document. The widget
    /// becomes available after the page runs its pending tasks.
    pub fn mount(
        page: &Page,
        root_id: impl Into<String>,
        config: DropdownConfig,
        persistence: Option<Persistence>,
    ) -> Result<Self, DropdownError> {
        let root = root_id.into();
        let config = Arc::new(config);

        let (has_root, has_menu) = page
            .read(|doc| {
                (
                    doc.element(&root).is_some(),
                    find_part(doc, &root, &config.selectors.menu).is_some(),
                )
            })
            .unwrap_or_default();
        if !has_root {
            return Err(DropdownError::MissingRoot { id: root });
        }
        if !has_menu {
            return Err(DropdownError::MissingMenu {
                id: root,
                menu: config.selectors.menu.clone(),
            });
        }

        let mount = Self {
            page: page.clone(),
            root: root.clone(),
            slot: Arc::new(OnceLock::new()),
            listeners: Arc::new(Mutex::new(Vec::new())),
            cancelled: Arc::new(AtomicBool::new(false)),
            navigator: None,
            subscriptions: Vec::new(),
        };

        let slot = Arc::clone(&mount.slot);
        let listeners = Arc::clone(&mount.listeners);
        let cancelled = Arc::clone(&mount.cancelled);
        page.defer(move |page| {
            if cancelled.load(Ordering::SeqCst) {
                debug!("Dropdown {} unmounted before initialization", root);
                return;
            }
            let (dropdown, ids) = initialize(page, &root, config, persistence);
            if let Ok(mut guard) = listeners.lock() {
                guard.extend(ids);
            }
            if slot.set(dropdown).is_err() {
                warn!("Dropdown {} initialized twice", root);
            }
        });

        Ok(mount)
    }

    /// Like [`DropdownMount::mount`], persisting values in `store` under a
    /// key scoped to the page path, the config's prefix and `root_id`.
    ///
    /// The stored values live as long as the user stays on the current path:
    /// they are removed when `navigator` leaves for another path or unloads
    /// the document.
    pub fn mount_persisted(
        page: &Page,
        root_id: impl Into<String>,
        config: DropdownConfig,
        store: Arc<dyn SessionStore>,
        navigator: Arc<dyn NavigationLifecycle>,
    ) -> Result<Self, DropdownError> {
        let root = root_id.into();
        let invalid = |source: url::ParseError| DropdownError::InvalidLocation {
            location: page.location(),
            source,
        };
        let path = path_of(&page.location()).map_err(invalid)?;
        let persistence =
            Persistence::for_page(store, &config.storage_prefix, page, &root).map_err(invalid)?;
        debug!("Dropdown {} persists under {}", root, persistence.key());

        let mut mount = Self::mount(page, root, config, Some(persistence.clone()))?;

        let leaving = persistence.clone();
        let before = navigator.on_before_navigate(Arc::new(move |event: &NavigateEvent| {
            if event.path != path {
                debug!("Leaving {} for {}, clearing {}", path, event.path, leaving.key());
                leaving.clear();
            }
        }));
        let unload = navigator.on_unload(Arc::new(move || persistence.clear()));
        mount.subscriptions = vec![before, unload];
        mount.navigator = Some(navigator);
        Ok(mount)
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn is_ready(&self) -> bool {
        self.slot.get().is_some()
    }

    /// The dropdown, once initialized.
    pub fn get(&self) -> Option<ElementDropdown> {
        self.slot.get().cloned()
    }

    /// Re-read options after the menu was re-rendered, keeping the selection.
    pub fn relayout(&self) {
        if let Some(dropdown) = self.slot.get() {
            let options = dropdown.surface().read_options();
            dropdown.layout_options(options);
        }
    }

    /// Remove listeners and lifecycle subscriptions. Cancels a still-pending
    /// initialization.
    pub fn unmount(self) {
        self.cancelled.store(true, Ordering::SeqCst);
        if let Ok(mut guard) = self.listeners.lock() {
            for id in guard.drain(..) {
                self.page.remove_listener(id);
            }
        }
        if let Some(navigator) = &self.navigator {
            for id in &self.subscriptions {
                navigator.unsubscribe(*id);
            }
        }
    }
}

fn initialize(
    page: &Page,
    root: &str,
    config: Arc<DropdownConfig>,
    persistence: Option<Persistence>,
) -> (ElementDropdown, Vec<ListenerId>) {
    let surface = ElementSurface::new(page, root, Arc::clone(&config));
    let options = surface.read_options();
    debug!("Initializing dropdown {} with {} options", root, options.len());

    let dropdown = MultiValueDropdown::new(surface, options).with_separator(config.separator.clone());
    if let Some(persistence) = &persistence {
        let values = persistence.load();
        if !values.is_empty() {
            dropdown.set_value(&values);
        }
    }

    let mut ids = Vec::new();

    let handler = dropdown.clone();
    ids.push(page.add_listener(root, EventKind::Click, move |_, event| {
        let target = event.target();
        if let Some(index) = handler.surface().item_index(target) {
            handler.toggle_index(index, true);
        } else if handler.surface().is_anchor(target) {
            handler.toggle_menu();
        }
    }));

    if let Some(persistence) = persistence {
        let own_root = root.to_string();
        ids.push(page.add_listener(root, EventKind::Change, move |_, event| {
            if let Event::Change { target, values, .. } = event
                && *target == own_root
            {
                persistence.save(values);
            }
        }));
    }

    (dropdown, ids)
}
