//! Partial-page navigation lifecycle.
//!
//! Controllers subscribe through [`NavigationLifecycle`] instead of listening
//! on a global event bus. [`Navigator`] is the in-process implementation used
//! by hosts that drive navigation themselves, and by tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use log::{debug, warn};
use pagedom::{Element, Page};
use url::Url;

/// Base used to resolve relative locations. Only the path is ever read.
const LOCATION_BASE: &str = "http://localhost/";

/// Path component of a page location, without query or fragment.
pub fn path_of(location: &str) -> Result<String, url::ParseError> {
    let base = Url::parse(LOCATION_BASE)?;
    Ok(base.join(location)?.path().to_string())
}

/// The upcoming page of a navigation, delivered before it renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigateEvent {
    pub url: String,
    pub path: String,
}

impl NavigateEvent {
    pub fn new(url: impl Into<String>) -> Result<Self, url::ParseError> {
        let url = url.into();
        let path = path_of(&url)?;
        Ok(Self { url, path })
    }
}

/// Unique identifier for a lifecycle subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(usize);

impl SubscriptionId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

pub type BeforeNavigateHandler = Arc<dyn Fn(&NavigateEvent) + Send + Sync>;
pub type UnloadHandler = Arc<dyn Fn() + Send + Sync>;

/// Lifecycle hooks of the page-transition layer.
pub trait NavigationLifecycle: Send + Sync {
    /// Called before a navigation renders the upcoming page.
    fn on_before_navigate(&self, handler: BeforeNavigateHandler) -> SubscriptionId;

    /// Called when the document is unloaded (hard reload, leaving the site).
    fn on_unload(&self, handler: UnloadHandler) -> SubscriptionId;

    /// Returns true if the subscription existed.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}

/// In-process navigation driver.
#[derive(Default)]
pub struct Navigator {
    before: RwLock<Vec<(SubscriptionId, BeforeNavigateHandler)>>,
    unload: RwLock<Vec<(SubscriptionId, UnloadHandler)>>,
}

impl std::fmt::Debug for Navigator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Navigator")
            .field("subscriptions", &self.subscription_count())
            .finish()
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscription_count(&self) -> usize {
        let before = self.before.read().map(|g| g.len()).unwrap_or(0);
        let unload = self.unload.read().map(|g| g.len()).unwrap_or(0);
        before + unload
    }

    /// Fire the before-render hooks for `url`.
    pub fn before_render(&self, url: &str) -> Result<NavigateEvent, url::ParseError> {
        let event = NavigateEvent::new(url)?;
        debug!("Before render: {} (path {})", event.url, event.path);

        let handlers: Vec<_> = self
            .before
            .read()
            .map(|g| g.iter().map(|(_, h)| Arc::clone(h)).collect())
            .unwrap_or_default();
        for handler in handlers {
            handler(&event);
        }
        Ok(event)
    }

    /// Fire the unload hooks.
    pub fn unload(&self) {
        debug!("Unload");
        let handlers: Vec<_> = self
            .unload
            .read()
            .map(|g| g.iter().map(|(_, h)| Arc::clone(h)).collect())
            .unwrap_or_default();
        for handler in handlers {
            handler();
        }
    }

    /// Perform a partial-page navigation: fire before-render, swap the
    /// subtree with the freshly rendered one, and update the location.
    pub fn visit(
        &self,
        page: &Page,
        url: &str,
        replacement: Option<Element>,
    ) -> Result<NavigateEvent, url::ParseError> {
        let event = self.before_render(url)?;
        page.write(|doc| {
            if let Some(element) = replacement {
                let id = element.id.clone();
                if !doc.replace_element(&id, element) {
                    warn!("Navigation to {} rendered unknown element '{}'", url, id);
                }
            }
            doc.set_location(url);
        });
        Ok(event)
    }
}

impl NavigationLifecycle for Navigator {
    fn on_before_navigate(&self, handler: BeforeNavigateHandler) -> SubscriptionId {
        let id = SubscriptionId::new();
        if let Ok(mut guard) = self.before.write() {
            guard.push((id, handler));
        }
        id
    }

    fn on_unload(&self, handler: UnloadHandler) -> SubscriptionId {
        let id = SubscriptionId::new();
        if let Ok(mut guard) = self.unload.write() {
            guard.push((id, handler));
        }
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut removed = false;
        if let Ok(mut guard) = self.before.write() {
            let before = guard.len();
            guard.retain(|(sub, _)| *sub != id);
            removed |= guard.len() != before;
        }
        if let Ok(mut guard) = self.unload.write() {
            let before = guard.len();
            guard.retain(|(sub, _)| *sub != id);
            removed |= guard.len() != before;
        }
        removed
    }
}
