//! Shared page handle: document, event listeners and the deferred task queue.
//!
//! `Page` is cheap to clone; clones share the same document. Listeners are
//! invoked with no internal lock held, so they are free to read and mutate
//! the document or register further listeners.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use log::trace;

use crate::document::{Document, Submission};
use crate::element::{Element, Kind, ancestor_ids};
use crate::event::{Event, EventKind};

/// Handle returned by [`Page::add_listener`], used to remove it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(usize);

impl ListenerId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl std::fmt::Display for ListenerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "__listener_{}", self.0)
    }
}

pub type Listener = Arc<dyn Fn(&Page, &Event) + Send + Sync>;

type Task = Box<dyn FnOnce(&Page) + Send>;

struct Registration {
    id: ListenerId,
    element_id: String,
    kind: EventKind,
    listener: Listener,
}

#[derive(Clone)]
pub struct Page {
    document: Arc<RwLock<Document>>,
    listeners: Arc<RwLock<Vec<Registration>>>,
    tasks: Arc<Mutex<VecDeque<Task>>>,
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("location", &self.location())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl Page {
    pub fn new(document: Document) -> Self {
        Self {
            document: Arc::new(RwLock::new(document)),
            listeners: Arc::new(RwLock::new(Vec::new())),
            tasks: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    pub fn from_root(root: Element, location: impl Into<String>) -> Self {
        Self::new(Document::new(root, location))
    }

    // -------------------------------------------------------------------------
    // Document access
    // -------------------------------------------------------------------------

    /// Run `f` against the document. None if the lock is poisoned.
    pub fn read<R>(&self, f: impl FnOnce(&Document) -> R) -> Option<R> {
        self.document.read().ok().map(|guard| f(&guard))
    }

    /// Run `f` against the document mutably. None if the lock is poisoned.
    pub fn write<R>(&self, f: impl FnOnce(&mut Document) -> R) -> Option<R> {
        self.document.write().ok().map(|mut guard| f(&mut guard))
    }

    /// Clone of an element, for inspection.
    pub fn element(&self, id: &str) -> Option<Element> {
        self.read(|doc| doc.element(id).cloned()).flatten()
    }

    pub fn location(&self) -> String {
        self.read(|doc| doc.location().to_string())
            .unwrap_or_default()
    }

    // -------------------------------------------------------------------------
    // Listeners
    // -------------------------------------------------------------------------

    /// Listen for `kind` events targeted at `element_id` or bubbling through it.
    pub fn add_listener(
        &self,
        element_id: impl Into<String>,
        kind: EventKind,
        listener: impl Fn(&Page, &Event) + Send + Sync + 'static,
    ) -> ListenerId {
        let id = ListenerId::new();
        let element_id = element_id.into();
        trace!("Adding {:?} listener {} on {}", kind, id, element_id);
        if let Ok(mut guard) = self.listeners.write() {
            guard.push(Registration {
                id,
                element_id,
                kind,
                listener: Arc::new(listener),
            });
        }
        id
    }

    /// Returns true if the listener was registered.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.listeners
            .write()
            .map(|mut guard| {
                let before = guard.len();
                guard.retain(|r| r.id != id);
                guard.len() != before
            })
            .unwrap_or(false)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.read().map(|g| g.len()).unwrap_or(0)
    }

    /// Deliver an event to the target and then each ancestor in turn.
    ///
    /// Returns how many listeners ran. Events targeting an element that is
    /// not in the document are dropped.
    pub fn dispatch(&self, event: Event) -> usize {
        let Some(chain) = self.read(|doc| ancestor_ids(&doc.root, event.target())).flatten() else {
            trace!("Dropping {:?}: target not in document", event.kind());
            return 0;
        };

        let kind = event.kind();
        let snapshot: Vec<(String, Listener)> = self
            .listeners
            .read()
            .map(|guard| {
                guard
                    .iter()
                    .filter(|r| r.kind == kind)
                    .map(|r| (r.element_id.clone(), Arc::clone(&r.listener)))
                    .collect()
            })
            .unwrap_or_default();

        let mut invoked = 0;
        for current in &chain {
            for (element_id, listener) in &snapshot {
                if element_id == current {
                    listener(self, &event);
                    invoked += 1;
                }
            }
        }
        invoked
    }

    // -------------------------------------------------------------------------
    // User actions
    // -------------------------------------------------------------------------

    /// Simulate a click: run the default action, then dispatch.
    ///
    /// Returns false if the element is missing or disabled.
    pub fn click(&self, id: &str) -> bool {
        let clickable = self
            .write(|doc| match doc.element_mut(id) {
                Some(el) if !el.disabled => {
                    if el.kind == Kind::Checkbox {
                        el.checked = !el.checked;
                        el.indeterminate = false;
                    }
                    true
                }
                _ => false,
            })
            .unwrap_or(false);

        if clickable {
            self.dispatch(Event::Click {
                target: id.to_string(),
            });
        }
        clickable
    }

    /// Simulate submitting a form: dispatch, then collect and record the
    /// fields the browser would send.
    pub fn submit(&self, form_id: &str) -> Option<Submission> {
        let is_form = self
            .read(|doc| doc.element(form_id).is_some_and(|el| el.kind == Kind::Form))
            .unwrap_or(false);
        if !is_form {
            return None;
        }

        self.dispatch(Event::Submit {
            target: form_id.to_string(),
        });

        self.write(|doc| {
            let submission = Submission {
                form: form_id.to_string(),
                action: doc.element(form_id).and_then(|f| f.action.clone()),
                fields: doc.form_fields(form_id),
            };
            doc.record_submission(submission.clone());
            submission
        })
    }

    // -------------------------------------------------------------------------
    // Deferred tasks
    // -------------------------------------------------------------------------

    /// Queue work for the next tick, after the current handler returns.
    pub fn defer(&self, task: impl FnOnce(&Page) + Send + 'static) {
        if let Ok(mut guard) = self.tasks.lock() {
            guard.push_back(Box::new(task));
        }
    }

    /// Run the tasks queued so far. Tasks queued while running wait for the
    /// next call. Returns how many ran.
    pub fn run_pending(&self) -> usize {
        let batch: Vec<Task> = self
            .tasks
            .lock()
            .map(|mut guard| guard.drain(..).collect())
            .unwrap_or_default();
        let count = batch.len();
        for task in batch {
            task(self);
        }
        count
    }

    pub fn pending_tasks(&self) -> usize {
        self.tasks.lock().map(|g| g.len()).unwrap_or(0)
    }
}
