//! Document: the element tree plus the browser-level state around it.

use crate::element::{Element, Kind, collect, find_element, find_element_mut};

/// A native form submission as the browser would send it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub form: String,
    pub action: Option<String>,
    pub fields: Vec<(String, String)>,
}

impl Submission {
    /// All values submitted under `name`, in document order.
    pub fn values(&self, name: &str) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct Document {
    pub root: Element,
    location: String,
    history: Vec<String>,
    submissions: Vec<Submission>,
}

impl Document {
    pub fn new(root: Element, location: impl Into<String>) -> Self {
        let location = location.into();
        Self {
            root,
            history: vec![location.clone()],
            location,
            submissions: Vec::new(),
        }
    }

    /// Current URL (path plus optional query).
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Set the URL after a partial-page navigation rendered.
    pub fn set_location(&mut self, location: impl Into<String>) {
        self.location = location.into();
        self.history.push(self.location.clone());
    }

    /// Record a history entry without navigating (`history.pushState`).
    pub fn push_state(&mut self, url: impl Into<String>) {
        self.set_location(url);
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        find_element(&self.root, id)
    }

    pub fn element_mut(&mut self, id: &str) -> Option<&mut Element> {
        find_element_mut(&mut self.root, id)
    }

    /// Swap out a subtree, as a partial-page render does.
    /// Returns false if no element with that ID exists.
    pub fn replace_element(&mut self, id: &str, replacement: Element) -> bool {
        if self.root.id == id {
            self.root = replacement;
            return true;
        }
        match self.element_mut(id) {
            Some(el) => {
                *el = replacement;
                true
            }
            None => false,
        }
    }

    /// Named, enabled inputs inside the form, in document order.
    pub fn form_fields(&self, form_id: &str) -> Vec<(String, String)> {
        let Some(form) = self.element(form_id) else {
            return Vec::new();
        };
        collect(form, &|el: &Element| {
            el.kind == Kind::Input && !el.disabled && el.name.is_some() && el.value.is_some()
        })
        .into_iter()
        .filter_map(|el| Some((el.name.clone()?, el.value.clone()?)))
        .collect()
    }

    pub(crate) fn record_submission(&mut self, submission: Submission) {
        self.submissions.push(submission);
    }

    pub fn submissions(&self) -> &[Submission] {
        &self.submissions
    }
}
