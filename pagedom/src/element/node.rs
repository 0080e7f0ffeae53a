use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};

use super::Content;

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

fn generate_id(prefix: &str) -> String {
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{id}")
}

/// What an element behaves like when it receives default actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Kind {
    #[default]
    Box,
    Text,
    /// Flips `checked` on click and clears `indeterminate`.
    Checkbox,
    Button,
    /// Collects named inputs on submit.
    Form,
    Input,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    // Identity
    pub id: String,
    pub kind: Kind,

    // Content
    pub content: Content,

    // Presentation state
    pub classes: BTreeSet<String>,

    // Form control state
    pub checked: bool,
    /// Tri-state display flag. Only meaningful for checkboxes.
    pub indeterminate: bool,
    pub disabled: bool,
    pub name: Option<String>,
    pub value: Option<String>,
    /// Submission target for forms.
    pub action: Option<String>,

    // `data-*` attributes, stored without the prefix.
    pub data: HashMap<String, String>,
    // Other attributes (aria-*, role, ...).
    pub attrs: HashMap<String, String>,
}

impl Default for Element {
    fn default() -> Self {
        Self {
            id: generate_id("el"),
            kind: Kind::Box,
            content: Content::None,
            classes: BTreeSet::new(),
            checked: false,
            indeterminate: false,
            disabled: false,
            name: None,
            value: None,
            action: None,
            data: HashMap::new(),
            attrs: HashMap::new(),
        }
    }
}

impl Element {
    pub fn box_() -> Self {
        Self {
            id: generate_id("box"),
            ..Default::default()
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self {
            id: generate_id("text"),
            kind: Kind::Text,
            content: Content::Text(content.into()),
            ..Default::default()
        }
    }

    pub fn checkbox() -> Self {
        Self {
            id: generate_id("checkbox"),
            kind: Kind::Checkbox,
            ..Default::default()
        }
    }

    pub fn button(label: impl Into<String>) -> Self {
        Self {
            id: generate_id("button"),
            kind: Kind::Button,
            content: Content::Text(label.into()),
            ..Default::default()
        }
    }

    pub fn form() -> Self {
        Self {
            id: generate_id("form"),
            kind: Kind::Form,
            ..Default::default()
        }
    }

    pub fn input(name: impl Into<String>) -> Self {
        Self {
            id: generate_id("input"),
            kind: Kind::Input,
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Create an `<input type=hidden>` equivalent.
    pub fn hidden_input(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: generate_id("hidden"),
            kind: Kind::Input,
            name: Some(name.into()),
            value: Some(value.into()),
            ..Default::default()
        }
        .attr("type", "hidden")
    }

    // Identity
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    // Classes
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.insert(class.into());
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    /// Add or remove a class. Returns true if the class set changed.
    pub fn toggle_class(&mut self, class: &str, on: bool) -> bool {
        if on {
            self.classes.insert(class.to_string())
        } else {
            self.classes.remove(class)
        }
    }

    // Form control state
    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    pub fn indeterminate(mut self, indeterminate: bool) -> Self {
        self.indeterminate = indeterminate;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    // Attributes
    pub fn data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn get_data(&self, key: &str) -> Option<&String> {
        self.data.get(key)
    }

    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    pub fn get_attr(&self, key: &str) -> Option<&String> {
        self.attrs.get(key)
    }

    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attrs.insert(key.into(), value.into());
    }

    // Text

    /// Concatenated text of this element and its descendants.
    pub fn text_content(&self) -> String {
        match &self.content {
            Content::None => String::new(),
            Content::Text(text) => text.clone(),
            Content::Children(children) => children.iter().map(Element::text_content).collect(),
        }
    }

    /// Replace all content with a text node.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.content = Content::Text(text.into());
    }

    // Children
    pub fn child(mut self, child: Element) -> Self {
        self.push_child(child);
        self
    }

    pub fn children(mut self, new_children: impl IntoIterator<Item = Element>) -> Self {
        match &mut self.content {
            Content::Children(children) => children.extend(new_children),
            _ => {
                self.content = Content::Children(new_children.into_iter().collect());
            }
        }
        self
    }

    pub fn push_child(&mut self, child: Element) {
        match &mut self.content {
            Content::Children(children) => children.push(child),
            _ => {
                // Replace content with children
                self.content = Content::Children(vec![child]);
            }
        }
    }

    pub fn child_elements(&self) -> &[Element] {
        self.content.children()
    }

    pub fn child_elements_mut(&mut self) -> &mut [Element] {
        match &mut self.content {
            Content::Children(children) => children,
            _ => &mut [],
        }
    }

    /// Drop direct children that fail the predicate. Returns how many were removed.
    pub fn retain_children(&mut self, mut keep: impl FnMut(&Element) -> bool) -> usize {
        match &mut self.content {
            Content::Children(children) => {
                let before = children.len();
                children.retain(|c| keep(c));
                before - children.len()
            }
            _ => 0,
        }
    }
}
