/// Events with element targeting. All of them bubble.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Pointer activation, dispatched after the default action (checkbox flip).
    Click { target: String },
    /// Form submission, dispatched before the form fields are collected.
    Submit { target: String },
    /// Value change on a selection control.
    Change {
        target: String,
        indices: Vec<usize>,
        values: Vec<String>,
    },
}

/// Which listener bucket an event is delivered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    Submit,
    Change,
}

impl Event {
    pub fn target(&self) -> &str {
        match self {
            Self::Click { target } | Self::Submit { target } | Self::Change { target, .. } => {
                target
            }
        }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            Self::Click { .. } => EventKind::Click,
            Self::Submit { .. } => EventKind::Submit,
            Self::Change { .. } => EventKind::Change,
        }
    }
}
