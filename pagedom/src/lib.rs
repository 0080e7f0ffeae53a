pub mod document;
pub mod element;
pub mod event;
pub mod page;

pub use document::{Document, Submission};
pub use element::{Content, Element, Kind};
pub use event::{Event, EventKind};
pub use page::{ListenerId, Page};
