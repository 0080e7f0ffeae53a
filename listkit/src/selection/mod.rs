//! List bulk selection.
//!
//! [`SelectionController`] binds a [`SelectionState`] to a server-rendered
//! list: row and header checkboxes, the "select all matching" trigger, the
//! selection summary and the bulk-action form.

mod controller;
mod indicator;
mod state;

pub use controller::{RowRecord, SelectionController};
pub use indicator::{HeaderState, TotalCount, summary_text, trigger_selected};
pub use state::{ALL_SENTINEL, SelectionMode, SelectionState};
