//! Bulk selection for server-rendered lists.
//!
//! Two state machines: [`selection::SelectionController`] keeps a paginated
//! list's row selection consistent across checkboxes, summary text and
//! partial-page navigations, and [`dropdown::MultiValueDropdown`] lets a
//! dropdown hold any number of selected options.

pub mod config;
pub mod dropdown;
pub mod error;
pub mod navigation;
pub mod selection;
pub mod store;

pub mod prelude {
    pub use crate::config::{FormFields, ListConfig, ListSelectors, StateClasses};
    pub use crate::dropdown::{
        ChangeDetail, DropdownConfig, DropdownMount, DropdownOption, ElementDropdown,
        ElementSurface, MenuSurface, MultiValueDropdown, Persistence,
    };
    pub use crate::error::{DropdownError, ListError, StoreError};
    pub use crate::navigation::{NavigateEvent, NavigationLifecycle, Navigator};
    pub use crate::selection::{
        HeaderState, SelectionController, SelectionMode, SelectionState, TotalCount,
    };
    pub use crate::store::{MemoryStore, SessionStore};
}
