//! Multi-value select dropdown.
//!
//! The selection logic lives in [`MultiValueDropdown`]; the visual widget is
//! reached only through the [`MenuSurface`] capability trait.

mod mount;
mod state;
mod surface;
mod widget;

pub use mount::{DropdownMount, ElementDropdown, Persistence};
pub use state::{ChangeDetail, DropdownOption, MultiSelectState};
pub use surface::{
    DropdownClasses, DropdownConfig, DropdownSelectors, ElementSurface, MenuSurface, SELECTED_COUNT_ATTR,
};
pub use widget::{DEFAULT_SEPARATOR, MultiValueDropdown};
