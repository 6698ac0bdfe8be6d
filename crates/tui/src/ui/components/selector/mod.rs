mod selector_component;
pub mod state;

pub use selector_component::SelectorComponent;
pub use state::{CollapsibleSelectorState, SelectorProps};
