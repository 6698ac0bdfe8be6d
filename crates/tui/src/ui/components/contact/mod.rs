mod contact_button_component;
mod contact_modal_component;
pub mod state;

pub use contact_button_component::ContactButtonComponent;
pub use contact_modal_component::ContactModalComponent;
pub use state::{ContactButtonState, ContactButtonView, ContactModalState};
