mod file_upload_component;
pub mod state;

pub use file_upload_component::FileUploadComponent;
pub use state::FileUploadListState;
