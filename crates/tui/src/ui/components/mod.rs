//! UI components: tag selectors, the contact button and modal, the file list.

pub mod common;
pub mod component;
pub mod contact;
pub mod file_upload;
pub mod selector;

pub use component::*;
