//! Dialogs used by the demo screen

pub mod confirm;
pub mod create_token;

pub use confirm::{ConfirmDialog, ConfirmProps};
pub use create_token::{CreateTokenDialog, CreateTokenField, CreateTokenProps};
