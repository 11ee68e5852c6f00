//! Key-addressed dialog registry
//!
//! Consumers register a dialog implementation under a key once, then open,
//! close and re-parameterize it through a [`RegistryController`] without
//! holding the dialog's widget themselves. A [`DialogHost`] owns the
//! registry and the mount point that draws every registered dialog.

pub mod component;
pub mod controller;
pub mod entry;
pub mod host;
pub mod layout;
pub mod mount;
pub mod registry;
pub mod types;

pub use component::{typed, DialogComponent, DialogInstance, Typed, TypedDialog};
pub use controller::{DialogHandle, RegistryController};
pub use entry::{DialogEntry, EntryPatch};
pub use host::DialogHost;
pub use layout::{DialogFrame, DialogLayout, DialogPosition, DialogSize};
pub use mount::{MountObserver, MountPoint, MountedDialog, Reconciliation};
pub use registry::{DialogRegistry, RegistryOp, RegistrySnapshot};
pub use types::{dialog_keys, DialogError, DialogKey, DialogResult, Props, IS_OPEN_FIELD};
