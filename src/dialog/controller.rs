//! Consumer-facing mutation capability
//!
//! `RegistryController` is the only way consumers reach the registry. It
//! holds no dialog data, just the sending half of the registry's update
//! queue, so it is cheap to clone and every clone is the same capability.

use super::{
    component::{typed, DialogComponent, TypedDialog},
    entry::EntryPatch,
    registry::RegistryOp,
    types::{to_props, DialogKey},
};
use serde::Serialize;
use std::{marker::PhantomData, sync::Arc};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Mutation API over one dialog registry
#[derive(Clone)]
pub struct RegistryController {
    sender: mpsc::UnboundedSender<RegistryOp>,
}

impl RegistryController {
    pub(crate) fn new(sender: mpsc::UnboundedSender<RegistryOp>) -> Self {
        Self { sender }
    }

    /// Register (or re-register) a dialog implementation under `key`.
    ///
    /// Existing props and visibility are kept.
    pub fn add(&self, key: impl Into<DialogKey>, implementation: Arc<dyn DialogComponent>) {
        self.dispatch(RegistryOp::Add {
            key: key.into(),
            implementation,
        });
    }

    /// Register a typed dialog. Each call wraps a new implementation, so
    /// prefer `add` with a kept `Arc` when re-registering every frame.
    pub fn add_typed<D: TypedDialog>(&self, key: impl Into<DialogKey>, dialog: D) {
        self.add(key, typed(dialog));
    }

    /// Discard the dialog and all of its state; no-op if absent
    pub fn remove(&self, key: impl Into<DialogKey>) {
        self.dispatch(RegistryOp::Remove { key: key.into() });
    }

    /// Replace the supplied entry fields. `key` must already be registered.
    pub fn update(&self, key: impl Into<DialogKey>, patch: EntryPatch) {
        self.dispatch(RegistryOp::Update {
            key: key.into(),
            patch,
        });
    }

    /// Shallow-merge `partial` into the entry's props. `key` must already be
    /// registered.
    ///
    /// A partial that does not serialize to an object is logged and dropped.
    pub fn update_props<T>(&self, key: impl Into<DialogKey>, partial: T)
    where
        T: Serialize,
    {
        let key = key.into();
        match to_props(&key, &partial) {
            Ok(partial) => self.dispatch(RegistryOp::UpdateProps { key, partial }),
            Err(e) => warn!(key = %key, "Dropping dialog props update: {}", e),
        }
    }

    pub fn open(&self, key: impl Into<DialogKey>) {
        self.update(key, EntryPatch::visibility(true));
    }

    pub fn close(&self, key: impl Into<DialogKey>) {
        self.update(key, EntryPatch::visibility(false));
    }

    /// Typed handle for one dialog key
    pub fn dialog<P>(&self, key: impl Into<DialogKey>) -> DialogHandle<P> {
        DialogHandle {
            key: key.into(),
            controller: self.clone(),
            _props: PhantomData,
        }
    }

    /// Whether both controllers drive the same registry
    pub fn same_registry(&self, other: &Self) -> bool {
        self.sender.same_channel(&other.sender)
    }

    fn dispatch(&self, op: RegistryOp) {
        if let Err(mpsc::error::SendError(op)) = self.sender.send(op) {
            debug!(key = %op.key(), "Dialog registry is gone; discarding {:?}", op);
        }
    }
}

impl PartialEq for RegistryController {
    fn eq(&self, other: &Self) -> bool {
        self.same_registry(other)
    }
}

impl Eq for RegistryController {}

impl std::fmt::Debug for RegistryController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryController")
            .field("closed", &self.sender.is_closed())
            .finish()
    }
}

/// Typed consumer hook for one dialog.
///
/// `P` is the props shape the call site works with; it is only used to
/// type-check the values passed in.
pub struct DialogHandle<P> {
    key: DialogKey,
    controller: RegistryController,
    _props: PhantomData<fn(P)>,
}

impl<P> Clone for DialogHandle<P> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            controller: self.controller.clone(),
            _props: PhantomData,
        }
    }
}

impl<P> std::fmt::Debug for DialogHandle<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogHandle").field("key", &self.key).finish()
    }
}

impl<P: Serialize> DialogHandle<P> {
    pub fn key(&self) -> &DialogKey {
        &self.key
    }

    pub fn register(&self, implementation: Arc<dyn DialogComponent>) {
        self.controller.add(&self.key, implementation);
    }

    pub fn unregister(&self) {
        self.controller.remove(&self.key);
    }

    pub fn open(&self) {
        self.controller.open(&self.key);
    }

    pub fn close(&self) {
        self.controller.close(&self.key);
    }

    pub fn toggle_to(&self, is_open: bool) {
        self.controller.update(&self.key, EntryPatch::visibility(is_open));
    }

    /// Merge `props` and open, applied in the same batch
    pub fn open_with(&self, props: &P) {
        self.controller.update_props(&self.key, props);
        self.open();
    }

    /// Merge any partial view of `P` (e.g. a `serde_json::json!` object)
    pub fn set_props<T: Serialize>(&self, partial: T) {
        self.controller.update_props(&self.key, partial);
    }
}
