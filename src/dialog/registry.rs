//! Dialog registry
//!
//! The registry owns the mapping from dialog key to entry. It is only
//! written through [`RegistryOp`]s, which consumers enqueue via a
//! [`RegistryController`] and the host applies in batches with
//! [`DialogRegistry::flush`]. Each batch publishes one new immutable
//! [`RegistrySnapshot`].

use super::{
    component::{same_component, DialogComponent},
    controller::RegistryController,
    entry::{DialogEntry, EntryPatch},
    types::{from_props, DialogKey, DialogResult, Props},
};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// A queued registry mutation
#[derive(Clone)]
pub enum RegistryOp {
    Add {
        key: DialogKey,
        implementation: Arc<dyn DialogComponent>,
    },
    Remove {
        key: DialogKey,
    },
    Update {
        key: DialogKey,
        patch: EntryPatch,
    },
    UpdateProps {
        key: DialogKey,
        partial: Props,
    },
}

impl RegistryOp {
    pub fn key(&self) -> &DialogKey {
        match self {
            Self::Add { key, .. }
            | Self::Remove { key }
            | Self::Update { key, .. }
            | Self::UpdateProps { key, .. } => key,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Add { .. } => "add",
            Self::Remove { .. } => "remove",
            Self::Update { .. } => "update",
            Self::UpdateProps { .. } => "update_props",
        }
    }
}

impl std::fmt::Debug for RegistryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Add { key, implementation } => f
                .debug_struct("Add")
                .field("key", key)
                .field("implementation", &implementation.name())
                .finish(),
            Self::Remove { key } => f.debug_struct("Remove").field("key", key).finish(),
            Self::Update { key, patch } => f
                .debug_struct("Update")
                .field("key", key)
                .field("patch", patch)
                .finish(),
            Self::UpdateProps { key, partial } => f
                .debug_struct("UpdateProps")
                .field("key", key)
                .field("partial", partial)
                .finish(),
        }
    }
}

/// Immutable view of the registry at one point in time
#[derive(Clone, Default, Debug)]
pub struct RegistrySnapshot {
    entries: IndexMap<DialogKey, Arc<DialogEntry>>,
    version: u64,
}

impl RegistrySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pure transition: the snapshot that results from applying `op`.
    pub fn apply(&self, op: RegistryOp) -> Self {
        let mut next = self.clone();
        if next.apply_in_place(op) {
            next.version += 1;
        }
        next
    }

    /// Incremented for every published change
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn get(&self, key: &str) -> Option<&Arc<DialogEntry>> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &DialogKey> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DialogKey, &Arc<DialogEntry>)> {
        self.entries.iter()
    }

    pub fn is_open(&self, key: &str) -> bool {
        self.entries.get(key).is_some_and(|entry| entry.is_open())
    }

    /// Keys of open dialogs, bottom to top
    pub fn open_keys(&self) -> impl Iterator<Item = &DialogKey> {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.is_open())
            .map(|(key, _)| key)
    }

    /// Decode the props of `key` into `P`, with the registry's `is_open`
    /// laid over any stored value, as the mounted instance sees them.
    ///
    /// Returns `Ok(None)` when the key is absent or has no props yet.
    pub fn props_as<P: DeserializeOwned>(&self, key: &str) -> DialogResult<Option<P>> {
        match self.entries.get_key_value(key) {
            Some((key, entry)) if entry.props().is_some() => {
                from_props(key, &entry.instance_props()).map(Some)
            }
            _ => Ok(None),
        }
    }

    /// Apply one op, returning whether anything changed.
    fn apply_in_place(&mut self, op: RegistryOp) -> bool {
        let label = op.label();
        match op {
            RegistryOp::Add { key, implementation } => {
                if key.is_empty() {
                    warn!("Ignoring dialog registration with an empty key");
                    return false;
                }

                match self.entries.get_mut(&key) {
                    Some(entry) if same_component(entry.implementation(), &implementation) => false,
                    Some(entry) => {
                        debug!(key = %key, implementation = implementation.name(), "Replacing dialog implementation");
                        *entry = Arc::new(entry.with_implementation(implementation));
                        true
                    }
                    None => {
                        debug!(key = %key, implementation = implementation.name(), "Registering dialog");
                        self.entries.insert(key, Arc::new(DialogEntry::new(implementation)));
                        true
                    }
                }
            }
            RegistryOp::Remove { key } => {
                let removed = self.entries.shift_remove(&key).is_some();
                if removed {
                    debug!(key = %key, "Removed dialog");
                }
                removed
            }
            RegistryOp::Update { key, patch } => {
                match self.entries.get_mut(&key) {
                    Some(_) if patch.is_empty() => false,
                    Some(entry) => {
                        debug!(key = %key, ?patch, "Updating dialog");
                        *entry = Arc::new(entry.patched(patch));
                        true
                    }
                    None => contract_violation(label, &key),
                }
            }
            RegistryOp::UpdateProps { key, partial } => match self.entries.get_mut(&key) {
                Some(entry) => {
                    debug!(key = %key, fields = partial.len(), "Merging dialog props");
                    *entry = Arc::new(entry.with_merged_props(partial));
                    true
                }
                None => contract_violation(label, &key),
            },
        }
    }
}

/// `update`/`update_props` on an unregistered key is a caller bug: loud in
/// debug builds, a logged no-op in release builds.
fn contract_violation(operation: &str, key: &DialogKey) -> bool {
    warn!(key = %key, operation, "Dialog operation on unregistered key ignored");
    if cfg!(debug_assertions) {
        panic!("{operation} called on unregistered dialog '{key}'; call add first");
    }
    false
}

/// Owner of the registry storage for one dialog host
pub struct DialogRegistry {
    snapshot: Arc<RegistrySnapshot>,
    sender: mpsc::UnboundedSender<RegistryOp>,
    receiver: mpsc::UnboundedReceiver<RegistryOp>,
}

impl DialogRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            snapshot: Arc::new(RegistrySnapshot::new()),
            sender,
            receiver,
        }
    }

    /// Capability handed to consumers
    pub fn controller(&self) -> RegistryController {
        RegistryController::new(self.sender.clone())
    }

    /// Current published snapshot
    pub fn snapshot(&self) -> Arc<RegistrySnapshot> {
        Arc::clone(&self.snapshot)
    }

    /// Apply every queued op in FIFO order against the current snapshot.
    ///
    /// Publishes at most one new snapshot and returns whether it did.
    pub fn flush(&mut self) -> bool {
        let mut next: Option<RegistrySnapshot> = None;
        let mut applied = 0usize;

        while let Ok(op) = self.receiver.try_recv() {
            let working = next.get_or_insert_with(|| (*self.snapshot).clone());
            if working.apply_in_place(op) {
                applied += 1;
            }
        }

        match next {
            Some(mut snapshot) if applied > 0 => {
                snapshot.version = self.snapshot.version + 1;
                debug!(version = snapshot.version, applied, entries = snapshot.len(), "Published dialog registry snapshot");
                self.snapshot = Arc::new(snapshot);
                true
            }
            _ => false,
        }
    }
}

impl Default for DialogRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialog::{
        component::{DialogInstance, DialogComponent},
        types::{to_props, DialogResult, IS_OPEN_FIELD},
    };
    use serde_json::{json, Value};

    struct Blank;

    impl DialogComponent for Blank {
        fn instantiate(&self, _key: &DialogKey, _props: &Props) -> DialogResult<Box<dyn DialogInstance>> {
            unreachable!("registry tests never mount")
        }
    }

    fn blank() -> Arc<dyn DialogComponent> {
        Arc::new(Blank)
    }

    fn props(value: Value) -> Props {
        to_props(&DialogKey::from("test"), &value).unwrap()
    }

    fn registry_with(keys: &[&str]) -> (DialogRegistry, RegistryController) {
        let mut registry = DialogRegistry::new();
        let controller = registry.controller();
        for key in keys {
            controller.add(*key, blank());
        }
        registry.flush();
        (registry, controller)
    }

    #[test]
    fn test_add_creates_closed_entry_without_props() {
        let (registry, _) = registry_with(&["a"]);
        let snapshot = registry.snapshot();
        let entry = snapshot.get("a").unwrap();

        assert!(entry.props().is_none());
        assert!(!entry.is_open());
        assert_eq!(snapshot.version(), 1);
    }

    #[test]
    fn test_readd_keeps_configuration() {
        let (mut registry, controller) = registry_with(&["a"]);
        controller.update_props("a", json!({"item_name": "router1"}));
        controller.open("a");
        registry.flush();

        let replacement = blank();
        controller.add("a", Arc::clone(&replacement));
        controller.add("a", blank());
        registry.flush();

        let snapshot = registry.snapshot();
        let entry = snapshot.get("a").unwrap();
        assert!(entry.is_open());
        assert_eq!(entry.props(), Some(&props(json!({"item_name": "router1"}))));
        assert!(!same_component(entry.implementation(), &replacement));
    }

    #[test]
    fn test_readd_same_implementation_is_noop() {
        let implementation = blank();
        let mut registry = DialogRegistry::new();
        let controller = registry.controller();
        controller.add("a", Arc::clone(&implementation));
        registry.flush();
        let before = registry.snapshot();

        controller.add("a", Arc::clone(&implementation));
        assert!(!registry.flush());

        let after = registry.snapshot();
        assert!(Arc::ptr_eq(&before, &after));
        assert!(Arc::ptr_eq(before.get("a").unwrap(), after.get("a").unwrap()));
    }

    #[test]
    fn test_empty_key_is_ignored() {
        let (registry, _) = registry_with(&[""]);
        assert!(registry.snapshot().is_empty());
    }

    #[test]
    fn test_toggle_keeps_props_and_entry() {
        let (mut registry, controller) = registry_with(&["a"]);
        controller.update_props("a", json!({"x": 1}));
        controller.update("a", EntryPatch::visibility(true));
        registry.flush();
        assert!(registry.snapshot().is_open("a"));

        controller.update("a", EntryPatch::visibility(false));
        registry.flush();

        let snapshot = registry.snapshot();
        let entry = snapshot.get("a").unwrap();
        assert!(!entry.is_open());
        assert_eq!(entry.props(), Some(&props(json!({"x": 1}))));
    }

    #[test]
    fn test_update_replaces_only_supplied_fields() {
        let (mut registry, controller) = registry_with(&["a"]);
        controller.update("a", EntryPatch::new().props(props(json!({"x": 1, "y": 2}))));
        controller.update("a", EntryPatch::new().props(props(json!({"z": 3}))));
        registry.flush();

        let snapshot = registry.snapshot();
        let entry = snapshot.get("a").unwrap();
        assert_eq!(entry.props(), Some(&props(json!({"z": 3}))));
        assert!(!entry.is_open());
    }

    #[test]
    fn test_update_can_clear_props() {
        let (mut registry, controller) = registry_with(&["a"]);
        controller.update_props("a", json!({"x": 1}));
        controller.open("a");
        registry.flush();

        controller.update("a", EntryPatch::new().clear_props());
        assert!(registry.flush());

        let snapshot = registry.snapshot();
        let entry = snapshot.get("a").unwrap();
        assert!(entry.props().is_none());
        assert!(entry.is_open());

        // Merging after a clear starts from an empty object
        controller.update_props("a", json!({"y": 2}));
        registry.flush();
        assert_eq!(registry.snapshot().get("a").unwrap().props(), Some(&props(json!({"y": 2}))));
    }

    #[test]
    fn test_update_props_shallow_merges() {
        let (mut registry, controller) = registry_with(&["a"]);
        controller.update_props("a", json!({"x": 1, "nested": {"keep": true}}));
        controller.update_props("a", json!({"y": 2, "nested": {"other": 1}}));
        registry.flush();

        let snapshot = registry.snapshot();
        assert_eq!(
            snapshot.get("a").unwrap().props(),
            Some(&props(json!({"x": 1, "y": 2, "nested": {"other": 1}})))
        );
    }

    #[test]
    fn test_remove_then_add_starts_fresh() {
        let (mut registry, controller) = registry_with(&["a"]);
        controller.update_props("a", json!({"x": 1}));
        controller.open("a");
        controller.remove("a");
        registry.flush();
        assert!(!registry.snapshot().contains("a"));

        controller.add("a", blank());
        registry.flush();
        let snapshot = registry.snapshot();
        let entry = snapshot.get("a").unwrap();
        assert!(entry.props().is_none());
        assert!(!entry.is_open());
    }

    #[test]
    fn test_remove_missing_key_is_noop() {
        let (mut registry, controller) = registry_with(&["a"]);
        controller.remove("missing");
        assert!(!registry.flush());
        assert_eq!(registry.snapshot().len(), 1);
    }

    #[test]
    fn test_unrelated_entries_keep_identity() {
        let (mut registry, controller) = registry_with(&["a", "b"]);
        let before = registry.snapshot();

        controller.update_props("a", json!({"x": 1}));
        controller.open("a");
        registry.flush();

        let after = registry.snapshot();
        assert!(Arc::ptr_eq(before.get("b").unwrap(), after.get("b").unwrap()));
        assert!(!Arc::ptr_eq(before.get("a").unwrap(), after.get("a").unwrap()));
    }

    #[test]
    fn test_flush_batches_into_one_snapshot() {
        let (mut registry, controller) = registry_with(&[]);
        controller.add("a", blank());
        controller.add("b", blank());
        controller.remove("a");
        assert!(registry.flush());

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.version(), 1);
        assert_eq!(snapshot.keys().map(DialogKey::as_str).collect::<Vec<_>>(), vec!["b"]);
        assert!(!registry.flush());
    }

    #[test]
    fn test_insertion_order_survives_updates() {
        let (mut registry, controller) = registry_with(&["c", "a", "b"]);
        controller.open("a");
        controller.add("c", blank());
        registry.flush();

        let snapshot = registry.snapshot();
        let keys: Vec<_> = snapshot.keys().map(DialogKey::as_str).collect();
        assert_eq!(keys, vec!["c", "a", "b"]);
        assert_eq!(snapshot.open_keys().map(DialogKey::as_str).collect::<Vec<_>>(), vec!["a"]);
    }

    #[test]
    fn test_apply_is_pure() {
        let base = RegistrySnapshot::new();
        let next = base.apply(RegistryOp::Add {
            key: DialogKey::from("a"),
            implementation: blank(),
        });

        assert!(base.is_empty());
        assert_eq!(next.len(), 1);
        assert_eq!(next.version(), 1);
    }

    #[test]
    fn test_instance_props_override_stored_is_open() {
        let (mut registry, controller) = registry_with(&["a"]);
        controller.update_props("a", json!({IS_OPEN_FIELD: true, "x": 1}));
        registry.flush();

        let snapshot = registry.snapshot();
        let instance = snapshot.get("a").unwrap().instance_props();
        assert_eq!(instance.get(IS_OPEN_FIELD), Some(&Value::Bool(false)));
        assert_eq!(instance.get("x"), Some(&json!(1)));
    }

    #[test]
    fn test_props_as_decodes_typed_view() {
        #[derive(Debug, PartialEq, serde::Deserialize)]
        struct Confirm {
            item_name: String,
        }

        let (mut registry, controller) = registry_with(&["a", "b"]);
        controller.update_props("a", json!({"item_name": "router1"}));
        registry.flush();

        let snapshot = registry.snapshot();
        assert_eq!(
            snapshot.props_as::<Confirm>("a").unwrap(),
            Some(Confirm { item_name: "router1".into() })
        );
        assert_eq!(snapshot.props_as::<Confirm>("b").unwrap(), None);
        assert_eq!(snapshot.props_as::<Confirm>("missing").unwrap(), None);
    }

    #[test]
    fn test_props_as_reports_registry_visibility() {
        #[derive(Debug, serde::Deserialize)]
        struct Confirm {
            is_open: bool,
            item_name: String,
        }

        let (mut registry, controller) = registry_with(&["a"]);
        controller.update_props("a", json!({IS_OPEN_FIELD: false, "item_name": "router1"}));
        controller.open("a");
        registry.flush();

        let confirm = registry.snapshot().props_as::<Confirm>("a").unwrap().unwrap();
        assert!(confirm.is_open);
        assert_eq!(confirm.item_name, "router1");
    }

    #[test]
    #[cfg_attr(debug_assertions, should_panic(expected = "unregistered dialog 'ghost'"))]
    fn test_update_on_missing_key_is_contract_violation() {
        let (mut registry, controller) = registry_with(&[]);
        controller.open("ghost");
        assert!(!registry.flush());
        assert!(registry.snapshot().is_empty());
    }

    #[test]
    #[cfg_attr(debug_assertions, should_panic(expected = "update_props called on unregistered dialog"))]
    fn test_update_props_on_missing_key_is_contract_violation() {
        let (mut registry, controller) = registry_with(&[]);
        controller.update_props("ghost", json!({"x": 1}));
        assert!(!registry.flush());
    }

    #[test]
    fn test_controller_outliving_registry_is_harmless() {
        let (registry, controller) = registry_with(&["a"]);
        drop(registry);
        controller.remove("a");
        controller.open("a");
    }
}
