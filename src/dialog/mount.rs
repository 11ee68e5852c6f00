//! Mount point
//!
//! Turns registry snapshots into live dialog instances:
//! - one instance per registry key, in registry order (later keys on top)
//! - instances are rebuilt only when their entry `Arc` changed
//! - closed entries stay mounted and receive `is_open: false`
//! - open entries are drawn over an optionally dimmed background

use super::{
    component::DialogInstance,
    entry::DialogEntry,
    layout::DialogLayout,
    registry::RegistrySnapshot,
    types::{DialogKey, Props},
};
use crate::tui::{theme::Theme, Frame};
use indexmap::IndexMap;
use ratatui::{
    layout::Rect,
    widgets::{Block, Borders, Clear},
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Callback trait for mount lifecycle events
pub trait MountObserver: Send {
    /// Called when a key is instantiated for the first time
    fn on_mounted(&mut self, key: &DialogKey, props: &Props) {
        let _ = (key, props);
    }

    /// Called when a mounted key is re-instantiated with new data
    fn on_updated(&mut self, key: &DialogKey, props: &Props) {
        let _ = (key, props);
    }

    /// Called when a key left the registry
    fn on_unmounted(&mut self, key: &DialogKey) {
        let _ = key;
    }
}

/// Outcome of one reconcile pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    pub mounted: Vec<DialogKey>,
    pub updated: Vec<DialogKey>,
    pub unmounted: Vec<DialogKey>,
    pub unchanged: usize,
}

impl Reconciliation {
    pub fn is_noop(&self) -> bool {
        self.mounted.is_empty() && self.updated.is_empty() && self.unmounted.is_empty()
    }
}

/// A dialog instantiated by the mount point
pub struct MountedDialog {
    entry: Arc<DialogEntry>,
    props: Props,
    instance: Option<Box<dyn DialogInstance>>,
    /// Number of times this key was instantiated since it was mounted
    generation: u64,
}

impl MountedDialog {
    /// Props the instance was built with (`is_open` included)
    pub fn props(&self) -> &Props {
        &self.props
    }

    pub fn is_open(&self) -> bool {
        self.entry.is_open()
    }

    pub fn entry(&self) -> &Arc<DialogEntry> {
        &self.entry
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// False when the implementation rejected the props
    pub fn is_instantiated(&self) -> bool {
        self.instance.is_some()
    }
}

/// Renders every registered dialog
pub struct MountPoint {
    instances: IndexMap<DialogKey, MountedDialog>,
    observers: Vec<Box<dyn MountObserver>>,
    /// Snapshot the instances were last reconciled against
    last_snapshot: Option<Arc<RegistrySnapshot>>,
    /// Background dimming while any dialog is open
    background_dim: bool,
}

impl MountPoint {
    pub fn new() -> Self {
        Self {
            instances: IndexMap::new(),
            observers: Vec::new(),
            last_snapshot: None,
            background_dim: true,
        }
    }

    /// Enable or disable background dimming under open dialogs
    pub fn set_background_dim(&mut self, enabled: bool) {
        self.background_dim = enabled;
    }

    pub fn add_observer(&mut self, observer: Box<dyn MountObserver>) {
        self.observers.push(observer);
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&MountedDialog> {
        self.instances.get(key)
    }

    /// Mounted dialogs in z-order, bottom first
    pub fn iter(&self) -> impl Iterator<Item = (&DialogKey, &MountedDialog)> {
        self.instances.iter()
    }

    pub fn open_count(&self) -> usize {
        self.instances.values().filter(|mounted| mounted.is_open()).count()
    }

    /// Topmost open dialog, if any
    pub fn topmost_open(&self) -> Option<&DialogKey> {
        self.instances
            .iter()
            .rev()
            .find(|(_, mounted)| mounted.is_open())
            .map(|(key, _)| key)
    }

    /// Bring the mounted instances in line with `snapshot`.
    ///
    /// Snapshots are compared by identity, not version: two snapshots with
    /// the same version may come from different registries or branches.
    pub fn reconcile(&mut self, snapshot: &Arc<RegistrySnapshot>) -> Reconciliation {
        if self
            .last_snapshot
            .as_ref()
            .is_some_and(|last| Arc::ptr_eq(last, snapshot))
        {
            return Reconciliation {
                unchanged: self.instances.len(),
                ..Reconciliation::default()
            };
        }

        let mut previous = std::mem::take(&mut self.instances);
        let mut report = Reconciliation::default();

        for (key, entry) in snapshot.iter() {
            let mounted = match previous.shift_remove(key) {
                Some(existing) if Arc::ptr_eq(&existing.entry, entry) => {
                    report.unchanged += 1;
                    existing
                }
                Some(existing) => {
                    let mounted = instantiate(key, entry, existing.generation + 1);
                    for observer in &mut self.observers {
                        observer.on_updated(key, &mounted.props);
                    }
                    report.updated.push(key.clone());
                    mounted
                }
                None => {
                    let mounted = instantiate(key, entry, 1);
                    for observer in &mut self.observers {
                        observer.on_mounted(key, &mounted.props);
                    }
                    report.mounted.push(key.clone());
                    mounted
                }
            };
            self.instances.insert(key.clone(), mounted);
        }

        for key in previous.into_keys() {
            for observer in &mut self.observers {
                observer.on_unmounted(&key);
            }
            report.unmounted.push(key);
        }

        self.last_snapshot = Some(Arc::clone(snapshot));
        if !report.is_noop() {
            debug!(
                version = snapshot.version(),
                mounted = report.mounted.len(),
                updated = report.updated.len(),
                unmounted = report.unmounted.len(),
                unchanged = report.unchanged,
                "Reconciled dialog mount point"
            );
        }
        report
    }

    /// Render all mounted dialogs over `area`
    pub fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let topmost = self.topmost_open().cloned();

        if self.background_dim && topmost.is_some() {
            self.render_modal_background(frame, area, theme);
        }

        for (key, mounted) in self.instances.iter_mut() {
            let is_open = mounted.entry.is_open();
            let Some(instance) = mounted.instance.as_mut() else {
                continue;
            };

            if !is_open {
                instance.render_closed(frame, area, theme);
                continue;
            }

            let dialog_frame = instance.frame();
            let layout = DialogLayout::calculate(&dialog_frame, area);
            frame.render_widget(Clear, layout.dialog_area);

            // Render dialog chrome (border, title)
            let mut block = Block::default().style(theme.base_style());
            if dialog_frame.has_border {
                let border_style = if topmost.as_ref() == Some(key) {
                    theme.focused_border_style()
                } else {
                    theme.border_style()
                };
                block = block.borders(Borders::ALL).border_style(border_style);
            }
            if let Some(title) = dialog_frame.title {
                block = block.title(format!(" {} ", title));
            }
            frame.render_widget(block, layout.dialog_area);

            // Render dialog content
            instance.render(frame, layout.content_area, theme);
        }
    }

    /// Dim whatever is already drawn under the dialogs
    fn render_modal_background(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let dim_block = Block::default().style(theme.dim_style());
        frame.render_widget(dim_block, area);
    }
}

impl Default for MountPoint {
    fn default() -> Self {
        Self::new()
    }
}

fn instantiate(key: &DialogKey, entry: &Arc<DialogEntry>, generation: u64) -> MountedDialog {
    let props = entry.instance_props();
    let instance = match entry.implementation().instantiate(key, &props) {
        Ok(instance) => Some(instance),
        Err(e) if entry.is_open() => {
            warn!(key = %key, implementation = entry.implementation().name(), "Dialog could not be instantiated: {}", e);
            None
        }
        Err(e) => {
            debug!(key = %key, "Closed dialog could not be instantiated yet: {}", e);
            None
        }
    };

    MountedDialog {
        entry: Arc::clone(entry),
        props,
        instance,
        generation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialog::{
        component::{typed, TypedDialog},
        layout::{DialogFrame, DialogSize},
        registry::{DialogRegistry, RegistryOp},
        types::IS_OPEN_FIELD,
    };
    use ratatui::{backend::TestBackend, widgets::Paragraph, Terminal};
    use serde::Deserialize;
    use serde_json::{json, Value};
    use std::sync::Mutex;

    #[derive(Debug, Deserialize)]
    struct LabelProps {
        #[serde(default)]
        is_open: bool,
        label: String,
    }

    struct LabelDialog;

    impl TypedDialog for LabelDialog {
        type Props = LabelProps;

        fn frame(&self, props: &LabelProps) -> DialogFrame {
            DialogFrame::new()
                .with_title(format!("open={}", props.is_open))
                .with_size(DialogSize::Fixed(20, 3))
        }

        fn render(&self, props: &LabelProps, frame: &mut Frame, area: Rect, _theme: &Theme) {
            frame.render_widget(Paragraph::new(props.label.clone()), area);
        }
    }

    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<String>>>);

    impl MountObserver for Recorder {
        fn on_mounted(&mut self, key: &DialogKey, _props: &Props) {
            self.0.lock().unwrap().push(format!("mounted {key}"));
        }

        fn on_updated(&mut self, key: &DialogKey, _props: &Props) {
            self.0.lock().unwrap().push(format!("updated {key}"));
        }

        fn on_unmounted(&mut self, key: &DialogKey) {
            self.0.lock().unwrap().push(format!("unmounted {key}"));
        }
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        format!("{:?}", terminal.backend().buffer())
    }

    #[test]
    fn test_confirm_delete_scenario() {
        let mut registry = DialogRegistry::new();
        let mut mount = MountPoint::new();
        let controller = registry.controller();

        controller.add("confirm-delete", typed(LabelDialog));
        controller.update_props("confirm-delete", json!({"item_name": "router1", "label": "x"}));
        controller.open("confirm-delete");
        registry.flush();
        mount.reconcile(&registry.snapshot());

        assert_eq!(mount.len(), 1);
        let mounted = mount.get("confirm-delete").unwrap();
        assert_eq!(mounted.props().get("item_name"), Some(&json!("router1")));
        assert_eq!(mounted.props().get(IS_OPEN_FIELD), Some(&Value::Bool(true)));

        controller.close("confirm-delete");
        registry.flush();
        let report = mount.reconcile(&registry.snapshot());

        assert_eq!(report.updated, vec![DialogKey::from("confirm-delete")]);
        assert!(report.unmounted.is_empty());
        let mounted = mount.get("confirm-delete").unwrap();
        assert_eq!(mounted.props().get("item_name"), Some(&json!("router1")));
        assert_eq!(mounted.props().get(IS_OPEN_FIELD), Some(&Value::Bool(false)));
        assert_eq!(mounted.generation(), 2);
    }

    #[test]
    fn test_remove_unmounts_only_that_key() {
        let mut registry = DialogRegistry::new();
        let mut mount = MountPoint::new();
        let controller = registry.controller();

        controller.add("a", typed(LabelDialog));
        controller.add("b", typed(LabelDialog));
        registry.flush();
        mount.reconcile(&registry.snapshot());

        controller.remove("a");
        registry.flush();
        let report = mount.reconcile(&registry.snapshot());

        assert_eq!(report.unmounted, vec![DialogKey::from("a")]);
        assert_eq!(report.unchanged, 1);
        assert_eq!(mount.len(), 1);
        assert!(mount.get("b").is_some());
    }

    #[test]
    fn test_unchanged_entries_are_not_reinstantiated() {
        let mut registry = DialogRegistry::new();
        let mut mount = MountPoint::new();
        let recorder = Recorder::default();
        mount.add_observer(Box::new(recorder.clone()));
        let controller = registry.controller();

        controller.add("a", typed(LabelDialog));
        controller.add("b", typed(LabelDialog));
        registry.flush();
        mount.reconcile(&registry.snapshot());

        controller.update_props("a", json!({"label": "hello"}));
        registry.flush();
        let report = mount.reconcile(&registry.snapshot());

        assert_eq!(report.updated, vec![DialogKey::from("a")]);
        assert_eq!(report.unchanged, 1);
        assert_eq!(mount.get("b").unwrap().generation(), 1);

        // Same snapshot again: nothing to do
        let again = mount.reconcile(&registry.snapshot());
        assert!(again.is_noop());
        assert_eq!(again.unchanged, 2);

        assert_eq!(
            *recorder.0.lock().unwrap(),
            vec!["mounted a", "mounted b", "updated a"]
        );
    }

    #[test]
    fn test_undecodable_closed_dialog_stays_mounted() {
        let mut registry = DialogRegistry::new();
        let mut mount = MountPoint::new();
        let controller = registry.controller();

        // LabelProps.label is required and missing
        controller.add("a", typed(LabelDialog));
        registry.flush();
        mount.reconcile(&registry.snapshot());

        let mounted = mount.get("a").unwrap();
        assert!(!mounted.is_instantiated());
        assert!(!mounted.is_open());
        assert_eq!(mount.open_count(), 0);
    }

    #[test]
    fn test_sibling_snapshots_with_same_version_both_reconcile() {
        let mut mount = MountPoint::new();
        let base = RegistrySnapshot::new();
        let with_a = Arc::new(base.apply(RegistryOp::Add {
            key: DialogKey::from("a"),
            implementation: typed(LabelDialog),
        }));
        let with_b = Arc::new(base.apply(RegistryOp::Add {
            key: DialogKey::from("b"),
            implementation: typed(LabelDialog),
        }));
        assert_eq!(with_a.version(), with_b.version());

        mount.reconcile(&with_a);
        let report = mount.reconcile(&with_b);

        assert_eq!(report.mounted, vec![DialogKey::from("b")]);
        assert_eq!(report.unmounted, vec![DialogKey::from("a")]);
        assert!(mount.get("a").is_none());
        assert!(mount.get("b").is_some());
    }

    #[test]
    fn test_switching_registries_reconciles_new_entries() {
        let mut first = DialogRegistry::new();
        let mut second = DialogRegistry::new();
        first.controller().add("x", typed(LabelDialog));
        second.controller().add("y", typed(LabelDialog));
        first.flush();
        second.flush();
        assert_eq!(first.snapshot().version(), second.snapshot().version());

        let mut mount = MountPoint::new();
        mount.reconcile(&first.snapshot());
        mount.reconcile(&second.snapshot());

        assert!(mount.get("x").is_none());
        assert!(mount.get("y").is_some());
    }

    #[test]
    fn test_renders_open_dialogs_only() {
        let mut registry = DialogRegistry::new();
        let mut mount = MountPoint::new();
        let controller = registry.controller();

        controller.add("a", typed(LabelDialog));
        controller.add("b", typed(LabelDialog));
        controller.update_props("a", json!({"label": "first"}));
        controller.update_props("b", json!({"label": "second"}));
        controller.open("b");
        registry.flush();
        mount.reconcile(&registry.snapshot());

        let mut terminal = Terminal::new(TestBackend::new(40, 10)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.size();
                mount.render(frame, area, &Theme::dark());
            })
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("second"));
        assert!(text.contains("open=true"));
        assert!(!text.contains("first"));
        assert_eq!(mount.topmost_open(), Some(&DialogKey::from("b")));
    }

    #[test]
    fn test_both_open_dialogs_are_drawn_in_order() {
        let mut registry = DialogRegistry::new();
        let mut mount = MountPoint::new();
        mount.set_background_dim(false);
        let controller = registry.controller();

        controller.add("a", typed(LabelDialog));
        controller.add("b", typed(LabelDialog));
        controller.update_props("a", json!({"label": "first"}));
        controller.update_props("b", json!({"label": "second"}));
        controller.open("a");
        controller.open("b");
        registry.flush();
        mount.reconcile(&registry.snapshot());

        assert_eq!(mount.open_count(), 2);
        assert_eq!(mount.topmost_open(), Some(&DialogKey::from("b")));

        let mut terminal = Terminal::new(TestBackend::new(40, 10)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.size();
                mount.render(frame, area, &Theme::dark());
            })
            .unwrap();

        // Same geometry: the later key is drawn on top
        let text = buffer_text(&terminal);
        assert!(text.contains("second"));
        assert!(!text.contains("first"));
    }
}
