//! Dialog host
//!
//! Bundles one registry with its mount point. A screen creates a host at
//! its root and hands `controller()` to whatever needs to open dialogs.

use super::{
    controller::RegistryController,
    mount::{MountObserver, MountPoint, Reconciliation},
    registry::{DialogRegistry, RegistrySnapshot},
    types::DialogKey,
};
use crate::config::HostConfig;
use crate::tui::{theme::Theme, Frame};
use ratatui::layout::Rect;
use std::sync::Arc;

/// Registry + mount point for one UI root
pub struct DialogHost {
    registry: DialogRegistry,
    mount: MountPoint,
}

impl DialogHost {
    pub fn new() -> Self {
        Self {
            registry: DialogRegistry::new(),
            mount: MountPoint::new(),
        }
    }

    pub fn with_config(config: &HostConfig) -> Self {
        let mut host = Self::new();
        host.mount.set_background_dim(config.dim_background);
        host
    }

    /// Capability for consumers
    pub fn controller(&self) -> RegistryController {
        self.registry.controller()
    }

    pub fn add_observer(&mut self, observer: Box<dyn MountObserver>) {
        self.mount.add_observer(observer);
    }

    /// Apply queued operations and reconcile the mount point.
    ///
    /// Call once per event-loop iteration, before rendering.
    pub fn sync(&mut self) -> Reconciliation {
        self.registry.flush();
        let snapshot = self.registry.snapshot();
        self.mount.reconcile(&snapshot)
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        self.mount.render(frame, area, theme);
    }

    pub fn snapshot(&self) -> Arc<RegistrySnapshot> {
        self.registry.snapshot()
    }

    pub fn mount_point(&self) -> &MountPoint {
        &self.mount
    }

    /// Topmost open dialog as of the last `sync`
    pub fn topmost_open(&self) -> Option<&DialogKey> {
        self.mount.topmost_open()
    }

    pub fn has_open_dialogs(&self) -> bool {
        self.mount.open_count() > 0
    }
}

impl Default for DialogHost {
    fn default() -> Self {
        Self::new()
    }
}
