//! Registry entries
//!
//! Entries are immutable values. Every transition builds a new entry so the
//! registry can swap the `Arc` and leave untouched entries pointer-equal.

use super::{
    component::DialogComponent,
    types::{merge_props, Props, IS_OPEN_FIELD},
};
use serde_json::Value;
use std::sync::Arc;

/// Stored record for one dialog key
#[derive(Clone)]
pub struct DialogEntry {
    implementation: Arc<dyn DialogComponent>,
    props: Option<Props>,
    is_open: bool,
}

impl DialogEntry {
    /// Fresh entry: no props yet, closed
    pub fn new(implementation: Arc<dyn DialogComponent>) -> Self {
        Self {
            implementation,
            props: None,
            is_open: false,
        }
    }

    pub fn implementation(&self) -> &Arc<dyn DialogComponent> {
        &self.implementation
    }

    pub fn props(&self) -> Option<&Props> {
        self.props.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Props handed to the implementation: stored props with the
    /// registry-level `is_open` laid on top.
    pub fn instance_props(&self) -> Props {
        let mut props = self.props.clone().unwrap_or_default();
        props.insert(IS_OPEN_FIELD.to_string(), Value::Bool(self.is_open));
        props
    }

    pub(crate) fn with_implementation(&self, implementation: Arc<dyn DialogComponent>) -> Self {
        Self {
            implementation,
            ..self.clone()
        }
    }

    pub(crate) fn patched(&self, patch: EntryPatch) -> Self {
        let EntryPatch {
            implementation,
            props,
            is_open,
        } = patch;

        Self {
            implementation: implementation.unwrap_or_else(|| Arc::clone(&self.implementation)),
            props: props.unwrap_or_else(|| self.props.clone()),
            is_open: is_open.unwrap_or(self.is_open),
        }
    }

    pub(crate) fn with_merged_props(&self, partial: Props) -> Self {
        let mut props = self.props.clone().unwrap_or_default();
        merge_props(&mut props, partial);

        Self {
            props: Some(props),
            ..self.clone()
        }
    }
}

impl std::fmt::Debug for DialogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogEntry")
            .field("implementation", &self.implementation.name())
            .field("props", &self.props)
            .field("is_open", &self.is_open)
            .finish()
    }
}

/// Partial entry for `update`; unset fields keep their current value
#[derive(Clone, Default)]
pub struct EntryPatch {
    pub implementation: Option<Arc<dyn DialogComponent>>,
    /// `Some(None)` resets the entry to "no props yet"
    pub props: Option<Option<Props>>,
    pub is_open: Option<bool>,
}

impl EntryPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Patch that only changes visibility
    pub fn visibility(is_open: bool) -> Self {
        Self::new().open(is_open)
    }

    pub fn open(mut self, is_open: bool) -> Self {
        self.is_open = Some(is_open);
        self
    }

    pub fn props(mut self, props: Props) -> Self {
        self.props = Some(Some(props));
        self
    }

    pub fn clear_props(mut self) -> Self {
        self.props = Some(None);
        self
    }

    pub fn implementation(mut self, implementation: Arc<dyn DialogComponent>) -> Self {
        self.implementation = Some(implementation);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.implementation.is_none() && self.props.is_none() && self.is_open.is_none()
    }
}

impl std::fmt::Debug for EntryPatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntryPatch")
            .field("implementation", &self.implementation.as_ref().map(|i| i.name()))
            .field("props", &self.props)
            .field("is_open", &self.is_open)
            .finish()
    }
}
