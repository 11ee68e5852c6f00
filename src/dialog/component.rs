//! Dialog implementation contract
//!
//! A `DialogComponent` is what gets registered: a factory the mount point
//! calls with the entry's current props to obtain a `DialogInstance`.
//! Most dialogs implement the typed `TypedDialog` trait instead and are
//! registered through [`typed`], which handles the props decoding.

use super::{
    layout::DialogFrame,
    types::{from_props, DialogKey, DialogResult, Props},
};
use crate::tui::{theme::Theme, Frame};
use ratatui::layout::Rect;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Registered dialog implementation (type-erased)
pub trait DialogComponent: Send + Sync {
    /// Human-readable name used in logs
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Build an instance for the given props.
    ///
    /// `props` always contains the reserved `is_open` field.
    fn instantiate(&self, key: &DialogKey, props: &Props) -> DialogResult<Box<dyn DialogInstance>>;
}

/// One live instantiation of a dialog, owned by the mount point
pub trait DialogInstance: Send {
    /// Frame requested for the current props
    fn frame(&self) -> DialogFrame {
        DialogFrame::default()
    }

    /// Render dialog content (without border/chrome)
    fn render(&mut self, frame: &mut Frame, content_area: Rect, theme: &Theme);

    /// Called instead of `render` while the dialog is mounted but closed
    fn render_closed(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let _ = (frame, area, theme);
    }
}

/// Statically typed dialog.
///
/// `Props` must carry the reserved `is_open: bool` field; mark the other
/// fields `#[serde(default)]` so a freshly registered dialog (no props yet)
/// still decodes.
pub trait TypedDialog: Send + Sync + 'static {
    type Props: DeserializeOwned + Send + 'static;

    fn frame(&self, props: &Self::Props) -> DialogFrame {
        let _ = props;
        DialogFrame::default()
    }

    fn render(&self, props: &Self::Props, frame: &mut Frame, content_area: Rect, theme: &Theme);
}

/// Adapter registering a `TypedDialog` as a `DialogComponent`
pub struct Typed<D> {
    dialog: Arc<D>,
}

impl<D: TypedDialog> Typed<D> {
    pub fn new(dialog: D) -> Self {
        Self {
            dialog: Arc::new(dialog),
        }
    }
}

impl<D: TypedDialog> DialogComponent for Typed<D> {
    fn name(&self) -> &'static str {
        std::any::type_name::<D>()
    }

    fn instantiate(&self, key: &DialogKey, props: &Props) -> DialogResult<Box<dyn DialogInstance>> {
        let props = from_props::<D::Props>(key, props)?;
        Ok(Box::new(TypedInstance {
            dialog: Arc::clone(&self.dialog),
            props,
        }))
    }
}

struct TypedInstance<D: TypedDialog> {
    dialog: Arc<D>,
    props: D::Props,
}

impl<D: TypedDialog> DialogInstance for TypedInstance<D> {
    fn frame(&self) -> DialogFrame {
        self.dialog.frame(&self.props)
    }

    fn render(&mut self, frame: &mut Frame, content_area: Rect, theme: &Theme) {
        self.dialog.render(&self.props, frame, content_area, theme);
    }
}

/// Wrap a typed dialog into the shared handle `add` expects.
pub fn typed<D: TypedDialog>(dialog: D) -> Arc<dyn DialogComponent> {
    Arc::new(Typed::new(dialog))
}

/// Whether two registered implementations are the same object.
pub(crate) fn same_component(a: &Arc<dyn DialogComponent>, b: &Arc<dyn DialogComponent>) -> bool {
    std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
}
