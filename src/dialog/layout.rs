//! Dialog frame geometry
//!
//! A dialog instance describes the frame it wants (`DialogFrame`); the
//! mount point turns that into concrete areas for the current terminal.

use ratatui::layout::Rect;

/// Dialog positioning options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogPosition {
    /// Center the dialog in the available area
    #[default]
    Center,
    /// Offset from the top-left corner of the available area (x, y)
    Fixed(u16, u16),
    /// Horizontally centered, at the top
    Top,
    /// Horizontally centered, at the bottom
    Bottom,
}

/// Dialog size options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogSize {
    /// Fixed size in cells (width, height), border included
    Fixed(u16, u16),
    /// Percentage of available area (width_pct, height_pct)
    Percentage(u16, u16),
    /// Fit the content size reported by the instance, never below the minimum
    FitContent { min_width: u16, min_height: u16 },
    /// Full screen
    FullScreen,
}

impl Default for DialogSize {
    fn default() -> Self {
        Self::FitContent {
            min_width: 40,
            min_height: 7,
        }
    }
}

/// What a dialog instance asks of the mount point for one render pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogFrame {
    pub title: Option<String>,
    pub size: DialogSize,
    pub position: DialogPosition,
    pub has_border: bool,
    /// Content size hint used by `DialogSize::FitContent`
    pub content_size: Option<(u16, u16)>,
}

impl Default for DialogFrame {
    fn default() -> Self {
        Self {
            title: None,
            size: DialogSize::default(),
            position: DialogPosition::default(),
            has_border: true,
            content_size: None,
        }
    }
}

impl DialogFrame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_size(mut self, size: DialogSize) -> Self {
        self.size = size;
        self
    }

    pub fn with_position(mut self, position: DialogPosition) -> Self {
        self.position = position;
        self
    }

    pub fn with_border(mut self, has_border: bool) -> Self {
        self.has_border = has_border;
        self
    }

    pub fn with_content_size(mut self, width: u16, height: u16) -> Self {
        self.content_size = Some((width, height));
        self
    }
}

/// Resolved areas for one dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogLayout {
    /// Dialog area (including border)
    pub dialog_area: Rect,
    /// Content area (excluding border)
    pub content_area: Rect,
}

impl DialogLayout {
    pub fn calculate(frame: &DialogFrame, available_area: Rect) -> Self {
        let (width, height) = Self::calculate_size(frame, available_area);
        let (x, y) = Self::calculate_position(frame.position, available_area, width, height);

        let dialog_area = Rect {
            x,
            y,
            width,
            height,
        };

        let content_area = if frame.has_border {
            Rect {
                x: dialog_area.x.saturating_add(1),
                y: dialog_area.y.saturating_add(1),
                width: dialog_area.width.saturating_sub(2),
                height: dialog_area.height.saturating_sub(2),
            }
        } else {
            dialog_area
        };

        Self {
            dialog_area,
            content_area,
        }
    }

    fn calculate_size(frame: &DialogFrame, available_area: Rect) -> (u16, u16) {
        let (width, height) = match frame.size {
            DialogSize::Fixed(w, h) => (w, h),
            DialogSize::Percentage(w_pct, h_pct) => {
                let width = (u32::from(available_area.width) * u32::from(w_pct.min(100)) / 100) as u16;
                let height = (u32::from(available_area.height) * u32::from(h_pct.min(100)) / 100) as u16;
                (width, height)
            }
            DialogSize::FitContent { min_width, min_height } => match frame.content_size {
                Some((content_w, content_h)) => {
                    let border = if frame.has_border { 2 } else { 0 };
                    (
                        content_w.saturating_add(border).max(min_width),
                        content_h.saturating_add(border).max(min_height),
                    )
                }
                None => (min_width, min_height),
            },
            DialogSize::FullScreen => (available_area.width, available_area.height),
        };

        (width.min(available_area.width), height.min(available_area.height))
    }

    fn calculate_position(
        position: DialogPosition,
        available_area: Rect,
        width: u16,
        height: u16,
    ) -> (u16, u16) {
        let centered_x = available_area.x + available_area.width.saturating_sub(width) / 2;
        let centered_y = available_area.y + available_area.height.saturating_sub(height) / 2;

        match position {
            DialogPosition::Center => (centered_x, centered_y),
            DialogPosition::Fixed(x, y) => (
                available_area.x + x.min(available_area.width.saturating_sub(width)),
                available_area.y + y.min(available_area.height.saturating_sub(height)),
            ),
            DialogPosition::Top => (centered_x, available_area.y),
            DialogPosition::Bottom => (
                centered_x,
                available_area.y + available_area.height.saturating_sub(height),
            ),
        }
    }
}
