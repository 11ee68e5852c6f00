use ratatui::style::{Color, Modifier, Style};

/// Colors used by the dialog host and the demo screen
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub name: &'static str,

    /// Primary colors
    pub primary: Color,
    pub accent: Color,

    /// Text colors
    pub text: Color,
    pub text_dim: Color,
    pub text_bright: Color,

    /// Background colors
    pub background: Color,
    pub background_alt: Color,

    /// Border colors
    pub border: Color,
    pub border_focused: Color,

    pub error: Color,

    pub placeholder: Color,
    pub selection: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Theme names accepted by `by_name`
    pub const NAMES: [&'static str; 2] = ["dark", "light"];

    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "dark" => Some(Self::dark()),
            "light" => Some(Self::light()),
            _ => None,
        }
    }

    pub fn dark() -> Self {
        Self {
            name: "dark",
            primary: Color::Rgb(147, 51, 234),    // Purple
            accent: Color::Rgb(236, 72, 153),     // Pink

            text: Color::Rgb(248, 250, 252),      // Slate-50
            text_dim: Color::Rgb(148, 163, 184),  // Slate-400
            text_bright: Color::Rgb(255, 255, 255),

            background: Color::Rgb(15, 23, 42),   // Slate-900
            background_alt: Color::Rgb(30, 41, 59), // Slate-800

            border: Color::Rgb(71, 85, 105),      // Slate-600
            border_focused: Color::Rgb(147, 51, 234),

            error: Color::Rgb(239, 68, 68),       // Red-500

            placeholder: Color::Rgb(100, 116, 139), // Slate-500
            selection: Color::Rgb(30, 58, 138),   // Blue-900
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light",
            primary: Color::Rgb(109, 40, 217),    // Violet-700
            accent: Color::Rgb(219, 39, 119),     // Pink-600

            text: Color::Rgb(15, 23, 42),
            text_dim: Color::Rgb(71, 85, 105),
            text_bright: Color::Rgb(0, 0, 0),

            background: Color::Rgb(248, 250, 252),
            background_alt: Color::Rgb(226, 232, 240), // Slate-200

            border: Color::Rgb(148, 163, 184),
            border_focused: Color::Rgb(109, 40, 217),

            error: Color::Rgb(220, 38, 38),

            placeholder: Color::Rgb(100, 116, 139),
            selection: Color::Rgb(191, 219, 254), // Blue-200
        }
    }

    pub fn base_style(&self) -> Style {
        Style::default().fg(self.text).bg(self.background)
    }

    pub fn text_style(&self) -> Style {
        Style::default().fg(self.text)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn focused_border_style(&self) -> Style {
        Style::default()
            .fg(self.border_focused)
            .add_modifier(Modifier::BOLD)
    }

    pub fn selection_style(&self) -> Style {
        Style::default()
            .bg(self.selection)
            .fg(self.text_bright)
            .add_modifier(Modifier::BOLD)
    }

    pub fn status_bar_style(&self) -> Style {
        Style::default().fg(self.text).bg(self.background_alt)
    }

    pub fn placeholder_style(&self) -> Style {
        Style::default()
            .fg(self.placeholder)
            .add_modifier(Modifier::ITALIC)
    }

    /// Style laid over the screen below open dialogs
    pub fn dim_style(&self) -> Style {
        Style::default().fg(self.text_dim).add_modifier(Modifier::DIM)
    }
}
