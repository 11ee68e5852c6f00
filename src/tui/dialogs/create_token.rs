//! "Create API token" form dialog
//!
//! A controlled form: the text, level and focused field all come from the
//! props, and the screen that owns the dialog updates them as keys arrive.

use crate::dialog::{DialogFrame, DialogSize, TypedDialog};
use crate::tui::{theme::Theme, tokens::ApiTokenLevel, Frame};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthStr;

/// Form field with keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreateTokenField {
    #[default]
    Description,
    Level,
}

impl CreateTokenField {
    pub fn toggle(self) -> Self {
        match self {
            Self::Description => Self::Level,
            Self::Level => Self::Description,
        }
    }
}

/// Props for [`CreateTokenDialog`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateTokenProps {
    pub is_open: bool,
    pub description: String,
    pub level: ApiTokenLevel,
    pub focus: CreateTokenField,
    pub error: Option<String>,
}

#[derive(Debug, Default)]
pub struct CreateTokenDialog;

impl CreateTokenDialog {
    pub fn new() -> Self {
        Self
    }

    fn field_block<'a>(title: &'a str, focused: bool, theme: &Theme) -> Block<'a> {
        let border_style = if focused {
            theme.focused_border_style()
        } else {
            theme.border_style()
        };
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(title)
    }
}

impl TypedDialog for CreateTokenDialog {
    type Props = CreateTokenProps;

    fn frame(&self, _props: &CreateTokenProps) -> DialogFrame {
        DialogFrame::new()
            .with_title("Create API token")
            .with_size(DialogSize::Fixed(60, 12))
    }

    fn render(&self, props: &CreateTokenProps, frame: &mut Frame, content_area: Rect, theme: &Theme) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Description input
                Constraint::Length(3), // Level selector
                Constraint::Length(1), // Error line
                Constraint::Min(1),    // Help
            ])
            .split(content_area);

        let description_focused = props.focus == CreateTokenField::Description;
        let description = if props.description.is_empty() {
            Paragraph::new(Span::styled("Token description", theme.placeholder_style()))
        } else {
            Paragraph::new(props.description.clone()).style(theme.text_style())
        };
        frame.render_widget(
            description.block(Self::field_block("Description", description_focused, theme)),
            chunks[0],
        );

        if description_focused && props.is_open {
            let inner_width = chunks[0].width.saturating_sub(2);
            let text_width = u16::try_from(props.description.width()).unwrap_or(u16::MAX);
            frame.set_cursor(chunks[0].x + 1 + text_width.min(inner_width), chunks[0].y + 1);
        }

        let level = Paragraph::new(Line::from(vec![
            Span::styled("< ", theme.border_style()),
            Span::styled(
                props.level.label(),
                Style::default().fg(theme.primary).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" >", theme.border_style()),
        ]));
        frame.render_widget(
            level.block(Self::field_block(
                "Permission level",
                props.focus == CreateTokenField::Level,
                theme,
            )),
            chunks[1],
        );

        if let Some(error) = &props.error {
            frame.render_widget(
                Paragraph::new(Span::styled(error.clone(), Style::default().fg(theme.error))),
                chunks[2],
            );
        }

        let help = Paragraph::new("Tab: next field • ←/→: level • Enter: create • Esc: cancel")
            .style(Style::default().fg(theme.text_dim).add_modifier(Modifier::DIM));
        frame.render_widget(help, chunks[3]);
    }
}
