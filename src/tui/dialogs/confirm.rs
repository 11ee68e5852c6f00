//! Confirmation dialog
//!
//! Asks the user to confirm a destructive action on a named item. The
//! selected button lives in the props, so whoever owns the dialog key
//! drives the selection through `update_props`.

use crate::dialog::{DialogFrame, DialogPosition, DialogSize, TypedDialog};
use crate::tui::{theme::Theme, Frame};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use serde::{Deserialize, Serialize};

const WIDTH: u16 = 46;

/// Props for [`ConfirmDialog`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfirmProps {
    pub is_open: bool,
    pub title: String,
    pub message: String,
    pub item_name: String,
    pub confirm_label: String,
    pub cancel_label: String,
    /// Whether the confirm button is selected (cancel otherwise)
    pub confirm_selected: bool,
}

impl Default for ConfirmProps {
    fn default() -> Self {
        Self {
            is_open: false,
            title: "Confirm".to_string(),
            message: "Are you sure?".to_string(),
            item_name: String::new(),
            confirm_label: "Yes".to_string(),
            cancel_label: "No".to_string(),
            confirm_selected: false,
        }
    }
}

/// Yes/No confirmation over a named item
#[derive(Debug, Default)]
pub struct ConfirmDialog;

impl ConfirmDialog {
    pub fn new() -> Self {
        Self
    }

    fn message_lines(props: &ConfirmProps, width: u16) -> Vec<String> {
        textwrap::wrap(&props.message, usize::from(width.max(1)))
            .into_iter()
            .map(|line| line.into_owned())
            .collect()
    }

    fn render_buttons(&self, props: &ConfirmProps, frame: &mut Frame, area: Rect, theme: &Theme) {
        let button_layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        let selected = theme.selection_style();
        let idle = Style::default().fg(theme.text).bg(theme.background_alt);

        let (confirm_style, cancel_style) = if props.confirm_selected {
            (selected, idle)
        } else {
            (idle, selected)
        };

        let confirm_button = Paragraph::new(format!(" {} ", props.confirm_label))
            .style(confirm_style)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(confirm_button, button_layout[0]);

        let cancel_button = Paragraph::new(format!(" {} ", props.cancel_label))
            .style(cancel_style)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(cancel_button, button_layout[1]);
    }
}

impl TypedDialog for ConfirmDialog {
    type Props = ConfirmProps;

    fn frame(&self, props: &ConfirmProps) -> DialogFrame {
        let inner_width = WIDTH - 2;
        let message_height = Self::message_lines(props, inner_width).len() as u16;
        let item_height = u16::from(!props.item_name.is_empty());

        DialogFrame::new()
            .with_title(props.title.clone())
            .with_position(DialogPosition::Center)
            .with_size(DialogSize::FitContent {
                min_width: WIDTH,
                min_height: 7,
            })
            .with_content_size(inner_width, message_height + item_height + 3)
    }

    fn render(&self, props: &ConfirmProps, frame: &mut Frame, content_area: Rect, theme: &Theme) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),    // Message area
                Constraint::Length(3), // Button area
            ])
            .split(content_area);

        let mut lines: Vec<Line> = Self::message_lines(props, content_area.width)
            .into_iter()
            .map(Line::from)
            .collect();
        if !props.item_name.is_empty() {
            lines.push(Line::from(Span::styled(
                props.item_name.clone(),
                Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
            )));
        }

        let message = Paragraph::new(lines)
            .style(theme.text_style())
            .alignment(Alignment::Center);
        frame.render_widget(message, chunks[0]);

        self.render_buttons(props, frame, chunks[1], theme);
    }
}
