//! API token screen
//!
//! Lists in-memory API tokens and drives two dialogs through the registry:
//! a "create token" form and a "remove token" confirmation. Both are
//! registered once when the screen is built; opening one only merges props
//! and flips its visibility.

use crate::config::HostConfig;
use crate::dialog::{dialog_keys, typed, DialogHandle, DialogHost};
use crate::tui::{
    dialogs::{ConfirmDialog, ConfirmProps, CreateTokenDialog, CreateTokenField, CreateTokenProps},
    events::Event,
    theme::Theme,
    tokens::{ApiToken, TokenStore},
    Frame,
};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

/// Main application state and controller
pub struct App {
    /// Whether the application should quit
    pub should_quit: bool,

    tokens: TokenStore,
    host: DialogHost,
    create_token: DialogHandle<CreateTokenProps>,
    remove_token: DialogHandle<ConfirmProps>,

    /// Form state owned by the screen, mirrored into the dialog props
    form: CreateTokenProps,
    confirm_selected: bool,
    pending_removal: Option<Uuid>,

    status_message: Option<String>,
    theme: Theme,
}

impl App {
    pub fn new(config: &HostConfig) -> Self {
        Self::with_tokens(config, TokenStore::with_samples())
    }

    pub fn with_tokens(config: &HostConfig, tokens: TokenStore) -> Self {
        let mut host = DialogHost::with_config(config);
        let controller = host.controller();

        let create_token = controller.dialog::<CreateTokenProps>(dialog_keys::CREATE_TOKEN);
        create_token.register(typed(CreateTokenDialog::new()));

        let remove_token = controller.dialog::<ConfirmProps>(dialog_keys::REMOVE_TOKEN);
        remove_token.register(typed(ConfirmDialog::new()));

        host.sync();

        Self {
            should_quit: false,
            tokens,
            host,
            create_token,
            remove_token,
            form: CreateTokenProps::default(),
            confirm_selected: false,
            pending_removal: None,
            status_message: None,
            theme: config.theme(),
        }
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub fn host(&self) -> &DialogHost {
        &self.host
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    /// Handle one event; returns true when the application should exit
    pub fn handle_event(&mut self, event: Event) -> Result<bool> {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(_) | Event::Resize(_, _) | Event::Tick => {}
        }

        self.host.sync();
        Ok(self.should_quit)
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.host.topmost_open().map(|key| key.as_str().to_owned()) {
            Some(open) if open == dialog_keys::CREATE_TOKEN => self.handle_create_key(key),
            Some(open) if open == dialog_keys::REMOVE_TOKEN => self.handle_remove_key(key),
            Some(open) => {
                if key.code == KeyCode::Esc {
                    self.host.controller().close(open.as_str());
                }
            }
            None => self.handle_list_key(key),
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) {
        self.status_message = None;

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => self.tokens.select_previous(),
            KeyCode::Down | KeyCode::Char('j') => self.tokens.select_next(),
            KeyCode::Char('n') => self.open_create_dialog(),
            KeyCode::Char('d') | KeyCode::Delete => self.open_remove_dialog(),
            _ => {}
        }
    }

    fn open_create_dialog(&mut self) {
        self.form = CreateTokenProps::default();
        self.create_token.open_with(&self.form);
    }

    fn open_remove_dialog(&mut self) {
        let Some(token) = self.tokens.selected() else {
            self.status_message = Some("There is no API token to remove".to_string());
            return;
        };

        self.pending_removal = Some(token.id);
        self.confirm_selected = false;
        self.remove_token.open_with(&ConfirmProps {
            title: "Remove API token".to_string(),
            message: "The following token will be revoked:".to_string(),
            item_name: token.description.clone(),
            confirm_label: "Remove".to_string(),
            cancel_label: "Cancel".to_string(),
            confirm_selected: false,
            ..ConfirmProps::default()
        });
    }

    fn handle_create_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.create_token.close();
                return;
            }
            KeyCode::Enter => {
                self.submit_create_form();
                return;
            }
            KeyCode::Tab | KeyCode::BackTab => self.form.focus = self.form.focus.toggle(),
            KeyCode::Left if self.form.focus == CreateTokenField::Level => {
                self.form.level = self.form.level.previous();
            }
            KeyCode::Right if self.form.focus == CreateTokenField::Level => {
                self.form.level = self.form.level.next();
            }
            KeyCode::Backspace if self.form.focus == CreateTokenField::Description => {
                self.form.description.pop();
            }
            KeyCode::Char(c) if self.form.focus == CreateTokenField::Description => {
                self.form.description.push(c);
                self.form.error = None;
            }
            _ => return,
        }

        self.create_token.set_props(&self.form);
    }

    fn submit_create_form(&mut self) {
        let description = self.form.description.trim();
        if description.is_empty() {
            self.form.error = Some("A description is required".to_string());
            self.create_token.set_props(json!({ "error": self.form.error }));
            return;
        }

        let token = ApiToken::new(description, self.form.level);
        info!(description = %token.description, level = ?token.level, "API token created");
        self.status_message = Some(format!("Token '{}' created", token.description));
        self.tokens.push(token);
        self.create_token.close();
    }

    fn handle_remove_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Left | KeyCode::Right | KeyCode::Tab => {
                self.confirm_selected = !self.confirm_selected;
                self.remove_token
                    .set_props(json!({ "confirm_selected": self.confirm_selected }));
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                if self.confirm_selected {
                    self.remove_pending();
                }
                self.remove_token.close();
            }
            KeyCode::Char('y') => {
                self.remove_pending();
                self.remove_token.close();
            }
            KeyCode::Esc | KeyCode::Char('n') => self.remove_token.close(),
            _ => {}
        }
    }

    fn remove_pending(&mut self) {
        let Some(id) = self.pending_removal.take() else {
            return;
        };
        if let Some(token) = self.tokens.remove(id) {
            debug!(id = %token.id, "API token removed");
            self.status_message = Some(format!("Token '{}' removed", token.description));
        }
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.size();
        frame.render_widget(Block::default().style(self.theme.base_style()), area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(3),    // Token list
                Constraint::Length(1), // Status bar
            ])
            .split(area);

        self.render_header(frame, chunks[0]);
        self.render_tokens(frame, chunks[1]);
        self.render_status_bar(frame, chunks[2]);

        self.host.render(frame, area, &self.theme);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let header = Paragraph::new(Line::from(Span::styled(
            "API tokens",
            Style::default().fg(self.theme.primary).add_modifier(Modifier::BOLD),
        )))
        .block(Block::default().borders(Borders::BOTTOM).border_style(self.theme.border_style()));
        frame.render_widget(header, area);
    }

    fn render_tokens(&self, frame: &mut Frame, area: Rect) {
        if self.tokens.is_empty() {
            let empty = Paragraph::new(vec![
                Line::from("There is no API token"),
                Line::from(Span::styled(
                    "Press n to create one",
                    self.theme.placeholder_style(),
                )),
            ]);
            frame.render_widget(empty, area);
            return;
        }

        let items: Vec<ListItem> = self
            .tokens
            .tokens()
            .iter()
            .map(|token| {
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{:<32}", token.description), self.theme.text_style()),
                    Span::styled(
                        format!("{:<34}", token.level.label()),
                        Style::default().fg(self.theme.text_dim),
                    ),
                    Span::styled(
                        token.created_at.format("%Y-%m-%d").to_string(),
                        Style::default().fg(self.theme.text_dim),
                    ),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::NONE))
            .highlight_style(self.theme.selection_style());
        let mut state = ListState::default();
        state.select(Some(self.tokens.selected_index()));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let text = match &self.status_message {
            Some(message) => message.clone(),
            None => "n: new token • d: remove • ↑/↓: select • q: quit".to_string(),
        };
        frame.render_widget(Paragraph::new(text).style(self.theme.status_bar_style()), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(app: &mut App, code: KeyCode) {
        app.handle_event(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
            .unwrap();
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_dialogs_registered_closed_at_startup() {
        let app = App::new(&HostConfig::default());
        let snapshot = app.host().snapshot();

        assert_eq!(snapshot.len(), 2);
        assert!(!snapshot.is_open(dialog_keys::CREATE_TOKEN));
        assert!(!snapshot.is_open(dialog_keys::REMOVE_TOKEN));
        assert_eq!(app.host().mount_point().len(), 2);
    }

    #[test]
    fn test_create_token_flow() {
        let mut app = App::with_tokens(&HostConfig::default(), TokenStore::new());

        press(&mut app, KeyCode::Char('n'));
        assert!(app.host().snapshot().is_open(dialog_keys::CREATE_TOKEN));

        type_text(&mut app, "nightly backup");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Right);

        let props = app
            .host()
            .snapshot()
            .props_as::<CreateTokenProps>(dialog_keys::CREATE_TOKEN)
            .unwrap()
            .unwrap();
        assert_eq!(props.description, "nightly backup");
        assert_eq!(props.focus, CreateTokenField::Level);

        press(&mut app, KeyCode::Enter);

        let snapshot = app.host().snapshot();
        assert!(!snapshot.is_open(dialog_keys::CREATE_TOKEN));
        assert!(snapshot.contains(dialog_keys::CREATE_TOKEN));
        assert_eq!(app.tokens().len(), 1);
        assert_eq!(app.tokens().tokens()[0].description, "nightly backup");
    }

    #[test]
    fn test_create_requires_description() {
        let mut app = App::with_tokens(&HostConfig::default(), TokenStore::new());

        press(&mut app, KeyCode::Char('n'));
        press(&mut app, KeyCode::Enter);

        let snapshot = app.host().snapshot();
        assert!(snapshot.is_open(dialog_keys::CREATE_TOKEN));
        let props = snapshot
            .props_as::<CreateTokenProps>(dialog_keys::CREATE_TOKEN)
            .unwrap()
            .unwrap();
        assert_eq!(props.error.as_deref(), Some("A description is required"));
        assert!(app.tokens().is_empty());
    }

    #[test]
    fn test_reopening_create_dialog_resets_form() {
        let mut app = App::with_tokens(&HostConfig::default(), TokenStore::new());

        press(&mut app, KeyCode::Char('n'));
        type_text(&mut app, "draft");
        press(&mut app, KeyCode::Esc);

        // Closing keeps the last props around
        let props = app
            .host()
            .snapshot()
            .props_as::<CreateTokenProps>(dialog_keys::CREATE_TOKEN)
            .unwrap()
            .unwrap();
        assert_eq!(props.description, "draft");

        press(&mut app, KeyCode::Char('n'));
        let props = app
            .host()
            .snapshot()
            .props_as::<CreateTokenProps>(dialog_keys::CREATE_TOKEN)
            .unwrap()
            .unwrap();
        assert!(props.description.is_empty());
    }

    #[test]
    fn test_remove_token_flow() {
        let mut app = App::new(&HostConfig::default());
        let first = app.tokens().tokens()[0].description.clone();

        press(&mut app, KeyCode::Char('d'));
        let snapshot = app.host().snapshot();
        assert!(snapshot.is_open(dialog_keys::REMOVE_TOKEN));
        let props = snapshot
            .props_as::<ConfirmProps>(dialog_keys::REMOVE_TOKEN)
            .unwrap()
            .unwrap();
        assert_eq!(props.item_name, first);

        // Enter on the default (cancel) button keeps the token
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.tokens().len(), 3);
        assert!(!app.host().snapshot().is_open(dialog_keys::REMOVE_TOKEN));

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.tokens().len(), 2);
        assert!(app.tokens().tokens().iter().all(|t| t.description != first));
        assert_eq!(app.status_message(), Some(format!("Token '{}' removed", first).as_str()));
    }

    #[test]
    fn test_status_message_clears_on_next_list_key() {
        let mut app = App::with_tokens(&HostConfig::default(), TokenStore::new());

        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.status_message(), Some("There is no API token to remove"));

        press(&mut app, KeyCode::Down);
        assert_eq!(app.status_message(), None);
    }

    #[test]
    fn test_quit_from_list_only() {
        let mut app = App::new(&HostConfig::default());
        press(&mut app, KeyCode::Char('n'));
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit);

        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
