//! Headless rendering of the confirm-delete walkthrough
//!
//! Registers a confirmation dialog, parameterizes it, opens it and renders
//! the result into an in-memory terminal, without touching the real one.

use crate::config::HostConfig;
use crate::dialog::{dialog_keys, typed, DialogHost};
use crate::tui::dialogs::{ConfirmDialog, ConfirmProps};
use anyhow::Result;
use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};
use serde_json::json;
use tracing::debug;

/// Render the walkthrough at `width` x `height`.
///
/// With `close` set the dialog is closed again before rendering, which
/// leaves it mounted but invisible.
pub fn render_confirm_delete(
    config: &HostConfig,
    item_name: &str,
    width: u16,
    height: u16,
    close: bool,
) -> Result<Vec<String>> {
    let mut host = DialogHost::with_config(config);
    let confirm = host.controller().dialog::<ConfirmProps>(dialog_keys::CONFIRM_DELETE);

    confirm.register(typed(ConfirmDialog::new()));
    confirm.set_props(json!({
        "item_name": item_name,
        "title": "Confirm deletion",
        "message": "Delete this item?",
    }));
    confirm.open();
    let report = host.sync();
    debug!(?report, "Opened confirm-delete");

    if close {
        confirm.close();
        let report = host.sync();
        debug!(?report, "Closed confirm-delete");
    }

    let theme = config.theme();
    let mut terminal = Terminal::new(TestBackend::new(width, height))?;
    terminal.draw(|frame| {
        let area = frame.size();
        host.render(frame, area, &theme);
    })?;

    Ok(buffer_lines(terminal.backend().buffer()))
}

fn buffer_lines(buffer: &Buffer) -> Vec<String> {
    let width = usize::from(buffer.area.width.max(1));
    buffer
        .content
        .chunks(width)
        .map(|row| {
            let line: String = row.iter().map(|cell| cell.symbol()).collect();
            line.trim_end().to_string()
        })
        .collect()
}
