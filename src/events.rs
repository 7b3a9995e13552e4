use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::{Position, Rect};
use tokio::time::Instant;

use crate::app::{App, EXPORT_FILE};
use crate::data::StatSlot;
use crate::router::Section;
use crate::ui::{common, dashboard, layout};

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // Any key skips the splash
    if app.splash_active(Instant::now()) {
        app.dismiss_splash();
        return;
    }

    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    if app.show_backdrop {
        match key.code {
            KeyCode::Esc | KeyCode::Char('b') => app.toggle_backdrop(),
            KeyCode::Char('q') => app.quit(),
            _ => {}
        }
        return;
    }

    // While the detail overlay is open the arrows flip between cards
    if app.detail.is_some() {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Backspace | KeyCode::Char('q') => {
                app.close_detail();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                app.select_prev();
                app.open_detail(app.selected_stat);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.select_next();
                app.open_detail(app.selected_stat);
            }
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),

        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.prev_section();
            } else {
                app.next_section();
            }
        }
        KeyCode::BackTab => app.prev_section(),

        KeyCode::Char(c @ '1'..='4') => {
            let index = c as usize - '1' as usize;
            if let Some(section) = Section::from_index(index) {
                app.navigate(section);
            }
        }

        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Left | KeyCode::Char('h') => app.prev_section(),
        KeyCode::Right | KeyCode::Char('l') => app.next_section(),

        KeyCode::Enter => app.open_detail(app.selected_stat),

        KeyCode::Char('r') => app.refresh_all(),
        KeyCode::Char('e') => export(app, Path::new(EXPORT_FILE)),
        KeyCode::Char('b') => app.toggle_backdrop(),
        KeyCode::Char('?') => app.toggle_help(),

        _ => {}
    }
}

fn export(app: &mut App, path: &Path) {
    match app.export(path) {
        Ok(()) => app.set_status_message(format!("Exported to {}", path.display())),
        Err(e) => app.set_status_message(format!("Export failed: {e:#}")),
    }
}

/// First table row on screen for sections with a selectable list.
///
/// Below the chrome sit a 3-row counter strip, the panel border and, for
/// tables, a header row.
fn first_item_row(section: Section, content: Rect) -> Option<u16> {
    let top = content.y + 3 + 1;
    match section {
        Section::Dashboard => None,
        Section::Threats | Section::Network => Some(top + 1),
        Section::Alerts => Some(top),
    }
}

/// Handle mouse events. `area` is the full terminal area.
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent, area: Rect) {
    if app.show_help || app.show_backdrop || app.detail.is_some() {
        if let MouseEventKind::Down(MouseButton::Right) = mouse.kind {
            app.show_help = false;
            app.close_detail();
        }
        return;
    }

    match mouse.kind {
        MouseEventKind::ScrollUp => app.select_prev(),
        MouseEventKind::ScrollDown => app.select_next(),

        MouseEventKind::Down(MouseButton::Left) => {
            let chrome = layout::Chrome::new(area);
            let position = Position::new(mouse.column, mouse.row);

            if chrome.tabs.contains(position) {
                if let Some(section) = common::tab_at(mouse.column - chrome.tabs.x) {
                    app.navigate(section);
                }
                return;
            }

            if !chrome.content.contains(position) {
                return;
            }

            if app.section() == Section::Dashboard {
                let cards = dashboard::Areas::new(chrome.content).cards;
                if let Some(index) = cards.iter().position(|card| card.contains(position)) {
                    app.selected_stat = StatSlot::ALL[index];
                    app.open_detail(app.selected_stat);
                }
                return;
            }

            if let Some(first) = first_item_row(app.section(), chrome.content) {
                if mouse.row >= first {
                    let index = usize::from(mouse.row - first);
                    if index < app.row_count() {
                        app.selected_row = index;
                    }
                }
            }
        }

        _ => {}
    }
}
