use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use crate::app::{App, Focus};
use crate::tui::AppEvent;

/// Rows moved per mouse wheel notch over the message list.
const WHEEL_STEP: u32 = 3;

pub fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Paste(text) => {
            app.focus = Focus::Composer;
            app.composer.insert_str(&text);
        }
        // The next draw picks up the new size.
        AppEvent::Resize(_, _) => {}
    }
}

fn send(app: &mut App, trigger: &str) {
    if let Some(id) = app.submit_message() {
        tracing::debug!(id = id.0, trigger, "message sent");
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    // Global keys that work everywhere
    match key.code {
        KeyCode::Char('c') | KeyCode::Char('q') if ctrl => {
            app.should_quit = true;
            return;
        }
        KeyCode::Char('p') if ctrl => {
            app.toggle_roster();
            return;
        }
        KeyCode::PageUp => {
            app.page_up();
            return;
        }
        KeyCode::PageDown => {
            app.page_down();
            return;
        }
        KeyCode::Up if ctrl => {
            app.scroll_messages_up(1);
            return;
        }
        KeyCode::Down if ctrl => {
            app.scroll_messages_down(1);
            return;
        }
        _ => {}
    }

    // The open dropdown takes the keyboard until it closes
    if app.roster_open {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char(' ') => app.close_roster(),
            KeyCode::Down => app.roster_nav_down(),
            KeyCode::Up => app.roster_nav_up(),
            KeyCode::Tab => {
                app.close_roster();
                app.focus = app.focus.next();
            }
            KeyCode::BackTab => {
                app.close_roster();
                app.focus = app.focus.prev();
            }
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Tab => {
            app.focus = app.focus.next();
            return;
        }
        KeyCode::BackTab => {
            app.focus = app.focus.prev();
            return;
        }
        _ => {}
    }

    match app.focus {
        Focus::Composer => handle_composer_key(app, key),
        Focus::SendButton => {
            if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                send(app, "button");
            }
        }
        Focus::Participants => {
            if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Down) {
                app.open_roster();
            }
        }
    }
}

fn handle_composer_key(app: &mut App, key: KeyEvent) {
    match key.code {
        // Alt+Enter starts a new line instead of sending
        KeyCode::Enter if key.modifiers.contains(KeyModifiers::ALT) => {
            app.composer.insert_char('\n');
        }
        KeyCode::Enter => send(app, "enter"),
        KeyCode::Backspace => app.composer.backspace(),
        KeyCode::Delete => app.composer.delete(),
        KeyCode::Left => app.composer.move_left(),
        KeyCode::Right => app.composer.move_right(),
        KeyCode::Home => app.composer.move_home(),
        KeyCode::End => app.composer.move_end(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.composer.insert_char(c);
        }
        _ => {}
    }
}

/// Check if a point is within a rectangle
fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

fn hit(area: Option<Rect>, x: u16, y: u16) -> bool {
    area.map(|r| point_in_rect(x, y, r)).unwrap_or(false)
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let x = mouse.column;
    let y = mouse.row;

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if hit(app.roster_trigger_area, x, y) {
                app.focus = Focus::Participants;
                app.toggle_roster();
            } else if app.roster_open {
                // Clicks inside the panel do nothing; anywhere else dismisses it.
                if !hit(app.roster_panel_area, x, y) {
                    app.close_roster();
                }
            } else if hit(app.send_area, x, y) {
                app.focus = Focus::SendButton;
                send(app, "click");
            } else if hit(app.composer_area, x, y) {
                app.focus = Focus::Composer;
            }
        }
        // The dropdown panel floats over the list, so it gets the wheel first.
        MouseEventKind::ScrollDown if app.roster_open && hit(app.roster_panel_area, x, y) => {
            app.roster_nav_down();
        }
        MouseEventKind::ScrollUp if app.roster_open && hit(app.roster_panel_area, x, y) => {
            app.roster_nav_up();
        }
        MouseEventKind::ScrollDown if hit(app.list_area, x, y) => {
            app.scroll_messages_down(WHEEL_STEP);
        }
        MouseEventKind::ScrollUp if hit(app.list_area, x, y) => {
            app.scroll_messages_up(WHEEL_STEP);
        }
        _ => {}
    }
}
