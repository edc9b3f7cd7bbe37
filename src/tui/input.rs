use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use unicode_segmentation::UnicodeSegmentation;

use super::app::{App, Mode, View};

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }

    // Help overlay intercepts everything
    if app.show_help {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc) {
            app.show_help = false;
        }
        return;
    }

    match app.mode {
        Mode::Navigate => handle_navigate(app, key),
        Mode::Search => handle_search(app, key),
        Mode::Carry => handle_carry(app, key),
    }
}

fn handle_navigate(app: &mut App, key: KeyEvent) {
    // Global keys first
    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
            return;
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
            return;
        }
        KeyCode::Char('?') => {
            app.show_help = true;
            return;
        }
        KeyCode::Tab => {
            app.view = match app.view {
                View::Board => View::Contacts,
                View::Contacts => View::Board,
            };
            return;
        }
        _ => {}
    }

    match app.view {
        View::Board => handle_board_navigate(app, key),
        View::Contacts => handle_contacts_navigate(app, key),
    }
}

fn handle_board_navigate(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            if app.cursor_row + 1 < app.column_len(app.cursor_column) {
                app.cursor_row += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.cursor_row = app.cursor_row.saturating_sub(1);
        }
        KeyCode::Char('h') | KeyCode::Left => {
            app.cursor_column = app.cursor_column.saturating_sub(1);
            app.clamp_cursor();
        }
        KeyCode::Char('l') | KeyCode::Right => {
            if app.cursor_column < 3 {
                app.cursor_column += 1;
                app.clamp_cursor();
            }
        }
        KeyCode::Char(' ') | KeyCode::Enter => app.pick_up(),
        KeyCode::Char('d') => app.delete_selected_task(),
        KeyCode::Char('/') => {
            app.mode = Mode::Search;
        }
        KeyCode::Esc => {
            if !app.search_input.is_empty() {
                app.set_search(String::new());
            }
        }
        _ => {}
    }
}

fn handle_contacts_navigate(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            if app.contacts_cursor + 1 < app.directory.len() {
                app.contacts_cursor += 1;
            }
            app.open_contact();
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.contacts_cursor = app.contacts_cursor.saturating_sub(1);
            app.open_contact();
        }
        KeyCode::Enter => app.open_contact(),
        KeyCode::Char('d') => app.delete_selected_contact(),
        KeyCode::Esc => app.directory.back_to_list(),
        _ => {}
    }
}

/// Search mode: the projection recomputes on every keystroke; Enter keeps
/// the filter, Esc drops it.
fn handle_search(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.set_search(String::new());
            app.mode = Mode::Navigate;
        }
        KeyCode::Enter => {
            app.mode = Mode::Navigate;
        }
        KeyCode::Backspace => {
            let mut graphemes: Vec<&str> = app.search_input.graphemes(true).collect();
            graphemes.pop();
            app.set_search(graphemes.concat());
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            let mut search = app.search_input.clone();
            search.push(c);
            app.set_search(search);
        }
        _ => {}
    }
}

/// Carry mode: the cursor is the insertion point; Space/Enter drops,
/// Esc puts the card back.
fn handle_carry(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            // One past the end is a valid insertion point.
            if app.cursor_row < app.column_len(app.cursor_column) {
                app.cursor_row += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.cursor_row = app.cursor_row.saturating_sub(1);
        }
        KeyCode::Char('h') | KeyCode::Left => {
            app.cursor_column = app.cursor_column.saturating_sub(1);
            app.clamp_cursor();
        }
        KeyCode::Char('l') | KeyCode::Right => {
            if app.cursor_column < 3 {
                app.cursor_column += 1;
                app.clamp_cursor();
            }
        }
        KeyCode::Char(' ') | KeyCode::Enter => app.drop_card(),
        KeyCode::Esc => app.cancel_carry(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::workspace::init_workspace;
    use crate::model::task::{Category, Task};
    use crate::store::DocumentStore;
    use crossterm::event::KeyEvent;
    use tempfile::TempDir;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app_with_tasks(titles: &[&str]) -> (TempDir, App) {
        let tmp = TempDir::new().unwrap();
        let ws = init_workspace(tmp.path(), "test", false).unwrap();
        let mut app = App::new(ws).unwrap();
        for title in titles {
            let mut task = Task::new(*title);
            task.category = Category::TechnicalTask;
            app.store.add(task).unwrap();
        }
        app.tick();
        (tmp, app)
    }

    #[test]
    fn cursor_moves_within_column_bounds() {
        let (_tmp, mut app) = app_with_tasks(&["a", "b"]);
        assert_eq!(app.cursor_row, 0);
        handle_key(&mut app, key(KeyCode::Char('j')));
        assert_eq!(app.cursor_row, 1);
        handle_key(&mut app, key(KeyCode::Char('j')));
        assert_eq!(app.cursor_row, 1); // stops at the last card
        handle_key(&mut app, key(KeyCode::Char('k')));
        assert_eq!(app.cursor_row, 0);
    }

    #[test]
    fn carry_and_drop_moves_card_across_columns() {
        let (_tmp, mut app) = app_with_tasks(&["a"]);
        handle_key(&mut app, key(KeyCode::Char(' '))); // pick up
        assert_eq!(app.mode, Mode::Carry);
        handle_key(&mut app, key(KeyCode::Char('l'))); // to in-progress
        handle_key(&mut app, key(KeyCode::Char(' '))); // drop
        assert_eq!(app.mode, Mode::Navigate);

        app.tick(); // pull the re-emitted snapshot
        assert_eq!(app.board.columns().todo.len(), 0);
        assert_eq!(app.board.columns().in_progress.len(), 1);
    }

    #[test]
    fn carry_escape_cancels() {
        let (_tmp, mut app) = app_with_tasks(&["a"]);
        handle_key(&mut app, key(KeyCode::Enter));
        handle_key(&mut app, key(KeyCode::Char('l')));
        handle_key(&mut app, key(KeyCode::Esc));
        assert_eq!(app.mode, Mode::Navigate);
        app.tick();
        assert_eq!(app.board.columns().todo.len(), 1);
    }

    #[test]
    fn search_mode_filters_per_keystroke() {
        let (_tmp, mut app) = app_with_tasks(&["alpha", "beta"]);
        handle_key(&mut app, key(KeyCode::Char('/')));
        assert_eq!(app.mode, Mode::Search);
        handle_key(&mut app, key(KeyCode::Char('b')));
        assert_eq!(app.board.columns().todo.len(), 1);
        handle_key(&mut app, key(KeyCode::Backspace));
        assert_eq!(app.board.columns().todo.len(), 2);
        handle_key(&mut app, key(KeyCode::Esc));
        assert_eq!(app.mode, Mode::Navigate);
        assert!(app.search_input.is_empty());
    }

    #[test]
    fn tab_toggles_view_and_q_quits() {
        let (_tmp, mut app) = app_with_tasks(&[]);
        handle_key(&mut app, key(KeyCode::Tab));
        assert_eq!(app.view, View::Contacts);
        handle_key(&mut app, key(KeyCode::Tab));
        assert_eq!(app.view, View::Board);
        handle_key(&mut app, key(KeyCode::Char('q')));
        assert!(app.should_quit);
    }
}
