use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::model::task::{ALL_STATUSES, Task};
use crate::tui::theme::parse_hex_color;

use super::app::{App, Mode, View};

/// Main render function — dispatches to sub-renderers
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: title bar | search row | content | status row
    let search_height = if app.mode == Mode::Search || !app.search_input.is_empty() {
        1
    } else {
        0
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(search_height),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    render_title_bar(frame, app, chunks[0]);
    if search_height > 0 {
        render_search_row(frame, app, chunks[1]);
    }
    match app.view {
        View::Board => render_board(frame, app, chunks[2]),
        View::Contacts => render_contacts(frame, app, chunks[2]),
    }
    render_status_row(frame, app, chunks[3]);

    if app.show_help {
        render_help_overlay(frame, app, area);
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let name = &app.workspace.config.workspace.name;
    let user = app
        .auth
        .current_user()
        .map(|u| format!(" — {}", u.name))
        .unwrap_or_default();
    let view = match app.view {
        View::Board => "board",
        View::Contacts => "contacts",
    };
    let line = Line::from(vec![
        Span::styled(
            format!(" [=] {name}"),
            Style::default()
                .fg(app.theme.text_bright)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(user, Style::default().fg(app.theme.text)),
        Span::styled(format!("  ({view})"), Style::default().fg(app.theme.dim)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_search_row(frame: &mut Frame, app: &App, area: Rect) {
    let style = if app.mode == Mode::Search {
        Style::default().fg(app.theme.highlight)
    } else {
        Style::default().fg(app.theme.dim)
    };
    let line = Line::from(vec![
        Span::styled(" / ", style.add_modifier(Modifier::BOLD)),
        Span::styled(app.search_input.clone(), style),
        Span::styled(
            if app.mode == Mode::Search { "▏" } else { "" },
            style,
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

// ---------------------------------------------------------------------------
// Board view
// ---------------------------------------------------------------------------

fn render_board(frame: &mut Frame, app: &App, area: Rect) {
    if app.board.no_results() {
        let message = format!("No tasks match '{}'.", app.search_input.trim());
        let paragraph = Paragraph::new(Line::from(Span::styled(
            message,
            Style::default().fg(app.theme.dim),
        )))
        .centered();
        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage(45),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(area);
        frame.render_widget(paragraph, vertical[1]);
        return;
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    for (index, status) in ALL_STATUSES.into_iter().enumerate() {
        let tasks = app.board.columns().column(status);
        let is_cursor_column = app.view == View::Board && app.cursor_column == index;

        let border_style = if is_cursor_column {
            Style::default().fg(app.theme.highlight)
        } else {
            Style::default().fg(app.theme.column_border)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(format!(" {} ({}) ", status.heading(), tasks.len()));

        let inner = block.inner(columns[index]);
        frame.render_widget(block, columns[index]);

        let mut lines: Vec<Line> = Vec::new();
        for (row, task) in tasks.iter().enumerate() {
            // The insertion marker sits where a drop would land.
            if is_cursor_column && app.mode == Mode::Carry && app.cursor_row == row {
                lines.push(carry_marker_line(app));
            }
            lines.push(card_line(
                app,
                task,
                inner.width as usize,
                is_cursor_column && app.mode != Mode::Carry && app.cursor_row == row,
            ));
        }
        if is_cursor_column && app.mode == Mode::Carry && app.cursor_row >= tasks.len() {
            lines.push(carry_marker_line(app));
        }
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

fn carry_marker_line(app: &App) -> Line<'static> {
    let title = app
        .carry
        .as_ref()
        .and_then(|c| {
            app.board
                .tasks()
                .iter()
                .find(|t| t.id == c.task_id)
                .map(|t| t.title.clone())
        })
        .unwrap_or_default();
    Line::from(Span::styled(
        format!("▸ {title}"),
        Style::default()
            .fg(app.theme.carry_fg)
            .add_modifier(Modifier::BOLD),
    ))
}

fn card_line(app: &App, task: &Task, width: usize, selected: bool) -> Line<'static> {
    let mut spans: Vec<Span> = Vec::new();

    if let Some(priority) = task.priority {
        spans.push(Span::styled(
            "! ",
            Style::default().fg(app.theme.priority_color(priority)),
        ));
    } else {
        spans.push(Span::raw("  "));
    }

    let mut suffix = String::new();
    if !task.subtasks.is_empty() {
        suffix.push_str(&format!(" {}/{}", task.done_subtasks(), task.subtasks.len()));
    }
    for initials in assigned_initials(app, task).into_iter().take(3) {
        suffix.push_str(&format!(" {initials}"));
    }

    let title_width = width
        .saturating_sub(2)
        .saturating_sub(suffix.width());
    let title_style = if selected {
        Style::default()
            .fg(app.theme.text_bright)
            .bg(app.theme.selection_bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.text)
    };
    spans.push(Span::styled(
        truncate_to_width(&task.title, title_width),
        title_style,
    ));
    spans.push(Span::styled(
        suffix,
        Style::default().fg(app.theme.category_color(task.category)),
    ));
    Line::from(spans)
}

fn assigned_initials(app: &App, task: &Task) -> Vec<String> {
    task.assigned_to
        .iter()
        .filter_map(|id| app.directory.by_id(id))
        .map(|c| c.initials())
        .collect()
}

/// Truncate to a display width, appending `…` when something was cut.
fn truncate_to_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let mut out = String::new();
    for c in text.chars() {
        if out.width() + 2 > width {
            break;
        }
        out.push(c);
    }
    out.push('…');
    out
}

// ---------------------------------------------------------------------------
// Contacts view
// ---------------------------------------------------------------------------

fn render_contacts(frame: &mut Frame, app: &App, area: Rect) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    // List pane
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.column_border))
        .title(format!(" Contacts ({}) ", app.directory.len()));
    let inner = block.inner(halves[0]);
    frame.render_widget(block, halves[0]);

    let mut lines: Vec<Line> = Vec::new();
    for (row, contact) in app.directory.sorted().into_iter().enumerate() {
        let selected = row == app.contacts_cursor;
        let avatar_color = parse_hex_color(&contact.bg_color).unwrap_or(app.theme.dim);
        let name_style = if selected {
            Style::default()
                .fg(app.theme.text_bright)
                .bg(app.theme.selection_bg)
                .add_modifier(Modifier::BOLD)
        } else if contact.active {
            Style::default().fg(app.theme.highlight)
        } else {
            Style::default().fg(app.theme.text)
        };
        lines.push(Line::from(vec![
            Span::styled(format!(" {:<3}", contact.initials()), Style::default().fg(avatar_color)),
            Span::styled(contact.name.clone(), name_style),
        ]));
    }
    frame.render_widget(Paragraph::new(lines), inner);

    // Detail pane
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.column_border))
        .title(" Details ");
    let inner = block.inner(halves[1]);
    frame.render_widget(block, halves[1]);

    let Some(contact) = app.directory.selected() else {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "Select a contact (enter)",
                Style::default().fg(app.theme.dim),
            )),
            inner,
        );
        return;
    };

    let assigned: Vec<&Task> = app
        .board
        .tasks()
        .iter()
        .filter(|t| t.assigned_to.contains(&contact.id))
        .collect();
    let mut lines = vec![
        Line::from(Span::styled(
            contact.name.clone(),
            Style::default()
                .fg(app.theme.text_bright)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            contact.mail.clone(),
            Style::default().fg(app.theme.text),
        )),
        Line::from(Span::styled(
            contact.phone.clone(),
            Style::default().fg(app.theme.text),
        )),
        Line::default(),
        Line::from(Span::styled(
            format!("Assigned tasks: {}", assigned.len()),
            Style::default().fg(app.theme.dim),
        )),
    ];
    for task in assigned {
        lines.push(Line::from(Span::styled(
            format!("  [{}] {}", task.id, task.title),
            Style::default().fg(app.theme.text),
        )));
    }
    frame.render_widget(Paragraph::new(lines), inner);
}

// ---------------------------------------------------------------------------
// Status row & help
// ---------------------------------------------------------------------------

fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(active) = app.toasts.last() {
        let line = Line::from(Span::styled(
            format!(" {}", active.toast.text),
            Style::default()
                .fg(app.theme.toast_color(active.toast.kind))
                .add_modifier(Modifier::BOLD),
        ));
        frame.render_widget(Paragraph::new(line), area);
        return;
    }

    if !app.workspace.config.ui.show_key_hints {
        return;
    }
    let hints = match (app.view, app.mode) {
        (_, Mode::Search) => "type to filter · enter keep · esc clear",
        (_, Mode::Carry) => "h/j/k/l place · space drop · esc cancel",
        (View::Board, _) => "h/j/k/l move · space pick up · d delete · / search · tab contacts · q quit",
        (View::Contacts, _) => "j/k move · enter open · d delete · tab board · q quit",
    };
    frame.render_widget(
        Paragraph::new(Span::styled(
            format!(" {hints}"),
            Style::default().fg(app.theme.dim),
        )),
        area,
    );
}

fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let width = 52.min(area.width);
    let height = 14.min(area.height);
    let popup = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    };
    frame.render_widget(Clear, popup);

    let text = vec![
        "",
        "  h/j/k/l, arrows   move around the board",
        "  space / enter     pick a card up, drop it",
        "  esc               cancel carry / clear search",
        "  /                 search title and description",
        "  d                 delete card or contact",
        "  tab               switch board <-> contacts",
        "  ?                 toggle this help",
        "  q                 quit",
    ];
    let lines: Vec<Line> = text
        .into_iter()
        .map(|l| Line::from(Span::styled(l, Style::default().fg(app.theme.text))))
        .collect();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.highlight))
        .title(" help ")
        .style(Style::default().bg(app.theme.background));
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::workspace::init_workspace;
    use crate::model::contact::Contact;
    use crate::model::task::Category;
    use crate::store::DocumentStore;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use tempfile::TempDir;

    /// Render target as plain text (no styles).
    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer().clone();
        let width = buffer.area.width as usize;
        buffer
            .content
            .chunks(width)
            .map(|row| {
                let line: String = row.iter().map(|cell| cell.symbol()).collect();
                line.trim_end().to_string()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn test_app() -> (TempDir, App) {
        let tmp = TempDir::new().unwrap();
        let ws = init_workspace(tmp.path(), "demo", false).unwrap();
        let mut app = App::new(ws).unwrap();
        let mut task = Task::new("Buy milk");
        task.category = Category::UserStory;
        app.store.add(task).unwrap();
        app.store
            .add(Contact::new("Ada Lovelace", "ada@example.com", "1"))
            .unwrap();
        app.tick();
        (tmp, app)
    }

    #[test]
    fn board_renders_columns_and_cards() {
        let (_tmp, mut app) = test_app();
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal.draw(|f| render(f, &mut app)).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("To do (1)"));
        assert!(text.contains("In progress (0)"));
        assert!(text.contains("Await feedback (0)"));
        assert!(text.contains("Done (0)"));
        assert!(text.contains("Buy milk"));
    }

    #[test]
    fn empty_search_shows_no_results_message() {
        let (_tmp, mut app) = test_app();
        app.set_search("zzz".into());
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal.draw(|f| render(f, &mut app)).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("No tasks match 'zzz'."));
        assert!(!text.contains("To do (0)"));
    }

    #[test]
    fn contacts_view_lists_initials() {
        let (_tmp, mut app) = test_app();
        app.view = View::Contacts;
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal.draw(|f| render(f, &mut app)).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("Contacts (1)"));
        assert!(text.contains("AL"));
        assert!(text.contains("Ada Lovelace"));
    }

    #[test]
    fn truncate_appends_ellipsis() {
        assert_eq!(truncate_to_width("abcdef", 10), "abcdef");
        assert_eq!(truncate_to_width("abcdef", 4), "abc…");
        assert_eq!(truncate_to_width("", 4), "");
    }
}
