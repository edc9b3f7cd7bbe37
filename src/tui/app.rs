use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::auth::Authenticator;
use crate::board::column::list_for_status;
use crate::board::reconcile::DropEvent;
use crate::board::{Board, BoardEvent, Command};
use crate::io::event_log;
use crate::io::lock::FileLock;
use crate::io::watcher::StoreWatcher;
use crate::io::workspace::{Workspace, discover_workspace, load_workspace};
use crate::model::contact::Contact;
use crate::model::message::Toast;
use crate::model::task::{ALL_STATUSES, Task};
use crate::notifier::{Notifier, NotifyHandle};
use crate::ops::contact_ops::ContactDirectory;
use crate::store::{ChangeEvent, DocumentStore, JsonStore};

use super::input;
use super::render;
use super::theme::Theme;

/// Which view is currently displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Board,
    Contacts,
}

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    Search,
    /// A card is picked up and travels with the cursor until dropped.
    Carry,
}

/// The card picked up in carry mode, remembered by where it was grabbed.
#[derive(Debug, Clone)]
pub struct CarriedCard {
    pub source_column: usize,
    pub source_row: usize,
    pub task_id: String,
}

/// A toast currently on screen.
#[derive(Debug, Clone)]
pub struct ActiveToast {
    pub toast: Toast,
    pub shown_at: Instant,
}

/// Main application state
pub struct App {
    pub workspace: Workspace,
    pub store: JsonStore,
    store_rx: std::sync::mpsc::Receiver<ChangeEvent>,
    watcher: Option<StoreWatcher>,
    pub board: Board,
    pub directory: ContactDirectory,
    pub auth: Authenticator,
    pub notifier: Notifier,
    pub notify: NotifyHandle,
    pub theme: Theme,
    pub view: View,
    pub mode: Mode,
    pub should_quit: bool,
    pub show_help: bool,
    /// Board cursor: column index (0..4) and row within that column.
    pub cursor_column: usize,
    pub cursor_row: usize,
    pub carry: Option<CarriedCard>,
    pub contacts_cursor: usize,
    pub search_input: String,
    pub toasts: Vec<ActiveToast>,
}

impl App {
    pub fn new(workspace: Workspace) -> Result<Self, Box<dyn std::error::Error>> {
        let mut store = JsonStore::open(&workspace.data_dir)?;
        let store_rx = store.subscribe();
        let watcher = StoreWatcher::start(&workspace.data_dir).ok();
        let auth = Authenticator::load(&workspace.data_dir);
        let theme = Theme::from_config(&workspace.config.ui);
        let notifier = Notifier::new();
        let notify = notifier.handle();

        let mut board = Board::new();
        board.apply(BoardEvent::Snapshot(store.snapshot()?));
        let mut directory = ContactDirectory::new();
        directory.set_snapshot(store.snapshot()?);

        Ok(App {
            workspace,
            store,
            store_rx,
            watcher,
            board,
            directory,
            auth,
            notifier,
            notify,
            theme,
            view: View::Board,
            mode: Mode::Navigate,
            should_quit: false,
            show_help: false,
            cursor_column: 0,
            cursor_row: 0,
            carry: None,
            contacts_cursor: 0,
            search_input: String::new(),
            toasts: Vec::new(),
        })
    }

    /// One scheduler turn: pull in external changes, refresh projections,
    /// rotate toasts.
    pub fn tick(&mut self) {
        if let Some(watcher) = &self.watcher
            && !watcher.poll().is_empty()
            && let Err(err) = self.store.reload()
        {
            self.notify.error(format!("Could not reload workspace: {err}"));
        }

        let mut tasks_changed = false;
        let mut contacts_changed = false;
        while let Ok(event) = self.store_rx.try_recv() {
            match event.collection.as_str() {
                "tasks" => tasks_changed = true,
                "contacts" => contacts_changed = true,
                _ => {}
            }
        }
        if tasks_changed {
            match self.store.snapshot::<Task>() {
                Ok(tasks) => {
                    self.board.apply(BoardEvent::Snapshot(tasks));
                    self.clamp_cursor();
                }
                Err(err) => self.notify.error(format!("Could not read tasks: {err}")),
            }
        }
        if contacts_changed {
            match self.store.snapshot::<Contact>() {
                Ok(contacts) => {
                    self.directory.set_snapshot(contacts);
                    self.clamp_contacts_cursor();
                }
                Err(err) => self.notify.error(format!("Could not read contacts: {err}")),
            }
        }

        let ttl = Duration::from_secs(self.workspace.config.ui.toast_secs.max(1));
        for toast in self.notifier.drain() {
            self.toasts.push(ActiveToast {
                toast,
                shown_at: Instant::now(),
            });
        }
        self.toasts.retain(|t| t.shown_at.elapsed() < ttl);
    }

    // --- Board cursor ---

    pub fn column_len(&self, column: usize) -> usize {
        self.board.columns().column(ALL_STATUSES[column]).len()
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.board
            .columns()
            .column(ALL_STATUSES[self.cursor_column])
            .get(self.cursor_row)
    }

    /// Keep the cursor on a card after the board changed under it. In
    /// carry mode the cursor may sit one past the end (the insertion
    /// point at the bottom of a column).
    pub fn clamp_cursor(&mut self) {
        let len = self.column_len(self.cursor_column);
        let max = if self.mode == Mode::Carry {
            len
        } else {
            len.saturating_sub(1)
        };
        self.cursor_row = self.cursor_row.min(max);
    }

    pub fn clamp_contacts_cursor(&mut self) {
        self.contacts_cursor = self
            .contacts_cursor
            .min(self.directory.len().saturating_sub(1));
    }

    // --- Carry / drop ---

    pub fn pick_up(&mut self) {
        let Some(task_id) = self.selected_task().map(|t| t.id.clone()) else {
            return;
        };
        self.carry = Some(CarriedCard {
            source_column: self.cursor_column,
            source_row: self.cursor_row,
            task_id,
        });
        self.mode = Mode::Carry;
    }

    pub fn cancel_carry(&mut self) {
        self.carry = None;
        self.mode = Mode::Navigate;
        self.clamp_cursor();
    }

    /// Drop the carried card at the cursor. The board applies the move
    /// optimistically and hands back the one write it needs, if any.
    pub fn drop_card(&mut self) {
        let Some(carry) = self.carry.take() else {
            return;
        };
        self.mode = Mode::Navigate;

        let event = DropEvent {
            source_list: list_for_status(ALL_STATUSES[carry.source_column]).to_string(),
            target_list: list_for_status(ALL_STATUSES[self.cursor_column]).to_string(),
            source_index: carry.source_row,
            target_index: self.cursor_row,
            task_id: carry.task_id,
        };
        if let Some(Command::UpdateTask(task)) = self.board.apply(BoardEvent::Drop(event)) {
            // Optimistic layout stays as dropped even when the write
            // fails; the next snapshot is the arbiter.
            match self.locked_write("update task", |store| store.update(&task)) {
                Ok(()) => self.notify.success(format!("Moved to {}", task.status)),
                Err(err) => self
                    .notify
                    .error(format!("Could not move task: {err}")),
            }
        }
        self.clamp_cursor();
    }

    // --- Writes ---

    /// Serialize a store write against other join processes and record
    /// failures in the event log.
    pub fn locked_write<T>(
        &mut self,
        operation: &str,
        write: impl FnOnce(&mut JsonStore) -> Result<T, crate::store::StoreError>,
    ) -> Result<T, Box<dyn std::error::Error>> {
        let _lock = FileLock::acquire_default(&self.workspace.data_dir)?;
        let result = write(&mut self.store);
        if let Err(err) = &result {
            event_log::log_write_failure(&self.workspace.data_dir, operation, &err.to_string());
        }
        Ok(result?)
    }

    pub fn delete_selected_task(&mut self) {
        let Some(task) = self.selected_task().cloned() else {
            return;
        };
        match self.locked_write("delete task", |store| store.delete::<Task>(&task.id)) {
            Ok(()) => self.notify.success(format!("Deleted '{}'", task.title)),
            Err(err) => self.notify.error(format!("Could not delete task: {err}")),
        }
    }

    // --- Contacts ---

    pub fn selected_contact_id(&self) -> Option<String> {
        self.directory
            .sorted()
            .get(self.contacts_cursor)
            .map(|c| c.id.clone())
    }

    pub fn open_contact(&mut self) {
        if let Some(id) = self.selected_contact_id() {
            self.directory.select(&id);
        }
    }

    pub fn delete_selected_contact(&mut self) {
        let Some(id) = self.selected_contact_id() else {
            return;
        };
        let name = self
            .directory
            .by_id(&id)
            .map(|c| c.name.clone())
            .unwrap_or_default();
        match self.locked_write("delete contact", |store| store.delete::<Contact>(&id)) {
            Ok(()) => self.notify.success(format!("Deleted contact '{name}'")),
            Err(err) => self.notify.error(format!("Could not delete contact: {err}")),
        }
    }

    // --- Search ---

    pub fn set_search(&mut self, search: String) {
        self.search_input = search.clone();
        self.board.apply(BoardEvent::Search(search));
        self.clamp_cursor();
    }
}

/// Launch the TUI against the workspace discovered from `dir` (or the
/// current directory).
pub fn run(dir: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let start = match dir {
        Some(dir) => std::fs::canonicalize(Path::new(dir))?,
        None => std::env::current_dir()?,
    };
    let root = discover_workspace(&start)?;
    let workspace = load_workspace(&root)?;
    let mut app = App::new(workspace)?;

    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    while !app.should_quit {
        app.tick();
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind != KeyEventKind::Release
        {
            input::handle_key(app, key);
        }
    }
    Ok(())
}
