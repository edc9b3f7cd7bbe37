pub mod column;
pub mod projection;
pub mod reconcile;

pub use column::{list_for_status, status_for_list};
pub use projection::{BoardColumns, matches_search, no_results, project};
pub use reconcile::{DropEvent, reconcile};

use crate::model::task::Task;

/// Something the board asks its owner to do. Commands are the only way
/// board logic reaches the backend; the board itself never writes.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    UpdateTask(Task),
}

/// An input to the board store.
#[derive(Debug, Clone, PartialEq)]
pub enum BoardEvent {
    /// Authoritative re-emission of the full task collection.
    Snapshot(Vec<Task>),
    /// The search term changed.
    Search(String),
    /// A drag gesture completed.
    Drop(DropEvent),
}

/// Owned board state with a single mutation entry point.
///
/// The snapshot cache is written only by [`BoardEvent::Snapshot`]; columns
/// are a projection of it, except for the optimistic adjustments a
/// [`BoardEvent::Drop`] makes while its write is in flight.
#[derive(Debug, Clone, Default)]
pub struct Board {
    tasks: Vec<Task>,
    search: String,
    columns: BoardColumns,
}

impl Board {
    pub fn new() -> Self {
        Board::default()
    }

    /// Apply one event. The returned command, when present, must be issued
    /// to the backend by the caller; the board does not retry or roll back.
    pub fn apply(&mut self, event: BoardEvent) -> Option<Command> {
        match event {
            BoardEvent::Snapshot(tasks) => {
                self.tasks = tasks;
                self.recompute();
                None
            }
            BoardEvent::Search(search) => {
                self.search = search;
                self.recompute();
                None
            }
            BoardEvent::Drop(drop) => {
                reconcile(&mut self.columns, &drop).map(Command::UpdateTask)
            }
        }
    }

    /// The current four-column projection.
    pub fn columns(&self) -> &BoardColumns {
        &self.columns
    }

    /// The latest authoritative snapshot, unfiltered.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// True when a non-empty search matched nothing.
    pub fn no_results(&self) -> bool {
        no_results(&self.tasks, &self.search)
    }

    fn recompute(&mut self) {
        self.columns = project(&self.tasks, &self.search);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::column::{DONE_LIST, TO_DO_LIST};
    use crate::model::task::{Category, Status};

    fn task(id: &str, status: Status, title: &str) -> Task {
        Task {
            id: id.to_string(),
            status,
            category: Category::UserStory,
            ..Task::new(title)
        }
    }

    #[test]
    fn snapshot_then_search_then_drop() {
        let mut board = Board::new();

        let none = board.apply(BoardEvent::Snapshot(vec![
            task("1", Status::ToDo, "Buy milk"),
            task("2", Status::Done, "Ship release"),
        ]));
        assert!(none.is_none());
        assert_eq!(board.columns().todo.len(), 1);
        assert_eq!(board.columns().done.len(), 1);

        board.apply(BoardEvent::Search("ship".into()));
        assert!(board.columns().todo.is_empty());
        assert_eq!(board.columns().done.len(), 1);
        assert!(!board.no_results());

        let command = board.apply(BoardEvent::Drop(DropEvent {
            source_list: DONE_LIST.into(),
            target_list: TO_DO_LIST.into(),
            source_index: 0,
            target_index: 0,
            task_id: "2".into(),
        }));
        match command {
            Some(Command::UpdateTask(updated)) => {
                assert_eq!(updated.id, "2");
                assert_eq!(updated.status, Status::ToDo);
            }
            other => panic!("expected update command, got {:?}", other),
        }
    }

    #[test]
    fn snapshot_overwrites_optimistic_layout() {
        let mut board = Board::new();
        board.apply(BoardEvent::Snapshot(vec![task("1", Status::ToDo, "a")]));
        board.apply(BoardEvent::Drop(DropEvent {
            source_list: TO_DO_LIST.into(),
            target_list: DONE_LIST.into(),
            source_index: 0,
            target_index: 0,
            task_id: "1".into(),
        }));
        assert_eq!(board.columns().done.len(), 1);

        // The authoritative stream wins, whatever it says.
        board.apply(BoardEvent::Snapshot(vec![task("1", Status::ToDo, "a")]));
        assert_eq!(board.columns().todo.len(), 1);
        assert!(board.columns().done.is_empty());
    }

    #[test]
    fn search_change_reprojects_from_snapshot_not_columns() {
        let mut board = Board::new();
        board.apply(BoardEvent::Snapshot(vec![
            task("1", Status::ToDo, "alpha"),
            task("2", Status::ToDo, "beta"),
        ]));
        board.apply(BoardEvent::Search("alpha".into()));
        assert_eq!(board.columns().todo.len(), 1);
        board.apply(BoardEvent::Search(String::new()));
        assert_eq!(board.columns().todo.len(), 2);
    }

    #[test]
    fn no_results_tracks_search_and_snapshot() {
        let mut board = Board::new();
        board.apply(BoardEvent::Snapshot(vec![task("1", Status::ToDo, "alpha")]));
        board.apply(BoardEvent::Search("beta".into()));
        assert!(board.no_results());
        board.apply(BoardEvent::Snapshot(vec![
            task("1", Status::ToDo, "alpha"),
            task("2", Status::ToDo, "beta launch"),
        ]));
        assert!(!board.no_results());
    }
}
