use crate::model::task::{Status, Task};

/// The four board columns, each holding the tasks of one status in source
/// order. Derived state: always rebuilt from the latest snapshot, never
/// edited except by the drag reconciler's optimistic moves.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardColumns {
    pub todo: Vec<Task>,
    pub in_progress: Vec<Task>,
    pub await_feedback: Vec<Task>,
    pub done: Vec<Task>,
}

impl BoardColumns {
    pub fn column(&self, status: Status) -> &Vec<Task> {
        match status {
            Status::ToDo => &self.todo,
            Status::InProgress => &self.in_progress,
            Status::AwaitFeedback => &self.await_feedback,
            Status::Done => &self.done,
        }
    }

    pub fn column_mut(&mut self, status: Status) -> &mut Vec<Task> {
        match status {
            Status::ToDo => &mut self.todo,
            Status::InProgress => &mut self.in_progress,
            Status::AwaitFeedback => &mut self.await_feedback,
            Status::Done => &mut self.done,
        }
    }

    /// Total cards across all four columns.
    pub fn len(&self) -> usize {
        self.todo.len() + self.in_progress.len() + self.await_feedback.len() + self.done.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Does the task match the (already trimmed and lowercased) search needle?
/// Case-insensitive substring on title or description, nothing fancier.
pub fn matches_search(task: &Task, needle: &str) -> bool {
    task.title.to_lowercase().contains(needle) || task.description.to_lowercase().contains(needle)
}

/// Normalize a raw search string for matching.
pub fn normalize_search(search: &str) -> String {
    search.trim().to_lowercase()
}

/// Reduce the snapshot by the search term. An empty (or whitespace-only)
/// search retains everything.
pub fn filter_tasks<'a>(tasks: &'a [Task], search: &str) -> Vec<&'a Task> {
    let needle = normalize_search(search);
    if needle.is_empty() {
        tasks.iter().collect()
    } else {
        tasks.iter().filter(|t| matches_search(t, &needle)).collect()
    }
}

/// Derive the four columns from a task snapshot and a search term.
///
/// Recomputed in full on every snapshot or search change; with tens of
/// tasks a diffing scheme would only add ways to be wrong. Each filtered
/// task lands in exactly one column because statuses are a closed enum.
pub fn project(tasks: &[Task], search: &str) -> BoardColumns {
    let filtered = filter_tasks(tasks, search);
    let mut columns = BoardColumns::default();
    for task in filtered {
        columns.column_mut(task.status).push(task.clone());
    }
    columns
}

/// True exactly when a non-empty search matched nothing.
pub fn no_results(tasks: &[Task], search: &str) -> bool {
    !normalize_search(search).is_empty() && filter_tasks(tasks, search).is_empty()
}
