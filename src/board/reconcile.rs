use crate::board::column::status_for_list;
use crate::board::projection::BoardColumns;
use crate::model::task::Task;

/// A completed drag gesture, as reported by the drop surface.
///
/// Container identifiers are the surface's own vocabulary; only
/// [`status_for_list`] may interpret them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropEvent {
    pub source_list: String,
    pub target_list: String,
    pub source_index: usize,
    pub target_index: usize,
    /// ID of the dragged task (the gesture's payload).
    pub task_id: String,
}

/// Reconcile a drop with the board columns.
///
/// The in-memory columns are updated immediately so the card lands where
/// the user put it before any write completes. The returned task, when
/// present, is the one backend update the gesture requires: the dragged
/// task with only its status replaced. `None` means the gesture needs no
/// write — a same-column reorder, a drop into a container that resolves to
/// the task's current status, or a gesture the board cannot interpret
/// (unknown container, stale index, stale payload).
pub fn reconcile(columns: &mut BoardColumns, event: &DropEvent) -> Option<Task> {
    let source_status = status_for_list(&event.source_list)?;

    if event.source_list == event.target_list {
        // Pure visual reorder; status is unchanged, so nothing to persist.
        move_within(columns.column_mut(source_status), event.source_index, event.target_index);
        return None;
    }

    // An unrecognized target owns no column, so the card stays put.
    let target_status = status_for_list(&event.target_list)?;

    let source = columns.column_mut(source_status);
    if source
        .get(event.source_index)
        .is_none_or(|t| t.id != event.task_id)
    {
        // The snapshot moved under the gesture; drop it.
        return None;
    }
    let moved = source.remove(event.source_index);

    let target = columns.column_mut(target_status);
    let index = event.target_index.min(target.len());
    target.insert(index, moved.clone());

    // The optimistic copy keeps its old status, exactly like the snapshot
    // it came from; the next authoritative emission carries the new one.
    if moved.status != target_status {
        let mut updated = moved;
        updated.status = target_status;
        Some(updated)
    } else {
        None
    }
}

/// Reorder within one list: remove at `from`, reinsert at `to` (clamped).
fn move_within(tasks: &mut Vec<Task>, from: usize, to: usize) {
    if from >= tasks.len() {
        return;
    }
    let task = tasks.remove(from);
    let to = to.min(tasks.len());
    tasks.insert(to, task);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::column::{AWAIT_FEEDBACK_LIST, DONE_LIST, IN_PROGRESS_LIST, TO_DO_LIST};
    use crate::board::projection::project;
    use crate::model::task::{Category, Status};

    fn task(id: &str, status: Status, title: &str) -> Task {
        Task {
            id: id.to_string(),
            status,
            category: Category::TechnicalTask,
            ..Task::new(title)
        }
    }

    fn sample_columns() -> BoardColumns {
        let tasks = vec![
            task("1", Status::ToDo, "Buy milk"),
            task("2", Status::ToDo, "Write docs"),
            task("3", Status::ToDo, "Fix login"),
            task("4", Status::InProgress, "Ship release"),
            task("5", Status::Done, "Retro notes"),
        ];
        project(&tasks, "")
    }

    fn drop_event(source: &str, target: &str, from: usize, to: usize, id: &str) -> DropEvent {
        DropEvent {
            source_list: source.to_string(),
            target_list: target.to_string(),
            source_index: from,
            target_index: to,
            task_id: id.to_string(),
        }
    }

    fn ids(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.id.as_str()).collect()
    }

    // --- Same-container reorder ---

    #[test]
    fn reorder_within_column_issues_no_update() {
        let mut columns = sample_columns();
        let update = reconcile(&mut columns, &drop_event(TO_DO_LIST, TO_DO_LIST, 0, 2, "1"));
        assert!(update.is_none());
        assert_eq!(ids(&columns.todo), ["2", "3", "1"]);
    }

    #[test]
    fn reorder_to_front() {
        let mut columns = sample_columns();
        reconcile(&mut columns, &drop_event(TO_DO_LIST, TO_DO_LIST, 2, 0, "3"));
        assert_eq!(ids(&columns.todo), ["3", "1", "2"]);
    }

    #[test]
    fn reorder_with_out_of_range_target_clamps() {
        let mut columns = sample_columns();
        reconcile(&mut columns, &drop_event(TO_DO_LIST, TO_DO_LIST, 0, 99, "1"));
        assert_eq!(ids(&columns.todo), ["2", "3", "1"]);
    }

    // --- Cross-container move ---

    #[test]
    fn cross_column_move_issues_exactly_one_update() {
        let mut columns = sample_columns();
        let update =
            reconcile(&mut columns, &drop_event(TO_DO_LIST, IN_PROGRESS_LIST, 0, 1, "1"));

        let updated = update.expect("status change must produce an update");
        // Identical to the original except status.
        let mut expected = task("1", Status::ToDo, "Buy milk");
        expected.status = Status::InProgress;
        assert_eq!(updated, expected);

        // Optimistic layout: card sits in the target column at the drop index.
        assert_eq!(ids(&columns.todo), ["2", "3"]);
        assert_eq!(ids(&columns.in_progress), ["4", "1"]);
    }

    #[test]
    fn optimistic_copy_keeps_old_status_until_snapshot() {
        let mut columns = sample_columns();
        reconcile(&mut columns, &drop_event(TO_DO_LIST, DONE_LIST, 0, 0, "1"));
        assert_eq!(columns.done[0].id, "1");
        assert_eq!(columns.done[0].status, Status::ToDo);
    }

    #[test]
    fn drop_into_column_matching_status_issues_no_update() {
        // A cross-container path can still resolve to the task's current
        // status; that must not write.
        let mut columns = sample_columns();
        columns.in_progress[0].status = Status::ToDo; // stale optimistic copy
        let update =
            reconcile(&mut columns, &drop_event(IN_PROGRESS_LIST, TO_DO_LIST, 0, 0, "4"));
        assert!(update.is_none());
        assert_eq!(ids(&columns.todo), ["4", "1", "2", "3"]);
    }

    #[test]
    fn cross_move_target_index_clamped() {
        let mut columns = sample_columns();
        let update =
            reconcile(&mut columns, &drop_event(TO_DO_LIST, AWAIT_FEEDBACK_LIST, 1, 7, "2"));
        assert!(update.is_some());
        assert_eq!(ids(&columns.await_feedback), ["2"]);
    }

    // --- Safety ---

    #[test]
    fn unknown_target_container_is_a_no_op() {
        let mut columns = sample_columns();
        let before = columns.clone();
        let update = reconcile(&mut columns, &drop_event(TO_DO_LIST, "archivedList", 0, 0, "1"));
        assert!(update.is_none());
        assert_eq!(columns, before);
    }

    #[test]
    fn unknown_source_container_is_a_no_op() {
        let mut columns = sample_columns();
        let before = columns.clone();
        let update = reconcile(&mut columns, &drop_event("mysteryList", DONE_LIST, 0, 0, "1"));
        assert!(update.is_none());
        assert_eq!(columns, before);
    }

    #[test]
    fn stale_source_index_is_a_no_op() {
        let mut columns = sample_columns();
        let before = columns.clone();
        let update = reconcile(&mut columns, &drop_event(TO_DO_LIST, DONE_LIST, 9, 0, "1"));
        assert!(update.is_none());
        assert_eq!(columns, before);
    }

    #[test]
    fn stale_payload_id_is_a_no_op() {
        let mut columns = sample_columns();
        let before = columns.clone();
        let update = reconcile(&mut columns, &drop_event(TO_DO_LIST, DONE_LIST, 0, 0, "999"));
        assert!(update.is_none());
        assert_eq!(columns, before);
    }

    #[test]
    fn empty_column_reorder_does_not_panic() {
        let mut columns = BoardColumns::default();
        let update = reconcile(&mut columns, &drop_event(TO_DO_LIST, TO_DO_LIST, 0, 0, "1"));
        assert!(update.is_none());
    }
}
