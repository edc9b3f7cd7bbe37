use chrono::NaiveDate;

use crate::model::task::{Category, Status, Subtask, Task};

/// Error type for draft validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("a category must be selected")]
    CategoryNotSelected,
    #[error("due date {0} lies in the past")]
    DateInPast(NaiveDate),
}

/// Check a draft before it may be saved: a real title, a real category,
/// and no due date in the past. A draft without a date is fine.
pub fn validate_draft(task: &Task, today: NaiveDate) -> Result<(), ValidationError> {
    if task.title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    if task.category == Category::Unselected {
        return Err(ValidationError::CategoryNotSelected);
    }
    if let Some(date) = task.date
        && date < today
    {
        return Err(ValidationError::DateInPast(date));
    }
    Ok(())
}

/// Trim subtask titles and drop the ones that are empty after trimming.
pub fn normalize_subtasks(task: &mut Task) {
    task.subtasks.retain_mut(|sub| {
        sub.title = sub.title.trim().to_string();
        !sub.title.is_empty()
    });
}

/// Validate and clean a draft for saving. The returned task carries the
/// trimmed title and normalized subtasks.
pub fn prepare_for_save(mut draft: Task, today: NaiveDate) -> Result<Task, ValidationError> {
    validate_draft(&draft, today)?;
    draft.title = draft.title.trim().to_string();
    normalize_subtasks(&mut draft);
    Ok(draft)
}

/// Append a subtask; empty-after-trim titles are ignored.
/// Returns whether the subtask was added.
pub fn add_subtask(task: &mut Task, title: &str) -> bool {
    let title = title.trim();
    if title.is_empty() {
        return false;
    }
    task.subtasks.push(Subtask::new(title));
    true
}

/// Toggle the done flag of the subtask at `index`.
/// Returns the new flag, or None when the index is out of range.
pub fn toggle_subtask(task: &mut Task, index: usize) -> Option<bool> {
    let sub = task.subtasks.get_mut(index)?;
    sub.done = !sub.done;
    Some(sub.done)
}

/// Move a task to a new status programmatically (the non-drag path).
///
/// Returns the update to persist, or None when the task already has the
/// target status (the same redundant-write guard the drag reconciler
/// applies).
pub fn set_status(task: &Task, status: Status) -> Option<Task> {
    if task.status == status {
        return None;
    }
    let mut updated = task.clone();
    updated.status = status;
    Some(updated)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 7).unwrap()
    }

    fn valid_draft() -> Task {
        let mut task = Task::new("Write release notes");
        task.category = Category::UserStory;
        task
    }

    // --- Validation ---

    #[test]
    fn valid_draft_passes() {
        assert_eq!(validate_draft(&valid_draft(), today()), Ok(()));
    }

    #[test]
    fn blank_title_rejected() {
        let mut task = valid_draft();
        task.title = "   ".into();
        assert_eq!(
            validate_draft(&task, today()),
            Err(ValidationError::EmptyTitle)
        );
    }

    #[test]
    fn placeholder_category_rejected() {
        let mut task = valid_draft();
        task.category = Category::Unselected;
        assert_eq!(
            validate_draft(&task, today()),
            Err(ValidationError::CategoryNotSelected)
        );
    }

    #[test]
    fn past_date_rejected_today_allowed() {
        let mut task = valid_draft();
        task.date = Some(today());
        assert_eq!(validate_draft(&task, today()), Ok(()));

        let yesterday = today().pred_opt().unwrap();
        task.date = Some(yesterday);
        assert_eq!(
            validate_draft(&task, today()),
            Err(ValidationError::DateInPast(yesterday))
        );
    }

    #[test]
    fn missing_date_allowed() {
        let mut task = valid_draft();
        task.date = None;
        assert_eq!(validate_draft(&task, today()), Ok(()));
    }

    // --- Subtasks ---

    #[test]
    fn prepare_trims_title_and_subtasks() {
        let mut draft = valid_draft();
        draft.title = "  Write release notes  ".into();
        draft.subtasks = vec![
            Subtask::new("  keep me  "),
            Subtask::new("   "),
            Subtask::new("also kept"),
        ];
        let task = prepare_for_save(draft, today()).unwrap();
        assert_eq!(task.title, "Write release notes");
        let titles: Vec<&str> = task.subtasks.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, ["keep me", "also kept"]);
    }

    #[test]
    fn add_subtask_ignores_blank() {
        let mut task = valid_draft();
        assert!(!add_subtask(&mut task, "   "));
        assert!(add_subtask(&mut task, " check CI "));
        assert_eq!(task.subtasks.len(), 1);
        assert_eq!(task.subtasks[0].title, "check CI");
        assert!(!task.subtasks[0].done);
    }

    #[test]
    fn toggle_subtask_flips_and_bounds_checks() {
        let mut task = valid_draft();
        add_subtask(&mut task, "one");
        assert_eq!(toggle_subtask(&mut task, 0), Some(true));
        assert_eq!(toggle_subtask(&mut task, 0), Some(false));
        assert_eq!(toggle_subtask(&mut task, 5), None);
    }

    // --- Status ---

    #[test]
    fn set_status_same_is_noop() {
        let task = valid_draft();
        assert!(set_status(&task, Status::ToDo).is_none());
    }

    #[test]
    fn set_status_changes_only_status() {
        let task = valid_draft();
        let updated = set_status(&task, Status::Done).unwrap();
        assert_eq!(updated.status, Status::Done);
        let mut expected = task;
        expected.status = Status::Done;
        assert_eq!(updated, expected);
    }
}
