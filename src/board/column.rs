use crate::model::task::Status;

/// Drop-container identifier of the "to do" column.
pub const TO_DO_LIST: &str = "toDoList";
/// Drop-container identifier of the "in progress" column.
pub const IN_PROGRESS_LIST: &str = "inProgressList";
/// Drop-container identifier of the "await feedback" column.
pub const AWAIT_FEEDBACK_LIST: &str = "awaitFeedbackList";
/// Drop-container identifier of the "done" column.
pub const DONE_LIST: &str = "doneList";

/// Resolve a drop-container identifier to its task status.
///
/// The drag surface addresses columns by these identifiers while the domain
/// models status as a closed enum; this is the single place where the two
/// vocabularies meet. Unknown identifiers resolve to `None` and the caller
/// must treat the gesture as a no-op.
pub fn status_for_list(list_id: &str) -> Option<Status> {
    match list_id {
        TO_DO_LIST => Some(Status::ToDo),
        IN_PROGRESS_LIST => Some(Status::InProgress),
        AWAIT_FEEDBACK_LIST => Some(Status::AwaitFeedback),
        DONE_LIST => Some(Status::Done),
        _ => None,
    }
}

/// The drop-container identifier for a status (inverse of [`status_for_list`]).
pub fn list_for_status(status: Status) -> &'static str {
    match status {
        Status::ToDo => TO_DO_LIST,
        Status::InProgress => IN_PROGRESS_LIST,
        Status::AwaitFeedback => AWAIT_FEEDBACK_LIST,
        Status::Done => DONE_LIST,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::ALL_STATUSES;

    #[test]
    fn known_lists_resolve() {
        assert_eq!(status_for_list("toDoList"), Some(Status::ToDo));
        assert_eq!(status_for_list("inProgressList"), Some(Status::InProgress));
        assert_eq!(
            status_for_list("awaitFeedbackList"),
            Some(Status::AwaitFeedback)
        );
        assert_eq!(status_for_list("doneList"), Some(Status::Done));
    }

    #[test]
    fn unknown_list_resolves_to_none() {
        assert_eq!(status_for_list("archivedList"), None);
        assert_eq!(status_for_list(""), None);
        assert_eq!(status_for_list("todolist"), None); // case-sensitive
    }

    #[test]
    fn mapping_is_bidirectional() {
        for status in ALL_STATUSES {
            assert_eq!(status_for_list(list_for_status(status)), Some(status));
        }
    }
}
