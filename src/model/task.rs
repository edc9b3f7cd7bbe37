use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Workflow status of a task, one per board column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "to do")]
    ToDo,
    #[serde(rename = "in progress")]
    InProgress,
    #[serde(rename = "await feedback")]
    AwaitFeedback,
    #[serde(rename = "done")]
    Done,
}

/// All statuses in board order (left to right).
pub const ALL_STATUSES: [Status; 4] = [
    Status::ToDo,
    Status::InProgress,
    Status::AwaitFeedback,
    Status::Done,
];

impl Status {
    /// The wire spelling, as stored in task documents.
    pub fn as_str(self) -> &'static str {
        match self {
            Status::ToDo => "to do",
            Status::InProgress => "in progress",
            Status::AwaitFeedback => "await feedback",
            Status::Done => "done",
        }
    }

    /// Column heading shown above the corresponding board column.
    pub fn heading(self) -> &'static str {
        match self {
            Status::ToDo => "To do",
            Status::InProgress => "In progress",
            Status::AwaitFeedback => "Await feedback",
            Status::Done => "Done",
        }
    }

    /// Parse a user-typed status, tolerating dashes and missing spaces
    /// (`todo`, `to-do`, `in-progress`, `awaitfeedback`, ...).
    pub fn parse_flexible(s: &str) -> Option<Status> {
        let key: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        match key.as_str() {
            "todo" => Some(Status::ToDo),
            "inprogress" => Some(Status::InProgress),
            "awaitfeedback" | "feedback" => Some(Status::AwaitFeedback),
            "done" => Some(Status::Done),
            _ => None,
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task priority level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Urgent,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Urgent => "urgent",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    pub fn parse_flexible(s: &str) -> Option<Priority> {
        match s.trim().to_lowercase().as_str() {
            "urgent" => Some(Priority::Urgent),
            "medium" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            _ => None,
        }
    }
}

/// Task category. `Unselected` is a form placeholder; a draft carrying it
/// must not be saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Select Category")]
    Unselected,
    #[serde(rename = "User Story")]
    UserStory,
    #[serde(rename = "Technical Task")]
    TechnicalTask,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Unselected => "Select Category",
            Category::UserStory => "User Story",
            Category::TechnicalTask => "Technical Task",
        }
    }

    pub fn parse_flexible(s: &str) -> Option<Category> {
        let key: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        match key.as_str() {
            "userstory" | "story" => Some(Category::UserStory),
            "technicaltask" | "technical" => Some(Category::TechnicalTask),
            _ => None,
        }
    }
}

/// A checklist item inside a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    pub title: String,
    pub done: bool,
}

impl Subtask {
    pub fn new(title: impl Into<String>) -> Self {
        Subtask {
            title: title.into(),
            done: false,
        }
    }
}

/// A task on the board.
///
/// `id` is assigned by the document store on creation and never changes
/// afterwards. `assigned_to` holds contact IDs, ordered and unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Due date, or None for no deadline.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub priority: Option<Priority>,
    pub category: Category,
    #[serde(default)]
    pub assigned_to: Vec<String>,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
    pub status: Status,
}

impl Task {
    /// Create a task with the given title in the default column.
    pub fn new(title: impl Into<String>) -> Self {
        Task {
            id: String::new(),
            title: title.into(),
            description: String::new(),
            date: None,
            priority: None,
            category: Category::Unselected,
            assigned_to: Vec::new(),
            subtasks: Vec::new(),
            status: Status::ToDo,
        }
    }

    /// Assign a contact, keeping the list unique by ID.
    pub fn assign(&mut self, contact_id: &str) {
        if !self.assigned_to.iter().any(|id| id == contact_id) {
            self.assigned_to.push(contact_id.to_string());
        }
    }

    /// Remove a contact assignment. Returns whether anything changed.
    pub fn unassign(&mut self, contact_id: &str) -> bool {
        let before = self.assigned_to.len();
        self.assigned_to.retain(|id| id != contact_id);
        self.assigned_to.len() != before
    }

    /// Count of completed subtasks.
    pub fn done_subtasks(&self) -> usize {
        self.subtasks.iter().filter(|s| s.done).count()
    }
}
