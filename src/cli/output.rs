use serde::Serialize;

use crate::model::contact::Contact;
use crate::model::task::{Subtask, Task};
use crate::ops::summary::SummaryStats;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskJson {
    pub id: String,
    pub title: String,
    pub status: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    pub category: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub assigned_to: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subtasks: Vec<SubtaskJson>,
}

#[derive(Serialize)]
pub struct SubtaskJson {
    pub title: String,
    pub done: bool,
}

#[derive(Serialize)]
pub struct BoardJson {
    pub todo: Vec<TaskJson>,
    pub in_progress: Vec<TaskJson>,
    pub await_feedback: Vec<TaskJson>,
    pub done: Vec<TaskJson>,
    pub no_results: bool,
}

#[derive(Serialize)]
pub struct ContactJson {
    pub id: String,
    pub name: String,
    pub initials: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub mail: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub phone: String,
    pub color: String,
}

#[derive(Serialize)]
pub struct SummaryJson {
    pub todo: usize,
    pub in_progress: usize,
    pub await_feedback: usize,
    pub done: usize,
    pub urgent: usize,
    pub open: usize,
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upcoming_deadline: Option<String>,
}

impl TaskJson {
    pub fn from_task(task: &Task) -> Self {
        TaskJson {
            id: task.id.clone(),
            title: task.title.clone(),
            status: task.status.to_string(),
            description: task.description.clone(),
            date: task.date.map(|d| d.to_string()),
            priority: task.priority.map(|p| p.as_str().to_string()),
            category: task.category.as_str().to_string(),
            assigned_to: task.assigned_to.clone(),
            subtasks: task.subtasks.iter().map(SubtaskJson::from_subtask).collect(),
        }
    }
}

impl SubtaskJson {
    fn from_subtask(sub: &Subtask) -> Self {
        SubtaskJson {
            title: sub.title.clone(),
            done: sub.done,
        }
    }
}

impl ContactJson {
    pub fn from_contact(contact: &Contact) -> Self {
        ContactJson {
            id: contact.id.clone(),
            name: contact.name.clone(),
            initials: contact.initials(),
            mail: contact.mail.clone(),
            phone: contact.phone.clone(),
            color: contact.bg_color.clone(),
        }
    }
}

impl SummaryJson {
    pub fn from_stats(stats: &SummaryStats, upcoming_deadline: Option<String>) -> Self {
        SummaryJson {
            todo: stats.todo,
            in_progress: stats.in_progress,
            await_feedback: stats.await_feedback,
            done: stats.done,
            urgent: stats.urgent,
            open: stats.open(),
            total: stats.total,
            upcoming_deadline,
        }
    }
}

// ---------------------------------------------------------------------------
// Text output helpers
// ---------------------------------------------------------------------------

/// One-line rendering of a task for lists: `[3] Ship release !urgent (2/4)`.
pub fn task_line(task: &Task) -> String {
    let mut line = format!("[{}] {}", task.id, task.title);
    if let Some(priority) = task.priority {
        line.push_str(&format!(" !{}", priority.as_str()));
    }
    if !task.subtasks.is_empty() {
        line.push_str(&format!(
            " ({}/{})",
            task.done_subtasks(),
            task.subtasks.len()
        ));
    }
    if let Some(date) = task.date {
        line.push_str(&format!(" due {date}"));
    }
    line
}

/// One-line rendering of a contact: `[2] AL Ada Lovelace <ada@example.com>`.
pub fn contact_line(contact: &Contact) -> String {
    let mut line = format!("[{}] {:<2} {}", contact.id, contact.initials(), contact.name);
    if !contact.mail.is_empty() {
        line.push_str(&format!(" <{}>", contact.mail));
    }
    if !contact.phone.is_empty() {
        line.push_str(&format!(" {}", contact.phone));
    }
    line
}
