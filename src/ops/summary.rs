use chrono::NaiveDate;

use crate::model::task::{Priority, Status, Task};

/// Aggregated board metrics for the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SummaryStats {
    pub todo: usize,
    pub in_progress: usize,
    pub await_feedback: usize,
    pub done: usize,
    pub urgent: usize,
    pub total: usize,
}

impl SummaryStats {
    /// Everything still on the board, i.e. not done.
    pub fn open(&self) -> usize {
        self.total - self.done
    }
}

pub fn summarize(tasks: &[Task]) -> SummaryStats {
    let mut stats = SummaryStats::default();
    for task in tasks {
        stats.total += 1;
        match task.status {
            Status::ToDo => stats.todo += 1,
            Status::InProgress => stats.in_progress += 1,
            Status::AwaitFeedback => stats.await_feedback += 1,
            Status::Done => stats.done += 1,
        }
        if task.priority == Some(Priority::Urgent) {
            stats.urgent += 1;
        }
    }
    stats
}

/// The next deadline on the board.
#[derive(Debug, Clone, PartialEq)]
pub struct Deadline {
    pub date: NaiveDate,
    /// The tasks due that day, reduced to the most urgent priority bucket
    /// that is populated (urgent, then medium, then low, then unset).
    pub tasks: Vec<Task>,
    pub priority: Option<Priority>,
}

/// Find the earliest due date strictly after `today`, together with the
/// most urgent tasks due then. No future-dated task → None.
pub fn upcoming_deadline(tasks: &[Task], today: NaiveDate) -> Option<Deadline> {
    let date = tasks
        .iter()
        .filter_map(|t| t.date)
        .filter(|d| *d > today)
        .min()?;

    let due: Vec<&Task> = tasks.iter().filter(|t| t.date == Some(date)).collect();
    for priority in [Priority::Urgent, Priority::Medium, Priority::Low] {
        let bucket: Vec<Task> = due
            .iter()
            .filter(|t| t.priority == Some(priority))
            .map(|t| (*t).clone())
            .collect();
        if !bucket.is_empty() {
            return Some(Deadline {
                date,
                tasks: bucket,
                priority: Some(priority),
            });
        }
    }
    Some(Deadline {
        date,
        tasks: due.into_iter().cloned().collect(),
        priority: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 7).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn task(title: &str, status: Status, priority: Option<Priority>, due: Option<NaiveDate>) -> Task {
        let mut t = Task::new(title);
        t.status = status;
        t.priority = priority;
        t.date = due;
        t
    }

    #[test]
    fn summarize_counts_by_status_and_urgency() {
        let tasks = vec![
            task("a", Status::ToDo, Some(Priority::Urgent), None),
            task("b", Status::ToDo, None, None),
            task("c", Status::InProgress, Some(Priority::Medium), None),
            task("d", Status::Done, Some(Priority::Urgent), None),
        ];
        let stats = summarize(&tasks);
        assert_eq!(stats.todo, 2);
        assert_eq!(stats.in_progress, 1);
        assert_eq!(stats.await_feedback, 0);
        assert_eq!(stats.done, 1);
        assert_eq!(stats.urgent, 2);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.open(), 3);
    }

    #[test]
    fn no_future_date_means_no_deadline() {
        let tasks = vec![
            task("overdue", Status::ToDo, None, Some(date(2026, 8, 1))),
            task("today", Status::ToDo, None, Some(today())),
            task("dateless", Status::ToDo, None, None),
        ];
        assert!(upcoming_deadline(&tasks, today()).is_none());
    }

    #[test]
    fn earliest_future_date_wins() {
        let tasks = vec![
            task("later", Status::ToDo, None, Some(date(2026, 9, 1))),
            task("sooner", Status::ToDo, None, Some(date(2026, 8, 10))),
        ];
        let deadline = upcoming_deadline(&tasks, today()).unwrap();
        assert_eq!(deadline.date, date(2026, 8, 10));
        assert_eq!(deadline.tasks.len(), 1);
        assert_eq!(deadline.tasks[0].title, "sooner");
    }

    #[test]
    fn highest_priority_bucket_selected() {
        let d = date(2026, 8, 10);
        let tasks = vec![
            task("low", Status::ToDo, Some(Priority::Low), Some(d)),
            task("urgent", Status::ToDo, Some(Priority::Urgent), Some(d)),
            task("medium", Status::InProgress, Some(Priority::Medium), Some(d)),
        ];
        let deadline = upcoming_deadline(&tasks, today()).unwrap();
        assert_eq!(deadline.priority, Some(Priority::Urgent));
        assert_eq!(deadline.tasks.len(), 1);
        assert_eq!(deadline.tasks[0].title, "urgent");
    }

    #[test]
    fn unprioritized_bucket_as_fallback() {
        let d = date(2026, 8, 10);
        let tasks = vec![
            task("one", Status::ToDo, None, Some(d)),
            task("two", Status::ToDo, None, Some(d)),
        ];
        let deadline = upcoming_deadline(&tasks, today()).unwrap();
        assert_eq!(deadline.priority, None);
        assert_eq!(deadline.tasks.len(), 2);
    }
}
