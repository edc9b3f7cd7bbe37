use std::sync::mpsc;

use crate::model::message::{Toast, ToastKind};

/// Fan-in channel for toast messages.
///
/// Anything that wants to notify the user holds a [`NotifyHandle`] and
/// fires into it; the UI drains the receiving end once per tick and owns
/// presentation (styling, timeout).
#[derive(Debug)]
pub struct Notifier {
    tx: mpsc::Sender<Toast>,
    rx: mpsc::Receiver<Toast>,
}

/// Cloneable sending side of a [`Notifier`].
#[derive(Debug, Clone)]
pub struct NotifyHandle {
    tx: mpsc::Sender<Toast>,
}

impl NotifyHandle {
    pub fn success(&self, text: impl Into<String>) {
        let _ = self.tx.send(Toast::success(text));
    }

    pub fn error(&self, text: impl Into<String>) {
        let _ = self.tx.send(Toast::error(text));
    }
}

impl Notifier {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Notifier { tx, rx }
    }

    pub fn handle(&self) -> NotifyHandle {
        NotifyHandle {
            tx: self.tx.clone(),
        }
    }

    /// All toasts queued since the last drain, oldest first.
    pub fn drain(&self) -> Vec<Toast> {
        let mut toasts = Vec::new();
        while let Ok(toast) = self.rx.try_recv() {
            toasts.push(toast);
        }
        toasts
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Notifier::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toasts_arrive_in_order() {
        let notifier = Notifier::new();
        let handle = notifier.handle();
        handle.success("saved");
        handle.error("write failed");

        let toasts = notifier.drain();
        assert_eq!(toasts.len(), 2);
        assert_eq!(toasts[0].kind, ToastKind::Success);
        assert_eq!(toasts[0].text, "saved");
        assert_eq!(toasts[1].kind, ToastKind::Error);
    }

    #[test]
    fn drain_empties_the_queue() {
        let notifier = Notifier::new();
        notifier.handle().success("once");
        assert_eq!(notifier.drain().len(), 1);
        assert!(notifier.drain().is_empty());
    }

    #[test]
    fn handles_are_independent_clones() {
        let notifier = Notifier::new();
        let a = notifier.handle();
        let b = a.clone();
        a.success("from a");
        b.success("from b");
        assert_eq!(notifier.drain().len(), 2);
    }
}
