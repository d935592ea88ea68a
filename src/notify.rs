//! Due-date reminders.
//!
//! A reminder scan walks the current collection and fires one
//! notification per open task whose due date has arrived. Delivery is
//! behind the `Notifier` trait; the scan never looks at the result.

use chrono::NaiveDate;

use crate::task::Task;

/// Fire-and-forget notification sink.
pub trait Notifier {
    fn show(&self, title: &str, body: &str);
}

/// Prints notifications to stdout, standing in for a desktop
/// notification service.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn show(&self, title: &str, body: &str) {
        println!("[{title}] {body}");
    }
}

/// Notify for every incomplete task due on or before `today`.
pub fn check_due_reminders(tasks: &[Task], today: NaiveDate, notifier: &dyn Notifier) {
    for task in tasks {
        let Some(due) = task.due_date else { continue };
        if task.completed || due > today {
            continue;
        }
        let status = if due < today { "overdue" } else { "due today" };
        notifier.show(
            &format!("Task {status}!"),
            &format!("\"{}\" is {status}.", task.text),
        );
    }
}
