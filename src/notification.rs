//! The per-request notification record and its status line.

use std::fmt;

/// Job id and execution time extracted from one inbound notification.
///
/// Built once per request and dropped when the request completes. Absent
/// values are empty strings, never errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationRecord {
    pub job_id: String,
    pub executed_at: String,
}

impl NotificationRecord {
    pub fn new(job_id: impl Into<String>, executed_at: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            executed_at: executed_at.into(),
        }
    }

    /// The line written to the log sink for this notification.
    pub fn status_line(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for NotificationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cloud Scheduler executed a job (id: {}) at {}",
            self.job_id, self.executed_at
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_line_with_both_fields() {
        let record = NotificationRecord::new("abc123", "2024-01-01T00:00:00Z");
        assert_eq!(
            record.status_line(),
            "Cloud Scheduler executed a job (id: abc123) at 2024-01-01T00:00:00Z"
        );
    }

    #[test]
    fn test_status_line_with_missing_fields() {
        let record = NotificationRecord::default();
        assert_eq!(
            record.status_line(),
            "Cloud Scheduler executed a job (id: ) at "
        );
    }

    #[test]
    fn test_status_line_keeps_values_verbatim() {
        let record = NotificationRecord::new("Job (A)", " at ");
        assert_eq!(
            record.status_line(),
            "Cloud Scheduler executed a job (id: Job (A)) at  at "
        );
    }
}
