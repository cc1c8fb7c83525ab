//! Rank keys and job orderings.

use std::cmp::Ordering;

use chrono::NaiveDateTime;

use crate::models::{BoardJob, Job, JobStatus, Priority};

/// Rank given to priorities and statuses the board does not recognise.
pub const UNKNOWN_RANK: u8 = 3;

/// Urgent=0, Soon=1, Routine=2, anything else sorts last.
pub fn priority_rank(priority: &Priority) -> u8 {
    match priority {
        Priority::Urgent => 0,
        Priority::Soon => 1,
        Priority::Routine => 2,
        Priority::Other(_) => UNKNOWN_RANK,
    }
}

/// Open=0, In Progress=1, Done=2, anything else sorts last.
pub fn status_rank(status: &JobStatus) -> u8 {
    match status {
        JobStatus::Open => 0,
        JobStatus::InProgress => 1,
        JobStatus::Done => 2,
        JobStatus::Other(_) => UNKNOWN_RANK,
    }
}

/// Absent due times sort after every present one.
fn cmp_due(a: Option<NaiveDateTime>, b: Option<NaiveDateTime>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Order within a board bucket: status, priority, due time, id.
pub fn board_order(a: &BoardJob, b: &BoardJob) -> Ordering {
    status_rank(&a.job.status)
        .cmp(&status_rank(&b.job.status))
        .then_with(|| priority_rank(&a.job.priority).cmp(&priority_rank(&b.job.priority)))
        .then_with(|| cmp_due(a.job.due_time, b.job.due_time))
        .then_with(|| a.job.id.cmp(&b.job.id))
}

/// Order on the patient detail page: priority, then creation time.
pub fn detail_order(a: &Job, b: &Job) -> Ordering {
    priority_rank(&a.priority)
        .cmp(&priority_rank(&b.priority))
        .then_with(|| a.created_at.cmp(&b.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

/// Order within a status column: priority, then due time.
pub fn status_column_order(a: &BoardJob, b: &BoardJob) -> Ordering {
    priority_rank(&a.job.priority)
        .cmp(&priority_rank(&b.job.priority))
        .then_with(|| cmp_due(a.job.due_time, b.job.due_time))
        .then_with(|| a.job.id.cmp(&b.job.id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_ranks() {
        assert_eq!(priority_rank(&Priority::Urgent), 0);
        assert_eq!(priority_rank(&Priority::Soon), 1);
        assert_eq!(priority_rank(&Priority::Routine), 2);
        assert_eq!(priority_rank(&Priority::Other("STAT".into())), UNKNOWN_RANK);
    }

    #[test]
    fn test_status_ranks() {
        assert_eq!(status_rank(&JobStatus::Open), 0);
        assert_eq!(status_rank(&JobStatus::InProgress), 1);
        assert_eq!(status_rank(&JobStatus::Done), 2);
        assert_eq!(status_rank(&JobStatus::Other("Blocked".into())), UNKNOWN_RANK);
    }

    #[test]
    fn test_absent_due_sorts_last() {
        let t = chrono::NaiveDate::from_ymd_opt(2024, 6, 10)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        assert_eq!(cmp_due(Some(t), None), Ordering::Less);
        assert_eq!(cmp_due(None, Some(t)), Ordering::Greater);
        assert_eq!(cmp_due(None, None), Ordering::Equal);
    }
}
