//! Jobs board classification and ranking.
//!
//! Everything here is a pure function of the jobs passed in and the date
//! treated as "today". Nothing touches the database.

mod bucket;
mod due;
mod filter;
mod rank;

pub use bucket::*;
pub use due::*;
pub use filter::*;
pub use rank::*;

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{BoardJob, JobStatus};

/// One due-date section of the board.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoardGroup {
    pub bucket: DateBucket,
    pub label: String,
    pub jobs: Vec<BoardJob>,
}

/// Counters shown above the board.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BoardMetrics {
    /// Status is anything but Done
    pub open: u32,
    pub in_progress: u32,
    pub done: u32,
    /// Dated before today and not Done
    pub overdue: u32,
}

/// A column of the by-status board.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusColumn {
    pub status: JobStatus,
    pub jobs: Vec<BoardJob>,
}

/// Partition jobs into non-empty buckets in display order, each sorted
/// with [`board_order`].
pub fn group_by_bucket(jobs: Vec<BoardJob>, today: NaiveDate) -> Vec<BoardGroup> {
    let mut buckets: BTreeMap<DateBucket, Vec<BoardJob>> = BTreeMap::new();
    for job in jobs {
        let bucket = DateBucket::classify(job.job.due_date(), today);
        buckets.entry(bucket).or_default().push(job);
    }

    buckets
        .into_iter()
        .map(|(bucket, mut jobs)| {
            jobs.sort_by(board_order);
            BoardGroup {
                bucket,
                label: bucket.label().to_string(),
                jobs,
            }
        })
        .collect()
}

/// Compute board counters over an already filtered job set.
pub fn summarize(jobs: &[BoardJob], today: NaiveDate) -> BoardMetrics {
    let mut metrics = BoardMetrics::default();
    for job in jobs {
        let status = &job.job.status;
        if *status != JobStatus::Done {
            metrics.open += 1;
            if job.job.due_date().is_some_and(|d| d < today) {
                metrics.overdue += 1;
            }
        }
        match status {
            JobStatus::InProgress => metrics.in_progress += 1,
            JobStatus::Done => metrics.done += 1,
            _ => {}
        }
    }
    metrics
}

/// Three fixed columns (Open, In Progress, Done), each sorted with
/// [`status_column_order`]. Jobs with unrecognised statuses are left out.
pub fn group_by_status(jobs: Vec<BoardJob>) -> Vec<StatusColumn> {
    let mut columns: Vec<StatusColumn> = JobStatus::ALL
        .into_iter()
        .map(|status| StatusColumn {
            status,
            jobs: Vec::new(),
        })
        .collect();

    for job in jobs {
        if let Some(column) = columns.iter_mut().find(|c| c.status == job.job.status) {
            column.jobs.push(job);
        }
    }
    for column in &mut columns {
        column.jobs.sort_by(status_column_order);
    }
    columns
}

/// Sorted distinct patient names and non-blank assignees, for the filter dropdowns.
pub fn filter_options(jobs: &[BoardJob]) -> (Vec<String>, Vec<String>) {
    let mut patients: Vec<String> = jobs.iter().map(|j| j.patient_name.clone()).collect();
    patients.sort();
    patients.dedup();

    let mut assignees: Vec<String> = jobs
        .iter()
        .filter_map(|j| j.job.assigned_to.as_deref())
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_string)
        .collect();
    assignees.sort();
    assignees.dedup();

    (patients, assignees)
}
