//! Job models and the job status workflow.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Display/storage format for due times.
pub const DUE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Job priority.
///
/// Stored as text; values written by older tools that match none of the
/// known priorities are kept verbatim in `Other` so they can still be listed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Priority {
    Urgent,
    Soon,
    #[default]
    Routine,
    Other(String),
}

impl Priority {
    /// The priorities offered by the editor, most pressing first.
    pub const ALL: [Priority; 3] = [Priority::Urgent, Priority::Soon, Priority::Routine];

    pub fn as_str(&self) -> &str {
        match self {
            Priority::Urgent => "Urgent",
            Priority::Soon => "Soon",
            Priority::Routine => "Routine",
            Priority::Other(s) => s,
        }
    }

    /// Strict parse for user input: only the three editor values.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == s)
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Priority::Other(_))
    }
}

impl From<&str> for Priority {
    fn from(s: &str) -> Self {
        match s {
            "Urgent" => Priority::Urgent,
            "Soon" => Priority::Soon,
            "Routine" => Priority::Routine,
            other => Priority::Other(other.to_string()),
        }
    }
}

impl From<String> for Priority {
    fn from(s: String) -> Self {
        Priority::from(s.as_str())
    }
}

impl From<Priority> for String {
    fn from(p: Priority) -> Self {
        p.as_str().to_string()
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Job status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobStatus {
    #[default]
    Open,
    InProgress,
    Done,
    Other(String),
}

impl JobStatus {
    pub const ALL: [JobStatus; 3] = [JobStatus::Open, JobStatus::InProgress, JobStatus::Done];

    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::Open => "Open",
            JobStatus::InProgress => "In Progress",
            JobStatus::Done => "Done",
            JobStatus::Other(s) => s,
        }
    }

    /// Strict parse for user input: only Open, In Progress and Done.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|st| st.as_str() == s)
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, JobStatus::Other(_))
    }

    /// Board quick actions available from this status.
    ///
    /// Only forward moves are offered here; the detail editor can set any status.
    pub fn quick_actions(&self) -> Vec<JobAction> {
        match self {
            JobStatus::Open | JobStatus::Other(_) => vec![JobAction::Start, JobAction::Complete],
            JobStatus::InProgress => vec![JobAction::Complete],
            JobStatus::Done => Vec::new(),
        }
    }
}

impl From<&str> for JobStatus {
    fn from(s: &str) -> Self {
        match s {
            "Open" => JobStatus::Open,
            "In Progress" => JobStatus::InProgress,
            "Done" => JobStatus::Done,
            other => JobStatus::Other(other.to_string()),
        }
    }
}

impl From<String> for JobStatus {
    fn from(s: String) -> Self {
        JobStatus::from(s.as_str())
    }
}

impl From<JobStatus> for String {
    fn from(s: JobStatus) -> Self {
        s.as_str().to_string()
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Board quick action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobAction {
    /// Open → In Progress
    Start,
    /// Open / In Progress → Done
    Complete,
}

impl JobAction {
    pub fn target_status(&self) -> JobStatus {
        match self {
            JobAction::Start => JobStatus::InProgress,
            JobAction::Complete => JobStatus::Done,
        }
    }
}

/// A task tied to a patient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Job {
    pub id: i64,
    pub patient_id: i64,
    pub job_text: String,
    pub priority: Priority,
    pub status: JobStatus,
    pub due_time: Option<NaiveDateTime>,
    pub assigned_to: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Job {
    pub fn due_date(&self) -> Option<NaiveDate> {
        self.due_time.map(|dt| dt.date())
    }

    /// Due time as `YYYY-MM-DD HH:MM`, empty when absent.
    pub fn due_display(&self) -> String {
        self.due_time
            .map(|dt| dt.format(DUE_TIME_FORMAT).to_string())
            .unwrap_or_default()
    }

    pub fn is_done(&self) -> bool {
        self.status == JobStatus::Done
    }

    pub fn quick_actions(&self) -> Vec<JobAction> {
        self.status.quick_actions()
    }
}

/// A job to be added to a patient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewJob {
    pub patient_id: i64,
    pub job_text: String,
    pub priority: Priority,
    pub assigned_to: Option<String>,
    pub due_time: Option<NaiveDateTime>,
}

impl NewJob {
    pub fn new(patient_id: i64, job_text: impl Into<String>) -> Self {
        Self {
            patient_id,
            job_text: job_text.into(),
            priority: Priority::Routine,
            assigned_to: None,
            due_time: None,
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn assigned_to(mut self, assignee: impl Into<String>) -> Self {
        self.assigned_to = Some(assignee.into());
        self
    }

    pub fn due(mut self, due_time: NaiveDateTime) -> Self {
        self.due_time = Some(due_time);
        self
    }
}

/// In-place edit of a job. `None` leaves a field untouched; for the optional
/// fields `Some(None)` clears the value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct JobUpdate {
    pub status: Option<JobStatus>,
    pub priority: Option<Priority>,
    pub assigned_to: Option<Option<String>>,
    pub due_time: Option<Option<NaiveDateTime>>,
}

impl JobUpdate {
    pub fn status(status: JobStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Apply this update to a job in memory.
    pub fn apply_to(&self, job: &mut Job) {
        if let Some(status) = &self.status {
            job.status = status.clone();
        }
        if let Some(priority) = &self.priority {
            job.priority = priority.clone();
        }
        if let Some(assigned_to) = &self.assigned_to {
            job.assigned_to = super::non_blank(assigned_to.as_deref());
        }
        if let Some(due_time) = self.due_time {
            job.due_time = due_time;
        }
    }
}

/// A job joined with its owning patient, as shown on the board.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoardJob {
    #[serde(flatten)]
    pub job: Job,
    pub patient_name: String,
    pub hospital_number: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_round_trips_known_and_unknown() {
        assert_eq!(Priority::from("Urgent"), Priority::Urgent);
        assert_eq!(Priority::from("STAT"), Priority::Other("STAT".into()));
        assert_eq!(Priority::from("STAT").as_str(), "STAT");
        assert_eq!(Priority::default(), Priority::Routine);
    }

    #[test]
    fn test_status_text() {
        assert_eq!(JobStatus::InProgress.as_str(), "In Progress");
        assert_eq!(JobStatus::from("In Progress"), JobStatus::InProgress);
        assert_eq!(JobStatus::default(), JobStatus::Open);
    }

    #[test]
    fn test_strict_parse_rejects_unknown_text() {
        assert_eq!(JobStatus::parse("In Progress"), Some(JobStatus::InProgress));
        assert_eq!(JobStatus::parse("done"), None);
        assert_eq!(JobStatus::parse("Blocked"), None);
        assert_eq!(Priority::parse("Soon"), Some(Priority::Soon));
        assert_eq!(Priority::parse("urgent"), None);
        assert!(!Priority::from("STAT").is_known());
        assert!(JobStatus::Done.is_known());
    }

    #[test]
    fn test_quick_actions_are_forward_only() {
        assert_eq!(
            JobStatus::Open.quick_actions(),
            vec![JobAction::Start, JobAction::Complete]
        );
        assert_eq!(JobStatus::InProgress.quick_actions(), vec![JobAction::Complete]);
        assert!(JobStatus::Done.quick_actions().is_empty());
    }

    #[test]
    fn test_status_serializes_as_text() {
        let json = serde_json::to_string(&JobStatus::InProgress).unwrap();
        assert_eq!(json, "\"In Progress\"");
        let back: JobStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, JobStatus::InProgress);
    }

    #[test]
    fn test_update_apply_clears_blank_assignee() {
        let now = chrono::Utc::now().naive_utc();
        let mut job = Job {
            id: 1,
            patient_id: 1,
            job_text: "Chase bloods".into(),
            priority: Priority::Routine,
            status: JobStatus::Open,
            due_time: Some(now),
            assigned_to: Some("SHO".into()),
            created_at: now,
            updated_at: now,
        };

        let update = JobUpdate {
            status: Some(JobStatus::Done),
            assigned_to: Some(Some("  ".into())),
            due_time: Some(None),
            ..JobUpdate::default()
        };
        update.apply_to(&mut job);

        assert!(job.is_done());
        assert_eq!(job.assigned_to, None);
        assert_eq!(job.due_time, None);
        assert_eq!(job.priority, Priority::Routine);
    }
}
