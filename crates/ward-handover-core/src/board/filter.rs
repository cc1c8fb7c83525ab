//! Jobs board filters.
//!
//! A [`JobFilter`] holds the dropdown/search state of the board. It resolves
//! into a list of independent [`Criterion`]s; a job passes when every active
//! criterion passes, so the order criteria are applied in never matters.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{BoardJob, JobStatus, Priority};

/// Date filter mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateFilter {
    #[default]
    AllDates,
    Today,
    Tomorrow,
    On(NaiveDate),
}

impl DateFilter {
    /// The due date this mode selects, if any.
    pub fn resolve(&self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            DateFilter::AllDates => None,
            DateFilter::Today => Some(today),
            DateFilter::Tomorrow => today.checked_add_days(Days::new(1)),
            DateFilter::On(date) => Some(*date),
        }
    }
}

/// Board filter state. `None` (or blank text) means "All".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobFilter {
    pub status: Option<JobStatus>,
    pub priority: Option<Priority>,
    /// Exact patient name, compared case-insensitively
    pub patient: Option<String>,
    /// Exact assignee, compared case-insensitively
    pub assignee: Option<String>,
    /// Substring of job text, patient name or hospital number
    pub text: Option<String>,
    pub date: DateFilter,
}

impl JobFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: JobStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn patient(mut self, name: impl Into<String>) -> Self {
        self.patient = Some(name.into());
        self
    }

    pub fn assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn date(mut self, date: DateFilter) -> Self {
        self.date = date;
        self
    }

    /// Active criteria for the given day.
    pub fn criteria(&self, today: NaiveDate) -> Vec<Criterion> {
        let mut criteria = Vec::new();
        if let Some(status) = &self.status {
            criteria.push(Criterion::Status(status.clone()));
        }
        if let Some(priority) = &self.priority {
            criteria.push(Criterion::Priority(priority.clone()));
        }
        if let Some(patient) = active_text(self.patient.as_deref()) {
            criteria.push(Criterion::Patient(patient));
        }
        if let Some(assignee) = active_text(self.assignee.as_deref()) {
            criteria.push(Criterion::Assignee(assignee));
        }
        if let Some(text) = active_text(self.text.as_deref()) {
            criteria.push(Criterion::Text(text));
        }
        if let Some(date) = self.date.resolve(today) {
            criteria.push(Criterion::DueOn(date));
        }
        criteria
    }

    pub fn matches(&self, job: &BoardJob, today: NaiveDate) -> bool {
        let criteria = self.criteria(today);
        criteria.iter().all(|c| c.matches(job))
    }

    /// Jobs passing the filter, in their original order.
    pub fn apply(&self, jobs: Vec<BoardJob>, today: NaiveDate) -> Vec<BoardJob> {
        apply_criteria(jobs, &self.criteria(today))
    }
}

/// A single active filter condition. Text criteria are stored lowercased.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Criterion {
    Status(JobStatus),
    Priority(Priority),
    Patient(String),
    Assignee(String),
    Text(String),
    DueOn(NaiveDate),
}

impl Criterion {
    pub fn matches(&self, job: &BoardJob) -> bool {
        match self {
            Criterion::Status(status) => &job.job.status == status,
            Criterion::Priority(priority) => &job.job.priority == priority,
            Criterion::Patient(name) => job.patient_name.to_lowercase() == *name,
            Criterion::Assignee(assignee) => job
                .job
                .assigned_to
                .as_deref()
                .is_some_and(|a| a.to_lowercase() == *assignee),
            Criterion::Text(needle) => {
                job.job.job_text.to_lowercase().contains(needle.as_str())
                    || job.patient_name.to_lowercase().contains(needle.as_str())
                    || job.hospital_number.to_lowercase().contains(needle.as_str())
            }
            Criterion::DueOn(date) => job.job.due_date() == Some(*date),
        }
    }
}

/// Keep the jobs that pass every criterion.
pub fn apply_criteria(jobs: Vec<BoardJob>, criteria: &[Criterion]) -> Vec<BoardJob> {
    jobs.into_iter()
        .filter(|job| criteria.iter().all(|c| c.matches(job)))
        .collect()
}

fn active_text(s: Option<&str>) -> Option<String> {
    s.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
}
