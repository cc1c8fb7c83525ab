//! View assembly.
//!
//! Each view is built from the current store contents plus explicit request
//! parameters (selected patient, filters, today's date). Nothing is cached
//! between calls, so a view always reflects the latest writes.

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::board::{self, BoardGroup, BoardMetrics, JobFilter, StatusColumn};
use crate::db::{Database, DbResult, TableCounts};
use crate::models::{Job, Patient, PatientChoice, PatientQuery, PatientSummary, ProgressNote};

/// A patient list row with derived age.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientRow {
    #[serde(flatten)]
    pub summary: PatientSummary,
    pub age: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientListView {
    pub rows: Vec<PatientRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientDetailView {
    pub patient: Patient,
    pub age: Option<u32>,
    /// Newest first
    pub notes: Vec<ProgressNote>,
    /// Priority, then creation order
    pub jobs: Vec<Job>,
}

/// Choices for the board's patient and assignee dropdowns.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BoardFilterOptions {
    pub patients: Vec<String>,
    pub assignees: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobsBoardView {
    /// Jobs in the store before filtering
    pub total_jobs: usize,
    pub metrics: BoardMetrics,
    pub groups: Vec<BoardGroup>,
    pub options: BoardFilterOptions,
}

impl JobsBoardView {
    /// Number of jobs left after filtering.
    pub fn shown_jobs(&self) -> usize {
        self.groups.iter().map(|g| g.jobs.len()).sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdminView {
    /// `None` for in-memory stores
    pub db_path: Option<PathBuf>,
    pub counts: TableCounts,
}

/// Builds presentation views from the store.
pub struct ViewAssembler<'a> {
    db: &'a Database,
}

impl<'a> ViewAssembler<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub fn patient_list(&self, query: &PatientQuery, today: NaiveDate) -> DbResult<PatientListView> {
        let rows = self
            .db
            .list_patients(query)?
            .into_iter()
            .map(|summary| PatientRow {
                age: crate::models::age_on(summary.date_of_birth, today),
                summary,
            })
            .collect();
        Ok(PatientListView { rows })
    }

    /// Picker shown when no patient is selected.
    pub fn patient_picker(&self) -> DbResult<Vec<PatientChoice>> {
        self.db.patient_choices()
    }

    /// Detail page for the selected patient; `NotFound` if it does not exist.
    pub fn patient_detail(&self, patient_id: i64, today: NaiveDate) -> DbResult<PatientDetailView> {
        let patient = self.db.require_patient(patient_id)?;
        let notes = self.db.list_notes_for_patient(patient_id)?;
        let jobs = self.db.list_jobs_for_patient(patient_id)?;
        Ok(PatientDetailView {
            age: patient.age_on(today),
            patient,
            notes,
            jobs,
        })
    }

    /// The date-bucketed jobs board.
    ///
    /// Dropdown options come from the unfiltered job set so a filter can
    /// always be widened again.
    pub fn jobs_board(&self, filter: &JobFilter, today: NaiveDate) -> DbResult<JobsBoardView> {
        let jobs = self.db.list_all_jobs_with_patient()?;
        let total_jobs = jobs.len();
        let (patients, assignees) = board::filter_options(&jobs);

        let filtered = filter.apply(jobs, today);
        let metrics = board::summarize(&filtered, today);
        let groups = board::group_by_bucket(filtered, today);

        Ok(JobsBoardView {
            total_jobs,
            metrics,
            groups,
            options: BoardFilterOptions {
                patients,
                assignees,
            },
        })
    }

    /// The simpler three-column board (Open / In Progress / Done).
    pub fn status_board(&self) -> DbResult<Vec<StatusColumn>> {
        Ok(board::group_by_status(self.db.list_all_jobs_with_patient()?))
    }

    pub fn admin(&self) -> DbResult<AdminView> {
        Ok(AdminView {
            db_path: self.db.path().map(|p| p.to_path_buf()),
            counts: self.db.table_counts()?,
        })
    }
}
