//! Ward Handover Core Library
//!
//! Local-first handover tracker for a clinical ward: admitted patients,
//! their progress notes, and the outstanding jobs the team must complete.
//!
//! # Architecture
//!
//! ```text
//!        Front-end (mobile / desktop / CLI)
//!                      │
//!          login ──► AuthGate ──► session token
//!                      │
//!     ┌────────────────┼──────────────────────┐
//!     │                │                      │
//!     ▼                ▼                      ▼
//!  Records         ViewAssembler          Admin (unlocked)
//!  create / add    list / detail /        counts, checkpoint,
//!  update          jobs board             CSV export, copy
//!     │                │                      │
//!     │         ┌──────▼───────┐              │
//!     │         │    board     │              │
//!     │         │ bucket, rank │              │
//!     │         │ filter, due  │              │
//!     │         └──────────────┘              │
//!     └────────────────┬──────────────────────┘
//!                      ▼
//!              SQLite (WAL mode)
//!       patients ─┬─ progress_notes
//!                 └─ jobs
//! ```
//!
//! # Modules
//!
//! - [`db`]: SQLite store and record repository
//! - [`models`]: Patient, ProgressNote, Job and their input forms
//! - [`board`]: Due-date buckets, ranking and filters for the jobs board
//! - [`views`]: Presentation views assembled from the store
//! - [`export`]: CSV export of the raw tables
//! - [`auth`]: Shared-credential login and admin unlock
//! - [`config`]: Environment configuration

pub mod auth;
pub mod board;
pub mod config;
pub mod db;
pub mod export;
pub mod models;
pub mod views;

// Re-export commonly used types
pub use auth::{AuthError, AuthGate};
pub use board::{BoardGroup, BoardMetrics, DateBucket, DateFilter, JobFilter, StatusColumn};
pub use config::HandoverConfig;
pub use db::{Database, DbError, TableCounts};
pub use export::{CsvExporter, ExportTable};
pub use models::{
    BoardJob, Job, JobAction, JobStatus, JobUpdate, NewJob, NewNote, NewPatient, Patient,
    PatientQuery, PatientSort, Priority, ProgressNote,
};
pub use views::ViewAssembler;

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

use chrono::{Local, NaiveDate, NaiveDateTime};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum WardHandoverError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

impl From<db::DbError> for WardHandoverError {
    fn from(e: db::DbError) -> Self {
        match e {
            DbError::NotFound(msg) => WardHandoverError::NotFound(msg),
            DbError::Constraint(msg) => WardHandoverError::ConstraintViolation(msg),
            DbError::Validation(msg) => WardHandoverError::ValidationError(msg),
            other => WardHandoverError::DatabaseError(other.to_string()),
        }
    }
}

impl From<auth::AuthError> for WardHandoverError {
    fn from(e: auth::AuthError) -> Self {
        WardHandoverError::Unauthorized(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for WardHandoverError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        WardHandoverError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a store at the given path with the given credentials.
#[uniffi::export]
pub fn open_store(
    path: String,
    username: String,
    password: String,
    admin_password: String,
) -> Result<Arc<WardHandoverCore>, WardHandoverError> {
    let config = HandoverConfig::new(path, username, &password, &admin_password);
    WardHandoverCore::with_config(&config)
}

/// Open the store described by the `WARD_HANDOVER_*` environment variables.
#[uniffi::export]
pub fn open_store_from_env() -> Result<Arc<WardHandoverCore>, WardHandoverError> {
    WardHandoverCore::with_config(&HandoverConfig::from_env())
}

/// Create an in-memory store (for testing).
#[uniffi::export]
pub fn open_store_in_memory(
    username: String,
    password: String,
    admin_password: String,
) -> Result<Arc<WardHandoverCore>, WardHandoverError> {
    let config = HandoverConfig::new(":memory:", username, &password, &admin_password);
    let db = Database::open_in_memory()?;
    Ok(Arc::new(WardHandoverCore::from_parts(db, AuthGate::new(&config))))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe store wrapper for FFI.
///
/// Every call except [`WardHandoverCore::login`] takes the session token
/// returned by `login`.
#[derive(uniffi::Object)]
pub struct WardHandoverCore {
    db: Arc<Mutex<Database>>,
    auth: Mutex<AuthGate>,
}

impl WardHandoverCore {
    pub fn with_config(config: &HandoverConfig) -> Result<Arc<Self>, WardHandoverError> {
        let db = Database::open(&config.db_path)?;
        Ok(Arc::new(Self::from_parts(db, AuthGate::new(config))))
    }

    fn from_parts(db: Database, auth: AuthGate) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            auth: Mutex::new(auth),
        }
    }

    fn check(&self, session_token: &str) -> Result<(), WardHandoverError> {
        self.auth.lock()?.require(session_token)?;
        Ok(())
    }

    fn check_admin(&self, session_token: &str) -> Result<(), WardHandoverError> {
        self.auth.lock()?.require_admin(session_token)?;
        Ok(())
    }
}

#[uniffi::export]
impl WardHandoverCore {
    // =========================================================================
    // Session
    // =========================================================================

    /// Log in with the shared credentials; returns a session token.
    pub fn login(&self, username: String, password: String) -> Result<String, WardHandoverError> {
        Ok(self.auth.lock()?.login(&username, &password)?)
    }

    pub fn logout(&self, session_token: String) -> Result<(), WardHandoverError> {
        self.auth.lock()?.logout(&session_token);
        Ok(())
    }

    /// Unlock the admin pages for this session.
    pub fn unlock_admin(
        &self,
        session_token: String,
        admin_password: String,
    ) -> Result<(), WardHandoverError> {
        self.auth
            .lock()?
            .unlock_admin(&session_token, &admin_password)?;
        Ok(())
    }

    // =========================================================================
    // Patient Operations
    // =========================================================================

    /// Admit a new patient.
    pub fn create_patient(
        &self,
        session_token: String,
        patient: FfiNewPatient,
    ) -> Result<FfiPatient, WardHandoverError> {
        self.check(&session_token)?;
        let new: NewPatient = patient.try_into()?;
        let db = self.db.lock()?;
        let created = db.create_patient(&new)?;
        Ok(FfiPatient::from_patient(created, today()))
    }

    /// Patient list with search, sort, limit and the open-jobs filter.
    pub fn list_patients(
        &self,
        session_token: String,
        query: FfiPatientQuery,
        today: Option<String>,
    ) -> Result<Vec<FfiPatientSummary>, WardHandoverError> {
        self.check(&session_token)?;
        let today = resolve_today(today)?;
        let db = self.db.lock()?;
        let view = ViewAssembler::new(&db).patient_list(&query.into(), today)?;
        Ok(view.rows.into_iter().map(Into::into).collect())
    }

    /// Entries for the patient picker, newest first.
    pub fn patient_choices(
        &self,
        session_token: String,
    ) -> Result<Vec<FfiPatientChoice>, WardHandoverError> {
        self.check(&session_token)?;
        let db = self.db.lock()?;
        let choices = ViewAssembler::new(&db).patient_picker()?;
        Ok(choices.into_iter().map(Into::into).collect())
    }

    /// Demographics, notes and jobs for one patient.
    pub fn patient_detail(
        &self,
        session_token: String,
        patient_id: i64,
        today: Option<String>,
    ) -> Result<FfiPatientDetail, WardHandoverError> {
        self.check(&session_token)?;
        let today = resolve_today(today)?;
        let db = self.db.lock()?;
        let view = ViewAssembler::new(&db).patient_detail(patient_id, today)?;
        Ok(FfiPatientDetail {
            patient: FfiPatient::from_patient(view.patient, today),
            notes: view.notes.into_iter().map(Into::into).collect(),
            jobs: view.jobs.into_iter().map(Into::into).collect(),
        })
    }

    // =========================================================================
    // Note Operations
    // =========================================================================

    /// Append a progress note. `note_time` defaults to now.
    pub fn add_note(
        &self,
        session_token: String,
        patient_id: i64,
        note: String,
        author: Option<String>,
        note_time: Option<String>,
    ) -> Result<FfiNote, WardHandoverError> {
        self.check(&session_token)?;
        let note_time = match note_time.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(s) => Some(board::parse_timestamp(s).ok_or_else(|| {
                WardHandoverError::ValidationError(format!("unrecognised note time: {s}"))
            })?),
            None => None,
        };
        let new = NewNote {
            patient_id,
            note,
            author,
            note_time,
        };
        let db = self.db.lock()?;
        Ok(db.add_note(&new)?.into())
    }

    // =========================================================================
    // Job Operations
    // =========================================================================

    /// Add a job. An unrecognised due time is stored as no due date.
    pub fn add_job(
        &self,
        session_token: String,
        patient_id: i64,
        job_text: String,
        priority: Option<String>,
        assigned_to: Option<String>,
        due_time: Option<String>,
    ) -> Result<FfiJob, WardHandoverError> {
        self.check(&session_token)?;
        let new = NewJob {
            patient_id,
            job_text,
            priority: priority
                .as_deref()
                .map(parse_priority)
                .transpose()?
                .unwrap_or_default(),
            assigned_to,
            due_time: board::parse_optional_due_time(due_time.as_deref()),
        };
        let db = self.db.lock()?;
        Ok(db.add_job(&new)?.into())
    }

    /// Edit status, priority, assignee or due time of a job.
    pub fn update_job(
        &self,
        session_token: String,
        job_id: i64,
        update: FfiJobUpdate,
    ) -> Result<FfiJob, WardHandoverError> {
        self.check(&session_token)?;
        let update = JobUpdate::try_from(update)?;
        let db = self.db.lock()?;
        Ok(db.update_job(job_id, &update)?.into())
    }

    /// Quick action: Open → In Progress.
    pub fn start_job(&self, session_token: String, job_id: i64) -> Result<FfiJob, WardHandoverError> {
        self.check(&session_token)?;
        let db = self.db.lock()?;
        Ok(db.apply_job_action(job_id, JobAction::Start)?.into())
    }

    /// Quick action: mark Done.
    pub fn complete_job(
        &self,
        session_token: String,
        job_id: i64,
    ) -> Result<FfiJob, WardHandoverError> {
        self.check(&session_token)?;
        let db = self.db.lock()?;
        Ok(db.apply_job_action(job_id, JobAction::Complete)?.into())
    }

    // =========================================================================
    // Boards
    // =========================================================================

    /// The date-bucketed jobs board.
    pub fn jobs_board(
        &self,
        session_token: String,
        filter: FfiJobFilter,
        today: Option<String>,
    ) -> Result<FfiJobsBoard, WardHandoverError> {
        self.check(&session_token)?;
        let today = resolve_today(today)?;
        let filter = JobFilter::try_from(filter)?;
        let db = self.db.lock()?;
        let view = ViewAssembler::new(&db).jobs_board(&filter, today)?;
        Ok(FfiJobsBoard {
            total_jobs: view.total_jobs as u64,
            shown_jobs: view.shown_jobs() as u64,
            metrics: view.metrics.into(),
            groups: view.groups.into_iter().map(Into::into).collect(),
            patient_options: view.options.patients,
            assignee_options: view.options.assignees,
        })
    }

    /// Jobs in Open / In Progress / Done columns.
    pub fn status_board(
        &self,
        session_token: String,
    ) -> Result<Vec<FfiStatusColumn>, WardHandoverError> {
        self.check(&session_token)?;
        let db = self.db.lock()?;
        let columns = ViewAssembler::new(&db).status_board()?;
        Ok(columns.into_iter().map(Into::into).collect())
    }

    // =========================================================================
    // Admin Operations (require unlock_admin)
    // =========================================================================

    pub fn admin_overview(&self, session_token: String) -> Result<FfiAdminView, WardHandoverError> {
        self.check_admin(&session_token)?;
        let db = self.db.lock()?;
        let view = ViewAssembler::new(&db).admin()?;
        Ok(FfiAdminView {
            db_path: view.db_path.map(|p| p.display().to_string()),
            patients: view.counts.patients,
            progress_notes: view.counts.progress_notes,
            jobs: view.counts.jobs,
        })
    }

    /// Flush the write-ahead log to the main database file.
    pub fn checkpoint(&self, session_token: String) -> Result<(), WardHandoverError> {
        self.check_admin(&session_token)?;
        let db = self.db.lock()?;
        Ok(db.checkpoint()?)
    }

    /// CSV text of a single table.
    pub fn export_table_csv(
        &self,
        session_token: String,
        table: FfiExportTable,
    ) -> Result<String, WardHandoverError> {
        self.check_admin(&session_token)?;
        let db = self.db.lock()?;
        let (csv, _) = CsvExporter::new(&db).table_csv(table.into())?;
        Ok(csv)
    }

    /// Write every table as CSV into `out_dir`.
    pub fn export_csv(
        &self,
        session_token: String,
        out_dir: String,
    ) -> Result<Vec<FfiExportedFile>, WardHandoverError> {
        self.check_admin(&session_token)?;
        let db = self.db.lock()?;
        let manifest = CsvExporter::new(&db).write_all(&out_dir)?;
        Ok(manifest
            .files
            .into_iter()
            .map(|f| FfiExportedFile {
                table: f.table.table_name().to_string(),
                path: f.path.display().to_string(),
                rows: f.rows as u64,
            })
            .collect())
    }

    /// Write a consistent copy of the store to `dest`.
    pub fn copy_store(&self, session_token: String, dest: String) -> Result<(), WardHandoverError> {
        self.check_admin(&session_token)?;
        let db = self.db.lock()?;
        Ok(db.copy_to(&dest)?)
    }
}

// =========================================================================
// Boundary helpers
// =========================================================================

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Explicit `YYYY-MM-DD`, or the local date when absent.
fn resolve_today(today_override: Option<String>) -> Result<NaiveDate, WardHandoverError> {
    match today_override {
        Some(s) => parse_date(&s),
        None => Ok(today()),
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, WardHandoverError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|_| WardHandoverError::ValidationError(format!("expected YYYY-MM-DD, got {s:?}")))
}

fn parse_status(s: &str) -> Result<JobStatus, WardHandoverError> {
    JobStatus::parse(s).ok_or_else(|| {
        WardHandoverError::ValidationError(format!(
            "status must be Open, In Progress or Done, got {s:?}"
        ))
    })
}

fn parse_priority(s: &str) -> Result<Priority, WardHandoverError> {
    Priority::parse(s).ok_or_else(|| {
        WardHandoverError::ValidationError(format!(
            "priority must be Urgent, Soon or Routine, got {s:?}"
        ))
    })
}

fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe add-patient form. Dates are `YYYY-MM-DD`.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiNewPatient {
    pub name: String,
    pub hospital_number: String,
    pub nhs_number: Option<String>,
    pub date_of_birth: String,
    pub reason_for_admission: String,
    pub pmh: Option<String>,
    pub psh: Option<String>,
    pub dh: Option<String>,
    /// `None` records NKDA
    pub allergies: Option<String>,
}

impl TryFrom<FfiNewPatient> for NewPatient {
    type Error = WardHandoverError;

    fn try_from(p: FfiNewPatient) -> Result<Self, Self::Error> {
        let mut new = NewPatient::new(
            p.name,
            p.hospital_number,
            parse_date(&p.date_of_birth)?,
            p.reason_for_admission,
        );
        new.nhs_number = p.nhs_number;
        new.pmh = p.pmh;
        new.psh = p.psh;
        new.dh = p.dh;
        if p.allergies.is_some() {
            new.allergies = p.allergies;
        }
        Ok(new)
    }
}

/// FFI-safe patient.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatient {
    pub id: i64,
    pub name: String,
    pub hospital_number: String,
    pub nhs_number: Option<String>,
    pub date_of_birth: String,
    pub age: Option<u32>,
    pub reason_for_admission: String,
    pub pmh: Option<String>,
    pub psh: Option<String>,
    pub dh: Option<String>,
    pub allergies: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl FfiPatient {
    fn from_patient(patient: Patient, today: NaiveDate) -> Self {
        Self {
            id: patient.id,
            age: patient.age_on(today),
            name: patient.name,
            hospital_number: patient.hospital_number,
            nhs_number: patient.nhs_number,
            date_of_birth: patient.date_of_birth.format(DATE_FORMAT).to_string(),
            reason_for_admission: patient.reason_for_admission,
            pmh: patient.pmh,
            psh: patient.psh,
            dh: patient.dh,
            allergies: patient.allergies,
            created_at: format_timestamp(patient.created_at),
            updated_at: format_timestamp(patient.updated_at),
        }
    }
}

#[derive(Debug, Clone, Copy, uniffi::Enum)]
pub enum FfiPatientSort {
    NewestFirst,
    NameAscending,
    HospitalNumberAscending,
}

impl From<FfiPatientSort> for PatientSort {
    fn from(sort: FfiPatientSort) -> Self {
        match sort {
            FfiPatientSort::NewestFirst => PatientSort::NewestFirst,
            FfiPatientSort::NameAscending => PatientSort::NameAscending,
            FfiPatientSort::HospitalNumberAscending => PatientSort::HospitalNumberAscending,
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatientQuery {
    pub search: String,
    pub sort: FfiPatientSort,
    pub limit: u32,
    pub only_with_open_jobs: bool,
}

impl From<FfiPatientQuery> for PatientQuery {
    fn from(q: FfiPatientQuery) -> Self {
        PatientQuery {
            search: q.search,
            sort: q.sort.into(),
            limit: q.limit,
            only_with_open_jobs: q.only_with_open_jobs,
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatientSummary {
    pub id: i64,
    pub name: String,
    pub hospital_number: String,
    pub nhs_number: Option<String>,
    pub date_of_birth: String,
    pub age: Option<u32>,
    pub reason_for_admission: String,
    pub open_job_count: u32,
    pub created_at: String,
}

impl From<views::PatientRow> for FfiPatientSummary {
    fn from(row: views::PatientRow) -> Self {
        let s = row.summary;
        Self {
            id: s.id,
            name: s.name,
            hospital_number: s.hospital_number,
            nhs_number: s.nhs_number,
            date_of_birth: s.date_of_birth.format(DATE_FORMAT).to_string(),
            age: row.age,
            reason_for_admission: s.reason_for_admission,
            open_job_count: s.open_job_count,
            created_at: format_timestamp(s.created_at),
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatientChoice {
    pub id: i64,
    pub name: String,
    pub hospital_number: String,
    pub label: String,
}

impl From<models::PatientChoice> for FfiPatientChoice {
    fn from(c: models::PatientChoice) -> Self {
        Self {
            label: c.label(),
            id: c.id,
            name: c.name,
            hospital_number: c.hospital_number,
        }
    }
}

/// FFI-safe progress note.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiNote {
    pub id: i64,
    pub patient_id: i64,
    pub note_time: String,
    pub note: String,
    pub author: Option<String>,
    pub created_at: String,
}

impl From<ProgressNote> for FfiNote {
    fn from(n: ProgressNote) -> Self {
        Self {
            id: n.id,
            patient_id: n.patient_id,
            note_time: format_timestamp(n.note_time),
            note: n.note,
            author: n.author,
            created_at: format_timestamp(n.created_at),
        }
    }
}

#[derive(Debug, Clone, Copy, uniffi::Enum)]
pub enum FfiJobAction {
    Start,
    Complete,
}

impl From<JobAction> for FfiJobAction {
    fn from(action: JobAction) -> Self {
        match action {
            JobAction::Start => FfiJobAction::Start,
            JobAction::Complete => FfiJobAction::Complete,
        }
    }
}

/// FFI-safe job. `due_time` is `YYYY-MM-DD HH:MM`.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiJob {
    pub id: i64,
    pub patient_id: i64,
    pub job_text: String,
    pub priority: String,
    pub status: String,
    pub due_time: Option<String>,
    pub assigned_to: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    /// Quick actions offered on the board
    pub actions: Vec<FfiJobAction>,
}

impl From<Job> for FfiJob {
    fn from(job: Job) -> Self {
        let due_time = job.due_time.map(|_| job.due_display());
        let actions = job.quick_actions().into_iter().map(Into::into).collect();
        Self {
            id: job.id,
            patient_id: job.patient_id,
            job_text: job.job_text,
            priority: job.priority.to_string(),
            status: job.status.to_string(),
            due_time,
            assigned_to: job.assigned_to,
            created_at: format_timestamp(job.created_at),
            updated_at: format_timestamp(job.updated_at),
            actions,
        }
    }
}

/// Job edit. `None` leaves a field alone; an empty `assigned_to` or
/// `due_time` clears it.
#[derive(Debug, Clone, Default, uniffi::Record)]
pub struct FfiJobUpdate {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub assigned_to: Option<String>,
    pub due_time: Option<String>,
}

impl TryFrom<FfiJobUpdate> for JobUpdate {
    type Error = WardHandoverError;

    fn try_from(u: FfiJobUpdate) -> Result<Self, Self::Error> {
        Ok(JobUpdate {
            status: u.status.as_deref().map(parse_status).transpose()?,
            priority: u.priority.as_deref().map(parse_priority).transpose()?,
            assigned_to: u.assigned_to.map(Some),
            due_time: u.due_time.map(|s| board::parse_due_time(&s)),
        })
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiBoardJob {
    pub job: FfiJob,
    pub patient_name: String,
    pub hospital_number: String,
}

impl From<BoardJob> for FfiBoardJob {
    fn from(b: BoardJob) -> Self {
        Self {
            job: b.job.into(),
            patient_name: b.patient_name,
            hospital_number: b.hospital_number,
        }
    }
}

#[derive(Debug, Clone, uniffi::Enum)]
pub enum FfiDateFilter {
    AllDates,
    Today,
    Tomorrow,
    /// `YYYY-MM-DD`
    On { date: String },
}

/// Jobs board filter. `None` means "All".
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiJobFilter {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub patient: Option<String>,
    pub assignee: Option<String>,
    pub text: Option<String>,
    pub date: FfiDateFilter,
}

impl TryFrom<FfiJobFilter> for JobFilter {
    type Error = WardHandoverError;

    fn try_from(f: FfiJobFilter) -> Result<Self, Self::Error> {
        let date = match f.date {
            FfiDateFilter::AllDates => DateFilter::AllDates,
            FfiDateFilter::Today => DateFilter::Today,
            FfiDateFilter::Tomorrow => DateFilter::Tomorrow,
            FfiDateFilter::On { date } => DateFilter::On(parse_date(&date)?),
        };
        Ok(JobFilter {
            status: f.status.as_deref().map(parse_status).transpose()?,
            priority: f.priority.as_deref().map(parse_priority).transpose()?,
            patient: f.patient,
            assignee: f.assignee,
            text: f.text,
            date,
        })
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiBoardMetrics {
    pub open: u32,
    pub in_progress: u32,
    pub done: u32,
    pub overdue: u32,
}

impl From<BoardMetrics> for FfiBoardMetrics {
    fn from(m: BoardMetrics) -> Self {
        Self {
            open: m.open,
            in_progress: m.in_progress,
            done: m.done,
            overdue: m.overdue,
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiBoardGroup {
    pub label: String,
    pub jobs: Vec<FfiBoardJob>,
}

impl From<BoardGroup> for FfiBoardGroup {
    fn from(g: BoardGroup) -> Self {
        Self {
            label: g.label,
            jobs: g.jobs.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiJobsBoard {
    pub total_jobs: u64,
    pub shown_jobs: u64,
    pub metrics: FfiBoardMetrics,
    pub groups: Vec<FfiBoardGroup>,
    pub patient_options: Vec<String>,
    pub assignee_options: Vec<String>,
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiStatusColumn {
    pub status: String,
    pub jobs: Vec<FfiBoardJob>,
}

impl From<StatusColumn> for FfiStatusColumn {
    fn from(c: StatusColumn) -> Self {
        Self {
            status: c.status.to_string(),
            jobs: c.jobs.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatientDetail {
    pub patient: FfiPatient,
    pub notes: Vec<FfiNote>,
    pub jobs: Vec<FfiJob>,
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAdminView {
    pub db_path: Option<String>,
    pub patients: u64,
    pub progress_notes: u64,
    pub jobs: u64,
}

#[derive(Debug, Clone, Copy, uniffi::Enum)]
pub enum FfiExportTable {
    Patients,
    ProgressNotes,
    Jobs,
}

impl From<FfiExportTable> for ExportTable {
    fn from(t: FfiExportTable) -> Self {
        match t {
            FfiExportTable::Patients => ExportTable::Patients,
            FfiExportTable::ProgressNotes => ExportTable::ProgressNotes,
            FfiExportTable::Jobs => ExportTable::Jobs,
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiExportedFile {
    pub table: String,
    pub path: String,
    pub rows: u64,
}
