//! Job database operations.

use chrono::{NaiveDateTime, Timelike, Utc};
use rusqlite::{params, OptionalExtension, Row};
use tracing::{debug, info};

use super::{timestamp_after, Database, DbError, DbResult};
use crate::board::{detail_order, parse_optional_due_time};
use crate::models::{
    non_blank, BoardJob, Job, JobAction, JobStatus, JobUpdate, NewJob, Priority, DUE_TIME_FORMAT,
};

const JOB_COLUMNS: &str = r#"
    j.id, j.patient_id, j.job_text, j.priority, j.status, j.due_time,
    j.assigned_to, j.created_at, j.updated_at
"#;

impl Database {
    /// Add a job to a patient.
    pub fn add_job(&self, new: &NewJob) -> DbResult<Job> {
        let job_text = new.job_text.trim();
        if job_text.is_empty() {
            return Err(DbError::Validation("job description is required".into()));
        }
        if !new.priority.is_known() {
            return Err(DbError::Validation(format!("unknown priority {:?}", new.priority.as_str())));
        }
        if !self.patient_exists(new.patient_id)? {
            return Err(DbError::NotFound(format!("patient {}", new.patient_id)));
        }

        let now = Utc::now().naive_utc();
        let assigned_to = non_blank(new.assigned_to.as_deref());
        let due_time = due_minute(new.due_time);

        self.conn.execute(
            r#"
            INSERT INTO jobs (
                patient_id, job_text, priority, status, due_time,
                assigned_to, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                new.patient_id,
                job_text,
                new.priority.as_str(),
                JobStatus::Open.as_str(),
                due_to_sql(due_time),
                assigned_to,
                now,
                now,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        info!(job_id = id, patient_id = new.patient_id, priority = %new.priority, "Added job");

        Ok(Job {
            id,
            patient_id: new.patient_id,
            job_text: job_text.to_string(),
            priority: new.priority.clone(),
            status: JobStatus::Open,
            due_time,
            assigned_to,
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a job by ID.
    pub fn get_job(&self, id: i64) -> DbResult<Option<Job>> {
        self.conn
            .query_row(
                &format!("SELECT {JOB_COLUMNS} FROM jobs j WHERE j.id = ?"),
                [id],
                job_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Get a job by ID, failing with [`DbError::NotFound`].
    pub fn require_job(&self, id: i64) -> DbResult<Job> {
        self.get_job(id)?
            .ok_or_else(|| DbError::NotFound(format!("job {}", id)))
    }

    /// Edit a job in place and return the stored result.
    ///
    /// Any status may be set here (including reopening a done job), but only
    /// the known statuses and priorities are written. The stored due text is
    /// left alone unless the update sets it, so legacy values survive.
    /// `updated_at` always moves forward, even for an empty update.
    pub fn update_job(&self, id: i64, update: &JobUpdate) -> DbResult<Job> {
        if let Some(status) = update.status.as_ref().filter(|s| !s.is_known()) {
            return Err(DbError::Validation(format!("unknown status {:?}", status.as_str())));
        }
        if let Some(priority) = update.priority.as_ref().filter(|p| !p.is_known()) {
            return Err(DbError::Validation(format!("unknown priority {:?}", priority.as_str())));
        }

        let tx = self.conn.unchecked_transaction()?;

        let mut job = self.require_job(id)?;
        update.apply_to(&mut job);
        job.due_time = due_minute(job.due_time);
        job.updated_at = timestamp_after(Some(job.updated_at));

        tx.execute(
            r#"
            UPDATE jobs SET
                priority = ?2,
                status = ?3,
                due_time = CASE WHEN ?7 THEN ?4 ELSE due_time END,
                assigned_to = ?5,
                updated_at = ?6
            WHERE id = ?1
            "#,
            params![
                job.id,
                job.priority.as_str(),
                job.status.as_str(),
                due_to_sql(job.due_time),
                job.assigned_to,
                job.updated_at,
                update.due_time.is_some(),
            ],
        )?;
        tx.commit()?;

        info!(job_id = id, status = %job.status, priority = %job.priority, "Updated job");
        Ok(job)
    }

    /// Apply a board quick action (start / complete).
    ///
    /// Only the forward moves offered for the job's current status are
    /// accepted; anything else is a [`DbError::Validation`].
    pub fn apply_job_action(&self, id: i64, action: JobAction) -> DbResult<Job> {
        let job = self.require_job(id)?;
        if !job.quick_actions().contains(&action) {
            return Err(DbError::Validation(format!(
                "cannot {:?} a job that is {}",
                action, job.status
            )));
        }
        self.update_job(id, &JobUpdate::status(action.target_status()))
    }

    /// Jobs for a patient: most pressing priority first, then oldest first.
    pub fn list_jobs_for_patient(&self, patient_id: i64) -> DbResult<Vec<Job>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {JOB_COLUMNS} FROM jobs j WHERE j.patient_id = ?"))?;
        let rows = stmt.query_map([patient_id], job_from_row)?;

        let mut jobs = rows.collect::<Result<Vec<_>, _>>()?;
        jobs.sort_by(detail_order);
        Ok(jobs)
    }

    /// Every job joined with its patient's name and hospital number.
    pub fn list_all_jobs_with_patient(&self) -> DbResult<Vec<BoardJob>> {
        let mut stmt = self.conn.prepare(&format!(
            r#"
            SELECT {JOB_COLUMNS}, p.patient_name, p.hospital_number
            FROM jobs j
            JOIN patients p ON p.id = j.patient_id
            ORDER BY j.id
            "#
        ))?;
        let rows = stmt.query_map([], |row| {
            Ok(BoardJob {
                job: job_from_row(row)?,
                patient_name: row.get(9)?,
                hospital_number: row.get(10)?,
            })
        })?;

        let jobs = rows.collect::<Result<Vec<_>, _>>()?;
        debug!(count = jobs.len(), "Loaded jobs for board");
        Ok(jobs)
    }
}

/// Due times are kept to the minute.
fn due_minute(due: Option<NaiveDateTime>) -> Option<NaiveDateTime> {
    due.map(|dt| dt.with_second(0).and_then(|d| d.with_nanosecond(0)).unwrap_or(dt))
}

fn due_to_sql(due: Option<NaiveDateTime>) -> Option<String> {
    due.map(|dt| dt.format(DUE_TIME_FORMAT).to_string())
}

/// Due times are free text in older stores; unreadable values load as absent.
fn job_from_row(row: &Row<'_>) -> rusqlite::Result<Job> {
    let priority: String = row.get(3)?;
    let status: String = row.get(4)?;
    let due_time: Option<String> = row.get(5)?;
    let assigned_to: Option<String> = row.get(6)?;

    Ok(Job {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        job_text: row.get(2)?,
        priority: Priority::from(priority),
        status: JobStatus::from(status),
        due_time: parse_optional_due_time(due_time.as_deref()),
        assigned_to: non_blank(assigned_to.as_deref()),
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewPatient;
    use chrono::NaiveDate;

    fn setup_db() -> (Database, i64) {
        let db = Database::open_in_memory().unwrap();
        let patient = db
            .create_patient(&NewPatient::new(
                "Jane Doe",
                "H1234567",
                NaiveDate::from_ymd_opt(1985, 4, 12).unwrap(),
                "Peritonsillar abscess",
            ))
            .unwrap();
        (db, patient.id)
    }

    fn due(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_add_and_get_job() {
        let (db, pid) = setup_db();

        let job = db
            .add_job(
                &NewJob::new(pid, "Switch to oral antibiotics")
                    .with_priority(Priority::Soon)
                    .assigned_to("Ward SHO")
                    .due(due(2024, 6, 11, 9)),
            )
            .unwrap();
        assert_eq!(job.status, JobStatus::Open);

        let retrieved = db.get_job(job.id).unwrap().unwrap();
        assert_eq!(retrieved, job);
        assert_eq!(retrieved.due_display(), "2024-06-11 09:00");
    }

    #[test]
    fn test_job_for_missing_patient() {
        let (db, _) = setup_db();
        let result = db.add_job(&NewJob::new(404, "Bloods"));
        assert!(matches!(result, Err(DbError::NotFound(_))));
    }

    #[test]
    fn test_blank_job_rejected() {
        let (db, pid) = setup_db();
        let result = db.add_job(&NewJob::new(pid, " "));
        assert!(matches!(result, Err(DbError::Validation(_))));
    }

    #[test]
    fn test_update_missing_job() {
        let (db, _) = setup_db();
        let result = db.update_job(7, &JobUpdate::status(JobStatus::Done));
        assert!(matches!(result, Err(DbError::NotFound(_))));
    }

    #[test]
    fn test_update_fields() {
        let (db, pid) = setup_db();
        let job = db
            .add_job(&NewJob::new(pid, "Chase swab").assigned_to("SHO"))
            .unwrap();

        let updated = db
            .update_job(
                job.id,
                &JobUpdate {
                    priority: Some(Priority::Urgent),
                    assigned_to: Some(Some("Registrar".into())),
                    due_time: Some(Some(due(2024, 6, 10, 17))),
                    ..JobUpdate::default()
                },
            )
            .unwrap();

        assert_eq!(updated.priority, Priority::Urgent);
        assert_eq!(updated.status, JobStatus::Open);
        assert_eq!(updated.assigned_to.as_deref(), Some("Registrar"));
        assert!(updated.updated_at > job.updated_at);
        assert_eq!(db.get_job(job.id).unwrap().unwrap(), updated);

        let cleared = db
            .update_job(
                job.id,
                &JobUpdate {
                    due_time: Some(None),
                    ..JobUpdate::default()
                },
            )
            .unwrap();
        assert_eq!(cleared.due_time, None);
        assert_eq!(cleared.assigned_to.as_deref(), Some("Registrar"));
    }

    #[test]
    fn test_quick_actions() {
        let (db, pid) = setup_db();
        let job = db.add_job(&NewJob::new(pid, "Bloods")).unwrap();

        let started = db.apply_job_action(job.id, JobAction::Start).unwrap();
        assert_eq!(started.status, JobStatus::InProgress);

        // Already started
        let again = db.apply_job_action(job.id, JobAction::Start);
        assert!(matches!(again, Err(DbError::Validation(_))));

        let done = db.apply_job_action(job.id, JobAction::Complete).unwrap();
        assert_eq!(done.status, JobStatus::Done);
        assert!(db.apply_job_action(job.id, JobAction::Complete).is_err());

        // The editor can still reopen it
        let reopened = db.update_job(job.id, &JobUpdate::status(JobStatus::Open)).unwrap();
        assert_eq!(reopened.status, JobStatus::Open);
    }

    #[test]
    fn test_jobs_for_patient_order() {
        let (db, pid) = setup_db();
        let routine = db.add_job(&NewJob::new(pid, "Discharge letter")).unwrap();
        let urgent = db
            .add_job(&NewJob::new(pid, "Airway review").with_priority(Priority::Urgent))
            .unwrap();
        let soon = db
            .add_job(&NewJob::new(pid, "Oral abx").with_priority(Priority::Soon))
            .unwrap();
        let routine2 = db.add_job(&NewJob::new(pid, "Follow-up")).unwrap();

        let ids: Vec<i64> = db
            .list_jobs_for_patient(pid)
            .unwrap()
            .into_iter()
            .map(|j| j.id)
            .collect();
        assert_eq!(ids, vec![urgent.id, soon.id, routine.id, routine2.id]);
    }

    #[test]
    fn test_legacy_rows_tolerated() {
        let (db, pid) = setup_db();
        db.conn()
            .execute(
                "INSERT INTO jobs (patient_id, job_text, priority, status, due_time, assigned_to) VALUES (?1, 'Old job', 'STAT', 'Blocked', 'whenever', '')",
                [pid],
            )
            .unwrap();
        db.conn()
            .execute(
                "INSERT INTO jobs (patient_id, job_text, due_time) VALUES (?1, 'Dated job', '10/06/2024 14:30')",
                [pid],
            )
            .unwrap();

        let jobs = db.list_jobs_for_patient(pid).unwrap();
        assert_eq!(jobs.len(), 2);

        let dated = &jobs[0];
        assert_eq!(dated.job_text, "Dated job");
        assert_eq!(dated.due_display(), "2024-06-10 14:30");

        let old = &jobs[1];
        assert_eq!(old.priority, Priority::Other("STAT".into()));
        assert_eq!(old.status, JobStatus::Other("Blocked".into()));
        assert_eq!(old.due_time, None);
        assert_eq!(old.assigned_to, None);
    }

    #[test]
    fn test_unknown_status_or_priority_not_written() {
        let (db, pid) = setup_db();
        let result = db.add_job(&NewJob::new(pid, "Bloods").with_priority(Priority::from("urgent")));
        assert!(matches!(result, Err(DbError::Validation(_))));

        let job = db.add_job(&NewJob::new(pid, "Bloods")).unwrap();
        let result = db.update_job(job.id, &JobUpdate::status(JobStatus::from("done")));
        assert!(matches!(result, Err(DbError::Validation(_))));
        let result = db.update_job(
            job.id,
            &JobUpdate {
                priority: Some(Priority::from("STAT")),
                ..JobUpdate::default()
            },
        );
        assert!(matches!(result, Err(DbError::Validation(_))));

        let stored = db.require_job(job.id).unwrap();
        assert_eq!(stored, job);
    }

    #[test]
    fn test_update_keeps_unreadable_due_text() {
        let (db, pid) = setup_db();
        db.conn()
            .execute(
                "INSERT INTO jobs (patient_id, job_text, due_time) VALUES (?1, 'Review', 'after ward round')",
                [pid],
            )
            .unwrap();
        let id = db.conn().last_insert_rowid();
        let stored_due = |db: &Database| -> Option<String> {
            db.conn()
                .query_row("SELECT due_time FROM jobs WHERE id = ?", [id], |row| row.get(0))
                .unwrap()
        };

        let started = db.update_job(id, &JobUpdate::status(JobStatus::InProgress)).unwrap();
        assert_eq!(started.due_time, None);
        assert_eq!(stored_due(&db).as_deref(), Some("after ward round"));

        db.apply_job_action(id, JobAction::Complete).unwrap();
        assert_eq!(stored_due(&db).as_deref(), Some("after ward round"));

        // An explicit edit still replaces it
        db.update_job(
            id,
            &JobUpdate {
                due_time: Some(Some(due(2024, 6, 11, 9))),
                ..JobUpdate::default()
            },
        )
        .unwrap();
        assert_eq!(stored_due(&db).as_deref(), Some("2024-06-11 09:00"));
    }

    #[test]
    fn test_all_jobs_with_patient() {
        let (db, pid) = setup_db();
        db.add_job(&NewJob::new(pid, "Bloods")).unwrap();

        let jobs = db.list_all_jobs_with_patient().unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].patient_name, "Jane Doe");
        assert_eq!(jobs[0].hospital_number, "H1234567");
    }
}
