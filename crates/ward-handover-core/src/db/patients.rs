//! Patient database operations.

use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};
use tracing::{debug, info};

use super::{map_unique, Database, DbError, DbResult};
use crate::models::{NewPatient, Patient, PatientChoice, PatientQuery, PatientSummary};

const PATIENT_COLUMNS: &str = r#"
    id, patient_name, hospital_number, nhs_number, date_of_birth,
    reason_for_admission, pmh, psh, dh, allergies, created_at, updated_at
"#;

impl Database {
    /// Insert a new patient.
    ///
    /// Fails with [`DbError::Validation`] when a required field is blank and
    /// [`DbError::Constraint`] when the hospital number is already taken.
    /// Nothing is written in either case.
    pub fn create_patient(&self, new: &NewPatient) -> DbResult<Patient> {
        let missing = new.missing_fields();
        if !missing.is_empty() {
            return Err(DbError::Validation(format!(
                "required fields missing: {}",
                missing.join(", ")
            )));
        }

        let new = new.normalized();
        let now = Utc::now().naive_utc();
        self.conn
            .execute(
                r#"
                INSERT INTO patients (
                    patient_name, hospital_number, nhs_number, date_of_birth,
                    reason_for_admission, pmh, psh, dh, allergies, created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
                "#,
                params![
                    new.name,
                    new.hospital_number,
                    new.nhs_number,
                    new.date_of_birth,
                    new.reason_for_admission,
                    new.pmh,
                    new.psh,
                    new.dh,
                    new.allergies,
                    now,
                    now,
                ],
            )
            .map_err(|e| {
                map_unique(e, || {
                    format!("hospital number {} already exists", new.hospital_number)
                })
            })?;

        let id = self.conn.last_insert_rowid();
        info!(patient_id = id, hospital_number = %new.hospital_number, "Created patient");

        Ok(Patient {
            id,
            name: new.name,
            hospital_number: new.hospital_number,
            nhs_number: new.nhs_number,
            date_of_birth: new.date_of_birth,
            reason_for_admission: new.reason_for_admission,
            pmh: new.pmh,
            psh: new.psh,
            dh: new.dh,
            allergies: new.allergies,
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a patient by ID.
    pub fn get_patient(&self, id: i64) -> DbResult<Option<Patient>> {
        self.conn
            .query_row(
                &format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE id = ?"),
                [id],
                patient_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Get a patient by ID, failing with [`DbError::NotFound`].
    pub fn require_patient(&self, id: i64) -> DbResult<Patient> {
        self.get_patient(id)?
            .ok_or_else(|| DbError::NotFound(format!("patient {}", id)))
    }

    /// Get a patient by hospital number.
    pub fn get_patient_by_hospital_number(&self, hospital_number: &str) -> DbResult<Option<Patient>> {
        self.conn
            .query_row(
                &format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE hospital_number = ?"),
                [hospital_number.trim()],
                patient_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    pub(crate) fn patient_exists(&self, id: i64) -> DbResult<bool> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM patients WHERE id = ?)",
            [id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    /// Patient list with open-job counts.
    ///
    /// The search term is matched as a case-insensitive substring of name,
    /// hospital number or admission reason; an empty term matches everyone.
    pub fn list_patients(&self, query: &PatientQuery) -> DbResult<Vec<PatientSummary>> {
        let mut sql = String::from(
            r#"
            SELECT p.id, p.patient_name, p.hospital_number, p.nhs_number, p.date_of_birth,
                   p.reason_for_admission, p.created_at,
                   (SELECT COUNT(*) FROM jobs j WHERE j.patient_id = p.id AND j.status != 'Done') AS open_jobs
            FROM patients p
            WHERE (p.patient_name LIKE ?1 OR p.hospital_number LIKE ?1 OR p.reason_for_admission LIKE ?1)
            "#,
        );
        if query.only_with_open_jobs {
            sql.push_str(
                " AND EXISTS (SELECT 1 FROM jobs j WHERE j.patient_id = p.id AND j.status != 'Done')",
            );
        }
        sql.push_str(&format!(" ORDER BY {} LIMIT ?2", query.sort.order_by()));

        let pattern = format!("%{}%", query.search.trim());
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![pattern, i64::from(query.limit)], |row| {
            Ok(PatientSummary {
                id: row.get(0)?,
                name: row.get(1)?,
                hospital_number: row.get(2)?,
                nhs_number: row.get(3)?,
                date_of_birth: row.get(4)?,
                reason_for_admission: row.get(5)?,
                created_at: row.get(6)?,
                open_job_count: row.get(7)?,
            })
        })?;

        let patients = rows.collect::<Result<Vec<_>, _>>()?;
        debug!(count = patients.len(), search = %query.search, "Listed patients");
        Ok(patients)
    }

    /// Every patient as a picker entry, newest first.
    pub fn patient_choices(&self) -> DbResult<Vec<PatientChoice>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, patient_name, hospital_number FROM patients ORDER BY created_at DESC, id DESC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(PatientChoice {
                id: row.get(0)?,
                name: row.get(1)?,
                hospital_number: row.get(2)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Number of patients.
    pub fn patient_count(&self) -> DbResult<u64> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM patients", [], |row| row.get(0))?;
        Ok(n as u64)
    }
}

fn patient_from_row(row: &Row<'_>) -> rusqlite::Result<Patient> {
    Ok(Patient {
        id: row.get(0)?,
        name: row.get(1)?,
        hospital_number: row.get(2)?,
        nhs_number: row.get(3)?,
        date_of_birth: row.get(4)?,
        reason_for_admission: row.get(5)?,
        pmh: row.get(6)?,
        psh: row.get(7)?,
        dh: row.get(8)?,
        allergies: row.get(9)?,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PatientSort, NKDA};
    use chrono::NaiveDate;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn new_patient(name: &str, hosp: &str, reason: &str) -> NewPatient {
        NewPatient::new(
            name,
            hosp,
            NaiveDate::from_ymd_opt(1985, 4, 12).unwrap(),
            reason,
        )
    }

    #[test]
    fn test_create_and_get() {
        let db = setup_db();

        let mut new = new_patient("Jane Doe", "H1234567", "Peritonsillar abscess");
        new.nhs_number = Some("999 123 4567".into());
        new.pmh = Some("Asthma".into());

        let created = db.create_patient(&new).unwrap();
        let retrieved = db.get_patient(created.id).unwrap().unwrap();
        assert_eq!(retrieved, created);
        assert_eq!(retrieved.allergies.as_deref(), Some(NKDA));
        assert_eq!(retrieved.nhs_number.as_deref(), Some("999 123 4567"));
    }

    #[test]
    fn test_duplicate_hospital_number() {
        let db = setup_db();
        db.create_patient(&new_patient("Jane Doe", "H1234567", "Quinsy"))
            .unwrap();

        let result = db.create_patient(&new_patient("John Roe", "H1234567", "Epistaxis"));
        assert!(matches!(result, Err(DbError::Constraint(_))));
        assert_eq!(db.patient_count().unwrap(), 1);
    }

    #[test]
    fn test_blank_required_field() {
        let db = setup_db();
        let result = db.create_patient(&new_patient("Jane Doe", "H1", "   "));
        assert!(matches!(result, Err(DbError::Validation(_))));
        assert_eq!(db.patient_count().unwrap(), 0);
    }

    #[test]
    fn test_require_patient_not_found() {
        let db = setup_db();
        assert!(matches!(db.require_patient(42), Err(DbError::NotFound(_))));
    }

    #[test]
    fn test_search_patients() {
        let db = setup_db();
        db.create_patient(&new_patient("Jane Doe", "H100", "Quinsy")).unwrap();
        db.create_patient(&new_patient("John Smith", "H200", "Epistaxis")).unwrap();
        db.create_patient(&new_patient("Ann Lee", "X300", "Post-tonsillectomy bleed"))
            .unwrap();

        let query = |search: &str| PatientQuery {
            search: search.into(),
            ..PatientQuery::default()
        };

        assert_eq!(db.list_patients(&query("jane")).unwrap().len(), 1);
        assert_eq!(db.list_patients(&query("h")).unwrap().len(), 3);
        assert_eq!(db.list_patients(&query("EPISTAXIS")).unwrap().len(), 1);
        assert_eq!(db.list_patients(&query("x3")).unwrap().len(), 1);
        assert_eq!(db.list_patients(&query("")).unwrap().len(), 3);
        assert!(db.list_patients(&query("zzz")).unwrap().is_empty());
    }

    #[test]
    fn test_sort_and_limit() {
        let db = setup_db();
        db.create_patient(&new_patient("Charlie", "H3", "a")).unwrap();
        db.create_patient(&new_patient("alice", "H1", "b")).unwrap();
        db.create_patient(&new_patient("Bob", "H2", "c")).unwrap();

        let names = |sort: PatientSort, limit: u32| -> Vec<String> {
            db.list_patients(&PatientQuery {
                sort,
                limit,
                ..PatientQuery::default()
            })
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect()
        };

        assert_eq!(names(PatientSort::NewestFirst, 10), vec!["Bob", "alice", "Charlie"]);
        assert_eq!(names(PatientSort::NameAscending, 10), vec!["alice", "Bob", "Charlie"]);
        assert_eq!(
            names(PatientSort::HospitalNumberAscending, 10),
            vec!["alice", "Bob", "Charlie"]
        );
        assert_eq!(names(PatientSort::NewestFirst, 2), vec!["Bob", "alice"]);
    }

    #[test]
    fn test_patient_choices_newest_first() {
        let db = setup_db();
        let first = db.create_patient(&new_patient("Jane", "H1", "a")).unwrap();
        let second = db.create_patient(&new_patient("John", "H2", "b")).unwrap();

        let choices = db.patient_choices().unwrap();
        assert_eq!(choices[0].id, second.id);
        assert_eq!(choices[1].id, first.id);
        assert_eq!(choices[1].hospital_number, "H1");
    }
}
