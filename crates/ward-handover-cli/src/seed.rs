//! Demo data for a fresh store.

use anyhow::Result;
use chrono::{NaiveDateTime, TimeDelta};
use serde::Serialize;
use tracing::info;
use ward_handover_core::models::{NewJob, NewNote, NewPatient, Priority};
use ward_handover_core::Database;

pub const DEMO_HOSPITAL_NUMBER: &str = "H1234567";

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct SeedOutcome {
    pub patient_id: i64,
    pub notes: usize,
    pub jobs: usize,
    /// False when the demo patient was already present
    pub inserted: bool,
}

/// Insert the demo patient with two notes and three jobs.
///
/// Safe to rerun: if the demo hospital number already exists nothing is added.
pub fn seed_demo_data(db: &Database, now: NaiveDateTime) -> Result<SeedOutcome> {
    if let Some(existing) = db.get_patient_by_hospital_number(DEMO_HOSPITAL_NUMBER)? {
        info!(patient_id = existing.id, "Demo patient already present");
        return Ok(SeedOutcome {
            patient_id: existing.id,
            notes: 0,
            jobs: 0,
            inserted: false,
        });
    }

    let dob = chrono::NaiveDate::from_ymd_opt(1985, 4, 12)
        .ok_or_else(|| anyhow::anyhow!("invalid demo date of birth"))?;
    let mut patient = NewPatient::new("Jane Doe", DEMO_HOSPITAL_NUMBER, dob, "Peritonsillar abscess");
    patient.nhs_number = Some("999 123 4567".into());
    patient.pmh = Some("Asthma".into());
    patient.psh = Some("Appendicectomy (2009)".into());
    patient.dh = Some("Salbutamol inhaler PRN".into());
    let patient = db.create_patient(&patient)?;

    let notes = [
        NewNote::new(
            patient.id,
            "Admitted via ED with trismus and odynophagia. IV Abx started. ENT review requested.",
        )
        .with_author("ED SHO"),
        NewNote::new(
            patient.id,
            "ENT reviewed. Needle aspiration performed. Marked improvement. Continue IV Abx; switch to PO if stable in AM.",
        )
        .with_author("ENT Reg"),
    ];
    for note in &notes {
        db.add_note(note)?;
    }

    let jobs = [
        NewJob::new(patient.id, "Chase throat swab culture").assigned_to("Ward SHO"),
        NewJob::new(patient.id, "Switch to oral antibiotics in AM ward round")
            .with_priority(Priority::Soon)
            .assigned_to("Ward SHO")
            .due(now + TimeDelta::hours(12)),
        NewJob::new(patient.id, "Safety-net discharge advice & outpatient follow-up")
            .assigned_to("Discharge Co-ordinator"),
    ];
    for job in &jobs {
        db.add_job(job)?;
    }

    info!(patient_id = patient.id, "Seeded demo data");
    Ok(SeedOutcome {
        patient_id: patient.id,
        notes: notes.len(),
        jobs: jobs.len(),
        inserted: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ward_handover_core::TableCounts;

    fn now() -> NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2024, 6, 10)
            .unwrap()
            .and_hms_opt(20, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_seed_is_idempotent() {
        let db = Database::open_in_memory().unwrap();

        let first = seed_demo_data(&db, now()).unwrap();
        assert!(first.inserted);
        let second = seed_demo_data(&db, now()).unwrap();
        assert!(!second.inserted);
        assert_eq!(second.patient_id, first.patient_id);

        assert_eq!(
            db.table_counts().unwrap(),
            TableCounts {
                patients: 1,
                progress_notes: 2,
                jobs: 3
            }
        );
    }

    #[test]
    fn test_seeded_job_due_next_morning() {
        let db = Database::open_in_memory().unwrap();
        let outcome = seed_demo_data(&db, now()).unwrap();

        let jobs = db.list_jobs_for_patient(outcome.patient_id).unwrap();
        let dated: Vec<_> = jobs.iter().filter_map(|j| j.due_time).collect();
        assert_eq!(dated.len(), 1);
        assert_eq!(dated[0].format("%Y-%m-%d %H:%M").to_string(), "2024-06-11 08:00");
        // Soon sorts ahead of the two routine jobs
        assert_eq!(jobs[0].priority, Priority::Soon);
    }
}
