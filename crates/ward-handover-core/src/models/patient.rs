//! Patient models.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::non_blank;

/// Default allergy entry: no known drug allergies.
pub const NKDA: &str = "NKDA";

/// An admitted patient. Aggregate root for notes and jobs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    /// Surrogate key
    pub id: i64,
    /// Patient name
    pub name: String,
    /// Institution-assigned identifier, unique across patients
    pub hospital_number: String,
    /// National identifier (optional)
    pub nhs_number: Option<String>,
    /// Date of birth
    pub date_of_birth: NaiveDate,
    /// Reason for admission
    pub reason_for_admission: String,
    /// Past medical history
    pub pmh: Option<String>,
    /// Past surgical history
    pub psh: Option<String>,
    /// Drug history / current medications
    pub dh: Option<String>,
    /// Allergies
    pub allergies: Option<String>,
    /// Creation timestamp
    pub created_at: NaiveDateTime,
    /// Last update timestamp
    pub updated_at: NaiveDateTime,
}

impl Patient {
    /// Age in completed years on the given date.
    pub fn age_on(&self, today: NaiveDate) -> Option<u32> {
        age_on(self.date_of_birth, today)
    }
}

/// Fields captured by the add-patient form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewPatient {
    pub name: String,
    pub hospital_number: String,
    pub nhs_number: Option<String>,
    pub date_of_birth: NaiveDate,
    pub reason_for_admission: String,
    pub pmh: Option<String>,
    pub psh: Option<String>,
    pub dh: Option<String>,
    pub allergies: Option<String>,
}

impl NewPatient {
    /// Create a new patient form with the required fields and NKDA allergies.
    pub fn new(
        name: impl Into<String>,
        hospital_number: impl Into<String>,
        date_of_birth: NaiveDate,
        reason_for_admission: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            hospital_number: hospital_number.into(),
            nhs_number: None,
            date_of_birth,
            reason_for_admission: reason_for_admission.into(),
            pmh: None,
            psh: None,
            dh: None,
            allergies: Some(NKDA.to_string()),
        }
    }

    /// Names of required fields that are blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.hospital_number.trim().is_empty() {
            missing.push("hospital_number");
        }
        if self.reason_for_admission.trim().is_empty() {
            missing.push("reason_for_admission");
        }
        missing
    }

    /// Trim text fields and collapse blank optional fields to `None`.
    pub fn normalized(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            hospital_number: self.hospital_number.trim().to_string(),
            nhs_number: non_blank(self.nhs_number.as_deref()),
            date_of_birth: self.date_of_birth,
            reason_for_admission: self.reason_for_admission.trim().to_string(),
            pmh: non_blank(self.pmh.as_deref()),
            psh: non_blank(self.psh.as_deref()),
            dh: non_blank(self.dh.as_deref()),
            allergies: non_blank(self.allergies.as_deref()),
        }
    }
}

/// Sort orders offered by the patient list.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum PatientSort {
    #[default]
    NewestFirst,
    NameAscending,
    HospitalNumberAscending,
}

impl PatientSort {
    /// SQL ORDER BY clause (id breaks ties so pages are stable).
    pub(crate) fn order_by(&self) -> &'static str {
        match self {
            PatientSort::NewestFirst => "p.created_at DESC, p.id DESC",
            PatientSort::NameAscending => "p.patient_name COLLATE NOCASE ASC, p.id ASC",
            PatientSort::HospitalNumberAscending => "p.hospital_number ASC, p.id ASC",
        }
    }
}

/// Patient list query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientQuery {
    /// Substring matched against name, hospital number and admission reason
    pub search: String,
    pub sort: PatientSort,
    pub limit: u32,
    /// Only patients with at least one job that is not done
    pub only_with_open_jobs: bool,
}

impl Default for PatientQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            sort: PatientSort::NewestFirst,
            limit: 20,
            only_with_open_jobs: false,
        }
    }
}

/// A row of the patient list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientSummary {
    pub id: i64,
    pub name: String,
    pub hospital_number: String,
    pub nhs_number: Option<String>,
    pub date_of_birth: NaiveDate,
    pub reason_for_admission: String,
    pub created_at: NaiveDateTime,
    /// Jobs whose status is not Done
    pub open_job_count: u32,
}

/// Entry in the patient picker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientChoice {
    pub id: i64,
    pub name: String,
    pub hospital_number: String,
}

impl PatientChoice {
    /// "Jane Doe • H1234567 (ID 1)"
    pub fn label(&self) -> String {
        format!("{} • {} (ID {})", self.name, self.hospital_number, self.id)
    }
}

/// Completed years between `dob` and `today`; `None` if born after `today`.
pub fn age_on(dob: NaiveDate, today: NaiveDate) -> Option<u32> {
    if dob > today {
        return None;
    }
    let mut years = today.year() - dob.year();
    if (today.month(), today.day()) < (dob.month(), dob.day()) {
        years -= 1;
    }
    u32::try_from(years).ok()
}
