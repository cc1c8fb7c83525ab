//! CSV export of the raw tables.
//!
//! One file per table, header row first, every column in schema order.
//! Values are written as stored; NULL becomes an empty field.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use rusqlite::types::ValueRef;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::db::{Database, DbResult};

/// Exportable tables.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ExportTable {
    Patients,
    ProgressNotes,
    Jobs,
}

impl ExportTable {
    pub const ALL: [ExportTable; 3] = [
        ExportTable::Patients,
        ExportTable::ProgressNotes,
        ExportTable::Jobs,
    ];

    pub fn table_name(&self) -> &'static str {
        match self {
            ExportTable::Patients => "patients",
            ExportTable::ProgressNotes => "progress_notes",
            ExportTable::Jobs => "jobs",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.csv", self.table_name())
    }
}

/// Written file plus row count.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportedFile {
    pub table: ExportTable,
    pub path: PathBuf,
    pub rows: usize,
}

/// Summary of a full export, also written next to the CSVs as `manifest.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportManifest {
    pub exported_at: String,
    pub files: Vec<ExportedFile>,
}

impl ExportManifest {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Dumps tables from a [`Database`] as CSV.
pub struct CsvExporter<'a> {
    db: &'a Database,
}

impl<'a> CsvExporter<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// CSV text for one table, with the number of data rows.
    pub fn table_csv(&self, table: ExportTable) -> DbResult<(String, usize)> {
        let mut stmt = self
            .db
            .conn()
            .prepare(&format!("SELECT * FROM {} ORDER BY id", table.table_name()))?;

        let header: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(escape_csv)
            .collect();
        let width = header.len();

        let mut csv = header.join(",");
        csv.push('\n');

        let mut count = 0;
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let mut fields = Vec::with_capacity(width);
            for i in 0..width {
                fields.push(escape_csv(&value_to_string(row.get_ref(i)?)));
            }
            csv.push_str(&fields.join(","));
            csv.push('\n');
            count += 1;
        }

        Ok((csv, count))
    }

    /// Write every table into `dir` (created if missing) plus a manifest.
    pub fn write_all<P: AsRef<Path>>(&self, dir: P) -> DbResult<ExportManifest> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let mut files = Vec::with_capacity(ExportTable::ALL.len());
        for table in ExportTable::ALL {
            let (csv, rows) = self.table_csv(table)?;
            let path = dir.join(table.file_name());
            fs::write(&path, csv)?;
            files.push(ExportedFile { table, path, rows });
        }

        let manifest = ExportManifest {
            exported_at: Utc::now().to_rfc3339(),
            files,
        };
        let json = manifest
            .to_json()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        fs::write(dir.join("manifest.json"), json)?;

        info!(dir = %dir.display(), "Exported tables to CSV");
        Ok(manifest)
    }
}

fn value_to_string(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => String::new(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(t) => String::from_utf8_lossy(t).into_owned(),
        ValueRef::Blob(b) => hex::encode(b),
    }
}

/// Escape a string for CSV output.
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewJob, NewNote, NewPatient};
    use chrono::NaiveDate;

    fn seeded() -> Database {
        let db = Database::open_in_memory().unwrap();
        let mut new = NewPatient::new(
            "Doe, Jane",
            "H1234567",
            NaiveDate::from_ymd_opt(1985, 4, 12).unwrap(),
            "Quinsy",
        );
        new.pmh = Some("Says \"fine\"".into());
        let pid = db.create_patient(&new).unwrap().id;
        db.add_note(&NewNote::new(pid, "Line one\nline two")).unwrap();
        db.add_job(&NewJob::new(pid, "Bloods")).unwrap();
        db
    }

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("plain"), "plain");
        assert_eq!(escape_csv("a,b"), "\"a,b\"");
        assert_eq!(escape_csv("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_csv("a\r\nb"), "\"a\r\nb\"");
    }

    #[test]
    fn test_patients_csv() {
        let db = seeded();
        let (csv, rows) = CsvExporter::new(&db).table_csv(ExportTable::Patients).unwrap();
        assert_eq!(rows, 1);

        let mut lines = csv.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("id,patient_name,hospital_number,nhs_number,date_of_birth"));

        let row = lines.next().unwrap();
        assert!(row.starts_with("1,\"Doe, Jane\",H1234567,,1985-04-12,Quinsy,"));
        assert!(row.contains("\"Says \"\"fine\"\"\""));
    }

    #[test]
    fn test_multiline_note_is_quoted() {
        let db = seeded();
        let (csv, rows) = CsvExporter::new(&db)
            .table_csv(ExportTable::ProgressNotes)
            .unwrap();
        assert_eq!(rows, 1);
        assert!(csv.contains("\"Line one\nline two\""));
    }

    #[test]
    fn test_write_all() {
        let db = seeded();
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("export");

        let manifest = CsvExporter::new(&db).write_all(&out).unwrap();
        assert_eq!(manifest.files.len(), 3);
        assert!(manifest.files.iter().all(|f| f.rows == 1));

        let jobs = fs::read_to_string(out.join("jobs.csv")).unwrap();
        assert!(jobs.starts_with("id,patient_id,job_text,priority,status,due_time,assigned_to"));
        assert!(jobs.contains("Bloods,Routine,Open"));
        assert!(out.join("manifest.json").exists());
    }
}
