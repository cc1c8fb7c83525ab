//! SQLite schema definition.

/// Complete database schema for ward handover.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Patients (one row per admission)
-- ============================================================================

CREATE TABLE IF NOT EXISTS patients (
    id INTEGER PRIMARY KEY,
    patient_name TEXT NOT NULL,
    hospital_number TEXT NOT NULL UNIQUE,
    nhs_number TEXT,
    date_of_birth TEXT NOT NULL,                 -- YYYY-MM-DD
    reason_for_admission TEXT NOT NULL,
    pmh TEXT,                                    -- past medical history
    psh TEXT,                                    -- past surgical history
    dh TEXT,                                     -- drug history
    allergies TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_patients_name ON patients(patient_name);
CREATE INDEX IF NOT EXISTS idx_patients_nhs_no ON patients(nhs_number);

-- ============================================================================
-- Progress Notes (append-only)
-- ============================================================================

CREATE TABLE IF NOT EXISTS progress_notes (
    id INTEGER PRIMARY KEY,
    patient_id INTEGER NOT NULL REFERENCES patients(id) ON DELETE CASCADE,
    note_time TEXT NOT NULL DEFAULT (datetime('now')),
    note TEXT NOT NULL,
    author TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_progress_patient_time ON progress_notes(patient_id, note_time DESC);

-- ============================================================================
-- Jobs
-- ============================================================================

CREATE TABLE IF NOT EXISTS jobs (
    id INTEGER PRIMARY KEY,
    patient_id INTEGER NOT NULL REFERENCES patients(id) ON DELETE CASCADE,
    job_text TEXT NOT NULL,
    priority TEXT NOT NULL DEFAULT 'Routine',    -- Urgent, Soon, Routine
    status TEXT NOT NULL DEFAULT 'Open',         -- Open, In Progress, Done
    due_time TEXT,                               -- YYYY-MM-DD HH:MM (older rows may differ)
    assigned_to TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_jobs_patient_status ON jobs(patient_id, status);
CREATE INDEX IF NOT EXISTS idx_jobs_due ON jobs(due_time);
"#;
