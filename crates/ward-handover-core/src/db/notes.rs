//! Progress note database operations.

use chrono::Utc;
use rusqlite::params;
use tracing::info;

use super::{Database, DbError, DbResult};
use crate::models::{non_blank, NewNote, ProgressNote};

impl Database {
    /// Append a progress note to a patient.
    pub fn add_note(&self, new: &NewNote) -> DbResult<ProgressNote> {
        let note = new.note.trim();
        if note.is_empty() {
            return Err(DbError::Validation("note text is required".into()));
        }
        if !self.patient_exists(new.patient_id)? {
            return Err(DbError::NotFound(format!("patient {}", new.patient_id)));
        }

        let now = Utc::now().naive_utc();
        let note_time = new.note_time.unwrap_or(now);
        let author = non_blank(new.author.as_deref());

        self.conn.execute(
            r#"
            INSERT INTO progress_notes (patient_id, note_time, note, author, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![new.patient_id, note_time, note, author, now],
        )?;

        let id = self.conn.last_insert_rowid();
        info!(note_id = id, patient_id = new.patient_id, "Added progress note");

        Ok(ProgressNote {
            id,
            patient_id: new.patient_id,
            note_time,
            note: note.to_string(),
            author,
            created_at: now,
        })
    }

    /// Notes for a patient, most recent clinical time first.
    pub fn list_notes_for_patient(&self, patient_id: i64) -> DbResult<Vec<ProgressNote>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, patient_id, note_time, note, author, created_at
            FROM progress_notes
            WHERE patient_id = ?
            ORDER BY note_time DESC, id DESC
            "#,
        )?;

        let rows = stmt.query_map([patient_id], |row| {
            Ok(ProgressNote {
                id: row.get(0)?,
                patient_id: row.get(1)?,
                note_time: row.get(2)?,
                note: row.get(3)?,
                author: row.get(4)?,
                created_at: row.get(5)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
