//! Progress note models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A free-text clinical update. Immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProgressNote {
    pub id: i64,
    pub patient_id: i64,
    /// Clinical time of the note (may be backdated)
    pub note_time: NaiveDateTime,
    pub note: String,
    pub author: Option<String>,
    pub created_at: NaiveDateTime,
}

/// A note to be added to a patient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewNote {
    pub patient_id: i64,
    pub note: String,
    pub author: Option<String>,
    /// Defaults to the creation time when absent
    pub note_time: Option<NaiveDateTime>,
}

impl NewNote {
    pub fn new(patient_id: i64, note: impl Into<String>) -> Self {
        Self {
            patient_id,
            note: note.into(),
            author: None,
            note_time: None,
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn at(mut self, note_time: NaiveDateTime) -> Self {
        self.note_time = Some(note_time);
        self
    }
}
