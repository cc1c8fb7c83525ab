//! Due-date buckets.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Display category derived from a job's due date relative to today.
///
/// Variant order is the board's display order: overdue work first, undated
/// work last, whatever the literal dates are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DateBucket {
    Overdue,
    Today,
    Tomorrow,
    ThisWeek,
    Later,
    NoDueDate,
}

impl DateBucket {
    pub const DISPLAY_ORDER: [DateBucket; 6] = [
        DateBucket::Overdue,
        DateBucket::Today,
        DateBucket::Tomorrow,
        DateBucket::ThisWeek,
        DateBucket::Later,
        DateBucket::NoDueDate,
    ];

    /// Classify a due date against `today`.
    pub fn classify(due: Option<NaiveDate>, today: NaiveDate) -> Self {
        let Some(due) = due else {
            return DateBucket::NoDueDate;
        };
        match due.signed_duration_since(today).num_days() {
            d if d < 0 => DateBucket::Overdue,
            0 => DateBucket::Today,
            1 => DateBucket::Tomorrow,
            2..=7 => DateBucket::ThisWeek,
            _ => DateBucket::Later,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DateBucket::Overdue => "Overdue",
            DateBucket::Today => "Today",
            DateBucket::Tomorrow => "Tomorrow",
            DateBucket::ThisWeek => "This week",
            DateBucket::Later => "Later",
            DateBucket::NoDueDate => "No due date",
        }
    }
}

/// Shorthand for [`DateBucket::classify`].
pub fn bucket(due: Option<NaiveDate>, today: NaiveDate) -> DateBucket {
    DateBucket::classify(due, today)
}
