//! Patient history entries.
//!
//! An entry records one attended visit. Entries are created from the appointment that was
//! attended and are never edited afterwards.

use chrono::NaiveDate;
use clinic_types::NonEmptyText;
use serde::{Deserialize, Serialize};

/// What kind of visit produced a history entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HistoryKind {
    /// General consultation note.
    Clinical,
    /// Ultrasound study result.
    Ultrasound { ultrasound_type: NonEmptyText },
}

/// A completed-visit record attached to a patient.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    date: NaiveDate,
    information: String,
    #[serde(flatten)]
    kind: HistoryKind,
}

impl HistoryEntry {
    pub fn clinical(date: NaiveDate, information: impl Into<String>) -> Self {
        Self {
            date,
            information: information.into(),
            kind: HistoryKind::Clinical,
        }
    }

    pub fn ultrasound(
        date: NaiveDate,
        information: impl Into<String>,
        ultrasound_type: NonEmptyText,
    ) -> Self {
        Self {
            date,
            information: information.into(),
            kind: HistoryKind::Ultrasound { ultrasound_type },
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn information(&self) -> &str {
        &self.information
    }

    pub fn kind(&self) -> &HistoryKind {
        &self.kind
    }
}

impl std::fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Date: {}", self.date)?;
        if let HistoryKind::Ultrasound { ultrasound_type } = &self.kind {
            writeln!(f, "Ultrasound type: {ultrasound_type}")?;
        }
        write!(f, "Result: {}", self.information)
    }
}
