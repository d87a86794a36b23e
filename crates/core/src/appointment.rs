//! Appointments and their lifecycle flags.
//!
//! An appointment is owned by the [`crate::DailyAgenda`] for its date. Patients refer to it
//! through an [`AppointmentKey`], never by holding the value itself.

use crate::conversion::DocumentConverter;
use crate::history::HistoryEntry;
use crate::ClinicResult;
use chrono::NaiveDate;
use clinic_types::{NonEmptyText, PatientId, TimeSlot};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Type of care booked.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AppointmentKind {
    General,
    Ultrasound { ultrasound_type: NonEmptyText },
}

impl AppointmentKind {
    pub fn label(&self) -> &str {
        match self {
            AppointmentKind::General => "general",
            AppointmentKind::Ultrasound { ultrasound_type } => ultrasound_type.as_str(),
        }
    }
}

/// Identifies an appointment within the agenda.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AppointmentKey {
    pub date: NaiveDate,
    pub slot: TimeSlot,
}

/// A booked slot.
///
/// `confirmed` and `attended` only ever move from false to true.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    date: NaiveDate,
    slot: TimeSlot,
    patient_id: PatientId,
    confirmed: bool,
    attended: bool,
    #[serde(flatten)]
    kind: AppointmentKind,
}

impl Appointment {
    pub fn new(date: NaiveDate, slot: TimeSlot, patient_id: PatientId, kind: AppointmentKind) -> Self {
        Self {
            date,
            slot,
            patient_id,
            confirmed: false,
            attended: false,
            kind,
        }
    }

    pub fn confirm(&mut self) {
        self.confirmed = true;
    }

    pub fn mark_attended(&mut self) {
        self.attended = true;
    }

    pub fn date_time(&self) -> (NaiveDate, TimeSlot) {
        (self.date, self.slot)
    }

    pub fn key(&self) -> AppointmentKey {
        AppointmentKey {
            date: self.date,
            slot: self.slot,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn slot(&self) -> TimeSlot {
        self.slot
    }

    pub fn patient_id(&self) -> &PatientId {
        &self.patient_id
    }

    pub fn is_confirmed(&self) -> bool {
        self.confirmed
    }

    pub fn is_attended(&self) -> bool {
        self.attended
    }

    pub fn kind(&self) -> &AppointmentKind {
        &self.kind
    }

    /// Turns an uploaded file into a history entry of the matching kind.
    ///
    /// General appointments produce clinical notes; ultrasound appointments produce
    /// ultrasound results carrying the same ultrasound type. The entry is dated with the
    /// appointment date.
    ///
    /// # Errors
    ///
    /// Propagates `ClinicError::ConversionFailed` from the converter.
    pub fn convert_file(
        &self,
        converter: &dyn DocumentConverter,
        file: &Path,
    ) -> ClinicResult<HistoryEntry> {
        let converted = converter.convert(file, &self.kind)?;
        Ok(match &self.kind {
            AppointmentKind::General => HistoryEntry::clinical(self.date, converted.information),
            AppointmentKind::Ultrasound { ultrasound_type } => {
                HistoryEntry::ultrasound(self.date, converted.information, ultrasound_type.clone())
            }
        })
    }
}

impl std::fmt::Display for Appointment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Date: {}, Time: {}", self.date, self.slot)?;
        if let AppointmentKind::Ultrasound { ultrasound_type } = &self.kind {
            write!(f, ", Ultrasound type: {ultrasound_type}")?;
        }
        Ok(())
    }
}
