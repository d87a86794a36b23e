//! Registered patients.
//!
//! A patient refers to at most one appointment by [`AppointmentKey`]. The appointment
//! itself lives in the [`Agenda`], so operations that act on it take the agenda as an
//! argument. Keeping the agenda and the key in step is the caller's job.

use crate::agenda::Agenda;
use crate::appointment::AppointmentKey;
use crate::conversion::DocumentConverter;
use crate::history::HistoryEntry;
use crate::{ClinicError, ClinicResult};
use chrono::{Datelike, NaiveDate};
use clinic_types::{NonEmptyText, PatientId, TimeSlot};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    id: PatientId,
    name: NonEmptyText,
    sex: String,
    birth_date: NaiveDate,
    /// Current year minus birth year; month and day are ignored.
    age: i32,
    phone: String,
    appointment: Option<AppointmentKey>,
    history: Vec<HistoryEntry>,
}

impl Patient {
    pub fn new(
        id: PatientId,
        name: NonEmptyText,
        sex: impl Into<String>,
        birth_date: NaiveDate,
        phone: impl Into<String>,
        current_year: i32,
    ) -> Self {
        Self {
            id,
            name,
            sex: sex.into(),
            birth_date,
            age: current_year - birth_date.year(),
            phone: phone.into(),
            appointment: None,
            history: Vec::new(),
        }
    }

    pub fn id(&self) -> &PatientId {
        &self.id
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn sex(&self) -> &str {
        &self.sex
    }

    pub fn birth_date(&self) -> NaiveDate {
        self.birth_date
    }

    pub fn age(&self) -> i32 {
        self.age
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn has_appointment(&self) -> bool {
        self.appointment.is_some()
    }

    pub fn appointment(&self) -> Option<AppointmentKey> {
        self.appointment
    }

    pub fn appointment_key(&self) -> ClinicResult<AppointmentKey> {
        self.appointment
            .ok_or_else(|| ClinicError::PatientHasNoAppointment(self.id.clone()))
    }

    pub(crate) fn set_appointment(&mut self, key: AppointmentKey) {
        self.appointment = Some(key);
    }

    /// Forgets the appointment reference. The agenda is not touched.
    pub fn remove_appointment(&mut self) {
        self.appointment = None;
    }

    pub fn confirm_appointment(&self, agenda: &mut Agenda) -> ClinicResult<()> {
        let key = self.appointment_key()?;
        agenda.appointment_mut(key)?.confirm();
        Ok(())
    }

    pub fn appointment_date_time(&self, agenda: &Agenda) -> ClinicResult<(NaiveDate, TimeSlot)> {
        let key = self.appointment_key()?;
        Ok(agenda.appointment(key)?.date_time())
    }

    /// Converts `file` through the current appointment, appends the resulting entry and
    /// marks the appointment attended. Nothing changes if conversion fails.
    pub fn attach_history_from_appointment(
        &mut self,
        agenda: &mut Agenda,
        converter: &dyn DocumentConverter,
        file: &Path,
    ) -> ClinicResult<&HistoryEntry> {
        let key = self.appointment_key()?;
        let appointment = agenda.appointment_mut(key)?;
        let entry = appointment.convert_file(converter, file)?;
        appointment.mark_attended();
        self.history.push(entry);
        self.history
            .last()
            .ok_or_else(|| ClinicError::NoHistoryAvailable(self.id.clone()))
    }

    pub fn has_history(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// One rendering per entry, oldest first.
    pub fn history_as_text(&self) -> Vec<String> {
        self.history.iter().map(ToString::to_string).collect()
    }
}

impl std::fmt::Display for Patient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Name: {} ID: {} Phone: {}", self.name, self.id, self.phone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appointment::AppointmentKind;
    use crate::conversion::ConvertedDocument;

    struct FixedConverter(&'static str);

    impl DocumentConverter for FixedConverter {
        fn convert(&self, _file: &Path, _kind: &AppointmentKind) -> ClinicResult<ConvertedDocument> {
            Ok(ConvertedDocument {
                information: self.0.to_string(),
            })
        }
    }

    struct BrokenConverter;

    impl DocumentConverter for BrokenConverter {
        fn convert(&self, _file: &Path, _kind: &AppointmentKind) -> ClinicResult<ConvertedDocument> {
            Err(ClinicError::ConversionFailed("corrupt".into()))
        }
    }

    fn patient() -> Patient {
        Patient::new(
            PatientId::parse("123").unwrap(),
            NonEmptyText::new("Ana Pérez").unwrap(),
            "F",
            NaiveDate::from_ymd_opt(1990, 6, 15).unwrap(),
            "3001234567",
            2026,
        )
    }

    fn booked(patient: &mut Patient) -> (Agenda, AppointmentKey) {
        let mut agenda = Agenda::new();
        let key = agenda
            .add_appointment(
                NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(),
                TimeSlot::from_hour(10).unwrap(),
                patient.id().clone(),
                None,
            )
            .unwrap()
            .key();
        patient.set_appointment(key);
        (agenda, key)
    }

    #[test]
    fn age_ignores_month_and_day() {
        assert_eq!(patient().age(), 36);
    }

    #[test]
    fn display_summarises_contact() {
        assert_eq!(
            patient().to_string(),
            "Name: Ana Pérez ID: 123 Phone: 3001234567"
        );
    }

    #[test]
    fn appointment_operations_fail_without_appointment() {
        let p = patient();
        let mut agenda = Agenda::new();
        assert!(!p.has_appointment());
        assert!(matches!(
            p.confirm_appointment(&mut agenda),
            Err(ClinicError::PatientHasNoAppointment(_))
        ));
        assert!(matches!(
            p.appointment_date_time(&agenda),
            Err(ClinicError::PatientHasNoAppointment(_))
        ));
    }

    #[test]
    fn confirm_goes_through_agenda() {
        let mut p = patient();
        let (mut agenda, key) = booked(&mut p);

        p.confirm_appointment(&mut agenda).unwrap();
        assert!(agenda.appointment(key).unwrap().is_confirmed());
        assert_eq!(p.appointment_date_time(&agenda).unwrap(), (key.date, key.slot));
    }

    #[test]
    fn remove_appointment_only_clears_reference() {
        let mut p = patient();
        let (agenda, key) = booked(&mut p);

        p.remove_appointment();
        assert!(!p.has_appointment());
        assert!(agenda.appointment(key).is_ok());
    }

    #[test]
    fn attach_history_appends_and_marks_attended() {
        let mut p = patient();
        let (mut agenda, key) = booked(&mut p);

        let first = p
            .attach_history_from_appointment(&mut agenda, &FixedConverter("Todo bien"), Path::new("n.txt"))
            .unwrap()
            .to_string();
        let latest = p
            .attach_history_from_appointment(&mut agenda, &FixedConverter("Control"), Path::new("m.txt"))
            .unwrap()
            .to_string();
        assert_eq!(first, "Date: 2026-01-10\nResult: Todo bien");
        assert_eq!(latest, "Date: 2026-01-10\nResult: Control");

        assert!(agenda.appointment(key).unwrap().is_attended());
        assert!(p.has_history());
        assert_eq!(
            p.history_as_text(),
            vec![
                "Date: 2026-01-10\nResult: Todo bien".to_string(),
                "Date: 2026-01-10\nResult: Control".to_string(),
            ]
        );
    }

    #[test]
    fn failed_conversion_changes_nothing() {
        let mut p = patient();
        let (mut agenda, key) = booked(&mut p);

        let err = p
            .attach_history_from_appointment(&mut agenda, &BrokenConverter, Path::new("x"))
            .unwrap_err();
        assert!(matches!(err, ClinicError::ConversionFailed(_)));
        assert!(!p.has_history());
        assert!(!agenda.appointment(key).unwrap().is_attended());
    }
}
