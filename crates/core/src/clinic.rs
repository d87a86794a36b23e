//! The clinic: patient registry plus agenda, and the rules that bind them.
//!
//! Every operation validates fully before mutating anything, and reports the first failed
//! check as a distinct [`ClinicError`]. The clinic keeps two facts in step: an appointment
//! exists in the agenda exactly when its patient holds its key.

use crate::agenda::Agenda;
use crate::appointment::{Appointment, AppointmentKey};
use crate::config::ClinicConfig;
use crate::conversion::DocumentConverter;
use crate::patient::Patient;
use crate::validation::{parse_birth_date, resolve_date};
use crate::{ClinicError, ClinicResult};
use chrono::NaiveDate;
use clinic_types::{NonEmptyText, PatientId, TimeSlot};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// One occupied position of a daily schedule.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ScheduleEntry {
    /// Patient rendering (name, id, phone)
    pub patient: String,
    /// Appointment rendering (date, time, ultrasound type)
    pub appointment: String,
}

/// Everything the clinic needs persisted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClinicState {
    pub patients: BTreeMap<PatientId, Patient>,
    pub agenda: Agenda,
}

impl ClinicState {
    fn check(&self) -> ClinicResult<()> {
        self.agenda.check_keys()?;

        for (id, patient) in &self.patients {
            if patient.id() != id {
                return Err(ClinicError::InconsistentState(format!(
                    "patient {} is filed under {}",
                    patient.id(),
                    id
                )));
            }
            if let Some(key) = patient.appointment() {
                let booked_for = self
                    .agenda
                    .appointment(key)
                    .map_err(|_| {
                        ClinicError::InconsistentState(format!(
                            "patient {} refers to missing appointment {} {}",
                            id, key.date, key.slot
                        ))
                    })?
                    .patient_id();
                if booked_for != id {
                    return Err(ClinicError::InconsistentState(format!(
                        "patient {} refers to the appointment of patient {}",
                        id, booked_for
                    )));
                }
            }
        }

        for appointment in self.agenda.appointments() {
            let holder = self
                .patients
                .get(appointment.patient_id())
                .and_then(Patient::appointment);
            if holder != Some(appointment.key()) {
                return Err(ClinicError::InconsistentState(format!(
                    "appointment {} {} is not held by registered patient {}",
                    appointment.date(),
                    appointment.slot(),
                    appointment.patient_id()
                )));
            }
        }
        Ok(())
    }
}

pub struct Clinic {
    cfg: ClinicConfig,
    converter: Box<dyn DocumentConverter>,
    patients: BTreeMap<PatientId, Patient>,
    agenda: Agenda,
}

impl Clinic {
    pub fn new(cfg: ClinicConfig, converter: Box<dyn DocumentConverter>) -> Self {
        Self {
            cfg,
            converter,
            patients: BTreeMap::new(),
            agenda: Agenda::new(),
        }
    }

    /// Rebuilds a clinic from previously saved state.
    ///
    /// # Errors
    ///
    /// Returns `ClinicError::InconsistentState` unless every patient key resolves to an
    /// appointment booked for that patient, every appointment belongs to a registered
    /// patient holding its key, and every appointment is filed under its own date and slot.
    pub fn from_state(
        cfg: ClinicConfig,
        converter: Box<dyn DocumentConverter>,
        state: ClinicState,
    ) -> ClinicResult<Self> {
        state.check()?;
        Ok(Self {
            cfg,
            converter,
            patients: state.patients,
            agenda: state.agenda,
        })
    }

    /// Copies out the persisted part of the clinic.
    pub fn snapshot(&self) -> ClinicState {
        ClinicState {
            patients: self.patients.clone(),
            agenda: self.agenda.clone(),
        }
    }

    pub fn config(&self) -> &ClinicConfig {
        &self.cfg
    }

    pub fn agenda(&self) -> &Agenda {
        &self.agenda
    }

    pub fn patient(&self, id: &str) -> ClinicResult<&Patient> {
        let id = registered_id(id)?;
        self.patients.get(&id).ok_or_else(|| not_found(&id))
    }

    /// Registered patients, ordered by id.
    pub fn patients(&self) -> impl Iterator<Item = &Patient> {
        self.patients.values()
    }

    pub fn patient_count(&self) -> usize {
        self.patients.len()
    }

    /// Adds a patient to the registry.
    ///
    /// `birth_date` is slash-separated day/month/year, e.g. `15/6/1990`.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for a blank or malformed id or a blank name
    /// - `PatientAlreadyRegistered` if the id is taken
    /// - `InvalidBirthDate` if the date does not parse or lies after the current year
    pub fn register_patient(
        &mut self,
        id: &str,
        name: &str,
        sex: &str,
        birth_date: &str,
        phone: &str,
    ) -> ClinicResult<&Patient> {
        let id = PatientId::parse(id)?;
        if self.patients.contains_key(&id) {
            tracing::warn!("refused registration: patient {} already registered", id);
            return Err(ClinicError::PatientAlreadyRegistered(id));
        }
        let name = NonEmptyText::new(name)?;
        let birth_date = parse_birth_date(birth_date, self.cfg.current_year())?;

        let patient = Patient::new(
            id.clone(),
            name,
            sex.trim(),
            birth_date,
            phone.trim(),
            self.cfg.current_year(),
        );
        tracing::info!("registered patient {}", id);
        Ok(&*self.patients.entry(id).or_insert(patient))
    }

    /// Removes a patient, cancelling their appointment first.
    pub fn remove_patient(&mut self, id: &str) -> ClinicResult<Patient> {
        let id = registered_id(id)?;
        let patient = self.patients.get(&id).ok_or_else(|| not_found(&id))?;

        if patient.has_appointment() {
            self.cancel_appointment(id.as_str())?;
        }

        let removed = self.patients.remove(&id).ok_or_else(|| not_found(&id))?;
        tracing::info!("removed patient {}", id);
        Ok(removed)
    }

    /// Books an appointment for a registered patient.
    ///
    /// Checks run in this order and the first failure is returned: patient exists, patient
    /// has no appointment, month name resolves, day is valid for the month, hour is within
    /// opening hours, slot is free, ultrasound type (if any) is known.
    pub fn schedule_appointment(
        &mut self,
        id: &str,
        month_name: &str,
        day: u32,
        hour: u32,
        ultrasound_type: Option<&str>,
    ) -> ClinicResult<AppointmentKey> {
        let id = registered_id(id)?;
        let patient = self.patients.get(&id).ok_or_else(|| not_found(&id))?;
        if patient.has_appointment() {
            tracing::warn!("refused booking: patient {} already has an appointment", id);
            return Err(ClinicError::PatientAlreadyHasAppointment(id));
        }

        let date = resolve_date(month_name, day, self.cfg.current_year())?;
        let slot = self.opening_slot(hour)?;
        if !self.agenda.is_slot_free(date, slot) {
            tracing::warn!("refused booking: {} {} is taken", date, slot);
            return Err(ClinicError::SlotUnavailable { date, slot });
        }
        let ultrasound_type = ultrasound_type
            .map(|name| self.ultrasound_type(name))
            .transpose()?;

        let key = self
            .agenda
            .add_appointment(date, slot, id.clone(), ultrasound_type)?
            .key();
        if let Some(patient) = self.patients.get_mut(&id) {
            patient.set_appointment(key);
        }
        tracing::info!("booked {} {} for patient {}", date, slot, id);
        Ok(key)
    }

    pub fn confirm_appointment(&mut self, id: &str) -> ClinicResult<()> {
        let patient = with_appointment(&self.patients, id)?;
        tracing::debug!("confirming appointment for patient {}", patient.id());
        patient.confirm_appointment(&mut self.agenda)
    }

    /// Frees the patient's slot and clears their appointment.
    pub fn cancel_appointment(&mut self, id: &str) -> ClinicResult<Appointment> {
        let patient = with_appointment(&self.patients, id)?;
        let id = patient.id().clone();
        let key = patient.appointment_key()?;
        let booked_for = self.agenda.appointment(key)?.patient_id();
        if booked_for != &id {
            return Err(ClinicError::InconsistentState(format!(
                "patient {} refers to the appointment of patient {}",
                id, booked_for
            )));
        }

        let removed = self.agenda.remove_appointment(key.date, key.slot)?;
        if let Some(patient) = self.patients.get_mut(&id) {
            patient.remove_appointment();
        }
        tracing::info!("cancelled {} {} for patient {}", key.date, key.slot, id);
        Ok(removed)
    }

    /// Records the visit: converts `file` into a history entry and marks the appointment
    /// attended.
    pub fn attend_appointment(&mut self, id: &str, file: &Path) -> ClinicResult<()> {
        let id = registered_id(id)?;
        let patient = self.patients.get_mut(&id).ok_or_else(|| not_found(&id))?;

        patient.attach_history_from_appointment(&mut self.agenda, &*self.converter, file)?;
        tracing::info!("attended appointment for patient {}", id);
        Ok(())
    }

    /// The day's bookings, one position per opening hour, earliest first.
    ///
    /// Free hours are `None`. Dates with no bookings yield an all-`None` schedule.
    pub fn daily_schedule(
        &self,
        month_name: &str,
        day: u32,
    ) -> ClinicResult<Vec<Option<ScheduleEntry>>> {
        let date = resolve_date(month_name, day, self.cfg.current_year())?;
        let booked = self.booked_on(date)?;

        self.cfg
            .hours()
            .map(|hour| {
                booked
                    .iter()
                    .find(|a| a.slot().hour() == hour)
                    .map(|a| self.schedule_entry(a))
                    .transpose()
            })
            .collect()
    }

    /// Availability per opening hour, earliest first; `true` means free.
    pub fn daily_availability(&self, month_name: &str, day: u32) -> ClinicResult<Vec<bool>> {
        let date = resolve_date(month_name, day, self.cfg.current_year())?;
        self.cfg
            .hours()
            .map(|hour| -> ClinicResult<bool> {
                Ok(self.agenda.is_slot_free(date, self.opening_slot(hour)?))
            })
            .collect()
    }

    /// Appointments on the given day still waiting for confirmation, earliest first.
    pub fn unconfirmed_appointments(
        &self,
        month_name: &str,
        day: u32,
    ) -> ClinicResult<Vec<&Appointment>> {
        let date = resolve_date(month_name, day, self.cfg.current_year())?;
        if !self.agenda.has_appointments_on(date) {
            return Ok(Vec::new());
        }
        self.agenda.list_unconfirmed_on(date)
    }

    /// The patient's history, one rendering per entry, oldest first.
    pub fn patient_history(&self, id: &str) -> ClinicResult<Vec<String>> {
        let patient = self.patient(id)?;
        if !patient.has_history() {
            return Err(ClinicError::NoHistoryAvailable(patient.id().clone()));
        }
        Ok(patient.history_as_text())
    }

    fn opening_slot(&self, hour: u32) -> ClinicResult<TimeSlot> {
        let invalid = ClinicError::InvalidHour {
            hour,
            open: self.cfg.open_hour(),
            close: self.cfg.close_hour(),
        };
        if !self.cfg.hours().contains(&hour) {
            return Err(invalid);
        }
        TimeSlot::from_hour(hour).map_err(|_| invalid)
    }

    fn ultrasound_type(&self, name: &str) -> ClinicResult<NonEmptyText> {
        if !self.cfg.is_valid_ultrasound_type(name) {
            return Err(ClinicError::InvalidUltrasoundType(name.to_string()));
        }
        Ok(NonEmptyText::new(name)?)
    }

    fn booked_on(&self, date: NaiveDate) -> ClinicResult<Vec<&Appointment>> {
        if !self.agenda.has_appointments_on(date) {
            return Ok(Vec::new());
        }
        self.agenda.list_appointments_on(date)
    }

    fn schedule_entry(&self, appointment: &Appointment) -> ClinicResult<ScheduleEntry> {
        let patient = self
            .patients
            .get(appointment.patient_id())
            .ok_or_else(|| not_found(appointment.patient_id()))?;
        Ok(ScheduleEntry {
            patient: patient.to_string(),
            appointment: appointment.to_string(),
        })
    }
}

/// Parses an id being looked up. Malformed ids can never be registered, so they are
/// reported as unregistered rather than as bad input.
fn registered_id(id: &str) -> ClinicResult<PatientId> {
    PatientId::parse(id).map_err(|_| ClinicError::PatientNotFound(id.trim().to_string()))
}

fn not_found(id: &PatientId) -> ClinicError {
    ClinicError::PatientNotFound(id.to_string())
}

/// Looks up a registered patient who currently holds an appointment.
fn with_appointment<'a>(
    patients: &'a BTreeMap<PatientId, Patient>,
    id: &str,
) -> ClinicResult<&'a Patient> {
    let id = registered_id(id)?;
    let patient = patients.get(&id).ok_or_else(|| not_found(&id))?;
    if !patient.has_appointment() {
        return Err(ClinicError::PatientHasNoAppointment(id));
    }
    Ok(patient)
}
