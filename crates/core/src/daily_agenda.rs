//! Appointments booked for a single date.

use crate::appointment::{Appointment, AppointmentKind};
use crate::{ClinicError, ClinicResult};
use chrono::NaiveDate;
use clinic_types::{NonEmptyText, PatientId, TimeSlot};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The appointment book for one calendar date, keyed by slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyAgenda {
    date: NaiveDate,
    appointments: BTreeMap<TimeSlot, Appointment>,
}

impl DailyAgenda {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            appointments: BTreeMap::new(),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn is_slot_free(&self, slot: TimeSlot) -> bool {
        !self.appointments.contains_key(&slot)
    }

    /// Books `slot` for `patient_id`.
    ///
    /// An ultrasound type makes it an ultrasound appointment; `None` books a general one.
    ///
    /// # Errors
    ///
    /// Returns `ClinicError::SlotUnavailable` if the slot is already booked. The existing
    /// appointment is left untouched.
    pub fn add_appointment(
        &mut self,
        slot: TimeSlot,
        patient_id: PatientId,
        ultrasound_type: Option<NonEmptyText>,
    ) -> ClinicResult<&Appointment> {
        if !self.is_slot_free(slot) {
            return Err(ClinicError::SlotUnavailable {
                date: self.date,
                slot,
            });
        }

        let kind = match ultrasound_type {
            Some(ultrasound_type) => AppointmentKind::Ultrasound { ultrasound_type },
            None => AppointmentKind::General,
        };
        let appointment = Appointment::new(self.date, slot, patient_id, kind);
        Ok(&*self.appointments.entry(slot).or_insert(appointment))
    }

    /// Removes and returns the appointment at `slot`.
    pub fn remove_appointment(&mut self, slot: TimeSlot) -> ClinicResult<Appointment> {
        self.appointments
            .remove(&slot)
            .ok_or(ClinicError::AppointmentNotFound {
                date: self.date,
                slot,
            })
    }

    pub fn appointment(&self, slot: TimeSlot) -> Option<&Appointment> {
        self.appointments.get(&slot)
    }

    pub fn appointment_mut(&mut self, slot: TimeSlot) -> Option<&mut Appointment> {
        self.appointments.get_mut(&slot)
    }

    /// All appointments, in no particular order.
    pub fn list_appointments(&self) -> Vec<&Appointment> {
        self.appointments.values().collect()
    }

    /// Booked slots, in no particular order.
    pub fn list_time_slots(&self) -> Vec<TimeSlot> {
        self.appointments.keys().copied().collect()
    }

    /// Appointments still waiting for confirmation, earliest first.
    pub fn list_unconfirmed(&self) -> Vec<&Appointment> {
        let mut pending: Vec<&Appointment> = self
            .appointments
            .values()
            .filter(|a| !a.is_confirmed())
            .collect();
        pending.sort_by_key(|a| a.slot());
        pending
    }

    /// Checks that every appointment sits under its own date and slot.
    pub(crate) fn check_keys(&self) -> ClinicResult<()> {
        for (slot, appointment) in &self.appointments {
            if appointment.date() != self.date || appointment.slot() != *slot {
                return Err(ClinicError::InconsistentState(format!(
                    "appointment for {} {} is filed under {} {}",
                    appointment.date(),
                    appointment.slot(),
                    self.date,
                    slot
                )));
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.appointments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.appointments.is_empty()
    }
}
