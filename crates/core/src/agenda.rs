//! Clinic-wide agenda: one [`DailyAgenda`] per date with bookings.
//!
//! Daily agendas are created on the first booking for a date and kept afterwards, even
//! once every appointment on that date has been cancelled.

use crate::appointment::{Appointment, AppointmentKey};
use crate::daily_agenda::DailyAgenda;
use crate::{ClinicError, ClinicResult};
use chrono::NaiveDate;
use clinic_types::{NonEmptyText, PatientId, TimeSlot};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agenda {
    daily_agendas: BTreeMap<NaiveDate, DailyAgenda>,
}

impl Agenda {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when `slot` is not booked on `date`. Dates with no bookings are always free.
    pub fn is_slot_free(&self, date: NaiveDate, slot: TimeSlot) -> bool {
        self.daily_agendas
            .get(&date)
            .map_or(true, |day| day.is_slot_free(slot))
    }

    pub fn add_appointment(
        &mut self,
        date: NaiveDate,
        slot: TimeSlot,
        patient_id: PatientId,
        ultrasound_type: Option<NonEmptyText>,
    ) -> ClinicResult<&Appointment> {
        self.daily_agendas
            .entry(date)
            .or_insert_with(|| DailyAgenda::new(date))
            .add_appointment(slot, patient_id, ultrasound_type)
    }

    pub fn remove_appointment(&mut self, date: NaiveDate, slot: TimeSlot) -> ClinicResult<Appointment> {
        self.daily_mut(date)?.remove_appointment(slot)
    }

    pub fn has_appointments_on(&self, date: NaiveDate) -> bool {
        self.daily_agendas.contains_key(&date)
    }

    pub fn list_appointments_on(&self, date: NaiveDate) -> ClinicResult<Vec<&Appointment>> {
        Ok(self.daily(date)?.list_appointments())
    }

    pub fn list_time_slots_on(&self, date: NaiveDate) -> ClinicResult<Vec<TimeSlot>> {
        Ok(self.daily(date)?.list_time_slots())
    }

    pub fn list_unconfirmed_on(&self, date: NaiveDate) -> ClinicResult<Vec<&Appointment>> {
        Ok(self.daily(date)?.list_unconfirmed())
    }

    pub fn appointment(&self, key: AppointmentKey) -> ClinicResult<&Appointment> {
        self.daily_agendas
            .get(&key.date)
            .and_then(|day| day.appointment(key.slot))
            .ok_or(ClinicError::AppointmentNotFound {
                date: key.date,
                slot: key.slot,
            })
    }

    pub fn appointment_mut(&mut self, key: AppointmentKey) -> ClinicResult<&mut Appointment> {
        self.daily_agendas
            .get_mut(&key.date)
            .and_then(|day| day.appointment_mut(key.slot))
            .ok_or(ClinicError::AppointmentNotFound {
                date: key.date,
                slot: key.slot,
            })
    }

    /// Every daily agenda, ordered by date.
    pub fn daily_agendas(&self) -> impl Iterator<Item = &DailyAgenda> {
        self.daily_agendas.values()
    }

    /// Every appointment across all dates.
    pub fn appointments(&self) -> impl Iterator<Item = &Appointment> {
        self.daily_agendas
            .values()
            .flat_map(|day| day.list_appointments())
    }

    /// Checks that every daily agenda and appointment is filed under its own date and slot.
    pub(crate) fn check_keys(&self) -> ClinicResult<()> {
        for (date, day) in &self.daily_agendas {
            if day.date() != *date {
                return Err(ClinicError::InconsistentState(format!(
                    "agenda for {} is filed under {}",
                    day.date(),
                    date
                )));
            }
            day.check_keys()?;
        }
        Ok(())
    }

    fn daily(&self, date: NaiveDate) -> ClinicResult<&DailyAgenda> {
        self.daily_agendas
            .get(&date)
            .ok_or(ClinicError::NoAppointmentsOnDate(date))
    }

    fn daily_mut(&mut self, date: NaiveDate) -> ClinicResult<&mut DailyAgenda> {
        self.daily_agendas
            .get_mut(&date)
            .ok_or(ClinicError::NoAppointmentsOnDate(date))
    }
}
