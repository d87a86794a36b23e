//! # Clinic Core
//!
//! Scheduling and registry engine for a small medical office.
//!
//! This crate contains the in-memory data model and the rules around it:
//! - Patient registration and removal
//! - Booking, confirming, cancelling and attending appointments (general or ultrasound)
//! - Daily schedules projected onto the office's opening hours
//! - Per-patient visit history built from uploaded documents
//!
//! **No interface concerns**: the command-line driver lives in `clinic-cli`. Document
//! conversion and persistence are reached through the [`DocumentConverter`] and
//! [`ClinicStore`] traits.
//!
//! ```no_run
//! use clinic_core::{Clinic, ClinicConfig, NoDocumentConverter};
//!
//! # fn main() -> Result<(), clinic_core::ClinicError> {
//! let mut clinic = Clinic::new(ClinicConfig::for_current_year(), Box::new(NoDocumentConverter));
//! clinic.register_patient("123", "Ana Pérez", "F", "15/6/1990", "3001234567")?;
//! clinic.schedule_appointment("123", "enero", 10, 10, Some("fetal"))?;
//! let schedule = clinic.daily_schedule("enero", 10)?;
//! assert_eq!(schedule.len(), 8);
//! # Ok(())
//! # }
//! ```

pub mod agenda;
pub mod appointment;
pub mod clinic;
pub mod config;
pub mod constants;
pub mod conversion;
pub mod daily_agenda;
pub mod error;
pub mod history;
pub mod patient;
pub mod store;
pub mod validation;

pub use agenda::Agenda;
pub use appointment::{Appointment, AppointmentKey, AppointmentKind};
pub use clinic::{Clinic, ClinicState, ScheduleEntry};
pub use config::ClinicConfig;
pub use conversion::{ConvertedDocument, DocumentConverter, FileDocumentConverter, NoDocumentConverter};
pub use daily_agenda::DailyAgenda;
pub use error::{ClinicError, ClinicResult};
pub use history::{HistoryEntry, HistoryKind};
pub use patient::Patient;
pub use store::{ClinicStore, JsonFileStore};

pub use clinic_types::{NonEmptyText, PatientId, TimeSlot};
