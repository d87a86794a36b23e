use chrono::NaiveDate;
use clinic_types::{PatientId, TimeSlot};

#[derive(Debug, thiserror::Error)]
pub enum ClinicError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("patient {0} is already registered")]
    PatientAlreadyRegistered(PatientId),
    #[error("patient {0} is not registered")]
    PatientNotFound(String),
    #[error("patient {0} already has an appointment")]
    PatientAlreadyHasAppointment(PatientId),
    #[error("patient {0} has no appointment")]
    PatientHasNoAppointment(PatientId),

    #[error("invalid month name: {0:?}")]
    InvalidMonthName(String),
    #[error("day {day} is not valid for month {month}")]
    InvalidDayForMonth { day: u32, month: u32 },
    #[error("hour {hour} is outside opening hours ({open}-{close})")]
    InvalidHour { hour: u32, open: u32, close: u32 },
    #[error("slot {slot} on {date} is already taken")]
    SlotUnavailable { date: NaiveDate, slot: TimeSlot },
    #[error("invalid ultrasound type: {0:?}")]
    InvalidUltrasoundType(String),
    #[error("invalid birth date {0:?} (expected D/M/Y)")]
    InvalidBirthDate(String),

    #[error("patient {0} has no history")]
    NoHistoryAvailable(PatientId),
    #[error("document conversion failed: {0}")]
    ConversionFailed(String),

    #[error("no appointment at {slot} on {date}")]
    AppointmentNotFound { date: NaiveDate, slot: TimeSlot },
    #[error("no appointments booked on {0}")]
    NoAppointmentsOnDate(NaiveDate),
    #[error("inconsistent clinic state: {0}")]
    InconsistentState(String),

    #[error("failed to create storage directory: {0}")]
    StorageDirCreation(std::io::Error),
    #[error("failed to read clinic state: {0}")]
    FileRead(std::io::Error),
    #[error("failed to write clinic state: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to serialize clinic state: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize clinic state: {0}")]
    Deserialization(serde_json::Error),
}

impl From<clinic_types::ValueError> for ClinicError {
    fn from(err: clinic_types::ValueError) -> Self {
        ClinicError::InvalidInput(err.to_string())
    }
}

impl From<clinic_files::FilesError> for ClinicError {
    fn from(err: clinic_files::FilesError) -> Self {
        ClinicError::ConversionFailed(err.to_string())
    }
}

pub type ClinicResult<T> = std::result::Result<T, ClinicError>;
