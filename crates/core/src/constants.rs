//! Constants used throughout the clinic core crate.

/// First bookable hour of the day.
pub const OPEN_HOUR: u32 = 9;

/// Last bookable hour of the day (inclusive).
pub const CLOSE_HOUR: u32 = 16;

/// Ultrasound studies the office performs.
pub const ULTRASOUND_TYPES: [&str; 7] = [
    "fetal",
    "abdominal",
    "urinary-tract",
    "mammary",
    "muscular",
    "cervical",
    "renal",
];

/// Spanish month names, January first. Matched case-insensitively.
pub const MONTH_NAMES: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// Default directory for clinic data when none is configured.
pub const DEFAULT_CLINIC_DATA_DIR: &str = "clinic_data";

/// Filename of the persisted clinic state.
pub const CLINIC_STATE_FILENAME: &str = "clinic.json";
