//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into [`crate::Clinic`].
//! The engine never reads the clock or environment while handling an operation, so tests
//! can pin the year and run many clinics side by side.

use crate::constants::{CLOSE_HOUR, OPEN_HOUR, ULTRASOUND_TYPES};
use crate::{ClinicError, ClinicResult};
use chrono::Datelike;

/// Office settings resolved at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClinicConfig {
    open_hour: u32,
    close_hour: u32,
    ultrasound_types: Vec<String>,
    current_year: i32,
}

impl ClinicConfig {
    /// Create a new `ClinicConfig`.
    ///
    /// Ultrasound type names are trimmed and lower-cased.
    ///
    /// # Errors
    ///
    /// Returns `ClinicError::InvalidConfig` if:
    /// - `open_hour` is after `close_hour`, or `close_hour` is past 23,
    /// - the ultrasound type list is empty or contains blank or duplicate names.
    pub fn new(
        open_hour: u32,
        close_hour: u32,
        ultrasound_types: impl IntoIterator<Item = impl AsRef<str>>,
        current_year: i32,
    ) -> ClinicResult<Self> {
        if close_hour > 23 {
            return Err(ClinicError::InvalidConfig(format!(
                "close hour {close_hour} is past 23"
            )));
        }
        if open_hour > close_hour {
            return Err(ClinicError::InvalidConfig(format!(
                "open hour {open_hour} is after close hour {close_hour}"
            )));
        }

        let mut types: Vec<String> = Vec::new();
        for name in ultrasound_types {
            let name = name.as_ref().trim().to_lowercase();
            if name.is_empty() {
                return Err(ClinicError::InvalidConfig(
                    "ultrasound type names cannot be empty".into(),
                ));
            }
            if types.contains(&name) {
                return Err(ClinicError::InvalidConfig(format!(
                    "duplicate ultrasound type {name:?}"
                )));
            }
            types.push(name);
        }
        if types.is_empty() {
            return Err(ClinicError::InvalidConfig(
                "at least one ultrasound type is required".into(),
            ));
        }

        Ok(Self {
            open_hour,
            close_hour,
            ultrasound_types: types,
            current_year,
        })
    }

    /// Standard office settings (9:00 to 16:00, seven ultrasound types) for `year`.
    pub fn standard(year: i32) -> Self {
        Self {
            open_hour: OPEN_HOUR,
            close_hour: CLOSE_HOUR,
            ultrasound_types: ULTRASOUND_TYPES.iter().map(|t| t.to_string()).collect(),
            current_year: year,
        }
    }

    /// Standard office settings for the current local calendar year.
    pub fn for_current_year() -> Self {
        Self::standard(local_year())
    }

    pub fn open_hour(&self) -> u32 {
        self.open_hour
    }

    pub fn close_hour(&self) -> u32 {
        self.close_hour
    }

    /// Opening hours as an inclusive range.
    pub fn hours(&self) -> std::ops::RangeInclusive<u32> {
        self.open_hour..=self.close_hour
    }

    /// Number of bookable slots per day.
    pub fn slots_per_day(&self) -> usize {
        (self.close_hour - self.open_hour + 1) as usize
    }

    pub fn ultrasound_types(&self) -> &[String] {
        &self.ultrasound_types
    }

    pub fn is_valid_ultrasound_type(&self, name: &str) -> bool {
        self.ultrasound_types.iter().any(|t| t == name)
    }

    pub fn current_year(&self) -> i32 {
        self.current_year
    }
}

/// The calendar year on the local clock. Read once at startup, never per operation.
pub fn local_year() -> i32 {
    chrono::Local::now().year()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_config_matches_office_hours() {
        let cfg = ClinicConfig::standard(2026);
        assert_eq!(cfg.hours(), 9..=16);
        assert_eq!(cfg.slots_per_day(), 8);
        assert_eq!(cfg.ultrasound_types().len(), 7);
        assert!(cfg.is_valid_ultrasound_type("fetal"));
        assert!(!cfg.is_valid_ultrasound_type("Fetal"));
    }

    #[test]
    fn new_normalises_type_names() {
        let cfg = ClinicConfig::new(8, 12, [" Renal ", "fetal"], 2026).unwrap();
        assert_eq!(cfg.ultrasound_types(), ["renal", "fetal"]);
        assert_eq!(cfg.slots_per_day(), 5);
    }

    #[test]
    fn new_rejects_bad_settings() {
        let cases: Vec<ClinicResult<ClinicConfig>> = vec![
            ClinicConfig::new(17, 9, ["fetal"], 2026),
            ClinicConfig::new(9, 24, ["fetal"], 2026),
            ClinicConfig::new(9, 16, Vec::<String>::new(), 2026),
            ClinicConfig::new(9, 16, ["fetal", "FETAL"], 2026),
            ClinicConfig::new(9, 16, ["  "], 2026),
        ];
        for case in cases {
            assert!(matches!(case, Err(ClinicError::InvalidConfig(_))));
        }
    }
}
