//! Validated value types shared by the clinic crates.
//!
//! Each type checks its input once at construction, so code holding one never has to
//! re-validate it. Deserialisation goes through the same constructors.

use chrono::NaiveTime;

/// Errors that can occur when creating validated value types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValueError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
    /// A patient identifier contained whitespace
    #[error("Patient identifier cannot contain whitespace: {0:?}")]
    PatientIdWhitespace(String),
    /// An hour outside 0..=23 was used as a time slot
    #[error("Hour out of range: {0}")]
    HourOutOfRange(u32),
}

/// A string type that guarantees non-empty content.
///
/// The input is trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::Empty` if the trimmed input is empty.
    pub fn new(input: impl AsRef<str>) -> Result<Self, ValueError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ValueError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

/// External patient identifier, typically a national ID number.
///
/// Trimmed, non-empty and free of inner whitespace so it can be used as a registry key
/// and echoed back in listings without quoting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PatientId(String);

impl PatientId {
    /// Parses a patient identifier.
    ///
    /// # Errors
    ///
    /// - `ValueError::Empty` for blank input
    /// - `ValueError::PatientIdWhitespace` if whitespace remains after trimming
    pub fn parse(input: impl AsRef<str>) -> Result<Self, ValueError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ValueError::Empty);
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(ValueError::PatientIdWhitespace(trimmed.to_owned()));
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PatientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PatientId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for PatientId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for PatientId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        PatientId::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// An hour-granularity position in the day.
///
/// Slots carry no minutes. Whether a slot falls inside opening hours is a clinic rule and
/// is not checked here; only the 0..=23 range is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeSlot(u32);

impl TimeSlot {
    /// Creates a slot starting at `hour:00`.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::HourOutOfRange` for hours above 23.
    pub fn from_hour(hour: u32) -> Result<Self, ValueError> {
        if hour > 23 {
            return Err(ValueError::HourOutOfRange(hour));
        }
        Ok(Self(hour))
    }

    pub fn hour(self) -> u32 {
        self.0
    }

    /// The wall-clock time at which the slot starts.
    pub fn start_time(self) -> NaiveTime {
        // from_hour guarantees 0..=23
        NaiveTime::from_hms_opt(self.0, 0, 0).unwrap_or_default()
    }
}

impl std::fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.start_time().format("%H:%M:%S"))
    }
}

impl serde::Serialize for TimeSlot {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u32(self.0)
    }
}

impl<'de> serde::Deserialize<'de> for TimeSlot {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let hour = u32::deserialize(deserializer)?;
        TimeSlot::from_hour(hour).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_text_trims_and_rejects_blank() {
        assert_eq!(NonEmptyText::new("  Ana Pérez ").unwrap().as_str(), "Ana Pérez");
        assert_eq!(NonEmptyText::new("   "), Err(ValueError::Empty));
    }

    #[test]
    fn patient_id_rejects_inner_whitespace() {
        assert_eq!(PatientId::parse(" 123 ").unwrap().as_str(), "123");
        assert!(matches!(
            PatientId::parse("12 3"),
            Err(ValueError::PatientIdWhitespace(_))
        ));
        assert_eq!(PatientId::parse(""), Err(ValueError::Empty));
    }

    #[test]
    fn time_slot_renders_as_clock_time() {
        let slot = TimeSlot::from_hour(9).unwrap();
        assert_eq!(slot.to_string(), "09:00:00");
        assert_eq!(slot.hour(), 9);
        assert_eq!(TimeSlot::from_hour(24), Err(ValueError::HourOutOfRange(24)));
    }

    #[test]
    fn time_slot_works_as_json_map_key() {
        let mut map = std::collections::HashMap::new();
        map.insert(TimeSlot::from_hour(10).unwrap(), "booked");
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"10":"booked"}"#);

        let back: std::collections::HashMap<TimeSlot, String> =
            serde_json::from_str(&json).unwrap();
        assert_eq!(back[&TimeSlot::from_hour(10).unwrap()], "booked");
    }

    #[test]
    fn deserialisation_validates() {
        assert!(serde_json::from_str::<TimeSlot>("25").is_err());
        assert!(serde_json::from_str::<PatientId>(r#""a b""#).is_err());
        assert!(serde_json::from_str::<NonEmptyText>(r#""  ""#).is_err());
    }
}
