//! Calendar and input validation.
//!
//! Dates reach the clinic as a Spanish month name and a day number; the year is always the
//! configured current year. February is treated as 28 days long in every year.

use crate::constants::MONTH_NAMES;
use crate::{ClinicError, ClinicResult};
use chrono::NaiveDate;

/// Resolves a Spanish month name ("enero" … "diciembre") to 1..=12.
///
/// Matching ignores case and surrounding whitespace.
pub fn month_number(name: &str) -> Option<u32> {
    let wanted = name.trim().to_lowercase();
    MONTH_NAMES
        .iter()
        .position(|m| *m == wanted)
        .map(|idx| idx as u32 + 1)
}

/// Days in `month` under the office's calendar rule (February always 28).
pub fn days_in_month(month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        _ => 28,
    }
}

pub fn is_valid_day(day: u32, month: u32) -> bool {
    (1..=days_in_month(month)).contains(&day)
}

/// Resolves a month name and day into a date in `year`.
///
/// # Errors
///
/// - `ClinicError::InvalidMonthName` if the month does not resolve
/// - `ClinicError::InvalidDayForMonth` if the day is out of range for that month
pub fn resolve_date(month_name: &str, day: u32, year: i32) -> ClinicResult<NaiveDate> {
    let month = month_number(month_name)
        .ok_or_else(|| ClinicError::InvalidMonthName(month_name.to_string()))?;
    if !is_valid_day(day, month) {
        return Err(ClinicError::InvalidDayForMonth { day, month });
    }
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or(ClinicError::InvalidDayForMonth { day, month })
}

/// Parses a slash-separated `D/M/Y` birth date, e.g. `15/6/1990`.
///
/// Dates after `current_year` are rejected.
pub fn parse_birth_date(text: &str, current_year: i32) -> ClinicResult<NaiveDate> {
    let invalid = || ClinicError::InvalidBirthDate(text.to_string());

    let parts: Vec<&str> = text.trim().split('/').map(str::trim).collect();
    let [day, month, year] = parts.as_slice() else {
        return Err(invalid());
    };
    let day: u32 = day.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    let year: i32 = year.parse().map_err(|_| invalid())?;

    let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)?;
    if year > current_year {
        return Err(invalid());
    }
    Ok(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_names_resolve_case_insensitively() {
        assert_eq!(month_number("enero"), Some(1));
        assert_eq!(month_number(" ABRIL "), Some(4));
        assert_eq!(month_number("Diciembre"), Some(12));
        assert_eq!(month_number("january"), None);
        assert_eq!(month_number(""), None);
    }

    #[test]
    fn day_validity_follows_fixed_month_lengths() {
        assert!(!is_valid_day(31, 4));
        assert!(is_valid_day(30, 4));
        assert!(is_valid_day(31, 1));
        assert!(is_valid_day(28, 2));
        assert!(!is_valid_day(29, 2));
        assert!(!is_valid_day(0, 1));
    }

    #[test]
    fn february_29_is_rejected_even_in_leap_years() {
        let err = resolve_date("febrero", 29, 2028).unwrap_err();
        assert!(matches!(
            err,
            ClinicError::InvalidDayForMonth { day: 29, month: 2 }
        ));
    }

    #[test]
    fn resolve_date_uses_given_year() {
        let date = resolve_date("enero", 10, 2026).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2026, 1, 10).unwrap());
        assert!(matches!(
            resolve_date("enro", 10, 2026),
            Err(ClinicError::InvalidMonthName(_))
        ));
    }

    #[test]
    fn birth_dates_parse_day_month_year() {
        let date = parse_birth_date("15/6/1990", 2026).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(1990, 6, 15).unwrap());

        for bad in ["1990-06-15", "15/6", "31/2/1990", "a/b/c", "1/1/2030", ""] {
            assert!(
                matches!(
                    parse_birth_date(bad, 2026),
                    Err(ClinicError::InvalidBirthDate(_))
                ),
                "{bad} should be rejected"
            );
        }
    }
}
