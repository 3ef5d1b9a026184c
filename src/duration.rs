//! Service duration labels such as "45 min".
//!
//! Only minute values are understood. Anything else ("4 horas", "1h30") is a
//! parse error and callers fall back to the schedule's slot duration.

use thiserror::Error;

use crate::scheduler::MINUTES_PER_DAY;

const MINUTE_UNITS: &[&str] = &["", "m", "min", "mins", "minute", "minutes", "minuto", "minutos"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationParseError {
    #[error("duration label is empty")]
    Empty,
    #[error("duration '{0}' does not start with a number of minutes")]
    MissingNumber(String),
    #[error("duration '{0}' must be greater than zero")]
    Zero(String),
    #[error("duration '{0}' is longer than a day")]
    TooLong(String),
    #[error("duration '{label}' uses unsupported unit '{unit}', only minutes are accepted")]
    UnsupportedUnit { label: String, unit: String },
}

/// Parse a duration label into whole minutes.
pub fn parse_minutes(label: &str) -> Result<u32, DurationParseError> {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        return Err(DurationParseError::Empty);
    }

    let digits_end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let (number, rest) = trimmed.split_at(digits_end);
    let minutes: u32 = number
        .parse()
        .map_err(|_| DurationParseError::MissingNumber(trimmed.to_string()))?;

    let unit = rest.trim().to_lowercase();
    if !MINUTE_UNITS.contains(&unit.as_str()) {
        return Err(DurationParseError::UnsupportedUnit {
            label: trimmed.to_string(),
            unit,
        });
    }
    if minutes == 0 {
        return Err(DurationParseError::Zero(trimmed.to_string()));
    }
    if minutes > MINUTES_PER_DAY {
        return Err(DurationParseError::TooLong(trimmed.to_string()));
    }
    Ok(minutes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minute_labels() {
        assert_eq!(parse_minutes("90 min"), Ok(90));
        assert_eq!(parse_minutes("45min"), Ok(45));
        assert_eq!(parse_minutes(" 30 minutos "), Ok(30));
        assert_eq!(parse_minutes("60 Minutes"), Ok(60));
        assert_eq!(parse_minutes("15"), Ok(15));
    }

    #[test]
    fn hours_are_not_read_as_minutes() {
        assert!(matches!(
            parse_minutes("4 horas"),
            Err(DurationParseError::UnsupportedUnit { .. })
        ));
        assert!(parse_minutes("2 hours").is_err());
        assert!(parse_minutes("1h30").is_err());
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_minutes(""), Err(DurationParseError::Empty));
        assert!(matches!(
            parse_minutes("about an hour"),
            Err(DurationParseError::MissingNumber(_))
        ));
        assert!(matches!(parse_minutes("0 min"), Err(DurationParseError::Zero(_))));
        assert!(matches!(
            parse_minutes("4294967000 min"),
            Err(DurationParseError::TooLong(_))
        ));
        assert_eq!(parse_minutes("1440 min"), Ok(1440));
        assert!(parse_minutes("-5 min").is_err());
    }
}
