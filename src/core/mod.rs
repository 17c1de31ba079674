pub mod clock;
pub mod collections;
pub mod goal;
pub mod habit;
pub mod progress;
pub mod task;

use chrono::NaiveDate;

/// Storage and input format for calendar dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` date; blank input means "no date".
pub fn parse_date(input: &str) -> Result<Option<NaiveDate>, chrono::ParseError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(input, DATE_FORMAT).map(Some)
}

/// Serde helper for optional dates that older snapshots stored as `""`.
pub(crate) mod optional_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            Some(value) => super::parse_date(&value).map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_accepts_iso_dates() {
        assert_eq!(
            parse_date("2026-11-01").unwrap(),
            Some(NaiveDate::from_ymd_opt(2026, 11, 1).unwrap())
        );
        assert_eq!(
            parse_date("  2026-02-24 ").unwrap(),
            Some(NaiveDate::from_ymd_opt(2026, 2, 24).unwrap())
        );
    }

    #[test]
    fn parse_date_blank_is_none() {
        assert_eq!(parse_date("").unwrap(), None);
        assert_eq!(parse_date("   ").unwrap(), None);
    }

    #[test]
    fn parse_date_rejects_garbage() {
        assert!(parse_date("next tuesday").is_err());
        assert!(parse_date("2026-13-01").is_err());
    }
}
