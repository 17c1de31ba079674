use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Target length used when none (or nothing sensible) was given.
pub const DEFAULT_TARGET_DAYS: u32 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: Uuid,
    pub name: String,
    #[serde(default = "default_target_days", deserialize_with = "deserialize_target_days")]
    pub target_days: u32,
    pub start_date: DateTime<Utc>,
    /// Stored for snapshot compatibility; progress is derived from `start_date`.
    #[serde(default)]
    pub completed_days: u32,
}

impl Habit {
    pub fn new(name: impl Into<String>, target_days: u32, start_date: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            target_days: target_days.max(1),
            start_date,
            completed_days: 0,
        }
    }
}

fn default_target_days() -> u32 {
    DEFAULT_TARGET_DAYS
}

/// Resolve a requested target length, replacing anything non-positive with the default.
pub fn target_days_or_default(requested: Option<i64>) -> u32 {
    requested
        .filter(|days| *days > 0)
        .and_then(|days| u32::try_from(days).ok())
        .unwrap_or(DEFAULT_TARGET_DAYS)
}

/// Read the leading integer of free-form input ("21", "14 days", "-3").
pub fn parse_target_days(input: &str) -> Option<i64> {
    let input = input.trim();
    let (sign, digits) = match input.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, input.strip_prefix('+').unwrap_or(input)),
    };
    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

fn deserialize_target_days<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<i64> = Option::deserialize(deserializer)?;
    Ok(target_days_or_default(raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn non_positive_targets_fall_back_to_default() {
        assert_eq!(target_days_or_default(None), 30);
        assert_eq!(target_days_or_default(Some(0)), 30);
        assert_eq!(target_days_or_default(Some(-5)), 30);
        assert_eq!(target_days_or_default(Some(21)), 21);
        assert_eq!(target_days_or_default(Some(i64::MAX)), 30);
    }

    #[test]
    fn parse_target_days_reads_leading_integer() {
        assert_eq!(parse_target_days("21"), Some(21));
        assert_eq!(parse_target_days(" 14 days"), Some(14));
        assert_eq!(parse_target_days("-3"), Some(-3));
        assert_eq!(parse_target_days("abc"), None);
        assert_eq!(parse_target_days(""), None);
    }

    #[test]
    fn stored_habit_with_bad_target_loads_with_default() {
        let json = r#"{
            "id": "550e8400-e29b-41d4-a716-446655440001",
            "name": "Meditate",
            "targetDays": 0,
            "startDate": "2026-02-20T07:00:00Z"
        }"#;
        let habit: Habit = serde_json::from_str(json).unwrap();
        assert_eq!(habit.target_days, DEFAULT_TARGET_DAYS);
        assert_eq!(habit.completed_days, 0);
        assert_eq!(
            habit.start_date,
            Utc.with_ymd_and_hms(2026, 2, 20, 7, 0, 0).unwrap()
        );
    }

    #[test]
    fn stored_habit_without_target_uses_default() {
        let json = r#"{
            "id": "550e8400-e29b-41d4-a716-446655440001",
            "name": "Stretch",
            "startDate": "2026-02-20T07:00:00Z",
            "completedDays": 0
        }"#;
        let habit: Habit = serde_json::from_str(json).unwrap();
        assert_eq!(habit.target_days, 30);
    }
}
