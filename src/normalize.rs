//! Raw worklog to flat row conversion.
//!
//! The API returns `time_spent`, `worklog_type`, `created_by` and `owner`
//! either nested or flat depending on the instance and version. Every helper
//! here degrades to `None` instead of failing.

use chrono::{DateTime, Local};
use sdp_api::{value_text, FieldShape, RawWorklog};
use serde_json::Value;

use crate::row::NormalizedRow;

pub const LOAD_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Duration in both numeric and display form. Either all parts come from the
/// same source representation or the numeric parts are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeSpent {
    pub hours: Option<i64>,
    pub minutes: Option<i64>,
    pub display: Option<String>,
}

pub fn normalize_time_spent(shape: FieldShape<'_>) -> TimeSpent {
    match shape {
        FieldShape::Nested(map) => {
            let hours = map.get("hours").and_then(integral);
            let minutes = map.get("minutes").and_then(integral);
            match (hours, minutes) {
                (Some(hours), Some(minutes)) => TimeSpent {
                    hours: Some(hours),
                    minutes: Some(minutes),
                    display: Some(format!("{}:{:02}", hours, minutes)),
                },
                _ => TimeSpent::default(),
            }
        }
        FieldShape::Scalar(Value::String(text)) if text.contains(':') => {
            let (hours, minutes) = text.split_once(':').unwrap_or((text.as_str(), ""));
            TimeSpent {
                hours: digits(hours),
                minutes: digits(minutes),
                display: Some(text.clone()),
            }
        }
        FieldShape::Scalar(value) => TimeSpent {
            hours: None,
            minutes: None,
            display: value_text(value),
        },
        FieldShape::Absent => TimeSpent::default(),
    }
}

pub fn normalize_worklog_type(shape: FieldShape<'_>) -> Option<String> {
    shape.name_or_scalar()
}

pub fn normalize_person(shape: FieldShape<'_>) -> Option<String> {
    shape.name_or_scalar()
}

pub fn include_non_operational_hours(raw: &RawWorklog) -> Option<String> {
    raw.get_either("include_non_operational_hours", "include_nonoperational_hours")
        .and_then(value_text)
}

pub fn other_charges(raw: &RawWorklog) -> Option<String> {
    raw.get_either("other_charges", "additional_cost")
        .and_then(value_text)
}

/// Builds the output row for one raw worklog of `task_id`.
pub fn normalize_worklog(task_id: &str, raw: &RawWorklog, loaded_at: DateTime<Local>) -> NormalizedRow {
    let time_spent = normalize_time_spent(raw.shape("time_spent"));
    let text = |name: &str| raw.get(name).and_then(value_text);

    NormalizedRow {
        task_id: task_id.to_string(),
        worklog_id: text("id"),
        worklog_type: normalize_worklog_type(raw.shape("worklog_type")),
        start_time: text("start_time"),
        end_time: text("end_time"),
        time_spent: time_spent.display,
        description: text("description"),
        include_non_operational_hours: include_non_operational_hours(raw),
        other_charges: other_charges(raw),
        created_by: normalize_person(raw.shape("created_by")),
        owner: normalize_person(raw.shape("owner")),
        load_date_time: loaded_at.format(LOAD_DATETIME_FORMAT).to_string(),
        time_spent_hours: time_spent.hours,
        time_spent_minutes: time_spent.minutes,
    }
}

/// Parses a string made only of ASCII digits.
fn digits(part: &str) -> Option<i64> {
    if part.is_empty() || !part.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

/// Whole number from a JSON integer, an integral float or a digit string.
fn integral(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|float| float.is_finite() && float.fract() == 0.0)
                .map(|float| float as i64)
        }),
        Value::String(text) => digits(text.trim()),
        _ => None,
    }
}
