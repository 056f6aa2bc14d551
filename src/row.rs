//! Flat output record written to the extract file.

use serde::Serialize;

/// Output columns, in file order.
pub const COLUMNS: [&str; 14] = [
    "TaskID",
    "WorklogID",
    "WorklogType",
    "StartTime",
    "EndTime",
    "TimeSpent",
    "Description",
    "IncludeNonOperationalHours",
    "OtherCharges",
    "CreatedBy",
    "Owner",
    "LoadDateTime",
    "time_spent_hours",
    "time_spent_minutes",
];

/// Represents one worklog entry of one task with every field flattened to text or integer; `None` is written as an empty cell.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRow {
    #[serde(rename = "TaskID")]
    pub task_id: String,
    #[serde(rename = "WorklogID")]
    pub worklog_id: Option<String>,
    #[serde(rename = "WorklogType")]
    pub worklog_type: Option<String>,
    #[serde(rename = "StartTime")]
    pub start_time: Option<String>,
    #[serde(rename = "EndTime")]
    pub end_time: Option<String>,
    #[serde(rename = "TimeSpent")]
    pub time_spent: Option<String>,
    #[serde(rename = "Description")]
    pub description: Option<String>,
    #[serde(rename = "IncludeNonOperationalHours")]
    pub include_non_operational_hours: Option<String>,
    #[serde(rename = "OtherCharges")]
    pub other_charges: Option<String>,
    #[serde(rename = "CreatedBy")]
    pub created_by: Option<String>,
    #[serde(rename = "Owner")]
    pub owner: Option<String>,
    #[serde(rename = "LoadDateTime")]
    pub load_date_time: String,
    pub time_spent_hours: Option<i64>,
    pub time_spent_minutes: Option<i64>,
}
