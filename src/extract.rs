//! Task identifier extraction from the input table.

use std::collections::{BTreeSet, HashMap};
use std::io::Read;
use std::path::Path;

use sdp_api::{resolve_endpoints, Endpoint};

use crate::error::SchemaError;

const TASK_COLUMNS: [&str; 2] = ["task_id", "TaskID"];
const REQUEST_COLUMNS: [&str; 2] = ["request_id", "RequestID"];

/// Cell contents treated as missing values.
const NA_MARKERS: [&str; 12] = [
    "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "null", "NULL", "None", "<NA>", "#N/A",
];

/// Work queue for a run: the distinct task ids plus the parent request of
/// each task, when the input names one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskIndex {
    tasks: BTreeSet<String>,
    task_to_request: HashMap<String, Option<String>>,
    has_request_column: bool,
}

impl TaskIndex {
    pub fn from_path(path: &Path) -> Result<Self, SchemaError> {
        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)?;
        Self::from_csv(reader)
    }

    pub fn from_reader<R: Read>(input: R) -> Result<Self, SchemaError> {
        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(input);
        Self::from_csv(reader)
    }

    fn from_csv<R: Read>(mut reader: csv::Reader<R>) -> Result<Self, SchemaError> {
        let headers = reader.headers()?.clone();
        let find = |names: &[&str]| {
            names
                .iter()
                .find_map(|name| headers.iter().position(|header| header_name(header) == *name))
        };

        let task_idx = find(&TASK_COLUMNS[..]).ok_or_else(|| SchemaError::MissingTaskColumn {
            found: headers.iter().map(str::to_string).collect(),
        })?;
        let request_idx = find(&REQUEST_COLUMNS[..]);

        let mut index = TaskIndex {
            has_request_column: request_idx.is_some(),
            ..TaskIndex::default()
        };

        for record in reader.records() {
            let record = record?;
            let line = record.position().map(|pos| pos.line()).unwrap_or_default();
            let task = canonical_cell(&record, task_idx, &headers, line)?;
            let Some(task) = task else {
                continue;
            };
            if let Some(request_idx) = request_idx {
                let request = canonical_cell(&record, request_idx, &headers, line)?;
                index.task_to_request.insert(task.clone(), request);
            }
            index.tasks.insert(task);
        }

        Ok(index)
    }

    /// Distinct task ids in processing order.
    pub fn tasks(&self) -> impl Iterator<Item = &str> {
        self.tasks.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn has_request_column(&self) -> bool {
        self.has_request_column
    }

    pub fn request_for(&self, task_id: &str) -> Option<&str> {
        self.task_to_request
            .get(task_id)
            .and_then(|request| request.as_deref())
    }

    pub fn endpoints_for(&self, task_id: &str) -> Vec<Endpoint> {
        resolve_endpoints(task_id, self.request_for(task_id))
    }
}

fn canonical_cell(
    record: &csv::StringRecord,
    idx: usize,
    headers: &csv::StringRecord,
    line: u64,
) -> Result<Option<String>, SchemaError> {
    let raw = record.get(idx).unwrap_or_default();
    if is_missing(raw) {
        return Ok(None);
    }
    canonical_identifier(raw)
        .map(Some)
        .ok_or_else(|| SchemaError::InvalidIdentifier {
            line,
            column: headers.get(idx).unwrap_or_default().to_string(),
            value: raw.to_string(),
        })
}

fn header_name(header: &str) -> &str {
    header.trim_start_matches('\u{feff}').trim()
}

fn is_missing(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty() || NA_MARKERS.contains(&trimmed)
}

/// Integer text of a numeric cell: `"100"`, `"100.0"` and `"1e2"` all become
/// `"100"`. Non-integral values yield `None`.
pub fn canonical_identifier(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if let Ok(value) = trimmed.parse::<i64>() {
        return Some(value.to_string());
    }
    let value = trimmed.parse::<f64>().ok()?;
    if !value.is_finite() || value.fract() != 0.0 || value.abs() >= i64::MAX as f64 {
        return None;
    }
    Some((value as i64).to_string())
}
