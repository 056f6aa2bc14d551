use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// One worklog object as returned by the API. Kept as an open map because
/// several fields arrive either nested or flat depending on the instance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawWorklog {
    fields: Map<String, Value>,
}

impl RawWorklog {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Wraps an arbitrary list element; anything that is not an object
    /// becomes an empty record.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self { fields },
            _ => Self::default(),
        }
    }

    /// Raw value under `name`, including an explicit JSON `null`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Value under `primary`, or under `legacy` when `primary` is missing
    /// altogether. A present `null` under `primary` still wins.
    pub fn get_either(&self, primary: &str, legacy: &str) -> Option<&Value> {
        self.fields.get(primary).or_else(|| self.fields.get(legacy))
    }

    pub fn shape(&self, name: &str) -> FieldShape<'_> {
        FieldShape::of(self.fields.get(name))
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

impl<'de> Deserialize<'de> for RawWorklog {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(RawWorklog::from_value)
    }
}

impl From<Value> for RawWorklog {
    fn from(value: Value) -> Self {
        RawWorklog::from_value(value)
    }
}

/// Tagged view of a field that may be a nested object or a flat value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldShape<'a> {
    Nested(&'a Map<String, Value>),
    Scalar(&'a Value),
    Absent,
}

impl<'a> FieldShape<'a> {
    pub fn of(value: Option<&'a Value>) -> Self {
        match value {
            None | Some(Value::Null) => FieldShape::Absent,
            Some(Value::Object(map)) => FieldShape::Nested(map),
            Some(other) => FieldShape::Scalar(other),
        }
    }

    /// `name` of a nested object, the scalar itself otherwise.
    pub fn name_or_scalar(&self) -> Option<String> {
        match self {
            FieldShape::Nested(map) => map.get("name").and_then(value_text),
            FieldShape::Scalar(value) => value_text(value),
            FieldShape::Absent => None,
        }
    }
}

/// Body of `GET .../worklogs`. Other top-level keys (`response_status`,
/// `list_info`) are ignored.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct WorklogList {
    #[serde(default, deserialize_with = "deserialize_worklogs")]
    pub worklogs: Vec<RawWorklog>,
}

fn deserialize_worklogs<'de, D>(deserializer: D) -> Result<Vec<RawWorklog>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Vec<RawWorklog>>::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}

/// Text form of a JSON value for flat output. Strings are kept verbatim,
/// containers are rendered as compact JSON.
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        other => serde_json::to_string(other).ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn shape_distinguishes_nested_scalar_and_absent() {
        let raw = RawWorklog::from_value(json!({
            "owner": {"name": "Alice", "id": "7"},
            "created_by": "Bob",
            "worklog_type": null
        }));

        assert!(matches!(raw.shape("owner"), FieldShape::Nested(_)));
        assert!(matches!(raw.shape("created_by"), FieldShape::Scalar(_)));
        assert_eq!(raw.shape("worklog_type"), FieldShape::Absent);
        assert_eq!(raw.shape("missing"), FieldShape::Absent);
    }

    #[test]
    fn name_or_scalar_reads_nested_name() {
        let raw = RawWorklog::from_value(json!({
            "owner": {"id": "7"},
            "created_by": {"name": "Alice"},
            "worklog_type": 12
        }));

        assert_eq!(raw.shape("created_by").name_or_scalar().as_deref(), Some("Alice"));
        assert_eq!(raw.shape("owner").name_or_scalar(), None);
        assert_eq!(raw.shape("worklog_type").name_or_scalar().as_deref(), Some("12"));
    }

    #[test]
    fn get_either_prefers_present_primary_even_when_null() {
        let raw = RawWorklog::from_value(json!({"other_charges": null, "additional_cost": "5"}));
        assert_eq!(raw.get_either("other_charges", "additional_cost"), Some(&Value::Null));

        let legacy = RawWorklog::from_value(json!({"additional_cost": "5"}));
        assert_eq!(
            legacy.get_either("other_charges", "additional_cost"),
            Some(&json!("5"))
        );
    }

    #[test]
    fn worklog_list_tolerates_missing_null_and_odd_entries() {
        let missing: WorklogList = serde_json::from_str(r#"{"response_status": {}}"#).unwrap();
        assert!(missing.worklogs.is_empty());

        let null: WorklogList = serde_json::from_str(r#"{"worklogs": null}"#).unwrap();
        assert!(null.worklogs.is_empty());

        let mixed: WorklogList = serde_json::from_str(r#"{"worklogs": [{"id": 1}, "junk"]}"#).unwrap();
        assert_eq!(mixed.worklogs.len(), 2);
        assert_eq!(mixed.worklogs[0].get("id"), Some(&json!(1)));
        assert!(mixed.worklogs[1].fields().is_empty());
    }

    #[test]
    fn value_text_renders_scalars_and_containers() {
        assert_eq!(value_text(&json!("x")).as_deref(), Some("x"));
        assert_eq!(value_text(&json!(1.5)).as_deref(), Some("1.5"));
        assert_eq!(value_text(&json!(true)).as_deref(), Some("true"));
        assert_eq!(value_text(&json!({"value": "1"})).as_deref(), Some(r#"{"value":"1"}"#));
        assert_eq!(value_text(&Value::Null), None);
    }
}
