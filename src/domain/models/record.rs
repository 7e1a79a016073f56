//! Raw Allure/Jenkins test result records.
//!
//! These mirror the JSON emitted per test by the Allure Jenkins plugin.
//! Every field is optional: the reports are produced by many tool
//! versions and routinely omit sections or write `null` in their place.
//! A `null` is treated exactly like an absent field, and an absent list
//! deserializes as an empty list.

use serde::{Deserialize, Deserializer, Serialize};

/// Label name carrying the fully qualified test class (the grouping key).
pub const TEST_CLASS_LABEL: &str = "testClass";

/// Deserialize `null` as the type's default value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One test result record as found in an `*-result.json` file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTestRecord {
    /// Test method name
    #[serde(default)]
    pub name: Option<String>,

    /// Fully qualified test name (`com.foo.BarTest.shouldBaz`)
    #[serde(default)]
    pub full_name: Option<String>,

    /// Free-text test description
    #[serde(default)]
    pub description: Option<String>,

    /// Raw status string (`passed`, `failed`, `broken`, ...)
    #[serde(default)]
    pub status: Option<String>,

    /// Failure message
    #[serde(default)]
    pub status_message: Option<String>,

    /// Failure stack trace
    #[serde(default)]
    pub status_trace: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub labels: Vec<Label>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub before_stages: Vec<StageRecord>,

    #[serde(default)]
    pub test_stage: Option<StageRecord>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub after_stages: Vec<StageRecord>,

    #[serde(default)]
    pub time: Option<TimeRecord>,

    #[serde(default)]
    pub extra: Option<ExtraRecord>,
}

impl RawTestRecord {
    /// Value of the first label with the given name.
    pub fn label(&self, name: &str) -> Option<&str> {
        self.labels
            .iter()
            .find(|label| label.name == name)
            .map(|label| label.value.as_str())
    }

    /// Fully qualified test class name, if the record carries one.
    pub fn test_class(&self) -> Option<&str> {
        self.label(TEST_CLASS_LABEL)
    }

    /// History section under `extra.history`, if present.
    pub fn history(&self) -> Option<&HistoryRecord> {
        self.extra.as_ref().and_then(|extra| extra.history.as_ref())
    }
}

/// A `{name, value}` label pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: String,
}

impl Label {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A before/test/after execution stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl StageRecord {
    pub fn new(name: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            status: Some(status.into()),
        }
    }
}

/// Timing section; `duration` is in milliseconds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRecord {
    #[serde(default)]
    pub start: Option<i64>,
    #[serde(default)]
    pub stop: Option<i64>,
    #[serde(default)]
    pub duration: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtraRecord {
    #[serde(default)]
    pub history: Option<HistoryRecord>,
}

/// Execution history of the same test across previous builds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    #[serde(default)]
    pub statistic: Option<HistoryStatistic>,

    /// Past runs, most recent first.
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<HistoryItem>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryStatistic {
    #[serde(default, deserialize_with = "null_as_default")]
    pub total: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub passed: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub failed: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub broken: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub skipped: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub unknown: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub status_details: Option<String>,
    #[serde(default)]
    pub time: Option<TimeRecord>,
}

impl HistoryItem {
    pub fn with_status(status: impl Into<String>) -> Self {
        Self {
            status: Some(status.into()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_record() {
        let json = r#"{
            "name": "shouldLogin",
            "fullName": "com.acme.LoginTest.shouldLogin",
            "status": "failed",
            "statusMessage": "expected true",
            "statusTrace": "at com.acme.LoginTest.shouldLogin(LoginTest.java:17)",
            "labels": [{"name": "testClass", "value": "com.acme.LoginTest"}],
            "beforeStages": [{"name": "setUp", "status": "passed"}],
            "testStage": {"status": "failed"},
            "afterStages": [],
            "time": {"start": 1, "stop": 1501, "duration": 1500},
            "extra": {"history": {
                "statistic": {"total": 4, "passed": 3},
                "items": [{"uid": "a", "status": "failed"}]
            }}
        }"#;

        let record: RawTestRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.test_class(), Some("com.acme.LoginTest"));
        assert_eq!(record.before_stages.len(), 1);
        assert_eq!(record.time.unwrap().duration, Some(1500));
        let history = record.extra.unwrap().history.unwrap();
        assert_eq!(history.statistic.unwrap().total, 4);
        assert_eq!(history.items[0].status.as_deref(), Some("failed"));
    }

    #[test]
    fn test_null_fields_behave_like_absent() {
        let json = r#"{
            "status": null,
            "labels": null,
            "beforeStages": null,
            "afterStages": null,
            "testStage": null,
            "extra": {"history": {"statistic": {"total": null}, "items": null}}
        }"#;

        let record: RawTestRecord = serde_json::from_str(json).unwrap();
        assert!(record.status.is_none());
        assert!(record.labels.is_empty());
        assert!(record.before_stages.is_empty());
        assert!(record.after_stages.is_empty());
        let history = record.history().unwrap();
        assert_eq!(history.statistic.unwrap().total, 0);
        assert!(history.items.is_empty());
    }

    #[test]
    fn test_empty_object_is_a_valid_record() {
        let record: RawTestRecord = serde_json::from_str("{}").unwrap();
        assert_eq!(record, RawTestRecord::default());
        assert!(record.test_class().is_none());
    }

    #[test]
    fn test_first_matching_label_wins() {
        let record = RawTestRecord {
            labels: vec![
                Label::new("suite", "Smoke"),
                Label::new("testClass", "com.acme.First"),
                Label::new("testClass", "com.acme.Second"),
            ],
            ..Default::default()
        };
        assert_eq!(record.test_class(), Some("com.acme.First"));
        assert_eq!(record.label("suite"), Some("Smoke"));
        assert_eq!(record.label("host"), None);
    }
}
