use crate::errors::TrackerError;
use crate::grid::GridCell;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Details {
    pub value: f64,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub completed: bool,
    pub details: Details,
}

impl DailyRecord {
    pub fn completed(details: Details) -> Self {
        Self {
            completed: true,
            details,
        }
    }

    fn to_value(&self) -> Value {
        json!({
            "completed": self.completed,
            "details": {
                "value": self.details.value,
                "unit": self.details.unit,
            }
        })
    }

    /// Writes this record over the JSON it was loaded from, keeping any
    /// fields this service does not know about.
    fn merged_into(&self, stored: Option<&Value>) -> Value {
        let Some(Value::Object(existing)) = stored else {
            return self.to_value();
        };
        let mut details = match existing.get("details") {
            Some(Value::Object(details)) => details.clone(),
            _ => Map::new(),
        };
        details.insert("value".to_string(), json!(self.details.value));
        details.insert("unit".to_string(), Value::String(self.details.unit.clone()));

        let mut merged = existing.clone();
        merged.insert("completed".to_string(), Value::Bool(self.completed));
        merged.insert("details".to_string(), Value::Object(details));
        Value::Object(merged)
    }

    /// Decodes one persisted record, recovering field by field when the
    /// stored shape is off. Bad fields fall back to "not completed" / 0 / "".
    fn decode(date: &str, raw: &Value) -> Result<Self, (Self, TrackerError)> {
        let typed = serde_json::from_value::<DailyRecord>(raw.clone());
        if let Ok(record) = &typed {
            if is_valid_value(record.details.value) {
                return Ok(record.clone());
            }
        }

        let details = raw.get("details");
        let value = details
            .and_then(|d| d.get("value"))
            .and_then(Value::as_f64)
            .filter(|v| is_valid_value(*v))
            .unwrap_or(0.0);
        let unit = details
            .and_then(|d| d.get("unit"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let salvaged = Self {
            completed: raw.get("completed").and_then(Value::as_bool).unwrap_or(false),
            details: Details { value, unit },
        };

        let reason = match typed {
            Err(err) => err.to_string(),
            Ok(_) => "value must be a finite, non-negative number".to_string(),
        };
        Err((
            salvaged,
            TrackerError::MalformedRecord {
                date: date.to_string(),
                reason,
            },
        ))
    }
}

pub(crate) fn is_valid_value(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

/// One activity's per-day records keyed by date key.
///
/// `stored` keeps the JSON each day was loaded from. Days that are never
/// rewritten are saved back exactly as found, malformed ones included.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityLog {
    days: BTreeMap<String, DailyRecord>,
    stored: Map<String, Value>,
}

impl ActivityLog {
    pub fn get(&self, date_key: &str) -> Option<&DailyRecord> {
        self.days.get(date_key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &DailyRecord)> {
        self.days.iter()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub(crate) fn with_record(&self, date_key: &str, record: DailyRecord) -> Self {
        let mut stored = self.stored.clone();
        stored.insert(date_key.to_string(), record.merged_into(self.stored.get(date_key)));
        let mut days = self.days.clone();
        days.insert(date_key.to_string(), record);
        Self { days, stored }
    }

    fn from_value(activity: &str, raw: &Value) -> Self {
        let Some(entries) = raw.as_object() else {
            warn!("activity {activity} is not a JSON object; treating it as empty");
            return Self::default();
        };

        let mut days = BTreeMap::new();
        for (date, record) in entries {
            if !record.is_object() {
                warn!("record for {date} in {activity} is not an object; ignoring it");
                continue;
            }
            let record = match DailyRecord::decode(date, record) {
                Ok(record) => record,
                Err((salvaged, err)) => {
                    warn!("{err}");
                    salvaged
                }
            };
            days.insert(date.clone(), record);
        }
        Self {
            days,
            stored: entries.clone(),
        }
    }

    fn to_value(&self) -> Value {
        Value::Object(self.stored.clone())
    }
}

impl FromIterator<(String, DailyRecord)> for ActivityLog {
    fn from_iter<I: IntoIterator<Item = (String, DailyRecord)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::default(), |log, (date, record)| log.with_record(&date, record))
    }
}

/// The whole persisted blob: activity name to activity log. Activities other
/// than the tracked one are kept as raw JSON so they survive a save untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoreDocument {
    activities: Map<String, Value>,
}

impl StoreDocument {
    pub fn activity_log(&self, activity: &str) -> ActivityLog {
        self.activities
            .get(activity)
            .map(|raw| ActivityLog::from_value(activity, raw))
            .unwrap_or_default()
    }

    pub fn with_activity_log(&self, activity: &str, log: &ActivityLog) -> Self {
        let mut activities = self.activities.clone();
        activities.insert(activity.to_string(), log.to_value());
        Self { activities }
    }

    pub fn raw_activity(&self, activity: &str) -> Option<&Value> {
        self.activities.get(activity)
    }
}

#[derive(Debug, Deserialize)]
pub struct RecordRequest {
    pub confirm: bool,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Declined,
    Created,
    Amended,
    Unchanged,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TodayResponse {
    pub date: String,
    pub completed: bool,
    pub value: f64,
    pub unit: String,
    pub streak: u32,
    pub total_value: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecordResponse {
    pub outcome: OutcomeKind,
    pub today: TodayResponse,
}

/// Everything the rendering sink needs to draw the widget.
#[derive(Debug, Serialize)]
pub struct WidgetView {
    pub activity: String,
    pub streak: u32,
    pub streak_label: String,
    pub total_value: f64,
    pub unit: String,
    pub columns: u32,
    pub cells: Vec<GridCell>,
}
