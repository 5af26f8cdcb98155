//! Wire format of a ThingSpeak-style channel feed
//!
//! ```json
//! {
//!   "channel": { "id": 2716041, "field1": "Temperature", "field2": "Humidity" },
//!   "feeds": [
//!     { "created_at": "2024-01-01T00:00:00Z", "entry_id": 812, "field1": "22.5", "field2": "65.0" }
//!   ]
//! }
//! ```

use crate::error::{AppError, Result};
use crate::models::SensorReading;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// Feed document as returned by `/channels/{id}/feeds.json`
#[derive(Debug, Clone, Deserialize)]
pub struct FeedDocument {
    /// Channel description (unused beyond logging)
    #[serde(default)]
    pub channel: Option<Value>,

    /// Entries, newest first when `results=1` is requested
    ///
    /// Kept as raw JSON so a malformed entry is reported as a format error
    /// rather than failing the whole document.
    #[serde(default)]
    pub feeds: Option<Value>,
}

/// One channel entry
#[derive(Debug, Clone, Deserialize)]
pub struct FeedEntry {
    #[serde(default)]
    pub created_at: Option<String>,

    #[serde(default)]
    pub entry_id: Option<u64>,

    /// Numbered channel fields (`field1` … `field8`) and anything else the provider adds
    #[serde(flatten)]
    pub fields: HashMap<String, Value>,
}

/// Which channel fields carry which quantity
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMapping {
    pub temperature: String,
    pub humidity: String,
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self {
            temperature: "field1".to_string(),
            humidity: "field2".to_string(),
        }
    }
}

impl FeedDocument {
    /// Validate the newest entry and map it to a sensor reading
    pub fn latest_reading(&self, mapping: &FieldMapping) -> Result<SensorReading> {
        let feeds = match &self.feeds {
            None | Some(Value::Null) => {
                return Err(AppError::SensorFormat(
                    "response has no 'feeds' list".to_string(),
                ))
            }
            Some(Value::Array(entries)) => entries,
            Some(other) => {
                return Err(AppError::SensorFormat(format!(
                    "'feeds' is not a list: {}",
                    other
                )))
            }
        };

        let latest = feeds.first().ok_or(AppError::NoSensorData)?;
        FeedEntry::from_value(latest)?.to_reading(mapping)
    }
}

impl FeedEntry {
    /// Decode one raw feed entry
    pub fn from_value(value: &Value) -> Result<Self> {
        FeedEntry::deserialize(value)
            .map_err(|e| AppError::SensorFormat(format!("malformed feed entry: {}", e)))
    }

    pub fn to_reading(&self, mapping: &FieldMapping) -> Result<SensorReading> {
        let timestamp = self
            .created_at
            .clone()
            .ok_or_else(|| AppError::SensorFormat("entry has no 'created_at'".to_string()))?;

        Ok(SensorReading {
            timestamp,
            temperature: self.numeric_field(&mapping.temperature)?,
            humidity: self.numeric_field(&mapping.humidity)?,
        })
    }

    fn numeric_field(&self, name: &str) -> Result<f64> {
        let value = match self.fields.get(name) {
            None | Some(Value::Null) => {
                return Err(AppError::SensorFormat(format!("missing field '{}'", name)))
            }
            Some(Value::String(raw)) => raw.trim().parse::<f64>().map_err(|_| {
                AppError::SensorFormat(format!("field '{}' is not a number: '{}'", name, raw))
            })?,
            Some(Value::Number(n)) => n.as_f64().ok_or_else(|| {
                AppError::SensorFormat(format!("field '{}' is not representable as f64", name))
            })?,
            Some(other) => {
                return Err(AppError::SensorFormat(format!(
                    "field '{}' has unexpected type: {}",
                    name, other
                )))
            }
        };

        if !value.is_finite() {
            return Err(AppError::SensorFormat(format!(
                "field '{}' is not finite: {}",
                name, value
            )));
        }
        Ok(value)
    }
}
