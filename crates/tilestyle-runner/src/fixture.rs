use crate::io::{read_document, DocumentError};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::path::Path;
use tilestyle_expr::{FeatureProperties, Value};

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
pub struct FeatureFixture {
    #[serde(default)]
    pub properties: BTreeMap<String, JsonValue>,
    #[serde(default)]
    pub class_name: Option<String>,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub time_since_load: Option<f64>,
}

#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error("feature property `{property}` is an object; only null, booleans, numbers, strings and arrays are supported")]
    UnsupportedValue { property: String },
}

pub fn load_feature_fixture(path: &Path) -> Result<FeatureFixture, FixtureError> {
    Ok(read_document(path)?)
}

impl FeatureFixture {
    pub fn into_subject(self, default_time_since_load: f64) -> Result<FeatureProperties, FixtureError> {
        let mut subject = FeatureProperties::new()
            .with_time_since_load(self.time_since_load.unwrap_or(default_time_since_load));
        for (name, raw) in self.properties {
            let value = json_to_value(&raw).ok_or_else(|| FixtureError::UnsupportedValue {
                property: name.clone(),
            })?;
            subject.insert(name, value);
        }
        if let Some(class_name) = self.class_name {
            subject = subject.with_class(class_name);
        }
        for class in self.classes {
            subject.add_class(class);
        }
        Ok(subject)
    }
}

fn json_to_value(raw: &JsonValue) -> Option<Value> {
    Some(match raw {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(value) => Value::Bool(*value),
        JsonValue::Number(number) => Value::Number(number.as_f64()?),
        JsonValue::String(text) => Value::String(text.clone()),
        JsonValue::Array(items) => Value::Array(items.iter().map(json_to_value).collect::<Option<_>>()?),
        JsonValue::Object(_) => return None,
    })
}

#[cfg(test)]
#[path = "fixture_test.rs"]
mod tests;
