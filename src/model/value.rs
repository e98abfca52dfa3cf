use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use serde_json::{Map, Number, Value as JsonValue};

/// A value stored in a document field
///
/// Every shape that can arrive from the API maps onto exactly one variant,
/// so renderers match on this enum instead of probing the raw JSON.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    String(String),
    Number(Number),
    Boolean(bool),
    Date(DateTime<Utc>),
    Array(Vec<Value>),
    /// Fields in their original order
    Object(Vec<(String, Value)>),
}

/// Visual category of a value (drives colouring only)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Null,
    String,
    Number,
    Boolean,
    Date,
    Other,
}

/// Classify a value for display purposes
pub fn classify(value: &Value) -> Category {
    match value {
        Value::Null => Category::Null,
        Value::String(_) => Category::String,
        Value::Number(_) => Category::Number,
        Value::Boolean(_) => Category::Boolean,
        Value::Date(_) => Category::Date,
        Value::Array(_) | Value::Object(_) => Category::Other,
    }
}

impl Value {
    /// Convert a serde_json value, recognising extended-JSON date wrappers
    pub fn from_json(json: &JsonValue) -> Value {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Boolean(*b),
            JsonValue::Number(n) => Value::Number(n.clone()),
            JsonValue::String(s) => Value::String(s.clone()),
            JsonValue::Array(items) => Value::Array(items.iter().map(Value::from_json).collect()),
            JsonValue::Object(map) => match parse_date_wrapper(map) {
                Some(date) => Value::Date(date),
                None => Value::Object(
                    map.iter()
                        .map(|(k, v)| (k.clone(), Value::from_json(v)))
                        .collect(),
                ),
            },
        }
    }

    /// Convert back to serde_json, re-wrapping dates as `{"$date": ...}`
    pub fn to_json(&self) -> JsonValue {
        match self {
            Value::Null => JsonValue::Null,
            Value::String(s) => JsonValue::String(s.clone()),
            Value::Number(n) => JsonValue::Number(n.clone()),
            Value::Boolean(b) => JsonValue::Bool(*b),
            Value::Date(date) => {
                let mut map = Map::new();
                map.insert("$date".to_string(), JsonValue::String(format_date(date)));
                JsonValue::Object(map)
            }
            Value::Array(items) => JsonValue::Array(items.iter().map(Value::to_json).collect()),
            Value::Object(fields) => JsonValue::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }

    /// Plain text form, used for display and for the clipboard
    ///
    /// Strings come back verbatim (no quotes, no escaping). Compound values
    /// fall back to compact JSON.
    pub fn text(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::Date(date) => format_date(date),
            Value::Array(_) | Value::Object(_) => self.to_json().to_string(),
        }
    }
}

fn format_date(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// `{"$date": "<rfc3339>"}`, `{"$date": <millis>}` or `{"$date": {"$numberLong": "<millis>"}}`
fn parse_date_wrapper(map: &Map<String, JsonValue>) -> Option<DateTime<Utc>> {
    if map.len() != 1 {
        return None;
    }
    match map.get("$date")? {
        JsonValue::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|d| d.with_timezone(&Utc)),
        JsonValue::Number(n) => n
            .as_i64()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        JsonValue::Object(inner) if inner.len() == 1 => inner
            .get("$numberLong")?
            .as_str()?
            .parse::<i64>()
            .ok()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classify_scalars() {
        assert_eq!(classify(&Value::from_json(&json!(null))), Category::Null);
        assert_eq!(classify(&Value::from_json(&json!("x"))), Category::String);
        assert_eq!(classify(&Value::from_json(&json!(4.5))), Category::Number);
        assert_eq!(classify(&Value::from_json(&json!(false))), Category::Boolean);
        assert_eq!(
            classify(&Value::from_json(&json!({"$date": "2024-03-01T10:00:00Z"}))),
            Category::Date
        );
        assert_eq!(classify(&Value::from_json(&json!([1]))), Category::Other);
        assert_eq!(classify(&Value::from_json(&json!({"a": 1}))), Category::Other);
    }

    #[test]
    fn test_text_is_not_json_escaped() {
        let value = Value::from_json(&json!("he said \"hi\"\n"));
        assert_eq!(value.text(), "he said \"hi\"\n");
        assert_eq!(Value::from_json(&json!(42)).text(), "42");
        assert_eq!(Value::from_json(&json!(true)).text(), "true");
        assert_eq!(Value::Null.text(), "null");
    }

    #[test]
    fn test_date_wrappers() {
        let iso = Value::from_json(&json!({"$date": "2024-03-01T10:00:00Z"}));
        assert_eq!(iso.text(), "2024-03-01T10:00:00.000Z");

        let long = Value::from_json(&json!({"$date": {"$numberLong": "0"}}));
        assert_eq!(long.text(), "1970-01-01T00:00:00.000Z");

        // An unparseable wrapper stays an object
        let bogus = Value::from_json(&json!({"$date": "yesterday"}));
        assert!(matches!(bogus, Value::Object(_)));

        // Plain strings that look like dates are left alone
        let plain = Value::from_json(&json!("2024-03-01T10:00:00Z"));
        assert_eq!(classify(&plain), Category::String);
    }

    #[test]
    fn test_object_keeps_field_order() {
        let value = Value::from_json(&json!({"zeta": 1, "alpha": 2, "mid": 3}));
        let Value::Object(fields) = value else {
            panic!("Expected an Object variant");
        };
        let keys: Vec<&str> = fields.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_json_round_trip_keeps_wire_text() {
        let json = json!({"b": [1, {"c": null}], "a": {"$date": "2024-03-01T10:00:00.000Z"}});
        let value = Value::from_json(&json);
        assert_eq!(value.to_json().to_string(), json.to_string());
    }
}
