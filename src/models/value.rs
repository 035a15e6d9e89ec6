use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Map of named, typed values stored in a single JSON column.
pub type Settings = BTreeMap<String, SettingValue>;

/// A typed value inside a settings or variables map.
///
/// Serialized untagged, so the stored JSON is a plain object such as
/// `{"SafetyFactor": 1.5, "DesignCode": "AISC"}`. Variant order matters for
/// deserialization: integers are tried before floats, so `10` reads back as
/// [`SettingValue::Integer`] and `10.0` as [`SettingValue::Number`]. Use
/// [`SettingValue::as_f64`] to compare numbers by value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Null,
    Bool(bool),
    Integer(i64),
    Number(f64),
    Text(String),
    List(Vec<SettingValue>),
    Map(BTreeMap<String, SettingValue>),
}

impl SettingValue {
    /// Numeric value of an integer or floating variant.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<&str> for SettingValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for SettingValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for SettingValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<bool> for SettingValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floats_and_integers_compare_by_value() {
        let settings: Settings = serde_json::from_str(r#"{"x": 10.0, "n": 10}"#).unwrap();

        assert_eq!(settings["x"], SettingValue::Number(10.0));
        assert_eq!(settings["n"], SettingValue::Integer(10));
        assert_eq!(settings["x"].as_f64(), settings["n"].as_f64());
    }

    #[test]
    fn nested_values_survive_json() {
        let json = r#"{"limits":{"span":[1,2.5]},"enabled":true,"note":null,"code":"AISC"}"#;
        let settings: Settings = serde_json::from_str(json).unwrap();

        assert_eq!(settings["enabled"].as_bool(), Some(true));
        assert!(settings["note"].is_null());
        assert_eq!(settings["code"].as_str(), Some("AISC"));
        let SettingValue::Map(limits) = &settings["limits"] else {
            panic!("expected nested map");
        };
        assert_eq!(
            limits["span"],
            SettingValue::List(vec![SettingValue::Integer(1), SettingValue::Number(2.5)])
        );
        assert_eq!(
            serde_json::to_string(&settings).unwrap(),
            r#"{"code":"AISC","enabled":true,"limits":{"span":[1,2.5]},"note":null}"#
        );
    }
}
