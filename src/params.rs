//! Named cipher parameters.
//!
//! Callers pass a loose bag of `name -> value`; each cipher pulls out the
//! entries it understands and falls back to its own defaults for the rest.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{CipherError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Number(i64),
    Text(String),
}

impl ParamValue {
    /// Parses a command-line style value: integers become numbers,
    /// anything else is kept as text.
    pub fn parse_loose(raw: &str) -> Self {
        match raw.trim().parse::<i64>() {
            Ok(n) => ParamValue::Number(n),
            Err(_) => ParamValue::Text(raw.to_string()),
        }
    }
}

impl From<i64> for ParamValue {
    fn from(n: i64) -> Self {
        ParamValue::Number(n)
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Text(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Text(s)
    }
}

/// Parameter bag handed to every cipher transform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params(BTreeMap<String, ParamValue>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: &str, value: impl Into<ParamValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: impl Into<ParamValue>) {
        self.0.insert(name.to_string(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Numeric parameter, or `default` when absent. Text that parses as an
    /// integer is accepted.
    pub fn number_or(&self, name: &str, default: i64) -> Result<i64> {
        match self.0.get(name) {
            None => Ok(default),
            Some(ParamValue::Number(n)) => Ok(*n),
            Some(ParamValue::Text(s)) => s.trim().parse().map_err(|_| {
                CipherError::InvalidParameter(format!("'{name}' must be an integer, got '{s}'"))
            }),
        }
    }

    /// Text parameter, or `default` when absent. Numbers are rendered in decimal.
    pub fn text_or(&self, name: &str, default: &str) -> String {
        match self.0.get(name) {
            None => default.to_string(),
            Some(ParamValue::Text(s)) => s.clone(),
            Some(ParamValue::Number(n)) => n.to_string(),
        }
    }

    /// Returns `self` layered over `defaults`: entries present here win.
    pub fn merged_over(&self, defaults: &Params) -> Params {
        let mut merged = defaults.0.clone();
        merged.extend(self.0.iter().map(|(k, v)| (k.clone(), v.clone())));
        Params(merged)
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Params(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    Number,
    Text,
}

/// One entry of a descriptor's parameter schema. Advisory only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
}

impl ParamSpec {
    pub const fn number(name: &'static str) -> Self {
        Self {
            name,
            kind: ParamKind::Number,
        }
    }

    pub const fn text(name: &'static str) -> Self {
        Self {
            name,
            kind: ParamKind::Text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_parameters_use_defaults() {
        let p = Params::new();
        assert_eq!(p.number_or("shift", 3).unwrap(), 3);
        assert_eq!(p.text_or("key", "KEY"), "KEY");
    }

    #[test]
    fn numeric_text_is_accepted() {
        let p = Params::new().with("shift", "7");
        assert_eq!(p.number_or("shift", 3).unwrap(), 7);
    }

    #[test]
    fn non_numeric_text_is_rejected() {
        let p = Params::new().with("shift", "seven");
        let err = p.number_or("shift", 3).unwrap_err();
        assert!(matches!(err, CipherError::InvalidParameter(_)));
    }

    #[test]
    fn numbers_render_as_text() {
        let p = Params::new().with("key", 42);
        assert_eq!(p.text_or("key", "x"), "42");
    }

    #[test]
    fn merge_prefers_caller_values() {
        let defaults = Params::new().with("shift", 5).with("key", "ABC");
        let caller = Params::new().with("shift", 9);
        let merged = caller.merged_over(&defaults);
        assert_eq!(merged.number_or("shift", 0).unwrap(), 9);
        assert_eq!(merged.text_or("key", ""), "ABC");
    }

    #[test]
    fn parse_loose_detects_integers() {
        assert_eq!(ParamValue::parse_loose("12"), ParamValue::Number(12));
        assert_eq!(ParamValue::parse_loose("-3"), ParamValue::Number(-3));
        assert_eq!(ParamValue::parse_loose("LEMON"), ParamValue::Text("LEMON".into()));
    }

    #[test]
    fn deserializes_mixed_json() {
        let p: Params = serde_json::from_str(r#"{"a": 5, "key": "SECRET"}"#).unwrap();
        assert_eq!(p.get("a"), Some(&ParamValue::Number(5)));
        assert_eq!(p.get("key"), Some(&ParamValue::Text("SECRET".into())));
    }
}
