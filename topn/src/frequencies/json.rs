// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! The textual key to frequency mapping exchanged with hosts.
//!
//! A mapping is a JSON object whose values are non-negative integers, for example
//! `{"apple": 5, "pear": 3}`. Keys are unique. Readers ignore entry order; the sketch writes
//! entries in rank order, most frequent first.

use serde::Serialize;
use serde::Serializer;
use serde::ser::SerializeMap;
use serde_json::Map;
use serde_json::Number;
use serde_json::Value;

use crate::error::Error;
use crate::frequencies::Frequency;
use crate::frequencies::FrequentItem;
use crate::frequencies::MAX_FREQUENCY;
use crate::frequencies::TopNConfig;
use crate::frequencies::TopNKey;
use crate::frequencies::TopNSketch;
use crate::frequencies::frequency::clamp;

impl TopNSketch {
    /// Builds a sketch from a textual mapping, inserting every entry verbatim without pruning.
    ///
    /// # Errors
    ///
    /// See [`parse_items`].
    pub fn from_json(config: TopNConfig, repr: &str) -> Result<Self, Error> {
        Ok(Self::restore(config, parse_items(repr)?))
    }

    /// Merges a textual mapping into this sketch, entry by entry, the way
    /// [`merge`](Self::merge) does.
    ///
    /// The mapping is fully validated before the sketch is touched.
    pub fn merge_json(&mut self, repr: &str) -> Result<(), Error> {
        let items = parse_items(repr)?;
        self.extend(items);
        Ok(())
    }

    /// Renders every entry as a JSON object, in rank order.
    pub fn to_json_value(&self) -> Value {
        let map: Map<String, Value> = self
            .ranked_items()
            .into_iter()
            .map(|item| {
                let (key, frequency) = item.into_parts();
                (key.to_string(), Value::from(frequency))
            })
            .collect();
        Value::Object(map)
    }

    /// Renders every entry as JSON text, in the same order as the [`Serialize`] impl.
    ///
    /// ```
    /// # use topn::frequencies::{TopNConfig, TopNSketch};
    /// let mut sketch = TopNSketch::new(TopNConfig::default());
    /// sketch.increment("a", 3).unwrap();
    /// sketch.increment("b", 5).unwrap();
    /// assert_eq!(sketch.to_json(), r#"{"b":5,"a":3}"#);
    /// ```
    pub fn to_json(&self) -> String {
        self.to_json_value().to_string()
    }
}

/// Serializes as a map of key to frequency, most frequent first (see
/// [`rank_order`](crate::frequencies::rank_order)).
impl Serialize for TopNSketch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let items = self.ranked_items();
        let mut map = serializer.serialize_map(Some(items.len()))?;
        for item in &items {
            map.serialize_entry(item.key().as_str(), &item.frequency())?;
        }
        map.end()
    }
}

/// Parses a textual mapping into items.
///
/// Values above [`MAX_FREQUENCY`] are clamped to it.
///
/// # Errors
///
/// The whole parse is rejected, with nothing returned, when:
/// * the text is not JSON or not a JSON object, or a value is not a non-negative integer:
///   [`MalformedExternalRepresentation`](crate::error::ErrorKind::MalformedExternalRepresentation);
/// * a key is longer than [`MAX_KEY_SIZE`](crate::frequencies::MAX_KEY_SIZE) bytes:
///   [`KeyTooLong`](crate::error::ErrorKind::KeyTooLong);
/// * a key is empty or contains a NUL byte: [`InvalidKey`](crate::error::ErrorKind::InvalidKey).
pub fn parse_items(repr: &str) -> Result<Vec<FrequentItem>, Error> {
    items_of(parse_object(repr)?)
}

/// Parses the JSON object of a mapping without looking at its entries.
pub(crate) fn parse_object(repr: &str) -> Result<Map<String, Value>, Error> {
    let value: Value = serde_json::from_str(repr).map_err(|err| {
        Error::malformed_representation("mapping is not valid JSON").set_source(err)
    })?;
    let map = match value {
        Value::Object(map) => map,
        other => {
            return Err(Error::malformed_representation("mapping must be a JSON object")
                .with_context("found", kind_of(&other)));
        }
    };
    Ok(map)
}

/// Validates every entry of a parsed mapping.
pub(crate) fn items_of(map: Map<String, Value>) -> Result<Vec<FrequentItem>, Error> {
    map.into_iter()
        .map(|(key, value)| -> Result<FrequentItem, Error> {
            let frequency = parse_frequency(&value)
                .ok_or_else(|| {
                    Error::malformed_representation("frequency must be a non-negative integer")
                        .with_context("found", value.to_string())
                })
                .map_err(|err| err.with_context("key", &key))?;
            let key = TopNKey::try_from(key)?;
            Ok(FrequentItem::new(key, frequency))
        })
        .collect()
}

fn parse_frequency(value: &Value) -> Option<Frequency> {
    match value {
        Value::Number(number) => frequency_of(number),
        _ => None,
    }
}

fn frequency_of(number: &Number) -> Option<Frequency> {
    if let Some(n) = number.as_u64() {
        return Some(clamp(n));
    }
    if number.is_i64() {
        // negative
        return None;
    }
    let n = number.as_f64()?;
    if !n.is_finite() || n < 0.0 || n.fract() != 0.0 {
        return None;
    }
    if n >= MAX_FREQUENCY as f64 {
        Some(MAX_FREQUENCY)
    } else {
        Some(n as Frequency)
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_parse_values() {
        let items = parse_items(r#"{"a": 1, "b": 0, "c": 2.0, "d": 1e30, "e": 9223372036854775808}"#)
            .unwrap();
        let mut pairs: Vec<(String, Frequency)> = items
            .into_iter()
            .map(|item| (item.key().to_string(), item.frequency()))
            .collect();
        pairs.sort();
        assert_eq!(
            pairs,
            [
                ("a".to_string(), 1),
                ("b".to_string(), 0),
                ("c".to_string(), 2),
                ("d".to_string(), MAX_FREQUENCY),
                ("e".to_string(), MAX_FREQUENCY),
            ]
        );
    }

    #[test]
    fn test_rejects_malformed() {
        for repr in [
            "",
            "not json",
            "[1, 2]",
            "3",
            r#"{"a": "1"}"#,
            r#"{"a": -1}"#,
            r#"{"a": 1.5}"#,
            r#"{"a": null}"#,
            r#"{"a": true}"#,
            r#"{"a": {"b": 1}}"#,
        ] {
            let err = parse_items(repr).unwrap_err();
            assert_eq!(
                err.kind(),
                ErrorKind::MalformedExternalRepresentation,
                "{repr}"
            );
        }
    }

    #[test]
    fn test_rejects_long_key() {
        let repr = format!(r#"{{"ok": 1, "{}": 1}}"#, "k".repeat(257));
        assert_eq!(parse_items(&repr).unwrap_err().kind(), ErrorKind::KeyTooLong);
    }

    #[test]
    fn test_duplicate_key_keeps_last() {
        let items = parse_items(r#"{"a": 1, "a": 4}"#).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].frequency(), 4);
    }

    #[test]
    fn test_escaped_keys_round_trip() {
        let mut sketch = TopNSketch::new(TopNConfig::default());
        sketch.increment("quote\"back\\slash", 2).unwrap();
        sketch.increment("tab\tnewline\n", 1).unwrap();
        let text = sketch.to_json();
        let restored = TopNSketch::from_json(sketch.config(), &text).unwrap();
        assert_eq!(restored.estimate("quote\"back\\slash"), 2);
        assert_eq!(restored.estimate("tab\tnewline\n"), 1);
    }

    #[test]
    fn test_output_is_rank_ordered() {
        let mut sketch = TopNSketch::new(TopNConfig::default());
        sketch.increment("a", 1).unwrap();
        sketch.increment("z", 9).unwrap();
        sketch.increment("m", 9).unwrap();
        assert_eq!(sketch.to_json(), r#"{"m":9,"z":9,"a":1}"#);
        assert_eq!(serde_json::to_string(&sketch).unwrap(), sketch.to_json());
    }
}
