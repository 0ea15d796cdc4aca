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

//! One-shot functions over textual mappings.
//!
//! Each call parses its inputs, works on a private sketch and renders the result, so a host
//! can expose them directly as scalar or set-returning functions.

use crate::error::Error;
use crate::frequencies::TopNConfig;
use crate::frequencies::TopNIter;
use crate::frequencies::TopNSketch;
use crate::frequencies::json::items_of;
use crate::frequencies::json::parse_object;

/// Adds one occurrence of `key` to the mapping `repr` and returns the new mapping.
///
/// A missing `repr` starts from an empty mapping; a missing `key` returns `repr` as is. When
/// `key` is new the result is pruned back to `max_counters` entries.
///
/// ```
/// # use topn::frequencies::{scalar, TopNConfig};
/// let config = TopNConfig::default();
/// let repr = scalar::add(config, None, Some("a")).unwrap();
/// let repr = scalar::add(config, Some(repr.as_str()), Some("a")).unwrap();
/// assert_eq!(repr, r#"{"a":2}"#);
/// assert_eq!(scalar::add(config, None, None).unwrap(), "{}");
/// ```
pub fn add(config: TopNConfig, repr: Option<&str>, key: Option<&str>) -> Result<String, Error> {
    let key = match (repr, key) {
        (None, None) => return Ok(TopNSketch::new(config).to_json()),
        (Some(repr), None) => return Ok(repr.to_string()),
        (_, Some(key)) => key,
    };

    let mut sketch = TopNSketch::new(config);
    if let Some(repr) = repr {
        sketch.merge_json(repr)?;
    }
    let is_new = !sketch.contains(key);
    sketch.increment(key, 1)?;
    if is_new {
        sketch.shrink_to_capacity();
    }
    Ok(sketch.to_json())
}

/// Unions two mappings, summing shared keys, and prunes the result to `max_counters` entries.
///
/// ```
/// # use topn::frequencies::{scalar, TopNConfig};
/// let merged = scalar::union(TopNConfig::default(), r#"{"x":10,"y":10}"#, r#"{"x":5}"#).unwrap();
/// assert_eq!(merged, r#"{"x":15,"y":10}"#);
/// ```
pub fn union(config: TopNConfig, left: &str, right: &str) -> Result<String, Error> {
    let mut sketch = TopNSketch::new(config);
    sketch.merge_json(left)?;
    sketch.merge_json(right)?;
    sketch.shrink_to_capacity();
    Ok(sketch.to_json())
}

/// Ranks the `n` most frequent keys of the mapping `repr`.
///
/// A missing or empty mapping yields nothing, whatever `n` is.
///
/// # Errors
///
/// Text that is not a JSON object fails with
/// [`MalformedExternalRepresentation`](crate::error::ErrorKind::MalformedExternalRepresentation).
/// For a non-empty object, an `n` greater than `max_counters` then fails with
/// [`RequestExceedsConfiguredLimit`](crate::error::ErrorKind::RequestExceedsConfiguredLimit)
/// before any entry is validated. Bad entries fail as in
/// [`parse_items`](crate::frequencies::parse_items).
pub fn top_n(config: TopNConfig, repr: Option<&str>, n: usize) -> Result<TopNIter, Error> {
    let Some(repr) = repr else {
        return Ok(TopNIter::empty());
    };
    let map = parse_object(repr)?;
    if map.is_empty() {
        return Ok(TopNIter::empty());
    }
    let max_counters = config.max_counters();
    if n > max_counters {
        return Err(Error::exceeds_limit(n, max_counters));
    }
    Ok(TopNIter::new(items_of(map)?, n))
}
