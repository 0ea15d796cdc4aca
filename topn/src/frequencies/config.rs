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

//! Tunable limits of a top-n sketch.

use serde::Deserialize;
use serde::Serialize;

use crate::error::Error;

/// Default number of counters retained when a sketch is consumed.
pub const DEFAULT_MAX_COUNTERS: usize = 1000;
/// Default growth multiplier allowed while a sketch is being built.
pub const DEFAULT_UNION_FACTOR: usize = 3;
/// Largest accepted `max_counters`.
pub const MAX_NUMBER_OF_COUNTERS: usize = 1 << 24;

/// Capacity parameters shared by every operation on a [`TopNSketch`].
///
/// * `max_counters` is the steady-state cap, enforced whenever a sketch is about to be
///   consumed (serialized for a final result, unioned, or queried).
/// * `union_factor` lets a sketch under construction grow to `max_counters * union_factor`
///   entries before a prune is forced.
///
/// The config can be loaded from a host configuration document:
///
/// ```
/// # use topn::frequencies::TopNConfig;
/// let config: TopNConfig = serde_json::from_str(r#"{"max_counters": 50}"#).unwrap();
/// assert_eq!(config.max_counters(), 50);
/// assert_eq!(config.union_factor(), 3);
///
/// assert!(serde_json::from_str::<TopNConfig>(r#"{"max_counters": 0}"#).is_err());
/// ```
///
/// [`TopNSketch`]: crate::frequencies::TopNSketch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TopNConfigRepr")]
pub struct TopNConfig {
    max_counters: usize,
    union_factor: usize,
}

impl TopNConfig {
    /// Creates a validated config.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigInvalid`](crate::error::ErrorKind::ConfigInvalid) if `max_counters` is
    /// zero or above [`MAX_NUMBER_OF_COUNTERS`], if `union_factor` is zero, or if their
    /// product overflows.
    pub fn new(max_counters: usize, union_factor: usize) -> Result<Self, Error> {
        if max_counters == 0 || max_counters > MAX_NUMBER_OF_COUNTERS {
            return Err(Error::config_invalid(format!(
                "max_counters must be in [1, {MAX_NUMBER_OF_COUNTERS}]"
            ))
            .with_context("max_counters", max_counters));
        }
        if union_factor == 0 {
            return Err(Error::config_invalid("union_factor must be at least 1")
                .with_context("union_factor", union_factor));
        }
        if max_counters.checked_mul(union_factor).is_none() {
            return Err(
                Error::config_invalid("max_counters * union_factor overflows")
                    .with_context("max_counters", max_counters)
                    .with_context("union_factor", union_factor),
            );
        }
        Ok(Self {
            max_counters,
            union_factor,
        })
    }

    /// Creates a config with the given `max_counters` and the default union factor.
    pub fn with_max_counters(max_counters: usize) -> Result<Self, Error> {
        Self::new(max_counters, DEFAULT_UNION_FACTOR)
    }

    /// Returns the steady-state number of counters.
    pub fn max_counters(&self) -> usize {
        self.max_counters
    }

    /// Returns the union factor.
    pub fn union_factor(&self) -> usize {
        self.union_factor
    }

    /// Returns the transient size limit, `max_counters * union_factor`.
    pub fn item_limit(&self) -> usize {
        // product checked at construction
        self.max_counters * self.union_factor
    }
}

impl Default for TopNConfig {
    fn default() -> Self {
        Self {
            max_counters: DEFAULT_MAX_COUNTERS,
            union_factor: DEFAULT_UNION_FACTOR,
        }
    }
}

#[derive(Deserialize)]
#[serde(default, deny_unknown_fields)]
struct TopNConfigRepr {
    max_counters: usize,
    union_factor: usize,
}

impl Default for TopNConfigRepr {
    fn default() -> Self {
        Self {
            max_counters: DEFAULT_MAX_COUNTERS,
            union_factor: DEFAULT_UNION_FACTOR,
        }
    }
}

impl TryFrom<TopNConfigRepr> for TopNConfig {
    type Error = Error;

    fn try_from(repr: TopNConfigRepr) -> Result<Self, Self::Error> {
        TopNConfig::new(repr.max_counters, repr.union_factor)
    }
}
