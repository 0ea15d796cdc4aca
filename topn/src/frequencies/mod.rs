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

//! Top-n sketch for approximate heavy hitters over a stream of text keys.
//!
//! # Overview
//!
//! The sketch keeps a bounded map from key to frequency. Keys are counted exactly until the
//! map grows past `max_counters * union_factor` entries; at that point the sketch is
//! pruned by rank, keeping the most frequent half. Before a sketch is consumed it is
//! pruned down to `max_counters`. Sketches built over disjoint partitions of a stream can
//! be merged, which makes the sketch usable as a parallel aggregate.
//!
//! This implementation provides the following capabilities:
//! * Count keys, one at a time or with weights ([`TopNSketch::update_with_count`]).
//! * Merge sketches built in parallel ([`TopNSketch::merge`]).
//! * Return the `n` most frequent keys ([`TopNSketch::top_n`]).
//! * Convert to and from a JSON key to frequency mapping ([`TopNSketch::to_json`]).
//! * Serialize to bytes, or deserialize from bytes ([`TopNSketch::serialize`]).
//! * Drive the whole lifecycle as a phase-checked aggregate ([`TopNAggregator`]).
//!
//! # Accuracy
//!
//! As long as fewer than `max_counters * union_factor` distinct keys are seen, counts are
//! exact. Past that the sketch is approximate: a key evicted by a prune loses its count and
//! starts from zero if it shows up again, so late-arriving heavy hitters are undercounted.
//! Unlike the classical Space-Saving algorithm, which replaces only the minimum counter,
//! pruning is done in batches by rank and no per-key error bound is reported.
//!
//! Frequencies saturate at [`MAX_FREQUENCY`] instead of overflowing.
//!
//! Merging is commutative and associative until a prune happens; after that the retained
//! set depends on merge order.
//!
//! # Examples
//!
//! ```
//! # use topn::frequencies::{TopNConfig, TopNSketch};
//! let config = TopNConfig::new(100, 3).unwrap();
//!
//! let mut left = TopNSketch::new(config);
//! for key in ["apple", "apple", "pear"] {
//!     left.update(key).unwrap();
//! }
//! let mut right = TopNSketch::new(config);
//! right.update_with_count("pear", 5).unwrap();
//!
//! left.merge(&right);
//! let top: Vec<_> = left
//!     .top_n(1)
//!     .unwrap()
//!     .map(|item| (item.key().to_string(), item.frequency()))
//!     .collect();
//! assert_eq!(top, [("pear".to_string(), 6)]);
//! ```
//!
//! # Serialization
//!
//! ```
//! # use topn::frequencies::{TopNConfig, TopNSketch};
//! let config = TopNConfig::default();
//! let mut sketch = TopNSketch::new(config);
//! sketch.update_with_count("apple", 2).unwrap();
//!
//! let bytes = sketch.serialize();
//! let decoded = TopNSketch::deserialize(config, &bytes).unwrap();
//! assert_eq!(decoded.estimate("apple"), 2);
//!
//! let text = sketch.to_json();
//! assert_eq!(text, r#"{"apple":2}"#);
//! let decoded = TopNSketch::from_json(config, &text).unwrap();
//! assert_eq!(decoded.estimate("apple"), 2);
//! ```

mod aggregate;
mod config;
mod frequency;
mod item;
mod json;
mod key;
mod prune;
mod rank;
pub mod scalar;
mod serialization;
mod sketch;

pub use self::aggregate::Phase;
pub use self::aggregate::TopNAggregator;
pub use self::config::DEFAULT_MAX_COUNTERS;
pub use self::config::DEFAULT_UNION_FACTOR;
pub use self::config::MAX_NUMBER_OF_COUNTERS;
pub use self::config::TopNConfig;
pub use self::frequency::Frequency;
pub use self::frequency::MAX_FREQUENCY;
pub use self::frequency::saturating_add;
pub use self::item::FrequentItem;
pub use self::item::rank_order;
pub use self::json::parse_items;
pub use self::key::MAX_KEY_SIZE;
pub use self::key::TopNKey;
pub use self::prune::prune;
pub use self::rank::TopNIter;
pub use self::serialization::KEY_FIELD_SIZE;
pub use self::serialization::RECORD_SIZE;
pub use self::sketch::Iter;
pub use self::sketch::TopNSketch;
