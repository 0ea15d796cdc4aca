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

//! Batched rank-based eviction.
//!
//! Unlike classical Space-Saving, which evicts the single minimum counter and hands its count
//! to the incoming key, a prune ranks every entry once and drops everything past a cut-off.
//! The retained keys keep their exact counts and no per-item error bound is tracked.

use tracing::debug;

use crate::frequencies::FrequentItem;
use crate::frequencies::TopNSketch;
use crate::frequencies::item::rank_order;

/// Removes low-ranked entries from `sketch` when it holds more than `item_limit` keys.
///
/// If the sketch is within the limit this is a no-op. Otherwise the `remaining` highest
/// ranked entries (see [`rank_order`](crate::frequencies::rank_order)) are kept and the rest are
/// evicted, so every retained frequency is at least every evicted one. A `remaining` not
/// smaller than the current size keeps everything.
///
/// Returns the number of evicted entries.
///
/// ```
/// # use topn::frequencies::{prune, TopNConfig, TopNSketch};
/// let mut sketch = TopNSketch::new(TopNConfig::default());
/// for (key, count) in [("a", 5), ("b", 3), ("c", 1)] {
///     sketch.increment(key, count).unwrap();
/// }
/// assert_eq!(prune(&mut sketch, 3, 1), 0);
/// assert_eq!(prune(&mut sketch, 2, 1), 2);
/// assert!(sketch.contains("a"));
/// ```
pub fn prune(sketch: &mut TopNSketch, item_limit: usize, remaining: usize) -> usize {
    let size = sketch.items.len();
    if size <= item_limit || remaining >= size {
        return 0;
    }

    let mut ranked: Vec<FrequentItem> = sketch.items.drain().map(FrequentItem::from).collect();
    if remaining > 0 {
        // everything before the pivot ranks above it
        ranked.select_nth_unstable_by(remaining, rank_order);
    }
    ranked.truncate(remaining);
    sketch
        .items
        .extend(ranked.into_iter().map(FrequentItem::into_parts));

    let evicted = size - remaining;
    debug!(size, item_limit, remaining, evicted, "pruned top-n sketch");
    evicted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequencies::Frequency;
    use crate::frequencies::TopNConfig;

    fn sketch_of(pairs: &[(&str, Frequency)]) -> TopNSketch {
        let mut sketch = TopNSketch::new(TopNConfig::default());
        for &(key, frequency) in pairs {
            sketch.increment(key, frequency).unwrap();
        }
        sketch
    }

    #[test]
    fn test_within_limit_is_noop() {
        let mut sketch = sketch_of(&[("a", 1), ("b", 2)]);
        let before = sketch.items.clone();
        assert_eq!(prune(&mut sketch, 2, 0), 0);
        assert_eq!(sketch.items, before);
    }

    #[test]
    fn test_remaining_not_below_size_is_noop() {
        let mut sketch = sketch_of(&[("a", 1), ("b", 2), ("c", 3)]);
        assert_eq!(prune(&mut sketch, 1, 3), 0);
        assert_eq!(sketch.len(), 3);
    }

    #[test]
    fn test_keeps_highest_and_breaks_ties_by_key() {
        let mut sketch = sketch_of(&[("d", 4), ("c", 4), ("b", 4), ("a", 1), ("e", 9)]);
        assert_eq!(prune(&mut sketch, 3, 3), 2);
        let mut kept: Vec<&str> = sketch.iter().map(|(k, _)| k).collect();
        kept.sort();
        assert_eq!(kept, ["b", "c", "e"]);
    }

    #[test]
    fn test_zero_remaining_clears() {
        let mut sketch = sketch_of(&[("a", 1), ("b", 2)]);
        assert_eq!(prune(&mut sketch, 1, 0), 2);
        assert!(sketch.is_empty());
    }
}
