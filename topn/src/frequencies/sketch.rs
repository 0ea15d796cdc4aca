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

//! The bounded frequency counter.

use std::collections::HashMap;
use std::collections::hash_map;

use tracing::trace;

use crate::error::Error;
use crate::frequencies::Frequency;
use crate::frequencies::FrequentItem;
use crate::frequencies::TopNConfig;
use crate::frequencies::TopNKey;
use crate::frequencies::frequency::clamp;
use crate::frequencies::frequency::saturating_add;
use crate::frequencies::item::rank_order;
use crate::frequencies::key::validate as validate_key;
use crate::frequencies::prune::prune;
use crate::hash::MurmurBuildHasher;

// Upper bound on the slots reserved up front; larger tables grow on demand.
const MAX_PREALLOCATED_SLOTS: usize = 4096;

/// Bounded, mergeable key to frequency counter.
///
/// Keys are admitted with [`increment`](Self::increment) or the amortized
/// [`update_with_count`](Self::update_with_count), partial results are combined with
/// [`merge`](Self::merge), and the most frequent keys are read with
/// [`top_n`](Self::top_n).
///
/// A sketch is not synchronized; parallel aggregation builds independent sketches and merges
/// them afterwards.
#[derive(Debug, Clone)]
pub struct TopNSketch {
    pub(super) config: TopNConfig,
    pub(super) items: HashMap<TopNKey, Frequency, MurmurBuildHasher>,
}

impl TopNSketch {
    /// Creates an empty sketch.
    pub fn new(config: TopNConfig) -> Self {
        let capacity = config.max_counters().min(MAX_PREALLOCATED_SLOTS);
        Self {
            config,
            items: HashMap::with_capacity_and_hasher(capacity, MurmurBuildHasher),
        }
    }

    /// Rebuilds a sketch from items, inserting each verbatim.
    ///
    /// No pruning happens and frequencies are not summed: a repeated key overwrites the
    /// earlier one. Intended for the output of [`flatten`](Self::flatten).
    pub fn restore<I>(config: TopNConfig, items: I) -> Self
    where
        I: IntoIterator<Item = FrequentItem>,
    {
        let mut sketch = Self::new(config);
        for item in items {
            let (key, frequency) = item.into_parts();
            sketch.items.insert(key, clamp(frequency));
        }
        sketch
    }

    /// Returns the config this sketch was created with.
    pub fn config(&self) -> TopNConfig {
        self.config
    }

    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if no key is tracked.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the tracked frequency of `key`, or 0 if it is not tracked.
    pub fn estimate(&self, key: &str) -> Frequency {
        self.items.get(key).copied().unwrap_or(0)
    }

    /// Returns true if `key` is tracked.
    pub fn contains(&self, key: &str) -> bool {
        self.items.contains_key(key)
    }

    /// Adds `delta` to the frequency of `key`, inserting it if absent.
    ///
    /// Never prunes: the table grows by at most one entry.
    ///
    /// # Errors
    ///
    /// Returns [`KeyTooLong`](crate::error::ErrorKind::KeyTooLong) for keys over
    /// [`MAX_KEY_SIZE`](crate::frequencies::MAX_KEY_SIZE) bytes and
    /// [`InvalidKey`](crate::error::ErrorKind::InvalidKey) for empty keys or keys with a NUL
    /// byte. The sketch is unchanged on error.
    pub fn increment(&mut self, key: &str, delta: Frequency) -> Result<(), Error> {
        self.increment_key(key, delta)?;
        Ok(())
    }

    /// Counts one occurrence of `key`.
    ///
    /// See [`update_with_count`](Self::update_with_count).
    pub fn update(&mut self, key: &str) -> Result<(), Error> {
        self.update_with_count(key, 1)
    }

    /// Adds `delta` to the frequency of `key` as part of an incremental aggregation.
    ///
    /// When `key` is new, the sketch is pruned to half its size once it exceeds
    /// `max_counters * union_factor` entries.
    pub fn update_with_count(&mut self, key: &str, delta: Frequency) -> Result<(), Error> {
        if self.increment_key(key, delta)? {
            self.prune_amortized();
        }
        Ok(())
    }

    /// Merges another sketch into this one.
    ///
    /// Frequencies of shared keys are added with saturation and the rest are copied. The
    /// sketch is re-pruned after every merged entry, so its size never exceeds
    /// `max_counters * union_factor + 1` during the merge, however large `other` is.
    ///
    /// Without pruning the result does not depend on merge order. Once pruning kicks in, the
    /// retained set depends on the order in which entries arrived.
    pub fn merge(&mut self, other: &Self) {
        if other.is_empty() {
            return;
        }
        let before = self.len();
        for (key, &frequency) in other.items.iter() {
            match self.items.get_mut(key) {
                Some(current) => *current = saturating_add(*current, frequency),
                None => {
                    self.items.insert(key.clone(), clamp(frequency));
                }
            }
            self.prune_amortized();
        }
        trace!(
            merged = other.len(),
            before,
            after = self.len(),
            "merged top-n sketch"
        );
    }

    /// Merges a single item, re-pruning afterwards the same way [`merge`](Self::merge) does.
    pub fn merge_item(&mut self, item: FrequentItem) {
        let (key, frequency) = item.into_parts();
        match self.items.entry(key) {
            hash_map::Entry::Occupied(mut entry) => {
                let current = *entry.get();
                entry.insert(saturating_add(current, frequency));
            }
            hash_map::Entry::Vacant(entry) => {
                entry.insert(clamp(frequency));
            }
        }
        self.prune_amortized();
    }

    /// Prunes the sketch so at most `item_limit` keys remain, keeping the `remaining` most
    /// frequent when it is over the limit. Returns the number of evicted keys.
    ///
    /// See [`prune`](crate::frequencies::prune()).
    pub fn prune(&mut self, item_limit: usize, remaining: usize) -> usize {
        prune(self, item_limit, remaining)
    }

    /// Prunes down to `max_counters`. Run before a sketch is consumed externally.
    pub fn shrink_to_capacity(&mut self) -> usize {
        let max_counters = self.config.max_counters();
        prune(self, max_counters, max_counters)
    }

    /// Returns every item, in unspecified order.
    pub fn flatten(&self) -> Vec<FrequentItem> {
        self.items
            .iter()
            .map(|(key, &frequency)| FrequentItem::new(key.clone(), frequency))
            .collect()
    }

    /// Returns every item, most frequent first.
    pub fn ranked_items(&self) -> Vec<FrequentItem> {
        let mut items = self.flatten();
        items.sort_unstable_by(rank_order);
        items
    }

    /// Iterates over `(key, frequency)` pairs in unspecified order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.items.iter(),
        }
    }

    /// Removes every key, keeping the config.
    pub fn reset(&mut self) {
        self.items.clear();
    }

    /// Returns true if `key` was inserted.
    fn increment_key(&mut self, key: &str, delta: Frequency) -> Result<bool, Error> {
        validate_key(key)?;
        if let Some(current) = self.items.get_mut(key) {
            *current = saturating_add(*current, delta);
            return Ok(false);
        }
        self.items.insert(TopNKey::from_validated(key), clamp(delta));
        Ok(true)
    }

    fn prune_amortized(&mut self) {
        let item_limit = self.config.item_limit();
        let remaining = self.items.len() / 2;
        prune(self, item_limit, remaining);
    }
}

impl Extend<FrequentItem> for TopNSketch {
    /// Merges each item with [`merge_item`](TopNSketch::merge_item).
    fn extend<T: IntoIterator<Item = FrequentItem>>(&mut self, iter: T) {
        for item in iter {
            self.merge_item(item);
        }
    }
}

/// Iterator over the entries of a [`TopNSketch`].
pub struct Iter<'a> {
    inner: hash_map::Iter<'a, TopNKey, Frequency>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, Frequency);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(key, &frequency)| (key.as_str(), frequency))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a TopNSketch {
    type Item = (&'a str, Frequency);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
