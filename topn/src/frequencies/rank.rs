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

use std::iter::FusedIterator;

use crate::error::Error;
use crate::frequencies::FrequentItem;
use crate::frequencies::TopNSketch;
use crate::frequencies::item::rank_order;

impl TopNSketch {
    /// Returns the `n` most frequent items, most frequent first.
    ///
    /// Yields `min(n, len)` items; an empty sketch yields nothing. Ties are broken by key.
    ///
    /// # Errors
    ///
    /// Returns [`RequestExceedsConfiguredLimit`](crate::error::ErrorKind::RequestExceedsConfiguredLimit)
    /// if `n` is greater than the configured `max_counters`.
    ///
    /// ```
    /// # use topn::frequencies::{TopNConfig, TopNSketch};
    /// let mut sketch = TopNSketch::new(TopNConfig::default());
    /// sketch.increment("a", 5).unwrap();
    /// sketch.increment("b", 3).unwrap();
    /// sketch.increment("c", 1).unwrap();
    ///
    /// let top: Vec<_> = sketch
    ///     .top_n(2)
    ///     .unwrap()
    ///     .map(|item| (item.key().to_string(), item.frequency()))
    ///     .collect();
    /// assert_eq!(top, [("a".to_string(), 5), ("b".to_string(), 3)]);
    /// ```
    pub fn top_n(&self, n: usize) -> Result<TopNIter, Error> {
        let max_counters = self.config.max_counters();
        if n > max_counters {
            return Err(Error::exceeds_limit(n, max_counters));
        }
        Ok(TopNIter::new(self.flatten(), n))
    }
}

/// The ranked result of a top-n request.
///
/// Items are ranked once when the iterator is created and then handed out one at a time;
/// stepping past the last item ends the iteration. Request again to recompute.
#[derive(Debug, Clone)]
pub struct TopNIter {
    items: std::vec::IntoIter<FrequentItem>,
}

impl TopNIter {
    pub(crate) fn new(mut items: Vec<FrequentItem>, n: usize) -> Self {
        if n < items.len() {
            items.select_nth_unstable_by(n, rank_order);
            items.truncate(n);
        }
        items.sort_unstable_by(rank_order);
        Self {
            items: items.into_iter(),
        }
    }

    pub(crate) fn empty() -> Self {
        Self::new(Vec::new(), 0)
    }
}

impl Iterator for TopNIter {
    type Item = FrequentItem;

    fn next(&mut self) -> Option<Self::Item> {
        self.items.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.items.size_hint()
    }
}

impl ExactSizeIterator for TopNIter {}

impl FusedIterator for TopNIter {}
