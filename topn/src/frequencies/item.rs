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

use std::cmp::Ordering;

use crate::frequencies::Frequency;
use crate::frequencies::TopNKey;

/// A key together with its (approximate) frequency.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FrequentItem {
    key: TopNKey,
    frequency: Frequency,
}

impl FrequentItem {
    /// Creates an item from an already validated key.
    pub fn new(key: TopNKey, frequency: Frequency) -> Self {
        Self { key, frequency }
    }

    /// Returns the key.
    pub fn key(&self) -> &TopNKey {
        &self.key
    }

    /// Returns the frequency.
    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Splits the item into key and frequency.
    pub fn into_parts(self) -> (TopNKey, Frequency) {
        (self.key, self.frequency)
    }
}

impl From<(TopNKey, Frequency)> for FrequentItem {
    fn from((key, frequency): (TopNKey, Frequency)) -> Self {
        Self { key, frequency }
    }
}

/// Ranking order shared by pruning and top-n extraction: frequency descending, ties broken
/// by ascending key bytes.
///
/// Keys are unique within a sketch, so this is a total order and every sort or selection
/// under it is reproducible.
pub fn rank_order(a: &FrequentItem, b: &FrequentItem) -> Ordering {
    b.frequency
        .cmp(&a.frequency)
        .then_with(|| a.key.cmp(&b.key))
}
