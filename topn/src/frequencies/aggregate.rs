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

//! Phase-checked aggregation over a sketch.
//!
//! A query engine drives an aggregate through a fixed sequence of calls: partial states
//! accumulate rows, are shipped between workers as snapshots, combined pairwise and finally
//! consumed.
//!
//! ```text
//! Init --add/union--> Accumulate --combine--> Combine --finalize--> Finalized
//!   |                     |  ^                   ^  |
//!   |                     +--+ add/union         +--+ combine
//!   +-------------------- combine / finalize --------------->
//! ```
//!
//! Accumulating after a combine, or calling anything after finalize, fails with
//! [`InvalidCallContext`](crate::error::ErrorKind::InvalidCallContext).
//!
//! ```
//! # use topn::frequencies::{TopNAggregator, TopNConfig};
//! let config = TopNConfig::default();
//!
//! let mut left = TopNAggregator::new(config);
//! left.add(Some("a")).unwrap();
//! left.add(Some("b")).unwrap();
//!
//! let mut right = TopNAggregator::new(config);
//! right.add(Some("a")).unwrap();
//! let shipped = right.serialize().unwrap();
//!
//! left.combine(TopNAggregator::deserialize(config, &shipped).unwrap()).unwrap();
//! let sketch = left.finalize().unwrap();
//! assert_eq!(sketch.estimate("a"), 2);
//! assert!(left.add(Some("c")).is_err());
//! ```

use std::fmt;

use tracing::debug;

use crate::error::Error;
use crate::frequencies::TopNConfig;
use crate::frequencies::TopNSketch;

/// Lifecycle phase of a [`TopNAggregator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Created, no call made yet.
    Init,
    /// Consuming input rows.
    Accumulate,
    /// Merging partial aggregates.
    Combine,
    /// Result handed out; no further calls are valid.
    Finalized,
}

impl Phase {
    /// Returns the phase name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Phase::Init => "Init",
            Phase::Accumulate => "Accumulate",
            Phase::Combine => "Combine",
            Phase::Finalized => "Finalized",
        }
    }

    fn can_enter(self, next: Phase) -> bool {
        match next {
            Phase::Init => false,
            Phase::Accumulate => matches!(self, Phase::Init | Phase::Accumulate),
            Phase::Combine | Phase::Finalized => self != Phase::Finalized,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accumulator state of a top-n aggregate.
#[derive(Debug, Clone)]
pub struct TopNAggregator {
    phase: Phase,
    sketch: TopNSketch,
}

impl TopNAggregator {
    /// Creates an aggregator in [`Phase::Init`].
    pub fn new(config: TopNConfig) -> Self {
        Self {
            phase: Phase::Init,
            sketch: TopNSketch::new(config),
        }
    }

    /// Restores a partial aggregate shipped with [`serialize`](Self::serialize).
    ///
    /// The result is in [`Phase::Combine`]: it can only be combined or finalized.
    pub fn deserialize(config: TopNConfig, bytes: &[u8]) -> Result<Self, Error> {
        Ok(Self {
            phase: Phase::Combine,
            sketch: TopNSketch::deserialize(config, bytes)?,
        })
    }

    /// Returns the current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns the sketch being built.
    pub fn sketch(&self) -> &TopNSketch {
        &self.sketch
    }

    /// Counts one occurrence of `key`. `None` is a null row and is skipped.
    pub fn add(&mut self, key: Option<&str>) -> Result<(), Error> {
        self.enter(Phase::Accumulate, "add")?;
        if let Some(key) = key {
            self.sketch.update(key)?;
        }
        Ok(())
    }

    /// Merges a textual key to frequency mapping. `None` is a null row and is skipped.
    pub fn union(&mut self, repr: Option<&str>) -> Result<(), Error> {
        self.enter(Phase::Accumulate, "union")?;
        if let Some(repr) = repr {
            let mut partial = TopNSketch::new(self.sketch.config());
            partial.merge_json(repr)?;
            self.sketch.merge(&partial);
        }
        Ok(())
    }

    /// Merges another partial aggregate into this one.
    pub fn combine(&mut self, other: TopNAggregator) -> Result<(), Error> {
        if other.phase == Phase::Finalized {
            return Err(Error::invalid_call("combine", other.phase));
        }
        self.enter(Phase::Combine, "combine")?;
        self.sketch.merge(&other.sketch);
        Ok(())
    }

    /// Snapshots the partial state for transfer to another worker.
    pub fn serialize(&self) -> Result<Vec<u8>, Error> {
        if self.phase == Phase::Finalized {
            return Err(Error::invalid_call("serialize", self.phase));
        }
        Ok(self.sketch.serialize())
    }

    /// Prunes the state down to `max_counters` and hands it out.
    pub fn finalize(&mut self) -> Result<TopNSketch, Error> {
        self.enter(Phase::Finalized, "finalize")?;
        let config = self.sketch.config();
        let mut sketch = std::mem::replace(&mut self.sketch, TopNSketch::new(config));
        let evicted = sketch.shrink_to_capacity();
        debug!(len = sketch.len(), evicted, "finalized top-n aggregate");
        Ok(sketch)
    }

    fn enter(&mut self, next: Phase, operation: &'static str) -> Result<(), Error> {
        if !self.phase.can_enter(next) {
            return Err(Error::invalid_call(operation, self.phase));
        }
        if self.phase != next {
            debug!(from = %self.phase, to = %next, "top-n aggregate phase change");
            self.phase = next;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions() {
        use Phase::*;
        let allowed = [
            (Init, Accumulate),
            (Init, Combine),
            (Init, Finalized),
            (Accumulate, Accumulate),
            (Accumulate, Combine),
            (Accumulate, Finalized),
            (Combine, Combine),
            (Combine, Finalized),
        ];
        for from in [Init, Accumulate, Combine, Finalized] {
            for to in [Init, Accumulate, Combine, Finalized] {
                assert_eq!(
                    from.can_enter(to),
                    allowed.contains(&(from, to)),
                    "{from} -> {to}"
                );
            }
        }
    }
}
