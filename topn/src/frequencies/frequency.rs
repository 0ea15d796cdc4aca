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

//! Saturating frequency arithmetic.

/// Frequency of a key.
pub type Frequency = u64;

/// Largest frequency a sketch stores. Kept within `i64` so every frequency is
/// representable as a signed 64-bit integer.
pub const MAX_FREQUENCY: Frequency = i64::MAX as u64;

/// Adds `delta` to `current`, clamping at [`MAX_FREQUENCY`] instead of wrapping.
///
/// ```
/// # use topn::frequencies::{saturating_add, MAX_FREQUENCY};
/// assert_eq!(saturating_add(2, 3), 5);
/// assert_eq!(saturating_add(MAX_FREQUENCY - 1, 2), MAX_FREQUENCY);
/// ```
#[inline]
pub fn saturating_add(current: Frequency, delta: Frequency) -> Frequency {
    if MAX_FREQUENCY.saturating_sub(current) < delta {
        MAX_FREQUENCY
    } else {
        current + delta
    }
}

/// Clamps a raw count into the representable range.
#[inline]
pub(crate) fn clamp(value: u64) -> Frequency {
    value.min(MAX_FREQUENCY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_below_max() {
        assert_eq!(saturating_add(0, 0), 0);
        assert_eq!(saturating_add(0, MAX_FREQUENCY), MAX_FREQUENCY);
        assert_eq!(saturating_add(MAX_FREQUENCY - 10, 10), MAX_FREQUENCY);
        assert_eq!(saturating_add(40, 2), 42);
    }

    #[test]
    fn test_clamps_on_overflow() {
        assert_eq!(saturating_add(MAX_FREQUENCY, 1), MAX_FREQUENCY);
        assert_eq!(saturating_add(MAX_FREQUENCY - 10, 11), MAX_FREQUENCY);
        assert_eq!(saturating_add(1, u64::MAX), MAX_FREQUENCY);
        assert_eq!(saturating_add(MAX_FREQUENCY, u64::MAX), MAX_FREQUENCY);
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(7), 7);
        assert_eq!(clamp(u64::MAX), MAX_FREQUENCY);
    }
}
