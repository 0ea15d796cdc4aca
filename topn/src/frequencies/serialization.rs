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

//! Binary snapshot of a sketch.
//!
//! A snapshot is a flat run of fixed-size records with no header:
//!
//! ```text
//! +-------------------------------+------------------+
//! | key, NUL padded (256 bytes)   | frequency (u64)  |  x len
//! +-------------------------------+------------------+
//! ```
//!
//! The frequency is little-endian. Records appear in the sketch's iteration order, which is
//! not stable across versions.

use crate::codec::SnapshotBytes;
use crate::codec::SnapshotSlice;
use crate::error::Error;
use crate::frequencies::FrequentItem;
use crate::frequencies::MAX_FREQUENCY;
use crate::frequencies::MAX_KEY_SIZE;
use crate::frequencies::TopNConfig;
use crate::frequencies::TopNKey;
use crate::frequencies::TopNSketch;

/// Width of the key field of a record.
pub const KEY_FIELD_SIZE: usize = MAX_KEY_SIZE;
/// Size of one snapshot record.
pub const RECORD_SIZE: usize = KEY_FIELD_SIZE + size_of::<u64>();

impl TopNSketch {
    /// Serializes every entry into a binary snapshot.
    pub fn serialize(&self) -> Vec<u8> {
        let mut bytes = SnapshotBytes::with_capacity(self.len() * RECORD_SIZE);
        for (key, &frequency) in self.items.iter() {
            bytes.write_padded(key.as_bytes(), KEY_FIELD_SIZE);
            bytes.write_u64_le(frequency);
        }
        bytes.into_bytes()
    }

    /// Rebuilds a sketch from a binary snapshot, inserting each record verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedDeserializeData`](crate::error::ErrorKind::MalformedDeserializeData)
    /// if the length is not a whole number of records, or a record has an empty or non UTF-8
    /// key or a frequency above [`MAX_FREQUENCY`].
    pub fn deserialize(config: TopNConfig, bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() % RECORD_SIZE != 0 {
            return Err(
                Error::deserial("snapshot length is not a multiple of the record size")
                    .with_context("len", bytes.len())
                    .with_context("record_size", RECORD_SIZE),
            );
        }

        let num_records = bytes.len() / RECORD_SIZE;
        let mut slice = SnapshotSlice::new(bytes);
        let mut items = Vec::with_capacity(num_records);
        for index in 0..num_records {
            items.push(read_record(&mut slice).map_err(|err| err.with_context("record", index))?);
        }
        debug_assert_eq!(slice.remaining(), 0);
        Ok(Self::restore(config, items))
    }
}

fn read_record(slice: &mut SnapshotSlice<'_>) -> Result<FrequentItem, Error> {
    let mut field = [0u8; KEY_FIELD_SIZE];
    slice
        .read_exact(&mut field)
        .map_err(|err| Error::deserial("failed to read key").set_source(err))?;
    let frequency = slice
        .read_u64_le()
        .map_err(|err| Error::deserial("failed to read frequency").set_source(err))?;

    let len = field
        .iter()
        .position(|&b| b == 0)
        .unwrap_or(KEY_FIELD_SIZE);
    let key = std::str::from_utf8(&field[..len])
        .map_err(|err| Error::deserial("key is not valid UTF-8").set_source(err))?;
    let key = TopNKey::new(key).map_err(|err| Error::deserial(err.message().to_string()))?;
    if frequency > MAX_FREQUENCY {
        return Err(Error::deserial("frequency out of range").with_context("frequency", frequency));
    }
    Ok(FrequentItem::new(key, frequency))
}
