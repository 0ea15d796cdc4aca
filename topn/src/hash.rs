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

//! Hashing for the sketch's key table.

use std::hash::BuildHasher;

const DEFAULT_SEED: u32 = 9001;

/// Builds seeded MurmurHash3 (x64, 128-bit) hashers.
///
/// The table only needs the low 64 bits, which is what [`std::hash::Hasher::finish`]
/// returns for [`mur3::Hasher128`].
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct MurmurBuildHasher;

impl BuildHasher for MurmurBuildHasher {
    type Hasher = mur3::Hasher128;

    fn build_hasher(&self) -> Self::Hasher {
        mur3::Hasher128::with_seed(DEFAULT_SEED)
    }
}
