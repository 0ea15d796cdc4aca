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

use std::io;
use std::io::Cursor;
use std::io::Read;

use byteorder::ByteOrder;
use byteorder::LittleEndian;
use byteorder::ReadBytesExt;

/// Growable little-endian byte buffer for snapshot encoding.
pub(crate) struct SnapshotBytes {
    bytes: Vec<u8>,
}

impl SnapshotBytes {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn write(&mut self, buf: &[u8]) {
        self.bytes.extend_from_slice(buf);
    }

    /// Writes `buf` followed by zero bytes up to `width`.
    ///
    /// `buf` must not be longer than `width`.
    pub fn write_padded(&mut self, buf: &[u8], width: usize) {
        debug_assert!(buf.len() <= width, "buffer wider than field");
        self.write(buf);
        self.bytes.resize(self.bytes.len() + (width - buf.len()), 0);
    }

    pub fn write_u64_le(&mut self, n: u64) {
        let mut buf = [0u8; 8];
        LittleEndian::write_u64(&mut buf, n);
        self.write(&buf);
    }
}

/// Cursor over an encoded snapshot.
pub(crate) struct SnapshotSlice<'a> {
    slice: Cursor<&'a [u8]>,
}

impl SnapshotSlice<'_> {
    pub fn new(slice: &[u8]) -> SnapshotSlice<'_> {
        SnapshotSlice {
            slice: Cursor::new(slice),
        }
    }

    /// Number of bytes not consumed yet.
    pub fn remaining(&self) -> usize {
        let len = self.slice.get_ref().len();
        len.saturating_sub(self.slice.position() as usize)
    }

    pub fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        self.slice.read_exact(buf)
    }

    pub fn read_u64_le(&mut self) -> io::Result<u64> {
        self.slice.read_u64::<LittleEndian>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padded_field_then_integer() {
        let mut bytes = SnapshotBytes::with_capacity(12);
        bytes.write_padded(b"ab", 4);
        bytes.write_u64_le(0x0102_0304_0506_0708);
        let bytes = bytes.into_bytes();
        assert_eq!(&bytes[..4], b"ab\0\0");
        assert_eq!(bytes[4], 0x08);

        let mut slice = SnapshotSlice::new(&bytes);
        let mut field = [0u8; 4];
        slice.read_exact(&mut field).unwrap();
        assert_eq!(slice.remaining(), 8);
        assert_eq!(slice.read_u64_le().unwrap(), 0x0102_0304_0506_0708);
        assert_eq!(slice.remaining(), 0);
        assert!(slice.read_u64_le().is_err());
    }
}
