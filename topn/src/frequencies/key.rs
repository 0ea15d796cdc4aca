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

use std::borrow::Borrow;
use std::fmt;

use crate::error::Error;

/// Maximum length of a key, in bytes.
pub const MAX_KEY_SIZE: usize = 256;

/// A validated sketch key: non-empty UTF-8 text of at most [`MAX_KEY_SIZE`] bytes with no
/// NUL byte.
///
/// Over-long keys are rejected rather than truncated.
///
/// ```
/// # use topn::error::ErrorKind;
/// # use topn::frequencies::TopNKey;
/// let key = TopNKey::new("apple").unwrap();
/// assert_eq!(key.as_str(), "apple");
///
/// let err = TopNKey::new(&"x".repeat(257)).unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::KeyTooLong);
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TopNKey(Box<str>);

impl TopNKey {
    /// Validates and copies `key`.
    pub fn new(key: &str) -> Result<Self, Error> {
        validate(key)?;
        Ok(Self(key.into()))
    }

    /// Copies a key that already passed [`validate`].
    pub(crate) fn from_validated(key: &str) -> Self {
        debug_assert!(validate(key).is_ok(), "key was not validated");
        Self(key.into())
    }

    /// Returns the key text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Returns the key length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; keys are never empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

pub(crate) fn validate(key: &str) -> Result<(), Error> {
    if key.len() > MAX_KEY_SIZE {
        return Err(Error::key_too_long(key.len(), MAX_KEY_SIZE));
    }
    if key.is_empty() {
        return Err(Error::invalid_key("key must not be empty"));
    }
    if key.as_bytes().contains(&0) {
        return Err(Error::invalid_key("key must not contain a NUL byte"));
    }
    Ok(())
}

impl TryFrom<&str> for TopNKey {
    type Error = Error;

    fn try_from(key: &str) -> Result<Self, Self::Error> {
        Self::new(key)
    }
}

impl TryFrom<String> for TopNKey {
    type Error = Error;

    fn try_from(key: String) -> Result<Self, Self::Error> {
        validate(&key)?;
        Ok(Self(key.into_boxed_str()))
    }
}

impl Borrow<str> for TopNKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TopNKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for TopNKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl fmt::Display for TopNKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_length_limit_is_in_bytes() {
        assert!(TopNKey::new(&"a".repeat(MAX_KEY_SIZE)).is_ok());
        // 129 two-byte characters
        let wide = "é".repeat(129);
        assert_eq!(wide.chars().count(), 129);
        assert_eq!(
            TopNKey::new(&wide).unwrap_err().kind(),
            ErrorKind::KeyTooLong
        );
    }

    #[test]
    fn test_rejects_empty_and_nul() {
        assert_eq!(TopNKey::new("").unwrap_err().kind(), ErrorKind::InvalidKey);
        assert_eq!(
            TopNKey::try_from(String::from("a\0b")).unwrap_err().kind(),
            ErrorKind::InvalidKey
        );
    }

    #[test]
    fn test_from_validated_matches_new() {
        let key = "pear";
        validate(key).unwrap();
        assert_eq!(TopNKey::from_validated(key), TopNKey::new(key).unwrap());
    }

    #[test]
    fn test_orders_bytewise() {
        let mut keys = ["b", "B", "a", "ab"].map(|k| TopNKey::new(k).unwrap());
        keys.sort();
        let keys: Vec<&str> = keys.iter().map(TopNKey::as_str).collect();
        assert_eq!(keys, ["B", "a", "ab", "b"]);
    }
}
