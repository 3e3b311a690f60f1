//! Ordered set of candidate keys for a dump
//!
//! The order is the search order: the first key that opens a block is the
//! one reported for it.

use super::key::{KeyError, KeyValue};

/// Well-known keys tried after the user's own, in this order
pub const DEFAULT_KEYS: [KeyValue; 8] = [
    KeyValue::new([0x00, 0x11, 0x22, 0x33, 0x44, 0x55]),
    KeyValue::new([0x00, 0x01, 0x02, 0x03, 0x04, 0x05]),
    KeyValue::new([0xA0, 0xA1, 0xA2, 0xA3, 0xA4, 0xA5]),
    KeyValue::new([0xB0, 0xB1, 0xB2, 0xB3, 0xB4, 0xB5]),
    KeyValue::new([0xAA; 6]),
    KeyValue::new([0xBB; 6]),
    KeyValue::new([0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]),
    KeyValue::new([0xFF; 6]),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCatalog {
    keys: Vec<KeyValue>,
}

impl KeyCatalog {
    /// User keys in first-seen order, then [`DEFAULT_KEYS`]
    ///
    /// # Errors
    ///
    /// Returns the first user key that is not exactly 12 hex characters
    pub fn build<I, S>(user_keys: I) -> Result<Self, KeyError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let user = user_keys
            .into_iter()
            .map(|key| KeyValue::from_hex(key.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        let mut keys: Vec<KeyValue> = Vec::with_capacity(user.len() + DEFAULT_KEYS.len());
        for key in user.into_iter().chain(DEFAULT_KEYS) {
            // Parsed values compare byte-wise, so "aa.." and "AA.." collapse here
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        Ok(Self { keys })
    }

    /// Catalog holding only the built-in keys
    pub fn defaults() -> Self {
        Self {
            keys: DEFAULT_KEYS.to_vec(),
        }
    }

    pub fn keys(&self) -> &[KeyValue] {
        &self.keys
    }

    pub fn iter(&self) -> impl Iterator<Item = &KeyValue> {
        self.keys.iter()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl Default for KeyCatalog {
    fn default() -> Self {
        Self::defaults()
    }
}

impl<'a> IntoIterator for &'a KeyCatalog {
    type Item = &'a KeyValue;
    type IntoIter = std::slice::Iter<'a, KeyValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.iter()
    }
}
