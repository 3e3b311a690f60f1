//! Mifare Classic sector keys
//!
//! A sector is guarded by two independent 6-byte secrets. The same secret
//! value may be presented in either role, so the value and the role are
//! modelled separately and combined into a [`Key`] only when authenticating.

use std::fmt;

use thiserror::Error;

/// Role a key value is presented in when authenticating a sector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyRole {
    A,
    B,
}

impl KeyRole {
    /// Roles in the order they are attempted
    pub const ATTEMPT_ORDER: [KeyRole; 2] = [KeyRole::A, KeyRole::B];
}

impl fmt::Display for KeyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyRole::A => write!(f, "A"),
            KeyRole::B => write!(f, "B"),
        }
    }
}

/// 6-byte key secret, independent of the role it is used in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyValue([u8; 6]);

impl KeyValue {
    /// Key length in bytes
    pub const LENGTH: usize = 6;

    /// Key length as a hex string
    pub const HEX_LENGTH: usize = Self::LENGTH * 2;

    pub const fn new(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }

    /// Parse a key from exactly 12 hex characters (either case)
    pub fn from_hex(s: &str) -> Result<Self, KeyError> {
        if s.len() != Self::HEX_LENGTH {
            return Err(KeyError::InvalidLength {
                expected: Self::HEX_LENGTH,
                actual: s.len(),
            });
        }
        let mut bytes = [0u8; 6];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| KeyError::NotHex {
            value: s.to_string(),
        })?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; 6] {
        &self.0
    }

    /// Pair this value with a role
    pub fn with_role(self, role: KeyRole) -> Key {
        Key { role, value: self }
    }
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode_upper(self.0))
    }
}

/// A key value presented in a specific role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Key {
    pub role: KeyRole,
    pub value: KeyValue,
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key {}: {}", self.role, self.value)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("Key must be exactly {expected} hex characters, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Key is not a hex string: {value}")]
    NotHex { value: String },
}
