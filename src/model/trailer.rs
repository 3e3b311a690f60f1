//! Sector trailer layout
//!
//! A trailer is `key A (6) | access bits (3) | user byte (1) | key B (6)`.
//! The access bytes store each C1/C2/C3 condition bit twice, once inverted,
//! and a card rejects authentication forever on a sector whose copies
//! disagree, so a trailer is only ever built from bytes that decode cleanly.

use thiserror::Error;

use super::address::BLOCK_SIZE;
use super::key::KeyValue;

/// Access conditions (C1, C2, C3) of the four blocks of a sector
///
/// Each entry packs the three condition bits as `C1 << 2 | C2 << 1 | C3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccessBits([u8; 4]);

impl AccessBits {
    /// Factory configuration: data blocks open to either key, trailer
    /// writable with key A (`FF 07 80`)
    pub const TRANSPORT: AccessBits = AccessBits([0b000, 0b000, 0b000, 0b001]);

    /// Build from per-block conditions, each in `0..8`
    pub fn new(conditions: [u8; 4]) -> Result<Self, TrailerError> {
        if let Some(&condition) = conditions.iter().find(|&&c| c > 0b111) {
            return Err(TrailerError::InvalidCondition { condition });
        }
        Ok(Self(conditions))
    }

    /// Condition bits of block `block` within the sector
    pub fn condition(&self, block: usize) -> Option<u8> {
        self.0.get(block).copied()
    }

    pub fn decode(bytes: [u8; 3]) -> Result<Self, TrailerError> {
        let c1 = bytes[1] >> 4;
        let c2 = bytes[2] & 0x0F;
        let c3 = bytes[2] >> 4;

        let consistent = bytes[0] & 0x0F == !c1 & 0x0F
            && bytes[0] >> 4 == !c2 & 0x0F
            && bytes[1] & 0x0F == !c3 & 0x0F;
        if !consistent {
            return Err(TrailerError::InconsistentAccessBits { bytes });
        }

        let mut conditions = [0u8; 4];
        for (block, condition) in conditions.iter_mut().enumerate() {
            let bit = |nibble: u8| (nibble >> block) & 1;
            *condition = bit(c1) << 2 | bit(c2) << 1 | bit(c3);
        }
        Ok(Self(conditions))
    }

    pub fn encode(&self) -> [u8; 3] {
        let (mut c1, mut c2, mut c3) = (0u8, 0u8, 0u8);
        for (block, condition) in self.0.iter().enumerate() {
            c1 |= ((condition >> 2) & 1) << block;
            c2 |= ((condition >> 1) & 1) << block;
            c3 |= (condition & 1) << block;
        }
        [
            (!c2 & 0x0F) << 4 | (!c1 & 0x0F),
            c1 << 4 | (!c3 & 0x0F),
            c3 << 4 | c2,
        ]
    }
}

impl Default for AccessBits {
    fn default() -> Self {
        Self::TRANSPORT
    }
}

/// Decoded sector trailer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectorTrailer {
    pub key_a: KeyValue,
    pub access_bits: AccessBits,
    /// General purpose byte, free for application use
    pub user_byte: u8,
    pub key_b: KeyValue,
}

impl SectorTrailer {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TrailerError> {
        if bytes.len() != BLOCK_SIZE {
            return Err(TrailerError::InvalidLength {
                expected: BLOCK_SIZE,
                actual: bytes.len(),
            });
        }
        let mut key_a = [0u8; 6];
        let mut key_b = [0u8; 6];
        key_a.copy_from_slice(&bytes[0..6]);
        key_b.copy_from_slice(&bytes[10..16]);

        Ok(Self {
            key_a: KeyValue::new(key_a),
            access_bits: AccessBits::decode([bytes[6], bytes[7], bytes[8]])?,
            user_byte: bytes[9],
            key_b: KeyValue::new(key_b),
        })
    }

    pub fn to_bytes(&self) -> [u8; BLOCK_SIZE] {
        let mut bytes = [0u8; BLOCK_SIZE];
        bytes[0..6].copy_from_slice(self.key_a.as_bytes());
        bytes[6..9].copy_from_slice(&self.access_bits.encode());
        bytes[9] = self.user_byte;
        bytes[10..16].copy_from_slice(self.key_b.as_bytes());
        bytes
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrailerError {
    #[error("Trailer must be exactly {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Access bits {} are inconsistent with their inverted copies", hex::encode_upper(.bytes))]
    InconsistentAccessBits { bytes: [u8; 3] },

    #[error("Access condition must be in 0..8, got {condition}")]
    InvalidCondition { condition: u8 },
}
