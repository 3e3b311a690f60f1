use std::fmt;

use super::address::{BlockAddress, BlockKind, BLOCK_SIZE};
use super::trailer::{SectorTrailer, TrailerError};

/// Raw bytes of one block, tagged with what the block holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockContent {
    kind: BlockKind,
    bytes: [u8; BLOCK_SIZE],
}

impl BlockContent {
    pub fn new(address: BlockAddress, bytes: [u8; BLOCK_SIZE]) -> Self {
        Self {
            kind: address.kind(),
            bytes,
        }
    }

    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    pub fn as_bytes(&self) -> &[u8; BLOCK_SIZE] {
        &self.bytes
    }

    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.bytes)
    }

    /// Decode as a sector trailer. `None` for non-trailer blocks.
    ///
    /// Key A always reads back as zeros and key B only when the access
    /// bits allow it, so the keys of a read trailer are rarely meaningful.
    pub fn trailer(&self) -> Option<Result<SectorTrailer, TrailerError>> {
        match self.kind {
            BlockKind::Trailer => Some(SectorTrailer::from_bytes(&self.bytes)),
            _ => None,
        }
    }

    /// Decode as a value block, if a data block carries that format
    pub fn value_block(&self) -> Option<ValueBlock> {
        match self.kind {
            BlockKind::Data => ValueBlock::decode(&self.bytes),
            _ => None,
        }
    }
}

impl fmt::Display for BlockContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Value block: a signed 32-bit counter stored three times (once inverted)
/// followed by a one-byte backup address stored four times
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueBlock {
    pub value: i32,
    pub backup_address: u8,
}

impl ValueBlock {
    pub fn decode(bytes: &[u8; BLOCK_SIZE]) -> Option<Self> {
        let word = |offset: usize| {
            let mut raw = [0u8; 4];
            raw.copy_from_slice(&bytes[offset..offset + 4]);
            u32::from_le_bytes(raw)
        };
        let (value, inverted, copy) = (word(0), word(4), word(8));
        let address = bytes[12];

        let valid = value == copy
            && value == !inverted
            && bytes[14] == address
            && bytes[13] == !address
            && bytes[15] == !address;
        valid.then(|| Self {
            value: value as i32,
            backup_address: address,
        })
    }

    pub fn encode(&self) -> [u8; BLOCK_SIZE] {
        let value = self.value.to_le_bytes();
        let inverted = (!self.value).to_le_bytes();
        let address = self.backup_address;

        let mut bytes = [0u8; BLOCK_SIZE];
        bytes[0..4].copy_from_slice(&value);
        bytes[4..8].copy_from_slice(&inverted);
        bytes[8..12].copy_from_slice(&value);
        bytes[12..16].copy_from_slice(&[address, !address, address, !address]);
        bytes
    }
}
