use std::fmt;

use thiserror::Error;

/// Number of sectors on a Classic 1K card
pub const SECTOR_COUNT: u8 = 16;

/// Number of blocks in each sector
pub const BLOCKS_PER_SECTOR: u8 = 4;

/// Block size in bytes
pub const BLOCK_SIZE: usize = 16;

/// What a block holds under the fixed 1K layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    /// Sector 0 block 0: UID and manufacturer data, read-only on genuine cards
    Manufacturer,
    /// Plain user data
    Data,
    /// Last block of a sector: both keys and the access bits
    Trailer,
}

/// Validated (sector, block) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockAddress {
    sector: u8,
    block: u8,
}

impl BlockAddress {
    pub fn new(sector: u8, block: u8) -> Result<Self, AddressError> {
        if sector >= SECTOR_COUNT {
            return Err(AddressError::SectorOutOfRange { sector });
        }
        if block >= BLOCKS_PER_SECTOR {
            return Err(AddressError::BlockOutOfRange { block });
        }
        Ok(Self { sector, block })
    }

    /// Parse decimal sector and block indexes
    pub fn parse(sector: &str, block: &str) -> Result<Self, AddressError> {
        let sector = sector
            .trim()
            .parse::<u8>()
            .map_err(|_| AddressError::NotANumber {
                value: sector.to_string(),
            })?;
        let block = block
            .trim()
            .parse::<u8>()
            .map_err(|_| AddressError::NotANumber {
                value: block.to_string(),
            })?;
        Self::new(sector, block)
    }

    pub fn sector(&self) -> u8 {
        self.sector
    }

    pub fn block(&self) -> u8 {
        self.block
    }

    /// Block number counted from the start of the card (0..64)
    pub fn absolute(&self) -> u8 {
        self.sector * BLOCKS_PER_SECTOR + self.block
    }

    pub fn kind(&self) -> BlockKind {
        if self.block == BLOCKS_PER_SECTOR - 1 {
            BlockKind::Trailer
        } else if self.sector == 0 && self.block == 0 {
            BlockKind::Manufacturer
        } else {
            BlockKind::Data
        }
    }

    /// Every address of the card, sector by sector
    pub fn all() -> impl Iterator<Item = BlockAddress> {
        (0..SECTOR_COUNT).flat_map(|sector| {
            (0..BLOCKS_PER_SECTOR).map(move |block| BlockAddress { sector, block })
        })
    }
}

impl fmt::Display for BlockAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sector {:02} block {:02}", self.sector, self.block)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("Sector must be in 0..{max}, got {sector}", max = SECTOR_COUNT)]
    SectorOutOfRange { sector: u8 },

    #[error("Block must be in 0..{max}, got {block}", max = BLOCKS_PER_SECTOR)]
    BlockOutOfRange { block: u8 },

    #[error("Not a valid index: {value}")]
    NotANumber { value: String },
}
