mod access;
mod address;
mod block;
mod catalog;
mod key;
mod payload;
mod trailer;

pub use access::BlockRead;
pub use address::{
    AddressError, BlockAddress, BlockKind, BLOCKS_PER_SECTOR, BLOCK_SIZE, SECTOR_COUNT,
};
pub use block::{BlockContent, ValueBlock};
pub use catalog::{KeyCatalog, DEFAULT_KEYS};
pub use key::{Key, KeyError, KeyRole, KeyValue};
pub use payload::{Payload, PayloadError};
pub use trailer::{AccessBits, SectorTrailer, TrailerError};
