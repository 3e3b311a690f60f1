use std::fmt;

use super::address::BlockAddress;
use super::block::BlockContent;
use super::key::Key;

/// A block that was read, with the key and role that opened it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRead {
    pub address: BlockAddress,
    pub content: BlockContent,
    pub key: Key,
}

impl fmt::Display for BlockRead {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.content, self.key)
    }
}
