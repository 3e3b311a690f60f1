//! BlockResolver trait - maps a write payload onto a block

use crate::error::ResolveError;
use crate::model::{BlockAddress, BLOCK_SIZE};

/// Capability to turn a raw payload into the bytes a block must hold
///
/// Data blocks take the payload as is. Trailers hold keys and access
/// bits, so an implementation has to decode and re-encode them rather than
/// pass them through.
pub trait BlockResolver {
    fn resolve_block_bytes(
        &self,
        address: BlockAddress,
        payload: &[u8],
    ) -> Result<[u8; BLOCK_SIZE], ResolveError>;
}
