//! Block resolution for the Classic 1K memory layout

use tracing::debug;

use crate::error::ResolveError;
use crate::model::{BlockAddress, BlockKind, SectorTrailer, BLOCK_SIZE};
use crate::ports::BlockResolver;

/// Resolves payloads against the fixed 1K layout
///
/// - data blocks: the 16 payload bytes, untouched
/// - trailers: decoded into key A, access bits, user byte and key B, then
///   re-encoded, so inconsistent access bits never reach the card
/// - manufacturer block: refused
#[derive(Debug, Clone, Copy, Default)]
pub struct Classic1kResolver;

impl BlockResolver for Classic1kResolver {
    fn resolve_block_bytes(
        &self,
        address: BlockAddress,
        payload: &[u8],
    ) -> Result<[u8; BLOCK_SIZE], ResolveError> {
        let kind = address.kind();
        if kind == BlockKind::Manufacturer {
            return Err(ResolveError::ReadOnlyBlock { address });
        }

        let bytes: [u8; BLOCK_SIZE] =
            payload.try_into().map_err(|_| ResolveError::InvalidLength {
                address,
                expected: BLOCK_SIZE,
                actual: payload.len(),
            })?;

        match kind {
            BlockKind::Trailer => {
                let trailer = SectorTrailer::from_bytes(&bytes)
                    .map_err(|source| ResolveError::InvalidTrailer { address, source })?;
                debug!(
                    "Resolved trailer for {}: access bits {}",
                    address,
                    hex::encode_upper(trailer.access_bits.encode())
                );
                Ok(trailer.to_bytes())
            }
            _ => Ok(bytes),
        }
    }
}
