use crate::error::DeviceError;
use crate::model::{BlockAddress, Key, BLOCK_SIZE};

/// Capability to read one block after authenticating its sector
pub trait BlockReader {
    /// Authenticate the sector of `address` with `key` and read the block
    ///
    /// # Errors
    ///
    /// - `DeviceError::Authentication` if the card refuses the key in this role
    /// - `DeviceError::Transport` if the card is gone or the reader fails
    fn authenticated_read(
        &mut self,
        address: BlockAddress,
        key: &Key,
    ) -> Result<[u8; BLOCK_SIZE], DeviceError>;
}
