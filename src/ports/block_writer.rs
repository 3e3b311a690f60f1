use crate::error::DeviceError;
use crate::model::{BlockAddress, Key, BLOCK_SIZE};

/// Capability to write one block after authenticating its sector
pub trait BlockWriter {
    /// Authenticate the sector of `address` with `key` and write `bytes`
    ///
    /// # Errors
    ///
    /// - `DeviceError::Authentication` if the card refuses the key in this role
    /// - `DeviceError::Refused` if the access bits forbid writing the block
    /// - `DeviceError::Transport` if the card is gone or the reader fails
    fn authenticated_write(
        &mut self,
        address: BlockAddress,
        key: &Key,
        bytes: &[u8; BLOCK_SIZE],
    ) -> Result<(), DeviceError>;
}
