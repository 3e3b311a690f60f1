//! Key search for a single block
//!
//! Every failed authentication costs a round-trip and some readers cap the
//! number of failures, so the search stops at the first key that works and
//! never moves on to another key once the card itself has gone.

use tracing::{debug, warn};

use crate::error::{AccessError, DeviceError};
use crate::model::{BlockAddress, BlockContent, BlockRead, KeyCatalog, KeyRole, KeyValue};
use crate::ports::BlockReader;

/// Outcome of opening one block
pub type AccessOutcome = Result<BlockRead, AccessError>;

/// Tries keys against blocks of an open session
pub struct AccessResolver<'d, D: ?Sized> {
    device: &'d mut D,
}

impl<'d, D> AccessResolver<'d, D>
where
    D: BlockReader + ?Sized,
{
    pub fn new(device: &'d mut D) -> Self {
        Self { device }
    }

    /// Read `address` with `value`, as key A first and then as key B
    ///
    /// A refused key moves on to the next role; a transport failure is
    /// returned at once without trying role B.
    pub fn try_key(&mut self, address: BlockAddress, value: KeyValue) -> AccessOutcome {
        for role in KeyRole::ATTEMPT_ORDER {
            let key = value.with_role(role);
            match self.device.authenticated_read(address, &key) {
                Ok(bytes) => {
                    debug!("Read {} with key {}", address, role);
                    return Ok(BlockRead {
                        address,
                        content: BlockContent::new(address, bytes),
                        key,
                    });
                }
                Err(DeviceError::Transport(err)) => {
                    warn!("Transport failure reading {}: {}", address, err);
                    return Err(AccessError::Transport(err));
                }
                Err(err) => debug!("{}", err),
            }
        }

        Err(AccessError::AuthenticationExhausted {
            address,
            keys_tried: 1,
        })
    }

    /// Read `address` with the first catalog key that opens it
    pub fn try_catalog(&mut self, address: BlockAddress, catalog: &KeyCatalog) -> AccessOutcome {
        for value in catalog {
            match self.try_key(address, *value) {
                Err(AccessError::AuthenticationExhausted { .. }) => continue,
                outcome => return outcome,
            }
        }

        debug!("No catalog key opened {}", address);
        Err(AccessError::AuthenticationExhausted {
            address,
            keys_tried: catalog.len(),
        })
    }
}
