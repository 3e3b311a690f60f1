//! Write-and-verify use case
//!
//! One write walks through validate, read old content, resolve the payload
//! for the block, write, read back. Each step can end the request; nothing
//! is retried.
//!
//! The old content is read with the caller's key only, never with the key
//! catalog, so a block is only ever written with a key that was just shown
//! to open it.

use std::fmt;

use tracing::{debug, info, warn};

use crate::error::{AccessError, DeviceError, DomainError, MfResult, ResolveError};
use crate::logic::AccessResolver;
use crate::model::{BlockAddress, BlockContent, BlockKind, BlockRead, KeyValue, Payload};
use crate::ports::{BlockResolver, CardOps};

/// Validated write request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteRequest {
    pub address: BlockAddress,
    pub key: KeyValue,
    pub payload: Payload,
}

impl WriteRequest {
    /// # Errors
    ///
    /// Returns an error if the key is not exactly 12 hex characters or the
    /// payload is not a non-empty, even-length hex string
    pub fn parse(address: BlockAddress, key: &str, payload: &str) -> Result<Self, DomainError> {
        Ok(Self {
            address,
            key: KeyValue::from_hex(key)?,
            payload: Payload::from_hex(payload)?,
        })
    }
}

/// Terminal state of a write request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteState {
    Rejected,
    ReadFailed,
    ResolveFailed,
    WriteFailed,
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Malformed input; the card was not touched
    Rejected(DomainError),

    /// The old content could not be read with the given key; nothing written
    ReadFailed {
        address: BlockAddress,
        key: KeyValue,
        error: AccessError,
    },

    /// The payload does not fit the block; nothing written
    ResolveFailed {
        old: BlockRead,
        error: ResolveError,
    },

    WriteFailed {
        old: BlockRead,
        error: DeviceError,
    },

    /// Written; `new` is whatever the card returned when read back
    Done {
        old: BlockRead,
        new: Result<BlockContent, DeviceError>,
    },
}

impl WriteOutcome {
    pub fn state(&self) -> WriteState {
        match self {
            WriteOutcome::Rejected(_) => WriteState::Rejected,
            WriteOutcome::ReadFailed { .. } => WriteState::ReadFailed,
            WriteOutcome::ResolveFailed { .. } => WriteState::ResolveFailed,
            WriteOutcome::WriteFailed { .. } => WriteState::WriteFailed,
            WriteOutcome::Done { .. } => WriteState::Done,
        }
    }

    /// Content before the write, if it could be read
    pub fn old(&self) -> Option<&BlockRead> {
        match self {
            WriteOutcome::ResolveFailed { old, .. }
            | WriteOutcome::WriteFailed { old, .. }
            | WriteOutcome::Done { old, .. } => Some(old),
            _ => None,
        }
    }

    /// Content read back after the write
    pub fn new_content(&self) -> Option<&BlockContent> {
        match self {
            WriteOutcome::Done { new: Ok(content), .. } => Some(content),
            _ => None,
        }
    }

    pub fn is_written(&self) -> bool {
        self.state() == WriteState::Done
    }

    /// The verified new content, or the error that ended the request
    ///
    /// A read-back failure counts as an error here even though the write
    /// itself went through.
    pub fn into_result(self) -> MfResult<BlockContent> {
        match self {
            WriteOutcome::Rejected(error) => Err(error.into()),
            WriteOutcome::ReadFailed { error, .. } => Err(error.into()),
            WriteOutcome::ResolveFailed { error, .. } => Err(error.into()),
            WriteOutcome::WriteFailed { error, .. } | WriteOutcome::Done { new: Err(error), .. } => {
                Err(error.into())
            }
            WriteOutcome::Done { new: Ok(content), .. } => Ok(content),
        }
    }
}

impl fmt::Display for WriteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteOutcome::Rejected(error) => write!(f, "Rejected: {}", error),
            WriteOutcome::ReadFailed { key, error, .. } => {
                write!(f, "Old block data: <Failed to read block> (key {}: {})", key, error)
            }
            WriteOutcome::ResolveFailed { old, error } => {
                writeln!(f, "Old block data: {}", old)?;
                write!(f, "{}", error)
            }
            WriteOutcome::WriteFailed { old, error } => {
                writeln!(f, "Old block data: {}", old)?;
                write!(f, "Write failed: {}", error)
            }
            WriteOutcome::Done { old, new } => {
                writeln!(f, "Old block data: {}", old)?;
                match new {
                    Ok(content) => write!(f, "New block data: {} ({})", content, old.key),
                    Err(_) => write!(f, "New block data: <Failed to read block>"),
                }
            }
        }
    }
}

/// Validate the raw inputs, then write `payload` to `address` with `key`
pub fn write_block<D, R>(
    device: &mut D,
    resolver: &R,
    address: BlockAddress,
    key: &str,
    payload: &str,
) -> WriteOutcome
where
    D: CardOps + ?Sized,
    R: BlockResolver + ?Sized,
{
    match WriteRequest::parse(address, key, payload) {
        Ok(request) => execute_write(device, resolver, &request),
        Err(error) => {
            warn!("Rejected write to {}: {}", address, error.constraint());
            WriteOutcome::Rejected(error)
        }
    }
}

/// Run an already validated request against the card
pub fn execute_write<D, R>(device: &mut D, resolver: &R, request: &WriteRequest) -> WriteOutcome
where
    D: CardOps + ?Sized,
    R: BlockResolver + ?Sized,
{
    let address = request.address;

    let old = match AccessResolver::new(&mut *device).try_key(address, request.key) {
        Ok(old) => old,
        Err(error) => {
            warn!("Could not read {} before writing: {}", address, error);
            return WriteOutcome::ReadFailed {
                address,
                key: request.key,
                error,
            };
        }
    };
    info!(
        "Read old {:?} block at {} with key {}",
        address.kind(),
        address,
        old.key.role
    );

    if address.kind() == BlockKind::Manufacturer {
        let error = ResolveError::ReadOnlyBlock { address };
        warn!("{}", error);
        return WriteOutcome::ResolveFailed { old, error };
    }

    let bytes = match resolver.resolve_block_bytes(address, request.payload.as_bytes()) {
        Ok(bytes) => bytes,
        Err(error) => {
            warn!("{}", error);
            return WriteOutcome::ResolveFailed { old, error };
        }
    };

    if let Err(error) = device.authenticated_write(address, &old.key, &bytes) {
        warn!("Write to {} failed: {}", address, error);
        return WriteOutcome::WriteFailed { old, error };
    }
    debug!("Wrote {} with key {}", address, old.key.role);

    let new = device
        .authenticated_read(address, &old.key)
        .map(|bytes| BlockContent::new(address, bytes));
    match &new {
        Ok(_) => info!("Read back {} with key {}", address, old.key.role),
        Err(error) => warn!("Could not read back {}: {}", address, error),
    }

    WriteOutcome::Done { old, new }
}
