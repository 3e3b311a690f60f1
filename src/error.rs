//! Error types for mfclassic
//!
//! Errors are layered the way callers have to react to them:
//! input validation happens before any device access, an authentication
//! failure only concerns one block, and a transport failure ends the whole
//! operation.

use thiserror::Error;

use crate::model::{
    AddressError, BlockAddress, KeyError, KeyRole, PayloadError, TrailerError,
};

/// Result type alias for mfclassic operations
pub type MfResult<T> = Result<T, MfError>;

/// Top-level error type for all mfclassic operations
#[derive(Error, Debug)]
pub enum MfError {
    /// Malformed caller input, rejected before touching the card
    #[error("Input validation error: {0}")]
    Domain(#[from] DomainError),

    /// Card removed or reader I/O failure
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// No key opened a block
    #[error("Access error: {0}")]
    Access(AccessError),

    /// Payload cannot be written to the target block
    #[error("Block resolution error: {0}")]
    Resolve(#[from] ResolveError),

    /// The card refused a write or its read-back
    #[error("Device error: {0}")]
    Device(DeviceError),

    /// A dump lost the card part way through
    #[error("Dump aborted at {address} after {completed} blocks: {source}")]
    DumpAborted {
        address: BlockAddress,
        completed: usize,
        source: TransportError,
    },
}

/// Input validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Key error: {0}")]
    Key(#[from] KeyError),

    #[error("Address error: {0}")]
    Address(#[from] AddressError),

    #[error("Payload error: {0}")]
    Payload(#[from] PayloadError),
}

/// Failures of the link to the card, fatal to the running operation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Card removed or not present")]
    CardRemoved,

    #[error("No card session available: {reason}")]
    Unavailable { reason: String },

    #[error("Reader I/O failure: {reason}")]
    Io { reason: String },
}

/// Errors reported by the device primitives
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// The key was refused for this block in this role
    #[error("Authentication with key {role} failed for {address}")]
    Authentication { address: BlockAddress, role: KeyRole },

    /// Authenticated, but the access conditions forbid the operation
    #[error("Card refused operation on {address}: {reason}")]
    Refused { address: BlockAddress, reason: String },

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Outcome of searching keys for one block
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    #[error("No key could authenticate {address} ({keys_tried} keys tried)")]
    AuthenticationExhausted {
        address: BlockAddress,
        keys_tried: usize,
    },

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Errors mapping a payload onto a block
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("{address} is the manufacturer block and cannot be written")]
    ReadOnlyBlock { address: BlockAddress },

    #[error("{address} takes exactly {expected} bytes, got {actual}")]
    InvalidLength {
        address: BlockAddress,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid sector trailer for {address}: {source}")]
    InvalidTrailer {
        address: BlockAddress,
        source: TrailerError,
    },
}

impl From<KeyError> for MfError {
    fn from(err: KeyError) -> Self {
        MfError::Domain(DomainError::Key(err))
    }
}

impl From<AddressError> for MfError {
    fn from(err: AddressError) -> Self {
        MfError::Domain(DomainError::Address(err))
    }
}

impl From<PayloadError> for MfError {
    fn from(err: PayloadError) -> Self {
        MfError::Domain(DomainError::Payload(err))
    }
}

/// Transport failures keep their own variant so callers can tell a lost
/// card from a block that stayed locked
impl From<AccessError> for MfError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::Transport(transport) => MfError::Transport(transport),
            other => MfError::Access(other),
        }
    }
}

/// As with [`AccessError`], a lost card surfaces as `MfError::Transport`
impl From<DeviceError> for MfError {
    fn from(err: DeviceError) -> Self {
        match err.transport() {
            Some(transport) => MfError::Transport(transport.clone()),
            None => MfError::Device(err),
        }
    }
}

impl DomainError {
    /// The rule the input broke, without echoing the input itself
    pub fn constraint(&self) -> &'static str {
        match self {
            DomainError::Key(KeyError::InvalidLength { .. }) => {
                "key must be exactly 12 hex characters"
            }
            DomainError::Key(KeyError::NotHex { .. }) => "key must be a hex string",
            DomainError::Address(_) => "address must be a sector in 0..16 and a block in 0..4",
            DomainError::Payload(PayloadError::Empty) => "payload must not be empty",
            DomainError::Payload(PayloadError::OddLength { .. }) => {
                "payload must have an even number of hex characters"
            }
            DomainError::Payload(PayloadError::NotHex { .. }) => "payload must be a hex string",
        }
    }
}

impl DeviceError {
    /// The transport failure behind this error, if any
    pub fn transport(&self) -> Option<&TransportError> {
        match self {
            DeviceError::Transport(err) => Some(err),
            _ => None,
        }
    }
}
