use thiserror::Error;

/// Decoded write payload, before it is mapped onto a block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload(Vec<u8>);

impl Payload {
    /// Parse a non-empty, even-length hex string (either case)
    pub fn from_hex(s: &str) -> Result<Self, PayloadError> {
        if s.is_empty() {
            return Err(PayloadError::Empty);
        }
        if s.len() % 2 != 0 {
            return Err(PayloadError::OddLength { length: s.len() });
        }
        hex::decode(s)
            .map(Self)
            .map_err(|_| PayloadError::NotHex {
                value: s.to_string(),
            })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PayloadError {
    #[error("Payload must not be empty")]
    Empty,

    #[error("Payload must have an even number of hex characters, got {length}")]
    OddLength { length: usize },

    #[error("Payload is not a hex string: {value}")]
    NotHex { value: String },
}
