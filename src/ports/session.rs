use super::CardOps;
use crate::error::TransportError;

/// Capability to open a session on the card currently in the reader
///
/// The session is released when dropped, so a caller that lets it go out
/// of scope cannot leak the reader, whatever path it returns through.
pub trait SessionProvider {
    type Session: CardOps;

    fn open(&self) -> Result<Self::Session, TransportError>;
}
