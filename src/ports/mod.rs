//! Ports for card operations
//!
//! The core depends on these traits, not on a reader or a transport.
//! Terminal discovery, APDU exchange and Mifare command encoding live
//! behind them.

mod block_reader;
mod block_resolver;
mod block_writer;
mod session;

pub use block_reader::BlockReader;
pub use block_resolver::BlockResolver;
pub use block_writer::BlockWriter;
pub use session::SessionProvider;

/// Combined trait for an open card session
pub trait CardOps: BlockReader + BlockWriter {}

// Blanket implementation for types that implement all operation traits
impl<T> CardOps for T where T: BlockReader + BlockWriter {}
