//! Mifare Classic 1K key resolution and block read/write/verify engine
//!
//! The crate decides which keys to try, in which order and role, and walks a
//! write through read-old, resolve, write and read-back. Talking to the
//! reader is left to implementations of the [`ports`] traits.

mod adapters;
pub mod api;
pub mod error;
mod logic;
pub mod model;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use error::{MfError, MfResult};

pub use adapters::Classic1kResolver;
pub use api::{run, run_with_resolver, write_verified, Command, Report};
pub use logic::{AccessOutcome, AccessResolver};
