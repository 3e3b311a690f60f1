//! Adapters - concrete implementations of ports (traits)
//!
//! Real readers live outside this crate; the in-memory card below stands
//! in for one in tests.

mod classic_1k;

#[cfg(test)]
pub mod fake_card;

pub use classic_1k::Classic1kResolver;
