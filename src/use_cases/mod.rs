//! Use cases (orchestration)
//!
//! Each use case drives one operation over an open session, through the
//! ports only.

mod dump;
mod write_block;

pub use dump::{dump, BlockOutcome, CardDump, DumpEntry, DumpSweep};
pub use write_block::{execute_write, write_block, WriteOutcome, WriteRequest, WriteState};
