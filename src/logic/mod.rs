mod access_resolver;

pub use access_resolver::{AccessOutcome, AccessResolver};
