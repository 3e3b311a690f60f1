//! Entry points for the command layer
//!
//! A command is decoded once by the caller, then run against a freshly
//! opened session. Inputs are validated before the session is opened, and
//! the session is dropped (and so released) on every return path.

use tracing::info;

use crate::adapters::Classic1kResolver;
use crate::error::MfResult;
use crate::model::{BlockAddress, BlockContent, KeyCatalog};
use crate::ports::{BlockResolver, SessionProvider};
use crate::use_cases::{dump, execute_write, CardDump, WriteOutcome, WriteRequest};

pub use crate::model::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Dump the whole card, trying `keys` before the built-in ones
    Dump { keys: Vec<String> },

    /// Write `payload` (hex) to `address`, authenticating with `key` (hex)
    Write {
        address: BlockAddress,
        key: String,
        payload: String,
    },

    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    Dump(CardDump),
    Write(WriteOutcome),
    Help,
}

/// Run `command` on a session from `provider`, resolving writes against
/// the Classic 1K layout
pub fn run<P>(provider: &P, command: Command) -> MfResult<Report>
where
    P: SessionProvider + ?Sized,
{
    run_with_resolver(provider, &Classic1kResolver, command)
}

/// Run `command` with a caller-supplied block resolver
///
/// # Errors
///
/// - `MfError::Domain` if a dump key is malformed (no session is opened)
/// - `MfError::Transport` if no session can be opened
/// - `MfError::DumpAborted` if the card is lost during a dump
///
/// Write failures are not errors here; they come back as the
/// [`WriteOutcome`] in the report.
pub fn run_with_resolver<P, R>(provider: &P, resolver: &R, command: Command) -> MfResult<Report>
where
    P: SessionProvider + ?Sized,
    R: BlockResolver + ?Sized,
{
    match command {
        Command::Dump { keys } => {
            let catalog = KeyCatalog::build(&keys)?;
            let mut session = provider.open()?;
            info!("Session opened for dump");
            Ok(Report::Dump(dump(&mut session, &catalog)?))
        }
        Command::Write {
            address,
            key,
            payload,
        } => {
            let request = match WriteRequest::parse(address, &key, &payload) {
                Ok(request) => request,
                Err(error) => return Ok(Report::Write(WriteOutcome::Rejected(error))),
            };
            let mut session = provider.open()?;
            info!("Session opened for write to {}", address);
            Ok(Report::Write(execute_write(&mut session, resolver, &request)))
        }
        Command::Help => Ok(Report::Help),
    }
}

/// Write `payload` to `address` and return the content read back
///
/// Unlike [`run`], every step that stops the write is an error.
///
/// # Errors
///
/// - `MfError::Domain` if the key or payload is malformed (no session is
///   opened)
/// - `MfError::Transport` if no session can be opened or the card is lost
/// - `MfError::Access` if the key opens the block in neither role
/// - `MfError::Resolve` if the payload cannot go to that block
/// - `MfError::Device` if the card refuses the write or the read-back
pub fn write_verified<P>(
    provider: &P,
    address: BlockAddress,
    key: &str,
    payload: &str,
) -> MfResult<BlockContent>
where
    P: SessionProvider + ?Sized,
{
    let request = WriteRequest::parse(address, key, payload)?;
    let mut session = provider.open()?;
    info!("Session opened for verified write to {}", address);
    execute_write(&mut session, &Classic1kResolver, &request).into_result()
}
