//! Dump use case
//!
//! Sweeps all 64 blocks, sector by sector, opening each with the first
//! catalog key that works. A locked block is recorded and skipped; a lost
//! card ends the sweep, since nothing read after it could be trusted.

use std::fmt;
use std::vec::IntoIter;

use tracing::{info, warn};

use crate::error::{AccessError, MfError, MfResult};
use crate::logic::AccessResolver;
use crate::model::{BlockAddress, BlockRead, KeyCatalog};
use crate::ports::BlockReader;

/// What the sweep found at one address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockOutcome {
    Read(BlockRead),
    /// No catalog key opened the block
    Unreadable { keys_tried: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DumpEntry {
    pub address: BlockAddress,
    pub outcome: BlockOutcome,
}

impl DumpEntry {
    pub fn read(&self) -> Option<&BlockRead> {
        match &self.outcome {
            BlockOutcome::Read(read) => Some(read),
            BlockOutcome::Unreadable { .. } => None,
        }
    }
}

impl fmt::Display for DumpEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            BlockOutcome::Read(read) => write!(f, "{}: {}", self.address, read),
            BlockOutcome::Unreadable { .. } => {
                write!(f, "{}: <Failed to read block>", self.address)
            }
        }
    }
}

/// Result of a completed sweep, in address order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardDump {
    entries: Vec<DumpEntry>,
}

impl CardDump {
    pub fn entries(&self) -> &[DumpEntry] {
        &self.entries
    }

    pub fn get(&self, address: BlockAddress) -> Option<&DumpEntry> {
        self.entries.iter().find(|entry| entry.address == address)
    }

    pub fn readable(&self) -> usize {
        self.entries.iter().filter(|e| e.read().is_some()).count()
    }

    pub fn unreadable(&self) -> usize {
        self.entries.len() - self.readable()
    }
}

impl fmt::Display for CardDump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{}", entry)?;
        }
        Ok(())
    }
}

/// Lazy sweep over every address of the card
///
/// Yields one entry per address. After a transport failure it yields that
/// error once and then nothing more.
pub struct DumpSweep<'a, D: ?Sized> {
    resolver: AccessResolver<'a, D>,
    catalog: &'a KeyCatalog,
    addresses: IntoIter<BlockAddress>,
    completed: usize,
    aborted: bool,
}

impl<'a, D> DumpSweep<'a, D>
where
    D: BlockReader + ?Sized,
{
    pub fn new(device: &'a mut D, catalog: &'a KeyCatalog) -> Self {
        info!("Dumping card with {} candidate keys", catalog.len());
        Self {
            resolver: AccessResolver::new(device),
            catalog,
            addresses: BlockAddress::all().collect::<Vec<_>>().into_iter(),
            completed: 0,
            aborted: false,
        }
    }
}

impl<'a, D> Iterator for DumpSweep<'a, D>
where
    D: BlockReader + ?Sized,
{
    type Item = MfResult<DumpEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.aborted {
            return None;
        }
        let address = self.addresses.next()?;

        let outcome = match self.resolver.try_catalog(address, self.catalog) {
            Ok(read) => BlockOutcome::Read(read),
            Err(AccessError::AuthenticationExhausted { keys_tried, .. }) => {
                BlockOutcome::Unreadable { keys_tried }
            }
            Err(AccessError::Transport(source)) => {
                warn!("Card lost at {}, aborting dump: {}", address, source);
                self.aborted = true;
                return Some(Err(MfError::DumpAborted {
                    address,
                    completed: self.completed,
                    source,
                }));
            }
        };

        self.completed += 1;
        Some(Ok(DumpEntry { address, outcome }))
    }
}

impl<'a, D> std::iter::FusedIterator for DumpSweep<'a, D> where D: BlockReader + ?Sized {}

/// Dump every block of the card in the session
///
/// # Errors
///
/// Returns `MfError::DumpAborted` if the card is lost during the sweep
pub fn dump<D>(device: &mut D, catalog: &KeyCatalog) -> MfResult<CardDump>
where
    D: BlockReader + ?Sized,
{
    let entries = DumpSweep::new(device, catalog).collect::<MfResult<Vec<_>>>()?;
    let dump = CardDump { entries };

    info!(
        "Dump complete: {} blocks read, {} unreadable",
        dump.readable(),
        dump.unreadable()
    );
    Ok(dump)
}
