//! Scriptable in-memory card for testing the engines
//!
//! Every primitive call is recorded in a journal shared between clones, so
//! a test can hand a card to a session provider and still inspect what the
//! engine asked of it afterwards.

#[cfg(test)]
use std::cell::{Cell, RefCell};
#[cfg(test)]
use std::collections::HashSet;
#[cfg(test)]
use std::rc::Rc;

#[cfg(test)]
use crate::error::{DeviceError, TransportError};
#[cfg(test)]
use crate::model::{
    BlockAddress, Key, KeyRole, KeyValue, BLOCK_SIZE, DEFAULT_KEYS, SECTOR_COUNT,
};
#[cfg(test)]
use crate::ports::{BlockReader, BlockWriter, SessionProvider};

#[cfg(test)]
pub const FACTORY_KEY: KeyValue = DEFAULT_KEYS[7];

/// One primitive call as the card saw it
#[cfg(test)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Read {
        address: BlockAddress,
        key: Key,
    },
    Write {
        address: BlockAddress,
        key: Key,
        bytes: [u8; BLOCK_SIZE],
    },
}

#[cfg(test)]
impl Call {
    pub fn address(&self) -> BlockAddress {
        match self {
            Call::Read { address, .. } | Call::Write { address, .. } => *address,
        }
    }

    pub fn key(&self) -> Key {
        match self {
            Call::Read { key, .. } | Call::Write { key, .. } => *key,
        }
    }
}

#[cfg(test)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectorKeys {
    pub key_a: Option<KeyValue>,
    pub key_b: Option<KeyValue>,
}

#[cfg(test)]
impl SectorKeys {
    fn accepts(&self, key: &Key) -> bool {
        let expected = match key.role {
            KeyRole::A => self.key_a,
            KeyRole::B => self.key_b,
        };
        expected == Some(key.value)
    }
}

#[cfg(test)]
#[derive(Debug, Clone)]
pub struct FakeCard {
    blocks: Vec<[u8; BLOCK_SIZE]>,
    sectors: Vec<SectorKeys>,
    read_only: HashSet<BlockAddress>,
    ignored_writes: HashSet<BlockAddress>,
    failing_writes: HashSet<BlockAddress>,
    remove_after: Option<usize>,
    journal: Rc<RefCell<Vec<Call>>>,
}

#[cfg(test)]
impl FakeCard {
    /// Factory-fresh card: every sector opens with key A `FFFFFFFFFFFF`,
    /// key B is readable and therefore unusable, block 0 is read-only
    pub fn new() -> Self {
        let manufacturer = BlockAddress::new(0, 0).expect("valid address");
        let mut blocks = vec![[0u8; BLOCK_SIZE]; 64];
        blocks[0] = [
            0xDE, 0xAD, 0xBE, 0xEF, 0x22, 0x08, 0x04, 0x00, 0x62, 0x63, 0x64, 0x65, 0x66, 0x67,
            0x68, 0x69,
        ];
        for sector in 0..SECTOR_COUNT as usize {
            blocks[sector * 4 + 3] = [
                0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFF, 0x07, 0x80, 0x69, 0xFF, 0xFF, 0xFF, 0xFF,
                0xFF, 0xFF,
            ];
        }

        Self {
            blocks,
            sectors: vec![
                SectorKeys {
                    key_a: Some(FACTORY_KEY),
                    key_b: None,
                };
                SECTOR_COUNT as usize
            ],
            read_only: HashSet::from([manufacturer]),
            ignored_writes: HashSet::new(),
            failing_writes: HashSet::new(),
            remove_after: None,
            journal: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn with_sector_keys(
        mut self,
        sector: u8,
        key_a: Option<KeyValue>,
        key_b: Option<KeyValue>,
    ) -> Self {
        self.sectors[sector as usize] = SectorKeys { key_a, key_b };
        self
    }

    /// Lock every sector behind keys no catalog holds
    pub fn locked() -> Self {
        let secret = KeyValue::new([0x5A, 0x5A, 0x5A, 0x5A, 0x5A, 0x5A]);
        let mut card = Self::new();
        for sector in card.sectors.iter_mut() {
            *sector = SectorKeys {
                key_a: Some(secret),
                key_b: Some(secret),
            };
        }
        card
    }

    /// Clone card whose manufacturer block accepts writes
    pub fn magic() -> Self {
        let mut card = Self::new();
        card.read_only.clear();
        card
    }

    pub fn with_block(mut self, address: BlockAddress, bytes: [u8; BLOCK_SIZE]) -> Self {
        self.blocks[address.absolute() as usize] = bytes;
        self
    }

    /// The card disappears once this many calls have been served
    pub fn remove_after(mut self, calls: usize) -> Self {
        self.remove_after = Some(calls);
        self
    }

    /// Writes to `address` report success but leave the block untouched
    pub fn ignore_writes_to(mut self, address: BlockAddress) -> Self {
        self.ignored_writes.insert(address);
        self
    }

    /// Writes to `address` fail with a reader I/O error
    pub fn fail_writes_to(mut self, address: BlockAddress) -> Self {
        self.failing_writes.insert(address);
        self
    }

    pub fn block(&self, address: BlockAddress) -> [u8; BLOCK_SIZE] {
        self.blocks[address.absolute() as usize]
    }

    pub fn calls(&self) -> Vec<Call> {
        self.journal.borrow().clone()
    }

    pub fn writes(&self) -> usize {
        self.journal
            .borrow()
            .iter()
            .filter(|call| matches!(call, Call::Write { .. }))
            .count()
    }

    fn serve(&mut self, call: Call) -> Result<(), DeviceError> {
        let served = self.journal.borrow().len();
        let address = call.address();
        let key = call.key();
        self.journal.borrow_mut().push(call);

        if self.remove_after.is_some_and(|limit| served >= limit) {
            return Err(TransportError::CardRemoved.into());
        }
        if !self.sectors[address.sector() as usize].accepts(&key) {
            return Err(DeviceError::Authentication {
                address,
                role: key.role,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
impl Default for FakeCard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
impl BlockReader for FakeCard {
    fn authenticated_read(
        &mut self,
        address: BlockAddress,
        key: &Key,
    ) -> Result<[u8; BLOCK_SIZE], DeviceError> {
        self.serve(Call::Read { address, key: *key })?;
        Ok(self.block(address))
    }
}

#[cfg(test)]
impl BlockWriter for FakeCard {
    fn authenticated_write(
        &mut self,
        address: BlockAddress,
        key: &Key,
        bytes: &[u8; BLOCK_SIZE],
    ) -> Result<(), DeviceError> {
        self.serve(Call::Write {
            address,
            key: *key,
            bytes: *bytes,
        })?;

        if self.failing_writes.contains(&address) {
            return Err(TransportError::Io {
                reason: "write timed out".to_string(),
            }
            .into());
        }
        if self.read_only.contains(&address) {
            return Err(DeviceError::Refused {
                address,
                reason: "block is read-only".to_string(),
            });
        }
        if !self.ignored_writes.contains(&address) {
            self.blocks[address.absolute() as usize] = *bytes;
        }
        Ok(())
    }
}

/// Session over a [`FakeCard`] that counts its own release
#[cfg(test)]
#[derive(Debug)]
pub struct FakeSession {
    card: FakeCard,
    released: Rc<Cell<usize>>,
}

#[cfg(test)]
impl BlockReader for FakeSession {
    fn authenticated_read(
        &mut self,
        address: BlockAddress,
        key: &Key,
    ) -> Result<[u8; BLOCK_SIZE], DeviceError> {
        self.card.authenticated_read(address, key)
    }
}

#[cfg(test)]
impl BlockWriter for FakeSession {
    fn authenticated_write(
        &mut self,
        address: BlockAddress,
        key: &Key,
        bytes: &[u8; BLOCK_SIZE],
    ) -> Result<(), DeviceError> {
        self.card.authenticated_write(address, key, bytes)
    }
}

#[cfg(test)]
impl Drop for FakeSession {
    fn drop(&mut self) {
        self.released.set(self.released.get() + 1);
    }
}

#[cfg(test)]
pub struct FakeSessionProvider {
    pub card: Option<FakeCard>,
    pub opened: Rc<Cell<usize>>,
    pub released: Rc<Cell<usize>>,
}

#[cfg(test)]
impl FakeSessionProvider {
    pub fn new(card: Option<FakeCard>) -> Self {
        Self {
            card,
            opened: Rc::new(Cell::new(0)),
            released: Rc::new(Cell::new(0)),
        }
    }
}

#[cfg(test)]
impl SessionProvider for FakeSessionProvider {
    type Session = FakeSession;

    fn open(&self) -> Result<Self::Session, TransportError> {
        let card = self.card.clone().ok_or_else(|| TransportError::Unavailable {
            reason: "no card on the reader".to_string(),
        })?;
        self.opened.set(self.opened.get() + 1);
        Ok(FakeSession {
            card,
            released: Rc::clone(&self.released),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract_tests_for;
    use crate::ports::contract_tests::card_contract;

    contract_tests_for!(
        fake_card_contract,
        make = FakeCard::new,
        tests = {
            test_read_with_factory_key => card_contract::test_read_with_factory_key,
            test_read_with_unknown_key => card_contract::test_read_with_unknown_key,
            test_write_then_read => card_contract::test_write_then_read,
            test_write_with_unknown_key => card_contract::test_write_with_unknown_key,
            test_read_reflects_latest_write => card_contract::test_read_reflects_latest_write,
        }
    );

    contract_tests_for!(
        fake_session_contract,
        make = || FakeSessionProvider::new(Some(FakeCard::new()))
            .open()
            .expect("session"),
        tests = {
            test_read_with_factory_key => card_contract::test_read_with_factory_key,
            test_write_then_read => card_contract::test_write_then_read,
        }
    );

    #[test]
    fn test_card_removed_after_limit() {
        let mut card = FakeCard::new().remove_after(1);
        let address = BlockAddress::new(1, 0).unwrap();
        let key = FACTORY_KEY.with_role(KeyRole::A);

        assert!(card.authenticated_read(address, &key).is_ok());
        assert_eq!(
            card.authenticated_read(address, &key).unwrap_err(),
            DeviceError::Transport(TransportError::CardRemoved)
        );
        assert_eq!(card.calls().len(), 2);
    }

    #[test]
    fn test_manufacturer_block_refuses_writes() {
        let mut card = FakeCard::new();
        let address = BlockAddress::new(0, 0).unwrap();
        let before = card.block(address);
        let key = FACTORY_KEY.with_role(KeyRole::A);

        let result = card.authenticated_write(address, &key, &[0u8; 16]);
        assert!(matches!(result, Err(DeviceError::Refused { .. })));
        assert_eq!(card.block(address), before);
    }

    #[test]
    fn test_ignored_write_leaves_block() {
        let address = BlockAddress::new(2, 2).unwrap();
        let mut card = FakeCard::new().ignore_writes_to(address);
        let key = FACTORY_KEY.with_role(KeyRole::A);

        card.authenticated_write(address, &key, &[0xAB; 16]).unwrap();
        assert_eq!(card.block(address), [0u8; 16]);
    }

    #[test]
    fn test_journal_shared_between_clones() {
        let card = FakeCard::new();
        let mut clone = card.clone();
        let key = FACTORY_KEY.with_role(KeyRole::A);
        clone
            .authenticated_read(BlockAddress::new(3, 1).unwrap(), &key)
            .unwrap();
        assert_eq!(card.calls().len(), 1);
    }

    #[test]
    fn test_session_released_on_drop() {
        let provider = FakeSessionProvider::new(Some(FakeCard::new()));
        {
            let _session = provider.open().unwrap();
            assert_eq!(provider.opened.get(), 1);
            assert_eq!(provider.released.get(), 0);
        }
        assert_eq!(provider.released.get(), 1);
    }

    #[test]
    fn test_session_unavailable_without_card() {
        let provider = FakeSessionProvider::new(None);
        assert!(matches!(
            provider.open().unwrap_err(),
            TransportError::Unavailable { .. }
        ));
        assert_eq!(provider.opened.get(), 0);
    }
}
