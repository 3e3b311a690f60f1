// Example dumping and writing a card through the library API
//
// Run with: cargo run --example dump
//
// Note: the card here is simulated in memory; a real reader would provide
// its own SessionProvider

use std::cell::RefCell;
use std::rc::Rc;

use mfclassic::error::{DeviceError, TransportError};
use mfclassic::model::{BlockAddress, Key, KeyRole, KeyValue, BLOCK_SIZE};
use mfclassic::ports::{BlockReader, BlockWriter, SessionProvider};
use mfclassic::{run, write_verified, Command, Report};

/// Card whose sector 2 is locked behind a private key A
#[derive(Clone)]
struct SimulatedCard {
    blocks: Rc<RefCell<Vec<[u8; BLOCK_SIZE]>>>,
    private_key: KeyValue,
}

impl SimulatedCard {
    fn accepts(&self, address: BlockAddress, key: &Key) -> Result<(), DeviceError> {
        let expected = if address.sector() == 2 {
            self.private_key
        } else {
            KeyValue::new([0xFF; 6])
        };
        if key.role == KeyRole::A && key.value == expected {
            Ok(())
        } else {
            Err(DeviceError::Authentication {
                address,
                role: key.role,
            })
        }
    }
}

impl BlockReader for SimulatedCard {
    fn authenticated_read(
        &mut self,
        address: BlockAddress,
        key: &Key,
    ) -> Result<[u8; BLOCK_SIZE], DeviceError> {
        self.accepts(address, key)?;
        Ok(self.blocks.borrow()[address.absolute() as usize])
    }
}

impl BlockWriter for SimulatedCard {
    fn authenticated_write(
        &mut self,
        address: BlockAddress,
        key: &Key,
        bytes: &[u8; BLOCK_SIZE],
    ) -> Result<(), DeviceError> {
        self.accepts(address, key)?;
        self.blocks.borrow_mut()[address.absolute() as usize] = *bytes;
        Ok(())
    }
}

struct SimulatedReader {
    card: SimulatedCard,
}

impl SessionProvider for SimulatedReader {
    type Session = SimulatedCard;

    fn open(&self) -> Result<Self::Session, TransportError> {
        Ok(self.card.clone())
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let reader = SimulatedReader {
        card: SimulatedCard {
            blocks: Rc::new(RefCell::new(vec![[0u8; BLOCK_SIZE]; 64])),
            private_key: KeyValue::from_hex("4D3A99C351DD")?,
        },
    };

    println!("Mifare Classic 1K Dump Example");
    println!("==============================\n");

    let target = BlockAddress::new(2, 1)?;
    let content = write_verified(
        &reader,
        target,
        "4D3A99C351DD",
        "00112233445566778899AABBCCDDEEFF",
    )?;
    println!("✓ Wrote {}: {}\n", target, content);

    if let Report::Dump(dump) = run(&reader, Command::Dump { keys: vec![] })? {
        println!("Built-in keys only: {} unreadable blocks", dump.unreadable());
    }

    let command = Command::Dump {
        keys: vec!["4D3A99C351DD".to_string()],
    };
    if let Report::Dump(dump) = run(&reader, command)? {
        println!("With the private key: {} unreadable blocks\n", dump.unreadable());
        println!("{}", dump);
    }

    Ok(())
}
