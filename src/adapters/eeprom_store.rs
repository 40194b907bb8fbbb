//! Credential store adapters.
//!
//! Implements [`CredentialStore`] twice:
//!
//! - [`EepromStore`]: the M24C16 on the control node's I²C bus.
//! - [`MemoryEeprom`]: a 2 KiB in-memory image for host tests, with
//!   fault injection for the fail-closed paths.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::app::ports::CredentialStore;
use crate::config::STORE_CAPACITY;
use crate::drivers::eeprom::M24c16;
use crate::error::StoreError;

// ── EEPROM-backed store ───────────────────────────────────────

pub struct EepromStore<I2C, D> {
    eeprom: M24c16<I2C, D>,
}

impl<I2C: I2c, D: DelayNs> EepromStore<I2C, D> {
    pub fn new(eeprom: M24c16<I2C, D>) -> Self {
        Self { eeprom }
    }
}

impl<I2C: I2c, D: DelayNs> CredentialStore for EepromStore<I2C, D> {
    fn read_byte(&mut self, addr: u16) -> Result<u8, StoreError> {
        self.eeprom.read_byte(addr)
    }

    fn write_byte(&mut self, addr: u16, value: u8) -> Result<(), StoreError> {
        self.eeprom.write_byte(addr, value)
    }

    fn read_block(&mut self, addr: u16, buf: &mut [u8]) -> Result<(), StoreError> {
        self.eeprom.read_block(addr, buf)
    }

    fn write_block(&mut self, addr: u16, data: &[u8]) -> Result<(), StoreError> {
        self.eeprom.write_block(addr, data)
    }

    fn settle(&mut self) {
        self.eeprom.settle();
    }
}

// ── In-memory store ───────────────────────────────────────────

/// Erased (all `0xFF`) on creation, like a fresh part.
pub struct MemoryEeprom {
    mem: Vec<u8>,
    writes: usize,
    settles: usize,
    writes_left: Option<usize>,
    fail_reads: bool,
}

impl MemoryEeprom {
    pub fn new() -> Self {
        Self {
            mem: vec![0xFF; STORE_CAPACITY as usize],
            writes: 0,
            settles: 0,
            writes_left: None,
            fail_reads: false,
        }
    }

    /// Allow `n` more byte writes, then fail every write with `NoAck`.
    pub fn fail_writes_after(&mut self, n: usize) {
        self.writes_left = Some(n);
    }

    pub fn fail_reads(&mut self, fail: bool) {
        self.fail_reads = fail;
    }

    /// Clear injected faults.
    pub fn heal(&mut self) {
        self.writes_left = None;
        self.fail_reads = false;
    }

    pub fn image(&self) -> &[u8] {
        &self.mem
    }

    /// Byte writes that reached the image.
    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn settles(&self) -> usize {
        self.settles
    }
}

impl Default for MemoryEeprom {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore for MemoryEeprom {
    fn read_byte(&mut self, addr: u16) -> Result<u8, StoreError> {
        if self.fail_reads {
            return Err(StoreError::NoAck);
        }
        self.mem
            .get(addr as usize)
            .copied()
            .ok_or(StoreError::OutOfRange)
    }

    fn write_byte(&mut self, addr: u16, value: u8) -> Result<(), StoreError> {
        if let Some(left) = self.writes_left.as_mut() {
            if *left == 0 {
                return Err(StoreError::NoAck);
            }
            *left -= 1;
        }
        let slot = self
            .mem
            .get_mut(addr as usize)
            .ok_or(StoreError::OutOfRange)?;
        *slot = value;
        self.writes += 1;
        Ok(())
    }

    fn settle(&mut self) {
        self.settles += 1;
    }
}
