//! M24C16 16-Kbit I²C EEPROM driver.
//!
//! The device answers on eight consecutive bus addresses, one per
//! 256-byte block, so the three high memory-address bits travel in the
//! device address:
//!
//! ```text
//!   device = 1 0 1 0 A10 A9 A8     word = A7..A0
//! ```
//!
//! Every written byte is followed by the write-cycle settle delay.
//! Generic over the `embedded-hal` 1.0 I²C and delay traits, so the same
//! driver runs on `esp-idf-hal`'s `I2cDriver` and on a host fake.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{ErrorKind, I2c};

use crate::config::STORE_CAPACITY;
use crate::error::StoreError;

const BLOCK_SIZE: u16 = 256;

pub struct M24c16<I2C, D> {
    i2c: I2C,
    delay: D,
    base_address: u8,
    settle_ms: u32,
}

impl<I2C: I2c, D: DelayNs> M24c16<I2C, D> {
    /// `base_address` is the 7-bit address with A10..A8 clear (0x50).
    pub fn new(i2c: I2C, delay: D, base_address: u8, settle_ms: u32) -> Self {
        Self {
            i2c,
            delay,
            base_address,
            settle_ms,
        }
    }

    pub fn read_byte(&mut self, addr: u16) -> Result<u8, StoreError> {
        let mut buf = [0u8; 1];
        self.read_block(addr, &mut buf)?;
        Ok(buf[0])
    }

    pub fn write_byte(&mut self, addr: u16, value: u8) -> Result<(), StoreError> {
        check_range(addr, 1)?;
        self.i2c
            .write(self.device_address(addr), &[addr as u8, value])
            .map_err(map_bus_error)?;
        self.settle();
        Ok(())
    }

    /// Sequential read, split at 256-byte block boundaries.
    pub fn read_block(&mut self, addr: u16, buf: &mut [u8]) -> Result<(), StoreError> {
        check_range(addr, buf.len())?;
        let mut addr = addr;
        let mut rest = buf;
        while !rest.is_empty() {
            let room = (BLOCK_SIZE - addr % BLOCK_SIZE) as usize;
            let n = room.min(rest.len());
            let (chunk, tail) = core::mem::take(&mut rest).split_at_mut(n);
            self.i2c
                .write_read(self.device_address(addr), &[addr as u8], chunk)
                .map_err(map_bus_error)?;
            addr += chunk.len() as u16;
            rest = tail;
        }
        Ok(())
    }

    /// Byte-by-byte write, each followed by the settle delay.
    pub fn write_block(&mut self, addr: u16, data: &[u8]) -> Result<(), StoreError> {
        check_range(addr, data.len())?;
        for (offset, &b) in data.iter().enumerate() {
            self.write_byte(addr + offset as u16, b)?;
        }
        Ok(())
    }

    pub fn settle(&mut self) {
        self.delay.delay_ms(self.settle_ms);
    }

    fn device_address(&self, addr: u16) -> u8 {
        self.base_address | ((addr & 0x0700) >> 8) as u8
    }

    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }
}

fn check_range(addr: u16, len: usize) -> Result<(), StoreError> {
    if addr as usize + len > STORE_CAPACITY as usize {
        return Err(StoreError::OutOfRange);
    }
    Ok(())
}

fn map_bus_error<E: embedded_hal::i2c::Error>(e: E) -> StoreError {
    match e.kind() {
        ErrorKind::NoAcknowledge(_) => StoreError::NoAck,
        _ => StoreError::Bus,
    }
}
