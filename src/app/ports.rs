//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AccessController / PromptAgent (domain)
//! ```
//!
//! Driven adapters (store, actuators, timer, keypad, display, event sinks)
//! implement these traits.  The domain consumes them via generics, so the
//! protocol and lockout logic never touch hardware directly.  The byte
//! link port lives with the wire protocol in
//! [`protocol::link`](crate::protocol::link).

use crate::error::{InputError, StoreError, TimerError};

use super::events::AccessEvent;
use super::sequencer::SecondsCounter;

// ───────────────────────────────────────────────────────────────
// Credential store port (driven adapter: domain ↔ EEPROM)
// ───────────────────────────────────────────────────────────────

/// Byte-addressable durable storage.
///
/// Every written byte must be followed by the device's settle delay
/// before the next operation is safe; implementations apply it inside
/// `write_byte`/`write_block`.
pub trait CredentialStore {
    fn read_byte(&mut self, addr: u16) -> Result<u8, StoreError>;

    fn write_byte(&mut self, addr: u16, value: u8) -> Result<(), StoreError>;

    fn read_block(&mut self, addr: u16, buf: &mut [u8]) -> Result<(), StoreError> {
        for (offset, slot) in buf.iter_mut().enumerate() {
            *slot = self.read_byte(block_address(addr, offset)?)?;
        }
        Ok(())
    }

    fn write_block(&mut self, addr: u16, data: &[u8]) -> Result<(), StoreError> {
        for (offset, &b) in data.iter().enumerate() {
            self.write_byte(block_address(addr, offset)?, b)?;
        }
        Ok(())
    }

    /// Extra settle wait between two writes at different addresses.
    fn settle(&mut self) {}
}

/// Address of byte `offset` in a block starting at `addr`.
fn block_address(addr: u16, offset: usize) -> Result<u16, StoreError> {
    u16::try_from(offset)
        .ok()
        .and_then(|o| addr.checked_add(o))
        .ok_or(StoreError::OutOfRange)
}

impl<S: CredentialStore + ?Sized> CredentialStore for &mut S {
    fn read_byte(&mut self, addr: u16) -> Result<u8, StoreError> {
        (**self).read_byte(addr)
    }

    fn write_byte(&mut self, addr: u16, value: u8) -> Result<(), StoreError> {
        (**self).write_byte(addr, value)
    }

    fn read_block(&mut self, addr: u16, buf: &mut [u8]) -> Result<(), StoreError> {
        (**self).read_block(addr, buf)
    }

    fn write_block(&mut self, addr: u16, data: &[u8]) -> Result<(), StoreError> {
        (**self).write_block(addr, data)
    }

    fn settle(&mut self) {
        (**self).settle();
    }
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Door motor rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotorDirection {
    Stop,
    /// Clockwise: opening.
    Forward,
    /// Counter-clockwise: closing.
    Reverse,
}

/// Write-side port: the domain calls this to command actuators.
pub trait ActuatorPort {
    /// Drive the door motor.  `speed` is a duty percentage (0–100).
    fn set_door_motor(&mut self, direction: MotorDirection, speed: u8);

    /// Sound or silence the alarm.
    fn set_alarm(&mut self, on: bool);
}

// ───────────────────────────────────────────────────────────────
// Seconds timer port (driven adapter: hardware timer → domain)
// ───────────────────────────────────────────────────────────────

/// A single-slot, one-second periodic timer.
///
/// `start` installs the slot's only callback, which may do nothing but
/// [`SecondsCounter::tick`].  `stop` tears it down.  `idle` is called
/// from the polling loop between counter reads.
pub trait SecondsTimer {
    fn start(&mut self, counter: SecondsCounter) -> Result<(), TimerError>;

    fn stop(&mut self);

    fn idle(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Keypad + display ports (keypad node only)
// ───────────────────────────────────────────────────────────────

/// One key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Digit(u8),
    Plus,
    Minus,
    /// Any other key on the pad (`*`, `#`, `=`, `ON` …).
    Other(char),
}

/// Blocking key source.
pub trait KeypadPort {
    fn read_key(&mut self) -> Result<Key, InputError>;
}

/// Two-line character display.
pub trait DisplayPort {
    fn clear(&mut self);

    /// Write `text` starting at (`row`, `col`); the cursor ends after it.
    fn show_at(&mut self, row: u8, col: u8, text: &str);

    fn move_cursor(&mut self, row: u8, col: u8);

    /// Write one character at the cursor.
    fn put_char(&mut self, c: char);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AccessEvent`]s through this port.
/// Adapters decide where they go (serial log, a test recorder, …).
pub trait EventSink {
    fn emit(&mut self, event: &AccessEvent);
}
