//! Unified error types for the door-lock firmware.
//!
//! A single `Error` enum that every subsystem converts into, so the
//! control loops on both nodes handle failures uniformly.  All variants
//! are `Copy` so they pass through the protocol handlers without
//! allocation.

use core::fmt;

use crate::protocol::Message;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The inter-node byte link failed or was closed.
    Link(LinkError),
    /// The seconds timer could not be armed.
    Timer(TimerError),
    /// The keypad input source is gone.
    Input(InputError),
    /// The peer sent something outside the protocol vocabulary.
    Protocol(ProtocolError),
    /// Peripheral initialisation failed.
    Init(&'static str),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Link(e) => write!(f, "link: {e}"),
            Self::Timer(e) => write!(f, "timer: {e}"),
            Self::Input(e) => write!(f, "input: {e}"),
            Self::Protocol(e) => write!(f, "protocol: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Link errors
// ---------------------------------------------------------------------------

/// The link has no timeout, so the only failures are a vanished peer
/// or a driver-level error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    /// The other end of the link was dropped.
    Closed,
    /// The UART driver returned an ESP-IDF error code.
    Driver(i32),
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => write!(f, "peer closed"),
            Self::Driver(rc) => write!(f, "UART driver error (rc={rc})"),
        }
    }
}

impl From<LinkError> for Error {
    fn from(e: LinkError) -> Self {
        Self::Link(e)
    }
}

// ---------------------------------------------------------------------------
// Store errors
// ---------------------------------------------------------------------------

/// Store faults never leave the controller: it fails closed and reports
/// them as [`AccessEvent::StoreFault`](crate::app::events::AccessEvent).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    /// The EEPROM did not acknowledge its address or a data byte.
    NoAck,
    /// Any other bus-level failure.
    Bus,
    /// The address range falls outside the device.
    OutOfRange,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoAck => write!(f, "EEPROM not acknowledging"),
            Self::Bus => write!(f, "I2C bus error"),
            Self::OutOfRange => write!(f, "address out of range"),
        }
    }
}

// ---------------------------------------------------------------------------
// Timer errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerError {
    /// A callback is already installed in the single timer slot.
    SlotBusy,
    /// `esp_timer_create` failed.
    CreateFailed(i32),
    /// `esp_timer_start_periodic` failed.
    StartFailed(i32),
}

impl fmt::Display for TimerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SlotBusy => write!(f, "timer slot already in use"),
            Self::CreateFailed(rc) => write!(f, "timer create failed (rc={rc})"),
            Self::StartFailed(rc) => write!(f, "timer start failed (rc={rc})"),
        }
    }
}

impl From<TimerError> for Error {
    fn from(e: TimerError) -> Self {
        Self::Timer(e)
    }
}

// ---------------------------------------------------------------------------
// Input errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputError {
    /// The key source reached end of input.
    Closed,
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => write!(f, "keypad input closed"),
        }
    }
}

impl From<InputError> for Error {
    fn from(e: InputError) -> Self {
        Self::Input(e)
    }
}

// ---------------------------------------------------------------------------
// Protocol errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolError {
    /// A byte that is not part of the message vocabulary.
    UnknownMessage(u8),
    /// A valid message arriving where the other direction's vocabulary
    /// was expected (e.g. a command where an outcome belongs).
    Unexpected(Message),
    /// A digit block byte outside `0..=9`.
    InvalidDigit(u8),
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownMessage(b) => write!(f, "unknown message byte 0x{b:02X}"),
            Self::Unexpected(m) => write!(f, "unexpected message {m:?}"),
            Self::InvalidDigit(b) => write!(f, "invalid password digit {b}"),
        }
    }
}

impl From<ProtocolError> for Error {
    fn from(e: ProtocolError) -> Self {
        Self::Protocol(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
