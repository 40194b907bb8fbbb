//! Inter-node wire protocol.
//!
//! Every exchange between the keypad node and the control node is a single
//! message byte or a 5-byte digit block, each gated by a ready handshake:
//!
//! ```text
//!   sender                         receiver
//!     │  ◀──────── READY (0xFF) ──────  │   receive_message / receive_digits
//!     │  ───────── message / digits ──▶ │   send_message / send_digits
//! ```
//!
//! There is no framing, checksum, or timeout.  Correctness depends on both
//! nodes taking turns exactly as the command flow prescribes.

pub mod link;
pub mod password;

pub use link::{ByteLink, receive_digits, receive_message, send_digits, send_message, wait_ready};
pub use password::Password;

use crate::error::ProtocolError;

/// Number of digits in a password block.
pub const PASSWORD_LEN: usize = 5;

/// Consecutive failed rounds that trigger the lockout alarm.
pub const MAX_ATTEMPTS: u8 = 4;

/// Handshake sentinel: "I am ready to receive".
pub const READY: u8 = 0xFF;

// ───────────────────────────────────────────────────────────────
// Message vocabulary
// ───────────────────────────────────────────────────────────────

/// Every byte that may appear in the message position of the link.
///
/// Outcomes flow from the control node to the keypad node, commands flow
/// the other way.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Message {
    // ── Outcomes (control → keypad) ──────────────────────────
    NoCredential = 0x10,
    CredentialExists = 0x11,
    EnrollMatch = 0x12,
    EnrollMismatch = 0x13,
    OpenMatch = 0x14,
    ChangeMatch = 0x15,
    OpenMismatch = 0x24,
    ChangeMismatch = 0x25,

    // ── Commands (keypad → control) ──────────────────────────
    Enroll = 0x19,
    VerifyForOpen = 0x21,
    VerifyForChange = 0x22,
    /// Enrollment of a replacement password right after `ChangeMatch`.
    EnrollSendRequest = 0x23,
}

impl Message {
    /// Decode a wire byte.
    pub fn from_byte(byte: u8) -> Result<Self, ProtocolError> {
        Ok(match byte {
            0x10 => Self::NoCredential,
            0x11 => Self::CredentialExists,
            0x12 => Self::EnrollMatch,
            0x13 => Self::EnrollMismatch,
            0x14 => Self::OpenMatch,
            0x15 => Self::ChangeMatch,
            0x24 => Self::OpenMismatch,
            0x25 => Self::ChangeMismatch,
            0x19 => Self::Enroll,
            0x21 => Self::VerifyForOpen,
            0x22 => Self::VerifyForChange,
            0x23 => Self::EnrollSendRequest,
            other => return Err(ProtocolError::UnknownMessage(other)),
        })
    }

    pub const fn as_byte(self) -> u8 {
        self as u8
    }

    /// `true` for the bytes the keypad node sends.
    pub const fn is_command(self) -> bool {
        matches!(
            self,
            Self::Enroll | Self::VerifyForOpen | Self::VerifyForChange | Self::EnrollSendRequest
        )
    }

    /// `true` for the bytes the control node replies with.
    pub const fn is_outcome(self) -> bool {
        !self.is_command()
    }

    /// `true` for the three mismatch outcomes that feed the lockout policy.
    pub const fn is_mismatch(self) -> bool {
        matches!(
            self,
            Self::EnrollMismatch | Self::OpenMismatch | Self::ChangeMismatch
        )
    }
}

// ───────────────────────────────────────────────────────────────
// Verification mode
// ───────────────────────────────────────────────────────────────

/// What a successful verification unlocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyMode {
    /// Open the door.
    Open,
    /// Proceed to password replacement.
    Change,
}

impl VerifyMode {
    pub const fn command(self) -> Message {
        match self {
            Self::Open => Message::VerifyForOpen,
            Self::Change => Message::VerifyForChange,
        }
    }

    pub const fn matched(self) -> Message {
        match self {
            Self::Open => Message::OpenMatch,
            Self::Change => Message::ChangeMatch,
        }
    }

    pub const fn mismatched(self) -> Message {
        match self {
            Self::Open => Message::OpenMismatch,
            Self::Change => Message::ChangeMismatch,
        }
    }
}
