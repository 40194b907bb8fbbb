//! Outbound application events.
//!
//! The [`ControlService`](super::service::ControlService) and the
//! [`AccessController`](super::controller::AccessController) emit these
//! through the [`EventSink`](super::ports::EventSink) port.  Adapters on
//! the other side decide what to do with them.

use crate::error::StoreError;
use crate::protocol::Message;

use super::sequencer::DoorPhase;

/// Structured events emitted by the control node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessEvent {
    /// Boot finished; the presence flag was read (or failed closed).
    Booted { credential_present: bool },

    /// A command was received and is about to be handled.
    CommandReceived(Message),

    /// An outcome was sent back to the keypad node.
    OutcomeSent { outcome: Message, attempts: u8 },

    /// A byte in the command position was not a command.
    UnknownCommand(u8),

    /// A credential-store operation failed; the round failed closed.
    StoreFault(StoreError),

    /// The door sequence entered a new phase.
    DoorPhase(DoorPhase),

    /// Lockout reached: counter reset, alarm sounding.
    AlarmRaised,

    /// The alarm sequence finished.
    AlarmCleared,
}
