//! Access controller — the control node's protocol authority.
//!
//! Owns the credential record and the attempt counter, interprets each
//! command from the keypad node, and produces exactly one outcome per
//! command.  Physical actuation after the reply belongs to the
//! [`ControlService`](super::service::ControlService).
//!
//! ```text
//!   boot ──▶ CredentialExists | NoCredential
//!   loop:
//!     Enroll / EnrollSendRequest ──▶ EnrollMatch | EnrollMismatch
//!     VerifyForOpen              ──▶ OpenMatch   | OpenMismatch
//!     VerifyForChange            ──▶ ChangeMatch | ChangeMismatch
//! ```
//!
//! Store failures fail closed: a failed read never matches and a failed
//! write never reports `EnrollMatch`.  Each one is reported through the
//! event sink as [`AccessEvent::StoreFault`].

use log::{debug, info, warn};

use crate::config::LockConfig;
use crate::error::{LinkError, ProtocolError, Result, StoreError};
use crate::protocol::{
    ByteLink, Message, Password, VerifyMode, receive_digits, receive_message, send_message,
};

use super::attempts::AttemptCounter;
use super::credential::CredentialRecord;
use super::events::AccessEvent;
use super::ports::{CredentialStore, EventSink};

pub struct AccessController<L, S> {
    link: L,
    record: CredentialRecord<S>,
    attempts: AttemptCounter,
}

impl<L: ByteLink, S: CredentialStore> AccessController<L, S> {
    pub fn new(link: L, store: S, config: &LockConfig) -> Self {
        Self {
            link,
            record: CredentialRecord::new(store, config),
            attempts: AttemptCounter::new(config.max_attempts),
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Read the presence flag once and announce it to the keypad node.
    ///
    /// This is the only unsolicited message of the protocol.
    pub fn boot(&mut self, sink: &mut impl EventSink) -> core::result::Result<Message, LinkError> {
        let present = match self.record.is_present() {
            Ok(present) => present,
            Err(e) => {
                self.store_fault(e, sink);
                false
            }
        };
        sink.emit(&AccessEvent::Booted {
            credential_present: present,
        });
        info!("controller: boot, credential present = {}", present);

        let announce = if present {
            Message::CredentialExists
        } else {
            Message::NoCredential
        };
        send_message(&mut self.link, announce)?;
        Ok(announce)
    }

    /// Serve one round: receive a command, handle it, send the outcome.
    ///
    /// A byte that is not a command is logged and skipped: no attempt is
    /// counted, no reply is sent, and `Ok(None)` is returned.
    pub fn serve_round(&mut self, sink: &mut impl EventSink) -> Result<Option<Message>> {
        let byte = receive_message(&mut self.link)?;
        let command = match Message::from_byte(byte) {
            Ok(m) if m.is_command() => m,
            _ => {
                warn!("controller: ignoring non-command byte 0x{:02X}", byte);
                sink.emit(&AccessEvent::UnknownCommand(byte));
                return Ok(None);
            }
        };
        sink.emit(&AccessEvent::CommandReceived(command));

        let outcome = self.handle(command, sink)?;
        send_message(&mut self.link, outcome)?;
        sink.emit(&AccessEvent::OutcomeSent {
            outcome,
            attempts: self.attempts.count(),
        });
        Ok(Some(outcome))
    }

    /// Run the procedure for `command` and return its outcome.
    pub fn handle(&mut self, command: Message, sink: &mut impl EventSink) -> Result<Message> {
        let outcome = match command {
            Message::Enroll | Message::EnrollSendRequest => self.enroll(sink)?,
            Message::VerifyForOpen => self.verify(VerifyMode::Open, sink)?,
            Message::VerifyForChange => self.verify(VerifyMode::Change, sink)?,
            other => return Err(ProtocolError::Unexpected(other).into()),
        };
        debug!(
            "controller: {:?} -> {:?} (attempt {}/{})",
            command,
            outcome,
            self.attempts.count(),
            self.attempts.limit()
        );
        Ok(outcome)
    }

    // ── Procedures ────────────────────────────────────────────

    /// Receive two blocks; store them if they agree.
    ///
    /// On the round that reaches the limit no digits are read at all and
    /// `EnrollMismatch` is returned; the keypad node sends no blocks then.
    pub fn enroll(&mut self, sink: &mut impl EventSink) -> core::result::Result<Message, LinkError> {
        self.attempts.record();
        if self.attempts.at_limit() {
            info!("controller: enrollment lockout round");
            return Ok(Message::EnrollMismatch);
        }

        let first = receive_digits(&mut self.link)?;
        let second = receive_digits(&mut self.link)?;

        let candidate = match (Password::from_wire(&first), Password::from_wire(&second)) {
            (Ok(a), Ok(b)) if a == b => Some(a),
            _ => None,
        };
        let Some(password) = candidate else {
            if let Err(e) = self.record.demote() {
                self.store_fault(e, sink);
            }
            return Ok(Message::EnrollMismatch);
        };

        match self.record.commit(&password) {
            Ok(()) => {
                self.attempts.reset();
                info!("controller: new credential {} stored", password);
                Ok(Message::EnrollMatch)
            }
            Err(e) => {
                self.store_fault(e, sink);
                if let Err(e) = self.record.demote() {
                    warn!("controller: demote after failed commit also failed: {}", e);
                }
                Ok(Message::EnrollMismatch)
            }
        }
    }

    /// Receive one block and compare it with the stored credential.
    pub fn verify(
        &mut self,
        mode: VerifyMode,
        sink: &mut impl EventSink,
    ) -> core::result::Result<Message, LinkError> {
        self.attempts.record();
        let block = receive_digits(&mut self.link)?;

        let matched = match self.record.load() {
            Ok(stored) => Password::from_wire(&block).is_ok_and(|given| given.digits() == &stored),
            Err(e) => {
                self.store_fault(e, sink);
                false
            }
        };

        if matched {
            self.attempts.reset();
            Ok(mode.matched())
        } else {
            Ok(mode.mismatched())
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn attempts(&self) -> &AttemptCounter {
        &self.attempts
    }

    /// Clear the counter after a lockout has been resolved.
    pub fn reset_attempts(&mut self) {
        self.attempts.reset();
    }

    pub fn credential(&mut self) -> &mut CredentialRecord<S> {
        &mut self.record
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    // ── Internal ──────────────────────────────────────────────

    fn store_fault(&self, e: StoreError, sink: &mut impl EventSink) {
        warn!("controller: credential store fault: {}", e);
        sink.emit(&AccessEvent::StoreFault(e));
    }
}
