//! Credential prompt agent — the keypad node's side of the protocol.
//!
//! The agent is driven by the *previous* reply from the control node:
//!
//! | Reply              | Next action                                          |
//! |--------------------|------------------------------------------------------|
//! | `NoCredential`     | enrollment                                           |
//! | `CredentialExists` | menu                                                 |
//! | `EnrollMatch`      | notice, reset mirror, menu                           |
//! | `EnrollMismatch`   | notice (skipped at the limit), enrollment again      |
//! | `OpenMatch`        | reset mirror, mirrored door sequence, menu           |
//! | `ChangeMatch`      | notice, reset mirror, replacement enrollment         |
//! | `*Mismatch`        | notice (skipped at the limit), same verify again     |
//!
//! It keeps a mirror of the control node's attempt counter, counted at the
//! start of every enrollment or verify round.  Its own sequencer only
//! mirrors door and alarm phases on the display.

use log::{debug, error, info, warn};

use crate::config::LockConfig;
use crate::error::{Error, ProtocolError, Result};
use crate::protocol::{
    ByteLink, Message, PASSWORD_LEN, Password, VerifyMode, receive_message, send_digits,
    send_message,
};

use super::attempts::AttemptCounter;
use super::ports::{DisplayPort, Key, KeypadPort, SecondsTimer};
use super::sequencer::{ActuationSequencer, DoorPhase, SequenceOutput, SequenceTiming};

// ── Screens ───────────────────────────────────────────────────

const MENU: [&str; 2] = ["+ : Open Door", "- : Change Pass"];
const PROMPT_FIRST: [&str; 2] = ["PLZ ENTER PASS:", ""];
const PROMPT_CONFIRM: [&str; 2] = ["PLZ RE-ENTER THE", "SAME PASS:"];
const NOTICE_SAVED: [&str; 2] = ["PASSWORD SAVED", "SUCCESSFULLY"];
const NOTICE_UNMATCH: [&str; 2] = ["PASSWORD UNMATCH", "TRY AGAIN"];
const NOTICE_CORRECT: [&str; 2] = ["PASSWORD IS", "CORRECT WELCOME"];
const NOTICE_WRONG: [&str; 2] = ["WRONG PASSWORD", "TRY AGAIN"];

pub struct PromptAgent<L, K, D, T> {
    link: L,
    keypad: K,
    display: D,
    sequencer: ActuationSequencer<T>,
    mirror: AttemptCounter,
    /// The current enrollment replaces a verified credential.
    replacing: bool,
}

impl<L, K, D, T> PromptAgent<L, K, D, T>
where
    L: ByteLink,
    K: KeypadPort,
    D: DisplayPort,
    T: SecondsTimer,
{
    pub fn new(link: L, keypad: K, display: D, timer: T, config: &LockConfig) -> Self {
        Self {
            link,
            keypad,
            display,
            sequencer: ActuationSequencer::new(timer, SequenceTiming::from(config)),
            mirror: AttemptCounter::new(config.max_attempts),
            replacing: false,
        }
    }

    /// Serve replies until the link or the keypad goes away.  Returns that error.
    ///
    /// Any other failure (an unknown reply byte, a timer fault) is logged
    /// and the agent re-issues a request from the menu so the turn-taking
    /// stays intact.
    pub fn run(&mut self) -> Error {
        loop {
            let Err(e) = self.step() else { continue };
            if is_fatal(&e) {
                error!("agent: stopping: {}", e);
                return e;
            }
            warn!("agent: {}, back to menu", e);
            if let Err(e) = self.menu() {
                if is_fatal(&e) {
                    error!("agent: stopping: {}", e);
                    return e;
                }
                warn!("agent: menu request failed: {}", e);
            }
        }
    }

    /// Receive one reply and issue the request that follows it.
    pub fn step(&mut self) -> Result<Message> {
        let byte = receive_message(&mut self.link)?;
        let outcome = Message::from_byte(byte)?;
        if !outcome.is_outcome() {
            return Err(ProtocolError::Unexpected(outcome).into());
        }
        debug!("agent: reply {:?} (mirror {})", outcome, self.mirror.count());
        self.react(outcome)?;
        Ok(outcome)
    }

    /// Act on a reply.  Every path ends by sending exactly one command.
    pub fn react(&mut self, outcome: Message) -> Result<()> {
        match outcome {
            Message::NoCredential => self.enroll(false),
            Message::CredentialExists => self.menu(),
            Message::EnrollMatch => {
                self.notice(NOTICE_SAVED)?;
                self.mirror.reset();
                self.menu()
            }
            Message::EnrollMismatch => {
                if !self.mirror.at_limit() {
                    self.notice(NOTICE_UNMATCH)?;
                }
                self.enroll(self.replacing)
            }
            Message::OpenMatch => {
                self.mirror.reset();
                self.sequencer.door_open_sequence(&mut DisplayMirror {
                    display: &mut self.display,
                })?;
                self.menu()
            }
            Message::ChangeMatch => {
                self.notice(NOTICE_CORRECT)?;
                self.mirror.reset();
                self.enroll(true)
            }
            Message::OpenMismatch | Message::ChangeMismatch => {
                let mode = if outcome == Message::OpenMismatch {
                    VerifyMode::Open
                } else {
                    VerifyMode::Change
                };
                if !self.mirror.at_limit() {
                    self.notice(NOTICE_WRONG)?;
                }
                self.verify(mode)
            }
            command => Err(ProtocolError::Unexpected(command).into()),
        }
    }

    /// Offer open / change and start the chosen verification.
    pub fn menu(&mut self) -> Result<()> {
        self.render(MENU);
        loop {
            match self.keypad.read_key()? {
                Key::Plus => return self.verify(VerifyMode::Open),
                Key::Minus => return self.verify(VerifyMode::Change),
                _ => {}
            }
        }
    }

    /// One enrollment round.
    ///
    /// Past the limit the mirrored alarm runs and the round restarts as
    /// attempt 1.  On the round that lands on the limit the control node
    /// reads no digits, so only the command is sent.
    pub fn enroll(&mut self, replacement: bool) -> Result<()> {
        self.replacing = replacement;
        let command = if replacement {
            Message::EnrollSendRequest
        } else {
            Message::Enroll
        };

        self.mirror.record();
        if self.mirror.exceeded() {
            self.mirrored_alarm()?;
            self.mirror.reset();
            self.mirror.record();
        }
        if self.mirror.at_limit() {
            info!("agent: enrollment lockout round");
            send_message(&mut self.link, command)?;
            return Ok(());
        }

        let first = self.read_password(PROMPT_FIRST, (1, 5))?;
        let second = self.read_password(PROMPT_CONFIRM, (1, 10))?;
        send_message(&mut self.link, command)?;
        send_digits(&mut self.link, first.digits())?;
        send_digits(&mut self.link, second.digits())?;
        Ok(())
    }

    /// One verification round.  Past the limit the mirrored alarm runs and
    /// the agent returns to the menu instead.
    pub fn verify(&mut self, mode: VerifyMode) -> Result<()> {
        self.mirror.record();
        if self.mirror.exceeded() {
            self.mirrored_alarm()?;
            self.mirror.reset();
            return self.menu();
        }

        let password = self.read_password(PROMPT_FIRST, (1, 5))?;
        send_message(&mut self.link, mode.command())?;
        send_digits(&mut self.link, password.digits())?;
        Ok(())
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn mirror(&self) -> &AttemptCounter {
        &self.mirror
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn sequencer(&self) -> &ActuationSequencer<T> {
        &self.sequencer
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    // ── Internal ──────────────────────────────────────────────

    fn render(&mut self, lines: [&str; 2]) {
        self.display.clear();
        for (row, text) in lines.iter().enumerate() {
            if !text.is_empty() {
                self.display.show_at(row as u8, 0, text);
            }
        }
    }

    fn notice(&mut self, lines: [&str; 2]) -> Result<()> {
        self.render(lines);
        self.sequencer.hold_notice()?;
        Ok(())
    }

    fn mirrored_alarm(&mut self) -> Result<()> {
        warn!("agent: attempt limit passed, mirroring alarm");
        self.sequencer.alarm_sequence(&mut DisplayMirror {
            display: &mut self.display,
        })?;
        Ok(())
    }

    /// Masked 5-digit entry.  Non-digit keys are ignored.
    fn read_password(&mut self, prompt: [&str; 2], cursor: (u8, u8)) -> Result<Password> {
        self.render(prompt);
        self.display.move_cursor(cursor.0, cursor.1);
        let mut digits = [0u8; PASSWORD_LEN];
        for slot in &mut digits {
            *slot = loop {
                if let Key::Digit(d @ 0..=9) = self.keypad.read_key()? {
                    break d;
                }
            };
            self.display.put_char('*');
        }
        Ok(Password::new(digits)?)
    }
}

fn is_fatal(e: &Error) -> bool {
    matches!(e, Error::Link(_) | Error::Input(_))
}

// ───────────────────────────────────────────────────────────────
// Sequence output: display only
// ───────────────────────────────────────────────────────────────

struct DisplayMirror<'a, D> {
    display: &'a mut D,
}

impl<D: DisplayPort> SequenceOutput for DisplayMirror<'_, D> {
    fn door_phase(&mut self, phase: DoorPhase) {
        self.display.clear();
        let text = match phase {
            DoorPhase::Opening => "OPENING THE DOOR",
            DoorPhase::Holding => "HOLDING THE DOOR",
            DoorPhase::Closing => "CLOSING THE DOOR",
            DoorPhase::Closed => return,
        };
        self.display.show_at(0, 0, text);
    }

    fn alarm(&mut self, on: bool) {
        self.display.clear();
        if on {
            self.display.show_at(0, 0, "ERROR");
        }
    }
}
