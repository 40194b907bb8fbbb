//! Control service — the control node's main loop.
//!
//! [`ControlService`] owns the [`AccessController`] and the authoritative
//! [`ActuationSequencer`].  After every reply it settles the outcome:
//! `OpenMatch` runs the door, and any mismatch on the round that reached
//! the attempt limit resets the counter and sounds the alarm.
//!
//! ```text
//!   ByteLink ──▶ ┌─────────────────────────────┐ ──▶ EventSink
//!                │        ControlService        │
//! CredentialStore│ AccessController · Sequencer │ ──▶ ActuatorPort
//!                └─────────────────────────────┘
//! ```

use log::{error, info, warn};

use crate::config::LockConfig;
use crate::error::{Error, Result};
use crate::protocol::{ByteLink, Message};

use super::controller::AccessController;
use super::events::AccessEvent;
use super::ports::{ActuatorPort, CredentialStore, EventSink, MotorDirection, SecondsTimer};
use super::sequencer::{ActuationSequencer, DoorPhase, SequenceOutput, SequenceTiming};

// ───────────────────────────────────────────────────────────────
// ControlService
// ───────────────────────────────────────────────────────────────

pub struct ControlService<L, S, T> {
    controller: AccessController<L, S>,
    sequencer: ActuationSequencer<T>,
    door_speed: u8,
    rounds: u32,
}

impl<L: ByteLink, S: CredentialStore, T: SecondsTimer> ControlService<L, S, T> {
    /// Construct the service.  Does **not** talk to the peer; call
    /// [`start`](Self::start) next.
    pub fn new(link: L, store: S, timer: T, config: &LockConfig) -> Self {
        Self {
            controller: AccessController::new(link, store, config),
            sequencer: ActuationSequencer::new(timer, SequenceTiming::from(config)),
            door_speed: config.door_speed_percent,
            rounds: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Announce the credential state to the keypad node.
    pub fn start(&mut self, sink: &mut impl EventSink) -> Result<Message> {
        Ok(self.controller.boot(sink)?)
    }

    /// One full round: command → reply → physical actuation.
    pub fn step(
        &mut self,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) -> Result<Option<Message>> {
        let outcome = self.controller.serve_round(sink)?;
        if let Some(outcome) = outcome {
            self.rounds += 1;
            self.settle_outcome(outcome, hw, sink)?;
        }
        Ok(outcome)
    }

    /// Physical consequences of an outcome that was already sent.
    pub fn settle_outcome(
        &mut self,
        outcome: Message,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        let mut out = ControlOutput {
            hw,
            sink,
            speed: self.door_speed,
        };

        if outcome == Message::OpenMatch {
            info!("service: access granted, running door sequence");
            self.sequencer.door_open_sequence(&mut out)?;
        } else if outcome.is_mismatch() && self.controller.attempts().at_limit() {
            warn!(
                "service: {} consecutive failures, raising alarm",
                self.controller.attempts().count()
            );
            self.controller.reset_attempts();
            out.sink.emit(&AccessEvent::AlarmRaised);
            self.sequencer.alarm_sequence(&mut out)?;
            out.sink.emit(&AccessEvent::AlarmCleared);
        }
        Ok(())
    }

    /// Serve rounds until the link fails.  Returns that error.
    ///
    /// Does not announce; the caller runs [`start`](Self::start) exactly
    /// once before this.  Timer failures are logged and the loop
    /// continues; the sequencer has already stopped the actuators.
    pub fn run(&mut self, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) -> Error {
        loop {
            match self.step(hw, sink) {
                Ok(_) => {}
                Err(e @ Error::Link(_)) => {
                    error!("service: link lost after {} rounds: {}", self.rounds, e);
                    return e;
                }
                Err(e) => error!("service: round failed: {}", e),
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn controller(&self) -> &AccessController<L, S> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut AccessController<L, S> {
        &mut self.controller
    }

    pub fn sequencer(&self) -> &ActuationSequencer<T> {
        &self.sequencer
    }

    /// Rounds that produced an outcome since startup.
    pub fn rounds(&self) -> u32 {
        self.rounds
    }
}

// ───────────────────────────────────────────────────────────────
// Sequence output: motor + buzzer + events
// ───────────────────────────────────────────────────────────────

struct ControlOutput<'a, A, E> {
    hw: &'a mut A,
    sink: &'a mut E,
    speed: u8,
}

impl<A: ActuatorPort, E: EventSink> SequenceOutput for ControlOutput<'_, A, E> {
    fn door_phase(&mut self, phase: DoorPhase) {
        match phase {
            DoorPhase::Opening => self.hw.set_door_motor(MotorDirection::Forward, self.speed),
            DoorPhase::Closing => self.hw.set_door_motor(MotorDirection::Reverse, self.speed),
            DoorPhase::Holding | DoorPhase::Closed => {
                self.hw.set_door_motor(MotorDirection::Stop, 0);
            }
        }
        self.sink.emit(&AccessEvent::DoorPhase(phase));
    }

    fn alarm(&mut self, on: bool) {
        self.hw.set_alarm(on);
    }
}
