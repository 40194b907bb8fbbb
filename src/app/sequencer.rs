//! Timer-gated actuation scripts: the door-open sequence and the alarm.
//!
//! ```text
//!   door:  Opening ─15 s─▶ Holding ─3 s─▶ Closing ─15 s─▶ Closed
//!   alarm: on ─60 s─▶ off
//! ```
//!
//! Each phase arms the single-slot [`SecondsTimer`], whose callback does
//! nothing but [`SecondsCounter::tick`].  The sequencer polls the counter
//! until the phase target is reached, then resets it and tears the timer
//! down before the next phase re-arms it.
//!
//! Both nodes run one: the control node's drives the motor and buzzer,
//! the keypad node's only mirrors the phases on its display.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use log::debug;

use crate::config::LockConfig;
use crate::error::TimerError;

use super::ports::SecondsTimer;

// ───────────────────────────────────────────────────────────────
// Shared seconds counter
// ───────────────────────────────────────────────────────────────

/// The only state the timer callback may touch.
#[derive(Debug, Clone, Default)]
pub struct SecondsCounter(Arc<AtomicU32>);

impl SecondsCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Timer-callback entry point.
    pub fn tick(&self) {
        self.0.fetch_add(1, Ordering::Release);
    }

    pub fn get(&self) -> u32 {
        self.0.load(Ordering::Acquire)
    }

    pub fn reset(&self) {
        self.0.store(0, Ordering::Release);
    }
}

// ───────────────────────────────────────────────────────────────
// Sequence outputs
// ───────────────────────────────────────────────────────────────

/// Door sequence phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorPhase {
    Opening,
    Holding,
    Closing,
    Closed,
}

/// Where a sequence's phase changes go: motor and buzzer on the control
/// node, the display on the keypad node.
pub trait SequenceOutput {
    fn door_phase(&mut self, phase: DoorPhase);

    fn alarm(&mut self, on: bool);
}

/// Phase durations in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceTiming {
    pub open_secs: u8,
    pub hold_secs: u8,
    pub close_secs: u8,
    pub alarm_secs: u8,
    pub notice_secs: u8,
}

impl From<&LockConfig> for SequenceTiming {
    fn from(c: &LockConfig) -> Self {
        Self {
            open_secs: c.door_open_secs,
            hold_secs: c.door_hold_secs,
            close_secs: c.door_close_secs,
            alarm_secs: c.alarm_secs,
            notice_secs: c.notice_secs,
        }
    }
}

// ───────────────────────────────────────────────────────────────
// ActuationSequencer
// ───────────────────────────────────────────────────────────────

pub struct ActuationSequencer<T> {
    timer: T,
    counter: SecondsCounter,
    timing: SequenceTiming,
}

impl<T: SecondsTimer> ActuationSequencer<T> {
    pub fn new(timer: T, timing: SequenceTiming) -> Self {
        Self {
            timer,
            counter: SecondsCounter::new(),
            timing,
        }
    }

    /// Block for `secs` timer ticks.
    pub fn count_seconds(&mut self, secs: u8) -> Result<(), TimerError> {
        if secs == 0 {
            return Ok(());
        }
        self.counter.reset();
        self.timer.start(self.counter.clone())?;
        // Reached-or-passed: a tick landing between two polls still ends the phase.
        while self.counter.get() < u32::from(secs) {
            self.timer.idle();
        }
        self.counter.reset();
        self.timer.stop();
        Ok(())
    }

    /// Open, hold, close.  On a timer failure the motor is stopped where it is.
    pub fn door_open_sequence(
        &mut self,
        out: &mut impl SequenceOutput,
    ) -> Result<(), TimerError> {
        let result = self.run_door_phases(out);
        out.door_phase(DoorPhase::Closed);
        result
    }

    fn run_door_phases(&mut self, out: &mut impl SequenceOutput) -> Result<(), TimerError> {
        let t = self.timing;
        for (phase, secs) in [
            (DoorPhase::Opening, t.open_secs),
            (DoorPhase::Holding, t.hold_secs),
            (DoorPhase::Closing, t.close_secs),
        ] {
            debug!("sequencer: {:?} for {}s", phase, secs);
            out.door_phase(phase);
            self.count_seconds(secs)?;
        }
        Ok(())
    }

    /// Sound the alarm for the configured duration.
    pub fn alarm_sequence(&mut self, out: &mut impl SequenceOutput) -> Result<(), TimerError> {
        out.alarm(true);
        let result = self.count_seconds(self.timing.alarm_secs);
        out.alarm(false);
        result
    }

    /// Hold a keypad-node notice on screen.
    pub fn hold_notice(&mut self) -> Result<(), TimerError> {
        self.count_seconds(self.timing.notice_secs)
    }

    pub fn timing(&self) -> SequenceTiming {
        self.timing
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }
}
