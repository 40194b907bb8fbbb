//! End-to-end sessions: both nodes on their own threads, joined by a
//! [`SimLink`] pair, with virtual-time timers.
//!
//! The control thread boots the way the `door-control` binary does:
//! `start` once, then `run`.  The keypad script ends every session.  The
//! agent then stops with `Input(Closed)`, its link end drops, and the
//! control loop stops with `Link(Closed)`.  A node that never reports
//! within [`SESSION_LIMIT`] is stuck waiting on its peer.

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use doorlock::adapters::eeprom_store::MemoryEeprom;
use doorlock::adapters::sim_link::SimLink;
use doorlock::app::agent::PromptAgent;
use doorlock::app::events::AccessEvent;
use doorlock::app::ports::{CredentialStore, MotorDirection};
use doorlock::app::service::ControlService;
use doorlock::config::LockConfig;
use doorlock::drivers::hw_timer::SimSecondsTimer;
use doorlock::error::{Error, InputError, LinkError};
use doorlock::protocol::Message;

use crate::mock_hw::{ActuatorCall, MockActuators, RecordingDisplay, RecordingSink, ScriptedKeypad};

const FLAG: usize = 0x0309;
const BLOCK: usize = 0x0311;
const SESSION_LIMIT: Duration = Duration::from_secs(5);

struct ControlEnd {
    error: Error,
    image: Vec<u8>,
    spans: Vec<u32>,
    attempts: u8,
    rounds: u32,
    calls: Vec<ActuatorCall>,
    events: Vec<AccessEvent>,
}

struct KeypadEnd {
    error: Error,
    spans: Vec<u32>,
    mirror: u8,
    shown: Vec<String>,
}

fn seeded(password: [u8; 5]) -> MemoryEeprom {
    let mut m = MemoryEeprom::new();
    m.write_block(BLOCK as u16, &password).unwrap();
    m.write_byte(FLAG as u16, 0x11).unwrap();
    m
}

fn session(store: MemoryEeprom, keys: &'static str) -> (ControlEnd, KeypadEnd) {
    let (control_link, keypad_link) = SimLink::pair();
    let config = LockConfig::default();

    let (control_tx, control_rx) = mpsc::channel();
    let (keypad_tx, keypad_rx) = mpsc::channel();

    {
        let config = config.clone();
        thread::spawn(move || {
            let mut service =
                ControlService::new(control_link, store, SimSecondsTimer::new(), &config);
            let mut hw = MockActuators::new();
            let mut sink = RecordingSink::new();
            let error = match service.start(&mut sink) {
                Ok(_) => service.run(&mut hw, &mut sink),
                Err(e) => e,
            };
            let _ = control_tx.send(ControlEnd {
                error,
                image: service.controller_mut().credential().store().image().to_vec(),
                spans: service.sequencer().timer().spans().to_vec(),
                attempts: service.controller().attempts().count(),
                rounds: service.rounds(),
                calls: hw.calls,
                events: sink.events,
            });
        });
    }

    thread::spawn(move || {
        let mut agent = PromptAgent::new(
            keypad_link,
            ScriptedKeypad::new(keys),
            RecordingDisplay::new(),
            SimSecondsTimer::new(),
            &config,
        );
        let error = agent.run();
        let end = KeypadEnd {
            error,
            spans: agent.sequencer().timer().spans().to_vec(),
            mirror: agent.mirror().count(),
            shown: agent.display().shown.clone(),
        };
        // Close this end of the link before reporting.
        drop(agent);
        let _ = keypad_tx.send(end);
    });

    let keypad = keypad_rx
        .recv_timeout(SESSION_LIMIT)
        .expect("keypad node stuck waiting on the control node");
    let control = control_rx
        .recv_timeout(SESSION_LIMIT)
        .expect("control node stuck waiting on the keypad node");
    (control, keypad)
}

fn outcomes(events: &[AccessEvent]) -> Vec<Message> {
    events
        .iter()
        .filter_map(|e| match e {
            AccessEvent::OutcomeSent { outcome, .. } => Some(*outcome),
            _ => None,
        })
        .collect()
}

fn alarm_calls(calls: &[ActuatorCall]) -> Vec<bool> {
    calls
        .iter()
        .filter_map(|c| match c {
            ActuatorCall::Alarm(on) => Some(*on),
            ActuatorCall::Motor { .. } => None,
        })
        .collect()
}

// ── Scenarios ─────────────────────────────────────────────────

#[test]
fn boot_is_announced_once_before_the_first_round() {
    let (control, keypad) = session(MemoryEeprom::new(), "12345 12345");

    assert_eq!(control.error, Error::Link(LinkError::Closed));
    assert_eq!(keypad.error, Error::Input(InputError::Closed));
    let boots = control
        .events
        .iter()
        .filter(|e| matches!(e, AccessEvent::Booted { .. }))
        .count();
    assert_eq!(boots, 1);
    assert_eq!(outcomes(&control.events), [Message::EnrollMatch]);
    assert_eq!(control.rounds, 1);
    assert_eq!(control.image[FLAG], 0x11);
}

#[test]
fn first_use_enroll_then_open() {
    let (control, keypad) = session(MemoryEeprom::new(), "12345 12345 + 12345");

    assert_eq!(control.error, Error::Link(LinkError::Closed));
    assert_eq!(keypad.error, Error::Input(InputError::Closed));

    assert_eq!(control.image[FLAG], 0x11);
    assert_eq!(&control.image[BLOCK..BLOCK + 5], &[1, 2, 3, 4, 5]);
    assert_eq!(outcomes(&control.events), [Message::EnrollMatch, Message::OpenMatch]);
    assert_eq!(control.rounds, 2);
    assert_eq!(control.spans, [15, 3, 15]);
    assert_eq!(
        control.calls.first(),
        Some(&ActuatorCall::Motor {
            direction: MotorDirection::Forward,
            speed: 100
        })
    );
    assert_eq!(
        control.calls.last(),
        Some(&ActuatorCall::Motor {
            direction: MotorDirection::Stop,
            speed: 0
        })
    );

    assert_eq!(keypad.spans, [2, 15, 3, 15]);
    assert_eq!(keypad.mirror, 0);
    assert!(keypad.shown.iter().any(|s| s == "PASSWORD SAVED"));
}

#[test]
fn four_wrong_passwords_lock_out_then_the_right_one_opens() {
    let (control, keypad) = session(
        seeded([1, 2, 3, 4, 5]),
        "+ 00000 00000 00000 00000 + 12345",
    );

    assert_eq!(
        outcomes(&control.events),
        [
            Message::OpenMismatch,
            Message::OpenMismatch,
            Message::OpenMismatch,
            Message::OpenMismatch,
            Message::OpenMatch,
        ]
    );
    assert_eq!(alarm_calls(&control.calls), [true, false]);
    assert_eq!(control.spans, [60, 15, 3, 15]);
    assert_eq!(control.attempts, 0);
    assert!(control.events.contains(&AccessEvent::AlarmRaised));
    assert!(control.events.contains(&AccessEvent::AlarmCleared));

    assert_eq!(keypad.spans, [2, 2, 2, 60, 15, 3, 15]);
    assert_eq!(keypad.mirror, 0);
    assert!(keypad.shown.iter().any(|s| s == "ERROR"));
}

#[test]
fn change_password_then_open_with_the_new_one() {
    let (control, keypad) = session(
        seeded([1, 2, 3, 4, 5]),
        "- 12345 54321 54321 + 54321",
    );

    assert_eq!(
        outcomes(&control.events),
        [Message::ChangeMatch, Message::EnrollMatch, Message::OpenMatch]
    );
    assert_eq!(&control.image[BLOCK..BLOCK + 5], &[5, 4, 3, 2, 1]);
    assert_eq!(control.image[FLAG], 0x11);
    assert!(
        control
            .events
            .contains(&AccessEvent::CommandReceived(Message::EnrollSendRequest))
    );
    assert_eq!(keypad.spans, [2, 2, 15, 3, 15]);
}

#[test]
fn enrollment_lockout_then_recovery() {
    let (control, keypad) = session(
        MemoryEeprom::new(),
        "11111 22222 11111 22222 11111 22222 33333 33333",
    );

    assert_eq!(
        outcomes(&control.events),
        [
            Message::EnrollMismatch,
            Message::EnrollMismatch,
            Message::EnrollMismatch,
            Message::EnrollMismatch,
            Message::EnrollMatch,
        ]
    );
    assert_eq!(control.spans, [60]);
    assert_eq!(alarm_calls(&control.calls), [true, false]);
    assert_eq!(control.attempts, 0);
    assert_eq!(control.image[FLAG], 0x11);
    assert_eq!(&control.image[BLOCK..BLOCK + 5], &[3, 3, 3, 3, 3]);

    assert_eq!(keypad.mirror, 0);
    assert_eq!(keypad.spans, [2, 2, 2, 60, 2]);
}
