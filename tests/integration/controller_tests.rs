//! Control-node tests: one [`ControlService`] driven over a scripted link.
//!
//! The inbound script is what the keypad node would put on the wire:
//! a READY before each outcome it wants, a command after each READY it
//! gets, and digit blocks after the control node's READYs.

use doorlock::adapters::eeprom_store::MemoryEeprom;
use doorlock::adapters::sim_link::ReplayLink;
use doorlock::app::events::AccessEvent;
use doorlock::app::ports::{CredentialStore, MotorDirection};
use doorlock::app::sequencer::DoorPhase;
use doorlock::app::service::ControlService;
use doorlock::config::LockConfig;
use doorlock::drivers::hw_timer::SimSecondsTimer;
use doorlock::error::{Error, LinkError, StoreError};
use doorlock::protocol::{Message, READY};

use crate::mock_hw::{MockActuators, RecordingSink};

const FLAG: usize = 0x0309;
const BLOCK: usize = 0x0311;
const PRESENT: u8 = 0x11;
const ABSENT: u8 = 0x10;

type Service = ControlService<ReplayLink, MemoryEeprom, SimSecondsTimer>;

fn service(store: MemoryEeprom, inbound: &[u8]) -> Service {
    ControlService::new(
        ReplayLink::new(inbound),
        store,
        SimSecondsTimer::new(),
        &LockConfig::default(),
    )
}

fn seeded(password: [u8; 5]) -> MemoryEeprom {
    let mut m = MemoryEeprom::new();
    m.write_block(BLOCK as u16, &password).unwrap();
    m.write_byte(FLAG as u16, PRESENT).unwrap();
    m
}

fn image(s: &mut Service) -> Vec<u8> {
    s.controller_mut().credential().store().image().to_vec()
}

/// Keypad-side bytes for one verify round.
fn verify_round(command: Message, digits: [u8; 5]) -> Vec<u8> {
    let mut v = vec![command.as_byte()];
    v.extend_from_slice(&digits);
    v.push(READY);
    v
}

/// Keypad-side bytes for one enroll round with both blocks.
fn enroll_round(command: Message, first: [u8; 5], second: [u8; 5]) -> Vec<u8> {
    let mut v = vec![command.as_byte()];
    v.extend_from_slice(&first);
    v.extend_from_slice(&second);
    v.push(READY);
    v
}

// ── Boot ──────────────────────────────────────────────────────

#[test]
fn erased_store_boots_into_enrollment() {
    let mut s = service(MemoryEeprom::new(), &[READY]);
    let mut sink = RecordingSink::new();
    assert_eq!(s.start(&mut sink), Ok(Message::NoCredential));
    assert_eq!(s.controller().link().sent(), &[0x10]);
    assert!(sink.has(&AccessEvent::Booted {
        credential_present: false
    }));
}

#[test]
fn stored_credential_is_announced() {
    let mut s = service(seeded([1, 2, 3, 4, 5]), &[0x00, READY]);
    let mut sink = RecordingSink::new();
    assert_eq!(s.start(&mut sink), Ok(Message::CredentialExists));
    assert_eq!(s.controller().link().sent(), &[0x11]);
}

#[test]
fn unreadable_flag_boots_as_absent() {
    let mut store = seeded([1, 2, 3, 4, 5]);
    store.fail_reads(true);
    let mut s = service(store, &[READY]);
    let mut sink = RecordingSink::new();
    assert_eq!(s.start(&mut sink), Ok(Message::NoCredential));
    assert!(sink.has(&AccessEvent::StoreFault(StoreError::NoAck)));
}

// ── Enrollment ────────────────────────────────────────────────

#[test]
fn matching_blocks_are_committed() {
    let inbound = enroll_round(Message::Enroll, [1, 2, 3, 4, 5], [1, 2, 3, 4, 5]);
    let mut s = service(MemoryEeprom::new(), &inbound);
    let (mut hw, mut sink) = (MockActuators::new(), RecordingSink::new());

    assert_eq!(s.step(&mut hw, &mut sink), Ok(Some(Message::EnrollMatch)));
    assert_eq!(s.controller().link().sent(), &[READY, READY, READY, 0x12]);

    let img = image(&mut s);
    assert_eq!(img[FLAG], PRESENT);
    assert_eq!(&img[BLOCK..BLOCK + 5], &[1, 2, 3, 4, 5]);
    assert_eq!(s.controller().attempts().count(), 0);
    assert!(hw.calls.is_empty());
}

#[test]
fn differing_blocks_demote_the_credential() {
    let inbound = enroll_round(Message::Enroll, [1, 2, 3, 4, 5], [1, 2, 3, 4, 6]);
    let mut s = service(seeded([9, 9, 9, 9, 9]), &inbound);
    let (mut hw, mut sink) = (MockActuators::new(), RecordingSink::new());

    assert_eq!(s.step(&mut hw, &mut sink), Ok(Some(Message::EnrollMismatch)));
    let img = image(&mut s);
    assert_eq!(img[FLAG], ABSENT);
    assert_eq!(&img[BLOCK..BLOCK + 5], &[9, 9, 9, 9, 9]);
    assert_eq!(s.controller().attempts().count(), 1);
}

#[test]
fn failed_commit_fails_closed() {
    let mut store = MemoryEeprom::new();
    store.fail_writes_after(2);
    let inbound = enroll_round(Message::Enroll, [1, 2, 3, 4, 5], [1, 2, 3, 4, 5]);
    let mut s = service(store, &inbound);
    let (mut hw, mut sink) = (MockActuators::new(), RecordingSink::new());

    assert_eq!(s.step(&mut hw, &mut sink), Ok(Some(Message::EnrollMismatch)));
    assert!(sink.has(&AccessEvent::StoreFault(StoreError::NoAck)));
    assert_ne!(image(&mut s)[FLAG], PRESENT);
}

#[test]
fn fourth_enrollment_round_sounds_alarm_without_digits() {
    let mut inbound = Vec::new();
    for _ in 0..3 {
        inbound.extend(enroll_round(Message::Enroll, [1, 1, 1, 1, 1], [2, 2, 2, 2, 2]));
    }
    inbound.extend([Message::Enroll.as_byte(), READY]);
    let mut s = service(MemoryEeprom::new(), &inbound);
    let (mut hw, mut sink) = (MockActuators::new(), RecordingSink::new());

    for n in 1..=3 {
        assert_eq!(s.step(&mut hw, &mut sink), Ok(Some(Message::EnrollMismatch)));
        assert_eq!(s.controller().attempts().count(), n);
    }
    assert!(hw.alarm_calls().is_empty());

    assert_eq!(s.step(&mut hw, &mut sink), Ok(Some(Message::EnrollMismatch)));
    assert!(s.controller().link().exhausted());
    assert_eq!(hw.alarm_calls(), [true, false]);
    assert_eq!(s.sequencer().timer().spans(), &[60]);
    assert_eq!(s.controller().attempts().count(), 0);
    assert!(sink.has(&AccessEvent::AlarmRaised));
    assert!(sink.has(&AccessEvent::AlarmCleared));
}

// ── Verification ──────────────────────────────────────────────

#[test]
fn open_match_runs_the_door() {
    let inbound = verify_round(Message::VerifyForOpen, [1, 2, 3, 4, 5]);
    let mut s = service(seeded([1, 2, 3, 4, 5]), &inbound);
    let (mut hw, mut sink) = (MockActuators::new(), RecordingSink::new());

    assert_eq!(s.step(&mut hw, &mut sink), Ok(Some(Message::OpenMatch)));
    assert_eq!(
        hw.motor_calls(),
        [
            (MotorDirection::Forward, 100),
            (MotorDirection::Stop, 0),
            (MotorDirection::Reverse, 100),
            (MotorDirection::Stop, 0),
        ]
    );
    assert!(!hw.motor_running());
    assert_eq!(s.sequencer().timer().spans(), &[15, 3, 15]);
    assert_eq!(
        sink.door_phases(),
        [
            DoorPhase::Opening,
            DoorPhase::Holding,
            DoorPhase::Closing,
            DoorPhase::Closed
        ]
    );
}

#[test]
fn four_wrong_passwords_sound_the_alarm() {
    let mut inbound = Vec::new();
    for _ in 0..4 {
        inbound.extend(verify_round(Message::VerifyForOpen, [0, 0, 0, 0, 0]));
    }
    let mut s = service(seeded([1, 2, 3, 4, 5]), &inbound);
    let (mut hw, mut sink) = (MockActuators::new(), RecordingSink::new());

    for _ in 0..3 {
        assert_eq!(s.step(&mut hw, &mut sink), Ok(Some(Message::OpenMismatch)));
        assert!(hw.alarm_calls().is_empty());
    }
    assert_eq!(s.controller().attempts().count(), 3);

    assert_eq!(s.step(&mut hw, &mut sink), Ok(Some(Message::OpenMismatch)));
    assert_eq!(hw.alarm_calls(), [true, false]);
    assert!(!hw.alarm_on());
    assert_eq!(s.sequencer().timer().spans(), &[60]);
    assert_eq!(s.controller().attempts().count(), 0);
    assert!(hw.motor_calls().is_empty());
    assert_eq!(
        sink.count(&AccessEvent::OutcomeSent {
            outcome: Message::OpenMismatch,
            attempts: 4
        }),
        1
    );
}

#[test]
fn a_match_clears_earlier_failures() {
    let mut inbound = Vec::new();
    inbound.extend(verify_round(Message::VerifyForChange, [5, 4, 3, 2, 1]));
    inbound.extend(verify_round(Message::VerifyForChange, [5, 4, 3, 2, 1]));
    inbound.extend(verify_round(Message::VerifyForChange, [1, 2, 3, 4, 5]));
    let mut s = service(seeded([1, 2, 3, 4, 5]), &inbound);
    let (mut hw, mut sink) = (MockActuators::new(), RecordingSink::new());

    assert_eq!(s.step(&mut hw, &mut sink), Ok(Some(Message::ChangeMismatch)));
    assert_eq!(s.step(&mut hw, &mut sink), Ok(Some(Message::ChangeMismatch)));
    assert_eq!(s.controller().attempts().count(), 2);
    assert_eq!(s.step(&mut hw, &mut sink), Ok(Some(Message::ChangeMatch)));
    assert_eq!(s.controller().attempts().count(), 0);
    assert!(hw.calls.is_empty());
}

#[test]
fn change_then_replacement_enrollment() {
    let mut inbound = verify_round(Message::VerifyForChange, [1, 2, 3, 4, 5]);
    inbound.extend(enroll_round(
        Message::EnrollSendRequest,
        [5, 4, 3, 2, 1],
        [5, 4, 3, 2, 1],
    ));
    let mut s = service(seeded([1, 2, 3, 4, 5]), &inbound);
    let (mut hw, mut sink) = (MockActuators::new(), RecordingSink::new());

    assert_eq!(s.step(&mut hw, &mut sink), Ok(Some(Message::ChangeMatch)));
    assert_eq!(s.step(&mut hw, &mut sink), Ok(Some(Message::EnrollMatch)));
    assert_eq!(&image(&mut s)[BLOCK..BLOCK + 5], &[5, 4, 3, 2, 1]);
    assert_eq!(s.rounds(), 2);
}

#[test]
fn unreadable_credential_never_opens() {
    let mut store = seeded([1, 2, 3, 4, 5]);
    store.fail_reads(true);
    let inbound = verify_round(Message::VerifyForOpen, [1, 2, 3, 4, 5]);
    let mut s = service(store, &inbound);
    let (mut hw, mut sink) = (MockActuators::new(), RecordingSink::new());

    assert_eq!(s.step(&mut hw, &mut sink), Ok(Some(Message::OpenMismatch)));
    assert!(sink.has(&AccessEvent::StoreFault(StoreError::NoAck)));
    assert!(hw.motor_calls().is_empty());
}

// ── Robustness ────────────────────────────────────────────────

#[test]
fn unknown_command_byte_is_ignored() {
    let mut s = service(seeded([1, 2, 3, 4, 5]), &[0x77, Message::OpenMatch.as_byte()]);
    let (mut hw, mut sink) = (MockActuators::new(), RecordingSink::new());

    assert_eq!(s.step(&mut hw, &mut sink), Ok(None));
    assert_eq!(s.step(&mut hw, &mut sink), Ok(None));
    assert_eq!(s.controller().link().sent(), &[READY, READY]);
    assert!(sink.has(&AccessEvent::UnknownCommand(0x77)));
    assert!(sink.has(&AccessEvent::UnknownCommand(0x14)));
    assert_eq!(s.controller().attempts().count(), 0);
    assert_eq!(s.rounds(), 0);
}

#[test]
fn run_returns_when_the_link_closes() {
    let mut inbound = vec![READY];
    inbound.extend(verify_round(Message::VerifyForOpen, [1, 2, 3, 4, 5]));
    let mut s = service(seeded([1, 2, 3, 4, 5]), &inbound);
    let (mut hw, mut sink) = (MockActuators::new(), RecordingSink::new());

    assert_eq!(s.start(&mut sink), Ok(Message::CredentialExists));
    assert_eq!(s.run(&mut hw, &mut sink), Error::Link(LinkError::Closed));
    assert_eq!(s.rounds(), 1);
    assert!(!hw.motor_running());
}

#[test]
fn run_serves_rounds_without_announcing() {
    let inbound = verify_round(Message::VerifyForOpen, [1, 2, 3, 4, 5]);
    let mut s = service(seeded([1, 2, 3, 4, 5]), &inbound);
    let (mut hw, mut sink) = (MockActuators::new(), RecordingSink::new());

    assert_eq!(s.run(&mut hw, &mut sink), Error::Link(LinkError::Closed));
    assert_eq!(s.rounds(), 1);
    assert!(!sink.events.iter().any(|e| matches!(e, AccessEvent::Booted { .. })));
    assert!(!s.controller().link().sent().contains(&PRESENT));
    assert_eq!(s.controller().link().sent().first(), Some(&READY));
}
