//! Keypad-node tests: one [`PromptAgent`] driven over a scripted link.
//!
//! The inbound script is what the control node would put on the wire:
//! an outcome after each READY the agent sends, and a READY before each
//! command or digit block it expects.

use doorlock::adapters::sim_link::ReplayLink;
use doorlock::app::agent::PromptAgent;
use doorlock::config::LockConfig;
use doorlock::drivers::hw_timer::SimSecondsTimer;
use doorlock::error::{Error, InputError, LinkError, ProtocolError};
use doorlock::protocol::{Message, READY};

use crate::mock_hw::{RecordingDisplay, ScriptedKeypad};

const R: u8 = READY;

type Agent = PromptAgent<ReplayLink, ScriptedKeypad, RecordingDisplay, SimSecondsTimer>;

fn agent(inbound: &[u8], keys: &str) -> Agent {
    PromptAgent::new(
        ReplayLink::new(inbound),
        ScriptedKeypad::new(keys),
        RecordingDisplay::new(),
        SimSecondsTimer::new(),
        &LockConfig::default(),
    )
}

// ── Enrollment ────────────────────────────────────────────────

#[test]
fn missing_credential_prompts_twice_and_sends_both_blocks() {
    let mut a = agent(&[0x10, R, R, R], "1a2#345 12345");
    assert_eq!(a.step(), Ok(Message::NoCredential));
    assert_eq!(
        a.link().sent(),
        &[R, 0x19, 1, 2, 3, 4, 5, 1, 2, 3, 4, 5]
    );
    assert!(a.display().showed("PLZ ENTER PASS:"));
    assert!(a.display().showed("PLZ RE-ENTER THE"));
    assert!(a.display().showed("SAME PASS:"));
    assert_eq!(a.display().echoes, 10);
    assert_eq!(a.mirror().count(), 1);
}

#[test]
fn saved_notice_then_menu() {
    let mut a = agent(&[0x12, R, R], "+12345");
    assert_eq!(a.step(), Ok(Message::EnrollMatch));
    assert!(a.display().showed("PASSWORD SAVED"));
    assert!(a.display().showed("+ : Open Door"));
    assert!(a.display().showed("- : Change Pass"));
    assert_eq!(a.link().sent(), &[R, 0x21, 1, 2, 3, 4, 5]);
    assert_eq!(a.sequencer().timer().spans(), &[2]);
}

#[test]
fn replacement_mode_survives_a_mismatch() {
    let mut a = agent(
        &[0x15, R, R, R, 0x13, R, R, R],
        "54321 54320 54321 54321",
    );
    assert_eq!(a.step(), Ok(Message::ChangeMatch));
    assert_eq!(a.step(), Ok(Message::EnrollMismatch));

    let sent = a.link().sent();
    assert_eq!(sent.len(), 24);
    assert_eq!(sent[1], Message::EnrollSendRequest.as_byte());
    assert_eq!(sent[13], Message::EnrollSendRequest.as_byte());
    assert!(a.display().showed("PASSWORD IS"));
    assert!(a.display().showed("PASSWORD UNMATCH"));
}

#[test]
fn fourth_enrollment_round_sends_command_only_then_mirrors_alarm() {
    let inbound = [
        0x10, R, R, R, // attempt 1
        0x13, R, R, R, // attempt 2
        0x13, R, R, R, // attempt 3
        0x13, R, // attempt 4: command only
        0x13, // lockout reply
    ];
    let mut a = agent(&inbound, "11111 22222 11111 22222 11111 22222");
    assert_eq!(a.run(), Error::Input(InputError::Closed));

    assert!(a.link().exhausted());
    assert!(a.link().sent().ends_with(&[R, 0x19, R]));
    assert_eq!(a.display().count("PASSWORD UNMATCH"), 3);
    assert!(a.display().showed("ERROR"));
    assert_eq!(a.sequencer().timer().spans(), &[2, 2, 2, 60]);
    // Alarm done, the next enrollment already counts as attempt 1.
    assert_eq!(a.mirror().count(), 1);
}

// ── Verification ──────────────────────────────────────────────

#[test]
fn open_match_mirrors_the_door_on_screen() {
    let mut a = agent(&[0x14], "");
    assert_eq!(a.step(), Err(Error::Input(InputError::Closed)));
    assert!(a.display().showed("OPENING THE DOOR"));
    assert!(a.display().showed("HOLDING THE DOOR"));
    assert!(a.display().showed("CLOSING THE DOOR"));
    assert_eq!(a.sequencer().timer().spans(), &[15, 3, 15]);
    assert_eq!(a.mirror().count(), 0);
}

#[test]
fn wrong_password_notice_then_same_verify_again() {
    let mut a = agent(&[0x25, R, R], "00000");
    assert_eq!(a.step(), Ok(Message::ChangeMismatch));
    assert!(a.display().showed("WRONG PASSWORD"));
    assert_eq!(a.link().sent(), &[R, 0x22, 0, 0, 0, 0, 0]);
}

#[test]
fn four_wrong_passwords_mirror_the_alarm() {
    let inbound = [
        0x11, R, R, // menu, attempt 1
        0x24, R, R, // attempt 2
        0x24, R, R, // attempt 3
        0x24, R, R, // attempt 4
        0x24, // lockout
    ];
    let mut a = agent(&inbound, "+ 00000 00000 00000 00000");
    assert_eq!(a.run(), Error::Input(InputError::Closed));

    assert!(a.link().exhausted());
    assert_eq!(a.display().count("WRONG PASSWORD"), 3);
    assert!(a.display().showed("ERROR"));
    assert_eq!(a.sequencer().timer().spans(), &[2, 2, 2, 60]);
    assert_eq!(a.mirror().count(), 0);
}

// ── Robustness ────────────────────────────────────────────────

#[test]
fn unknown_reply_is_rejected() {
    let mut a = agent(&[0x42], "");
    assert_eq!(
        a.step(),
        Err(Error::Protocol(ProtocolError::UnknownMessage(0x42)))
    );

    let mut a = agent(&[0x19], "");
    assert_eq!(
        a.step(),
        Err(Error::Protocol(ProtocolError::Unexpected(Message::Enroll)))
    );
}

#[test]
fn run_recovers_from_unknown_reply_through_the_menu() {
    let mut a = agent(&[0x42, R, R], "+12345");
    assert_eq!(a.run(), Error::Link(LinkError::Closed));
    assert_eq!(a.link().sent(), &[R, 0x21, 1, 2, 3, 4, 5, R]);
}
