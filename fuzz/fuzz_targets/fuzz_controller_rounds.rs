//! Fuzz target: `ControlService::step`
//!
//! Plays arbitrary keypad-side bytes into the control node until the
//! script runs dry.  Asserts that it never panics, that no completed
//! round leaves the attempt counter at the limit, that every byte sent
//! is READY or an outcome, and that the motor and buzzer end up off.
//!
//! cargo fuzz run fuzz_controller_rounds

#![no_main]

use doorlock::adapters::eeprom_store::MemoryEeprom;
use doorlock::adapters::hardware::DoorHardware;
use doorlock::adapters::log_sink::LogEventSink;
use doorlock::adapters::sim_link::ReplayLink;
use doorlock::app::service::ControlService;
use doorlock::config::LockConfig;
use doorlock::drivers::buzzer::Buzzer;
use doorlock::drivers::door_motor::DoorMotor;
use doorlock::drivers::hw_timer::SimSecondsTimer;
use doorlock::protocol::{MAX_ATTEMPTS, Message, READY};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let config = LockConfig::default();
    let mut service = ControlService::new(
        ReplayLink::new(data),
        MemoryEeprom::new(),
        SimSecondsTimer::new(),
        &config,
    );
    let mut hw = DoorHardware::new(DoorMotor::new(), Buzzer::new());
    let mut sink = LogEventSink::new();

    let _ = service.start(&mut sink);
    loop {
        if service.step(&mut hw, &mut sink).is_err() {
            break;
        }
        // A completed round never leaves the counter at the limit.
        assert!(service.controller().attempts().count() < MAX_ATTEMPTS);
    }
    assert!(service.controller().attempts().count() <= MAX_ATTEMPTS);

    for &b in service.controller().link().sent() {
        let outcome = Message::from_byte(b).is_ok_and(Message::is_outcome);
        assert!(b == READY || outcome, "unexpected byte 0x{b:02X} sent");
    }
    assert!(!hw.motor().is_running());
    assert!(!hw.buzzer().is_on());
});
