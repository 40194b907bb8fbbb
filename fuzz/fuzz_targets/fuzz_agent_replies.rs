//! Fuzz target: `PromptAgent::run`
//!
//! Splits the input into a key script and a control-node reply script and
//! runs the keypad node until either side runs dry.  Asserts that it never
//! panics and that the attempt mirror never passes the limit at rest.
//!
//! cargo fuzz run fuzz_agent_replies

#![no_main]

use doorlock::adapters::console_hmi::{ConsoleDisplay, ConsoleKeypad};
use doorlock::adapters::sim_link::ReplayLink;
use doorlock::app::agent::PromptAgent;
use doorlock::config::LockConfig;
use doorlock::drivers::hw_timer::SimSecondsTimer;
use doorlock::protocol::MAX_ATTEMPTS;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&split, rest)) = data.split_first() else {
        return;
    };
    let (keys, replies) = rest.split_at(usize::from(split).min(rest.len()));

    let mut agent = PromptAgent::new(
        ReplayLink::new(replies),
        ConsoleKeypad::new(keys),
        ConsoleDisplay::new(),
        SimSecondsTimer::new(),
        &LockConfig::default(),
    );
    let _ = agent.run();

    assert!(agent.mirror().count() <= MAX_ATTEMPTS);
    assert!(!agent.sequencer().timer().is_armed());
});
