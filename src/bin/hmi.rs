//! Door-lock keypad node — main entry point.
//!
//! Prompts for passwords, forwards them to the control node, and mirrors
//! the door and alarm phases on the display.  It stores nothing.
//!
//! ```text
//!   ConsoleKeypad ──▶ ┌──────────────┐ ◀──▶ UartLink ◀──▶ control node
//!                     │ PromptAgent  │
//!  ConsoleDisplay ◀── └──────────────┘ ◀── EspSecondsTimer
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_hal::peripherals::Peripherals;
use log::{error, info};

use doorlock::adapters::console_hmi::{ConsoleDisplay, ConsoleKeypad};
use doorlock::adapters::uart_link::UartLink;
use doorlock::app::agent::PromptAgent;
use doorlock::config::LockConfig;
use doorlock::drivers::hw_timer::EspSecondsTimer;

const TIMER_POLL_MS: u32 = 20;
const KEYPAD_POLL_MS: u32 = 20;

fn main() -> Result<()> {
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("Door keypad v{}", env!("CARGO_PKG_VERSION"));

    let config = LockConfig::load()?;
    let p = Peripherals::take()?;

    let link = UartLink::new(p.uart1, p.pins.gpio17, p.pins.gpio18, config.link_baud)
        .map_err(doorlock::error::Error::from)?;
    let keypad = ConsoleKeypad::polling(std::io::stdin(), KEYPAD_POLL_MS);

    let mut agent = PromptAgent::new(
        link,
        keypad,
        ConsoleDisplay::new(),
        EspSecondsTimer::new(TIMER_POLL_MS),
        &config,
    );

    info!("Waiting for the control node.");
    let e = agent.run();
    error!("Keypad loop ended: {}", e);
    Err(e.into())
}
