//! Door-lock control node — main entry point.
//!
//! Owns the credential EEPROM, the attempt counter, the door motor and the
//! alarm buzzer.  The keypad node only ever learns outcomes.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  UartLink        EepromStore      DoorHardware    LogEventSink │
//! │  (ByteLink)      (CredentialStore)(ActuatorPort)  (EventSink)  │
//! │  EspSecondsTimer (SecondsTimer)                                │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              ControlService (pure logic)               │    │
//! │  │  AccessController · AttemptCounter · Sequencer         │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Imports ───────────────────────────────────────────────────
use anyhow::Result;
use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::units::Hertz;
use log::{error, info};

use doorlock::adapters::eeprom_store::EepromStore;
use doorlock::adapters::hardware::DoorHardware;
use doorlock::adapters::log_sink::LogEventSink;
use doorlock::adapters::uart_link::UartLink;
use doorlock::app::service::ControlService;
use doorlock::config::LockConfig;
use doorlock::drivers::buzzer::Buzzer;
use doorlock::drivers::door_motor::DoorMotor;
use doorlock::drivers::eeprom::M24c16;
use doorlock::drivers::hw_init;
use doorlock::drivers::hw_timer::EspSecondsTimer;

/// Sleep between seconds-counter reads while a sequence runs.
const TIMER_POLL_MS: u32 = 20;

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Door control v{}                    ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = LockConfig::load()?;
    info!("Config: {:?}", config);

    // ── 3. Peripherals ────────────────────────────────────────
    if let Err(e) = hw_init::init_peripherals() {
        // Without the H-bridge and buzzer outputs the door cannot be driven.
        error!("HAL init failed: {}, halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }
    let p = Peripherals::take()?;

    // Pins follow `doorlock::pins`: SDA 8, SCL 9, link TX 17, RX 18.
    let i2c = I2cDriver::new(
        p.i2c0,
        p.pins.gpio8,
        p.pins.gpio9,
        &I2cConfig::new().baudrate(Hertz(config.i2c_freq_hz)),
    )?;
    let eeprom = M24c16::new(
        i2c,
        FreeRtos,
        config.eeprom_i2c_address,
        config.store_settle_ms,
    );
    let link = UartLink::new(p.uart1, p.pins.gpio17, p.pins.gpio18, config.link_baud)
        .map_err(doorlock::error::Error::from)?;

    // ── 4. Adapters + service ─────────────────────────────────
    let mut hw = DoorHardware::new(DoorMotor::new(), Buzzer::new());
    hw.all_off();
    let mut sink = LogEventSink::new();

    let mut service = ControlService::new(
        link,
        EepromStore::new(eeprom),
        EspSecondsTimer::new(TIMER_POLL_MS),
        &config,
    );

    // ── 5. Serve rounds ───────────────────────────────────────
    service.start(&mut sink)?;
    info!("System ready. Waiting for commands.");
    let e = service.run(&mut hw, &mut sink);
    hw.all_off();
    error!("Control loop ended: {}", e);
    Err(e.into())
}
