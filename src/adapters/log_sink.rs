//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured access events to the
//! ESP-IDF logger (UART / USB-CDC in production, stderr on the host).

use log::{error, info, warn};

use crate::app::events::AccessEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AccessEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AccessEvent) {
        match event {
            AccessEvent::Booted { credential_present } => {
                info!(
                    "BOOT  | credential={}",
                    if *credential_present { "present" } else { "absent" }
                );
            }
            AccessEvent::CommandReceived(cmd) => {
                info!("ROUND | command={:?} (0x{:02X})", cmd, cmd.as_byte());
            }
            AccessEvent::OutcomeSent { outcome, attempts } => {
                info!(
                    "ROUND | outcome={:?} (0x{:02X}) | attempts={}",
                    outcome,
                    outcome.as_byte(),
                    attempts
                );
            }
            AccessEvent::UnknownCommand(byte) => {
                warn!("ROUND | ignored unknown byte 0x{:02X}", byte);
            }
            AccessEvent::StoreFault(e) => {
                error!("STORE | {} (failed closed)", e);
            }
            AccessEvent::DoorPhase(phase) => {
                info!("DOOR  | {:?}", phase);
            }
            AccessEvent::AlarmRaised => {
                warn!("ALARM | attempt limit reached, sounding");
            }
            AccessEvent::AlarmCleared => {
                info!("ALARM | cleared");
            }
        }
    }
}
