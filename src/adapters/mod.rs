//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements         | Connects to                |
//! |----------------|--------------------|----------------------------|
//! | `hardware`     | ActuatorPort       | Door motor PWM, buzzer GPIO|
//! | `eeprom_store` | CredentialStore    | M24C16 over I²C / memory   |
//! | `uart_link`    | ByteLink           | UART, 9600 8-E-1           |
//! | `sim_link`     | ByteLink           | In-process channels        |
//! | `console_hmi`  | KeypadPort         | Console input              |
//! |                | DisplayPort        | 16×2 frame, logged         |
//! | `log_sink`     | EventSink          | Serial log output          |
//!
//! The seconds timer port is implemented next to its hardware in
//! [`drivers::hw_timer`](crate::drivers::hw_timer).

pub mod console_hmi;
pub mod eeprom_store;
pub mod hardware;
pub mod log_sink;
pub mod sim_link;
#[cfg(target_os = "espidf")]
pub mod uart_link;
