//! Door-lock configuration parameters
//!
//! All tunable parameters for both nodes.  The only durable runtime state is
//! the credential record, so configuration is compiled in: the defaults
//! below, optionally overridden by a JSON document embedded at build time
//! through the `DOORLOCK_CONFIG_JSON` environment variable.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Core lock configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LockConfig {
    // --- Access policy ---
    /// Consecutive failed rounds before the lockout alarm
    pub max_attempts: u8,

    // --- Credential store layout ---
    /// EEPROM address of the credential presence flag
    pub presence_address: u16,
    /// EEPROM address of the 5-byte password block
    pub password_address: u16,
    /// Write-settle delay after every byte written (milliseconds)
    pub store_settle_ms: u32,

    // --- Door sequence ---
    /// Motor forward (opening) phase (seconds)
    pub door_open_secs: u8,
    /// Door held open, motor stopped (seconds)
    pub door_hold_secs: u8,
    /// Motor reverse (closing) phase (seconds)
    pub door_close_secs: u8,
    /// Motor PWM duty during open/close (0-100%)
    pub door_speed_percent: u8,

    // --- Alarm / UI ---
    /// Buzzer duration on lockout (seconds)
    pub alarm_secs: u8,
    /// How long keypad-node notices stay on screen (seconds)
    pub notice_secs: u8,

    // --- Buses ---
    /// Inter-node UART baud rate (8-E-1)
    pub link_baud: u32,
    /// 7-bit I2C base address of the EEPROM (A10..A8 = 0)
    pub eeprom_i2c_address: u8,
    /// I2C bus frequency (Hz)
    pub i2c_freq_hz: u32,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            // Access policy
            max_attempts: crate::protocol::MAX_ATTEMPTS,

            // Store layout
            presence_address: 0x0309,
            password_address: 0x0311,
            store_settle_ms: 10,

            // Door sequence
            door_open_secs: 15,
            door_hold_secs: 3,
            door_close_secs: 15,
            door_speed_percent: 100,

            // Alarm / UI
            alarm_secs: 60,
            notice_secs: 2,

            // Buses
            link_baud: 9600,
            eeprom_i2c_address: 0x50,
            i2c_freq_hz: 400_000,
        }
    }
}

/// EEPROM capacity of the M24C16 (16 Kbit).
pub const STORE_CAPACITY: u16 = 2048;

/// Errors from loading or validating a [`LockConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The embedded JSON override could not be parsed.
    Corrupted,
    /// A field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for crate::error::Error {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::Corrupted => Self::Config("corrupted JSON override"),
            ConfigError::ValidationFailed(msg) => Self::Config(msg),
        }
    }
}

impl LockConfig {
    /// Range-check every field.  Bad values are rejected, never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // The round that lands on the limit reads no digits, so a limit of
        // one would make enrollment impossible.
        if self.max_attempts < 2 {
            return Err(ConfigError::ValidationFailed("max_attempts must be >= 2"));
        }
        if self.presence_address >= STORE_CAPACITY {
            return Err(ConfigError::ValidationFailed("presence_address outside EEPROM"));
        }
        let block_end = self.password_address as u32 + crate::protocol::PASSWORD_LEN as u32;
        if block_end > STORE_CAPACITY as u32 {
            return Err(ConfigError::ValidationFailed("password block outside EEPROM"));
        }
        let presence = self.presence_address as u32;
        if presence >= self.password_address as u32 && presence < block_end {
            return Err(ConfigError::ValidationFailed(
                "presence flag overlaps password block",
            ));
        }
        if self.store_settle_ms == 0 {
            return Err(ConfigError::ValidationFailed("store_settle_ms must be > 0"));
        }
        if self.door_open_secs == 0 || self.door_close_secs == 0 {
            return Err(ConfigError::ValidationFailed("door travel phases must be > 0 s"));
        }
        if self.door_speed_percent == 0 || self.door_speed_percent > 100 {
            return Err(ConfigError::ValidationFailed("door_speed_percent must be 1-100"));
        }
        if self.alarm_secs == 0 {
            return Err(ConfigError::ValidationFailed("alarm_secs must be > 0"));
        }
        if self.link_baud == 0 {
            return Err(ConfigError::ValidationFailed("link_baud must be > 0"));
        }
        if self.eeprom_i2c_address & 0x07 != 0 || self.eeprom_i2c_address > 0x78 {
            return Err(ConfigError::ValidationFailed(
                "eeprom_i2c_address must leave A10..A8 clear",
            ));
        }
        if self.i2c_freq_hz == 0 || self.i2c_freq_hz > 400_000 {
            return Err(ConfigError::ValidationFailed("i2c_freq_hz must be 1-400000"));
        }
        Ok(())
    }

    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|_| ConfigError::Corrupted)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults, or the validated build-time override when one was embedded.
    pub fn load() -> Result<Self, ConfigError> {
        match option_env!("DOORLOCK_CONFIG_JSON") {
            Some(json) => Self::from_json(json),
            None => Ok(Self::default()),
        }
    }
}
