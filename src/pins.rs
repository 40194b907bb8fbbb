//! GPIO / peripheral pin assignments for both door-lock boards.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Door motor driver (L293D-style H-bridge), control node
// ---------------------------------------------------------------------------

/// Digital output: H-bridge IN1 (HIGH with IN2 LOW = forward/opening).
pub const DOOR_IN1_GPIO: i32 = 4;
/// Digital output: H-bridge IN2 (HIGH with IN1 LOW = reverse/closing).
pub const DOOR_IN2_GPIO: i32 = 5;
/// LEDC PWM output on the H-bridge enable pin (speed).
pub const DOOR_EN_PWM_GPIO: i32 = 6;

// ---------------------------------------------------------------------------
// Alarm buzzer, control node
// ---------------------------------------------------------------------------

/// Digital output: active buzzer (HIGH = sounding).
pub const BUZZER_GPIO: i32 = 7;

// ---------------------------------------------------------------------------
// I²C bus, control node (M24C16 credential EEPROM)
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 8;
pub const I2C_SCL_GPIO: i32 = 9;

// ---------------------------------------------------------------------------
// Inter-node link (UART1, both nodes; TX/RX crossed on the harness)
// ---------------------------------------------------------------------------

pub const LINK_TX_GPIO: i32 = 17;
pub const LINK_RX_GPIO: i32 = 18;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC timer resolution (bits).  8-bit gives 0 – 255 duty levels.
pub const PWM_RESOLUTION_BITS: u32 = 8;
/// LEDC base frequency for the door motor (25 kHz, inaudible).
pub const DOOR_PWM_FREQ_HZ: u32 = 25_000;
