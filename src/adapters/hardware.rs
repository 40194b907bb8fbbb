//! Hardware adapter — bridges real peripherals to the actuator port.
//!
//! Owns the door motor and buzzer drivers and exposes them through
//! [`ActuatorPort`].  This is the only module on the control node that
//! commands actuators.  On non-espidf targets, the underlying drivers use
//! cfg-gated simulation stubs.

use log::debug;

use crate::app::ports::{ActuatorPort, MotorDirection};
use crate::drivers::buzzer::Buzzer;
use crate::drivers::door_motor::DoorMotor;

/// Concrete adapter that combines the control node's actuators.
pub struct DoorHardware {
    motor: DoorMotor,
    buzzer: Buzzer,
}

impl DoorHardware {
    pub fn new(motor: DoorMotor, buzzer: Buzzer) -> Self {
        Self { motor, buzzer }
    }

    /// Motor stopped, buzzer silent.
    pub fn all_off(&mut self) {
        self.motor.stop();
        self.buzzer.off();
    }

    pub fn motor(&self) -> &DoorMotor {
        &self.motor
    }

    pub fn buzzer(&self) -> &Buzzer {
        &self.buzzer
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl ActuatorPort for DoorHardware {
    fn set_door_motor(&mut self, direction: MotorDirection, speed: u8) {
        debug!("hw: door motor {:?} @ {}%", direction, speed);
        self.motor.set(direction, speed);
    }

    fn set_alarm(&mut self, on: bool) {
        if on {
            self.buzzer.on();
        } else {
            self.buzzer.off();
        }
    }
}
