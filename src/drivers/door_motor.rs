//! Door motor driver (L293D-style H-bridge).
//!
//! Variable-speed forward/reverse control via two direction GPIOs and an
//! LEDC PWM channel on the bridge enable pin.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives real PWM and GPIO via hw_init helpers.
//! On host/test: tracks state in-memory only.

use crate::app::ports::MotorDirection;
use crate::drivers::hw_init;
use crate::pins;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotorState {
    Stopped,
    Running { duty: u8, dir: MotorDirection },
}

pub struct DoorMotor {
    state: MotorState,
}

impl DoorMotor {
    pub fn new() -> Self {
        Self {
            state: MotorState::Stopped,
        }
    }

    /// Drive at `duty` percent.  `Stop` or a zero duty brakes the motor.
    pub fn set(&mut self, direction: MotorDirection, duty: u8) {
        let duty = duty.min(100);
        if duty == 0 || direction == MotorDirection::Stop {
            self.stop();
            return;
        }

        // Cut drive before flipping the bridge.
        self.set_duty_hw(0);
        self.set_bridge_hw(direction);
        self.set_duty_hw(duty);

        self.state = MotorState::Running {
            duty,
            dir: direction,
        };
    }

    pub fn stop(&mut self) {
        self.set_duty_hw(0);
        self.set_bridge_hw(MotorDirection::Stop);
        self.state = MotorState::Stopped;
    }

    fn set_bridge_hw(&self, dir: MotorDirection) {
        let (in1, in2) = match dir {
            MotorDirection::Stop => (false, false),
            MotorDirection::Forward => (true, false),
            MotorDirection::Reverse => (false, true),
        };
        hw_init::gpio_write(pins::DOOR_IN1_GPIO, in1);
        hw_init::gpio_write(pins::DOOR_IN2_GPIO, in2);
    }

    fn set_duty_hw(&self, duty: u8) {
        let duty_8bit = ((duty as u16) * 255 / 100) as u8;
        hw_init::ledc_set(hw_init::LEDC_CH_DOOR, duty_8bit);
    }

    pub fn state(&self) -> MotorState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        !matches!(self.state, MotorState::Stopped)
    }
}

impl Default for DoorMotor {
    fn default() -> Self {
        Self::new()
    }
}
