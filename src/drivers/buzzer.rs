//! Active buzzer on a single GPIO (HIGH = sounding).

use crate::drivers::hw_init;
use crate::pins;

pub struct Buzzer {
    on: bool,
}

impl Buzzer {
    pub fn new() -> Self {
        Self { on: false }
    }

    pub fn on(&mut self) {
        hw_init::gpio_write(pins::BUZZER_GPIO, true);
        self.on = true;
    }

    pub fn off(&mut self) {
        hw_init::gpio_write(pins::BUZZER_GPIO, false);
        self.on = false;
    }

    pub fn is_on(&self) -> bool {
        self.on
    }
}

impl Default for Buzzer {
    fn default() -> Self {
        Self::new()
    }
}
