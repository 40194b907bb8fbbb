//! Actuator drivers, the credential EEPROM, the seconds timer, and
//! hardware initialisation.

pub mod buzzer;
pub mod door_motor;
pub mod eeprom;
pub mod hw_init;
pub mod hw_timer;
