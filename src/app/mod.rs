//! Application core — pure domain logic, zero direct I/O.
//!
//! This module contains the access rules for both nodes: the control
//! node's [`controller`] and [`service`] loop, the keypad node's
//! [`agent`], the shared attempt policy, and the timed actuation
//! sequences.  All interaction with hardware happens through **port
//! traits** defined in [`ports`], keeping this layer fully testable
//! without real peripherals.

pub mod agent;
pub mod attempts;
pub mod controller;
pub mod credential;
pub mod events;
pub mod ports;
pub mod sequencer;
pub mod service;
