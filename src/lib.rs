//! Door-lock firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection.  Both nodes (`door-control`, `door-hmi`) are built from it.
//! All ESP-IDF-specific code is guarded by `#[cfg(target_os = "espidf")]`
//! within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod error;
pub mod pins;
pub mod protocol;

// The drivers and adapters carry host stand-ins next to the ESP-IDF
// implementations, so the crate builds and tests off-target.
pub mod adapters;
pub mod drivers;
