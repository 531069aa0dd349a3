//! oledwire Hardware Abstraction Layer
//!
//! This crate defines the register-level contract between the interrupt-driven
//! transaction engine in `oledwire-core` and a chip's two-wire (TWI / I2C)
//! peripheral, plus the pure arithmetic that programs the bus clock.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  oledwire-core (scheduler, pipeline)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  oledwire-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  chip TWI peripheral (application)      │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Contents
//!
//! - [`i2c::TwiController`] - one-action-per-event controller interface
//! - [`i2c::I2cConfig`] - bus frequency presets
//! - [`clock::BusTiming`] - bit-rate divisor and prescaler selection
//! - `mock::RecordingTwi` - event-recording controller (feature `mock`)

#![no_std]
#![deny(unsafe_code)]

pub mod clock;
pub mod i2c;
#[cfg(feature = "mock")]
pub mod mock;

// Re-export key types at crate root for convenience
pub use clock::{BusTiming, Prescaler, Saturation};
pub use i2c::{I2cConfig, TwiController};
