//! Two-wire bus abstractions
//!
//! Provides the controller trait the interrupt-driven transaction engine
//! drives, one bus action per hardware event.

use crate::clock::BusTiming;

/// Two-wire bus controller, master transmitter side
///
/// Every method performs exactly one register-level action and returns
/// immediately. Apart from [`stop`](Self::stop), each action ends with the
/// peripheral raising its interrupt once the bus has carried it out; the
/// interrupt handler then advances the transaction by calling back into
/// this trait.
///
/// Implementations must not block and must be callable from interrupt
/// context.
pub trait TwiController {
    /// Power the peripheral, program the bit-rate registers and enable
    /// the bus interrupt
    fn enable(&mut self, timing: BusTiming);

    /// Request a start condition
    fn start(&mut self);

    /// Load the address byte and clear the pending start request
    ///
    /// # Arguments
    /// * `byte` - 7-bit address shifted left, direction bit in bit 0
    fn send_address(&mut self, byte: u8);

    /// Load the next data byte
    fn send_byte(&mut self, byte: u8);

    /// Issue a stop condition, releasing the bus
    fn stop(&mut self);
}

impl<T: TwiController + ?Sized> TwiController for &mut T {
    fn enable(&mut self, timing: BusTiming) {
        (**self).enable(timing)
    }

    fn start(&mut self) {
        (**self).start()
    }

    fn send_address(&mut self, byte: u8) {
        (**self).send_address(byte)
    }

    fn send_byte(&mut self, byte: u8) {
        (**self).send_byte(byte)
    }

    fn stop(&mut self) {
        (**self).stop()
    }
}

/// I2C configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct I2cConfig {
    /// Clock frequency in Hz
    pub frequency: u32,
}

impl Default for I2cConfig {
    fn default() -> Self {
        Self {
            frequency: 100_000, // 100kHz standard mode
        }
    }
}

impl I2cConfig {
    /// Standard mode (100 kHz)
    pub const STANDARD: Self = Self { frequency: 100_000 };

    /// Fast mode (400 kHz)
    pub const FAST: Self = Self { frequency: 400_000 };

    /// Fast mode plus (1 MHz)
    pub const FAST_PLUS: Self = Self {
        frequency: 1_000_000,
    };

    /// Custom frequency
    pub const fn with_frequency(frequency: u32) -> Self {
        Self { frequency }
    }

    /// Register values for this frequency given the CPU clock
    pub const fn timing(&self, cpu_hz: u32) -> BusTiming {
        BusTiming::from_frequency(cpu_hz, self.frequency)
    }
}
