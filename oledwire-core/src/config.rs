//! Display configuration
//!
//! Geometry, bus address and bus timing inputs for an [`Oled`](crate::Oled).
//! Presets cover the common SSD1306 modules; anything else is built with the
//! `with_*` methods and checked by [`DisplayConfig::validate`].

use oledwire_hal::{BusTiming, I2cConfig};

use crate::error::ConfigError;

/// Pixel rows per controller page
pub const PAGE_HEIGHT: u8 = 8;

/// Pages the page-select command can address (a 4-bit index)
pub const MAX_PAGES: u8 = 16;

/// Default 7-bit address of SSD1306 modules (SA0 low)
pub const DEFAULT_ADDRESS: u8 = 0x3C;

/// Default CPU clock the bus timing is derived from
pub const DEFAULT_CPU_HZ: u32 = 16_000_000;

/// Display configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DisplayConfig {
    /// Width in pixels
    pub width: u8,
    /// Height in pixels (multiple of 8)
    pub height: u8,
    /// 7-bit bus address
    pub address: u8,
    /// Bus frequency
    pub bus: I2cConfig,
    /// CPU clock feeding the bus peripheral
    pub cpu_hz: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self::SSD1306_128X64
    }
}

impl DisplayConfig {
    /// 128x64 module at the default address
    pub const SSD1306_128X64: Self = Self::new(128, 64);

    /// 128x32 module at the default address
    pub const SSD1306_128X32: Self = Self::new(128, 32);

    /// Configuration for a `width` x `height` display with default address
    /// and timing
    pub const fn new(width: u8, height: u8) -> Self {
        Self {
            width,
            height,
            address: DEFAULT_ADDRESS,
            bus: I2cConfig::STANDARD,
            cpu_hz: DEFAULT_CPU_HZ,
        }
    }

    /// Set the 7-bit bus address
    pub const fn with_address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    /// Set the bus frequency in Hz
    pub const fn with_frequency(mut self, frequency: u32) -> Self {
        self.bus = I2cConfig::with_frequency(frequency);
        self
    }

    /// Set the CPU clock in Hz
    pub const fn with_cpu_hz(mut self, cpu_hz: u32) -> Self {
        self.cpu_hz = cpu_hz;
        self
    }

    /// Number of 8-pixel pages
    pub const fn num_pages(&self) -> u8 {
        self.height / PAGE_HEIGHT
    }

    /// Frame buffer size in bytes
    pub const fn buffer_len(&self) -> usize {
        self.width as usize * self.num_pages() as usize
    }

    /// Bus register values for this configuration
    pub const fn timing(&self) -> BusTiming {
        self.bus.timing(self.cpu_hz)
    }

    /// Check geometry and address
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::ZeroSize);
        }
        if self.height % PAGE_HEIGHT != 0 {
            return Err(ConfigError::HeightNotPageAligned);
        }
        if self.num_pages() > MAX_PAGES {
            return Err(ConfigError::TooManyPages);
        }
        if self.address > 0x7F {
            return Err(ConfigError::InvalidAddress);
        }
        Ok(())
    }

    /// Check a frame buffer length against this configuration
    pub fn check_buffer(&self, len: usize) -> Result<(), ConfigError> {
        let required = self.buffer_len();
        if len < required {
            return Err(ConfigError::BufferTooSmall {
                required,
                provided: len,
            });
        }
        Ok(())
    }
}
