//! Error types

use core::fmt;

/// Errors reported by display operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Coordinates outside the display with nothing usable left after clamping
    OutOfBounds,
    /// Illegal parameter combination (e.g. unknown color/fill bits)
    InvalidParams,
    /// The transaction scheduler already has a transaction in flight
    Busy,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::OutOfBounds => f.write_str("coordinates out of bounds"),
            Error::InvalidParams => f.write_str("invalid parameters"),
            Error::Busy => f.write_str("bus busy"),
        }
    }
}

/// Errors detected while validating a [`DisplayConfig`](crate::config::DisplayConfig)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Width or height is zero
    ZeroSize,
    /// Height is not a multiple of the 8-pixel page height
    HeightNotPageAligned,
    /// More pages than the page-select command can address
    TooManyPages,
    /// Bus address does not fit in 7 bits
    InvalidAddress,
    /// Frame buffer shorter than `width * height / 8` bytes
    BufferTooSmall {
        /// Bytes required
        required: usize,
        /// Bytes provided
        provided: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroSize => f.write_str("display size is zero"),
            ConfigError::HeightNotPageAligned => f.write_str("height is not a multiple of 8"),
            ConfigError::TooManyPages => f.write_str("height exceeds 16 pages"),
            ConfigError::InvalidAddress => f.write_str("bus address exceeds 7 bits"),
            ConfigError::BufferTooSmall { required, provided } => write!(
                f,
                "frame buffer too small: {} bytes required, {} provided",
                required, provided
            ),
        }
    }
}
