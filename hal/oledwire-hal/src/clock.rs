//! Bus clock configuration
//!
//! The bus frequency of a TWI master is
//!
//! ```text
//! f_scl = f_cpu / (16 + 2 * divisor * 4^prescaler)
//! ```
//!
//! where `divisor` is an 8-bit register and `prescaler` a 2-bit selector.
//! [`BusTiming::from_frequency`] picks the smallest prescaler that lets the
//! divisor fit in eight bits.
//!
//! # Limitations
//!
//! There is no error path. A frequency slower than the slowest setting
//! (divisor 255 at prescaler 64) clamps to that setting, and a frequency
//! faster than `f_cpu / 16` clamps to divisor 0. Either case is recorded in
//! [`BusTiming::saturation`] so callers can tell the bus will not run at the
//! rate they asked for.

/// Offset subtracted from the half-period count; the peripheral adds 16
/// clock cycles of its own to every bit
const FIXED_HALF_CYCLES: u32 = 8;

/// Largest value of the 8-bit divisor register
const MAX_DIVISOR: u32 = u8::MAX as u32;

/// Prescaler selector (two bits in the status register)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Prescaler {
    /// Divide by 1
    Div1 = 0,
    /// Divide by 4
    Div4 = 1,
    /// Divide by 16
    Div16 = 2,
    /// Divide by 64
    Div64 = 3,
}

impl Prescaler {
    /// Largest prescaler
    pub const MAX: Self = Prescaler::Div64;

    /// Register bits
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Division factor (`4^bits`)
    pub const fn factor(self) -> u32 {
        1 << (2 * self as u32)
    }

    /// The prescaler one step above, if any
    const fn next(self) -> Option<Self> {
        match self {
            Prescaler::Div1 => Some(Prescaler::Div4),
            Prescaler::Div4 => Some(Prescaler::Div16),
            Prescaler::Div16 => Some(Prescaler::Div64),
            Prescaler::Div64 => None,
        }
    }
}

/// Why a requested frequency could not be represented exactly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Saturation {
    /// Requested frequency above `f_cpu / 16`; divisor clamped to 0
    TooFast,
    /// Requested frequency below the slowest setting (or zero); divisor
    /// clamped to 255 at the largest prescaler
    TooSlow,
}

/// Bit-rate register values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusTiming {
    /// Bit-rate divisor register value
    pub divisor: u8,
    /// Prescaler selector
    pub prescaler: Prescaler,
    /// Set when the requested frequency was out of range
    pub saturation: Option<Saturation>,
}

impl BusTiming {
    /// Slowest representable setting
    pub const SLOWEST: Self = Self {
        divisor: u8::MAX,
        prescaler: Prescaler::MAX,
        saturation: None,
    };

    /// Compute register values for `bus_hz` with the CPU running at `cpu_hz`
    pub const fn from_frequency(cpu_hz: u32, bus_hz: u32) -> Self {
        if bus_hz == 0 {
            return Self::SLOWEST.saturated(Saturation::TooSlow);
        }

        let half_period = (cpu_hz as u64 / (2 * bus_hz as u64)) as u32;
        if half_period < FIXED_HALF_CYCLES {
            return Self {
                divisor: 0,
                prescaler: Prescaler::Div1,
                saturation: Some(Saturation::TooFast),
            };
        }

        let mut divisor = half_period - FIXED_HALF_CYCLES;
        let mut prescaler = Prescaler::Div1;
        while divisor > MAX_DIVISOR {
            match prescaler.next() {
                Some(next) => {
                    prescaler = next;
                    divisor /= 4;
                }
                None => return Self::SLOWEST.saturated(Saturation::TooSlow),
            }
        }

        Self {
            divisor: divisor as u8,
            prescaler,
            saturation: None,
        }
    }

    const fn saturated(self, saturation: Saturation) -> Self {
        Self {
            saturation: Some(saturation),
            ..self
        }
    }

    /// Whether the requested frequency was representable
    pub const fn is_exact(&self) -> bool {
        self.saturation.is_none()
    }

    /// Bus frequency these register values actually produce
    pub const fn frequency(&self, cpu_hz: u32) -> u32 {
        cpu_hz / (2 * FIXED_HALF_CYCLES + 2 * self.divisor as u32 * self.prescaler.factor())
    }
}
