//! Interrupt-driven SSD1306 driver core
//!
//! This crate contains everything above the chip's two-wire peripheral:
//!
//! - Single-slot transaction scheduler and its interrupt state machine
//! - Device lock shared between application and interrupt context
//! - Frame buffer and the page-by-page refresh pipeline
//! - Display configuration and command sequences
//! - Shape primitives (and an embedded-graphics target, feature `graphics`)
//!
//! The application owns a frame buffer and a [`TwiController`] and hands
//! both to an [`Oled`]. From then on only two entry points matter: drawing
//! and refreshing from the foreground, and [`Oled::on_interrupt`] from the
//! bus interrupt.
//!
//! ```ignore
//! let oled = Oled::new(DisplayConfig::SSD1306_128X64.with_frequency(200_000), &mut FRAME, twi)?;
//! oled.init()?;
//!
//! oled.draw(|fb| {
//!     graphics::rectangle(fb, Rect::new(0, 0, 127, 63), DrawParams::FILL)?;
//!     graphics::rectangle(fb, Rect::new(2, 2, 125, 61), DrawParams::FILL | DrawParams::COLOR)
//! })?;
//! oled.refresh();
//! ```
//!
//! [`TwiController`]: oledwire_hal::TwiController

#![no_std]
#![deny(unsafe_code)]

pub mod bus;
pub mod command;
pub mod config;
pub mod display;
pub mod error;
pub mod framebuffer;
pub mod graphics;
pub mod lock;

pub use config::DisplayConfig;
pub use display::{Continuation, FrameGuard, Oled};
pub use error::{ConfigError, Error};
pub use framebuffer::FrameBuffer;
pub use graphics::{DrawParams, Rect};
pub use lock::{DeviceLock, LockState};
