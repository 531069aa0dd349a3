//! SSD1306 device handle
//!
//! [`Oled`] ties together the frame buffer, the device lock and the shared
//! bus scheduler. Every method takes `&self`, so one handle can live in a
//! `static` and be used from both the application and the bus interrupt:
//!
//! ```ignore
//! static OLED: StaticCell<Oled<'static, Twi>> = StaticCell::new();
//!
//! let oled = OLED.init(Oled::new(DisplayConfig::SSD1306_128X64, frame, twi)?);
//! oled.init()?;
//!
//! oled.draw(|fb| fb.set_pixel(10, 10, true))?;
//! oled.refresh(); // returns once the first page is queued
//!
//! #[interrupt]
//! fn TWI() {
//!     oled().on_interrupt();
//! }
//! ```
//!
//! # Contexts
//!
//! [`Oled::on_interrupt`] and the continuations it runs are the only code
//! meant for interrupt context. Everything that takes the device lock
//! (`lock`, `draw`, `refresh`, `set_*`) spins and must only be called from
//! the foreground.
//!
//! # Limitations
//!
//! Bus errors are not modeled: once a transaction is accepted it is assumed
//! to reach the display.

mod cell;
mod guard;
mod pipeline;

use oledwire_hal::TwiController;
use portable_atomic::{AtomicU8, Ordering};

pub use guard::FrameGuard;
pub use pipeline::Continuation;

use self::cell::FrameCell;
use crate::bus::{SharedBus, TxState};
use crate::command;
use crate::config::DisplayConfig;
use crate::error::{ConfigError, Error};
use crate::framebuffer::FrameBuffer;
use crate::lock::{DeviceLock, LockState};

/// SSD1306 display on a two-wire bus
pub struct Oled<'a, C> {
    config: DisplayConfig,
    bus: SharedBus<'a, C, Continuation>,
    lock: DeviceLock,
    current_page: AtomicU8,
    frame: FrameCell<'a>,
}

impl<'a, C> Oled<'a, C> {
    /// Create a handle over a caller-owned frame buffer
    ///
    /// Does not touch the hardware; call [`Oled::init`] once the handle is
    /// reachable from the bus interrupt.
    pub fn new(config: DisplayConfig, frame: &'a mut [u8], controller: C) -> Result<Self, ConfigError> {
        config.validate()?;
        config.check_buffer(frame.len())?;

        Ok(Self {
            config,
            bus: SharedBus::new(controller),
            lock: DeviceLock::new(),
            current_page: AtomicU8::new(0),
            frame: FrameCell::new(frame),
        })
    }

    /// Configuration this handle was created with
    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    /// Width in pixels
    pub fn width(&self) -> u8 {
        self.config.width
    }

    /// Height in pixels
    pub fn height(&self) -> u8 {
        self.config.height
    }

    /// Number of 8-pixel pages
    pub fn num_pages(&self) -> u8 {
        self.config.num_pages()
    }

    /// Page the refresh pipeline will write next
    pub fn current_page(&self) -> u8 {
        self.current_page.load(Ordering::Relaxed)
    }

    /// Current owner of the device lock
    pub fn lock_state(&self) -> LockState {
        self.lock.state()
    }

    /// State of the bus scheduler
    pub fn bus_state(&self) -> TxState {
        self.bus.state()
    }

    /// Check if a refresh or command is still in progress
    pub fn is_busy(&self) -> bool {
        self.lock.is_locked() || !self.bus.is_idle()
    }

    /// Take the device lock if it is free
    pub fn try_lock(&self) -> Option<FrameGuard<'_, 'a, C>> {
        if self.lock.try_acquire() {
            Some(self.guard())
        } else {
            None
        }
    }

    /// Spin until the device lock is free, calling `relax` between attempts
    pub fn lock_with(&self, relax: impl FnMut()) -> FrameGuard<'_, 'a, C> {
        self.lock.acquire_with(relax);
        self.guard()
    }

    /// Spin until the device lock is free
    ///
    /// Waits for any refresh in progress to finish.
    pub fn lock(&self) -> FrameGuard<'_, 'a, C> {
        self.lock_with(core::hint::spin_loop)
    }

    /// Run `f` on the frame buffer with the device lock held
    ///
    /// The view handed to `f` cannot outlive the call.
    pub fn draw<R>(&self, f: impl FnOnce(&mut FrameBuffer<'_>) -> R) -> R {
        let mut guard = self.lock();
        f(&mut guard.frame())
    }

    /// Build a guard for a lock the caller has just taken
    fn guard(&self) -> FrameGuard<'_, 'a, C> {
        // SAFETY: the lock is `Held` by the caller and the guard is the only
        // view until it is dropped or handed to the pipeline.
        #[allow(unsafe_code)]
        let buf = unsafe { self.frame.view_mut() };
        FrameGuard {
            oled: self,
            frame: FrameBuffer::from_validated(buf, self.config.width, self.config.height),
        }
    }
}

impl<'a, C> Oled<'a, C>
where
    C: TwiController,
{
    /// Program bus timing and send the power-on sequence
    ///
    /// Returns [`Error::Busy`] if the scheduler already has a transaction in
    /// flight.
    pub fn init(&self) -> Result<(), Error> {
        if !self.bus.is_idle() {
            return Err(Error::Busy);
        }

        let timing = self.config.timing();
        #[cfg(feature = "defmt")]
        if let Some(saturation) = timing.saturation {
            defmt::warn!(
                "bus frequency {} Hz not representable ({}), running at {} Hz",
                self.config.bus.frequency,
                saturation,
                timing.frequency(self.config.cpu_hz)
            );
        }

        self.bus.enable(timing);
        self.current_page.store(0, Ordering::Relaxed);
        self.bus.submit(
            self.config.address,
            &command::INIT,
            &[],
            Continuation::Nothing,
            true,
        )?;

        #[cfg(feature = "defmt")]
        defmt::info!("display {=u8:#x} initializing", self.config.address);
        Ok(())
    }

    /// Bus interrupt entry point
    ///
    /// Advances the transaction in flight by one event and runs the
    /// continuation of a finished one.
    pub fn on_interrupt(&self) {
        if let Some(next) = self.bus.on_interrupt() {
            self.resume(next);
        }
    }

    /// Push the whole frame buffer to the display
    ///
    /// Waits for the device lock, then returns once the first transaction
    /// is accepted; the rest of the transfer runs from the bus interrupt.
    pub fn refresh(&self) {
        self.refresh_with(core::hint::spin_loop);
    }

    /// Like [`refresh`](Self::refresh), calling `relax` while waiting
    pub fn refresh_with(&self, mut relax: impl FnMut()) {
        self.lock_with(&mut relax).refresh_with(relax);
    }

    /// Set contrast (0-255)
    pub fn set_brightness(&self, level: u8) {
        self.set_brightness_with(level, core::hint::spin_loop);
    }

    /// Like [`set_brightness`](Self::set_brightness), calling `relax` while
    /// waiting
    pub fn set_brightness_with(&self, level: u8, relax: impl FnMut()) {
        self.command_with(&command::set_brightness(level), relax);
    }

    /// Turn the panel on or off
    pub fn set_display_on(&self, on: bool) {
        self.command_with(&command::display_on(on), core::hint::spin_loop);
    }

    /// Invert pixel polarity
    pub fn set_inverted(&self, inverted: bool) {
        self.command_with(&command::inverted(inverted), core::hint::spin_loop);
    }

    /// Send a command sequence under the device lock; the lock is released
    /// when the transaction completes
    fn command_with(&self, bytes: &[u8], mut relax: impl FnMut()) {
        self.lock.acquire_with(&mut relax);
        if self.lock.transfer() {
            self.submit_deferred(bytes, &[], Continuation::ReleaseLock, relax);
        }
    }
}
