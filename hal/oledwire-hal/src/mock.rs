//! Recording controller for host-side tests
//!
//! [`RecordingTwi`] logs every action into a shared [`TwiLog`] instead of
//! touching hardware. The log also tracks whether the simulated peripheral
//! has an interrupt pending, so a test can play the role of the interrupt
//! vector:
//!
//! ```ignore
//! while log.borrow_mut().take_pending() {
//!     oled.on_interrupt();
//! }
//! ```

use core::cell::RefCell;

use heapless::Vec;

use crate::clock::BusTiming;
use crate::i2c::TwiController;

/// Maximum number of events a log holds
pub const LOG_CAPACITY: usize = 4096;

/// Maximum number of data bytes decoded per transfer
pub const TRANSFER_CAPACITY: usize = 256;

/// One controller action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TwiEvent {
    /// Peripheral enabled with the given timing
    Enable(BusTiming),
    /// Start condition requested
    Start,
    /// Address byte loaded
    Address(u8),
    /// Data byte loaded
    Byte(u8),
    /// Stop condition issued
    Stop,
}

/// Event log shared between a [`RecordingTwi`] and the test
#[derive(Debug, Default)]
pub struct TwiLog {
    events: Vec<TwiEvent, LOG_CAPACITY>,
    overflowed: bool,
    pending: bool,
}

impl TwiLog {
    /// Create an empty log
    pub const fn new() -> Self {
        Self {
            events: Vec::new(),
            overflowed: false,
            pending: false,
        }
    }

    /// All recorded events in order
    pub fn events(&self) -> &[TwiEvent] {
        &self.events
    }

    /// Whether events were dropped because the log was full
    pub fn overflowed(&self) -> bool {
        self.overflowed
    }

    /// Whether the simulated peripheral has an interrupt pending
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Acknowledge a pending interrupt, returning whether one was pending
    pub fn take_pending(&mut self) -> bool {
        core::mem::take(&mut self.pending)
    }

    /// Forget all recorded events
    pub fn clear(&mut self) {
        self.events.clear();
        self.overflowed = false;
    }

    /// Completed transfers (start through stop) in order
    pub fn transfers(&self) -> Transfers<'_> {
        Transfers {
            events: &self.events,
        }
    }

    fn record(&mut self, event: TwiEvent) {
        if self.events.push(event).is_err() {
            self.overflowed = true;
        }
    }
}

/// A decoded bus transfer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    /// Address byte as it went on the bus
    pub address: u8,
    /// Data bytes following the address
    pub bytes: Vec<u8, TRANSFER_CAPACITY>,
}

impl Transfer {
    /// 7-bit device address
    pub fn device_address(&self) -> u8 {
        self.address >> 1
    }
}

/// Iterator over completed transfers, see [`TwiLog::transfers`]
pub struct Transfers<'l> {
    events: &'l [TwiEvent],
}

impl Iterator for Transfers<'_> {
    type Item = Transfer;

    fn next(&mut self) -> Option<Transfer> {
        let start = self.events.iter().position(|e| *e == TwiEvent::Start)?;
        let rest = &self.events[start + 1..];
        let stop = rest.iter().position(|e| *e == TwiEvent::Stop)?;
        self.events = &rest[stop + 1..];

        let mut transfer = Transfer {
            address: 0,
            bytes: Vec::new(),
        };
        for event in &rest[..stop] {
            match *event {
                TwiEvent::Address(byte) => transfer.address = byte,
                TwiEvent::Byte(byte) => {
                    let _ = transfer.bytes.push(byte);
                }
                _ => {}
            }
        }
        Some(transfer)
    }
}

/// Controller that records actions into a [`TwiLog`]
pub struct RecordingTwi<'l> {
    log: &'l RefCell<TwiLog>,
}

impl<'l> RecordingTwi<'l> {
    /// Create a controller logging into `log`
    pub fn new(log: &'l RefCell<TwiLog>) -> Self {
        Self { log }
    }

    fn act(&mut self, event: TwiEvent, raises_interrupt: bool) {
        let mut log = self.log.borrow_mut();
        log.record(event);
        log.pending = raises_interrupt;
    }
}

impl TwiController for RecordingTwi<'_> {
    fn enable(&mut self, timing: BusTiming) {
        self.act(TwiEvent::Enable(timing), false);
    }

    fn start(&mut self) {
        self.act(TwiEvent::Start, true);
    }

    fn send_address(&mut self, byte: u8) {
        self.act(TwiEvent::Address(byte), true);
    }

    fn send_byte(&mut self, byte: u8) {
        self.act(TwiEvent::Byte(byte), true);
    }

    fn stop(&mut self) {
        self.act(TwiEvent::Stop, false);
    }
}
