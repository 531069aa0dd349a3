//! Device lock
//!
//! Serializes access to the frame buffer and the display command sequence
//! between foreground code and the bus interrupt. It is a spin lock with an
//! extra ownership state: a foreground holder can hand the lock over to work
//! that finishes in interrupt context ([`DeviceLock::transfer`]), and that
//! work releases it when its last transaction completes.
//!
//! ```text
//!           try_acquire             transfer
//!   Free ──────────────► Held ───────────────► Deferred
//!    ▲                    │                       │
//!    └──── release ───────┴────── release ────────┘
//!          (guard drop)       (final continuation)
//! ```
//!
//! The lock is neither reentrant nor fair.

use portable_atomic::{AtomicU8, Ordering};

/// Who owns the lock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum LockState {
    /// Nobody
    Free = 0,
    /// A foreground caller
    Held = 1,
    /// A chain of bus transactions; released from interrupt context
    Deferred = 2,
}

impl LockState {
    fn from_bits(bits: u8) -> Self {
        match bits {
            0 => LockState::Free,
            1 => LockState::Held,
            _ => LockState::Deferred,
        }
    }
}

/// Spin lock guarding the frame buffer and the command sequence
#[derive(Debug)]
pub struct DeviceLock {
    state: AtomicU8,
}

impl Default for DeviceLock {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceLock {
    /// Create a free lock
    pub const fn new() -> Self {
        Self {
            state: AtomicU8::new(LockState::Free as u8),
        }
    }

    /// Current owner
    pub fn state(&self) -> LockState {
        LockState::from_bits(self.state.load(Ordering::Acquire))
    }

    /// Check if anyone owns the lock
    pub fn is_locked(&self) -> bool {
        self.state() != LockState::Free
    }

    /// Take the lock if it is free
    ///
    /// The test-and-set is a single indivisible operation; on targets
    /// without compare-and-swap it runs with interrupts masked.
    pub fn try_acquire(&self) -> bool {
        self.state
            .compare_exchange(
                LockState::Free as u8,
                LockState::Held as u8,
                Ordering::Acquire,
                Ordering::Relaxed,
            )
            .is_ok()
    }

    /// Spin until the lock is taken, calling `relax` between attempts
    ///
    /// Must not be called from interrupt context: the holder may be waiting
    /// for that very interrupt to release it.
    pub fn acquire_with(&self, mut relax: impl FnMut()) {
        while !self.try_acquire() {
            relax();
        }
    }

    /// Spin until the lock is taken
    pub fn acquire(&self) {
        self.acquire_with(core::hint::spin_loop);
    }

    /// Hand a held lock over to pending bus work
    ///
    /// Returns false (and changes nothing) if the lock was not
    /// [`LockState::Held`].
    pub fn transfer(&self) -> bool {
        self.state
            .compare_exchange(
                LockState::Held as u8,
                LockState::Deferred as u8,
                Ordering::AcqRel,
                Ordering::Relaxed,
            )
            .is_ok()
    }

    /// Free the lock; callable from foreground or interrupt context
    pub fn release(&self) {
        self.state.store(LockState::Free as u8, Ordering::Release);
    }
}
