//! Free-running uptime counter fed by a periodic compare interrupt.
//!
//! Every compare adds a fixed number of microseconds to a private
//! accumulator; each whole millisecond bumps a single millisecond counter.
//! Seconds and milliseconds are both derived from that one counter, so a
//! foreground read is always consistent.  All stores happen in the
//! interrupt; the foreground only loads.
//!
//! Informational only: the control loop never consumes it.

use core::sync::atomic::{AtomicU16, AtomicU32, Ordering};

pub struct Tick {
    us_per_compare: u16,
    micros: AtomicU16,
    uptime_ms: AtomicU32,
}

impl Tick {
    pub const fn new(us_per_compare: u16) -> Self {
        Self {
            us_per_compare,
            micros: AtomicU16::new(0),
            uptime_ms: AtomicU32::new(0),
        }
    }

    /// Compare-match handler.
    pub fn on_compare(&self) {
        let mut us =
            u32::from(self.micros.load(Ordering::Relaxed)) + u32::from(self.us_per_compare);
        if us >= 1000 {
            self.uptime_ms.fetch_add(us / 1000, Ordering::Release);
            us %= 1000;
        }
        self.micros.store(us as u16, Ordering::Relaxed);
    }

    /// Milliseconds since start (wraps after ~49 days).
    pub fn uptime_ms(&self) -> u32 {
        self.uptime_ms.load(Ordering::Acquire)
    }

    /// Millisecond part of the current second.
    pub fn millis(&self) -> u16 {
        (self.uptime_ms() % 1000) as u16
    }

    pub fn seconds(&self) -> u32 {
        self.uptime_ms() / 1000
    }
}
