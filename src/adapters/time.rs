//! Uptime adapter.
//!
//! Implements [`TimePort`] on top of a [`Tick`] counter.  On target this
//! is the process-wide [`TICK`](crate::drivers::hw_timer::TICK) driven by
//! the periodic timer; tests can hand in their own.

use crate::app::ports::TimePort;
use crate::drivers::tick::Tick;

pub struct TickClock {
    tick: &'static Tick,
}

impl TickClock {
    pub const fn new(tick: &'static Tick) -> Self {
        Self { tick }
    }

    /// Whole seconds since boot.
    pub fn uptime_secs(&self) -> u32 {
        self.tick.seconds()
    }
}

impl TimePort for TickClock {
    fn uptime_ms(&self) -> u32 {
        self.tick.uptime_ms()
    }
}
