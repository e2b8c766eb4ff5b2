//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the `log` facade (the ESP-IDF logger on target).  This is separate from
//! the serial status line; both can run side by side.

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Status(s) => {
                let raw = s.raw_c.map_or(-1, i16::from);
                let avg = s.smoothed_c.map_or(-1, i16::from);
                debug!(
                    "STATUS | sp={}\u{00b0}C raw={} avg={}\u{00b0}C | override={} coil={:?} | \
                     faults=0b{:08b} | up={}ms",
                    s.setpoint_c, raw, avg, s.override_active, s.coil, s.fault_flags, s.uptime_ms,
                );
            }
            AppEvent::CoilChanged { from, to, cause } => {
                info!("COIL | {:?} -> {:?} ({:?})", from, to, cause);
            }
            AppEvent::SensorLost => {
                warn!("SENSOR | lost");
            }
            AppEvent::SensorRecovered => {
                info!("SENSOR | recovered");
            }
            AppEvent::Started => {
                info!("START | coil off, warming up");
            }
        }
    }
}
