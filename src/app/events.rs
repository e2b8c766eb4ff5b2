//! Outbound application events.
//!
//! The [`ThermostatService`](super::service::ThermostatService) emits these
//! through the [`EventSink`](super::ports::EventSink) port.  Adapters on
//! the other side decide what to do with them: print the status line on
//! the serial transport, mirror to the log, etc.

use serde::Serialize;

use crate::control::CoilState;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Startup finished; the coil is off and the smoothing buffer is primed.
    Started,

    /// The coil output changed.
    CoilChanged {
        from: CoilState,
        to: CoilState,
        cause: SwitchCause,
    },

    /// One status snapshot per control iteration.
    Status(StatusReport),

    /// Too many consecutive temperature reads failed.
    SensorLost,

    /// A temperature read succeeded after the sensor was declared lost.
    SensorRecovered,
}

/// Why the coil changed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SwitchCause {
    Temperature,
    Override,
    SensorLoss,
}

/// A point-in-time snapshot of one control iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub setpoint_c: u8,
    /// Raw sensor byte, `None` if this iteration's read failed.
    pub raw_c: Option<u8>,
    /// Boxcar-smoothed temperature used by the controller, `None` until
    /// the first good sample.
    pub smoothed_c: Option<u8>,
    pub override_active: bool,
    pub coil: CoilState,
    /// Latched safety fault bitmask (0 = healthy).
    pub fault_flags: u8,
    pub uptime_ms: u32,
}
