//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ThermostatService (domain)
//! ```
//!
//! Driven adapters (sensor bus, switches, coil, serial status line, log)
//! implement these traits.  The
//! [`ThermostatService`](super::service::ThermostatService) consumes them
//! via generics, so the domain core never touches hardware directly.

use crate::error::{ActuatorError, SensorError};
use crate::sensors::InputSnapshot;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this to obtain inputs.
pub trait SensorPort {
    /// Decode the setpoint switches and the override input.
    fn read_inputs(&mut self) -> Result<InputSnapshot, SensorError>;

    /// One raw temperature byte from the sensor (unsmoothed).
    fn read_raw_temperature(&mut self) -> Result<u8, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to drive the relay coil.
pub trait ActuatorPort {
    /// `true` energizes the coil.
    fn set_coil(&mut self, energized: bool) -> Result<(), ActuatorError>;

    fn is_coil_on(&self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → serial / logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

/// Fan one event out to two sinks, first `A` then `B`.
impl<A: EventSink, B: EventSink> EventSink for (A, B) {
    fn emit(&mut self, event: &super::events::AppEvent) {
        self.0.emit(event);
        self.1.emit(event);
    }
}

// ───────────────────────────────────────────────────────────────
// Time port
// ───────────────────────────────────────────────────────────────

/// Monotonic uptime, used only to stamp status reports.
pub trait TimePort {
    /// Milliseconds since boot (wraps at `u32::MAX`).
    fn uptime_ms(&self) -> u32;
}
