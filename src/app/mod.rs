//! Application core: pure domain logic, zero I/O.
//!
//! The thermostat rules (setpoint decode, smoothing, dead-band control,
//! sensor-loss supervision) live here.  All interaction with hardware
//! happens through **port traits** defined in [`ports`], keeping this layer
//! fully testable without real peripherals.

pub mod events;
pub mod ports;
pub mod service;
