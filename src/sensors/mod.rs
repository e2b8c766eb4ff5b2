//! Sensor subsystem: TC74 acquisition, smoothing, and the switch inputs.

pub mod smoothing;
pub mod switches;
pub mod temperature;

pub use smoothing::{MovingAverage, SMOOTHING_DEPTH};
pub use switches::{InputSnapshot, SwitchBank, decode_setpoint};
pub use temperature::Tc74;
