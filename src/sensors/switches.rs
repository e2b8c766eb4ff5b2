//! Setpoint DIP switches and the override trigger.
//!
//! All inputs are active-low with pull-ups: a closed switch reads LOW and
//! counts as set.  Switch `i` carries weight `1 << i`, so six switches give
//! a setpoint of 0–63 in the sensor's unit (°C).

use embedded_hal::digital::InputPin;

use crate::error::SensorError;
use crate::pins::SETPOINT_BITS;

/// Switch state decoded in one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub setpoint_c: u8,
    pub override_active: bool,
}

/// Decode electrical levels (`true` = HIGH) into a setpoint.
pub fn decode_setpoint(levels: [bool; SETPOINT_BITS]) -> u8 {
    levels
        .iter()
        .enumerate()
        .filter(|&(_, &high)| !high)
        .fold(0, |total, (i, _)| total | (1 << i))
}

pub struct SwitchBank<P> {
    setpoint: [P; SETPOINT_BITS],
    override_pin: P,
}

impl<P: InputPin> SwitchBank<P> {
    /// `setpoint` is in weight order (index 0 = weight 1).
    pub fn new(setpoint: [P; SETPOINT_BITS], override_pin: P) -> Self {
        Self {
            setpoint,
            override_pin,
        }
    }

    pub fn read(&mut self) -> Result<InputSnapshot, SensorError> {
        let mut levels = [true; SETPOINT_BITS];
        for (level, pin) in levels.iter_mut().zip(self.setpoint.iter_mut()) {
            *level = pin.is_high().map_err(|_| SensorError::InputReadFailed)?;
        }
        let override_active = self
            .override_pin
            .is_low()
            .map_err(|_| SensorError::InputReadFailed)?;
        Ok(InputSnapshot {
            setpoint_c: decode_setpoint(levels),
            override_active,
        })
    }
}
