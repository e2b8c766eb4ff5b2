//! Relay coil driver.
//!
//! Active-high digital output: HIGH energizes the coil.  The driver is a
//! dumb actuator; the control loop decides when to switch.

use embedded_hal::digital::OutputPin;
use log::debug;

use crate::error::ActuatorError;

pub struct CoilDriver<P> {
    pin: P,
    energized: bool,
}

impl<P: OutputPin> CoilDriver<P> {
    /// Take the pin and drive it low (coil off).
    pub fn new(mut pin: P) -> Result<Self, ActuatorError> {
        pin.set_low().map_err(|_| ActuatorError::GpioWriteFailed)?;
        Ok(Self {
            pin,
            energized: false,
        })
    }

    pub fn set(&mut self, energized: bool) -> Result<(), ActuatorError> {
        if energized {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        }
        .map_err(|_| ActuatorError::GpioWriteFailed)?;
        if energized != self.energized {
            debug!("coil: {}", if energized { "energized" } else { "released" });
        }
        self.energized = energized;
        Ok(())
    }

    pub fn is_energized(&self) -> bool {
        self.energized
    }
}
