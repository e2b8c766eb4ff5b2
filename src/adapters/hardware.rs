//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the TC74 bus, the switch bank and the coil driver, exposing them
//! through [`SensorPort`] and [`ActuatorPort`].  Generic over the
//! `embedded-hal` pin and delay types, so the same adapter runs on the
//! board and against simulated lines in tests.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::app::ports::{ActuatorPort, SensorPort};
use crate::drivers::coil::CoilDriver;
use crate::error::{ActuatorError, SensorError};
use crate::sensors::{InputSnapshot, SwitchBank, Tc74};

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<SDA, SCL, D, IN, OUT> {
    sensor: Tc74<SDA, SCL, D>,
    switches: SwitchBank<IN>,
    coil: CoilDriver<OUT>,
}

impl<SDA, SCL, D, IN, OUT> HardwareAdapter<SDA, SCL, D, IN, OUT> {
    pub fn new(sensor: Tc74<SDA, SCL, D>, switches: SwitchBank<IN>, coil: CoilDriver<OUT>) -> Self {
        Self {
            sensor,
            switches,
            coil,
        }
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<SDA, SCL, D, IN, OUT> SensorPort for HardwareAdapter<SDA, SCL, D, IN, OUT>
where
    SDA: InputPin + OutputPin,
    SCL: InputPin + OutputPin,
    D: DelayNs,
    IN: InputPin,
{
    fn read_inputs(&mut self) -> Result<InputSnapshot, SensorError> {
        self.switches.read()
    }

    fn read_raw_temperature(&mut self) -> Result<u8, SensorError> {
        self.sensor.read_raw()
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<SDA, SCL, D, IN, OUT> ActuatorPort for HardwareAdapter<SDA, SCL, D, IN, OUT>
where
    OUT: OutputPin,
{
    fn set_coil(&mut self, energized: bool) -> Result<(), ActuatorError> {
        self.coil.set(energized)
    }

    fn is_coil_on(&self) -> bool {
        self.coil.is_energized()
    }
}
