//! TC74 digital temperature sensor on the bit-banged two-wire bus.
//!
//! A reading is one transaction:
//!
//! ```text
//!  START · addr|R · (slave ACK) · data byte · (master NACK) · STOP
//! ```
//!
//! The data byte is the temperature in whole degrees Celsius.  Unlike the
//! bare transaction, a missing sensor is detected through the address NACK
//! and reported rather than returned as a plausible-looking byte.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use log::debug;

use crate::drivers::i2c_bang::{Ack, BitBangBus};
use crate::error::{BusError, SensorError};

pub struct Tc74<SDA, SCL, D> {
    bus: BitBangBus<SDA, SCL, D>,
    read_address: u8,
}

impl<SDA, SCL, D> Tc74<SDA, SCL, D>
where
    SDA: InputPin + OutputPin,
    SCL: InputPin + OutputPin,
    D: DelayNs,
{
    /// Wrap a bus.  `read_address` is the 8-bit address byte with the R/W
    /// bit set, see [`ThermostatConfig::sensor_read_address`].
    ///
    /// [`ThermostatConfig::sensor_read_address`]: crate::config::ThermostatConfig::sensor_read_address
    pub fn new(bus: BitBangBus<SDA, SCL, D>, read_address: u8) -> Self {
        Self { bus, read_address }
    }

    /// Read the raw temperature byte.
    pub fn read_raw(&mut self) -> Result<u8, SensorError> {
        let result = self.transaction();
        if result.is_err() {
            // Best effort: leave the bus idle for the next attempt.
            let _ = self.bus.stop();
        }
        result
    }

    fn transaction(&mut self) -> Result<u8, SensorError> {
        self.bus.start()?;
        if !self.bus.write_byte(self.read_address)?.is_ack() {
            debug!("tc74: no ACK for 0x{:02X}", self.read_address);
            return Err(BusError::AddressNack.into());
        }
        let raw = self.bus.read_byte(Ack::Nack)?;
        self.bus.stop()?;
        Ok(raw)
    }
}
