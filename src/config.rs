//! System configuration parameters
//!
//! All tunable parameters for the thermostat.  Values are fixed at build
//! time; the defaults reproduce the shipped appliance behaviour.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Microseconds added to the tick accumulator on every timer compare.
pub const TICK_US_PER_COMPARE: u16 = 128;

/// Firmware banner sent over the serial line at boot.
pub const BANNER: &str = "Therm 1.0\r\n";

/// What the receive interrupt does when the ring is already full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverflowPolicy {
    /// Advance the head anyway.  The head lands on the tail, the ring
    /// reads as empty and every buffered byte is lost.
    Overwrite,
    /// Keep the buffered bytes and discard the incoming one.
    DropNewest,
}

/// What the status sink does when the transmit ring is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxBackpressure {
    /// Spin until the transmit interrupt frees a slot.
    Block,
    /// Discard the byte and count it.
    Drop,
}

/// How the coil reacts once the temperature sensor is declared lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SensorLossPolicy {
    /// Keep the last smoothed temperature and let the hysteresis hold.
    HoldLast,
    /// De-energize the coil until the sensor recovers.  Override still wins.
    ForceOff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Serial frame format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UartConfig {
    pub baud: u32,
    pub data_bits: u8,
    pub stop_bits: u8,
    pub parity: Parity,
}

impl Default for UartConfig {
    fn default() -> Self {
        Self {
            baud: 9600,
            data_bits: 8,
            stop_bits: 1,
            parity: Parity::None,
        }
    }
}

/// Core thermostat configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThermostatConfig {
    // --- Control ---
    /// Degrees below the setpoint the temperature must fall before the
    /// coil is released.
    pub hysteresis_c: u8,
    /// Sleep between control iterations (milliseconds).
    pub loop_interval_ms: u32,

    // --- Sensor bus ---
    /// 7-bit address of the TC74 (0x48 for the A0 variant).
    pub sensor_address: u8,
    /// Settling delay for every bus line transition (microseconds).
    pub bus_bit_delay_us: u32,
    /// Longest wait for SCL to read high after release.  0 disables the check.
    pub bus_stretch_timeout_us: u32,

    // --- Warm-up ---
    /// Readings thrown away after power-up before the buffer is preloaded.
    pub warmup_discard_reads: u8,
    /// Delay after each discarded reading (milliseconds).
    pub warmup_delay_ms: u32,

    // --- Safety ---
    /// Consecutive failed reads before the sensor is declared lost.
    pub sensor_loss_threshold: u8,
    pub sensor_loss_policy: SensorLossPolicy,

    // --- Serial ---
    pub uart: UartConfig,
    pub rx_overflow_policy: OverflowPolicy,
    pub tx_backpressure: TxBackpressure,
}

impl Default for ThermostatConfig {
    fn default() -> Self {
        Self {
            // Control
            hysteresis_c: 2,
            loop_interval_ms: 500,

            // Sensor bus
            sensor_address: 0x48,
            bus_bit_delay_us: 1000,
            bus_stretch_timeout_us: 5000,

            // Warm-up
            warmup_discard_reads: 2,
            warmup_delay_ms: 10,

            // Safety
            sensor_loss_threshold: 3,
            sensor_loss_policy: SensorLossPolicy::ForceOff,

            // Serial
            uart: UartConfig::default(),
            rx_overflow_policy: OverflowPolicy::Overwrite,
            tx_backpressure: TxBackpressure::Block,
        }
    }
}

impl ThermostatConfig {
    /// 8-bit address byte used to read the sensor (R/W bit set).
    pub const fn sensor_read_address(&self) -> u8 {
        (self.sensor_address << 1) | 1
    }

    /// Reject values the firmware cannot operate with.
    pub fn validate(&self) -> Result<()> {
        if self.sensor_address > 0x7F {
            return Err(Error::Config("sensor_address must be a 7-bit address"));
        }
        if self.bus_bit_delay_us == 0 {
            return Err(Error::Config("bus_bit_delay_us must be non-zero"));
        }
        if self.bus_stretch_timeout_us != 0 && self.bus_stretch_timeout_us < self.bus_bit_delay_us {
            return Err(Error::Config(
                "bus_stretch_timeout_us must be 0 or at least bus_bit_delay_us",
            ));
        }
        if self.loop_interval_ms == 0 {
            return Err(Error::Config("loop_interval_ms must be non-zero"));
        }
        if self.sensor_loss_threshold == 0 {
            return Err(Error::Config("sensor_loss_threshold must be at least 1"));
        }
        if self.uart.baud == 0 {
            return Err(Error::Config("uart.baud must be non-zero"));
        }
        if !(5..=9).contains(&self.uart.data_bits) {
            return Err(Error::Config("uart.data_bits must be 5..=9"));
        }
        if !(1..=2).contains(&self.uart.stop_bits) {
            return Err(Error::Config("uart.stop_bits must be 1 or 2"));
        }
        Ok(())
    }
}
