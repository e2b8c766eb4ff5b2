//! Unified error types for the RelayTherm firmware.
//!
//! `Error` carries the failures that stop an operation: a coil write, the
//! serial transport, init and configuration.  Bus and sensor failures keep
//! their own types; the service folds them into the safety supervisor
//! instead of returning them.  Everything is `Copy`.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The coil output could not be driven.
    Actuator(ActuatorError),
    /// The serial byte transport rejected an operation.
    Transport(TransportError),
    /// Peripheral initialisation failed.
    Init(&'static str),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Actuator(e) => write!(f, "actuator: {e}"),
            Self::Transport(e) => write!(f, "transport: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Two-wire bus errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusError {
    /// A GPIO read or write on SDA/SCL returned an error.
    Line,
    /// SDA was held low when a START was about to be issued.
    BusBusy,
    /// SCL did not read high within the stretch timeout after release.
    ClockStretchTimeout,
    /// No slave acknowledged the address byte.
    AddressNack,
}

impl fmt::Display for BusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Line => write!(f, "line I/O failed"),
            Self::BusBusy => write!(f, "bus busy (SDA held low)"),
            Self::ClockStretchTimeout => write!(f, "clock stretch timeout"),
            Self::AddressNack => write!(f, "address not acknowledged"),
        }
    }
}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// The temperature transaction failed on the bus.
    Bus(BusError),
    /// A setpoint or override switch could not be read.
    InputReadFailed,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus(e) => write!(f, "temperature read failed ({e})"),
            Self::InputReadFailed => write!(f, "switch input read failed"),
        }
    }
}

impl From<BusError> for SensorError {
    fn from(e: BusError) -> Self {
        Self::Bus(e)
    }
}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// GPIO set failed.
    GpioWriteFailed,
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpioWriteFailed => write!(f, "GPIO write failed"),
        }
    }
}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// The transmit ring had no free slot.
    Full,
    /// A bounded wait elapsed before the ring was ready.
    Timeout,
    /// The serial peripheral rejected the frame configuration.
    Config,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => write!(f, "transmit buffer full"),
            Self::Timeout => write!(f, "timed out"),
            Self::Config => write!(f, "serial configuration rejected"),
        }
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

// ---------------------------------------------------------------------------
// Safety faults
// ---------------------------------------------------------------------------

/// Faults latched by the safety supervisor, tracked in a bitmask so more
/// than one can be active at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SafetyFault {
    /// The temperature sensor failed too many consecutive reads.
    SensorLost = 0b0000_0001,
    /// The setpoint/override switches could not be read.
    InputsUnreadable = 0b0000_0010,
}

impl SafetyFault {
    /// Return the bitmask for this fault.
    pub const fn mask(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for SafetyFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SensorLost => write!(f, "temperature sensor lost"),
            Self::InputsUnreadable => write!(f, "switch inputs unreadable"),
        }
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
