//! GPIO / peripheral pin assignments for the relay controller board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Setpoint DIP switches (active-low, internal pull-ups)
// ---------------------------------------------------------------------------

/// Setpoint switch GPIOs in weight order: index `i` contributes `1 << i`.
pub const SETPOINT_GPIOS: [i32; 6] = [4, 5, 6, 7, 15, 16];

/// Number of setpoint switches.
pub const SETPOINT_BITS: usize = SETPOINT_GPIOS.len();

// ---------------------------------------------------------------------------
// Override trigger (active-low, internal pull-up)
// ---------------------------------------------------------------------------

/// Manual override input.  LOW forces the coil on.
pub const OVERRIDE_GPIO: i32 = 17;

// ---------------------------------------------------------------------------
// Relay coil
// ---------------------------------------------------------------------------

/// Digital output: HIGH energizes the relay coil.
pub const COIL_GPIO: i32 = 18;

// ---------------------------------------------------------------------------
// TC74 sensor (bit-banged two-wire bus)
// ---------------------------------------------------------------------------

/// Open-drain data line.
pub const SENSOR_SDA_GPIO: i32 = 8;
/// Open-drain clock line.
pub const SENSOR_SCL_GPIO: i32 = 9;
/// The sensor is powered from GPIO to save wiring: driven HIGH.
pub const SENSOR_VDD_GPIO: i32 = 10;
/// Driven LOW as the sensor ground.
pub const SENSOR_GND_GPIO: i32 = 11;

// ---------------------------------------------------------------------------
// UART status line
// ---------------------------------------------------------------------------

pub const UART_TX_GPIO: i32 = 43;
pub const UART_RX_GPIO: i32 = 44;

/// UART controller carrying the status line.
pub const UART_PORT: i32 = 1;
