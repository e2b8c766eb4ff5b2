//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements         | Connects to                  |
//! |----------------|--------------------|------------------------------|
//! | `hardware`     | SensorPort         | TC74 bus, setpoint switches  |
//! |                | ActuatorPort       | Relay coil                   |
//! | `serial_sink`  | EventSink          | Status line on the UART      |
//! | `log_sink`     | EventSink          | `log` output                 |
//! | `time`         | TimePort           | Tick counter                 |
//! | `esp_uart`     | SerialHw           | ESP-IDF UART driver          |

#[cfg(target_os = "espidf")]
pub mod esp_uart;
pub mod hardware;
pub mod log_sink;
pub mod serial_sink;
pub mod time;
