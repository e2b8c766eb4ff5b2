//! One-shot hardware peripheral initialization.
//!
//! Configures the switch inputs, the coil output, the sensor power pins,
//! the open-drain bus lines and the status UART using raw ESP-IDF sys
//! calls.  Called once from `main()` before the control loop starts.
//!
//! [`GpioPin`] then exposes any configured line through the
//! `embedded-hal` digital traits so the portable drivers can use it.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
    UartInstallFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::UartInstallFailed(rc) => write!(f, "UART driver install failed (rc={})", rc),
        }
    }
}

impl std::error::Error for HwInitError {}

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::pins;

/// Driver-side buffer sizes handed to the IDF UART driver.  The transport's
/// own rings sit in front of these.
#[cfg(target_os = "espidf")]
const UART_DRIVER_RX_BUF: i32 = 256;

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the control loop; single-threaded.
    unsafe {
        init_switch_inputs()?;
        init_outputs()?;
        init_bus_lines()?;
        init_uart()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

#[cfg(target_os = "espidf")]
unsafe fn config_pin(pin: i32, mode: gpio_mode_t, pull_up: bool) -> Result<(), HwInitError> {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pin,
        mode,
        pull_up_en: if pull_up {
            gpio_pullup_t_GPIO_PULLUP_ENABLE
        } else {
            gpio_pullup_t_GPIO_PULLUP_DISABLE
        },
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::GpioConfigFailed(ret));
    }
    Ok(())
}

// ── GPIO Inputs ───────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_switch_inputs() -> Result<(), HwInitError> {
    for &pin in pins::SETPOINT_GPIOS.iter().chain(&[pins::OVERRIDE_GPIO]) {
        unsafe { config_pin(pin, gpio_mode_t_GPIO_MODE_INPUT, true)? };
    }
    info!("hw_init: setpoint + override inputs configured (pull-up)");
    Ok(())
}

// ── GPIO Outputs ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_outputs() -> Result<(), HwInitError> {
    // (pin, initial level).  Coil starts released; sensor VDD high, GND low.
    let outputs = [
        (pins::COIL_GPIO, 0),
        (pins::SENSOR_VDD_GPIO, 1),
        (pins::SENSOR_GND_GPIO, 0),
    ];
    for (pin, level) in outputs {
        unsafe {
            config_pin(pin, gpio_mode_t_GPIO_MODE_OUTPUT, false)?;
            gpio_set_level(pin, level);
        }
    }
    info!("hw_init: coil output + sensor power configured");
    Ok(())
}

// ── Open-drain bus ────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_bus_lines() -> Result<(), HwInitError> {
    for pin in [pins::SENSOR_SDA_GPIO, pins::SENSOR_SCL_GPIO] {
        unsafe {
            config_pin(pin, gpio_mode_t_GPIO_MODE_INPUT_OUTPUT_OD, true)?;
            // Released: the pull-up holds the line high.
            gpio_set_level(pin, 1);
        }
    }
    info!("hw_init: bus lines open-drain (SDA={}, SCL={})", pins::SENSOR_SDA_GPIO, pins::SENSOR_SCL_GPIO);
    Ok(())
}

// ── UART ──────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_uart() -> Result<(), HwInitError> {
    let ret = unsafe {
        uart_driver_install(
            pins::UART_PORT,
            UART_DRIVER_RX_BUF,
            0,
            0,
            core::ptr::null_mut(),
            0,
        )
    };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::UartInstallFailed(ret));
    }
    let ret = unsafe { uart_set_pin(pins::UART_PORT, pins::UART_TX_GPIO, pins::UART_RX_GPIO, -1, -1) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::UartInstallFailed(ret));
    }
    info!("hw_init: UART{} installed (TX={}, RX={})", pins::UART_PORT, pins::UART_TX_GPIO, pins::UART_RX_GPIO);
    Ok(())
}

// ── embedded-hal view of a configured line ────────────────────

/// Non-zero IDF return code from a GPIO call.
#[cfg(target_os = "espidf")]
#[derive(Debug, Clone, Copy)]
pub struct GpioError(pub i32);

#[cfg(target_os = "espidf")]
impl embedded_hal::digital::Error for GpioError {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}

/// A GPIO already configured by [`init_peripherals`].
///
/// On an open-drain line `set_high` releases and `is_high` reads the pad,
/// which is what the bit-banged bus needs.
#[cfg(target_os = "espidf")]
pub struct GpioPin {
    num: i32,
}

#[cfg(target_os = "espidf")]
impl GpioPin {
    /// `num` must have been configured by [`init_peripherals`], and no two
    /// `GpioPin`s may share it.
    pub const fn new(num: i32) -> Self {
        Self { num }
    }
}

#[cfg(target_os = "espidf")]
impl embedded_hal::digital::ErrorType for GpioPin {
    type Error = GpioError;
}

#[cfg(target_os = "espidf")]
impl embedded_hal::digital::InputPin for GpioPin {
    fn is_high(&mut self) -> Result<bool, GpioError> {
        // SAFETY: register read on a configured pin.
        Ok(unsafe { gpio_get_level(self.num) } != 0)
    }

    fn is_low(&mut self) -> Result<bool, GpioError> {
        self.is_high().map(|h| !h)
    }
}

#[cfg(target_os = "espidf")]
impl embedded_hal::digital::OutputPin for GpioPin {
    fn set_low(&mut self) -> Result<(), GpioError> {
        self.write(0)
    }

    fn set_high(&mut self) -> Result<(), GpioError> {
        self.write(1)
    }
}

#[cfg(target_os = "espidf")]
impl GpioPin {
    fn write(&mut self, level: u32) -> Result<(), GpioError> {
        // SAFETY: each GpioPin owns its line; main task only.
        let ret = unsafe { gpio_set_level(self.num, level) };
        if ret != ESP_OK as i32 {
            return Err(GpioError(ret));
        }
        Ok(())
    }
}
