//! RelayTherm Firmware: Main Entry Point
//!
//! Hexagonal layout with a single foreground control loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter    SerialStatusSink   LogEventSink  TickClock │
//! │  (Sensor+Actuator)  (EventSink)        (EventSink)   (TimePort)│
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │          ThermostatService (pure logic)                │    │
//! │  │  Smoothing · Hysteresis · Safety                       │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  uart-svc thread ⇄ SerialTransport rings · esp_timer → TICK    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_hal::delay::{Ets, FreeRtos};
use log::{debug, error, info, warn};

use relaytherm::adapters::esp_uart::{self, EspUart};
use relaytherm::adapters::hardware::HardwareAdapter;
use relaytherm::adapters::log_sink::LogEventSink;
use relaytherm::adapters::serial_sink::SerialStatusSink;
use relaytherm::adapters::time::TickClock;
use relaytherm::app::service::ThermostatService;
use relaytherm::config::ThermostatConfig;
use relaytherm::drivers::coil::CoilDriver;
use relaytherm::drivers::hw_init::{self, GpioPin};
use relaytherm::drivers::hw_timer::{self, TICK};
use relaytherm::drivers::i2c_bang::{BitBangBus, BusTiming};
use relaytherm::drivers::task_pin::{self, Core};
use relaytherm::drivers::uart::Uart;
use relaytherm::error::Error;
use relaytherm::pins;
use relaytherm::sensors::{SwitchBank, Tc74};

/// The byte transport shared between the control loop and the UART
/// service thread.
static TRANSPORT: Uart = Uart::new();

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("RelayTherm v{}", env!("CARGO_PKG_VERSION"));

    let config = ThermostatConfig::default();
    config.validate()?;

    // ── 2. Peripherals ────────────────────────────────────────
    if let Err(e) = hw_init::init_peripherals() {
        // Without the coil and sensor lines there is nothing safe to do.
        error!("HAL init failed: {}; halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }
    hw_timer::start_tick_timer();

    // ── 3. Serial transport + service thread ──────────────────
    let mut uart = EspUart::new(pins::UART_PORT);
    TRANSPORT
        .init(&mut uart, &config.uart, config.rx_overflow_policy)
        .map_err(Error::from)?;
    task_pin::spawn_on_core(Core::Pro, 10, 4, "uart-svc\0", move || {
        esp_uart::service_interrupts(uart, &TRANSPORT)
    })?;

    // ── 4. Sensor, switches, coil ─────────────────────────────
    let mut bus = BitBangBus::new(
        GpioPin::new(pins::SENSOR_SDA_GPIO),
        GpioPin::new(pins::SENSOR_SCL_GPIO),
        Ets,
        BusTiming::from_config(&config),
    );
    if let Err(e) = bus.init() {
        // Not fatal: every read retries the bus, and the safety supervisor
        // latches SensorLost while it stays dead.
        warn!("sensor bus init failed: {}; continuing", e);
    }
    let sensor = Tc74::new(bus, config.sensor_read_address());
    let switches = SwitchBank::new(
        pins::SETPOINT_GPIOS.map(GpioPin::new),
        GpioPin::new(pins::OVERRIDE_GPIO),
    );
    let coil = CoilDriver::new(GpioPin::new(pins::COIL_GPIO)).map_err(Error::from)?;
    let mut hw = HardwareAdapter::new(sensor, switches, coil);

    // ── 5. Application core ───────────────────────────────────
    let clock = TickClock::new(&TICK);
    let mut sink = (
        SerialStatusSink::new(&TRANSPORT, config.tx_backpressure),
        LogEventSink::new(),
    );
    let mut app = ThermostatService::new(config);
    app.start(&mut hw, &mut FreeRtos, &mut sink)?;

    // ── 6. Control loop ───────────────────────────────────────
    let mut seen_overflows = 0;
    loop {
        if let Err(e) = app.tick(&mut hw, &clock, &mut sink) {
            error!("control tick failed: {}", e);
        }

        // Nothing consumes serial input; drain it so the log shows it.
        while let Some(byte) = TRANSPORT.try_receive_byte() {
            debug!("rx: 0x{:02X}", byte);
        }
        let overflows = TRANSPORT.rx_overflow_count();
        if overflows != seen_overflows {
            warn!(
                "rx overflow: {} new ({} total)",
                overflows.wrapping_sub(seen_overflows),
                overflows
            );
            seen_overflows = overflows;
        }

        FreeRtos::delay_ms(app.loop_interval_ms());
    }
}
