//! ESP-IDF UART behind the [`SerialHw`] trait.
//!
//! The IDF driver owns the real UART interrupt.  [`service_interrupts`]
//! runs on its own thread and plays the two interrupt roles for the
//! transport: it moves every byte the driver received into the receive
//! ring and drains the transmit ring into the driver while armed.

use esp_idf_svc::sys::*;
use log::{error, warn};

use crate::config::{Parity, UartConfig};
use crate::drivers::uart::{SerialHw, SerialTransport};
use crate::error::TransportError;

/// Ticks to wait for a received byte before checking the transmit side.
const RX_POLL_TICKS: u32 = 1;

pub struct EspUart {
    port: uart_port_t,
}

impl EspUart {
    /// `port` must have a driver installed by `hw_init::init_peripherals`.
    pub const fn new(port: uart_port_t) -> Self {
        Self { port }
    }

    fn read_byte(&mut self) -> Option<u8> {
        let mut byte = 0u8;
        // SAFETY: one-byte buffer on the stack; driver installed at boot.
        let n = unsafe {
            uart_read_bytes(self.port, (&raw mut byte).cast(), 1, RX_POLL_TICKS)
        };
        (n == 1).then_some(byte)
    }
}

impl SerialHw for EspUart {
    fn configure(&mut self, config: &UartConfig) -> Result<(), TransportError> {
        let data_bits = match config.data_bits {
            5 => uart_word_length_t_UART_DATA_5_BITS,
            6 => uart_word_length_t_UART_DATA_6_BITS,
            7 => uart_word_length_t_UART_DATA_7_BITS,
            8 => uart_word_length_t_UART_DATA_8_BITS,
            _ => return Err(TransportError::Config),
        };
        let stop_bits = match config.stop_bits {
            1 => uart_stop_bits_t_UART_STOP_BITS_1,
            2 => uart_stop_bits_t_UART_STOP_BITS_2,
            _ => return Err(TransportError::Config),
        };
        let parity = match config.parity {
            Parity::None => uart_parity_t_UART_PARITY_DISABLE,
            Parity::Even => uart_parity_t_UART_PARITY_EVEN,
            Parity::Odd => uart_parity_t_UART_PARITY_ODD,
        };
        let cfg = uart_config_t {
            baud_rate: config.baud as i32,
            data_bits,
            parity,
            stop_bits,
            flow_ctrl: uart_hw_flowcontrol_t_UART_HW_FLOWCTRL_DISABLE,
            ..Default::default()
        };
        // SAFETY: plain config struct copy into the driver.
        let ret = unsafe { uart_param_config(self.port, &cfg) };
        if ret != ESP_OK as i32 {
            error!("esp_uart: param config failed (rc={})", ret);
            return Err(TransportError::Config);
        }
        Ok(())
    }

    fn write_data(&mut self, byte: u8) {
        // SAFETY: one-byte buffer; blocks until the driver FIFO accepts it.
        let n = unsafe { uart_write_bytes(self.port, (&raw const byte).cast(), 1) };
        if n != 1 {
            warn!("esp_uart: write returned {}", n);
        }
    }
}

/// Interrupt-service loop for `transport`.  Never returns.
pub fn service_interrupts<const TX: usize, const RX: usize>(
    mut uart: EspUart,
    transport: &SerialTransport<TX, RX>,
) -> ! {
    loop {
        if let Some(byte) = uart.read_byte() {
            transport.on_receive_complete(byte);
        }
        while transport.is_transmit_armed() && transport.on_transmit_ready(&mut uart) {}
    }
}
