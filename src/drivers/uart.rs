//! Interrupt-driven serial byte transport.
//!
//! Two [`ByteRing`]s sit between the foreground loop and the serial
//! interrupt handlers:
//!
//! ```text
//!  foreground ── send_byte ──▶ [ TX ring ] ── on_transmit_ready ──▶ hardware
//!  foreground ◀─ receive_byte ─ [ RX ring ] ◀─ on_receive_complete ─ hardware
//! ```
//!
//! Writer ownership (must hold exactly for the rings to stay lock-free):
//!
//! - TX head, `tx_armed` set: foreground.  TX tail, `tx_armed` clear: interrupt.
//! - RX head, overflow counter: interrupt.  RX tail: foreground.
//!
//! [`SerialTransport::init`] is the only exception: it resets everything and
//! must run before the interrupts are enabled.
//!
//! The blocking calls spin until the ring has room or data.  The `try_*` and
//! `*_within` variants are bounded.

use core::hint::spin_loop;
use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use embedded_hal::delay::DelayNs;

use crate::config::{OverflowPolicy, UartConfig};
use crate::drivers::ring_buffer::ByteRing;
use crate::error::TransportError;

/// Receive ring size (2, 4, 8 … 256 bytes).
pub const RX_BUFFER_SIZE: usize = 2;
/// Transmit ring size (2, 4, 8 … 256 bytes).
pub const TX_BUFFER_SIZE: usize = 16;

/// Poll step for the bounded waits.
const POLL_STEP_US: u32 = 10;

/// The serial peripheral as seen by the transport.
pub trait SerialHw {
    /// Program baud rate and frame format, enable receiver and transmitter.
    fn configure(&mut self, config: &UartConfig) -> Result<(), TransportError>;

    /// Load one byte into the transmit data register.
    fn write_data(&mut self, byte: u8);
}

/// The firmware's serial transport with its default ring sizes.
pub type Uart = SerialTransport<TX_BUFFER_SIZE, RX_BUFFER_SIZE>;

pub struct SerialTransport<const TX: usize, const RX: usize> {
    tx: ByteRing<TX>,
    rx: ByteRing<RX>,
    tx_armed: AtomicBool,
    drop_newest: AtomicBool,
    rx_overflows: AtomicU32,
}

impl<const TX: usize, const RX: usize> SerialTransport<TX, RX> {
    pub const fn new() -> Self {
        Self {
            tx: ByteRing::new(),
            rx: ByteRing::new(),
            tx_armed: AtomicBool::new(false),
            drop_newest: AtomicBool::new(false),
            rx_overflows: AtomicU32::new(0),
        }
    }

    /// Configure the hardware, empty both rings and select the receive
    /// overflow policy.  Call before enabling the serial interrupts.
    pub fn init(
        &self,
        hw: &mut impl SerialHw,
        config: &UartConfig,
        policy: OverflowPolicy,
    ) -> Result<(), TransportError> {
        hw.configure(config)?;
        self.tx.reset();
        self.rx.reset();
        self.tx_armed.store(false, Ordering::SeqCst);
        self.drop_newest
            .store(policy == OverflowPolicy::DropNewest, Ordering::Relaxed);
        self.rx_overflows.store(0, Ordering::Relaxed);
        log::info!(
            "uart: {} baud {}{}{} rx_policy={:?}",
            config.baud,
            config.data_bits,
            match config.parity {
                crate::config::Parity::None => 'N',
                crate::config::Parity::Even => 'E',
                crate::config::Parity::Odd => 'O',
            },
            config.stop_bits,
            policy
        );
        Ok(())
    }

    // ── Foreground: transmit ──────────────────────────────────

    /// Enqueue `byte`, spinning while the transmit ring is full.
    /// Returns once the byte is queued, not once it is on the wire.
    pub fn send_byte(&self, byte: u8) {
        while self.tx.try_push(byte).is_err() {
            spin_loop();
        }
        self.arm_transmit();
    }

    /// Enqueue `byte` if there is room.
    pub fn try_send_byte(&self, byte: u8) -> Result<(), TransportError> {
        self.tx.try_push(byte).map_err(|_| TransportError::Full)?;
        self.arm_transmit();
        Ok(())
    }

    /// Enqueue `byte`, waiting at most `timeout_us` for room.
    pub fn send_byte_within(
        &self,
        byte: u8,
        delay: &mut impl DelayNs,
        timeout_us: u32,
    ) -> Result<(), TransportError> {
        let mut waited: u32 = 0;
        loop {
            match self.try_send_byte(byte) {
                Ok(()) => return Ok(()),
                Err(_) if waited >= timeout_us => return Err(TransportError::Timeout),
                Err(_) => {
                    delay.delay_us(POLL_STEP_US);
                    waited = waited.saturating_add(POLL_STEP_US);
                }
            }
        }
    }

    /// Blocking send of every byte in `bytes`.
    pub fn write_bytes(&self, bytes: &[u8]) {
        for &b in bytes {
            self.send_byte(b);
        }
    }

    fn arm_transmit(&self) {
        self.tx_armed.store(true, Ordering::SeqCst);
    }

    // ── Foreground: receive ───────────────────────────────────

    /// Whether at least one received byte is waiting.
    pub fn byte_available(&self) -> bool {
        !self.rx.is_empty()
    }

    /// Dequeue the next received byte, spinning until one arrives.
    pub fn receive_byte(&self) -> u8 {
        loop {
            if let Some(b) = self.rx.pop() {
                return b;
            }
            spin_loop();
        }
    }

    pub fn try_receive_byte(&self) -> Option<u8> {
        self.rx.pop()
    }

    /// Dequeue the next received byte, waiting at most `timeout_us`.
    pub fn receive_byte_within(
        &self,
        delay: &mut impl DelayNs,
        timeout_us: u32,
    ) -> Result<u8, TransportError> {
        let mut waited: u32 = 0;
        loop {
            if let Some(b) = self.rx.pop() {
                return Ok(b);
            }
            if waited >= timeout_us {
                return Err(TransportError::Timeout);
            }
            delay.delay_us(POLL_STEP_US);
            waited = waited.saturating_add(POLL_STEP_US);
        }
    }

    /// Receive overflows since [`init`](Self::init).  Monotonic; callers
    /// track their own last-seen value.
    pub fn rx_overflow_count(&self) -> u32 {
        self.rx_overflows.load(Ordering::Acquire)
    }

    /// Whether the transmit-ready interrupt should be serviced.
    pub fn is_transmit_armed(&self) -> bool {
        self.tx_armed.load(Ordering::SeqCst)
    }

    /// Bytes queued for transmission and not yet handed to the hardware.
    pub fn pending_tx(&self) -> usize {
        self.tx.len()
    }

    // ── Interrupt side ────────────────────────────────────────

    /// Receive-complete handler: store the byte the hardware just delivered.
    pub fn on_receive_complete(&self, byte: u8) {
        let overflowed = if self.drop_newest.load(Ordering::Relaxed) {
            self.rx.try_push(byte).is_err()
        } else {
            self.rx.push_overwrite(byte)
        };
        if overflowed {
            self.rx_overflows.fetch_add(1, Ordering::Release);
        }
    }

    /// Transmit-ready handler: hand the next byte to the hardware, or
    /// disarm when the ring is empty.  Returns `true` if a byte was written.
    pub fn on_transmit_ready(&self, hw: &mut impl SerialHw) -> bool {
        if let Some(byte) = self.tx.pop() {
            hw.write_data(byte);
            return true;
        }
        self.tx_armed.store(false, Ordering::SeqCst);
        // A send may have queued a byte and armed between the pop and the
        // disarm above; re-arm so it is not stranded.
        if !self.tx.is_empty() {
            self.tx_armed.store(true, Ordering::SeqCst);
        }
        false
    }
}

impl<const TX: usize, const RX: usize> Default for SerialTransport<TX, RX> {
    fn default() -> Self {
        Self::new()
    }
}
