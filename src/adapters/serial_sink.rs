//! Serial status-line sink.
//!
//! Implements [`EventSink`] over the interrupt-fed [`SerialTransport`]:
//! the boot banner on [`AppEvent::Started`] and one status line per
//! control iteration.
//!
//! ```text
//! \r\nsp: 25 tc: 26 bt: 25 trig: 0
//! ```
//!
//! A failed raw read prints `ERR` in the `tc` field, and `bt` reads `ERR`
//! until the first good sample.  Other events are not echoed on the wire;
//! use the log sink for those.

use core::fmt::Write as _;

use heapless::String;
use log::warn;

use crate::app::events::{AppEvent, StatusReport};
use crate::app::ports::EventSink;
use crate::config::{BANNER, TxBackpressure};
use crate::drivers::uart::SerialTransport;

/// Longest possible status line plus headroom.
pub const STATUS_LINE_CAPACITY: usize = 48;

/// Render one status line.
pub fn format_status(report: &StatusReport) -> String<STATUS_LINE_CAPACITY> {
    let mut line = String::new();
    // Capacity covers the widest values (3-digit fields), so this cannot fail.
    let _ = write!(line, "\r\nsp: {} tc: ", report.setpoint_c);
    write_reading(&mut line, report.raw_c);
    let _ = line.write_str(" bt: ");
    write_reading(&mut line, report.smoothed_c);
    let _ = write!(line, " trig: {}", u8::from(report.override_active));
    line
}

fn write_reading(line: &mut String<STATUS_LINE_CAPACITY>, reading: Option<u8>) {
    let _ = match reading {
        Some(value) => write!(line, "{value}"),
        None => line.write_str("ERR"),
    };
}

pub struct SerialStatusSink<'a, const TX: usize, const RX: usize> {
    transport: &'a SerialTransport<TX, RX>,
    backpressure: TxBackpressure,
    dropped: u32,
}

impl<'a, const TX: usize, const RX: usize> SerialStatusSink<'a, TX, RX> {
    pub fn new(transport: &'a SerialTransport<TX, RX>, backpressure: TxBackpressure) -> Self {
        Self {
            transport,
            backpressure,
            dropped: 0,
        }
    }

    /// Bytes discarded under [`TxBackpressure::Drop`].
    pub fn dropped_bytes(&self) -> u32 {
        self.dropped
    }

    fn send(&mut self, bytes: &[u8]) {
        match self.backpressure {
            TxBackpressure::Block => self.transport.write_bytes(bytes),
            TxBackpressure::Drop => {
                let before = self.dropped;
                for &b in bytes {
                    if self.transport.try_send_byte(b).is_err() {
                        self.dropped = self.dropped.wrapping_add(1);
                    }
                }
                if self.dropped != before {
                    warn!("serial: tx full, dropped {} bytes", self.dropped.wrapping_sub(before));
                }
            }
        }
    }
}

impl<const TX: usize, const RX: usize> EventSink for SerialStatusSink<'_, TX, RX> {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started => self.send(BANNER.as_bytes()),
            AppEvent::Status(report) => {
                let line = format_status(report);
                self.send(line.as_bytes());
            }
            _ => {}
        }
    }
}
