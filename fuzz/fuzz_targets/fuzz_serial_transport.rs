//! Fuzz target: `SerialTransport` interrupt/foreground interleavings
//!
//! Each input byte is one operation: the top two bits pick the context
//! (foreground send, foreground receive, receive interrupt, transmit
//! interrupt) and the rest is the payload.  A shadow model checks that
//! bytes leave the transmit side in enqueue order and that the rings never
//! report more than N-1 entries.
//!
//! cargo fuzz run fuzz_serial_transport

#![no_main]

use std::collections::VecDeque;

use libfuzzer_sys::fuzz_target;
use relaytherm::config::{OverflowPolicy, UartConfig};
use relaytherm::drivers::uart::{SerialHw, SerialTransport};
use relaytherm::error::TransportError;

struct Wire(Vec<u8>);

impl SerialHw for Wire {
    fn configure(&mut self, _: &UartConfig) -> Result<(), TransportError> {
        Ok(())
    }
    fn write_data(&mut self, byte: u8) {
        self.0.push(byte);
    }
}

fuzz_target!(|data: &[u8]| {
    let Some((&first, ops)) = data.split_first() else {
        return;
    };
    let policy = if first & 1 == 0 {
        OverflowPolicy::Overwrite
    } else {
        OverflowPolicy::DropNewest
    };

    let transport: SerialTransport<8, 4> = SerialTransport::new();
    let mut wire = Wire(Vec::new());
    transport.init(&mut wire, &UartConfig::default(), policy).unwrap();

    let mut sent = VecDeque::new();
    for &op in ops {
        let payload = op & 0x3F;
        match op >> 6 {
            0 => {
                if transport.try_send_byte(payload).is_ok() {
                    sent.push_back(payload);
                }
            }
            1 => {
                let _ = transport.try_receive_byte();
            }
            2 => transport.on_receive_complete(payload),
            _ => {
                if transport.on_transmit_ready(&mut wire) {
                    let expected = sent.pop_front();
                    assert_eq!(wire.0.last().copied(), expected, "transmit order broken");
                }
            }
        }
        assert!(transport.pending_tx() <= 7);
        assert_eq!(transport.pending_tx(), sent.len());
    }
});
