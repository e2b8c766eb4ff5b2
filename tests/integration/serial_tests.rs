//! Status line over the interrupt-fed transport, with a thread standing in
//! for the transmit interrupt.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use super::mock_hw::{CountingDelay, FixedClock, MockHardware, RecordingSink};

use relaytherm::adapters::serial_sink::SerialStatusSink;
use relaytherm::app::service::ThermostatService;
use relaytherm::config::{OverflowPolicy, TxBackpressure, UartConfig, ThermostatConfig};
use relaytherm::drivers::uart::{SerialHw, Uart};
use relaytherm::error::TransportError;

#[derive(Default)]
struct Wire {
    bytes: Vec<u8>,
    configured: Option<UartConfig>,
}

impl SerialHw for Wire {
    fn configure(&mut self, config: &UartConfig) -> Result<(), TransportError> {
        self.configured = Some(*config);
        Ok(())
    }

    fn write_data(&mut self, byte: u8) {
        self.bytes.push(byte);
    }
}

#[test]
fn banner_and_status_lines_reach_the_wire_in_order() {
    let transport = Uart::new();
    let wire = Mutex::new(Wire::default());
    transport
        .init(&mut *wire.lock().unwrap(), &UartConfig::default(), OverflowPolicy::Overwrite)
        .unwrap();
    assert_eq!(wire.lock().unwrap().configured, Some(UartConfig::default()));

    let done = AtomicBool::new(false);
    std::thread::scope(|s| {
        // Transmit-ready "interrupt": runs until the foreground is done
        // and the ring has drained.
        s.spawn(|| {
            loop {
                let finished = done.load(Ordering::SeqCst);
                let mut hw = wire.lock().unwrap();
                while transport.on_transmit_ready(&mut *hw) {}
                if finished && transport.pending_tx() == 0 {
                    break;
                }
                drop(hw);
                std::thread::yield_now();
            }
        });

        let mut hw = MockHardware::new(25, 26);
        let mut app = ThermostatService::new(ThermostatConfig::default());
        let mut sink = (
            SerialStatusSink::new(&transport, TxBackpressure::Block),
            RecordingSink::new(),
        );
        app.start(&mut hw, &mut CountingDelay::default(), &mut sink).unwrap();
        app.tick(&mut hw, &FixedClock(0), &mut sink).unwrap();
        hw.set_override(true);
        app.tick(&mut hw, &FixedClock(0), &mut sink).unwrap();
        assert_eq!(sink.1.statuses().len(), 2);
        done.store(true, Ordering::SeqCst);
    });

    let text = String::from_utf8(wire.into_inner().unwrap().bytes).unwrap();
    assert_eq!(
        text,
        "Therm 1.0\r\n\
         \r\nsp: 25 tc: 26 bt: 26 trig: 0\
         \r\nsp: 25 tc: 26 bt: 26 trig: 1"
    );
}

#[test]
fn drop_backpressure_never_blocks_without_a_drain() {
    let transport = Uart::new();
    let mut hw = MockHardware::new(25, 26);
    let mut app = ThermostatService::new(ThermostatConfig::default());
    let mut sink = SerialStatusSink::new(&transport, TxBackpressure::Drop);

    app.start(&mut hw, &mut CountingDelay::default(), &mut sink).unwrap();
    app.tick(&mut hw, &FixedClock(0), &mut sink).unwrap();

    // 15 usable slots: the banner (11) fits, the first status line mostly not.
    assert_eq!(transport.pending_tx(), 15);
    let status_len = "\r\nsp: 25 tc: 26 bt: 26 trig: 0".len() as u32;
    assert_eq!(sink.dropped_bytes(), status_len - 4);
}
