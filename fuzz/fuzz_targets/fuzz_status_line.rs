//! Fuzz target: `format_status`
//!
//! Any combination of report fields must render without truncation into
//! the fixed-capacity line buffer.
//!
//! cargo fuzz run fuzz_status_line

#![no_main]

use libfuzzer_sys::fuzz_target;
use relaytherm::adapters::serial_sink::format_status;
use relaytherm::app::events::StatusReport;
use relaytherm::control::CoilState;

fuzz_target!(|data: [u8; 5]| {
    let [setpoint_c, raw, smoothed_c, flags, fault_flags] = data;
    let report = StatusReport {
        setpoint_c,
        raw_c: (flags & 1 != 0).then_some(raw),
        smoothed_c: (flags & 8 != 0).then_some(smoothed_c),
        override_active: flags & 2 != 0,
        coil: if flags & 4 != 0 { CoilState::On } else { CoilState::Off },
        fault_flags,
        uptime_ms: 0,
    };
    let line = format_status(&report);
    assert!(line.starts_with("\r\nsp: "));
    assert!(line.ends_with(if report.override_active { "trig: 1" } else { "trig: 0" }));
});
