//! Mock hardware adapter for integration tests.
//!
//! Scripted sensor readings in, every coil command recorded out, so tests
//! can assert on the full history without touching real GPIO.

use std::collections::VecDeque;

use embedded_hal::delay::DelayNs;
use relaytherm::app::events::{AppEvent, StatusReport, SwitchCause};
use relaytherm::app::ports::{ActuatorPort, EventSink, SensorPort, TimePort};
use relaytherm::control::CoilState;
use relaytherm::error::{ActuatorError, BusError, SensorError};
use relaytherm::sensors::InputSnapshot;

pub const NO_SENSOR: Result<u8, SensorError> = Err(SensorError::Bus(BusError::AddressNack));

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    /// Consumed first, one per read.
    pub script: VecDeque<Result<u8, SensorError>>,
    /// Returned once the script is exhausted.
    pub temperature: Result<u8, SensorError>,
    pub inputs: Result<InputSnapshot, SensorError>,
    pub coil_calls: Vec<bool>,
    pub fail_coil: bool,
    pub temperature_reads: usize,
    coil_on: bool,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new(setpoint_c: u8, temperature: u8) -> Self {
        Self {
            script: VecDeque::new(),
            temperature: Ok(temperature),
            inputs: Ok(InputSnapshot {
                setpoint_c,
                override_active: false,
            }),
            coil_calls: Vec::new(),
            fail_coil: false,
            temperature_reads: 0,
            coil_on: false,
        }
    }

    pub fn with_script(mut self, readings: &[Result<u8, SensorError>]) -> Self {
        self.script.extend(readings.iter().copied());
        self
    }

    pub fn set_override(&mut self, active: bool) {
        if let Ok(inputs) = &mut self.inputs {
            inputs.override_active = active;
        }
    }
}

impl SensorPort for MockHardware {
    fn read_inputs(&mut self) -> Result<InputSnapshot, SensorError> {
        self.inputs
    }

    fn read_raw_temperature(&mut self) -> Result<u8, SensorError> {
        self.temperature_reads += 1;
        self.script.pop_front().unwrap_or(self.temperature)
    }
}

impl ActuatorPort for MockHardware {
    fn set_coil(&mut self, energized: bool) -> Result<(), ActuatorError> {
        if self.fail_coil {
            return Err(ActuatorError::GpioWriteFailed);
        }
        self.coil_calls.push(energized);
        self.coil_on = energized;
        Ok(())
    }

    fn is_coil_on(&self) -> bool {
        self.coil_on
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn coil_changes(&self) -> Vec<(CoilState, SwitchCause)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::CoilChanged { to, cause, .. } => Some((*to, *cause)),
                _ => None,
            })
            .collect()
    }

    pub fn statuses(&self) -> Vec<StatusReport> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::Status(s) => Some(*s),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, wanted: &AppEvent) -> usize {
        self.events.iter().filter(|e| *e == wanted).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Clock + delay ─────────────────────────────────────────────

pub struct FixedClock(pub u32);

impl TimePort for FixedClock {
    fn uptime_ms(&self) -> u32 {
        self.0
    }
}

/// Records the total requested delay instead of sleeping.
#[derive(Default)]
pub struct CountingDelay {
    pub total_ns: u64,
}

impl DelayNs for CountingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }
}
