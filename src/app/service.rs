//! Application service: the hexagonal core.
//!
//! [`ThermostatService`] owns the smoothing filter, the hysteresis
//! controller and the safety supervisor.  All I/O flows through port
//! traits injected at call sites, making the service testable with mock
//! adapters.
//!
//! ```text
//!  SensorPort ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!                 │      ThermostatService        │
//! ActuatorPort ◀──│ Smoothing · Hysteresis · Safety│ ◀── TimePort
//!                 └──────────────────────────────┘
//! ```

use embedded_hal::delay::DelayNs;
use log::{debug, info, warn};

use crate::config::ThermostatConfig;
use crate::control::{CoilState, HysteresisController};
use crate::error::{Result, SafetyFault};
use crate::safety::SafetySupervisor;
use crate::sensors::{InputSnapshot, MovingAverage};

use super::events::{AppEvent, StatusReport, SwitchCause};
use super::ports::{ActuatorPort, EventSink, SensorPort, TimePort};

// ───────────────────────────────────────────────────────────────
// ThermostatService
// ───────────────────────────────────────────────────────────────

pub struct ThermostatService {
    config: ThermostatConfig,
    filter: MovingAverage,
    controller: HysteresisController,
    safety: SafetySupervisor,
    /// Last successfully decoded switch state, reused when a read fails.
    inputs: InputSnapshot,
    tick_count: u64,
}

impl ThermostatService {
    /// Construct the service from configuration.
    ///
    /// Does **not** touch hardware; call [`start`](Self::start) next.
    pub fn new(config: ThermostatConfig) -> Self {
        let controller = HysteresisController::new(config.hysteresis_c);
        let safety = SafetySupervisor::new(&config);
        Self {
            config,
            filter: MovingAverage::new(),
            controller,
            safety,
            inputs: InputSnapshot::default(),
            tick_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Coil off, announce, let the sensor settle, then prime the filter.
    ///
    /// The first `warmup_discard_reads` conversions after power-up are
    /// thrown away.  The next good one fills the whole smoothing window.
    /// If that read fails the window stays unprimed and the first good
    /// sample in [`tick`](Self::tick) fills it instead.
    pub fn start(
        &mut self,
        hw: &mut (impl SensorPort + ActuatorPort),
        delay: &mut impl DelayNs,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        self.controller.force_off();
        hw.set_coil(false)?;
        sink.emit(&AppEvent::Started);

        for n in 0..self.config.warmup_discard_reads {
            if let Err(e) = hw.read_raw_temperature() {
                debug!("warm-up read {n} failed: {e}");
            }
            delay.delay_ms(self.config.warmup_delay_ms);
        }

        match hw.read_raw_temperature() {
            Ok(t) => {
                self.filter.preload(t);
                info!("ThermostatService started, preload {t}\u{00b0}C");
            }
            Err(e) => {
                warn!("preload read failed ({e}); priming on first good sample");
            }
        }
        Ok(())
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one control iteration: inputs → temperature → safety →
    /// hysteresis → coil → status.
    ///
    /// Sensor failures never abort the iteration; they are folded into
    /// the safety supervisor and the report.  Only a failed coil write is
    /// returned as an error.
    pub fn tick(
        &mut self,
        hw: &mut (impl SensorPort + ActuatorPort),
        clock: &impl TimePort,
        sink: &mut impl EventSink,
    ) -> Result<StatusReport> {
        self.tick_count += 1;

        // 1. Setpoint and override
        let inputs_ok = match hw.read_inputs() {
            Ok(snapshot) => {
                self.inputs = snapshot;
                true
            }
            Err(e) => {
                warn!("input read failed ({e}); keeping sp={}", self.inputs.setpoint_c);
                false
            }
        };
        let InputSnapshot {
            setpoint_c,
            override_active,
        } = self.inputs;

        // 2. Temperature
        let raw = hw.read_raw_temperature();
        let smoothed = match raw {
            Ok(t) => Some(self.filter.push(t)),
            Err(e) => {
                warn!("temperature read failed: {e}");
                self.filter.average()
            }
        };

        // 3. Safety
        let was_lost = self.safety.has_fault(SafetyFault::SensorLost);
        self.safety.evaluate(raw.is_ok(), inputs_ok);
        match (was_lost, self.safety.has_fault(SafetyFault::SensorLost)) {
            (false, true) => sink.emit(&AppEvent::SensorLost),
            (true, false) => sink.emit(&AppEvent::SensorRecovered),
            _ => {}
        }

        // 4. Hysteresis
        let prev = self.controller.state();
        let cause = if override_active {
            self.controller.update(smoothed.unwrap_or(0), setpoint_c, true);
            SwitchCause::Override
        } else if self.safety.forces_off() {
            self.controller.force_off();
            SwitchCause::SensorLoss
        } else {
            if let Some(t) = smoothed {
                self.controller.update(t, setpoint_c, false);
            }
            SwitchCause::Temperature
        };
        let coil = self.controller.state();

        // 5. Drive the output every iteration; report only edges.
        hw.set_coil(coil.is_on())?;
        if coil != prev {
            info!("coil {prev:?} -> {coil:?} ({cause:?})");
            sink.emit(&AppEvent::CoilChanged {
                from: prev,
                to: coil,
                cause,
            });
        }

        // 6. Status
        let report = StatusReport {
            setpoint_c,
            raw_c: raw.ok(),
            smoothed_c: smoothed,
            override_active,
            coil,
            fault_flags: self.safety.faults(),
            uptime_ms: clock.uptime_ms(),
        };
        sink.emit(&AppEvent::Status(report));
        Ok(report)
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn coil_state(&self) -> CoilState {
        self.controller.state()
    }

    /// Current smoothed temperature, `None` before the first good sample.
    pub fn smoothed(&self) -> Option<u8> {
        self.filter.average()
    }

    pub fn fault_flags(&self) -> u8 {
        self.safety.faults()
    }

    /// Control iterations executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Loop period the caller should sleep between ticks.
    pub fn loop_interval_ms(&self) -> u32 {
        self.config.loop_interval_ms
    }
}
