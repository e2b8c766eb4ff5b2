//! Integration tests for the ThermostatService → hysteresis → coil pipeline.

use super::mock_hw::{CountingDelay, FixedClock, MockHardware, NO_SENSOR, RecordingSink};

use relaytherm::app::events::{AppEvent, SwitchCause};
use relaytherm::app::service::ThermostatService;
use relaytherm::config::{SensorLossPolicy, ThermostatConfig};
use relaytherm::control::CoilState;
use relaytherm::error::{ActuatorError, Error, SafetyFault, SensorError};

fn started(config: ThermostatConfig, hw: &mut MockHardware) -> (ThermostatService, RecordingSink) {
    let mut app = ThermostatService::new(config);
    let mut sink = RecordingSink::new();
    app.start(hw, &mut CountingDelay::default(), &mut sink).unwrap();
    (app, sink)
}

// ── Startup ───────────────────────────────────────────────────

#[test]
fn start_forces_coil_off_discards_warmup_and_preloads() {
    let mut hw = MockHardware::new(25, 0).with_script(&[NO_SENSOR, Ok(99), Ok(30)]);
    let mut app = ThermostatService::new(ThermostatConfig::default());
    let mut sink = RecordingSink::new();
    let mut delay = CountingDelay::default();

    app.start(&mut hw, &mut delay, &mut sink).unwrap();

    assert_eq!(hw.coil_calls, vec![false]);
    assert_eq!(hw.temperature_reads, 3, "2 discarded + 1 preload");
    assert_eq!(delay.total_ns, 2 * 10 * 1_000_000);
    assert_eq!(app.smoothed(), Some(30), "warm-up readings must not leak in");
    assert_eq!(sink.events, vec![AppEvent::Started]);
    assert_eq!(app.coil_state(), CoilState::Off);
}

#[test]
fn failed_preload_primes_on_first_good_sample() {
    let mut hw = MockHardware::new(25, 40).with_script(&[Ok(1), Ok(2), NO_SENSOR]);
    let (mut app, mut sink) = started(ThermostatConfig::default(), &mut hw);
    assert_eq!(app.smoothed(), None);

    let report = app.tick(&mut hw, &FixedClock(0), &mut sink).unwrap();
    assert_eq!(report.smoothed_c, Some(40));
    assert_eq!(report.coil, CoilState::On);
}

// ── Hysteresis through the smoothing filter ──────────────────

#[test]
fn cools_through_dead_band_then_releases() {
    let mut hw = MockHardware::new(25, 26);
    let (mut app, mut sink) = started(ThermostatConfig::default(), &mut hw);

    assert_eq!(app.tick(&mut hw, &FixedClock(0), &mut sink).unwrap().coil, CoilState::On);

    hw.temperature = Ok(23);
    for _ in 0..16 {
        let r = app.tick(&mut hw, &FixedClock(0), &mut sink).unwrap();
        let smoothed = r.smoothed_c.unwrap();
        let expected = if smoothed <= 23 { CoilState::Off } else { CoilState::On };
        assert_eq!(r.coil, expected, "smoothed {}", smoothed);
    }
    assert_eq!(app.smoothed(), Some(23));
    assert_eq!(
        sink.coil_changes(),
        vec![
            (CoilState::On, SwitchCause::Temperature),
            (CoilState::Off, SwitchCause::Temperature),
        ]
    );
}

#[test]
fn every_tick_drives_the_output_and_reports_status() {
    let mut hw = MockHardware::new(25, 20);
    let (mut app, mut sink) = started(ThermostatConfig::default(), &mut hw);

    for n in 0..3 {
        app.tick(&mut hw, &FixedClock(n * 500), &mut sink).unwrap();
    }
    // Startup write + one per tick.
    assert_eq!(hw.coil_calls, vec![false; 4]);
    let statuses = sink.statuses();
    assert_eq!(statuses.len(), 3);
    assert_eq!(statuses[2].uptime_ms, 1000);
    assert_eq!(statuses[2].setpoint_c, 25);
    assert_eq!(statuses[2].raw_c, Some(20));
    assert_eq!(app.tick_count(), 3);
}

// ── Override ──────────────────────────────────────────────────

#[test]
fn override_forces_on_when_cold_and_releases_to_temperature() {
    let mut hw = MockHardware::new(60, 5);
    let (mut app, mut sink) = started(ThermostatConfig::default(), &mut hw);

    hw.set_override(true);
    let r = app.tick(&mut hw, &FixedClock(0), &mut sink).unwrap();
    assert_eq!(r.coil, CoilState::On);
    assert!(r.override_active);

    hw.set_override(false);
    assert_eq!(app.tick(&mut hw, &FixedClock(0), &mut sink).unwrap().coil, CoilState::Off);
    assert_eq!(
        sink.coil_changes(),
        vec![
            (CoilState::On, SwitchCause::Override),
            (CoilState::Off, SwitchCause::Temperature),
        ]
    );
}

// ── Sensor loss ───────────────────────────────────────────────

#[test]
fn sensor_loss_forces_coil_off_then_recovers() {
    let mut hw = MockHardware::new(25, 30);
    let (mut app, mut sink) = started(ThermostatConfig::default(), &mut hw);
    assert_eq!(app.tick(&mut hw, &FixedClock(0), &mut sink).unwrap().coil, CoilState::On);

    hw.temperature = NO_SENSOR;
    for _ in 0..2 {
        let r = app.tick(&mut hw, &FixedClock(0), &mut sink).unwrap();
        assert_eq!(r.raw_c, None);
        assert_eq!(r.smoothed_c, Some(30), "last average is held");
        assert_eq!(r.coil, CoilState::On, "below threshold the coil holds");
    }
    let r = app.tick(&mut hw, &FixedClock(0), &mut sink).unwrap();
    assert_eq!(r.coil, CoilState::Off);
    assert_eq!(r.fault_flags, SafetyFault::SensorLost.mask());
    assert_eq!(sink.count(&AppEvent::SensorLost), 1);

    hw.temperature = Ok(30);
    let r = app.tick(&mut hw, &FixedClock(0), &mut sink).unwrap();
    assert_eq!(r.coil, CoilState::On);
    assert_eq!(r.fault_flags, 0);
    assert_eq!(sink.count(&AppEvent::SensorRecovered), 1);
    assert_eq!(
        sink.coil_changes(),
        vec![
            (CoilState::On, SwitchCause::Temperature),
            (CoilState::Off, SwitchCause::SensorLoss),
            (CoilState::On, SwitchCause::Temperature),
        ]
    );
}

#[test]
fn hold_last_policy_keeps_coil_on_through_loss() {
    let config = ThermostatConfig {
        sensor_loss_policy: SensorLossPolicy::HoldLast,
        ..ThermostatConfig::default()
    };
    let mut hw = MockHardware::new(25, 30);
    let (mut app, mut sink) = started(config, &mut hw);
    app.tick(&mut hw, &FixedClock(0), &mut sink).unwrap();

    hw.temperature = NO_SENSOR;
    for _ in 0..10 {
        assert_eq!(app.tick(&mut hw, &FixedClock(0), &mut sink).unwrap().coil, CoilState::On);
    }
    assert_eq!(app.fault_flags(), SafetyFault::SensorLost.mask());
}

#[test]
fn override_still_wins_during_sensor_loss() {
    let mut hw = MockHardware::new(25, 10);
    let (mut app, mut sink) = started(ThermostatConfig::default(), &mut hw);
    hw.temperature = NO_SENSOR;
    for _ in 0..5 {
        app.tick(&mut hw, &FixedClock(0), &mut sink).unwrap();
    }
    assert_eq!(app.coil_state(), CoilState::Off);

    hw.set_override(true);
    assert_eq!(app.tick(&mut hw, &FixedClock(0), &mut sink).unwrap().coil, CoilState::On);
}

#[test]
fn never_primed_sensor_leaves_coil_off() {
    let mut hw = MockHardware::new(25, 0);
    hw.temperature = NO_SENSOR;
    let (mut app, mut sink) = started(ThermostatConfig::default(), &mut hw);
    for _ in 0..5 {
        let r = app.tick(&mut hw, &FixedClock(0), &mut sink).unwrap();
        assert_eq!(r.coil, CoilState::Off);
        assert_eq!(r.smoothed_c, None, "no average before the first good sample");
    }
}

// ── Inputs + actuator failures ───────────────────────────────

#[test]
fn unreadable_inputs_keep_last_setpoint() {
    let mut hw = MockHardware::new(25, 24);
    let (mut app, mut sink) = started(ThermostatConfig::default(), &mut hw);
    app.tick(&mut hw, &FixedClock(0), &mut sink).unwrap();

    hw.inputs = Err(SensorError::InputReadFailed);
    hw.temperature = Ok(40);
    hw.script.extend([Ok(40); 15]);
    let r = app.tick(&mut hw, &FixedClock(0), &mut sink).unwrap();
    assert_eq!(r.setpoint_c, 25);
    assert_eq!(r.fault_flags, SafetyFault::InputsUnreadable.mask());
    // (15*24 + 40) / 16 = 25, not above the setpoint yet.
    assert_eq!(r.smoothed_c, Some(25));
    assert_eq!(r.coil, CoilState::Off);
}

#[test]
fn coil_write_failure_is_returned() {
    let mut hw = MockHardware::new(25, 30);
    let (mut app, mut sink) = started(ThermostatConfig::default(), &mut hw);
    hw.fail_coil = true;
    assert_eq!(
        app.tick(&mut hw, &FixedClock(0), &mut sink),
        Err(Error::Actuator(ActuatorError::GpioWriteFailed))
    );
}
