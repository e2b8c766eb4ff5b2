//! Safety supervisor.
//!
//! The supervisor runs **every tick before the hysteresis update** and
//! keeps a latched fault bitmask.  The service consults it to decide
//! whether the coil may follow the temperature.
//!
//! ## Fault lifecycle
//!
//! 1. A temperature read fails.  The consecutive-failure counter grows.
//! 2. Once it reaches `sensor_loss_threshold`, `SensorLost` is latched.
//! 3. Under [`SensorLossPolicy::ForceOff`] the service de-energizes the
//!    coil (the override input still wins).
//! 4. The first good read resets the counter and clears the bit.
//!
//! `InputsUnreadable` follows the switch bank directly: set while the
//! setpoint/override pins fail to read, cleared on the next good read.

use log::{error, info};

use crate::config::{SensorLossPolicy, ThermostatConfig};
use crate::error::SafetyFault;

pub struct SafetySupervisor {
    threshold: u8,
    policy: SensorLossPolicy,
    consecutive_failures: u8,
    /// Latched fault bitmask.
    faults: u8,
}

impl SafetySupervisor {
    pub fn new(config: &ThermostatConfig) -> Self {
        Self {
            threshold: config.sensor_loss_threshold.max(1),
            policy: config.sensor_loss_policy,
            consecutive_failures: 0,
            faults: 0,
        }
    }

    /// Evaluate this tick's read outcomes.  Returns the updated fault bitmask.
    pub fn evaluate(&mut self, temperature_ok: bool, inputs_ok: bool) -> u8 {
        if temperature_ok {
            self.consecutive_failures = 0;
        } else {
            self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        }
        self.eval_fault(
            SafetyFault::SensorLost,
            self.consecutive_failures >= self.threshold,
        );
        self.eval_fault(SafetyFault::InputsUnreadable, !inputs_ok);
        self.faults
    }

    /// Whether the coil must be held off regardless of temperature.
    pub fn forces_off(&self) -> bool {
        self.policy == SensorLossPolicy::ForceOff && self.has_fault(SafetyFault::SensorLost)
    }

    pub fn faults(&self) -> u8 {
        self.faults
    }

    pub fn has_faults(&self) -> bool {
        self.faults != 0
    }

    pub fn has_fault(&self, fault: SafetyFault) -> bool {
        self.faults & fault.mask() != 0
    }

    pub fn consecutive_failures(&self) -> u8 {
        self.consecutive_failures
    }

    // ── Internal ──────────────────────────────────────────────────

    /// Set or clear a fault bit based on a boolean condition.
    fn eval_fault(&mut self, fault: SafetyFault, condition: bool) {
        if condition {
            if self.faults & fault.mask() == 0 {
                error!("SAFETY FAULT SET: {fault}");
            }
            self.faults |= fault.mask();
        } else {
            if self.faults & fault.mask() != 0 {
                info!("SAFETY FAULT CLEARED: {fault}");
            }
            self.faults &= !fault.mask();
        }
    }
}
