//! Two-state hysteresis (dead-band) controller for the relay coil.
//!
//! ```text
//!            temp > setpoint  ||  override
//!   ┌─────┐ ─────────────────────────────▶ ┌────┐
//!   │ OFF │                                 │ ON │
//!   └─────┘ ◀───────────────────────────── └────┘
//!        !override && temp <= setpoint - hysteresis
//! ```
//!
//! The turn-on edge is exclusive (`>`), the turn-off edge inclusive (`<=`).
//! Inside the dead band the previous state is held.  The turn-off threshold
//! is computed signed, so a setpoint below the hysteresis gives a negative
//! threshold that an unsigned reading can never reach.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum CoilState {
    #[default]
    Off,
    On,
}

impl CoilState {
    pub const fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}

#[derive(Debug, Clone)]
pub struct HysteresisController {
    hysteresis: u8,
    state: CoilState,
}

impl HysteresisController {
    /// Starts in [`CoilState::Off`].
    pub const fn new(hysteresis: u8) -> Self {
        Self {
            hysteresis,
            state: CoilState::Off,
        }
    }

    /// Advance the state machine with one observation and return the new state.
    pub fn update(&mut self, temp: u8, setpoint: u8, override_active: bool) -> CoilState {
        if override_active || temp > setpoint {
            self.state = CoilState::On;
        } else if i16::from(temp) <= i16::from(setpoint) - i16::from(self.hysteresis) {
            self.state = CoilState::Off;
        }
        self.state
    }

    /// Drop to OFF unconditionally (startup and safety paths).
    pub fn force_off(&mut self) {
        self.state = CoilState::Off;
    }

    pub fn state(&self) -> CoilState {
        self.state
    }
}
