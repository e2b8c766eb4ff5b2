//! Control algorithms.

pub mod hysteresis;

pub use hysteresis::{CoilState, HysteresisController};
