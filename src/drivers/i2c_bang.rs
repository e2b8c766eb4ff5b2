//! Bit-banged two-wire bus master.
//!
//! Both lines are open-drain: `set_high()` releases a line to the pull-up,
//! `set_low()` drives it.  Every transition is followed by the same fixed
//! settling delay, which is the only timing reference.
//!
//! ```text
//!  write_bit:  SDA=bit → SCL↑ → wait → SCL↓ → wait → (SDA↓ if bit) → wait
//!  read_bit:   SDA released → SCL↑ → wait → sample SDA → SCL↓ → wait
//! ```
//!
//! After releasing SCL the master waits (bounded by
//! `BusTiming::stretch_timeout_us`) for the line to actually read high, so a
//! stuck or stretching slave surfaces as [`BusError::ClockStretchTimeout`]
//! instead of silently garbled data.  A timeout of 0 skips the check.
//!
//! The lines are owned by the foreground loop; no interrupt touches them.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::error::BusError;

/// Poll step while waiting for a released clock line.
const STRETCH_POLL_US: u32 = 10;

/// Acknowledge bit as it appears on the wire (`0` = ack).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ack {
    /// Receiver pulled SDA low: byte accepted / send another.
    Ack,
    /// SDA stayed high: no receiver, or stop sending.
    Nack,
}

impl Ack {
    pub const fn from_bit(bit: bool) -> Self {
        if bit { Self::Nack } else { Self::Ack }
    }

    pub const fn is_ack(self) -> bool {
        matches!(self, Self::Ack)
    }

    const fn bit(self) -> bool {
        matches!(self, Self::Nack)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusTiming {
    /// Settling delay after every line transition.
    pub bit_delay_us: u32,
    /// Longest wait for SCL to read high after release; 0 disables.
    pub stretch_timeout_us: u32,
}

impl BusTiming {
    pub fn from_config(config: &crate::config::ThermostatConfig) -> Self {
        Self {
            bit_delay_us: config.bus_bit_delay_us,
            stretch_timeout_us: config.bus_stretch_timeout_us,
        }
    }
}

pub struct BitBangBus<SDA, SCL, D> {
    sda: SDA,
    scl: SCL,
    delay: D,
    timing: BusTiming,
}

impl<SDA, SCL, D> BitBangBus<SDA, SCL, D>
where
    SDA: InputPin + OutputPin,
    SCL: InputPin + OutputPin,
    D: DelayNs,
{
    pub fn new(sda: SDA, scl: SCL, delay: D, timing: BusTiming) -> Self {
        Self {
            sda,
            scl,
            delay,
            timing,
        }
    }

    /// Give the lines and delay back.
    pub fn release(self) -> (SDA, SCL, D) {
        (self.sda, self.scl, self.delay)
    }

    /// Bring the bus to idle: drive both lines low briefly, then release
    /// both to the pull-ups.
    pub fn init(&mut self) -> Result<(), BusError> {
        self.scl_low()?;
        self.sda_low()?;
        self.wait();
        self.scl_release()?;
        self.sda_release()?;
        self.wait();
        Ok(())
    }

    /// START: SDA falls while SCL is high, then SCL is pulled low.
    pub fn start(&mut self) -> Result<(), BusError> {
        self.sda_release()?;
        self.scl_release()?;
        self.wait();
        if self.sda.is_low().map_err(|_| BusError::Line)? {
            return Err(BusError::BusBusy);
        }

        self.sda_low()?;
        self.wait();

        self.scl_low()?;
        self.wait();
        Ok(())
    }

    /// STOP: SCL is released, then SDA rises while SCL is high.
    pub fn stop(&mut self) -> Result<(), BusError> {
        // SDA may still be released from an ACK slot; it must rise
        // with SCL high for the slave to see a STOP.
        self.sda_low()?;
        self.wait();

        self.scl_release()?;
        self.wait();

        self.sda_release()?;
        self.wait();
        Ok(())
    }

    /// Clock one bit out.  Leaves SDA driven low.
    pub fn write_bit(&mut self, bit: bool) -> Result<(), BusError> {
        if bit {
            self.sda_release()?;
        } else {
            self.sda_low()?;
        }

        self.scl_release()?;
        self.wait();

        self.scl_low()?;
        self.wait();

        if bit {
            self.sda_low()?;
        }
        self.wait();
        Ok(())
    }

    /// Clock one bit in, sampled while SCL is high.
    pub fn read_bit(&mut self) -> Result<bool, BusError> {
        self.sda_release()?;

        self.scl_release()?;
        self.wait();

        let bit = self.sda.is_high().map_err(|_| BusError::Line)?;

        self.scl_low()?;
        self.wait();
        Ok(bit)
    }

    /// Send `value` MSB first and return the receiver's acknowledge.
    pub fn write_byte(&mut self, value: u8) -> Result<Ack, BusError> {
        for shift in (0..8).rev() {
            self.write_bit((value >> shift) & 1 != 0)?;
        }
        Ok(Ack::from_bit(self.read_bit()?))
    }

    /// Receive one byte MSB first, then answer with `ack`
    /// ([`Ack::Ack`] asks for another byte, [`Ack::Nack`] ends the read).
    pub fn read_byte(&mut self, ack: Ack) -> Result<u8, BusError> {
        let mut value = 0u8;
        for _ in 0..8 {
            value = (value << 1) | u8::from(self.read_bit()?);
        }
        self.write_bit(ack.bit())?;
        self.wait();
        Ok(value)
    }

    // ── Line helpers ──────────────────────────────────────────

    fn wait(&mut self) {
        self.delay.delay_us(self.timing.bit_delay_us);
    }

    fn sda_low(&mut self) -> Result<(), BusError> {
        self.sda.set_low().map_err(|_| BusError::Line)
    }

    fn sda_release(&mut self) -> Result<(), BusError> {
        self.sda.set_high().map_err(|_| BusError::Line)
    }

    fn scl_low(&mut self) -> Result<(), BusError> {
        self.scl.set_low().map_err(|_| BusError::Line)
    }

    /// Release SCL and wait for it to read high.
    fn scl_release(&mut self) -> Result<(), BusError> {
        self.scl.set_high().map_err(|_| BusError::Line)?;
        if self.timing.stretch_timeout_us == 0 {
            return Ok(());
        }
        let mut waited: u32 = 0;
        while self.scl.is_low().map_err(|_| BusError::Line)? {
            if waited >= self.timing.stretch_timeout_us {
                return Err(BusError::ClockStretchTimeout);
            }
            self.delay.delay_us(STRETCH_POLL_US);
            waited = waited.saturating_add(STRETCH_POLL_US);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::RefCell;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;
    use std::rc::Rc;

    /// Two open-drain lines plus a minimal slave that records the bit on
    /// every SCL rising edge and can drive SDA low from a pattern.
    #[derive(Default)]
    struct Wire {
        sda_released: bool,
        scl_released: bool,
        scl_stuck_low: bool,
        /// Bits seen on rising SCL edges.
        sampled: Vec<bool>,
        /// Bits the slave presents, consumed one per falling SCL edge.
        pattern: Vec<bool>,
        slave_sda_low: bool,
    }

    impl Wire {
        fn sda(&self) -> bool {
            self.sda_released && !self.slave_sda_low
        }

        fn scl(&self) -> bool {
            self.scl_released && !self.scl_stuck_low
        }

        fn set_scl(&mut self, released: bool) {
            let before = self.scl();
            self.scl_released = released;
            let after = self.scl();
            if !before && after {
                let bit = self.sda();
                self.sampled.push(bit);
            } else if before && !after {
                self.present_next();
            }
        }

        fn present_next(&mut self) {
            self.slave_sda_low = if self.pattern.is_empty() {
                false
            } else {
                !self.pattern.remove(0)
            };
        }
    }

    type Shared = Rc<RefCell<Wire>>;

    struct Sda(Shared);
    struct Scl(Shared);

    impl ErrorType for Sda {
        type Error = Infallible;
    }
    impl ErrorType for Scl {
        type Error = Infallible;
    }

    impl OutputPin for Sda {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.0.borrow_mut().sda_released = false;
            Ok(())
        }
        fn set_high(&mut self) -> Result<(), Infallible> {
            self.0.borrow_mut().sda_released = true;
            Ok(())
        }
    }
    impl InputPin for Sda {
        fn is_high(&mut self) -> Result<bool, Infallible> {
            Ok(self.0.borrow().sda())
        }
        fn is_low(&mut self) -> Result<bool, Infallible> {
            Ok(!self.0.borrow().sda())
        }
    }

    impl OutputPin for Scl {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.0.borrow_mut().set_scl(false);
            Ok(())
        }
        fn set_high(&mut self) -> Result<(), Infallible> {
            self.0.borrow_mut().set_scl(true);
            Ok(())
        }
    }
    impl InputPin for Scl {
        fn is_high(&mut self) -> Result<bool, Infallible> {
            Ok(self.0.borrow().scl())
        }
        fn is_low(&mut self) -> Result<bool, Infallible> {
            Ok(!self.0.borrow().scl())
        }
    }

    #[derive(Default)]
    struct CountingDelay {
        total_ns: u64,
    }
    impl DelayNs for CountingDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.total_ns += u64::from(ns);
        }
    }

    const TIMING: BusTiming = BusTiming {
        bit_delay_us: 5,
        stretch_timeout_us: 50,
    };

    fn bus(wire: &Shared) -> BitBangBus<Sda, Scl, CountingDelay> {
        let mut bus = BitBangBus::new(
            Sda(Rc::clone(wire)),
            Scl(Rc::clone(wire)),
            CountingDelay::default(),
            TIMING,
        );
        bus.init().unwrap();
        wire.borrow_mut().sampled.clear();
        bus
    }

    fn bits_to_byte(bits: &[bool]) -> u8 {
        bits.iter().fold(0, |acc, &b| acc << 1 | u8::from(b))
    }

    #[test]
    fn init_leaves_both_lines_released() {
        let wire = Shared::default();
        let _bus = bus(&wire);
        let w = wire.borrow();
        assert!(w.sda());
        assert!(w.scl());
    }

    #[test]
    fn write_byte_is_msb_first() {
        let wire = Shared::default();
        let mut bus = bus(&wire);
        bus.start().unwrap();
        let ack = bus.write_byte(0x91).unwrap();

        let w = wire.borrow();
        // 8 data bits + the ACK clock.
        assert_eq!(w.sampled.len(), 9);
        assert_eq!(bits_to_byte(&w.sampled[..8]), 0x91);
        // Nobody pulled SDA low in the ACK slot.
        assert_eq!(ack, Ack::Nack);
    }

    #[test]
    fn read_byte_reconstructs_slave_pattern() {
        let wire = Shared::default();
        let mut bus = bus(&wire);
        bus.start().unwrap();
        {
            let mut w = wire.borrow_mut();
            // 0xA6 MSB first; first bit is presented right away.
            w.pattern = vec![true, false, true, false, false, true, true, false];
            w.present_next();
            w.sampled.clear();
        }
        let value = bus.read_byte(Ack::Nack).unwrap();
        assert_eq!(value, 0xA6);

        // The ninth clock carries the master's NACK (SDA high).
        let w = wire.borrow();
        assert_eq!(w.sampled.len(), 9);
        assert!(w.sampled[8]);
    }

    #[test]
    fn read_byte_sends_ack_low() {
        let wire = Shared::default();
        let mut bus = bus(&wire);
        bus.start().unwrap();
        wire.borrow_mut().sampled.clear();
        bus.read_byte(Ack::Ack).unwrap();
        let w = wire.borrow();
        assert!(!w.sampled[8]);
    }

    #[test]
    fn stop_releases_both_lines() {
        let wire = Shared::default();
        let mut bus = bus(&wire);
        bus.start().unwrap();
        bus.write_byte(0x00).unwrap();
        bus.stop().unwrap();
        let w = wire.borrow();
        assert!(w.sda() && w.scl());
    }

    #[test]
    fn start_refuses_when_sda_held_low() {
        let wire = Shared::default();
        let mut bus = bus(&wire);
        wire.borrow_mut().slave_sda_low = true;
        assert_eq!(bus.start(), Err(BusError::BusBusy));
    }

    #[test]
    fn stuck_clock_times_out() {
        let wire = Shared::default();
        let mut bus = bus(&wire);
        bus.start().unwrap();
        wire.borrow_mut().scl_stuck_low = true;
        assert_eq!(bus.write_bit(true), Err(BusError::ClockStretchTimeout));
    }

    #[test]
    fn init_reports_clock_held_low_at_power_up() {
        let wire = Shared::default();
        wire.borrow_mut().scl_stuck_low = true;
        let mut bus = BitBangBus::new(
            Sda(Rc::clone(&wire)),
            Scl(Rc::clone(&wire)),
            CountingDelay::default(),
            TIMING,
        );
        assert_eq!(bus.init(), Err(BusError::ClockStretchTimeout));
    }

    #[test]
    fn zero_timeout_skips_clock_check() {
        let wire = Shared::default();
        let mut bus = BitBangBus::new(
            Sda(Rc::clone(&wire)),
            Scl(Rc::clone(&wire)),
            CountingDelay::default(),
            BusTiming {
                bit_delay_us: 5,
                stretch_timeout_us: 0,
            },
        );
        bus.init().unwrap();
        wire.borrow_mut().scl_stuck_low = true;
        assert!(bus.write_bit(true).is_ok());
    }

    #[test]
    fn every_bit_costs_three_settling_delays() {
        let wire = Shared::default();
        let mut bus = bus(&wire);
        bus.write_bit(false).unwrap();
        let (_, _, delay) = bus.release();
        // init: 2 waits, write_bit: 3 waits.
        assert_eq!(delay.total_ns, 5 * 5 * 1000);
    }

    #[test]
    fn ack_bit_mapping() {
        assert_eq!(Ack::from_bit(false), Ack::Ack);
        assert_eq!(Ack::from_bit(true), Ack::Nack);
        assert!(Ack::Ack.is_ack());
        assert!(!Ack::Nack.is_ack());
    }
}
