//! Boxcar (moving-average) filter over the last 16 raw temperature samples.
//!
//! The window must be full before the first average is taken; either call
//! [`MovingAverage::preload`] at startup or let the first [`push`] fill
//! every slot with that sample.
//!
//! [`push`]: MovingAverage::push

/// log2 of the window depth.
pub const SMOOTHING_SHIFT: u32 = 4;
/// Window depth.
pub const SMOOTHING_DEPTH: usize = 1 << SMOOTHING_SHIFT;
const CURSOR_MASK: usize = SMOOTHING_DEPTH - 1;

const _: () = assert!(SMOOTHING_DEPTH.is_power_of_two());

#[derive(Debug, Clone)]
pub struct MovingAverage {
    window: [u8; SMOOTHING_DEPTH],
    cursor: usize,
    primed: bool,
}

impl MovingAverage {
    pub const fn new() -> Self {
        Self {
            window: [0; SMOOTHING_DEPTH],
            cursor: 0,
            primed: false,
        }
    }

    /// Fill every slot with `temp`.
    pub fn preload(&mut self, temp: u8) {
        self.window = [temp; SMOOTHING_DEPTH];
        self.primed = true;
    }

    /// Insert `sample` at the cursor and return the new average.
    pub fn push(&mut self, sample: u8) -> u8 {
        if !self.primed {
            self.preload(sample);
        }
        self.window[self.cursor] = sample;
        self.cursor = (self.cursor + 1) & CURSOR_MASK;
        self.mean()
    }

    /// Current average, or `None` before the window has been filled.
    pub fn average(&self) -> Option<u8> {
        self.primed.then(|| self.mean())
    }

    pub fn is_primed(&self) -> bool {
        self.primed
    }

    fn mean(&self) -> u8 {
        let sum: u16 = self.window.iter().map(|&t| u16::from(t)).sum();
        (sum >> SMOOTHING_SHIFT) as u8
    }
}

impl Default for MovingAverage {
    fn default() -> Self {
        Self::new()
    }
}
