//! Lock-free single-producer / single-consumer byte ring.
//!
//! One side (interrupt or foreground) produces, the other consumes.  Each
//! index has exactly one writer:
//!
//! | Index  | Written by | Meaning                  |
//! |--------|------------|--------------------------|
//! | `head` | producer   | slot of the last byte in |
//! | `tail` | consumer   | slot of the last byte out|
//!
//! Both indices point at the *last used* slot and advance by a masked
//! increment before the slot is touched, so `head == tail` means empty and
//! one slot is always unusable: a ring of `N` slots holds `N - 1` bytes.
//!
//! Slots are atomics too, so a consumer reading while the producer
//! overwrites (see [`ByteRing::push_overwrite`]) is a stale byte, never UB.

use core::sync::atomic::{AtomicU8, Ordering};

pub struct ByteRing<const N: usize> {
    slots: [AtomicU8; N],
    head: AtomicU8,
    tail: AtomicU8,
}

impl<const N: usize> ByteRing<N> {
    const SIZE_OK: () = assert!(
        N.is_power_of_two() && N >= 2 && N <= 256,
        "ring size must be a power of two in 2..=256"
    );
    const MASK: u8 = (N - 1) as u8;

    /// Bytes the ring can actually hold at once.
    pub const CAPACITY: usize = N - 1;

    pub const fn new() -> Self {
        let () = Self::SIZE_OK;
        Self {
            slots: [const { AtomicU8::new(0) }; N],
            head: AtomicU8::new(0),
            tail: AtomicU8::new(0),
        }
    }

    #[inline]
    const fn next(index: u8) -> u8 {
        index.wrapping_add(1) & Self::MASK
    }

    // ── Producer side ─────────────────────────────────────────

    /// Enqueue `byte`, or hand it back if the ring is full.
    pub fn try_push(&self, byte: u8) -> Result<(), u8> {
        let next = Self::next(self.head.load(Ordering::Relaxed));
        if next == self.tail.load(Ordering::Acquire) {
            return Err(byte);
        }
        self.slots[next as usize].store(byte, Ordering::Relaxed);
        self.head.store(next, Ordering::Release);
        Ok(())
    }

    /// Enqueue `byte` even when full.  On collision the head lands on the
    /// tail, the ring reads as empty and everything buffered is lost.
    /// Returns `true` if that happened.
    pub fn push_overwrite(&self, byte: u8) -> bool {
        let next = Self::next(self.head.load(Ordering::Relaxed));
        let collided = next == self.tail.load(Ordering::Acquire);
        self.slots[next as usize].store(byte, Ordering::Relaxed);
        self.head.store(next, Ordering::Release);
        collided
    }

    // ── Consumer side ─────────────────────────────────────────

    /// Dequeue the oldest byte.
    pub fn pop(&self) -> Option<u8> {
        let tail = self.tail.load(Ordering::Relaxed);
        if tail == self.head.load(Ordering::Acquire) {
            return None;
        }
        let next = Self::next(tail);
        let byte = self.slots[next as usize].load(Ordering::Relaxed);
        self.tail.store(next, Ordering::Release);
        Some(byte)
    }

    // ── Either side ───────────────────────────────────────────

    pub fn is_empty(&self) -> bool {
        self.head.load(Ordering::Acquire) == self.tail.load(Ordering::Acquire)
    }

    pub fn is_full(&self) -> bool {
        Self::next(self.head.load(Ordering::Acquire)) == self.tail.load(Ordering::Acquire)
    }

    /// Number of buffered bytes (a snapshot; the other side may move).
    pub fn len(&self) -> usize {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        (head.wrapping_sub(tail) & Self::MASK) as usize
    }

    /// Empty the ring.  Writes both indices, so only call it while neither
    /// side is running (e.g. before interrupts are enabled).
    pub fn reset(&self) {
        self.head.store(0, Ordering::Relaxed);
        self.tail.store(0, Ordering::Release);
    }
}

impl<const N: usize> Default for ByteRing<N> {
    fn default() -> Self {
        Self::new()
    }
}
