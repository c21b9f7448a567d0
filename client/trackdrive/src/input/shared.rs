//! Lock-free two-axis input snapshot.
//!
//! Input producers (device bridge, on-screen widgets) write the latest stick
//! sample at arbitrary times; the vehicle controller reads it once per frame.
//! Both axes are packed into a single `AtomicU64` so a reader never observes
//! `x` from one sample and `y` from another.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

/// A two-axis stick sample with both components in `[-1, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputVector {
    /// Horizontal axis (positive = right).
    pub x: f32,
    /// Vertical axis (positive = up).
    pub y: f32,
}

impl InputVector {
    /// The released-stick sample.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Create a sample, clamping both axes to `[-1, 1]`.
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x: x.clamp(-1.0, 1.0),
            y: y.clamp(-1.0, 1.0),
        }
    }

    /// Whether both axes are exactly zero.
    ///
    /// There is no deadzone: any nonzero component counts as input.
    pub fn is_neutral(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    fn to_bits(self) -> u64 {
        (u64::from(self.x.to_bits()) << 32) | u64::from(self.y.to_bits())
    }

    #[allow(clippy::cast_possible_truncation)]
    fn from_bits(bits: u64) -> Self {
        Self {
            x: f32::from_bits((bits >> 32) as u32),
            y: f32::from_bits(bits as u32),
        }
    }
}

/// Shared handle to the latest input sample.
///
/// Cloning produces another handle to the same slot. Last write wins.
#[derive(Clone, Debug, Default)]
pub struct SharedInput {
    slot: Arc<AtomicU64>,
}

impl SharedInput {
    /// Store a new sample (the widget's "move" callback).
    pub fn store(&self, value: InputVector) {
        self.slot.store(value.to_bits(), Ordering::Release);
    }

    /// Reset to the neutral sample (the widget's "stop" callback).
    pub fn release(&self) {
        self.store(InputVector::ZERO);
    }

    /// Read the most recent sample.
    pub fn load(&self) -> InputVector {
        InputVector::from_bits(self.slot.load(Ordering::Acquire))
    }
}
