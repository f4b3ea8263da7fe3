//! Haptic feedback vocabulary.
//!
//! A pattern is a list of alternating on/off durations in milliseconds,
//! starting with "on". Output devices are best-effort; an implementation
//! that cannot vibrate simply does nothing.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HapticPattern(Vec<u32>);

impl HapticPattern {
    /// Single pulse of `ms` milliseconds.
    pub fn pulse(ms: u32) -> Self {
        Self(vec![ms])
    }

    /// Alternating on/off sequence.
    pub fn sequence(segments: &[u32]) -> Self {
        Self(segments.to_vec())
    }

    pub fn segments(&self) -> &[u32] {
        &self.0
    }

    /// Number of "on" segments.
    pub fn pulses(&self) -> usize {
        self.0.len().div_ceil(2)
    }
}

/// Output seam for vibration. Calls are fire-and-forget.
pub trait Haptics {
    fn vibrate(&self, pattern: &HapticPattern);
}

/// Used where the platform has no vibration capability.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHaptics;

impl Haptics for NoHaptics {
    fn vibrate(&self, _pattern: &HapticPattern) {}
}
