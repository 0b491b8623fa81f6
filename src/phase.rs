use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// Signal shown by the light.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    Red,
    Green,
}

impl Phase {
    pub fn toggled(self) -> Phase {
        match self {
            Phase::Red => Phase::Green,
            Phase::Green => Phase::Red,
        }
    }

    pub fn is_green(self) -> bool {
        self == Phase::Green
    }

    fn to_bits(self) -> u8 {
        match self {
            Phase::Red => 0,
            Phase::Green => 1,
        }
    }

    fn from_bits(bits: u8) -> Phase {
        if bits & 1 == 0 {
            Phase::Red
        } else {
            Phase::Green
        }
    }
}

impl Default for Phase {
    fn default() -> Self {
        Phase::Red
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Red => write!(f, "red"),
            Phase::Green => write!(f, "green"),
        }
    }
}

/// Phase cell written by one thread and read by many.
///
/// Loads are relaxed, so a reader may see a value that is already stale by
/// the time it acts on it. Readers that need ordering get it from the phase
/// queue, whose lock publishes the toggle along with the notification.
#[derive(Debug)]
pub struct AtomicPhase(AtomicU8);

impl AtomicPhase {
    pub fn new(phase: Phase) -> AtomicPhase {
        AtomicPhase(AtomicU8::new(phase.to_bits()))
    }

    pub fn load(&self) -> Phase {
        Phase::from_bits(self.0.load(Ordering::Relaxed))
    }

    /// Flips the phase and returns the new one.
    pub fn toggle(&self) -> Phase {
        let previous = self.0.fetch_xor(1, Ordering::Relaxed);
        Phase::from_bits(previous).toggled()
    }
}

impl Default for AtomicPhase {
    fn default() -> Self {
        AtomicPhase::new(Phase::default())
    }
}
