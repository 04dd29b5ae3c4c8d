//! Deadline monitoring and the terminal fallback mode.
//!
//! A scan cycle that is still running when the next tick arrives proves the
//! firmware cannot keep its timing. There is no recovery: the monitor
//! latches the first fault and the board only animates a walking bit on
//! the first LED row until it is reset.

use crate::config::FALLBACK_STEP_TICKS;
use crate::os::TickFlag;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Cycle outran the tick period; `tick` is the cycle that overran
    DeadlineMiss { tick: u32 },
    /// A row-select ring was not where the cycle expected it
    RingDesync { tick: u32 },
}

impl Fault {
    pub fn describe(&self) -> &'static str {
        match self {
            Fault::DeadlineMiss { .. } => "deadline miss",
            Fault::RingDesync { .. } => "ring desync",
        }
    }

    pub fn tick(&self) -> u32 {
        match *self {
            Fault::DeadlineMiss { tick } | Fault::RingDesync { tick } => tick,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Fallback(Fault),
}

pub struct DeadlineMonitor {
    mode: Mode,
}

impl DeadlineMonitor {
    pub const fn new() -> Self {
        Self { mode: Mode::Normal }
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Call right after a cycle finished. A tick already pending means the
    /// cycle took longer than the tick period.
    pub fn check(&mut self, tick: &TickFlag, now: u32) -> Mode {
        if tick.is_raised() {
            self.trip(Fault::DeadlineMiss { tick: now });
        }
        self.mode
    }

    /// Enter fallback. The first fault is kept; later ones are ignored.
    pub fn trip(&mut self, fault: Fault) -> Mode {
        if self.mode == Mode::Normal {
            self.mode = Mode::Fallback(fault);
        }
        self.mode
    }
}

impl Default for DeadlineMonitor {
    fn default() -> Self {
        Self::new()
    }
}

/// Single lit LED walking right across a column mask, one step per
/// `FALLBACK_STEP_TICKS` ticks.
pub struct FallbackWalk {
    ticks: u16,
    pattern: u8,
}

impl FallbackWalk {
    pub const fn new() -> Self {
        Self {
            ticks: 0,
            pattern: 0x80,
        }
    }

    /// Count one tick; returns the column mask to show when a step is due,
    /// active low like `LedRowStates` (only the walking LED is lit).
    pub fn tick(&mut self) -> Option<u8> {
        self.ticks += 1;
        if self.ticks < FALLBACK_STEP_TICKS {
            return None;
        }
        self.ticks = 0;
        let shown = self.pattern;
        self.pattern = if shown == 0x01 { 0x80 } else { shown >> 1 };
        Some(!shown)
    }
}

impl Default for FallbackWalk {
    fn default() -> Self {
        Self::new()
    }
}
