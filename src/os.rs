//! Tick signalling between the timer interrupt and the foreground loop

use core::convert::Infallible;
use core::sync::atomic::{AtomicBool, Ordering};

use crate::config::{CPU_FREQ_HZ, SCAN_HZ, TIMER0_PRESCALER, TIMER0_TOP};

/// One-slot signal raised by the timer overflow interrupt.
///
/// The interrupt only ever stores `true`; the foreground loop is the sole
/// consumer and clears it. Nothing else is shared between the two contexts.
pub struct TickFlag {
    raised: AtomicBool,
}

impl TickFlag {
    pub const fn new() -> Self {
        Self {
            raised: AtomicBool::new(false),
        }
    }

    /// Called from the timer interrupt.
    #[inline]
    pub fn raise(&self) {
        self.raised.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::Acquire)
    }

    /// Consume a pending tick, or `WouldBlock` until the timer fires.
    #[inline]
    pub fn poll(&self) -> nb::Result<(), Infallible> {
        if self.raised.load(Ordering::Acquire) {
            self.raised.store(false, Ordering::Release);
            Ok(())
        } else {
            Err(nb::Error::WouldBlock)
        }
    }
}

impl Default for TickFlag {
    fn default() -> Self {
        Self::new()
    }
}

/// Global tick flag, raised by `TIMER0_OVF`
pub static TICK: TickFlag = TickFlag::new();

/// Overflow timing of an 8-bit timer counting up to `top`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerConfig {
    pub cpu_hz: u32,
    pub prescaler: u32,
    pub top: u8,
}

impl TimerConfig {
    /// Pick the TOP value for `target_hz`, truncating like the register would.
    pub const fn for_frequency(cpu_hz: u32, prescaler: u32, target_hz: u32) -> Self {
        let counts = cpu_hz / prescaler / target_hz;
        let top = if counts > 255 { 255 } else { counts as u8 };
        Self {
            cpu_hz,
            prescaler,
            top,
        }
    }

    /// prescaler / clock_frequency * (top + 1), in microseconds
    pub const fn period_us(&self) -> u32 {
        let cycles = self.prescaler as u64 * (self.top as u64 + 1);
        (cycles * 1_000_000 / self.cpu_hz as u64) as u32
    }
}

/// Timer0 settings used by the firmware
pub const TICK_TIMER: TimerConfig = TimerConfig {
    cpu_hz: CPU_FREQ_HZ,
    prescaler: TIMER0_PRESCALER,
    top: TIMER0_TOP,
};
