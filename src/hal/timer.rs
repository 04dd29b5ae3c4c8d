use avr_device::atmega328p::TC0;

use crate::config::TIMER0_PRESCALER;
use crate::os::{TimerConfig, TICK};

/// Timer0 clock select (CS02:0)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Prescaler {
    Stop = 0,
    Direct = 1,
    Div8 = 2,
    Div64 = 3,
    Div256 = 4,
    Div1024 = 5,
}

impl Prescaler {
    pub const fn from_divider(divider: u32) -> Option<Self> {
        match divider {
            1 => Some(Prescaler::Direct),
            8 => Some(Prescaler::Div8),
            64 => Some(Prescaler::Div64),
            256 => Some(Prescaler::Div256),
            1024 => Some(Prescaler::Div1024),
            _ => None,
        }
    }
}

const TICK_PRESCALER: Prescaler = match Prescaler::from_divider(TIMER0_PRESCALER) {
    Some(p) => p,
    None => panic!("Timer0 has no such prescaler"),
};

// TCCR0A: WGM01 | WGM00
const FAST_PWM_A: u8 = 0x03;
// TCCR0B: WGM02, TOP = OCR0A
const FAST_PWM_B: u8 = 0x08;
const TOIE0: u8 = 0x01;

/// Timer0 as the scan tick source
pub struct TickTimer {
    _tc0: TC0,
}

impl TickTimer {
    /// Fast PWM counting to `config.top`, overflow interrupt on.
    /// Interrupts still have to be enabled globally.
    pub fn start(tc0: TC0, config: TimerConfig) -> Self {
        unsafe {
            tc0.tccr0b.write(|w| w.bits(Prescaler::Stop as u8));
            tc0.tcnt0.write(|w| w.bits(0));
            tc0.ocr0a.write(|w| w.bits(config.top));
            tc0.tccr0a.write(|w| w.bits(FAST_PWM_A));
            tc0.timsk0.write(|w| w.bits(TOIE0));
            tc0.tccr0b.write(|w| w.bits(FAST_PWM_B | TICK_PRESCALER as u8));
        }
        Self { _tc0: tc0 }
    }
}

#[avr_device::interrupt(atmega328p)]
fn TIMER0_OVF() {
    TICK.raise();
}
