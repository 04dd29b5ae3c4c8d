use avr_device::atmega328p::{PORTB, PORTC, PORTD};
use core::convert::Infallible;
use core::marker::PhantomData;
use embedded_hal::digital::v2::OutputPin;

use crate::config::pins;
use crate::drivers::{ColumnPort, ShiftChain};

/// Push-pull output on bit `BIT` of `PORT`
pub struct Output<PORT, const BIT: u8> {
    _port: PhantomData<PORT>,
}

macro_rules! impl_output {
    ($PORT:ident, $port:ident) => {
        impl<const BIT: u8> Output<$PORT, BIT> {
            fn new() -> Self {
                Self { _port: PhantomData }
            }
        }

        impl<const BIT: u8> OutputPin for Output<$PORT, BIT> {
            type Error = Infallible;

            #[inline]
            fn set_low(&mut self) -> Result<(), Infallible> {
                // Only the foreground loop writes these ports
                unsafe {
                    (*$PORT::ptr()).$port.modify(|r, w| w.bits(r.bits() & !(1 << BIT)));
                }
                Ok(())
            }

            #[inline]
            fn set_high(&mut self) -> Result<(), Infallible> {
                unsafe {
                    (*$PORT::ptr()).$port.modify(|r, w| w.bits(r.bits() | (1 << BIT)));
                }
                Ok(())
            }
        }
    };
}

impl_output!(PORTB, portb);
impl_output!(PORTC, portc);

/// All eight switch columns, read in one go from PIND
pub struct ColumnInputs {
    _port: PhantomData<PORTD>,
}

impl ColumnPort for ColumnInputs {
    type Error = Infallible;

    #[inline]
    fn read_columns(&mut self) -> Result<u8, Infallible> {
        Ok(unsafe { (*PORTD::ptr()).pind.read().bits() })
    }
}

pub type SwitchRowLink = ShiftChain<Output<PORTB, { pins::SW_ROW_DAT }>, Output<PORTB, { pins::SW_ROW_CLK }>>;
pub type LedRowLink = ShiftChain<Output<PORTB, { pins::LED_ROW_DAT }>, Output<PORTB, { pins::LED_ROW_CLK }>>;
pub type LedColumnLink = ShiftChain<Output<PORTB, { pins::LED_COL_DAT }>, Output<PORTB, { pins::LED_COL_CLK }>>;
pub type ResetPin = Output<PORTC, { pins::SHIFTREGS_RESET }>;

// Key/LED controller board wiring
pub mod board {
    use super::*;

    pub struct Board {
        pub switch_rows: SwitchRowLink,
        pub led_rows: LedRowLink,
        pub led_columns: LedColumnLink,
        pub columns: ColumnInputs,
        pub reset: ResetPin,
    }

    const CHAIN_MASK: u8 = (1 << pins::SW_ROW_DAT)
        | (1 << pins::SW_ROW_CLK)
        | (1 << pins::LED_ROW_DAT)
        | (1 << pins::LED_ROW_CLK)
        | (1 << pins::LED_COL_DAT)
        | (1 << pins::LED_COL_CLK);

    /// Set the port directions and hand out the board's pins.
    ///
    /// Clocks idle high and the reset line is released. The switch columns
    /// are plain inputs; the rows drive them through the board's resistors.
    pub fn configure(portb: PORTB, portc: PORTC, portd: PORTD) -> Board {
        unsafe {
            portb.portb.write(|w| w.bits(CHAIN_MASK));
            portb.ddrb.write(|w| w.bits(CHAIN_MASK));

            portc.portc.modify(|r, w| w.bits(r.bits() | (1 << pins::SHIFTREGS_RESET)));
            portc.ddrc.modify(|r, w| w.bits(r.bits() | (1 << pins::SHIFTREGS_RESET)));

            portd.ddrd.write(|w| w.bits(0x00));
            portd.portd.write(|w| w.bits(0x00));
        }

        Board {
            switch_rows: ShiftChain::new(Output::new(), Output::new()),
            led_rows: ShiftChain::new(Output::new(), Output::new()),
            led_columns: ShiftChain::new(Output::new(), Output::new()),
            columns: ColumnInputs { _port: PhantomData },
            reset: Output::new(),
        }
    }
}
