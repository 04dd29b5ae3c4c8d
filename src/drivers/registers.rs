//! All shift-register chains of the board and their reset sequences.

use embedded_hal::digital::v2::OutputPin;

use super::led_matrix::LedMatrix;
use super::shift_register::ShiftLink;
use super::switch_matrix::{ColumnPort, SwitchMatrix};
use super::Error;
use crate::config::REGISTER_FLUSH_BITS;

/// Master-reset line shared by every 74LS164 (active low).
pub struct ResetLine<P> {
    pin: P,
}

impl<P: OutputPin> ResetLine<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    /// Clear every stage of every chain to 0.
    ///
    /// Zeroes select every active-low switch row at once, so this must be
    /// followed by [`ShiftRegisters::resync`].
    pub fn pulse(&mut self) -> Result<(), P::Error> {
        self.pin.set_low()?;
        self.pin.set_high()
    }
}

pub struct ShiftRegisters<SL, CP, LR, LC, RST> {
    switches: SwitchMatrix<SL, CP>,
    leds: LedMatrix<LR, LC>,
    reset: ResetLine<RST>,
}

impl<SL, CP, LR, LC, RST, E> ShiftRegisters<SL, CP, LR, LC, RST>
where
    SL: ShiftLink<Error = E>,
    CP: ColumnPort<Error = E>,
    LR: ShiftLink<Error = E>,
    LC: ShiftLink<Error = E>,
    RST: OutputPin<Error = E>,
{
    pub fn new(switches: SwitchMatrix<SL, CP>, leds: LedMatrix<LR, LC>, reset: RST) -> Self {
        Self {
            switches,
            leds,
            reset: ResetLine::new(reset),
        }
    }

    pub fn switches(&self) -> &SwitchMatrix<SL, CP> {
        &self.switches
    }

    pub fn switches_mut(&mut self) -> &mut SwitchMatrix<SL, CP> {
        &mut self.switches
    }

    pub fn leds(&self) -> &LedMatrix<LR, LC> {
        &self.leds
    }

    pub fn leds_mut(&mut self) -> &mut LedMatrix<LR, LC> {
        &mut self.leds
    }

    /// Hard reset through the shared reset line.
    pub fn clear(&mut self) -> Result<(), E> {
        self.reset.pulse()
    }

    /// Flush every chain with inactive bits, then seed switch row 0 and
    /// LED row 0. Idempotent; the only way back to a known ring position.
    pub fn resync(&mut self) -> Result<(), Error<E>> {
        self.switches
            .ring_mut()
            .flush(REGISTER_FLUSH_BITS)
            .map_err(Error::Pin)?;
        self.leds.flush(REGISTER_FLUSH_BITS).map_err(Error::Pin)?;

        self.switches.ring_mut().seed()?;
        self.leds.seed()
    }
}
