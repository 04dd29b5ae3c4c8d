//! 6x8 LED matrix, refreshed one row per tick.
//!
//! A single high bit walks through the LED-row chain. The column pattern
//! for the selected row is shifted into the LED-column chain, whose
//! outputs are active low: a 1 in the mask keeps that LED dark.

use embedded_hal::digital::v2::PinState;

use super::row_ring::{RingPosition, RowRing};
use super::shift_register::{shift_out_lsb_first, Polarity, ShiftLink};
use super::Error;
use crate::config::LED_ROWS;

/// Column masks for every LED row. Bit set = LED dark.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LedRowStates([u8; LED_ROWS]);

impl LedRowStates {
    pub const fn dark() -> Self {
        Self([0xFF; LED_ROWS])
    }

    #[inline]
    pub fn row(&self, row: usize) -> u8 {
        self.0[row]
    }

    #[inline]
    pub fn set_row(&mut self, row: usize, mask: u8) {
        self.0[row] = mask;
    }

    pub fn set_led(&mut self, row: usize, col: u8, lit: bool) {
        if lit {
            self.0[row] &= !(1 << col);
        } else {
            self.0[row] |= 1 << col;
        }
    }

    pub fn is_lit(&self, row: usize, col: u8) -> bool {
        self.0[row] & (1 << col) == 0
    }
}

impl Default for LedRowStates {
    fn default() -> Self {
        Self::dark()
    }
}

pub struct LedMatrix<R, C> {
    ring: RowRing<R, LED_ROWS>,
    columns: C,
    row: u8,
}

impl<R, C, E> LedMatrix<R, C>
where
    R: ShiftLink<Error = E>,
    C: ShiftLink<Error = E>,
{
    pub fn new(rows: R, columns: C) -> Self {
        Self {
            ring: RowRing::new(rows, Polarity::ActiveHigh),
            columns,
            row: 0,
        }
    }

    /// Row the next refresh writes
    pub fn current_row(&self) -> u8 {
        self.row
    }

    pub fn ring(&self) -> &RowRing<R, LED_ROWS> {
        &self.ring
    }

    /// Shift one column mask into the column chain, LSB first.
    pub fn write_columns(&mut self, mask: u8) -> Result<(), E> {
        shift_out_lsb_first(&mut self.columns, mask)
    }

    /// Show `states` for the current row, then select the next one.
    ///
    /// After the last row the select bit is clocked out and re-seeded at
    /// row 0, so the whole matrix is refreshed once every `LED_ROWS` calls.
    /// Returns the row that was written.
    pub fn refresh(&mut self, states: &LedRowStates) -> Result<u8, Error<E>> {
        let row = self.row;
        match self.ring.position() {
            RingPosition::Row(r) if r == row => {}
            RingPosition::Row(_) => return Err(Error::RingMisaligned),
            RingPosition::Empty => return Err(Error::RingEmpty),
        }

        self.write_columns(states.row(row as usize))
            .map_err(Error::Pin)?;
        self.ring.advance()?;

        if row as usize + 1 == LED_ROWS {
            self.ring.seed()?;
            self.row = 0;
        } else {
            self.row = row + 1;
        }
        Ok(row)
    }

    /// Evict any select bit and blank every column.
    pub(crate) fn flush(&mut self, bits: u8) -> Result<(), E> {
        self.ring.flush(bits)?;
        for _ in 0..bits {
            self.columns.clock_bit(PinState::High)?;
        }
        self.row = 0;
        Ok(())
    }

    pub(crate) fn seed(&mut self) -> Result<(), Error<E>> {
        self.ring.seed()?;
        self.row = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::REGISTER_FLUSH_BITS;
    use crate::drivers::shift_register::ShiftChain;
    use crate::drivers::sim::{SimChain, SimPin};

    type SimLeds = LedMatrix<ShiftChain<SimPin, SimPin>, ShiftChain<SimPin, SimPin>>;

    fn ready(rows: &SimChain, cols: &SimChain) -> SimLeds {
        let mut leds = LedMatrix::new(rows.link(), cols.link());
        leds.flush(REGISTER_FLUSH_BITS).unwrap();
        leds.seed().unwrap();
        leds
    }

    /// Column chain contents read back as the mask that was written.
    fn shown(cols: &SimChain) -> u8 {
        // LSB went in first, so it ends up in the last stage
        (cols.stages() as u8).reverse_bits()
    }

    #[test]
    fn states_track_lit_leds() {
        let mut states = LedRowStates::dark();
        states.set_led(2, 5, true);
        assert!(states.is_lit(2, 5));
        assert_eq!(states.row(2), 0b1101_1111);

        states.set_led(2, 5, false);
        assert_eq!(states, LedRowStates::default());
    }

    #[test]
    fn flush_blanks_every_column() {
        let rows = SimChain::with_stages(8, 0b0010_0101);
        let cols = SimChain::with_stages(8, 0x0F);
        ready(&rows, &cols);

        assert_eq!(cols.stages(), 0xFF);
        assert_eq!(rows.selected(6, true), vec![0]);
    }

    #[test]
    fn every_row_written_once_per_six_ticks() {
        let rows = SimChain::new(8);
        let cols = SimChain::new(8);
        let mut leds = ready(&rows, &cols);
        let mut states = LedRowStates::dark();
        for row in 0..LED_ROWS {
            states.set_row(row, 0x11 * row as u8);
        }

        // start mid-cycle, cadence must still cover each row once
        leds.refresh(&states).unwrap();
        leds.refresh(&states).unwrap();

        let mut written = Vec::new();
        for _ in 0..LED_ROWS {
            let selected = rows.selected(LED_ROWS, true);
            let row = leds.refresh(&states).unwrap();
            assert_eq!(selected, vec![row as usize]);
            assert_eq!(shown(&cols), states.row(row as usize));
            written.push(row);
        }

        assert_eq!(written, vec![2, 3, 4, 5, 0, 1]);
    }

    #[test]
    fn last_row_reseeds_instead_of_wrapping() {
        let rows = SimChain::new(8);
        let cols = SimChain::new(8);
        let mut leds = ready(&rows, &cols);
        let states = LedRowStates::dark();

        for _ in 0..LED_ROWS {
            leds.refresh(&states).unwrap();
        }

        assert_eq!(leds.current_row(), 0);
        assert_eq!(rows.selected(LED_ROWS, true), vec![0]);
        assert!(!rows.data(), "select line left inactive");
    }

    #[test]
    fn refresh_refuses_a_lost_ring() {
        let rows = SimChain::new(8);
        let cols = SimChain::new(8);
        let mut leds = LedMatrix::new(rows.link(), cols.link());

        assert_eq!(
            leds.refresh(&LedRowStates::dark()),
            Err(Error::RingEmpty)
        );
        assert_eq!(cols.clocks(), 0);
    }

    #[test]
    fn single_lit_led_lands_on_the_column_chain() {
        let rows = SimChain::new(8);
        let cols = SimChain::new(8);
        let mut leds = ready(&rows, &cols);

        let mut states = LedRowStates::dark();
        states.set_led(0, 7, true);
        leds.write_columns(states.row(0)).unwrap();

        assert_eq!(shown(&cols), 0x7F);
        assert_eq!(shown(&cols).count_zeros(), 1, "one LED lit");
        assert_eq!(rows.selected(LED_ROWS, true), vec![0]);
    }
}
