//! Single active select bit walking through a shift-register chain.
//!
//! The chain has no way to recirculate its output. Once the select bit has
//! been clocked past the last used row the ring is `Empty`, and only a
//! fresh seed brings it back to row 0.

use super::shift_register::{Polarity, ShiftLink};
use super::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RingPosition {
    Row(u8),
    Empty,
}

pub struct RowRing<L, const ROWS: usize> {
    link: L,
    polarity: Polarity,
    position: RingPosition,
}

impl<L: ShiftLink, const ROWS: usize> RowRing<L, ROWS> {
    /// Hardware contents are unknown until the ring is flushed.
    pub fn new(link: L, polarity: Polarity) -> Self {
        Self {
            link,
            polarity,
            position: RingPosition::Empty,
        }
    }

    #[inline]
    pub fn position(&self) -> RingPosition {
        self.position
    }

    /// Clock one inactive bit without touching the tracked position.
    fn flush_bit(&mut self) -> Result<(), L::Error> {
        self.link.clock_bit(self.polarity.inactive())
    }

    /// Clock `bits` inactive values through the chain, evicting any stale select bit.
    pub fn flush(&mut self, bits: u8) -> Result<(), L::Error> {
        for _ in 0..bits {
            self.flush_bit()?;
        }
        self.position = RingPosition::Empty;
        Ok(())
    }

    /// Clock a fresh select bit into stage 0 and park the data line inactive.
    pub fn seed(&mut self) -> Result<(), Error<L::Error>> {
        if let RingPosition::Row(_) = self.position {
            return Err(Error::RingOccupied);
        }
        self.link
            .clock_bit(self.polarity.active())
            .map_err(Error::Pin)?;
        self.link
            .idle(self.polarity.inactive())
            .map_err(Error::Pin)?;
        self.position = RingPosition::Row(0);
        Ok(())
    }

    /// Shift the select bit one row further.
    pub fn advance(&mut self) -> Result<RingPosition, Error<L::Error>> {
        let row = match self.position {
            RingPosition::Row(row) => row,
            RingPosition::Empty => return Err(Error::RingEmpty),
        };
        self.link
            .clock_bit(self.polarity.inactive())
            .map_err(Error::Pin)?;
        self.position = if (row as usize) + 1 < ROWS {
            RingPosition::Row(row + 1)
        } else {
            RingPosition::Empty
        };
        Ok(self.position)
    }
}
