//! 15x8 switch matrix scanning.
//!
//! Rows are selected by walking a single low bit through a 16-stage
//! shift-register chain (15 stages used). Columns are read in parallel
//! from an 8-bit input port; a column reads low when a closed switch
//! connects it to the selected row.
//!
//! Row wiring: rows 0-2 carry the quadrature and click contacts of the
//! rotary encoders, rows 3-14 carry the normally-closed and normally-open
//! contacts of the SPDT keys, two rows per key. Only raw snapshots are
//! taken here; timing of the break-before-make interval is left to the host.

use embedded_hal::digital::v2::InputPin;

use super::row_ring::{RingPosition, RowRing};
use super::shift_register::{Polarity, ShiftLink};
use super::Error;
use crate::config::{MATRIX_COLS, SWITCH_ROWS};
use crate::protocol::packet::ScanFrame;

/// 8-bit parallel column input. Bit `c` is the level of column `c`.
pub trait ColumnPort {
    type Error;

    fn read_columns(&mut self) -> Result<u8, Self::Error>;
}

impl<P, E> ColumnPort for [P; MATRIX_COLS]
where
    P: InputPin<Error = E>,
{
    type Error = E;

    fn read_columns(&mut self) -> Result<u8, E> {
        let mut columns = 0;
        for (col, pin) in self.iter().enumerate() {
            if pin.is_high()? {
                columns |= 1 << col;
            }
        }
        Ok(columns)
    }
}

pub struct SwitchMatrix<L, C> {
    ring: RowRing<L, SWITCH_ROWS>,
    columns: C,
}

impl<L, C, E> SwitchMatrix<L, C>
where
    L: ShiftLink<Error = E>,
    C: ColumnPort<Error = E>,
{
    pub fn new(rows: L, columns: C) -> Self {
        Self {
            ring: RowRing::new(rows, Polarity::ActiveLow),
            columns,
        }
    }

    pub fn ring(&self) -> &RowRing<L, SWITCH_ROWS> {
        &self.ring
    }

    pub fn ring_mut(&mut self) -> &mut RowRing<L, SWITCH_ROWS> {
        &mut self.ring
    }

    /// Sample every row into `frame`.
    ///
    /// Expects row 0 selected. The select bit is clocked past the last row
    /// and then re-seeded, so row 0 is selected again on return.
    pub fn scan(&mut self, frame: &mut ScanFrame) -> Result<(), Error<E>> {
        match self.ring.position() {
            RingPosition::Row(0) => {}
            RingPosition::Row(_) => return Err(Error::RingMisaligned),
            RingPosition::Empty => return Err(Error::RingEmpty),
        }

        for row in 0..SWITCH_ROWS {
            let columns = self.columns.read_columns().map_err(Error::Pin)?;
            frame.set_row(row, columns);
            self.ring.advance()?;
        }

        self.ring.seed()
    }
}
