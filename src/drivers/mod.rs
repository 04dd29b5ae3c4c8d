pub mod led_matrix;
pub mod registers;
pub mod row_ring;
pub mod serial_console;
pub mod shift_register;
pub mod switch_matrix;

#[cfg(test)]
pub(crate) mod sim;

pub use led_matrix::{LedMatrix, LedRowStates};
pub use registers::{ResetLine, ShiftRegisters};
pub use row_ring::{RingPosition, RowRing};
pub use serial_console::{NullConsole, SerialConsole};
pub use shift_register::{Polarity, ShiftChain, ShiftLink};
pub use switch_matrix::{ColumnPort, SwitchMatrix};

/// Errors raised while driving the shift-register chains
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<E> {
    /// A pin operation failed
    Pin(E),
    /// Seeding would put a second select bit on a used row
    RingOccupied,
    /// No row is selected
    RingEmpty,
    /// The select bit is not on the row the sequence expects
    RingMisaligned,
}
