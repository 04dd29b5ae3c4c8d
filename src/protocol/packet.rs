//! Scan frame as it travels to the host.
//!
//! `[address << 1, row0, row1, ..., row14]`. Bit `c` of a row byte is the
//! level of column `c` while that row was selected: 0 = switch closed.

use crate::config::SWITCH_ROWS;

pub const FRAME_LEN: usize = 1 + SWITCH_ROWS;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanFrame {
    bytes: [u8; FRAME_LEN],
}

impl ScanFrame {
    /// Empty frame (every switch open) for the host at 7-bit `address`.
    pub fn new(address: u8) -> Self {
        let mut bytes = [0xFF; FRAME_LEN];
        bytes[0] = address << 1;
        Self { bytes }
    }

    pub fn address(&self) -> u8 {
        self.bytes[0] >> 1
    }

    #[inline]
    pub fn set_row(&mut self, row: usize, columns: u8) {
        self.bytes[1 + row] = columns;
    }

    #[inline]
    pub fn row(&self, row: usize) -> u8 {
        self.bytes[1 + row]
    }

    pub fn rows(&self) -> &[u8] {
        &self.bytes[1..]
    }

    pub fn is_closed(&self, row: usize, col: u8) -> bool {
        self.row(row) & (1 << col) == 0
    }

    pub fn as_bytes(&self) -> &[u8; FRAME_LEN] {
        &self.bytes
    }
}
