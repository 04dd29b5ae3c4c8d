//! Interrupt-driven TWI master-transmitter state machine.
//!
//! The foreground loads a frame and issues START; every TWI interrupt then
//! feeds the masked status register into [`MasterTransfer::on_status`] and
//! applies the returned [`TwiAction`] to the control register.

use super::packet::FRAME_LEN;

/// TWI status codes (TWSR & 0xF8), master transmitter
pub const TW_START: u8 = 0x08;
pub const TW_REP_START: u8 = 0x10;
pub const TW_MT_SLA_ACK: u8 = 0x18;
pub const TW_MT_SLA_NACK: u8 = 0x20;
pub const TW_MT_DATA_ACK: u8 = 0x28;
pub const TW_MT_DATA_NACK: u8 = 0x30;
pub const TW_ARB_LOST: u8 = 0x38;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TwiError {
    /// Nobody acknowledged the address byte
    AddressNack,
    /// The target refused a payload byte
    DataNack,
    /// Unexpected status, e.g. an illegal START/STOP on the bus
    Bus(u8),
    /// Frame does not fit the driver buffer
    Overflow,
    /// The previous transfer never finished, e.g. SCL held low
    Busy,
}

/// What the interrupt handler must do next with the TWI peripheral
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TwiAction {
    /// Load TWDR and clear TWINT
    Send(u8),
    /// Issue STOP and release the bus
    Stop,
    /// Issue START again once the bus is free
    Restart,
}

pub struct MasterTransfer {
    buffer: [u8; FRAME_LEN],
    len: u8,
    index: u8,
    busy: bool,
    outcome: Result<(), TwiError>,
}

impl MasterTransfer {
    pub const fn new() -> Self {
        Self {
            buffer: [0; FRAME_LEN],
            len: 0,
            index: 0,
            busy: false,
            outcome: Ok(()),
        }
    }

    #[inline]
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Outcome of the last finished transfer, cleared on read.
    pub fn take_outcome(&mut self) -> Result<(), TwiError> {
        core::mem::replace(&mut self.outcome, Ok(()))
    }

    /// Copy `frame` in and mark the transfer busy. The caller issues START.
    ///
    /// Refused while a transfer is still in flight; that one is left intact.
    pub fn load(&mut self, frame: &[u8]) -> Result<(), TwiError> {
        if self.busy {
            return Err(TwiError::Busy);
        }
        if frame.len() > FRAME_LEN {
            return Err(TwiError::Overflow);
        }
        self.buffer[..frame.len()].copy_from_slice(frame);
        self.len = frame.len() as u8;
        self.index = 0;
        self.busy = true;
        Ok(())
    }

    pub fn on_status(&mut self, status: u8) -> TwiAction {
        match status {
            TW_START | TW_REP_START => {
                self.index = 0;
                self.send_next()
            }
            TW_MT_SLA_ACK | TW_MT_DATA_ACK => self.send_next(),
            TW_MT_SLA_NACK => self.finish(Err(TwiError::AddressNack)),
            TW_MT_DATA_NACK => self.finish(Err(TwiError::DataNack)),
            TW_ARB_LOST => TwiAction::Restart,
            other => self.finish(Err(TwiError::Bus(other))),
        }
    }

    fn send_next(&mut self) -> TwiAction {
        if self.index < self.len {
            let byte = self.buffer[self.index as usize];
            self.index += 1;
            TwiAction::Send(byte)
        } else {
            self.finish(Ok(()))
        }
    }

    fn finish(&mut self, outcome: Result<(), TwiError>) -> TwiAction {
        self.busy = false;
        self.outcome = outcome;
        TwiAction::Stop
    }
}

impl Default for MasterTransfer {
    fn default() -> Self {
        Self::new()
    }
}
