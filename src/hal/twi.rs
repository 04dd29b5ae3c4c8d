//! Interrupt-driven TWI master transmitter

use avr_device::atmega328p::TWI as TwiPeripheral;
use avr_device::interrupt::{self, Mutex};
use core::cell::RefCell;

use crate::config::CPU_FREQ_HZ;
use crate::protocol::{BusTransceiver, MasterTransfer, TwiAction, TwiError};

// TWCR bits
const TWINT: u8 = 1 << 7;
const TWSTA: u8 = 1 << 5;
const TWSTO: u8 = 1 << 4;
const TWEN: u8 = 1 << 2;
const TWIE: u8 = 1 << 0;

const STATUS_MASK: u8 = 0xF8;

/// Frame in flight, owned by the TWI interrupt while busy
static TRANSFER: Mutex<RefCell<MasterTransfer>> = Mutex::new(RefCell::new(MasterTransfer::new()));

pub struct Twi {
    twi: TwiPeripheral,
}

impl Twi {
    /// Enable the peripheral at `bitrate_hz` (prescaler 1).
    pub fn new(twi: TwiPeripheral, bitrate_hz: u32) -> Self {
        let twbr = ((CPU_FREQ_HZ / bitrate_hz).saturating_sub(16) / 2) as u8;
        unsafe {
            twi.twsr.write(|w| w.bits(0));
            twi.twbr.write(|w| w.bits(twbr));
            twi.twcr.write(|w| w.bits(TWEN));
        }
        Self { twi }
    }
}

impl BusTransceiver for Twi {
    type Error = TwiError;

    /// Queue `frame` and issue START. Returns the outcome of the previous
    /// transfer; this one is reported by the next call. Never waits: a
    /// transfer still in flight fails the new frame with `TwiError::Busy`.
    fn transceive(&mut self, frame: &[u8]) -> Result<(), TwiError> {
        interrupt::free(|cs| {
            let mut xfer = TRANSFER.borrow(cs).borrow_mut();
            xfer.load(frame)?;
            let previous = xfer.take_outcome();
            unsafe {
                self.twi.twcr.write(|w| w.bits(TWINT | TWSTA | TWEN | TWIE));
            }
            previous
        })
    }
}

#[avr_device::interrupt(atmega328p)]
fn TWI() {
    interrupt::free(|cs| {
        let twi = unsafe { &*TwiPeripheral::ptr() };
        let status = twi.twsr.read().bits() & STATUS_MASK;

        let control = match TRANSFER.borrow(cs).borrow_mut().on_status(status) {
            TwiAction::Send(byte) => {
                unsafe { twi.twdr.write(|w| w.bits(byte)) };
                TWINT | TWEN | TWIE
            }
            TwiAction::Stop => TWINT | TWSTO | TWEN,
            TwiAction::Restart => TWINT | TWSTA | TWEN | TWIE,
        };
        unsafe { twi.twcr.write(|w| w.bits(control)) };
    });
}
