//! Transmit-only USART0 console (`debug` feature)

use avr_device::atmega328p::USART0;
use avr_device::interrupt::{self, Mutex};
use core::cell::RefCell;
use core::convert::Infallible;
use ufmt::uWrite;

use crate::config::CPU_FREQ_HZ;

// Buffer size must be power of 2 for efficient masking
const BUFFER_SIZE: usize = 64;
const BUFFER_MASK: usize = BUFFER_SIZE - 1;

// UCSR0B
const TXEN0: u8 = 1 << 3;
const UDRIE0: u8 = 1 << 5;
// UCSR0C: 8N1
const UCSZ_8BIT: u8 = 0x06;

pub struct Buffer {
    data: [u8; BUFFER_SIZE],
    write_idx: usize,
    read_idx: usize,
}

impl Buffer {
    const fn new() -> Self {
        Self {
            data: [0; BUFFER_SIZE],
            write_idx: 0,
            read_idx: 0,
        }
    }

    fn write(&mut self, byte: u8) -> bool {
        let next_write = (self.write_idx + 1) & BUFFER_MASK;
        if next_write != self.read_idx {
            self.data[self.write_idx] = byte;
            self.write_idx = next_write;
            true
        } else {
            false
        }
    }

    fn read(&mut self) -> Option<u8> {
        if self.read_idx != self.write_idx {
            let byte = self.data[self.read_idx];
            self.read_idx = (self.read_idx + 1) & BUFFER_MASK;
            Some(byte)
        } else {
            None
        }
    }
}

static TX_BUFFER: Mutex<RefCell<Buffer>> = Mutex::new(RefCell::new(Buffer::new()));

pub struct Usart {
    usart: USART0,
}

impl Usart {
    pub fn new(usart: USART0, baud: u32) -> Self {
        let ubrr = (CPU_FREQ_HZ / (16 * baud)).saturating_sub(1) as u16;
        unsafe {
            usart.ubrr0.write(|w| w.bits(ubrr));
            usart.ucsr0c.write(|w| w.bits(UCSZ_8BIT));
            usart.ucsr0b.write(|w| w.bits(TXEN0));
        }
        Self { usart }
    }

    /// Queue one byte. Dropped when the buffer is full so a chatty console
    /// never stalls the scan loop.
    pub fn write_byte(&mut self, byte: u8) {
        interrupt::free(|cs| {
            TX_BUFFER.borrow(cs).borrow_mut().write(byte);
            unsafe {
                self.usart.ucsr0b.modify(|r, w| w.bits(r.bits() | UDRIE0));
            }
        });
    }
}

impl uWrite for Usart {
    type Error = Infallible;

    fn write_str(&mut self, s: &str) -> Result<(), Infallible> {
        for byte in s.bytes() {
            self.write_byte(byte);
        }
        Ok(())
    }
}

#[avr_device::interrupt(atmega328p)]
fn USART_UDRE() {
    interrupt::free(|cs| {
        let usart = unsafe { &*USART0::ptr() };
        if let Some(byte) = TX_BUFFER.borrow(cs).borrow_mut().read() {
            unsafe { usart.udr0.write(|w| w.bits(byte)) };
        } else {
            // Buffer empty - disable TX interrupt
            unsafe { usart.ucsr0b.modify(|r, w| w.bits(r.bits() & !UDRIE0)) };
        }
    });
}
