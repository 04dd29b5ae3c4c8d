//! Transport layer: pushes each finished scan frame onto the bus.
//!
//! Failures are counted and returned to the caller, never retried; the
//! next tick produces a fresh frame anyway.

use embedded_hal::blocking::i2c;

use super::packet::ScanFrame;
use super::BusTransceiver;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TransportStats {
    pub sent: u32,
    pub failed: u32,
}

pub struct Transport<B> {
    bus: B,
    stats: TransportStats,
}

impl<B: BusTransceiver> Transport<B> {
    pub fn new(bus: B) -> Self {
        Self {
            bus,
            stats: TransportStats::default(),
        }
    }

    pub fn hand_off(&mut self, frame: &ScanFrame) -> Result<(), B::Error> {
        match self.bus.transceive(frame.as_bytes()) {
            Ok(()) => {
                self.stats.sent = self.stats.sent.wrapping_add(1);
                Ok(())
            }
            Err(e) => {
                self.stats.failed = self.stats.failed.wrapping_add(1);
                Err(e)
            }
        }
    }

    pub fn stats(&self) -> TransportStats {
        self.stats
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn release(self) -> B {
        self.bus
    }
}

/// Drives any blocking embedded-hal I2C master with pre-addressed frames.
pub struct I2cTransceiver<I> {
    i2c: I,
}

impl<I: i2c::Write> I2cTransceiver<I> {
    pub fn new(i2c: I) -> Self {
        Self { i2c }
    }

    pub fn release(self) -> I {
        self.i2c
    }
}

impl<I: i2c::Write> BusTransceiver for I2cTransceiver<I> {
    type Error = I::Error;

    fn transceive(&mut self, frame: &[u8]) -> Result<(), I::Error> {
        match frame.split_first() {
            Some((&address, payload)) => self.i2c.write(address >> 1, payload),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::i2c::{Mock as I2cMock, Transaction};
    use embedded_hal_mock::MockError;

    fn frame() -> ScanFrame {
        let mut frame = ScanFrame::new(0x42);
        for row in 0..15 {
            frame.set_row(row, 0xF0 | row as u8);
        }
        frame
    }

    #[test]
    fn address_byte_becomes_the_bus_address() {
        let frame = frame();
        let payload: Vec<u8> = frame.rows().to_vec();
        let i2c = I2cMock::new(&[Transaction::write(0x42, payload)]);
        let mut transport = Transport::new(I2cTransceiver::new(i2c));

        transport.hand_off(&frame).unwrap();

        assert_eq!(transport.stats(), TransportStats { sent: 1, failed: 0 });
        transport.release().release().done();
    }

    #[test]
    fn failures_are_counted_not_retried() {
        let frame = frame();
        let payload: Vec<u8> = frame.rows().to_vec();
        let i2c = I2cMock::new(&[
            Transaction::write(0x42, payload.clone())
                .with_error(MockError::Io(std::io::ErrorKind::Other)),
            Transaction::write(0x42, payload),
        ]);
        let mut transport = Transport::new(I2cTransceiver::new(i2c));

        assert!(transport.hand_off(&frame).is_err());
        assert!(transport.hand_off(&frame).is_ok());

        assert_eq!(transport.stats(), TransportStats { sent: 1, failed: 1 });
        transport.release().release().done();
    }

    /// Interrupt-driven bus whose interrupt never fires.
    struct StalledBus(crate::protocol::MasterTransfer);

    impl BusTransceiver for StalledBus {
        type Error = crate::protocol::TwiError;

        fn transceive(&mut self, frame: &[u8]) -> Result<(), Self::Error> {
            self.0.load(frame)?;
            self.0.take_outcome()
        }
    }

    #[test]
    fn stalled_bus_fails_fast() {
        let frame = frame();
        let mut transport = Transport::new(StalledBus(crate::protocol::MasterTransfer::new()));

        assert_eq!(transport.hand_off(&frame), Ok(()));
        assert_eq!(
            transport.hand_off(&frame),
            Err(crate::protocol::TwiError::Busy)
        );
        assert_eq!(
            transport.hand_off(&frame),
            Err(crate::protocol::TwiError::Busy)
        );

        assert_eq!(transport.stats(), TransportStats { sent: 1, failed: 2 });
    }
}
