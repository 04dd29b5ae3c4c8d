//! Hand-off of scan frames to the host processor over the two-wire bus

pub mod packet;
pub mod transport;
pub mod twi;

pub use packet::{ScanFrame, FRAME_LEN};
pub use transport::{I2cTransceiver, Transport, TransportStats};
pub use twi::{MasterTransfer, TwiAction, TwiError};

/// Bus driver primitive: send a target-address byte followed by payload.
///
/// `frame[0]` is the 7-bit target address shifted left one bit.
/// Returns once the frame is sent or queued for sending.
pub trait BusTransceiver {
    type Error;

    fn transceive(&mut self, frame: &[u8]) -> Result<(), Self::Error>;
}
