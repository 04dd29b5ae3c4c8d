pub mod gpio;
pub mod timer;
pub mod twi;
#[cfg(feature = "debug")]
pub mod uart;

// Re-export commonly used types
pub use gpio::board;
pub use gpio::{ColumnInputs, Output};
pub use timer::{Prescaler, TickTimer};
pub use twi::Twi;
#[cfg(feature = "debug")]
pub use uart::Usart;
