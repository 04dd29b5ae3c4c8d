//! Bit-banged access to serial-in/parallel-out shift registers (74LS164).
//!
//! Every chain has a data line and a clock line. A bit is shifted in on the
//! rising clock edge: the data line is driven first, then the clock is
//! pulsed low and back high. The clock idles high.

use embedded_hal::digital::v2::{OutputPin, PinState};

/// Which level of a row-select line activates its row
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Polarity {
    ActiveLow,
    ActiveHigh,
}

impl Polarity {
    #[inline]
    pub const fn active(self) -> PinState {
        match self {
            Polarity::ActiveLow => PinState::Low,
            Polarity::ActiveHigh => PinState::High,
        }
    }

    #[inline]
    pub const fn inactive(self) -> PinState {
        match self {
            Polarity::ActiveLow => PinState::High,
            Polarity::ActiveHigh => PinState::Low,
        }
    }
}

/// A shift-register chain reachable through one data and one clock line.
pub trait ShiftLink {
    type Error;

    /// Shift `level` into the first stage, pushing every stage one step
    /// toward the output. Exactly one call per shifted bit.
    fn clock_bit(&mut self, level: PinState) -> Result<(), Self::Error>;

    /// Park the data line without clocking. Chain contents are unchanged.
    fn idle(&mut self, level: PinState) -> Result<(), Self::Error>;
}

/// Data/clock pin pair driving one chain
pub struct ShiftChain<D, C> {
    data: D,
    clock: C,
}

impl<D, C, E> ShiftChain<D, C>
where
    D: OutputPin<Error = E>,
    C: OutputPin<Error = E>,
{
    pub fn new(data: D, clock: C) -> Self {
        Self { data, clock }
    }

    pub fn release(self) -> (D, C) {
        (self.data, self.clock)
    }
}

impl<D, C, E> ShiftLink for ShiftChain<D, C>
where
    D: OutputPin<Error = E>,
    C: OutputPin<Error = E>,
{
    type Error = E;

    #[inline]
    fn clock_bit(&mut self, level: PinState) -> Result<(), E> {
        self.data.set_state(level)?;
        self.clock.set_low()?;
        self.clock.set_high()
    }

    #[inline]
    fn idle(&mut self, level: PinState) -> Result<(), E> {
        self.data.set_state(level)
    }
}

/// Shift a byte out least-significant bit first, one clock per bit.
pub fn shift_out_lsb_first<L: ShiftLink>(link: &mut L, mut bits: u8) -> Result<(), L::Error> {
    for _ in 0..8 {
        let level = if bits & 1 != 0 {
            PinState::High
        } else {
            PinState::Low
        };
        link.clock_bit(level)?;
        bits >>= 1;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::pin::{Mock as PinMock, State, Transaction};

    #[test]
    fn data_is_set_before_the_rising_edge() {
        let data = PinMock::new(&[Transaction::set(State::Low)]);
        let clock = PinMock::new(&[
            Transaction::set(State::Low),
            Transaction::set(State::High),
        ]);
        let mut chain = ShiftChain::new(data, clock);

        chain.clock_bit(PinState::Low).unwrap();

        let (mut data, mut clock) = chain.release();
        data.done();
        clock.done();
    }

    #[test]
    fn idle_never_touches_the_clock() {
        let data = PinMock::new(&[Transaction::set(State::High)]);
        let clock = PinMock::new(&[]);
        let mut chain = ShiftChain::new(data, clock);

        chain.idle(PinState::High).unwrap();

        let (mut data, mut clock) = chain.release();
        data.done();
        clock.done();
    }

    #[test]
    fn bytes_go_out_lsb_first() {
        let levels = [1, 0, 1, 1, 0, 0, 0, 1];
        let data_expect: Vec<Transaction> = levels
            .iter()
            .map(|&b| Transaction::set(if b == 1 { State::High } else { State::Low }))
            .collect();
        let clock_expect: Vec<Transaction> = (0..8)
            .flat_map(|_| [Transaction::set(State::Low), Transaction::set(State::High)])
            .collect();
        let mut chain = ShiftChain::new(PinMock::new(&data_expect), PinMock::new(&clock_expect));

        shift_out_lsb_first(&mut chain, 0b1000_1101).unwrap();

        let (mut data, mut clock) = chain.release();
        data.done();
        clock.done();
    }

    #[test]
    fn polarity_levels() {
        assert_eq!(Polarity::ActiveLow.active(), PinState::Low);
        assert_eq!(Polarity::ActiveLow.inactive(), PinState::High);
        assert_eq!(Polarity::ActiveHigh.active(), PinState::High);
        assert_eq!(Polarity::ActiveHigh.inactive(), PinState::Low);
    }
}
