//! Host model of the 74LS164 chains and the switch matrix wiring, for tests.

use std::cell::RefCell;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::digital::v2::OutputPin;

use super::shift_register::ShiftChain;
use super::switch_matrix::ColumnPort;

struct Register {
    stages: u16,
    mask: u16,
    data: bool,
    clock: bool,
    clocks: u32,
}

/// Shared model of one chain; stage `n` is bit `n`.
#[derive(Clone)]
pub struct SimChain(Rc<RefCell<Register>>);

#[derive(Clone, Copy)]
enum Role {
    Data,
    Clock,
}

pub struct SimPin {
    reg: Rc<RefCell<Register>>,
    role: Role,
}

impl SimChain {
    pub fn new(len: u8) -> Self {
        let mask = if len >= 16 { u16::MAX } else { (1u16 << len) - 1 };
        Self(Rc::new(RefCell::new(Register {
            stages: 0,
            mask,
            data: false,
            clock: true,
            clocks: 0,
        })))
    }

    /// Chain pre-loaded with arbitrary garbage, like after power-up.
    pub fn with_stages(len: u8, stages: u16) -> Self {
        let chain = Self::new(len);
        {
            let mut reg = chain.0.borrow_mut();
            reg.stages = stages & reg.mask;
        }
        chain
    }

    pub fn link(&self) -> ShiftChain<SimPin, SimPin> {
        ShiftChain::new(self.pin(Role::Data), self.pin(Role::Clock))
    }

    fn pin(&self, role: Role) -> SimPin {
        SimPin {
            reg: self.0.clone(),
            role,
        }
    }

    pub fn stages(&self) -> u16 {
        self.0.borrow().stages
    }

    pub fn clocks(&self) -> u32 {
        self.0.borrow().clocks
    }

    pub fn data(&self) -> bool {
        self.0.borrow().data
    }

    /// Rows whose output is at the active level (`active_high` selects the sense).
    pub fn selected(&self, rows: usize, active_high: bool) -> Vec<usize> {
        let stages = self.stages();
        (0..rows)
            .filter(|&r| ((stages >> r) & 1 != 0) == active_high)
            .collect()
    }
}

impl SimPin {
    fn drive(&mut self, high: bool) {
        let mut reg = self.reg.borrow_mut();
        match self.role {
            Role::Data => reg.data = high,
            Role::Clock => {
                if high && !reg.clock {
                    reg.stages = ((reg.stages << 1) | reg.data as u16) & reg.mask;
                    reg.clocks += 1;
                }
                reg.clock = high;
            }
        }
    }
}

impl OutputPin for SimPin {
    type Error = Infallible;

    fn set_low(&mut self) -> Result<(), Infallible> {
        self.drive(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.drive(true);
        Ok(())
    }
}

/// Master-reset line shared by several chains (active low).
pub struct SimResetLine {
    chains: Vec<SimChain>,
    pub pulses: u32,
}

impl SimResetLine {
    pub fn new(chains: &[&SimChain]) -> Self {
        Self {
            chains: chains.iter().map(|&c| c.clone()).collect(),
            pulses: 0,
        }
    }
}

impl OutputPin for SimResetLine {
    type Error = Infallible;

    fn set_low(&mut self) -> Result<(), Infallible> {
        self.pulses += 1;
        for chain in &self.chains {
            chain.0.borrow_mut().stages = 0;
        }
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
}

/// Column inputs wired through a switch matrix to an active-low row chain.
///
/// A column reads low when a closed switch connects it to a selected row.
pub struct SimColumns {
    rows: SimChain,
    closed: Vec<u8>,
    pub reads: u32,
}

impl SimColumns {
    /// `closed[r]` has bit `c` set when the switch at row `r`, column `c` is closed.
    pub fn new(rows: SimChain, closed: Vec<u8>) -> Self {
        Self {
            rows,
            closed,
            reads: 0,
        }
    }
}

impl ColumnPort for SimColumns {
    type Error = Infallible;

    fn read_columns(&mut self) -> Result<u8, Infallible> {
        self.reads += 1;
        let mut columns = 0xFF;
        for row in self.rows.selected(self.closed.len(), false) {
            columns &= !self.closed[row];
        }
        Ok(columns)
    }
}
