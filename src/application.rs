//! Application layer: one scan/refresh/transmit cycle per timer tick.
//!
//! Everything the foreground loop touches lives in [`Application`]; the
//! only state shared with interrupt context is the [`TickFlag`].

use embedded_hal::digital::v2::OutputPin;
use ufmt::uWrite;

use crate::config::{DEMO_SEED, DEMO_UPDATE_TICKS, HOST_ADDRESS, LED_ROWS, RESYNC_INTERVAL_TICKS};
use crate::diagnostics::{DeadlineMonitor, FallbackWalk, Fault, Mode};
use crate::drivers::{
    ColumnPort, Error, LedRowStates, SerialConsole, ShiftLink, ShiftRegisters,
};
use crate::os::{TickFlag, TICK_TIMER};
use crate::protocol::{BusTransceiver, ScanFrame, Transport};

/// Placeholder LED source until the host sends LED state back.
///
/// Seeded xorshift: fills every row at start-up, then replaces one random
/// row every `DEMO_UPDATE_TICKS` ticks.
pub struct DemoPattern {
    state: u16,
    ticks: u8,
}

impl DemoPattern {
    pub const fn new(seed: u16) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
            ticks: 0,
        }
    }

    fn next(&mut self) -> u16 {
        let mut x = self.state;
        x ^= x << 7;
        x ^= x >> 9;
        x ^= x << 8;
        self.state = x;
        x
    }

    pub fn fill(&mut self, states: &mut LedRowStates) {
        for row in 0..LED_ROWS {
            let mask = self.next() as u8;
            states.set_row(row, mask);
        }
    }

    /// Returns the row that changed, if any.
    pub fn tick(&mut self, states: &mut LedRowStates) -> Option<usize> {
        self.ticks += 1;
        if self.ticks < DEMO_UPDATE_TICKS {
            return None;
        }
        self.ticks = 0;
        let row = (self.next() % LED_ROWS as u16) as usize;
        let mask = self.next() as u8;
        states.set_row(row, mask);
        Some(row)
    }
}

pub struct Application<SL, CP, LR, LC, RST, B, W> {
    registers: ShiftRegisters<SL, CP, LR, LC, RST>,
    transport: Transport<B>,
    console: SerialConsole<W>,
    monitor: DeadlineMonitor,
    walk: FallbackWalk,
    frame: ScanFrame,
    led_states: LedRowStates,
    demo: DemoPattern,
    ticks: u32,
    resync_pending: bool,
}

impl<SL, CP, LR, LC, RST, B, W, E> Application<SL, CP, LR, LC, RST, B, W>
where
    SL: ShiftLink<Error = E>,
    CP: ColumnPort<Error = E>,
    LR: ShiftLink<Error = E>,
    LC: ShiftLink<Error = E>,
    RST: OutputPin<Error = E>,
    B: BusTransceiver,
    W: uWrite,
{
    pub fn new(
        registers: ShiftRegisters<SL, CP, LR, LC, RST>,
        transport: Transport<B>,
        console: SerialConsole<W>,
    ) -> Self {
        Self {
            registers,
            transport,
            console,
            monitor: DeadlineMonitor::new(),
            walk: FallbackWalk::new(),
            frame: ScanFrame::new(HOST_ADDRESS),
            led_states: LedRowStates::dark(),
            demo: DemoPattern::new(DEMO_SEED),
            ticks: 0,
            resync_pending: false,
        }
    }

    /// Hard-reset the chains, select row 0 of both matrices and seed the
    /// placeholder LED pattern.
    pub fn start(&mut self) -> Result<Mode, E> {
        self.registers.clear()?;
        if let Err(err) = self.registers.resync() {
            return self.fail(err, Fault::RingDesync { tick: 0 });
        }
        self.demo.fill(&mut self.led_states);

        self.console.write_line("atmega328p keys+leds");
        self.console.info("tick us", TICK_TIMER.period_us());
        self.console.debug("host", HOST_ADDRESS);
        Ok(self.monitor.mode())
    }

    /// Service one tick, or `WouldBlock` until the timer raises `tick`.
    pub fn step(&mut self, tick: &TickFlag) -> nb::Result<Mode, E> {
        if tick.poll().is_err() {
            return Err(nb::Error::WouldBlock);
        }
        self.ticks = self.ticks.wrapping_add(1);

        let mode = match self.monitor.mode() {
            Mode::Normal => self.normal_tick(tick),
            Mode::Fallback(_) => self.fallback_tick(),
        };
        mode.map_err(nb::Error::Other)
    }

    pub fn mode(&self) -> Mode {
        self.monitor.mode()
    }

    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    /// Most recent scan
    pub fn frame(&self) -> &ScanFrame {
        &self.frame
    }

    pub fn led_states(&self) -> &LedRowStates {
        &self.led_states
    }

    pub fn led_states_mut(&mut self) -> &mut LedRowStates {
        &mut self.led_states
    }

    pub fn transport(&self) -> &Transport<B> {
        &self.transport
    }

    pub fn registers(&self) -> &ShiftRegisters<SL, CP, LR, LC, RST> {
        &self.registers
    }

    fn normal_tick(&mut self, tick: &TickFlag) -> Result<Mode, E> {
        if let Err(err) = self.run_cycle() {
            return self.fail(err, Fault::RingDesync { tick: self.ticks });
        }

        match self.monitor.check(tick, self.ticks) {
            Mode::Normal => Ok(Mode::Normal),
            Mode::Fallback(_) => self.enter_fallback(),
        }
    }

    fn run_cycle(&mut self) -> Result<(), Error<E>> {
        // only at a frame boundary, so the LED cadence is never cut short
        if self.resync_pending && self.registers.leds().current_row() == 0 {
            self.registers.resync()?;
            self.resync_pending = false;
            self.console.info("resync", self.ticks);
        }

        self.registers.leds_mut().refresh(&self.led_states)?;
        self.registers.switches_mut().scan(&mut self.frame)?;

        if self.transport.hand_off(&self.frame).is_err() {
            self.console
                .info("bus failures", self.transport.stats().failed);
        }

        self.demo.tick(&mut self.led_states);
        if self.ticks % RESYNC_INTERVAL_TICKS == 0 {
            self.resync_pending = true;
        }
        Ok(())
    }

    fn fail(&mut self, err: Error<E>, fault: Fault) -> Result<Mode, E> {
        match err {
            Error::Pin(e) => Err(e),
            _ => {
                self.monitor.trip(fault);
                self.enter_fallback()
            }
        }
    }

    fn enter_fallback(&mut self) -> Result<Mode, E> {
        let mode = self.monitor.mode();
        if let Mode::Fallback(fault) = mode {
            self.console.write_str("FALLBACK ");
            self.console.info(fault.describe(), fault.tick());
        }

        self.walk = FallbackWalk::new();
        if let Err(Error::Pin(e)) = self.registers.resync() {
            return Err(e);
        }
        Ok(mode)
    }

    fn fallback_tick(&mut self) -> Result<Mode, E> {
        if let Some(mask) = self.walk.tick() {
            self.registers.leds_mut().write_columns(mask)?;
        }
        Ok(self.monitor.mode())
    }
}
