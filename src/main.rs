#![cfg_attr(target_arch = "avr", no_std)]
#![cfg_attr(target_arch = "avr", no_main)]

#[cfg(target_arch = "avr")]
use panic_halt as _;

#[cfg(target_arch = "avr")]
#[avr_device::entry]
fn main() -> ! {
    use atmega328p_keys_leds::application::Application;
    use atmega328p_keys_leds::config::TWI_BITRATE_HZ;
    use atmega328p_keys_leds::drivers::{LedMatrix, SerialConsole, ShiftRegisters, SwitchMatrix};
    use atmega328p_keys_leds::hal::{board, TickTimer, Twi};
    use atmega328p_keys_leds::os::{TICK, TICK_TIMER};
    use atmega328p_keys_leds::protocol::Transport;

    let dp = avr_device::atmega328p::Peripherals::take().unwrap();

    let board = board::configure(dp.PORTB, dp.PORTC, dp.PORTD);
    let registers = ShiftRegisters::new(
        SwitchMatrix::new(board.switch_rows, board.columns),
        LedMatrix::new(board.led_rows, board.led_columns),
        board.reset,
    );
    let transport = Transport::new(Twi::new(dp.TWI, TWI_BITRATE_HZ));

    #[cfg(feature = "debug")]
    let console = SerialConsole::new(atmega328p_keys_leds::hal::Usart::new(
        dp.USART0,
        atmega328p_keys_leds::config::UART_BAUD,
    ));
    #[cfg(not(feature = "debug"))]
    let console = SerialConsole::new(atmega328p_keys_leds::drivers::NullConsole);

    let mut app = Application::new(registers, transport, console);
    if let Err(never) = app.start() {
        match never {}
    }

    let _timer = TickTimer::start(dp.TC0, TICK_TIMER);
    // Enable interrupts globally
    unsafe { avr_device::interrupt::enable() };

    loop {
        if let Err(never) = nb::block!(app.step(&TICK)) {
            match never {}
        }
    }
}

#[cfg(not(target_arch = "avr"))]
fn main() {}
