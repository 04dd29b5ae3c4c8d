//! Configuration constants for the ATmega328P key/LED controller

/// CPU frequency in Hz (internal RC oscillator)
pub const CPU_FREQ_HZ: u32 = 8_000_000;

/// Target rate of full key-matrix scans
pub const SCAN_HZ: u32 = 1_000;

/// Timer0 clock prescaler (clk/256)
pub const TIMER0_PRESCALER: u32 = 256;

/// Timer0 TOP (OCR0A). Truncated, so the real tick is slightly slower than `SCAN_HZ`.
pub const TIMER0_TOP: u8 = (CPU_FREQ_HZ / TIMER0_PRESCALER / SCAN_HZ) as u8;

/// 7-bit bus address of the host processor
pub const HOST_ADDRESS: u8 = 0x42;

/// Two-wire bus clock
pub const TWI_BITRATE_HZ: u32 = 400_000;

/// Debug console baud rate (`debug` feature only)
pub const UART_BAUD: u32 = 38_400;

/// Switch matrix rows (15 used stages of a 16-stage chain)
pub const SWITCH_ROWS: usize = 15;

/// LED matrix rows
pub const LED_ROWS: usize = 6;

/// Columns shared by both matrices
pub const MATRIX_COLS: usize = 8;

/// Inactive bits clocked through every chain by the reset protocol
pub const REGISTER_FLUSH_BITS: u8 = 16;

/// Ticks between steps of the fallback LED walk
pub const FALLBACK_STEP_TICKS: u16 = 40;

/// Ticks between updates of the placeholder LED pattern
pub const DEMO_UPDATE_TICKS: u8 = 12;

/// Seed of the placeholder LED pattern
pub const DEMO_SEED: u16 = 314;

/// Ticks between preventive re-runs of the reset protocol
pub const RESYNC_INTERVAL_TICKS: u32 = 1_000;

/// PORTB bit assignments of the shift-register chains
pub mod pins {
    pub const SW_ROW_DAT: u8 = 0;
    pub const SW_ROW_CLK: u8 = 1;
    pub const LED_ROW_DAT: u8 = 2;
    pub const LED_ROW_CLK: u8 = 3;
    pub const LED_COL_DAT: u8 = 4;
    pub const LED_COL_CLK: u8 = 5;

    /// PORTC bit of the shared shift-register reset line (active low)
    pub const SHIFTREGS_RESET: u8 = 0;
}
