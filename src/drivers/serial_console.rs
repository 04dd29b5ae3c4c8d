use core::convert::Infallible;

use ufmt::{uWrite, uwrite};

/// Diagnostic text output. Write errors are dropped: logging must never
/// hold up a scan cycle.
pub struct SerialConsole<W> {
    writer: W,
}

/// Sink for builds without a console
pub struct NullConsole;

impl uWrite for NullConsole {
    type Error = Infallible;

    #[inline]
    fn write_str(&mut self, _s: &str) -> Result<(), Infallible> {
        Ok(())
    }
}

impl<W: uWrite> SerialConsole<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn write_str(&mut self, s: &str) {
        self.writer.write_str(s).ok();
    }

    pub fn write_line(&mut self, s: &str) {
        self.write_str(s);
        self.write_str("\r\n");
    }

    // Debug helper - print hex value
    pub fn write_hex(&mut self, val: u8) {
        const HEX_CHARS: [u8; 16] = *b"0123456789ABCDEF";
        let digits = [
            HEX_CHARS[(val >> 4) as usize],
            HEX_CHARS[(val & 0xF) as usize],
        ];
        if let Ok(s) = core::str::from_utf8(&digits) {
            self.write_str(s);
        }
    }

    // Print formatted debug info
    pub fn debug(&mut self, msg: &str, val: u8) {
        self.write_str("[DBG] ");
        self.write_str(msg);
        self.write_str(": 0x");
        self.write_hex(val);
        self.write_str("\r\n");
    }

    /// `msg: value` in decimal
    pub fn info(&mut self, msg: &str, val: u32) {
        uwrite!(&mut self.writer, "{}: {}\r\n", msg, val).ok();
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Captured(String);

    impl uWrite for Captured {
        type Error = Infallible;

        fn write_str(&mut self, s: &str) -> Result<(), Infallible> {
            self.0.push_str(s);
            Ok(())
        }
    }

    #[test]
    fn lines_end_with_crlf() {
        let mut console = SerialConsole::new(Captured(String::new()));
        console.write_line("ready");
        assert_eq!(console.writer().0, "ready\r\n");
    }

    #[test]
    fn debug_prints_hex() {
        let mut console = SerialConsole::new(Captured(String::new()));
        console.debug("row", 0x3C);
        assert_eq!(console.writer().0, "[DBG] row: 0x3C\r\n");
    }

    #[test]
    fn info_prints_decimal() {
        let mut console = SerialConsole::new(Captured(String::new()));
        console.info("bus failures", 1024);
        assert_eq!(console.writer().0, "bus failures: 1024\r\n");
    }

    #[test]
    fn null_console_swallows_everything() {
        let mut console = SerialConsole::new(NullConsole);
        console.write_line("nobody hears this");
        console.info("tick", 7);
    }
}
