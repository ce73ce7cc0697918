//! Startup-only operator interface.
//!
//! Before the polling loop starts, the operator picks the session's role
//! and, optionally, the carrier frequency over a text console. The
//! console itself (UART, USB serial, semihosting) is the host's business;
//! this module only needs non-blocking byte reads and line writes.
//!
//! Nothing here runs in steady state: once the session is started, all
//! diagnostics flow through the logging backend instead.

use crate::consts::FREQUENCY_DIGITS;
use crate::session::OperatingMode;
use heapless::Vec;
use nb::block;

/// Capability interface to the operator's text console.
pub trait Console {
    /// Errors reported by the console implementation.
    type Error;

    /// Reads one byte of operator input, non-blocking.
    fn read_byte(&mut self) -> nb::Result<u8, Self::Error>;

    /// Writes a line of prompt or banner text.
    fn write_str(&mut self, line: &str) -> Result<(), Self::Error>;
}

/// Prompts for and reads the operating-mode selector.
///
/// Blocks until the operator enters `1` (transmitter) or `2` (receiver);
/// any other input is ignored and the read continues.
pub fn read_operating_mode<C: Console>(console: &mut C) -> Result<OperatingMode, C::Error> {
    console.write_str("Enter mode: 1 -> TX; 2 -> RX\r\n")?;
    loop {
        let byte = block!(console.read_byte())?;
        if let Ok(mode) = OperatingMode::try_from(byte.wrapping_sub(b'0')) {
            return Ok(mode);
        }
    }
}

/// Prompts for and reads an optional carrier frequency in Hz.
///
/// Reads decimal digits up to the first carriage return or line feed;
/// non-digit bytes are ignored, and digits beyond the capacity of a
/// `u32` frequency are dropped. Returns `None` when the line is empty or
/// does not fit a `u32`, in which case the caller applies the default.
pub fn read_frequency<C: Console>(console: &mut C) -> Result<Option<u32>, C::Error> {
    console.write_str("Enter LoRa frequency in Hz...\r\n")?;
    let mut digits: Vec<u8, FREQUENCY_DIGITS> = Vec::new();
    loop {
        let byte = block!(console.read_byte())?;
        match byte {
            b'\r' | b'\n' => break,
            b'0'..=b'9' => {
                if !digits.is_full() {
                    let _ = digits.push(byte);
                }
            }
            _ => {}
        }
    }

    if digits.is_empty() {
        return Ok(None);
    }
    let mut value: u32 = 0;
    for &digit in &digits {
        let next = value
            .checked_mul(10)
            .and_then(|v| v.checked_add(u32::from(digit - b'0')));
        match next {
            Some(next) => value = next,
            None => return Ok(None),
        }
    }
    Ok(Some(value))
}
