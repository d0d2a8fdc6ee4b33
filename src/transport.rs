//! Byte-stream transport collaborator.
//!
//! The console never talks to hardware directly. Integrators implement
//! [`Transport`] over their serial driver; the engine assumes a reliable,
//! in-order, half-duplex byte channel with no framing.

/// Platform byte-stream interface.
///
/// `delay_ms` provides the bounded polling pause used while waiting for
/// follow-up bytes; on bare metal this is the platform's busy-wait delay.
pub trait Transport {
    /// True when at least one byte is pending.
    fn byte_available(&mut self) -> bool;

    /// Read the next byte. Only valid after `byte_available` returned
    /// true; implementations may return 0 otherwise.
    fn read_byte(&mut self) -> u8;

    /// Write a single byte.
    fn write_byte(&mut self, byte: u8);

    /// Write a string.
    fn write_str(&mut self, s: &str);

    /// Pause for approximately `ms` milliseconds.
    fn delay_ms(&mut self, ms: u32);
}

/// `core::fmt` adapter over a transport, so handlers can use `write!`.
pub struct Out<'a>(pub &'a mut dyn Transport);

impl core::fmt::Write for Out<'_> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        self.0.write_str(s);
        Ok(())
    }
}
