//! Shared mock collaborators for console tests.

#![allow(dead_code)]

use std::collections::VecDeque;

#[cfg(feature = "storage")]
use serial_command_console::storage::{Storage, StorageError, VarType, VarValue};
use serial_command_console::transport::Transport;

/// Scripted byte link with a millisecond clock.
///
/// Each byte carries an arrival time; `delay_ms` advances the clock, so
/// escape-sequence timing (burst now, next keystroke later) can be
/// reproduced. Writes and total delay are recorded.
pub struct MockTransport {
    input: VecDeque<(u32, u8)>,
    pub output: Vec<u8>,
    pub now_ms: u32,
    pub delay_total_ms: u32,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            input: VecDeque::new(),
            output: Vec::new(),
            now_ms: 0,
            delay_total_ms: 0,
        }
    }

    pub fn with_input(bytes: &[u8]) -> Self {
        let mut transport = Self::new();
        transport.feed(bytes);
        transport
    }

    /// Queue bytes as already arrived.
    pub fn feed(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.input.push_back((0, b));
        }
    }

    /// Queue bytes arriving at `at_ms`. Call in ascending time order.
    pub fn schedule(&mut self, at_ms: u32, bytes: &[u8]) {
        for &b in bytes {
            self.input.push_back((at_ms, b));
        }
    }

    pub fn output_str(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }
}

impl Transport for MockTransport {
    fn byte_available(&mut self) -> bool {
        self.input
            .front()
            .is_some_and(|&(at_ms, _)| at_ms <= self.now_ms)
    }

    fn read_byte(&mut self) -> u8 {
        if self.byte_available() {
            self.input.pop_front().map(|(_, b)| b).unwrap_or(0)
        } else {
            0
        }
    }

    fn write_byte(&mut self, byte: u8) {
        self.output.push(byte);
    }

    fn write_str(&mut self, s: &str) {
        self.output.extend_from_slice(s.as_bytes());
    }

    fn delay_ms(&mut self, ms: u32) {
        self.now_ms += ms;
        self.delay_total_ms += ms;
    }
}

/// Flat little-endian byte store.
#[cfg(feature = "storage")]
pub struct MockStorage {
    pub bytes: [u8; 64],
}

#[cfg(feature = "storage")]
impl MockStorage {
    pub fn new() -> Self {
        Self { bytes: [0u8; 64] }
    }
}

#[cfg(feature = "storage")]
impl Storage for MockStorage {
    fn read(&mut self, address: usize, var_type: VarType) -> Result<VarValue, StorageError> {
        match var_type {
            VarType::Byte => self
                .bytes
                .get(address)
                .map(|&b| VarValue::Byte(b))
                .ok_or(StorageError::BadAddress),
            VarType::Double => {
                let slice = self
                    .bytes
                    .get(address..address + 8)
                    .ok_or(StorageError::BadAddress)?;
                let mut raw = [0u8; 8];
                raw.copy_from_slice(slice);
                Ok(VarValue::Double(f64::from_le_bytes(raw)))
            }
        }
    }

    fn write(
        &mut self,
        address: usize,
        var_type: VarType,
        value: VarValue,
    ) -> Result<(), StorageError> {
        match (var_type, value) {
            (VarType::Byte, VarValue::Byte(v)) => {
                let slot = self
                    .bytes
                    .get_mut(address)
                    .ok_or(StorageError::BadAddress)?;
                *slot = v;
                Ok(())
            }
            (VarType::Double, VarValue::Double(v)) => {
                let slice = self
                    .bytes
                    .get_mut(address..address + 8)
                    .ok_or(StorageError::BadAddress)?;
                slice.copy_from_slice(&v.to_le_bytes());
                Ok(())
            }
            _ => Err(StorageError::Corrupt),
        }
    }
}
