//! Line editor: the input engine state machine.
//!
//! Consumes bytes one at a time, keeping the terminal display and the
//! logical buffer in lock-step. Inserting or deleting mid-line re-echoes
//! the shifted tail and repositions the terminal cursor, which is where
//! all the off-by-one risk lives; the arithmetic here mirrors the echo
//! byte-for-byte so the display is a deterministic function of the input.

use core::fmt::Write;

use super::escape::{self, EscapeAction};
use super::history::HistoryRing;
use super::line_buffer::LineBuffer;
use crate::config::{
    ConsoleConfig, BACKSPACE, COMMAND_HISTORY_LENGTH, DELETE, ENTER, ESCAPE, LINE_FEED,
};
use crate::transport::{Out, Transport};

/// Result of one editing session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineOutcome {
    /// Enter finished the line; it is ready in the edit buffer.
    Completed,
    /// A lone escape asked to leave console mode.
    Exit,
    /// Nothing arrived within the configured idle timeout.
    TimedOut,
}

impl LineOutcome {
    /// True when the session should end. Timeout and escape are both
    /// normal termination, not faults.
    pub fn is_exit(self) -> bool {
        matches!(self, LineOutcome::Exit | LineOutcome::TimedOut)
    }
}

/// Input engine: edit buffer, history ring, and history cursor.
pub struct LineEditor {
    line: LineBuffer,
    history: HistoryRing,
    /// Which ring slot is displayed; 0 means live edit.
    history_index: usize,
}

impl LineEditor {
    /// Create an editor with empty buffer and history.
    pub const fn new() -> Self {
        Self {
            line: LineBuffer::new(),
            history: HistoryRing::new(),
            history_index: 0,
        }
    }

    /// Read one line, echoing as it goes.
    ///
    /// Blocks (with bounded polling) until Enter, a lone escape, or
    /// `timeout_ms` of silence. The finished line stays in the edit
    /// buffer. The caller resets the history cursor between lines.
    pub fn read_line(
        &mut self,
        transport: &mut dyn Transport,
        config: &ConsoleConfig,
        allow_history: bool,
    ) -> LineOutcome {
        self.line.clear();
        let mut idle_ms: u32 = 0;

        loop {
            if !transport.byte_available() {
                if idle_ms >= config.timeout_ms {
                    return LineOutcome::TimedOut;
                }
                idle_ms += 1;
                transport.delay_ms(1);
                continue;
            }
            idle_ms = 0;

            let byte = transport.read_byte();
            match byte {
                // Exclusive branch: a lone escape exits, it never falls
                // into the Enter handling.
                ESCAPE => {
                    transport.delay_ms(config.esc_code_ms);
                    if transport.byte_available() {
                        let action = escape::read_sequence(transport, config.esc_code_ms);
                        self.apply_escape(action, transport, config, allow_history);
                    } else {
                        return LineOutcome::Exit;
                    }
                }
                ENTER => return LineOutcome::Completed,
                // Terminals may send both; the companion byte is a no-op.
                LINE_FEED => {}
                BACKSPACE | DELETE => self.delete_before_cursor(transport),
                0x20..=0x7E => self.insert(byte, transport),
                _ => {}
            }
        }
    }

    /// Insert a printable byte at the cursor and keep the display in sync.
    fn insert(&mut self, byte: u8, transport: &mut dyn Transport) {
        if !self.line.insert(byte) {
            // Line at capacity: swallow the byte.
            return;
        }

        transport.write_byte(byte);

        // Mid-line insert: re-echo the shifted tail, then walk the
        // terminal cursor back over it.
        let tail = self.line.suffix();
        let shifted = tail.len();
        if shifted > 0 {
            for &b in tail {
                transport.write_byte(b);
            }
            let _ = write!(Out(transport), "\x1b[{}D", shifted);
        }
    }

    /// Remove the byte left of the cursor and keep the display in sync.
    fn delete_before_cursor(&mut self, transport: &mut dyn Transport) {
        let at_end = self.line.at_end();
        if !self.line.backspace() {
            // Column 0: nothing to delete, nothing echoed.
            return;
        }

        if at_end {
            transport.write_str("\x08 \x08");
        } else {
            transport.write_byte(BACKSPACE);
            let tail = self.line.suffix();
            let shifted = tail.len();
            for &b in tail {
                transport.write_byte(b);
            }
            // Blank the leftover last cell, then reposition.
            let _ = write!(Out(transport), " \x1b[{}D", shifted + 1);
        }
    }

    /// Apply a decoded navigation action.
    fn apply_escape(
        &mut self,
        action: EscapeAction,
        transport: &mut dyn Transport,
        config: &ConsoleConfig,
        allow_history: bool,
    ) {
        match action {
            EscapeAction::CursorRight => {
                if self.line.move_right() {
                    transport.write_str("\x1b[C");
                }
            }
            EscapeAction::CursorLeft => {
                if self.line.move_left() {
                    transport.write_str("\x1b[D");
                }
            }
            EscapeAction::HistoryOlder => {
                if allow_history && self.history_index < COMMAND_HISTORY_LENGTH {
                    if self.history_index == 0 {
                        // Leaving the live edit: shadow it in slot 0.
                        self.history.save_live(self.line.as_bytes());
                    }
                    self.history_index += 1;
                    self.recall_into_line(transport, config);
                }
            }
            EscapeAction::HistoryNewer => {
                if allow_history && self.history_index > 0 {
                    self.history_index -= 1;
                    self.recall_into_line(transport, config);
                }
            }
            EscapeAction::None => {}
        }
    }

    /// Redraw the current line from the displayed history slot and copy
    /// the snapshot into the edit buffer.
    fn recall_into_line(&mut self, transport: &mut dyn Transport, config: &ConsoleConfig) {
        if let Some(snapshot) = self.history.recall(self.history_index) {
            transport.write_str("\x1b[2K\r");
            transport.write_byte(config.prompt);
            for &b in snapshot {
                transport.write_byte(b);
            }
            self.line.set(snapshot);
        }
    }

    /// Push the finished line into the history ring. Runs once per
    /// submitted line, recognized command or not.
    pub fn commit_line(&mut self) {
        self.history.push(self.line.as_bytes());
    }

    /// Reset the history cursor to the live edit.
    pub fn reset_history_cursor(&mut self) {
        self.history_index = 0;
    }

    /// The edit buffer holding the current (or just-finished) line.
    pub fn line(&self) -> &LineBuffer {
        &self.line
    }

    /// The history ring.
    pub fn history(&self) -> &HistoryRing {
        &self.history
    }
}
