//! Console aggregate and session loop.
//!
//! One owned `Console` holds every piece of console state: the command
//! and variable tables, the edit buffer, the history ring. Nothing is
//! global; tests construct a fresh one per case.

use core::fmt::Write;

use super::commands::register_default_commands;
use super::dispatch::{dispatch, CommandContext};
use super::editor::LineEditor;
use super::registry::CommandRegistry;
#[cfg(feature = "storage")]
use super::registry::{AddressMode, VariableRegistry};
use crate::config::ConsoleConfig;
#[cfg(feature = "storage")]
use crate::storage::Storage;
use crate::transport::{Out, Transport};

/// Version string (set by build.rs, includes git hash).
pub const VERSION: &str = env!("VERSION_STRING");

/// The console: registries, input engine, and session configuration.
pub struct Console<'a> {
    config: ConsoleConfig,
    commands: CommandRegistry<'a>,
    #[cfg(feature = "storage")]
    variables: VariableRegistry<'a>,
    editor: LineEditor,
}

impl<'a> Console<'a> {
    /// Create a console with empty registries. Variable addresses are
    /// taken as registered.
    pub fn new(config: ConsoleConfig) -> Self {
        Self {
            config,
            commands: CommandRegistry::new(),
            #[cfg(feature = "storage")]
            variables: VariableRegistry::new(AddressMode::Fixed),
            editor: LineEditor::new(),
        }
    }

    /// Create a console whose variable registry assigns addresses per
    /// the given mode.
    #[cfg(feature = "storage")]
    pub fn with_variable_addressing(config: ConsoleConfig, mode: AddressMode) -> Self {
        Self {
            config,
            commands: CommandRegistry::new(),
            variables: VariableRegistry::new(mode),
            editor: LineEditor::new(),
        }
    }

    /// Register the built-in commands (`@help`, `@controls`, and the
    /// variable commands when storage is compiled in).
    pub fn register_defaults(&mut self) {
        register_default_commands(&mut self.commands);
    }

    /// The command table.
    pub fn commands(&self) -> &CommandRegistry<'a> {
        &self.commands
    }

    /// The command table, for registration at setup.
    pub fn commands_mut(&mut self) -> &mut CommandRegistry<'a> {
        &mut self.commands
    }

    /// The variable table.
    #[cfg(feature = "storage")]
    pub fn variables(&self) -> &VariableRegistry<'a> {
        &self.variables
    }

    /// The variable table, for registration at setup and modified-flag
    /// queries.
    #[cfg(feature = "storage")]
    pub fn variables_mut(&mut self) -> &mut VariableRegistry<'a> {
        &mut self.variables
    }

    /// The input engine (the finished line of the last session is
    /// readable here).
    pub fn editor(&self) -> &LineEditor {
        &self.editor
    }

    /// Session configuration.
    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    /// Print version banner and help hint.
    pub fn print_banner(&self, transport: &mut dyn Transport) {
        let _ = write!(Out(&mut *transport), "\r\n{}\r\n", VERSION);
        transport.write_str("Type '@help' for commands.\r\n");
    }

    /// Run one console session if input is pending.
    ///
    /// Returns immediately when no byte is waiting, so polling this from
    /// an idle loop is near-free. Otherwise: prompt, edit, push history,
    /// dispatch, until a lone escape or the idle timeout ends the
    /// session.
    #[cfg(feature = "storage")]
    pub fn run(&mut self, transport: &mut dyn Transport, storage: &mut dyn Storage) {
        if !transport.byte_available() {
            return;
        }
        log::debug!("console session started");

        self.editor.reset_history_cursor();
        loop {
            transport.write_byte(self.config.prompt);
            let outcome = self.editor.read_line(&mut *transport, &self.config, true);
            transport.write_str("\r\n");

            if outcome.is_exit() {
                break;
            }

            self.editor.commit_line();

            let mut ctx = CommandContext {
                commands: &self.commands,
                variables: &mut self.variables,
                storage: &mut *storage,
                transport: &mut *transport,
                delimiter: self.config.delimiter,
            };
            let _ = dispatch(self.editor.line().as_bytes(), &mut ctx);

            self.editor.reset_history_cursor();
        }

        log::debug!("console session ended");
    }

    /// Run one console session if input is pending.
    #[cfg(not(feature = "storage"))]
    pub fn run(&mut self, transport: &mut dyn Transport) {
        if !transport.byte_available() {
            return;
        }
        log::debug!("console session started");

        self.editor.reset_history_cursor();
        loop {
            transport.write_byte(self.config.prompt);
            let outcome = self.editor.read_line(&mut *transport, &self.config, true);
            transport.write_str("\r\n");

            if outcome.is_exit() {
                break;
            }

            self.editor.commit_line();

            let mut ctx = CommandContext {
                commands: &self.commands,
                transport: &mut *transport,
                delimiter: self.config.delimiter,
            };
            let _ = dispatch(self.editor.line().as_bytes(), &mut ctx);

            self.editor.reset_history_cursor();
        }

        log::debug!("console session ended");
    }
}
