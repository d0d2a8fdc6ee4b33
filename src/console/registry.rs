//! Bounded command and variable registries.
//!
//! Append-only tables, filled once at setup and linear-scanned at
//! lookup. A full table is a configuration mistake, so registration
//! warns through the log facade and drops the entry rather than growing.

use super::dispatch::Handler;
use crate::config::{MAX_COMMANDS, MAX_PARAMETERS};
#[cfg(feature = "storage")]
use crate::config::MAX_VARIABLES;
#[cfg(feature = "storage")]
use crate::storage::VarType;

/// A registered command: metadata plus its handler.
#[derive(Clone, Copy)]
pub struct CommandEntry<'a> {
    /// Unique command name, matched exactly against token 0.
    pub name: &'a str,
    /// One-line description for `@help`.
    pub description: &'a str,
    /// Usage string shown on arity errors.
    pub usage: &'a str,
    /// Most parameters the command takes.
    pub max_parameters: u8,
    /// Parameters that must be present.
    pub min_parameters: u8,
    /// Invoked once the parameter array is validated.
    pub handler: &'a dyn Handler,
}

/// Append-only table of registered commands.
pub struct CommandRegistry<'a> {
    entries: [Option<CommandEntry<'a>>; MAX_COMMANDS],
    count: usize,
}

impl<'a> CommandRegistry<'a> {
    /// Create empty registry.
    pub const fn new() -> Self {
        Self {
            entries: [None; MAX_COMMANDS],
            count: 0,
        }
    }

    /// Append a command. Full tables and out-of-range arities are
    /// configuration errors: warned about and clamped or dropped.
    pub fn register(&mut self, mut entry: CommandEntry<'a>) {
        if self.count >= MAX_COMMANDS {
            log::warn!(
                "out of space for commands; raise MAX_COMMANDS or register fewer (dropping '{}')",
                entry.name
            );
            return;
        }

        // Arity invariant: min <= max <= MAX_PARAMETERS.
        if entry.max_parameters as usize > MAX_PARAMETERS {
            log::warn!(
                "command '{}': max_parameters clamped to {}",
                entry.name,
                MAX_PARAMETERS
            );
            entry.max_parameters = MAX_PARAMETERS as u8;
        }
        if entry.min_parameters > entry.max_parameters {
            log::warn!(
                "command '{}': min_parameters clamped to {}",
                entry.name,
                entry.max_parameters
            );
            entry.min_parameters = entry.max_parameters;
        }

        self.entries[self.count] = Some(entry);
        self.count += 1;
    }

    /// Exact-name lookup. `None` means unregistered; callers decide how
    /// to report that.
    pub fn find(&self, name: &str) -> Option<&CommandEntry<'a>> {
        self.iter().find(|entry| entry.name == name)
    }

    /// Registered commands in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &CommandEntry<'a>> {
        self.entries[..self.count].iter().filter_map(|e| e.as_ref())
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.count
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// How variable addresses are assigned at registration.
#[cfg(feature = "storage")]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressMode {
    /// Keep the caller-supplied address.
    Fixed,
    /// Pack variables at cumulative offsets by type size, in
    /// registration order. Addresses then depend on that order, so
    /// out-of-band consumers of the store must be told where things
    /// landed.
    Packed,
}

/// A registered variable and its backing-store location.
#[cfg(feature = "storage")]
#[derive(Clone, Copy, Debug)]
pub struct VariableEntry<'a> {
    /// Unique variable name.
    pub name: &'a str,
    /// Type tag governing encode/decode and size.
    pub var_type: VarType,
    /// Backing-store address.
    pub address: usize,
    /// Set on `@put`, cleared by `modified(.., clear=true)`.
    pub modified: bool,
}

/// Append-only table of registered variables.
#[cfg(feature = "storage")]
pub struct VariableRegistry<'a> {
    entries: [Option<VariableEntry<'a>>; MAX_VARIABLES],
    count: usize,
    mode: AddressMode,
    next_address: usize,
}

#[cfg(feature = "storage")]
impl<'a> VariableRegistry<'a> {
    /// Create empty registry with the given addressing mode.
    pub const fn new(mode: AddressMode) -> Self {
        Self {
            entries: [None; MAX_VARIABLES],
            count: 0,
            mode,
            next_address: 0,
        }
    }

    /// Append a variable. In `Packed` mode the supplied address is
    /// ignored and the next cumulative offset is assigned instead.
    pub fn register(&mut self, name: &'a str, var_type: VarType, address: usize) {
        if self.count >= MAX_VARIABLES {
            log::warn!(
                "out of space for variables; raise MAX_VARIABLES or register fewer (dropping '{}')",
                name
            );
            return;
        }

        let address = match self.mode {
            AddressMode::Fixed => address,
            AddressMode::Packed => {
                let assigned = self.next_address;
                self.next_address += var_type.size();
                assigned
            }
        };

        self.entries[self.count] = Some(VariableEntry {
            name,
            var_type,
            address,
            modified: false,
        });
        self.count += 1;
    }

    /// Exact-name lookup.
    pub fn find(&self, name: &str) -> Option<&VariableEntry<'a>> {
        self.iter().find(|entry| entry.name == name)
    }

    /// Exact-name lookup, mutable (used to flag writes).
    pub fn find_mut(&mut self, name: &str) -> Option<&mut VariableEntry<'a>> {
        self.entries[..self.count]
            .iter_mut()
            .filter_map(|e| e.as_mut())
            .find(|entry| entry.name == name)
    }

    /// Check whether the variable at `address` was written since the
    /// last cleared check. Unknown addresses report false. With `clear`
    /// set, the flag is reset afterwards.
    pub fn modified(&mut self, address: usize, clear: bool) -> bool {
        let entry = self.entries[..self.count]
            .iter_mut()
            .filter_map(|e| e.as_mut())
            .find(|entry| entry.address == address);

        match entry {
            Some(entry) => {
                let was_modified = entry.modified;
                if clear {
                    entry.modified = false;
                }
                was_modified
            }
            None => false,
        }
    }

    /// Registered variables in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &VariableEntry<'a>> {
        self.entries[..self.count].iter().filter_map(|e| e.as_ref())
    }

    /// Number of registered variables.
    pub fn len(&self) -> usize {
        self.count
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}
