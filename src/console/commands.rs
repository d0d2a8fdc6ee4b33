//! Built-in command handlers.
//!
//! Each command is a unit struct implementing [`Handler`], registered by
//! [`register_default_commands`]. The variable commands exist only with
//! the `storage` feature.

use core::fmt::Write;

use super::dispatch::{find_and_report, CommandContext, Handler, ParamList};
use super::registry::{CommandEntry, CommandRegistry};
#[cfg(feature = "storage")]
use super::registry::{VariableEntry, VariableRegistry};
#[cfg(feature = "storage")]
use super::error::ConsoleError;
#[cfg(feature = "storage")]
use crate::storage::{VarType, VarValue};
use crate::transport::{Out, Transport};

static HELP: HelpCommand = HelpCommand;
static CONTROLS: ControlsCommand = ControlsCommand;
#[cfg(feature = "storage")]
static GET: GetCommand = GetCommand;
#[cfg(feature = "storage")]
static PUT: PutCommand = PutCommand;
#[cfg(feature = "storage")]
static VARIABLES: VariablesCommand = VariablesCommand;

/// Register the built-in commands.
pub fn register_default_commands(commands: &mut CommandRegistry<'_>) {
    #[cfg(feature = "storage")]
    {
        commands.register(CommandEntry {
            name: "@get",
            description: "reads a variable from the store",
            usage: "@get,[<variable>]",
            max_parameters: 1,
            min_parameters: 1,
            handler: &GET,
        });
        commands.register(CommandEntry {
            name: "@put",
            description: "stores a variable in the store",
            usage: "@put,[<variable>],[<value>]",
            max_parameters: 2,
            min_parameters: 2,
            handler: &PUT,
        });
        commands.register(CommandEntry {
            name: "@variables",
            description: "prints all stored variables and their types",
            usage: "@variables",
            max_parameters: 0,
            min_parameters: 0,
            handler: &VARIABLES,
        });
    }

    commands.register(CommandEntry {
        name: "@help",
        description: "prints available commands or specific command data",
        usage: "@help,(<command>)",
        max_parameters: 1,
        min_parameters: 0,
        handler: &HELP,
    });
    commands.register(CommandEntry {
        name: "@controls",
        description: "Prints available console controls",
        usage: "@controls",
        max_parameters: 0,
        min_parameters: 0,
        handler: &CONTROLS,
    });
}

/// Look a variable up by name, telling the operator about unknown names.
#[cfg(feature = "storage")]
fn find_and_report_variable<'a>(
    variables: &VariableRegistry<'a>,
    transport: &mut dyn Transport,
    name: &str,
) -> Option<VariableEntry<'a>> {
    let found = variables.find(name).copied();
    if found.is_none() {
        let _ = write!(
            Out(transport),
            "'{}' is not a variable. You can use the '@variables' command to list all variables.\r\n",
            name
        );
    }
    found
}

#[cfg(feature = "storage")]
fn write_value(transport: &mut dyn Transport, value: VarValue) {
    match value {
        VarValue::Byte(v) => {
            let _ = write!(Out(transport), "{}\r\n", v);
        }
        VarValue::Double(v) => {
            let _ = write!(Out(transport), "{:.10}\r\n", v);
        }
    }
}

/// `@help [command]`: command list, or details for one command.
struct HelpCommand;

impl Handler for HelpCommand {
    fn invoke(&self, params: &ParamList, ctx: &mut CommandContext<'_, '_>) {
        if params[0].is_empty() {
            ctx.transport.write_str("Available commands: \r\n");
            for entry in ctx.commands.iter() {
                let _ = write!(Out(&mut *ctx.transport), "{}\r\n", entry.name);
            }
            ctx.transport.write_str(
                "\r\nFor additional information on a given command, type '@help,<command>'\r\n",
            );
            ctx.transport
                .write_str("For help using the console, type '@controls'\r\n");
            ctx.transport.write_str(
                "command usage format: [] = required, () = optional, <> = non-literal, {} = default\r\n",
            );
        } else if let Some(entry) =
            find_and_report(ctx.commands, &mut *ctx.transport, params[0].as_str())
        {
            let _ = write!(
                Out(&mut *ctx.transport),
                "Name: {}\r\nDescription: {}\r\nUse: {}\r\n",
                entry.name,
                entry.description,
                entry.usage
            );
        }
    }
}

/// `@controls`: navigation help.
struct ControlsCommand;

impl Handler for ControlsCommand {
    fn invoke(&self, _params: &ParamList, ctx: &mut CommandContext<'_, '_>) {
        ctx.transport.write_str("Console Controls:\r\n");
        ctx.transport
            .write_str("Press Escape to exit console mode\r\n");
        ctx.transport
            .write_str("Press the up or down arrows to move in the command history\r\n");
        ctx.transport
            .write_str("Left, right, and backspace are all supported when entering commands\r\n");
    }
}

/// `@get <name>`: read a variable from the backing store.
#[cfg(feature = "storage")]
struct GetCommand;

#[cfg(feature = "storage")]
impl Handler for GetCommand {
    fn invoke(&self, params: &ParamList, ctx: &mut CommandContext<'_, '_>) {
        // Failures were already reported on the transport.
        let _ = read_variable(params, ctx);
    }
}

#[cfg(feature = "storage")]
fn read_variable(params: &ParamList, ctx: &mut CommandContext<'_, '_>) -> Result<(), ConsoleError> {
    let entry = find_and_report_variable(ctx.variables, &mut *ctx.transport, params[0].as_str())
        .ok_or(ConsoleError::UnknownVariable)?;

    let value = ctx
        .storage
        .read(entry.address, entry.var_type)
        .map_err(|err| {
            report_store_error(&mut *ctx.transport, err);
            ConsoleError::StorageFailed
        })?;

    let _ = write!(Out(&mut *ctx.transport), "{}\u{2192}", params[0]);
    write_value(&mut *ctx.transport, value);
    Ok(())
}

/// `@put <name> <value>`: write a variable to the backing store.
#[cfg(feature = "storage")]
struct PutCommand;

#[cfg(feature = "storage")]
impl Handler for PutCommand {
    fn invoke(&self, params: &ParamList, ctx: &mut CommandContext<'_, '_>) {
        let _ = write_variable(params, ctx);
    }
}

#[cfg(feature = "storage")]
fn write_variable(params: &ParamList, ctx: &mut CommandContext<'_, '_>) -> Result<(), ConsoleError> {
    let entry = find_and_report_variable(ctx.variables, &mut *ctx.transport, params[0].as_str())
        .ok_or(ConsoleError::UnknownVariable)?;

    let value = match parse_value(entry.var_type, params[1].as_str()) {
        Some(value) => value,
        None => {
            let _ = write!(
                Out(&mut *ctx.transport),
                "'{}' is not a valid {} value.\r\n",
                params[1],
                entry.var_type.name()
            );
            return Err(ConsoleError::InvalidValue);
        }
    };

    ctx.storage
        .write(entry.address, entry.var_type, value)
        .map_err(|err| {
            report_store_error(&mut *ctx.transport, err);
            ConsoleError::StorageFailed
        })?;

    let _ = write!(Out(&mut *ctx.transport), "{}\u{2190}", params[0]);
    write_value(&mut *ctx.transport, value);
    if let Some(entry) = ctx.variables.find_mut(params[0].as_str()) {
        entry.modified = true;
    }
    Ok(())
}

#[cfg(feature = "storage")]
fn parse_value(var_type: VarType, text: &str) -> Option<VarValue> {
    match var_type {
        VarType::Byte => text.parse::<u8>().ok().map(VarValue::Byte),
        VarType::Double => text.parse::<f64>().ok().map(VarValue::Double),
    }
}

#[cfg(feature = "storage")]
fn report_store_error(transport: &mut dyn Transport, err: crate::storage::StorageError) {
    let _ = write!(
        Out(transport),
        "Variable store error: {}. Check the storage backend configuration.\r\n",
        err
    );
}

/// `@variables`: list registered variables, flagging pending writes.
#[cfg(feature = "storage")]
struct VariablesCommand;

#[cfg(feature = "storage")]
impl Handler for VariablesCommand {
    fn invoke(&self, _params: &ParamList, ctx: &mut CommandContext<'_, '_>) {
        ctx.transport.write_str("Stored variables: \r\n");
        for entry in ctx.variables.iter() {
            if entry.modified {
                let _ = write!(
                    Out(&mut *ctx.transport),
                    "{} ({}) - Modified \r\n",
                    entry.name,
                    entry.var_type.name()
                );
            } else {
                let _ = write!(
                    Out(&mut *ctx.transport),
                    "{} ({})\r\n",
                    entry.name,
                    entry.var_type.name()
                );
            }
        }
    }
}
