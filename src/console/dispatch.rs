//! Command dispatch: extract the name, validate arity, invoke.

use core::fmt::Write;

use super::error::ConsoleError;
use super::registry::{CommandEntry, CommandRegistry};
#[cfg(feature = "storage")]
use super::registry::VariableRegistry;
use super::token::{get_token, Token};
use crate::config::MAX_PARAMETERS;
#[cfg(feature = "storage")]
use crate::storage::Storage;
use crate::transport::{Out, Transport};

/// Fixed parameter array handed to handlers. An empty string marks an
/// absent parameter.
pub type ParamList = [Token; MAX_PARAMETERS];

/// Collaborators a handler may touch while it runs.
pub struct CommandContext<'c, 'a> {
    /// Read access to the command table (`@help` walks it).
    pub commands: &'c CommandRegistry<'a>,
    /// The variable table; variable commands flag writes here.
    #[cfg(feature = "storage")]
    pub variables: &'c mut VariableRegistry<'a>,
    /// The backing store behind the variable commands.
    #[cfg(feature = "storage")]
    pub storage: &'c mut dyn Storage,
    /// The serial link; all operator-facing output goes here.
    pub transport: &'c mut dyn Transport,
    /// Delimiter in effect for the session.
    pub delimiter: u8,
}

/// Command handler capability.
///
/// Invoked with the validated parameter array; returns nothing. Side
/// effects (output, store writes) are the handler's business; the
/// dispatcher never interprets them.
pub trait Handler {
    fn invoke(&self, params: &ParamList, ctx: &mut CommandContext<'_, '_>);
}

/// Look a command up by name, telling the operator about unknown names.
pub fn find_and_report<'a>(
    commands: &CommandRegistry<'a>,
    transport: &mut dyn Transport,
    name: &str,
) -> Option<CommandEntry<'a>> {
    let found = commands.find(name).copied();
    if found.is_none() {
        let _ = write!(
            Out(transport),
            "'{}' is not a command. You can use the '@help' command to list all possible commands.\r\n",
            name
        );
    }
    found
}

/// Dispatch one finished line.
///
/// Reports unknown commands and arity failures to the operator and
/// returns the matching taxonomy value; the session continues either
/// way. The handler runs only when every check passed.
pub fn dispatch(line: &[u8], ctx: &mut CommandContext<'_, '_>) -> Result<(), ConsoleError> {
    let name = get_token(line, ctx.delimiter, 0);

    let entry = match find_and_report(ctx.commands, &mut *ctx.transport, name.as_str()) {
        Some(entry) => entry,
        None => return Err(ConsoleError::UnknownCommand),
    };

    let mut params: ParamList = core::array::from_fn(|_| Token::new());
    for index in 0..entry.max_parameters as usize {
        params[index] = get_token(line, ctx.delimiter, index + 1);

        if params[index].is_empty() && index < entry.min_parameters as usize {
            let _ = write!(
                Out(&mut *ctx.transport),
                "Too few parameters!\r\nCorrect format: {}\r\n",
                entry.usage
            );
            return Err(ConsoleError::TooFewParameters);
        }
    }

    entry.handler.invoke(&params, ctx);
    Ok(())
}
