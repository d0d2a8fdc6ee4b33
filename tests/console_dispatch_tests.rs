//! Dispatcher tests: lookup, arity validation, handler invocation
#![cfg(feature = "storage")]

mod common;

use std::cell::{Cell, RefCell};

use common::{MockStorage, MockTransport};
use serial_command_console::console::dispatch::{dispatch, CommandContext, Handler, ParamList};
use serial_command_console::console::registry::{AddressMode, CommandEntry, CommandRegistry, VariableRegistry};
use serial_command_console::console::ConsoleError;

/// Handler that counts invocations and keeps the parameters it saw.
struct RecordingHandler {
    calls: Cell<u32>,
    seen: RefCell<Vec<String>>,
}

impl RecordingHandler {
    fn new() -> Self {
        Self {
            calls: Cell::new(0),
            seen: RefCell::new(Vec::new()),
        }
    }
}

impl Handler for RecordingHandler {
    fn invoke(&self, params: &ParamList, _ctx: &mut CommandContext<'_, '_>) {
        self.calls.set(self.calls.get() + 1);
        *self.seen.borrow_mut() = params.iter().map(|p| p.as_str().to_string()).collect();
    }
}

fn entry<'a>(
    name: &'a str,
    min: u8,
    max: u8,
    handler: &'a RecordingHandler,
) -> CommandEntry<'a> {
    CommandEntry {
        name,
        description: "test command",
        usage: "usage-string",
        max_parameters: max,
        min_parameters: min,
        handler,
    }
}

#[test]
fn test_unknown_command_reported_not_invoked() {
    let handler = RecordingHandler::new();
    let mut commands = CommandRegistry::new();
    commands.register(entry("probe", 0, 0, &handler));

    let mut variables = VariableRegistry::new(AddressMode::Fixed);
    let mut storage = MockStorage::new();
    let mut transport = MockTransport::new();

    let mut ctx = CommandContext {
        commands: &commands,
        variables: &mut variables,
        storage: &mut storage,
        transport: &mut transport,
        delimiter: b',',
    };
    let result = dispatch(b"bogus", &mut ctx);

    assert_eq!(result, Err(ConsoleError::UnknownCommand));
    assert_eq!(handler.calls.get(), 0);
    assert!(transport.output_str().contains("'bogus' is not a command"));
}

#[test]
fn test_too_few_parameters_blocks_handler() {
    let handler = RecordingHandler::new();
    let mut commands = CommandRegistry::new();
    commands.register(entry("probe", 2, 2, &handler));

    let mut variables = VariableRegistry::new(AddressMode::Fixed);
    let mut storage = MockStorage::new();
    let mut transport = MockTransport::new();

    let mut ctx = CommandContext {
        commands: &commands,
        variables: &mut variables,
        storage: &mut storage,
        transport: &mut transport,
        delimiter: b',',
    };
    let result = dispatch(b"probe,one", &mut ctx);

    assert_eq!(result, Err(ConsoleError::TooFewParameters));
    assert_eq!(handler.calls.get(), 0);

    let output = transport.output_str();
    assert!(output.contains("Too few parameters!"));
    assert!(output.contains("Correct format: usage-string"));
}

#[test]
fn test_exact_arity_invokes_handler() {
    let handler = RecordingHandler::new();
    let mut commands = CommandRegistry::new();
    commands.register(entry("probe", 2, 2, &handler));

    let mut variables = VariableRegistry::new(AddressMode::Fixed);
    let mut storage = MockStorage::new();
    let mut transport = MockTransport::new();

    let mut ctx = CommandContext {
        commands: &commands,
        variables: &mut variables,
        storage: &mut storage,
        transport: &mut transport,
        delimiter: b',',
    };
    let result = dispatch(b"probe,one,two", &mut ctx);

    assert_eq!(result, Ok(()));
    assert_eq!(handler.calls.get(), 1);

    let seen = handler.seen.borrow();
    assert_eq!(seen[0], "one");
    assert_eq!(seen[1], "two");
    assert_eq!(seen[2], "");
}

#[test]
fn test_optional_parameters_may_be_absent() {
    let handler = RecordingHandler::new();
    let mut commands = CommandRegistry::new();
    commands.register(entry("probe", 0, 2, &handler));

    let mut variables = VariableRegistry::new(AddressMode::Fixed);
    let mut storage = MockStorage::new();
    let mut transport = MockTransport::new();

    let mut ctx = CommandContext {
        commands: &commands,
        variables: &mut variables,
        storage: &mut storage,
        transport: &mut transport,
        delimiter: b',',
    };
    let result = dispatch(b"probe", &mut ctx);

    assert_eq!(result, Ok(()));
    assert_eq!(handler.calls.get(), 1);
    assert!(handler.seen.borrow().iter().all(|p| p.is_empty()));
}

#[test]
fn test_excess_parameters_ignored() {
    let handler = RecordingHandler::new();
    let mut commands = CommandRegistry::new();
    commands.register(entry("probe", 1, 2, &handler));

    let mut variables = VariableRegistry::new(AddressMode::Fixed);
    let mut storage = MockStorage::new();
    let mut transport = MockTransport::new();

    let mut ctx = CommandContext {
        commands: &commands,
        variables: &mut variables,
        storage: &mut storage,
        transport: &mut transport,
        delimiter: b',',
    };
    let result = dispatch(b"probe,a,b,c,d", &mut ctx);

    assert_eq!(result, Ok(()));
    let seen = handler.seen.borrow();
    assert_eq!(seen[0], "a");
    assert_eq!(seen[1], "b");
    // Tokens past max_parameters never reach the handler.
    assert_eq!(seen[2], "");
}

#[test]
fn test_registry_full_drops_registration() {
    let handler = RecordingHandler::new();
    let mut commands = CommandRegistry::new();

    let names = [
        "c0", "c1", "c2", "c3", "c4", "c5", "c6", "c7", "c8", "c9", "c10", "c11",
    ];
    for name in names {
        commands.register(entry(name, 0, 0, &handler));
    }

    // Table capacity is 10; the overflow registrations are dropped.
    assert_eq!(commands.len(), 10);
    assert!(commands.find("c9").is_some());
    assert!(commands.find("c10").is_none());
}

#[test]
fn test_arity_clamped_to_table_limits() {
    let handler = RecordingHandler::new();
    let mut commands = CommandRegistry::new();
    commands.register(entry("wild", 9, 9, &handler));

    let registered = commands.find("wild").unwrap();
    assert_eq!(registered.max_parameters, 6);
    assert_eq!(registered.min_parameters, 6);
}

#[test]
fn test_duplicate_delimiters_collapse_in_dispatch() {
    let handler = RecordingHandler::new();
    let mut commands = CommandRegistry::new();
    commands.register(entry("probe", 1, 1, &handler));

    let mut variables = VariableRegistry::new(AddressMode::Fixed);
    let mut storage = MockStorage::new();
    let mut transport = MockTransport::new();

    let mut ctx = CommandContext {
        commands: &commands,
        variables: &mut variables,
        storage: &mut storage,
        transport: &mut transport,
        delimiter: b',',
    };
    let result = dispatch(b"probe,,,arg", &mut ctx);

    assert_eq!(result, Ok(()));
    assert_eq!(handler.seen.borrow()[0], "arg");
}
