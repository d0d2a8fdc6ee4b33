//! Interactive serial command console.
//!
//! Byte-at-a-time line editing with cursor movement and history recall,
//! plus registry-backed command dispatch. All buffers are fixed-size;
//! nothing here allocates.

pub mod commands;
pub mod console;
pub mod dispatch;
pub mod editor;
pub mod error;
pub mod escape;
pub mod history;
pub mod line_buffer;
pub mod registry;
pub mod token;

pub use commands::register_default_commands;
pub use console::{Console, VERSION};
pub use dispatch::{dispatch, find_and_report, CommandContext, Handler, ParamList};
pub use editor::{LineEditor, LineOutcome};
pub use error::ConsoleError;
pub use escape::EscapeAction;
pub use history::HistoryRing;
pub use line_buffer::LineBuffer;
pub use registry::{CommandEntry, CommandRegistry};
#[cfg(feature = "storage")]
pub use registry::{AddressMode, VariableEntry, VariableRegistry};
pub use token::{get_token, Token};
