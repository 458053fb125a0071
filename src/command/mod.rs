//! Command pipeline
//!
//! Text line -> `parse_command` -> `Command` -> `CommandExecutor` -> session operation.
//! UI-originated calls skip the parser and call the same session operations.

pub mod executor;
pub mod parser;

pub use executor::{CommandExecutor, Flow};
pub use parser::{parse_command, Command, HELP_TEXT};
