mod command;

pub use command::{parse_command, Command, CommandError, CommandResult, ZoomDirection};
