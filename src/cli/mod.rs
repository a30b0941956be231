pub mod args;
pub mod commands;

pub use args::{Cli, Commands, ProcessArgs};
pub use commands::{process, run, setup_logging};
