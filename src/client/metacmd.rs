//! Interpretation of meta-commands by the driver loop.
//!
//! The assembler hands back any backslash-prefixed token verbatim; only the
//! driver loop assigns meaning. The vocabulary here is the small psql-style
//! set the loop actually dispatches — everything else reports as invalid.

use crate::stmt::MetaCommand;

/// What the driver loop should do with a meta-command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum Action {
    /// Execute the current buffer (`\g` family), then reset.
    #[display("execute")]
    Execute,
    /// Leave the session (`\q`).
    #[display("quit")]
    Quit,
    /// Print the current buffer (`\p`).
    #[display("print")]
    PrintBuffer,
    /// Clear the current buffer (`\r`).
    #[display("reset")]
    ResetBuffer,
    /// Print the command parameters (`\echo`).
    #[display("echo")]
    Echo,
    /// Show usage help (`\?`).
    #[display("help")]
    Help,
    /// Not part of the recognized vocabulary.
    #[display("unknown")]
    Unknown,
}

/// Maps a command name onto its [`Action`].
pub fn action(cmd: &MetaCommand) -> Action {
    match cmd.bare_name() {
        "g" | "gx" | "gset" | "gexec" => Action::Execute,
        "q" | "quit" => Action::Quit,
        "p" | "print" => Action::PrintBuffer,
        "r" | "reset" => Action::ResetBuffer,
        "echo" => Action::Echo,
        "?" | "h" | "help" => Action::Help,
        _ => Action::Unknown,
    }
}
