//! Interactive driver loop over the statement assembler.
//!
//! [`Client`] owns a [`Stmt`], pulls lines from a caller-supplied source,
//! resolves client-side variables against the configuration table, and hands
//! completed statements to an [`Executor`]. It knows nothing about terminals
//! or databases; those stay behind the source and executor callbacks.

pub mod executor;
pub mod metacmd;

pub use executor::Executor;
pub use metacmd::{Action, action};

use crate::stmt::quote::unquote;
use crate::{Config, Error, MetaCommand, Result, Stmt, debug, error, trace};
use regex::Regex;
use std::io::Write;
use std::sync::LazyLock;

/// Bare `help`, `quit`, or `exit` on a line of its own, intercepted before
/// the text is mistaken for the start of a statement.
static HELP_QUIT_EXIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)^(help|quit|exit)\s*$").expect("intercept pattern"));

pub struct Client<E, W> {
    config: Config,
    stmt: Stmt,
    executor: E,
    out: W,
}

impl<E: Executor, W: Write> Client<E, W> {
    pub fn new(
        config: Config,
        source: impl FnMut() -> Result<Vec<char>> + 'static,
        executor: E,
        out: W,
    ) -> Self {
        Client {
            config,
            stmt: Stmt::new(source),
            executor,
            out,
        }
    }

    /// Runs the session until the source is exhausted or a quit is requested.
    pub fn run(&mut self) -> Result {
        if !(self.config.less_chatty || self.config.silence) {
            writeln!(self.out, r#"Type "help" for more information."#)?;
            writeln!(self.out)?;
        }
        let options = self.config.map();
        loop {
            let cmd = {
                let mut resolver = |key: &str, is_config: bool| unquote(key, is_config, &options);
                match self.stmt.next(&mut resolver) {
                    Ok(cmd) => cmd,
                    Err(Error::Eof) => return Ok(()),
                    Err(e) => return Err(e),
                }
            };
            if self.intercept_plain_words()? {
                return Ok(());
            }
            if let Some(cmd) = cmd
                && self.dispatch(&cmd)?
            {
                return Ok(());
            }
            if self.stmt.ready() {
                self.execute_buffer()?;
            }
        }
    }

    /// Handles a bare `help`/`quit`/`exit` on the latest buffered line.
    /// Returns true when the session should end. On a continuation line the
    /// word only earns a hint; the statement keeps assembling.
    fn intercept_plain_words(&mut self) -> Result<bool> {
        if self.stmt.len() < 4 {
            return Ok(false);
        }
        let buf = self.stmt.string();
        let (tail, first) = match buf.rfind('\n') {
            Some(i) => (&buf[i..], false),
            None => (buf.as_str(), true),
        };
        let Some(found) = HELP_QUIT_EXIT.find(tail) else {
            return Ok(false);
        };
        match found.as_str().trim().to_lowercase().as_str() {
            "help" => {
                if first {
                    self.stmt.reset(None);
                    writeln!(self.out, "{HELP_TEXT}")?;
                } else {
                    writeln!(
                        self.out,
                        r"Use \? for help or press ctrl-C to clear the input buffer."
                    )?;
                }
            }
            "quit" | "exit" => {
                if first {
                    return Ok(true);
                }
                writeln!(self.out, r"Use \q or ctrl-D to quit.")?;
            }
            _ => {}
        }
        Ok(false)
    }

    /// Applies one meta-command. Returns true on quit.
    fn dispatch(&mut self, cmd: &MetaCommand) -> Result<bool> {
        let action = action(cmd);
        trace!("meta-command {cmd} -> {action}");
        match action {
            Action::Quit => return Ok(true),
            Action::Execute => self.execute_buffer()?,
            Action::PrintBuffer => {
                if self.stmt.is_empty() {
                    writeln!(self.out, "Query buffer is empty.")?;
                } else {
                    writeln!(self.out, "{}", self.stmt.string())?;
                }
            }
            Action::ResetBuffer => {
                self.stmt.reset(None);
                writeln!(self.out, "Query buffer reset (cleared).")?;
            }
            Action::Echo => writeln!(self.out, "{}", cmd.params().trim())?,
            Action::Help => writeln!(self.out, "{HELP_TEXT}")?,
            Action::Unknown => {
                writeln!(self.out, r"invalid command {}. Try \? for help.", cmd.name())?;
            }
        }
        Ok(false)
    }

    fn execute_buffer(&mut self) -> Result {
        let sql = self.stmt.string();
        debug!("query: {sql}");
        if let Err(e) = self.executor.execute(&sql) {
            error!("query error: {e}");
            if self.config.on_error_stop {
                return Err(e);
            }
        }
        self.stmt.reset(None);
        Ok(())
    }
}

const HELP_TEXT: &str = r"General
  \q        quit
  \g        execute the query buffer
  \p        show the query buffer
  \r        clear the query buffer
  \echo …   print the arguments
  \?        show this help";
