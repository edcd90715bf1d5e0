//! Interactive statement assembly.
//!
//! This module turns an unbounded stream of prompt lines into complete SQL
//! statements and meta-commands. It tracks the lexical state a statement can
//! be suspended in mid-line — six quote flavors, multiline comments, balanced
//! parentheses, dollar-tagged literals — splices client-side variables into
//! the text it is scanning, and classifies the leading words of whatever has
//! accumulated so far.
//!
//! Modules:
//! - `buffer`    : growable scalar-value buffer, capacity policy, scan helpers.
//! - `scan`      : stateless sub-scanners for strings, comments, commands.
//! - `var`       : variable occurrences and in-place substitution.
//! - `prefix`    : upper-cased leading-word extraction for completion hints.
//! - `assembler` : the `Stmt` state machine driving it all.
//! - `quote`     : dequoting and the config-lookup resolver hook.
//!
//! Design principles:
//! 1. Sub-scanners are pure functions over `(buf, i, end)`; all state lives
//!    in one place, the `Stmt`.
//! 2. Malformed input is never an error. An unterminated construct persists
//!    into the next line and is reported through `Stmt::state`.
//! 3. Offsets are Unicode scalar values throughout, never bytes.
//!
//! Example:
//! ```rust
//! use qsh::stmt::prelude::*;
//!
//! let mut lines = vec!["select 1;".chars().collect::<Vec<char>>()];
//! let mut stmt = Stmt::new(move || lines.pop().ok_or(qsh::Error::Eof));
//! let mut resolver = |_: &str, _: bool| -> qsh::Result<Option<String>> { Ok(None) };
//! let cmd = stmt.next(&mut resolver).unwrap();
//! assert!(cmd.is_none());
//! assert!(stmt.ready());
//! assert_eq!(stmt.string(), "select 1;");
//! ```

pub mod assembler;
pub mod buffer;
pub mod prefix;
pub mod quote;
pub mod scan;
pub mod var;


pub use assembler::{MetaCommand, Resolver, Stmt};
pub use buffer::{MIN_CAP_INCREASE, find_non_space, find_rune, find_space, is_empty_line};
pub use prefix::{PREFIX_COUNT, find_prefix, prefix_of};
pub use quote::{dequote, unquote};
pub use var::Var;

/// Convenience prelude re-exporting the most commonly used items.
///
/// Import with:
/// `use qsh::stmt::prelude::*;`
pub mod prelude {
    pub use super::{MetaCommand, Stmt, Var, dequote, find_prefix, unquote};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, Result};

    #[test]
    fn assemble_and_access() {
        let mut lines = vec!["select 1\\g".chars().collect::<Vec<char>>()];
        let mut stmt = Stmt::new(move || lines.pop().ok_or(Error::Eof));
        let mut resolver = |_: &str, _: bool| -> Result<Option<String>> { Ok(None) };
        let cmd = stmt.next(&mut resolver).unwrap().expect("meta-command");
        assert_eq!(cmd.name(), "\\g");
        assert_eq!(stmt.string(), "select 1");
        assert_eq!(stmt.prefix(), "SELECT");
        assert_eq!(stmt.state(), '-');
    }

    #[test]
    fn prelude_import_works() {
        use prelude::*;
        let r: Vec<char> = "select 'a'".chars().collect();
        assert_eq!(find_prefix(&r, 2), "SELECT");
        assert_eq!(dequote("'x'", '\'').unwrap(), "x");
        assert_eq!(Var::default().to_string(), ":");
    }
}
