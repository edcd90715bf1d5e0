//! Lexical sub-scanners.
//!
//! Stateless functions that, given a buffer and a start offset, advance to the
//! end of one lexical construct: a quoted string, a dollar-tagged literal, a
//! multiline comment, or a backslash command with its parameters. None of them
//! touch assembler state; each takes `(buf, i, end)` and reports how far it
//! got and whether the construct terminated, so the state machine can resume
//! mid-construct on the next source line.

use crate::stmt::buffer::grab;
use regex::Regex;
use std::sync::LazyLock;

/// Language of dollar-quote tags (`$tag$`): an identifier of at most 128
/// letters, digits, and underscores, or empty.
static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[a-z_][a-z0-9_]{0,127}$").expect("identifier pattern"));

/// Seeks to the end of a quoted string whose opening delimiter sits just
/// before `i`, returning the position of the closing delimiter and whether it
/// was found. When the string runs past `end`, `(end, false)` is returned and
/// the caller keeps the quote state for the next line.
///
/// Single-quoted strings treat `''` and a backslash-escaped character as
/// in-string; double- and back-quoted strings have no escapes. For `quote ==
/// '$'`, the string ends at the next `$tag$` whose tag matches `tag`;
/// non-matching embedded `$...$` sequences are ignored.
pub fn read_string(r: &[char], mut i: usize, end: usize, quote: char, tag: &str) -> (usize, bool) {
    let mut prev = '\0';
    while i < end {
        let (c, next) = (r[i], grab(r, i + 1, end));
        match quote {
            '\'' if c == '\\' => {
                // the escaped character is consumed blind; doubled-quote
                // lookback resets
                i += 2;
                prev = '\0';
                continue;
            }
            '\'' if c == '\'' && next == '\'' => {
                i += 2;
                continue;
            }
            '\'' if c == '\'' && prev != '\'' => return (i, true),
            '"' if c == '"' => return (i, true),
            '`' if c == '`' => return (i, true),
            '$' if c == '$' => {
                let (id, pos, ok) = read_dollar_and_tag(r, i, end);
                if ok && id == tag {
                    return (pos, true);
                }
            }
            _ => {}
        }
        prev = c;
        i += 1;
    }
    (end, false)
}

/// Reads a `$tag$` opener starting at the `$` at `i`. Returns the tag, the
/// position of the closing `$`, and whether a valid tag was found. Scanning
/// gives up after 128 characters without a closing `$`, and a tag outside the
/// identifier language is rejected — the opening `$` is then not a literal
/// start and the characters stay ordinary text.
pub fn read_dollar_and_tag(r: &[char], i: usize, end: usize) -> (String, usize, bool) {
    let start = i;
    let mut i = i + 1;
    let mut found = false;
    while i < end {
        if r[i] == '$' {
            found = true;
            break;
        }
        if i - start > 128 {
            break;
        }
        i += 1;
    }
    if !found {
        return (String::new(), i, false);
    }
    let id: String = r[start + 1..i].iter().collect();
    if !id.is_empty() && !IDENTIFIER.is_match(&id) {
        return (String::new(), i, false);
    }
    (id, i, true)
}

/// Finds the end of a multiline comment (`*/`). Comments do not nest.
pub fn read_multiline_comment(r: &[char], mut i: usize, end: usize) -> (usize, bool) {
    i += 1;
    while i < end {
        if r[i - 1] == '*' && r[i] == '/' {
            return (i, true);
        }
        i += 1;
    }
    (end, false)
}

/// Reads a backslash command starting at the `\` at `i`, returning
/// `(cmd_end, params_end)`: `r[i..cmd_end]` is the command token and
/// `r[cmd_end..params_end]` its parameter region.
///
/// The command token runs to the first whitespace, backslash, control
/// character, or end of buffer. Parameters run to the next unquoted backslash
/// or control character; single-, double-, and back-quoted regions are
/// honored, and inside them `\\` and `\<quote>` are skipped as escapes.
pub fn read_command(r: &[char], mut i: usize, end: usize) -> (usize, usize) {
    loop {
        if i >= end {
            break;
        }
        let next = grab(r, i + 1, end);
        if next == '\0' {
            return (end, end);
        }
        if next == '\\' || next.is_control() {
            return (i + 1, i + 1);
        }
        if next.is_whitespace() {
            i += 1;
            break;
        }
        i += 1;
    }
    let cmd = i;
    let mut quote = '\0';
    while i < end {
        let (c, next) = (r[i], grab(r, i + 1, end));
        if next == '\0' {
            return (cmd, end);
        }
        if quote == '\0' && (c == '\'' || c == '"' || c == '`') {
            quote = c;
        } else if quote != '\0' && c == quote {
            quote = '\0';
        } else if quote != '\0' && c == '\\' && (next == quote || next == '\\') {
            i += 1;
        } else if quote == '\0' && (c == '\\' || c.is_control()) {
            break;
        }
        i += 1;
    }
    (cmd, i)
}
