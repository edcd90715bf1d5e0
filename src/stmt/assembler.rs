//! The statement assembler: a reusable buffer that pulls lines from a source
//! callback and recognizes SQL statement boundaries across quoting dialects,
//! comments, balanced parentheses, dollar-tagged literals, backslash commands,
//! and client-side variable interpolation.
//!
//! One [`Stmt`] lives for a whole interactive session. The driver loop calls
//! [`Stmt::next`] until it reports a meta-command or [`Stmt::ready`] turns
//! true, executes [`Stmt::string`], then calls [`Stmt::reset`].

use crate::stmt::buffer::{LINE_END, find_non_space, grab, is_empty_line};
use crate::stmt::prefix::{PREFIX_COUNT, find_prefix};
use crate::stmt::scan::{read_command, read_dollar_and_tag, read_multiline_comment, read_string};
use crate::stmt::var::{Var, read_var, substitute_var};
use crate::{Error, Result};

/// A meta-command pulled off the input stream: the backslash-prefixed token
/// and the raw parameter text that followed it. The assembler imposes no
/// vocabulary; interpretation belongs to the caller.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
#[display("{name}{params}")]
pub struct MetaCommand {
    name: String,
    params: String,
}

impl MetaCommand {
    /// The command token, including the leading backslash.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The command token without the leading backslash.
    pub fn bare_name(&self) -> &str {
        self.name.trim_start_matches('\\')
    }

    /// The raw parameter region, untrimmed.
    pub fn params(&self) -> &str {
        &self.params
    }
}

/// Resolver callback: `(key, is_config_lookup)` to an accepted replacement,
/// `None` to leave the variable literal.
pub trait Resolver: FnMut(&str, bool) -> Result<Option<String>> {}
impl<F: FnMut(&str, bool) -> Result<Option<String>>> Resolver for F {}

/// Reusable statement buffer.
pub struct Stmt {
    /// Line source; each call yields one logical line without its newline.
    source: Box<dyn FnMut() -> Result<Vec<char>>>,
    /// Statement accumulated so far; `None` until the first append.
    pub(crate) buf: Option<Vec<char>>,
    /// Upper-cased leading words of `buf`, recomputed after every append.
    prefix: String,
    /// Variables recognized since the last reset, in buffer order.
    pub(crate) vars: Vec<Var>,
    /// Unprocessed characters from the most recent source line.
    pending: Vec<char>,
    /// Open quote character (`'`, `"`, `` ` ``, `$`), if any.
    quote: Option<char>,
    /// Tag of the open dollar-quoted literal; empty for `$$`.
    quote_dollar_tag: String,
    /// Inside a `/* ... */` comment.
    multiline_comment: bool,
    /// Balanced-parenthesis depth; never underflows.
    balance_count: usize,
    /// A `;` closed a balanced top-level statement.
    ready: bool,
}

impl Stmt {
    /// Creates a statement buffer over the given line source.
    pub fn new(source: impl FnMut() -> Result<Vec<char>> + 'static) -> Self {
        Stmt {
            source: Box::new(source),
            buf: None,
            prefix: String::new(),
            vars: Vec::new(),
            pending: Vec::new(),
            quote: None,
            quote_dollar_tag: String::new(),
            multiline_comment: false,
            balance_count: 0,
            ready: false,
        }
    }

    /// The assembled statement text.
    pub fn string(&self) -> String {
        self.buf.as_deref().unwrap_or_default().iter().collect()
    }

    /// The statement text with every accepted substitution reverted: defined
    /// variables are re-wrapped in their original spelling, declined ones are
    /// already literal in the buffer.
    pub fn raw_string(&self) -> String {
        if self.len() == 0 {
            return String::new();
        }
        let buf = self.buf.as_deref().unwrap_or_default();
        let mut out = String::new();
        let mut i = 0;
        for v in &self.vars {
            if !v.defined {
                continue;
            }
            if buf.len() > i {
                out.extend(&buf[i..v.i]);
            }
            out.push_str(&v.to_string());
            i = v.i + v.len;
        }
        if buf.len() > i {
            out.extend(&buf[i..]);
        }
        out
    }

    /// Length of the assembled statement, in Unicode scalar values.
    pub fn len(&self) -> usize {
        self.buf.as_deref().map_or(0, <[char]>::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Buffer capacity, in scalar values. Grows in [`MIN_CAP_INCREASE`]
    /// multiples; see [`Stmt::append`].
    ///
    /// [`MIN_CAP_INCREASE`]: crate::stmt::buffer::MIN_CAP_INCREASE
    /// [`Stmt::append`]: Stmt::append
    pub fn capacity(&self) -> usize {
        self.buf.as_ref().map_or(0, Vec::capacity)
    }

    /// Cached prefix of the statement; see [`find_prefix`].
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Variables recognized for the current statement, in order.
    pub fn vars(&self) -> &[Var] {
        &self.vars
    }

    /// True when the buffer holds a non-empty, balanced statement terminated
    /// by a semicolon.
    pub fn ready(&self) -> bool {
        self.ready
    }

    /// One-character parse state for the prompt: the open quote character,
    /// `*` inside a multiline comment, `(` while parentheses are unbalanced,
    /// `-` for a non-empty buffer with no terminator yet, `=` when idle.
    pub fn state(&self) -> char {
        if let Some(q) = self.quote {
            q
        } else if self.multiline_comment {
            '*'
        } else if self.balance_count != 0 {
            '('
        } else if self.len() != 0 {
            '-'
        } else {
            '='
        }
    }

    /// Clears the buffer and all parse state. `seed` replaces the unprocessed
    /// input when given, so a caller can inject a replay buffer; otherwise
    /// leftover input keeps its place in line.
    pub fn reset(&mut self, seed: Option<Vec<char>>) {
        self.buf = None;
        self.prefix.clear();
        self.vars.clear();
        self.quote = None;
        self.quote_dollar_tag.clear();
        self.multiline_comment = false;
        self.balance_count = 0;
        self.ready = false;
        if let Some(seed) = seed {
            self.pending = seed;
        }
    }

    /// Scans forward through any residual input, pulling one more line from
    /// the source when none is left, and stops at the first meta-command or
    /// statement terminator.
    ///
    /// Returns `Ok(Some(_))` for a meta-command (its text is spliced out of
    /// the input), `Ok(None)` when the line was consumed without one — the
    /// caller then checks [`Stmt::ready`]. A source error (including
    /// [`Error::Eof`]) is returned verbatim with the buffer untouched.
    /// Unterminated quotes, comments, and parentheses are not errors: the
    /// state carries into the next line and shows through [`Stmt::state`].
    pub fn next(&mut self, resolver: &mut impl Resolver) -> Result<Option<MetaCommand>> {
        if self.pending.is_empty() {
            self.pending = (self.source)()?;
        }
        let mut i = 0;
        let mut cmd = String::new();
        let mut params = String::new();
        while i < self.pending.len() {
            let end = self.pending.len();
            let c = self.pending[i];
            let next = grab(&self.pending, i + 1, end);
            if let Some(q) = self.quote {
                let (pos, ok) = read_string(&self.pending, i, end, q, &self.quote_dollar_tag);
                i = pos;
                if ok {
                    self.quote = None;
                    self.quote_dollar_tag.clear();
                }
            } else if self.multiline_comment {
                let (pos, ok) = read_multiline_comment(&self.pending, i, end);
                i = pos;
                self.multiline_comment = !ok;
            } else if c == '\'' || c == '"' {
                self.quote = Some(c);
            } else if c == '$' && (next == '$' || next == '_' || next.is_alphabetic()) {
                let (tag, pos, ok) = read_dollar_and_tag(&self.pending, i, end);
                i = pos;
                if ok {
                    self.quote = Some('$');
                    self.quote_dollar_tag = tag;
                }
            } else if (c == '-' && next == '-') || (c == '/' && next == '/') || c == '#' {
                // line comment: the rest of the line is literal text
                i = end;
            } else if c == '/' && next == '*' {
                self.multiline_comment = true;
                i += 1;
            } else if c == ':' && next != ':' {
                if let Some(mut v) = read_var(&self.pending, i, end) {
                    let key = match v.quote {
                        Some(q) => format!("{q}{}{q}", v.name),
                        None => v.name.clone(),
                    };
                    let accepted = resolver(&key, true)?;
                    if let Some(value) = accepted {
                        v.defined = true;
                        substitute_var(&mut self.pending, &mut v, &value);
                        self.rebase(&mut v);
                        self.vars.push(v);
                        // re-scan from the same position so a substitution
                        // that itself starts a construct is picked up
                        continue;
                    }
                    self.rebase(&mut v);
                    self.vars.push(v);
                }
            } else if c == '(' {
                self.balance_count += 1;
            } else if c == ')' {
                self.balance_count = self.balance_count.saturating_sub(1);
            } else if self.balance_count != 0 {
                // inside balanced parens, backslashes and semicolons are
                // ordinary statement text
            } else if c == '\\' && (next == '\\' || next == ';' || next == ':') {
                let mut v = Var::escape(i, next);
                substitute_var(&mut self.pending, &mut v, &next.to_string());
                self.rebase(&mut v);
                self.vars.push(v);
            } else if c == '\\' {
                let (cend, pend) = read_command(&self.pending, i, end);
                cmd = self.pending[i..cend].iter().collect();
                params = self.pending[cend..pend].iter().collect();
                self.pending.drain(i..pend);
                break;
            } else if c == ';' {
                self.ready = true;
                i += 1;
                break;
            }
            i += 1;
        }
        let i = i.min(self.pending.len());
        // append the consumed prefix of the line to the buffer, except when
        // it is whitespace-only and we are neither inside a string nor a
        // multiline comment (a whitespace-only line after a command is
        // likewise dropped)
        let empty = is_empty_line(&self.pending, 0, i);
        let mut append_line = self.quote.is_some() || self.multiline_comment || !empty;
        if !self.multiline_comment && !cmd.is_empty() && empty {
            append_line = false;
        }
        if append_line {
            let st = if self.len() == 0 {
                find_non_space(&self.pending, 0, i).0
            } else {
                0
            };
            let chunk: Vec<char> = self.pending[st..i].to_vec();
            self.append(&chunk, LINE_END);
        }
        self.prefix = find_prefix(self.buf.as_deref().unwrap_or_default(), PREFIX_COUNT);
        self.pending.drain(..i);
        if cmd.is_empty() {
            Ok(None)
        } else {
            Ok(Some(MetaCommand { name: cmd, params }))
        }
    }

    /// Shifts a variable's start from line-relative to buffer-relative
    /// coordinates, accounting for the separator the coming append inserts.
    fn rebase(&self, v: &mut Var) {
        if self.len() != 0 {
            v.i += self.len() + 1;
        }
    }
}

impl Default for Stmt {
    /// A buffer with an exhausted line source; useful when driving
    /// [`Stmt::append`] directly.
    fn default() -> Self {
        Stmt::new(|| Err(Error::Eof))
    }
}

impl std::fmt::Debug for Stmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stmt")
            .field("buf", &self.string())
            .field("prefix", &self.prefix)
            .field("vars", &self.vars)
            .field("pending", &self.pending.iter().collect::<String>())
            .field("state", &self.state())
            .field("ready", &self.ready)
            .finish()
    }
}
