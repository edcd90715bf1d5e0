//! Quote helpers: dequoting of `'...'`, `"..."`, and `` `...` `` literals,
//! and the configuration-lookup variant the assembler's resolver uses.

use crate::{Error, Result};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Rewrites un-escaped doubled single quotes to backslash form before the
/// escape pass.
static CLEAN_DOUBLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|[^\\])''").expect("doubled-quote pattern"));

/// Strips the outer quote characters from `s` and interprets C-style escapes
/// (`\n`, `\t`, `\xHH`, `\uHHHH`, `\\`, `\<quote>`, octal, ...) into scalar
/// values.
///
/// Fails with [`Error::UnterminatedQuotedString`] when `s` is shorter than two
/// characters or does not end in `quote`, and with
/// [`Error::InvalidQuotedString`] on a malformed escape or a stray quote.
pub fn dequote(s: &str, quote: char) -> Result<String> {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() < 2 || chars[chars.len() - 1] != quote {
        return Err(Error::UnterminatedQuotedString);
    }
    let mut inner: String = chars[1..chars.len() - 1].iter().collect();
    if quote == '\'' {
        inner = CLEAN_DOUBLE.replace_all(&inner, "${1}\\'").into_owned();
    }
    let chars: Vec<char> = inner.chars().collect();
    let mut out = String::with_capacity(inner.len());
    let mut i = 0;
    while i < chars.len() {
        out.push(unquote_char(&chars, &mut i, quote)?);
    }
    Ok(out)
}

/// Resolver hook behind variable interpolation.
///
/// With `is_config_lookup`, `s` is a configuration key (optionally wrapped in
/// `'` or `"`); the configured value comes back re-wrapped in the same
/// quotes, or `None` when the key is unknown. Otherwise `s` must be a quoted
/// literal in `'`, `"`, or `` ` `` and is dequoted.
pub fn unquote(
    s: &str,
    is_config_lookup: bool,
    options: &HashMap<String, String>,
) -> Result<Option<String>> {
    if is_config_lookup {
        return lookup_config(s, options);
    }
    if s.chars().count() < 2 {
        return Err(Error::InvalidQuotedString);
    }
    let quote = s.chars().next().unwrap_or_default();
    let z = dequote(s, quote)?;
    if quote == '\'' || quote == '"' || quote == '`' {
        Ok(Some(z))
    } else {
        Err(Error::InvalidQuotedString)
    }
}

fn lookup_config(s: &str, options: &HashMap<String, String>) -> Result<Option<String>> {
    let mut key = s.to_owned();
    let mut wrap = String::new();
    if let Some(c) = s.chars().next()
        && (c == '\'' || c == '"')
    {
        key = dequote(s, c)?;
        wrap = c.to_string();
    }
    Ok(options.get(&key).map(|val| format!("{wrap}{val}{wrap}")))
}

fn unquote_char(s: &[char], i: &mut usize, quote: char) -> Result<char> {
    let c = s[*i];
    if c == quote && (quote == '\'' || quote == '"') {
        return Err(Error::InvalidQuotedString);
    }
    if c != '\\' {
        *i += 1;
        return Ok(c);
    }
    let Some(&e) = s.get(*i + 1) else {
        return Err(Error::InvalidQuotedString);
    };
    *i += 2;
    match e {
        'a' => Ok('\u{7}'),
        'b' => Ok('\u{8}'),
        'f' => Ok('\u{c}'),
        'n' => Ok('\n'),
        'r' => Ok('\r'),
        't' => Ok('\t'),
        'v' => Ok('\u{b}'),
        '\\' => Ok('\\'),
        'x' => hex_escape(s, i, 2),
        'u' => hex_escape(s, i, 4),
        'U' => hex_escape(s, i, 8),
        '0'..='7' => octal_escape(s, i, e),
        '\'' | '"' if e == quote => Ok(e),
        _ => Err(Error::InvalidQuotedString),
    }
}

fn hex_escape(s: &[char], i: &mut usize, digits: usize) -> Result<char> {
    let mut v: u32 = 0;
    for _ in 0..digits {
        let d = s
            .get(*i)
            .and_then(|c| c.to_digit(16))
            .ok_or(Error::InvalidQuotedString)?;
        v = v * 16 + d;
        *i += 1;
    }
    char::from_u32(v).ok_or(Error::InvalidQuotedString)
}

fn octal_escape(s: &[char], i: &mut usize, first: char) -> Result<char> {
    let mut v: u32 = first.to_digit(8).unwrap_or_default();
    for _ in 0..2 {
        let d = s
            .get(*i)
            .and_then(|c| c.to_digit(8))
            .ok_or(Error::InvalidQuotedString)?;
        v = v * 8 + d;
        *i += 1;
    }
    if v > 255 {
        return Err(Error::InvalidQuotedString);
    }
    char::from_u32(v).ok_or(Error::InvalidQuotedString)
}
