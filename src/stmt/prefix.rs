//! Leading-word extraction for completion hints.
//!
//! [`find_prefix`] pulls up to `n` upper-cased words off the front of a
//! buffer, eliding comments on the way. It is a hint extractor, not a parser:
//! punctuation or a statement terminator simply ends the prefix. The function
//! is pure, so re-invoking it on the same buffer always yields the same
//! string.

use crate::stmt::buffer::{find_non_space, find_rune, grab, is_space_or_control};

/// Number of words extracted from a statement prefix.
pub const PREFIX_COUNT: usize = 6;

/// Finds the first [`PREFIX_COUNT`] prefix words in `s`.
pub fn prefix_of(s: &str) -> String {
    let r: Vec<char> = s.chars().collect();
    find_prefix(&r, PREFIX_COUNT)
}

/// Extracts up to `n` upper-cased leading words from `r`.
///
/// Line comments (`--`, `//`, `#`) run to the next newline and are elided
/// with a word boundary in their place. Block comments (`/* ... */`, non
/// -nesting) are elided; a boundary is inserted only when the text after the
/// comment starts with whitespace. A `;` or any stray punctuation terminates
/// the prefix.
pub fn find_prefix(r: &[char], n: usize) -> String {
    let mut s: Vec<char> = Vec::new();
    let mut words = 0;
    let mut r = r;
    let mut i = 0;
    'scan: while i < r.len() {
        // skip space and control characters
        let (j, _) = find_non_space(r, i, r.len());
        if i != j {
            r = &r[j..];
            i = 0;
        }
        let end = r.len();
        let c = grab(r, i, end);
        let next = grab(r, i + 1, end);
        if c == '\0' {
            i += 1;
        } else if c == ';' {
            break 'scan;
        } else if (c == '-' && next == '-') || (c == '/' && next == '/') || c == '#' {
            if i != 0 {
                append_upper(&mut s, &r[..i], Some(' '));
                words += 1;
            }
            let (pos, found) = find_rune(r, i, end, '\n');
            if !found {
                break 'scan;
            }
            r = &r[pos + 1..];
            i = 0;
        } else if c == '/' && next == '*' {
            if i != 0 {
                append_upper(&mut s, &r[..i], None);
                words += 1;
            }
            let mut k = i + 2;
            loop {
                if k >= end {
                    // comment never closes; no prefix can follow
                    break 'scan;
                }
                if grab(r, k, end) == '*' && grab(r, k + 1, end) == '/' {
                    r = &r[k + 2..];
                    break;
                }
                k += 1;
            }
            // boundary only when the remaining text leads with whitespace and
            // the captured prefix does not already end with one
            if let (Some(&first), Some(&last)) = (r.first(), s.last())
                && is_space_or_control(first)
                && !is_space_or_control(last)
            {
                s.push(' ');
            }
            i = 0;
        } else if words == n || !c.is_alphabetic() {
            break 'scan;
        } else if next != '/' && next != '-' && next != '#' && !next.is_alphabetic() {
            // a word ends here; '/', '-', and '#' are left for the comment
            // branches so a glued comment opener still inserts a boundary
            append_upper(&mut s, &r[..i + 1], Some(' '));
            words += 1;
            if next == '\0' || next == ';' {
                break 'scan;
            }
            r = &r[i + 2..];
            i = 0;
        } else {
            i += 1;
        }
    }
    if s.last() == Some(&' ') {
        s.pop();
    }
    s.into_iter().collect()
}

/// Appends `r` to `s` upper-cased, followed by `extra` when given.
fn append_upper(s: &mut Vec<char>, r: &[char], extra: Option<char>) {
    s.extend(r.iter().flat_map(|c| c.to_uppercase()));
    s.extend(extra);
}
