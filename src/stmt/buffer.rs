//! Rune-buffer primitives for the statement assembler.
//!
//! Everything here operates on `[char]` — offsets, lengths, and substitution
//! counts are all in Unicode scalar values, never bytes. The scan helpers take
//! a half-open `[i, end)` range and return `(position, found)` so callers can
//! resume where a scan stopped.

use crate::stmt::assembler::Stmt;

/// Minimum amount by which the statement buffer grows.
///
/// Growth is always rounded up to the next multiple of this quantum; a
/// required size already at a multiple is bumped a full quantum further.
pub const MIN_CAP_INCREASE: usize = 512;

/// Line separator inserted between successive source lines.
pub(crate) const LINE_END: &[char] = &['\n'];

impl Stmt {
    /// Appends `chunk` to the buffer, preceded by `sep` when the buffer has
    /// already been written to (even if only with an empty chunk).
    ///
    /// The first append adopts the chunk as-is. Later appends that exceed the
    /// current capacity reallocate to `needed + 2 * chunk.len()` rounded up to
    /// the next multiple of [`MIN_CAP_INCREASE`].
    pub fn append(&mut self, chunk: &[char], sep: &[char]) {
        let Some(buf) = self.buf.as_mut() else {
            self.buf = Some(chunk.to_vec());
            return;
        };
        let tlen = buf.len() + sep.len() + chunk.len();
        if tlen > buf.capacity() {
            let mut n = tlen + 2 * chunk.len();
            n += MIN_CAP_INCREASE - (n % MIN_CAP_INCREASE);
            let mut grown = Vec::with_capacity(n);
            grown.extend_from_slice(buf);
            *buf = grown;
        }
        buf.extend_from_slice(sep);
        buf.extend_from_slice(chunk);
    }

    /// Convenience wrapper around [`Stmt::append`] for string input.
    pub fn append_str(&mut self, chunk: &str, sep: &str) {
        let chunk: Vec<char> = chunk.chars().collect();
        let sep: Vec<char> = sep.chars().collect();
        self.append(&chunk, &sep);
    }
}

/// Replaces `n` characters at offset `i` with the characters of `s`, shifting
/// the tail and growing the buffer as needed. Returns the new logical length.
pub fn substitute(buf: &mut Vec<char>, i: usize, n: usize, s: &str) -> usize {
    buf.splice(i..i + n, s.chars());
    buf.len()
}

/// Character at `i`, or `'\0'` when `i` is at or past `end`.
pub(crate) fn grab(r: &[char], i: usize, end: usize) -> char {
    if i < end { r[i] } else { '\0' }
}

/// A "space" for scanning purposes: Unicode whitespace or a control
/// character, so that e.g. backspace and vertical tab terminate words.
pub fn is_space_or_control(c: char) -> bool {
    c.is_whitespace() || c.is_control()
}

/// First space in `[i, end)`, or `(end, false)` when there is none.
pub fn find_space(r: &[char], i: usize, end: usize) -> (usize, bool) {
    position(r, i, end, is_space_or_control)
}

/// First non-space in `[i, end)`, or `(end, false)` when there is none.
pub fn find_non_space(r: &[char], i: usize, end: usize) -> (usize, bool) {
    position(r, i, end, |c| !is_space_or_control(c))
}

/// First occurrence of `c` in `[i, end)`, or `(end, false)`.
pub fn find_rune(r: &[char], i: usize, end: usize, c: char) -> (usize, bool) {
    position(r, i, end, |x| x == c)
}

/// True when `[i, end)` is empty or whitespace-only.
pub fn is_empty_line(r: &[char], i: usize, end: usize) -> bool {
    !find_non_space(r, i, end).1
}

fn position(r: &[char], mut i: usize, end: usize, pred: impl Fn(char) -> bool) -> (usize, bool) {
    while i < end {
        if pred(r[i]) {
            return (i, true);
        }
        i += 1;
    }
    (end, false)
}
