//! Client-side variable occurrences and in-place substitution.
//!
//! A [`Var`] records where a `:name`, `:'name'`, `:"name"`, or two-character
//! backslash escape was seen in the scan buffer. Offsets are Unicode scalar
//! positions: `i`/`end` span the pre-substitution text, `len` is the length of
//! the substituted replacement once one has been spliced in.

use crate::stmt::buffer::{grab, substitute};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Var {
    /// Start of the variable (the `:`, or the `\` for escape vars).
    pub i: usize,
    /// One past the end of the pre-substitution text.
    pub end: usize,
    /// Quote character, if the variable was written `:'name'` / `:"name"`;
    /// `'\\'` marks a backslash escape.
    pub quote: Option<char>,
    /// Variable name, without the colon and any enclosing quotes.
    pub name: String,
    /// Length of the replacement text, in scalar values.
    pub len: usize,
    /// Whether the resolver accepted the variable.
    pub defined: bool,
}

impl Var {
    pub(crate) fn new(i: usize, end: usize, name: impl Into<String>, quote: Option<char>) -> Self {
        Var {
            i,
            end,
            quote,
            name: name.into(),
            ..Var::default()
        }
    }

    /// The variable synthesized for a `\\`, `\;`, or `\:` escape sequence at
    /// offset `i`; `c` is the escaped (second) character.
    pub(crate) fn escape(i: usize, c: char) -> Self {
        Var::new(i, i + 2, c.to_string(), Some('\\'))
    }
}

impl std::fmt::Display for Var {
    /// Renders the variable as originally written: backslash escapes without
    /// a leading colon, quoted variables re-wrapped in their quote.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.quote {
            Some('\\') => write!(f, "\\{}", self.name),
            Some(q) => write!(f, ":{q}{}{q}", self.name),
            None => write!(f, ":{}", self.name),
        }
    }
}

/// Reads a variable occurrence at the `:` at `i`. Returns `None` when the
/// characters do not form a variable: a `::` pair (type casts), a bare `:`,
/// or a quoted form with nothing between the quotes.
pub fn read_var(r: &[char], i: usize, end: usize) -> Option<Var> {
    if grab(r, i, end) != ':' || grab(r, i + 1, end) == ':' {
        return None;
    }
    if end - i < 2 {
        return None;
    }
    let c = grab(r, i + 1, end);
    if c == '"' || c == '\'' {
        return read_string_var(r, i, end);
    }
    let start = i;
    let mut i = i + 1;
    while i < end {
        let c = grab(r, i, end);
        if c != '_' && !c.is_alphabetic() && !c.is_numeric() {
            break;
        }
        i += 1;
    }
    if i - start < 2 {
        return None;
    }
    Some(Var::new(start, i, r[start + 1..i].iter().collect::<String>(), None))
}

/// Reads a quoted variable (`:'name'` / `:"name"`); at least one character is
/// required between the quotes.
fn read_string_var(r: &[char], i: usize, end: usize) -> Option<Var> {
    let start = i;
    let q = grab(r, i + 1, end);
    let mut i = i + 2;
    while i < end {
        if grab(r, i, end) == q {
            if i - start < 3 {
                return None;
            }
            let name: String = r[start + 2..i].iter().collect();
            return Some(Var::new(start, i + 1, name, Some(q)));
        }
        i += 1;
    }
    None
}

/// Replaces `buf[v.i..v.end]` with `s`, recording the replacement length in
/// `v.len`. Offsets of any later text shift by `s.len() - (v.end - v.i)`
/// scalar values; the caller rebases `v.i` once the line is folded into the
/// statement buffer.
pub fn substitute_var(buf: &mut Vec<char>, v: &mut Var, s: &str) {
    v.len = s.chars().count();
    substitute(buf, v.i, v.end - v.i, s);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn v(i: usize, end: usize, name: &str) -> Var {
        Var::new(i, end, name, None)
    }

    fn qv(i: usize, end: usize, name: &str, q: char) -> Var {
        Var::new(i, end, name, Some(q))
    }

    #[test]
    fn read_var_plain_and_quoted() {
        let tests: &[(&str, usize, Option<Var>)] = &[
            ("", 0, None),
            (":", 0, None),
            (" :", 0, None),
            ("a:", 0, None),
            ("a:a", 0, None),
            (": ", 0, None),
            (": a ", 0, None),
            (":a", 0, Some(v(0, 2, "a"))),
            (":ab", 0, Some(v(0, 3, "ab"))),
            (":a ", 0, Some(v(0, 2, "a"))),
            (":a_ ", 0, Some(v(0, 3, "a_"))),
            (":a_\t ", 0, Some(v(0, 3, "a_"))),
            (":a_\n ", 0, Some(v(0, 3, "a_"))),
            (":a9", 0, Some(v(0, 3, "a9"))),
            (":ab9", 0, Some(v(0, 4, "ab9"))),
            (":a 9", 0, Some(v(0, 2, "a"))),
            (":a_9 ", 0, Some(v(0, 4, "a_9"))),
            (":a_9\t ", 0, Some(v(0, 4, "a_9"))),
            (":a_9\n ", 0, Some(v(0, 4, "a_9"))),
            (":a_;", 0, Some(v(0, 3, "a_"))),
            (r":a_\", 0, Some(v(0, 3, "a_"))),
            (":a_$", 0, Some(v(0, 3, "a_"))),
            (":a_'", 0, Some(v(0, 3, "a_"))),
            (":a_\"", 0, Some(v(0, 3, "a_"))),
            (":ab ", 0, Some(v(0, 3, "ab"))),
            (":ab123 ", 0, Some(v(0, 6, "ab123"))),
            (":ab123", 0, Some(v(0, 6, "ab123"))),
            (":'", 0, None),
            (":' ", 0, None),
            (":' a", 0, None),
            (":' a ", 0, None),
            (":\"", 0, None),
            (":\" ", 0, None),
            (":\" a", 0, None),
            (":\" a ", 0, None),
            (":''", 0, None),
            (":'' ", 0, None),
            (":'' a", 0, None),
            (":\"\"", 0, None),
            (":\"\" ", 0, None),
            (":\"\" a", 0, None),
            (":'     ", 0, None),
            (":'       ", 0, None),
            (":\"     ", 0, None),
            (":\"       ", 0, None),
            (":'a'", 0, Some(qv(0, 4, "a", '\''))),
            (":'a' ", 0, Some(qv(0, 4, "a", '\''))),
            (":'ab'", 0, Some(qv(0, 5, "ab", '\''))),
            (":'ab' ", 0, Some(qv(0, 5, "ab", '\''))),
            (":'ab  ' ", 0, Some(qv(0, 7, "ab  ", '\''))),
            (":\"a\"", 0, Some(qv(0, 4, "a", '"'))),
            (":\"a\" ", 0, Some(qv(0, 4, "a", '"'))),
            (":\"ab\"", 0, Some(qv(0, 5, "ab", '"'))),
            (":\"ab\" ", 0, Some(qv(0, 5, "ab", '"'))),
            (":\"ab  \" ", 0, Some(qv(0, 7, "ab  ", '"'))),
            (":型", 0, Some(v(0, 2, "型"))),
            (":'型'", 0, Some(qv(0, 4, "型", '\''))),
            (":\"型\"", 0, Some(qv(0, 4, "型", '"'))),
            (" :型 ", 1, Some(v(1, 3, "型"))),
            (" :'型' ", 1, Some(qv(1, 5, "型", '\''))),
            (" :\"型\" ", 1, Some(qv(1, 5, "型", '"'))),
            (":型示師", 0, Some(v(0, 4, "型示師"))),
            (":'型示師'", 0, Some(qv(0, 6, "型示師", '\''))),
            (":\"型示師\"", 0, Some(qv(0, 6, "型示師", '"'))),
            (" :型示師 ", 1, Some(v(1, 5, "型示師"))),
            (" :'型示師' ", 1, Some(qv(1, 7, "型示師", '\''))),
            (" :\"型示師\" ", 1, Some(qv(1, 7, "型示師", '"'))),
        ];
        for (idx, (s, i, exp)) in tests.iter().enumerate() {
            let r = chars(s);
            let got = read_var(&r, *i, r.len());
            assert_eq!(&got, exp, "test {idx} ({s:?})");
            // the recorded span must cover the name (and quotes) exactly
            if let Some(var) = got {
                let mut span: String = r[var.i + 1..var.end].iter().collect();
                if let Some(q) = var.quote {
                    assert!(span.starts_with(q), "test {idx} span missing open quote");
                    assert!(span.ends_with(q), "test {idx} span missing close quote");
                    span = span[q.len_utf8()..span.len() - q.len_utf8()].to_string();
                }
                assert_eq!(span, var.name, "test {idx} span/name mismatch");
            }
        }
    }

    #[test]
    fn substitute_var_splices_in_place() {
        // (input, var, replacement, expected)
        let tests: &[(&str, Var, &str, &str)] = &[
            (":a", v(0, 2, "a"), "x", "x"),
            (" :a", v(1, 3, "a"), "x", " x"),
            (":a ", v(0, 2, "a"), "x", "x "),
            (" :a ", v(1, 3, "a"), "x", " x "),
            (" :'a' ", qv(1, 5, "a", '\''), "'x'", " 'x' "),
            (" :\"a\" ", qv(1, 5, "a", '"'), "\"x\"", " \"x\" "),
            (":a", v(0, 2, "a"), "", ""),
            (" :a", v(1, 3, "a"), "", " "),
            (":a ", v(0, 2, "a"), "", " "),
            (" :a ", v(1, 3, "a"), "", "  "),
            (" :'a' ", qv(1, 5, "a", '\''), "", "  "),
            (" :\"a\" ", qv(1, 5, "a", '"'), "", "  "),
            (" :aaa ", v(1, 5, "aaa"), "", "  "),
            (":foo", v(0, 4, "foo"), "这是一个", "这是一个"),
            (":foo ", v(0, 4, "foo"), "这是一个", "这是一个 "),
            (" :foo", v(1, 5, "foo"), "这是一个", " 这是一个"),
            (" :foo ", v(1, 5, "foo"), "这是一个", " 这是一个 "),
            (":'foo'", qv(0, 6, "foo", '\''), "'这是一个'", "'这是一个'"),
            (":'foo' ", qv(0, 6, "foo", '\''), "'这是一个'", "'这是一个' "),
            (" :'foo'", qv(1, 7, "foo", '\''), "'这是一个'", " '这是一个'"),
            (" :'foo' ", qv(1, 7, "foo", '\''), "'这是一个'", " '这是一个' "),
            (":\"foo\"", qv(0, 6, "foo", '"'), "\"这是一个\"", "\"这是一个\""),
            (":\"foo\" ", qv(0, 6, "foo", '"'), "\"这是一个\"", "\"这是一个\" "),
            (" :\"foo\"", qv(1, 7, "foo", '"'), "\"这是一个\"", " \"这是一个\""),
            (" :\"foo\" ", qv(1, 7, "foo", '"'), "\"这是一个\"", " \"这是一个\" "),
            (":型", v(0, 2, "型"), "x", "x"),
            (" :型", v(1, 3, "型"), "x", " x"),
            (":型 ", v(0, 2, "型"), "x", "x "),
            (" :型 ", v(1, 3, "型"), "x", " x "),
            (" :'型' ", qv(1, 5, "型", '\''), "'x'", " 'x' "),
            (" :\"型\" ", qv(1, 5, "型", '"'), "\"x\"", " \"x\" "),
            (":型", v(0, 2, "型"), "", ""),
            (" :型", v(1, 3, "型"), "", " "),
            (":型 ", v(0, 2, "型"), "", " "),
            (" :型 ", v(1, 3, "型"), "", "  "),
            (" :'型' ", qv(1, 5, "型", '\''), "", "  "),
            (" :\"型\" ", qv(1, 5, "型", '"'), "", "  "),
            (":型示師", v(0, 4, "型示師"), "本門台初埼本門台初埼", "本門台初埼本門台初埼"),
            (
                " :型示師",
                v(1, 5, "型示師"),
                "本門台初埼本門台初埼",
                " 本門台初埼本門台初埼",
            ),
            (
                ":型示師 ",
                v(0, 4, "型示師"),
                "本門台初埼本門台初埼",
                "本門台初埼本門台初埼 ",
            ),
            (
                " :型示師 ",
                v(1, 5, "型示師"),
                "本門台初埼本門台初埼",
                " 本門台初埼本門台初埼 ",
            ),
            (
                " :'型示師' ",
                qv(1, 7, "型示師", '\''),
                "'本門台初埼本門台初埼'",
                " '本門台初埼本門台初埼' ",
            ),
            (
                " :\"型示師\" ",
                qv(1, 7, "型示師", '"'),
                "\"本門台初埼本門台初埼\"",
                " \"本門台初埼本門台初埼\" ",
            ),
        ];
        for (idx, (s, var, sub, exp)) in tests.iter().enumerate() {
            let mut r = chars(s);
            let mut var = var.clone();
            substitute_var(&mut r, &mut var, sub);
            assert_eq!(var.len, sub.chars().count(), "test {idx} v.len mismatch");
            assert_eq!(r.len(), exp.chars().count(), "test {idx} length mismatch");
            assert_eq!(r.iter().collect::<String>(), *exp, "test {idx}");
        }
    }

    #[test]
    fn substitute_var_large_replacement() {
        let a512: String = std::iter::repeat_n('a', 512).collect();
        let mut r = chars(" :aaa ");
        let mut var = v(1, 5, "aaa");
        substitute_var(&mut r, &mut var, &a512);
        assert_eq!(var.len, 512);
        assert_eq!(r.iter().collect::<String>(), format!(" {a512} "));

        // a 512-character name collapsing to nothing
        let mut r = chars(&format!(" :{a512} "));
        let mut var = v(1, a512.chars().count() + 2, &a512);
        substitute_var(&mut r, &mut var, "");
        assert_eq!(var.len, 0);
        assert_eq!(r.iter().collect::<String>(), "  ");
    }

    #[test]
    fn display_restores_original_spelling() {
        assert_eq!(v(0, 2, "a").to_string(), ":a");
        assert_eq!(qv(0, 4, "a", '\'').to_string(), ":'a'");
        assert_eq!(qv(0, 5, "ab", '"').to_string(), ":\"ab\"");
        assert_eq!(Var::escape(0, ';').to_string(), "\\;");
        assert_eq!(v(0, 4, "型示師").to_string(), ":型示師");
    }
}
