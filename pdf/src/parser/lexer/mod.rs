//! Lexical primitives over an object body. Every function takes the remaining input and
//! never looks behind it.

mod str;
pub use self::str::{StringLexer, HexStringLexer, parse_string_literal, parse_hex_literal, parse_name};

/// Bytes that end a name or number token.
pub const DELIMITERS: &[u8] = b"<>[]()/";

// find the position where condition(data[pos-1]) == true and condition(data[pos]) == false
#[inline]
fn boundary(data: &[u8], pos: usize, condition: impl Fn(u8) -> bool) -> usize {
    match data[pos ..].iter().position(|&b| !condition(b)) {
        Some(start) => pos + start,
        None => data.len()
    }
}

/// PDF white-space characters (NUL, HT, LF, FF, CR, SP).
#[inline]
pub fn is_whitespace(b: u8) -> bool {
    matches!(b, 0 | b'\t' | b'\n' | b'\x0c' | b'\r' | b' ')
}

#[inline]
pub fn is_delimiter(b: u8) -> bool {
    DELIMITERS.contains(&b)
}

/// Strips leading white-space. Returns the rest and how many bytes were stripped.
#[inline]
pub fn trim_leading_whitespace(buf: &[u8]) -> (&[u8], usize) {
    let n = boundary(buf, 0, is_whitespace);
    (&buf[n..], n)
}

/// Position of the first white-space byte or member of `charset`.
/// Returns `(buf.len(), false)` if there is none; the end of the buffer ends a token just as well.
#[inline]
pub fn scan_to_whitespace_or_any_of(buf: &[u8], charset: &[u8]) -> (usize, bool) {
    let n = boundary(buf, 0, |b| !is_whitespace(b) && !charset.contains(&b));
    (n, n < buf.len())
}

/// Offset of the first occurrence of `needle`.
pub fn find(buf: &[u8], needle: &[u8]) -> Option<usize> {
    buf.windows(needle.len()).position(|w| w == needle)
}

/// Skips white-space and `%` comments (up to the end of the line).
pub fn skip_whitespace_and_comments(mut buf: &[u8]) -> &[u8] {
    loop {
        buf = trim_leading_whitespace(buf).0;
        if buf.first() != Some(&b'%') {
            return buf;
        }
        buf = match buf.iter().position(|&b| b == b'\n' || b == b'\r') {
            Some(eol) => &buf[eol..],
            None => &[],
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary() {
        let not_ws = |b| !is_whitespace(b);
        assert_eq!(boundary(&*b" hello ", 3, not_ws), 6);
        assert_eq!(boundary(&*b" hello ", 3, is_whitespace), 3);
        assert_eq!(boundary(&*b"01234  7orld", 5, is_whitespace), 7);
        assert_eq!(boundary(&*b"01234  7orld", 7, is_whitespace), 7);
        assert_eq!(boundary(&*b"q\n", 1, is_whitespace), 2);
    }

    #[test]
    fn delimiters() {
        for &b in b"<>[]()/" {
            assert!(is_delimiter(b));
        }
        for &b in b"{}%R0 \n" {
            assert!(!is_delimiter(b));
        }
    }

    #[test]
    fn trim() {
        assert_eq!(trim_leading_whitespace(b" \r\n\t\x0c\0abc "), (&b"abc "[..], 6));
        assert_eq!(trim_leading_whitespace(b"abc"), (&b"abc"[..], 0));
        assert_eq!(trim_leading_whitespace(b"   "), (&b""[..], 3));
        assert_eq!(trim_leading_whitespace(b""), (&b""[..], 0));
    }

    #[test]
    fn scan() {
        assert_eq!(scan_to_whitespace_or_any_of(b"123 0 R", DELIMITERS), (3, true));
        assert_eq!(scan_to_whitespace_or_any_of(b"123/Name", DELIMITERS), (3, true));
        assert_eq!(scan_to_whitespace_or_any_of(b"123", DELIMITERS), (3, false));
        assert_eq!(scan_to_whitespace_or_any_of(b"", DELIMITERS), (0, false));
        assert_eq!(scan_to_whitespace_or_any_of(b"12%c", b"%"), (2, true));
        assert_eq!(scan_to_whitespace_or_any_of(b"[1]", DELIMITERS), (0, true));
    }

    #[test]
    fn comments() {
        assert_eq!(skip_whitespace_and_comments(b" % hi\r\n  % there\n 12"), b"12");
        assert_eq!(skip_whitespace_and_comments(b"%only"), b"");
        assert_eq!(find(b"12 0 obj <<", b"obj"), Some(5));
        assert_eq!(find(b"12 0", b"obj"), None);
    }
}
