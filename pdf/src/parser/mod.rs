//! Basic functionality for parsing PDF objects.
//!
//! Every parser takes the remaining input and returns what it parsed together with the input
//! left after it, so callers chain parses by feeding the remainder back in.

mod lexer;
mod parse_object;
mod parse_xref;

pub use self::lexer::*;
pub use self::parse_object::*;
pub use self::parse_xref::*;

use crate::error::*;
use crate::primitive::{Primitive, Dictionary};
use crate::object::{ObjNr, GenNr, PlainRef};

/// Caller policy for a parse.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum nesting of arrays and dictionaries. `None` means unbounded.
    pub max_depth: Option<usize>,
    /// Truncate cross-reference streams that hold less data than `/Index` announces
    /// instead of failing.
    pub allow_xref_error: bool,
}
impl ParseOptions {
    pub const fn strict() -> Self {
        ParseOptions {
            max_depth: None,
            allow_xref_error: false,
        }
    }
    pub const fn tolerant() -> Self {
        ParseOptions {
            max_depth: Some(256),
            allow_xref_error: true,
        }
    }
}
impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions::strict()
    }
}

/// Parses the next object from `buf`. Returns the object and the remaining input.
pub fn parse_object(buf: &[u8]) -> Result<(Primitive, &[u8])> {
    parse_object_with(buf, &ParseOptions::strict())
}

/// Like `parse_object`, honoring `options.max_depth`.
pub fn parse_object_with<'a>(buf: &'a [u8], options: &ParseOptions) -> Result<(Primitive, &'a [u8])> {
    parse_object_at(buf, options, 0)
}

fn parse_object_at<'a>(buf: &'a [u8], options: &ParseOptions, depth: usize) -> Result<(Primitive, &'a [u8])> {
    let (l, _) = trim_leading_whitespace(buf);
    if l.is_empty() {
        err!(PdfError::NoBuffer);
    }

    let (obj, rest) = match l[0] {
        b'[' => {
            check_depth(options, depth)?;
            parse_array(l, options, depth)?
        }
        b'/' => {
            let (name, rest) = parse_name(l)?;
            (Primitive::Name(name), rest)
        }
        b'<' if l.get(1) == Some(&b'<') => {
            check_depth(options, depth)?;
            parse_dict(l, options, depth)?
        }
        b'<' => parse_hex_literal(l)?,
        b'(' => parse_string_literal(l)?,
        _ if l.starts_with(b"null") => (Primitive::Null, &l[4..]),
        _ if l.starts_with(b"true") => (Primitive::Boolean(true), &l[4..]),
        _ if l.starts_with(b"false") => (Primitive::Boolean(false), &l[5..]),
        _ => parse_numeric_or_ref(l)?,
    };
    trace!("parse_object: {}", obj);

    Ok((obj, rest))
}

fn check_depth(options: &ParseOptions, depth: usize) -> Result<()> {
    match options.max_depth {
        Some(max) if depth >= max => Err(PdfError::RecursionLimit { depth: max }),
        _ => Ok(())
    }
}

/// Parses `[ ... ]` at the start of `buf`.
pub fn parse_array<'a>(buf: &'a [u8], options: &ParseOptions, depth: usize) -> Result<(Primitive, &'a [u8])> {
    if buf.is_empty() {
        err!(PdfError::NoBuffer);
    }
    if buf[0] != b'[' {
        err!(PdfError::CorruptArray);
    }

    let (mut l, skipped) = trim_leading_whitespace(&buf[1..]);
    // nothing but white-space after '[', closed or not
    if l.is_empty() || (skipped > 0 && l[0] == b']') {
        err!(PdfError::UnterminatedArray);
    }

    let mut array = Vec::new();
    while l[0] != b']' {
        let (obj, rest) = parse_object_at(l, options, depth + 1)?;
        array.push(obj);

        let (rest, _) = trim_leading_whitespace(rest);
        if rest.is_empty() {
            err!(PdfError::UnterminatedArray);
        }
        l = rest;
    }
    debug!("parse_array: {} elements", array.len());

    Ok((Primitive::Array(array), &l[1..]))
}

/// Parses `<< ... >>` at the start of `buf`. A key that occurs twice is an error.
pub fn parse_dict<'a>(buf: &'a [u8], options: &ParseOptions, depth: usize) -> Result<(Primitive, &'a [u8])> {
    if buf.is_empty() {
        err!(PdfError::NoBuffer);
    }
    if !buf.starts_with(b"<<") {
        err!(PdfError::CorruptDictionary);
    }

    let (mut l, _) = trim_leading_whitespace(&buf[2..]);
    if l.is_empty() {
        err!(PdfError::UnterminatedDictionary);
    }

    let mut dict = Dictionary::new();
    while !l.starts_with(b">>") {
        let (key, rest) = parse_name(l)?;

        let (rest, _) = trim_leading_whitespace(rest);
        if rest.is_empty() {
            err!(PdfError::UnterminatedDictionary);
        }

        let (obj, rest) = parse_object_at(rest, options, depth + 1)?;
        dict.try_insert(key, obj)?;

        let (rest, _) = trim_leading_whitespace(rest);
        if rest.is_empty() {
            err!(PdfError::UnterminatedDictionary);
        }
        l = rest;
    }
    debug!("parse_dict: {} entries", dict.len());

    Ok((Primitive::Dictionary(dict), &l[2..]))
}

fn parse_int(token: &[u8]) -> Option<i64> {
    std::str::from_utf8(token).ok()?.parse::<i64>().ok()
}

/// `[+-]digits[.digits]` or `[+-].digits`, with at least one digit, optionally followed by an
/// exponent `e[+-]digits`.
fn is_real_number(token: &[u8]) -> bool {
    let digits = match token.first() {
        Some(b'+') | Some(b'-') => &token[1..],
        _ => token,
    };
    let (mantissa, exponent) = match digits.iter().position(|&b| b == b'e' || b == b'E') {
        Some(i) => (&digits[..i], Some(&digits[i + 1..])),
        None => (digits, None),
    };

    let mut seen_digit = false;
    let mut seen_dot = false;
    for &b in mantissa {
        match b {
            b'0' ..= b'9' => seen_digit = true,
            b'.' if !seen_dot => seen_dot = true,
            _ => return false,
        }
    }
    match exponent {
        None => seen_digit,
        Some(exp) => {
            let exp = match exp.first() {
                Some(b'+') | Some(b'-') => &exp[1..],
                _ => exp,
            };
            seen_digit && !exp.is_empty() && exp.iter().all(u8::is_ascii_digit)
        }
    }
}

fn parse_real(token: &[u8]) -> Result<f64> {
    let malformed = || PdfError::MalformedNumber { token: String::from_utf8_lossy(token).into() };
    if !is_real_number(token) {
        return Err(malformed());
    }
    // "5." and ".5" both parse; out of range exponents give infinity
    std::str::from_utf8(token).ok()
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|f| f.is_finite())
        .ok_or_else(malformed)
}

/// A number, or the indirect reference `<int> <int> R`.
///
/// The first token is committed as an integer unless two more tokens follow that complete a
/// reference. If they don't, only the first token is consumed.
pub fn parse_numeric_or_ref(buf: &[u8]) -> Result<(Primitive, &[u8])> {
    if buf.is_empty() {
        err!(PdfError::NoBuffer);
    }

    let (i1, _) = scan_to_whitespace_or_any_of(buf, DELIMITERS);
    let token = &buf[..i1];
    let after_first = &buf[i1..];

    let first = match parse_int(token) {
        Some(i) => i,
        None => {
            let f = parse_real(token)?;
            return Ok((Primitive::Number(f), after_first));
        }
    };
    let integer = Ok((Primitive::Integer(first), after_first));

    // not followed by white-space: can't be a reference
    match after_first.first() {
        Some(&b) if !is_delimiter(b) => {}
        _ => return integer,
    }

    let (l, _) = trim_leading_whitespace(after_first);
    if l.is_empty() {
        return integer;
    }

    let (i2, _) = scan_to_whitespace_or_any_of(l, DELIMITERS);
    match l.get(i2) {
        Some(&b) if i2 > 0 && !is_delimiter(b) => {}
        _ => {
            debug!("parse_numeric_or_ref: {} is not followed by a generation number", first);
            return integer;
        }
    }
    let second = match parse_int(&l[..i2]) {
        Some(i) => i,
        None => return integer,
    };

    let (l, _) = trim_leading_whitespace(&l[i2..]);
    if l.first() != Some(&b'R') {
        debug!("parse_numeric_or_ref: {} {} is not followed by R", first, second);
        return integer;
    }

    match (ObjNr::try_from(first), GenNr::try_from(second)) {
        (Ok(id), Ok(gen)) => Ok((Primitive::Reference(PlainRef { id, gen }), &l[1..])),
        _ => {
            debug!("parse_numeric_or_ref: {} {} R is out of range", first, second);
            integer
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::{PdfString, Name};

    fn parse(data: &[u8]) -> (Primitive, &[u8]) {
        parse_object(data).unwrap()
    }

    #[test]
    fn integers_and_references() {
        assert_eq!(parse(b"123"), (Primitive::Integer(123), &b""[..]));
        assert_eq!(parse(b"123 0 R"), (Primitive::Reference(PlainRef::new(123, 0)), &b""[..]));
        assert_eq!(parse(b"123 0 foo"), (Primitive::Integer(123), &b" 0 foo"[..]));
        assert_eq!(parse(b"  -17]"), (Primitive::Integer(-17), &b"]"[..]));
        assert_eq!(parse(b"+5 "), (Primitive::Integer(5), &b" "[..]));
        assert_eq!(parse(b"1 2"), (Primitive::Integer(1), &b" 2"[..]));
        assert_eq!(parse(b"1 2 "), (Primitive::Integer(1), &b" 2 "[..]));
        assert_eq!(parse(b"1 2/R"), (Primitive::Integer(1), &b" 2/R"[..]));
        assert_eq!(parse(b"1 /R"), (Primitive::Integer(1), &b" /R"[..]));
        assert_eq!(parse(b"1 2.5 R"), (Primitive::Integer(1), &b" 2.5 R"[..]));
        assert_eq!(parse(b"4 0 R/Next"), (Primitive::Reference(PlainRef::new(4, 0)), &b"/Next"[..]));
        assert_eq!(parse(b"4\n0\r\nR "), (Primitive::Reference(PlainRef::new(4, 0)), &b" "[..]));
    }

    #[test]
    fn out_of_range_reference_is_integer() {
        assert_eq!(parse(b"-1 0 R"), (Primitive::Integer(-1), &b" 0 R"[..]));
        assert_eq!(parse(b"1 70000 R"), (Primitive::Integer(1), &b" 70000 R"[..]));
    }

    #[test]
    fn reals() {
        assert_eq!(parse(b"3.25 0 R"), (Primitive::Number(3.25), &b" 0 R"[..]));
        assert_eq!(parse(b"-.5]"), (Primitive::Number(-0.5), &b"]"[..]));
        assert_eq!(parse(b"4."), (Primitive::Number(4.0), &b""[..]));
        assert_eq!(parse(b"99999999999999999999"), (Primitive::Number(1e20), &b""[..]));
        assert_eq!(parse(b"1e5 0 R"), (Primitive::Number(100000.0), &b" 0 R"[..]));
        assert_eq!(parse(b"1E-3]"), (Primitive::Number(0.001), &b"]"[..]));
        assert_eq!(parse(b"-2.5e+2"), (Primitive::Number(-250.0), &b""[..]));
        assert_eq!(parse(b".5E1"), (Primitive::Number(5.0), &b""[..]));
    }

    #[test]
    fn malformed_numbers() {
        for data in [&b"abc"[..], b"1.2.3", b"-", b".", b"e5", b"1e", b"1e+", b"1e5.0", b"1e400", b"inf", b"NaN", b"R", b")", b"{"] {
            match parse_object(data) {
                Err(PdfError::MalformedNumber { .. }) => {}
                other => panic!("{:?}: {:?}", String::from_utf8_lossy(data), other),
            }
        }
    }

    #[test]
    fn keywords() {
        assert_eq!(parse(b"null"), (Primitive::Null, &b""[..]));
        assert_eq!(parse(b" true]"), (Primitive::Boolean(true), &b"]"[..]));
        assert_eq!(parse(b"false 1"), (Primitive::Boolean(false), &b" 1"[..]));
    }

    #[test]
    fn no_buffer() {
        assert!(matches!(parse_object(b""), Err(PdfError::NoBuffer)));
        assert!(matches!(parse_object(b" \r\n\t"), Err(PdfError::NoBuffer)));
        assert!(matches!(parse_numeric_or_ref(b""), Err(PdfError::NoBuffer)));
    }

    #[test]
    fn strings() {
        assert_eq!(parse(b"(a\\051b)"), (Primitive::String(PdfString::from("a)b")), &b""[..]));
        assert_eq!(parse(b"<4142>"), (Primitive::HexString(PdfString::from("AB")), &b""[..]));
        assert_eq!(parse(b"/Name 1"), (Primitive::Name(Name::from("Name")), &b" 1"[..]));
        assert!(matches!(parse_object(b"/A\xffB"), Err(PdfError::CorruptNameObject)));
    }

    #[test]
    fn arrays() {
        let (arr, rest) = parse(b"[1 2 0 R /N (s) <41> [true] <</K null>> 3.5]x");
        assert_eq!(rest, b"x");
        let arr = arr.into_array().unwrap();
        assert_eq!(arr.len(), 8);
        assert_eq!(arr[0], Primitive::Integer(1));
        assert_eq!(arr[1], Primitive::Reference(PlainRef::new(2, 0)));
        assert_eq!(arr[2], Primitive::name("N"));
        assert_eq!(arr[3], Primitive::String(PdfString::from("s")));
        assert_eq!(arr[4], Primitive::HexString(PdfString::from("A")));
        assert_eq!(arr[5], Primitive::Array(vec![Primitive::Boolean(true)]));
        assert_eq!(arr[6].as_dictionary().unwrap().get("K"), Some(&Primitive::Null));
        assert_eq!(arr[7], Primitive::Number(3.5));

        assert_eq!(parse(b"[]"), (Primitive::Array(vec![]), &b""[..]));
        assert_eq!(parse(b"[1 2 3 ]"), (Primitive::Array(vec![1i64.into(), 2i64.into(), 3i64.into()]), &b""[..]));
    }

    #[test]
    fn array_errors() {
        let strict = ParseOptions::strict();
        assert!(matches!(parse_object(b"["), Err(PdfError::UnterminatedArray)));
        assert!(matches!(parse_object(b"[   "), Err(PdfError::UnterminatedArray)));
        assert!(matches!(parse_object(b"[ ]"), Err(PdfError::UnterminatedArray)));
        assert!(matches!(parse_object(b"[1 2"), Err(PdfError::UnterminatedArray)));
        assert!(matches!(parse_object(b"[1 2 "), Err(PdfError::UnterminatedArray)));
        assert!(matches!(parse_object(b"[(abc]"), Err(PdfError::CorruptStringLiteral)));
        assert!(matches!(parse_array(b"1]", &strict, 0), Err(PdfError::CorruptArray)));
        assert!(matches!(parse_array(b"", &strict, 0), Err(PdfError::NoBuffer)));
    }

    #[test]
    fn dictionaries() {
        let (dict, rest) = parse(b"<</Type/XRef/Size 10 /W[1 2 1]/Root 1 0 R/Info<</A(x)>>>>trailer");
        assert_eq!(rest, b"trailer");
        let dict = dict.into_dictionary().unwrap();
        let keys: Vec<&str> = dict.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, ["Type", "Size", "W", "Root", "Info"]);
        assert_eq!(dict["Type"], Primitive::name("XRef"));
        assert_eq!(dict["Size"], Primitive::Integer(10));
        assert_eq!(dict["Root"], Primitive::Reference(PlainRef::new(1, 0)));
        assert_eq!(dict["Info"].as_dictionary().unwrap()["A"], Primitive::String(PdfString::from("x")));

        let (dict, rest) = parse(b"<<\n>>");
        assert_eq!(dict, Primitive::Dictionary(Dictionary::new()));
        assert!(rest.is_empty());
        assert_eq!(parse(b"<<>>").0, Primitive::Dictionary(Dictionary::new()));
    }

    #[test]
    fn dictionary_errors() {
        let strict = ParseOptions::strict();
        assert!(matches!(parse_object(b"<</A 1 /A 2>>"), Err(PdfError::DuplicateKey { ref key }) if key == "A"));
        assert!(matches!(parse_object(b"<</A 1 /B <</A 1 /A (x)>> >>"), Err(PdfError::DuplicateKey { .. })));
        assert!(matches!(parse_object(b"<<"), Err(PdfError::UnterminatedDictionary)));
        assert!(matches!(parse_object(b"<<  "), Err(PdfError::UnterminatedDictionary)));
        assert!(matches!(parse_object(b"<</A   "), Err(PdfError::UnterminatedDictionary)));
        assert!(matches!(parse_object(b"<</A 1"), Err(PdfError::UnterminatedDictionary)));
        assert!(matches!(parse_object(b"<</A 1 "), Err(PdfError::UnterminatedDictionary)));
        assert!(matches!(parse_object(b"<<A 1>>"), Err(PdfError::CorruptNameObject)));
        assert!(matches!(parse_dict(b"<A 1>>", &strict, 0), Err(PdfError::CorruptDictionary)));
    }

    #[test]
    fn same_key_in_nested_dictionaries() {
        let (dict, _) = parse(b"<</A 1 /B <</A 2>>>>");
        let dict = dict.into_dictionary().unwrap();
        assert_eq!(dict["A"], Primitive::Integer(1));
        assert_eq!(dict["B"].as_dictionary().unwrap()["A"], Primitive::Integer(2));
    }

    #[test]
    fn depth_limit() {
        let options = ParseOptions { max_depth: Some(2), ..ParseOptions::strict() };
        assert!(parse_object_with(b"[[1]]", &options).is_ok());
        assert!(matches!(parse_object_with(b"[[[1]]]", &options), Err(PdfError::RecursionLimit { depth: 2 })));
        assert!(matches!(parse_object_with(b"<</A [<<>>]>>", &options), Err(PdfError::RecursionLimit { .. })));

        let deep = format!("{}{}", "[".repeat(300), "]".repeat(300));
        assert!(matches!(parse_object_with(deep.as_bytes(), &ParseOptions::tolerant()), Err(PdfError::RecursionLimit { depth: 256 })));
    }

    #[test]
    fn chained_parses() {
        let mut buf = &b"1 0 R 2 /X [3] (y)"[..];
        let mut objs = vec![];
        while !trim_leading_whitespace(buf).0.is_empty() {
            let (obj, rest) = parse_object(buf).unwrap();
            objs.push(obj);
            buf = rest;
        }
        assert_eq!(objs, vec![
            Primitive::Reference(PlainRef::new(1, 0)),
            Primitive::Integer(2),
            Primitive::name("X"),
            Primitive::Array(vec![Primitive::Integer(3)]),
            Primitive::String(PdfString::from("y")),
        ]);
    }
}
