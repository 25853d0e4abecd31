use crate::error::*;
use crate::primitive::{Primitive, PdfString, Name};
use super::{is_whitespace, scan_to_whitespace_or_any_of, DELIMITERS};

/// A lexer for PDF strings. Breaks the string up into single characters (`u8`)
/// It is also possible to get the number of bytes of the input slice that were traversed by the
/// Iterator.
///
/// ```
/// let mut string: Vec<u8> = Vec::new();
/// let bytes_traversed = {
///     let mut string_lexer = StringLexer::new(&buf[1..]);
///     for character in string_lexer.iter() {
///         let character = character?;
///         string.push(character);
///     }
///     string_lexer.get_offset()
/// };
/// // bytes_traversed now holds the number of input bytes consumed.
/// ```
///
#[derive(Clone)]
pub struct StringLexer<'a> {
    pos: usize, // points to next byte
    nested: i32, // How far in () we are nested
    buf: &'a [u8],
}

impl<'a> StringLexer<'a> {
    /// `buf` should start right after the `(` delimiter, and may span all the way to EOF. StringLexer
    /// will determine the end of the string.
    pub fn new(buf: &'a [u8]) -> StringLexer<'a> {
        StringLexer {
            pos: 0,
            nested: 0,
            buf,
        }
    }
    pub fn iter<'b>(&'b mut self) -> StringLexerIter<'a, 'b> {
        StringLexerIter {lexer: self}
    }
    /// Get offset/pos from start of string
    pub fn get_offset(&self) -> usize {
        self.pos
    }

    /// Next decoded byte, `None` at the closing parenthesis.
    /// Running out of input means the parentheses don't balance.
    pub fn next_lexeme(&mut self) -> Result<Option<u8>> {
        loop {
            let c = self.next_byte()?;
            let lexeme = match c {
                b'\\' => {
                    let c = self.next_byte()?;
                    match c {
                        b'n' => b'\n',
                        b'r' => b'\r',
                        b't' => b'\t',
                        b'b' => b'\x08',
                        b'f' => b'\x0c',
                        b'(' => b'(',
                        b')' => b')',
                        b'\\' => b'\\',
                        // line continuation
                        b'\n' => continue,
                        b'\r' => {
                            if self.peek_byte() == Some(b'\n') {
                                self.pos += 1;
                            }
                            continue;
                        }
                        b'0' ..= b'7' => {
                            let mut char_code: u16 = (c - b'0') as u16;

                            // up to two more octal digits
                            for _ in 0..2 {
                                match self.peek_byte() {
                                    Some(d @ b'0' ..= b'7') => {
                                        self.pos += 1;
                                        char_code = char_code * 8 + (d - b'0') as u16;
                                    }
                                    _ => break,
                                }
                            }
                            // overflow is ignored
                            char_code as u8
                        }
                        // unknown escape: drop the backslash
                        c => c,
                    }
                },

                b'\r' => {
                    if self.peek_byte() == Some(b'\n') {
                        self.pos += 1;
                    }
                    b'\n'
                }

                b'(' => {
                    self.nested += 1;
                    b'('
                },
                b')' => {
                    self.nested -= 1;
                    if self.nested < 0 {
                        return Ok(None);
                    }
                    b')'
                },

                c => c
            };
            return Ok(Some(lexeme));
        }
    }

    fn next_byte(&mut self) -> Result<u8> {
        if self.pos < self.buf.len() {
            self.pos += 1;
            Ok(self.buf[self.pos-1])
        } else {
            Err(PdfError::CorruptStringLiteral)
        }
    }
    fn peek_byte(&self) -> Option<u8> {
        self.buf.get(self.pos).copied()
    }
}

// "'a is valid for at least 'b"
pub struct StringLexerIter<'a: 'b, 'b> {
    lexer: &'b mut StringLexer<'a>,
}

impl<'a, 'b> Iterator for StringLexerIter<'a, 'b> {
    type Item = Result<u8>;
    fn next(&mut self) -> Option<Result<u8>> {
        match self.lexer.next_lexeme() {
            Err(e) => Some(Err(e)),
            Ok(Some(s)) => Some(Ok(s)),
            Ok(None) => None,
        }
    }
}

/// Decodes the interior of a hex string, i.e. the bytes between `<` and `>`.
pub struct HexStringLexer<'a> {
    pos: usize, // points to next byte
    buf: &'a [u8],
}

impl<'a> HexStringLexer<'a> {
    /// `buf` is the interior only; the closing `>` has already been located.
    pub fn new(buf: &'a [u8]) -> HexStringLexer<'a> {
        HexStringLexer { pos: 0, buf }
    }

    pub fn iter<'b>(&'b mut self) -> HexStringLexerIter<'a, 'b> {
        HexStringLexerIter { lexer: self }
    }

    /// Get offset/position from start of string
    pub fn get_offset(&self) -> usize {
        self.pos
    }

    fn next_non_whitespace_char(&mut self) -> Option<u8> {
        while let Some(&b) = self.buf.get(self.pos) {
            self.pos += 1;
            if !is_whitespace(b) {
                return Some(b);
            }
        }
        None
    }

    fn nibble(&self, c: u8) -> Result<u8> {
        match c {
            b'0' ..= b'9' => Ok(c - b'0'),
            b'A' ..= b'F' => Ok(c - b'A' + 0xA),
            b'a' ..= b'f' => Ok(c - b'a' + 0xA),
            _ => Err(PdfError::CorruptHexLiteral {
                pos: self.pos - 1,
                byte: c,
            }),
        }
    }

    pub fn next_hex_byte(&mut self) -> Result<Option<u8>> {
        let high_nibble = match self.next_non_whitespace_char() {
            Some(c1) => self.nibble(c1)?,
            None => return Ok(None),
        };
        // odd number of digits: the last one is padded with 0
        let low_nibble = match self.next_non_whitespace_char() {
            Some(c2) => self.nibble(c2)?,
            None => 0,
        };
        Ok(Some((high_nibble << 4) | low_nibble))
    }
}

pub struct HexStringLexerIter<'a: 'b, 'b> {
    lexer: &'b mut HexStringLexer<'a>,
}

impl<'a, 'b> Iterator for HexStringLexerIter<'a, 'b> {
    type Item = Result<u8>;

    fn next(&mut self) -> Option<Result<u8>> {
        match self.lexer.next_hex_byte() {
            Err(e) => Some(Err(e)),
            Ok(Some(s)) => Some(Ok(s)),
            Ok(None) => None,
        }
    }
}

/// Parses `( ... )` at the start of `buf`. Returns the string and the input after `)`.
pub fn parse_string_literal(buf: &[u8]) -> Result<(Primitive, &[u8])> {
    if buf.is_empty() {
        err!(PdfError::NoBuffer);
    }
    if buf.len() < 2 || buf[0] != b'(' {
        err!(PdfError::CorruptStringLiteral);
    }

    let mut string: Vec<u8> = Vec::new();
    let bytes_traversed = {
        let mut string_lexer = StringLexer::new(&buf[1..]);
        for character in string_lexer.iter() {
            string.push(character?);
        }
        string_lexer.get_offset()
    };

    Ok((Primitive::String(PdfString::new(string.into())), &buf[1 + bytes_traversed..]))
}

/// Parses `< ... >` at the start of `buf`. Returns the decoded bytes and the input after `>`.
pub fn parse_hex_literal(buf: &[u8]) -> Result<(Primitive, &[u8])> {
    if buf.is_empty() {
        err!(PdfError::NoBuffer);
    }
    if buf[0] != b'<' {
        err!(PdfError::CorruptHexLiteral { pos: 0, byte: buf[0] });
    }
    let end = match buf.iter().position(|&b| b == b'>') {
        Some(end) => end,
        None => err!(PdfError::UnterminatedHexLiteral),
    };

    let mut lexer = HexStringLexer::new(&buf[1..end]);
    let string = lexer.iter().collect::<Result<Vec<u8>>>()
        .map_err(|e| match e {
            // report positions relative to the `<`
            PdfError::CorruptHexLiteral { pos, byte } => PdfError::CorruptHexLiteral { pos: pos + 1, byte },
            e => e,
        })?;

    Ok((Primitive::HexString(PdfString::new(string.into())), &buf[end + 1..]))
}

/// Parses `/Name` at the start of `buf`. The terminating white-space or delimiter is left in
/// the returned input. `#xx` sequences are kept as they are; a body that isn't UTF-8 is
/// `CorruptNameObject`.
pub fn parse_name(buf: &[u8]) -> Result<(Name, &[u8])> {
    if buf.is_empty() {
        err!(PdfError::NoBuffer);
    }
    if buf.len() < 2 || buf[0] != b'/' {
        err!(PdfError::CorruptNameObject);
    }
    let body = &buf[1..];
    let (end, _) = scan_to_whitespace_or_any_of(body, DELIMITERS);
    let name = std::str::from_utf8(&body[..end]).map_err(|_| PdfError::CorruptNameObject)?;

    Ok((Name::from(name), &body[end..]))
}
