// Indirect object headers: `<objnr> <gennr> obj`.

use crate::error::*;
use crate::object::*;
use crate::parser::lexer::*;
use crate::parser::parse_object;
use crate::primitive::Primitive;

use std::str::FromStr;

fn parse_attribute<T: FromStr>(header: &mut &[u8], what: &'static str) -> Result<T> {
    let l = skip_whitespace_and_comments(header);
    let (end, _) = scan_to_whitespace_or_any_of(l, b"%");
    if end == 0 {
        err!(PdfError::CorruptObjectAttributes { what });
    }
    let token = &l[..end];
    let n = std::str::from_utf8(token).ok()
        .and_then(|s| s.parse::<T>().ok())
        .ok_or_else(|| PdfError::MalformedNumber { token: String::from_utf8_lossy(token).into() })?;
    *header = &l[end..];
    Ok(n)
}

/// Reads `<objnr> <gennr> obj`. Returns both numbers and the input after `obj`.
pub fn parse_object_attributes(buf: &[u8]) -> Result<(ObjNr, GenNr, &[u8])> {
    if buf.is_empty() {
        err!(PdfError::NoBuffer);
    }
    let pos = match find(buf, b"obj") {
        Some(pos) => pos,
        None => err!(PdfError::MissingObjKeyword),
    };

    let mut header = &buf[..pos];
    let obj_nr = parse_attribute::<ObjNr>(&mut header, "object number")?;
    let gen_nr = parse_attribute::<GenNr>(&mut header, "generation number")?;

    Ok((obj_nr, gen_nr, &buf[pos + 3..]))
}

/// Parses `<objnr> <gennr> obj <object> [endobj]`.
///
/// The `endobj` keyword is consumed if it follows the object.
pub fn parse_indirect_object(buf: &[u8]) -> Result<(PlainRef, Primitive, &[u8])> {
    let (id, gen, rest) = parse_object_attributes(buf)?;
    let (obj, rest) = parse_object(skip_whitespace_and_comments(rest))?;

    let after = skip_whitespace_and_comments(rest);
    let rest = match after.strip_prefix(b"endobj") {
        Some(rest) => rest,
        None => rest,
    };
    trace!("indirect object {} {}: {}", id, gen, obj);

    Ok((PlainRef { id, gen }, obj, rest))
}
