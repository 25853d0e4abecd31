use crate::object::*;
use crate::primitive::*;
use crate::error::*;
use crate::parser::{parse_object, trim_leading_whitespace, scan_to_whitespace_or_any_of};

use std::fmt;

/// Cross-reference stream, as decoded from its stream dictionary.
#[derive(Clone, PartialEq)]
pub struct XRefStream {
    /// `/Size`: one greater than the highest object number covered.
    pub size: usize,
    /// Object numbers covered by the entries, in stream order.
    /// Expanded from `/Index`, or `0 .. size` without one.
    pub objects: Vec<ObjNr>,
    /// `/W`: byte widths of the three fields of every entry.
    pub w: [usize; 3],
    /// `/Prev`: byte offset of the previous cross-reference section.
    pub prev: Option<u64>,

    pub stream: PdfStream,
}
impl XRefStream {
    /// Size in bytes of one entry.
    pub fn entry_len(&self) -> usize {
        self.w.iter().sum()
    }
}
impl fmt::Debug for XRefStream {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("XRefStream")
            .field("size", &self.size)
            .field("objects", &self.objects.len())
            .field("w", &self.w)
            .field("prev", &self.prev)
            .finish()
    }
}

/// Object stream: `n` objects stored back to back behind a header of
/// `<objnr> <offset>` pairs.
#[derive(Clone, PartialEq)]
pub struct ObjectStream {
    /// `/N`: number of compressed objects in the stream.
    pub n: usize,
    /// `/First`: byte offset in the decoded stream of the first compressed object.
    pub first: usize,
    /// Filled by `parse_objects`.
    pub objects: Vec<(ObjNr, Primitive)>,

    pub stream: PdfStream,
}

impl ObjectStream {
    /// Reads the `n` header pairs from the decoded stream data.
    pub fn offsets(&self, data: &[u8]) -> Result<Vec<(ObjNr, usize)>> {
        let header = data.get(..self.first).ok_or(PdfError::ObjStmOutOfBounds {
            index: self.first,
            max: data.len(),
        })?;
        let mut rest = header;
        let mut offsets = Vec::with_capacity(self.n.min(header.len() / 4));
        for _ in 0..self.n {
            let obj_nr = next_number(&mut rest)?;
            let offset = next_number(&mut rest)?;
            offsets.push((obj_nr, offset as usize));
        }
        Ok(offsets)
    }

    /// Slice of the decoded stream data holding the object at `index`.
    pub fn get_object_slice<'a>(&self, data: &'a [u8], index: usize) -> Result<&'a [u8]> {
        let offsets = self.offsets(data)?;
        self.slice_at(data, &offsets, index)
    }

    fn slice_at<'a>(&self, data: &'a [u8], offsets: &[(ObjNr, usize)], index: usize) -> Result<&'a [u8]> {
        if index >= offsets.len() {
            err!(PdfError::ObjStmOutOfBounds { index, max: offsets.len() });
        }
        let start = self.first.saturating_add(offsets[index].1);
        let end = match offsets.get(index + 1) {
            Some(&(_, next)) => self.first.saturating_add(next),
            None => data.len(),
        };
        if start > end || end > data.len() {
            err!(PdfError::ObjStmOutOfBounds { index: start, max: data.len() });
        }
        Ok(&data[start..end])
    }

    /// Parses every contained object out of the decoded stream data.
    pub fn parse_objects(&mut self, data: &[u8]) -> Result<()> {
        let offsets = self.offsets(data)?;
        let mut objects = Vec::with_capacity(offsets.len());
        for (index, &(obj_nr, _)) in offsets.iter().enumerate() {
            let slice = self.slice_at(data, &offsets, index)?;
            let (obj, _) = parse_object(slice)?;
            objects.push((obj_nr, obj));
        }
        debug!("object stream: parsed {} objects", objects.len());
        self.objects = objects;
        Ok(())
    }

    /// Returns the number of contained objects
    pub fn n_objects(&self) -> usize {
        self.n
    }
}
impl fmt::Debug for ObjectStream {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ObjectStream")
            .field("n", &self.n)
            .field("first", &self.first)
            .field("objects", &self.objects)
            .finish()
    }
}

fn next_number(buf: &mut &[u8]) -> Result<u64> {
    let (rest, _) = trim_leading_whitespace(buf);
    let (end, _) = scan_to_whitespace_or_any_of(rest, b"");
    if end == 0 {
        err!(PdfError::CorruptObjectStreamHeader);
    }
    let n = std::str::from_utf8(&rest[..end]).ok()
        .and_then(|s| s.parse::<u64>().ok())
        .ok_or(PdfError::CorruptObjectStreamHeader)?;
    *buf = &rest[end..];
    Ok(n)
}
