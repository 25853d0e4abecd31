use crate::error::*;
use crate::object::*;
use crate::parser::ParseOptions;
use crate::primitive::{PdfStream, Primitive};
use crate::xref::XRef;

/// Builds the cross-reference stream descriptor from its stream dictionary.
pub fn parse_xref_stream_dict(stream: PdfStream) -> Result<XRefStream> {
    let size = stream.size().ok_or(PdfError::MissingSizeEntry)?;

    let objects = match stream.index() {
        Some(index) => expand_index(index, size)?,
        None => {
            let mut objects = Vec::new();
            objects.try_reserve_exact(size).map_err(|_| PdfError::XRefStreamTooLarge { size })?;
            objects.extend(0 .. size as ObjNr);
            objects
        }
    };

    let w = stream.w().ok_or(PdfError::MissingFieldWidths)?;
    let w = match w {
        [a, b, c] => [field_width(a)?, field_width(b)?, field_width(c)?],
        _ => err!(PdfError::CorruptFieldWidths),
    };

    let prev = stream.prev();
    debug!("xref stream: size {}, {} objects, w {:?}, prev {:?}", size, objects.len(), w, prev);

    Ok(XRefStream {
        size,
        objects,
        w,
        prev,
        stream,
    })
}

fn field_width(p: &Primitive) -> Result<usize> {
    p.as_usize().map_err(|_| PdfError::CorruptFieldWidths)
}

// [start count start count ...] -> start .. start+count for each pair, all below `size`
fn expand_index(index: &[Primitive], size: usize) -> Result<Vec<ObjNr>> {
    if index.len() % 2 != 0 {
        err!(PdfError::CorruptIndexEntry);
    }
    let mut objects = Vec::new();
    for pair in index.chunks_exact(2) {
        let start = index_entry(&pair[0])?;
        let count = index_entry(&pair[1])?;
        let end = start.checked_add(count).ok_or(PdfError::CorruptIndexEntry)?;
        if end > size as ObjNr {
            err!(PdfError::CorruptIndexEntry);
        }
        let total = objects.len().saturating_add(count as usize);
        objects.try_reserve(count as usize).map_err(|_| PdfError::XRefStreamTooLarge { size: total })?;
        objects.extend(start .. end);
    }
    Ok(objects)
}

fn index_entry(p: &Primitive) -> Result<ObjNr> {
    match *p {
        Primitive::Integer(n) => ObjNr::try_from(n).map_err(|_| PdfError::CorruptIndexEntry),
        _ => Err(PdfError::CorruptIndexEntry),
    }
}

/// Builds the object stream descriptor from its stream dictionary.
pub fn parse_object_stream_dict(stream: PdfStream) -> Result<ObjectStream> {
    let first = stream.first().ok_or(PdfError::MissingFirstOffset)?;
    let n = stream.n().ok_or(PdfError::MissingObjectCount)?;
    debug!("object stream: n {}, first {}", n, first);

    Ok(ObjectStream {
        n,
        first,
        objects: Vec::new(),
        stream,
    })
}

impl XRefStream {
    /// Decodes the entries from the decompressed stream body, pairing each with its object number.
    pub fn entries(&self, data: &[u8], options: &ParseOptions) -> Result<Vec<(ObjNr, XRef)>> {
        let [w0, w1, w2] = self.w;
        if self.w.iter().any(|&w| w > std::mem::size_of::<u64>()) {
            err!(PdfError::CorruptFieldWidths);
        }
        let entry_len = self.entry_len();
        let mut num_entries = self.objects.len();
        let needed = num_entries.saturating_mul(entry_len);
        if needed > data.len() {
            if options.allow_xref_error {
                warn!("not enough xref data. truncating.");
                num_entries = data.len().checked_div(entry_len).unwrap_or(0);
            } else {
                err!(PdfError::TruncatedXRefStream { needed, available: data.len() });
            }
        }

        let mut data = data;
        let mut entries = Vec::with_capacity(num_entries);
        for &obj_nr in &self.objects[.. num_entries] {
            let _type = if w0 == 0 {
                1
            } else {
                read_u64_from_stream(w0, &mut data)
            };
            let field1 = read_u64_from_stream(w1, &mut data);
            let field2 = read_u64_from_stream(w2, &mut data);

            let entry = match _type {
                0 => XRef::Free { next_obj_nr: field1, gen_nr: field2 as GenNr },
                1 => XRef::Raw { pos: field1 as usize, gen_nr: field2 as GenNr },
                2 => XRef::Stream { stream_id: field1, index: field2 as usize },
                _ => err!(PdfError::XRefStreamType { found: _type }),
            };
            entries.push((obj_nr, entry));
        }
        Ok(entries)
    }
}

/// Reads a big-endian integer of `width` bytes and advances `data`.
/// The caller guarantees `width <= 8` and enough data.
fn read_u64_from_stream(width: usize, data: &mut &[u8]) -> u64 {
    let (field, rest) = data.split_at(width);
    *data = rest;
    field.iter().fold(0, |acc, &b| (acc << 8) | u64::from(b))
}
