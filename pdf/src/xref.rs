use crate::object::*;

/// One entry of a cross-reference stream.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum XRef {
    /// Not currently used.
    Free {
        next_obj_nr: ObjNr,
        gen_nr: GenNr
    },

    /// In use.
    Raw {
        pos: usize,
        gen_nr: GenNr
    },
    /// In use and compressed inside an Object Stream
    Stream {
        stream_id: ObjNr,
        index: usize,
    },
}

impl XRef {
    pub fn get_gen_nr(&self) -> GenNr {
        match *self {
            XRef::Free {gen_nr, ..}
            | XRef::Raw {gen_nr, ..} => gen_nr,
            // objects in object streams always have generation 0
            XRef::Stream { .. } => 0,
        }
    }
    pub fn is_free(&self) -> bool {
        matches!(*self, XRef::Free { .. })
    }
}
