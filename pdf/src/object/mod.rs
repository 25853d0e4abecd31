//! Object numbers, references and the decoded stream descriptors.

mod stream;

pub use self::stream::*;

use std::fmt;
use datasize::DataSize;

pub type ObjNr = u64;
pub type GenNr = u16;

/// An indirect reference `<id> <gen> R`, not resolved here.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, DataSize)]
pub struct PlainRef {
    pub id:     ObjNr,
    pub gen:    GenNr,
}
impl PlainRef {
    pub fn new(id: ObjNr, gen: GenNr) -> PlainRef {
        PlainRef { id, gen }
    }
}
impl fmt::Display for PlainRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {} R", self.id, self.gen)
    }
}
