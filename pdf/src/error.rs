use std::io;
use snafu::Snafu;

#[derive(Debug, Snafu)]
pub enum PdfError {
    // Syntax / parsing
    #[snafu(display("No buffer available"))]
    NoBuffer,

    #[snafu(display("Corrupt array"))]
    CorruptArray,

    #[snafu(display("Unterminated array"))]
    UnterminatedArray,

    #[snafu(display("Corrupt dictionary"))]
    CorruptDictionary,

    #[snafu(display("Unterminated dictionary"))]
    UnterminatedDictionary,

    #[snafu(display("Duplicate key /{} in dictionary", key))]
    DuplicateKey { key: String },

    #[snafu(display("Corrupt string literal, possibly unbalanced parenthesis"))]
    CorruptStringLiteral,

    #[snafu(display("Corrupt hex literal. Position {}, byte {:#04x}", pos, byte))]
    CorruptHexLiteral { pos: usize, byte: u8 },

    #[snafu(display("Hex literal not terminated"))]
    UnterminatedHexLiteral,

    #[snafu(display("Corrupt name object"))]
    CorruptNameObject,

    #[snafu(display("'{}' is neither an integer nor a real number", token))]
    MalformedNumber { token: String },

    #[snafu(display("Can't find \"obj\" keyword"))]
    MissingObjKeyword,

    #[snafu(display("Corrupt object attributes: can't find {}", what))]
    CorruptObjectAttributes { what: &'static str },

    #[snafu(display("Nesting deeper than {} levels", depth))]
    RecursionLimit { depth: usize },

    //////////////////
    // Stream dictionaries
    #[snafu(display("Xref stream dict missing entry Size"))]
    MissingSizeEntry,

    #[snafu(display("Xref stream dict missing entry W"))]
    MissingFieldWidths,

    #[snafu(display("Xref stream dict corrupt entry W: expecting array of 3 int"))]
    CorruptFieldWidths,

    #[snafu(display("Xref stream dict corrupt entry Index"))]
    CorruptIndexEntry,

    #[snafu(display("Xref stream dict covers too many objects ({})", size))]
    XRefStreamTooLarge { size: usize },

    #[snafu(display("Object stream dict missing entry First"))]
    MissingFirstOffset,

    #[snafu(display("Object stream dict missing entry N"))]
    MissingObjectCount,

    #[snafu(display("Erroneous 'type' field in xref stream - expected 0, 1 or 2, found {}", found))]
    XRefStreamType { found: u64 },

    #[snafu(display("Not enough xref data: need {} bytes, {} available", needed, available))]
    TruncatedXRefStream { needed: usize, available: usize },

    #[snafu(display("Corrupt object stream header"))]
    CorruptObjectStreamHeader,

    #[snafu(display("Object stream index out of bounds ({}/{}).", index, max))]
    ObjStmOutOfBounds { index: usize, max: usize },

    //////////////////
    // Misc
    #[snafu(display("Expected primitive {}, found primitive {} instead.", expected, found))]
    UnexpectedPrimitive { expected: &'static str, found: &'static str },

    #[snafu(display("IO Error"))]
    Io { source: io::Error },

    #[snafu(display("{}", msg))]
    Other { msg: String },
}

pub type Result<T, E=PdfError> = std::result::Result<T, E>;

impl From<io::Error> for PdfError {
    fn from(source: io::Error) -> PdfError {
        PdfError::Io { source }
    }
}
impl From<String> for PdfError {
    fn from(msg: String) -> PdfError {
        PdfError::Other { msg }
    }
}

macro_rules! err {
    ($e: expr) => ({
        return Err($e);
    })
}
macro_rules! bail {
    ($($t:tt)*) => {
        err!($crate::PdfError::Other { msg: format!($($t)*) })
    }
}
