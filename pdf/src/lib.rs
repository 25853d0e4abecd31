//! Parser for the object syntax of PDF files.
//!
//! Turns the raw bytes of an object body into a [`Primitive`](primitive::Primitive), and
//! cross-reference / object stream dictionaries into typed descriptors.

#[macro_use] extern crate log;

#[macro_use]
pub mod error;
pub mod object;
pub mod xref;
pub mod primitive;
pub mod parser;

pub use crate::error::PdfError;
pub use crate::parser::{parse_object, parse_object_with, ParseOptions};
