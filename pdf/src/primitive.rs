use crate::error::*;
use crate::object::PlainRef;

use std::{fmt, io};
use std::ops::{Index, Deref};
use std::borrow::Borrow;
use indexmap::IndexMap;
use itertools::Itertools;
use istring::{SmallString, IBytes};
use datasize::DataSize;

#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    Null,
    Integer (i64),
    Number (f64),
    Boolean (bool),
    String (PdfString),
    HexString (PdfString),
    Dictionary (Dictionary),
    Array (Vec<Primitive>),
    Reference (PlainRef),
    Name (Name),
}
impl DataSize for Primitive {
    const IS_DYNAMIC: bool = true;
    const STATIC_HEAP_SIZE: usize = std::mem::size_of::<Self>();

    fn estimate_heap_size(&self) -> usize {
        match self {
            Primitive::String(ref s) | Primitive::HexString(ref s) => s.estimate_heap_size(),
            Primitive::Dictionary(ref d) => d.estimate_heap_size(),
            Primitive::Array(ref arr) => arr.estimate_heap_size(),
            Primitive::Name(ref s) => s.estimate_heap_size(),
            _ => 0
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Primitive::Null => write!(f, "null"),
            Primitive::Integer(i) => write!(f, "{}", i),
            Primitive::Number(n) => write!(f, "{}", n),
            Primitive::Boolean(b) => write!(f, "{}", b),
            Primitive::String(ref s) => write!(f, "{:?}", s),
            Primitive::HexString(ref s) => write!(f, "<{:?}>", s),
            Primitive::Dictionary(ref d) => write!(f, "{}", d),
            Primitive::Array(ref arr) => write!(f, "[{}]", arr.iter().format(", ")),
            Primitive::Reference(r) => write!(f, "@{}", r.id),
            Primitive::Name(ref s) => write!(f, "{}", s),
        }
    }
}
impl Primitive {
    /// Writes the object back in PDF syntax. Parsing the output yields an equal `Primitive`,
    /// except for names holding white-space or delimiters, which come back `#xx`-escaped.
    pub fn serialize(&self, out: &mut impl io::Write) -> Result<()> {
        match self {
            Primitive::Null => write!(out, "null")?,
            Primitive::Integer(i) => write!(out, "{}", i)?,
            Primitive::Number(n) => serialize_number(*n, out)?,
            Primitive::Boolean(b) => write!(out, "{}", b)?,
            Primitive::String(ref s) => s.serialize(out)?,
            Primitive::HexString(ref s) => s.serialize_hex(out)?,
            Primitive::Dictionary(ref d) => d.serialize(out)?,
            Primitive::Array(ref arr) => serialize_list(arr, out)?,
            Primitive::Reference(r) => write!(out, "{} {} R", r.id, r.gen)?,
            Primitive::Name(ref s) => serialize_name(s, out)?,
        }
        Ok(())
    }
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.serialize(&mut out)?;
        Ok(out)
    }
    pub fn name(name: impl Into<Name>) -> Primitive {
        Primitive::Name(name.into())
    }
}

fn serialize_number(n: f64, out: &mut impl io::Write) -> Result<()> {
    if !n.is_finite() {
        bail!("can't serialize {} as a PDF number", n);
    }
    // keep a decimal point so the value reads back as a real
    if n.fract() == 0.0 {
        write!(out, "{:.1}", n)?;
    } else {
        write!(out, "{}", n)?;
    }
    Ok(())
}

fn serialize_list(arr: &[Primitive], out: &mut impl io::Write) -> Result<()> {
    let mut parts = arr.iter();
    write!(out, "[")?;
    if let Some(first) = parts.next() {
        first.serialize(out)?;
    }
    for p in parts {
        write!(out, " ")?;
        p.serialize(out)?;
    }
    write!(out, "]")?;
    Ok(())
}

/// Names are written raw. Bytes that would end the name early are written as `#xx`.
pub fn serialize_name(s: &str, out: &mut impl io::Write) -> Result<()> {
    write!(out, "/")?;
    for &b in s.as_bytes() {
        match b {
            b'\0' | b'\t' | b'\n' | b'\x0c' | b'\r' | b' '
            | b'/' | b'<' | b'>' | b'(' | b')' | b'[' | b']' => write!(out, "#{:02X}", b)?,
            _ => out.write_all(&[b])?,
        }
    }
    Ok(())
}

/// Primitive Dictionary type.
#[derive(Default, Clone, PartialEq)]
pub struct Dictionary {
    dict: IndexMap<Name, Primitive>
}
impl Dictionary {
    pub fn new() -> Dictionary {
        Dictionary { dict: IndexMap::new()}
    }
    pub fn len(&self) -> usize {
        self.dict.len()
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    pub fn get(&self, key: &str) -> Option<&Primitive> {
        self.dict.get(key)
    }
    /// Inserts or replaces the value for `key`.
    pub fn insert(&mut self, key: impl Into<Name>, val: impl Into<Primitive>) -> Option<Primitive> {
        self.dict.insert(key.into(), val.into())
    }
    /// Inserts a new key. Fails with `DuplicateKey` if `key` is already present.
    pub fn try_insert(&mut self, key: impl Into<Name>, val: impl Into<Primitive>) -> Result<()> {
        let key = key.into();
        if self.dict.contains_key(&key) {
            err!(PdfError::DuplicateKey { key: key.as_str().into() });
        }
        self.dict.insert(key, val.into());
        Ok(())
    }
    pub fn iter(&self) -> impl Iterator<Item=(&Name, &Primitive)> {
        self.dict.iter()
    }
    pub fn remove(&mut self, key: &str) -> Option<Primitive> {
        self.dict.shift_remove(key)
    }

    /// The value of `key` if it is an integer.
    pub fn get_integer(&self, key: &str) -> Option<i64> {
        match self.get(key) {
            Some(&Primitive::Integer(n)) => Some(n),
            _ => None
        }
    }
    /// The value of `key` if it is a non-negative integer.
    pub fn get_usize(&self, key: &str) -> Option<usize> {
        self.get_integer(key).and_then(|n| usize::try_from(n).ok())
    }
    /// The value of `key` if it is an array.
    pub fn get_array(&self, key: &str) -> Option<&[Primitive]> {
        match self.get(key) {
            Some(Primitive::Array(ref arr)) => Some(arr),
            _ => None
        }
    }
}
impl DataSize for Dictionary {
    const IS_DYNAMIC: bool = true;
    const STATIC_HEAP_SIZE: usize = std::mem::size_of::<Self>();
    fn estimate_heap_size(&self) -> usize {
        self.iter().map(|(k, v)| 16 + k.estimate_heap_size() + v.estimate_heap_size()).sum()
    }
}
impl Deref for Dictionary {
    type Target = IndexMap<Name, Primitive>;
    fn deref(&self) -> &IndexMap<Name, Primitive> {
        &self.dict
    }
}
impl Dictionary {
    fn serialize(&self, out: &mut impl io::Write) -> Result<()> {
        writeln!(out, "<<")?;
        for (key, val) in self.iter() {
            serialize_name(key, out)?;
            write!(out, " ")?;
            val.serialize(out)?;
            writeln!(out)?;
        }
        write!(out, ">>")?;
        Ok(())
    }
}
impl fmt::Debug for Dictionary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{{")?;
        for (k, v) in self {
            writeln!(f, "{:>15}: {}", k, v)?;
        }
        write!(f, "}}")
    }
}
impl fmt::Display for Dictionary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<{}>", self.iter().format_with(", ", |(k, v), f| f(&format_args!("{}={}", k, v))))
    }
}
impl<'a> Index<&'a str> for Dictionary {
    type Output = Primitive;
    fn index(&self, idx: &'a str) -> &Primitive {
        self.dict.index(idx)
    }
}
impl IntoIterator for Dictionary {
    type Item = (Name, Primitive);
    type IntoIter = indexmap::map::IntoIter<Name, Primitive>;
    fn into_iter(self) -> Self::IntoIter {
        self.dict.into_iter()
    }
}
impl<'a> IntoIterator for &'a Dictionary {
    type Item = (&'a Name, &'a Primitive);
    type IntoIter = indexmap::map::Iter<'a, Name, Primitive>;
    fn into_iter(self) -> Self::IntoIter {
        self.dict.iter()
    }
}

/// Stream dictionary: the dictionary in front of a stream, together with the
/// raw (still encoded) stream body.
#[derive(Clone, Debug, Default, PartialEq, DataSize)]
pub struct PdfStream {
    pub info: Dictionary,
    pub data: Vec<u8>,
}
impl PdfStream {
    pub fn new(info: Dictionary, data: Vec<u8>) -> PdfStream {
        PdfStream { info, data }
    }
    pub fn size(&self) -> Option<usize> {
        self.info.get_usize("Size")
    }
    pub fn index(&self) -> Option<&[Primitive]> {
        self.info.get_array("Index")
    }
    pub fn w(&self) -> Option<&[Primitive]> {
        self.info.get_array("W")
    }
    pub fn prev(&self) -> Option<u64> {
        self.info.get_usize("Prev").map(|p| p as u64)
    }
    pub fn first(&self) -> Option<usize> {
        self.info.get_usize("First")
    }
    pub fn n(&self) -> Option<usize> {
        self.info.get_usize("N")
    }
}

macro_rules! unexpected_primitive {
    ($expected:ident, $found:expr) => (
        Err(PdfError::UnexpectedPrimitive {
            expected: stringify!($expected),
            found: $found
        })
    )
}

#[derive(Clone, PartialEq, Eq, Hash, Debug, Ord, PartialOrd, DataSize)]
pub struct Name(pub SmallString);
impl Name {
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
impl Deref for Name {
    type Target = str;
    #[inline]
    fn deref(&self) -> &str {
        &self.0
    }
}
impl From<String> for Name {
    #[inline]
    fn from(s: String) -> Name {
        Name(s.into())
    }
}
impl<'a> From<&'a str> for Name {
    #[inline]
    fn from(s: &'a str) -> Name {
        Name(s.into())
    }
}
impl PartialEq<str> for Name {
    #[inline]
    fn eq(&self, rhs: &str) -> bool {
        self.as_str() == rhs
    }
}
impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "/{}", self.0)
    }
}
impl Borrow<str> for Name {
    #[inline]
    fn borrow(&self) -> &str {
        self.0.as_str()
    }
}

/// Primitive String type.
#[derive(Clone, PartialEq, Eq, Hash, DataSize)]
pub struct PdfString {
    pub data: IBytes,
}
impl fmt::Debug for PdfString {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "\"")?;
        for &b in self.data.as_slice() {
            match b {
                b'"' => write!(f, "\\\"")?,
                b' ' ..= b'~' => write!(f, "{}", b as char)?,
                o @ 0 ..= 7  => write!(f, "\\{}", o)?,
                x => write!(f, "\\x{:02x}", x)?
            }
        }
        write!(f, "\"")
    }
}

impl PdfString {
    pub fn new(data: IBytes) -> PdfString {
        PdfString {
            data
        }
    }
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
    pub fn into_bytes(self) -> IBytes {
        self.data
    }
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.data).into()
    }

    /// Literal form. Bytes the parser would normalize or misread are escaped.
    pub fn serialize(&self, out: &mut impl io::Write) -> Result<()> {
        write!(out, "(")?;
        for &b in self.data.as_slice() {
            match b {
                b'\\' | b'(' | b')' => write!(out, "\\{}", b as char)?,
                b'\n' => write!(out, "\\n")?,
                b'\r' => write!(out, "\\r")?,
                b' ' ..= b'~' => out.write_all(&[b])?,
                _ => write!(out, "\\{:03o}", b)?,
            }
        }
        write!(out, ")")?;
        Ok(())
    }
    pub fn serialize_hex(&self, out: &mut impl io::Write) -> Result<()> {
        write!(out, "<")?;
        for &b in self.data.as_slice() {
            write!(out, "{:02X}", b)?;
        }
        write!(out, ">")?;
        Ok(())
    }
}
impl AsRef<[u8]> for PdfString {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}
impl<'a> From<&'a str> for PdfString {
    fn from(value: &'a str) -> Self {
        PdfString { data: value.into() }
    }
}
impl From<Vec<u8>> for PdfString {
    fn from(value: Vec<u8>) -> Self {
        PdfString { data: value.into() }
    }
}

impl Primitive {
    /// For debugging / error messages: get the name of the variant
    pub fn get_debug_name(&self) -> &'static str {
        match *self {
            Primitive::Null => "Null",
            Primitive::Integer (..) => "Integer",
            Primitive::Number (..) => "Number",
            Primitive::Boolean (..) => "Boolean",
            Primitive::String (..) => "String",
            Primitive::HexString (..) => "HexString",
            Primitive::Dictionary (..) => "Dictionary",
            Primitive::Array (..) => "Array",
            Primitive::Reference (..) => "Reference",
            Primitive::Name (..) => "Name",
        }
    }
    pub fn as_integer(&self) -> Result<i64> {
        match *self {
            Primitive::Integer(n) => Ok(n),
            ref p => unexpected_primitive!(Integer, p.get_debug_name())
        }
    }
    pub fn as_usize(&self) -> Result<usize> {
        match *self {
            Primitive::Integer(n) if n >= 0 => Ok(n as usize),
            Primitive::Integer(_) => bail!("negative integer"),
            ref p => unexpected_primitive!(Integer, p.get_debug_name())
        }
    }
    pub fn as_number(&self) -> Result<f64> {
        match *self {
            Primitive::Integer(n) => Ok(n as f64),
            Primitive::Number(f) => Ok(f),
            ref p => unexpected_primitive!(Number, p.get_debug_name())
        }
    }
    pub fn as_bool(&self) -> Result<bool> {
        match *self {
            Primitive::Boolean (b) => Ok(b),
            ref p => unexpected_primitive!(Boolean, p.get_debug_name())
        }
    }
    pub fn as_name(&self) -> Result<&str> {
        match self {
            Primitive::Name(ref name) => Ok(name.as_str()),
            p => unexpected_primitive!(Name, p.get_debug_name())
        }
    }
    /// Literal and hex strings alike.
    pub fn as_string(&self) -> Result<&PdfString> {
        match self {
            Primitive::String(ref data) | Primitive::HexString(ref data) => Ok(data),
            p => unexpected_primitive!(String, p.get_debug_name())
        }
    }
    pub fn as_array(&self) -> Result<&[Primitive]> {
        match self {
            Primitive::Array(ref v) => Ok(v),
            p => unexpected_primitive!(Array, p.get_debug_name())
        }
    }
    pub fn as_dictionary(&self) -> Result<&Dictionary> {
        match self {
            Primitive::Dictionary(ref dict) => Ok(dict),
            p => unexpected_primitive!(Dictionary, p.get_debug_name())
        }
    }
    pub fn as_reference(&self) -> Result<PlainRef> {
        match *self {
            Primitive::Reference(id) => Ok(id),
            ref p => unexpected_primitive!(Reference, p.get_debug_name())
        }
    }
    pub fn into_array(self) -> Result<Vec<Primitive>> {
        match self {
            Primitive::Array(v) => Ok(v),
            p => unexpected_primitive!(Array, p.get_debug_name())
        }
    }
    pub fn into_dictionary(self) -> Result<Dictionary> {
        match self {
            Primitive::Dictionary(dict) => Ok(dict),
            p => unexpected_primitive!(Dictionary, p.get_debug_name())
        }
    }
}

impl From<i64> for Primitive {
    fn from(x: i64) -> Primitive {
        Primitive::Integer(x)
    }
}
impl From<f64> for Primitive {
    fn from(x: f64) -> Primitive {
        Primitive::Number(x)
    }
}
impl From<bool> for Primitive {
    fn from(x: bool) -> Primitive {
        Primitive::Boolean(x)
    }
}
impl From<Name> for Primitive {
    fn from(x: Name) -> Primitive {
        Primitive::Name(x)
    }
}
impl From<PdfString> for Primitive {
    fn from(x: PdfString) -> Primitive {
        Primitive::String (x)
    }
}
impl From<Dictionary> for Primitive {
    fn from(x: Dictionary) -> Primitive {
        Primitive::Dictionary (x)
    }
}
impl From<Vec<Primitive>> for Primitive {
    fn from(x: Vec<Primitive>) -> Primitive {
        Primitive::Array (x)
    }
}
impl From<PlainRef> for Primitive {
    fn from(x: PlainRef) -> Primitive {
        Primitive::Reference (x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_object;

    fn reparse(p: &Primitive) -> Primitive {
        let bytes = p.to_bytes().unwrap();
        let (q, rest) = parse_object(&bytes).unwrap();
        assert!(rest.is_empty(), "left over: {:?}", String::from_utf8_lossy(rest));
        q
    }

    #[test]
    fn test_name() {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let s = "Hello World!";
        let hasher = DefaultHasher::new();

        fn hash(hasher: &DefaultHasher, value: impl Hash) -> u64 {
            let mut hasher = hasher.clone();
            value.hash(&mut hasher);
            hasher.finish()
        }
        assert_eq!(hash(&hasher, Name(s.into())), hash(&hasher, s));
    }

    #[test]
    fn try_insert_rejects_duplicates() {
        let mut dict = Dictionary::new();
        dict.try_insert("Type", Primitive::name("XRef")).unwrap();
        let e = dict.try_insert("Type", Primitive::Null).unwrap_err();
        assert!(matches!(e, PdfError::DuplicateKey { ref key } if key == "Type"));
        assert_eq!(dict["Type"], Primitive::name("XRef"));

        // plain insert still replaces
        assert_eq!(dict.insert("Type", Primitive::Null), Some(Primitive::name("XRef")));
    }

    #[test]
    fn typed_accessors() {
        let mut info = Dictionary::new();
        info.insert("Size", 10i64);
        info.insert("Prev", -1i64);
        info.insert("N", Primitive::name("4"));
        info.insert("W", vec![Primitive::Integer(1)]);
        let stream = PdfStream::new(info, vec![]);
        assert_eq!(stream.size(), Some(10));
        assert_eq!(stream.prev(), None);
        assert_eq!(stream.n(), None);
        assert_eq!(stream.first(), None);
        assert_eq!(stream.w(), Some(&[Primitive::Integer(1)][..]));
        assert_eq!(stream.index(), None);
    }

    #[test]
    fn serialize_round_trip() {
        let mut dict = Dictionary::new();
        dict.insert("Type", Primitive::name("Page"));
        dict.insert("Parent", PlainRef::new(3, 0));
        dict.insert("Rotate", 1.0f64);
        dict.insert("Scale", -0.25f64);
        dict.insert("Title", PdfString::from("a (nested) \\ title\r\n"));
        dict.insert("Raw", PdfString::from(vec![0u8, 0xff, b'x']));
        dict.insert("Id", Primitive::HexString(PdfString::from(vec![0xde, 0xad])));
        dict.insert("Kids", vec![Primitive::Null, true.into(), 7i64.into(), Primitive::Array(vec![])]);
        dict.insert("Empty", Dictionary::new());
        let p = Primitive::Dictionary(dict);

        assert_eq!(reparse(&p), p);
    }

    #[test]
    fn serialize_forms() {
        assert_eq!(Primitive::Number(2.0).to_bytes().unwrap(), b"2.0");
        assert_eq!(Primitive::Reference(PlainRef::new(12, 1)).to_bytes().unwrap(), b"12 1 R");
        assert_eq!(Primitive::HexString(PdfString::from("AB")).to_bytes().unwrap(), b"<4142>");
        assert_eq!(Primitive::name("A B").to_bytes().unwrap(), b"/A#20B");
        assert!(Primitive::Number(f64::NAN).to_bytes().is_err());
    }

    #[test]
    fn heap_size() {
        let p = Primitive::Array(vec![Primitive::String(PdfString::from(vec![b'x'; 200]))]);
        assert!(datasize::data_size(&p) >= 200);
    }

    #[test]
    fn display() {
        let p = Primitive::Array(vec![Primitive::Integer(1), Primitive::name("A"), Primitive::Reference(PlainRef::new(5, 0))]);
        assert_eq!(p.to_string(), "[1, /A, @5]");
    }
}
