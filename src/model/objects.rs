//! PDF object model consumed by the color-space parser.
//!
//! A small slice of the usual PDF primitives: enough for the engine to
//! walk color-space descriptors that the surrounding document parser has
//! already materialized. Indirect references are resolved through the
//! [`Xref`] capability.

use std::collections::HashMap;
use std::io::Read;

use bytes::Bytes;
use flate2::read::ZlibDecoder;

use crate::error::{ColorError, Result};

/// Dictionary: name -> object mapping.
pub type Dict = HashMap<String, Object>;

/// PDF object - the fundamental value type in a descriptor graph.
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    /// Null object
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Real (floating point) value
    Real(f64),
    /// Name object (e.g. /DeviceRGB)
    Name(String),
    /// String (byte array)
    String(Vec<u8>),
    /// Array of objects
    Array(Vec<Self>),
    /// Dictionary
    Dict(Dict),
    /// Stream (dictionary attributes + binary data)
    Stream(Box<Stream>),
    /// Indirect object reference
    Ref(ObjRef),
}

impl Object {
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub const fn is_name(&self) -> bool {
        matches!(self, Self::Name(_))
    }

    pub const fn is_dict(&self) -> bool {
        matches!(self, Self::Dict(_))
    }

    pub const fn is_stream(&self) -> bool {
        matches!(self, Self::Stream(_))
    }

    /// Get as integer.
    pub const fn as_int(&self) -> Result<i64> {
        match self {
            Self::Int(n) => Ok(*n),
            _ => Err(self.type_error("int")),
        }
    }

    /// Get numeric value (int or real coerced to f64).
    pub const fn as_num(&self) -> Result<f64> {
        match self {
            Self::Int(n) => Ok(*n as f64),
            Self::Real(n) => Ok(*n),
            _ => Err(self.type_error("number")),
        }
    }

    /// Get as name string.
    pub fn as_name(&self) -> Result<&str> {
        match self {
            Self::Name(s) => Ok(s),
            _ => Err(self.type_error("name")),
        }
    }

    /// Get as array.
    pub const fn as_array(&self) -> Result<&Vec<Self>> {
        match self {
            Self::Array(arr) => Ok(arr),
            _ => Err(self.type_error("array")),
        }
    }

    /// Get as dictionary.
    pub const fn as_dict(&self) -> Result<&Dict> {
        match self {
            Self::Dict(d) => Ok(d),
            _ => Err(self.type_error("dict")),
        }
    }

    /// Get as stream.
    pub fn as_stream(&self) -> Result<&Stream> {
        match self {
            Self::Stream(s) => Ok(s),
            _ => Err(self.type_error("stream")),
        }
    }

    const fn type_error(&self, expected: &'static str) -> ColorError {
        ColorError::TypeError {
            expected,
            got: self.type_name(),
        }
    }

    /// Type name for error messages.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Real(_) => "real",
            Self::Name(_) => "name",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Dict(_) => "dict",
            Self::Stream(_) => "stream",
            Self::Ref(_) => "ref",
        }
    }
}

/// PDF indirect object reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjRef {
    /// Object ID
    pub objid: u32,
    /// Generation number
    pub genno: u32,
}

impl ObjRef {
    pub const fn new(objid: u32, genno: u32) -> Self {
        Self { objid, genno }
    }
}

/// PDF stream: dictionary attributes plus binary data.
///
/// Color-space descriptors use streams in two places, ICC profile data
/// (never evaluated here) and Indexed lookup tables. Lookup tables are
/// frequently Flate-compressed, so [`Stream::get_bytes`] understands the
/// `FlateDecode` filter; every other filter belongs to the surrounding
/// image pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Stream {
    /// Stream dictionary attributes
    pub attrs: Dict,
    /// Raw (possibly encoded) data
    rawdata: Bytes,
}

impl Stream {
    pub fn new(attrs: Dict, rawdata: impl Into<Bytes>) -> Self {
        Self {
            attrs,
            rawdata: rawdata.into(),
        }
    }

    /// Get attribute by name.
    pub fn get(&self, name: &str) -> Option<&Object> {
        self.attrs.get(name)
    }

    /// Raw (undecoded) data.
    pub fn get_rawdata(&self) -> &[u8] {
        self.rawdata.as_ref()
    }

    /// Decoded stream data.
    pub fn get_data(&self) -> Result<Vec<u8>> {
        match self.filter_name() {
            None => Ok(self.rawdata.to_vec()),
            Some(name) if is_flate_decode(name) => {
                let mut decoder = ZlibDecoder::new(self.rawdata.as_ref());
                let mut out = Vec::new();
                decoder
                    .read_to_end(&mut out)
                    .map_err(|e| ColorError::DecodeError(format!("FlateDecode error: {}", e)))?;
                Ok(out)
            }
            Some(name) => Err(ColorError::DecodeError(format!(
                "unsupported stream filter: {}",
                name
            ))),
        }
    }

    /// The first `n` decoded bytes. Shorter streams return what they have.
    pub fn get_bytes(&self, n: usize) -> Result<Vec<u8>> {
        let mut data = self.get_data()?;
        data.truncate(n);
        Ok(data)
    }

    fn filter_name(&self) -> Option<&str> {
        match self.attrs.get("Filter") {
            Some(Object::Name(name)) => Some(name),
            // A single-element filter array is common for palette streams.
            Some(Object::Array(arr)) => match arr.as_slice() {
                [Object::Name(name)] => Some(name),
                _ => Some("<filter chain>"),
            },
            _ => None,
        }
    }
}

fn is_flate_decode(name: &str) -> bool {
    name == "FlateDecode" || name.eq_ignore_ascii_case("Fl")
}

/// Capability for resolving indirect references, implemented by the
/// surrounding document's cross-reference machinery.
pub trait Xref {
    /// Fetch the object an indirect reference points at. Non-reference
    /// objects are returned unchanged.
    fn fetch_if_ref(&self, obj: &Object) -> Result<Object>;
}

/// In-memory object store, chiefly for tests and cached object graphs.
impl Xref for HashMap<u32, Object> {
    fn fetch_if_ref(&self, obj: &Object) -> Result<Object> {
        let mut current = obj.clone();
        for _ in 0..32 {
            match current {
                Object::Ref(r) => {
                    current = self
                        .get(&r.objid)
                        .cloned()
                        .ok_or(ColorError::ObjectNotFound(r.objid))?;
                }
                other => return Ok(other),
            }
        }
        Err(ColorError::CircularReference)
    }
}
