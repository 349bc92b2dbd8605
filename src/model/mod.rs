//! PDF object model and resolution capability.

pub mod objects;

pub use objects::{Dict, ObjRef, Object, Stream, Xref};
