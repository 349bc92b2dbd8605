//! pdfcolor - a PDF color-space engine.
//!
//! Parses the color-space descriptors of the PDF specification
//! (DeviceGray/RGB/CMYK, CalGray, CalRGB, Lab, Indexed,
//! Separation/DeviceN, Pattern, with ICCBased falling back to its
//! alternate) and converts sampled color components into 8-bit RGB
//! output buffers.
//!
//! The engine consumes three capabilities from the surrounding renderer:
//! an [`Xref`](model::Xref) resolver for indirect references, the
//! [`Object`](model::Object) graph the document parser materialized, and
//! a [`FunctionFactory`](function::FunctionFactory) that evaluates PDF
//! function objects as tint transforms.

pub mod colorspace;
pub mod error;
pub mod function;
pub mod model;

pub use colorspace::{ColorSpace, ColorSpaceIr, Sample, from_ir, parse_to_ir};
pub use error::{ColorError, Result};
pub use function::{FunctionFactory, TintFunction};
pub use model::{Dict, ObjRef, Object, Stream, Xref};
