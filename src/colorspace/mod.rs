//! PDF color spaces and the conversion pipeline to 8-bit RGB.
//!
//! A color space converts sampled color components, image pixels or
//! drawing-operator operands, into RGB output bytes. The closed set of
//! spaces defined by the PDF specification is modeled as one sum type;
//! parsing a descriptor (see [`parse`]) yields an instance, and callers
//! drive it per pixel ([`ColorSpace::get_rgb_item`]), in bulk
//! ([`ColorSpace::get_rgb_buffer`]) or over a whole raster
//! ([`ColorSpace::fill_rgb`]).

pub mod alternate;
pub mod calibrated;
pub mod device;
pub mod indexed;
pub mod lab;
pub(crate) mod math;
pub mod parse;
pub mod pattern;
pub mod raster;

use log::warn;

pub use alternate::Alternate;
pub use calibrated::{CalGray, CalRgb};
pub use indexed::Indexed;
pub use lab::Lab;
pub use parse::{ColorSpaceIr, from_ir, parse_to_ir};
pub use pattern::Pattern;

use crate::error::Result;
use crate::function::FunctionFactory;
use crate::model::{Dict, Object, Xref};

/// A raster component sample: a non-negative integer in `[0, 2^bits)`,
/// held in a byte buffer for up to 8 bits per component or a word buffer
/// for 16.
pub trait Sample: Copy + Send + Sync {
    fn widen(self) -> u32;
}

impl Sample for u8 {
    #[inline]
    fn widen(self) -> u32 {
        u32::from(self)
    }
}

impl Sample for u16 {
    #[inline]
    fn widen(self) -> u32 {
        u32::from(self)
    }
}

/// A PDF color space instance.
///
/// The set is sealed: the parser only ever produces these nine variants,
/// and dispatch is a `match`. Device spaces are data-free and shared as
/// process-wide singletons ([`ColorSpace::gray`] and friends).
#[derive(Debug)]
pub enum ColorSpace {
    DeviceGray,
    DeviceRgb,
    DeviceCmyk,
    CalGray(CalGray),
    CalRgb(CalRgb),
    Lab(Lab),
    Indexed(Indexed),
    Alternate(Alternate),
    Pattern(Pattern),
}

static DEVICE_GRAY: ColorSpace = ColorSpace::DeviceGray;
static DEVICE_RGB: ColorSpace = ColorSpace::DeviceRgb;
static DEVICE_CMYK: ColorSpace = ColorSpace::DeviceCmyk;

impl ColorSpace {
    /// Parse a color-space descriptor into an instance.
    pub fn parse(
        cs: &Object,
        xref: &dyn Xref,
        resources: Option<&Dict>,
        function_factory: &dyn FunctionFactory,
    ) -> Result<Self> {
        from_ir(parse_to_ir(cs, xref, resources, function_factory)?)
    }

    /// The shared DeviceGray instance.
    pub fn gray() -> &'static Self {
        &DEVICE_GRAY
    }

    /// The shared DeviceRGB instance.
    pub fn rgb() -> &'static Self {
        &DEVICE_RGB
    }

    /// The shared DeviceCMYK instance.
    pub fn cmyk() -> &'static Self {
        &DEVICE_CMYK
    }

    /// Tag naming this color space family.
    pub fn name(&self) -> &'static str {
        match self {
            Self::DeviceGray => "DeviceGray",
            Self::DeviceRgb => "DeviceRGB",
            Self::DeviceCmyk => "DeviceCMYK",
            Self::CalGray(_) => "CalGray",
            Self::CalRgb(_) => "CalRGB",
            Self::Lab(_) => "Lab",
            Self::Indexed(_) => "Indexed",
            Self::Alternate(_) => "Alternate",
            Self::Pattern(_) => "Pattern",
        }
    }

    /// Components per source pixel, `None` for Pattern.
    pub(crate) fn components(&self) -> Option<usize> {
        match self {
            Self::DeviceGray | Self::CalGray(_) | Self::Indexed(_) => Some(1),
            Self::DeviceRgb | Self::CalRgb(_) | Self::Lab(_) => Some(3),
            Self::DeviceCmyk => Some(4),
            Self::Alternate(cs) => Some(cs.num_comps()),
            Self::Pattern(_) => None,
        }
    }

    /// Components per source pixel.
    ///
    /// # Panics
    ///
    /// Panics for Pattern, which has no component count; asking for one
    /// is a caller bug.
    pub fn num_comps(&self) -> usize {
        self.components()
            .expect("pattern color space has no component count")
    }

    /// Convert a single pixel of float components (`[0, 1]`, except Lab
    /// which uses its native ranges) into three RGB bytes at
    /// `dest[dest_offset..]`.
    pub fn get_rgb_item(&self, src: &[f32], src_offset: usize, dest: &mut [u8], dest_offset: usize) {
        match self {
            Self::DeviceGray => device::gray_get_rgb_item(src, src_offset, dest, dest_offset),
            Self::DeviceRgb => device::rgb_get_rgb_item(src, src_offset, dest, dest_offset),
            Self::DeviceCmyk => device::cmyk_get_rgb_item(src, src_offset, dest, dest_offset),
            Self::CalGray(cs) => cs.get_rgb_item(src, src_offset, dest, dest_offset),
            Self::CalRgb(cs) => cs.get_rgb_item(src, src_offset, dest, dest_offset),
            Self::Lab(cs) => cs.get_rgb_item(src, src_offset, dest, dest_offset),
            Self::Indexed(cs) => cs.get_rgb_item(src, src_offset, dest, dest_offset),
            Self::Alternate(cs) => cs.get_rgb_item(src, src_offset, dest, dest_offset),
            Self::Pattern(_) => panic!("cannot convert pixels through a pattern color space"),
        }
    }

    /// Convert `count` pixels of integer samples in `[0, 2^bits)`. Each
    /// pixel writes three bytes and then skips `alpha01` bytes (the alpha
    /// slot is left untouched for the caller).
    pub fn get_rgb_buffer<T: Sample>(
        &self,
        src: &[T],
        src_offset: usize,
        count: usize,
        dest: &mut [u8],
        dest_offset: usize,
        bits: u8,
        alpha01: usize,
    ) {
        debug_assert!(
            dest.len() >= dest_offset + self.get_output_length(count * self.num_comps(), alpha01),
            "destination buffer too small for {} pixels",
            count
        );
        match self {
            Self::DeviceGray => {
                device::gray_get_rgb_buffer(src, src_offset, count, dest, dest_offset, bits, alpha01)
            }
            Self::DeviceRgb => {
                device::rgb_get_rgb_buffer(src, src_offset, count, dest, dest_offset, bits, alpha01)
            }
            Self::DeviceCmyk => {
                device::cmyk_get_rgb_buffer(src, src_offset, count, dest, dest_offset, bits, alpha01)
            }
            Self::CalGray(cs) => {
                cs.get_rgb_buffer(src, src_offset, count, dest, dest_offset, bits, alpha01)
            }
            Self::CalRgb(cs) => {
                cs.get_rgb_buffer(src, src_offset, count, dest, dest_offset, bits, alpha01)
            }
            Self::Lab(cs) => {
                cs.get_rgb_buffer(src, src_offset, count, dest, dest_offset, bits, alpha01)
            }
            Self::Indexed(cs) => {
                cs.get_rgb_buffer(src, src_offset, count, dest, dest_offset, bits, alpha01)
            }
            Self::Alternate(cs) => {
                cs.get_rgb_buffer(src, src_offset, count, dest, dest_offset, bits, alpha01)
            }
            Self::Pattern(_) => panic!("cannot convert pixels through a pattern color space"),
        }
    }

    /// Byte length of the `dest` region [`Self::get_rgb_buffer`] fills
    /// for `input_length` input samples at stride `3 + alpha01`.
    pub fn get_output_length(&self, input_length: usize, alpha01: usize) -> usize {
        match self {
            Self::DeviceGray | Self::CalGray(_) => input_length * (3 + alpha01),
            Self::DeviceRgb | Self::CalRgb(_) | Self::Lab(_) => input_length * (3 + alpha01) / 3,
            Self::DeviceCmyk => input_length * (3 + alpha01) / 4,
            Self::Indexed(cs) => cs.get_output_length(input_length, alpha01),
            Self::Alternate(cs) => cs.get_output_length(input_length, alpha01),
            Self::Pattern(_) => panic!("cannot convert pixels through a pattern color space"),
        }
    }

    /// Whether raw samples of the given bit depth already are the desired
    /// RGB bytes. Only DeviceRGB at 8 bits qualifies.
    pub fn is_passthrough(&self, bits: u8) -> bool {
        matches!(self, Self::DeviceRgb) && bits == 8
    }

    /// Whether component values live in `[0, 1]`. Lab is the lone
    /// exception; the tinting pipeline uses this to decide whether tint
    /// output is already scaled.
    pub fn uses_zero_to_one_range(&self) -> bool {
        !matches!(self, Self::Lab(_))
    }

    /// Whether the PDF decode map is the identity for this color space
    /// and bit depth.
    pub fn is_default_decode(&self, decode_map: Option<&[f64]>, bpc: u8) -> bool {
        match self {
            Self::Lab(_) => true,
            Self::Indexed(cs) => cs.is_default_decode(decode_map, bpc),
            Self::Pattern(_) => panic!("pattern color space has no decode map"),
            _ => Self::is_default_decode_map(decode_map, self.num_comps()),
        }
    }

    /// Whether `decode` is the identity map `[0, 1, 0, 1, ...]` for
    /// `num_comps` components. Absent and wrong-length maps count as
    /// default.
    pub fn is_default_decode_map(decode: Option<&[f64]>, num_comps: usize) -> bool {
        let Some(decode) = decode else {
            return true;
        };
        if decode.len() != 2 * num_comps {
            warn!("The decode map is not the correct length");
            return true;
        }
        decode
            .chunks_exact(2)
            .all(|pair| pair[0] == 0.0 && pair[1] == 1.0)
    }
}
