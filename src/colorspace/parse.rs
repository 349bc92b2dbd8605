//! Color-space descriptor parsing.
//!
//! Parsing is split in two: [`parse_to_ir`] walks the PDF object graph
//! (the only place that needs the [`Xref`] capability) and produces a
//! self-contained intermediate representation; [`from_ir`] materializes
//! an engine instance from that IR without ever touching the object model
//! again. Renderers can hold on to the IR to rebuild color spaces
//! cheaply, keyed by descriptor reference.

use std::fmt;

use bytes::Bytes;
use log::warn;

use super::{Alternate, CalGray, CalRgb, ColorSpace, Indexed, Lab, Pattern};
use crate::error::{ColorError, Result};
use crate::function::{FunctionFactory, TintFunction};
use crate::model::{Dict, Object, Xref};

/// Intermediate representation of a parsed color-space descriptor.
///
/// Self-contained: lookup streams are drained to bytes and tint
/// transforms are already built, so materializing needs no object model.
pub enum ColorSpaceIr {
    DeviceGray,
    DeviceRgb,
    DeviceCmyk,
    CalGray {
        white_point: Option<Vec<f64>>,
        black_point: Option<Vec<f64>>,
        gamma: Option<f64>,
    },
    CalRgb {
        white_point: Option<Vec<f64>>,
        black_point: Option<Vec<f64>>,
        gamma: Option<Vec<f64>>,
        matrix: Option<Vec<f64>>,
    },
    Lab {
        white_point: Option<Vec<f64>>,
        black_point: Option<Vec<f64>>,
        range: Option<Vec<f64>>,
    },
    Indexed {
        base: Box<ColorSpaceIr>,
        high_val: usize,
        lookup: Bytes,
    },
    Alternate {
        num_comps: usize,
        base: Box<ColorSpaceIr>,
        tint_fn: Box<dyn TintFunction>,
    },
    Pattern {
        base: Option<Box<ColorSpaceIr>>,
    },
}

impl ColorSpaceIr {
    /// Components per pixel of the materialized space, `None` for
    /// Pattern. Lets the ICCBased sanity check run without building (and
    /// discarding) a full instance.
    pub fn components(&self) -> Option<usize> {
        match self {
            Self::DeviceGray | Self::CalGray { .. } | Self::Indexed { .. } => Some(1),
            Self::DeviceRgb | Self::CalRgb { .. } | Self::Lab { .. } => Some(3),
            Self::DeviceCmyk => Some(4),
            Self::Alternate { num_comps, .. } => Some(*num_comps),
            Self::Pattern { .. } => None,
        }
    }
}

impl fmt::Debug for ColorSpaceIr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeviceGray => f.write_str("DeviceGray"),
            Self::DeviceRgb => f.write_str("DeviceRgb"),
            Self::DeviceCmyk => f.write_str("DeviceCmyk"),
            Self::CalGray {
                white_point,
                black_point,
                gamma,
            } => f
                .debug_struct("CalGray")
                .field("white_point", white_point)
                .field("black_point", black_point)
                .field("gamma", gamma)
                .finish(),
            Self::CalRgb {
                white_point,
                black_point,
                gamma,
                matrix,
            } => f
                .debug_struct("CalRgb")
                .field("white_point", white_point)
                .field("black_point", black_point)
                .field("gamma", gamma)
                .field("matrix", matrix)
                .finish(),
            Self::Lab {
                white_point,
                black_point,
                range,
            } => f
                .debug_struct("Lab")
                .field("white_point", white_point)
                .field("black_point", black_point)
                .field("range", range)
                .finish(),
            Self::Indexed {
                base,
                high_val,
                lookup,
            } => f
                .debug_struct("Indexed")
                .field("base", base)
                .field("high_val", high_val)
                .field("lookup_len", &lookup.len())
                .finish(),
            Self::Alternate {
                num_comps, base, ..
            } => f
                .debug_struct("Alternate")
                .field("num_comps", num_comps)
                .field("base", base)
                .finish_non_exhaustive(),
            Self::Pattern { base } => f.debug_struct("Pattern").field("base", base).finish(),
        }
    }
}

/// Parse a color-space descriptor into its intermediate representation.
///
/// `cs` is a name, an array, or an indirect reference to either. Named
/// spaces that are not device spaces are looked up in the resource
/// dictionary's `ColorSpace` sub-dictionary.
pub fn parse_to_ir(
    cs: &Object,
    xref: &dyn Xref,
    resources: Option<&Dict>,
    function_factory: &dyn FunctionFactory,
) -> Result<ColorSpaceIr> {
    let cs = xref.fetch_if_ref(cs)?;

    if let Object::Name(name) = &cs {
        match name.as_str() {
            "G" | "DeviceGray" => return Ok(ColorSpaceIr::DeviceGray),
            "RGB" | "DeviceRGB" => return Ok(ColorSpaceIr::DeviceRgb),
            "CMYK" | "DeviceCMYK" => return Ok(ColorSpaceIr::DeviceCmyk),
            "Pattern" => return Ok(ColorSpaceIr::Pattern { base: None }),
            other => {
                if let Some(resources) = resources
                    && let Some(spaces) = resources.get("ColorSpace")
                    && let Object::Dict(spaces) = xref.fetch_if_ref(spaces)?
                    && let Some(entry) = spaces.get(other)
                {
                    return parse_to_ir(entry, xref, Some(resources), function_factory);
                }
                return Err(ColorError::UnrecognizedColorSpace(other.to_string()));
            }
        }
    }

    let Object::Array(arr) = &cs else {
        return Err(ColorError::UnrecognizedColorSpace(cs.type_name().to_string()));
    };
    if arr.is_empty() {
        return Err(ColorError::MalformedArray("empty color space array"));
    }

    let mode_obj = xref.fetch_if_ref(&arr[0])?;
    let mode = mode_obj.as_name()?;

    match mode {
        "G" | "DeviceGray" => Ok(ColorSpaceIr::DeviceGray),
        "RGB" | "DeviceRGB" => Ok(ColorSpaceIr::DeviceRgb),
        "CMYK" | "DeviceCMYK" => Ok(ColorSpaceIr::DeviceCmyk),
        "CalGray" => {
            let params = param_dict(arr, xref, "CalGray")?;
            Ok(ColorSpaceIr::CalGray {
                white_point: get_number_array(&params, "WhitePoint", xref)?,
                black_point: get_number_array(&params, "BlackPoint", xref)?,
                gamma: get_number(&params, "Gamma", xref)?,
            })
        }
        "CalRGB" => {
            let params = param_dict(arr, xref, "CalRGB")?;
            Ok(ColorSpaceIr::CalRgb {
                white_point: get_number_array(&params, "WhitePoint", xref)?,
                black_point: get_number_array(&params, "BlackPoint", xref)?,
                gamma: get_number_array(&params, "Gamma", xref)?,
                matrix: get_number_array(&params, "Matrix", xref)?,
            })
        }
        "ICCBased" => {
            let stream_obj = xref.fetch_if_ref(element(arr, 1)?)?;
            let stream = stream_obj.as_stream()?;
            let num_comps = match stream.get("N") {
                Some(obj) => xref.fetch_if_ref(obj)?.as_int()?,
                None => {
                    return Err(ColorError::MissingEntry {
                        space: "ICCBased",
                        entry: "N",
                    });
                }
            };
            if let Some(alt) = stream.get("Alternate") {
                let alt_ir = parse_to_ir(alt, xref, resources, function_factory)?;
                if alt_ir.components() == Some(num_comps as usize) {
                    return Ok(alt_ir);
                }
                // The /Alternate disagrees with /N; distrust it and key
                // the fallback on the component count alone.
                warn!("ICCBased color space: Ignoring incorrect /Alternate entry.");
            }
            match num_comps {
                1 => Ok(ColorSpaceIr::DeviceGray),
                3 => Ok(ColorSpaceIr::DeviceRgb),
                4 => Ok(ColorSpaceIr::DeviceCmyk),
                n => Err(ColorError::UnsupportedIccComponents(n)),
            }
        }
        "Pattern" => {
            let base = match arr.get(1) {
                Some(obj) if !obj.is_null() => Some(Box::new(parse_to_ir(
                    obj,
                    xref,
                    resources,
                    function_factory,
                )?)),
                _ => None,
            };
            Ok(ColorSpaceIr::Pattern { base })
        }
        "I" | "Indexed" => {
            let base = parse_to_ir(element(arr, 1)?, xref, resources, function_factory)?;
            let hival = xref.fetch_if_ref(element(arr, 2)?)?.as_int()?;
            if !(0..=255).contains(&hival) {
                return Err(ColorError::InvalidHighValue(hival));
            }
            let high_val = hival as usize + 1;

            let base_comps = base
                .components()
                .ok_or(ColorError::MalformedArray("indexed base color space has no component count"))?;
            let lookup = drain_lookup(
                &xref.fetch_if_ref(element(arr, 3)?)?,
                base_comps * high_val,
            )?;

            Ok(ColorSpaceIr::Indexed {
                base: Box::new(base),
                high_val,
                lookup,
            })
        }
        "Separation" | "DeviceN" => {
            let names = xref.fetch_if_ref(element(arr, 1)?)?;
            let num_comps = match &names {
                Object::Array(list) => list.len(),
                _ => 1,
            };
            let base = parse_to_ir(element(arr, 2)?, xref, resources, function_factory)?;
            let tint_obj = xref.fetch_if_ref(element(arr, 3)?)?;
            let tint_fn = function_factory.create(&tint_obj)?;
            Ok(ColorSpaceIr::Alternate {
                num_comps,
                base: Box::new(base),
                tint_fn,
            })
        }
        "Lab" => {
            let params = param_dict(arr, xref, "Lab")?;
            Ok(ColorSpaceIr::Lab {
                white_point: get_number_array(&params, "WhitePoint", xref)?,
                black_point: get_number_array(&params, "BlackPoint", xref)?,
                range: get_number_array(&params, "Range", xref)?,
            })
        }
        other => Err(ColorError::UnrecognizedColorSpace(other.to_string())),
    }
}

/// Materialize a color-space instance from its IR.
pub fn from_ir(ir: ColorSpaceIr) -> Result<ColorSpace> {
    match ir {
        ColorSpaceIr::DeviceGray => Ok(ColorSpace::DeviceGray),
        ColorSpaceIr::DeviceRgb => Ok(ColorSpace::DeviceRgb),
        ColorSpaceIr::DeviceCmyk => Ok(ColorSpace::DeviceCmyk),
        ColorSpaceIr::CalGray {
            white_point,
            black_point,
            gamma,
        } => Ok(ColorSpace::CalGray(CalGray::new(
            white_point.as_deref(),
            black_point.as_deref(),
            gamma,
        )?)),
        ColorSpaceIr::CalRgb {
            white_point,
            black_point,
            gamma,
            matrix,
        } => Ok(ColorSpace::CalRgb(CalRgb::new(
            white_point.as_deref(),
            black_point.as_deref(),
            gamma.as_deref(),
            matrix.as_deref(),
        )?)),
        ColorSpaceIr::Lab {
            white_point,
            black_point,
            range,
        } => Ok(ColorSpace::Lab(Lab::new(
            white_point.as_deref(),
            black_point.as_deref(),
            range.as_deref(),
        )?)),
        ColorSpaceIr::Indexed {
            base,
            high_val,
            lookup,
        } => Ok(ColorSpace::Indexed(Indexed::new(
            from_ir(*base)?,
            high_val,
            &lookup,
        )?)),
        ColorSpaceIr::Alternate {
            num_comps,
            base,
            tint_fn,
        } => Ok(ColorSpace::Alternate(Alternate::new(
            num_comps,
            from_ir(*base)?,
            tint_fn,
        )?)),
        ColorSpaceIr::Pattern { base } => {
            let base = match base {
                Some(ir) => Some(from_ir(*ir)?),
                None => None,
            };
            Ok(ColorSpace::Pattern(Pattern::new(base)))
        }
    }
}

fn element<'a>(arr: &'a [Object], index: usize) -> Result<&'a Object> {
    arr.get(index)
        .ok_or(ColorError::MalformedArray("color space array too short"))
}

fn param_dict(arr: &[Object], xref: &dyn Xref, space: &'static str) -> Result<Dict> {
    let params = xref.fetch_if_ref(element(arr, 1)?)?;
    match params {
        Object::Dict(dict) => Ok(dict),
        _ => Err(ColorError::MissingEntry {
            space,
            entry: "parameter dictionary",
        }),
    }
}

fn get_number(dict: &Dict, key: &str, xref: &dyn Xref) -> Result<Option<f64>> {
    match dict.get(key) {
        None => Ok(None),
        Some(obj) => Ok(Some(xref.fetch_if_ref(obj)?.as_num()?)),
    }
}

fn get_number_array(dict: &Dict, key: &str, xref: &dyn Xref) -> Result<Option<Vec<f64>>> {
    let Some(obj) = dict.get(key) else {
        return Ok(None);
    };
    let resolved = xref.fetch_if_ref(obj)?;
    let items = resolved.as_array()?;
    items
        .iter()
        .map(|item| xref.fetch_if_ref(item)?.as_num())
        .collect::<Result<Vec<f64>>>()
        .map(Some)
}

/// Drain an Indexed lookup table to raw bytes: a stream (first `length`
/// decoded bytes), a string (one byte per code unit), or nothing else.
fn drain_lookup(obj: &Object, length: usize) -> Result<Bytes> {
    match obj {
        Object::Stream(stream) => Ok(Bytes::from(stream.get_bytes(length)?)),
        Object::String(data) => Ok(Bytes::copy_from_slice(data)),
        _ => Err(ColorError::MalformedLookup(obj.type_name())),
    }
}
