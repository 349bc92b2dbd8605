//! CIE-calibrated color spaces: CalGray and CalRGB.
//!
//! CalRGB carries the full chromatic-adaptation pipeline: gamma decoding,
//! the descriptor's linear map into CIE XYZ, Bradford adaptation from the
//! source white point to a flat (equal-energy) white, black-point
//! compensation, re-adaptation to D65 and finally the sRGB matrix plus
//! companding.

use log::{info, warn};

use super::Sample;
use super::math::{
    adjust_to_range, clamp_to_byte, decode_l, matrix_product, srgb_transfer_function,
};
use crate::error::{ColorError, Result};

const BRADFORD_SCALE_MATRIX: [f64; 9] = [
    0.8951, 0.2664, -0.1614, -0.7502, 1.7135, 0.0367, 0.0389, -0.0685, 1.0296,
];

const BRADFORD_SCALE_INVERSE_MATRIX: [f64; 9] = [
    0.9869929, -0.1470543, 0.1599627, 0.4323053, 0.5183603, 0.0492912, -0.0085287, 0.0400428,
    0.9684867,
];

// See http://www.brucelindbloom.com/index.html?Eqn_RGB_XYZ_Matrix.html.
const SRGB_D65_XYZ_TO_RGB_MATRIX: [f64; 9] = [
    3.2404542, -1.5371385, -0.4985314, -0.969266, 1.8760108, 0.041556, 0.0556434, -0.2040259,
    1.0572252,
];

const FLAT_WHITEPOINT: [f64; 3] = [1.0, 1.0, 1.0];

fn validate_white_point(space: &'static str, white_point: Option<&[f64]>) -> Result<[f64; 3]> {
    let wp = white_point.ok_or(ColorError::MissingEntry {
        space,
        entry: "WhitePoint",
    })?;
    if wp.len() < 3 {
        return Err(ColorError::InvalidWhitePoint(space));
    }
    let wp = [wp[0], wp[1], wp[2]];
    if wp[0] < 0.0 || wp[2] < 0.0 || wp[1] != 1.0 {
        return Err(ColorError::InvalidWhitePoint(space));
    }
    Ok(wp)
}

fn validate_black_point(space: &'static str, black_point: Option<&[f64]>) -> [f64; 3] {
    let bp = match black_point {
        Some(bp) if bp.len() >= 3 => [bp[0], bp[1], bp[2]],
        _ => [0.0; 3],
    };
    if bp[0] < 0.0 || bp[1] < 0.0 || bp[2] < 0.0 {
        warn!("Invalid BlackPoint for {}, falling back to default.", space);
        return [0.0; 3];
    }
    bp
}

/// CalGray color space (one component).
#[derive(Debug, Clone, PartialEq)]
pub struct CalGray {
    white_point: [f64; 3],
    gamma: f64,
}

impl CalGray {
    pub fn new(
        white_point: Option<&[f64]>,
        black_point: Option<&[f64]>,
        gamma: Option<f64>,
    ) -> Result<Self> {
        let white_point = validate_white_point("CalGray", white_point)?;
        let black_point = validate_black_point("CalGray", black_point);
        let mut gamma = gamma.unwrap_or(1.0);

        if black_point != [0.0; 3] {
            info!(
                "CalGray, BlackPoint: XB: {}, YB: {}, ZB: {}, only default values are supported.",
                black_point[0], black_point[1], black_point[2]
            );
        }
        if gamma < 1.0 {
            warn!("Invalid Gamma: {} for CalGray, falling back to default.", gamma);
            gamma = 1.0;
        }

        Ok(Self { white_point, gamma })
    }

    fn convert(&self, a: f64, dest: &mut [u8], dest_offset: usize) {
        let ag = a.powf(self.gamma);
        // L = YW * A^G, companded into [0, 255] directly.
        let l = self.white_point[1] * ag;
        let val = (295.8 * l.powf(0.3333) - 40.8).max(0.0);
        let byte = clamp_to_byte(val);
        dest[dest_offset] = byte;
        dest[dest_offset + 1] = byte;
        dest[dest_offset + 2] = byte;
    }

    pub(crate) fn get_rgb_item(
        &self,
        src: &[f32],
        src_offset: usize,
        dest: &mut [u8],
        dest_offset: usize,
    ) {
        self.convert(f64::from(src[src_offset]), dest, dest_offset);
    }

    pub(crate) fn get_rgb_buffer<T: Sample>(
        &self,
        src: &[T],
        src_offset: usize,
        count: usize,
        dest: &mut [u8],
        dest_offset: usize,
        bits: u8,
        alpha01: usize,
    ) {
        let scale = 1.0 / ((1u32 << bits) - 1) as f64;
        let mut j = src_offset;
        let mut q = dest_offset;
        for _ in 0..count {
            self.convert(scale * src[j].widen() as f64, dest, q);
            j += 1;
            q += 3 + alpha01;
        }
    }
}

/// CalRGB color space (three components).
#[derive(Debug, Clone, PartialEq)]
pub struct CalRgb {
    white_point: [f64; 3],
    black_point: [f64; 3],
    gamma: [f64; 3],
    /// Column-major XYZ matrix: `[MXA, MYA, MZA, MXB, MYB, MZB, MXC, MYC, MZC]`.
    matrix: [f64; 9],
}

impl CalRgb {
    pub fn new(
        white_point: Option<&[f64]>,
        black_point: Option<&[f64]>,
        gamma: Option<&[f64]>,
        matrix: Option<&[f64]>,
    ) -> Result<Self> {
        let white_point = validate_white_point("CalRGB", white_point)?;
        let black_point = validate_black_point("CalRGB", black_point);

        let mut gamma = match gamma {
            Some(g) if g.len() >= 3 => [g[0], g[1], g[2]],
            _ => [1.0; 3],
        };
        if gamma[0] < 0.0 || gamma[1] < 0.0 || gamma[2] < 0.0 {
            warn!(
                "Invalid Gamma [{}, {}, {}] for CalRGB, falling back to default.",
                gamma[0], gamma[1], gamma[2]
            );
            gamma = [1.0; 3];
        }

        let matrix = match matrix {
            Some(m) if m.len() >= 9 => {
                [m[0], m[1], m[2], m[3], m[4], m[5], m[6], m[7], m[8]]
            }
            _ => [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
        };

        Ok(Self {
            white_point,
            black_point,
            gamma,
            matrix,
        })
    }

    fn convert(&self, a: f64, b: f64, c: f64, dest: &mut [u8], dest_offset: usize) {
        let a = adjust_to_range(0.0, 1.0, a);
        let b = adjust_to_range(0.0, 1.0, b);
        let c = adjust_to_range(0.0, 1.0, c);

        let agr = if a == 1.0 { 1.0 } else { a.powf(self.gamma[0]) };
        let bgg = if b == 1.0 { 1.0 } else { b.powf(self.gamma[1]) };
        let cgb = if c == 1.0 { 1.0 } else { c.powf(self.gamma[2]) };

        let m = &self.matrix;
        let xyz = [
            m[0] * agr + m[3] * bgg + m[6] * cgb,
            m[1] * agr + m[4] * bgg + m[7] * cgb,
            m[2] * agr + m[5] * bgg + m[8] * cgb,
        ];

        let mut xyz_flat = [0.0; 3];
        normalize_white_point_to_flat(&self.white_point, &xyz, &mut xyz_flat);

        let mut xyz_black = [0.0; 3];
        compensate_black_point(&self.black_point, &xyz_flat, &mut xyz_black);

        let mut xyz_d65 = [0.0; 3];
        normalize_white_point_to_d65(&FLAT_WHITEPOINT, &xyz_black, &mut xyz_d65);

        let mut srgb = [0.0; 3];
        matrix_product(&SRGB_D65_XYZ_TO_RGB_MATRIX, &xyz_d65, &mut srgb);

        dest[dest_offset] = clamp_to_byte(srgb_transfer_function(srgb[0]) * 255.0);
        dest[dest_offset + 1] = clamp_to_byte(srgb_transfer_function(srgb[1]) * 255.0);
        dest[dest_offset + 2] = clamp_to_byte(srgb_transfer_function(srgb[2]) * 255.0);
    }

    pub(crate) fn get_rgb_item(
        &self,
        src: &[f32],
        src_offset: usize,
        dest: &mut [u8],
        dest_offset: usize,
    ) {
        self.convert(
            f64::from(src[src_offset]),
            f64::from(src[src_offset + 1]),
            f64::from(src[src_offset + 2]),
            dest,
            dest_offset,
        );
    }

    pub(crate) fn get_rgb_buffer<T: Sample>(
        &self,
        src: &[T],
        src_offset: usize,
        count: usize,
        dest: &mut [u8],
        dest_offset: usize,
        bits: u8,
        alpha01: usize,
    ) {
        let scale = 1.0 / ((1u32 << bits) - 1) as f64;
        let mut j = src_offset;
        let mut q = dest_offset;
        for _ in 0..count {
            self.convert(
                scale * src[j].widen() as f64,
                scale * src[j + 1].widen() as f64,
                scale * src[j + 2].widen() as f64,
                dest,
                q,
            );
            j += 3;
            q += 3 + alpha01;
        }
    }
}

/// Bradford-adapt `xyz_in` from `source_white_point` to the flat
/// (equal-energy) white point. A source already at flat white skips the
/// round trip through cone space.
fn normalize_white_point_to_flat(source_white_point: &[f64; 3], xyz_in: &[f64; 3], result: &mut [f64; 3]) {
    if source_white_point[0] == 1.0 && source_white_point[2] == 1.0 {
        *result = *xyz_in;
        return;
    }
    let mut lms = [0.0; 3];
    matrix_product(&BRADFORD_SCALE_MATRIX, xyz_in, &mut lms);
    let scaled = [
        lms[0] / source_white_point[0],
        lms[1] / source_white_point[1],
        lms[2] / source_white_point[2],
    ];
    matrix_product(&BRADFORD_SCALE_INVERSE_MATRIX, &scaled, result);
}

/// Bradford-adapt `xyz_in` from `source_white_point` to D65.
fn normalize_white_point_to_d65(source_white_point: &[f64; 3], xyz_in: &[f64; 3], result: &mut [f64; 3]) {
    const D65: [f64; 3] = [0.95047, 1.0, 1.08883];

    let mut lms = [0.0; 3];
    matrix_product(&BRADFORD_SCALE_MATRIX, xyz_in, &mut lms);
    let scaled = [
        lms[0] * D65[0] / source_white_point[0],
        lms[1] * D65[1] / source_white_point[1],
        lms[2] * D65[2] / source_white_point[2],
    ];
    matrix_product(&BRADFORD_SCALE_INVERSE_MATRIX, &scaled, result);
}

/// Black-point compensation against the default destination black.
///
/// For the derivation see the Adobe black-point compensation paper; the
/// destination black point is always `[0, 0, 0]` here.
fn compensate_black_point(source_black_point: &[f64; 3], xyz_flat: &[f64; 3], result: &mut [f64; 3]) {
    if source_black_point == &[0.0; 3] {
        *result = *xyz_flat;
        return;
    }

    let zero_decode_l = decode_l(0.0);
    for i in 0..3 {
        let dst = zero_decode_l;
        let src = decode_l(source_black_point[i]);
        let scale = (1.0 - dst) / (1.0 - src);
        let offset = 1.0 - scale;
        result[i] = xyz_flat[i] * scale + offset;
    }
}
