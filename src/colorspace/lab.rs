//! CIE 1976 L*a*b* color space.

use log::warn;

use super::Sample;
use super::math::{adjust_to_range, clamp_to_byte, lab_fn_g};
use crate::error::{ColorError, Result};

/// Lab color space (three components, native ranges).
///
/// Unlike every other color space here, Lab components do not live in
/// `[0, 1]`: L* spans `[0, 100]` and a*/b* span the descriptor's `Range`
/// entry. Raster samples are remapped into those ranges by the bulk
/// path; per-item input is taken as already decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct Lab {
    white_point: [f64; 3],
    amin: f64,
    amax: f64,
    bmin: f64,
    bmax: f64,
}

impl Lab {
    pub fn new(
        white_point: Option<&[f64]>,
        black_point: Option<&[f64]>,
        range: Option<&[f64]>,
    ) -> Result<Self> {
        let wp = white_point.ok_or(ColorError::MissingEntry {
            space: "Lab",
            entry: "WhitePoint",
        })?;
        if wp.len() < 3 || wp[0] < 0.0 || wp[2] < 0.0 || wp[1] != 1.0 {
            return Err(ColorError::InvalidWhitePoint("Lab"));
        }
        let white_point = [wp[0], wp[1], wp[2]];

        if let Some(bp) = black_point
            && bp.len() >= 3
            && (bp[0] < 0.0 || bp[1] < 0.0 || bp[2] < 0.0)
        {
            warn!("Invalid BlackPoint for Lab, falling back to default.");
        }

        let (mut amin, mut amax, mut bmin, mut bmax) = match range {
            Some(r) if r.len() >= 4 => (r[0], r[1], r[2], r[3]),
            _ => (-100.0, 100.0, -100.0, 100.0),
        };
        if amin > amax || bmin > bmax {
            warn!("Invalid Range, falling back to defaults");
            (amin, amax, bmin, bmax) = (-100.0, 100.0, -100.0, 100.0);
        }

        Ok(Self {
            white_point,
            amin,
            amax,
            bmin,
            bmax,
        })
    }

    /// Remap a raster sample from `[0, max_val]` into `[low, high]`.
    fn decode(value: f64, max_val: f64, low: f64, high: f64) -> f64 {
        low + value * (high - low) / max_val
    }

    fn convert(&self, ls: f64, a: f64, b: f64, dest: &mut [u8], dest_offset: usize) {
        let a = adjust_to_range(self.amin, self.amax, a);
        let b = adjust_to_range(self.bmin, self.bmax, b);

        let m = (ls + 16.0) / 116.0;
        let l = m + a / 500.0;
        let n = m - b / 200.0;

        let x = self.white_point[0] * lab_fn_g(l);
        let y = self.white_point[1] * lab_fn_g(m);
        let z = self.white_point[2] * lab_fn_g(n);

        // D50 vs D65 reference white picks the XYZ -> sRGB matrix, per
        // http://www.color.org/srgb.pdf.
        let (r, g, bb) = if self.white_point[2] < 1.0 {
            (
                x * 3.1339 + y * -1.617 + z * -0.4906,
                x * -0.9785 + y * 1.916 + z * 0.0333,
                x * 0.072 + y * -0.229 + z * 1.4057,
            )
        } else {
            (
                x * 3.2406 + y * -1.5372 + z * -0.4986,
                x * -0.9689 + y * 1.8758 + z * 0.0415,
                x * 0.0557 + y * -0.204 + z * 1.057,
            )
        };

        dest[dest_offset] = clamp_to_byte(r.max(0.0).sqrt() * 255.0);
        dest[dest_offset + 1] = clamp_to_byte(g.max(0.0).sqrt() * 255.0);
        dest[dest_offset + 2] = clamp_to_byte(bb.max(0.0).sqrt() * 255.0);
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
        let max_val = ((1u32 << bits) - 1) as f64;
        let mut j = src_offset;
        let mut q = dest_offset;
        for _ in 0..count {
            let ls = Self::decode(src[j].widen() as f64, max_val, 0.0, 100.0);
            let a = Self::decode(src[j + 1].widen() as f64, max_val, self.amin, self.amax);
            let b = Self::decode(src[j + 2].widen() as f64, max_val, self.bmin, self.bmax);
            self.convert(ls, a, b, dest, q);
            j += 3;
            q += 3 + alpha01;
        }
    }
}
