//! Separation and DeviceN color spaces.
//!
//! Both reduce to the same machinery: colorant values run through a tint
//! transform into a base (alternate) color space which performs the final
//! conversion to RGB. Only the colorant count differs, so a single
//! `Alternate` type covers them.

use std::fmt;

use super::{ColorSpace, Sample};
use super::math::clamp_to_byte;
use crate::error::{ColorError, Result};
use crate::function::TintFunction;

pub struct Alternate {
    num_comps: usize,
    base: Box<ColorSpace>,
    tint_fn: Box<dyn TintFunction>,
}

impl Alternate {
    pub fn new(
        num_comps: usize,
        base: ColorSpace,
        tint_fn: Box<dyn TintFunction>,
    ) -> Result<Self> {
        if num_comps == 0 {
            return Err(ColorError::MalformedArray("color space with zero colorants"));
        }
        if base.components().is_none() {
            return Err(ColorError::MalformedArray(
                "pattern is not a valid alternate color space",
            ));
        }
        Ok(Self {
            num_comps,
            base: Box::new(base),
            tint_fn,
        })
    }

    pub fn num_comps(&self) -> usize {
        self.num_comps
    }

    pub fn base(&self) -> &ColorSpace {
        &self.base
    }

    pub(crate) fn get_rgb_item(
        &self,
        src: &[f32],
        src_offset: usize,
        dest: &mut [u8],
        dest_offset: usize,
    ) {
        let mut tinted = vec![0f32; self.base.num_comps()];
        self.tint_fn
            .transform(&src[src_offset..src_offset + self.num_comps], &mut tinted);
        self.base.get_rgb_item(&tinted, 0, dest, dest_offset);
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
        let base = &self.base;
        let scale = 1.0 / ((1u32 << bits) - 1) as f32;
        // When the staged bytes already are final RGB, write them straight
        // into `dest` and skip the base conversion pass.
        let is_passthrough =
            (base.is_passthrough(8) || !base.uses_zero_to_one_range()) && alpha01 == 0;

        if is_passthrough {
            self.stage(src, src_offset, count, scale, dest, dest_offset);
        } else {
            let mut staging = vec![0u8; base.num_comps() * count];
            self.stage(src, src_offset, count, scale, &mut staging, 0);
            base.get_rgb_buffer(&staging, 0, count, dest, dest_offset, 8, alpha01);
        }
    }

    /// Tint `count` pixels into `base_buf`: base component bytes when the
    /// base uses the `[0, 1]` range, final RGB bytes otherwise.
    fn stage<T: Sample>(
        &self,
        src: &[T],
        src_offset: usize,
        count: usize,
        scale: f32,
        base_buf: &mut [u8],
        mut pos: usize,
    ) {
        let base = &self.base;
        let base_num_comps = base.num_comps();
        let uses_zero_to_one_range = base.uses_zero_to_one_range();

        let mut scaled = vec![0f32; self.num_comps];
        let mut tinted = vec![0f32; base_num_comps];

        let mut j = src_offset;
        for _ in 0..count {
            for value in scaled.iter_mut() {
                *value = src[j].widen() as f32 * scale;
                j += 1;
            }
            self.tint_fn.transform(&scaled, &mut tinted);
            if uses_zero_to_one_range {
                for &t in &tinted {
                    base_buf[pos] = clamp_to_byte(f64::from(t) * 255.0);
                    pos += 1;
                }
            } else {
                base.get_rgb_item(&tinted, 0, base_buf, pos);
                pos += base_num_comps;
            }
        }
    }

    pub(crate) fn get_output_length(&self, input_length: usize, alpha01: usize) -> usize {
        self.base
            .get_output_length(input_length * self.base.num_comps() / self.num_comps, alpha01)
    }
}

impl fmt::Debug for Alternate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Alternate")
            .field("num_comps", &self.num_comps)
            .field("base", &self.base)
            .finish_non_exhaustive()
    }
}
