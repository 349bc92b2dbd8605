//! Raster fill: apply a color space to a whole image.
//!
//! [`ColorSpace::fill_rgb`] converts a buffer of unpacked component
//! samples into packed RGB(A) output, picking between a pass-through
//! copy, a per-index color map for one-component spaces, and the direct
//! bulk conversion, with optional nearest-neighbor resizing at the end.

use rayon::prelude::*;

use super::{ColorSpace, Sample};

/// Below this pixel count the scanline-parallel split costs more than it
/// saves.
const PARALLEL_PIXEL_THRESHOLD: usize = 1 << 16;

impl ColorSpace {
    /// Convert an `original_width x original_height` raster of samples
    /// into `dest`, resizing to `width x height` when the two differ.
    ///
    /// `actual_height` is the number of rows actually present in `comps`
    /// (a partially decoded image may fall short of the nominal height),
    /// `bpc` the bits per component, and `alpha01` the per-pixel output
    /// stride beyond RGB (0 or 1; the alpha byte itself is not written).
    #[allow(clippy::too_many_arguments)]
    pub fn fill_rgb<T: Sample>(
        &self,
        dest: &mut [u8],
        original_width: usize,
        original_height: usize,
        width: usize,
        height: usize,
        actual_height: usize,
        bpc: u8,
        comps: &[T],
        alpha01: usize,
    ) {
        let count = original_width * original_height;
        let num_component_colors = 1usize << bpc;
        let needs_resizing = original_height != height || original_width != width;

        if self.is_passthrough(bpc) {
            if needs_resizing {
                resize_rgb_image(comps, dest, original_width, original_height, width, height, alpha01);
            } else {
                copy_expanding(comps, dest, width * actual_height, alpha01);
            }
            return;
        }

        if self.components() == Some(1)
            && count > num_component_colors
            && !matches!(self, Self::DeviceGray | Self::DeviceRgb)
        {
            // One-component color map: convert each possible sample value
            // once, then fill by table lookup. A big win for indexed and
            // tinted spaces; gray/rgb convert faster than they map.
            let all_colors: Vec<u16> = (0..num_component_colors).map(|c| c as u16).collect();
            let mut color_map = vec![0u8; num_component_colors * 3];
            self.get_rgb_buffer(&all_colors, 0, num_component_colors, &mut color_map, 0, bpc, 0);

            if needs_resizing {
                let mut rgb_buf = vec![0u8; count * 3];
                let mut rgb_pos = 0;
                for i in 0..count {
                    let key = comps[i].widen() as usize * 3;
                    rgb_buf[rgb_pos..rgb_pos + 3].copy_from_slice(&color_map[key..key + 3]);
                    rgb_pos += 3;
                }
                resize_rgb_image(&rgb_buf, dest, original_width, original_height, width, height, alpha01);
            } else {
                let mut dest_pos = 0;
                for i in 0..count {
                    let key = comps[i].widen() as usize * 3;
                    dest[dest_pos..dest_pos + 3].copy_from_slice(&color_map[key..key + 3]);
                    dest_pos += 3 + alpha01;
                }
            }
            return;
        }

        if needs_resizing {
            let mut rgb_buf = vec![0u8; count * 3];
            self.get_rgb_buffer(comps, 0, count, &mut rgb_buf, 0, bpc, 0);
            resize_rgb_image(&rgb_buf, dest, original_width, original_height, width, height, alpha01);
        } else {
            self.fill_rgb_direct(comps, width, actual_height, dest, bpc, alpha01);
        }
    }

    /// Direct bulk conversion into `dest`, scanline-parallel for large
    /// rasters. Rows are independent, so the split is byte-identical to
    /// the sequential pass.
    fn fill_rgb_direct<T: Sample>(
        &self,
        comps: &[T],
        width: usize,
        rows: usize,
        dest: &mut [u8],
        bpc: u8,
        alpha01: usize,
    ) {
        let pixels = width * rows;
        if pixels >= PARALLEL_PIXEL_THRESHOLD && width > 0 && rows > 1 {
            let row_samples = width * self.num_comps();
            let row_bytes = width * (3 + alpha01);
            dest[..rows * row_bytes]
                .par_chunks_mut(row_bytes)
                .zip(comps[..rows * row_samples].par_chunks(row_samples))
                .for_each(|(dest_row, src_row)| {
                    self.get_rgb_buffer(src_row, 0, width, dest_row, 0, bpc, alpha01);
                });
        } else {
            self.get_rgb_buffer(comps, 0, pixels, dest, 0, bpc, alpha01);
        }
    }
}

/// Copy RGB triples into `dest`, skipping `alpha01` bytes after each.
fn copy_expanding<T: Sample>(src: &[T], dest: &mut [u8], pixels: usize, alpha01: usize) {
    let mut src_pos = 0;
    let mut dest_pos = 0;
    for _ in 0..pixels {
        dest[dest_pos] = src[src_pos].widen() as u8;
        dest[dest_pos + 1] = src[src_pos + 1].widen() as u8;
        dest[dest_pos + 2] = src[src_pos + 2].widen() as u8;
        src_pos += 3;
        dest_pos += 3 + alpha01;
    }
}

/// Nearest-neighbor resize of packed RGB data from `w1 x h1` to
/// `w2 x h2`, writing with stride `3 + alpha01`.
///
/// `alpha01` is normalized at entry: any value other than 1 means 0.
pub(crate) fn resize_rgb_image<T: Sample>(
    src: &[T],
    dest: &mut [u8],
    w1: usize,
    h1: usize,
    w2: usize,
    h2: usize,
    alpha01: usize,
) {
    const COMPONENTS: usize = 3;
    let alpha01 = if alpha01 == 1 { 1 } else { 0 };
    let w1_scanline = w1 * COMPONENTS;

    // Source offsets per output column, computed once per image.
    let x_scaled: Vec<usize> = (0..w2).map(|j| j * w1 / w2 * COMPONENTS).collect();

    let mut new_index = 0;
    for i in 0..h2 {
        let py = i * h1 / h2 * w1_scanline;
        for &x_offset in &x_scaled {
            let old_index = py + x_offset;
            dest[new_index] = src[old_index].widen() as u8;
            dest[new_index + 1] = src[old_index + 1].widen() as u8;
            dest[new_index + 2] = src[old_index + 2].widen() as u8;
            new_index += COMPONENTS + alpha01;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_identity_is_copy() {
        let src: Vec<u8> = (0..12).collect();
        let mut dest = vec![0u8; 12];
        resize_rgb_image(&src, &mut dest, 2, 2, 2, 2, 0);
        assert_eq!(dest, src);
    }

    #[test]
    fn resize_doubles_pixels() {
        // 1x1 red pixel scaled to 2x2.
        let src: [u8; 3] = [200, 10, 30];
        let mut dest = vec![0u8; 12];
        resize_rgb_image(&src, &mut dest, 1, 1, 2, 2, 0);
        assert_eq!(dest, [200, 10, 30, 200, 10, 30, 200, 10, 30, 200, 10, 30]);
    }

    #[test]
    fn resize_downscales_by_sampling() {
        // 2x1 image shrunk to 1x1 keeps the left pixel.
        let src: [u8; 6] = [1, 2, 3, 4, 5, 6];
        let mut dest = vec![0u8; 3];
        resize_rgb_image(&src, &mut dest, 2, 1, 1, 1, 0);
        assert_eq!(dest, [1, 2, 3]);
    }

    #[test]
    fn resize_normalizes_bad_alpha01() {
        let src: [u8; 3] = [9, 8, 7];
        let mut with_two = vec![0u8; 6];
        let mut with_zero = vec![0u8; 6];
        resize_rgb_image(&src, &mut with_two, 1, 1, 2, 1, 2);
        resize_rgb_image(&src, &mut with_zero, 1, 1, 2, 1, 0);
        assert_eq!(with_two, with_zero);
    }

    #[test]
    fn fill_rgb_passthrough_matches_input() {
        let src: Vec<u8> = (0..12).collect();
        let mut dest = vec![0u8; 12];
        ColorSpace::rgb().fill_rgb(&mut dest, 2, 2, 2, 2, 2, 8, &src, 0);
        assert_eq!(dest, src);
    }

    #[test]
    fn fill_rgb_passthrough_expands_alpha() {
        let src: Vec<u8> = (0..6).collect();
        let mut dest = vec![0xFFu8; 8];
        ColorSpace::rgb().fill_rgb(&mut dest, 2, 1, 2, 1, 1, 8, &src, 1);
        assert_eq!(dest, [0, 1, 2, 0xFF, 3, 4, 5, 0xFF]);
    }

    #[test]
    fn fill_rgb_gray_direct() {
        let src: [u8; 3] = [0, 127, 255];
        let mut dest = vec![0u8; 9];
        ColorSpace::gray().fill_rgb(&mut dest, 3, 1, 3, 1, 1, 8, &src, 0);
        assert_eq!(dest, [0, 0, 0, 127, 127, 127, 255, 255, 255]);
    }

    #[test]
    fn fill_rgb_matches_direct_buffer_path() {
        // Invariant: identical dims means fill_rgb == get_rgb_buffer.
        let src: Vec<u8> = (0..64u8).map(|v| v % 16).collect();
        let mut filled = vec![0u8; 64 * 3];
        let mut direct = vec![0u8; 64 * 3];
        let cs = ColorSpace::gray();
        cs.fill_rgb(&mut filled, 8, 8, 8, 8, 8, 4, &src, 0);
        cs.get_rgb_buffer(&src, 0, 64, &mut direct, 0, 4, 0);
        assert_eq!(filled, direct);
    }
}
