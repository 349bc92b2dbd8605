//! Conversion tests for the color-space engine.
//!
//! Exercises the per-pixel, bulk, and raster fill paths of every
//! convertible color space against values computed from the conversion
//! formulas.

use pdfcolor::colorspace::{Alternate, CalGray, CalRgb, Indexed, Lab};
use pdfcolor::{ColorSpace, TintFunction};

fn boxed_tint<F>(f: F) -> Box<dyn TintFunction>
where
    F: Fn(&[f32], &mut [f32]) + Send + Sync + 'static,
{
    Box::new(f)
}

// === Device spaces ===

#[test]
fn test_device_gray_buffer() {
    let src: [u8; 3] = [0, 127, 255];
    let mut dest = [0u8; 9];
    ColorSpace::gray().get_rgb_buffer(&src, 0, 3, &mut dest, 0, 8, 0);
    assert_eq!(dest, [0, 0, 0, 127, 127, 127, 255, 255, 255]);
}

#[test]
fn test_device_rgb_passthrough() {
    let src: [u8; 6] = [10, 20, 30, 40, 50, 60];
    let mut dest = [0u8; 6];
    ColorSpace::rgb().get_rgb_buffer(&src, 0, 2, &mut dest, 0, 8, 0);
    assert_eq!(dest, src);
}

#[test]
fn test_device_rgb_16_bit_samples() {
    let src: [u16; 3] = [0, 0x8000, 0xFFFF];
    let mut dest = [0u8; 3];
    ColorSpace::rgb().get_rgb_buffer(&src, 0, 1, &mut dest, 0, 16, 0);
    assert_eq!(dest[0], 0);
    assert!((i32::from(dest[1]) - 128).abs() <= 1);
    assert_eq!(dest[2], 255);
}

#[test]
fn test_device_cmyk_extremes() {
    let mut white = [0u8; 3];
    ColorSpace::cmyk().get_rgb_item(&[0.0, 0.0, 0.0, 0.0], 0, &mut white, 0);
    assert_eq!(white, [255, 255, 255]);

    let src: [u8; 4] = [255, 255, 255, 255];
    let mut black = [0u8; 3];
    ColorSpace::cmyk().get_rgb_buffer(&src, 0, 1, &mut black, 0, 8, 0);
    assert!(black.iter().all(|&v| v < 20), "full ink got {:?}", black);
}

// === Calibrated spaces ===

#[test]
fn test_cal_gray_conversion() {
    let cs = ColorSpace::CalGray(
        CalGray::new(Some(&[0.9505, 1.0, 1.089]), None, Some(2.2)).unwrap(),
    );
    let mut dest = [0u8; 3];
    cs.get_rgb_item(&[0.5], 0, &mut dest, 0);
    assert_eq!(dest[0], dest[1]);
    assert_eq!(dest[1], dest[2]);
    // 295.8 * (0.5^2.2 * YW)^0.3333 - 40.8 = 137.1
    assert!((i32::from(dest[0]) - 137).abs() <= 1, "got {}", dest[0]);
}

#[test]
fn test_cal_rgb_endpoints_and_buffer() {
    let cs = ColorSpace::CalRgb(
        CalRgb::new(Some(&[0.9505, 1.0, 1.089]), None, None, None).unwrap(),
    );
    let src: [u8; 6] = [0, 0, 0, 255, 255, 255];
    let mut dest = [0u8; 6];
    cs.get_rgb_buffer(&src, 0, 2, &mut dest, 0, 8, 0);
    assert_eq!(&dest[0..3], &[0, 0, 0]);
    // The adaptation chain renders calibrated white a touch warm; every
    // channel still lands near the top of the range.
    assert!(dest[3..6].iter().all(|&v| v >= 240), "white got {:?}", &dest[3..6]);
}

#[test]
fn test_cal_rgb_item_and_buffer_agree() {
    let cs = ColorSpace::CalRgb(
        CalRgb::new(
            Some(&[0.9505, 1.0, 1.089]),
            None,
            Some(&[1.8, 1.8, 1.8]),
            None,
        )
        .unwrap(),
    );
    let src: [u8; 3] = [64, 128, 192];
    let mut from_buffer = [0u8; 3];
    cs.get_rgb_buffer(&src, 0, 1, &mut from_buffer, 0, 8, 0);

    let floats: Vec<f32> = src.iter().map(|&v| f32::from(v) / 255.0).collect();
    let mut from_item = [0u8; 3];
    cs.get_rgb_item(&floats, 0, &mut from_item, 0);

    for (a, b) in from_buffer.iter().zip(from_item.iter()) {
        assert!((i32::from(*a) - i32::from(*b)).abs() <= 1);
    }
}

// === Lab ===

#[test]
fn test_lab_neutral_axis() {
    let cs = ColorSpace::Lab(Lab::new(Some(&[0.9505, 1.0, 1.089]), None, None).unwrap());
    let mut dest = [0u8; 3];
    cs.get_rgb_item(&[50.0, 0.0, 0.0], 0, &mut dest, 0);
    assert!((i32::from(dest[0]) - i32::from(dest[1])).abs() <= 1);
    assert!((i32::from(dest[1]) - i32::from(dest[2])).abs() <= 1);
}

#[test]
fn test_lab_bulk_decodes_sample_range() {
    let cs = ColorSpace::Lab(Lab::new(Some(&[0.9505, 1.0, 1.089]), None, None).unwrap());
    // Full lightness, mid a*/b* decodes to roughly L*=100, a*=b*~0.
    let src: [u8; 3] = [255, 127, 127];
    let mut dest = [0u8; 3];
    cs.get_rgb_buffer(&src, 0, 1, &mut dest, 0, 8, 0);
    assert!(dest.iter().all(|&v| v >= 245), "got {:?}", dest);
}

#[test]
fn test_lab_decode_map_is_always_default() {
    let cs = ColorSpace::Lab(Lab::new(Some(&[0.9505, 1.0, 1.089]), None, None).unwrap());
    assert!(cs.is_default_decode(Some(&[0.0, 0.5, -1.0, 1.0, 0.0, 1.0]), 8));
}

// === Indexed ===

#[test]
fn test_indexed_over_device_rgb() {
    let cs = ColorSpace::Indexed(
        Indexed::new(ColorSpace::DeviceRgb, 2, &[255, 0, 0, 0, 255, 0]).unwrap(),
    );
    let src: [u8; 2] = [0, 1];
    let mut dest = [0u8; 6];
    cs.get_rgb_buffer(&src, 0, 2, &mut dest, 0, 8, 0);
    assert_eq!(dest, [255, 0, 0, 0, 255, 0]);
}

#[test]
fn test_indexed_item_matches_base_lookup() {
    let lookup: Vec<u8> = (0u8..12).collect();
    let cs = ColorSpace::Indexed(
        Indexed::new(ColorSpace::DeviceRgb, 4, &lookup).unwrap(),
    );
    for i in 0..4usize {
        let mut via_indexed = [0u8; 3];
        cs.get_rgb_item(&[i as f32], 0, &mut via_indexed, 0);

        let mut via_base = [0u8; 3];
        ColorSpace::rgb().get_rgb_buffer(&lookup, i * 3, 1, &mut via_base, 0, 8, 0);
        assert_eq!(via_indexed, via_base);
    }
}

#[test]
fn test_indexed_over_cmyk_with_alpha_stride() {
    let lookup = [0u8, 0, 0, 0, 255, 255, 255, 255];
    let cs = ColorSpace::Indexed(
        Indexed::new(ColorSpace::DeviceCmyk, 2, &lookup).unwrap(),
    );
    let src: [u8; 2] = [0, 1];
    let mut dest = [0xEEu8; 8];
    cs.get_rgb_buffer(&src, 0, 2, &mut dest, 0, 8, 1);
    // Index 0 is no ink (white); alpha slots untouched.
    assert_eq!(&dest[0..3], &[255, 255, 255]);
    assert_eq!(dest[3], 0xEE);
    assert_eq!(dest[7], 0xEE);
    assert!(dest[4..7].iter().all(|&v| v < 20));
}

// === Alternate ===

#[test]
fn test_separation_composes_tint_with_base() {
    let cs = ColorSpace::Alternate(
        Alternate::new(
            1,
            ColorSpace::DeviceCmyk,
            boxed_tint(|src, dest| {
                dest[0] = 0.0;
                dest[1] = 0.0;
                dest[2] = 0.0;
                dest[3] = src[0];
            }),
        )
        .unwrap(),
    );
    assert_eq!(cs.num_comps(), 1);

    let src: [u8; 2] = [0, 255];
    let mut dest = [0u8; 6];
    cs.get_rgb_buffer(&src, 0, 2, &mut dest, 0, 8, 0);

    // Tint 0 is no ink; tint 1 is full key.
    assert_eq!(&dest[0..3], &[255, 255, 255]);
    let mut full_key = [0u8; 3];
    ColorSpace::cmyk().get_rgb_item(&[0.0, 0.0, 0.0, 1.0], 0, &mut full_key, 0);
    assert_eq!(&dest[3..6], &full_key);
}

#[test]
fn test_device_n_two_colorants() {
    // Two colorants averaged into a gray base.
    let cs = ColorSpace::Alternate(
        Alternate::new(
            2,
            ColorSpace::DeviceGray,
            boxed_tint(|src, dest| dest[0] = (src[0] + src[1]) / 2.0),
        )
        .unwrap(),
    );
    let src: [u8; 4] = [0, 255, 255, 255];
    let mut dest = [0u8; 6];
    cs.get_rgb_buffer(&src, 0, 2, &mut dest, 0, 8, 0);
    assert_eq!(&dest[0..3], &[128, 128, 128]);
    assert_eq!(&dest[3..6], &[255, 255, 255]);
}

#[test]
fn test_alternate_over_lab_base_stages_directly() {
    let lab = Lab::new(Some(&[0.9505, 1.0, 1.089]), None, None).unwrap();
    let cs = ColorSpace::Alternate(
        Alternate::new(
            1,
            ColorSpace::Lab(lab),
            boxed_tint(|src, dest| {
                dest[0] = src[0] * 100.0;
                dest[1] = 0.0;
                dest[2] = 0.0;
            }),
        )
        .unwrap(),
    );
    assert!(!cs.is_passthrough(8));

    let src: [u8; 1] = [255];
    let mut dest = [0u8; 3];
    cs.get_rgb_buffer(&src, 0, 1, &mut dest, 0, 8, 0);
    // Full tint is L* = 100: white.
    assert!(dest.iter().all(|&v| v >= 245), "got {:?}", dest);
}

// === Common interface invariants ===

#[test]
fn test_output_bytes_fill_exactly_the_reported_length() {
    let spaces: Vec<(ColorSpace, usize)> = vec![
        (ColorSpace::DeviceGray, 1),
        (ColorSpace::DeviceRgb, 3),
        (ColorSpace::DeviceCmyk, 4),
    ];
    for (cs, comps) in &spaces {
        for alpha01 in [0usize, 1] {
            let count = 5;
            let src = vec![7u8; count * comps];
            let expected = cs.get_output_length(src.len(), alpha01);
            // A destination of exactly the reported length must suffice.
            let mut dest = vec![0u8; expected];
            cs.get_rgb_buffer(&src, 0, count, &mut dest, 0, 8, alpha01);
        }
    }
}

#[test]
fn test_uses_zero_to_one_range() {
    assert!(ColorSpace::gray().uses_zero_to_one_range());
    assert!(ColorSpace::cmyk().uses_zero_to_one_range());
    let lab = ColorSpace::Lab(Lab::new(Some(&[0.9505, 1.0, 1.089]), None, None).unwrap());
    assert!(!lab.uses_zero_to_one_range());
}

#[test]
fn test_default_decode_per_space() {
    assert!(ColorSpace::rgb().is_default_decode(None, 8));
    assert!(ColorSpace::rgb().is_default_decode(Some(&[0.0, 1.0, 0.0, 1.0, 0.0, 1.0]), 8));
    assert!(!ColorSpace::rgb().is_default_decode(Some(&[1.0, 0.0, 0.0, 1.0, 0.0, 1.0]), 8));
    assert!(ColorSpace::gray().is_default_decode(Some(&[0.0, 1.0]), 8));
    assert!(!ColorSpace::gray().is_default_decode(Some(&[0.2, 1.0]), 8));
}

// === Raster fill ===

#[test]
fn test_fill_rgb_uses_color_map_for_indexed() {
    // 2-bit indexed raster with more pixels than palette entries takes
    // the color-map path; output must match per-pixel conversion.
    let palette = [255u8, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 0];
    let cs = ColorSpace::Indexed(
        Indexed::new(ColorSpace::DeviceRgb, 4, &palette).unwrap(),
    );
    let comps: Vec<u8> = (0..16).map(|i| (i % 4) as u8).collect();

    let mut filled = vec![0u8; 16 * 3];
    cs.fill_rgb(&mut filled, 4, 4, 4, 4, 4, 2, &comps, 0);

    let mut direct = vec![0u8; 16 * 3];
    cs.get_rgb_buffer(&comps, 0, 16, &mut direct, 0, 2, 0);
    assert_eq!(filled, direct);
}

#[test]
fn test_fill_rgb_resizes_with_nearest_neighbor() {
    // A 1x1 gray image stretched to 3x2.
    let comps: [u8; 1] = [200];
    let mut dest = vec![0u8; 18];
    ColorSpace::gray().fill_rgb(&mut dest, 1, 1, 3, 2, 1, 8, &comps, 0);
    assert!(dest.chunks(3).all(|px| px == [200, 200, 200]), "got {:?}", dest);
}

#[test]
fn test_fill_rgb_alpha_slots_untouched() {
    let comps: [u8; 4] = [0, 80, 160, 240];
    let mut dest = vec![0xABu8; 16];
    ColorSpace::gray().fill_rgb(&mut dest, 4, 1, 4, 1, 1, 8, &comps, 1);
    for px in 0..4 {
        assert_eq!(dest[px * 4 + 3], 0xAB);
        assert_eq!(dest[px * 4], comps[px]);
    }
}
