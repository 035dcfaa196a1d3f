//! Image resizing under three interpolation policies.
//!
//! The ratio conventions differ per policy and are part of the output
//! contract:
//!
//! - *Nearest neighbour* maps destination `x` to `round(x / (new_w / old_w))`.
//! - *Bilinear* uses `x_ratio = (old_w - 1) / new_w`, blends the four
//!   neighbours of `floor(x_ratio * x)` and truncates each channel on store.
//! - *Bicubic* uses `x_ratio = old_w / new_w` and a Catmull-Rom style cubic
//!   convolution over a 4x4 neighbourhood clamped to the image bounds, with
//!   the result rounded and clamped to `[0, 255]`.
//!
//! Ratios are computed in `f32`; the cubic kernel runs in `f64`.

use serde::{Deserialize, Serialize};

use crate::image::PixelImage;

use super::TransformError;

/// Interpolation policy for [`resize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Interpolation {
    /// Nearest-neighbour sampling (fastest, lowest quality).
    #[default]
    NearestNeighbour,
    /// Bilinear blending of the four nearest source pixels.
    Bilinear,
    /// Cubic convolution over a 4x4 neighbourhood (slowest, smoothest).
    Bicubic,
}

/// Resize the image to `width`x`height` in place.
///
/// Channel count is preserved; with 4-channel images alpha is interpolated
/// the same way as the color channels.
///
/// # Errors
///
/// Returns [`TransformError::InvalidDimensions`] if either target dimension
/// is zero, or if the source image is empty (there is nothing to sample).
pub fn resize(
    image: &mut PixelImage,
    width: u32,
    height: u32,
    mode: Interpolation,
) -> Result<(), TransformError> {
    if width == 0 || height == 0 {
        return Err(TransformError::InvalidDimensions { width, height });
    }
    if image.is_empty() {
        return Err(TransformError::InvalidDimensions {
            width: image.width(),
            height: image.height(),
        });
    }

    let output = match mode {
        Interpolation::NearestNeighbour => resize_nearest(image, width, height),
        Interpolation::Bilinear => resize_bilinear(image, width, height),
        Interpolation::Bicubic => resize_bicubic(image, width, height),
    };

    image.replace_buffer(output, width, height);
    Ok(())
}

#[inline]
fn sample(data: &[u8], width: usize, channels: usize, x: usize, y: usize, ch: usize) -> u8 {
    data[channels * (y * width + x) + ch]
}

fn resize_nearest(image: &PixelImage, width: u32, height: u32) -> Vec<u8> {
    let src_w = image.width() as usize;
    let src_h = image.height() as usize;
    let channels = image.channels() as usize;
    let src = image.data();

    let x_ratio = width as f32 / src_w as f32;
    let y_ratio = height as f32 / src_h as f32;

    let mut output = Vec::with_capacity(width as usize * height as usize * channels);
    for y in 0..height {
        let sy = ((y as f32 / y_ratio).round() as usize).min(src_h - 1);
        for x in 0..width {
            let sx = ((x as f32 / x_ratio).round() as usize).min(src_w - 1);
            let from = channels * (sy * src_w + sx);
            output.extend_from_slice(&src[from..from + channels]);
        }
    }
    output
}

fn resize_bilinear(image: &PixelImage, width: u32, height: u32) -> Vec<u8> {
    let src_w = image.width() as usize;
    let src_h = image.height() as usize;
    let channels = image.channels() as usize;
    let src = image.data();

    let x_ratio = (src_w - 1) as f32 / width as f32;
    let y_ratio = (src_h - 1) as f32 / height as f32;

    let mut output = Vec::with_capacity(width as usize * height as usize * channels);
    for y in 0..height {
        let sy = (y_ratio * y as f32) as usize;
        let y_diff = y_ratio * y as f32 - sy as f32;
        let sy1 = (sy + 1).min(src_h - 1);

        for x in 0..width {
            let sx = (x_ratio * x as f32) as usize;
            let x_diff = x_ratio * x as f32 - sx as f32;
            let sx1 = (sx + 1).min(src_w - 1);

            for ch in 0..channels {
                let q11 = sample(src, src_w, channels, sx, sy, ch) as f32;
                let q21 = sample(src, src_w, channels, sx1, sy, ch) as f32;
                let q12 = sample(src, src_w, channels, sx, sy1, ch) as f32;
                let q22 = sample(src, src_w, channels, sx1, sy1, ch) as f32;

                let value = q11 * (1.0 - x_diff) * (1.0 - y_diff)
                    + q21 * x_diff * (1.0 - y_diff)
                    + q12 * y_diff * (1.0 - x_diff)
                    + q22 * x_diff * y_diff;

                // Truncate on store.
                output.push(value as u8);
            }
        }
    }
    output
}

/// Catmull-Rom style 1-D cubic convolution through four samples.
fn cubic_interpolate(q: [f64; 4], t: f64) -> f64 {
    q[1] + 0.5
        * t
        * (q[2] - q[0]
            + t * (2.0 * q[0] - 5.0 * q[1] + 4.0 * q[2] - q[3]
                + t * (3.0 * (q[1] - q[2]) + q[3] - q[0])))
}

fn bicubic_interpolate(q: &[[f64; 4]; 4], tx: f64, ty: f64) -> f64 {
    let columns = [
        cubic_interpolate(q[0], ty),
        cubic_interpolate(q[1], ty),
        cubic_interpolate(q[2], ty),
        cubic_interpolate(q[3], ty),
    ];
    cubic_interpolate(columns, tx)
}

fn resize_bicubic(image: &PixelImage, width: u32, height: u32) -> Vec<u8> {
    let src_w = image.width() as usize;
    let src_h = image.height() as usize;
    let channels = image.channels() as usize;
    let src = image.data();

    let x_ratio = src_w as f32 / width as f32;
    let y_ratio = src_h as f32 / height as f32;

    let mut output = Vec::with_capacity(width as usize * height as usize * channels);
    for y in 0..height {
        let y_origin = y_ratio * y as f32;
        let y_floor = y_origin.floor();
        let y_frac = (y_origin - y_floor) as f64;

        for x in 0..width {
            let x_origin = x_ratio * x as f32;
            let x_floor = x_origin.floor();
            let x_frac = (x_origin - x_floor) as f64;

            for ch in 0..channels {
                let mut q = [[0f64; 4]; 4];
                for (i, row) in q.iter_mut().enumerate() {
                    let ty = (y_floor as i64 + i as i64 - 1).clamp(0, src_h as i64 - 1) as usize;
                    for (j, value) in row.iter_mut().enumerate() {
                        let tx =
                            (x_floor as i64 + j as i64 - 1).clamp(0, src_w as i64 - 1) as usize;
                        *value = sample(src, src_w, channels, tx, ty, ch) as f64;
                    }
                }
                let value = bicubic_interpolate(&q, x_frac, y_frac);
                output.push(value.round().clamp(0.0, 255.0) as u8);
            }
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_image(width: u32, height: u32, channels: u8) -> PixelImage {
        let mut data = Vec::with_capacity((width * height * channels as u32) as usize);
        for y in 0..height {
            for x in 0..width {
                for ch in 0..channels {
                    data.push(((x * 17 + y * 31 + ch as u32 * 7) % 256) as u8);
                }
            }
        }
        PixelImage::from_raw(width, height, channels, data)
    }

    #[test]
    fn test_nearest_identity_resize() {
        let mut img = gradient_image(7, 5, 3);
        let original = img.clone();
        resize(&mut img, 7, 5, Interpolation::NearestNeighbour).unwrap();
        assert_eq!(img, original);
    }

    #[test]
    fn test_bicubic_identity_resize() {
        // At a 1:1 ratio every fractional offset is zero and the kernel
        // reduces to the center sample.
        let mut img = gradient_image(6, 4, 3);
        let original = img.clone();
        resize(&mut img, 6, 4, Interpolation::Bicubic).unwrap();
        assert_eq!(img, original);
    }

    #[test]
    fn test_nearest_upscale_replicates_pixels() {
        let mut img = PixelImage::from_raw(2, 1, 3, vec![10, 10, 10, 200, 200, 200]);
        resize(&mut img, 4, 1, Interpolation::NearestNeighbour).unwrap();

        // x_ratio = 2; destination 0, 1 -> source round(0/2)=0, round(1/2)=1?
        // round(0.5) rounds half away from zero, so dst 1 maps to source 1.
        assert_eq!(img.width(), 4);
        assert_eq!(img.get_pixel(0, 0).unwrap().r, 10);
        assert_eq!(img.get_pixel(3, 0).unwrap().r, 200);
    }

    #[test]
    fn test_bilinear_constant_image_stays_constant() {
        let mut img = PixelImage::from_raw(4, 4, 3, vec![128; 48]);
        resize(&mut img, 9, 6, Interpolation::Bilinear).unwrap();
        assert_eq!(img.width(), 9);
        assert_eq!(img.height(), 6);
        // Truncation on store may shave one level off when the blended
        // weights round just below the exact value.
        assert!(img.data().iter().all(|&b| b == 128 || b == 127));
    }

    #[test]
    fn test_bilinear_known_midpoint() {
        // 2x1 image, values 0 and 100. Destination width 2 gives
        // x_ratio = 0.5; dst 1 samples at 0.5 between both pixels.
        let mut img = PixelImage::from_raw(2, 1, 3, vec![0, 0, 0, 100, 100, 100]);
        resize(&mut img, 2, 1, Interpolation::Bilinear).unwrap();
        assert_eq!(img.get_pixel(0, 0).unwrap().r, 0);
        assert_eq!(img.get_pixel(1, 0).unwrap().r, 50);
    }

    #[test]
    fn test_bicubic_constant_image_stays_constant() {
        let mut img = PixelImage::from_raw(5, 5, 3, vec![77; 75]);
        resize(&mut img, 8, 3, Interpolation::Bicubic).unwrap();
        assert!(img.data().iter().all(|&b| b == 77));
    }

    #[test]
    fn test_resize_preserves_channels_and_alpha() {
        let mut img = gradient_image(4, 4, 4);
        resize(&mut img, 8, 8, Interpolation::Bilinear).unwrap();
        assert_eq!(img.channels(), 4);
        assert_eq!(img.byte_size(), 8 * 8 * 4);
    }

    #[test]
    fn test_resize_zero_dimension_fails() {
        let mut img = gradient_image(4, 4, 3);
        assert!(matches!(
            resize(&mut img, 0, 4, Interpolation::NearestNeighbour),
            Err(TransformError::InvalidDimensions { .. })
        ));
        assert_eq!(img.width(), 4);
    }

    #[test]
    fn test_resize_empty_source_fails() {
        for mode in [
            Interpolation::NearestNeighbour,
            Interpolation::Bilinear,
            Interpolation::Bicubic,
        ] {
            let mut img = PixelImage::new(0, 0, 3);
            assert!(matches!(
                resize(&mut img, 4, 4, mode),
                Err(TransformError::InvalidDimensions { .. })
            ));
        }
    }

    #[test]
    fn test_cubic_kernel_interpolates_endpoints() {
        let q = [10.0, 20.0, 30.0, 40.0];
        assert_eq!(cubic_interpolate(q, 0.0), 20.0);
        assert_eq!(cubic_interpolate(q, 1.0), 30.0);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
