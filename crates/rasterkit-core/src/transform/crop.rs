//! Image cropping.

use crate::image::PixelImage;

use super::TransformError;

/// Crop the image to the `width`x`height` sub-rectangle starting at
/// `(x0, y0)`.
///
/// The sub-rectangle is copied out in the same row-major, channel-preserving
/// order, and the image dimensions become `(width, height)`.
///
/// # Errors
///
/// Returns [`TransformError::OutOfRange`] if `x0 + width` exceeds the image
/// width or `y0 + height` exceeds the image height.
pub fn crop(
    image: &mut PixelImage,
    x0: u32,
    y0: u32,
    width: u32,
    height: u32,
) -> Result<(), TransformError> {
    if u64::from(x0) + u64::from(width) > u64::from(image.width())
        || u64::from(y0) + u64::from(height) > u64::from(image.height())
    {
        return Err(TransformError::OutOfRange {
            x0,
            y0,
            width,
            height,
            image_width: image.width(),
            image_height: image.height(),
        });
    }

    let channels = image.channels() as usize;
    let src_width = image.width() as usize;
    let row_len = width as usize * channels;

    let mut output = Vec::with_capacity(height as usize * row_len);
    for y in y0..y0 + height {
        let start = channels * (y as usize * src_width + x0 as usize);
        output.extend_from_slice(&image.data()[start..start + row_len]);
    }

    image.replace_buffer(output, width, height);
    Ok(())
}


// ============================================================================
// Property-Based Tests
// ============================================================================
