//! Vertical flip and 90-degree rotations.
//!
//! Rotations rebuild the buffer with inverse index mapping: the pixel at
//! source `(x, y)` lands at buffer offset `channels * ((height - y - 1) +
//! height * x)` for clockwise and `channels * (y + height * x)` for
//! counter-clockwise, where `height` is the source height and becomes the
//! new row width. Four clockwise rotations therefore return the original
//! buffer exactly.

use crate::image::PixelImage;

/// Mirror the image vertically: row `y` swaps with row `height - 1 - y`.
/// Dimensions are unchanged.
pub fn flip(image: &mut PixelImage) {
    let row_len = image.width() as usize * image.channels() as usize;
    let height = image.height() as usize;
    let data = image.data_mut();

    for y in 0..height / 2 {
        let (head, tail) = data.split_at_mut((height - 1 - y) * row_len);
        let top = &mut head[y * row_len..(y + 1) * row_len];
        top.swap_with_slice(&mut tail[..row_len]);
    }
}

/// Rotate the image 90 degrees clockwise. Output dimensions are the input
/// dimensions swapped.
pub fn rotate_clockwise(image: &mut PixelImage) {
    rotate(image, true);
}

/// Rotate the image 90 degrees counter-clockwise. Output dimensions are the
/// input dimensions swapped.
pub fn rotate_counterclockwise(image: &mut PixelImage) {
    rotate(image, false);
}

fn rotate(image: &mut PixelImage, clockwise: bool) {
    let width = image.width() as usize;
    let height = image.height() as usize;
    let channels = image.channels() as usize;

    let mut output = vec![0u8; image.byte_size()];
    let src = image.data();

    for y in 0..height {
        for x in 0..width {
            let from = channels * (y * width + x);
            let row = if clockwise { height - 1 - y } else { y };
            let to = channels * (row + height * x);
            output[to..to + channels].copy_from_slice(&src[from..from + channels]);
        }
    }

    let (new_width, new_height) = (image.height(), image.width());
    image.replace_buffer(output, new_width, new_height);
}


// ============================================================================
// Property-Based Tests
// ============================================================================
