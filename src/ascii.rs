//! Brightness mapping and glyph rendering.
//!
//! Converts a sampled RGBA pixel grid into an `AsciiFrame`: per-cell
//! brightness is the unweighted mean of the R, G and B channels (alpha
//! ignored), and each brightness value picks a character from a fixed ramp.
//!
//! The mean is deliberately NOT a perceptual luma formula, and it is kept
//! fractional all the way to the ramp lookup: the index is computed from the
//! raw channel sum in one division, so `floor(mean / 255 * (N-1))` is exact.
//! The ramp, the mean and the index rule together define the exact visual
//! output, so none of the three is tweakable independently.

use crate::frame::AsciiFrame;
use crate::sampler::PixelBuffer;

/// The glyph ramp, densest first.
///
/// Brightness 0 maps to `@`, brightness 255 maps to a space. Constant for
/// the process lifetime.
pub const GLYPH_RAMP: &[char] = &['@', '%', '#', '*', '+', '=', '-', ':', '.', ' '];

/// Sum of the R, G and B channels of one RGBA sample, in [0, 765].
///
/// The pipeline carries this sum instead of the mean so the fractional part
/// survives until the ramp lookup.
pub fn channel_sum(r: u8, g: u8, b: u8) -> u16 {
    r as u16 + g as u16 + b as u16
}

/// Brightness of one RGBA sample: the arithmetic mean of R, G and B.
///
/// Always in [0, 255] since each channel is.
pub fn brightness(r: u8, g: u8, b: u8) -> u8 {
    (channel_sum(r, g, b) / 3) as u8
}

/// Map a channel sum to an index into a ramp of `ramp_len` characters.
///
/// Exact floor of `sum / 3 / 255 * (ramp_len - 1)`: the single division by
/// 765 keeps the fractional mean, so e.g. sum 85 (mean 28.33) lands on
/// index 1 rather than rounding down through a u8 first. The result is
/// always in [0, ramp_len - 1] for any `ramp_len >= 1` and `sum <= 765`.
pub fn glyph_index_from_sum(sum: u16, ramp_len: usize) -> usize {
    if ramp_len <= 1 {
        return 0;
    }
    sum as usize * (ramp_len - 1) / 765
}

/// Map an already-averaged brightness value to a ramp index.
pub fn glyph_index(value: u8, ramp_len: usize) -> usize {
    glyph_index_from_sum(value as u16 * 3, ramp_len)
}

/// Compute the channel-sum grid for a pixel buffer, one value per cell.
///
/// The output buffer is cleared and refilled; reusing it across ticks avoids
/// an allocation per frame.
pub fn channel_sum_grid_into(pixels: &PixelBuffer, out: &mut Vec<u16>) {
    out.clear();
    out.reserve(pixels.len());

    for px in pixels.data.chunks_exact(PixelBuffer::BYTES_PER_PIXEL) {
        out.push(channel_sum(px[0], px[1], px[2]));
    }
}

/// Render a pixel buffer to an ASCII frame using the given ramp.
///
/// `invert` flips brightness before the ramp lookup, for terminals with a
/// light background.
pub fn render(pixels: &PixelBuffer, ramp: &[char], invert: bool) -> AsciiFrame {
    let mut grid = Vec::new();
    channel_sum_grid_into(pixels, &mut grid);
    render_sums(&grid, pixels.width, pixels.height, ramp, invert)
}

/// Render a channel-sum grid to an ASCII frame.
pub fn render_sums(
    grid: &[u16],
    width: u16,
    height: u16,
    ramp: &[char],
    invert: bool,
) -> AsciiFrame {
    debug_assert_eq!(grid.len(), (width as usize) * (height as usize));

    if ramp.is_empty() {
        return AsciiFrame::blank(width, height);
    }

    let chars = grid
        .iter()
        .map(|&s| {
            let s = if invert { 765 - s } else { s };
            ramp[glyph_index_from_sum(s, ramp.len())]
        })
        .collect();

    AsciiFrame::from_chars(chars, width, height)
}
