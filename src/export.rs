//! Export of the current ASCII frame: plain text and PNG snapshot.
//!
//! The text export is the raw frame text, byte for byte. The snapshot
//! renders each character cell from a small built-in 8x8 glyph atlas at 2x
//! scale, green on black, and hands the pixels to the `image` crate for
//! PNG encoding.

use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};

use crate::ascii::GLYPH_RAMP;
use crate::frame::AsciiFrame;

/// Glyph cell edge in atlas pixels.
pub const GLYPH_PIXELS: u32 = 8;
/// Snapshot upscale factor.
pub const SNAPSHOT_SCALE: u32 = 2;

const FOREGROUND: Rgb<u8> = Rgb([0, 255, 0]);
const BACKGROUND: Rgb<u8> = Rgb([0, 0, 0]);

/// Errors from export operations. These are reported to the user but never
/// stop the render loop.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("nothing rendered yet, try again once the camera delivers a frame")]
    EmptyFrame,

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] image::ImageError),
}

/// 8x8 bitmaps for the ramp characters, one byte per row, bit 7 leftmost.
///
/// Indexed in ramp order (`@` first, space last), so on-pixel counts fall
/// monotonically enough that the snapshot reads like the terminal view.
const GLYPH_ROWS: [[u8; 8]; 10] = [
    // '@'
    [
        0b0011_1100,
        0b0100_0010,
        0b1001_1101,
        0b1010_0101,
        0b1010_0101,
        0b1001_1110,
        0b0100_0000,
        0b0011_1100,
    ],
    // '%'
    [
        0b0110_0001,
        0b1001_0010,
        0b1001_0100,
        0b0110_1000,
        0b0001_0110,
        0b0010_1001,
        0b0100_1001,
        0b1000_0110,
    ],
    // '#'
    [
        0b0010_0100,
        0b0010_0100,
        0b1111_1111,
        0b0010_0100,
        0b0010_0100,
        0b1111_1111,
        0b0010_0100,
        0b0010_0100,
    ],
    // '*'
    [
        0b0000_0000,
        0b0001_1000,
        0b0101_1010,
        0b0011_1100,
        0b0011_1100,
        0b0101_1010,
        0b0001_1000,
        0b0000_0000,
    ],
    // '+'
    [
        0b0000_0000,
        0b0001_1000,
        0b0001_1000,
        0b0111_1110,
        0b0001_1000,
        0b0001_1000,
        0b0000_0000,
        0b0000_0000,
    ],
    // '='
    [
        0b0000_0000,
        0b0000_0000,
        0b0111_1110,
        0b0000_0000,
        0b0111_1110,
        0b0000_0000,
        0b0000_0000,
        0b0000_0000,
    ],
    // '-'
    [
        0b0000_0000,
        0b0000_0000,
        0b0000_0000,
        0b0111_1110,
        0b0000_0000,
        0b0000_0000,
        0b0000_0000,
        0b0000_0000,
    ],
    // ':'
    [
        0b0000_0000,
        0b0001_1000,
        0b0001_1000,
        0b0000_0000,
        0b0000_0000,
        0b0001_1000,
        0b0001_1000,
        0b0000_0000,
    ],
    // '.'
    [
        0b0000_0000,
        0b0000_0000,
        0b0000_0000,
        0b0000_0000,
        0b0000_0000,
        0b0000_0000,
        0b0001_1000,
        0b0001_1000,
    ],
    // ' '
    [0, 0, 0, 0, 0, 0, 0, 0],
];

/// Bitmap for a ramp character. Characters outside the ramp draw blank.
fn glyph_rows(c: char) -> &'static [u8; 8] {
    GLYPH_RAMP
        .iter()
        .position(|&r| r == c)
        .map(|i| &GLYPH_ROWS[i])
        .unwrap_or(&GLYPH_ROWS[9])
}

/// Default path for the text export in `dir`.
pub fn default_text_path(dir: &Path) -> PathBuf {
    dir.join("ascii-cam-ascii.txt")
}

/// Default path for the PNG snapshot in `dir`.
pub fn default_snapshot_path(dir: &Path) -> PathBuf {
    dir.join("ascii-cam-snapshot.png")
}

/// Write the frame's text block to `path`.
pub fn save_text(frame: &AsciiFrame, path: &Path) -> Result<(), ExportError> {
    if frame.is_empty() {
        return Err(ExportError::EmptyFrame);
    }

    std::fs::write(path, frame.to_text()).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Rasterize the frame to an RGB image, green on black, 2x scale.
pub fn rasterize(frame: &AsciiFrame) -> RgbImage {
    let cell = GLYPH_PIXELS * SNAPSHOT_SCALE;
    let img_w = frame.width() as u32 * cell;
    let img_h = frame.height() as u32 * cell;
    let mut img = RgbImage::from_pixel(img_w.max(1), img_h.max(1), BACKGROUND);

    for (row_idx, row) in frame.rows().enumerate() {
        for (col_idx, &c) in row.iter().enumerate() {
            let rows = glyph_rows(c);
            let base_x = col_idx as u32 * cell;
            let base_y = row_idx as u32 * cell;

            for (gy, &mask) in rows.iter().enumerate() {
                for gx in 0..GLYPH_PIXELS {
                    if (mask >> (7 - gx)) & 1 == 0 {
                        continue;
                    }
                    for dy in 0..SNAPSHOT_SCALE {
                        for dx in 0..SNAPSHOT_SCALE {
                            let x = base_x + gx * SNAPSHOT_SCALE + dx;
                            let y = base_y + gy as u32 * SNAPSHOT_SCALE + dy;
                            img.put_pixel(x, y, FOREGROUND);
                        }
                    }
                }
            }
        }
    }

    img
}

/// Render the frame and save it as a PNG at `path`.
pub fn save_snapshot(frame: &AsciiFrame, path: &Path) -> Result<(), ExportError> {
    if frame.is_empty() {
        return Err(ExportError::EmptyFrame);
    }

    let img = rasterize(frame);
    img.save(path)?;
    Ok(())
}
