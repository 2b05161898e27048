//! End-to-end tests for the pixel -> brightness -> glyph pipeline.

use ascii_cam::ascii::{self, brightness, glyph_index, glyph_index_from_sum, GLYPH_RAMP};
use ascii_cam::camera::Frame;
use ascii_cam::sampler::{FrameSampler, PixelBuffer};
use std::time::Instant;

fn rgba_frame(data: Vec<u8>, width: u32, height: u32) -> Frame {
    Frame {
        data,
        width,
        height,
        timestamp: Instant::now(),
    }
}

fn buffer_from_pixels(pixels: &[[u8; 4]], width: u16, height: u16) -> PixelBuffer {
    let mut buf = PixelBuffer::black(width, height);
    buf.data.clear();
    for px in pixels {
        buf.data.extend_from_slice(px);
    }
    buf
}

// ==================== Brightness Mapping Tests ====================

#[test]
fn test_brightness_always_in_range() {
    // u8 output already bounds it; check the mean never wraps on the way
    for r in (0..=255u16).step_by(17) {
        for g in (0..=255u16).step_by(17) {
            for b in (0..=255u16).step_by(17) {
                let v = brightness(r as u8, g as u8, b as u8);
                let expected = (r + g + b) / 3;
                assert_eq!(v as u16, expected);
            }
        }
    }
}

#[test]
fn test_glyph_index_in_range_for_any_ramp_length() {
    for ramp_len in 1..=16usize {
        for v in 0..=255u8 {
            let idx = glyph_index(v, ramp_len);
            assert!(
                idx < ramp_len,
                "index {} out of range for ramp of {}",
                idx,
                ramp_len
            );
        }
    }
}

// ==================== Frame Shape Tests ====================

#[test]
fn test_rendered_frame_has_exact_dimensions() {
    let buf = PixelBuffer::black(7, 5);
    let frame = ascii::render(&buf, GLYPH_RAMP, false);

    assert_eq!(frame.width(), 7);
    assert_eq!(frame.height(), 5);

    let text = frame.to_text();
    let lines: Vec<&str> = text.split_terminator('\n').collect();
    assert_eq!(lines.len(), 5);
    for line in lines {
        assert_eq!(line.chars().count(), 7);
    }
}

#[test]
fn test_rendering_is_idempotent() {
    let buf = buffer_from_pixels(
        &[
            [0, 0, 0, 255],
            [80, 120, 40, 255],
            [200, 200, 200, 255],
            [255, 255, 255, 255],
        ],
        2,
        2,
    );
    let first = ascii::render(&buf, GLYPH_RAMP, false);
    let second = ascii::render(&buf, GLYPH_RAMP, false);
    assert_eq!(first, second);
    assert_eq!(first.to_text(), second.to_text());
}

// ==================== Extreme Value Tests ====================

#[test]
fn test_black_maps_to_densest_glyph() {
    let buf = PixelBuffer::black(1, 1);
    assert_eq!(ascii::render(&buf, GLYPH_RAMP, false).to_text(), "@\n");
}

#[test]
fn test_white_maps_to_space() {
    let buf = buffer_from_pixels(&[[255, 255, 255, 255]], 1, 1);
    assert_eq!(ascii::render(&buf, GLYPH_RAMP, false).to_text(), " \n");
}

#[test]
fn test_black_and_white_pair() {
    // One black cell, one white cell on a single row
    let buf = buffer_from_pixels(&[[0, 0, 0, 255], [255, 255, 255, 255]], 2, 1);
    let frame = ascii::render(&buf, GLYPH_RAMP, false);
    assert_eq!(frame.to_text(), "@ \n");
}

// ==================== Camera Frame Pipeline Tests ====================

#[test]
fn test_camera_frame_to_text() {
    // 4x2 frame, left half black, right half white, sampled into 2x1.
    // Row-major: each row is black black white white.
    let mut rows = Vec::new();
    for _ in 0..2 {
        rows.extend_from_slice(&[
            0, 0, 0, 255, 0, 0, 0, 255, //
            255, 255, 255, 255, 255, 255, 255, 255,
        ]);
    }
    let frame = rgba_frame(rows, 4, 2);

    let mut sampler = FrameSampler::new(2, 1);
    let pixels = sampler.sample(&frame);
    let rendered = ascii::render(pixels, GLYPH_RAMP, false);
    assert_eq!(rendered.to_text(), "@ \n");
}

#[test]
fn test_gray_midtone_lands_mid_ramp() {
    let buf = buffer_from_pixels(&[[128, 128, 128, 255]], 1, 1);
    let frame = ascii::render(&buf, GLYPH_RAMP, false);
    // floor(128 / 255 * 9) = 4 -> '+'
    assert_eq!(frame.to_text(), "+\n");
}

#[test]
fn test_uneven_channels_keep_their_fractional_mean() {
    // Mean 28.33 sits just past the first ramp boundary (255/9 = 28.33), so
    // the pixel must render as '%'; a mean truncated to 28 would give '@'.
    let buf = buffer_from_pixels(&[[28, 28, 29, 255]], 1, 1);
    assert_eq!(ascii::render(&buf, GLYPH_RAMP, false).to_text(), "%\n");

    // Same one step above the second boundary (mean 56.67)
    let buf = buffer_from_pixels(&[[56, 57, 57, 255]], 1, 1);
    assert_eq!(ascii::render(&buf, GLYPH_RAMP, false).to_text(), "#\n");
}

#[test]
fn test_sum_index_in_range_for_any_ramp_length() {
    for ramp_len in 1..=16usize {
        for sum in 0..=765u16 {
            assert!(glyph_index_from_sum(sum, ramp_len) < ramp_len);
        }
    }
}
