//! Frame sampler: scales a camera frame down into a fixed-size pixel grid.
//!
//! The sampler owns a small off-screen RGBA surface (150x90 by default) and
//! overwrites it every tick with the current video frame, box-averaging all
//! source pixels that fall into each cell. Nothing is retained across ticks.

use crate::camera::Frame;

/// A fixed-size RGBA pixel grid, 4 bytes per sample, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    /// RGBA samples
    pub data: Vec<u8>,
    /// Grid width in cells
    pub width: u16,
    /// Grid height in cells
    pub height: u16,
}

impl PixelBuffer {
    pub const BYTES_PER_PIXEL: usize = 4;

    /// An all-black, fully opaque buffer.
    pub fn black(width: u16, height: u16) -> Self {
        let cells = (width as usize) * (height as usize);
        let mut data = vec![0u8; cells * Self::BYTES_PER_PIXEL];
        for px in data.chunks_exact_mut(Self::BYTES_PER_PIXEL) {
            px[3] = 255;
        }
        Self {
            data,
            width,
            height,
        }
    }

    /// Number of cells in the grid.
    pub fn len(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// RGBA sample at (x, y). Out-of-range coordinates return `None`.
    pub fn get(&self, x: u16, y: u16) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * Self::BYTES_PER_PIXEL;
        Some([
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ])
    }
}

/// Scales camera frames into the fixed target grid.
///
/// The scratch buffer is allocated once and reused; `sample()` overwrites it
/// completely on every call.
#[derive(Debug)]
pub struct FrameSampler {
    scratch: PixelBuffer,
}

impl FrameSampler {
    /// Create a sampler for a W x H target grid.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            scratch: PixelBuffer::black(width, height),
        }
    }

    pub fn width(&self) -> u16 {
        self.scratch.width
    }

    pub fn height(&self) -> u16 {
        self.scratch.height
    }

    /// Sample a camera frame into the target grid.
    ///
    /// Each grid cell covers a rectangle of source pixels; its RGBA value is
    /// the per-channel average of that rectangle. The returned reference is
    /// only valid until the next `sample()` call overwrites the scratch
    /// buffer.
    ///
    /// The frame must have at least one decoded pixel; callers skip the tick
    /// entirely when no frame is available rather than sampling stale data.
    pub fn sample(&mut self, frame: &Frame) -> &PixelBuffer {
        let grid_w = self.scratch.width as usize;
        let grid_h = self.scratch.height as usize;

        if grid_w == 0 || grid_h == 0 || frame.width == 0 || frame.height == 0 {
            return &self.scratch;
        }

        let cell_w = frame.width as f32 / grid_w as f32;
        let cell_h = frame.height as f32 / grid_h as f32;
        let bpp = Frame::BYTES_PER_PIXEL;

        for cy in 0..grid_h {
            for cx in 0..grid_w {
                let start_x = (cx as f32 * cell_w) as u32;
                let end_x = (((cx + 1) as f32 * cell_w) as u32).max(start_x + 1);
                let start_y = (cy as f32 * cell_h) as u32;
                let end_y = (((cy + 1) as f32 * cell_h) as u32).max(start_y + 1);

                let mut sum = [0u32; 4];
                let mut count = 0u32;

                for py in start_y..end_y.min(frame.height) {
                    for px in start_x..end_x.min(frame.width) {
                        let idx = (py * frame.width + px) as usize * bpp;
                        if idx + 3 < frame.data.len() {
                            sum[0] += frame.data[idx] as u32;
                            sum[1] += frame.data[idx + 1] as u32;
                            sum[2] += frame.data[idx + 2] as u32;
                            sum[3] += frame.data[idx + 3] as u32;
                            count += 1;
                        }
                    }
                }

                let out = (cy * grid_w + cx) * PixelBuffer::BYTES_PER_PIXEL;
                if count > 0 {
                    self.scratch.data[out] = (sum[0] / count) as u8;
                    self.scratch.data[out + 1] = (sum[1] / count) as u8;
                    self.scratch.data[out + 2] = (sum[2] / count) as u8;
                    self.scratch.data[out + 3] = (sum[3] / count) as u8;
                } else {
                    self.scratch.data[out..out + 4].copy_from_slice(&[0, 0, 0, 255]);
                }
            }
        }

        &self.scratch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn rgba_frame(data: Vec<u8>, width: u32, height: u32) -> Frame {
        Frame {
            data,
            width,
            height,
            timestamp: Instant::now(),
        }
    }

    /// A frame where every pixel is the same RGBA value.
    fn uniform_frame(value: [u8; 4], width: u32, height: u32) -> Frame {
        let mut data = Vec::with_capacity((width * height) as usize * 4);
        for _ in 0..width * height {
            data.extend_from_slice(&value);
        }
        rgba_frame(data, width, height)
    }

    #[test]
    fn test_black_buffer_is_opaque() {
        let buf = PixelBuffer::black(3, 2);
        assert_eq!(buf.len(), 6);
        for y in 0..2 {
            for x in 0..3 {
                assert_eq!(buf.get(x, y), Some([0, 0, 0, 255]));
            }
        }
    }

    #[test]
    fn test_get_out_of_range() {
        let buf = PixelBuffer::black(2, 2);
        assert_eq!(buf.get(2, 0), None);
        assert_eq!(buf.get(0, 2), None);
    }

    #[test]
    fn test_sample_uniform_frame() {
        // Any downscale of a uniform frame stays uniform
        let mut sampler = FrameSampler::new(4, 2);
        let frame = uniform_frame([120, 60, 30, 255], 16, 8);
        let grid = sampler.sample(&frame);
        for y in 0..2 {
            for x in 0..4 {
                assert_eq!(grid.get(x, y), Some([120, 60, 30, 255]));
            }
        }
    }

    #[test]
    fn test_sample_identity_size() {
        // Grid the same size as the frame copies pixels through
        let mut sampler = FrameSampler::new(2, 1);
        let frame = rgba_frame(vec![10, 20, 30, 255, 200, 210, 220, 255], 2, 1);
        let grid = sampler.sample(&frame);
        assert_eq!(grid.get(0, 0), Some([10, 20, 30, 255]));
        assert_eq!(grid.get(1, 0), Some([200, 210, 220, 255]));
    }

    #[test]
    fn test_sample_averages_cells() {
        // 4x1 frame into 2x1 grid: each cell averages two pixels
        let mut sampler = FrameSampler::new(2, 1);
        let frame = rgba_frame(
            vec![
                0, 0, 0, 255, 100, 100, 100, 255, //
                200, 200, 200, 255, 250, 250, 250, 255,
            ],
            4,
            1,
        );
        let grid = sampler.sample(&frame);
        assert_eq!(grid.get(0, 0), Some([50, 50, 50, 255]));
        assert_eq!(grid.get(1, 0), Some([225, 225, 225, 255]));
    }

    #[test]
    fn test_sample_overwrites_previous_tick() {
        let mut sampler = FrameSampler::new(1, 1);
        let white = uniform_frame([255, 255, 255, 255], 4, 4);
        let black = uniform_frame([0, 0, 0, 255], 4, 4);

        assert_eq!(sampler.sample(&white).get(0, 0), Some([255, 255, 255, 255]));
        assert_eq!(sampler.sample(&black).get(0, 0), Some([0, 0, 0, 255]));
    }

    #[test]
    fn test_sample_upscale_does_not_panic() {
        // Grid larger than the frame: cells clamp to at least one source pixel
        let mut sampler = FrameSampler::new(8, 8);
        let frame = uniform_frame([42, 42, 42, 255], 2, 2);
        let grid = sampler.sample(&frame);
        assert_eq!(grid.len(), 64);
        assert_eq!(grid.get(7, 7), Some([42, 42, 42, 255]));
    }
}
