//! The ASCII frame type: the textual output of one render tick.

/// A rendered ASCII frame.
///
/// Holds a fixed-size character grid in row-major order. This is the only
/// state that outlives a single render tick: the render loop publishes a new
/// frame each tick and readers see the most recent one until it is replaced.
///
/// Invariant: `chars.len() == width * height`, always. Partial frames are
/// never constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsciiFrame {
    /// Character grid in row-major order
    chars: Vec<char>,
    /// Width in characters
    width: u16,
    /// Height in characters
    height: u16,
}

impl Default for AsciiFrame {
    fn default() -> Self {
        Self::blank(0, 0)
    }
}

impl AsciiFrame {
    /// Create an all-space frame with the given dimensions.
    pub fn blank(width: u16, height: u16) -> Self {
        let size = (width as usize) * (height as usize);
        Self {
            chars: vec![' '; size],
            width,
            height,
        }
    }

    /// Create a frame from a character vector.
    ///
    /// # Panics
    /// Panics if `chars.len() != width * height`. Callers assemble the grid
    /// themselves, so a mismatch is a programming error, not a runtime
    /// condition.
    pub fn from_chars(chars: Vec<char>, width: u16, height: u16) -> Self {
        assert_eq!(
            chars.len(),
            (width as usize) * (height as usize),
            "character grid does not match {}x{}",
            width,
            height
        );
        Self {
            chars,
            width,
            height,
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// True if the frame has no cells (nothing has been rendered yet).
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Iterate over the rows of the frame.
    pub fn rows(&self) -> impl Iterator<Item = &[char]> {
        self.chars.chunks(self.width.max(1) as usize)
    }

    /// Convert the frame to its text block form.
    ///
    /// Every row is terminated by a newline, including the last one, so a
    /// 2x1 frame of `@` and space becomes `"@ \n"`.
    pub fn to_text(&self) -> String {
        if self.width == 0 || self.height == 0 {
            return String::new();
        }

        let mut text = String::with_capacity((self.width as usize + 1) * self.height as usize);
        for row in self.rows() {
            text.extend(row.iter());
            text.push('\n');
        }
        text
    }
}
