//! Terminal display for the live ASCII view.
//!
//! Draws the published frame into the alternate screen once per tick.
//! Output is batched into one string and written in a single syscall, the
//! cursor stays hidden while the view is up, and the terminal is restored
//! on drop so even error exits leave the shell usable.

use std::io::{self, Stdout, Write};

use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;

use crate::frame::AsciiFrame;

const STATUS_LINE: &str = "[s] snapshot  [t] save text  [q] quit";

/// Tracks what is currently on screen and decides when a full clear is
/// needed before drawing.
#[derive(Debug, Default)]
struct ScreenState {
    last_size: Option<(u16, u16)>,
}

impl ScreenState {
    /// Record a draw at `size`. Returns true when the screen must be wiped
    /// first (first draw, or anything may have changed underneath us).
    fn begin_frame(&mut self, size: (u16, u16)) -> bool {
        let clear = self.last_size != Some(size);
        self.last_size = Some(size);
        clear
    }

    /// Forget what is on screen; the next draw clears unconditionally.
    fn invalidate(&mut self) {
        self.last_size = None;
    }
}

/// Owns the raw-mode alternate screen for the lifetime of the live view.
pub struct Display {
    stdout: Stdout,
    screen: ScreenState,
}

impl Display {
    /// Enter raw mode and the alternate screen, hide the cursor.
    ///
    /// If any setup step after raw mode fails, raw mode is rolled back
    /// before returning so the shell is never left unusable.
    pub fn new() -> io::Result<Self> {
        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        if let Err(e) = enter_live_view(&mut stdout) {
            let _ = terminal::disable_raw_mode();
            return Err(e);
        }

        Ok(Self {
            stdout,
            screen: ScreenState::default(),
        })
    }

    /// Draw a frame at the top-left of the screen.
    pub fn draw(&mut self, frame: &AsciiFrame) -> io::Result<()> {
        let mut output = String::new();

        if self.screen.begin_frame((frame.width(), frame.height())) {
            output.push_str("\x1b[2J");
        }

        output.push_str("\x1b[H");
        for row in frame.rows() {
            output.extend(row.iter());
            // CRLF: raw mode does not translate bare newlines
            output.push_str("\r\n");
        }
        output.push_str(STATUS_LINE);

        self.stdout.write_all(output.as_bytes())?;
        self.stdout.flush()
    }

    /// Force the next draw to clear the screen first. Called after a
    /// terminal resize, when leftovers may sit outside the frame area.
    pub fn invalidate(&mut self) {
        self.screen.invalidate();
    }

    /// Show a one-line notice below the frame (export results).
    pub fn notify(&mut self, message: &str) -> io::Result<()> {
        let mut output = String::new();
        output.push_str("\r\n\x1b[2K");
        output.push_str(message);
        self.stdout.write_all(output.as_bytes())?;
        self.stdout.flush()
    }
}

fn enter_live_view(stdout: &mut Stdout) -> io::Result<()> {
    stdout.execute(EnterAlternateScreen)?;
    stdout.write_all(b"\x1b[?25l")?;
    stdout.flush()
}

impl Drop for Display {
    fn drop(&mut self) {
        // Best-effort restore; nothing useful to do if the terminal is gone
        let _ = self.stdout.write_all(b"\x1b[?25h");
        let _ = self.stdout.execute(LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}
