//! Console keypad and display for the keypad node.
//!
//! [`ConsoleKeypad`] maps characters from any [`Read`] source onto
//! [`Key`]s: `0`–`9`, `+`, `-`, and everything else as [`Key::Other`].
//! Whitespace is skipped.  On the device it reads the USB/UART console,
//! whose stdin returns no data until a key arrives, so the keypad
//! polls instead of treating an empty read as the end of input.
//!
//! [`ConsoleDisplay`] keeps a 16×2 character frame and logs it whenever
//! a write changes a line.

use std::io::{ErrorKind, Read};

use heapless::String;
use log::{debug, info};

use crate::app::ports::{DisplayPort, Key, KeypadPort};
use crate::error::InputError;

pub const DISPLAY_COLS: usize = 16;
pub const DISPLAY_ROWS: usize = 2;

// ── Keypad ────────────────────────────────────────────────────

pub struct ConsoleKeypad<R> {
    source: R,
    /// Empty reads mean "no key yet" rather than end of input.
    poll_ms: Option<u32>,
}

impl<R: Read> ConsoleKeypad<R> {
    /// End of input closes the keypad.
    pub fn new(source: R) -> Self {
        Self {
            source,
            poll_ms: None,
        }
    }

    /// Wait `poll_ms` and retry whenever the source has nothing to give.
    pub fn polling(source: R, poll_ms: u32) -> Self {
        Self {
            source,
            poll_ms: Some(poll_ms),
        }
    }

    fn next_byte(&mut self) -> Result<u8, InputError> {
        let mut buf = [0u8; 1];
        loop {
            match self.source.read(&mut buf) {
                Ok(1) => return Ok(buf[0]),
                Ok(_) => match self.poll_ms {
                    Some(ms) => wait(ms),
                    None => return Err(InputError::Closed),
                },
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) if e.kind() == ErrorKind::WouldBlock && self.poll_ms.is_some() => {
                    wait(self.poll_ms.unwrap_or_default());
                }
                Err(e) => {
                    debug!("keypad: read failed: {}", e);
                    return Err(InputError::Closed);
                }
            }
        }
    }
}

impl<'a> ConsoleKeypad<&'a [u8]> {
    /// Keys typed in advance, e.g. `"12345 12345 +"`.
    pub fn scripted(keys: &'a str) -> Self {
        Self::new(keys.as_bytes())
    }
}

impl<R: Read> KeypadPort for ConsoleKeypad<R> {
    fn read_key(&mut self) -> Result<Key, InputError> {
        loop {
            let c = char::from(self.next_byte()?);
            if c.is_ascii_whitespace() {
                continue;
            }
            return Ok(key_for(c));
        }
    }
}

pub fn key_for(c: char) -> Key {
    match c {
        '0'..='9' => Key::Digit(c as u8 - b'0'),
        '+' => Key::Plus,
        '-' => Key::Minus,
        other => Key::Other(other),
    }
}

#[cfg(target_os = "espidf")]
fn wait(ms: u32) {
    esp_idf_hal::delay::FreeRtos::delay_ms(ms);
}

#[cfg(not(target_os = "espidf"))]
fn wait(ms: u32) {
    std::thread::sleep(std::time::Duration::from_millis(u64::from(ms)));
}

// ── Display ───────────────────────────────────────────────────

pub struct ConsoleDisplay {
    frame: [[char; DISPLAY_COLS]; DISPLAY_ROWS],
    cursor: (usize, usize),
}

impl ConsoleDisplay {
    pub fn new() -> Self {
        Self {
            frame: [[' '; DISPLAY_COLS]; DISPLAY_ROWS],
            cursor: (0, 0),
        }
    }

    /// Both rows with trailing blanks trimmed.
    pub fn lines(&self) -> [String<DISPLAY_COLS>; DISPLAY_ROWS] {
        core::array::from_fn(|row| self.line(row))
    }

    pub fn cursor(&self) -> (u8, u8) {
        (self.cursor.0 as u8, self.cursor.1 as u8)
    }

    fn line(&self, row: usize) -> String<DISPLAY_COLS> {
        let mut s = String::new();
        for &c in &self.frame[row] {
            // One char per cell; the frame never holds more than 16.
            let _ = s.push(c);
        }
        let trimmed = s.trim_end().len();
        s.truncate(trimmed);
        s
    }

    /// Write at the cursor and advance; writes past the last column are dropped.
    fn write_char(&mut self, c: char) {
        let (row, col) = self.cursor;
        if row < DISPLAY_ROWS && col < DISPLAY_COLS {
            self.frame[row][col] = c;
            self.cursor.1 += 1;
        }
    }

    fn log_frame(&self) {
        let [top, bottom] = self.lines();
        info!("LCD | {:<16} | {:<16} |", top.as_str(), bottom.as_str());
    }
}

impl Default for ConsoleDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayPort for ConsoleDisplay {
    fn clear(&mut self) {
        self.frame = [[' '; DISPLAY_COLS]; DISPLAY_ROWS];
        self.cursor = (0, 0);
    }

    fn show_at(&mut self, row: u8, col: u8, text: &str) {
        self.move_cursor(row, col);
        for c in text.chars() {
            self.write_char(c);
        }
        self.log_frame();
    }

    fn move_cursor(&mut self, row: u8, col: u8) {
        self.cursor = (usize::from(row), usize::from(col));
    }

    fn put_char(&mut self, c: char) {
        self.write_char(c);
        self.log_frame();
    }
}
