//! Terminal bridge for the primary UART.
//!
//! Maps the UART's one-byte channel contract onto a real terminal. It
//! provides:
//! 1. **Policy:** [`Console`] filters carriage returns from display and
//!    throttles nonblocking reads to one real poll per 4096 calls, so guest
//!    busy-polling does not become one host syscall per poll.
//! 2. **Terminal contract:** [`TerminalIo`], the narrow display/input
//!    interface the policy is written against, unit-testable with fakes.
//! 3. **Raw terminal:** [`RawTerminal`], the crossterm-backed production
//!    implementation holding the process-wide raw mode for its lifetime.

use std::io::{self, Write};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal;

use crate::common::constants::READ_THROTTLE_MASK;
use crate::common::ChannelError;
use crate::soc::devices::ByteChannel;

/// Narrow display/input contract between the bridge and the terminal.
pub trait TerminalIo {
    /// Displays one byte.
    fn put_byte(&mut self, byte: u8);

    /// Polls for one input byte without blocking.
    fn poll_byte(&mut self) -> Option<u8>;
}

/// Bridge between a UART byte channel and a terminal.
#[derive(Debug)]
pub struct Console<T> {
    term: T,
    throttle: u16,
}

impl<T: TerminalIo> Console<T> {
    /// Creates a bridge over the given terminal.
    pub fn new(term: T) -> Self {
        Self { term, throttle: 0 }
    }
}

impl<T: TerminalIo> ByteChannel for Console<T> {
    /// Sends the byte to the terminal unless it is a carriage return, which
    /// is filtered from display only; the byte still counts as transmitted.
    fn transmit(&mut self, byte: u8) -> Result<(), ChannelError> {
        if byte != b'\r' {
            self.term.put_byte(byte);
        }
        Ok(())
    }

    /// Attempts a real terminal read on one call in 4096; throttled calls
    /// and empty polls report [`ChannelError::Empty`].
    fn receive(&mut self) -> Result<u8, ChannelError> {
        self.throttle = (self.throttle + 1) & READ_THROTTLE_MASK;
        if self.throttle != 0 {
            return Err(ChannelError::Empty);
        }
        self.term.poll_byte().ok_or(ChannelError::Empty)
    }
}

/// Raw-mode terminal over stdin/stdout.
///
/// Raw mode is process-wide state: it is acquired in the constructor and
/// released in `Drop`, so it is restored on every exit path, including
/// unwinding.
#[derive(Debug)]
pub struct RawTerminal {
    stdout: io::Stdout,
}

impl RawTerminal {
    /// Acquires raw mode and returns the terminal handle.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error when the controlling terminal
    /// rejects raw mode.
    pub fn new() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self {
            stdout: io::stdout(),
        })
    }
}

impl Drop for RawTerminal {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

impl TerminalIo for RawTerminal {
    /// Writes the byte immediately. Raw mode disables output processing, so
    /// a line feed is rendered as CR+LF by hand; display errors are ignored
    /// (there is nowhere left to report them).
    fn put_byte(&mut self, byte: u8) {
        let result = if byte == b'\n' {
            self.stdout.write_all(b"\r\n")
        } else {
            self.stdout.write_all(&[byte])
        };
        let _ = result.and_then(|()| self.stdout.flush());
    }

    /// Polls the event queue without blocking and maps a key press to the
    /// byte a serial terminal would produce. Non-key events are drained and
    /// discarded.
    fn poll_byte(&mut self) -> Option<u8> {
        if !event::poll(Duration::ZERO).unwrap_or(false) {
            return None;
        }
        let Ok(Event::Key(key)) = event::read() else {
            return None;
        };
        if !matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
            return None;
        }
        match key.code {
            KeyCode::Char(ch) if key.modifiers.contains(KeyModifiers::CONTROL) => {
                if ch.is_ascii_alphabetic() {
                    Some(ch.to_ascii_uppercase() as u8 & 0x1F)
                } else {
                    None
                }
            }
            KeyCode::Char(ch) if ch.is_ascii() => Some(ch as u8),
            KeyCode::Enter => Some(b'\r'),
            KeyCode::Backspace => Some(0x7F),
            KeyCode::Tab => Some(b'\t'),
            KeyCode::Esc => Some(0x1B),
            _ => None,
        }
    }
}
