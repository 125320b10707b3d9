//! Raw-mode terminal access.
//!
//! [`RawTerminal`] owns the raw-mode session: creating it switches the
//! controlling terminal to raw mode, dropping it clears the screen and puts
//! the original attributes back. The saved attributes also live in a static so
//! the panic hook can restore them before the panic message is printed.

use std::io::{self, Read, Write};
use std::sync::Mutex;

use rustix::termios::{
    self, ControlModes, InputModes, LocalModes, OptionalActions, OutputModes, SpecialCodeIndex,
    Termios,
};

use crate::error::{EditorError, Result};
use crate::key::{self, ByteSource, Key};

static ORIGINAL_TERMIOS: Mutex<Option<Termios>> = Mutex::new(None);

const CLEAR_SCREEN: &[u8] = b"\x1b[2J\x1b[H";

/// The editor's view of the terminal: keys in, whole frames out.
pub trait Terminal {
    fn read_key(&mut self) -> Result<Key>;

    /// Writes one complete frame.
    fn write_frame(&mut self, frame: &[u8]) -> Result<()>;
}

pub struct RawTerminal {
    stdin: io::Stdin,
    stdout: io::Stdout,
}

impl RawTerminal {
    /// Switches the terminal into raw mode.
    ///
    /// On failure the screen is cleared and whatever was changed is put back.
    pub fn new() -> Result<Self> {
        if let Err(e) = enable_raw_mode() {
            restore_terminal();
            return Err(e);
        }
        Ok(Self {
            stdin: io::stdin(),
            stdout: io::stdout(),
        })
    }

    /// Returns `(rows, cols)` of the terminal window.
    pub fn window_size(&mut self) -> Result<(usize, usize)> {
        match crossterm::terminal::size() {
            Ok((cols, rows)) if cols > 0 => return Ok((rows as usize, cols as usize)),
            Ok(_) => log::warn!("terminal reported zero columns, asking for the cursor position"),
            Err(e) => log::warn!("window size query failed ({e}), asking for the cursor position"),
        }

        window_size_from_cursor(self)
    }
}

/// Pushes the cursor into the bottom-right corner and asks where it ended up.
pub fn window_size_from_cursor<T: Terminal + ByteSource>(term: &mut T) -> Result<(usize, usize)> {
    term.write_frame(b"\x1b[999C\x1b[999B")?;
    term.write_frame(b"\x1b[6n")?;

    let mut reply = Vec::with_capacity(32);
    while reply.len() < 32 {
        match term.read_byte() {
            Ok(Some(b'R')) => break,
            Ok(Some(b)) => reply.push(b),
            Ok(None) | Err(_) => break,
        }
    }
    parse_cursor_report(&reply).ok_or(EditorError::WindowSize)
}

impl ByteSource for RawTerminal {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut buf = [0u8; 1];
        match self.stdin.read(&mut buf)? {
            0 => Ok(None),
            _ => Ok(Some(buf[0])),
        }
    }
}

impl Terminal for RawTerminal {
    fn read_key(&mut self) -> Result<Key> {
        key::read_key(self)
    }

    fn write_frame(&mut self, frame: &[u8]) -> Result<()> {
        // Bypass the line-buffered stdout so a frame leaves in as few writes
        // as the kernel allows.
        let mut rest = frame;
        while !rest.is_empty() {
            match rustix::io::write(&self.stdout, rest) {
                Ok(0) => {
                    return Err(EditorError::Output(io::ErrorKind::WriteZero.into()));
                }
                Ok(n) => rest = &rest[n..],
                Err(rustix::io::Errno::INTR) => continue,
                Err(e) => return Err(EditorError::Output(e.into())),
            }
        }
        Ok(())
    }
}

impl Drop for RawTerminal {
    fn drop(&mut self) {
        let _ = self.stdout.write_all(CLEAR_SCREEN);
        let _ = self.stdout.flush();
        if let Err(e) = disable_raw_mode() {
            log::error!("failed to restore terminal: {e}");
        }
    }
}

/// Parses a `ESC [ rows ; cols` cursor position report (the trailing `R`
/// already stripped).
pub fn parse_cursor_report(reply: &[u8]) -> Option<(usize, usize)> {
    let body = reply.strip_prefix(b"\x1b[")?;
    let body = std::str::from_utf8(body).ok()?;
    let (rows, cols) = body.split_once(';')?;
    Some((rows.parse().ok()?, cols.parse().ok()?))
}

/// Saves the current attributes and switches stdin to raw mode with a
/// 100 ms read timeout.
pub fn enable_raw_mode() -> Result<()> {
    let stdin = io::stdin();
    let original = termios::tcgetattr(&stdin).map_err(|e| EditorError::RawMode(e.into()))?;

    let mut raw = original.clone();
    raw.input_modes.remove(
        InputModes::BRKINT
            | InputModes::ICRNL
            | InputModes::INPCK
            | InputModes::ISTRIP
            | InputModes::IXON,
    );
    raw.output_modes.remove(OutputModes::OPOST);
    raw.control_modes.insert(ControlModes::CS8);
    raw.local_modes
        .remove(LocalModes::ECHO | LocalModes::ICANON | LocalModes::IEXTEN | LocalModes::ISIG);
    raw.special_codes[SpecialCodeIndex::VMIN] = 0;
    raw.special_codes[SpecialCodeIndex::VTIME] = 1;

    if let Ok(mut saved) = ORIGINAL_TERMIOS.lock() {
        saved.get_or_insert(original);
    }

    if let Err(e) = termios::tcsetattr(&stdin, OptionalActions::Flush, &raw) {
        let _ = disable_raw_mode();
        return Err(EditorError::RawMode(e.into()));
    }
    log::debug!("raw mode enabled");
    Ok(())
}

/// Restores the attributes saved by [`enable_raw_mode`]. No-op if raw mode
/// was never enabled.
pub fn disable_raw_mode() -> Result<()> {
    let saved = match ORIGINAL_TERMIOS.lock() {
        Ok(mut guard) => guard.take(),
        Err(poisoned) => poisoned.into_inner().take(),
    };
    if let Some(original) = saved {
        termios::tcsetattr(io::stdin(), OptionalActions::Flush, &original)
            .map_err(|e| EditorError::RawMode(e.into()))?;
        log::debug!("raw mode disabled");
    }
    Ok(())
}

/// Best-effort cleanup for the panic hook.
pub fn restore_terminal() {
    let mut stdout = io::stdout();
    let _ = stdout.write_all(CLEAR_SCREEN);
    let _ = stdout.flush();
    let _ = disable_raw_mode();
}
