//! Turns the raw input byte stream into keys.
//!
//! Escape sequences are decoded with a fixed lookahead of at most three
//! bytes after `ESC`. Each lookahead read may time out (raw mode uses a
//! 100 ms inter-byte timeout), in which case the user pressed Escape itself.

use std::io;

use crate::error::{EditorError, Result};

const ESC: u8 = 0x1b;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Any byte without a dedicated key: printable ASCII, control codes,
    /// and the 127 backspace code.
    Byte(u8),
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,
}

impl Key {
    pub const ESCAPE: Key = Key::Byte(ESC);
    pub const ENTER: Key = Key::Byte(b'\r');
    pub const BACKSPACE: Key = Key::Byte(127);

    /// The key produced by holding Ctrl with `c`.
    pub const fn ctrl(c: u8) -> Key {
        Key::Byte(c & 0x1f)
    }
}

/// Something that yields input one byte at a time.
pub trait ByteSource {
    /// Reads a single byte. `Ok(None)` means the read timed out.
    fn read_byte(&mut self) -> io::Result<Option<u8>>;
}

/// Blocks until a byte arrives, then decodes one key.
pub fn read_key(src: &mut impl ByteSource) -> Result<Key> {
    let first = loop {
        if let Some(b) = try_byte(src)? {
            break b;
        }
    };

    if first != ESC {
        return Ok(Key::Byte(first));
    }

    let Some(b0) = try_byte(src)? else {
        return Ok(Key::ESCAPE);
    };
    let Some(b1) = try_byte(src)? else {
        return Ok(Key::ESCAPE);
    };

    let key = match [b0, b1] {
        [b'[', digit @ b'0'..=b'9'] => match try_byte(src)? {
            Some(b'~') => tilde_key(digit),
            _ => None,
        },
        [b'[', letter] => csi_key(letter),
        [b'O', b'H'] => Some(Key::Home),
        [b'O', b'F'] => Some(Key::End),
        _ => None,
    };

    Ok(key.unwrap_or(Key::ESCAPE))
}

/// One read attempt; interrupted and would-block reads count as timeouts.
fn try_byte(src: &mut impl ByteSource) -> Result<Option<u8>> {
    match src.read_byte() {
        Ok(b) => Ok(b),
        Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted) => {
            Ok(None)
        }
        Err(e) => Err(EditorError::Input(e)),
    }
}

fn tilde_key(digit: u8) -> Option<Key> {
    match digit {
        b'1' | b'7' => Some(Key::Home),
        b'3' => Some(Key::Delete),
        b'4' | b'8' => Some(Key::End),
        b'5' => Some(Key::PageUp),
        b'6' => Some(Key::PageDown),
        _ => None,
    }
}

fn csi_key(letter: u8) -> Option<Key> {
    match letter {
        b'A' => Some(Key::ArrowUp),
        b'B' => Some(Key::ArrowDown),
        b'C' => Some(Key::ArrowRight),
        b'D' => Some(Key::ArrowLeft),
        b'H' => Some(Key::Home),
        b'F' => Some(Key::End),
        _ => None,
    }
}
