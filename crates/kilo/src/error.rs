use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = EditorError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("failed to configure terminal: {0}")]
    RawMode(#[source] io::Error),

    #[error("couldn't get screen size")]
    WindowSize,

    #[error("failed to read input: {0}")]
    Input(#[source] io::Error),

    #[error("failed to write to terminal: {0}")]
    Output(#[source] io::Error),

    #[error("can't open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Can't save! file open error: {0}")]
    SaveOpen(#[source] io::Error),

    #[error("Can't save! I/O error: {0}")]
    SaveWrite(#[source] io::Error),
}

impl EditorError {
    /// Fatal errors end the process after the terminal is restored; the rest
    /// are shown in the message bar and editing continues.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            EditorError::RawMode(_)
                | EditorError::WindowSize
                | EditorError::Input(_)
                | EditorError::Output(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(EditorError::WindowSize.is_fatal());
        assert!(EditorError::Input(io::Error::other("eof")).is_fatal());
        assert!(!EditorError::SaveOpen(io::Error::other("denied")).is_fatal());
        assert!(!EditorError::Open {
            path: PathBuf::from("x"),
            source: io::Error::other("missing"),
        }
        .is_fatal());
    }

    #[test]
    fn test_save_messages() {
        let e = EditorError::SaveWrite(io::Error::other("disk full"));
        assert_eq!(e.to_string(), "Can't save! I/O error: disk full");
    }
}
