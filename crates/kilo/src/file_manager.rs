use std::fs::{self, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

use crate::error::{EditorError, Result};

/// Loads and saves the single file being edited.
#[derive(Debug, Default)]
pub struct FileManager {
    current_path: Option<PathBuf>,
}

impl FileManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_current_path(&self) -> Option<&Path> {
        self.current_path.as_deref()
    }

    pub fn has_file(&self) -> bool {
        self.current_path.is_some()
    }

    pub fn set_path(&mut self, path: PathBuf) {
        self.current_path = Some(path);
    }

    /// Name shown in the status bar.
    pub fn display_name(&self) -> String {
        match &self.current_path {
            Some(path) => path.display().to_string(),
            None => String::from("[No Name]"),
        }
    }

    /// Reads `path` as raw lines and makes it the current file.
    ///
    /// A file that does not exist yet opens as an empty document; saving will
    /// create it.
    pub fn open_file(&mut self, path: PathBuf) -> Result<Vec<Vec<u8>>> {
        self.current_path = Some(path.clone());
        match read_lines(&path) {
            Ok(lines) => {
                log::info!("Opened {} ({} lines)", path.display(), lines.len());
                Ok(lines)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("{} does not exist, starting a new file", path.display());
                Ok(Vec::new())
            }
            Err(source) => Err(EditorError::Open { path, source }),
        }
    }

    /// Writes `content` to the current file and returns how many bytes made it.
    ///
    /// A count smaller than `content.len()` means the device stopped accepting
    /// data; it is not an error here.
    pub fn save_file(&self, content: &[u8]) -> Result<usize> {
        let path = self
            .current_path
            .as_deref()
            .ok_or_else(|| EditorError::SaveOpen(io::Error::other("no file name")))?;

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o644)
            .open(path)
            .map_err(EditorError::SaveOpen)?;

        let mut written = 0;
        while written < content.len() {
            match file.write(&content[written..]) {
                Ok(0) => break,
                Ok(n) => written += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(EditorError::SaveWrite(e)),
            }
        }

        log::info!("Wrote {} of {} bytes to {}", written, content.len(), path.display());
        Ok(written)
    }
}

/// Splits a file on `\n`. Terminators are removed; a trailing `\r` is left
/// for the document to strip.
pub fn read_lines(path: &Path) -> io::Result<Vec<Vec<u8>>> {
    let file = fs::File::open(path)?;
    BufReader::new(file).split(b'\n').collect()
}
