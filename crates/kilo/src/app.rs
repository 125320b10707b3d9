use std::ffi::OsString;
use std::os::unix::ffi::OsStringExt;
use std::path::PathBuf;

use kilocore::{Document, SearchKey, SearchState};

use crate::config::Config;
use crate::error::{EditorError, Result};
use crate::file_manager::FileManager;
use crate::key::Key;
use crate::prompt::prompt;
use crate::status_manager::StatusManager;
use crate::terminal::Terminal;
use crate::ui;

const CTRL_F: Key = Key::ctrl(b'f');
const CTRL_H: Key = Key::ctrl(b'h');
const CTRL_L: Key = Key::ctrl(b'l');
const CTRL_Q: Key = Key::ctrl(b'q');
const CTRL_S: Key = Key::ctrl(b's');

/// Cursor position. `cx` indexes `chars`, `rx` the rendered row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub cx: usize,
    pub cy: usize,
    pub rx: usize,
}

/// The visible window onto the document.
#[derive(Debug, Clone, Copy, Default)]
pub struct Viewport {
    pub rowoff: usize,
    pub coloff: usize,
    /// Text rows; the two bars below are not included.
    pub screen_rows: usize,
    pub screen_cols: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct App {
    pub doc: Document,
    pub cursor: Cursor,
    pub view: Viewport,
    pub file_manager: FileManager,
    pub status: StatusManager,
    pub config: Config,
    quit_times: u32,
}

impl App {
    /// `rows` and `cols` are the full window size.
    pub fn new(config: Config, rows: usize, cols: usize) -> Self {
        Self {
            doc: Document::new(),
            cursor: Cursor::default(),
            view: Viewport {
                rowoff: 0,
                coloff: 0,
                screen_rows: rows.saturating_sub(2).max(1),
                screen_cols: cols.max(1),
            },
            file_manager: FileManager::new(),
            status: StatusManager::new(config.message_timeout),
            quit_times: config.quit_times,
            config,
        }
    }

    /// Startup: shows the help line, then loads `file` if one was given. An
    /// open failure replaces the help line so it is the first thing seen.
    pub fn start(&mut self, file: Option<PathBuf>) {
        self.status.set_info(self.config.help_message.clone());
        match file {
            Some(path) => self.open(path),
            None => log::info!("No file specified, starting with empty buffer"),
        }
    }

    /// Loads `path` into the editor. Failures land in the message bar.
    pub fn open(&mut self, path: PathBuf) {
        match self.file_manager.open_file(path) {
            Ok(lines) => self.doc = Document::from_lines(lines),
            Err(e) => self.status.set_error(e.to_string()),
        }
    }

    /// Main loop: draw, read a key, act on it. Returns when the user quits or
    /// a fatal error occurs.
    pub fn run(&mut self, term: &mut impl Terminal) -> Result<()> {
        loop {
            self.refresh_screen(term)?;
            let key = term.read_key()?;
            match self.process_keypress(key, term) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => break,
                Err(e) if !e.is_fatal() => self.status.set_error(e.to_string()),
                Err(e) => return Err(e),
            }
        }
        log::info!("quit requested");
        Ok(())
    }

    pub fn refresh_screen(&mut self, term: &mut impl Terminal) -> Result<()> {
        let frame = ui::draw(self).map_err(EditorError::Output)?;
        term.write_frame(&frame)
    }

    pub fn process_keypress(&mut self, key: Key, term: &mut impl Terminal) -> Result<Flow> {
        match key {
            Key::ENTER => self.insert_newline(),
            CTRL_Q => {
                if self.doc.is_dirty() && self.quit_times > 0 {
                    self.status.set_warning(format!(
                        "WARNING!!! File has unsaved changes. Press Ctrl-Q {} more times to quit.",
                        self.quit_times
                    ));
                    self.quit_times -= 1;
                    return Ok(Flow::Continue);
                }
                return Ok(Flow::Quit);
            }
            CTRL_S => self.save(term)?,
            CTRL_F => self.find(term)?,
            Key::Home => self.cursor.cx = 0,
            Key::End => {
                if self.cursor.cy < self.doc.num_rows() {
                    self.cursor.cx = self.doc.row_len(self.cursor.cy);
                }
            }
            Key::BACKSPACE | CTRL_H => self.delete_char(),
            Key::Delete => {
                self.move_cursor(Key::ArrowRight);
                self.delete_char();
            }
            Key::PageUp | Key::PageDown => {
                let (direction, cy) = if key == Key::PageUp {
                    (Key::ArrowUp, self.view.rowoff)
                } else {
                    let bottom = self.view.rowoff + self.view.screen_rows - 1;
                    (Key::ArrowDown, bottom.min(self.doc.num_rows()))
                };
                self.cursor.cy = cy;
                for _ in 0..self.view.screen_rows {
                    self.move_cursor(direction);
                }
            }
            Key::ArrowUp | Key::ArrowDown | Key::ArrowLeft | Key::ArrowRight => {
                self.move_cursor(key)
            }
            CTRL_L | Key::ESCAPE => {}
            Key::Byte(b) => self.insert_char(b),
        }

        self.quit_times = self.config.quit_times;
        Ok(Flow::Continue)
    }

    fn move_cursor(&mut self, key: Key) {
        let num_rows = self.doc.num_rows();
        let cursor = &mut self.cursor;
        let row_len = self.doc.row(cursor.cy).map(|row| row.size());

        match key {
            Key::ArrowLeft => {
                if cursor.cx > 0 {
                    cursor.cx -= 1;
                } else if cursor.cy > 0 {
                    cursor.cy -= 1;
                    cursor.cx = self.doc.row_len(cursor.cy);
                }
            }
            Key::ArrowRight => match row_len {
                Some(len) if cursor.cx < len => cursor.cx += 1,
                Some(len) if cursor.cx == len => {
                    cursor.cy += 1;
                    cursor.cx = 0;
                }
                _ => {}
            },
            Key::ArrowUp => cursor.cy = cursor.cy.saturating_sub(1),
            Key::ArrowDown => {
                if cursor.cy < num_rows {
                    cursor.cy += 1;
                }
            }
            _ => {}
        }

        cursor.cx = cursor.cx.min(self.doc.row_len(cursor.cy));
    }

    fn insert_char(&mut self, byte: u8) {
        if self.cursor.cy == self.doc.num_rows() {
            self.doc.insert_row(self.doc.num_rows(), Vec::new());
        }
        self.doc.insert_char(self.cursor.cy, self.cursor.cx, byte);
        self.cursor.cx += 1;
    }

    fn insert_newline(&mut self) {
        self.doc.split_row(self.cursor.cy, self.cursor.cx);
        self.cursor.cy += 1;
        self.cursor.cx = 0;
    }

    fn delete_char(&mut self) {
        let Cursor { cx, cy, .. } = self.cursor;
        if cy == self.doc.num_rows() || (cx == 0 && cy == 0) {
            return;
        }
        if cx > 0 {
            self.doc.delete_char(cy, cx - 1);
            self.cursor.cx -= 1;
        } else if let Some(join) = self.doc.merge_row_up(cy) {
            self.cursor.cy -= 1;
            self.cursor.cx = join;
        }
    }

    fn save(&mut self, term: &mut impl Terminal) -> Result<()> {
        if !self.file_manager.has_file() {
            match prompt(self, term, "Save as: {} (ESC to cancel)", None)? {
                Some(name) => self
                    .file_manager
                    .set_path(PathBuf::from(OsString::from_vec(name))),
                None => {
                    self.status.set_info("Save aborted");
                    return Ok(());
                }
            }
        }

        let (content, len) = self.doc.serialize();
        match self.file_manager.save_file(&content) {
            Ok(written) if written == len => {
                self.doc.mark_saved();
                self.status.set_info(format!("{len} bytes written to disk"));
            }
            Ok(written) => {
                self.status.set_warning(format!(
                    "wanted to write {len} bytes to file, wrote {written}"
                ));
            }
            Err(e) => self.status.set_error(e.to_string()),
        }
        Ok(())
    }

    /// Incremental search. Escape puts the cursor and scroll back where they
    /// were.
    fn find(&mut self, term: &mut impl Terminal) -> Result<()> {
        let saved_cursor = self.cursor;
        let saved_view = self.view;

        let mut search = SearchState::new();
        let mut on_key = |app: &mut App, query: &[u8], key: Key| {
            let key = match key {
                Key::ENTER => SearchKey::Accept,
                Key::ESCAPE => SearchKey::Cancel,
                Key::ArrowRight | Key::ArrowDown => SearchKey::Next,
                Key::ArrowLeft | Key::ArrowUp => SearchKey::Previous,
                _ => SearchKey::Edit,
            };
            if let Some(hit) = search.step(&mut app.doc, query, key) {
                app.cursor.cy = hit.row;
                app.cursor.cx = hit.cx;
                // Forces the next scroll to put the match on the top line.
                app.view.rowoff = app.doc.num_rows();
            }
        };

        let query = prompt(
            self,
            term,
            "Search: {} (Use ESC/Arrows/Enter)",
            Some(&mut on_key),
        )?;

        if query.is_none() {
            self.cursor = saved_cursor;
            self.view.rowoff = saved_view.rowoff;
            self.view.coloff = saved_view.coloff;
        }
        Ok(())
    }
}
