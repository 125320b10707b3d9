//! Frame rendering.
//!
//! Every refresh first scrolls the viewport so the cursor is visible, then
//! builds the whole screen into one buffer: text rows, the status bar, the
//! message bar, and finally the cursor position.

use std::fmt;
use std::io;
use std::iter;

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::style::{Attribute, Color, SetAttribute, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use crossterm::{queue, Command};
use kilocore::Highlight;

use crate::app::App;

/// `ESC [ H`: cursor to the top-left corner.
struct CursorHome;

impl Command for CursorHome {
    fn write_ansi(&self, f: &mut impl fmt::Write) -> fmt::Result {
        f.write_str("\x1b[H")
    }
}

/// `ESC [ m`: all attributes off.
struct ResetAttributes;

impl Command for ResetAttributes {
    fn write_ansi(&self, f: &mut impl fmt::Write) -> fmt::Result {
        f.write_str("\x1b[m")
    }
}

/// Basic 8-color SGR foreground, e.g. `ESC [ 31 m`.
struct SetHighlightColor(u8);

impl Command for SetHighlightColor {
    fn write_ansi(&self, f: &mut impl fmt::Write) -> fmt::Result {
        write!(f, "\x1b[{}m", self.0)
    }
}

/// Adjusts `rowoff`/`coloff` so the cursor lands inside the text area.
pub fn scroll(app: &mut App) {
    let cursor = &mut app.cursor;
    let view = &mut app.view;

    cursor.rx = app
        .doc
        .row(cursor.cy)
        .map_or(0, |row| row.cx_to_rx(cursor.cx));

    if cursor.cy < view.rowoff {
        view.rowoff = cursor.cy;
    }
    if cursor.cy >= view.rowoff + view.screen_rows {
        view.rowoff = (cursor.cy + 1).saturating_sub(view.screen_rows);
    }
    if cursor.rx < view.coloff {
        view.coloff = cursor.rx;
    }
    if cursor.rx >= view.coloff + view.screen_cols {
        view.coloff = (cursor.rx + 1).saturating_sub(view.screen_cols);
    }
}

/// Scrolls, then renders the complete frame.
pub fn draw(app: &mut App) -> io::Result<Vec<u8>> {
    scroll(app);

    let mut buf = Vec::new();
    queue!(buf, Hide, CursorHome)?;

    draw_rows(&mut buf, app)?;
    draw_status_bar(&mut buf, app)?;
    draw_message_bar(&mut buf, app)?;

    let y = app.cursor.cy - app.view.rowoff;
    let x = app.cursor.rx - app.view.coloff;
    queue!(
        buf,
        MoveTo(
            u16::try_from(x).unwrap_or(u16::MAX),
            u16::try_from(y).unwrap_or(u16::MAX)
        ),
        Show
    )?;

    Ok(buf)
}

fn draw_rows(buf: &mut Vec<u8>, app: &App) -> io::Result<()> {
    let view = &app.view;

    for y in 0..view.screen_rows {
        let filerow = y + view.rowoff;
        match app.doc.row(filerow) {
            None if app.doc.is_empty() && y == view.screen_rows / 3 => {
                draw_welcome(buf, app);
            }
            None => buf.push(b'~'),
            Some(row) => {
                let start = view.coloff.min(row.rsize());
                let end = (view.coloff + view.screen_cols).min(row.rsize());
                if start < end {
                    let text = &row.render()[start..end];
                    let highlight = &row.highlight()[start..end];
                    let mut current_color: Option<u8> = None;

                    for (&byte, &class) in text.iter().zip(highlight) {
                        if class == Highlight::Normal {
                            if current_color.take().is_some() {
                                queue!(buf, SetForegroundColor(Color::Reset))?;
                            }
                        } else {
                            let color = class.color();
                            if current_color != Some(color) {
                                current_color = Some(color);
                                queue!(buf, SetHighlightColor(color))?;
                            }
                        }
                        buf.push(byte);
                    }
                    queue!(buf, SetForegroundColor(Color::Reset))?;
                }
            }
        }

        queue!(buf, Clear(ClearType::UntilNewLine))?;
        buf.extend_from_slice(b"\r\n");
    }
    Ok(())
}

fn draw_welcome(buf: &mut Vec<u8>, app: &App) {
    let cols = app.view.screen_cols;
    let welcome = format!("Kilo editor -- version {}", app.config.version);
    let welcome = &welcome.as_bytes()[..welcome.len().min(cols)];

    let mut padding = (cols - welcome.len()) / 2;
    if padding > 0 {
        buf.push(b'~');
        padding -= 1;
    }
    buf.extend(iter::repeat(b' ').take(padding));
    buf.extend_from_slice(welcome);
}

fn draw_status_bar(buf: &mut Vec<u8>, app: &App) -> io::Result<()> {
    let cols = app.view.screen_cols;
    let num_rows = app.doc.num_rows();

    queue!(buf, SetAttribute(Attribute::Reverse))?;

    let name = app.file_manager.display_name();
    let name = &name.as_bytes()[..name.len().min(20)];
    let modified = if app.doc.is_dirty() { "(modified)" } else { "" };
    let mut status = name.to_vec();
    status.extend_from_slice(format!(" - {num_rows} lines {modified}").as_bytes());
    let rstatus = format!("{}/{}", app.cursor.cy + 1, num_rows);

    let mut len = status.len().min(cols);
    buf.extend_from_slice(&status[..len]);
    while len < cols {
        if cols - len == rstatus.len() {
            buf.extend_from_slice(rstatus.as_bytes());
            break;
        }
        buf.push(b' ');
        len += 1;
    }

    queue!(buf, ResetAttributes)?;
    buf.extend_from_slice(b"\r\n");
    Ok(())
}

fn draw_message_bar(buf: &mut Vec<u8>, app: &App) -> io::Result<()> {
    queue!(buf, Clear(ClearType::UntilNewLine))?;
    if let Some(message) = app.status.visible_message() {
        let bytes = message.as_bytes();
        buf.extend_from_slice(&bytes[..bytes.len().min(app.view.screen_cols)]);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use kilocore::{Document, SearchKey, SearchState};

    fn app_with(lines: &[&str], rows: usize, cols: usize) -> App {
        let mut app = App::new(Config::default(), rows + 2, cols);
        app.doc = Document::from_lines(lines.iter().map(|l| l.as_bytes().to_vec()));
        app
    }

    /// Frame text with escape sequences removed and trailing blanks trimmed.
    fn visible_text(frame: &[u8]) -> String {
        let mut out = String::new();
        let mut bytes = frame.iter().copied();
        while let Some(b) = bytes.next() {
            if b == 0x1b {
                // CSI: parameters until a final byte in 0x40..=0x7e.
                bytes.next();
                for c in bytes.by_ref() {
                    if (0x40..=0x7e).contains(&c) {
                        break;
                    }
                }
            } else if b != b'\r' {
                out.push(b as char);
            }
        }
        out.lines().map(str::trim_end).collect::<Vec<_>>().join("\n")
    }

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn test_frame_starts_and_ends_with_cursor_control() {
        let mut app = app_with(&["hi"], 3, 20);
        let frame = draw(&mut app).unwrap();
        assert!(frame.starts_with(b"\x1b[?25l\x1b[H"));
        assert!(frame.ends_with(b"\x1b[1;1H\x1b[?25h"));
    }

    #[test]
    fn test_welcome_banner_on_empty_document() {
        let mut app = app_with(&[], 6, 40);
        let frame = draw(&mut app).unwrap();
        let version = env!("CARGO_PKG_VERSION");
        let banner = format!("Kilo editor -- version {version}");
        let padding = (40 - banner.len()) / 2;
        let expected_row = format!("~{}{banner}", " ".repeat(padding - 1));

        let text = visible_text(&frame);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "~");
        assert_eq!(lines[1], "~");
        assert_eq!(lines[2], expected_row);
        assert_eq!(lines[3], "~");
    }

    #[test]
    fn test_no_banner_once_document_has_rows() {
        let mut app = app_with(&["x"], 6, 40);
        let frame = draw(&mut app).unwrap();
        assert!(!contains(&frame, b"Kilo editor"));
    }

    #[test]
    fn test_status_bar_layout() {
        let mut app = app_with(&["a", "b"], 3, 30);
        let frame = draw(&mut app).unwrap();
        let expected = format!("\x1b[7m[No Name] - 2 lines {}1/2\x1b[m\r\n", " ".repeat(7));
        assert!(contains(&frame, expected.as_bytes()));
    }

    #[test]
    fn test_status_bar_truncates_to_width() {
        let mut app = app_with(&["a", "b"], 3, 25);
        app.file_manager.set_path("notes.txt".into());
        app.doc.insert_char(0, 0, b'x');
        let frame = draw(&mut app).unwrap();
        // No room left for the row indicator.
        assert!(contains(&frame, b"\x1b[7mnotes.txt - 2 lines (modi\x1b[m\r\n"));
    }

    #[test]
    fn test_long_filename_is_cut_to_twenty_bytes() {
        let mut app = app_with(&[], 3, 80);
        app.file_manager.set_path("abcdefghijklmnopqrstuvwxyz.txt".into());
        let frame = draw(&mut app).unwrap();
        assert!(contains(&frame, b"abcdefghijklmnopqrst - 0 lines"));
    }

    #[test]
    fn test_multibyte_filename_is_cut_by_bytes() {
        let mut app = app_with(&[], 3, 80);
        app.file_manager.set_path("ééééééééééé.txt".into());
        let frame = draw(&mut app).unwrap();
        let expected = format!("{} - 0 lines", "é".repeat(10));
        assert!(contains(&frame, expected.as_bytes()));
        assert!(!contains(&frame, "é".repeat(11).as_bytes()));
    }

    #[test]
    fn test_color_escapes_only_on_class_change() {
        let mut app = app_with(&["a12b3"], 3, 20);
        let frame = draw(&mut app).unwrap();
        assert!(contains(
            &frame,
            b"a\x1b[31m12\x1b[39mb\x1b[31m3\x1b[39m\x1b[K\r\n"
        ));
    }

    #[test]
    fn test_search_match_is_drawn_in_match_color() {
        let mut app = app_with(&["say foo"], 3, 20);
        let mut search = SearchState::new();
        search.step(&mut app.doc, b"foo", SearchKey::Edit).unwrap();
        let frame = draw(&mut app).unwrap();
        assert!(contains(&frame, b"say \x1b[34mfoo\x1b[39m\x1b[K"));
    }

    #[test]
    fn test_horizontal_scroll_clips_row() {
        let mut app = app_with(&["0123456789abcdef"], 3, 5);
        app.cursor.cx = 12;
        let frame = draw(&mut app).unwrap();
        assert_eq!(app.view.coloff, 8);
        assert_eq!(app.cursor.rx, 12);
        assert!(contains(&frame, b"\x1b[31m89\x1b[39mabc\x1b[39m\x1b[K"));
        assert!(frame.ends_with(b"\x1b[1;5H\x1b[?25h"));
    }

    #[test]
    fn test_vertical_scroll_follows_cursor() {
        let lines: Vec<String> = (0..10).map(|i| format!("line {i}")).collect();
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let mut app = app_with(&refs, 3, 20);

        app.cursor.cy = 7;
        scroll(&mut app);
        assert_eq!(app.view.rowoff, 5);

        app.cursor.cy = 2;
        scroll(&mut app);
        assert_eq!(app.view.rowoff, 2);
    }

    #[test]
    fn test_cursor_rx_accounts_for_tabs() {
        let mut app = app_with(&["\tx"], 3, 20);
        app.cursor.cx = 1;
        let frame = draw(&mut app).unwrap();
        assert_eq!(app.cursor.rx, 8);
        assert!(frame.ends_with(b"\x1b[1;9H\x1b[?25h"));
    }

    #[test]
    fn test_message_bar_truncates_and_expires() {
        let mut app = app_with(&[], 3, 10);
        app.status.set_info("a rather long message");
        let frame = draw(&mut app).unwrap();
        assert!(contains(&frame, b"\x1b[Ka rather "));

        app.status = crate::status_manager::StatusManager::new(std::time::Duration::ZERO);
        app.status.set_info("gone");
        let frame = draw(&mut app).unwrap();
        assert!(!contains(&frame, b"gone"));
    }

    #[test]
    fn test_frame_snapshot() {
        let mut app = app_with(&["fn main() {", "\tlet x = 42;", "}"], 5, 30);
        app.file_manager.set_path("main.rs".into());
        let frame = draw(&mut app).unwrap();
        insta::assert_snapshot!(visible_text(&frame), @r"
        fn main() {
                let x = 42;
        }
        ~
        ~
        main.rs - 3 lines          1/3
        ");
    }
}
