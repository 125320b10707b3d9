//! One-line input in the message bar.

use crate::app::App;
use crate::error::Result;
use crate::key::Key;
use crate::terminal::Terminal;

const CTRL_H: Key = Key::ctrl(b'h');

/// Called after every prompt keystroke with the current input.
pub type PromptCallback<'a> = &'a mut dyn FnMut(&mut App, &[u8], Key);

/// Reads a line of input, showing `template` with `{}` replaced by what has
/// been typed so far.
///
/// Returns `None` when the user presses Escape. Enter only finishes the
/// prompt once something has been typed.
pub fn prompt(
    app: &mut App,
    term: &mut impl Terminal,
    template: &str,
    mut callback: Option<PromptCallback<'_>>,
) -> Result<Option<Vec<u8>>> {
    let mut buf: Vec<u8> = Vec::with_capacity(128);

    loop {
        app.status
            .set_info(template.replace("{}", &String::from_utf8_lossy(&buf)));
        app.refresh_screen(term)?;

        let key = term.read_key()?;
        match key {
            Key::Delete | Key::BACKSPACE | CTRL_H => {
                buf.pop();
            }
            Key::ESCAPE => {
                app.status.clear();
                if let Some(cb) = &mut callback {
                    cb(app, &buf, key);
                }
                return Ok(None);
            }
            Key::ENTER if !buf.is_empty() => {
                app.status.clear();
                if let Some(cb) = &mut callback {
                    cb(app, &buf, key);
                }
                return Ok(Some(buf));
            }
            Key::Byte(b) if (0x20..0x7f).contains(&b) => buf.push(b),
            _ => {}
        }

        if let Some(cb) = &mut callback {
            cb(app, &buf, key);
        }
    }
}
