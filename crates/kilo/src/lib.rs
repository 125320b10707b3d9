// Kilo library exports

pub mod app;
pub mod config;
pub mod error;
pub mod file_manager;
pub mod key;
pub mod prompt;
pub mod status_manager;
pub mod terminal;
pub mod ui;

pub use app::{App, Cursor, Flow, Viewport};
pub use config::Config;
pub use error::{EditorError, Result};
pub use key::Key;
pub use terminal::{RawTerminal, Terminal};
