//! Document model for the kilo editor: rows with tab-expanded rendering,
//! per-byte highlighting, and incremental search.

pub mod document;
pub mod highlight;
pub mod row;
pub mod search;

pub use document::Document;
pub use highlight::Highlight;
pub use row::{Row, TAB_STOP};
pub use search::{Match, SearchKey, SearchState};
