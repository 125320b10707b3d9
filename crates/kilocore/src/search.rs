//! Incremental search over the rendered text of a [`Document`].
//!
//! A [`SearchState`] lives for one prompt session. Every keystroke in the
//! prompt calls [`SearchState::step`], which first undoes the previous match
//! highlight and then looks for the query again, moving forwards or backwards
//! from the last hit and wrapping around the document.

use crate::document::Document;
use crate::highlight::Highlight;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Direction {
    #[default]
    Forward,
    Backward,
}

/// What the prompt key means to the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKey {
    /// Enter: keep the cursor on the current match.
    Accept,
    /// Escape: the caller restores its own cursor snapshot.
    Cancel,
    Next,
    Previous,
    /// The query changed; search again from the top.
    Edit,
}

/// A hit: the matching row and the logical column the match starts at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    pub row: usize,
    pub cx: usize,
}

/// Pre-match highlight of the one row currently painted with [`Highlight::Match`].
#[derive(Debug, Clone)]
struct Overlay {
    row: usize,
    saved: Vec<Highlight>,
}

#[derive(Debug, Clone, Default)]
pub struct SearchState {
    last_match: Option<usize>,
    direction: Direction,
    overlay: Option<Overlay>,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the search for one prompt keystroke.
    ///
    /// Returns the new match, if any. The match is already painted into the
    /// row's highlight; the caller moves the cursor.
    pub fn step(&mut self, doc: &mut Document, query: &[u8], key: SearchKey) -> Option<Match> {
        self.clear_overlay(doc);

        match key {
            SearchKey::Accept | SearchKey::Cancel => {
                self.last_match = None;
                self.direction = Direction::Forward;
                return None;
            }
            SearchKey::Next => self.direction = Direction::Forward,
            SearchKey::Previous => self.direction = Direction::Backward,
            SearchKey::Edit => {
                self.last_match = None;
                self.direction = Direction::Forward;
            }
        }

        if self.last_match.is_none() {
            self.direction = Direction::Forward;
        }

        let n = doc.num_rows();
        if query.is_empty() || n == 0 {
            return None;
        }

        let mut current = self.last_match;
        for _ in 0..n {
            let next = match (current, self.direction) {
                (None, _) => 0,
                (Some(i), Direction::Forward) => (i + 1) % n,
                (Some(i), Direction::Backward) => (i % n + n - 1) % n,
            };
            current = Some(next);

            let Some(row) = doc.row_mut(next) else {
                continue;
            };
            let Some(rx) = find(row.render(), query) else {
                continue;
            };

            let cx = row.rx_to_cx(rx);
            self.overlay = Some(Overlay {
                row: next,
                saved: row.highlight().to_vec(),
            });
            row.paint(rx..rx + query.len(), Highlight::Match);
            self.last_match = Some(next);
            log::debug!("search match at row {next}, rx {rx}");
            return Some(Match { row: next, cx });
        }

        log::debug!("search found no match");
        None
    }

    /// Puts the painted row back the way it was, if one is painted.
    pub fn clear_overlay(&mut self, doc: &mut Document) {
        if let Some(Overlay { row, saved }) = self.overlay.take() {
            if let Some(r) = doc.row_mut(row) {
                r.restore_highlight(saved);
            }
        }
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}
