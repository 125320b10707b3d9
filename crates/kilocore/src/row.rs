use std::ops::Range;

use crate::highlight::{self, Highlight};

/// Columns between tab stops.
pub const TAB_STOP: usize = 8;

/// A single logical line.
///
/// `chars` is the authoritative content. `render` (tabs expanded) and
/// `highlight` (one class per rendered byte) are derived from it and always
/// rebuilt together by [`Row::update`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    chars: Vec<u8>,
    render: Vec<u8>,
    highlight: Vec<Highlight>,
}

impl Row {
    pub fn new(chars: Vec<u8>) -> Self {
        let mut row = Self {
            chars,
            render: Vec::new(),
            highlight: Vec::new(),
        };
        row.update();
        row
    }

    pub fn chars(&self) -> &[u8] {
        &self.chars
    }

    pub fn render(&self) -> &[u8] {
        &self.render
    }

    pub fn highlight(&self) -> &[Highlight] {
        &self.highlight
    }

    /// Logical length.
    pub fn size(&self) -> usize {
        self.chars.len()
    }

    /// Rendered length.
    pub fn rsize(&self) -> usize {
        self.render.len()
    }

    /// Rendered column of logical column `cx`.
    pub fn cx_to_rx(&self, cx: usize) -> usize {
        self.chars
            .iter()
            .take(cx)
            .fold(0, |rx, &b| advance(rx, b))
    }

    /// Logical column containing rendered column `rx`.
    ///
    /// A position inside an expanded tab maps to the tab itself; anything
    /// past the end maps to `size()`.
    pub fn rx_to_cx(&self, rx: usize) -> usize {
        let mut cur_rx = 0;
        for (cx, &b) in self.chars.iter().enumerate() {
            cur_rx = advance(cur_rx, b);
            if cur_rx > rx {
                return cx;
            }
        }
        self.chars.len()
    }

    pub(crate) fn insert_char(&mut self, at: usize, byte: u8) {
        let at = at.min(self.chars.len());
        self.chars.insert(at, byte);
        self.update();
    }

    /// Returns false when `at` is out of bounds.
    pub(crate) fn delete_char(&mut self, at: usize) -> bool {
        if at >= self.chars.len() {
            return false;
        }
        self.chars.remove(at);
        self.update();
        true
    }

    pub(crate) fn append(&mut self, bytes: &[u8]) {
        self.chars.extend_from_slice(bytes);
        self.update();
    }

    /// Cuts the row at `at`, keeping the head and returning the tail.
    pub(crate) fn split_off(&mut self, at: usize) -> Vec<u8> {
        let tail = self.chars.split_off(at.min(self.chars.len()));
        self.update();
        tail
    }

    /// Overwrites the highlight of `range` (in rendered columns).
    pub(crate) fn paint(&mut self, range: Range<usize>, class: Highlight) {
        let end = range.end.min(self.highlight.len());
        let start = range.start.min(end);
        self.highlight[start..end].fill(class);
    }

    /// Puts back a highlight array taken with [`Row::highlight`].
    pub(crate) fn restore_highlight(&mut self, saved: Vec<Highlight>) {
        if saved.len() == self.render.len() {
            self.highlight = saved;
        } else {
            log::warn!(
                "discarding stale highlight snapshot ({} != {})",
                saved.len(),
                self.render.len()
            );
            self.highlight = highlight::classify(&self.render);
        }
    }

    fn update(&mut self) {
        let tabs = self.chars.iter().filter(|&&b| b == b'\t').count();
        let mut render = Vec::with_capacity(self.chars.len() + tabs * (TAB_STOP - 1));
        for &b in &self.chars {
            if b == b'\t' {
                render.push(b' ');
                while render.len() % TAB_STOP != 0 {
                    render.push(b' ');
                }
            } else {
                render.push(b);
            }
        }
        self.highlight = highlight::classify(&render);
        self.render = render;
    }
}

fn advance(rx: usize, byte: u8) -> usize {
    if byte == b'\t' {
        rx + (TAB_STOP - rx % TAB_STOP)
    } else {
        rx + 1
    }
}
