use crate::row::Row;

/// The ordered line collection plus its unsaved-changes flag.
#[derive(Debug, Clone, Default)]
pub struct Document {
    rows: Vec<Row>,
    dirty: bool,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a clean document from lines whose terminators may still be attached.
    pub fn from_lines<I, L>(lines: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<Vec<u8>>,
    {
        let mut doc = Self::new();
        for line in lines {
            let mut line = line.into();
            while matches!(line.last(), Some(b'\n' | b'\r')) {
                line.pop();
            }
            doc.insert_row(doc.num_rows(), line);
        }
        doc.dirty = false;
        doc
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, at: usize) -> Option<&Row> {
        self.rows.get(at)
    }

    pub(crate) fn row_mut(&mut self, at: usize) -> Option<&mut Row> {
        self.rows.get_mut(at)
    }

    /// Logical length of row `at`; the virtual line past the end has length 0.
    pub fn row_len(&self, at: usize) -> usize {
        self.rows.get(at).map_or(0, Row::size)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    pub fn insert_row(&mut self, at: usize, chars: impl Into<Vec<u8>>) {
        if at > self.rows.len() {
            return;
        }
        self.rows.insert(at, Row::new(chars.into()));
        self.dirty = true;
    }

    pub fn delete_row(&mut self, at: usize) {
        if at >= self.rows.len() {
            return;
        }
        self.rows.remove(at);
        self.dirty = true;
    }

    pub fn insert_char(&mut self, row: usize, at: usize, byte: u8) {
        if let Some(r) = self.rows.get_mut(row) {
            r.insert_char(at, byte);
            self.dirty = true;
        }
    }

    pub fn delete_char(&mut self, row: usize, at: usize) {
        if let Some(r) = self.rows.get_mut(row) {
            if r.delete_char(at) {
                self.dirty = true;
            }
        }
    }

    pub fn append_string(&mut self, row: usize, bytes: &[u8]) {
        if let Some(r) = self.rows.get_mut(row) {
            r.append(bytes);
            self.dirty = true;
        }
    }

    /// Breaks row `row` at logical column `col`; the tail becomes row `row + 1`.
    ///
    /// Splitting at column 0 (or on the virtual last line) inserts an empty
    /// row above instead, which leaves the same lines behind.
    pub fn split_row(&mut self, row: usize, col: usize) {
        if col == 0 || row >= self.rows.len() {
            self.insert_row(row.min(self.rows.len()), Vec::new());
            return;
        }
        let tail = self.rows[row].split_off(col);
        self.insert_row(row + 1, tail);
    }

    /// Joins row `row` onto the end of the previous one.
    ///
    /// Returns the previous row's length before the join, which is where the
    /// cursor belongs afterwards, or `None` when there is nothing to merge.
    pub fn merge_row_up(&mut self, row: usize) -> Option<usize> {
        if row == 0 || row >= self.rows.len() {
            return None;
        }
        let moved = self.rows.remove(row);
        let prev = &mut self.rows[row - 1];
        let join_at = prev.size();
        prev.append(moved.chars());
        self.dirty = true;
        Some(join_at)
    }

    /// Every row followed by `\n`, along with the expected byte count.
    pub fn serialize(&self) -> (Vec<u8>, usize) {
        let total: usize = self.rows.iter().map(|r| r.size() + 1).sum();
        let mut buf = Vec::with_capacity(total);
        for row in &self.rows {
            buf.extend_from_slice(row.chars());
            buf.push(b'\n');
        }
        (buf, total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(lines: &[&str]) -> Document {
        Document::from_lines(lines.iter().map(|l| l.as_bytes().to_vec()))
    }

    #[test]
    fn test_from_lines_strips_terminators_and_is_clean() {
        let d = doc(&["one\r\n", "two\n", "three"]);
        assert_eq!(d.num_rows(), 3);
        assert_eq!(d.row(0).unwrap().chars(), b"one");
        assert_eq!(d.row(1).unwrap().chars(), b"two");
        assert_eq!(d.row(2).unwrap().chars(), b"three");
        assert!(!d.is_dirty());
    }

    #[test]
    fn test_insert_row_out_of_range_is_ignored() {
        let mut d = doc(&["a"]);
        d.insert_row(5, b"x".to_vec());
        assert_eq!(d.num_rows(), 1);
        assert!(!d.is_dirty());
        d.insert_row(1, b"b".to_vec());
        assert_eq!(d.num_rows(), 2);
        assert!(d.is_dirty());
    }

    #[test]
    fn test_delete_row_shifts_up() {
        let mut d = doc(&["a", "b", "c"]);
        d.delete_row(1);
        assert_eq!(d.row(1).unwrap().chars(), b"c");
        assert!(d.is_dirty());
    }

    #[test]
    fn test_insert_char_out_of_bounds_appends() {
        let mut d = doc(&["ab"]);
        d.insert_char(0, 100, b'c');
        assert_eq!(d.row(0).unwrap().chars(), b"abc");
    }

    #[test]
    fn test_delete_char_out_of_bounds_is_noop() {
        let mut d = doc(&["ab"]);
        d.delete_char(0, 2);
        assert_eq!(d.row(0).unwrap().chars(), b"ab");
        assert!(!d.is_dirty());
    }

    #[test]
    fn test_split_at_zero_inserts_empty_row_above() {
        let mut d = doc(&["abc"]);
        d.split_row(0, 0);
        assert_eq!(d.row(0).unwrap().chars(), b"");
        assert_eq!(d.row(1).unwrap().chars(), b"abc");
    }

    #[test]
    fn test_merge_first_row_is_noop() {
        let mut d = doc(&["abc", "def"]);
        assert_eq!(d.merge_row_up(0), None);
        assert_eq!(d.num_rows(), 2);
    }

    #[test]
    fn test_serialize_counts_bytes() {
        let d = doc(&["ab", "", "c"]);
        let (buf, len) = d.serialize();
        assert_eq!(buf, b"ab\n\nc\n");
        assert_eq!(len, buf.len());
    }
}
