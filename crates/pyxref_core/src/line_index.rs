//! Byte-offset → (line, column) conversion for [`crate::emitter::OccurrenceEmitter`].
//!
//! Lines and columns are both 0-indexed, char-counted (e.g. `(0, 6, 7)`
//! for the single character `C` at the start of a file).

#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offset of the start of each line.
    line_starts: Vec<u32>,
    source: String,
}

impl LineIndex {
    pub fn new(source: &str) -> LineIndex {
        let mut line_starts = vec![0u32];
        for (offset, byte) in source.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push((offset + 1) as u32);
            }
        }
        LineIndex {
            line_starts,
            source: source.to_string(),
        }
    }

    /// Converts a byte offset into a 0-indexed `(line, column)` pair, with
    /// the column counted in chars from the start of the line.
    pub fn line_col(&self, offset: u32) -> (u32, u32) {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insertion) => insertion - 1,
        };
        let line_start = self.line_starts[line];
        let column = self.source[line_start as usize..offset as usize]
            .chars()
            .count() as u32;
        (line as u32, column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_line_offsets() {
        let index = LineIndex::new("class C:\n    pass\n");
        assert_eq!(index.line_col(0), (0, 0));
        assert_eq!(index.line_col(6), (0, 6));
    }

    #[test]
    fn second_line_offset() {
        let index = LineIndex::new("class C:\n    pass\n");
        let (line, col) = index.line_col(13);
        assert_eq!(line, 1);
        assert_eq!(col, 4);
    }
}
