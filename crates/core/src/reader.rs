//! Character source: turns ordered text lines into a single-pass character
//! stream with synthesized line breaks.

use std::rc::Rc;

use crate::token::Position;

/// Produces the characters of a list of lines, inserting exactly one `'\n'`
/// between consecutive lines and none after the last one.
///
/// Tracks the position of the most recently produced character, plus a
/// separately markable snapshot the tokenizer uses to stamp a token with the
/// position of its first character.
pub struct CharSource {
    source: Rc<str>,
    lines: Vec<Vec<char>>,
    line: usize,
    column: usize,
    current: Option<Position>,
    marked: Option<Position>,
}

impl CharSource {
    pub fn new<S: AsRef<str>>(source: &str, lines: &[S]) -> Self {
        CharSource {
            source: Rc::from(source),
            lines: lines.iter().map(|l| l.as_ref().chars().collect()).collect(),
            line: 0,
            column: 0,
            current: None,
            marked: None,
        }
    }

    pub fn source(&self) -> &Rc<str> {
        &self.source
    }

    /// Returns the next character, or `None` once the input is exhausted.
    pub fn next_char(&mut self) -> Option<char> {
        let text = self.lines.get(self.line)?;

        if let Some(&c) = text.get(self.column) {
            self.column += 1;
            self.current = Some(Position::new(self.line as u32 + 1, self.column as u32));
            return Some(c);
        }

        if self.line + 1 < self.lines.len() {
            self.current = Some(Position::new(
                self.line as u32 + 1,
                text.len() as u32 + 1,
            ));
            self.line += 1;
            self.column = 0;
            Some('\n')
        } else {
            self.line = self.lines.len();
            None
        }
    }

    /// Position of the most recently produced character. `None` until the
    /// first character has been read.
    pub fn location(&self) -> Option<Position> {
        self.current
    }

    /// Snapshot the current location.
    pub fn mark(&mut self) {
        self.marked = self.current;
    }

    pub fn marked(&self) -> Option<Position> {
        self.marked
    }
}

impl Iterator for CharSource {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        self.next_char()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newline_between_lines_but_not_after_last() {
        let reader = CharSource::new("t.cfg", &["ab", "c"]);
        let text: String = reader.collect();
        assert_eq!(text, "ab\nc");
    }

    #[test]
    fn empty_lines_produce_bare_newlines() {
        let reader = CharSource::new("t.cfg", &["", "", "x"]);
        let text: String = reader.collect();
        assert_eq!(text, "\n\nx");
    }

    #[test]
    fn location_is_undefined_before_first_char() {
        let reader = CharSource::new("t.cfg", &["abc"]);
        assert_eq!(reader.location(), None);
    }

    #[test]
    fn empty_input_never_has_a_location() {
        let empty: [&str; 0] = [];
        let mut reader = CharSource::new("t.cfg", &empty);
        assert_eq!(reader.next_char(), None);
        assert_eq!(reader.next_char(), None);
        assert_eq!(reader.location(), None);
    }

    #[test]
    fn tracks_line_and_column_of_last_char() {
        let mut reader = CharSource::new("t.cfg", &["ab", "c"]);
        assert_eq!(reader.next_char(), Some('a'));
        assert_eq!(reader.location(), Some(Position::new(1, 1)));
        assert_eq!(reader.next_char(), Some('b'));
        assert_eq!(reader.location(), Some(Position::new(1, 2)));
        assert_eq!(reader.next_char(), Some('\n'));
        assert_eq!(reader.location(), Some(Position::new(1, 3)));
        assert_eq!(reader.next_char(), Some('c'));
        assert_eq!(reader.location(), Some(Position::new(2, 1)));
        assert_eq!(reader.next_char(), None);
    }

    #[test]
    fn mark_is_independent_of_further_reads() {
        let mut reader = CharSource::new("t.cfg", &["xyz"]);
        reader.next_char();
        reader.mark();
        reader.next_char();
        reader.next_char();
        assert_eq!(reader.marked(), Some(Position::new(1, 1)));
        assert_eq!(reader.location(), Some(Position::new(1, 3)));
    }
}
