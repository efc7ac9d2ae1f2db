use ada_common::{LineReader, Position};

/// How many consecutive premature end-of-input indications the cursor
/// tolerates before signalling [`Cursor::aborted`]. A well-formed file
/// never gets close to this; an unclosed block chasing a terminator that
/// never arrives does.
const MAX_EOF_STRIKES: u32 = 1000;

/// A current physical line, a byte offset within it, a line number, and
/// an opaque file position, refilled from a [`LineReader`] as the parser
/// consumes the line.
///
/// The cursor owns no lookahead beyond the current line -- callers that
/// need comment-aware skipping build it on top of [`Cursor::rest`] and
/// [`Cursor::move_by`]; see [`crate::Lexer`].
pub struct Cursor<R> {
    reader: R,
    line: String,
    offset: usize,
    line_number: u32,
    line_file_pos: u64,
    eof: bool,
    eof_strikes: u32,
    aborted: bool,
}

impl<R: LineReader> Cursor<R> {
    pub fn new(reader: R) -> Self {
        let mut cursor = Self {
            reader,
            line: String::new(),
            offset: 0,
            line_number: 0,
            line_file_pos: 0,
            eof: false,
            eof_strikes: 0,
            aborted: false,
        };
        cursor.read_new_line();
        cursor
    }

    /// Refills the line buffer, transparently skipping empty physical
    /// lines. Sets [`Cursor::is_eof`] once the reader is exhausted, and
    /// [`Cursor::aborted`] once `MAX_EOF_STRIKES` consecutive refills in a
    /// row have found nothing.
    pub fn read_new_line(&mut self) {
        loop {
            match self.reader.read_line() {
                Some(line) => {
                    self.eof_strikes = 0;
                    self.line_number = self.reader.source_line_number();
                    self.line_file_pos = self.reader.input_file_position() as u64;
                    self.line = line.to_string();
                    self.offset = 0;
                    if self.line.is_empty() {
                        continue;
                    }
                    return;
                }
                None => {
                    self.eof = true;
                    self.line.clear();
                    self.offset = 0;
                    self.eof_strikes += 1;
                    if self.eof_strikes >= MAX_EOF_STRIKES {
                        self.aborted = true;
                    }
                    return;
                }
            }
        }
    }

    /// True once a deep-exhaustion bailout has been signalled; every
    /// in-flight parser frame should unwind as soon as it observes this.
    pub fn aborted(&self) -> bool {
        self.aborted
    }

    /// True once the reader has returned `None` at least once. Unlike
    /// `aborted`, this is the ordinary, non-error end of input.
    pub fn is_eof(&self) -> bool {
        self.eof
    }

    /// The current source location: the line just read plus the opaque
    /// file offset of that line, advanced by the in-line byte offset.
    pub fn position(&self) -> Position {
        Position::new(self.line_number, self.line_file_pos + self.offset as u64)
    }

    /// The unconsumed remainder of the current physical line.
    pub fn rest(&self) -> &str {
        &self.line[self.offset.min(self.line.len())..]
    }

    /// The character immediately before the cursor, or `None` at column 0.
    pub fn char_before(&self) -> Option<char> {
        if self.offset == 0 {
            None
        } else {
            self.line[..self.offset].chars().next_back()
        }
    }

    /// Advances the offset by `n` bytes, transparently reading the next
    /// line if that reaches end-of-line.
    pub fn move_by(&mut self, n: usize) {
        self.offset += n;
        if self.offset >= self.line.len() {
            self.read_new_line();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ada_common::StrLineReader;

    #[test]
    fn rest_returns_unconsumed_tail() {
        let mut cursor = Cursor::new(StrLineReader::new("procedure Foo;"));
        assert_eq!(cursor.rest(), "procedure Foo;");
        cursor.move_by(10);
        assert_eq!(cursor.rest(), "Foo;");
    }

    #[test]
    fn move_by_crosses_line_boundaries() {
        let mut cursor = Cursor::new(StrLineReader::new("abc\ndef"));
        cursor.move_by(3);
        assert_eq!(cursor.rest(), "def");
        assert!(!cursor.is_eof());
    }

    #[test]
    fn empty_physical_lines_are_skipped() {
        let mut cursor = Cursor::new(StrLineReader::new("\n\nhello"));
        assert_eq!(cursor.rest(), "hello");
    }

    #[test]
    fn is_eof_once_input_exhausted() {
        let mut cursor = Cursor::new(StrLineReader::new("x"));
        cursor.move_by(1);
        assert!(cursor.is_eof());
        assert_eq!(cursor.rest(), "");
    }

    #[test]
    fn aborts_after_repeated_premature_eof() {
        let mut cursor = Cursor::new(StrLineReader::new(""));
        assert!(cursor.is_eof());
        for _ in 0..MAX_EOF_STRIKES {
            cursor.read_new_line();
        }
        assert!(cursor.aborted());
    }

    #[test]
    fn char_before_is_none_at_column_zero() {
        let cursor = Cursor::new(StrLineReader::new("abc"));
        assert_eq!(cursor.char_before(), None);
    }
}
