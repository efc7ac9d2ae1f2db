/// A source of input lines for the lexer's cursor.
///
/// The lexer never opens files or owns buffering itself -- it pulls one
/// line at a time from whatever implements this trait, the same way the
/// parser never writes tags itself but hands them to a [`crate::sink::TagSink`].
/// A host embedding the extractor over an already-open file, a network
/// stream, or an in-memory buffer only needs to implement `read_line`.
pub trait LineReader {
    /// Returns the next physical line of input, without its trailing
    /// newline, or `None` at end of input. The returned line borrows
    /// from the reader's own line buffer, valid until the next call.
    fn read_line(&mut self) -> Option<&str>;

    /// The 1-based line number of the line just returned by `read_line`.
    fn source_line_number(&self) -> u32;

    /// The opaque file offset at which the line just returned by
    /// `read_line` started. Never interpreted by the cursor beyond
    /// comparing and forwarding it to the sink.
    fn input_file_position(&self) -> u32;
}

/// An in-memory [`LineReader`] over a `&str`, splitting on `\n` and
/// tracking byte offsets and line numbers. Used by tests and by any host
/// that has already slurped the file into memory.
pub struct StrLineReader<'a> {
    rest: &'a str,
    current: String,
    line_number: u32,
    /// Byte offset of the start of `rest` (where the *next* line will
    /// begin), advanced past each line as it's consumed.
    next_file_position: u32,
    /// Byte offset of the start of `current`, the line just returned --
    /// this, not `next_file_position`, is what `input_file_position`
    /// reports.
    current_file_position: u32,
}

impl<'a> StrLineReader<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            rest: source,
            current: String::new(),
            line_number: 0,
            next_file_position: 0,
            current_file_position: 0,
        }
    }
}

impl<'a> LineReader for StrLineReader<'a> {
    fn read_line(&mut self) -> Option<&str> {
        if self.rest.is_empty() {
            return None;
        }
        let line_start = self.next_file_position;
        let (line, advance) = match self.rest.find('\n') {
            Some(idx) => {
                let line = &self.rest[..idx];
                (line.strip_suffix('\r').unwrap_or(line), idx + 1)
            }
            None => (self.rest, self.rest.len()),
        };
        self.current = line.to_string();
        self.rest = &self.rest[advance.min(self.rest.len())..];
        self.current_file_position = line_start;
        self.next_file_position = line_start + advance as u32;
        self.line_number += 1;
        Some(&self.current)
    }

    fn source_line_number(&self) -> u32 {
        self.line_number
    }

    fn input_file_position(&self) -> u32 {
        self.current_file_position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_newlines_and_tracks_line_numbers() {
        let mut reader = StrLineReader::new("one\ntwo\nthree");
        assert_eq!(reader.read_line(), Some("one"));
        assert_eq!(reader.source_line_number(), 1);
        assert_eq!(reader.read_line(), Some("two"));
        assert_eq!(reader.source_line_number(), 2);
        assert_eq!(reader.read_line(), Some("three"));
        assert_eq!(reader.source_line_number(), 3);
        assert_eq!(reader.read_line(), None);
    }

    #[test]
    fn strips_trailing_carriage_return() {
        let mut reader = StrLineReader::new("alpha\r\nbeta");
        assert_eq!(reader.read_line(), Some("alpha"));
        assert_eq!(reader.read_line(), Some("beta"));
    }

    #[test]
    fn empty_input_yields_no_lines() {
        let mut reader = StrLineReader::new("");
        assert_eq!(reader.read_line(), None);
    }

    #[test]
    fn trailing_newline_does_not_produce_a_phantom_empty_line() {
        let mut reader = StrLineReader::new("only\n");
        assert_eq!(reader.read_line(), Some("only"));
        assert_eq!(reader.read_line(), None);
    }

    #[test]
    fn file_position_reports_the_start_of_the_line_just_returned() {
        let mut reader = StrLineReader::new("abc\nde");
        reader.read_line();
        assert_eq!(reader.input_file_position(), 0);
        reader.read_line();
        assert_eq!(reader.input_file_position(), 4);
    }
}
