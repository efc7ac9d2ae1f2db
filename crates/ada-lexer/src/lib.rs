//! Input cursor and keyword/literal matcher for Ada source.
//!
//! [`Cursor`] is the line-oriented, comment-unaware primitive: a current
//! physical line, a byte offset, and a refill path back to a
//! [`LineReader`]. [`Lexer`] wraps a `Cursor` with Ada's comment handling
//! (`--` to end of line, recognised only at an identifier boundary) and
//! the keyword/literal matcher the parser drives.

mod cursor;

pub use cursor::Cursor;

use ada_common::{LineReader, Position};

/// True for characters that can appear inside an Ada identifier, used to
/// decide whether `--` starts a comment or sits inside one (`Foo--bar` is
/// a single identifier, not `Foo` followed by a comment).
pub fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// One of the characters §4.2 accepts immediately after a matched
/// keyword or literal: whitespace, `(`, `)`, `:`, `;`, or end of
/// buffer -- that exact set, no more.
fn is_word_boundary(c: Option<char>) -> bool {
    match c {
        None => true,
        Some(c) => c.is_whitespace() || matches!(c, '(' | ')' | ':' | ';'),
    }
}

/// Case-insensitive comparison of `literal` against the start of `buf`,
/// requiring a word boundary immediately after the match. A `None`/empty
/// `literal` matches vacuously (used by callers that want "nothing to
/// match" to succeed trivially).
pub fn cmp(buf: &str, literal: &str) -> bool {
    if literal.is_empty() {
        return true;
    }
    if buf.len() < literal.len() {
        return false;
    }
    let (head, tail) = buf.split_at(literal.len());
    if !head.eq_ignore_ascii_case(literal) {
        return false;
    }
    is_word_boundary(tail.chars().next())
}

/// Wraps a [`Cursor`] with comment-aware movement and keyword matching.
/// Owns the "last match" position: the location of the most recent
/// successful [`Lexer::match_literal`]/[`Lexer::match_keyword`], used to
/// position anonymous tokens whose name isn't itself at the cursor (a
/// synthetic `declare`/`loop` token is named after the keyword that
/// introduced it).
pub struct Lexer<R> {
    cursor: Cursor<R>,
    last_match: Position,
}

impl<R: LineReader> Lexer<R> {
    pub fn new(reader: R) -> Self {
        Self {
            cursor: Cursor::new(reader),
            last_match: Position::ZERO,
        }
    }

    pub fn is_eof(&self) -> bool {
        self.cursor.is_eof()
    }

    pub fn aborted(&self) -> bool {
        self.cursor.aborted()
    }

    pub fn position(&self) -> Position {
        self.cursor.position()
    }

    pub fn last_match(&self) -> Position {
        self.last_match
    }

    /// The unconsumed remainder of the current physical line, after
    /// consuming any comment currently at the cursor.
    pub fn rest(&mut self) -> &str {
        self.consume_comment();
        self.cursor.rest()
    }

    /// Consumes an Ada line comment (`--` to end of line) for as long as
    /// one sits at the cursor. Recognised only when the `--` is preceded
    /// by a non-identifier character, or begins the line.
    fn consume_comment(&mut self) {
        loop {
            if self.cursor.aborted() {
                return;
            }
            let rest = self.cursor.rest();
            if !rest.starts_with("--") {
                return;
            }
            let at_boundary = match self.cursor.char_before() {
                None => true,
                Some(c) => !is_ident_char(c),
            };
            if !at_boundary {
                return;
            }
            self.cursor.read_new_line();
        }
    }

    /// Advances past `n` bytes of the current line, then consumes any
    /// comment that follows.
    fn advance(&mut self, n: usize) {
        self.cursor.move_by(n);
        self.consume_comment();
    }

    /// Skips whitespace, comment-aware on both ends and between lines.
    pub fn skip_whitespace(&mut self) {
        self.consume_comment();
        loop {
            if self.cursor.aborted() {
                return;
            }
            let rest = self.cursor.rest();
            match rest.find(|c: char| !c.is_whitespace()) {
                Some(0) => break,
                Some(n) => self.advance(n),
                None => {
                    let n = rest.len().max(1);
                    self.advance(n);
                    if self.cursor.is_eof() {
                        return;
                    }
                }
            }
        }
    }

    /// Skips until the next whitespace character (or end of line/input).
    pub fn skip_until_whitespace(&mut self) {
        self.consume_comment();
        loop {
            if self.cursor.aborted() {
                return;
            }
            let rest = self.cursor.rest();
            match rest.find(|c: char| c.is_whitespace()) {
                Some(n) => {
                    self.advance(n);
                    return;
                }
                None => {
                    if rest.is_empty() {
                        return;
                    }
                    let n = rest.len();
                    self.advance(n);
                    if self.cursor.is_eof() {
                        return;
                    }
                }
            }
        }
    }

    /// Skips one word: a contiguous run of identifier characters, or (if
    /// the cursor doesn't sit on one) a single non-whitespace character.
    pub fn skip_past_word(&mut self) {
        self.skip_whitespace();
        if self.cursor.aborted() {
            return;
        }
        let rest = self.cursor.rest();
        let n = match rest.find(|c: char| !is_ident_char(c)) {
            Some(0) => rest
                .chars()
                .next()
                .map(|c| c.len_utf8())
                .unwrap_or(1),
            Some(n) => n,
            None => rest.len().max(1),
        };
        self.advance(n);
    }

    /// Scans forward, comment-aware, until the literal text `literal`
    /// (e.g. `";"`) is found, and advances past it. Stops at end of input
    /// if the literal never appears (the deep-EOF counter bounds how long
    /// this can run for an unclosed construct).
    pub fn skip_past(&mut self, literal: &str) {
        loop {
            if self.cursor.aborted() {
                return;
            }
            let rest = self.cursor.rest();
            match rest.find(literal) {
                Some(n) => {
                    self.advance(n + literal.len());
                    return;
                }
                None => {
                    if self.cursor.is_eof() {
                        return;
                    }
                    self.cursor.read_new_line();
                    self.consume_comment();
                }
            }
        }
    }

    /// Like [`Lexer::skip_past`], but requires the literal to start at an
    /// identifier boundary (so `skip_past_keyword("is")` won't stop
    /// inside `this_isnt`).
    pub fn skip_past_keyword(&mut self, kw: &str) {
        let kw_lower = kw.to_ascii_lowercase();
        loop {
            if self.cursor.aborted() {
                return;
            }
            let rest = self.cursor.rest();
            let lower = rest.to_ascii_lowercase();
            let mut search_from = 0;
            let mut found = None;
            while let Some(idx) = lower[search_from..].find(&kw_lower) {
                let pos = search_from + idx;
                let boundary_before =
                    pos == 0 || !is_ident_char(rest[..pos].chars().next_back().unwrap_or(' '));
                let boundary_after = is_word_boundary(rest[pos + kw.len()..].chars().next());
                if boundary_before && boundary_after {
                    found = Some(pos);
                    break;
                }
                search_from = pos + 1;
            }
            match found {
                Some(pos) => {
                    let n = pos + kw.len();
                    self.advance(n);
                    return;
                }
                None => {
                    if self.cursor.is_eof() {
                        return;
                    }
                    self.cursor.read_new_line();
                    self.consume_comment();
                }
            }
        }
    }

    /// Matches `s` literally (case-insensitive, word-bounded) at the
    /// cursor; on success advances past it and records the match
    /// position.
    pub fn match_literal(&mut self, s: &str) -> bool {
        self.skip_whitespace();
        if self.cursor.aborted() {
            return false;
        }
        let rest = self.cursor.rest();
        if !cmp(rest, s) {
            return false;
        }
        self.last_match = self.cursor.position();
        self.advance(s.len());
        true
    }

    /// Same as [`Lexer::match_literal`], named for readability at call
    /// sites that match a keyword rather than punctuation.
    pub fn match_keyword(&mut self, kw: &str) -> bool {
        self.match_literal(kw)
    }

    /// True if `kw` sits at the cursor (after skipping whitespace),
    /// without consuming it.
    pub fn peek_keyword(&mut self, kw: &str) -> bool {
        self.skip_whitespace();
        if self.cursor.aborted() {
            return false;
        }
        cmp(self.cursor.rest(), kw)
    }

    /// Matches a punctuation token (`(`, `)`, `<<`, `>>`, ...) at the
    /// cursor: an exact prefix match with no identifier-boundary
    /// requirement after it, unlike [`Lexer::match_literal`] -- `(` must
    /// match immediately before an identifier (`Foo(X)`), which a
    /// boundary check would reject.
    pub fn match_punct(&mut self, s: &str) -> bool {
        self.skip_whitespace();
        if self.cursor.aborted() {
            return false;
        }
        if self.cursor.rest().starts_with(s) {
            self.last_match = self.cursor.position();
            self.advance(s.len());
            true
        } else {
            false
        }
    }

    /// Non-consuming counterpart of [`Lexer::match_punct`].
    pub fn peek_punct(&mut self, s: &str) -> bool {
        self.skip_whitespace();
        if self.cursor.aborted() {
            return false;
        }
        self.cursor.rest().starts_with(s)
    }

    /// Advances past `n` raw bytes of the current line (comment-aware,
    /// like every other cursor movement here). Used by callers that scan
    /// the line text directly, such as [`ada_parser`]'s declaration-group
    /// scanner.
    pub fn skip_bytes(&mut self, n: usize) {
        self.advance(n);
    }

    /// Collects all text up to (not including) the first occurrence of
    /// `terminator`, advancing the cursor past the terminator. Lines are
    /// joined with a single space. Used for short bounded spans like a
    /// `separate (Parent.Child)` qualifier.
    pub fn capture_until(&mut self, terminator: &str) -> String {
        let mut buf = String::new();
        loop {
            if self.cursor.aborted() {
                return buf;
            }
            let rest = self.cursor.rest().to_string();
            match rest.find(terminator) {
                Some(n) => {
                    buf.push_str(&rest[..n]);
                    self.advance(n + terminator.len());
                    return buf;
                }
                None => {
                    buf.push_str(&rest);
                    if self.cursor.is_eof() {
                        return buf;
                    }
                    self.cursor.read_new_line();
                    self.consume_comment();
                    buf.push(' ');
                }
            }
        }
    }

    /// Reads the next bare word (identifier-like run of characters) at
    /// the cursor without requiring it to match anything in particular;
    /// used to read a declared name. Does not skip leading whitespace.
    ///
    /// Stops at `>` (in addition to whitespace and the usual
    /// punctuation) so a label written tight against its delimiter,
    /// `<<Done>>`, doesn't swallow the closing `>>` into the name.
    pub fn read_word(&mut self) -> String {
        self.skip_whitespace();
        if self.cursor.aborted() {
            return String::new();
        }
        let rest = self.cursor.rest();
        let end = rest
            .find(|c: char| c.is_whitespace() || matches!(c, '(' | ')' | ';' | ':' | ',' | '>'))
            .unwrap_or(rest.len());
        let word = rest[..end].to_string();
        self.advance(end);
        word
    }

    /// Attempts to match a statement label -- `<ident> :`, not `<ident>
    /// :=` -- at the cursor without consuming anything on failure. Used
    /// by mode CODE to recognise `Name: declare ...`/`Name: for ...
    /// loop` without committing to an identifier that turns out to be
    /// an ordinary statement.
    pub fn try_label(&mut self) -> Option<String> {
        self.skip_whitespace();
        if self.cursor.aborted() {
            return None;
        }
        let rest = self.cursor.rest();
        let end = rest.find(|c: char| !is_ident_char(c)).unwrap_or(rest.len());
        if end == 0 {
            return None;
        }
        let tail = &rest[end..];
        let tail_trimmed = tail.trim_start_matches([' ', '\t']);
        if !tail_trimmed.starts_with(':') || tail_trimmed.starts_with(":=") {
            return None;
        }
        let name = rest[..end].to_string();
        let consumed = rest.len() - tail_trimmed.len() + 1;
        self.last_match = self.cursor.position();
        self.advance(consumed);
        Some(name)
    }
}
