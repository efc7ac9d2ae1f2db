//! The mode-switched recursive-descent parser core (§4.4-§4.11).
//!
//! [`Parser::parse`] is the single entry point every mode eventually
//! recurses back into: it owns a `mode` value that can change mid-loop
//! (`ROOT` flips to `GENERIC` on the `generic` keyword, `DECLARATIONS`
//! flips to `CODE` on `begin`, `CODE` flips to `EXCEPTIONS` on
//! `exception`) and a frame-local list of detached generic formals
//! awaiting their subject.
//!
//! The 1000-premature-EOF bailout (§4.1, §7) is threaded through as a
//! `Result<(), Aborted>` rather than a non-local exit: every recursive
//! call is followed by `?`, so a deep-exhaustion abort unwinds the whole
//! call stack back to [`Parser::run`] without touching the partially
//! built tree further.

use ada_common::{Kind, LineReader, Position};
use ada_lexer::{is_ident_char, Lexer};

use crate::tree::{TokenId, TokenTree};

/// Signals that the cursor hit the deep-exhaustion bailout (§4.1): every
/// enclosing `parse` frame propagates this via `?` up to [`Parser::run`].
pub struct Aborted;

type PResult<T = ()> = Result<T, Aborted>;

/// What a completed (or aborted) top-level parse produced, reported
/// alongside the tree by [`parse_source`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Input was exhausted normally.
    Completed,
    /// The deep-EOF safety net tripped; the tree holds whatever was
    /// built before the bailout.
    Aborted,
}

/// The parser's four declarative/executable modes plus the root
/// compilation-unit mode (§2, §4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Root,
    Generic,
    Declarations,
    Code,
    Exceptions,
}

/// Where a [`Parser::parse_variables`] scan stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Terminator {
    Semicolon,
    CloseParen,
    Assign,
    Arrow,
    /// Input ran out (or aborted) before any terminator was found.
    Eof,
}

pub struct Parser<R> {
    lexer: Lexer<R>,
    tree: TokenTree,
}

impl<R: LineReader> Parser<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lexer: Lexer::new(reader),
            tree: TokenTree::new(),
        }
    }

    /// Drives the parser at `ROOT` until input is exhausted or the
    /// deep-EOF bailout trips, then hands back the tree built so far.
    pub fn run(mut self) -> (TokenTree, Outcome) {
        let root = self.tree.root();
        let outcome = match self.parse(Mode::Root, root) {
            Ok(()) => Outcome::Completed,
            Err(Aborted) => Outcome::Aborted,
        };
        (self.tree, outcome)
    }

    // ── Core dispatch loop (§4.4) ────────────────────────────────────

    fn parse(&mut self, mut mode: Mode, mut parent: TokenId) -> PResult {
        let mut pending_formals: Vec<TokenId> = Vec::new();
        loop {
            if self.lexer.aborted() {
                return Err(Aborted);
            }
            self.lexer.skip_whitespace();
            if self.lexer.aborted() {
                return Err(Aborted);
            }
            if self.lexer.is_eof() {
                return Ok(());
            }

            // Universal prelude: pragmas and context clauses are
            // skipped in every mode. `with` also introduces a generic
            // formal subprogram in GENERIC, so that mode handles it
            // itself instead of going through this shortcut.
            if self.lexer.match_keyword("pragma") || self.lexer.match_keyword("use") {
                self.lexer.skip_past(";");
                continue;
            }
            if mode != Mode::Generic && self.lexer.match_keyword("with") {
                self.lexer.skip_past(";");
                continue;
            }

            match mode {
                Mode::Root => {
                    if let Some(created) = self.try_parse_subject(parent)? {
                        if let Some(subject) = created {
                            self.tree.append_tokens(subject, &mut pending_formals);
                        }
                    } else if self.lexer.match_keyword("generic") {
                        mode = Mode::Generic;
                    } else if self.lexer.match_keyword("separate") {
                        self.lexer.match_punct("(");
                        let qualifier = self.lexer.capture_until(")");
                        let sep = self.tree.new_token(
                            Some(qualifier.trim().to_string()),
                            Kind::Separate,
                            false,
                            parent,
                            Position::ZERO,
                        );
                        parent = sep;
                    } else {
                        self.lexer.skip_past(";");
                    }
                }
                Mode::Generic => {
                    if self.lexer.peek_keyword("type") {
                        self.lexer.match_keyword("type");
                        self.lexer.skip_whitespace();
                        let pos = self.lexer.position();
                        let name = self.lexer.read_word();
                        self.lexer.skip_past(";");
                        let formal = self.tree.new_token(
                            Some(name),
                            Kind::Formal,
                            false,
                            self.tree.root(),
                            pos,
                        );
                        pending_formals.push(formal);
                    } else if self.lexer.peek_keyword("with") {
                        self.lexer.match_keyword("with");
                        if !self.lexer.match_keyword("procedure") {
                            self.lexer.match_keyword("function");
                        }
                        self.lexer.skip_whitespace();
                        let pos = self.lexer.position();
                        let name = self.lexer.read_word();
                        let formal = self.tree.new_token(
                            Some(name),
                            Kind::Formal,
                            false,
                            self.tree.root(),
                            pos,
                        );
                        if self.lexer.peek_punct("(") {
                            self.lexer.match_punct("(");
                            self.parse_param_list(formal, Kind::AutomaticVariable)?;
                        }
                        self.lexer.skip_past(";");
                        pending_formals.push(formal);
                    } else if let Some(created) = self.try_parse_subject(parent)? {
                        if let Some(subject) = created {
                            self.tree.append_tokens(subject, &mut pending_formals);
                        }
                        mode = Mode::Root;
                    } else {
                        self.lexer.skip_past(";");
                    }
                }
                Mode::Declarations => {
                    if let Some(created) = self.try_parse_subject(parent)? {
                        if let Some(subject) = created {
                            self.tree.append_tokens(subject, &mut pending_formals);
                        }
                    } else if self.lexer.match_keyword("generic") {
                        mode = Mode::Generic;
                    } else if self.lexer.match_keyword("type") {
                        self.parse_type(parent, Kind::Type)?;
                    } else if self.lexer.match_keyword("subtype") {
                        self.parse_type(parent, Kind::Subtype)?;
                    } else if self.lexer.match_keyword("begin") {
                        mode = Mode::Code;
                    } else if self.lexer.match_keyword("for") {
                        self.lexer.skip_past_keyword("use");
                        if self.lexer.match_keyword("record") {
                            self.lexer.skip_past_keyword("end");
                            self.lexer.match_keyword("record");
                        }
                        self.lexer.skip_past(";");
                    } else if self.lexer.match_keyword("end") {
                        self.lexer.skip_past(";");
                        return Ok(());
                    } else if self.lexer.match_keyword("entry") {
                        self.parse_subprogram(parent, Kind::Entry)?;
                    } else if self.lexer.match_keyword("private") {
                        self.tree.mark_private(parent);
                    } else {
                        self.parse_variables(parent, Kind::Variable)?;
                    }
                }
                Mode::Code => {
                    if self.lexer.match_keyword("declare") {
                        let pos = self.lexer.last_match();
                        let anon = self.tree.new_token(None, Kind::Anonymous, false, parent, pos);
                        self.parse(Mode::Declarations, anon)?;
                    } else if self.lexer.match_keyword("begin") {
                        let pos = self.lexer.last_match();
                        let anon = self.tree.new_token(None, Kind::Anonymous, false, parent, pos);
                        self.parse(Mode::Code, anon)?;
                    } else if self.lexer.match_keyword("exception") {
                        mode = Mode::Exceptions;
                    } else if self.lexer.match_keyword("end") {
                        if self.lexer.match_keyword("loop") {
                            self.lexer.skip_past(";");
                            return Ok(());
                        } else if self.ends_current_frame(parent) {
                            self.lexer.skip_past(";");
                            return Ok(());
                        } else {
                            self.lexer.skip_past(";");
                        }
                    } else if self.lexer.match_keyword("accept") {
                        self.parse_subprogram(parent, Kind::Entry)?;
                    } else if self.lexer.match_keyword("for") {
                        let pos = self.lexer.last_match();
                        let loop_tok =
                            self.tree
                                .new_token(Some("loop".into()), Kind::Anonymous, false, parent, pos);
                        self.parse_loop_var(loop_tok)?;
                        self.parse(Mode::Code, loop_tok)?;
                    } else if self.lexer.match_keyword("while") {
                        let pos = self.lexer.last_match();
                        self.lexer.skip_past_keyword("loop");
                        let loop_tok =
                            self.tree
                                .new_token(Some("loop".into()), Kind::Anonymous, false, parent, pos);
                        self.parse(Mode::Code, loop_tok)?;
                    } else if self.lexer.match_keyword("loop") {
                        let pos = self.lexer.last_match();
                        let loop_tok =
                            self.tree
                                .new_token(Some("loop".into()), Kind::Anonymous, false, parent, pos);
                        self.parse(Mode::Code, loop_tok)?;
                    } else if self.lexer.match_punct("<<") {
                        self.lexer.skip_whitespace();
                        let pos = self.lexer.position();
                        let name = self.lexer.read_word();
                        self.lexer.match_punct(">>");
                        self.tree.new_token(Some(name), Kind::Label, false, parent, pos);
                    } else if self.lexer.match_keyword("select")
                        || self.lexer.match_keyword("or")
                        || self.lexer.match_keyword("else")
                    {
                        // Consumed; the statement sequence that follows
                        // continues in this same frame.
                    } else if self.lexer.match_keyword("if") || self.lexer.match_keyword("elsif") {
                        self.lexer.skip_past_keyword("then");
                    } else if self.lexer.match_keyword("case") {
                        self.lexer.skip_past_keyword("is");
                    } else if self.lexer.match_keyword("when") {
                        self.lexer.skip_past("=>");
                    } else if let Some(label_name) = self.lexer.try_label() {
                        let pos = self.lexer.last_match();
                        let ident =
                            self.tree
                                .new_token(Some(label_name), Kind::Identifier, false, parent, pos);
                        if self.lexer.match_keyword("declare") {
                            self.parse(Mode::Declarations, ident)?;
                        } else if self.lexer.match_keyword("begin") {
                            self.parse(Mode::Code, ident)?;
                        } else if self.lexer.match_keyword("for") {
                            let loop_pos = self.lexer.last_match();
                            let loop_tok = self.tree.new_token(
                                Some("loop".into()),
                                Kind::Anonymous,
                                false,
                                ident,
                                loop_pos,
                            );
                            self.parse_loop_var(loop_tok)?;
                            self.parse(Mode::Code, loop_tok)?;
                        } else if self.lexer.match_keyword("while") {
                            let loop_pos = self.lexer.last_match();
                            self.lexer.skip_past_keyword("loop");
                            let loop_tok = self.tree.new_token(
                                Some("loop".into()),
                                Kind::Anonymous,
                                false,
                                ident,
                                loop_pos,
                            );
                            self.parse(Mode::Code, loop_tok)?;
                        } else if self.lexer.match_keyword("loop") {
                            let loop_pos = self.lexer.last_match();
                            let loop_tok = self.tree.new_token(
                                Some("loop".into()),
                                Kind::Anonymous,
                                false,
                                ident,
                                loop_pos,
                            );
                            self.parse(Mode::Code, loop_tok)?;
                        } else {
                            self.tree.free_token(ident);
                            self.lexer.skip_past(";");
                        }
                    } else {
                        self.lexer.skip_past(";");
                    }
                }
                Mode::Exceptions => {
                    if self.lexer.match_keyword("pragma") {
                        self.lexer.skip_past(";");
                    } else if self.lexer.match_keyword("when") {
                        self.parse_variables(parent, Kind::AutomaticVariable)?;
                    } else if self.lexer.match_keyword("end") {
                        self.lexer.skip_past(";");
                        return Ok(());
                    } else {
                        self.lexer.skip_past(";");
                    }
                }
            }
        }
    }

    /// True, and consuming, when the text at the cursor closes `parent`:
    /// its own name for a named frame, or an immediate `;` for an
    /// anonymous one. Used by mode CODE to tell `end Name;` (closes this
    /// frame) apart from `end if;`/`end case;` (an inner statement's own
    /// terminator, which this frame's loop just skips past and
    /// continues).
    fn ends_current_frame(&mut self, parent: TokenId) -> bool {
        match self.tree.get(parent).name.clone() {
            None => self.lexer.peek_punct(";"),
            Some(name) => {
                if self.lexer.peek_keyword(&name) {
                    self.lexer.match_keyword(&name);
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Recognises the subject keywords shared by ROOT, GENERIC, and
    /// DECLARATIONS (§4.4-§4.6): `None` if none of them matched (caller
    /// tries its own alternatives next); `Some(None)` if one matched but
    /// the sub-parser discarded the token (`is separate`); `Some(Some(id))`
    /// on a successfully created subject.
    fn try_parse_subject(&mut self, parent: TokenId) -> PResult<Option<Option<TokenId>>> {
        if self.lexer.match_keyword("package") {
            Ok(Some(self.parse_block(parent, Kind::Package)?))
        } else if self.lexer.match_keyword("procedure") || self.lexer.match_keyword("function") {
            Ok(Some(self.parse_subprogram(parent, Kind::Subprogram)?))
        } else if self.lexer.match_keyword("task") {
            Ok(Some(self.parse_block(parent, Kind::Task)?))
        } else if self.lexer.match_keyword("protected") {
            Ok(Some(self.parse_block(parent, Kind::Protected)?))
        } else {
            Ok(None)
        }
    }

    // ── §4.5 parse_block ─────────────────────────────────────────────

    fn parse_block(&mut self, parent: TokenId, kind: Kind) -> PResult<Option<TokenId>> {
        let mut is_spec = true;
        if self.lexer.match_keyword("body") {
            is_spec = false;
        } else if self.lexer.peek_keyword("type") {
            if matches!(kind, Kind::Task | Kind::Protected) {
                self.lexer.match_keyword("type");
            } else {
                return Ok(None);
            }
        }
        self.lexer.skip_whitespace();
        let pos = self.lexer.position();
        let name = self.lexer.read_word();
        let token = self.tree.new_token(Some(name), kind, is_spec, parent, pos);

        if self.lexer.peek_punct("(") {
            self.lexer.match_punct("(");
            self.parse_param_list(token, Kind::AutomaticVariable)?;
        }

        loop {
            if self.lexer.aborted() {
                return Err(Aborted);
            }
            self.lexer.skip_whitespace();
            if self.lexer.aborted() {
                return Err(Aborted);
            }
            if self.lexer.is_eof() {
                return Ok(Some(token));
            }
            if self.lexer.match_keyword("is") {
                if self.lexer.match_keyword("separate") {
                    self.lexer.skip_past(";");
                    self.tree.free_token(token);
                    return Ok(None);
                }
                if self.lexer.peek_keyword("new") {
                    self.lexer.skip_past(";");
                    return Ok(Some(token));
                }
                self.parse(Mode::Declarations, token)?;
                self.tree.set_is_spec(token, false);
                return Ok(Some(token));
            }
            if self.lexer.match_keyword("renames") {
                self.lexer.skip_past(";");
                return Ok(Some(token));
            }
            if self.lexer.match_punct(";") {
                self.tree.set_is_spec(token, true);
                return Ok(Some(token));
            }
            self.lexer.skip_past_word();
        }
    }

    // ── §4.6 parse_subprogram ────────────────────────────────────────

    fn parse_subprogram(&mut self, parent: TokenId, kind: Kind) -> PResult<Option<TokenId>> {
        self.lexer.skip_whitespace();
        let pos = self.lexer.position();
        let name = self.lexer.read_word();
        let token = self.tree.new_token(Some(name), kind, true, parent, pos);

        if self.lexer.peek_punct("(") {
            self.lexer.match_punct("(");
            let n = self.parse_param_list(token, Kind::AutomaticVariable)?;
            if kind == Kind::Entry && n == 0 && self.lexer.peek_punct("(") {
                self.lexer.match_punct("(");
                self.parse_param_list(token, Kind::AutomaticVariable)?;
            }
        }

        loop {
            if self.lexer.aborted() {
                return Err(Aborted);
            }
            self.lexer.skip_whitespace();
            if self.lexer.aborted() {
                return Err(Aborted);
            }
            if self.lexer.is_eof() {
                return Ok(Some(token));
            }
            if self.lexer.match_keyword("is") {
                if self.lexer.match_keyword("separate") {
                    self.lexer.skip_past(";");
                    self.tree.free_token(token);
                    return Ok(None);
                }
                if self.lexer.peek_keyword("new") {
                    self.lexer.skip_past(";");
                    return Ok(Some(token));
                }
                self.parse(Mode::Declarations, token)?;
                self.tree.set_is_spec(token, false);
                return Ok(Some(token));
            }
            if self.lexer.match_keyword("renames") {
                self.lexer.skip_past(";");
                return Ok(Some(token));
            }
            if self.lexer.match_keyword("do") {
                self.parse(Mode::Code, token)?;
                self.tree.set_is_spec(token, false);
                return Ok(Some(token));
            }
            if self.lexer.match_punct(";") {
                self.tree.set_is_spec(token, true);
                return Ok(Some(token));
            }
            self.lexer.skip_past_word();
        }
    }

    // ── §4.9 parse_loop_var ──────────────────────────────────────────

    fn parse_loop_var(&mut self, parent: TokenId) -> PResult {
        self.lexer.skip_whitespace();
        let pos = self.lexer.position();
        let name = self.lexer.read_word();
        self.tree.new_token(Some(name), Kind::AutomaticVariable, false, parent, pos);
        self.lexer.skip_past_keyword("loop");
        if self.lexer.aborted() {
            return Err(Aborted);
        }
        Ok(())
    }

    // ── §4.8 parse_type ──────────────────────────────────────────────

    fn parse_type(&mut self, parent: TokenId, kind: Kind) -> PResult<TokenId> {
        self.lexer.skip_whitespace();
        let pos = self.lexer.position();
        let name = self.lexer.read_word();
        let token = self.tree.new_token(Some(name), kind, true, parent, pos);

        if self.lexer.peek_punct("(") {
            self.lexer.match_punct("(");
            self.parse_param_list(token, Kind::AutomaticVariable)?;
        }

        if self.lexer.match_keyword("is") {
            self.tree.set_is_spec(token, false);
            if self.lexer.peek_punct("(") {
                self.lexer.match_punct("(");
                self.parse_enum_list(token)?;
            } else if self.lexer.match_keyword("record") {
                self.parse_record_body(token)?;
            } else {
                self.lexer.skip_past(";");
            }
        } else {
            self.tree.set_is_spec(token, true);
            self.lexer.skip_past(";");
        }
        if self.lexer.aborted() {
            return Err(Aborted);
        }
        Ok(token)
    }

    fn parse_enum_list(&mut self, parent: TokenId) -> PResult {
        loop {
            let (_, terminator) = self.parse_variables(parent, Kind::EnumLiteral)?;
            match terminator {
                Terminator::Semicolon => continue,
                _ => break,
            }
        }
        self.lexer.skip_past(";");
        Ok(())
    }

    fn parse_record_body(&mut self, parent: TokenId) -> PResult {
        loop {
            if self.lexer.aborted() {
                return Err(Aborted);
            }
            self.lexer.skip_whitespace();
            if self.lexer.aborted() {
                return Err(Aborted);
            }
            if self.lexer.is_eof() {
                return Ok(());
            }
            if self.lexer.match_keyword("end") {
                self.lexer.match_keyword("record");
                self.lexer.skip_past(";");
                return Ok(());
            }
            if self.lexer.match_keyword("case") {
                self.lexer.skip_past_keyword("is");
                continue;
            }
            if self.lexer.match_keyword("when") {
                self.lexer.skip_past("=>");
                continue;
            }
            self.parse_variables(parent, Kind::RecordComponent)?;
        }
    }

    /// Parses a comma/semicolon-grouped parameter, discriminant, or
    /// generic-formal-subprogram-parameter list up to and including its
    /// closing `)`, whose opening `(` the caller already consumed.
    /// Returns the number of tokens produced.
    fn parse_param_list(&mut self, parent: TokenId, kind: Kind) -> PResult<usize> {
        let mut count = 0;
        loop {
            let (tokens, terminator) = self.parse_variables(parent, kind)?;
            count += tokens.len();
            match terminator {
                Terminator::Semicolon => continue,
                _ => break,
            }
        }
        Ok(count)
    }

    // ── §4.7 parse_variables ─────────────────────────────────────────

    /// Scans a single declaration group (`v1, v2 : [constant|exception]
    /// Type ...`), possibly spanning several physical lines, and
    /// produces one token per name with that name's own line/position
    /// attributed (not the group's start line).
    fn parse_variables(&mut self, parent: TokenId, mut kind: Kind) -> PResult<(Vec<TokenId>, Terminator)> {
        let mut buf = String::new();
        let mut segments: Vec<(usize, Position)> = Vec::new();
        let mut depth: i32 = 0;
        let mut terminator = Terminator::Eof;

        loop {
            if self.lexer.aborted() {
                return Err(Aborted);
            }
            self.lexer.skip_whitespace();
            if self.lexer.aborted() {
                return Err(Aborted);
            }
            if self.lexer.is_eof() {
                break;
            }
            segments.push((buf.len(), self.lexer.position()));
            let rest = self.lexer.rest().to_string();

            let mut found: Option<(usize, Terminator, usize)> = None;
            let mut i = 0usize;
            while i < rest.len() {
                let c = rest[i..].chars().next().unwrap();
                match c {
                    '(' => depth += 1,
                    ')' => {
                        if depth == 0 {
                            found = Some((i, Terminator::CloseParen, 1));
                            break;
                        }
                        depth -= 1;
                    }
                    ';' if depth == 0 => {
                        found = Some((i, Terminator::Semicolon, 1));
                        break;
                    }
                    ':' if depth == 0 && rest[i + c.len_utf8()..].starts_with('=') => {
                        found = Some((i, Terminator::Assign, 2));
                        break;
                    }
                    '=' if depth == 0 && rest[i..].starts_with("=>") => {
                        found = Some((i, Terminator::Arrow, 2));
                        break;
                    }
                    _ => {}
                }
                i += c.len_utf8();
            }

            if let Some((idx, term, consume_len)) = found {
                buf.push_str(&rest[..idx]);
                self.lexer.skip_bytes(idx + consume_len);
                terminator = term;
                break;
            }
            buf.push_str(&rest);
            buf.push('\n');
            self.lexer.skip_bytes(rest.len());
            if self.lexer.is_eof() {
                break;
            }
        }

        if terminator == Terminator::Assign {
            terminator = self.skip_default_value();
        }

        let is_enum = kind == Kind::EnumLiteral;
        let sep = find_separator(&buf);
        let region_end = match sep {
            Some(idx) => idx,
            None if is_enum && terminator == Terminator::CloseParen => buf.len(),
            None => return Ok((Vec::new(), terminator)),
        };

        if kind == Kind::Variable {
            if let Some(idx) = sep {
                let word = peek_word_at(&buf, idx + 1);
                if word.eq_ignore_ascii_case("constant") {
                    kind = Kind::Constant;
                } else if word.eq_ignore_ascii_case("exception") {
                    kind = Kind::Exception;
                }
            }
        }

        let region = &buf[..region_end];
        let names = split_names(region, &segments);
        let mut tokens = Vec::with_capacity(names.len());
        for (name, pos) in names {
            tokens.push(self.tree.new_token(Some(name), kind, false, parent, pos));
        }
        Ok((tokens, terminator))
    }

    /// Consumes a `:= <expr>` default-value tail that `parse_variables`
    /// stopped at, tracking parenthesis depth so a call inside the
    /// default (`:= Foo(1)`) doesn't look like the list's own closing
    /// `)`. Returns whichever real terminator -- another group's `;` or
    /// the list's `)` -- follows it.
    fn skip_default_value(&mut self) -> Terminator {
        let mut depth: i32 = 0;
        loop {
            if self.lexer.aborted() {
                return Terminator::Eof;
            }
            let rest = self.lexer.rest().to_string();
            let mut i = 0usize;
            while i < rest.len() {
                let c = rest[i..].chars().next().unwrap();
                match c {
                    '(' => depth += 1,
                    ')' => {
                        if depth == 0 {
                            self.lexer.skip_bytes(i + 1);
                            return Terminator::CloseParen;
                        }
                        depth -= 1;
                    }
                    ';' if depth == 0 => {
                        self.lexer.skip_bytes(i + 1);
                        return Terminator::Semicolon;
                    }
                    _ => {}
                }
                i += c.len_utf8();
            }
            self.lexer.skip_bytes(rest.len());
            if self.lexer.is_eof() {
                return Terminator::Eof;
            }
        }
    }
}

/// The first unnested `:` in `buf` that isn't the start of `:=`, or
/// `None` if the group has no type separator (§4.7 step 2).
fn find_separator(buf: &str) -> Option<usize> {
    let mut depth = 0i32;
    let mut i = 0usize;
    while i < buf.len() {
        let c = buf[i..].chars().next().unwrap();
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            ':' if depth == 0 => {
                if !buf[i + c.len_utf8()..].starts_with('=') {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += c.len_utf8();
    }
    None
}

/// The first identifier-like word starting at or after byte `start` in
/// `buf`, used to peek at the word right after the `:` separator
/// (`constant`/`exception` reclassification, §4.7 step 3).
fn peek_word_at(buf: &str, start: usize) -> &str {
    let s = buf[start.min(buf.len())..].trim_start();
    let end = s.find(|c: char| !is_ident_char(c)).unwrap_or(s.len());
    &s[..end]
}

/// Splits `region` on whitespace/comma, dropping the pseudo-words `in`
/// and `out`, pairing each surviving word with the source position of
/// the physical line it came from (§4.7 step 5).
fn split_names(region: &str, segments: &[(usize, Position)]) -> Vec<(String, Position)> {
    let mut result = Vec::new();
    let mut word_start: Option<usize> = None;
    let is_sep = |c: char| c.is_whitespace() || c == ',';

    let push = |start: usize, end: usize, result: &mut Vec<(String, Position)>| {
        let word = &region[start..end];
        if word.is_empty() || word.eq_ignore_ascii_case("in") || word.eq_ignore_ascii_case("out") {
            return;
        }
        result.push((word.to_string(), position_for_offset(segments, start)));
    };

    for (off, c) in region.char_indices() {
        if is_sep(c) {
            if let Some(start) = word_start.take() {
                push(start, off, &mut result);
            }
        } else if word_start.is_none() {
            word_start = Some(off);
        }
    }
    if let Some(start) = word_start {
        push(start, region.len(), &mut result);
    }
    result
}

/// The position of the last segment whose start is at or before
/// `offset`, i.e. the physical line `offset` (a byte index into the
/// scratch buffer) falls on.
fn position_for_offset(segments: &[(usize, Position)], offset: usize) -> Position {
    let mut result = Position::ZERO;
    for &(start, pos) in segments {
        if start <= offset {
            result = pos;
        } else {
            break;
        }
    }
    result
}

/// Parses one compilation unit from `reader`, returning the built token
/// tree and whether the parse completed normally or hit the deep-EOF
/// bailout (§2 "driver", §4.13).
pub fn parse_source<R: LineReader>(reader: R) -> (TokenTree, Outcome) {
    Parser::new(reader).run()
}
