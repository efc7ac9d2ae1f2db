use std::io::{self, Write};

use serde::Serialize;

use crate::kind::Kind;
use crate::position::Position;

/// One emitted tag. `scope`, when present, is the immediate enclosing
/// emit-visible ancestor's `(kind_long_name, name)` pair -- not a full
/// dotted path; the dotted path is only ever materialized as the `name`
/// of a qualified-tag secondary emission (`is_qualified = true`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagEntry {
    pub name: String,
    pub kind: Kind,
    pub scope: Option<(String, String)>,
    pub position: Position,
    pub is_file_scope: bool,
    /// True for the second, dotted-name emission produced when the host
    /// option `qualifiedTags` is set; false for the primary emission.
    pub is_qualified: bool,
}

/// Where the emitter sends finished tags. A host can collect them in
/// memory, stream them to a writer, or forward them into its own
/// indexing pipeline -- the parser never assumes any particular output
/// format.
pub trait TagSink {
    fn make_tag(&mut self, entry: TagEntry);
}

/// A [`TagSink`] that simply collects tags in order, for tests and for
/// hosts that want the full list before doing anything with it.
#[derive(Debug, Default)]
pub struct VecSink {
    pub tags: Vec<TagEntry>,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TagSink for VecSink {
    fn make_tag(&mut self, entry: TagEntry) {
        self.tags.push(entry);
    }
}

/// A [`TagSink`] that writes one ctags-style line per tag to any
/// [`std::io::Write`]: `name\tkind\tline\tscope`. Write failures are
/// recorded rather than propagated, since `make_tag` has no `Result` --
/// callers that care can inspect [`WriteSink::error`] afterward.
pub struct WriteSink<W: Write> {
    writer: W,
    error: Option<io::Error>,
}

impl<W: Write> WriteSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, error: None }
    }

    pub fn error(&self) -> Option<&io::Error> {
        self.error.as_ref()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> TagSink for WriteSink<W> {
    fn make_tag(&mut self, entry: TagEntry) {
        if self.error.is_some() {
            return;
        }
        let scope = match &entry.scope {
            Some((kind_name, name)) => format!("{kind_name}:{name}"),
            None => String::new(),
        };
        let result = writeln!(
            self.writer,
            "{}\t{}\t{}\t{}",
            entry.name,
            entry.kind.info().letter,
            entry.position.line,
            scope,
        );
        if let Err(err) = result {
            self.error = Some(err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(name: &str, scope: Option<(&str, &str)>) -> TagEntry {
        TagEntry {
            name: name.to_string(),
            kind: Kind::Variable,
            scope: scope.map(|(k, n)| (k.to_string(), n.to_string())),
            position: Position::new(1, 0),
            is_file_scope: false,
            is_qualified: false,
        }
    }

    #[test]
    fn vec_sink_preserves_emit_order() {
        let mut sink = VecSink::new();
        sink.make_tag(sample("A", None));
        sink.make_tag(sample("B", None));
        assert_eq!(sink.tags.len(), 2);
        assert_eq!(sink.tags[0].name, "A");
        assert_eq!(sink.tags[1].name, "B");
    }

    #[test]
    fn write_sink_formats_tab_separated_lines() {
        let mut buf = Vec::new();
        {
            let mut sink = WriteSink::new(&mut buf);
            sink.make_tag(sample("X", Some(("package", "Outer"))));
            assert!(sink.error().is_none());
        }
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "X\tv\t1\tpackage:Outer\n");
    }

    #[test]
    fn write_sink_leaves_scope_blank_when_absent() {
        let mut buf = Vec::new();
        {
            let mut sink = WriteSink::new(&mut buf);
            sink.make_tag(sample("Top", None));
        }
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "Top\tv\t1\t\n");
    }
}
