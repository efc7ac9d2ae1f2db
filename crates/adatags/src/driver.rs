//! Wires the cursor, lexer, parser core, and emitter together for one
//! file (§2 "driver"): initialise, read the first line, drive the
//! parser at ROOT until input is exhausted (or the deep-EOF bailout
//! trips), walk the finished tree, and emit tags to a sink.
//!
//! This is the one module in the workspace that touches the
//! filesystem -- everything upstream of it works purely against the
//! [`ada_common::LineReader`]/[`ada_common::TagSink`] traits.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use ada_common::{StrLineReader, TagOptions, TagSink};
use ada_parser::{emit_tags, parse_source, Outcome};

/// File extensions the spec recognises as Ada compilation units (§6).
const ADA_EXTENSIONS: [&str; 3] = ["adb", "ads", "Ada"];

/// True if `path`'s extension is one of `adb`/`ads`/`Ada`.
pub fn has_ada_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ADA_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

/// A driver-level failure: these happen before parsing ever starts, so
/// they're the one class of error this workspace surfaces to a host,
/// unlike the silent-by-design recovery inside the parser itself (§7).
#[derive(Debug)]
pub enum DriverError {
    /// `path` doesn't end in `.adb`, `.ads`, or `.Ada`.
    UnrecognizedExtension {
        path: String,
        extension: Option<String>,
    },
    /// Reading `path` from disk failed.
    Io { path: String, source: io::Error },
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnrecognizedExtension { path, extension } => match extension {
                Some(ext) => write!(
                    f,
                    "'{path}' has extension '.{ext}', not one of .adb/.ads/.Ada"
                ),
                None => write!(f, "'{path}' has no extension; expected .adb/.ads/.Ada"),
            },
            Self::Io { path, source } => write!(f, "failed to read '{path}': {source}"),
        }
    }
}

impl std::error::Error for DriverError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::UnrecognizedExtension { .. } => None,
            Self::Io { source, .. } => Some(source),
        }
    }
}

/// Runs the full pipeline over in-memory source text: builds the token
/// tree by driving the parser at ROOT to completion (or deep-EOF
/// abort), then walks it and hands tags to `sink`.
pub fn find_tags(source: &str, options: &TagOptions, sink: &mut dyn TagSink) -> Outcome {
    let reader = StrLineReader::new(source);
    let (tree, outcome) = parse_source(reader);
    emit_tags(&tree, options, sink);
    outcome
}

/// Reads `path` and runs [`find_tags`] over its contents. Rejects
/// files whose extension isn't `adb`/`ads`/`Ada` before ever touching
/// the parser (§6 "File extensions").
pub fn find_tags_in_file(
    path: &Path,
    options: &TagOptions,
    sink: &mut dyn TagSink,
) -> Result<Outcome, DriverError> {
    if !has_ada_extension(path) {
        return Err(DriverError::UnrecognizedExtension {
            path: path.display().to_string(),
            extension: path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(String::from),
        });
    }
    let source = fs::read_to_string(path).map_err(|source| DriverError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(find_tags(&source, options, sink))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ada_common::{Kind, VecSink};
    use std::io::Write;

    #[test]
    fn recognizes_the_three_documented_extensions() {
        assert!(has_ada_extension(Path::new("foo.adb")));
        assert!(has_ada_extension(Path::new("foo.ads")));
        assert!(has_ada_extension(Path::new("foo.Ada")));
        assert!(!has_ada_extension(Path::new("foo.ada")));
        assert!(!has_ada_extension(Path::new("foo.rs")));
        assert!(!has_ada_extension(Path::new("foo")));
    }

    #[test]
    fn find_tags_runs_the_full_pipeline_over_a_string() {
        let mut sink = VecSink::new();
        let outcome = find_tags(
            "package P is\n  X : Integer;\nend P;\n",
            &TagOptions::new(),
            &mut sink,
        );
        assert_eq!(outcome, Outcome::Completed);
        let names: Vec<&str> = sink.tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["P", "X"]);
        assert_eq!(sink.tags[0].kind, Kind::Package);
    }

    #[test]
    fn find_tags_in_file_rejects_unrecognized_extensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not_ada.txt");
        fs::write(&path, "package P is end P;").unwrap();
        let mut sink = VecSink::new();
        let err = find_tags_in_file(&path, &TagOptions::new(), &mut sink).unwrap_err();
        assert!(matches!(err, DriverError::UnrecognizedExtension { .. }));
        assert!(sink.tags.is_empty());
    }

    #[test]
    fn find_tags_in_file_reads_and_parses_an_adb_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hello.adb");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "procedure Hello is").unwrap();
        writeln!(file, "begin").unwrap();
        writeln!(file, "  null;").unwrap();
        writeln!(file, "end Hello;").unwrap();
        drop(file);

        let mut sink = VecSink::new();
        let outcome = find_tags_in_file(&path, &TagOptions::new(), &mut sink).unwrap();
        assert_eq!(outcome, Outcome::Completed);
        assert_eq!(sink.tags.len(), 1);
        assert_eq!(sink.tags[0].name, "Hello");
    }

    #[test]
    fn find_tags_in_file_reports_a_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.adb");
        let mut sink = VecSink::new();
        let err = find_tags_in_file(&path, &TagOptions::new(), &mut sink).unwrap_err();
        assert!(matches!(err, DriverError::Io { .. }));
    }
}
