/// A source location: a 1-based line number plus an opaque file offset.
///
/// The file offset is whatever the host's [`crate::reader::LineReader`]
/// reports for the line just returned (typically a byte offset into the
/// file); this crate never interprets it beyond comparing and forwarding
/// it to the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize)]
pub struct Position {
    pub line: u32,
    pub file_offset: u64,
}

impl Position {
    pub fn new(line: u32, file_offset: u64) -> Self {
        Self { line, file_offset }
    }

    /// Sentinel position used for tokens created without a real cursor
    /// fix (the root sentinel, detached generic-formal frames before
    /// attachment). Never reaches the emitter since those tokens are
    /// never emitted.
    pub const ZERO: Position = Position {
        line: 0,
        file_offset: 0,
    };
}
