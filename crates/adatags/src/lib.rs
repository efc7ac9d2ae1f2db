//! Driver and option-parsing helpers for the `adatags` CLI.
//!
//! The heavy lifting -- the cursor, the lexer, the token tree, the
//! parser core, and the emitter -- lives in `ada-lexer`/`ada-parser`.
//! This crate is the thin end-to-end wiring (§2 "driver") plus the CLI
//! in `main.rs` that exercises it against a real file on disk.

pub mod driver;
