//! Parses one Ada compilation unit into a token tree and emits tags
//! from it.
//!
//! [`parse_source`] drives the mode-switched recursive-descent core
//! (see [`parser`]) to build a [`tree::TokenTree`]; [`emit_tags`] walks
//! that tree in source order and hands [`ada_common::TagEntry`]s to a
//! sink.

pub mod tree;

mod emit;
mod parser;

pub use emit::emit_tags;
pub use parser::{parse_source, Aborted, Outcome, Parser};
pub use tree::{TokenId, TokenNode, TokenTree};
