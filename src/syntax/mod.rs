//! LTLf formula syntax: abstract syntax tree, canonical printing, and parsing.
//!
//! This module is a leaf: it depends on nothing else in the crate and
//! everything that handles formulas depends on it. Formula identity is
//! structural (two syntactically equal formulas compare equal and hash
//! identically), and the canonical textual form produced by `Display`
//! round-trips through [`parse_formula`].

mod formula;
mod parser;

pub use formula::Formula;
pub use parser::{parse_formula, ParseError};
