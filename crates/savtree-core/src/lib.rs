//! # savtree-core
//!
//! Lexer and recursive-descent parser for the loosely-structured text
//! serialization format used by strategy-game save files. Parsing yields a
//! generic, JSON-compatible [`Value`] tree.
//!
//! The format resembles a key-value configuration language but leaves its
//! structure implicit: blocks are objects or arrays depending on their
//! contents, keys repeat (and merge), values are untyped at the lexical level,
//! and some malformed input is tolerated rather than rejected.
//!
//! ## Quick start
//!
//! ```rust
//! let input = r#"
//! version="Libra v3.3.2"
//! flags={ a=1 b=2 }
//! spy_networks={ 52 56 221 }
//! "#;
//!
//! let doc = savtree_core::parse(input.as_bytes()).unwrap();
//! assert_eq!(
//!     serde_json::to_string(&doc.root).unwrap(),
//!     r#"{"flags":{"a":1,"b":2},"spy_networks":[52,56,221],"version":"Libra v3.3.2"}"#
//! );
//! ```
//!
//! ## Modules
//!
//! - [`lexer`] — byte stream → classified tokens
//! - [`parser`] — tokens → [`Value`] tree (disambiguation + duplicate-key merge)
//! - [`value`] — the output data model
//! - [`error`] — typed parse failures

pub mod error;
pub mod lexer;
pub mod parser;
pub mod value;

pub use error::ParseError;
pub use parser::{parse, Document, Parser, UNDEFINED_KEY};
pub use value::{Map, Value};
