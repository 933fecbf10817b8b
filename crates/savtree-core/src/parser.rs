//! Recursive-descent parser for the save-file format.
//!
//! The parser pulls tokens from the [`Lexer`] through a single-slot pushback
//! buffer — it never looks more than one token ahead — and folds them
//! directly into a [`Value`] tree. There is no separate AST stage.
//!
//! # Key design decisions
//!
//! - **Block disambiguation**: a block (`{ ... }` or `[ ... ]`) is an Object
//!   or an Array depending on its contents. Keyed entries go into a map,
//!   bare entries into a sequence; a block that accumulates both fails with
//!   [`ParseError::MixedNested`]. An empty block is always an empty Object,
//!   because array-ness requires observing at least one bare element.
//! - **Duplicate-key merge**: repeated keys collapse into an array with a
//!   front-insertion order existing consumers depend on; see [`merge_entry`].
//! - **Best-effort recovery**: a bare `=` where a key was expected is counted
//!   and skipped along with the token after it, instead of failing. All
//!   other malformed input either parses into structurally odd but
//!   deterministic output or aborts with a typed error.

use crate::error::{ParseError, Result};
use crate::lexer::{Lexer, Token, TokenKind};
use crate::value::{Map, Value};
use std::collections::btree_map::Entry;
use std::io::Read;

/// Sentinel key for anonymous nested values at the document root.
pub const UNDEFINED_KEY: &str = "unknown";

/// Parsed output of [`parse`]: the root value tree plus the diagnostic
/// counters scoped to that one parse.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// The root Object.
    pub root: Value,
    /// 1-based number of lines scanned.
    pub lines: u64,
    /// Anonymous root-level entries redirected to [`UNDEFINED_KEY`].
    pub undefined_keys: u64,
    /// Bare equals signs skipped by the recovery heuristic.
    pub skipped_equals: u64,
}

/// Parse a readable byte stream into a [`Document`].
///
/// ```rust
/// let doc = savtree_core::parse("a=b".as_bytes()).unwrap();
/// assert_eq!(
///     serde_json::to_string(&doc.root).unwrap(),
///     r#"{"a":"b"}"#
/// );
/// ```
///
/// For access to the partial tree after a failed parse, drive a [`Parser`]
/// directly instead.
pub fn parse<R: Read>(input: R) -> Result<Document> {
    let mut parser = Parser::new(input);
    parser.parse()?;
    Ok(Document {
        lines: parser.line(),
        undefined_keys: parser.undefined_keys(),
        skipped_equals: parser.skipped_equals(),
        root: parser.into_root(),
    })
}

/// One scanned entry of a block: the key token's kind and text, and the
/// value if one followed. `value: None` is the "bare value" case — the key
/// text is really the element's literal content, type-inferred by the block
/// parser.
struct KeyVal {
    key_kind: TokenKind,
    key: String,
    value: Option<Value>,
}

/// A single-use parser over one input stream.
///
/// Owns the line counter and diagnostic counters for that stream; construct
/// a fresh instance per input. After [`parse`](Parser::parse) returns an
/// error, [`root`](Parser::root) still holds the partially accumulated
/// top-level map and [`line`](Parser::line) the line number at failure.
pub struct Parser<R: Read> {
    lexer: Lexer<R>,
    /// Single-slot pushback. The grammar needs exactly one token of
    /// lookahead, never more.
    buf: Option<Token>,
    root: Map,
    line: u64,
    undefined_keys: u64,
    skipped_equals: u64,
}

impl<R: Read> Parser<R> {
    pub fn new(input: R) -> Self {
        Parser {
            lexer: Lexer::new(input),
            buf: None,
            root: Map::new(),
            line: 1,
            undefined_keys: 0,
            skipped_equals: 0,
        }
    }

    /// 1-based line number: the current line while parsing, the total line
    /// count after a successful parse, the failure line after an error.
    pub fn line(&self) -> u64 {
        self.line
    }

    /// Number of anonymous root-level entries stored under [`UNDEFINED_KEY`].
    pub fn undefined_keys(&self) -> u64 {
        self.undefined_keys
    }

    /// Number of bare equals signs the recovery heuristic skipped.
    pub fn skipped_equals(&self) -> u64 {
        self.skipped_equals
    }

    /// The top-level map accumulated so far. Partial if [`parse`](Parser::parse)
    /// failed.
    pub fn root(&self) -> &Map {
        &self.root
    }

    /// Consume the parser, yielding the (possibly partial) root Object.
    pub fn into_root(self) -> Value {
        Value::Object(self.root)
    }

    /// Run the parse to completion, accumulating entries into the root map.
    ///
    /// End of input is the normal terminator. Top-level entries follow block
    /// semantics with two differences: an anonymous nested value is stored
    /// under [`UNDEFINED_KEY`] (and counted) instead of becoming an array
    /// element, and a key with no value after it stores [`Value::Null`].
    pub fn parse(&mut self) -> Result<()> {
        while let Some(kv) = self.parse_keyval()? {
            let (key, value) = if kv.key_kind == TokenKind::BlockOpen {
                self.undefined_keys += 1;
                (UNDEFINED_KEY.to_string(), kv.value.unwrap_or(Value::Null))
            } else {
                (kv.key, kv.value.unwrap_or(Value::Null))
            };
            merge_entry(&mut self.root, key, value);
        }
        Ok(())
    }

    /// Next token, honoring the pushback slot.
    fn scan(&mut self) -> Result<Token> {
        if let Some(tok) = self.buf.take() {
            return Ok(tok);
        }
        Ok(self.lexer.scan()?)
    }

    /// Push a token back so the next [`scan`](Parser::scan) returns it again.
    fn unscan(&mut self, tok: Token) {
        debug_assert!(self.buf.is_none(), "single-token lookahead exceeded");
        self.buf = Some(tok);
    }

    /// Scan past whitespace tokens. Line-break tokens are NOT skipped here;
    /// they are meaningful for line counting and consumed explicitly by
    /// [`parse_keyval`](Parser::parse_keyval).
    fn scan_skip_ws(&mut self) -> Result<Token> {
        loop {
            let tok = self.scan()?;
            if tok.kind != TokenKind::Whitespace {
                return Ok(tok);
            }
        }
    }

    /// Scan one key-value entry. Returns `None` at end of input — the normal
    /// termination signal, not an error.
    fn parse_keyval(&mut self) -> Result<Option<KeyVal>> {
        loop {
            let tok = self.scan_skip_ws()?;
            match tok.kind {
                TokenKind::Eof => return Ok(None),
                TokenKind::LineBreak => {
                    self.line += 1;
                    continue;
                }
                TokenKind::Equals => {
                    // equals sign with nothing valid before it: drop it and
                    // the token after it, then resynchronize
                    self.skipped_equals += 1;
                    let _ = self.scan_skip_ws()?;
                    continue;
                }
                TokenKind::BlockOpen => {
                    // anonymous nested value, no key
                    let value = self.parse_block()?;
                    return Ok(Some(KeyVal {
                        key_kind: TokenKind::BlockOpen,
                        key: tok.lit,
                        value: Some(value),
                    }));
                }
                // legal candidate keys; numeric and quoted tokens included,
                // and a close/separator token passes through so the block
                // parser can observe its terminator
                TokenKind::Str
                | TokenKind::Ident
                | TokenKind::Integer
                | TokenKind::Float
                | TokenKind::BlockClose => {}
                TokenKind::Illegal | TokenKind::Whitespace => {
                    return Err(ParseError::InvalidKey {
                        line: self.line,
                        literal: tok.lit,
                    });
                }
            }

            let key_kind = tok.kind;
            let key = tok.lit;

            let next = self.scan_skip_ws()?;
            match next.kind {
                TokenKind::Equals => {
                    let val_tok = self.scan_skip_ws()?;
                    let value = if val_tok.kind == TokenKind::BlockOpen {
                        self.parse_block()?
                    } else {
                        self.infer_literal(val_tok.kind, val_tok.lit)?
                    };
                    return Ok(Some(KeyVal {
                        key_kind,
                        key,
                        value: Some(value),
                    }));
                }
                TokenKind::BlockOpen => {
                    // nested value without an equals sign: key { ... }
                    let value = self.parse_block()?;
                    return Ok(Some(KeyVal {
                        key_kind,
                        key,
                        value: Some(value),
                    }));
                }
                _ => {
                    // no value follows this key: bare element, e.g. inside
                    // test={ 12 2354545 }
                    self.unscan(next);
                    return Ok(Some(KeyVal {
                        key_kind,
                        key,
                        value: None,
                    }));
                }
            }
        }
    }

    /// Parse one nested block into an Object or an Array.
    ///
    /// Entries accumulate into a local map (keyed) and sequence (bare) until
    /// end of input or a close/separator entry. Bare-element order is
    /// preserved as written; only the duplicate-key rule reorders.
    fn parse_block(&mut self) -> Result<Value> {
        let mut items: Vec<Value> = Vec::new();
        let mut map = Map::new();

        while let Some(kv) = self.parse_keyval()? {
            if kv.key_kind == TokenKind::BlockClose {
                break;
            }
            if kv.key_kind == TokenKind::BlockOpen {
                // anonymous nested value: an object sitting directly in an
                // array, e.g. player={ {..} {..} }
                if let Some(value) = kv.value {
                    items.push(value);
                }
                continue;
            }
            match kv.value {
                Some(value) => merge_entry(&mut map, kv.key, value),
                None => {
                    let value = self.infer_literal(kv.key_kind, kv.key)?;
                    items.push(value);
                }
            }
        }

        if items.is_empty() {
            return Ok(Value::Object(map));
        }
        if !map.is_empty() {
            return Err(ParseError::MixedNested { line: self.line });
        }
        Ok(Value::Array(items))
    }

    /// Infer a scalar from a literal token.
    ///
    /// Integer literals parse as `i64`. Float literals parse at 32-bit
    /// precision and widen to `f64`, reproducing the source format's rounding
    /// footprint (`1.20348` becomes `1.2034800052642822`). Everything else is
    /// the literal text verbatim — `yes`/`no` stay strings.
    fn infer_literal(&self, kind: TokenKind, lit: String) -> Result<Value> {
        match kind {
            TokenKind::Integer => match lit.parse::<i64>() {
                Ok(n) => Ok(Value::Integer(n)),
                Err(_) => Err(ParseError::MalformedNumeric {
                    line: self.line,
                    literal: lit,
                }),
            },
            TokenKind::Float => match lit.parse::<f32>() {
                Ok(f) if f.is_finite() => Ok(Value::Float(f64::from(f))),
                _ => Err(ParseError::MalformedNumeric {
                    line: self.line,
                    literal: lit,
                }),
            },
            _ => Ok(Value::String(lit)),
        }
    }
}

/// Fold a keyed entry into a map under the duplicate-key merge rule:
///
/// - first occurrence of a key: stored as-is;
/// - second occurrence: the slot becomes `[first, second]` in arrival order;
/// - every later occurrence: inserted at the FRONT of the existing array.
///
/// For n >= 3 duplicates the final order is `[nth, ..., 3rd, 1st, 2nd]`.
/// The prepend applies whenever the slot already holds an Array, whatever its
/// origin. Existing consumers depend on exactly this layout, so it is
/// replicated rather than corrected.
fn merge_entry(map: &mut Map, key: String, value: Value) {
    match map.entry(key) {
        Entry::Vacant(slot) => {
            slot.insert(value);
        }
        Entry::Occupied(mut slot) => {
            let existing = slot.get_mut();
            if let Value::Array(seq) = existing {
                seq.insert(0, value);
            } else {
                let first = std::mem::replace(existing, Value::Null);
                *existing = Value::Array(vec![first, value]);
            }
        }
    }
}
