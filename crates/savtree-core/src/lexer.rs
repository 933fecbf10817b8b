//! Lexer for the save-file format.
//!
//! Turns a byte stream into classified tokens, one per [`Lexer::scan`] call.
//! The lexer never backtracks more than one character: it unreads the single
//! most-recently read character when a run ends.
//!
//! Classification is deliberately permissive — the format tolerates malformed
//! input, so anything the lexer cannot place becomes [`TokenKind::Illegal`]
//! and is left for the parser to reject with position information.

use std::io::{self, Read};

/// Token kinds produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A character no classification rule matched.
    Illegal,
    /// End of input. No literal.
    Eof,
    /// Maximal run of spaces and tabs.
    Whitespace,
    /// `=`.
    Equals,
    /// `\n` or `\r`, plus one immediately following line-break character of
    /// either kind (so CRLF and LFLF pairs collapse into one token).
    LineBreak,
    /// Starts with a letter, `_`, or `.`; continues with letters, digits,
    /// `_`, `.` — dotted and numeric-suffixed keys are common in saves.
    Ident,
    /// Double-quoted string, raw content, no escape sequences.
    Str,
    /// Digit run, optionally led by `-`.
    Integer,
    /// Digit run containing a `.`. Multiple dots are not validated here;
    /// numeric conversion rejects them later.
    Float,
    /// `{` or `[` — both bracket styles open the same kind of block.
    BlockOpen,
    /// `,`, `}`, or `]`: an entry boundary where no value was expected.
    /// Space and tab are lexically in this set too, but whitespace
    /// classification wins first, so they never surface as `BlockClose`.
    BlockClose,
}

/// A classified lexical unit: kind plus its literal text.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lit: String,
}

impl Token {
    fn new(kind: TokenKind, lit: impl Into<String>) -> Self {
        Token {
            kind,
            lit: lit.into(),
        }
    }
}

fn is_whitespace(c: char) -> bool {
    c == ' ' || c == '\t'
}

fn is_line_break(c: char) -> bool {
    c == '\n' || c == '\r'
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '.'
}

fn is_ident_continue(c: char) -> bool {
    is_ident_start(c) || c.is_ascii_digit()
}

fn is_block_open(c: char) -> bool {
    c == '{' || c == '['
}

fn is_block_close(c: char) -> bool {
    matches!(c, ' ' | '\t' | ',' | '}' | ']')
}

/// Width of a UTF-8 sequence from its leading byte, or 0 if the byte cannot
/// lead a sequence.
fn utf8_width(b: u8) -> usize {
    match b {
        0x00..=0x7f => 1,
        0xc2..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf4 => 4,
        _ => 0,
    }
}

const BUF_SIZE: usize = 8 * 1024;

/// Buffered character source with single-character pushback.
///
/// Decodes UTF-8 incrementally. An invalid or truncated sequence yields
/// U+FFFD and consumes exactly one byte, matching the rune semantics the
/// format's existing consumers rely on.
struct CharReader<R: Read> {
    inner: R,
    buf: Box<[u8]>,
    pos: usize,
    len: usize,
    eof: bool,
    pushback: Option<char>,
}

impl<R: Read> CharReader<R> {
    fn new(inner: R) -> Self {
        CharReader {
            inner,
            buf: vec![0; BUF_SIZE].into_boxed_slice(),
            pos: 0,
            len: 0,
            eof: false,
            pushback: None,
        }
    }

    /// Make at least `n` bytes available at `pos`, unless the input ends
    /// first. Returns the number of bytes available.
    fn ensure(&mut self, n: usize) -> io::Result<usize> {
        while self.len - self.pos < n && !self.eof {
            if self.pos > 0 {
                self.buf.copy_within(self.pos..self.len, 0);
                self.len -= self.pos;
                self.pos = 0;
            }
            match self.inner.read(&mut self.buf[self.len..]) {
                Ok(0) => self.eof = true,
                Ok(read) => self.len += read,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(self.len - self.pos)
    }

    /// Next character, or `None` at end of input.
    fn read_char(&mut self) -> io::Result<Option<char>> {
        if let Some(c) = self.pushback.take() {
            return Ok(Some(c));
        }
        if self.ensure(1)? == 0 {
            return Ok(None);
        }
        let b0 = self.buf[self.pos];
        if b0 < 0x80 {
            self.pos += 1;
            return Ok(Some(b0 as char));
        }
        let width = utf8_width(b0);
        if width == 0 || self.ensure(width)? < width {
            self.pos += 1;
            return Ok(Some(char::REPLACEMENT_CHARACTER));
        }
        match std::str::from_utf8(&self.buf[self.pos..self.pos + width]) {
            Ok(s) => {
                self.pos += width;
                // a valid width-byte sequence decodes to exactly one char
                Ok(s.chars().next())
            }
            Err(_) => {
                self.pos += 1;
                Ok(Some(char::REPLACEMENT_CHARACTER))
            }
        }
    }

    /// Push the most-recently read character back. Capacity is one: the
    /// lexer never needs deeper backtracking.
    fn unread(&mut self, c: char) {
        debug_assert!(self.pushback.is_none(), "more than one character unread");
        self.pushback = Some(c);
    }
}

/// Produces one [`Token`] per [`scan`](Lexer::scan) call from a byte source.
pub struct Lexer<R: Read> {
    src: CharReader<R>,
}

impl<R: Read> Lexer<R> {
    pub fn new(input: R) -> Self {
        Lexer {
            src: CharReader::new(input),
        }
    }

    /// Scan the next token. After [`TokenKind::Eof`] has been returned, every
    /// further call returns `Eof` again.
    pub fn scan(&mut self) -> io::Result<Token> {
        let c = match self.src.read_char()? {
            Some(c) => c,
            None => return Ok(Token::new(TokenKind::Eof, "")),
        };

        if is_whitespace(c) {
            return self.scan_whitespace(c);
        }
        if is_line_break(c) {
            return self.scan_line_break(c);
        }
        if is_ident_start(c) {
            return self.scan_ident(c);
        }
        if c.is_ascii_digit() || c == '-' {
            return self.scan_number(c);
        }
        if is_block_open(c) {
            return Ok(Token::new(TokenKind::BlockOpen, c));
        }
        if is_block_close(c) {
            return Ok(Token::new(TokenKind::BlockClose, c));
        }

        match c {
            '=' => Ok(Token::new(TokenKind::Equals, c)),
            '"' => self.scan_string(),
            _ => Ok(Token::new(TokenKind::Illegal, c)),
        }
    }

    fn scan_whitespace(&mut self, first: char) -> io::Result<Token> {
        let mut lit = String::from(first);
        while let Some(c) = self.src.read_char()? {
            if !is_whitespace(c) {
                self.src.unread(c);
                break;
            }
            lit.push(c);
        }
        Ok(Token::new(TokenKind::Whitespace, lit))
    }

    /// One line-break token per `\n`/`\r`, absorbing one directly following
    /// line-break character so CRLF counts as a single line.
    fn scan_line_break(&mut self, first: char) -> io::Result<Token> {
        let mut lit = String::from(first);
        if let Some(c) = self.src.read_char()? {
            if is_line_break(c) {
                lit.push(c);
            } else {
                self.src.unread(c);
            }
        }
        Ok(Token::new(TokenKind::LineBreak, lit))
    }

    fn scan_ident(&mut self, first: char) -> io::Result<Token> {
        let mut lit = String::from(first);
        while let Some(c) = self.src.read_char()? {
            if !is_ident_continue(c) {
                self.src.unread(c);
                break;
            }
            lit.push(c);
        }
        Ok(Token::new(TokenKind::Ident, lit))
    }

    /// Digit run, reclassified to `Float` when a `.` shows up mid-run. The
    /// dot is kept and scanning continues, so `1.2.3` comes out as one float
    /// literal; conversion rejects it later.
    fn scan_number(&mut self, first: char) -> io::Result<Token> {
        let mut lit = String::from(first);
        let mut kind = TokenKind::Integer;
        while let Some(c) = self.src.read_char()? {
            if c == '.' {
                kind = TokenKind::Float;
            } else if !c.is_ascii_digit() {
                self.src.unread(c);
                break;
            }
            lit.push(c);
        }
        Ok(Token::new(kind, lit))
    }

    /// Raw characters until the closing quote or end of input. No escape
    /// interpretation: embedded line breaks and control characters are kept
    /// verbatim, and they do not advance the parser's line counter.
    fn scan_string(&mut self) -> io::Result<Token> {
        let mut lit = String::new();
        while let Some(c) = self.src.read_char()? {
            if c == '"' {
                break;
            }
            lit.push(c);
        }
        Ok(Token::new(TokenKind::Str, lit))
    }
}
