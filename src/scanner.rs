use std::fmt::{self, Display, Formatter};
use std::iter::Peekable;
use std::rc::Rc;
use std::str::Chars;

use thiserror::Error;

/// A point in the source text. Row and column are 1-based; the line text
/// rides along so diagnostics can show the offending line without keeping
/// the whole source alive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub row: usize,
    pub column: usize,
    pub line: Rc<str>,
    pub file: Option<Rc<str>>,
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.column)
    }
}

/// A lexical or grammatical error. The full message, including the source
/// line and a column marker, is rendered at construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{rendered}")]
pub struct SyntaxError {
    pub location: Location,
    rendered: String,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, location: Location) -> SyntaxError {
        let message = message.into();
        let marker = "-".repeat(location.column.saturating_sub(1));
        let mut rendered = format!("{}\n{}^\n", location.line, marker);
        if let Some(file) = &location.file {
            rendered.push_str(file);
            rendered.push(' ');
        }
        rendered.push_str(&format!(
            "({},{}) {}",
            location.row, location.column, message
        ));
        SyntaxError { location, rendered }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Symbol {
    // Single-character tokens.
    Plus,
    Minus,
    Star,
    Slash,
    Greater,
    Less,
    Equal,
    Bang,
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    Comma,

    // Two-character tokens.
    GreaterEqual,
    LessEqual,
    EqualEqual,
    BangEqual,
    AmpAmp,
    PipePipe,
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Keyword {
    If,
    Then,
    Else,
    End,
    For,
    In,
    To,
    While,
    Def,
    Return,
    Break,
    Continue,
}

impl Display for Keyword {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

// THEN and DO are interchangeable block openers.
const KEYWORDS: [(&str, Keyword); 13] = [
    ("IF", Keyword::If),
    ("THEN", Keyword::Then),
    ("DO", Keyword::Then),
    ("ELSE", Keyword::Else),
    ("END", Keyword::End),
    ("FOR", Keyword::For),
    ("IN", Keyword::In),
    ("TO", Keyword::To),
    ("WHILE", Keyword::While),
    ("DEF", Keyword::Def),
    ("RETURN", Keyword::Return),
    ("BREAK", Keyword::Break),
    ("CONTINUE", Keyword::Continue),
];

/// A token in the input stream: its kind (carrying any payload) plus the
/// location it started at. Eof tokens point just past the end of input.
#[derive(Debug, PartialEq, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub loc: Location,
}

#[derive(Debug, PartialEq, Clone)]
pub enum TokenKind {
    Symbol(Symbol),
    Keyword(Keyword),
    Identifier(String),
    Str(String),
    Number(f64),
    Boolean(bool),
    Eof,
}

impl TokenKind {
    pub fn tag(&self) -> TokenTag {
        match self {
            TokenKind::Symbol(symbol) => TokenTag::Symbol(*symbol),
            TokenKind::Keyword(keyword) => TokenTag::Keyword(*keyword),
            TokenKind::Identifier(_) => TokenTag::Identifier,
            TokenKind::Str(_) => TokenTag::Str,
            TokenKind::Number(_) => TokenTag::Number,
            TokenKind::Boolean(_) => TokenTag::Boolean,
            TokenKind::Eof => TokenTag::Eof,
        }
    }
}

/// Describes a kind of token without reference to its payload. This is what
/// "expected X, got Y" diagnostics talk about.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TokenTag {
    Symbol(Symbol),
    Keyword(Keyword),
    Identifier,
    Str,
    Number,
    Boolean,
    Eof,
}

impl Display for TokenTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Symbol(symbol) => symbol.fmt(f),
            Self::Keyword(keyword) => keyword.fmt(f),
            Self::Identifier => f.write_str("identifier"),
            Self::Str => f.write_str("string"),
            Self::Number => f.write_str("number"),
            Self::Boolean => f.write_str("boolean"),
            Self::Eof => f.write_str("end of input"),
        }
    }
}

/// Tracks the raw character stream together with row/column bookkeeping and
/// the text of the line the cursor is on.
struct Cursor<'src> {
    chars: Peekable<Chars<'src>>,
    lines: Vec<Rc<str>>,
    file: Option<Rc<str>>,
    row: usize,
    column: usize,
}

impl<'src> Cursor<'src> {
    fn new(source: &'src str, file: Option<&str>) -> Cursor<'src> {
        Cursor {
            chars: source.chars().peekable(),
            lines: source.split('\n').map(Rc::from).collect(),
            file: file.map(Rc::from),
            row: 0,
            column: 0,
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    // One character past the next, for decisions that need two characters
    // of lookahead (the digit after a decimal point).
    fn peek_second(&self) -> Option<char> {
        let mut ahead = self.chars.clone();
        ahead.next();
        ahead.next()
    }

    fn pop(&mut self) -> Option<char> {
        let ch = self.chars.next();
        match ch {
            Some('\n') => {
                self.row += 1;
                self.column = 0;
            }
            Some(_) => self.column += 1,
            None => {}
        }
        ch
    }

    fn location(&self) -> Location {
        let line = self
            .lines
            .get(self.row)
            .cloned()
            .unwrap_or_else(|| Rc::from(""));
        Location {
            row: self.row + 1,
            column: self.column + 1,
            line,
            file: self.file.clone(),
        }
    }
}

pub struct Scanner<'src> {
    cursor: Cursor<'src>,
}

impl<'src> Scanner<'src> {
    pub fn new(source: &'src str) -> Scanner<'src> {
        Scanner {
            cursor: Cursor::new(source, None),
        }
    }

    /// Tags every location with a file name, for script-file diagnostics.
    pub fn with_file(source: &'src str, file: &str) -> Scanner<'src> {
        Scanner {
            cursor: Cursor::new(source, Some(file)),
        }
    }

    /// Produces the next token, skipping whitespace and `#` comments first.
    /// Once the input is exhausted every further call yields Eof.
    pub fn next_token(&mut self) -> Result<Token, SyntaxError> {
        loop {
            while self.cursor.peek().is_some_and(char::is_whitespace) {
                self.cursor.pop();
            }

            let Some(ch) = self.cursor.peek() else {
                return Ok(Token {
                    kind: TokenKind::Eof,
                    loc: self.cursor.location(),
                });
            };

            if ch == '#' {
                while self.cursor.peek().is_some_and(|c| c != '\n') {
                    self.cursor.pop();
                }
                continue;
            }

            if ch.is_ascii_digit() {
                return Ok(self.number());
            }

            if ch.is_alphabetic() {
                return Ok(self.identifier_or_keyword());
            }

            if ch == '"' || ch == '\'' {
                return self.string(ch);
            }

            return self.operator(ch);
        }
    }

    fn number(&mut self) -> Token {
        let loc = self.cursor.location();
        let mut text = String::new();
        while let Some(ch) = self.cursor.peek() {
            if !ch.is_ascii_digit() {
                break;
            }
            text.push(ch);
            self.cursor.pop();
        }
        // A dot belongs to the number only when a digit follows it; a
        // trailing bare dot is left for the next token.
        if self.cursor.peek() == Some('.')
            && self.cursor.peek_second().is_some_and(|c| c.is_ascii_digit())
        {
            text.push('.');
            self.cursor.pop();
            while let Some(ch) = self.cursor.peek() {
                if !ch.is_ascii_digit() {
                    break;
                }
                text.push(ch);
                self.cursor.pop();
            }
        }
        // Digits with at most one interior dot always parse
        let number = text.parse::<f64>().unwrap();
        Token {
            kind: TokenKind::Number(number),
            loc,
        }
    }

    fn identifier_or_keyword(&mut self) -> Token {
        let loc = self.cursor.location();
        let mut identifier = String::new();
        while let Some(ch) = self.cursor.peek() {
            if !is_identifier_char(ch) {
                break;
            }
            identifier.push(ch);
            self.cursor.pop();
        }
        let kind = match identifier.as_str() {
            "TRUE" => TokenKind::Boolean(true),
            "FALSE" => TokenKind::Boolean(false),
            _ => match KEYWORDS.iter().find(|(lit, _)| *lit == identifier) {
                Some((_, keyword)) => TokenKind::Keyword(*keyword),
                None => TokenKind::Identifier(identifier),
            },
        };
        Token { kind, loc }
    }

    fn string(&mut self, quote: char) -> Result<Token, SyntaxError> {
        let loc = self.cursor.location();
        self.cursor.pop();
        let mut text = String::new();
        loop {
            match self.cursor.peek() {
                None | Some('\n') => {
                    return Err(SyntaxError::new("unterminated string", loc));
                }
                Some(ch) if ch == quote => {
                    self.cursor.pop();
                    break;
                }
                Some('\\') => {
                    // The escape marker and the character after it are kept
                    // verbatim; interpolation sees them untouched.
                    self.cursor.pop();
                    text.push('\\');
                    if let Some(next) = self.cursor.pop() {
                        text.push(next);
                    }
                }
                Some(ch) => {
                    text.push(ch);
                    self.cursor.pop();
                }
            }
        }
        Ok(Token {
            kind: TokenKind::Str(text),
            loc,
        })
    }

    fn operator(&mut self, ch: char) -> Result<Token, SyntaxError> {
        let loc = self.cursor.location();
        self.cursor.pop();
        let symbol = match ch {
            '+' => Symbol::Plus,
            '-' => Symbol::Minus,
            '*' => Symbol::Star,
            '/' => Symbol::Slash,
            '(' => Symbol::LeftParen,
            ')' => Symbol::RightParen,
            '[' => Symbol::LeftBracket,
            ']' => Symbol::RightBracket,
            ',' => Symbol::Comma,
            '>' => {
                if self.pop_if_eq('=') {
                    Symbol::GreaterEqual
                } else {
                    Symbol::Greater
                }
            }
            '<' => {
                if self.pop_if_eq('=') {
                    Symbol::LessEqual
                } else {
                    Symbol::Less
                }
            }
            '=' => {
                if self.pop_if_eq('=') {
                    Symbol::EqualEqual
                } else {
                    Symbol::Equal
                }
            }
            '!' => {
                if self.pop_if_eq('=') {
                    Symbol::BangEqual
                } else {
                    Symbol::Bang
                }
            }
            '&' => {
                if self.pop_if_eq('&') {
                    Symbol::AmpAmp
                } else {
                    return Err(SyntaxError::new("unexpected character '&'", loc));
                }
            }
            '|' => {
                if self.pop_if_eq('|') {
                    Symbol::PipePipe
                } else {
                    return Err(SyntaxError::new("unexpected character '|'", loc));
                }
            }
            other => {
                return Err(SyntaxError::new(
                    format!("unexpected character '{}'", other),
                    loc,
                ));
            }
        };
        Ok(Token {
            kind: TokenKind::Symbol(symbol),
            loc,
        })
    }

    fn pop_if_eq(&mut self, expected: char) -> bool {
        if self.cursor.peek() == Some(expected) {
            self.cursor.pop();
            true
        } else {
            false
        }
    }
}

fn is_identifier_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}
