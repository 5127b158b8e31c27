//! Tokenizer for schema source text
//!
//! Produces a flat token stream with 1-based line and column positions.
//! Whitespace and `#` comments are insignificant.

use std::collections::HashMap;
use std::iter::Peekable;
use std::str::Chars;

use lazy_static::lazy_static;

use crate::error::{Error, Result, SyntaxError};

lazy_static! {
    static ref KEYWORDS: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("schema", TokenKind::Schema);
        map.insert("ruleset", TokenKind::Ruleset);
        map.insert("enum", TokenKind::Enum);
        map.insert("strict", TokenKind::Strict);
        map.insert("required", TokenKind::Required);
        map.insert("import", TokenKind::Import);
        map.insert("from", TokenKind::From);
        map.insert("as", TokenKind::As);
        map.insert("str", TokenKind::Str);
        map.insert("int", TokenKind::Int);
        map.insert("float", TokenKind::Float);
        map.insert("bool", TokenKind::Bool);
        map.insert("any", TokenKind::Any);
        map.insert("list", TokenKind::List);
        map.insert("map", TokenKind::Map);
        map.insert("regex", TokenKind::Regex);
        map
    };
}

/// Kind of a lexed token
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// `schema` keyword
    Schema,
    /// `ruleset` keyword
    Ruleset,
    /// `enum` keyword
    Enum,
    /// `strict` keyword
    Strict,
    /// `required` keyword
    Required,
    /// `import` keyword
    Import,
    /// `from` keyword
    From,
    /// `as` keyword
    As,
    /// `str` type keyword
    Str,
    /// `int` type keyword
    Int,
    /// `float` type keyword
    Float,
    /// `bool` type keyword
    Bool,
    /// `any` type keyword
    Any,
    /// `list` type keyword
    List,
    /// `map` type keyword
    Map,
    /// `regex` type keyword
    Regex,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `,`
    Comma,
    /// `.`
    Dot,
    /// `|`
    Pipe,
    /// `=`
    Equals,
    /// Identifier
    Ident(String),
    /// Quoted string with the quotes stripped
    StringLit(String),
    /// Integer literal
    IntLit(i64),
    /// Float literal
    FloatLit(f64),
    /// `!!` directive such as the keyless rule marker
    Directive(String),
}

impl TokenKind {
    /// Get the source text of a keyword token
    pub fn keyword_text(&self) -> Option<&'static str> {
        match self {
            TokenKind::Schema => Some("schema"),
            TokenKind::Ruleset => Some("ruleset"),
            TokenKind::Enum => Some("enum"),
            TokenKind::Strict => Some("strict"),
            TokenKind::Required => Some("required"),
            TokenKind::Import => Some("import"),
            TokenKind::From => Some("from"),
            TokenKind::As => Some("as"),
            TokenKind::Str => Some("str"),
            TokenKind::Int => Some("int"),
            TokenKind::Float => Some("float"),
            TokenKind::Bool => Some("bool"),
            TokenKind::Any => Some("any"),
            TokenKind::List => Some("list"),
            TokenKind::Map => Some("map"),
            TokenKind::Regex => Some("regex"),
            _ => None,
        }
    }

    /// Describe the token for error messages
    pub fn describe(&self) -> String {
        match self {
            TokenKind::LeftBrace => "'{'".to_string(),
            TokenKind::RightBrace => "'}'".to_string(),
            TokenKind::LeftParen => "'('".to_string(),
            TokenKind::RightParen => "')'".to_string(),
            TokenKind::Comma => "','".to_string(),
            TokenKind::Dot => "'.'".to_string(),
            TokenKind::Pipe => "'|'".to_string(),
            TokenKind::Equals => "'='".to_string(),
            TokenKind::Ident(name) => format!("identifier '{}'", name),
            TokenKind::StringLit(_) => "string literal".to_string(),
            TokenKind::IntLit(value) => format!("integer literal '{}'", value),
            TokenKind::FloatLit(value) => format!("float literal '{}'", value),
            TokenKind::Directive(name) => format!("directive '{}'", name),
            keyword => match keyword.keyword_text() {
                Some(text) => format!("'{}'", text),
                None => "token".to_string(),
            },
        }
    }
}

/// One lexed token with its source position
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Token kind and payload
    pub kind: TokenKind,
    /// 1-based source line
    pub line: usize,
    /// 1-based source column
    pub column: usize,
}

impl Token {
    /// Get the token's text when it can serve as a rule name
    ///
    /// Rule names may be identifiers, quoted strings, directives or
    /// keywords used as plain data keys.
    pub fn as_name(&self) -> Option<String> {
        match &self.kind {
            TokenKind::Ident(name) => Some(name.clone()),
            TokenKind::StringLit(text) => Some(text.clone()),
            TokenKind::Directive(name) => Some(name.clone()),
            other => other.keyword_text().map(str::to_string),
        }
    }
}

/// Get a 1-based source line for error context
pub(crate) fn source_line(source: &str, line: usize) -> Option<&str> {
    source.lines().nth(line.saturating_sub(1))
}

struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    source: &'a str,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            chars: source.chars().peekable(),
            source,
            line: 1,
            column: 1,
        }
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn error_at(&self, message: String, line: usize, column: usize) -> Error {
        let mut err = SyntaxError::new(message).with_position(line, column);
        if let Some(text) = source_line(self.source, line) {
            err = err.with_context(text);
        }
        Error::Syntax(err)
    }

    fn read_string(&mut self, quote: char, line: usize, column: usize) -> Result<String> {
        let mut text = String::new();
        loop {
            match self.bump() {
                Some(ch) if ch == quote => return Ok(text),
                Some('\\') => match self.bump() {
                    Some('n') => text.push('\n'),
                    Some('t') => text.push('\t'),
                    Some('\\') => text.push('\\'),
                    Some('\'') => text.push('\''),
                    Some('"') => text.push('"'),
                    // Unknown escapes pass through untouched so regex
                    // patterns keep their backslashes
                    Some(other) => {
                        text.push('\\');
                        text.push(other);
                    }
                    None => {
                        return Err(self.error_at(
                            "unterminated string literal".to_string(),
                            line,
                            column,
                        ))
                    }
                },
                Some(ch) => text.push(ch),
                None => {
                    return Err(self.error_at(
                        "unterminated string literal".to_string(),
                        line,
                        column,
                    ))
                }
            }
        }
    }

    fn read_word(&mut self, first: char) -> String {
        let mut word = String::new();
        word.push(first);
        while let Some(&ch) = self.chars.peek() {
            if ch.is_alphanumeric() || ch == '_' {
                word.push(ch);
                self.bump();
            } else {
                break;
            }
        }
        word
    }

    fn read_number(&mut self, first: char, line: usize, column: usize) -> Result<TokenKind> {
        let mut digits = String::new();
        digits.push(first);

        let mut is_float = false;
        while let Some(&ch) = self.chars.peek() {
            if ch.is_ascii_digit() {
                digits.push(ch);
                self.bump();
            } else if ch == '.' && !is_float {
                // Only consume the dot when a digit follows, so `1.`
                // stays an integer followed by a dot token
                let mut ahead = self.chars.clone();
                ahead.next();
                match ahead.peek() {
                    Some(next) if next.is_ascii_digit() => {
                        is_float = true;
                        digits.push(ch);
                        self.bump();
                    }
                    _ => break,
                }
            } else {
                break;
            }
        }

        if is_float {
            let value = digits
                .parse::<f64>()
                .map_err(|_| self.error_at(format!("invalid float literal '{}'", digits), line, column))?;
            Ok(TokenKind::FloatLit(value))
        } else {
            let value = digits
                .parse::<i64>()
                .map_err(|_| self.error_at(format!("integer literal '{}' is out of range", digits), line, column))?;
            Ok(TokenKind::IntLit(value))
        }
    }

    fn tokenize(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();

        loop {
            let (line, column) = (self.line, self.column);
            let ch = match self.bump() {
                Some(ch) => ch,
                None => break,
            };

            let kind = match ch {
                ch if ch.is_whitespace() => continue,
                '#' => {
                    while let Some(&next) = self.chars.peek() {
                        if next == '\n' {
                            break;
                        }
                        self.bump();
                    }
                    continue;
                }
                '{' => TokenKind::LeftBrace,
                '}' => TokenKind::RightBrace,
                '(' => TokenKind::LeftParen,
                ')' => TokenKind::RightParen,
                ',' => TokenKind::Comma,
                '.' => TokenKind::Dot,
                '|' => TokenKind::Pipe,
                '=' => TokenKind::Equals,
                '"' | '\'' => TokenKind::StringLit(self.read_string(ch, line, column)?),
                '!' => {
                    if self.chars.peek() == Some(&'!') {
                        self.bump();
                        let word = match self.bump() {
                            Some(first) if first.is_alphanumeric() || first == '_' => {
                                self.read_word(first)
                            }
                            _ => {
                                return Err(self.error_at(
                                    "expected a directive name after '!!'".to_string(),
                                    line,
                                    column,
                                ))
                            }
                        };
                        TokenKind::Directive(format!("!!{}", word))
                    } else {
                        return Err(self.error_at(
                            "unexpected character '!'".to_string(),
                            line,
                            column,
                        ));
                    }
                }
                '-' => match self.bump() {
                    Some(first) if first.is_ascii_digit() => {
                        match self.read_number(first, line, column)? {
                            TokenKind::IntLit(value) => TokenKind::IntLit(-value),
                            TokenKind::FloatLit(value) => TokenKind::FloatLit(-value),
                            other => other,
                        }
                    }
                    _ => {
                        return Err(self.error_at(
                            "unexpected character '-'".to_string(),
                            line,
                            column,
                        ))
                    }
                },
                ch if ch.is_ascii_digit() => self.read_number(ch, line, column)?,
                ch if ch.is_alphabetic() || ch == '_' => {
                    let word = self.read_word(ch);
                    match KEYWORDS.get(word.as_str()) {
                        Some(keyword) => keyword.clone(),
                        None => TokenKind::Ident(word),
                    }
                }
                other => {
                    return Err(self.error_at(
                        format!("unexpected character '{}'", other),
                        line,
                        column,
                    ))
                }
            };

            tokens.push(Token { kind, line, column });
        }

        Ok(tokens)
    }
}

/// Tokenize schema source text
pub fn tokenize(source: &str) -> Result<Vec<Token>> {
    Lexer::new(source).tokenize()
}
