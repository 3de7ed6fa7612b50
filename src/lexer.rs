use crate::error::{CalcError, ErrorKind, Span};
use std::collections::HashMap;
use tracing::{debug, trace};

#[derive(Debug, Clone, PartialEq)]
pub enum TokenType {
    // Single-character tokens
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Comma,
    Equal,
    Minus,
    Plus,
    Slash,
    Star,
    Percent,
    Bang,

    // Literals
    Number(f64),
    Name(String),

    // Keywords
    Let,
    Const,
    Quit,
    Help,
    Symbols,
    Sqrt,
    Pow,

    // Statement terminators
    Print,
    Eof,
}

#[derive(Debug, Clone)]
pub struct Token {
    pub token_type: TokenType,
    pub lexeme: String,
    pub span: Span,
}

impl Token {
    pub fn new(token_type: TokenType, lexeme: String, span: Span) -> Self {
        Self {
            token_type,
            lexeme,
            span,
        }
    }

    /// True for tokens that end a statement: newline, `;` or end of input.
    pub fn is_terminator(&self) -> bool {
        matches!(self.token_type, TokenType::Print | TokenType::Eof)
    }
}

/// Lazily turns source text into tokens, one `next_token` call at a time.
///
/// Tokens handed back with `push_back` are returned again, most recent first,
/// before any fresh input is read.
pub struct TokenStream {
    source: String,
    start: usize,
    current: usize,
    buffer: Vec<Token>,
    at_boundary: bool,
    keywords: HashMap<&'static str, TokenType>,
}

impl TokenStream {
    pub fn new(source: String) -> Self {
        let mut keywords = HashMap::new();
        keywords.insert("let", TokenType::Let);
        keywords.insert("const", TokenType::Const);
        keywords.insert("quit", TokenType::Quit);
        keywords.insert("exit", TokenType::Quit);
        keywords.insert("q", TokenType::Quit);
        keywords.insert("help", TokenType::Help);
        keywords.insert("symbols", TokenType::Symbols);
        keywords.insert("sqrt", TokenType::Sqrt);
        keywords.insert("pow", TokenType::Pow);

        Self {
            source,
            start: 0,
            current: 0,
            buffer: Vec::with_capacity(2),
            at_boundary: true,
            keywords,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn next_token(&mut self) -> Result<Token, CalcError> {
        let token = match self.buffer.pop() {
            Some(token) => token,
            None => match self.scan_token() {
                Ok(token) => token,
                Err(error) => {
                    self.at_boundary = false;
                    return Err(error);
                }
            },
        };
        self.at_boundary = token.is_terminator();
        Ok(token)
    }

    pub fn push_back(&mut self, token: Token) {
        self.buffer.push(token);
    }

    /// Discards everything up to and including the next statement terminator.
    ///
    /// If the token that caused the failure was itself a terminator, the
    /// current statement is already over and nothing else is dropped.
    pub fn ignore_statement(&mut self) {
        debug!("discarding remainder of failed statement");
        while let Some(token) = self.buffer.pop() {
            if token.is_terminator() {
                trace!(dropped_until = token.span.start, "recovered from buffered tokens");
                self.at_boundary = true;
                return;
            }
        }

        if self.at_boundary {
            return;
        }

        while let Some(c) = self.advance() {
            if c == '\n' || c == ';' {
                break;
            }
        }
        trace!(resume_at = self.current, "discarded rest of statement");
        self.at_boundary = true;
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn scan_token(&mut self) -> Result<Token, CalcError> {
        while let Some(c) = self.peek() {
            if c.is_whitespace() && c != '\n' {
                self.advance();
            } else {
                break;
            }
        }

        self.start = self.current;
        let c = match self.advance() {
            Some(c) => c,
            None => return Ok(self.make_token(TokenType::Eof)),
        };

        let token = match c {
            ';' | '\n' => self.make_token(TokenType::Print),
            '#' => self.make_token(TokenType::Let),
            '=' => self.make_token(TokenType::Equal),
            '(' => self.make_token(TokenType::LeftParen),
            ')' => self.make_token(TokenType::RightParen),
            '{' => self.make_token(TokenType::LeftBrace),
            '}' => self.make_token(TokenType::RightBrace),
            ',' => self.make_token(TokenType::Comma),
            '+' => self.make_token(TokenType::Plus),
            '-' => self.make_token(TokenType::Minus),
            '*' => self.make_token(TokenType::Star),
            '/' => self.make_token(TokenType::Slash),
            '%' => self.make_token(TokenType::Percent),
            '!' => self.make_token(TokenType::Bang),
            c if c.is_ascii_digit() || c == '.' => self.number()?,
            c if c.is_ascii_alphabetic() => self.name(),
            _ => {
                return Err(CalcError::new(
                    ErrorKind::Lex(c),
                    Span::new(self.start, self.current),
                ));
            }
        };

        Ok(token)
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.current += c.len_utf8();
        Some(c)
    }

    fn peek(&self) -> Option<char> {
        self.source[self.current..].chars().next()
    }

    fn number(&mut self) -> Result<Token, CalcError> {
        while matches!(self.peek(), Some(c) if c.is_ascii_digit() || c == '.') {
            self.advance();
        }

        // An exponent only counts when digits follow, so `2e` stays `2` then `e`.
        if matches!(self.peek(), Some('e' | 'E')) {
            let rest = &self.source[self.current + 1..];
            let digits = rest.strip_prefix(&['+', '-'][..]).unwrap_or(rest);
            if digits.starts_with(|c: char| c.is_ascii_digit()) {
                self.advance();
                if matches!(self.peek(), Some('+' | '-')) {
                    self.advance();
                }
                while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                    self.advance();
                }
            }
        }

        let literal = &self.source[self.start..self.current];
        match literal.parse::<f64>() {
            Ok(value) => Ok(self.make_token(TokenType::Number(value))),
            Err(_) => Err(CalcError::new(
                ErrorKind::NumericLiteral(literal.to_string()),
                Span::new(self.start, self.current),
            )),
        }
    }

    fn name(&mut self) -> Token {
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '_') {
            self.advance();
        }

        let text = &self.source[self.start..self.current];
        let token_type = self
            .keywords
            .get(text)
            .cloned()
            .unwrap_or_else(|| TokenType::Name(text.to_string()));

        self.make_token(token_type)
    }

    fn make_token(&self, token_type: TokenType) -> Token {
        let span = if self.is_at_end() && self.start == self.current {
            Span::single(self.current)
        } else {
            Span::new(self.start, self.current)
        };
        Token::new(
            token_type,
            self.source[self.start..self.current].to_string(),
            span,
        )
    }
}
