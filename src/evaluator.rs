use crate::builtins;
use crate::error::{CalcError, ErrorKind};
use crate::lexer::{Token, TokenStream, TokenType};
use crate::symbols::SymbolTable;

/// Parses and evaluates arithmetic in a single pass over the token stream.
///
/// Grammar, lowest precedence first:
///
/// ```text
/// Expression: Term { ("+" | "-") Term }
/// Term:       Secondary { ("*" | "/" | "%") Secondary }
/// Secondary:  Primary { "!" }
/// Primary:    Number | Name | "(" Expression ")" | "{" Expression "}"
///             | "-" Primary | "+" Primary | Function "(" Arguments ")"
/// ```
pub struct Evaluator<'a> {
    tokens: &'a mut TokenStream,
    symbols: &'a SymbolTable,
    depth: usize,
}

/// Primaries that may be open at once: groups, unary signs and calls.
pub const MAX_NESTING: usize = 256;

impl<'a> Evaluator<'a> {
    pub fn new(tokens: &'a mut TokenStream, symbols: &'a SymbolTable) -> Self {
        Self {
            tokens,
            symbols,
            depth: 0,
        }
    }

    pub fn expression(&mut self) -> Result<f64, CalcError> {
        let mut left = self.term()?;
        loop {
            let token = self.next()?;
            match token.token_type {
                TokenType::Plus => left += self.term()?,
                TokenType::Minus => left -= self.term()?,
                _ => {
                    self.tokens.push_back(token);
                    return Ok(left);
                }
            }
        }
    }

    fn term(&mut self) -> Result<f64, CalcError> {
        let mut left = self.secondary()?;
        loop {
            let token = self.next()?;
            match token.token_type {
                TokenType::Star => left *= self.secondary()?,
                TokenType::Slash => {
                    let divisor = self.nonzero_secondary('/', &token)?;
                    left /= divisor;
                }
                TokenType::Percent => {
                    let divisor = self.nonzero_secondary('%', &token)?;
                    left %= divisor;
                }
                _ => {
                    self.tokens.push_back(token);
                    return Ok(left);
                }
            }
        }
    }

    fn nonzero_secondary(&mut self, operator: char, token: &Token) -> Result<f64, CalcError> {
        let divisor = self.secondary()?;
        if divisor == 0.0 {
            return Err(CalcError::new(ErrorKind::DivideByZero(operator), token.span));
        }
        Ok(divisor)
    }

    fn secondary(&mut self) -> Result<f64, CalcError> {
        let mut left = self.primary()?;
        loop {
            let token = self.next()?;
            match token.token_type {
                TokenType::Bang => {
                    left = factorial(left).map_err(|kind| CalcError::new(kind, token.span))?
                }
                _ => {
                    self.tokens.push_back(token);
                    return Ok(left);
                }
            }
        }
    }

    fn primary(&mut self) -> Result<f64, CalcError> {
        let token = self.next()?;
        if self.depth >= MAX_NESTING {
            return Err(CalcError::new(ErrorKind::NestingTooDeep(MAX_NESTING), token.span));
        }

        self.depth += 1;
        let value = self.primary_value(token);
        self.depth -= 1;
        value
    }

    fn primary_value(&mut self, token: Token) -> Result<f64, CalcError> {
        match &token.token_type {
            TokenType::LeftParen => self.grouped(TokenType::RightParen, ')'),
            TokenType::LeftBrace => self.grouped(TokenType::RightBrace, '}'),
            TokenType::Sqrt | TokenType::Pow => builtins::call(self, &token),
            TokenType::Number(value) => Ok(*value),
            TokenType::Minus => Ok(-self.primary()?),
            TokenType::Plus => self.primary(),
            TokenType::Name(name) => self
                .symbols
                .get_value(name)
                .map_err(|kind| CalcError::new(kind, token.span)),
            _ => Err(CalcError::new(ErrorKind::PrimaryExpected, token.span)),
        }
    }

    fn grouped(&mut self, closing: TokenType, delimiter: char) -> Result<f64, CalcError> {
        let value = self.expression()?;
        self.expect(closing, ErrorKind::UnmatchedDelimiter(delimiter))?;
        Ok(value)
    }

    /// Consumes the next token, failing with `kind` unless it is `expected`.
    pub(crate) fn expect(&mut self, expected: TokenType, kind: ErrorKind) -> Result<Token, CalcError> {
        let token = self.next()?;
        if token.token_type == expected {
            Ok(token)
        } else {
            Err(CalcError::new(kind, token.span))
        }
    }

    fn next(&mut self) -> Result<Token, CalcError> {
        self.tokens.next_token()
    }
}

/// Factorial of `value` truncated to a 32-bit integer.
pub fn factorial(value: f64) -> Result<f64, ErrorKind> {
    let n = value as i32;
    if n < 0 {
        return Err(ErrorKind::NegativeFactorial);
    }

    let mut product: i32 = 1;
    for i in 2..=n {
        product = product.checked_mul(i).ok_or(ErrorKind::Overflow)?;
    }
    Ok(product as f64)
}
