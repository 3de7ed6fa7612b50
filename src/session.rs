use crate::error::{CalcError, ErrorKind};
use crate::evaluator::Evaluator;
use crate::lexer::{TokenStream, TokenType};
use crate::symbols::SymbolTable;
use tracing::debug;

/// What a single top-level command asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Value(f64),
    Help,
    Symbols,
    Quit,
}

/// Calculator state that outlives individual statements.
///
/// Every entry point takes `&mut self`, so one statement's reads and writes to
/// the symbol table always complete before the next statement starts.
pub struct Session {
    symbols: SymbolTable,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            symbols: SymbolTable::with_predefined(),
        }
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Runs every statement in `source`, recovering after each failure.
    ///
    /// Stops early at a quit command, which is included in the results.
    pub fn evaluate(&mut self, source: &str) -> Vec<Result<Command, CalcError>> {
        let mut tokens = TokenStream::new(source.to_string());
        let mut results = Vec::new();

        while let Some(result) = self.next_command(&mut tokens) {
            match result {
                Ok(Command::Quit) => {
                    results.push(Ok(Command::Quit));
                    break;
                }
                Ok(command) => results.push(Ok(command)),
                Err(error) => {
                    results.push(Err(error));
                    tokens.ignore_statement();
                }
            }
        }

        results
    }

    /// Reads the next command, skipping empty statements.
    ///
    /// Returns `None` once the input is exhausted.
    pub fn next_command(&mut self, tokens: &mut TokenStream) -> Option<Result<Command, CalcError>> {
        let token = loop {
            match tokens.next_token() {
                Ok(token) if token.token_type == TokenType::Print => continue,
                Ok(token) => break token,
                Err(error) => return Some(Err(error)),
            }
        };

        let command = match token.token_type {
            TokenType::Eof => return None,
            TokenType::Quit => Ok(Command::Quit),
            TokenType::Help => Ok(Command::Help),
            TokenType::Symbols => Ok(Command::Symbols),
            _ => {
                tokens.push_back(token);
                self.statement(tokens).map(Command::Value)
            }
        };
        Some(command)
    }

    /// Evaluates one declaration, assignment or expression.
    ///
    /// The statement terminator is left in the stream.
    pub fn statement(&mut self, tokens: &mut TokenStream) -> Result<f64, CalcError> {
        let token = tokens.next_token()?;
        match token.token_type {
            TokenType::Let => self.declaration(tokens, false),
            TokenType::Const => self.declaration(tokens, true),
            TokenType::Name(_) => {
                let next = tokens.next_token()?;
                let is_assignment = next.token_type == TokenType::Equal;
                tokens.push_back(next);
                tokens.push_back(token);

                if is_assignment {
                    self.assignment(tokens)
                } else {
                    Evaluator::new(tokens, &self.symbols).expression()
                }
            }
            _ => {
                tokens.push_back(token);
                Evaluator::new(tokens, &self.symbols).expression()
            }
        }
    }

    fn declaration(&mut self, tokens: &mut TokenStream, constant: bool) -> Result<f64, CalcError> {
        let token = tokens.next_token()?;
        let name = match token.token_type {
            TokenType::Name(name) => name,
            _ => return Err(CalcError::new(ErrorKind::NameExpected, token.span)),
        };

        let equals = tokens.next_token()?;
        if equals.token_type != TokenType::Equal {
            return Err(CalcError::new(ErrorKind::MissingEquals(name), equals.span));
        }

        let value = Evaluator::new(tokens, &self.symbols).expression()?;
        debug!(%name, value, constant, "declaring");
        self.symbols
            .define_name(&name, value, constant)
            .map_err(|kind| CalcError::new(kind, token.span))
    }

    fn assignment(&mut self, tokens: &mut TokenStream) -> Result<f64, CalcError> {
        let token = tokens.next_token()?;
        let name = match &token.token_type {
            TokenType::Name(name) => name.clone(),
            _ => return Err(CalcError::new(ErrorKind::PrimaryExpected, token.span)),
        };

        if !self.symbols.is_declared(&name) {
            return Err(CalcError::new(ErrorKind::UndeclaredVariable(name), token.span));
        }

        // Skip the '=' that was already seen by the lookahead.
        tokens.next_token()?;
        let value = Evaluator::new(tokens, &self.symbols).expression()?;
        debug!(%name, value, "assigning");
        self.symbols
            .set_value(&name, value)
            .map_err(|kind| CalcError::new(kind, token.span))?;
        Ok(value)
    }
}
