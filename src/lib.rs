// Simple Calc Library
//
// Core of an interactive expression calculator: a lazy tokenizer with
// pushback, a fused recursive-descent parser/evaluator, and the symbol
// table that holds named variables and constants between statements.

mod builtins;

// Public modules
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod repl;
pub mod runner;
pub mod session;
pub mod symbols;

// Re-export commonly used items
pub use error::{CalcError, ErrorKind, Span};
pub use evaluator::Evaluator;
pub use lexer::{Token, TokenStream, TokenType};
pub use session::{Command, Session};
pub use symbols::{SymbolTable, Variable};

// Re-export main functions
pub use repl::start as start_repl;
pub use runner::run;
