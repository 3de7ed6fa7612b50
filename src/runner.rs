use crate::lexer::TokenStream;
use crate::repl::present;
use crate::session::{Command, Session};
use tracing::debug;

/// Evaluates a whole script, reporting failed statements and carrying on.
///
/// Returns the number of statements that failed.
pub fn run(source: &str, filename: Option<&str>) -> usize {
    let mut session = Session::new();
    let mut tokens = TokenStream::new(source.to_string());
    let mut failures = 0;

    while let Some(result) = session.next_command(&mut tokens) {
        match result {
            Ok(Command::Quit) => break,
            Ok(command) => present(&command, session.symbols()),
            Err(error) => {
                failures += 1;
                error.report(source, filename);
                tokens.ignore_statement();
            }
        }
    }

    debug!(failures, "script finished");
    failures
}
