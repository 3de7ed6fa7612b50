use crate::lexer::TokenStream;
use crate::session::{Command, Session};
use crate::symbols::SymbolTable;
use std::io::{self, Write};
use tracing::debug;

/// Marks a computed value in the output.
pub const RESULT_MARKER: &str = "= ";

const PROMPT: &str = "> ";

/// Interactive loop over stdin, one line at a time, keeping variables between lines.
pub fn start(show_intro: bool) {
    if show_intro {
        println!("Welcome to Simple Calc.");
        println!("Enter 'help' to learn how to use this program.");
        println!();
    }

    let mut session = Session::new();

    loop {
        print!("{}", PROMPT);
        if let Err(error) = io::stdout().flush() {
            eprintln!("Error writing prompt: {}", error);
            break;
        }

        let mut line = String::new();
        match io::stdin().read_line(&mut line) {
            Ok(0) => {
                // EOF reached (Ctrl+D or piped input ended)
                println!();
                break;
            }
            Ok(_) => {
                if !run_line(&line, &mut session) {
                    break;
                }
            }
            Err(error) => {
                eprintln!("Error reading input: {}", error);
                break;
            }
        }
    }
}

/// Evaluates every statement on `line`. Returns false once the user asks to quit.
fn run_line(line: &str, session: &mut Session) -> bool {
    let mut tokens = TokenStream::new(line.to_string());

    while let Some(result) = session.next_command(&mut tokens) {
        match result {
            Ok(Command::Quit) => {
                debug!("quit requested");
                return false;
            }
            Ok(command) => present(&command, session.symbols()),
            Err(error) => {
                error.report(line, None);
                tokens.ignore_statement();
            }
        }
    }

    true
}

/// Prints the outcome of a non-quit command.
pub fn present(command: &Command, symbols: &SymbolTable) {
    match command {
        Command::Value(value) => println!("{}{}", RESULT_MARKER, value),
        Command::Help => print_help(),
        Command::Symbols => print_symbols(symbols),
        Command::Quit => {}
    }
}

pub fn print_symbols(symbols: &SymbolTable) {
    println!();
    println!("Symbols:");
    for variable in symbols.iter() {
        println!("{}\t{}", variable.name, variable.value);
    }
    println!();
}

pub fn print_help() {
    println!(
        "
Simple Calc Help

\tBasic Syntax:
\t\tEnter 'help' to see this message.
\t\tEnter 'quit', 'exit' or 'q' to exit the program.
\t\tEnter ';' or a new line to print the results.
\t\tSupported operators: '*', '/', '%', '!', '+', '-', '=' (assignment).
\t\tParentheses and braces can be used to group expressions: '4*(2+3)'.

\tFunctions:
\t\tsqrt(n)\t\t\tsquare root of n.
\t\tpow(n, e)\t\tn raised to the power e.

\tUser Variables:
\t\tVariable names must be composed of alphanumerical characters and '_',
\t\tand must start with an alphabetical character: 'a_var3', 'X', or 'y2'.
\t\tlet var = expr\t\tdeclare a variable named var and initialize it
\t\t# var = expr\t\twith the value of expression expr.
\t\tconst var = expr\tdeclare and initialize a constant named var.
\t\tvar = expr\t\tassign a new value to a previously declared variable var.
\t\tEnter 'symbols' to see all variables in the program.

\tPredefined Variables:
\t\tpi\t\t3.1415926535 (constant)
\t\te\t\t2.7182818284 (constant)
\t\tk\t\t1000
"
    );
}
