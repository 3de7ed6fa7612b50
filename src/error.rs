use ariadne::{Color, Fmt, Label, Report, ReportKind, Source};
use std::ops::Range;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn single(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos + 1,
        }
    }

    /// The span as character offsets into `source`, which is how ariadne counts.
    ///
    /// Byte offsets past the end or inside a character are pulled back first.
    pub fn char_range(&self, source: &str) -> Range<usize> {
        let to_chars = |byte: usize| {
            let mut byte = byte.min(source.len());
            while !source.is_char_boundary(byte) {
                byte -= 1;
            }
            source[..byte].chars().count()
        };

        let end = to_chars(self.end);
        to_chars(self.start).min(end)..end
    }
}

/// Broad category of a failure, used to pick the diagnostic colour and title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Lexical,
    Syntax,
    Runtime,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ErrorKind {
    #[error("bad token '{0}'")]
    Lex(char),

    #[error("malformed number literal '{0}'")]
    NumericLiteral(String),

    #[error("name expected in declaration")]
    NameExpected,

    #[error("'=' missing in declaration of {0}")]
    MissingEquals(String),

    #[error("{0} has not been declared")]
    UndeclaredVariable(String),

    #[error("trying to use undefined variable {0}")]
    UndefinedVariable(String),

    #[error("trying to write to constant {0}")]
    ConstantWrite(String),

    #[error("{0} declared twice")]
    DuplicateDeclaration(String),

    #[error("{0}: divide by zero")]
    DivideByZero(char),

    #[error("cannot get factorial of negative number")]
    NegativeFactorial,

    #[error("overflow occurred in factorial")]
    Overflow,

    #[error("cannot get square root of negative number")]
    NegativeSqrt,

    #[error("{function}: '{expected}' expected")]
    ArgumentSyntax {
        function: &'static str,
        expected: char,
    },

    #[error("'{0}' expected")]
    UnmatchedDelimiter(char),

    #[error("primary expected")]
    PrimaryExpected,

    #[error("expression nested more than {0} levels deep")]
    NestingTooDeep(usize),
}

impl ErrorKind {
    pub fn category(&self) -> Category {
        match self {
            ErrorKind::Lex(_) | ErrorKind::NumericLiteral(_) => Category::Lexical,
            ErrorKind::NameExpected
            | ErrorKind::MissingEquals(_)
            | ErrorKind::ArgumentSyntax { .. }
            | ErrorKind::UnmatchedDelimiter(_)
            | ErrorKind::PrimaryExpected
            | ErrorKind::NestingTooDeep(_) => Category::Syntax,
            _ => Category::Runtime,
        }
    }

    pub fn help(&self) -> Option<String> {
        match self {
            ErrorKind::UndeclaredVariable(name) | ErrorKind::UndefinedVariable(name) => {
                Some(format!("declare it first: let {} = <expression>", name))
            }
            ErrorKind::ConstantWrite(_) => {
                Some("constants cannot be reassigned; declare a new name with 'let'".to_string())
            }
            ErrorKind::ArgumentSyntax { function: "pow", .. } => {
                Some("usage: pow(base, exponent)".to_string())
            }
            ErrorKind::ArgumentSyntax { function, .. } => Some(format!("usage: {}(value)", function)),
            ErrorKind::NameExpected | ErrorKind::MissingEquals(_) => {
                Some("declarations look like: let name = expression".to_string())
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}")]
pub struct CalcError {
    pub kind: ErrorKind,
    pub span: Span,
}

impl CalcError {
    pub fn new(kind: ErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn report(&self, source: &str, filename: Option<&str>) {
        let filename = filename.unwrap_or("<repl>");

        let (color, kind_str) = match self.kind.category() {
            Category::Lexical => (Color::Red, "Lexical Error"),
            Category::Syntax => (Color::Yellow, "Syntax Error"),
            Category::Runtime => (Color::Magenta, "Runtime Error"),
        };

        let range = self.span.char_range(source);

        let mut report_builder = Report::build(ReportKind::Error, filename, range.start)
            .with_message(format!("{}: {}", kind_str.fg(color), self.kind))
            .with_label(
                Label::new((filename, range))
                    .with_message(self.kind.to_string())
                    .with_color(color),
            );

        if let Some(help_text) = self.kind.help() {
            report_builder = report_builder.with_note(format!("{}: {}", "help".fg(Color::Cyan), help_text));
        }

        if let Err(error) = report_builder
            .finish()
            .eprint((filename, Source::from(source)))
        {
            eprintln!("error: {} ({})", self.kind, error);
        }
    }
}
