use crate::error::{CalcError, ErrorKind, Span};
use crate::evaluator::Evaluator;
use crate::lexer::{Token, TokenType};

/// Evaluates a call to `sqrt` or `pow`; `function` is the already consumed keyword.
pub(crate) fn call(evaluator: &mut Evaluator, function: &Token) -> Result<f64, CalcError> {
    match function.token_type {
        TokenType::Sqrt => {
            let (arguments, closing) = argument_list(evaluator, "sqrt", 1)?;
            let value = arguments[0];
            if value < 0.0 {
                return Err(CalcError::new(
                    ErrorKind::NegativeSqrt,
                    Span::new(function.span.start, closing.span.end),
                ));
            }
            Ok(value.sqrt())
        }
        TokenType::Pow => {
            let (arguments, _) = argument_list(evaluator, "pow", 2)?;
            Ok(arguments[0].powf(arguments[1]))
        }
        _ => Err(CalcError::new(ErrorKind::PrimaryExpected, function.span)),
    }
}

/// Parses `( expr {, expr} )` with exactly `count` arguments.
///
/// Returns the values and the closing parenthesis.
fn argument_list(
    evaluator: &mut Evaluator,
    function: &'static str,
    count: usize,
) -> Result<(Vec<f64>, Token), CalcError> {
    let syntax = |expected| ErrorKind::ArgumentSyntax { function, expected };

    evaluator.expect(TokenType::LeftParen, syntax('('))?;

    let mut values = Vec::with_capacity(count);
    for index in 0..count {
        if index > 0 {
            evaluator.expect(TokenType::Comma, syntax(','))?;
        }
        values.push(evaluator.expression()?);
    }

    let closing = evaluator.expect(TokenType::RightParen, syntax(')'))?;
    Ok((values, closing))
}
