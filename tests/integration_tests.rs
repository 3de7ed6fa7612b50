// Table-driven tests for the calculator grammar.
//
// Each case feeds one input to a fresh session and checks the outcome of the
// last statement: either its value or a fragment of its error message.

use calc::error::CalcError;
use calc::session::{Command, Session};

/// Test result for a single test case
#[derive(Debug)]
pub enum TestResult {
    Pass,
    Fail(String),
    Crash(String),
}

#[derive(Debug, Clone)]
pub enum Expected {
    Value(f64),
    ErrorContaining(String),
}

/// Individual test case
#[derive(Debug, Clone)]
pub struct TestCase {
    pub name: String,
    pub input: String,
    pub expected: Expected,
}

/// Test suite containing multiple test cases
#[derive(Debug)]
pub struct TestSuite {
    pub name: String,
    pub tests: Vec<TestCase>,
}

impl TestSuite {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            tests: Vec::new(),
        }
    }

    pub fn add_test(&mut self, test: TestCase) {
        self.tests.push(test);
    }

    /// Run all tests in this suite, returning a line per failed or crashed case
    pub fn run(&self) -> Vec<String> {
        let mut problems = Vec::new();

        for test in &self.tests {
            match run_single_test(test) {
                TestResult::Pass => {}
                TestResult::Fail(msg) => problems.push(format!("{}/{}: {}", self.name, test.name, msg)),
                TestResult::Crash(msg) => {
                    problems.push(format!("{}/{}: CRASHED - {}", self.name, test.name, msg))
                }
            }
        }

        problems
    }
}

/// Run a single test case
fn run_single_test(test: &TestCase) -> TestResult {
    // Catch any panics to detect crashes
    let result = std::panic::catch_unwind(|| last_outcome(&test.input));

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(panic_info) => {
            let panic_msg = if let Some(s) = panic_info.downcast_ref::<String>() {
                s.clone()
            } else if let Some(s) = panic_info.downcast_ref::<&str>() {
                s.to_string()
            } else {
                "Unknown panic".to_string()
            };
            return TestResult::Crash(panic_msg);
        }
    };

    match (outcome, &test.expected) {
        (None, _) => TestResult::Fail("Input produced no statements".to_string()),
        (Some(Ok(Command::Value(actual))), Expected::Value(expected)) => {
            if (actual - expected).abs() < 1e-9 {
                TestResult::Pass
            } else {
                TestResult::Fail(format!("Expected {}, got {}", expected, actual))
            }
        }
        (Some(Ok(command)), Expected::Value(expected)) => {
            TestResult::Fail(format!("Expected {}, got command {:?}", expected, command))
        }
        (Some(Ok(command)), Expected::ErrorContaining(expected)) => TestResult::Fail(format!(
            "Expected an error containing '{}', but got {:?}",
            expected, command
        )),
        (Some(Err(error)), Expected::ErrorContaining(expected)) => {
            if error.to_string().contains(expected.as_str()) {
                TestResult::Pass
            } else {
                TestResult::Fail(format!(
                    "Error message '{}' doesn't contain expected text '{}'",
                    error, expected
                ))
            }
        }
        (Some(Err(error)), Expected::Value(expected)) => TestResult::Fail(format!(
            "Expected {}, but got error: {}",
            expected, error
        )),
    }
}

/// Evaluate input in a fresh session and return the last statement's outcome
fn last_outcome(input: &str) -> Option<Result<Command, CalcError>> {
    let mut session = Session::new();
    session.evaluate(input).pop()
}

/// Test case builder for convenience
impl TestCase {
    pub fn should_yield(name: &str, input: &str, value: f64) -> Self {
        Self {
            name: name.to_string(),
            input: input.to_string(),
            expected: Expected::Value(value),
        }
    }

    pub fn should_fail_with_message(name: &str, input: &str, expected_msg: &str) -> Self {
        Self {
            name: name.to_string(),
            input: input.to_string(),
            expected: Expected::ErrorContaining(expected_msg.to_string()),
        }
    }
}

// ============================================================================
// Test Suite Creation Functions
// ============================================================================

fn create_precedence_tests() -> TestSuite {
    let mut suite = TestSuite::new("Precedence");

    suite.add_test(TestCase::should_yield("mul_before_add", "2+3*4", 14.0));
    suite.add_test(TestCase::should_yield("factorial_before_mul", "2*3!", 12.0));
    suite.add_test(TestCase::should_yield("parens_override", "(2+3)*4", 20.0));
    suite.add_test(TestCase::should_yield("braces_group_like_parens", "{2+3}*4", 20.0));
    suite.add_test(TestCase::should_yield("mixed_grouping", "{(1+1)*3}/2", 3.0));
    suite.add_test(TestCase::should_yield("left_assoc_sub", "10-4-3", 3.0));
    suite.add_test(TestCase::should_yield("left_assoc_div", "64/4/2", 8.0));
    suite.add_test(TestCase::should_yield("modulo_same_level_as_mul", "2*7%4", 2.0));
    suite.add_test(TestCase::should_yield("fractional_modulo", "7.5 % 2", 1.5));
    suite.add_test(TestCase::should_yield("division_is_float", "10/4", 2.5));

    suite
}

fn create_unary_tests() -> TestSuite {
    let mut suite = TestSuite::new("Unary Operators");

    suite.add_test(TestCase::should_yield("negate", "-5", -5.0));
    suite.add_test(TestCase::should_yield("double_negation", "--5", 5.0));
    suite.add_test(TestCase::should_yield("unary_plus", "+5", 5.0));
    suite.add_test(TestCase::should_yield("minus_minus_binary", "1 -- 2", 3.0));
    suite.add_test(TestCase::should_yield("plus_minus_binary", "1 +- 2", -1.0));
    suite.add_test(TestCase::should_yield("negate_group", "-(2+3)*2", -10.0));
    suite.add_test(TestCase::should_fail_with_message(
        "negation_binds_before_factorial",
        "-3!",
        "cannot get factorial of negative number",
    ));

    suite
}

fn create_factorial_tests() -> TestSuite {
    let mut suite = TestSuite::new("Factorial");

    suite.add_test(TestCase::should_yield("zero", "0!", 1.0));
    suite.add_test(TestCase::should_yield("one", "1!", 1.0));
    suite.add_test(TestCase::should_yield("five", "5!", 120.0));
    suite.add_test(TestCase::should_yield("truncates", "3.7!", 6.0));
    suite.add_test(TestCase::should_yield("chained", "3!!", 720.0));
    suite.add_test(TestCase::should_yield("largest_in_range", "12!", 479001600.0));
    suite.add_test(TestCase::should_fail_with_message("overflow", "13!", "overflow"));
    suite.add_test(TestCase::should_fail_with_message(
        "negative_group",
        "(0-2)!",
        "factorial of negative",
    ));

    suite
}

fn create_function_tests() -> TestSuite {
    let mut suite = TestSuite::new("Built-in Functions");

    suite.add_test(TestCase::should_yield("sqrt", "sqrt(4)", 2.0));
    suite.add_test(TestCase::should_yield("sqrt_of_expression", "sqrt(9+16)", 5.0));
    suite.add_test(TestCase::should_yield("pow", "pow(2,3)", 8.0));
    suite.add_test(TestCase::should_yield("pow_fractional", "pow(16, 0.5)", 4.0));
    suite.add_test(TestCase::should_yield("nested_calls", "pow(sqrt(4), 3) + 1", 9.0));
    suite.add_test(TestCase::should_yield("call_then_factorial", "sqrt(9)!", 6.0));
    suite.add_test(TestCase::should_fail_with_message(
        "sqrt_negative",
        "sqrt(-1)",
        "cannot get square root of negative number",
    ));
    suite.add_test(TestCase::should_fail_with_message("sqrt_missing_open", "sqrt 4", "sqrt: '(' expected"));
    suite.add_test(TestCase::should_fail_with_message("sqrt_missing_close", "sqrt(4", "sqrt: ')' expected"));
    suite.add_test(TestCase::should_fail_with_message("sqrt_two_args", "sqrt(4, 2)", "sqrt: ')' expected"));
    suite.add_test(TestCase::should_fail_with_message("pow_missing_comma", "pow(2 3)", "pow: ',' expected"));
    suite.add_test(TestCase::should_fail_with_message("pow_one_arg", "pow(2)", "pow: ',' expected"));
    suite.add_test(TestCase::should_fail_with_message("pow_missing_close", "pow(2, 3", "pow: ')' expected"));

    suite
}

fn create_malformed_expression_tests() -> TestSuite {
    let mut suite = TestSuite::new("Malformed Expressions");

    suite.add_test(TestCase::should_fail_with_message("unmatched_paren", "(1 + 2", "')' expected"));
    suite.add_test(TestCase::should_fail_with_message("unmatched_brace", "{1 + 2", "'}' expected"));
    suite.add_test(TestCase::should_fail_with_message("mismatched_pair", "(1 + 2}", "')' expected"));
    suite.add_test(TestCase::should_fail_with_message("stray_close", ")", "primary expected"));
    suite.add_test(TestCase::should_fail_with_message("dangling_operator", "1 +", "primary expected"));
    suite.add_test(TestCase::should_fail_with_message("empty_group", "()", "primary expected"));
    suite.add_test(TestCase::should_fail_with_message("divide_by_zero", "10 / 0", "/: divide by zero"));
    suite.add_test(TestCase::should_fail_with_message("modulo_by_zero", "10 % 0", "%: divide by zero"));
    suite.add_test(TestCase::should_fail_with_message("bad_token", "2 @ 3", "bad token '@'"));
    suite.add_test(TestCase::should_fail_with_message("leading_underscore", "_x", "bad token '_'"));
    suite.add_test(TestCase::should_fail_with_message("two_dots", "1.2.3", "malformed number literal '1.2.3'"));
    suite.add_test(TestCase::should_fail_with_message("lone_dot", ".", "malformed number literal '.'"));

    suite
}

fn create_literal_tests() -> TestSuite {
    let mut suite = TestSuite::new("Literals");

    suite.add_test(TestCase::should_yield("integer", "42", 42.0));
    suite.add_test(TestCase::should_yield("decimal", "3.25", 3.25));
    suite.add_test(TestCase::should_yield("leading_dot", ".5 + .5", 1.0));
    suite.add_test(TestCase::should_yield("trailing_dot", "2.", 2.0));
    suite.add_test(TestCase::should_yield("exponent", "1e3", 1000.0));
    suite.add_test(TestCase::should_yield("signed_exponent", "25E-1", 2.5));
    suite.add_test(TestCase::should_yield("whitespace_tolerant", "  1\t+\t2  ", 3.0));

    suite
}

fn create_variable_tests() -> TestSuite {
    let mut suite = TestSuite::new("Variables");

    suite.add_test(TestCase::should_yield("predefined_pi", "pi", 3.1415926535));
    suite.add_test(TestCase::should_yield("predefined_e", "e", 2.7182818284));
    suite.add_test(TestCase::should_yield("predefined_k", "k", 1000.0));
    suite.add_test(TestCase::should_yield("declare", "let x = 2 * 3", 6.0));
    suite.add_test(TestCase::should_yield("hash_declare", "# y = 4; y * 2", 8.0));
    suite.add_test(TestCase::should_yield("const_declare", "const c = 9; sqrt(c)", 3.0));
    suite.add_test(TestCase::should_yield("names_with_digits", "let a_var3 = 1; a_var3 + 1", 2.0));
    suite.add_test(TestCase::should_yield("assign_mutable", "k = 5", 5.0));
    suite.add_test(TestCase::should_yield("name_in_expression", "k + 1", 1001.0));
    suite.add_test(TestCase::should_yield("case_sensitive_keywords", "let Let = 3; Let", 3.0));
    suite.add_test(TestCase::should_fail_with_message("undefined", "x", "undefined variable x"));
    suite.add_test(TestCase::should_fail_with_message("assign_undeclared", "x = 3", "x has not been declared"));
    suite.add_test(TestCase::should_fail_with_message("assign_constant", "pi = 4", "trying to write to constant pi"));
    suite.add_test(TestCase::should_fail_with_message("const_then_assign", "const c = 1; c = 2", "constant c"));
    suite.add_test(TestCase::should_fail_with_message("declared_twice", "let x = 5; let x = 6", "x declared twice"));
    suite.add_test(TestCase::should_fail_with_message("declare_keyword", "let sqrt = 1", "name expected"));
    suite.add_test(TestCase::should_fail_with_message("missing_name", "let = 1", "name expected"));
    suite.add_test(TestCase::should_fail_with_message(
        "missing_equals",
        "let y 3",
        "'=' missing in declaration of y",
    ));

    suite
}

// ============================================================================
// Main Test Function
// ============================================================================

#[test]
fn comprehensive_grammar_tests() {
    let suites = vec![
        create_precedence_tests(),
        create_unary_tests(),
        create_factorial_tests(),
        create_function_tests(),
        create_malformed_expression_tests(),
        create_literal_tests(),
        create_variable_tests(),
    ];

    let problems: Vec<String> = suites.iter().flat_map(TestSuite::run).collect();

    assert!(problems.is_empty(), "Failing cases:\n{}", problems.join("\n"));
}
