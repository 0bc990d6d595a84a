use scicalc::{ErrorKind, EvalError, Evaluator, NodeKind};

#[test]
fn empty_expression() {
    let calc = Evaluator::new();
    let err = calc.evaluate("").unwrap_err();
    assert_eq!(err, EvalError::Empty);
    assert_eq!(err.to_string(), "Expression is empty.");
    assert_eq!(err.kind(), ErrorKind::InvalidExpression);
}

#[test]
fn division_by_zero() {
    let calc = Evaluator::new();
    for src in ["1/0", "1 % 0", "1 // 0", "1 / (2 - 2)", "5 / 0.0"] {
        let err = calc.evaluate(src).unwrap_err();
        assert_eq!(err.to_string(), "Division by zero.", "{}", src);
    }
}

#[test]
fn factorial_domain() {
    let calc = Evaluator::new();
    for src in ["fact(5.5)", "fact(-1)", "factorial(-0.5)"] {
        let err = calc.evaluate(src).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Factorial is only defined for non-negative integers.",
            "{}",
            src
        );
    }
}

#[test]
fn math_domain_errors_keep_their_message() {
    let calc = Evaluator::new();
    assert_eq!(calc.evaluate("sqrt(-1)").unwrap_err().to_string(), "math domain error");
    assert_eq!(calc.evaluate("log(0)").unwrap_err().to_string(), "math domain error");
    assert_eq!(calc.evaluate("asin(2)").unwrap_err().to_string(), "math domain error");
    assert_eq!(
        calc.evaluate("floor(1e999 - 1e999)").unwrap_err().to_string(),
        "cannot convert float NaN to integer"
    );
}

#[test]
fn overflow_from_functions() {
    let calc = Evaluator::new();
    assert_eq!(calc.evaluate("exp(1000)").unwrap_err(), EvalError::Overflow);
    assert_eq!(calc.evaluate("fact(171)").unwrap_err(), EvalError::Overflow);
    assert_eq!(calc.evaluate("ceil(1e999)").unwrap_err(), EvalError::Overflow);
}

#[test]
fn unknown_name_is_invalid() {
    let calc = Evaluator::new();
    for src in ["foo", "foo(1)", "x + 1", "None", "sin"] {
        let err = calc.evaluate(src).unwrap_err();
        assert_eq!(err, EvalError::Invalid, "{}", src);
        assert_eq!(err.to_string(), "Invalid expression.");
    }
}

#[test]
fn unknown_function_fails_before_its_arguments() {
    let calc = Evaluator::new();
    assert_eq!(calc.evaluate("nope(1/0)").unwrap_err(), EvalError::Invalid);
}

#[test]
fn wrong_arity_is_invalid() {
    let calc = Evaluator::new();
    for src in ["sin()", "sin(1, 2)", "log(1, 2, 3)", "pi(1)"] {
        assert_eq!(calc.evaluate(src).unwrap_err(), EvalError::Invalid, "{}", src);
    }
}

#[test]
fn assignment_passes_the_check_but_does_not_evaluate() {
    let calc = Evaluator::new();
    assert_eq!(calc.evaluate("x = 2").unwrap_err(), EvalError::Invalid);
}

#[test]
fn keywords_bind_only_to_named_parameters() {
    let calc = Evaluator::new();
    assert_eq!(calc.evaluate("fact(x=5)").unwrap(), 120.0);
    assert!((calc.evaluate("sin_deg(x=30)").unwrap() - 0.5).abs() < 1e-9);
    assert_eq!(calc.evaluate("round(2.5, ndigits=0)").unwrap(), 2.0);
    assert_eq!(calc.evaluate("round(number=2.675, ndigits=1)").unwrap(), 2.7);
    for src in ["sin(x=1)", "sqrt(x=4)", "abs(x=-1)", "log(8, base=2)", "fact(n=5)", "fact(5, x=5)"] {
        assert_eq!(calc.evaluate(src).unwrap_err(), EvalError::Invalid, "{}", src);
    }
}

#[test]
fn syntax_errors_report_position() {
    let calc = Evaluator::new();
    match calc.evaluate("1 +").unwrap_err() {
        EvalError::Syntax { position, .. } => assert_eq!(position, 3),
        other => panic!("unexpected error: {:?}", other),
    }
    match calc.evaluate("(1 + 2").unwrap_err() {
        EvalError::Syntax { position, .. } => assert_eq!(position, 6),
        other => panic!("unexpected error: {:?}", other),
    }
    let err = calc.evaluate("1 $ 2").unwrap_err();
    assert!(err.to_string().starts_with("Invalid syntax: "), "{}", err);
    assert!(err.to_string().ends_with("at position 2."), "{}", err);
    assert_eq!(err.kind(), ErrorKind::InvalidExpression);
}

#[test]
fn long_operator_chains_are_not_nesting() {
    let calc = Evaluator::new();
    assert_eq!(calc.evaluate(&vec!["1"; 500].join(" + ")).unwrap(), 500.0);
    assert_eq!(calc.evaluate(&vec!["1"; 210].join(" * ")).unwrap(), 1.0);
    assert_eq!(calc.evaluate(&vec!["sqrt(4) - 1"; 300].join(" + ")).unwrap(), 300.0);
}

#[test]
fn deep_nesting_is_a_syntax_error() {
    let calc = Evaluator::new();
    let src = format!("{}1{}", "(".repeat(500), ")".repeat(500));
    match calc.evaluate(&src).unwrap_err() {
        EvalError::Syntax { message, .. } => assert_eq!(message, "expression nested too deeply"),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn unsupported_elements_name_the_node() {
    let calc = Evaluator::new();
    let err = calc.evaluate("1 < 2").unwrap_err();
    assert_eq!(err, EvalError::Unsupported(NodeKind::Compare));
    assert_eq!(err.to_string(), "Unsupported expression element: Compare");
    assert_eq!(err.kind(), ErrorKind::UnsupportedElement);
}
