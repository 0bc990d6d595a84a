use scicalc::{EvalError, Evaluator};

#[test]
fn parses_integers_and_decimals() {
    let calc = Evaluator::new();
    assert_eq!(calc.evaluate("42").unwrap(), 42.0);
    assert_eq!(calc.evaluate("3.25").unwrap(), 3.25);
    assert_eq!(calc.evaluate(".5").unwrap(), 0.5);
    assert_eq!(calc.evaluate("5.").unwrap(), 5.0);
    assert_eq!(calc.evaluate("0").unwrap(), 0.0);
    assert_eq!(calc.evaluate("0.0").unwrap(), 0.0);
}

#[test]
fn parses_scientific_notation() {
    let calc = Evaluator::new();
    assert_eq!(calc.evaluate("1e3").unwrap(), 1000.0);
    assert_eq!(calc.evaluate("1E3").unwrap(), 1000.0);
    assert_eq!(calc.evaluate("2.5e-3").unwrap(), 0.0025);
    assert_eq!(calc.evaluate("1e+2").unwrap(), 100.0);
    assert_eq!(calc.evaluate("1e999").unwrap(), f64::INFINITY);
}

#[test]
fn parses_underscore_separators() {
    let calc = Evaluator::new();
    assert_eq!(calc.evaluate("1_000_000").unwrap(), 1_000_000.0);
    assert_eq!(calc.evaluate("1_0.2_5").unwrap(), 10.25);
}

#[test]
fn parses_radix_prefixes() {
    let calc = Evaluator::new();
    assert_eq!(calc.evaluate("0x1F").unwrap(), 31.0);
    assert_eq!(calc.evaluate("0o17").unwrap(), 15.0);
    assert_eq!(calc.evaluate("0b1010").unwrap(), 10.0);
}

#[test]
fn rejects_malformed_numbers() {
    let calc = Evaluator::new();
    for src in ["007", "1__0", "1e", "0x", "1.2.3"] {
        match calc.evaluate(src).unwrap_err() {
            EvalError::Syntax { .. } => {}
            other => panic!("unexpected error for {}: {:?}", src, other),
        }
    }
}

#[test]
fn leading_zeros_message() {
    let calc = Evaluator::new();
    match calc.evaluate("012").unwrap_err() {
        EvalError::Syntax { message, position } => {
            assert_eq!(
                message,
                "leading zeros in decimal integer literals are not permitted"
            );
            assert_eq!(position, 0);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}
