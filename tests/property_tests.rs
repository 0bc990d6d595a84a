use proptest::prelude::*;
use scicalc::Evaluator;

proptest! {
    #[test]
    fn small_integer_arithmetic_matches_i64(a in -1000i64..1000, b in -1000i64..1000, c in 1i64..100) {
        let calc = Evaluator::new();
        let src = format!("({}) + ({}) * ({})", a, b, c);
        prop_assert_eq!(calc.evaluate(&src).unwrap(), (a + b * c) as f64);
        let src = format!("({}) - ({})", a, b);
        prop_assert_eq!(calc.evaluate(&src).unwrap(), (a - b) as f64);
    }

    #[test]
    fn floor_division_and_remainder_recombine(a in -10_000i64..10_000, b in prop::sample::select(vec![-7i64, -3, -1, 1, 2, 5, 13])) {
        let calc = Evaluator::new();
        let q = calc.evaluate(&format!("({}) // ({})", a, b)).unwrap();
        let r = calc.evaluate(&format!("({}) % ({})", a, b)).unwrap();
        prop_assert_eq!(q * b as f64 + r, a as f64);
        prop_assert_eq!(q, a.div_euclid(b) as f64 - if b < 0 && a.rem_euclid(b) != 0 { 1.0 } else { 0.0 });
        // remainder takes the divisor's sign
        prop_assert!(r == 0.0 || (r < 0.0) == (b < 0));
    }

    #[test]
    fn evaluation_is_repeatable(x in -1.0e6f64..1.0e6) {
        let calc = Evaluator::new();
        let src = format!("abs({:?}) + sqrt(abs({:?}))", x, x);
        let first = calc.evaluate(&src).unwrap();
        prop_assert_eq!(first, calc.evaluate(&src).unwrap());
        prop_assert_eq!(first, x.abs() + x.abs().sqrt());
    }

    #[test]
    fn arbitrary_input_never_panics(src in "[0-9a-z_+*/%().,' -]{0,40}") {
        let _ = Evaluator::new().evaluate(&src);
    }
}
