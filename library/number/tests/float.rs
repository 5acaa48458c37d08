use core::cmp::Ordering;
use core::num::FpCategory;

use pretty_assertions::assert_eq;
use proptest::arbitrary::any;
use proptest::num::f64::{NEGATIVE, NORMAL, POSITIVE, SUBNORMAL, ZERO};
use proptest::prop_assert_eq;
use proptest::strategy::Strategy;
use proptest::test_runner::{Config, TestRunner};

use ember_number::float::{self, FloatClass, ParseFloatError};

fn finite() -> impl Strategy<Value = f64> {
    POSITIVE | NEGATIVE | NORMAL | SUBNORMAL | ZERO
}

#[test]
fn classify_agrees_with_fp_category() {
    TestRunner::new(Config::with_source_file(file!()))
        .run(&any::<u64>(), |bits| {
            let d = f64::from_bits(bits);
            prop_assert_eq!(float::classify(d), FloatClass::from(d.classify()));

            Ok(())
        })
        .unwrap();
}

#[test]
fn classify_covers_every_class() {
    let classes = [
        (1.0, FpCategory::Normal),
        (f64::from_bits(1), FpCategory::Subnormal),
        (-0.0, FpCategory::Zero),
        (f64::NEG_INFINITY, FpCategory::Infinite),
        (f64::NAN, FpCategory::Nan),
    ];
    for (d, category) in classes {
        assert_eq!(float::classify(d), FloatClass::from(category));
    }
}

#[test]
fn compare_is_antisymmetric_on_ordered_values() {
    TestRunner::new(Config::with_source_file(file!()))
        .run(&(finite(), finite()), |(f, g)| {
            prop_assert_eq!(float::compare(f, g), float::compare(g, f).reverse());
            prop_assert_eq!(float::compare(f, g), f.partial_cmp(&g).unwrap());

            Ok(())
        })
        .unwrap();
}

#[test]
fn compare_is_transitive_on_ordered_values() {
    TestRunner::new(Config::with_source_file(file!()))
        .run(&(finite(), finite(), finite()), |(a, b, c)| {
            if float::compare(a, b) != Ordering::Greater
                && float::compare(b, c) != Ordering::Greater
            {
                prop_assert_eq!(float::compare(a, c) == Ordering::Greater, false);
            }

            Ok(())
        })
        .unwrap();
}

#[test]
fn compare_with_nan_is_always_equal() {
    TestRunner::new(Config::with_source_file(file!()))
        .run(&any::<f64>(), |f| {
            prop_assert_eq!(float::compare(f, f64::NAN), Ordering::Equal);
            prop_assert_eq!(float::compare(f64::NAN, f), Ordering::Equal);

            Ok(())
        })
        .unwrap();
}

#[test]
fn debug_rendering_parses_back() {
    TestRunner::new(Config::with_source_file(file!()))
        .run(&finite(), |f| {
            let text = format!("{:?}", f);
            let parsed = float::parse(text.as_bytes());
            prop_assert_eq!(parsed.map(f64::to_bits), Ok(f.to_bits()));

            Ok(())
        })
        .unwrap();
}

#[test]
fn separators_are_ignored_anywhere() {
    TestRunner::new(Config::with_source_file(file!()))
        .run(&(0u32..1_000_000, 0usize..8), |(n, at)| {
            let mut text = n.to_string();
            let at = at.min(text.len());
            text.insert(at, '_');
            prop_assert_eq!(float::parse(text.as_bytes()), Ok(n as f64));

            Ok(())
        })
        .unwrap();
}

#[test]
fn seventeen_significant_digits_round_trip() {
    TestRunner::new(Config::with_source_file(file!()))
        .run(&finite(), |f| {
            let text = float::format_float("%.17g", f).unwrap();
            let parsed = float::parse(text.as_bytes());
            prop_assert_eq!(parsed.map(f64::to_bits), Ok(f.to_bits()));

            Ok(())
        })
        .unwrap();
}

#[test]
fn formatted_non_finite_values_parse_back() {
    for d in [f64::INFINITY, f64::NEG_INFINITY] {
        let text = float::format_float("%g", d).unwrap();
        assert_eq!(float::parse(text.as_bytes()), Ok(d));
    }
    let text = float::format_float("%G", f64::NAN).unwrap();
    assert_eq!(text, "NAN");
    assert!(float::parse(text.as_bytes()).unwrap().is_nan());
}

#[test]
fn parse_failures() {
    assert_eq!(float::parse(b"_"), Err(ParseFloatError::Empty));
    assert_eq!(float::parse(b"1.0.0"), Err(ParseFloatError::Invalid));
    assert_eq!(float::parse(b"0x1g"), Err(ParseFloatError::Invalid));
}
