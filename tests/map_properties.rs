//! Property-based tests for CoordinateMapBuilder
//!
//! Covers domain contiguity, monotonicity, insertion/deletion bookkeeping,
//! rejection of unsupported and malformed CIGARs, and determinism.

use cigarmap::core::{CoordinateMapBuilder, MappingError};
use proptest::prelude::*;

/// Generate a CIGAR over M/X/I/D as (length, op) tokens
fn arb_supported_cigar() -> impl Strategy<Value = Vec<(u32, char)>> {
    prop::collection::vec(
        (1u32..30, prop_oneof![Just('M'), Just('X'), Just('I'), Just('D')]),
        1..20,
    )
}

fn render(tokens: &[(u32, char)]) -> String {
    tokens.iter().map(|(n, op)| format!("{}{}", n, op)).collect()
}

/// Expand tokens into one op char per base
fn per_base(tokens: &[(u32, char)]) -> Vec<char> {
    tokens
        .iter()
        .flat_map(|(n, op)| std::iter::repeat(*op).take(*n as usize))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The domain is exactly 0..(M + X + I bases)
    #[test]
    fn prop_domain_is_contiguous(
        tokens in arb_supported_cigar(),
        start in 0i64..1_000_000,
    ) {
        let map = CoordinateMapBuilder::new().build(&render(&tokens), start).unwrap();
        let expected: usize = tokens
            .iter()
            .filter(|(_, op)| *op != 'D')
            .map(|(n, _)| *n as usize)
            .sum();

        prop_assert_eq!(map.len(), expected);
        for offset in 0..expected {
            prop_assert!(map.get(offset).is_some());
        }
        prop_assert!(map.get(expected).is_none());
    }

    /// Coordinates never decrease; M/X steps strictly increase, I steps stay flat
    #[test]
    fn prop_monotonic(
        tokens in arb_supported_cigar(),
        start in 0i64..1_000_000,
    ) {
        let map = CoordinateMapBuilder::new().build(&render(&tokens), start).unwrap();
        let kinds: Vec<char> = per_base(&tokens).into_iter().filter(|op| *op != 'D').collect();
        let coords = map.as_slice();

        for i in 1..coords.len() {
            prop_assert!(coords[i] >= coords[i - 1]);
            match kinds[i] {
                'M' | 'X' => prop_assert!(coords[i] > coords[i - 1]),
                'I' => prop_assert_eq!(coords[i], coords[i - 1]),
                other => prop_assert!(false, "unexpected op {}", other),
            }
        }
    }

    /// Each local offset lands on start + (reference bases consumed so far) - 1
    #[test]
    fn prop_matches_reference_walk(
        tokens in arb_supported_cigar(),
        start in 0i64..1_000_000,
    ) {
        let map = CoordinateMapBuilder::new().build(&render(&tokens), start).unwrap();

        let mut consumed = 0i64;
        let mut offset = 0usize;
        for op in per_base(&tokens) {
            if op != 'I' {
                consumed += 1;
            }
            if op != 'D' {
                prop_assert_eq!(map.get(offset), Some(start + consumed - 1));
                offset += 1;
            }
        }
    }

    /// The first M/X base lands on the reference start when no insertion precedes it
    #[test]
    fn prop_first_match_at_start(
        first_len in 1u32..50,
        rest in arb_supported_cigar(),
        start in 0i64..1_000_000,
    ) {
        let mut tokens = vec![(first_len, 'M')];
        tokens.extend(rest);
        let map = CoordinateMapBuilder::new().build(&render(&tokens), start).unwrap();
        prop_assert_eq!(map.get(0), Some(start));
    }

    /// Any unsupported op anywhere rejects the whole CIGAR
    #[test]
    fn prop_unsupported_rejected(
        tokens in arb_supported_cigar(),
        bad_op in prop_oneof![Just('S'), Just('H'), Just('N'), Just('P'), Just('=')],
        bad_len in 1u32..10,
        position in 0usize..20,
    ) {
        let mut tokens = tokens;
        let at = position.min(tokens.len());
        tokens.insert(at, (bad_len, bad_op));

        let err = CoordinateMapBuilder::new().build(&render(&tokens), 0).unwrap_err();
        match err {
            MappingError::UnsupportedOperation { found, .. } => prop_assert_eq!(found, vec![bad_op]),
            other => prop_assert!(false, "expected UnsupportedOperation, got {:?}", other),
        }
    }

    /// A zero-length token is malformed wherever it appears
    #[test]
    fn prop_zero_length_malformed(
        tokens in arb_supported_cigar(),
        op in prop_oneof![Just('M'), Just('I'), Just('D'), Just('S')],
        position in 0usize..20,
    ) {
        let mut cigar_tokens: Vec<String> = tokens.iter().map(|(n, o)| format!("{}{}", n, o)).collect();
        let at = position.min(cigar_tokens.len());
        cigar_tokens.insert(at, format!("0{}", op));

        let err = CoordinateMapBuilder::new().build(&cigar_tokens.concat(), 0).unwrap_err();
        prop_assert!(err.is_malformed(), "got {:?}", err);
    }

    /// Building twice gives identical maps
    #[test]
    fn prop_idempotent(
        tokens in arb_supported_cigar(),
        start in 0i64..1_000_000,
    ) {
        let cigar = render(&tokens);
        let builder = CoordinateMapBuilder::new();
        prop_assert_eq!(builder.build(&cigar, start).unwrap(), builder.build(&cigar, start).unwrap());
    }

    /// Shifting the reference start shifts every coordinate by the same amount
    #[test]
    fn prop_translation_invariant(
        tokens in arb_supported_cigar(),
        start in 0i64..1_000_000,
        shift in 0i64..1_000_000,
    ) {
        let cigar = render(&tokens);
        let builder = CoordinateMapBuilder::new();
        let a = builder.build(&cigar, start).unwrap();
        let b = builder.build(&cigar, start + shift).unwrap();
        for ((_, x), (_, y)) in a.iter().zip(b.iter()) {
            prop_assert_eq!(y - x, shift);
        }
    }
}

#[test]
fn test_documented_example() {
    let map = CoordinateMapBuilder::new().build("8M10D6M1I2M", 3).unwrap();
    let expected: Vec<i64> = vec![3, 4, 5, 6, 7, 8, 9, 10, 21, 22, 23, 24, 25, 26, 26, 27, 28];
    assert_eq!(map.as_slice(), &expected[..]);
}

#[test]
fn test_malformed_examples() {
    let builder = CoordinateMapBuilder::new();
    for cigar in ["", "M", "12", "3M4", "0M", "aM", "3M?2D", "3 M"] {
        assert!(
            builder.build(cigar, 0).unwrap_err().is_malformed(),
            "{:?} should be malformed",
            cigar
        );
    }
}

#[test]
fn test_unsupported_examples() {
    let builder = CoordinateMapBuilder::new();
    for cigar in ["5S10M", "10M5H", "3M100N3M", "2M1P2M", "10="] {
        assert!(
            builder.build(cigar, 0).unwrap_err().is_unsupported(),
            "{:?} should be unsupported",
            cigar
        );
    }
}
