//! Property-based tests for TranscriptMapIndex construction and lookups

use cigarmap::core::{
    BuildPolicy, CoordinateMapBuilder, LookupResult, MapConfig, TranscriptMapIndex,
    TranscriptRecord,
};
use proptest::prelude::*;

/// Generate a valid M/X/I/D CIGAR string
fn arb_cigar() -> impl Strategy<Value = String> {
    prop::collection::vec(
        (1u32..20, prop_oneof![Just('M'), Just('X'), Just('I'), Just('D')]),
        1..10,
    )
    .prop_map(|tokens| tokens.iter().map(|(n, op)| format!("{}{}", n, op)).collect())
}

/// Generate records with unique ids
fn arb_records() -> impl Strategy<Value = Vec<TranscriptRecord>> {
    prop::collection::vec(
        (
            prop_oneof![Just("chr1"), Just("chr2"), Just("chrX")],
            0i64..1_000_000,
            arb_cigar(),
        ),
        1..30,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (chrom, start, cigar))| {
                TranscriptRecord::new(format!("TX{}", i), chrom, start, cigar)
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every indexed offset resolves to exactly the value computed by the builder
    #[test]
    fn prop_lookup_matches_builder(records in arb_records()) {
        let index = TranscriptMapIndex::build(records.clone()).unwrap();
        prop_assert_eq!(index.len(), records.len());

        let builder = CoordinateMapBuilder::new();
        for record in &records {
            let map = builder.build(&record.cigar, record.reference_start).unwrap();
            for (offset, coordinate) in map.iter() {
                prop_assert_eq!(
                    index.lookup(&record.transcript_id, offset as i64),
                    LookupResult::Mapped { chromosome: record.chromosome.as_str(), coordinate }
                );
            }
            prop_assert_eq!(
                index.lookup(&record.transcript_id, map.len() as i64),
                LookupResult::OutOfRange { chromosome: record.chromosome.as_str() }
            );
        }
    }

    /// Unknown ids are NotFound regardless of offset
    #[test]
    fn prop_unknown_transcript_not_found(
        records in arb_records(),
        offset in -10i64..1000,
    ) {
        let index = TranscriptMapIndex::build(records).unwrap();
        prop_assert_eq!(index.lookup("not-a-transcript", offset), LookupResult::NotFound);
    }

    /// Negative offsets are never mapped
    #[test]
    fn prop_negative_offset_out_of_range(
        records in arb_records(),
        offset in i64::MIN..0,
    ) {
        let index = TranscriptMapIndex::build(records.clone()).unwrap();
        let result = index.lookup(&records[0].transcript_id, offset);
        prop_assert!(matches!(result, LookupResult::OutOfRange { .. }), "expected OutOfRange, got {:?}", result);
    }

    /// Thread count never changes the index contents
    #[test]
    fn prop_parallel_equivalent(
        records in arb_records(),
        threads in 2usize..6,
    ) {
        let sequential = TranscriptMapIndex::build(records.clone()).unwrap();
        let config = MapConfig { threads, ..MapConfig::default() };
        let parallel = TranscriptMapIndex::build_with_config(records, &config).unwrap().index;

        let a: Vec<_> = sequential.entries().map(|e| (e.transcript_id.clone(), e.map.clone())).collect();
        let b: Vec<_> = parallel.entries().map(|e| (e.transcript_id.clone(), e.map.clone())).collect();
        prop_assert_eq!(a, b);
    }

    /// Partial success indexes exactly the records that build on their own
    #[test]
    fn prop_partial_success_partitions(
        records in arb_records(),
        broken in prop::collection::vec(any::<bool>(), 30),
    ) {
        let mut records = records;
        for (record, &bad) in records.iter_mut().zip(&broken) {
            if bad {
                record.cigar.push_str("3S");
            }
        }
        let config = MapConfig { policy: BuildPolicy::PartialSuccess, ..MapConfig::default() };
        let built = TranscriptMapIndex::build_with_config(records.clone(), &config).unwrap();

        prop_assert_eq!(built.index.len() + built.failures.len(), records.len());
        for failure in &built.failures {
            prop_assert!(!built.index.contains(&failure.transcript_id));
            prop_assert!(failure.source.is_unsupported());
        }

        let batch = TranscriptMapIndex::build(records);
        prop_assert_eq!(batch.is_err(), !built.failures.is_empty());
        if let Err(err) = batch {
            prop_assert_eq!(err.record_index, built.failures[0].record_index);
        }
    }
}
