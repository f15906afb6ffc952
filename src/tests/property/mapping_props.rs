//! Property-based tests for trope → archetype resolution

use proptest::prelude::*;

use crate::core::catalog::TropeChild;
use crate::core::embedding::HashingEmbeddings;
use crate::core::mapping::{MappingConfig, MappingRow, TropeResolver};
use crate::tests::common::sample_parents;

fn arb_tropes() -> impl Strategy<Value = Vec<TropeChild>> {
    prop::collection::vec("[A-Za-z][A-Za-z ]{0,24}", 0..12).prop_map(|names| {
        names
            .into_iter()
            .enumerate()
            .map(|(i, name)| TropeChild::new(format!("T{i}"), name))
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_every_trope_gets_one_row(tropes in arb_tropes(), batch_size in 1usize..8) {
        let parents = sample_parents();
        let config = MappingConfig { batch_size, ..MappingConfig::default() };
        let threshold = config.threshold;
        let resolver = TropeResolver::new(Box::new(HashingEmbeddings::new(64)), config);

        let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let table = rt.block_on(resolver.resolve(&parents, &tropes)).unwrap();

        prop_assert_eq!(table.len(), tropes.len());
        for (row, trope) in table.rows().iter().zip(&tropes) {
            prop_assert_eq!(&row.child_id, &trope.id);
            prop_assert!(parents.iter().any(|p| p.id == row.resolved_parent_id));
            prop_assert!((-1.0..=1.0).contains(&row.confidence_score));
            prop_assert_eq!(row.review_needed, row.confidence_score < threshold);
        }
    }

    #[test]
    fn prop_review_flag_matches_stored_score(score in -1.0f64..=1.0, threshold in 0.0f64..=1.0) {
        let parents = sample_parents();
        let row = MappingRow::new(&TropeChild::new("T1", "Anyone"), &parents[0], score, threshold);

        prop_assert!((row.confidence_score - score).abs() <= 0.00005 + 1e-12);
        prop_assert_eq!(row.review_needed, row.confidence_score < threshold);
    }
}
