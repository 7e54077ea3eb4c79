//! Property-based tests using proptest
//!
//! These tests generate random well-formed transactions and check the properties the
//! decode, mutate, encode pipeline must always hold.

#[cfg(test)]
mod tests {
    use crate::bitcoin::{Outpoint, Tx, TxFormat, TxInput, TxOutput, WitnessItem};
    use crate::mutate::{mutate, FieldSelector, FiniteSource, MutationConfig, RngSource, Section};
    use crate::pipeline;
    use bytes::Bytes;
    use proptest::prelude::*;
    use std::ops::Range;

    fn blob() -> impl Strategy<Value = Bytes> {
        prop::collection::vec(any::<u8>(), 0..48).prop_map(Bytes::from)
    }

    fn tx_input() -> impl Strategy<Value = TxInput> {
        (any::<[u8; 32]>(), any::<u32>(), blob(), any::<u32>()).prop_map(
            |(hash, index, script, sequence)| {
                TxInput::new(Outpoint::new(hash, index), script, sequence).unwrap()
            },
        )
    }

    fn tx_output() -> impl Strategy<Value = TxOutput> {
        (any::<u64>(), blob()).prop_map(|(value, script)| TxOutput::new(value, script).unwrap())
    }

    fn witness_item() -> impl Strategy<Value = WitnessItem> {
        blob().prop_map(|item| WitnessItem::new(item).unwrap())
    }

    // Strategy for generating well-formed transactions in either format
    fn transaction() -> impl Strategy<Value = Tx> {
        (
            any::<bool>(),
            any::<u32>(),
            prop::collection::vec(tx_input(), 0..5),
            prop::collection::vec(tx_output(), 0..5),
            prop::collection::vec(witness_item(), 0..5),
            any::<u32>(),
        )
            .prop_map(|(segwit, version, inputs, outputs, witnesses, locktime)| {
                if segwit {
                    Tx::new(TxFormat::Segwit, version, inputs, outputs, witnesses, locktime)
                } else {
                    Tx::new(TxFormat::Legacy, version, inputs, outputs, vec![], locktime)
                }
                .unwrap()
            })
    }

    fn selector() -> impl Strategy<Value = FieldSelector> {
        prop::sample::select(FieldSelector::ALL.to_vec())
    }

    fn within(ranges: &[Range<usize>], pos: usize) -> bool {
        ranges.iter().any(|r| r.contains(&pos))
    }

    proptest! {
        #[test]
        fn test_round_trip_identity(tx in transaction()) {
            // Property: decoding then encoding a valid transaction gives back the same bytes
            let raw = tx.encode().unwrap();
            prop_assert_eq!(raw.len() as u64, tx.encoded_size());
            let decoded = Tx::decode(raw.clone(), tx.format()).unwrap();
            prop_assert_eq!(&decoded, &tx);
            prop_assert_eq!(decoded.encode().unwrap(), raw);
        }

        #[test]
        fn test_selective_mutation(tx in transaction(), field in selector(), seed: u64) {
            // Property: only the bytes owned by the selected field may differ
            let original = tx.encode().unwrap();
            let mut mutated = tx.clone();
            let config = MutationConfig::default().with(field);
            let report = mutate(&mut mutated, &config, &mut RngSource::seeded(seed)).unwrap();
            let out = mutated.encode().unwrap();
            prop_assert_eq!(out.len(), original.len());

            let owned: Vec<Range<usize>> = report
                .mutated
                .iter()
                .map(|m| tx.span_of(m.field, m.index).unwrap())
                .collect();
            for m in &report.mutated {
                prop_assert_eq!(m.field, field);
            }
            for pos in 0..original.len() {
                if !within(&owned, pos) {
                    prop_assert_eq!(out[pos], original[pos], "byte {} changed", pos);
                }
            }
        }

        #[test]
        fn test_length_preservation(tx in transaction(), seed: u64) {
            // Property: with every selector enabled, every field keeps its width
            let mut mutated = tx.clone();
            mutate(&mut mutated, &MutationConfig::all(), &mut RngSource::seeded(seed)).unwrap();
            prop_assert_eq!(mutated.encoded_size(), tx.encoded_size());
            prop_assert_eq!(mutated.inputs.len(), tx.inputs.len());
            prop_assert_eq!(mutated.outputs.len(), tx.outputs.len());
            prop_assert_eq!(mutated.witnesses.len(), tx.witnesses.len());
            for (a, b) in mutated.inputs.iter().zip(tx.inputs.iter()) {
                prop_assert_eq!(a.signature_script.len(), b.signature_script.len());
            }
            for (a, b) in mutated.outputs.iter().zip(tx.outputs.iter()) {
                prop_assert_eq!(a.pk_script.len(), b.pk_script.len());
            }
            let old_layout: Vec<_> = tx.layout().into_iter().map(|s| s.range).collect();
            let new_layout: Vec<_> = mutated.layout().into_iter().map(|s| s.range).collect();
            prop_assert_eq!(old_layout, new_layout);
        }

        #[test]
        fn test_count_limit(tx in transaction(), k in 0usize..7) {
            // Property: only the first k inputs have their sequence replaced
            let mut mutated = tx.clone();
            let config = MutationConfig::default()
                .with(FieldSelector::InputSequence)
                .limit(Section::Inputs, k)
                .unwrap();
            let mut source = FiniteSource::new(vec![0xa5; 4 * 7]);
            let report = mutate(&mut mutated, &config, &mut source).unwrap();
            let expected = k.min(tx.inputs.len());
            prop_assert_eq!(report.count(FieldSelector::InputSequence), expected);
            for (i, (a, b)) in mutated.inputs.iter().zip(tx.inputs.iter()).enumerate() {
                if i < expected {
                    prop_assert_eq!(a.sequence, [0xa5u8; 4]);
                } else {
                    prop_assert_eq!(a, b);
                }
            }
        }

        #[test]
        fn test_deterministic_under_seed(tx in transaction(), seed: u64) {
            // Property: the same input, config and seed always produce the same output
            let raw = tx.encode().unwrap();
            let config = MutationConfig::all();
            let format = tx.format();
            let mut first = RngSource::seeded(seed);
            let mut second = RngSource::seeded(seed);
            let a = pipeline::run(raw.clone(), format, &config, &mut first).unwrap();
            let b = pipeline::run(raw, format, &config, &mut second).unwrap();
            prop_assert_eq!(a, b);
        }

        #[test]
        fn test_truncation_is_an_error(tx in transaction(), cut in 1usize..16) {
            // Property: any strict prefix of a transaction fails to decode
            let raw = tx.encode().unwrap();
            let keep = raw.len().saturating_sub(cut);
            prop_assert!(Tx::decode(raw.slice(..keep), tx.format()).is_err());
        }
    }
}
