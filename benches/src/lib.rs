//! Fixtures for the stakecore collection benchmarks.

#[allow(
    unused_imports,
    clippy::allow_attributes,
    reason = "used by the bench targets"
)]
use criterion as _;
use stakecore_collections::{Encoding, Managed, Set};
use stakecore_ledger_types::{TransactionInput, TransactionInputSet, UtxoList, VkeyWitness};
use stakecore_test_utils::ArbitraryGenerator;

/// Element counts exercised by every benchmark group.
pub const ELEMENT_COUNTS: &[usize] = &[1, 10, 100, 1_000];

pub fn utxo_list(n: usize, seed: u64) -> UtxoList {
    let mut generator = ArbitraryGenerator::new_seeded(seed);
    let mut list = UtxoList::new().expect("bench: alloc list");
    for _ in 0..n {
        list.add_value(generator.generate())
            .expect("bench: add utxo");
    }
    list
}

pub fn input_set(n: usize, seed: u64, encoding: Encoding) -> TransactionInputSet {
    let mut generator = ArbitraryGenerator::new_seeded(seed);
    let inputs: Vec<TransactionInput> = generator.generate_n(n);
    let mut set = TransactionInputSet::from_handles(inputs.into_iter().map(Managed::new))
        .expect("bench: alloc set");
    set.set_encoding(encoding);
    set
}

/// Raw witness sequence where every other entry re-signs the previous key.
///
/// Kept as a plain set so the duplicates survive encoding.
pub fn witnesses_with_resigns(n: usize, seed: u64) -> Set<VkeyWitness> {
    let mut generator = ArbitraryGenerator::new_seeded(seed);
    let mut set = Set::new().expect("bench: alloc witnesses");
    let mut last = None;
    for i in 0..n {
        let mut w: VkeyWitness = generator.generate();
        if let (1, Some(prev)) = (i % 2, last) {
            w.vkey = prev;
        }
        last = Some(w.vkey);
        set.add_value(w).expect("bench: add witness");
    }
    set
}
