//! Transaction witnesses.

use arbitrary::Arbitrary;
use minicbor::{Decode, Encode};
use stakecore_collections::{CollectionResult, KeyedCollection, UpsertKey};
use tracing::debug;

use crate::{NativeScriptSet, PlutusV1ScriptSet, Signature, VerificationKey};

/// Signature over the transaction body by the holder of `vkey`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Arbitrary, Encode, Decode)]
#[cbor(array)]
pub struct VkeyWitness {
    #[n(0)]
    pub vkey: VerificationKey,

    #[n(1)]
    pub signature: Signature,
}

impl VkeyWitness {
    pub fn new(vkey: VerificationKey, signature: Signature) -> Self {
        Self { vkey, signature }
    }
}

impl UpsertKey for VkeyWitness {
    type Key = VerificationKey;

    fn upsert_key(&self) -> VerificationKey {
        self.vkey
    }
}

/// At most one witness per verification key; re-signing replaces in place.
pub type VkeyWitnessSet = KeyedCollection<VkeyWitness>;

/// Witness map of a transaction. Absent fields are omitted on the wire.
#[derive(Debug, Default, Eq, PartialEq, Encode, Decode)]
#[cbor(map)]
pub struct TransactionWitnessSet {
    #[n(0)]
    pub vkey_witnesses: Option<VkeyWitnessSet>,

    #[n(1)]
    pub native_scripts: Option<NativeScriptSet>,

    #[n(3)]
    pub plutus_v1_scripts: Option<PlutusV1ScriptSet>,
}

impl TransactionWitnessSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges `witnesses` into the vkey witnesses, replacing any held for the
    /// same key.
    pub fn add_vkey_witnesses(&mut self, witnesses: &VkeyWitnessSet) -> CollectionResult<()> {
        let ours = match &mut self.vkey_witnesses {
            Some(set) => set,
            slot => slot.insert(VkeyWitnessSet::new()?),
        };

        let before = ours.len();
        ours.apply(witnesses)?;
        debug!(
            incoming = witnesses.len(),
            before,
            after = ours.len(),
            "merged vkey witnesses"
        );

        Ok(())
    }

    pub fn vkey_witness_count(&self) -> usize {
        self.vkey_witnesses.as_ref().map_or(0, |s| s.len())
    }
}
