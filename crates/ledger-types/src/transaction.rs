//! Transaction inputs, outputs and resolved UTxOs.

use arbitrary::Arbitrary;
use minicbor::{Decode, Decoder, Encode, Encoder, decode, encode};
use stakecore_collections::{List, Set};

use crate::TransactionId;

/// Reference to an output of a previous transaction.
#[derive(
    Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Arbitrary, Encode, Decode,
)]
#[cbor(array)]
pub struct TransactionInput {
    #[n(0)]
    pub transaction_id: TransactionId,

    #[n(1)]
    pub index: u64,
}

impl TransactionInput {
    pub fn new(transaction_id: TransactionId, index: u64) -> Self {
        Self {
            transaction_id,
            index,
        }
    }
}

/// Raw address bytes. Header and payload are not interpreted here.
#[derive(Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Arbitrary)]
pub struct Address(Vec<u8>);

impl Address {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Address {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl<C> Encode<C> for Address {
    fn encode<W: encode::Write>(
        &self,
        e: &mut Encoder<W>,
        _ctx: &mut C,
    ) -> Result<(), encode::Error<W::Error>> {
        e.bytes(&self.0)?;
        Ok(())
    }
}

impl<'b, C> Decode<'b, C> for Address {
    fn decode(d: &mut Decoder<'b>, _ctx: &mut C) -> Result<Self, decode::Error> {
        Ok(Self(d.bytes()?.to_vec()))
    }
}

/// Output in the legacy array form `[address, coin]`.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Arbitrary, Encode, Decode)]
#[cbor(array)]
pub struct TransactionOutput {
    #[n(0)]
    pub address: Address,

    #[n(1)]
    pub amount: u64,
}

/// Input paired with the output it spends.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Arbitrary, Encode, Decode)]
#[cbor(array)]
pub struct Utxo {
    #[n(0)]
    pub input: TransactionInput,

    #[n(1)]
    pub output: TransactionOutput,
}

impl Utxo {
    pub fn new(input: TransactionInput, output: TransactionOutput) -> Self {
        Self { input, output }
    }

    pub fn amount(&self) -> u64 {
        self.output.amount
    }
}

pub type TransactionInputSet = Set<TransactionInput>;
pub type TransactionOutputList = List<TransactionOutput>;
pub type UtxoList = List<Utxo>;

/// Sum of the coin held by `utxos`, saturating on overflow.
pub fn total_amount(utxos: &UtxoList) -> u64 {
    utxos
        .iter()
        .fold(0u64, |acc, u| acc.saturating_add(u.amount()))
}
