//! Native and Plutus scripts.

use arbitrary::Arbitrary;
use minicbor::{Decode, Decoder, Encode, Encoder, decode, encode};
use stakecore_collections::{List, Set};

use crate::AddrKeyhash;

/// Timelock and multisig script tree.
///
/// The composite variants hold their children in a [`NativeScriptList`], so a
/// subtree may be shared between several parents.
#[derive(Debug, Eq, PartialEq, Encode, Decode)]
#[cbor(flat)]
pub enum NativeScript {
    #[n(0)]
    ScriptPubkey(#[n(0)] AddrKeyhash),

    #[n(1)]
    ScriptAll(#[n(0)] NativeScriptList),

    #[n(2)]
    ScriptAny(#[n(0)] NativeScriptList),

    #[n(3)]
    ScriptNOfK(#[n(0)] u32, #[n(1)] NativeScriptList),

    #[n(4)]
    InvalidBefore(#[n(0)] u64),

    #[n(5)]
    InvalidHereafter(#[n(0)] u64),
}

impl NativeScript {
    /// Children of a composite script, `None` for leaves.
    pub fn children(&self) -> Option<&NativeScriptList> {
        match self {
            Self::ScriptAll(s) | Self::ScriptAny(s) | Self::ScriptNOfK(_, s) => Some(s),
            _ => None,
        }
    }

    /// Height of the script tree, leaves count as 1.
    pub fn depth(&self) -> usize {
        1 + self
            .children()
            .and_then(|s| s.iter().map(|c| c.depth()).max())
            .unwrap_or(0)
    }

    /// Key hashes named anywhere in the tree, in pre-order.
    pub fn required_signers(&self) -> Vec<AddrKeyhash> {
        let mut out = Vec::new();
        self.collect_signers(&mut out);
        out
    }

    fn collect_signers(&self, out: &mut Vec<AddrKeyhash>) {
        match self {
            Self::ScriptPubkey(h) => out.push(*h),
            _ => {
                for child in self.children().into_iter().flatten() {
                    child.collect_signers(out);
                }
            }
        }
    }
}

pub type NativeScriptList = List<NativeScript>;
pub type NativeScriptSet = Set<NativeScript>;

/// Serialized Plutus V1 script.
#[derive(Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Arbitrary)]
pub struct PlutusV1Script(Vec<u8>);

impl PlutusV1Script {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl<C> Encode<C> for PlutusV1Script {
    fn encode<W: encode::Write>(
        &self,
        e: &mut Encoder<W>,
        _ctx: &mut C,
    ) -> Result<(), encode::Error<W::Error>> {
        e.bytes(&self.0)?;
        Ok(())
    }
}

impl<'b, C> Decode<'b, C> for PlutusV1Script {
    fn decode(d: &mut Decoder<'b>, _ctx: &mut C) -> Result<Self, decode::Error> {
        Ok(Self(d.bytes()?.to_vec()))
    }
}

pub type PlutusV1ScriptSet = Set<PlutusV1Script>;
