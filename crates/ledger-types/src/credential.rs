use arbitrary::Arbitrary;
use minicbor::{Decode, Encode};
use stakecore_collections::Set;

use crate::{AddrKeyhash, ScriptHash};

/// Stake or payment credential, encoded as `[0, keyhash]` or `[1, scripthash]`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Arbitrary, Encode, Decode)]
#[cbor(flat)]
pub enum Credential {
    #[n(0)]
    KeyHash(#[n(0)] AddrKeyhash),

    #[n(1)]
    ScriptHash(#[n(0)] ScriptHash),
}

impl Credential {
    pub fn hash(&self) -> &[u8; 28] {
        match self {
            Self::KeyHash(h) | Self::ScriptHash(h) => h.as_bytes(),
        }
    }

    pub fn is_script(&self) -> bool {
        matches!(self, Self::ScriptHash(_))
    }
}

pub type CredentialSet = Set<Credential>;
