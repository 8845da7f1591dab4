use arbitrary::Arbitrary;
use minicbor::{Decode, Encode};
use stakecore_collections::Set;

use crate::{Credential, PoolKeyhash};

/// Shelley-era stake certificates.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Arbitrary, Encode, Decode)]
#[cbor(flat)]
pub enum Certificate {
    #[n(0)]
    StakeRegistration(#[n(0)] Credential),

    #[n(1)]
    StakeDeregistration(#[n(0)] Credential),

    #[n(2)]
    StakeDelegation(#[n(0)] Credential, #[n(1)] PoolKeyhash),
}

impl Certificate {
    pub fn credential(&self) -> &Credential {
        match self {
            Self::StakeRegistration(c)
            | Self::StakeDeregistration(c)
            | Self::StakeDelegation(c, _) => c,
        }
    }
}

pub type CertificateSet = Set<Certificate>;
