//! Hashes and keys carried by ledger records.

use arbitrary::Arbitrary;

use crate::macros::impl_byte_buf;

/// Blake2b-224 digest, used for key and script hashes.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default, Arbitrary)]
pub struct Hash28([u8; 28]);

impl_byte_buf!(Hash28, 28);

/// Blake2b-256 digest, used for transaction ids.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default, Arbitrary)]
pub struct Hash32([u8; 32]);

impl_byte_buf!(Hash32, 32);

/// Ed25519 verification key.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default, Arbitrary)]
pub struct VerificationKey([u8; 32]);

impl_byte_buf!(VerificationKey, 32);

/// Ed25519 signature.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Arbitrary)]
pub struct Signature([u8; 64]);

impl_byte_buf!(Signature, 64);

pub type AddrKeyhash = Hash28;
pub type ScriptHash = Hash28;
pub type PoolKeyhash = Hash28;
pub type TransactionId = Hash32;
