//! Ledger record types stored in stakecore collections.
//!
//! Each type carries its own CBOR codec; the plural forms are aliases over
//! [`List`](stakecore_collections::List), [`Set`](stakecore_collections::Set)
//! or [`KeyedCollection`](stakecore_collections::KeyedCollection).

mod certificate;
mod credential;
mod errors;
mod hash;
mod macros;
mod script;
mod transaction;
mod witness;

pub use certificate::{Certificate, CertificateSet};
pub use credential::{Credential, CredentialSet};
pub use errors::{LedgerTypeError, LedgerTypeResult};
pub use hash::{
    AddrKeyhash, Hash28, Hash32, PoolKeyhash, ScriptHash, Signature, TransactionId,
    VerificationKey,
};
pub use script::{
    NativeScript, NativeScriptList, NativeScriptSet, PlutusV1Script, PlutusV1ScriptSet,
};
pub use transaction::{
    Address, TransactionInput, TransactionInputSet, TransactionOutput, TransactionOutputList,
    Utxo, UtxoList, total_amount,
};
pub use witness::{TransactionWitnessSet, VkeyWitness, VkeyWitnessSet};
