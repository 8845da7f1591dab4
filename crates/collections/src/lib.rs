//! Reference-counted ledger collections and their CBOR list/set codec.
//!
//! Every plural ledger type (UTXO lists, certificate sets, script lists,
//! witness sets) is an instance of [`Collection`], either as a [`List`] that
//! always encodes as a plain array or as a [`Set`] that may carry the tag 258
//! wrapper. [`KeyedCollection`] layers at-most-one-per-key semantics over a
//! set.

mod codec;
mod collection;
mod errors;
mod flavor;
mod index;
mod keyed;
pub mod nullable;
mod params;
mod policy;

pub use collection::{Collection, List, Set};
pub use errors::{CollectionError, CollectionResult, MAJOR_TYPE_MISMATCH};
pub use flavor::{Encoding, Flavor, ListFlavor, SET_TAG, SetFlavor};
pub use index::RelativeIndex;
pub use keyed::{KeyedCollection, UpsertKey};
pub use params::{CollectionParams, DEFAULT_MAX_DECODE_DEPTH, DecodeLimits};
pub use policy::{FailAfter, GrowthPolicy, SharedPolicy, Unbounded};
// Re-exported so downstream element codecs agree on the version.
pub use minicbor;
pub use stakecore_object::Managed;
