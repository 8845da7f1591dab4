//! Sets holding at most one element per key.

use std::{
    cmp::Ordering,
    collections::HashMap,
    fmt::{self, Debug},
    hash::Hash,
    ops::Deref,
};

use minicbor::{Decode, Decoder, Encode, Encoder, decode, encode};
use stakecore_object::Managed;
use tracing::trace;

use crate::{
    CollectionParams, CollectionResult, DecodeLimits, Encoding, RelativeIndex, Set,
    codec::into_decode_error,
    policy::SharedPolicy,
};

/// Extracts the value a keyed collection deduplicates on.
pub trait UpsertKey {
    type Key: Eq + Hash + Clone + Debug;

    fn upsert_key(&self) -> Self::Key;
}

/// Set that keeps at most one element per [`UpsertKey`].
///
/// Adding an element whose key is already present replaces the stored element
/// in its slot instead of appending. The read-only algorithms of [`Set`] are
/// reachable through `Deref`; they return plain sets.
pub struct KeyedCollection<T: UpsertKey> {
    inner: Set<T>,
    index: HashMap<T::Key, usize>,
}

impl<T: UpsertKey> KeyedCollection<T> {
    pub fn new() -> CollectionResult<Self> {
        Ok(Self::wrap_empty(Set::new()?))
    }

    pub fn with_policy(policy: SharedPolicy) -> CollectionResult<Self> {
        Ok(Self::wrap_empty(Set::with_policy(policy)?))
    }

    pub fn from_params(params: &CollectionParams) -> CollectionResult<Self> {
        Ok(Self::wrap_empty(Set::from_params(params)?))
    }

    fn wrap_empty(inner: Set<T>) -> Self {
        debug_assert!(inner.is_empty());
        Self {
            inner,
            index: HashMap::new(),
        }
    }

    /// Builds a keyed collection out of a plain set, folding its elements in
    /// order so later duplicates win. The set's policy and encoding carry over.
    pub fn from_collection(set: Set<T>) -> CollectionResult<Self> {
        let mut out = Self::wrap_empty(set.derive_empty(set.len())?);
        out.apply_all(set.iter())?;
        Ok(out)
    }

    pub fn set_encoding(&mut self, encoding: Encoding) {
        self.inner.set_encoding(encoding);
    }

    /// Inserts a new strong reference to `element`, replacing any element
    /// with the same key.
    pub fn add(&mut self, element: &Managed<T>) -> CollectionResult<()> {
        self.upsert(element.clone()).map(|_| ())
    }

    /// Inserts `element`, taking over the caller's reference.
    pub fn push(&mut self, element: Managed<T>) -> CollectionResult<()> {
        self.upsert(element).map(|_| ())
    }

    /// Wraps `value` and inserts it, returning a handle to the stored element.
    pub fn add_value(&mut self, value: T) -> CollectionResult<Managed<T>> {
        let h = Managed::new(value);
        self.upsert(h.clone())?;
        Ok(h)
    }

    /// Inserts or replaces, returning the element that was replaced.
    pub fn upsert(&mut self, element: Managed<T>) -> CollectionResult<Option<Managed<T>>> {
        let key = element.upsert_key();
        if let Some(&slot) = self.index.get(&key) {
            trace!(?key, slot, "replacing element with same key");
            return Ok(Some(self.inner.replace_at(slot, element)));
        }

        self.inner.push(element)?;
        self.index.insert(key, self.inner.len() - 1);
        Ok(None)
    }

    /// Upserts every element of `other` into `self`, in order. `other` is
    /// left as it was; its elements are shared, not moved.
    pub fn apply(&mut self, other: &Self) -> CollectionResult<()> {
        self.apply_all(other.iter())
    }

    /// Upserts each element yielded by `elements`.
    pub fn apply_all<'a>(
        &mut self,
        elements: impl IntoIterator<Item = &'a Managed<T>>,
    ) -> CollectionResult<()>
    where
        T: 'a,
    {
        for h in elements {
            self.add(h)?;
        }
        Ok(())
    }

    pub fn get_by_key(&self, key: &T::Key) -> Option<&Managed<T>> {
        self.index.get(key).map(|&i| &self.inner.as_slice()[i])
    }

    pub fn contains_key(&self, key: &T::Key) -> bool {
        self.index.contains_key(key)
    }

    /// Removes the element stored under `key`, handing back its reference.
    pub fn remove_by_key(&mut self, key: &T::Key) -> Option<Managed<T>> {
        let slot = self.index.remove(key)?;
        let removed = self.inner.remove_at(slot);
        self.reindex();
        Some(removed)
    }

    /// Removes exactly `element` if present.
    pub fn remove(&mut self, element: &Managed<T>) -> bool {
        let removed = self.inner.remove(element);
        if removed {
            self.reindex();
        }
        removed
    }

    pub fn clear(&mut self) {
        self.inner.clear();
        self.index.clear();
    }

    pub fn sort_by(&mut self, compare: impl FnMut(&T, &T) -> Ordering) {
        self.inner.sort_by(compare);
        self.reindex();
    }

    /// Moves a run of elements out, as [`Set::erase`] does.
    pub fn erase(
        &mut self,
        start: impl Into<RelativeIndex>,
        delete_count: usize,
    ) -> CollectionResult<Self> {
        let erased = self.inner.erase(start, delete_count)?;
        self.reindex();

        // Keys in a run of a keyed set are already distinct.
        let mut out = Self {
            inner: erased,
            index: HashMap::new(),
        };
        out.reindex();
        Ok(out)
    }

    /// Shallow copy keeping the key index.
    pub fn shallow_clone(&self) -> CollectionResult<Self> {
        Ok(Self {
            inner: self.inner.shallow_clone()?,
            index: self.index.clone(),
        })
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (i, h) in self.inner.iter().enumerate() {
            self.index.insert(h.upsert_key(), i);
        }
    }

    /// Reads a keyed collection, folding duplicate keys as `add` would.
    pub fn from_cbor_with<'b, C>(
        d: &mut Decoder<'b>,
        ctx: &mut C,
        limits: DecodeLimits,
        policy: SharedPolicy,
    ) -> CollectionResult<Self>
    where
        T: Decode<'b, C>,
    {
        Self::from_collection(Set::from_cbor_with(d, ctx, limits, policy)?)
    }

    pub fn from_cbor_bytes<'b>(bytes: &'b [u8]) -> CollectionResult<Self>
    where
        T: Decode<'b, ()>,
    {
        Self::from_collection(Set::from_cbor_bytes(bytes)?)
    }
}

impl<T: UpsertKey> Deref for KeyedCollection<T> {
    type Target = Set<T>;

    fn deref(&self) -> &Set<T> {
        &self.inner
    }
}

impl<T: UpsertKey + PartialEq> PartialEq for KeyedCollection<T> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<T: UpsertKey + Eq> Eq for KeyedCollection<T> {}

impl<T: UpsertKey + Debug> Debug for KeyedCollection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyedCollection")
            .field("inner", &self.inner)
            .finish()
    }
}

impl<C, T: UpsertKey + Encode<C>> Encode<C> for KeyedCollection<T> {
    fn encode<W: encode::Write>(
        &self,
        e: &mut Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), encode::Error<W::Error>> {
        self.inner.to_cbor(e, ctx)
    }
}

impl<'b, C, T: UpsertKey + Decode<'b, C>> Decode<'b, C> for KeyedCollection<T> {
    fn decode(d: &mut Decoder<'b>, ctx: &mut C) -> Result<Self, decode::Error> {
        Self::from_collection(Set::decode(d, ctx)?).map_err(into_decode_error)
    }
}
