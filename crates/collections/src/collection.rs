//! Generic ordered collection of shared handles.

use std::{cmp::Ordering, fmt, marker::PhantomData, mem, slice};

use stakecore_object::{LastError, Managed};
use tracing::{trace, warn};

use crate::{
    CollectionError, CollectionParams, CollectionResult, Encoding, Flavor, ListFlavor,
    RelativeIndex, SetFlavor,
    policy::{SharedPolicy, default_policy},
};

/// Ordered collection of strong references to ledger objects.
///
/// Every slot keeps its element alive; dropping the collection releases each
/// slot exactly once. The same element may sit in several collections, or
/// several times in one. Operations that build a new collection out of an
/// existing one (`filter`, `concat`, `slice`, `shallow_clone`) take fresh
/// references, whereas [`erase`](Self::erase) moves the detached references
/// into its result.
pub struct Collection<T, F: Flavor = ListFlavor> {
    elements: Vec<Managed<T>>,
    encoding: Encoding,
    policy: SharedPolicy,
    last_error: LastError,
    _flavor: PhantomData<F>,
}

/// Plain list, always encoded as an untagged array.
pub type List<T> = Collection<T, ListFlavor>;

/// Set, encoded with the tag 258 wrapper unless switched to a plain array.
pub type Set<T> = Collection<T, SetFlavor>;

impl<T, F: Flavor> Collection<T, F> {
    /// Creates an empty collection using the default growth policy.
    pub fn new() -> CollectionResult<Self> {
        Self::with_policy(default_policy())
    }

    /// Creates an empty collection whose growth is governed by `policy`.
    pub fn with_policy(policy: SharedPolicy) -> CollectionResult<Self> {
        Self::build(policy, F::DEFAULT_ENCODING, 0)
    }

    /// Creates an empty collection configured from `params`.
    pub fn from_params(params: &CollectionParams) -> CollectionResult<Self> {
        Self::from_params_with_policy(params, default_policy())
    }

    pub fn from_params_with_policy(
        params: &CollectionParams,
        policy: SharedPolicy,
    ) -> CollectionResult<Self> {
        Self::build(
            policy,
            F::select(params.set_encoding),
            params.initial_capacity,
        )
    }

    /// Builds a collection holding the given handles, moving them in.
    pub fn from_handles(handles: impl IntoIterator<Item = Managed<T>>) -> CollectionResult<Self> {
        let mut out = Self::new()?;
        for h in handles {
            out.push(h)?;
        }
        Ok(out)
    }

    pub(crate) fn build(
        policy: SharedPolicy,
        encoding: Encoding,
        capacity: usize,
    ) -> CollectionResult<Self> {
        if !policy.permit(0, capacity) {
            warn!(flavor = F::NAME, capacity, "storage refused by growth policy");
            return Err(CollectionError::AllocationFailed);
        }

        let mut elements = Vec::new();
        elements
            .try_reserve_exact(capacity)
            .map_err(|_| CollectionError::AllocationFailed)?;

        Ok(Self {
            elements,
            encoding: F::select(encoding),
            policy,
            last_error: LastError::new(),
            _flavor: PhantomData,
        })
    }

    /// Empty collection sharing this one's policy and encoding.
    pub(crate) fn derive_empty(&self, capacity: usize) -> CollectionResult<Self> {
        Self::build(self.policy.clone(), self.encoding, capacity).inspect_err(|e| self.record(e))
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Wire encoding this collection is written with.
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Most recent failure recorded against this collection.
    pub fn last_error(&self) -> String {
        self.last_error.get()
    }

    pub fn set_last_error(&self, msg: Option<&str>) {
        self.last_error.set(msg);
    }

    fn record(&self, err: &CollectionError) {
        self.last_error.set(Some(&err.to_string()));
    }

    fn fail<R>(&self, err: CollectionError) -> CollectionResult<R> {
        self.record(&err);
        Err(err)
    }

    fn reserve(&mut self, additional: usize) -> CollectionResult<()> {
        let len = self.elements.len();
        if !self.policy.permit(len, additional) {
            warn!(flavor = F::NAME, len, additional, "growth refused by policy");
            return self.fail(CollectionError::AllocationFailed);
        }

        if self.elements.try_reserve(additional).is_err() {
            return self.fail(CollectionError::AllocationFailed);
        }

        Ok(())
    }

    /// Returns a new strong reference to the element at `index`.
    pub fn get(&self, index: usize) -> CollectionResult<Managed<T>> {
        match self.elements.get(index) {
            Some(h) => Ok(h.clone()),
            None => self.fail(CollectionError::OutOfBounds {
                index,
                len: self.len(),
            }),
        }
    }

    pub fn as_slice(&self) -> &[Managed<T>] {
        &self.elements
    }

    pub fn iter(&self) -> slice::Iter<'_, Managed<T>> {
        self.elements.iter()
    }

    /// Appends a new strong reference to `element`. The caller keeps its own.
    pub fn add(&mut self, element: &Managed<T>) -> CollectionResult<()> {
        self.push(element.clone())
    }

    /// Appends `element`, taking over the caller's reference.
    pub fn push(&mut self, element: Managed<T>) -> CollectionResult<()> {
        self.reserve(1)?;
        self.elements.push(element);
        Ok(())
    }

    /// Wraps `value` in a fresh handle and appends it, returning a handle to
    /// the stored element.
    pub fn add_value(&mut self, value: T) -> CollectionResult<Managed<T>> {
        let h = Managed::new(value);
        self.push(h.clone())?;
        Ok(h)
    }

    /// Position of the first slot holding exactly `element`.
    pub fn position(&self, element: &Managed<T>) -> Option<usize> {
        self.elements.iter().position(|h| Managed::ptr_eq(h, element))
    }

    pub fn contains(&self, element: &Managed<T>) -> bool {
        self.position(element).is_some()
    }

    /// Removes the first slot holding exactly `element` and releases it.
    ///
    /// Returns `false` if the element is not present.
    pub fn remove(&mut self, element: &Managed<T>) -> bool {
        match self.position(element) {
            Some(i) => {
                self.elements.remove(i);
                true
            }
            None => false,
        }
    }

    pub(crate) fn remove_at(&mut self, index: usize) -> Managed<T> {
        self.elements.remove(index)
    }

    /// Stores `element` at `index`, handing back the reference it replaces.
    pub(crate) fn replace_at(&mut self, index: usize, element: Managed<T>) -> Managed<T> {
        mem::replace(&mut self.elements[index], element)
    }

    /// Releases every element.
    pub fn clear(&mut self) {
        self.elements.clear();
    }

    /// Reorders the elements in place. Equal elements may end up in any order.
    pub fn sort_by(&mut self, mut compare: impl FnMut(&T, &T) -> Ordering) {
        self.elements.sort_unstable_by(|a, b| compare(a, b));
    }

    /// Returns the first element matching `predicate`, borrowed from the
    /// collection.
    pub fn find(&self, mut predicate: impl FnMut(&T) -> bool) -> Option<&Managed<T>> {
        self.elements.iter().find(|h| predicate(h))
    }

    /// New collection with a fresh reference to every element matching
    /// `predicate`, in order.
    pub fn filter(&self, mut predicate: impl FnMut(&T) -> bool) -> CollectionResult<Self> {
        let mut out = self.derive_empty(0)?;
        for h in self.elements.iter().filter(|h| predicate(h)) {
            out.add(h)?;
        }
        Ok(out)
    }

    /// New collection holding the elements of `lhs` followed by those of
    /// `rhs`. Both inputs may be the same collection.
    pub fn concat(lhs: &Self, rhs: &Self) -> CollectionResult<Self> {
        let mut out = lhs.derive_empty(lhs.len() + rhs.len())?;
        out.elements
            .extend(lhs.elements.iter().chain(rhs.elements.iter()).cloned());
        Ok(out)
    }

    /// New collection over `start..end`. The range must lie within the
    /// collection; it is never clamped.
    pub fn slice(&self, start: usize, end: usize) -> CollectionResult<Self> {
        let len = self.len();
        if start > end || end > len {
            return self.fail(CollectionError::InvalidRange { start, end, len });
        }

        let mut out = self.derive_empty(end - start)?;
        out.elements.extend(self.elements[start..end].iter().cloned());
        Ok(out)
    }

    /// Removes up to `delete_count` elements beginning at `start` and returns
    /// them, in order, as a new collection.
    ///
    /// A negative `start` counts from the end. `delete_count` is clamped to
    /// what remains after `start`. The removed references move into the
    /// result rather than being duplicated. On error `self` is untouched.
    pub fn erase(
        &mut self,
        start: impl Into<RelativeIndex>,
        delete_count: usize,
    ) -> CollectionResult<Self> {
        let len = self.len();
        let rel = start.into();
        let Some(start) = rel.resolve(len) else {
            return self.fail(CollectionError::OutOfBounds {
                index: rel.offset(),
                len,
            });
        };

        let count = delete_count.min(len - start);
        let mut out = self.derive_empty(count)?;
        out.elements.extend(self.elements.drain(start..start + count));

        trace!(flavor = F::NAME, start, count, remaining = self.len(), "erased elements");
        Ok(out)
    }

    /// Shallow copy: a new collection sharing every element.
    pub fn shallow_clone(&self) -> CollectionResult<Self> {
        let mut out = self.derive_empty(self.len())?;
        out.elements.extend(self.elements.iter().cloned());
        Ok(out)
    }
}

impl<T: Ord, F: Flavor> Collection<T, F> {
    /// Sorts by the elements' natural order.
    pub fn sort(&mut self) {
        self.sort_by(T::cmp);
    }
}

impl<T> Collection<T, SetFlavor> {
    /// Chooses between the tagged and the plain array wire form.
    pub fn set_encoding(&mut self, encoding: Encoding) {
        self.encoding = encoding;
    }
}

impl<'a, T, F: Flavor> IntoIterator for &'a Collection<T, F> {
    type Item = &'a Managed<T>;
    type IntoIter = slice::Iter<'a, Managed<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

// Equal when the elements are equal in order; the wire encoding is not
// compared.
impl<T: PartialEq, F: Flavor> PartialEq for Collection<T, F> {
    fn eq(&self, other: &Self) -> bool {
        self.elements == other.elements
    }
}

impl<T: Eq, F: Flavor> Eq for Collection<T, F> {}

impl<T: fmt::Debug, F: Flavor> fmt::Debug for Collection<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("flavor", &F::NAME)
            .field("encoding", &self.encoding)
            .field("elements", &self.elements)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use proptest::prelude::*;
    use stakecore_test_utils::init_test_tracing;

    use super::*;
    use crate::FailAfter;

    fn list_of(values: &[u32]) -> List<u32> {
        List::from_handles(values.iter().copied().map(Managed::new)).expect("build list")
    }

    fn values<F: Flavor>(c: &Collection<u32, F>) -> Vec<u32> {
        c.iter().map(|h| **h).collect()
    }

    #[test]
    fn test_new_is_empty() {
        let list: List<u32> = List::new().unwrap();
        assert_eq!(list.len(), 0);
        assert!(list.is_empty());
        assert_eq!(list.encoding(), Encoding::Array);

        let set: Set<u32> = Set::new().unwrap();
        assert_eq!(set.encoding(), Encoding::TaggedSet);
    }

    #[test]
    fn test_add_takes_own_reference() {
        let mut list = List::new().unwrap();
        let e = Managed::new(42u32);
        list.add(&e).unwrap();
        assert_eq!(e.refcount(), 2);

        // The caller releasing its reference leaves the element alive.
        let kept = list.get(0).unwrap();
        drop(e);
        assert_eq!(*kept, 42);
        assert_eq!(kept.refcount(), 2);
    }

    #[test]
    fn test_drop_releases_each_slot_once() {
        let e = Managed::new(1u32);
        let mut list = List::new().unwrap();
        list.add(&e).unwrap();
        list.add(&e).unwrap();
        list.add(&e).unwrap();
        assert_eq!(e.refcount(), 4);

        drop(list);
        assert_eq!(e.refcount(), 1);
    }

    #[test]
    fn test_plain_add_allows_duplicates() {
        let mut set = Set::new().unwrap();
        set.add_value(7u32).unwrap();
        set.add_value(7u32).unwrap();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_get_out_of_bounds() {
        let empty: List<u32> = List::new().unwrap();
        assert_eq!(
            empty.get(0).unwrap_err(),
            CollectionError::OutOfBounds { index: 0, len: 0 }
        );

        let list = list_of(&[1, 2, 3]);
        assert_eq!(
            list.get(list.len()).unwrap_err(),
            CollectionError::OutOfBounds { index: 3, len: 3 }
        );
        assert_eq!(
            list.last_error(),
            "index 3 out of bounds for collection of length 3"
        );
    }

    #[test]
    fn test_get_returns_new_reference() {
        let list = list_of(&[5]);
        let h = list.get(0).unwrap();
        assert_eq!(h.refcount(), 2);
        drop(h);
        assert_eq!(list.as_slice()[0].refcount(), 1);
    }

    #[test]
    fn test_remove_by_identity() {
        let a = Managed::new(1u32);
        let b = Managed::new(1u32);
        let mut list = List::new().unwrap();
        list.add(&a).unwrap();
        list.add(&b).unwrap();
        list.add(&a).unwrap();

        assert!(list.remove(&a));
        assert_eq!(list.len(), 2);
        assert!(Managed::ptr_eq(&list.as_slice()[0], &b));
        assert!(Managed::ptr_eq(&list.as_slice()[1], &a));
        assert_eq!(a.refcount(), 2);

        let stranger = Managed::new(1u32);
        assert!(!list.remove(&stranger));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_clear_releases_all() {
        let e = Managed::new(3u32);
        let mut list = List::new().unwrap();
        list.add(&e).unwrap();
        list.add(&e).unwrap();
        list.clear();
        assert!(list.is_empty());
        assert_eq!(e.refcount(), 1);
    }

    #[test]
    fn test_sort_by() {
        let mut list = list_of(&[5, 3, 9, 1]);
        list.sort_by(|a, b| a.cmp(b));
        assert_eq!(values(&list), vec![1, 3, 5, 9]);

        list.sort_by(|a, b| b.cmp(a));
        assert_eq!(values(&list), vec![9, 5, 3, 1]);
    }

    #[test]
    fn test_find_borrows() {
        let list = list_of(&[4, 8, 15, 16]);
        let found = list.find(|v| *v > 10).expect("found");
        assert_eq!(**found, 15);
        assert_eq!(found.refcount(), 1);

        assert!(list.find(|v| *v > 100).is_none());
    }

    #[test]
    fn test_filter_takes_new_references() {
        let list = list_of(&[1, 2, 3, 4, 5, 6]);
        let evens = list.filter(|v| v % 2 == 0).unwrap();
        assert_eq!(values(&evens), vec![2, 4, 6]);
        assert_eq!(evens.as_slice()[0].refcount(), 2);

        let none = list.filter(|_| false).unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_concat_self() {
        let list = list_of(&[1, 2]);
        let doubled = List::concat(&list, &list).unwrap();
        assert_eq!(values(&doubled), vec![1, 2, 1, 2]);
        assert_eq!(list.as_slice()[0].refcount(), 3);
    }

    #[test]
    fn test_concat_shares_elements() {
        let a = list_of(&[1]);
        let b = list_of(&[2]);
        let c = List::concat(&a, &b).unwrap();
        assert!(Managed::ptr_eq(&c.as_slice()[0], &a.as_slice()[0]));
        assert!(Managed::ptr_eq(&c.as_slice()[1], &b.as_slice()[0]));
        assert_eq!(b.as_slice()[0].refcount(), 2);
    }

    #[test]
    fn test_slice() {
        let list = list_of(&[10, 20, 30, 40]);
        let mid = list.slice(1, 3).unwrap();
        assert_eq!(values(&mid), vec![20, 30]);
        assert_eq!(list.as_slice()[1].refcount(), 2);

        assert!(list.slice(2, 2).unwrap().is_empty());
        assert_eq!(values(&list.slice(0, 4).unwrap()), vec![10, 20, 30, 40]);
    }

    #[test]
    fn test_slice_invalid_range() {
        let list = list_of(&[10, 20, 30]);
        assert_eq!(
            list.slice(2, 1).unwrap_err(),
            CollectionError::InvalidRange {
                start: 2,
                end: 1,
                len: 3
            }
        );
        assert!(list.slice(0, 4).is_err());
    }

    #[test]
    fn test_erase_moves_references() {
        let mut list = list_of(&[1, 2, 3, 4, 5]);
        let erased = list.erase(1, 2).unwrap();
        assert_eq!(values(&erased), vec![2, 3]);
        assert_eq!(values(&list), vec![1, 4, 5]);
        assert_eq!(erased.as_slice()[0].refcount(), 1);
    }

    #[test]
    fn test_erase_negative_start() {
        let mut list = list_of(&[1, 2, 3, 4, 5]);
        let erased = list.erase(-2, 10).unwrap();
        assert_eq!(values(&erased), vec![4, 5]);
        assert_eq!(values(&list), vec![1, 2, 3]);
    }

    #[test]
    fn test_erase_bounds() {
        let mut list = list_of(&[1, 2, 3]);
        assert!(list.erase(3, 1).unwrap().is_empty());
        assert_eq!(
            list.erase(4, 1).unwrap_err(),
            CollectionError::OutOfBounds { index: 4, len: 3 }
        );
        assert!(list.erase(-4, 1).is_err());
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_erase_start_past_signed_range() {
        let mut list = list_of(&[1, 2, 3]);
        assert_eq!(
            list.erase(usize::MAX, 1).unwrap_err(),
            CollectionError::OutOfBounds {
                index: usize::MAX,
                len: 3
            }
        );
        assert!(list.erase(isize::MAX as usize + 1, 1).is_err());
        assert_eq!(values(&list), vec![1, 2, 3]);
    }

    #[test]
    fn test_shallow_clone_shares() {
        let list = list_of(&[1, 2]);
        let copy = list.shallow_clone().unwrap();
        assert_eq!(copy, list);
        assert!(Managed::ptr_eq(&copy.as_slice()[0], &list.as_slice()[0]));
        assert_eq!(list.as_slice()[1].refcount(), 2);
    }

    #[test]
    fn test_derived_keep_set_encoding() {
        let mut set: Set<u32> = Set::new().unwrap();
        set.set_encoding(Encoding::Array);
        set.add_value(1).unwrap();
        assert_eq!(set.shallow_clone().unwrap().encoding(), Encoding::Array);
        assert_eq!(set.filter(|_| true).unwrap().encoding(), Encoding::Array);
    }

    #[test]
    fn test_from_params() {
        let params = CollectionParams {
            set_encoding: Encoding::Array,
            initial_capacity: 8,
            max_decode_len: None,
            max_decode_depth: 4,
        };
        let set: Set<u32> = Set::from_params(&params).unwrap();
        assert_eq!(set.encoding(), Encoding::Array);

        let params = CollectionParams::default();
        let list: List<u32> = List::from_params(&params).unwrap();
        assert_eq!(list.encoding(), Encoding::Array);
    }

    #[test]
    fn test_new_fails_when_policy_refuses() {
        let res = List::<u32>::with_policy(Rc::new(FailAfter::new(0)));
        assert_eq!(res.unwrap_err(), CollectionError::AllocationFailed);
    }

    #[test]
    fn test_add_fails_when_policy_refuses() {
        init_test_tracing();
        let policy = Rc::new(FailAfter::new(2));
        let mut list = List::with_policy(policy.clone()).unwrap();
        list.add_value(1u32).unwrap();

        let e = Managed::new(2u32);
        assert_eq!(list.add(&e).unwrap_err(), CollectionError::AllocationFailed);
        assert_eq!(list.len(), 1);
        assert_eq!(e.refcount(), 1);
        assert_eq!(list.last_error(), "memory allocation failed");

        policy.reset(1);
        list.add(&e).unwrap();
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_erase_failure_leaves_source_untouched() {
        let policy = Rc::new(FailAfter::new(4));
        let mut list = List::with_policy(policy).unwrap();
        for v in 0..3u32 {
            list.add_value(v).unwrap();
        }

        assert_eq!(
            list.erase(0, 2).unwrap_err(),
            CollectionError::AllocationFailed
        );
        assert_eq!(values(&list), vec![0, 1, 2]);
    }

    proptest! {
        #[test]
        fn proptest_concat_length(a in prop::collection::vec(any::<u32>(), 0..20),
                                  b in prop::collection::vec(any::<u32>(), 0..20)) {
            let la = list_of(&a);
            let lb = list_of(&b);
            prop_assert_eq!(List::concat(&la, &lb).unwrap().len(), a.len() + b.len());
            prop_assert_eq!(List::concat(&la, &la).unwrap().len(), 2 * a.len());
        }

        #[test]
        fn proptest_erase_partition(v in prop::collection::vec(any::<u32>(), 0..20),
                                    start in -25isize..25,
                                    count in 0usize..25) {
            let mut list = list_of(&v);
            let before: Vec<Managed<u32>> = list.iter().cloned().collect();

            if let Ok(erased) = list.erase(start, count) {
                prop_assert_eq!(erased.len() + list.len(), before.len());

                // Every original handle appears exactly once across the two.
                for h in &before {
                    let n = erased.iter().chain(list.iter())
                        .filter(|x| Managed::ptr_eq(x, h))
                        .count();
                    prop_assert_eq!(n, 1);
                }
            } else {
                prop_assert_eq!(list.len(), before.len());
            }
        }

        #[test]
        fn proptest_sort_orders_adjacent(v in prop::collection::vec(any::<u32>(), 0..40)) {
            let mut list = list_of(&v);
            list.sort_by(|a, b| a.cmp(b));
            let sorted = values(&list);
            for w in sorted.windows(2) {
                prop_assert!(w[0] <= w[1]);
            }
            prop_assert_eq!(sorted.len(), v.len());
        }

        #[test]
        fn proptest_slice_matches_vec(v in prop::collection::vec(any::<u32>(), 0..20),
                                      start in 0usize..25,
                                      end in 0usize..25) {
            let list = list_of(&v);
            match list.slice(start, end) {
                Ok(s) => prop_assert_eq!(values(&s), v[start..end].to_vec()),
                Err(_) => prop_assert!(start > end || end > v.len()),
            }
        }
    }
}
