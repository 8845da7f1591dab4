//! Collection operations over possibly-missing handles.
//!
//! These mirror the typed API for callers that hold optional references, for
//! instance bindings that forward nullable pointers. Where an operation
//! reports errors a missing argument is [`CollectionError::NullArgument`];
//! otherwise it behaves as a no-op, returns 0, or returns `None`.

use std::cmp::Ordering;

use stakecore_object::Managed;

use crate::{Collection, CollectionError, CollectionResult, Flavor, RelativeIndex};

/// Length of the collection, 0 if missing.
pub fn length<T, F: Flavor>(c: Option<&Collection<T, F>>) -> usize {
    c.map_or(0, Collection::len)
}

pub fn get<T, F: Flavor>(
    c: Option<&Collection<T, F>>,
    index: usize,
) -> CollectionResult<Managed<T>> {
    c.ok_or(CollectionError::NullArgument)?.get(index)
}

pub fn add<T, F: Flavor>(
    c: Option<&mut Collection<T, F>>,
    element: Option<&Managed<T>>,
) -> CollectionResult<()> {
    let (Some(c), Some(element)) = (c, element) else {
        return Err(CollectionError::NullArgument);
    };
    c.add(element)
}

/// Removes `element` by identity. Not finding it is not an error.
pub fn remove<T, F: Flavor>(
    c: Option<&mut Collection<T, F>>,
    element: Option<&Managed<T>>,
) -> CollectionResult<bool> {
    let (Some(c), Some(element)) = (c, element) else {
        return Err(CollectionError::NullArgument);
    };
    Ok(c.remove(element))
}

pub fn clear<T, F: Flavor>(c: Option<&mut Collection<T, F>>) {
    if let Some(c) = c {
        c.clear();
    }
}

pub fn sort<T, F: Flavor>(
    c: Option<&mut Collection<T, F>>,
    compare: Option<impl FnMut(&T, &T) -> Ordering>,
) {
    if let (Some(c), Some(compare)) = (c, compare) {
        c.sort_by(compare);
    }
}

pub fn find<'a, T, F: Flavor>(
    c: Option<&'a Collection<T, F>>,
    predicate: Option<impl FnMut(&T) -> bool>,
) -> Option<&'a Managed<T>> {
    c?.find(predicate?)
}

pub fn filter<T, F: Flavor>(
    c: Option<&Collection<T, F>>,
    predicate: Option<impl FnMut(&T) -> bool>,
) -> CollectionResult<Collection<T, F>> {
    let (Some(c), Some(predicate)) = (c, predicate) else {
        return Err(CollectionError::NullArgument);
    };
    c.filter(predicate)
}

pub fn concat<T, F: Flavor>(
    lhs: Option<&Collection<T, F>>,
    rhs: Option<&Collection<T, F>>,
) -> CollectionResult<Collection<T, F>> {
    let (Some(lhs), Some(rhs)) = (lhs, rhs) else {
        return Err(CollectionError::NullArgument);
    };
    Collection::concat(lhs, rhs)
}

pub fn slice<T, F: Flavor>(
    c: Option<&Collection<T, F>>,
    start: usize,
    end: usize,
) -> CollectionResult<Collection<T, F>> {
    c.ok_or(CollectionError::NullArgument)?.slice(start, end)
}

pub fn erase<T, F: Flavor>(
    c: Option<&mut Collection<T, F>>,
    start: impl Into<RelativeIndex>,
    delete_count: usize,
) -> CollectionResult<Collection<T, F>> {
    c.ok_or(CollectionError::NullArgument)?
        .erase(start, delete_count)
}

pub fn clone<T, F: Flavor>(c: Option<&Collection<T, F>>) -> CollectionResult<Collection<T, F>> {
    c.ok_or(CollectionError::NullArgument)?.shallow_clone()
}
