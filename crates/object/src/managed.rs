//! Shared, reference-counted handle type.

use std::{fmt, ops::Deref, rc::Rc};

use minicbor::{Decode, Decoder, Encode, Encoder, decode, encode};

use crate::LastError;

/// Reference-counted handle to a ledger object.
///
/// Cloning a handle takes a new strong reference to the same object; dropping
/// one releases it. The object is destroyed, releasing whatever it owns in
/// turn, when its last handle goes away. Counts are not atomic, so handles
/// stay on the thread that created them.
pub struct Managed<T> {
    inner: Rc<ManagedInner<T>>,
}

struct ManagedInner<T> {
    value: T,
    last_error: LastError,
}

impl<T> Managed<T> {
    /// Wraps a value in a fresh handle with a reference count of one.
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(ManagedInner {
                value,
                last_error: LastError::new(),
            }),
        }
    }

    /// Number of strong references currently keeping the object alive.
    pub fn refcount(&self) -> usize {
        Rc::strong_count(&self.inner)
    }

    /// Returns if both handles point at the same object.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.inner, &b.inner)
    }

    /// Returns the inner value if this is the only handle, otherwise gives the
    /// handle back.
    pub fn try_unwrap(self) -> Result<T, Self> {
        Rc::try_unwrap(self.inner)
            .map(|inner| inner.value)
            .map_err(|inner| Self { inner })
    }

    /// Records a diagnostic message against this object.
    pub fn set_last_error(&self, msg: Option<&str>) {
        self.inner.last_error.set(msg);
    }

    /// Most recent diagnostic recorded against this object.
    pub fn last_error(&self) -> String {
        self.inner.last_error.get()
    }
}

impl<T: Clone> Managed<T> {
    /// Returns an owned copy of the value, moving it out when this handle is
    /// the only one.
    pub fn into_owned(self) -> T {
        match Rc::try_unwrap(self.inner) {
            Ok(inner) => inner.value,
            Err(shared) => shared.value.clone(),
        }
    }
}

impl<T> Clone for Managed<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> Deref for Managed<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.inner.value
    }
}

impl<T> From<T> for Managed<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

// Equality is over the wrapped values; use `ptr_eq` for identity.
impl<T: PartialEq> PartialEq for Managed<T> {
    fn eq(&self, other: &Self) -> bool {
        self.inner.value == other.inner.value
    }
}

impl<T: Eq> Eq for Managed<T> {}

impl<T: fmt::Debug> fmt::Debug for Managed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Managed")
            .field("refcount", &self.refcount())
            .field("value", &self.inner.value)
            .finish()
    }
}

impl<C, T: Encode<C>> Encode<C> for Managed<T> {
    fn encode<W: encode::Write>(
        &self,
        e: &mut Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), encode::Error<W::Error>> {
        self.inner.value.encode(e, ctx)
    }
}

impl<'b, C, T: Decode<'b, C>> Decode<'b, C> for Managed<T> {
    fn decode(d: &mut Decoder<'b>, ctx: &mut C) -> Result<Self, decode::Error> {
        T::decode(d, ctx).map(Self::new)
    }
}
