/// Position that may count from either end of a collection.
///
/// Signed conversions map non-negative values to [`FromStart`](Self::FromStart)
/// and negative values to [`FromEnd`](Self::FromEnd), so `-1` names the last
/// element. `FromEnd(0)` is the end position itself, one past the last
/// element.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum RelativeIndex {
    FromStart(usize),
    FromEnd(usize),
}

impl RelativeIndex {
    pub const fn new(v: isize) -> Self {
        if v >= 0 {
            Self::FromStart(v as usize)
        } else {
            Self::FromEnd(v.unsigned_abs())
        }
    }

    /// Index `i` counted from the front.
    pub const fn from_start(i: usize) -> Self {
        Self::FromStart(i)
    }

    /// Index counted back from the end, so `from_end(1)` is the last element
    /// and `from_end(0)` is the end position.
    pub const fn from_end(i: usize) -> Self {
        Self::FromEnd(i)
    }

    /// Distance from the anchoring end.
    pub const fn offset(self) -> usize {
        match self {
            Self::FromStart(i) | Self::FromEnd(i) => i,
        }
    }

    /// Resolves against a collection of length `len`, giving an absolute
    /// position in `0..=len`, or `None` if it falls outside.
    pub fn resolve(self, len: usize) -> Option<usize> {
        match self {
            Self::FromStart(i) => (i <= len).then_some(i),
            Self::FromEnd(i) => len.checked_sub(i),
        }
    }
}

impl From<isize> for RelativeIndex {
    fn from(value: isize) -> Self {
        Self::new(value)
    }
}

impl From<i32> for RelativeIndex {
    fn from(value: i32) -> Self {
        Self::new(value as isize)
    }
}

impl From<usize> for RelativeIndex {
    fn from(value: usize) -> Self {
        Self::from_start(value)
    }
}
