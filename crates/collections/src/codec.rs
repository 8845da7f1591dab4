//! CBOR encoding of collections.
//!
//! A collection is written as a definite-length array, wrapped in tag 258
//! when its encoding is [`Encoding::TaggedSet`]. Reading accepts the tagged
//! and untagged forms, with definite or indefinite length.

use std::cell::Cell;

use minicbor::{
    Decode, Decoder, Encode, Encoder,
    data::{Tag, Type},
    decode, encode,
};
use stakecore_object::Managed;
use tracing::{debug, trace};

use crate::{
    Collection, CollectionError, CollectionResult, DecodeLimits, Encoding, Flavor,
    errors::MAJOR_TYPE_MISMATCH,
    flavor::SET_TAG,
    policy::{SharedPolicy, default_policy},
};

impl<T, F: Flavor> Collection<T, F> {
    /// Writes the collection, encoding each element with `T`'s codec.
    pub fn to_cbor<C, W: encode::Write>(
        &self,
        e: &mut Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), encode::Error<W::Error>>
    where
        T: Encode<C>,
    {
        if self.encoding().is_tagged() {
            e.tag(Tag::new(SET_TAG))?;
        }

        e.array(self.len() as u64)?;
        for h in self {
            h.encode(e, ctx)?;
        }

        Ok(())
    }

    /// Encodes the collection into a fresh buffer.
    pub fn to_cbor_bytes(&self) -> CollectionResult<Vec<u8>>
    where
        T: Encode<()>,
    {
        let mut e = Encoder::new(Vec::new());
        self.to_cbor(&mut e, &mut ())
            .map_err(|err| CollectionError::Encoding(err.to_string()))?;
        Ok(e.into_writer())
    }

    /// Reads a collection using the default policy and no length limit.
    pub fn from_cbor<'b>(d: &mut Decoder<'b>) -> CollectionResult<Self>
    where
        T: Decode<'b, ()>,
    {
        Self::from_cbor_with(d, &mut (), DecodeLimits::default(), default_policy())
    }

    /// Reads a collection, requiring `bytes` to hold exactly one item.
    pub fn from_cbor_bytes<'b>(bytes: &'b [u8]) -> CollectionResult<Self>
    where
        T: Decode<'b, ()>,
    {
        let mut d = Decoder::new(bytes);
        let out = Self::from_cbor(&mut d).inspect_err(|err| {
            trace!(input = %hex::encode(bytes), %err, "rejected collection bytes");
        })?;

        if d.position() != bytes.len() {
            return Err(CollectionError::Decoding(format!(
                "{} trailing bytes after collection",
                bytes.len() - d.position()
            )));
        }

        Ok(out)
    }

    /// Reads a collection, enforcing `limits` and building it under `policy`.
    ///
    /// Collections decoded through the [`Decode`] impl while reading the
    /// elements are held to the same limits, one level deeper. If anything
    /// fails, every element decoded so far is released and no collection is
    /// returned.
    pub fn from_cbor_with<'b, C>(
        d: &mut Decoder<'b>,
        ctx: &mut C,
        limits: DecodeLimits,
        policy: SharedPolicy,
    ) -> CollectionResult<Self>
    where
        T: Decode<'b, C>,
    {
        Self::decode_inner(d, ctx, limits, policy).inspect_err(|err| {
            debug!(flavor = F::NAME, pos = d.position(), %err, "collection decode failed");
        })
    }

    fn decode_inner<'b, C>(
        d: &mut Decoder<'b>,
        ctx: &mut C,
        limits: DecodeLimits,
        policy: SharedPolicy,
    ) -> CollectionResult<Self>
    where
        T: Decode<'b, C>,
    {
        let _nesting = Nesting::enter(limits)?;

        let mut wire = Encoding::Array;
        if d.datatype()? == Type::Tag {
            let tag = d.tag()?;
            if tag.as_u64() != SET_TAG {
                return Err(mismatch());
            }
            wire = Encoding::TaggedSet;
        }

        let header = match d.datatype()? {
            Type::Array | Type::ArrayIndef => d.array()?,
            _ => return Err(mismatch()),
        };

        let mut out = Self::build(policy, wire, 0)?;
        match header {
            Some(n) => {
                if let Some(limit) = limits.exceeded_by(n) {
                    return Err(CollectionError::LimitExceeded { declared: n, limit });
                }

                for i in 0..n {
                    out.push(decode_element(d, ctx, i)?)?;
                }
            }

            None => {
                let mut i = 0;
                while d.datatype()? != Type::Break {
                    if let Some(limit) = limits.exceeded_by(i + 1) {
                        return Err(CollectionError::LimitExceeded {
                            declared: i + 1,
                            limit,
                        });
                    }

                    out.push(decode_element(d, ctx, i)?)?;
                    i += 1;
                }

                // Step over the break byte.
                d.set_position(d.position() + 1);
            }
        }

        trace!(flavor = F::NAME, len = out.len(), encoding = ?wire, "decoded collection");
        Ok(out)
    }
}

thread_local! {
    /// Limits and depth of the innermost collection decode running on this
    /// thread.
    static ACTIVE_DECODE: Cell<Option<(DecodeLimits, usize)>> = const { Cell::new(None) };
}

/// One level of collection nesting, held for the duration of a decode.
///
/// Element codecs sit between a collection and the collections inside its
/// elements, so the depth is tracked per thread rather than passed along.
struct Nesting {
    outer: Option<(DecodeLimits, usize)>,
}

impl Nesting {
    fn enter(limits: DecodeLimits) -> CollectionResult<Self> {
        let outer = ACTIVE_DECODE.get();
        let depth = outer.map_or(1, |(_, depth)| depth + 1);
        if depth > limits.max_depth {
            return Err(CollectionError::DepthExceeded {
                limit: limits.max_depth,
            });
        }

        ACTIVE_DECODE.set(Some((limits, depth)));
        Ok(Self { outer })
    }

    /// Limits a nested collection inherits, or the defaults at top level.
    fn inherited_limits() -> DecodeLimits {
        ACTIVE_DECODE
            .get()
            .map_or_else(DecodeLimits::default, |(limits, _)| limits)
    }
}

impl Drop for Nesting {
    fn drop(&mut self) {
        ACTIVE_DECODE.set(self.outer);
    }
}

fn mismatch() -> CollectionError {
    CollectionError::Decoding(MAJOR_TYPE_MISMATCH.to_owned())
}

fn decode_element<'b, C, T: Decode<'b, C>>(
    d: &mut Decoder<'b>,
    ctx: &mut C,
    i: u64,
) -> CollectionResult<Managed<T>> {
    T::decode(d, ctx)
        .map(Managed::new)
        .map_err(|err| CollectionError::Decoding(format!("element {i}: {err}")))
}

impl<C, T: Encode<C>, F: Flavor> Encode<C> for Collection<T, F> {
    fn encode<W: encode::Write>(
        &self,
        e: &mut Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), encode::Error<W::Error>> {
        self.to_cbor(e, ctx)
    }
}

impl<'b, C, T: Decode<'b, C>, F: Flavor> Decode<'b, C> for Collection<T, F> {
    fn decode(d: &mut Decoder<'b>, ctx: &mut C) -> Result<Self, decode::Error> {
        Self::from_cbor_with(d, ctx, Nesting::inherited_limits(), default_policy())
            .map_err(into_decode_error)
    }
}

pub(crate) fn into_decode_error(err: CollectionError) -> decode::Error {
    match err {
        CollectionError::Decoding(msg) => decode::Error::message(msg),
        other => decode::Error::message(other.to_string()),
    }
}
