//! Macros generating the fixed-length byte buffer types.

/// Generates the core API, formatting and CBOR byte-string codec for a
/// newtype over `[u8; $len]`.
macro_rules! impl_byte_buf {
    ($name:ident, $len:expr) => {
        impl $name {
            pub const LEN: usize = $len;

            pub const fn new(data: [u8; $len]) -> Self {
                Self(data)
            }

            pub const fn zero() -> Self {
                Self([0; $len])
            }

            pub const fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }

            pub fn is_zero(&self) -> bool {
                self.0.iter().all(|b| *b == 0)
            }
        }

        impl ::std::convert::AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl ::std::convert::From<[u8; $len]> for $name {
            fn from(data: [u8; $len]) -> Self {
                Self(data)
            }
        }

        impl ::std::convert::From<$name> for [u8; $len] {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl ::std::convert::TryFrom<&[u8]> for $name {
            type Error = $crate::LedgerTypeError;

            fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
                <[u8; $len]>::try_from(value).map(Self).map_err(|_| {
                    $crate::LedgerTypeError::InvalidLength {
                        expected: $len,
                        got: value.len(),
                    }
                })
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::LedgerTypeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let bytes = ::hex::decode(s)?;
                Self::try_from(bytes.as_slice())
            }
        }

        impl ::std::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, "{}({})", stringify!($name), ::hex::encode(self.0))
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(&::hex::encode(self.0))
            }
        }

        impl<C> ::minicbor::Encode<C> for $name {
            fn encode<W: ::minicbor::encode::Write>(
                &self,
                e: &mut ::minicbor::Encoder<W>,
                _ctx: &mut C,
            ) -> Result<(), ::minicbor::encode::Error<W::Error>> {
                e.bytes(&self.0)?;
                Ok(())
            }
        }

        impl<'b, C> ::minicbor::Decode<'b, C> for $name {
            fn decode(
                d: &mut ::minicbor::Decoder<'b>,
                _ctx: &mut C,
            ) -> Result<Self, ::minicbor::decode::Error> {
                let bytes = d.bytes()?;
                <[u8; $len]>::try_from(bytes).map(Self).map_err(|_| {
                    ::minicbor::decode::Error::message(format!(
                        "{}: expected {} bytes, got {}",
                        stringify!($name),
                        $len,
                        bytes.len()
                    ))
                })
            }
        }
    };
}

pub(crate) use impl_byte_buf;
