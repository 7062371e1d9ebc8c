use crate::validation::ValidationError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

fn decode_prefixed_hex(
    field: &'static str,
    pattern: &str,
    value: &str,
) -> Result<Vec<u8>, ValidationError> {
    if !Regex::new(pattern).expect("invalid regex").is_match(value) {
        return Err(ValidationError::PatternMismatch {
            field,
            value: value.to_string(),
        });
    }
    hex::decode(&value[2..]).map_err(|_| ValidationError::PatternMismatch {
        field,
        value: value.to_string(),
    })
}

macro_rules! fixed_hex {
    ($name:ident, $len:expr, $doc:expr, $pattern:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name([u8; $len]);

        impl $name {
            /// Length of the raw value in bytes.
            pub const LEN: usize = $len;

            /// Wraps raw bytes.
            pub const fn from_bytes(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }

            /// Returns the raw bytes.
            pub fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }

            /// Parses a `0x`-prefixed hex string (either case).
            pub fn parse(value: impl AsRef<str>) -> Result<Self, ValidationError> {
                let bytes = decode_prefixed_hex(stringify!($name), $pattern, value.as_ref())?;
                let mut out = [0u8; $len];
                out.copy_from_slice(&bytes);
                Ok(Self(out))
            }

            /// Copies the value out of a slice of exactly the right length.
            pub fn from_slice(bytes: &[u8]) -> Result<Self, ValidationError> {
                let out: [u8; $len] =
                    bytes.try_into().map_err(|_| ValidationError::WrongLength {
                        field: stringify!($name),
                        expected: $len,
                        actual: bytes.len(),
                    })?;
                Ok(Self(out))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "0x{}", hex::encode(self.0))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self)
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.to_string()
            }
        }

        impl From<[u8; $len]> for $name {
            fn from(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }
    };
}

fixed_hex!(
    Identity,
    20,
    "Participant address: the last 20 bytes of `keccak256(public_key)`, written `0x` + 40 hex digits.",
    r"^0x[0-9a-fA-F]{40}$"
);
fixed_hex!(
    MessageHash,
    32,
    "32-byte hash of a certification message, written `0x` + 64 hex digits.",
    r"^0x[0-9a-fA-F]{64}$"
);

/// Signature bytes exactly as submitted by the issuer.
///
/// The length is not checked here; recovery-shape checks live with the
/// signature verifier so the engine can report `MalformedSignature`.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SignatureBytes(Vec<u8>);

impl SignatureBytes {
    /// Wraps raw bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Parses a `0x`-prefixed, even-length hex string.
    pub fn parse(value: impl AsRef<str>) -> Result<Self, ValidationError> {
        decode_prefixed_hex("SignatureBytes", r"^0x([0-9a-fA-F]{2})*$", value.as_ref()).map(Self)
    }

    /// Returns the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Number of bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no bytes were supplied.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SignatureBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(&self.0))
    }
}

impl fmt::Debug for SignatureBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SignatureBytes({})", self)
    }
}

impl FromStr for SignatureBytes {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for SignatureBytes {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<SignatureBytes> for String {
    fn from(value: SignatureBytes) -> Self {
        value.to_string()
    }
}

impl From<Vec<u8>> for SignatureBytes {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for SignatureBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
