//! Canonical on-chain identifiers.
//!
//! Account addresses and object ids share one wire format: 32 bytes rendered
//! as `0x` followed by 64 lowercase hex digits. Wallets, RPC nodes and
//! persisted records do not agree on that rendering (leading zeros are often
//! dropped, casing varies), so identifiers are always compared as parsed
//! bytes and never as raw strings.

use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Number of bytes in an [`Address`] or [`ObjectId`].
pub const IDENTIFIER_LENGTH: usize = 32;

/// Errors produced when parsing an [`Address`] or [`ObjectId`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    /// The input contained no hex digits.
    #[error("Identifier is empty")]
    Empty,

    /// The input had more hex digits than fit in the identifier.
    #[error("Identifier has {digits} hex digits, at most {max} are allowed")]
    TooLong {
        /// Number of hex digits found.
        digits: usize,
        /// Maximum number of hex digits.
        max: usize,
    },

    /// The input contained something other than hex digits.
    #[error("Identifier '{0}' is not valid hex")]
    InvalidHex(String),
}

fn parse(input: &str) -> Result<[u8; IDENTIFIER_LENGTH], IdentifierError> {
    let trimmed = input.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if digits.is_empty() {
        return Err(IdentifierError::Empty);
    }

    if digits.len() > IDENTIFIER_LENGTH * 2 {
        return Err(IdentifierError::TooLong {
            digits: digits.len(),
            max: IDENTIFIER_LENGTH * 2,
        });
    }

    let padded = format!("{digits:0>width$}", width = IDENTIFIER_LENGTH * 2);
    let mut bytes = [0u8; IDENTIFIER_LENGTH];
    hex::decode_to_slice(&padded, &mut bytes)
        .map_err(|_| IdentifierError::InvalidHex(input.to_owned()))?;

    Ok(bytes)
}

const fn hex_value(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        b'A'..=b'F' => digit - b'A' + 10,
        _ => panic!("identifier literal contains a non-hex digit"),
    }
}

const fn parse_literal(literal: &str) -> [u8; IDENTIFIER_LENGTH] {
    let digits = literal.as_bytes();
    let prefixed =
        digits.len() >= 2 && digits[0] == b'0' && (digits[1] == b'x' || digits[1] == b'X');
    let start = if prefixed { 2 } else { 0 };

    let count = digits.len() - start;
    if count == 0 || count > IDENTIFIER_LENGTH * 2 {
        panic!("identifier literal has an invalid length");
    }

    // Fill from the least significant nibble so short literals are left-padded.
    let mut bytes = [0u8; IDENTIFIER_LENGTH];
    let mut nibble = 0;
    let mut index = digits.len();
    while index > start {
        index -= 1;
        let value = hex_value(digits[index]);
        let position = IDENTIFIER_LENGTH - 1 - nibble / 2;
        if nibble % 2 == 0 {
            bytes[position] |= value;
        } else {
            bytes[position] |= value << 4;
        }
        nibble += 1;
    }

    bytes
}

macro_rules! identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name([u8; IDENTIFIER_LENGTH]);

        impl $name {
            /// Wraps raw identifier bytes.
            pub const fn from_bytes(bytes: [u8; IDENTIFIER_LENGTH]) -> Self {
                Self(bytes)
            }

            /// Parses a hex literal in `const` context.
            ///
            /// # Panics
            ///
            /// Panics (at compile time when used in a `const`) if the literal
            /// is empty, too long or not hex.
            pub const fn from_literal(literal: &str) -> Self {
                Self(parse_literal(literal))
            }

            /// The raw identifier bytes.
            pub fn as_bytes(&self) -> &[u8; IDENTIFIER_LENGTH] {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = IdentifierError;

            fn from_str(input: &str) -> Result<Self, Self::Err> {
                parse(input).map(Self)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = IdentifierError;

            fn try_from(input: &str) -> Result<Self, Self::Error> {
                input.parse()
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "0x{}", hex::encode(self.0))
            }
        }

        impl Debug for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({self})", stringify!($name))
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

identifier! {
    /// An account address: the identity a session acts as, and the owner
    /// of credential objects.
    Address
}

identifier! {
    /// The id of an on-chain object (a credential, a registry, a table).
    ObjectId
}
