//! Fixed-size digest types and the BLAKE2b-256 content hash.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use crate::error::DecodeError;

/// A fixed-size hash digest of `N` bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Hash<const N: usize>([u8; N]);

/// 28-byte digest (key hashes, script hashes, policy ids).
pub type Blake2b224 = Hash<28>;
/// 32-byte digest (transaction ids, block hashes, body hashes).
pub type Blake2b256 = Hash<32>;

impl<const N: usize> Hash<N> {
    pub const fn new(bytes: [u8; N]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; N] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl<const N: usize> Deref for Hash<N> {
    type Target = [u8; N];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<const N: usize> From<[u8; N]> for Hash<N> {
    fn from(bytes: [u8; N]) -> Self {
        Self(bytes)
    }
}

impl<const N: usize> TryFrom<&[u8]> for Hash<N> {
    type Error = DecodeError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let arr: [u8; N] = bytes.try_into().map_err(|_| DecodeError::HashLength {
            expected: N,
            actual: bytes.len(),
        })?;
        Ok(Self(arr))
    }
}

impl<const N: usize> fmt::Display for Hash<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl<const N: usize> fmt::Debug for Hash<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash<{N}>({})", self.to_hex())
    }
}

impl<const N: usize> FromStr for Hash<N> {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|e| DecodeError::UnexpectedType {
            expected: format!("{N}-byte hex digest"),
            found: e.to_string(),
        })?;
        Self::try_from(bytes.as_slice())
    }
}

impl<const N: usize> Serialize for Hash<N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de, const N: usize> Deserialize<'de> for Hash<N> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Unkeyed BLAKE2b-256 over the concatenation of `parts`.
pub fn blake2b_256(parts: &[&[u8]]) -> Blake2b256 {
    let mut hasher = Blake2b::<U32>::new();
    for part in parts {
        hasher.update(part);
    }
    let mut out = [0u8; 32];
    out.copy_from_slice(&hasher.finalize());
    Hash(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_digest() {
        assert_eq!(
            blake2b_256(&[]).to_hex(),
            "0e5751c026e543b2e8ab2eb06099daa1d1e5df47778f7787faab45cdf12fe3a8"
        );
    }

    #[test]
    fn parts_are_concatenated() {
        assert_eq!(blake2b_256(&[b"ab", b"c"]), blake2b_256(&[b"abc"]));
    }

    #[test]
    fn hex_round_trip_and_length_check() {
        let h: Blake2b224 = "00112233445566778899aabbccddeeff00112233445566778899aabb"
            .parse()
            .unwrap();
        assert_eq!(h.as_bytes()[27], 0xbb);
        assert_eq!(h.to_string().len(), 56);

        let err = Blake2b256::try_from(&[0u8; 31][..]).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::HashLength { expected: 32, actual: 31 }
        ));
    }

    #[test]
    fn serializes_as_hex_string() {
        let h = Blake2b256::new([0xab; 32]);
        let json = serde_json::to_string(&h).unwrap();
        assert_eq!(json, format!("\"{}\"", "ab".repeat(32)));
        let back: Blake2b256 = serde_json::from_str(&json).unwrap();
        assert_eq!(back, h);
    }
}
