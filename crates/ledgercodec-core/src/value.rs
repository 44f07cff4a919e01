//! Values the schema does not interpret.
//!
//! [`OpaqueValue`] is a closed sum over every CBOR primitive shape; fields
//! typed as opaque decode into it and are never further interpreted.
//! [`DeferredValue`] keeps the exact encoded bytes of a sub-value whose
//! shape cannot be statically typed (maps keyed by byte strings, for
//! example) so that decoding never fails merely because content is
//! unrepresentable.

use bytes::Bytes;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::error::DecodeError;

/// A fully decoded CBOR item with no schema attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum OpaqueValue {
    /// Major types 0 and 1. `i128` covers the full 65-bit signed range.
    Int(i128),
    Bytes(#[serde(with = "hex")] Vec<u8>),
    Text(String),
    Array(Vec<OpaqueValue>),
    /// Keys may be of any shape, so entries are kept as ordered pairs.
    Map(Vec<(OpaqueValue, OpaqueValue)>),
    Tag(u64, Box<OpaqueValue>),
    Bool(bool),
    Null,
    Undefined,
    Simple(u8),
    Float(f64),
}

impl OpaqueValue {
    /// Short name of the CBOR shape, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            OpaqueValue::Int(_) => "int",
            OpaqueValue::Bytes(_) => "bytes",
            OpaqueValue::Text(_) => "text",
            OpaqueValue::Array(_) => "array",
            OpaqueValue::Map(_) => "map",
            OpaqueValue::Tag(..) => "tag",
            OpaqueValue::Bool(_) => "bool",
            OpaqueValue::Null => "null",
            OpaqueValue::Undefined => "undefined",
            OpaqueValue::Simple(_) => "simple",
            OpaqueValue::Float(_) => "float",
        }
    }

    pub fn as_int(&self) -> Option<i128> {
        match self {
            OpaqueValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            OpaqueValue::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[OpaqueValue]> {
        match self {
            OpaqueValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&[(OpaqueValue, OpaqueValue)]> {
        match self {
            OpaqueValue::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Strips any number of enclosing tags.
    pub fn untagged(&self) -> &OpaqueValue {
        match self {
            OpaqueValue::Tag(_, inner) => inner.untagged(),
            other => other,
        }
    }
}

impl fmt::Display for OpaqueValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpaqueValue::Int(v) => write!(f, "{v}"),
            OpaqueValue::Bytes(b) => write!(f, "h'{}'", hex::encode(b)),
            OpaqueValue::Text(s) => write!(f, "{s:?}"),
            OpaqueValue::Array(items) => {
                let parts: Vec<_> = items.iter().map(|x| x.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            OpaqueValue::Map(entries) => {
                let parts: Vec<_> = entries.iter().map(|(k, v)| format!("{k}: {v}")).collect();
                write!(f, "{{{}}}", parts.join(", "))
            }
            OpaqueValue::Tag(tag, inner) => write!(f, "{tag}({inner})"),
            OpaqueValue::Bool(v) => write!(f, "{v}"),
            OpaqueValue::Null => write!(f, "null"),
            OpaqueValue::Undefined => write!(f, "undefined"),
            OpaqueValue::Simple(v) => write!(f, "simple({v})"),
            OpaqueValue::Float(v) => write!(f, "{v}"),
        }
    }
}

/// The captured encoding of a sub-value, compared and hashed by its bytes.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct DeferredValue(Bytes);

impl DeferredValue {
    pub fn new(raw: impl Into<Bytes>) -> Self {
        Self(raw.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn raw(&self) -> &Bytes {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Decode the captured bytes without a schema.
    pub fn to_opaque(&self) -> Result<OpaqueValue, DecodeError> {
        crate::engine::decode_opaque(&self.0).map(|(value, _)| value)
    }
}

impl fmt::Debug for DeferredValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeferredValue({})", hex::encode(&self.0))
    }
}

impl Serialize for DeferredValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(&self.0))
    }
}

impl<'de> Deserialize<'de> for DeferredValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let raw = hex::decode(s).map_err(serde::de::Error::custom)?;
        Ok(Self(Bytes::from(raw)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn deferred_equality_is_byte_equality() {
        let a = DeferredValue::new(vec![0xa1, 0x41, 0x00, 0x01]);
        let b = DeferredValue::new(Bytes::from_static(&[0xa1, 0x41, 0x00, 0x01]));
        let c = DeferredValue::new(vec![0xa1, 0x41, 0x00, 0x02]);
        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<_> = [a.clone(), b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert!(set.contains(&a));
    }

    #[test]
    fn deferred_decodes_byte_keyed_map() {
        // {h'00': 1}
        let d = DeferredValue::new(vec![0xa1, 0x41, 0x00, 0x01]);
        let v = d.to_opaque().unwrap();
        assert_eq!(
            v,
            OpaqueValue::Map(vec![(OpaqueValue::Bytes(vec![0]), OpaqueValue::Int(1))])
        );
        assert_eq!(v.to_string(), "{h'00': 1}");
    }

    #[test]
    fn opaque_serializes_tagged() {
        let v = OpaqueValue::Array(vec![OpaqueValue::Int(-1), OpaqueValue::Bytes(vec![0xff])]);
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["type"], "array");
        assert_eq!(json["value"][0]["value"], -1);
        assert_eq!(json["value"][1]["value"], "ff");
    }

    #[test]
    fn untagged_strips_nested_tags() {
        let v = OpaqueValue::Tag(24, Box::new(OpaqueValue::Tag(258, Box::new(OpaqueValue::Null))));
        assert_eq!(v.untagged(), &OpaqueValue::Null);
        assert_eq!(v.kind(), "tag");
    }
}
