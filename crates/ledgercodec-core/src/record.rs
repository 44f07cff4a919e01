//! The engine-level decode result and the bridge to typed structures.
//!
//! The decode engine produces a [`Record`] per schema instance. Typed
//! structures pull their fields out of it through the `take_*` accessors
//! in [`FromRecord`] implementations.

use indexmap::IndexMap;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::DecodeError;
use crate::hash::{Blake2b224, Blake2b256};
use crate::schema::WireShape;
use crate::value::{DeferredValue, OpaqueValue};

/// A decoded field value, shaped by its `FieldType`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Field not present and the type has no natural zero.
    Absent,
    Null,
    Uint(u64),
    Bool(bool),
    Bytes(Vec<u8>),
    Text(String),
    Hash28(Blake2b224),
    Hash32(Blake2b256),
    Opaque(OpaqueValue),
    Deferred(DeferredValue),
    List(Vec<Value>),
    UintMap(BTreeMap<u64, Value>),
    Record(Record),
}

impl Value {
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Absent => "absent",
            Value::Null => "null",
            Value::Uint(_) => "uint",
            Value::Bool(_) => "bool",
            Value::Bytes(_) => "bytes",
            Value::Text(_) => "text",
            Value::Hash28(_) => "hash28",
            Value::Hash32(_) => "hash32",
            Value::Opaque(_) => "opaque",
            Value::Deferred(_) => "deferred",
            Value::List(_) => "list",
            Value::UintMap(_) => "uint map",
            Value::Record(_) => "record",
        }
    }

    /// `Absent` and `Null` both read as "no value".
    pub fn is_none(&self) -> bool {
        matches!(self, Value::Absent | Value::Null)
    }

    fn unexpected(&self, expected: &str) -> DecodeError {
        DecodeError::UnexpectedType {
            expected: expected.to_string(),
            found: self.kind().to_string(),
        }
    }

    pub fn into_uint(self) -> Result<u64, DecodeError> {
        match self {
            Value::Uint(v) => Ok(v),
            other => Err(other.unexpected("uint")),
        }
    }

    pub fn into_hash28(self) -> Result<Blake2b224, DecodeError> {
        match self {
            Value::Hash28(h) => Ok(h),
            other => Err(other.unexpected("hash28")),
        }
    }

    pub fn into_hash32(self) -> Result<Blake2b256, DecodeError> {
        match self {
            Value::Hash32(h) => Ok(h),
            other => Err(other.unexpected("hash32")),
        }
    }

    pub fn into_opaque(self) -> Result<OpaqueValue, DecodeError> {
        match self {
            Value::Opaque(v) => Ok(v),
            other => Err(other.unexpected("opaque")),
        }
    }

    pub fn into_deferred(self) -> Result<DeferredValue, DecodeError> {
        match self {
            Value::Deferred(v) => Ok(v),
            other => Err(other.unexpected("deferred")),
        }
    }

    pub fn into_record(self) -> Result<Record, DecodeError> {
        match self {
            Value::Record(r) => Ok(r),
            other => Err(other.unexpected("record")),
        }
    }

    pub fn into_list(self) -> Result<Vec<Value>, DecodeError> {
        match self {
            Value::List(items) => Ok(items),
            other => Err(other.unexpected("list")),
        }
    }
}

/// One decoded schema instance, fields in schema order.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    name: Arc<str>,
    shape: WireShape,
    fields: IndexMap<u64, Value>,
}

/// Builds a typed structure from a decoded record.
pub trait FromRecord: Sized {
    fn from_record(record: Record) -> Result<Self, DecodeError>;
}

impl Record {
    pub fn new(name: Arc<str>, shape: WireShape, fields: IndexMap<u64, Value>) -> Self {
        Self {
            name,
            shape,
            fields,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> WireShape {
        self.shape
    }

    pub fn get(&self, key: u64) -> Option<&Value> {
        self.fields.get(&key)
    }

    pub fn fields(&self) -> impl Iterator<Item = (u64, &Value)> {
        self.fields.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Remove a field, leaving `Absent` semantics behind.
    pub fn take(&mut self, key: u64) -> Value {
        self.fields.swap_remove(&key).unwrap_or(Value::Absent)
    }

    /// A required field the schema zero-filled because the input omitted it.
    fn missing(&self, key: u64) -> DecodeError {
        DecodeError::MissingField {
            field: format!("{} key {}", self.name, key),
        }
    }

    fn mismatch(&self, key: u64, expected: &str) -> DecodeError {
        DecodeError::SchemaMismatch {
            record: self.name.to_string(),
            key,
            expected: expected.to_string(),
        }
    }

    pub fn take_uint(&mut self, key: u64) -> Result<u64, DecodeError> {
        match self.take(key) {
            Value::Uint(v) => Ok(v),
            _ => Err(self.mismatch(key, "uint")),
        }
    }

    /// Narrow an unsigned field to `T`.
    pub fn take_uint_as<T: TryFrom<u64>>(&mut self, key: u64) -> Result<T, DecodeError> {
        let value = self.take_uint(key)?;
        T::try_from(value).map_err(|_| DecodeError::IntegerOutOfRange {
            value,
            target: std::any::type_name::<T>(),
        })
    }

    pub fn take_uint_opt(&mut self, key: u64) -> Result<Option<u64>, DecodeError> {
        match self.take(key) {
            Value::Uint(v) => Ok(Some(v)),
            v if v.is_none() => Ok(None),
            _ => Err(self.mismatch(key, "uint")),
        }
    }

    pub fn take_bool(&mut self, key: u64) -> Result<bool, DecodeError> {
        match self.take(key) {
            Value::Bool(v) => Ok(v),
            _ => Err(self.mismatch(key, "bool")),
        }
    }

    pub fn take_bytes(&mut self, key: u64) -> Result<Vec<u8>, DecodeError> {
        match self.take(key) {
            Value::Bytes(v) => Ok(v),
            _ => Err(self.mismatch(key, "bytes")),
        }
    }

    pub fn take_text(&mut self, key: u64) -> Result<String, DecodeError> {
        match self.take(key) {
            Value::Text(v) => Ok(v),
            _ => Err(self.mismatch(key, "text")),
        }
    }

    pub fn take_hash28(&mut self, key: u64) -> Result<Blake2b224, DecodeError> {
        match self.take(key) {
            Value::Hash28(h) => Ok(h),
            Value::Absent => Err(self.missing(key)),
            _ => Err(self.mismatch(key, "hash28")),
        }
    }

    pub fn take_hash28_opt(&mut self, key: u64) -> Result<Option<Blake2b224>, DecodeError> {
        match self.take(key) {
            Value::Hash28(h) => Ok(Some(h)),
            v if v.is_none() => Ok(None),
            _ => Err(self.mismatch(key, "hash28")),
        }
    }

    pub fn take_hash32(&mut self, key: u64) -> Result<Blake2b256, DecodeError> {
        match self.take(key) {
            Value::Hash32(h) => Ok(h),
            Value::Absent => Err(self.missing(key)),
            _ => Err(self.mismatch(key, "hash32")),
        }
    }

    pub fn take_hash32_opt(&mut self, key: u64) -> Result<Option<Blake2b256>, DecodeError> {
        match self.take(key) {
            Value::Hash32(h) => Ok(Some(h)),
            v if v.is_none() => Ok(None),
            _ => Err(self.mismatch(key, "hash32")),
        }
    }

    pub fn take_opaque(&mut self, key: u64) -> Result<OpaqueValue, DecodeError> {
        match self.take(key) {
            Value::Opaque(v) => Ok(v),
            Value::Absent => Err(self.missing(key)),
            _ => Err(self.mismatch(key, "opaque")),
        }
    }

    /// `Absent` reads as `None`; an explicit `null` is a real opaque value.
    pub fn take_opaque_opt(&mut self, key: u64) -> Result<Option<OpaqueValue>, DecodeError> {
        match self.take(key) {
            Value::Opaque(v) => Ok(Some(v)),
            Value::Absent => Ok(None),
            _ => Err(self.mismatch(key, "opaque")),
        }
    }

    pub fn take_deferred(&mut self, key: u64) -> Result<DeferredValue, DecodeError> {
        match self.take(key) {
            Value::Deferred(v) => Ok(v),
            Value::Absent => Err(self.missing(key)),
            _ => Err(self.mismatch(key, "deferred")),
        }
    }

    pub fn take_deferred_opt(&mut self, key: u64) -> Result<Option<DeferredValue>, DecodeError> {
        match self.take(key) {
            Value::Deferred(v) => Ok(Some(v)),
            v if v.is_none() => Ok(None),
            _ => Err(self.mismatch(key, "deferred")),
        }
    }

    pub fn take_record(&mut self, key: u64) -> Result<Record, DecodeError> {
        match self.take(key) {
            Value::Record(r) => Ok(r),
            Value::Absent => Err(self.missing(key)),
            _ => Err(self.mismatch(key, "record")),
        }
    }

    pub fn take_record_opt(&mut self, key: u64) -> Result<Option<Record>, DecodeError> {
        match self.take(key) {
            Value::Record(r) => Ok(Some(r)),
            v if v.is_none() => Ok(None),
            _ => Err(self.mismatch(key, "record")),
        }
    }

    /// Decode a nested record field into a typed structure.
    pub fn take_typed<T: FromRecord>(&mut self, key: u64) -> Result<T, DecodeError> {
        T::from_record(self.take_record(key)?)
    }

    pub fn take_typed_opt<T: FromRecord>(&mut self, key: u64) -> Result<Option<T>, DecodeError> {
        self.take_record_opt(key)?.map(T::from_record).transpose()
    }

    pub fn take_list(&mut self, key: u64) -> Result<Vec<Value>, DecodeError> {
        match self.take(key) {
            Value::List(items) => Ok(items),
            _ => Err(self.mismatch(key, "list")),
        }
    }

    /// Convert every element of a list field.
    pub fn take_list_with<T, F>(&mut self, key: u64, f: F) -> Result<Vec<T>, DecodeError>
    where
        F: FnMut(Value) -> Result<T, DecodeError>,
    {
        self.take_list(key)?.into_iter().map(f).collect()
    }

    /// A list of nested records, each converted with `FromRecord`.
    pub fn take_list_of<T: FromRecord>(&mut self, key: u64) -> Result<Vec<T>, DecodeError> {
        self.take_list_with(key, |v| T::from_record(v.into_record()?))
    }

    pub fn take_uint_map(&mut self, key: u64) -> Result<BTreeMap<u64, Value>, DecodeError> {
        match self.take(key) {
            Value::UintMap(m) => Ok(m),
            _ => Err(self.mismatch(key, "uint map")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Record {
        let mut fields = IndexMap::new();
        fields.insert(0, Value::Uint(300));
        fields.insert(1, Value::Absent);
        fields.insert(2, Value::Null);
        fields.insert(3, Value::List(vec![Value::Uint(1), Value::Uint(2)]));
        Record::new(Arc::from("Sample"), WireShape::Map, fields)
    }

    #[test]
    fn narrowing_reports_range() {
        let mut r = sample();
        let err = r.take_uint_as::<u8>(0).unwrap_err();
        assert!(matches!(err, DecodeError::IntegerOutOfRange { value: 300, .. }));

        let mut r = sample();
        assert_eq!(r.take_uint_as::<u16>(0).unwrap(), 300);
    }

    #[test]
    fn absent_and_null_read_as_none() {
        let mut r = sample();
        assert_eq!(r.take_hash32_opt(1).unwrap(), None);
        assert_eq!(r.take_hash32_opt(2).unwrap(), None);
        assert_eq!(r.take_deferred_opt(9).unwrap(), None);
    }

    #[test]
    fn wrong_type_is_schema_mismatch() {
        let mut r = sample();
        let err = r.take_bool(0).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::SchemaMismatch { key: 0, ref expected, .. } if expected == "bool"
        ));
    }

    #[test]
    fn absent_required_field_is_missing() {
        let mut r = sample();
        let err = r.take_hash32(1).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::MissingField { ref field } if field == "Sample key 1"
        ));
        assert_eq!(err.to_string(), "Missing required field: Sample key 1");

        // explicit null is present but of the wrong type
        let mut r = sample();
        assert!(matches!(
            r.take_hash32(2).unwrap_err(),
            DecodeError::SchemaMismatch { key: 2, .. }
        ));
        let mut r = sample();
        assert!(matches!(
            r.take_record(7).unwrap_err(),
            DecodeError::MissingField { .. }
        ));
    }

    #[test]
    fn list_conversion() {
        let mut r = sample();
        let items = r.take_list_with(3, Value::into_uint).unwrap();
        assert_eq!(items, vec![1, 2]);
        assert!(r.get(3).is_none());
    }
}
