//! Schema-driven CBOR decoding.
//!
//! Array-coded records consume positions in schema order. Missing trailing
//! optional positions take their zero value, too few required positions
//! is an error, and positions beyond the schema are skipped. Map-coded
//! records look fields up by integer key. Absent keys take their zero
//! value, unknown keys (integer or not) are skipped, and a repeated key
//! overwrites the earlier occurrence.
//!
//! Every entry point reports the number of bytes consumed so callers can
//! decode a second structure that follows in the same buffer.

use bytes::Bytes;
use indexmap::IndexMap;
use minicbor::data::Type;
use minicbor::Decoder;
use std::collections::BTreeMap;

use crate::error::DecodeError;
use crate::hash::Hash;
use crate::record::{FromRecord, Record, Value};
use crate::schema::{FieldType, RecordSchema, WireShape};
use crate::value::{DeferredValue, OpaqueValue};

/// Maximum container nesting accepted by the engine.
pub const MAX_DEPTH: usize = 128;

const SET_TAG: u64 = 258;

/// Decode one schema instance from the start of `bytes`.
pub fn decode(schema: &RecordSchema, bytes: &[u8]) -> Result<(Record, usize), DecodeError> {
    let mut d = Decoder::new(bytes);
    let record = decode_record(&mut d, schema, 0)?;
    Ok((record, d.position()))
}

/// Decode one schema instance and convert it into a typed structure.
pub fn decode_as<T: FromRecord>(
    schema: &RecordSchema,
    bytes: &[u8],
) -> Result<(T, usize), DecodeError> {
    let (record, consumed) = decode(schema, bytes)?;
    Ok((T::from_record(record)?, consumed))
}

/// Decode any well-formed item without a schema.
pub fn decode_opaque(bytes: &[u8]) -> Result<(OpaqueValue, usize), DecodeError> {
    let mut d = Decoder::new(bytes);
    let value = decode_opaque_value(&mut d, 0)?;
    Ok((value, d.position()))
}

/// Capture the encoding of the first item in `bytes` without decoding it.
pub fn capture_deferred(bytes: &[u8]) -> Result<(DeferredValue, usize), DecodeError> {
    let mut d = Decoder::new(bytes);
    let value = capture(&mut d)?;
    Ok((value, d.position()))
}

/// Read the next record from an existing decoder.
pub fn decode_record(
    d: &mut Decoder<'_>,
    schema: &RecordSchema,
    depth: usize,
) -> Result<Record, DecodeError> {
    if depth > MAX_DEPTH {
        return Err(DecodeError::TooDeep { max: MAX_DEPTH });
    }
    match schema.shape() {
        WireShape::Array => decode_array_record(d, schema, depth),
        WireShape::Map => decode_map_record(d, schema, depth),
    }
}

fn decode_array_record(
    d: &mut Decoder<'_>,
    schema: &RecordSchema,
    depth: usize,
) -> Result<Record, DecodeError> {
    let len = expect_array(d)?;
    let mut fields = IndexMap::with_capacity(schema.len());
    let mut index = 0u64;
    let mut exhausted = false;

    for def in schema.fields() {
        if !next_element(d, len, index)? {
            exhausted = true;
            break;
        }
        let value = decode_field(d, &def.ty, depth + 1)
            .map_err(|e| e.in_field(schema.name(), def.name))?;
        fields.insert(def.key, value);
        index += 1;
    }

    let required = schema.required_len();
    if (index as usize) < required {
        return Err(DecodeError::TooFewElements {
            record: schema.name().to_string(),
            expected: required,
            actual: index as usize,
        });
    }

    for def in schema.fields().skip(index as usize) {
        fields.insert(def.key, zero_value(&def.ty));
    }

    if !exhausted {
        while next_element(d, len, index)? {
            d.skip()?;
            index += 1;
        }
    }

    Ok(Record::new(schema.shared_name(), WireShape::Array, fields))
}

fn decode_map_record(
    d: &mut Decoder<'_>,
    schema: &RecordSchema,
    depth: usize,
) -> Result<Record, DecodeError> {
    let len = expect_map(d)?;
    let mut found: IndexMap<u64, Value> = IndexMap::new();
    let mut index = 0u64;

    while next_element(d, len, index)? {
        index += 1;
        let key = match d.datatype()? {
            Type::U8 | Type::U16 | Type::U32 | Type::U64 => Some(d.u64()?),
            _ => {
                d.skip()?;
                None
            }
        };
        match key.and_then(|k| schema.field(k)) {
            Some(def) => {
                let value = decode_field(d, &def.ty, depth + 1)
                    .map_err(|e| e.in_field(schema.name(), def.name))?;
                found.insert(def.key, value);
            }
            None => d.skip()?,
        }
    }

    let mut fields = IndexMap::with_capacity(schema.len());
    for def in schema.fields() {
        let value = found
            .swap_remove(&def.key)
            .unwrap_or_else(|| zero_value(&def.ty));
        fields.insert(def.key, value);
    }

    Ok(Record::new(schema.shared_name(), WireShape::Map, fields))
}

/// The value an omitted field takes.
pub fn zero_value(ty: &FieldType) -> Value {
    match ty {
        FieldType::Uint => Value::Uint(0),
        FieldType::Bool => Value::Bool(false),
        FieldType::Bytes => Value::Bytes(Vec::new()),
        FieldType::Text => Value::Text(String::new()),
        FieldType::List(_) => Value::List(Vec::new()),
        FieldType::UintMap(_) => Value::UintMap(BTreeMap::new()),
        _ => Value::Absent,
    }
}

fn decode_field(d: &mut Decoder<'_>, ty: &FieldType, depth: usize) -> Result<Value, DecodeError> {
    if depth > MAX_DEPTH {
        return Err(DecodeError::TooDeep { max: MAX_DEPTH });
    }
    let value = match ty {
        FieldType::Uint => Value::Uint(d.u64()?),
        FieldType::Bool => Value::Bool(d.bool()?),
        FieldType::Bytes => Value::Bytes(read_bytes(d)?),
        FieldType::Text => Value::Text(read_text(d)?),
        FieldType::Hash28 => Value::Hash28(Hash::try_from(read_bytes(d)?.as_slice())?),
        FieldType::Hash32 => Value::Hash32(Hash::try_from(read_bytes(d)?.as_slice())?),
        FieldType::Opaque => Value::Opaque(decode_opaque_value(d, depth)?),
        FieldType::Deferred => Value::Deferred(capture(d)?),
        FieldType::List(inner) => {
            skip_set_tag(d)?;
            let len = expect_array(d)?;
            let mut items = Vec::with_capacity(len.unwrap_or(0).min(1024) as usize);
            let mut index = 0u64;
            while next_element(d, len, index)? {
                items.push(decode_field(d, inner, depth + 1)?);
                index += 1;
            }
            Value::List(items)
        }
        FieldType::UintMap(inner) => {
            let len = expect_map(d)?;
            let mut entries = BTreeMap::new();
            let mut index = 0u64;
            while next_element(d, len, index)? {
                let key = d.u64()?;
                entries.insert(key, decode_field(d, inner, depth + 1)?);
                index += 1;
            }
            Value::UintMap(entries)
        }
        FieldType::Record(schema) => Value::Record(decode_record(d, schema, depth)?),
        FieldType::Nullable(inner) => {
            if d.datatype()? == Type::Null {
                d.null()?;
                Value::Null
            } else {
                decode_field(d, inner, depth)?
            }
        }
        FieldType::Choice(alternatives) => {
            let found = d.datatype()?;
            let alt = alternatives
                .iter()
                .find(|alt| accepts(alt, found))
                .ok_or_else(|| DecodeError::UnexpectedType {
                    expected: ty.to_string(),
                    found: format!("{found:?}"),
                })?;
            decode_field(d, alt, depth)?
        }
    };
    Ok(value)
}

/// Whether an item of CBOR type `found` can start a value of `ty`.
fn accepts(ty: &FieldType, found: Type) -> bool {
    match ty {
        FieldType::Uint => matches!(found, Type::U8 | Type::U16 | Type::U32 | Type::U64),
        FieldType::Bool => found == Type::Bool,
        FieldType::Bytes | FieldType::Hash28 | FieldType::Hash32 => {
            matches!(found, Type::Bytes | Type::BytesIndef)
        }
        FieldType::Text => matches!(found, Type::String | Type::StringIndef),
        FieldType::Opaque | FieldType::Deferred => true,
        FieldType::List(_) => matches!(found, Type::Array | Type::ArrayIndef | Type::Tag),
        FieldType::UintMap(_) => matches!(found, Type::Map | Type::MapIndef),
        FieldType::Record(schema) => match schema.shape() {
            WireShape::Array => matches!(found, Type::Array | Type::ArrayIndef),
            WireShape::Map => matches!(found, Type::Map | Type::MapIndef),
        },
        FieldType::Nullable(inner) => found == Type::Null || accepts(inner, found),
        FieldType::Choice(alternatives) => alternatives.iter().any(|alt| accepts(alt, found)),
    }
}

/// Read any item into an `OpaqueValue`.
pub fn decode_opaque_value(d: &mut Decoder<'_>, depth: usize) -> Result<OpaqueValue, DecodeError> {
    if depth > MAX_DEPTH {
        return Err(DecodeError::TooDeep { max: MAX_DEPTH });
    }
    let value = match d.datatype()? {
        Type::U8
        | Type::U16
        | Type::U32
        | Type::U64
        | Type::I8
        | Type::I16
        | Type::I32
        | Type::I64
        | Type::Int => OpaqueValue::Int(i128::from(d.int()?)),
        Type::Bytes | Type::BytesIndef => OpaqueValue::Bytes(read_bytes(d)?),
        Type::String | Type::StringIndef => OpaqueValue::Text(read_text(d)?),
        Type::Array | Type::ArrayIndef => {
            let len = d.array()?;
            let mut items = Vec::with_capacity(len.unwrap_or(0).min(1024) as usize);
            let mut index = 0u64;
            while next_element(d, len, index)? {
                items.push(decode_opaque_value(d, depth + 1)?);
                index += 1;
            }
            OpaqueValue::Array(items)
        }
        Type::Map | Type::MapIndef => {
            let len = d.map()?;
            let mut entries = Vec::with_capacity(len.unwrap_or(0).min(1024) as usize);
            let mut index = 0u64;
            while next_element(d, len, index)? {
                let k = decode_opaque_value(d, depth + 1)?;
                let v = decode_opaque_value(d, depth + 1)?;
                entries.push((k, v));
                index += 1;
            }
            OpaqueValue::Map(entries)
        }
        Type::Tag => {
            let tag = d.tag()?;
            let inner = decode_opaque_value(d, depth + 1)?;
            OpaqueValue::Tag(tag.as_u64(), Box::new(inner))
        }
        Type::Bool => OpaqueValue::Bool(d.bool()?),
        Type::Null => {
            d.null()?;
            OpaqueValue::Null
        }
        Type::Undefined => {
            d.undefined()?;
            OpaqueValue::Undefined
        }
        Type::Simple => OpaqueValue::Simple(d.simple()?),
        Type::F16 => OpaqueValue::Float(f64::from(d.f16()?)),
        Type::F32 => OpaqueValue::Float(f64::from(d.f32()?)),
        Type::F64 => OpaqueValue::Float(d.f64()?),
        other => {
            return Err(DecodeError::UnexpectedType {
                expected: "data item".into(),
                found: format!("{other:?}"),
            })
        }
    };
    Ok(value)
}

fn capture(d: &mut Decoder<'_>) -> Result<DeferredValue, DecodeError> {
    let start = d.position();
    d.skip()?;
    let end = d.position();
    Ok(DeferredValue::new(Bytes::copy_from_slice(&d.input()[start..end])))
}

fn read_bytes(d: &mut Decoder<'_>) -> Result<Vec<u8>, DecodeError> {
    if d.datatype()? == Type::BytesIndef {
        let mut out = Vec::new();
        for chunk in d.bytes_iter()? {
            out.extend_from_slice(chunk?);
        }
        Ok(out)
    } else {
        Ok(d.bytes()?.to_vec())
    }
}

fn read_text(d: &mut Decoder<'_>) -> Result<String, DecodeError> {
    if d.datatype()? == Type::StringIndef {
        let mut out = String::new();
        for chunk in d.str_iter()? {
            out.push_str(chunk?);
        }
        Ok(out)
    } else {
        Ok(d.str()?.to_string())
    }
}

fn skip_set_tag(d: &mut Decoder<'_>) -> Result<(), DecodeError> {
    if d.datatype()? == Type::Tag {
        let tag = d.tag()?;
        if tag.as_u64() != SET_TAG {
            return Err(DecodeError::UnexpectedType {
                expected: "array or set".into(),
                found: format!("tag {}", tag.as_u64()),
            });
        }
    }
    Ok(())
}

fn expect_array(d: &mut Decoder<'_>) -> Result<Option<u64>, DecodeError> {
    match d.datatype()? {
        Type::Array | Type::ArrayIndef => Ok(d.array()?),
        other => Err(DecodeError::UnexpectedType {
            expected: "array".into(),
            found: format!("{other:?}"),
        }),
    }
}

fn expect_map(d: &mut Decoder<'_>) -> Result<Option<u64>, DecodeError> {
    match d.datatype()? {
        Type::Map | Type::MapIndef => Ok(d.map()?),
        other => Err(DecodeError::UnexpectedType {
            expected: "map".into(),
            found: format!("{other:?}"),
        }),
    }
}

/// Whether element `index` of a container of length `len` exists. For
/// indefinite containers this consumes the closing break.
fn next_element(d: &mut Decoder<'_>, len: Option<u64>, index: u64) -> Result<bool, DecodeError> {
    match len {
        Some(n) => Ok(index < n),
        None => {
            if d.datatype()? == Type::Break {
                d.set_position(d.position() + 1);
                Ok(false)
            } else {
                Ok(true)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::Blake2b256;
    use minicbor::data::Tag;
    use minicbor::{encode, Encoder};
    use std::convert::Infallible;
    use std::sync::Arc;

    fn cbor(
        build: impl FnOnce(&mut Encoder<Vec<u8>>) -> Result<(), encode::Error<Infallible>>,
    ) -> Vec<u8> {
        let mut e = Encoder::new(Vec::new());
        build(&mut e).unwrap();
        e.into_writer()
    }

    fn input_schema() -> Arc<RecordSchema> {
        RecordSchema::array("TransactionInput")
            .field(0, "id", FieldType::Hash32)
            .field(1, "index", FieldType::Uint)
            .build()
    }

    fn body_schema() -> Arc<RecordSchema> {
        RecordSchema::map("Body")
            .field(0, "inputs", FieldType::list(FieldType::record(&input_schema())))
            .field(2, "fee", FieldType::Uint)
            .optional(3, "ttl", FieldType::Uint)
            .optional(5, "withdrawals", FieldType::Deferred)
            .optional(7, "metadata_hash", FieldType::Hash32)
            .build()
    }

    #[test]
    fn array_record_ignores_extra_trailing_element() {
        let bytes = cbor(|e| {
            e.array(3)?.bytes(&[7u8; 32])?.u64(1)?.str("future field")?;
            Ok(())
        });
        let (record, consumed) = decode(&input_schema(), &bytes).unwrap();
        assert_eq!(consumed, bytes.len());
        assert_eq!(record.get(0), Some(&Value::Hash32(Blake2b256::new([7; 32]))));
        assert_eq!(record.get(1), Some(&Value::Uint(1)));
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn array_record_with_too_few_elements_fails() {
        let bytes = cbor(|e| {
            e.array(1)?.bytes(&[7u8; 32])?;
            Ok(())
        });
        let err = decode(&input_schema(), &bytes).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::TooFewElements { expected: 2, actual: 1, .. }
        ));
    }

    #[test]
    fn missing_optional_array_tail_takes_zero_value() {
        let schema = RecordSchema::array("Output")
            .field(0, "address", FieldType::Bytes)
            .field(1, "amount", FieldType::Uint)
            .optional(2, "datum_hash", FieldType::Hash32)
            .build();
        let bytes = cbor(|e| {
            e.array(2)?.bytes(&[1, 2, 3])?.u64(5)?;
            Ok(())
        });
        let (record, _) = decode(&schema, &bytes).unwrap();
        assert_eq!(record.get(2), Some(&Value::Absent));
    }

    #[test]
    fn map_record_omitted_key_takes_zero_value() {
        let without = cbor(|e| {
            e.map(2)?.u64(0)?.array(0)?.u64(2)?.u64(170_000)?;
            Ok(())
        });
        let with = cbor(|e| {
            e.map(3)?.u64(0)?.array(0)?.u64(2)?.u64(170_000)?.u64(3)?.u64(900)?;
            Ok(())
        });
        let (a, _) = decode(&body_schema(), &without).unwrap();
        let (b, _) = decode(&body_schema(), &with).unwrap();

        assert_eq!(a.get(3), Some(&Value::Uint(0)));
        assert_eq!(b.get(3), Some(&Value::Uint(900)));
        for key in [0, 2, 5, 7] {
            assert_eq!(a.get(key), b.get(key), "key {key} changed");
        }
        assert_eq!(a.get(5), Some(&Value::Absent));
    }

    #[test]
    fn map_record_skips_unknown_and_non_integer_keys() {
        let bytes = cbor(|e| {
            e.map(4)?
                .u64(2)?
                .u64(10)?
                .u64(99)?
                .array(2)?
                .u64(1)?
                .u64(2)?
                .str("note")?
                .str("ignored")?
                .bytes(&[0xde, 0xad])?
                .map(0)?;
            Ok(())
        });
        let (record, consumed) = decode(&body_schema(), &bytes).unwrap();
        assert_eq!(consumed, bytes.len());
        assert_eq!(record.get(2), Some(&Value::Uint(10)));
    }

    #[test]
    fn duplicate_map_key_last_wins() {
        let bytes = cbor(|e| {
            e.map(2)?.u64(2)?.u64(1)?.u64(2)?.u64(2)?;
            Ok(())
        });
        let (record, _) = decode(&body_schema(), &bytes).unwrap();
        assert_eq!(record.get(2), Some(&Value::Uint(2)));
    }

    #[test]
    fn consumed_bytes_allow_back_to_back_decoding() {
        let mut bytes = cbor(|e| {
            e.array(2)?.bytes(&[1u8; 32])?.u64(0)?;
            Ok(())
        });
        let second = cbor(|e| {
            e.array(2)?.bytes(&[2u8; 32])?.u64(9)?;
            Ok(())
        });
        bytes.extend_from_slice(&second);

        let (first, used) = decode(&input_schema(), &bytes).unwrap();
        let (next, used2) = decode(&input_schema(), &bytes[used..]).unwrap();
        assert_eq!(used + used2, bytes.len());
        assert_eq!(first.get(1), Some(&Value::Uint(0)));
        assert_eq!(next.get(1), Some(&Value::Uint(9)));
    }

    #[test]
    fn byte_keyed_map_is_deferred_verbatim() {
        let withdrawals = cbor(|e| {
            e.map(1)?.bytes(&[0xe1; 29])?.u64(1_000_000)?;
            Ok(())
        });
        let mut bytes = cbor(|e| {
            e.map(2)?.u64(2)?.u64(1)?.u64(5)?;
            Ok(())
        });
        bytes.extend_from_slice(&withdrawals);

        let (record, _) = decode(&body_schema(), &bytes).unwrap();
        match record.get(5) {
            Some(Value::Deferred(d)) => {
                assert_eq!(d.as_bytes(), withdrawals.as_slice());
                assert_eq!(*d, DeferredValue::new(withdrawals.clone()));
            }
            other => panic!("expected deferred, got {other:?}"),
        }
    }

    #[test]
    fn lists_accept_set_tag_and_indefinite_length() {
        let bytes = cbor(|e| {
            e.map(1)?
                .u64(0)?
                .tag(Tag::new(258))?
                .begin_array()?
                .array(2)?
                .bytes(&[3u8; 32])?
                .u64(4)?
                .end()?;
            Ok(())
        });
        let (mut record, consumed) = decode(&body_schema(), &bytes).unwrap();
        assert_eq!(consumed, bytes.len());
        let inputs = record.take_list(0).unwrap();
        assert_eq!(inputs.len(), 1);
    }

    #[test]
    fn other_tags_before_a_list_are_rejected() {
        let bytes = cbor(|e| {
            e.map(1)?.u64(0)?.tag(Tag::new(24))?.array(0)?;
            Ok(())
        });
        let err = decode(&body_schema(), &bytes).unwrap_err();
        assert!(err.to_string().starts_with("Body.inputs:"));
    }

    #[test]
    fn choice_follows_major_type() {
        let schema = RecordSchema::array("Output")
            .field(0, "address", FieldType::Bytes)
            .field(
                1,
                "amount",
                FieldType::Choice(vec![
                    FieldType::Uint,
                    FieldType::list(FieldType::Opaque),
                ]),
            )
            .build();
        let coin = cbor(|e| {
            e.array(2)?.bytes(&[1])?.u64(5)?;
            Ok(())
        });
        let bundle = cbor(|e| {
            e.array(2)?.bytes(&[1])?.array(2)?.u64(5)?.map(0)?;
            Ok(())
        });
        let text = cbor(|e| {
            e.array(2)?.bytes(&[1])?.str("five")?;
            Ok(())
        });
        assert_eq!(decode(&schema, &coin).unwrap().0.get(1), Some(&Value::Uint(5)));
        assert!(matches!(decode(&schema, &bundle).unwrap().0.get(1), Some(Value::List(_))));
        assert!(matches!(
            decode(&schema, &text).unwrap_err().root_cause(),
            DecodeError::UnexpectedType { .. }
        ));
    }

    #[test]
    fn hashes_accept_indefinite_byte_strings() {
        let schema = RecordSchema::array("Header")
            .field(
                0,
                "prev_hash",
                FieldType::Choice(vec![FieldType::Uint, FieldType::Hash32]),
            )
            .field(1, "issuer", FieldType::Hash28)
            .build();
        let bytes = cbor(|e| {
            e.array(2)?;
            e.begin_bytes()?.bytes(&[9u8; 16])?.bytes(&[9u8; 16])?.end()?;
            e.begin_bytes()?.bytes(&[4u8; 20])?.bytes(&[4u8; 8])?.end()?;
            Ok(())
        });
        let (record, consumed) = decode(&schema, &bytes).unwrap();
        assert_eq!(consumed, bytes.len());
        assert_eq!(record.get(0), Some(&Value::Hash32(Blake2b256::new([9; 32]))));
        assert_eq!(
            record.get(1),
            Some(&Value::Hash28(crate::hash::Blake2b224::new([4; 28])))
        );

        let short = cbor(|e| {
            e.array(2)?.u64(0)?;
            e.begin_bytes()?.bytes(&[4u8; 20])?.end()?;
            Ok(())
        });
        assert!(matches!(
            decode(&schema, &short).unwrap_err().root_cause(),
            DecodeError::HashLength { expected: 28, actual: 20 }
        ));
    }

    #[test]
    fn nullable_accepts_null() {
        let schema = RecordSchema::array("Header")
            .field(0, "prev_hash", FieldType::nullable(FieldType::Hash32))
            .build();
        let bytes = cbor(|e| {
            e.array(1)?.null()?;
            Ok(())
        });
        assert_eq!(decode(&schema, &bytes).unwrap().0.get(0), Some(&Value::Null));
    }

    #[test]
    fn opaque_covers_every_shape() {
        let bytes = cbor(|e| {
            e.array(8)?
                .i64(-5)?
                .bytes(&[1])?
                .str("x")?
                .tag(Tag::new(30))?
                .array(2)?
                .u64(1)?
                .u64(3)?
                .bool(true)?
                .null()?
                .undefined()?
                .f64(1.5)?;
            Ok(())
        });
        let (value, consumed) = decode_opaque(&bytes).unwrap();
        assert_eq!(consumed, bytes.len());
        assert_eq!(
            value,
            OpaqueValue::Array(vec![
                OpaqueValue::Int(-5),
                OpaqueValue::Bytes(vec![1]),
                OpaqueValue::Text("x".into()),
                OpaqueValue::Tag(
                    30,
                    Box::new(OpaqueValue::Array(vec![OpaqueValue::Int(1), OpaqueValue::Int(3)]))
                ),
                OpaqueValue::Bool(true),
                OpaqueValue::Null,
                OpaqueValue::Undefined,
                OpaqueValue::Float(1.5),
            ])
        );
    }

    #[test]
    fn opaque_integer_range_is_full_65_bits() {
        // -2^64
        let bytes = [0x3b, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff];
        let (value, _) = decode_opaque(&bytes).unwrap();
        assert_eq!(value, OpaqueValue::Int(-(1i128 << 64)));
    }

    #[test]
    fn nesting_is_bounded() {
        let mut bytes = vec![0x81; MAX_DEPTH + 10];
        bytes.push(0x00);
        let err = decode_opaque(&bytes).unwrap_err();
        assert!(matches!(err, DecodeError::TooDeep { max: MAX_DEPTH }));
    }

    #[test]
    fn truncated_input_is_a_cbor_error() {
        let bytes = cbor(|e| {
            e.array(2)?.bytes(&[7u8; 32])?.u64(1)?;
            Ok(())
        });
        let err = decode(&input_schema(), &bytes[..10]).unwrap_err();
        assert!(matches!(err.root_cause(), DecodeError::Cbor(_)));
    }

    #[test]
    fn field_errors_carry_their_path() {
        let bytes = cbor(|e| {
            e.map(1)?.u64(0)?.array(1)?.array(2)?.bytes(&[0u8; 31])?.u64(0)?;
            Ok(())
        });
        let err = decode(&body_schema(), &bytes).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Body.inputs: TransactionInput.id: Invalid hash length: expected 32 bytes, got 31"
        );
    }

    #[test]
    fn capture_reports_consumed() {
        let bytes = cbor(|e| {
            e.map(1)?.bytes(&[0])?.u64(1)?.u64(42)?;
            Ok(())
        });
        let (value, consumed) = capture_deferred(&bytes).unwrap();
        assert_eq!(consumed, bytes.len() - 2);
        assert_eq!(value.len(), consumed);
    }
}
