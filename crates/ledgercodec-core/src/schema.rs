//! Record schemas: the in-memory description of how a record is laid out
//! on the wire.
//!
//! A schema is either array-coded (fields at fixed positions, the key is
//! the position) or map-coded (fields under small integer keys). Later
//! eras are built with [`RecordSchema::extend`], which copies the base
//! field set and key assignments unchanged before new keys are appended.

use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use crate::error::SchemaError;

/// Wire shape of a record, chosen per schema rather than per instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WireShape {
    Array,
    Map,
}

impl fmt::Display for WireShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireShape::Array => write!(f, "array"),
            WireShape::Map => write!(f, "map"),
        }
    }
}

/// The type of a single field.
#[derive(Debug, Clone)]
pub enum FieldType {
    Uint,
    Bool,
    Bytes,
    Text,
    Hash28,
    Hash32,
    /// Any well-formed item, decoded to an `OpaqueValue`.
    Opaque,
    /// Any well-formed item, captured as its raw encoding.
    Deferred,
    /// Array of items; a leading set tag (258) is tolerated.
    List(Box<FieldType>),
    /// Map keyed by unsigned integers.
    UintMap(Box<FieldType>),
    Record(Arc<RecordSchema>),
    /// `null` or the inner type.
    Nullable(Box<FieldType>),
    /// First alternative whose major type matches the next item.
    Choice(Vec<FieldType>),
}

impl FieldType {
    pub fn list(inner: FieldType) -> Self {
        FieldType::List(Box::new(inner))
    }

    pub fn uint_map(inner: FieldType) -> Self {
        FieldType::UintMap(Box::new(inner))
    }

    pub fn nullable(inner: FieldType) -> Self {
        FieldType::Nullable(Box::new(inner))
    }

    pub fn record(schema: &Arc<RecordSchema>) -> Self {
        FieldType::Record(Arc::clone(schema))
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Uint => write!(f, "uint"),
            FieldType::Bool => write!(f, "bool"),
            FieldType::Bytes => write!(f, "bytes"),
            FieldType::Text => write!(f, "text"),
            FieldType::Hash28 => write!(f, "hash28"),
            FieldType::Hash32 => write!(f, "hash32"),
            FieldType::Opaque => write!(f, "opaque"),
            FieldType::Deferred => write!(f, "deferred"),
            FieldType::List(inner) => write!(f, "[{inner}]"),
            FieldType::UintMap(inner) => write!(f, "{{uint => {inner}}}"),
            FieldType::Record(schema) => write!(f, "{}", schema.name()),
            FieldType::Nullable(inner) => write!(f, "{inner}?"),
            FieldType::Choice(alts) => {
                let parts: Vec<_> = alts.iter().map(|a| a.to_string()).collect();
                write!(f, "{}", parts.join(" / "))
            }
        }
    }
}

/// Definition of a single field within a record.
#[derive(Debug, Clone)]
pub struct FieldDef {
    /// Map key, or position for array-coded records.
    pub key: u64,
    pub name: &'static str,
    pub ty: FieldType,
    /// Array-coded: may be missing from the tail. Map-coded fields are
    /// always omittable, so the flag is informational there.
    pub optional: bool,
}

/// A composed, immutable record schema.
#[derive(Debug, Clone)]
pub struct RecordSchema {
    name: Arc<str>,
    shape: WireShape,
    fields: IndexMap<u64, FieldDef>,
    defects: Vec<SchemaError>,
}

impl RecordSchema {
    /// Start an array-coded schema.
    pub fn array(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder::new(name.into(), WireShape::Array)
    }

    /// Start a map-coded schema.
    pub fn map(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder::new(name.into(), WireShape::Map)
    }

    /// Start a schema that embeds every field of `base` under its
    /// original key.
    pub fn extend(base: &RecordSchema, name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            schema: RecordSchema {
                name: Arc::from(name.into()),
                shape: base.shape,
                fields: base.fields.clone(),
                defects: Vec::new(),
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn shared_name(&self) -> Arc<str> {
        Arc::clone(&self.name)
    }

    pub fn shape(&self) -> WireShape {
        self.shape
    }

    pub fn field(&self, key: u64) -> Option<&FieldDef> {
        self.fields.get(&key)
    }

    pub fn field_by_name(&self, name: &str) -> Option<&FieldDef> {
        self.fields.values().find(|f| f.name == name)
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.values()
    }

    pub fn keys(&self) -> impl Iterator<Item = u64> + '_ {
        self.fields.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of leading fields an array-coded record must carry.
    pub fn required_len(&self) -> usize {
        self.fields.values().take_while(|f| !f.optional).count()
    }

    /// Every field of `other` is present here under the same key and name.
    pub fn is_superset_of(&self, other: &RecordSchema) -> bool {
        other.fields.values().all(|theirs| {
            self.fields
                .get(&theirs.key)
                .map(|ours| ours.name == theirs.name)
                .unwrap_or(false)
        })
    }

    /// Report the first structural defect, if any.
    pub fn validate(&self) -> Result<(), SchemaError> {
        if let Some(defect) = self.defects.first() {
            return Err(defect.clone());
        }
        if self.shape == WireShape::Array {
            let mut seen_optional = false;
            for (index, field) in self.fields.values().enumerate() {
                if field.key != index as u64 {
                    return Err(SchemaError::NonContiguous {
                        record: self.name.to_string(),
                        key: field.key,
                        index,
                    });
                }
                if field.optional {
                    seen_optional = true;
                } else if seen_optional {
                    return Err(SchemaError::RequiredAfterOptional {
                        record: self.name.to_string(),
                        key: field.key,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Incremental builder returned by [`RecordSchema::array`],
/// [`RecordSchema::map`] and [`RecordSchema::extend`].
pub struct SchemaBuilder {
    schema: RecordSchema,
}

impl SchemaBuilder {
    fn new(name: String, shape: WireShape) -> Self {
        Self {
            schema: RecordSchema {
                name: Arc::from(name),
                shape,
                fields: IndexMap::new(),
                defects: Vec::new(),
            },
        }
    }

    fn push(mut self, key: u64, name: &'static str, ty: FieldType, optional: bool) -> Self {
        if self.schema.fields.contains_key(&key) {
            self.schema.defects.push(SchemaError::DuplicateKey {
                record: self.schema.name.to_string(),
                key,
            });
            return self;
        }
        self.schema.fields.insert(
            key,
            FieldDef {
                key,
                name,
                ty,
                optional,
            },
        );
        self
    }

    pub fn field(self, key: u64, name: &'static str, ty: FieldType) -> Self {
        self.push(key, name, ty, false)
    }

    pub fn optional(self, key: u64, name: &'static str, ty: FieldType) -> Self {
        self.push(key, name, ty, true)
    }

    /// Replace the type of an inherited field, keeping its key, name and
    /// position.
    pub fn loosen(mut self, key: u64, ty: FieldType) -> Self {
        match self.schema.fields.get_mut(&key) {
            Some(field) => field.ty = ty,
            None => self.schema.defects.push(SchemaError::UnknownKey {
                record: self.schema.name.to_string(),
                key,
            }),
        }
        self
    }

    pub fn build(self) -> Arc<RecordSchema> {
        Arc::new(self.schema)
    }
}
