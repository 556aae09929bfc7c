//! Positional amino binary encoder
//!
//! The external decoder has no field numbers to go on: a field's number is
//! its position in the declaring struct plus one, and a struct's concrete
//! type is recoverable only from its registered prefix. Every [`Object`]
//! therefore lists its fields in the exact order the chain declares them.

use crate::registry::TypeName;
use crate::varint::{encode_length_prefixed_bytes, encode_length_prefixed_string, encode_uvarint};
use crate::{CodecError, Result};

/// Field names that never reach the wire
const RESERVED_FIELDS: [&str; 2] = ["msgType", "version"];

/// Amino type-3 tag for varint-encoded scalars
const TYP3_VARINT: u8 = 0;
/// Amino type-3 tag for length-delimited values
const TYP3_BYTE_LENGTH: u8 = 2;

/// A value that can be amino-encoded
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    /// Absent value; never encodable
    Null,
    Bool(bool),
    /// Signed integer, written as the varint of its absolute value
    Int(i64),
    /// Unsigned integer, such as an account number or sequence
    Uint(u64),
    Str(String),
    Bytes(Vec<u8>),
    Array(Vec<Value>),
    Object(Object),
}

/// One named field of an [`Object`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub value: Value,
}

/// A struct to encode: an optional registered type plus its ordered fields
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Object {
    pub type_name: Option<TypeName>,
    pub fields: Vec<Field>,
}

impl Object {
    /// Create an object of a registered type
    pub fn typed(type_name: TypeName) -> Self {
        Self {
            type_name: Some(type_name),
            fields: Vec::new(),
        }
    }

    /// Create an anonymous struct with no type prefix
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Append the next field in declaration order
    pub fn field(mut self, name: &'static str, value: impl Into<Value>) -> Self {
        self.fields.push(Field {
            name,
            value: value.into(),
        });
        self
    }
}

impl Value {
    /// Zero integers, empty strings and empty arrays are omitted from structs
    pub fn is_default(&self) -> bool {
        match self {
            Value::Int(n) => *n == 0,
            Value::Uint(n) => *n == 0,
            Value::Str(s) => s.is_empty(),
            Value::Array(items) => items.is_empty(),
            _ => false,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) | Value::Uint(_) => "integer",
            Value::Str(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    fn typ3(&self) -> Result<u8> {
        match self {
            Value::Bool(_) | Value::Int(_) | Value::Uint(_) => Ok(TYP3_VARINT),
            Value::Str(_) | Value::Bytes(_) | Value::Array(_) | Value::Object(_) => {
                Ok(TYP3_BYTE_LENGTH)
            }
            Value::Null => Err(CodecError::UnsupportedValueKind(self.kind().to_string())),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Uint(n)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Value::Bytes(bytes)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Object> for Value {
    fn from(obj: Object) -> Self {
        Value::Object(obj)
    }
}

/// Encode an object with a varint length prefix
pub fn marshal(value: &Value) -> Result<Vec<u8>> {
    match value {
        Value::Object(obj) => encode_object(obj, true),
        other => Err(CodecError::TypeError(format!(
            "cannot marshal {}: data must be an object",
            other.kind()
        ))),
    }
}

/// Encode an object without its own length prefix
pub fn marshal_bare(value: &Value) -> Result<Vec<u8>> {
    match value {
        Value::Object(obj) => encode_object(obj, false),
        other => Err(CodecError::TypeError(format!(
            "cannot marshal {}: data must be an object",
            other.kind()
        ))),
    }
}

/// Encode any value. `field_index` only matters for arrays, whose elements
/// each repeat the enclosing field's key.
pub fn encode_value(value: &Value, field_index: usize, length_prefixed: bool) -> Result<Vec<u8>> {
    match value {
        Value::Null => Err(CodecError::UnsupportedValueKind(value.kind().to_string())),
        Value::Bytes(bytes) if length_prefixed => Ok(encode_length_prefixed_bytes(bytes)),
        Value::Bytes(bytes) => Ok(bytes.clone()),
        Value::Array(items) => encode_array(field_index, items, length_prefixed),
        Value::Int(n) => Ok(encode_uvarint(n.unsigned_abs())),
        Value::Uint(n) => Ok(encode_uvarint(*n)),
        Value::Bool(b) => Ok(encode_uvarint(u64::from(*b))),
        Value::Str(s) => Ok(encode_length_prefixed_string(s)),
        Value::Object(obj) => encode_object(obj, length_prefixed),
    }
}

fn encode_object(obj: &Object, length_prefixed: bool) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(type_name) = obj.type_name {
        buf.extend_from_slice(&type_name.prefix());
    }

    // Skipped fields still consume their position.
    for (index, field) in obj.fields.iter().enumerate() {
        if RESERVED_FIELDS.contains(&field.name) || field.value.is_default() {
            continue;
        }
        match &field.value {
            Value::Array(items) => buf.extend(encode_array(index, items, false)?),
            value => {
                buf.extend(encode_field_key(index, value)?);
                buf.extend(encode_value(value, index, true)?);
            }
        }
    }

    if length_prefixed {
        let mut prefixed = encode_uvarint(buf.len() as u64);
        prefixed.extend(buf);
        return Ok(prefixed);
    }
    Ok(buf)
}

fn encode_array(field_index: usize, items: &[Value], length_prefixed: bool) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    for item in items {
        buf.extend(encode_field_key(field_index, item)?);
        if item.is_default() {
            buf.push(0x00);
            continue;
        }
        buf.extend(encode_value(item, field_index, true)?);
    }

    if length_prefixed {
        let mut prefixed = encode_uvarint(buf.len() as u64);
        prefixed.extend(buf);
        return Ok(prefixed);
    }
    Ok(buf)
}

fn encode_field_key(index: usize, value: &Value) -> Result<Vec<u8>> {
    let key = ((index as u64 + 1) << 3) | u64::from(value.typ3()?);
    Ok(encode_uvarint(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coin(denom: &str, amount: i64) -> Value {
        Object::anonymous()
            .field("denom", denom)
            .field("amount", amount)
            .into()
    }

    #[test]
    fn test_scalar_fields() {
        let obj: Value = Object::anonymous()
            .field("denom", "BNB")
            .field("amount", 1_i64)
            .into();
        // 0a 03 "BNB" | 10 01
        assert_eq!(hex::encode(marshal_bare(&obj).unwrap()), "0a03424e421001");
        assert_eq!(hex::encode(marshal(&obj).unwrap()), "070a03424e421001");
    }

    #[test]
    fn test_default_fields_keep_their_position() {
        let obj: Value = Object::anonymous()
            .field("memo", "")
            .field("source", 0_i64)
            .field("data", "x")
            .into();
        // only field 3 survives: key (3 << 3) | 2
        assert_eq!(hex::encode(marshal_bare(&obj).unwrap()), "1a0178");
    }

    #[test]
    fn test_booleans_are_never_elided() {
        let obj: Value = Object::anonymous()
            .field("mintable", false)
            .field("frozen", true)
            .into();
        assert_eq!(hex::encode(marshal_bare(&obj).unwrap()), "08001001");
    }

    #[test]
    fn test_reserved_fields_are_skipped() {
        let obj: Value = Object::anonymous()
            .field("msgType", "MsgSend")
            .field("symbol", "BNB")
            .into();
        assert_eq!(hex::encode(marshal_bare(&obj).unwrap()), "1203424e42");
    }

    #[test]
    fn test_type_prefix_inside_length() {
        let obj: Value = Object::typed(TypeName::BurnMsg).field("symbol", "BNB").into();
        assert_eq!(
            hex::encode(marshal(&obj).unwrap()),
            "097ed2d2a00a03424e42"
        );
        assert_eq!(
            hex::encode(marshal_bare(&obj).unwrap()),
            "7ed2d2a00a03424e42"
        );
    }

    #[test]
    fn test_repeated_struct_field() {
        let obj: Value = Object::anonymous()
            .field("coins", vec![coin("A", 1), coin("B", 2)])
            .into();
        // each element: key 0a, length, then the struct body
        assert_eq!(
            hex::encode(marshal_bare(&obj).unwrap()),
            "0a050a014110010a050a01421002"
        );
    }

    #[test]
    fn test_default_array_element_is_single_zero() {
        let items = vec![Value::Int(0), Value::Int(7)];
        assert_eq!(hex::encode(encode_value(&items.into(), 1, false).unwrap()), "10001007");
    }

    #[test]
    fn test_top_level_array_length_prefix() {
        let items: Value = vec![Value::Str("ab".to_string())].into();
        assert_eq!(hex::encode(encode_value(&items, 0, true).unwrap()), "040a026162");
        assert_eq!(hex::encode(encode_value(&items, 0, false).unwrap()), "0a026162");
    }

    #[test]
    fn test_bytes_prefix_only_when_outer() {
        let bytes = Value::Bytes(vec![0xaa, 0xbb]);
        assert_eq!(encode_value(&bytes, 0, true).unwrap(), vec![0x02, 0xaa, 0xbb]);
        assert_eq!(encode_value(&bytes, 0, false).unwrap(), vec![0xaa, 0xbb]);
    }

    #[test]
    fn test_negative_int_encodes_absolute_value() {
        assert_eq!(encode_value(&Value::Int(-5), 0, false).unwrap(), vec![0x05]);
    }

    #[test]
    fn test_null_is_unsupported() {
        assert!(matches!(
            encode_value(&Value::Null, 0, true),
            Err(CodecError::UnsupportedValueKind(_))
        ));

        let obj: Value = Object::anonymous().field("data", Value::Null).into();
        assert!(matches!(
            marshal(&obj),
            Err(CodecError::UnsupportedValueKind(_))
        ));
    }

    #[test]
    fn test_marshal_requires_object() {
        assert!(matches!(
            marshal(&Value::Str("tx".to_string())),
            Err(CodecError::TypeError(_))
        ));
        assert!(matches!(
            marshal_bare(&Value::Int(1)),
            Err(CodecError::TypeError(_))
        ));
    }

    #[test]
    fn test_field_keys_beyond_fifteen_use_two_bytes() {
        let mut obj = Object::anonymous();
        for _ in 0..15 {
            obj = obj.field("pad", 0_i64);
        }
        let obj: Value = obj.field("late", 1_i64).into();
        // field 16: (16 << 3) | 0 = 128 -> 80 01
        assert_eq!(hex::encode(marshal_bare(&obj).unwrap()), "800101");
    }
}
