//! Client-level view of varbind values

use async_snmp::Value;

use crate::error::SnmpError;

/// A value reduced to what the PDU client consumes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedValue {
    Integer(i64),
    Text(String),
}

/// Reduce a varbind value.
///
/// Integer-like types become integers, octet strings become text (lossy
/// UTF-8). Exception markers are communication failures; every other type
/// is unsupported.
pub fn decode_value(value: &Value) -> Result<DecodedValue, SnmpError> {
    match value {
        Value::Integer(v) => Ok(DecodedValue::Integer(i64::from(*v))),
        Value::Counter32(v) | Value::Gauge32(v) => Ok(DecodedValue::Integer(i64::from(*v))),
        Value::Counter64(v) => i64::try_from(*v)
            .map(DecodedValue::Integer)
            .map_err(|_| SnmpError::UnexpectedValue(format!("Counter64 {} exceeds i64", v))),
        Value::OctetString(bytes) => Ok(DecodedValue::Text(
            String::from_utf8_lossy(bytes).into_owned(),
        )),
        v if v.is_exception() => Err(SnmpError::Exception(type_name(v))),
        other => Err(SnmpError::UnsupportedType(format!(
            "Only SNMP types of type integer and string are supported. Received type of {}",
            type_name(other)
        ))),
    }
}

/// SMI type name for messages
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Integer(_) => "Integer",
        Value::OctetString(_) => "OctetString",
        Value::Null => "Null",
        Value::ObjectIdentifier(_) => "ObjectIdentifier",
        Value::IpAddress(_) => "IpAddress",
        Value::Counter32(_) => "Counter32",
        Value::Gauge32(_) => "Gauge32",
        Value::TimeTicks(_) => "TimeTicks",
        Value::Opaque(_) => "Opaque",
        Value::Counter64(_) => "Counter64",
        Value::NoSuchObject => "noSuchObject",
        Value::NoSuchInstance => "noSuchInstance",
        Value::EndOfMibView => "endOfMibView",
        _ => "unknown",
    }
}
