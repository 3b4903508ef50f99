//! Boundary value representation.

use crate::handle::HandleId;
use crate::ContractError;
use fhex::ToHex;
use std::fmt;

/// Type of a value crossing the module boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    I32,
    I64,
    F32,
    F64,
    Handle,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::I32 => "i32",
            ValueType::I64 => "i64",
            ValueType::F32 => "f32",
            ValueType::F64 => "f64",
            ValueType::Handle => "handle",
        };
        write!(f, "{name}")
    }
}

/// Runtime representation of values crossing the boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    /// Opaque reference to state owned by the module. `None` is the null handle.
    Handle(Option<HandleId>),
}

impl Value {
    /// Get the boundary type of this value
    pub fn typ(&self) -> ValueType {
        match self {
            Value::I32(_) => ValueType::I32,
            Value::I64(_) => ValueType::I64,
            Value::F32(_) => ValueType::F32,
            Value::F64(_) => ValueType::F64,
            Value::Handle(_) => ValueType::Handle,
        }
    }

    /// Convert to i32, returning None if wrong type
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::I32(v) => Some(*v),
            _ => None,
        }
    }

    /// Convert to i64, returning None if wrong type
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::I64(v) => Some(*v),
            _ => None,
        }
    }

    /// Convert to f32, returning None if wrong type
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Value::F32(v) => Some(*v),
            _ => None,
        }
    }

    /// Convert to f64, returning None if wrong type
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::F64(v) => Some(*v),
            _ => None,
        }
    }

    /// Convert to a non-null handle, returning None for anything else
    pub fn as_handle(&self) -> Option<HandleId> {
        match self {
            Value::Handle(Some(id)) => Some(*id),
            _ => None,
        }
    }

    /// Create from a type tag and literal string, as found in check scripts.
    ///
    /// Floats accept raw bit patterns (decimal or `0x`-prefixed hex) and fall
    /// back to decimal float notation.
    pub fn from_strings(typ: &str, value: &str) -> Result<Self, ContractError> {
        match typ {
            "i32" => value
                .parse::<u32>()
                .map(|v| Value::I32(v as i32))
                .or_else(|_| value.parse::<i32>().map(Value::I32))
                .map_err(|e| ContractError::InvalidLiteral(format!("i32 '{value}': {e}"))),
            "i64" => value
                .parse::<u64>()
                .map(|v| Value::I64(v as i64))
                .or_else(|_| value.parse::<i64>().map(Value::I64))
                .map_err(|e| ContractError::InvalidLiteral(format!("i64 '{value}': {e}"))),
            "f32" => {
                if let Some(hex) = value.strip_prefix("0x") {
                    u32::from_str_radix(hex, 16)
                        .map(|bits| Value::F32(f32::from_bits(bits)))
                        .map_err(|e| ContractError::InvalidLiteral(format!("f32 '{value}': {e}")))
                } else {
                    value
                        .parse::<u32>()
                        .map(|bits| Value::F32(f32::from_bits(bits)))
                        .or_else(|_| value.parse::<f32>().map(Value::F32))
                        .map_err(|e| ContractError::InvalidLiteral(format!("f32 '{value}': {e}")))
                }
            }
            "f64" => {
                if let Some(hex) = value.strip_prefix("0x") {
                    u64::from_str_radix(hex, 16)
                        .map(|bits| Value::F64(f64::from_bits(bits)))
                        .map_err(|e| ContractError::InvalidLiteral(format!("f64 '{value}': {e}")))
                } else {
                    value
                        .parse::<u64>()
                        .map(|bits| Value::F64(f64::from_bits(bits)))
                        .or_else(|_| value.parse::<f64>().map(Value::F64))
                        .map_err(|e| ContractError::InvalidLiteral(format!("f64 '{value}': {e}")))
                }
            }
            t => Err(ContractError::InvalidLiteral(format!("unknown value type: {t}"))),
        }
    }

    /// Literal equality: integers by value, floats by bit pattern, handles by id.
    ///
    /// NaN payloads and signed zeros are distinguished, the way a literal
    /// assertion distinguishes them.
    pub fn bits_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::I32(a), Value::I32(b)) => a == b,
            (Value::I64(a), Value::I64(b)) => a == b,
            (Value::F32(a), Value::F32(b)) => a.to_bits() == b.to_bits(),
            (Value::F64(a), Value::F64(b)) => a.to_bits() == b.to_bits(),
            (Value::Handle(a), Value::Handle(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::I32(v) => write!(f, "i32:{v}"),
            Value::I64(v) => write!(f, "i64:{v}"),
            Value::F32(v) => write!(f, "f32:{}", v.to_hex()),
            Value::F64(v) => write!(f, "f64:{}", v.to_hex()),
            Value::Handle(Some(id)) => write!(f, "{id}"),
            Value::Handle(None) => write!(f, "handle:null"),
        }
    }
}

/// Compare a vector of results against expected values.
///
/// Returns `Ok(())` if all match, or the first mismatch with its index.
pub fn match_results(actual: &[Value], expected: &[Value]) -> Result<(), ContractError> {
    if actual.len() != expected.len() {
        return Err(ContractError::Mismatch(format!(
            "result count mismatch: expected {}, got {}",
            expected.len(),
            actual.len()
        )));
    }
    for (i, (got, want)) in actual.iter().zip(expected).enumerate() {
        if !got.bits_eq(want) {
            return Err(ContractError::Mismatch(format!(
                "result {i}: expected {want}, got {got}"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_type() {
        assert_eq!(Value::I32(42).typ(), ValueType::I32);
        assert_eq!(Value::I64(42).typ(), ValueType::I64);
        assert_eq!(Value::F32(42.0).typ(), ValueType::F32);
        assert_eq!(Value::F64(42.0).typ(), ValueType::F64);
        assert_eq!(Value::Handle(None).typ(), ValueType::Handle);
    }

    #[test]
    fn test_value_conversions() {
        assert_eq!(Value::I32(42).as_i32(), Some(42));
        assert_eq!(Value::I32(42).as_i64(), None);
        assert_eq!(Value::I64(42).as_i64(), Some(42));
        assert_eq!(Value::F32(42.0).as_f32(), Some(42.0));
        assert_eq!(Value::F64(42.0).as_f64(), Some(42.0));
        assert_eq!(Value::Handle(Some(HandleId(3))).as_handle(), Some(HandleId(3)));
        assert_eq!(Value::Handle(None).as_handle(), None);
        assert_eq!(Value::I32(42).as_handle(), None);
    }

    #[test]
    fn test_from_strings() {
        assert_eq!(Value::from_strings("i32", "42").unwrap(), Value::I32(42));
        assert_eq!(Value::from_strings("i32", "-7").unwrap(), Value::I32(-7));
        assert_eq!(
            Value::from_strings("i32", "4294967295").unwrap(),
            Value::I32(-1)
        );
        assert_eq!(Value::from_strings("i64", "42").unwrap(), Value::I64(42));

        // Bit-pattern and hex forms
        assert_eq!(
            Value::from_strings("f32", "1109917696").unwrap(),
            Value::F32(42.0)
        );
        assert_eq!(
            Value::from_strings("f64", "0x3ff0000000000000").unwrap(),
            Value::F64(1.0)
        );

        // Decimal float fallback
        assert_eq!(Value::from_strings("f64", "2.5").unwrap(), Value::F64(2.5));

        assert!(Value::from_strings("invalid", "42").is_err());
        assert!(Value::from_strings("handle", "0").is_err());
    }

    #[test]
    fn test_bits_eq() {
        assert!(Value::I32(3).bits_eq(&Value::I32(3)));
        assert!(!Value::I32(3).bits_eq(&Value::I64(3)));
        assert!(Value::F64(1.0).bits_eq(&Value::F64(1.0)));
        assert!(!Value::F64(0.0).bits_eq(&Value::F64(-0.0)));

        // NaNs with the same payload are literally equal
        let nan = f64::from_bits(0x7ff8000000000001);
        assert!(Value::F64(nan).bits_eq(&Value::F64(nan)));
        assert!(!Value::F64(nan).bits_eq(&Value::F64(f64::NAN)));
    }

    #[test]
    fn test_match_results() {
        let actual = vec![Value::I32(1), Value::F64(2.0)];
        assert!(match_results(&actual, &[Value::I32(1), Value::F64(2.0)]).is_ok());

        let err = match_results(&actual, &[Value::I32(1)]).unwrap_err();
        assert!(err.to_string().contains("count mismatch"));

        let err = match_results(&actual, &[Value::I32(1), Value::F64(3.0)]).unwrap_err();
        assert!(err.to_string().contains("result 1"));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Value::I32(42)), "i32:42");
        assert_eq!(format!("{}", Value::Handle(Some(HandleId(2)))), "handle#2");
        assert_eq!(format!("{}", Value::Handle(None)), "handle:null");
        // fhex formats the float payload, just check the tag
        assert!(format!("{}", Value::F32(42.0)).starts_with("f32:"));
        assert!(format!("{}", Value::F64(42.0)).starts_with("f64:"));
    }
}
