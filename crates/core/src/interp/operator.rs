//! Decoded content stream operations.
//!
//! A page's content is a flat list of [`Operation`]s: an operator keyword
//! with the operands that preceded it. Inline images arrive as a single
//! `BI` operation carrying the image dictionary and its raw data.

use std::collections::BTreeMap;

/// Operand value on the content stream stack.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Null,
    Bool(bool),
    Int(i64),
    Real(f64),
    /// Name object without the leading slash
    Name(String),
    /// String object bytes (literal or hex)
    String(Vec<u8>),
    Array(Vec<Operand>),
    Dict(BTreeMap<String, Operand>),
}

impl Operand {
    pub fn name(name: &str) -> Self {
        Operand::Name(name.to_string())
    }

    pub fn string(data: impl AsRef<[u8]>) -> Self {
        Operand::String(data.as_ref().to_vec())
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Operand::Int(n) => Some(n as f64),
            Operand::Real(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Operand::Int(n) => Some(n),
            Operand::Real(n) => Some(n as i64),
            _ => None,
        }
    }

    pub fn as_name(&self) -> Option<&str> {
        match self {
            Operand::Name(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Operand::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Operand]> {
        match self {
            Operand::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&BTreeMap<String, Operand>> {
        match self {
            Operand::Dict(d) => Some(d),
            _ => None,
        }
    }
}

impl From<f64> for Operand {
    fn from(n: f64) -> Self {
        Operand::Real(n)
    }
}

impl From<i64> for Operand {
    fn from(n: i64) -> Self {
        Operand::Int(n)
    }
}

impl From<i32> for Operand {
    fn from(n: i32) -> Self {
        Operand::Int(n.into())
    }
}

impl From<bool> for Operand {
    fn from(b: bool) -> Self {
        Operand::Bool(b)
    }
}

impl<T: Into<Operand>> From<Vec<T>> for Operand {
    fn from(items: Vec<T>) -> Self {
        Operand::Array(items.into_iter().map(Into::into).collect())
    }
}

/// One operator with its operands in stream order.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub operator: String,
    pub operands: Vec<Operand>,
}

impl Operation {
    pub fn new(operator: &str, operands: Vec<Operand>) -> Self {
        Self {
            operator: operator.to_string(),
            operands,
        }
    }

    /// Operation without operands.
    pub fn bare(operator: &str) -> Self {
        Self::new(operator, Vec::new())
    }

    /// Inline image: `BI` with its dictionary and data.
    pub fn inline_image(dict: BTreeMap<String, Operand>, data: Vec<u8>) -> Self {
        Self::new("BI", vec![Operand::Dict(dict), Operand::String(data)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_conversions() {
        assert_eq!(Operand::Int(3).as_f64(), Some(3.0));
        assert_eq!(Operand::Real(2.9).as_i64(), Some(2));
        assert_eq!(Operand::name("F1").as_f64(), None);
    }

    #[test]
    fn arrays_from_vectors() {
        let op = Operand::from(vec![1.0, 2.5]);
        assert_eq!(
            op.as_array(),
            Some(&[Operand::Real(1.0), Operand::Real(2.5)][..])
        );
    }

    #[test]
    fn inline_image_layout() {
        let mut dict = BTreeMap::new();
        dict.insert("W".to_string(), Operand::Int(2));
        let op = Operation::inline_image(dict, vec![1, 2]);
        assert_eq!(op.operator, "BI");
        assert!(op.operands[0].as_dict().is_some());
        assert_eq!(op.operands[1].as_bytes(), Some(&[1u8, 2][..]));
    }
}
