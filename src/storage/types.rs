use std::fmt;
use std::slice;

use crate::types::Value;

/// Stored representation of a property.
///
/// The variant always matches the property's resolved cardinality: a
/// multi-valued property is a `Multiple` even when it holds one value.
#[derive(Clone, Debug, PartialEq)]
pub enum Property {
    /// Single-valued property.
    Single(Value),
    /// Multi-valued property with values in insertion order.
    Multiple(Vec<Value>),
}

impl Property {
    /// Returns true for multi-valued properties.
    pub fn is_multiple(&self) -> bool {
        matches!(self, Property::Multiple(_))
    }

    /// All values as a slice; a single-valued property yields one element.
    pub fn values(&self) -> &[Value] {
        match self {
            Property::Single(value) => slice::from_ref(value),
            Property::Multiple(values) => values,
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Property::Single(value) => write!(f, "{value}"),
            Property::Multiple(values) => {
                f.write_str("[")?;
                for (idx, value) in values.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str("]")
            }
        }
    }
}
