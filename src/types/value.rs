use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use super::{FrescoError, NodePath};

/// Declared value type of a property.
///
/// `Undefined` is what schema lookups yield when a property has no
/// declaration; callers treat it as "accept any type".
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum PropertyType {
    #[serde(rename = "undefined")]
    Undefined,
    String,
    Binary,
    Long,
    Double,
    Boolean,
    Date,
    Name,
    Path,
    Reference,
    #[serde(rename = "URI")]
    Uri,
}

impl PropertyType {
    pub fn name(self) -> &'static str {
        match self {
            PropertyType::Undefined => "undefined",
            PropertyType::String => "String",
            PropertyType::Binary => "Binary",
            PropertyType::Long => "Long",
            PropertyType::Double => "Double",
            PropertyType::Boolean => "Boolean",
            PropertyType::Date => "Date",
            PropertyType::Name => "Name",
            PropertyType::Path => "Path",
            PropertyType::Reference => "Reference",
            PropertyType::Uri => "URI",
        }
    }

    /// Whether a value of type `other` may be stored under this declaration.
    pub fn accepts(self, other: PropertyType) -> bool {
        self == PropertyType::Undefined || self == other
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PropertyType {
    type Err = FrescoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ty = match s {
            "undefined" => PropertyType::Undefined,
            "String" => PropertyType::String,
            "Binary" => PropertyType::Binary,
            "Long" => PropertyType::Long,
            "Double" => PropertyType::Double,
            "Boolean" => PropertyType::Boolean,
            "Date" => PropertyType::Date,
            "Name" => PropertyType::Name,
            "Path" => PropertyType::Path,
            "Reference" => PropertyType::Reference,
            "URI" => PropertyType::Uri,
            other => return Err(FrescoError::invalid(format!("unknown property type {other}"))),
        };
        Ok(ty)
    }
}

/// Atomic typed datum held by a property.
///
/// Equality compares both the variant and the payload, so `String("1")`
/// and `Long(1)` are distinct values.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    String(String),
    Binary(Vec<u8>),
    Long(i64),
    Double(f64),
    Boolean(bool),
    Date(OffsetDateTime),
    /// Namespace-qualified name such as `nt:folder`.
    Name(String),
    /// Repository path stored as text.
    Path(String),
    /// Reference to another node by path.
    Reference(NodePath),
    Uri(String),
}

impl Value {
    pub fn string(value: impl Into<String>) -> Self {
        Value::String(value.into())
    }

    pub fn name(value: impl Into<String>) -> Self {
        Value::Name(value.into())
    }

    pub fn property_type(&self) -> PropertyType {
        match self {
            Value::String(_) => PropertyType::String,
            Value::Binary(_) => PropertyType::Binary,
            Value::Long(_) => PropertyType::Long,
            Value::Double(_) => PropertyType::Double,
            Value::Boolean(_) => PropertyType::Boolean,
            Value::Date(_) => PropertyType::Date,
            Value::Name(_) => PropertyType::Name,
            Value::Path(_) => PropertyType::Path,
            Value::Reference(_) => PropertyType::Reference,
            Value::Uri(_) => PropertyType::Uri,
        }
    }

    /// Parses an RFC 3339 timestamp into a `Date` value.
    pub fn date(raw: &str) -> Result<Self, FrescoError> {
        OffsetDateTime::parse(raw, &Rfc3339)
            .map(Value::Date)
            .map_err(|err| FrescoError::invalid(format!("invalid date {raw}: {err}")))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(v) | Value::Name(v) | Value::Path(v) | Value::Uri(v) => f.write_str(v),
            Value::Binary(v) => write!(f, "binary(len={})", v.len()),
            Value::Long(v) => write!(f, "{v}"),
            Value::Double(v) => write!(f, "{v}"),
            Value::Boolean(v) => write!(f, "{v}"),
            Value::Date(v) => match v.format(&Rfc3339) {
                Ok(text) => f.write_str(&text),
                Err(_) => write!(f, "date({})", v.unix_timestamp()),
            },
            Value::Reference(path) => write!(f, "ref({path})"),
        }
    }
}
