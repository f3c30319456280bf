//! Conversion between stored values and RDF terms.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use oxrdf::vocab::xsd;
use oxrdf::{Literal, NamedNode, NamedNodeRef, Term};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::storage::NodeStore;
use crate::types::{FrescoError, NodePath, PropertyType, Result, Value};

use super::listener::RejectReason;
use super::subjects::GraphSubjects;

/// Outcome of converting an inbound term; a rejection is not an error.
pub type Conversion = std::result::Result<Value, RejectReason>;

/// RDF object for a stored value.
pub fn value_to_term(value: &Value, subjects: &dyn GraphSubjects) -> Result<Term> {
    let term = match value {
        Value::String(v) | Value::Name(v) | Value::Path(v) => {
            Literal::new_simple_literal(v.as_str()).into()
        }
        Value::Long(v) => Literal::new_typed_literal(v.to_string(), xsd::LONG).into(),
        Value::Double(v) => Literal::new_typed_literal(double_lexical(*v), xsd::DOUBLE).into(),
        Value::Boolean(v) => Literal::new_typed_literal(v.to_string(), xsd::BOOLEAN).into(),
        Value::Date(v) => {
            let lexical = v
                .format(&Rfc3339)
                .map_err(|err| FrescoError::invalid(format!("unformattable date: {err}")))?;
            Literal::new_typed_literal(lexical, xsd::DATE_TIME).into()
        }
        Value::Binary(bytes) => {
            Literal::new_typed_literal(STANDARD.encode(bytes), xsd::BASE_64_BINARY).into()
        }
        Value::Reference(path) => subjects.subject_for(path)?.into(),
        Value::Uri(iri) => NamedNode::new(iri.as_str())
            .map_err(|err| FrescoError::invalid(format!("invalid URI value {iri}: {err}")))?
            .into(),
    };
    Ok(term)
}

/// xsd:double lexical form; infinities are spelled `INF` and `-INF`.
fn double_lexical(v: f64) -> String {
    if v == f64::INFINITY {
        "INF".to_owned()
    } else if v == f64::NEG_INFINITY {
        "-INF".to_owned()
    } else {
        v.to_string()
    }
}

fn parse_double(lexical: &str) -> Option<f64> {
    match lexical {
        "INF" | "+INF" => Some(f64::INFINITY),
        "-INF" => Some(f64::NEG_INFINITY),
        other => other.parse().ok(),
    }
}

/// Stored value for an inbound RDF object, given the property's declared
/// type. `Undefined` infers the type from the term itself.
///
/// The outer result carries storage failures; the inner one carries
/// statements that cannot be mapped.
pub fn term_to_value(
    term: &Term,
    declared: PropertyType,
    store: &dyn NodeStore,
    subjects: &dyn GraphSubjects,
) -> Result<Conversion> {
    match term {
        Term::Literal(literal) => Ok(literal_to_value(literal, declared, store)?),
        Term::NamedNode(node) => named_node_to_value(node, declared, store, subjects),
        Term::BlankNode(_) => Ok(Err(RejectReason::BlankNode)),
        #[allow(unreachable_patterns)]
        _ => Ok(Err(RejectReason::UnsupportedTerm)),
    }
}

fn named_node_to_value(
    node: &NamedNode,
    declared: PropertyType,
    store: &dyn NodeStore,
    subjects: &dyn GraphSubjects,
) -> Result<Conversion> {
    let iri = node.as_str();
    match declared {
        PropertyType::Undefined | PropertyType::Reference => {
            if let Some(path) = subjects.path_for(iri) {
                if store.node_exists(&path)? {
                    return Ok(Ok(Value::Reference(path)));
                }
            }
            if declared == PropertyType::Reference {
                Ok(Err(RejectReason::MissingReference(iri.to_owned())))
            } else {
                Ok(Ok(Value::Uri(iri.to_owned())))
            }
        }
        PropertyType::Uri => Ok(Ok(Value::Uri(iri.to_owned()))),
        PropertyType::String => Ok(Ok(Value::String(iri.to_owned()))),
        target => Ok(Err(RejectReason::Conversion {
            lexical: iri.to_owned(),
            target,
        })),
    }
}

fn literal_to_value(literal: &Literal, declared: PropertyType, store: &dyn NodeStore) -> Result<Conversion> {
    let lexical = literal.value();
    let target = match declared {
        PropertyType::Undefined => infer_type(literal.datatype()),
        other => other,
    };
    let reject = || RejectReason::Conversion {
        lexical: lexical.to_owned(),
        target,
    };
    let converted = match target {
        PropertyType::String | PropertyType::Undefined => Ok(Value::String(lexical.to_owned())),
        PropertyType::Name => Ok(Value::Name(lexical.to_owned())),
        PropertyType::Path => Ok(Value::Path(lexical.to_owned())),
        PropertyType::Long => lexical.parse::<i64>().map(Value::Long).map_err(|_| reject()),
        PropertyType::Double => parse_double(lexical).map(Value::Double).ok_or_else(reject),
        PropertyType::Boolean => match lexical {
            "true" | "1" => Ok(Value::Boolean(true)),
            "false" | "0" => Ok(Value::Boolean(false)),
            _ => Err(reject()),
        },
        PropertyType::Date => OffsetDateTime::parse(lexical, &Rfc3339)
            .map(Value::Date)
            .map_err(|_| reject()),
        PropertyType::Binary => STANDARD.decode(lexical).map(Value::Binary).map_err(|_| reject()),
        PropertyType::Uri => NamedNode::new(lexical)
            .map(|node| Value::Uri(node.into_string()))
            .map_err(|_| reject()),
        PropertyType::Reference => match NodePath::new(lexical) {
            Ok(path) if store.node_exists(&path)? => Ok(Value::Reference(path)),
            _ => Err(RejectReason::MissingReference(lexical.to_owned())),
        },
    };
    Ok(converted)
}

fn infer_type(datatype: NamedNodeRef<'_>) -> PropertyType {
    if datatype == xsd::LONG
        || datatype == xsd::INTEGER
        || datatype == xsd::INT
        || datatype == xsd::SHORT
        || datatype == xsd::BYTE
    {
        PropertyType::Long
    } else if datatype == xsd::DOUBLE || datatype == xsd::FLOAT || datatype == xsd::DECIMAL {
        PropertyType::Double
    } else if datatype == xsd::BOOLEAN {
        PropertyType::Boolean
    } else if datatype == xsd::DATE_TIME {
        PropertyType::Date
    } else if datatype == xsd::BASE_64_BINARY {
        PropertyType::Binary
    } else if datatype == xsd::ANY_URI {
        PropertyType::Uri
    } else {
        PropertyType::String
    }
}
