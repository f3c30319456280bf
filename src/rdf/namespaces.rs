use std::collections::BTreeMap;

use oxrdf::NamedNode;

use crate::types::{FrescoError, Result};

/// Namespace assigned to property names without a prefix.
pub const UNPREFIXED_NS: &str = "info:fresco/unprefixed#";

/// Maps property-name prefixes to namespace IRIs and back.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamespaceRegistry {
    prefixes: BTreeMap<String, String>,
}

impl Default for NamespaceRegistry {
    fn default() -> Self {
        let mut prefixes = BTreeMap::new();
        for (prefix, uri) in [
            ("", UNPREFIXED_NS),
            ("jcr", "http://www.jcp.org/jcr/1.0"),
            ("nt", "http://www.jcp.org/jcr/nt/1.0"),
            ("mix", "http://www.jcp.org/jcr/mix/1.0"),
            ("mode", "http://www.modeshape.org/1.0"),
            ("fedora", "info:fedora/fedora-system:def/internal#"),
            ("dc", "http://purl.org/dc/elements/1.1/"),
            ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
            ("xsd", "http://www.w3.org/2001/XMLSchema#"),
        ] {
            prefixes.insert(prefix.to_owned(), uri.to_owned());
        }
        Self { prefixes }
    }
}

impl NamespaceRegistry {
    /// Registry with no prefixes at all.
    pub fn empty() -> Self {
        Self {
            prefixes: BTreeMap::new(),
        }
    }

    /// Registers or replaces a prefix.
    pub fn register(&mut self, prefix: impl Into<String>, uri: impl Into<String>) {
        self.prefixes.insert(prefix.into(), uri.into());
    }

    pub fn uri(&self, prefix: &str) -> Option<&str> {
        self.prefixes.get(prefix).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.prefixes.iter().map(|(p, u)| (p.as_str(), u.as_str()))
    }

    /// Predicate IRI for a `prefix:local` property name.
    ///
    /// A namespace URI that does not end in `#`, `/` or `:` gains a `/`
    /// before the local name.
    pub fn predicate_for(&self, property: &str) -> Result<NamedNode> {
        let (prefix, local) = split_name(property);
        if local.is_empty() {
            return Err(FrescoError::invalid(format!("empty local name in {property}")));
        }
        let uri = self
            .uri(prefix)
            .ok_or_else(|| FrescoError::invalid(format!("unregistered namespace prefix {prefix:?}")))?;
        NamedNode::new(format!("{}{local}", with_separator(uri)))
            .map_err(|err| FrescoError::invalid(format!("invalid predicate for {property}: {err}")))
    }

    /// Property name for a predicate IRI, using the longest matching
    /// namespace. Returns `None` when no namespace matches.
    pub fn property_for(&self, predicate: &str) -> Option<String> {
        let (prefix, local) = self
            .prefixes
            .iter()
            .filter_map(|(prefix, uri)| {
                let ns = with_separator(uri);
                predicate
                    .strip_prefix(ns.as_str())
                    .filter(|local| !local.is_empty())
                    .map(|local| (prefix, local, ns.len()))
            })
            .max_by_key(|(_, _, len)| *len)
            .map(|(prefix, local, _)| (prefix, local))?;
        if prefix.is_empty() {
            Some(local.to_owned())
        } else {
            Some(format!("{prefix}:{local}"))
        }
    }
}

fn split_name(property: &str) -> (&str, &str) {
    match property.split_once(':') {
        Some((prefix, local)) => (prefix, local),
        None => ("", property),
    }
}

fn with_separator(uri: &str) -> String {
    if uri.ends_with('#') || uri.ends_with('/') || uri.ends_with(':') {
        uri.to_owned()
    } else {
        format!("{uri}/")
    }
}
