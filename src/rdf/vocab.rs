//! Repository vocabulary used in generated graphs.

/// Namespace of repository-managed predicates.
pub const FRESCO_NS: &str = "info:fresco/repository#";

pub const HAS_PARENT: &str = "info:fresco/repository#hasParent";
pub const HAS_CHILD: &str = "info:fresco/repository#hasChild";
pub const NUMBER_OF_CHILDREN: &str = "info:fresco/repository#numberOfChildren";
pub const COULD_NOT_STORE_PROPERTY: &str = "info:fresco/repository#couldNotStoreProperty";

/// Property names carrying the node's types in the properties graph.
pub const PRIMARY_TYPE_PROPERTY: &str = "jcr:primaryType";
pub const MIXIN_TYPES_PROPERTY: &str = "jcr:mixinTypes";

/// Context key under which a dataset carries its subject's URI.
pub const URI_SYMBOL: &str = "uri";

/// Named graph holding the tree listing.
pub const TREE_MODEL_NAME: &str = "tree";

/// Named graph holding statements that could not be stored.
pub const PROBLEMS_MODEL_NAME: &str = "problems";

/// Primary type marking internal nodes hidden from tree listings.
pub const INTERNAL_NODE_TYPE: &str = "mode:system";

/// Predicates the repository maintains itself; they never map to stored
/// properties.
pub fn is_managed_predicate(iri: &str) -> bool {
    iri.starts_with(FRESCO_NS)
}

/// Property names that are derived from node types rather than stored.
pub fn is_type_property(name: &str) -> bool {
    name == PRIMARY_TYPE_PROPERTY || name == MIXIN_TYPES_PROPERTY
}
