#![allow(missing_docs)]
#![allow(clippy::all)]

use std::sync::Arc;

use fresco::rdf::vocab::{HAS_CHILD, HAS_PARENT, NUMBER_OF_CHILDREN};
use fresco::storage::props;
use fresco::{FrescoConfig, FrescoError, MemoryStore, NodePath, NodeStore, Repository, Result, Value, Window};
use oxrdf::vocab::xsd;
use oxrdf::{Graph, Literal, NamedNode, NamedNodeRef, Term, TripleRef};

const BASE: &str = "http://localhost:8080/rest";
const DC_TITLE: &str = "http://purl.org/dc/elements/1.1/title";
const DC_SUBJECT: &str = "http://purl.org/dc/elements/1.1/subject";
const PRIMARY_TYPE: &str = "http://www.jcp.org/jcr/1.0/primaryType";
const MIXIN_TYPES: &str = "http://www.jcp.org/jcr/1.0/mixinTypes";

fn subject(path: &str) -> NamedNode {
    NamedNode::new_unchecked(format!("{BASE}{path}"))
}

fn node(path: &str) -> Term {
    subject(path).into()
}

fn simple(value: &str) -> Term {
    Literal::new_simple_literal(value).into()
}

fn long(lexical: &str) -> Term {
    Literal::new_typed_literal(lexical, xsd::LONG).into()
}

fn objects(graph: &Graph, s: &NamedNode, p: &str) -> Vec<Term> {
    let mut found: Vec<Term> = graph
        .objects_for_subject_predicate(s, NamedNodeRef::new_unchecked(p))
        .map(|t| t.into_owned())
        .collect();
    found.sort_by_key(|t| t.to_string());
    found
}

/// `/objects` with four visible children and one internal child.
fn repository() -> Result<Repository> {
    let store = Arc::new(MemoryStore::default());
    let parent = NodePath::new("/objects")?;
    store.add_node(&parent, "nt:folder")?;
    for name in ["a", "b", "c"] {
        let child = parent.child(name)?;
        store.add_node(&child, "nt:folder")?;
        store.add_mixin(&child, "fedora:object")?;
        props::append_or_replace(store.as_ref(), &child, "dc:title", Value::string(name.to_uppercase()))?;
    }
    store.add_node(&parent.child("internal")?, "mode:system")?;
    store.add_node(&parent.child("d")?, "nt:unstructured")?;
    Ok(Repository::new(store, FrescoConfig::default()))
}

#[test]
fn properties_graph_holds_one_triple_per_value() -> Result<()> {
    let repository = repository()?;
    let path = NodePath::new("/objects/a")?;
    for topic in ["rust", "rdf"] {
        props::append_or_replace(repository.store(), &path, "dc:subject", Value::string(topic))?;
    }

    let dataset = repository.dataset_unbounded(&path)?;
    let graph = dataset.default_graph();
    let s = subject("/objects/a");
    assert_eq!(objects(graph, &s, DC_TITLE), vec![simple("A")]);
    assert_eq!(
        objects(graph, &s, DC_SUBJECT),
        vec![
            simple("rdf"),
            simple("rust")
        ]
    );
    assert_eq!(
        objects(graph, &s, PRIMARY_TYPE),
        vec![simple("nt:folder")]
    );
    assert_eq!(
        objects(graph, &s, MIXIN_TYPES),
        vec![simple("fedora:object")]
    );
    Ok(())
}

#[test]
fn typed_values_become_typed_literals() -> Result<()> {
    let repository = repository()?;
    let path = NodePath::new("/objects/d")?;
    props::append_or_replace(repository.store(), &path, "dc:format", Value::Long(12))?;
    let dataset = repository.dataset_unbounded(&path)?;
    let found = objects(
        dataset.default_graph(),
        &subject("/objects/d"),
        "http://purl.org/dc/elements/1.1/format",
    );
    assert_eq!(found, vec![long("12")]);
    Ok(())
}

#[test]
fn tree_graph_lists_visible_children_and_counts_them() -> Result<()> {
    let repository = repository()?;
    let dataset = repository.dataset_unbounded(&NodePath::new("/objects")?)?;
    let tree = dataset.tree().cloned().unwrap_or_default();
    let s = subject("/objects");

    let children = objects(&tree, &s, HAS_CHILD);
    let expected: Vec<Term> = ["/objects/a", "/objects/b", "/objects/c", "/objects/d"]
        .iter()
        .map(|p| node(p))
        .collect();
    assert_eq!(children, expected);
    assert_eq!(
        objects(&tree, &s, NUMBER_OF_CHILDREN),
        vec![long("4")]
    );
    assert_eq!(objects(&tree, &s, HAS_PARENT), vec![node("/")]);
    assert!(tree.contains(TripleRef::new(
        subject("/objects/b").as_ref(),
        NamedNodeRef::new_unchecked(HAS_PARENT),
        s.as_ref(),
    )));
    assert!(objects(&tree, &subject("/objects/internal"), PRIMARY_TYPE).is_empty());
    Ok(())
}

#[test]
fn window_limits_listed_children_but_not_the_count() -> Result<()> {
    let repository = repository()?;
    let path = NodePath::new("/objects")?;
    let dataset = repository.dataset(&path, Window::new(1, Some(2)))?;
    let tree = dataset.tree().cloned().unwrap_or_default();
    let s = subject("/objects");

    assert_eq!(
        objects(&tree, &s, HAS_CHILD),
        vec![node("/objects/b"), node("/objects/c")]
    );
    assert_eq!(
        objects(&tree, &subject("/objects/b"), DC_TITLE),
        vec![simple("B")]
    );
    assert!(objects(&tree, &subject("/objects/a"), DC_TITLE).is_empty());
    assert_eq!(
        objects(&tree, &s, NUMBER_OF_CHILDREN),
        vec![long("4")]
    );

    let everything = repository.dataset(&path, Window::from_signed(0, -1))?;
    let tree = everything.tree().cloned().unwrap_or_default();
    assert_eq!(objects(&tree, &s, HAS_CHILD).len(), 4);

    let past_end = repository.dataset(&path, Window::new(10, Some(5)))?;
    let tree = past_end.tree().cloned().unwrap_or_default();
    assert!(objects(&tree, &s, HAS_CHILD).is_empty());
    Ok(())
}

#[test]
fn default_limit_comes_from_config() -> Result<()> {
    let store = Arc::new(MemoryStore::default());
    let parent = NodePath::new("/many")?;
    for i in 0..5 {
        store.find_or_create(&parent.child(&format!("n{i}"))?, "nt:unstructured")?;
    }
    let config = FrescoConfig::from_toml_str("default_limit = 2")?;
    let repository = Repository::new(store, config);
    let dataset = repository.dataset_default(&parent)?;
    let tree = dataset.tree().cloned().unwrap_or_default();
    assert_eq!(objects(&tree, &subject("/many"), HAS_CHILD).len(), 2);
    Ok(())
}

#[test]
fn dataset_carries_subject_uri_and_empty_problems() -> Result<()> {
    let repository = repository()?;
    let dataset = repository.dataset_unbounded(&NodePath::new("/objects/c")?)?;
    assert_eq!(dataset.subject_uri(), Some("http://localhost:8080/rest/objects/c"));
    assert!(dataset.problems().map_or(false, Graph::is_empty));
    Ok(())
}

#[test]
fn root_has_no_parent_and_hides_the_catalog() -> Result<()> {
    let repository = repository()?;
    repository
        .catalog()
        .register(repository.store(), "nt:folder", fresco::extract::TREE_EXTRACTOR_ID)?;
    let dataset = repository.dataset_unbounded(&NodePath::root())?;
    let tree = dataset.tree().cloned().unwrap_or_default();
    let root = subject("/");
    assert!(objects(&tree, &root, HAS_PARENT).is_empty());
    assert_eq!(objects(&tree, &root, HAS_CHILD), vec![node("/objects")]);
    Ok(())
}

#[test]
fn configured_namespaces_name_predicates() -> Result<()> {
    let store = Arc::new(MemoryStore::default());
    let path = NodePath::new("/doc")?;
    store.add_node(&path, "nt:unstructured")?;
    props::append_or_replace(store.as_ref(), &path, "ex:shelf", Value::string("top"))?;
    let config = FrescoConfig::from_toml_str(
        r#"
        base_uri = "http://example.org/repo/"
        [namespaces]
        ex = "http://example.org/ns#"
        "#,
    )?;
    let repository = Repository::new(store, config);
    let dataset = repository.dataset_unbounded(&path)?;
    let s = NamedNode::new_unchecked("http://example.org/repo/doc");
    assert_eq!(
        objects(dataset.default_graph(), &s, "http://example.org/ns#shelf"),
        vec![simple("top")]
    );
    Ok(())
}

#[test]
fn unregistered_prefix_fails_the_read() -> Result<()> {
    let repository = repository()?;
    let path = NodePath::new("/objects/d")?;
    props::append_or_replace(repository.store(), &path, "ex:shelf", Value::string("top"))?;
    let err = repository.dataset_unbounded(&path).err();
    assert!(matches!(err, Some(FrescoError::Invalid(_))));
    Ok(())
}

#[test]
fn unprefixed_names_use_the_default_namespace() -> Result<()> {
    let repository = repository()?;
    let path = NodePath::new("/objects/d")?;
    props::append_or_replace(repository.store(), &path, "note", Value::string("hi"))?;
    let dataset = repository.dataset_unbounded(&path)?;
    let predicate = format!("{}note", fresco::rdf::namespaces::UNPREFIXED_NS);
    assert_eq!(
        objects(dataset.default_graph(), &subject("/objects/d"), &predicate),
        vec![simple("hi")]
    );
    Ok(())
}

#[test]
fn missing_node_is_an_error() -> Result<()> {
    let repository = repository()?;
    let err = repository.dataset_unbounded(&NodePath::new("/objects/zzz")?).err();
    assert!(matches!(err, Some(FrescoError::NodeNotFound(_))));
    Ok(())
}
