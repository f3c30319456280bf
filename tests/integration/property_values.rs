#![allow(missing_docs)]
#![allow(clippy::all)]

use fresco::storage::{props, resolver};
use fresco::{FrescoError, MemoryStore, NodePath, NodeStore, Property, PropertyType, Result, Value};
use proptest::prelude::*;

fn object_store() -> Result<(MemoryStore, NodePath)> {
    let store = MemoryStore::default();
    let path = NodePath::new("/objects/book")?;
    store.find_or_create(&path, "nt:folder")?;
    store.add_mixin(&path, "fedora:object")?;
    Ok((store, path))
}

#[test]
fn single_valued_property_is_overwritten() -> Result<()> {
    let (store, path) = object_store()?;
    props::append_or_replace(&store, &path, "dc:title", Value::string("A"))?;
    props::append_or_replace(&store, &path, "dc:title", Value::string("B"))?;
    assert_eq!(
        store.property(&path, "dc:title")?,
        Some(Property::Single(Value::string("B")))
    );
    Ok(())
}

#[test]
fn multi_valued_property_appends_without_duplicates() -> Result<()> {
    let (store, path) = object_store()?;
    for subject in ["x", "y", "x"] {
        props::append_or_replace(&store, &path, "dc:subject", Value::string(subject))?;
    }
    assert_eq!(
        store.property(&path, "dc:subject")?,
        Some(Property::Multiple(vec![Value::string("x"), Value::string("y")]))
    );

    props::remove_value(&store, &path, "dc:subject", &Value::string("x"))?;
    assert_eq!(
        store.property(&path, "dc:subject")?,
        Some(Property::Multiple(vec![Value::string("y")]))
    );
    props::remove_value(&store, &path, "dc:subject", &Value::string("y"))?;
    assert_eq!(store.property(&path, "dc:subject")?, None);
    Ok(())
}

#[test]
fn removing_a_value_that_is_not_stored_changes_nothing() -> Result<()> {
    let (store, path) = object_store()?;
    props::append_or_replace(&store, &path, "dc:title", Value::string("A"))?;
    props::remove_value(&store, &path, "dc:title", &Value::string("B"))?;
    props::remove_value(&store, &path, "dc:creator", &Value::string("nobody"))?;
    assert_eq!(
        store.property(&path, "dc:title")?,
        Some(Property::Single(Value::string("A")))
    );
    assert_eq!(store.property(&path, "dc:creator")?, None);
    Ok(())
}

#[test]
fn undeclared_properties_default_to_multi_valued_and_untyped() -> Result<()> {
    let (store, path) = object_store()?;
    assert!(resolver::is_multivalued(&store, &path, "ex:note")?);
    assert_eq!(resolver::property_type(&store, &path, "ex:note")?, PropertyType::Undefined);
    assert!(!resolver::is_multivalued(&store, &path, "dc:title")?);
    assert_eq!(resolver::property_type(&store, &path, "dc:title")?, PropertyType::String);

    props::append_or_replace(&store, &path, "ex:note", Value::Long(1))?;
    assert_eq!(
        store.property(&path, "ex:note")?,
        Some(Property::Multiple(vec![Value::Long(1)]))
    );
    Ok(())
}

#[test]
fn undeclared_property_rejects_a_bare_scalar() -> Result<()> {
    let (store, path) = object_store()?;
    let scalar = store.set_property(&path, "ex:note", Property::Single(Value::string("draft")));
    assert!(matches!(scalar, Err(FrescoError::Storage(_))));

    props::append_or_replace(&store, &path, "ex:note", Value::string("draft"))?;
    props::append_or_replace(&store, &path, "ex:note", Value::string("final"))?;
    assert_eq!(
        store.property(&path, "ex:note")?,
        Some(Property::Multiple(vec![Value::string("draft"), Value::string("final")]))
    );
    Ok(())
}

#[test]
fn values_of_different_types_are_distinct() -> Result<()> {
    let (store, path) = object_store()?;
    props::append_or_replace(&store, &path, "ex:mixed", Value::string("1"))?;
    props::append_or_replace(&store, &path, "ex:mixed", Value::Long(1))?;
    let stored = store.property(&path, "ex:mixed")?;
    assert_eq!(stored.map(|p| p.values().len()), Some(2));
    Ok(())
}

#[test]
fn declared_type_mismatch_is_a_storage_failure() -> Result<()> {
    let (store, path) = object_store()?;
    let err = props::append_or_replace(&store, &path, "dc:title", Value::Long(3)).err();
    assert!(matches!(err, Some(fresco::FrescoError::Storage(_))));
    Ok(())
}

#[test]
fn missing_node_is_reported() -> Result<()> {
    let store = MemoryStore::default();
    let path = NodePath::new("/nowhere")?;
    let err = props::append_or_replace(&store, &path, "dc:title", Value::string("A")).err();
    assert!(matches!(err, Some(fresco::FrescoError::NodeNotFound(_))));
    Ok(())
}

fn dedup(values: &[String]) -> Vec<String> {
    let mut seen = Vec::new();
    for value in values {
        if !seen.contains(value) {
            seen.push(value.clone());
        }
    }
    seen
}

proptest! {
    #[test]
    fn appends_keep_first_occurrence_order(values in prop::collection::vec("[a-d]{1,2}", 1..24)) {
        let (store, path) = object_store().unwrap();
        for value in &values {
            props::append_or_replace(&store, &path, "ex:tag", Value::string(value.as_str())).unwrap();
        }
        let expected: Vec<Value> = dedup(&values).into_iter().map(Value::string).collect();
        prop_assert_eq!(store.property(&path, "ex:tag").unwrap(), Some(Property::Multiple(expected)));
    }

    #[test]
    fn removing_every_appended_value_deletes_the_property(values in prop::collection::vec("[a-d]{1,2}", 1..24)) {
        let (store, path) = object_store().unwrap();
        for value in &values {
            props::append_or_replace(&store, &path, "ex:tag", Value::string(value.as_str())).unwrap();
        }
        for value in values.iter().rev() {
            props::remove_value(&store, &path, "ex:tag", &Value::string(value.as_str())).unwrap();
        }
        prop_assert_eq!(store.property(&path, "ex:tag").unwrap(), None);
    }

    #[test]
    fn single_valued_keeps_last_write(values in prop::collection::vec("[a-z]{1,8}", 1..12)) {
        let (store, path) = object_store().unwrap();
        for value in &values {
            props::append_or_replace(&store, &path, "dc:title", Value::string(value.as_str())).unwrap();
        }
        let last = values.last().cloned().unwrap();
        prop_assert_eq!(store.property(&path, "dc:title").unwrap(), Some(Property::Single(Value::string(last))));
    }
}
