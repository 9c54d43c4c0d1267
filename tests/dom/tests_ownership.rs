//! Ownership collections: single parent, move semantics, ordered edits.

use csdom::{DomError, NodeData, NodeKind, Slot};

use crate::helpers::dom_helpers::{build_text, find_named, load_clean};
use crate::helpers::source_fixtures::*;

#[test]
fn test_move_between_collections() {
    let mut dom = load_clean("class A\n{\n    int x;\n    int y;\n}\nclass B\n{\n}\n");
    let a = find_named(&dom, "A");
    let b = find_named(&dom, "B");
    let x = find_named(&dom, "x");

    dom.add_or_move(b, Slot::Members, x).unwrap();

    assert_eq!(dom.members(a).len(), 1);
    assert_eq!(dom.members(b).len(), 1);
    assert_eq!(dom.parent(x), Some(b));
    assert!(dom.is_attached(x));
}

#[test]
fn test_ordered_removal() {
    let mut dom = load_clean(GENERIC_TYPE_PARAMETERS);
    let class = find_named(&dom, "Triple");
    let t2 = find_named(&dom, "T2");

    assert!(dom.remove(class, Slot::TypeParameters, t2).unwrap());

    let params = dom.collection(class, Slot::TypeParameters);
    assert_eq!(params.len(), 2);
    assert_eq!(params.first().and_then(|id| dom.name(id)), Some("T1"));
    assert_eq!(params.last().and_then(|id| dom.name(id)), Some("T3"));
    assert_eq!(dom.parent(t2), None);
}

#[test]
fn test_remove_of_non_member_is_false() {
    let mut dom = load_clean(GENERIC_TYPE_PARAMETERS);
    let class = find_named(&dom, "Triple");
    let stray = dom.create(NodeData::type_parameter("U"));
    assert!(!dom.remove(class, Slot::TypeParameters, stray).unwrap());
    assert_eq!(dom.type_parameters(class).len(), 3);
}

#[test]
fn test_insert_before_and_after() {
    let mut dom = load_clean(GENERIC_TYPE_PARAMETERS);
    let class = find_named(&dom, "Triple");
    let t1 = find_named(&dom, "T1");
    let t3 = find_named(&dom, "T3");

    let first = dom.create(NodeData::type_parameter("T0"));
    dom.insert_before(t1, first).unwrap();
    let last = dom.create(NodeData::type_parameter("T4"));
    dom.insert_after(t3, last).unwrap();

    let names: Vec<_> = dom
        .type_parameters(class)
        .iter()
        .map(|id| dom.name(*id).unwrap().to_string())
        .collect();
    assert_eq!(names, ["T0", "T1", "T2", "T3", "T4"]);
    assert_eq!(
        build_text(&dom),
        "public class Triple<T0, T1, T2, T3, T4>\n{\n}\n"
    );
}

#[test]
fn test_replace_keeps_position() {
    let mut dom = load_clean(GENERIC_TYPE_PARAMETERS);
    let class = find_named(&dom, "Triple");
    let t2 = find_named(&dom, "T2");
    let key = dom.create(NodeData::type_parameter("TKey"));

    dom.replace(t2, key).unwrap();

    assert_eq!(dom.type_parameters(class)[1], key);
    assert_eq!(dom.parent(t2), None);
    assert_eq!(dom.parent(key), Some(class));
}

#[test]
fn test_incompatible_child_is_rejected() {
    let mut dom = load_clean(GENERIC_TYPE_PARAMETERS);
    let class = find_named(&dom, "Triple");
    let field = dom.create(NodeData::field("x"));
    let err = dom.add_or_move(class, Slot::TypeParameters, field).unwrap_err();
    assert!(matches!(err, DomError::IncompatibleChild { .. }));
}

#[test]
fn test_node_cannot_own_its_ancestor() {
    let mut dom = load_clean(NESTED_TYPES);
    let outer = find_named(&dom, "MyClass");
    let inner = find_named(&dom, "MyNestedClass");
    let err = dom.add_or_move(inner, Slot::Members, outer).unwrap_err();
    assert!(matches!(err, DomError::OwnershipViolation { .. }));
    assert_eq!(dom.parent(inner), Some(outer));
}

#[test]
fn test_nodes_do_not_cross_documents() {
    let mut left = load_clean(GENERIC_TYPE_PARAMETERS);
    let right = load_clean(GENERIC_TYPE_PARAMETERS);
    let class = find_named(&left, "Triple");
    let foreign = find_named(&right, "T1");
    assert!(left.add_or_move(class, Slot::TypeParameters, foreign).is_err());
}

#[test]
fn test_invalid_index_is_rejected() {
    let mut dom = load_clean(GENERIC_TYPE_PARAMETERS);
    let class = find_named(&dom, "Triple");
    let extra = dom.create(NodeData::type_parameter("T9"));
    let err = dom
        .insert_or_move(class, Slot::TypeParameters, 7, extra)
        .unwrap_err();
    assert!(matches!(err, DomError::InvalidIndex { .. }));
}

#[test]
fn test_added_enum_value() {
    let mut dom = load_clean("enum Color\n{\n    Red,\n    Green\n}\n");
    let color = find_named(&dom, "Color");
    assert_eq!(dom.kind(color), Some(NodeKind::Enum));
    let blue = dom.create(NodeData::enum_value("Blue"));
    dom.add_or_move(color, Slot::Values, blue).unwrap();
    assert_eq!(
        build_text(&dom),
        "enum Color\n{\n    Red,\n    Green,\n    Blue\n}\n"
    );
}
