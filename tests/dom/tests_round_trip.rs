//! Load/build round trips: unchanged documents rebuild to their exact text.

use csdom::{DomHost, NodeKind};
use rstest::rstest;

use crate::helpers::dom_helpers::{build_text, find_kind, find_named, load_clean};
use crate::helpers::source_fixtures::*;

#[rstest]
#[case::namespace(NAMESPACE)]
#[case::generic_class_with_attribute(GENERIC_CLASS_WITH_ATTRIBUTE)]
#[case::property_get_set(PROPERTY_GET_SET)]
#[case::foreach_loop(FOREACH_LOOP)]
#[case::try_catch(TRY_CATCH)]
#[case::members(MEMBERS)]
#[case::crlf(CRLF_FILE)]
#[case::block_comments(BLOCK_COMMENTS)]
#[case::empty("")]
#[case::comments_only("// nothing here\n")]
fn test_build_of_load_is_identity(#[case] source: &str) {
    let dom = load_clean(source);
    assert_eq!(build_text(&dom), source);
}

#[test]
fn test_block_comments_are_trivia() {
    let mut dom = load_clean(BLOCK_COMMENTS);
    assert!(dom.report().unsupported.is_empty());
    let class = find_named(&dom, "Counter");
    assert_eq!(dom.fields(class).len(), 1);
    assert_eq!(dom.methods(class).len(), 1);
    dom.set_name(class, "Tally").unwrap();
    assert_eq!(build_text(&dom), BLOCK_COMMENTS.replace("Counter", "Tally"));
}

#[test]
fn test_unicode_identifiers_round_trip() {
    let source = "class \u{dc} { int \u{e9}; }\n";
    let mut dom = load_clean(source);
    let class = find_named(&dom, "\u{dc}");
    assert_eq!(dom.name(dom.fields(class)[0]), Some("\u{e9}"));
    dom.set_name(class, "\u{c4}rger").unwrap();
    assert_eq!(build_text(&dom), "class \u{c4}rger { int \u{e9}; }\n");
}

#[test]
fn test_source_with_syntax_errors_still_round_trips() {
    let source = "class Broken { void M( }\n";
    let dom = DomHost::new().load(source).unwrap();
    assert!(dom.report().has_syntax_errors());
    assert_eq!(build_text(&dom), source);
}

#[test]
fn test_rename_there_and_back_reproduces_text() {
    let mut dom = load_clean(GENERIC_CLASS_WITH_ATTRIBUTE);
    let class = find_named(&dom, "Repository");
    dom.set_name(class, "Store").unwrap();
    let renamed = build_text(&dom);
    assert!(renamed.contains("public class Store<T> where T : class"), "{renamed}");
    dom.set_name(class, "Repository").unwrap();
    assert_eq!(build_text(&dom), GENERIC_CLASS_WITH_ATTRIBUTE);
}

#[test]
fn test_renamed_property_renames_accessors() {
    let mut dom = load_clean(PROPERTY_GET_SET);
    let property = find_kind(&dom, NodeKind::Property);
    dom.set_name(property, "FullName").unwrap();
    let accessors = dom.children(property, csdom::Slot::Accessors).to_vec();
    let names: Vec<_> = accessors.iter().map(|a| dom.name(*a).unwrap().to_string()).collect();
    assert_eq!(names, ["get_FullName", "set_FullName"]);
    assert_eq!(
        build_text(&dom),
        PROPERTY_GET_SET.replace("string Name", "string FullName")
    );
}

#[test]
fn test_removed_type_parameter_rebuilds_list() {
    let mut dom = load_clean(GENERIC_TYPE_PARAMETERS);
    let class = find_named(&dom, "Triple");
    let t2 = dom.type_parameters(class)[1];
    dom.remove(class, csdom::Slot::TypeParameters, t2).unwrap();
    assert_eq!(build_text(&dom), "public class Triple<T1, T3>\n{\n}\n");
}
