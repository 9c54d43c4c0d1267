//! Loading from and saving to disk.

use csdom::{DomHost, NodeData};
use tempfile::TempDir;

use crate::helpers::dom_helpers::find_named;
use crate::helpers::source_fixtures::*;

#[test]
fn test_load_file_records_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("Members.cs");
    std::fs::write(&path, MEMBERS).unwrap();

    let host = DomHost::new();
    let dom = host.load_file(&path).unwrap();
    match dom.data(dom.root()) {
        Some(NodeData::Root(root)) => assert_eq!(root.file_path.as_deref(), Some(path.as_path())),
        other => panic!("unexpected root data {other:?}"),
    }
    assert_eq!(dom.name(dom.root()), Some("<root>"));
}

#[test]
fn test_save_writes_edited_text() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.cs");
    let output = dir.path().join("out.cs");
    std::fs::write(&input, GENERIC_TYPE_PARAMETERS).unwrap();

    let host = DomHost::new();
    let mut dom = host.load_file(&input).unwrap();
    let class = find_named(&dom, "Triple");
    dom.set_name(class, "Tuple3").unwrap();
    host.save(&dom, dom.root(), &output).unwrap();

    let written = std::fs::read_to_string(&output).unwrap();
    assert_eq!(written, "public class Tuple3<T1, T2, T3>\n{\n}\n");
}

#[test]
fn test_crlf_file_round_trips() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("crlf.cs");
    std::fs::write(&path, CRLF_FILE).unwrap();

    let host = DomHost::new();
    let dom = host.load_file(&path).unwrap();
    assert_eq!(dom.newline(), "\r\n");
    host.save(&dom, dom.root(), &path).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), CRLF_FILE);
}

#[test]
fn test_missing_file_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    let result = DomHost::new().load_file(dir.path().join("absent.cs"));
    assert!(matches!(result, Err(csdom::DomError::Io(_))));
}
