use lazy_json::{
    as_double, as_integer, as_string, child_at, child_count, key_of, kind_of, parse, traverse,
    ChildState, Document, ErrorKind, Node, NodeKind,
};
use rstest::rstest;
use serde_json::Value;

#[derive(Debug, PartialEq)]
enum Leaf {
    None,
    Number(f64),
    Text(String),
}

type Entry = (NodeKind, String, Leaf);

fn collect_lazy(node: Option<Node<'_>>, out: &mut Vec<Entry>) {
    let kind = kind_of(node);
    let leaf = match kind {
        NodeKind::Number => Leaf::Number(as_double(node)),
        NodeKind::String => Leaf::Text(as_string(node).unwrap_or_default().to_string()),
        _ => Leaf::None,
    };
    out.push((kind, key_of(node).to_string(), leaf));
    for index in 0..child_count(node) {
        collect_lazy(child_at(node, index), out);
    }
}

fn collect_eager(key: &str, value: &Value, out: &mut Vec<Entry>) {
    let (kind, leaf) = match value {
        Value::Object(_) => (NodeKind::Object, Leaf::None),
        Value::Array(_) => (NodeKind::Array, Leaf::None),
        Value::Bool(true) => (NodeKind::True, Leaf::None),
        Value::Bool(false) => (NodeKind::False, Leaf::None),
        Value::Null => (NodeKind::Null, Leaf::None),
        Value::Number(number) => (
            NodeKind::Number,
            Leaf::Number(number.as_f64().unwrap_or(f64::NAN)),
        ),
        Value::String(text) => (NodeKind::String, Leaf::Text(text.clone())),
    };
    out.push((kind, key.to_string(), leaf));
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                collect_eager(key, child, out);
            }
        }
        Value::Array(items) => {
            for child in items {
                collect_eager("", child, out);
            }
        }
        _ => {}
    }
}

#[test]
fn object_with_one_member() {
    let doc = parse(r#"{"a":1}"#).unwrap();
    let root = doc.root();
    assert_eq!(root.kind(), NodeKind::Object);
    assert_eq!(root.child_count(), 1);
    let a = root.child(0).unwrap();
    assert_eq!(a.key(), Some("a"));
    assert_eq!(a.kind(), NodeKind::Number);
    assert_eq!(a.as_i64(), 1);
}

#[test]
fn array_of_integers() {
    let doc = parse("[1,2,3]").unwrap();
    let root = Some(doc.root());
    assert_eq!(child_count(root), 3);
    let values: Vec<i64> = (0..3).map(|i| as_integer(child_at(root, i))).collect();
    assert_eq!(values, vec![1, 2, 3]);
}

#[rstest]
#[case(r#"{"a":}"#)]
#[case(r#"{"a":1"#)]
#[case("[1 2]")]
fn malformed_documents_fail_to_parse(#[case] input: &str) {
    let err = parse(input).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Parse);
    assert!(err.location.is_some());
}

#[test]
fn nested_number_by_path() {
    let doc = parse(r#"{"x":{"y":5}}"#).unwrap();
    let y = traverse(Some(doc.root()), "x/y").unwrap();
    assert_eq!(y.kind(), NodeKind::Number);
    assert_eq!(y.as_f64(), 5.0);

    let x = doc.traverse("x").unwrap();
    assert_eq!(x.traverse("../x/y"), Some(y));
}

#[rstest]
#[case(r#"{"a":[1,2.5,-3e2],"b":{"c":"d","e":[true,false,null]},"f":"café"}"#)]
#[case(r#"[[],{},[[1]],{"k":{"k":{"k":"v"}}}]"#)]
#[case(r#"{"weird key\n":"tab\tvalue","":0}"#)]
fn lazy_walk_matches_eager_reference(#[case] input: &str) {
    let doc = parse(input).unwrap();
    let mut lazy = Vec::new();
    collect_lazy(Some(doc.root()), &mut lazy);

    let reference: Value = serde_json::from_str(input).unwrap();
    let mut eager = Vec::new();
    collect_eager("", &reference, &mut eager);

    assert_eq!(lazy, eager);
    assert_eq!(doc.materialized_count(), doc.value_count());
}

#[test]
fn accessors_are_idempotent() {
    let doc = parse(r#"{"n":2.75,"s":"a\"b","list":[1,2]}"#).unwrap();
    let root = doc.root();

    let n = root.get("n").unwrap();
    assert_eq!(n.as_f64().to_bits(), n.as_f64().to_bits());
    assert_eq!(n.as_i64(), n.as_i64());
    assert_eq!(n.as_i64(), 3);

    let s = root.get("s").unwrap();
    let first = s.as_str().unwrap();
    let second = s.as_str().unwrap();
    assert_eq!(first, "a\"b");
    assert!(std::ptr::eq(first, second));

    let list = root.get("list").unwrap();
    assert_eq!(list.child_count(), 2);
    let materialized = doc.materialized_count();
    assert_eq!(list.child_count(), 2);
    assert_eq!(doc.materialized_count(), materialized);
}

#[test]
fn children_are_scanned_on_first_access_only() {
    let doc = parse(r#"{"a":[1,2,3],"b":{"c":4}}"#).unwrap();
    assert_eq!(doc.value_count(), 7);
    assert_eq!(doc.materialized_count(), 1);

    let root = doc.root();
    assert_eq!(root.child_state(), ChildState::Unscanned);
    let b = root.get("b").unwrap();
    assert_eq!(doc.materialized_count(), 3);
    assert!(matches!(root.child_state(), ChildState::Scanned(range) if range.len() == 2));

    assert_eq!(root.get("a").unwrap().child_state(), ChildState::Unscanned);
    assert_eq!(b.get("c").unwrap().as_i64(), 4);
    assert_eq!(doc.materialized_count(), 4);
}

#[test]
fn leaf_accessors_on_wrong_kinds() {
    let doc = parse(r#"["text",7,true,null]"#).unwrap();
    let root = Some(doc.root());
    let text = child_at(root, 0);
    let number = child_at(root, 1);
    let yes = child_at(root, 2);
    let null = child_at(root, 3);

    assert!(as_double(text).is_nan());
    assert_eq!(as_string(number), None);
    assert_eq!(as_integer(text), 0);
    assert_eq!(as_integer(yes), 1);
    assert_eq!(as_integer(null), 0);
    assert_eq!(child_count(number), 0);
    assert!(child_at(number, 0).is_none());
    assert_eq!(key_of(number), "");
}

#[test]
fn raw_document_is_shared_by_every_node() {
    let doc = Document::parse(b"  [ {\"a\" : [1]} ]\n").unwrap();
    let leaf = doc.traverse("[0]/a[0]").unwrap();
    assert_eq!(leaf.document().raw(), "[ {\"a\" : [1]} ]");
    assert_eq!(leaf.raw(), "1");
    assert_eq!(doc.traverse("[0]").unwrap().raw(), "{\"a\" : [1]}");
}

#[test]
fn trailing_nul_sentinel_is_accepted() {
    let doc = parse(b"{\"a\":1}\0").unwrap();
    assert_eq!(doc.raw(), "{\"a\":1}");
    assert!(parse(b"{\"a\":\0 1}").is_err());
}

#[test]
fn release_consumes_the_document() {
    let doc = parse("[1]").unwrap();
    assert_eq!(doc.root().child_count(), 1);
    assert!(lazy_json::release(doc));
}
