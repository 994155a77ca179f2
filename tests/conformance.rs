use std::fs;
use std::path::{Path, PathBuf};

use lazy_json::{Document, ErrorKind};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct FixtureFile {
    version: String,
    category: String,
    description: String,
    #[serde(default)]
    document: Option<String>,
    tests: Vec<FixtureCase>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FixtureCase {
    name: String,
    #[serde(default)]
    input: Option<String>,
    #[serde(default)]
    path: Option<String>,
    #[serde(default)]
    expected: Option<Value>,
    #[serde(default)]
    found: Option<bool>,
    #[serde(default)]
    should_error: bool,
}

fn fixture_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_fixture_file(path: &Path) -> FixtureFile {
    let contents = fs::read_to_string(path)
        .unwrap_or_else(|err| panic!("failed to read fixture {}: {err}", path.display()));
    serde_json::from_str(&contents)
        .unwrap_or_else(|err| panic!("failed to parse fixture {}: {err}", path.display()))
}

fn load_fixture_dir(category: &str) -> Vec<(PathBuf, FixtureFile)> {
    let root = fixture_root().join(category);
    let mut entries = Vec::new();
    for entry in fs::read_dir(&root)
        .unwrap_or_else(|err| panic!("failed to read fixture dir {}: {err}", root.display()))
    {
        let entry = entry
            .unwrap_or_else(|err| panic!("failed to read fixture dir {}: {err}", root.display()));
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
            continue;
        }
        entries.push((path.clone(), load_fixture_file(&path)));
    }
    entries.sort_by_key(|(path, _)| path.file_name().map(|name| name.to_os_string()));
    entries
}

fn check_fixture_header(path: &Path, fixture: &FixtureFile, category: &str) {
    assert_eq!(fixture.version, "1", "{}", path.display());
    assert_eq!(fixture.category, category, "{}", path.display());
    assert!(!fixture.description.is_empty(), "{}", path.display());
}

#[test]
fn grammar_fixtures() {
    let fixtures = load_fixture_dir("grammar");
    assert!(!fixtures.is_empty(), "no grammar fixtures found");

    for (path, fixture) in fixtures {
        check_fixture_header(&path, &fixture, "grammar");
        for case in &fixture.tests {
            let label = format!("{} :: {}", path.display(), case.name);
            let input = case
                .input
                .as_deref()
                .unwrap_or_else(|| panic!("{label}: missing input"));
            let result = Document::parse(input.as_bytes());

            if case.should_error {
                let err = result.expect_err(&label);
                assert_eq!(err.kind, ErrorKind::Parse, "{label}: {err}");
                continue;
            }

            let doc = result.unwrap_or_else(|err| panic!("{label}: {err}"));
            let reference: Value = serde_json::from_str(input)
                .unwrap_or_else(|err| panic!("{label}: reference rejected input: {err}"));
            let actual = doc
                .root()
                .to_value()
                .unwrap_or_else(|err| panic!("{label}: {err}"));
            assert_eq!(actual, reference, "{label}");
            if let Some(expected) = &case.expected {
                assert_eq!(&actual, expected, "{label}");
            }
            assert_eq!(doc.materialized_count(), doc.value_count(), "{label}");
        }
    }
}

#[test]
fn path_fixtures() {
    let fixtures = load_fixture_dir("paths");
    assert!(!fixtures.is_empty(), "no path fixtures found");

    for (path, fixture) in fixtures {
        check_fixture_header(&path, &fixture, "paths");
        let source = fixture
            .document
            .as_deref()
            .unwrap_or_else(|| panic!("{}: missing document", path.display()));
        let doc = Document::parse(source.as_bytes())
            .unwrap_or_else(|err| panic!("{}: {err}", path.display()));

        for case in &fixture.tests {
            let label = format!("{} :: {}", path.display(), case.name);
            let query = case
                .path
                .as_deref()
                .unwrap_or_else(|| panic!("{label}: missing path"));
            let node = doc.traverse(query);
            let expect_found = case.found.unwrap_or(case.expected.is_some());
            assert_eq!(node.is_some(), expect_found, "{label}");

            if let (Some(node), Some(expected)) = (node, &case.expected) {
                let actual = node.to_value().unwrap_or_else(|err| panic!("{label}: {err}"));
                assert_eq!(&actual, expected, "{label}");
            }
        }
    }
}
