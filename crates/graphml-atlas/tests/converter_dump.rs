use std::{
    env, fs,
    path::Component,
    path::{Path, PathBuf},
};

use graphml_atlas::{ConvertOptions, convert_str};
use serde_json::Value;
use similar::TextDiff;
use std::collections::HashSet;
use walkdir::WalkDir;

/// Sort object keys and drop nulls so fixtures diff cleanly.
fn normalize_json(value: &mut Value) {
    match value {
        Value::Array(arr) => arr.iter_mut().for_each(normalize_json),
        Value::Object(map) => {
            map.retain(|_, v| !v.is_null());
            let mut entries: Vec<(String, Value)> = std::mem::take(map).into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            for (k, mut v) in entries {
                normalize_json(&mut v);
                map.insert(k, v);
            }
        }
        _ => {}
    }
}

fn pretty_json(mut v: Value) -> String {
    normalize_json(&mut v);
    let mut s = serde_json::to_string_pretty(&v).expect("serialize pretty json");
    s.push('\n');
    s
}

fn fixtures_root() -> PathBuf {
    // CARGO_MANIFEST_DIR = crates/graphml-atlas
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent() // crates/
        .and_then(|p| p.parent()) // repo root
        .unwrap_or(&manifest_dir)
        .join("fixtures")
}

fn corpus_dir() -> PathBuf {
    fixtures_root().join("corpus")
}

fn expected_path_for_graphml(graphml_path: &Path) -> PathBuf {
    let rel = graphml_path
        .strip_prefix(corpus_dir())
        .expect("graphml file must be under fixtures/corpus");

    fixtures_root()
        .join("expected")
        .join(rel)
        .with_extension("json")
}

fn rel_fixture_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(p) => Some(p.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn ignored_fixtures() -> HashSet<String> {
    let ignore_path = fixtures_root().join("ignore.txt");
    if !ignore_path.exists() {
        return HashSet::new();
    }

    read_to_string(&ignore_path)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| line.to_string())
        .collect()
}

fn is_update_enabled() -> bool {
    match env::var("UPDATE_EXPECTED") {
        Ok(v) => !v.trim().is_empty() && v != "0" && v.to_lowercase() != "false",
        Err(_) => false,
    }
}

fn read_to_string(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {}: {e}", path.display()))
}

fn write_string(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .unwrap_or_else(|e| panic!("Failed to create dir {}: {e}", parent.display()));
    }
    fs::write(path, contents).unwrap_or_else(|e| panic!("Failed to write {}: {e}", path.display()));
}

fn diff_strings(expected: &str, actual: &str) -> String {
    TextDiff::from_lines(expected, actual)
        .unified_diff()
        .header("expected", "actual")
        .to_string()
}

#[test]
fn converter_dump_matches_expected_json() {
    let corpus = corpus_dir();
    assert!(
        corpus.exists(),
        "Corpus directory not found at {}",
        corpus.display()
    );

    let update = is_update_enabled();
    let ignore = ignored_fixtures();
    let options = ConvertOptions::default();
    let mut failures: Vec<String> = Vec::new();
    let mut checked = 0usize;

    for entry in WalkDir::new(&corpus)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        let is_graphml = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("graphml"))
            .unwrap_or(false);
        if !is_graphml {
            continue;
        }

        let rel = path
            .strip_prefix(&corpus)
            .expect("graphml file must be under fixtures/corpus");
        if ignore.contains(&rel_fixture_path(rel)) {
            continue;
        }
        checked += 1;

        let expected_path = expected_path_for_graphml(path);
        let document = convert_str(&read_to_string(path), &options)
            .unwrap_or_else(|err| panic!("convert {}: {err}", path.display()));
        let actual_pretty = pretty_json(serde_json::to_value(&document).expect("document -> json"));

        if !expected_path.exists() {
            if update {
                write_string(&expected_path, &actual_pretty);
            } else {
                failures.push(format!(
                    "Missing expected JSON for {}\nExpected at: {}\nRun with UPDATE_EXPECTED=1 to generate.",
                    path.display(),
                    expected_path.display()
                ));
            }
            continue;
        }

        let expected_val: Value =
            serde_json::from_str(&read_to_string(&expected_path)).unwrap_or_else(|e| {
                panic!(
                    "Invalid JSON in expected file {}: {e}",
                    expected_path.display()
                )
            });
        let expected_pretty = pretty_json(expected_val);

        if expected_pretty != actual_pretty {
            if update {
                write_string(&expected_path, &actual_pretty);
                continue;
            }
            failures.push(format!(
                "Mismatch for fixture: {}\nExpected: {}\n{}\nTip: set UPDATE_EXPECTED=1 to update fixtures.",
                path.display(),
                expected_path.display(),
                diff_strings(&expected_pretty, &actual_pretty)
            ));
        }
    }

    assert!(checked > 0, "no .graphml fixtures under {}", corpus.display());
    if !failures.is_empty() {
        panic!(
            "Converter dump mismatches found ({}):\n\n{}",
            failures.len(),
            failures.join("\n\n---\n\n")
        );
    }
}
