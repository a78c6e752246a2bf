//! Integration tests for Typedep
//!
//! These tests run the whole pipeline, library and binary, over small
//! temporary C++ trees.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;
use typedep_core::{load_graph, save_graph, RefKind, TypeGraphError};
use typedep_indexer::{Coordinator, ScanConfig};

fn write_tree(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (path, content) in files {
        let full = dir.path().join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(full, content).unwrap();
    }
    dir
}

fn vehicle_tree() -> TempDir {
    write_tree(&[
        ("Base.h", "class Base {\npublic:\nint id;\n};\n"),
        ("Engine.h", "struct Engine {\nint rpm;\n};\n"),
        (
            "Derived.h",
            "#include \"Base.h\"\n#include \"Engine.h\"\nclass Derived : public Base {\nEngine* engine;\nEngine* getEngine();\n};\n",
        ),
        // Not included by anyone: Loose sees nothing.
        ("Loose.cpp", "class Loose {\nBase base;\n};\n"),
        ("tests/DerivedTest.cpp", "#include \"Derived.h\"\nclass DerivedTest : public Derived { };\n"),
    ])
}

fn scan(root: &Path) -> typedep_indexer::ScanOutcome {
    Coordinator::new(ScanConfig::default())
        .run_full_index(&[root.to_path_buf()])
        .unwrap()
}

/// Inheritance and both body kinds are found, and only through includes
#[test]
fn test_pipeline_classifies_references() {
    let tree = vehicle_tree();
    let outcome = scan(tree.path());
    let graph = &outcome.graph;

    assert_eq!(graph.node_count(), 4);
    assert!(graph.has_edge_between("Derived", "Base", RefKind::Inheritance));
    assert!(graph.has_edge_between("Derived", "Engine", RefKind::MethodUse));
    assert!(!graph.has_edge_between("Derived", "Engine", RefKind::Composition));
    assert!(!graph.has_edge_between("Loose", "Base", RefKind::Composition));
    assert!(graph.find_node_by_name("DerivedTest").is_none());
    assert_eq!(graph.edge_count(), 2);

    let unreferenced: Vec<&str> = outcome.report.unreferenced.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(unreferenced, vec!["Loose"]);
    assert_eq!(outcome.report.kind_counts.get(&RefKind::Inheritance), Some(&1));
    assert_eq!(outcome.report.kind_counts.get(&RefKind::Composition), None);
}

/// Two scans of the same tree produce byte-identical output files
#[test]
fn test_output_is_deterministic() {
    let tree = vehicle_tree();
    let out = TempDir::new().unwrap();

    let mut rendered = Vec::new();
    for run in 0..2 {
        let nodes = out.path().join(format!("types{run}.txt"));
        let edges = out.path().join(format!("edges{run}.txt"));
        save_graph(&scan(tree.path()).graph, &nodes, &edges).unwrap();
        rendered.push((fs::read_to_string(nodes).unwrap(), fs::read_to_string(edges).unwrap()));
    }
    assert_eq!(rendered[0], rendered[1]);
    assert_eq!(rendered[0].0.lines().count(), 4);
    assert_eq!(rendered[0].1.lines().count(), 2);
}

/// Saved files load back into an equal graph that still validates
#[test]
fn test_saved_graph_round_trips() {
    let tree = vehicle_tree();
    let out = TempDir::new().unwrap();
    let nodes = out.path().join("types.txt");
    let edges = out.path().join("type-dependencies.txt");

    let outcome = scan(tree.path());
    save_graph(&outcome.graph, &nodes, &edges).unwrap();

    let loaded = load_graph(&nodes, &edges).unwrap();
    assert_eq!(loaded.nodes(), outcome.graph.nodes());
    assert_eq!(loaded.edges(), outcome.graph.edges());
    assert_eq!(loaded.validate().unwrap(), outcome.report);
}

/// Multiple roots are scanned together and overlapping roots are deduplicated
#[test]
fn test_multiple_roots() {
    let headers = write_tree(&[("Base.h", "class Base { };\n")]);
    let sources = write_tree(&[("Impl.cpp", "#include <Base.h>\nclass Impl : public Base { };\n")]);

    let roots = vec![
        headers.path().to_path_buf(),
        sources.path().to_path_buf(),
        headers.path().join("Base.h"),
    ];
    let outcome = Coordinator::new(ScanConfig::default()).run_full_index(&roots).unwrap();
    assert_eq!(outcome.stats.files_discovered, 2);
    assert!(outcome.graph.has_edge_between("Impl", "Base", RefKind::Inheritance));
}

/// A duplicate type name aborts the scan
#[test]
fn test_duplicate_names_abort() {
    let tree = write_tree(&[("One.h", "class Dup { };\n"), ("Two.hpp", "struct Dup { };\n")]);
    let result = Coordinator::new(ScanConfig::default()).run_full_index(&[tree.path().to_path_buf()]);
    assert!(matches!(result, Err(TypeGraphError::NameCollision { .. })));
}

/// Excluded globs and directory segments are honoured
#[test]
fn test_config_exclusions() {
    let tree = write_tree(&[
        ("src/Keep.h", "class Keep { };\n"),
        ("third_party/Vendor.h", "class Vendor { };\n"),
        ("bench/Bench.h", "class Bench { };\n"),
    ]);
    let config = ScanConfig::from_toml(
        r#"
excluded_dirs = ["bench"]
exclude = ["**/third_party/**"]
"#,
    )
    .unwrap();
    let outcome = Coordinator::new(config).run_full_index(&[tree.path().to_path_buf()]).unwrap();
    let names: Vec<&str> = outcome.graph.nodes().iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, vec!["Keep"]);
}

fn typedep() -> Command {
    Command::new(env!("CARGO_BIN_EXE_typedep"))
}

fn output_paths(dir: &TempDir) -> (PathBuf, PathBuf) {
    (dir.path().join("types.txt"), dir.path().join("type-dependencies.txt"))
}

/// `scan` writes both files, `check` accepts them, `deps` reads them
#[test]
fn test_cli_scan_check_deps() {
    let tree = vehicle_tree();
    let out = TempDir::new().unwrap();
    let (nodes, edges) = output_paths(&out);

    let status = typedep()
        .arg("scan")
        .arg(tree.path())
        .arg("--workers")
        .arg("2")
        .arg("--nodes")
        .arg(&nodes)
        .arg("--edges")
        .arg(&edges)
        .current_dir(out.path())
        .status()
        .unwrap();
    assert!(status.success());
    assert!(nodes.exists());
    assert!(edges.exists());

    let check = typedep().arg("check").arg(&nodes).arg(&edges).output().unwrap();
    assert!(check.status.success());
    assert!(String::from_utf8_lossy(&check.stdout).contains("4 types, 2 references, 1 unreferenced"));

    let deps = typedep()
        .args(["deps", "Engine", "--nodes"])
        .arg(&nodes)
        .arg("--edges")
        .arg(&edges)
        .output()
        .unwrap();
    assert!(deps.status.success());
    let stdout = String::from_utf8_lossy(&deps.stdout);
    assert!(stdout.contains("depends on (0):"));
    assert!(stdout.contains("used by (1):"));
    assert!(stdout.contains("Derived [method use]"));
}

/// A failed scan leaves no output behind
#[test]
fn test_cli_failed_scan_writes_nothing() {
    let tree = write_tree(&[("One.h", "class Dup { };\n"), ("Two.hpp", "struct Dup { };\n")]);
    let out = TempDir::new().unwrap();
    let (nodes, edges) = output_paths(&out);

    let status = typedep()
        .arg("scan")
        .arg(tree.path())
        .current_dir(out.path())
        .status()
        .unwrap();
    assert!(!status.success());
    assert!(!nodes.exists());
    assert!(!edges.exists());
}

/// `check` rejects an edge whose endpoint is not in the nodes file
#[test]
fn test_cli_check_rejects_dangling_edge() {
    let out = TempDir::new().unwrap();
    let (nodes, edges) = output_paths(&out);
    fs::write(
        &nodes,
        "{\"name\":\"A\",\"classifier\":\"CLASS\",\"sourceName\":\"A\",\"sourceType\":\"HEADER\"}\n",
    )
    .unwrap();
    fs::write(
        &edges,
        concat!(
            "{\"caller\":{\"name\":\"A\",\"classifier\":\"CLASS\",\"sourceName\":\"A\",\"sourceType\":\"HEADER\"},",
            "\"callee\":{\"name\":\"B\",\"classifier\":\"CLASS\",\"sourceName\":\"B\",\"sourceType\":\"CPP\"},",
            "\"refType\":\"METHOD\"}\n"
        ),
    )
    .unwrap();

    let check = typedep().arg("check").arg(&nodes).arg(&edges).output().unwrap();
    assert!(!check.status.success());
}
