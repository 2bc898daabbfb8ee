//! End-to-end tests for the library API
//!
//! These tests drive graph construction, cycle detection and impact analysis
//! over whole repositories, the way a caller of the crate would.

use std::collections::BTreeMap;

use depscope::{
    build_graph, find_cycles, impact_of,
    models::config::{ResolutionConvention, ResolverConfig, Settings},
    Analyzer, DependencyEdge, DependencyGraph, EdgeType, FileNode, Repository,
};

fn file(path: &str, imports: &[&str]) -> FileNode {
    FileNode::new(path, "").unwrap().with_imports(imports.iter().copied())
}

/// A small Python application with one cycle, third-party imports,
/// runtime-loaded plugins and a test directory
fn python_app() -> Repository {
    let files = vec![
        file("app/__init__.py", &[]),
        file(
            "app/main.py",
            &[".config", ".models.user", "requests", "os.path", "plugins.loader", "app.legacy"],
        ),
        file("app/config.py", &["os"]),
        file("app/models/__init__.py", &[]),
        file("app/models/user.py", &["..config", "app.db"]),
        file("app/db.py", &["sqlalchemy", "app.models.user"]),
        file("plugins/loader.py", &["importlib", "plugins.extra"]),
        file("plugins/extra.py", &[]),
        file("tests/test_main.py", &["app.main"]),
    ];
    Repository::new("/srv/app", files).unwrap().with_name("app")
}

fn python_settings() -> Settings {
    let mut settings = Settings::default();
    settings.resolver.convention = ResolutionConvention::PackageRoot;
    settings.resolver.external_modules = ["requests", "os", "sqlalchemy", "importlib"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    settings.resolver.dynamic_patterns = vec!["plugins.*".to_string()];
    settings.exclude_patterns = vec!["tests/**".to_string()];
    settings.parallel = false;
    settings
}

fn edges_of(graph: &DependencyGraph, source: &str) -> Vec<(String, EdgeType)> {
    graph
        .edges
        .iter()
        .filter(|e| e.source == source)
        .map(|e| (e.target.clone(), e.edge_type))
        .collect()
}

#[test]
fn test_python_application_graph() {
    let analyzer = Analyzer::new(python_settings());
    let graph = analyzer.build_graph(&python_app()).unwrap();

    // Excluded files are not nodes
    assert_eq!(graph.nodes.len(), 8);
    assert!(!graph.contains_node("tests/test_main.py"));

    assert_eq!(
        edges_of(&graph, "app/main.py"),
        vec![
            ("app/config.py".to_string(), EdgeType::Direct),
            ("app/models/user.py".to_string(), EdgeType::Direct),
            ("requests".to_string(), EdgeType::External),
            ("os.path".to_string(), EdgeType::External),
            ("plugins/loader.py".to_string(), EdgeType::Dynamic),
            ("app.legacy".to_string(), EdgeType::Unresolved),
        ]
    );
    assert_eq!(
        edges_of(&graph, "app/models/user.py"),
        vec![
            ("app/config.py".to_string(), EdgeType::Direct),
            ("app/db.py".to_string(), EdgeType::Direct),
        ]
    );
    assert_eq!(
        edges_of(&graph, "plugins/loader.py"),
        vec![
            ("importlib".to_string(), EdgeType::External),
            ("plugins/extra.py".to_string(), EdgeType::Dynamic),
        ]
    );

    // Every internal edge points at a node
    graph.validate().unwrap();
}

#[test]
fn test_python_application_report() {
    let report = Analyzer::new(python_settings())
        .with_blast_radius(true)
        .analyze(&python_app())
        .unwrap();

    assert_eq!(report.repository, "app");
    assert_eq!(
        report.cycles,
        vec![vec!["app/models/user.py".to_string(), "app/db.py".to_string()]]
    );
    assert_eq!(report.statistics.external_edges, 5);
    assert_eq!(report.statistics.dynamic_edges, 2);
    assert_eq!(report.unresolved_imports.len(), 1);
    assert_eq!(report.external_modules.get("sqlalchemy"), Some(&1));

    let ranking = report.blast_radius.unwrap();
    assert_eq!(ranking.len(), 8);
    assert_eq!(ranking[0].path, "app/config.py");
    assert_eq!(ranking[0].dependents, 3);
}

#[test]
fn test_python_application_impact() {
    let graph = Analyzer::new(python_settings())
        .build_graph(&python_app())
        .unwrap();

    let expected: BTreeMap<String, usize> = [
        ("app/main.py", 1),
        ("app/models/user.py", 1),
        ("app/db.py", 2),
    ]
    .iter()
    .map(|(p, h)| (p.to_string(), *h))
    .collect();
    assert_eq!(impact_of(&graph, "app/config.py").unwrap(), expected);

    // Runtime imports still carry impact
    let plugin = impact_of(&graph, "plugins/extra.py").unwrap();
    assert_eq!(plugin.get("plugins/loader.py"), Some(&1));
    assert_eq!(plugin.get("app/main.py"), Some(&2));

    // Nothing imports the entry point
    assert!(impact_of(&graph, "app/main.py").unwrap().is_empty());
}

#[test]
fn test_linear_chain_has_no_cycles() {
    let repo = Repository::new(
        "/r",
        vec![file("a.py", &["b"]), file("b.py", &["c"]), file("c.py", &[])],
    )
    .unwrap();
    let graph = build_graph(&repo, &ResolverConfig::default()).unwrap();
    assert_eq!(graph.edges.len(), 2);
    assert!(find_cycles(&graph).unwrap().is_empty());
}

#[test]
fn test_repository_without_imports() {
    let repo = Repository::new("/r", vec![file("x.rs", &[]), file("y.rs", &[])]).unwrap();
    let graph = build_graph(&repo, &ResolverConfig::default()).unwrap();
    assert_eq!(graph.nodes, vec!["x.rs".to_string(), "y.rs".to_string()]);
    assert!(graph.edges.is_empty());
}

#[test]
fn test_build_is_idempotent() {
    let repo = python_app();
    let config = python_settings().resolver;
    let first = build_graph(&repo, &config).unwrap();
    let second = build_graph(&repo, &config).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_self_import_is_dropped() {
    let repo = Repository::new("/r", vec![file("a.py", &["a", "./a.py"])]).unwrap();
    let graph = build_graph(&repo, &ResolverConfig::default()).unwrap();
    assert!(graph.edges.is_empty());
    assert!(find_cycles(&graph).unwrap().is_empty());
}

#[test]
fn test_three_file_cycle() {
    let repo = Repository::new(
        "/r",
        vec![file("A.py", &["B"]), file("B.py", &["C"]), file("C.py", &["A"])],
    )
    .unwrap();
    let graph = build_graph(&repo, &ResolverConfig::default()).unwrap();
    assert_eq!(
        find_cycles(&graph).unwrap(),
        vec![vec!["A.py".to_string(), "B.py".to_string(), "C.py".to_string()]]
    );
}

#[test]
fn test_impact_hop_counts() {
    let repo = Repository::new(
        "/r",
        vec![
            file("A.py", &["B"]),
            file("B.py", &["C"]),
            file("C.py", &[]),
            file("D.py", &["C"]),
        ],
    )
    .unwrap();
    let graph = build_graph(&repo, &ResolverConfig::default()).unwrap();

    let impact = impact_of(&graph, "C.py").unwrap();
    let expected: BTreeMap<String, usize> = [("B.py", 1), ("D.py", 1), ("A.py", 2)]
        .iter()
        .map(|(p, h)| (p.to_string(), *h))
        .collect();
    assert_eq!(impact, expected);

    let err = impact_of(&graph, "E.py").unwrap_err();
    assert_eq!(err.kind(), "UnknownNodeError");
    assert_eq!(err.implicated_paths(), vec!["E.py".to_string()]);
}

#[test]
fn test_duplicate_paths_rejected() {
    // Built field by field to get past the checking constructor
    let repo = Repository {
        root_path: "/r".to_string(),
        files: vec![file("a.py", &[]), file("a.py", &["b"])],
        name: "dup".to_string(),
    };
    let err = build_graph(&repo, &ResolverConfig::default()).unwrap_err();
    assert_eq!(err.kind(), "ValidationError");
    assert_eq!(err.implicated_paths(), vec!["a.py".to_string()]);
}

#[test]
fn test_custom_resolver_aliases() {
    let repo = Repository::new(
        "/r",
        vec![
            file("web/index.ts", &["@components/button", "@/util/format"]),
            file("web/components/button.tsx", &["react"]),
            file("web/util/format.ts", &[]),
        ],
    )
    .unwrap();

    let mut config = ResolverConfig::with_convention(ResolutionConvention::CustomResolver);
    config.aliases.insert("@components/".to_string(), "web/components/".to_string());
    config.aliases.insert("@/".to_string(), "web/".to_string());
    config.external_modules = vec!["react".to_string()];

    let graph = build_graph(&repo, &config).unwrap();
    assert_eq!(
        graph.edges,
        vec![
            DependencyEdge::new("web/index.ts", "web/components/button.tsx", EdgeType::Direct),
            DependencyEdge::new("web/index.ts", "web/util/format.ts", EdgeType::Direct),
            DependencyEdge::new("web/components/button.tsx", "react", EdgeType::External),
        ]
    );
}

#[test]
fn test_json_round_trip() {
    let repo = python_app();
    let json = serde_json::to_string(&repo).unwrap();
    let parsed: Repository = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, repo);

    let graph = build_graph(&repo, &python_settings().resolver).unwrap();
    let json = serde_json::to_string(&graph).unwrap();
    assert!(json.contains("\"type\":\"dynamic\""));
    let parsed: DependencyGraph = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, graph);
}
