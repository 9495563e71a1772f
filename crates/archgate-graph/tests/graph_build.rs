//! Integration test: polyglot fixture project through the full graph build.
//!
//! Uses fixture files under `tests/fixtures/polyglot/` with TypeScript
//! (including a tsconfig-style alias), Python, Java and Kotlin sources.

use archgate_core::ProjectConfig;
use archgate_graph::{GraphBuilder, ScanCache};
use std::path::PathBuf;

fn fixture_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/polyglot")
}

fn config() -> ProjectConfig {
    ProjectConfig::from_file(&fixture_root().join("archgate.toml")).expect("fixture config should parse")
}

fn files() -> Vec<String> {
    [
        "jvm/src/main/java/com/example/domain/Customer.java",
        "jvm/src/main/kotlin/com/example/infra/CustomerRepo.kt",
        "svc/src/app/__init__.py",
        "svc/src/app/infra/__init__.py",
        "svc/src/app/infra/db.py",
        "svc/src/app/service.py",
        "web/src/domain/order.ts",
        "web/src/infra/orderRepo.ts",
        "web/src/shared/money.ts",
    ]
    .iter()
    .map(|s| (*s).to_owned())
    .collect()
}

fn edge_triples(graph: &archgate_core::ProjectGraph) -> Vec<(String, String, String)> {
    let mut edges: Vec<_> = graph
        .edges
        .iter()
        .map(|e| (e.from.clone(), e.to.clone(), e.source.clone()))
        .collect();
    edges.sort();
    edges
}

#[test]
fn builds_polyglot_graph() {
    let mut builder = GraphBuilder::new(fixture_root(), &config()).unwrap();
    let graph = builder.build(&files()).unwrap();

    assert_eq!(graph.file_count(), 9);
    let t = |a: &str, b: &str, c: &str| (a.to_owned(), b.to_owned(), c.to_owned());
    assert_eq!(
        edge_triples(&graph),
        vec![
            t(
                "jvm/src/main/java/com/example/domain/Customer.java",
                "jvm/src/main/kotlin/com/example/infra/CustomerRepo.kt",
                "java"
            ),
            t(
                "jvm/src/main/kotlin/com/example/infra/CustomerRepo.kt",
                "jvm/src/main/java/com/example/domain/Customer.java",
                "kotlin"
            ),
            t("svc/src/app/service.py", "svc/src/app/infra/__init__.py", "python"),
            t("web/src/domain/order.ts", "web/src/infra/orderRepo.ts", "typescript"),
            t("web/src/domain/order.ts", "web/src/shared/money.ts", "typescript"),
            t("web/src/infra/orderRepo.ts", "web/src/domain/order.ts", "typescript"),
        ]
    );

    let alias_edge = graph
        .edges
        .iter()
        .find(|e| e.to == "web/src/shared/money.ts")
        .unwrap();
    assert!((alias_edge.confidence - 0.95).abs() < 1e-9);
}

#[test]
fn classifies_layers_and_externals() {
    let graph = GraphBuilder::new(fixture_root(), &config())
        .unwrap()
        .build(&files())
        .unwrap();

    let order = graph.file("web/src/domain/order.ts").unwrap();
    assert_eq!(order.layer.as_deref(), Some("domain"));
    assert_eq!(order.external_packages(), vec!["dayjs"]);

    let customer = graph
        .file("jvm/src/main/java/com/example/domain/Customer.java")
        .unwrap();
    assert_eq!(customer.layer.as_deref(), Some("domain"));
    assert_eq!(customer.external_packages(), vec!["java.util"]);

    let service = graph.file("svc/src/app/service.py").unwrap();
    assert_eq!(service.layer, None);
    assert_eq!(service.external_packages(), vec!["requests"]);

    assert_eq!(
        graph.file("web/src/shared/money.ts").unwrap().layer.as_deref(),
        Some("shared")
    );
}

#[test]
fn detects_capabilities_with_lines() {
    let graph = GraphBuilder::new(fixture_root(), &config())
        .unwrap()
        .build(&files())
        .unwrap();

    let repo = graph.file("web/src/infra/orderRepo.ts").unwrap();
    let caps: Vec<(&str, Option<usize>)> = repo
        .capabilities
        .iter()
        .map(|c| (c.name.as_str(), c.line))
        .collect();
    assert_eq!(caps, vec![("database", Some(1)), ("network", Some(5))]);

    let kotlin = graph
        .file("jvm/src/main/kotlin/com/example/infra/CustomerRepo.kt")
        .unwrap();
    assert_eq!(kotlin.capabilities[0].name, "database");
    assert_eq!(kotlin.capabilities[0].line, Some(4));
}

#[test]
fn rebuild_is_idempotent() {
    let config = config();
    let first = GraphBuilder::new(fixture_root(), &config)
        .unwrap()
        .build(&files())
        .unwrap();
    let second = GraphBuilder::new(fixture_root(), &config)
        .unwrap()
        .build(&files())
        .unwrap();
    assert_eq!(first, second);
}

#[test]
fn parallel_extraction_matches_sequential() {
    let config = config();
    let sequential = GraphBuilder::new(fixture_root(), &config)
        .unwrap()
        .build(&files())
        .unwrap();
    let parallel = GraphBuilder::new(fixture_root(), &config)
        .unwrap()
        .with_parallelism(Some(4))
        .build(&files())
        .unwrap();
    assert_eq!(sequential, parallel);
}

#[test]
fn cached_build_matches_fresh_build() {
    let tmp = tempfile::tempdir().unwrap();
    let cache_path = tmp.path().join("cache.json");
    let config = config();

    let mut builder = GraphBuilder::new(fixture_root(), &config)
        .unwrap()
        .with_cache(ScanCache::new(&cache_path));
    let fresh = builder.build(&files()).unwrap();
    builder.cache_mut().unwrap().save().unwrap();

    let cache = ScanCache::load(&cache_path);
    assert_eq!(cache.len(), 9);

    let mut cached_builder = GraphBuilder::new(fixture_root(), &config)
        .unwrap()
        .with_cache(cache);
    let cached = cached_builder.build(&files()).unwrap();
    assert_eq!(fresh, cached);
}
