//! Integration tests for the route compiler
//!
//! Each test lays out a route tree in a temporary directory and compiles it
//! against a `StaticRegistry`, so module contents are fully controlled.
//!
//! Covers:
//! - Path-to-pattern translation (index, dynamic, catch-all)
//! - Private files and non-route suffixes
//! - Ordering by specificity
//! - Method and wildcard binding
//! - Failure isolation and fatal root errors

use std::fs;
use std::path::Path;

use anyhow::anyhow;
use pretty_assertions::assert_eq;
use routefs::*;
use rstest::rstest;
use tempfile::TempDir;

fn tree(files: &[&str]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for rel in files {
        let path = dir.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "").unwrap();
    }
    dir
}

/// Registry where every file exports `get` handled by its own path
fn get_everywhere(files: &[&'static str]) -> StaticRegistry<&'static str> {
    files.iter().fold(StaticRegistry::new(), |registry, rel| {
        registry.with_module(*rel, ModuleExports::new().with_handler("get", *rel))
    })
}

fn compile<L: ModuleLoader>(root: &Path, loader: L) -> Compilation<L::Handler> {
    RouteCompiler::new(RouterConfig::new(root), loader)
        .compile()
        .unwrap()
}

fn patterns<H>(compilation: &Compilation<H>) -> Vec<&str> {
    compilation
        .routes
        .iter()
        .map(|r| r.url_pattern.as_str())
        .collect()
}

// ============================================================================
// Translation
// ============================================================================

#[rstest]
#[case("orders/index.ts", "/orders")]
#[case("index.ts", "/")]
#[case("user/[id].ts", "/user/:id")]
#[case("docs/[...slug].ts", "/docs/*slug")]
#[case("api/v1/users.mjs", "/api/v1/users")]
#[case("shop/[category]/[item].tsx", "/shop/:category/:item")]
#[case("about/INDEX.js", "/about")]
fn test_file_maps_to_pattern(#[case] file: &'static str, #[case] expected: &str) {
    let dir = tree(&[file]);
    let compilation = compile(dir.path(), get_everywhere(&[file]));

    assert_eq!(patterns(&compilation), vec![expected]);
    assert!(compilation.diagnostics.is_empty());
}

#[test]
fn test_params_in_order() {
    let file = "shop/[category]/[item].ts";
    let dir = tree(&[file]);
    let compilation = compile(dir.path(), get_everywhere(&[file]));
    assert_eq!(compilation.routes[0].params, vec!["category", "item"]);
}

#[test]
fn test_private_and_non_route_files_are_excluded() {
    let files = [
        "_internal/helpers.ts",
        "user/_shared.ts",
        "user/types.d.ts",
        "user/service.test.ts",
        "user/README.md",
        "user/list.ts",
    ];
    let dir = tree(&files);
    // Only list.ts is registered: loading anything else would fail
    let registry = get_everywhere(&["user/list.ts"]);
    let compilation = compile(dir.path(), registry);

    assert_eq!(patterns(&compilation), vec!["/user/list"]);
    assert!(compilation.diagnostics.is_empty());
}

#[test]
fn test_malformed_segment_is_skipped_with_diagnostic() {
    let files = ["user/[id.ts", "user/[].ts", "user/list.ts"];
    let dir = tree(&files);
    let compilation = compile(dir.path(), get_everywhere(&["user/list.ts"]));

    assert_eq!(patterns(&compilation), vec!["/user/list"]);
    let mut skipped: Vec<_> = compilation
        .diagnostics
        .iter()
        .map(|d| (d.kind, d.file.as_str()))
        .collect();
    skipped.sort();
    assert_eq!(
        skipped,
        vec![
            (DiagnosticKind::InvalidSegment, "user/[].ts"),
            (DiagnosticKind::InvalidSegment, "user/[id.ts"),
        ]
    );
    assert!(compilation.has_skipped_files());
}

#[test]
fn test_encoded_reserved_literal_is_skipped() {
    let files = ["%3Aid.ts", "about.ts"];
    let dir = tree(&files);
    let compilation = compile(dir.path(), get_everywhere(&files));

    assert_eq!(patterns(&compilation), vec!["/about"]);
    assert_eq!(compilation.diagnostics.len(), 1);
    assert_eq!(compilation.diagnostics[0].kind, DiagnosticKind::InvalidSegment);
    assert_eq!(compilation.diagnostics[0].file, "%3Aid.ts");

    let mut table = RouteTable::new();
    compilation.register(&mut table);
    assert!(table.match_route(&Method::Get, "/whatever").is_none());
}

// ============================================================================
// Ordering
// ============================================================================

#[test]
fn test_static_sibling_precedes_dynamic() {
    let files = ["user/[id].ts", "user/create.ts"];
    let dir = tree(&files);
    let compilation = compile(dir.path(), get_everywhere(&files));

    assert_eq!(patterns(&compilation), vec!["/user/create", "/user/:id"]);

    let mut table = RouteTable::new();
    compilation.register(&mut table);
    let hit = table.match_route(&Method::Get, "/user/create").unwrap();
    assert_eq!(hit.binding.chain, vec!["user/create.ts"]);
    let hit = table.match_route(&Method::Get, "/user/42").unwrap();
    assert_eq!(hit.params["id"], "42");
}

#[test]
fn test_full_ordering() {
    let files = [
        "[page].ts",
        "docs/[...slug].ts",
        "docs/intro.ts",
        "index.ts",
        "user/[id].ts",
        "user/create.ts",
    ];
    let dir = tree(&files);
    let compilation = compile(dir.path(), get_everywhere(&files));

    assert_eq!(
        patterns(&compilation),
        vec![
            "/docs/intro",
            "/user/create",
            "/user/:id",
            "/docs/*slug",
            "/:page",
            "/",
        ]
    );

    let priorities: Vec<u64> = compilation.routes.iter().map(|r| r.priority).collect();
    assert!(priorities.windows(2).all(|w| w[0] >= w[1]));
}

#[test]
fn test_catch_all_is_tried_after_siblings() {
    let files = ["docs/[...slug].ts", "docs/[id].ts", "docs/intro.ts"];
    let dir = tree(&files);
    let compilation = compile(dir.path(), get_everywhere(&files));

    let mut table = RouteTable::new();
    compilation.register(&mut table);

    let serve = |path: &str| table.match_route(&Method::Get, path).unwrap().binding.chain[0];
    assert_eq!(serve("/docs/intro"), "docs/intro.ts");
    assert_eq!(serve("/docs/42"), "docs/[id].ts");
    assert_eq!(serve("/docs/a/b/c"), "docs/[...slug].ts");
}

#[test]
fn test_compile_is_deterministic() {
    let files = ["b/[x].ts", "a/index.ts", "a/[y].ts", "c.ts", "[z]/d.ts"];
    let dir = tree(&files);
    let compiler = RouteCompiler::new(RouterConfig::new(dir.path()), get_everywhere(&files));

    let first = compiler.compile().unwrap();
    let second = compiler.compile().unwrap();
    assert_eq!(first.routes, second.routes);
    assert_eq!(first.diagnostics, second.diagnostics);
}

// ============================================================================
// Binding
// ============================================================================

#[test]
fn test_method_and_default_wildcard() {
    let file = "orders/index.ts";
    let dir = tree(&[file]);
    let registry = StaticRegistry::new().with_module(
        file,
        ModuleExports::new()
            .with_handler("get", "list_orders")
            .with_chain("post", ["auth", "create_order"])
            .with_export("schema", Export::Value)
            .with_default(Export::Handler("method_not_allowed")),
    );

    let compilation = compile(dir.path(), registry);
    let route = &compilation.routes[0];
    assert_eq!(route.methods().collect::<Vec<_>>(), vec![&Method::Get, &Method::Post]);

    let mut table = RouteTable::new();
    assert_eq!(compilation.register(&mut table), 3);

    let chain = |m: Method| table.match_route(&m, "/orders").unwrap().binding.chain.clone();
    assert_eq!(chain(Method::Get), vec!["list_orders"]);
    assert_eq!(chain(Method::Post), vec!["auth", "create_order"]);
    assert_eq!(chain(Method::Delete), vec!["method_not_allowed"]);
}

#[test]
fn test_additional_methods_from_config() {
    let file = "files.ts";
    let dir = tree(&[file]);
    let registry = StaticRegistry::new()
        .with_module(file, ModuleExports::new().with_handler("propfind", "dav"));

    let config = RouterConfig::new(dir.path()).with_additional_method("PROPFIND");
    let compilation = RouteCompiler::new(config, registry).compile().unwrap();

    let method = Method::parse("propfind");
    assert_eq!(compilation.routes[0].chain_for(&method), Some(&["dav"][..]));
}

#[test]
fn test_failing_module_does_not_affect_siblings() {
    let files = ["user/[id].ts", "user/broken.ts", "user/create.ts"];
    let dir = tree(&files);
    let registry = get_everywhere(&["user/[id].ts", "user/create.ts"])
        .with_factory("user/broken.ts", || Err(anyhow!("SyntaxError: unexpected token")));

    let compilation = compile(dir.path(), registry);

    assert_eq!(patterns(&compilation), vec!["/user/create", "/user/:id"]);
    assert_eq!(compilation.diagnostics.len(), 1);
    let diagnostic = &compilation.diagnostics[0];
    assert_eq!(diagnostic.kind, DiagnosticKind::LoadFailed);
    assert_eq!(diagnostic.file, "user/broken.ts");
    assert!(diagnostic.message.contains("unexpected token"));
}

#[test]
fn test_module_without_handlers_is_reported() {
    let file = "constants.ts";
    let dir = tree(&[file]);
    let registry = StaticRegistry::new().with_module(
        file,
        ModuleExports::<&str>::new().with_export("LIMIT", Export::Value),
    );

    let compilation = compile(dir.path(), registry);
    assert!(compilation.routes.is_empty());
    assert_eq!(compilation.diagnostics[0].kind, DiagnosticKind::NoHandlers);
}

#[test]
fn test_duplicate_pattern_last_registration_wins() {
    let files = ["orders/index.ts", "orders.ts"];
    let dir = tree(&files);
    let compilation = compile(dir.path(), get_everywhere(&files));

    assert_eq!(patterns(&compilation), vec!["/orders", "/orders"]);
    assert_eq!(compilation.diagnostics.len(), 1);
    assert_eq!(compilation.diagnostics[0].kind, DiagnosticKind::DuplicatePattern);
    assert_eq!(compilation.diagnostics[0].file, "orders.ts");

    let mut table = RouteTable::new();
    compilation.register(&mut table);
    assert_eq!(table.len(), 1);
    assert_eq!(
        table.match_route(&Method::Get, "/orders").unwrap().binding.chain,
        vec!["orders.ts"]
    );
}

#[test]
fn test_duplicate_pattern_explicit_method_beats_earlier_wildcard() {
    let files = ["orders/index.ts", "orders.ts"];
    let dir = tree(&files);
    let registry = StaticRegistry::new()
        .with_module(
            "orders/index.ts",
            ModuleExports::new().with_default(Export::Handler("index_default")),
        )
        .with_module("orders.ts", ModuleExports::new().with_handler("post", "orders_post"));

    let compilation = compile(dir.path(), registry);
    let mut table = RouteTable::new();
    compilation.register(&mut table);

    let chain = |m: Method| table.match_route(&m, "/orders").unwrap().binding.chain.clone();
    assert_eq!(chain(Method::Post), vec!["orders_post"]);
    assert_eq!(chain(Method::Get), vec!["index_default"]);
}

#[test]
fn test_mount_registers_and_returns_diagnostics() {
    let files = ["a.ts", "b.ts"];
    let dir = tree(&files);
    let compiler = RouteCompiler::new(RouterConfig::new(dir.path()), get_everywhere(&["a.ts"]));

    let mut table = RouteTable::new();
    let diagnostics = compiler.mount(&mut table).unwrap();

    assert_eq!(table.len(), 1);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].file, "b.ts");
}

// ============================================================================
// Fatal errors
// ============================================================================

#[test]
fn test_missing_root_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("routes");
    let compiler = RouteCompiler::new(RouterConfig::new(&missing), StaticRegistry::<()>::new());

    match compiler.compile() {
        Err(CompileError::RootNotFound(path)) => assert_eq!(path, missing),
        other => panic!("expected RootNotFound, got {:?}", other.map(|c| c.routes.len())),
    }
}

#[test]
fn test_root_that_is_a_file_is_fatal() {
    let dir = tree(&["routes.ts"]);
    let root = dir.path().join("routes.ts");
    let compiler = RouteCompiler::new(RouterConfig::new(&root), StaticRegistry::<()>::new());

    assert!(matches!(
        compiler.compile(),
        Err(CompileError::RootNotADirectory(_))
    ));
}

#[test]
fn test_empty_root_compiles_to_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let compilation = compile(dir.path(), StaticRegistry::<()>::new());
    assert!(compilation.routes.is_empty());
    assert!(compilation.diagnostics.is_empty());
}
