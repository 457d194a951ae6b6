//! End-to-end compiles of real JavaScript/TypeScript route trees through
//! `SourceScanLoader`.

use std::fs;

use pretty_assertions::assert_eq;
use routefs::{DiagnosticKind, HandlerRef, Method, RouteCompiler, RouteTable, RouterConfig, SourceScanLoader};
use tempfile::TempDir;

fn tree(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (rel, source) in files {
        let path = dir.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, source).unwrap();
    }
    dir
}

fn exprs(chain: &[HandlerRef]) -> Vec<&str> {
    chain.iter().map(|h| h.expr.as_str()).collect()
}

const ORDERS: &str = r#"
import { db } from "../db";
import { requireAuth, validate } from "../middleware";

// Lists every order
export async function get(req, res) {
  res.json(await db.orders.list());
}

export const post = [requireAuth, validate(orderSchema), createOrder];

export const config = { cache: false };

export default function methodNotAllowed(req, res) {
  res.status(405).end();
}
"#;

const USER: &str = r#"
const show = (req, res) => res.json({ id: req.params.id });
const remove = async (req, res) => {
  await db.users.delete(req.params.id);
};

export { show as get, remove as delete };
"#;

const BROKEN: &str = r#"
export function get(req, res) {
  if (req.query.x) {
    res.send("x");
"#;

const HELPERS: &str = r#"
export function get() { throw new Error("never routed"); }
"#;

#[test]
fn test_scan_tree_end_to_end() {
    let dir = tree(&[
        ("orders/index.ts", ORDERS),
        ("user/[id].js", USER),
        ("user/broken.ts", BROKEN),
        ("_lib/helpers.ts", HELPERS),
        ("user/types.d.ts", "export type User = { id: string };"),
    ]);

    let compiler = RouteCompiler::new(RouterConfig::new(dir.path()), SourceScanLoader::new());
    let compilation = compiler.compile().unwrap();

    let patterns: Vec<&str> = compilation.routes.iter().map(|r| r.url_pattern.as_str()).collect();
    assert_eq!(patterns, vec!["/orders", "/user/:id"]);

    let orders = &compilation.routes[0];
    assert_eq!(exprs(&orders.handlers_by_method[&Method::Get]), vec!["get"]);
    assert_eq!(
        exprs(&orders.handlers_by_method[&Method::Post]),
        vec!["requireAuth", "validate(orderSchema)", "createOrder"]
    );
    assert!(orders.wildcard_handlers.is_some());

    let user = &compilation.routes[1];
    assert_eq!(
        user.methods().collect::<Vec<_>>(),
        vec![&Method::Get, &Method::Delete]
    );
    assert_eq!(exprs(&user.handlers_by_method[&Method::Delete]), vec!["remove"]);
    assert_eq!(user.wildcard_handlers, None);

    assert_eq!(compilation.diagnostics.len(), 1);
    assert_eq!(compilation.diagnostics[0].kind, DiagnosticKind::LoadFailed);
    assert_eq!(compilation.diagnostics[0].file, "user/broken.ts");
}

#[test]
fn test_scan_tree_serves_requests() {
    let dir = tree(&[("orders/index.ts", ORDERS), ("user/[id].js", USER)]);
    let compiler = RouteCompiler::new(RouterConfig::new(dir.path()), SourceScanLoader::new());

    let mut table = RouteTable::new();
    let diagnostics = compiler.mount(&mut table).unwrap();
    assert!(diagnostics.is_empty());

    let hit = table.match_route(&Method::Delete, "/user/u%201").unwrap();
    assert_eq!(hit.params["id"], "u 1");
    assert_eq!(hit.binding.chain[0].module, "user/[id].js");

    let fallback = table.match_route(&Method::Put, "/orders").unwrap();
    assert_eq!(fallback.binding.method, None);
    assert_eq!(fallback.binding.chain[0].export, "default");

    assert!(table.match_route(&Method::Put, "/user/1").is_none());
}

#[test]
fn test_nested_default_object() {
    let dir = tree(&[(
        "legacy.js",
        "const handler = (req, res) => res.end();\nexport default { default: handler };\n",
    )]);
    let compiler = RouteCompiler::new(RouterConfig::new(dir.path()), SourceScanLoader::new());
    let compilation = compiler.compile().unwrap();

    let route = &compilation.routes[0];
    assert_eq!(route.url_pattern, "/legacy");
    assert_eq!(exprs(route.wildcard_handlers.as_ref().unwrap()), vec!["handler"]);
}
