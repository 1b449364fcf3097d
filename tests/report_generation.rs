//! End-to-end report generation against the demo sales data

use assert_fs::prelude::*;
use predicates::prelude::*;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use reportree::core::render::{HtmlRenderer, IconMap, TeraIndexRenderer};
use reportree::core::{parse_tree, DepthSpec, ReportAssembler, Tree};

const SALES: &str = include_str!("../demos/sales_report.json");

fn sales() -> Tree {
    parse_tree(SALES).unwrap()
}

fn assembler() -> ReportAssembler {
    ReportAssembler::new(
        Arc::new(HtmlRenderer::new()),
        Box::new(TeraIndexRenderer::new(None).unwrap()),
        IconMap::fallback(),
    )
    .with_concurrency(4)
}

#[tokio::test]
async fn test_uniform_depth_report() {
    let out = assert_fs::TempDir::new().unwrap();

    let summary = assembler()
        .generate_report(&sales(), out.path(), "Sales Performance", &DepthSpec::Uniform(2), None)
        .await
        .unwrap();

    assert!(summary.failed_pages.is_empty());
    // 6 leaf pages plus the table of contents
    assert_eq!(summary.pages_written, 7);

    for page in [
        "dashboard-monthly_trend.html",
        "products-overview.html",
        "products-categories.html",
        "customers-enterprise.html",
        "customers-small_business.html",
        "settings.html",
        "table_of_contents.html",
        "index.html",
    ] {
        out.child(page).assert(predicate::path::exists());
    }

    out.child("products-overview.html")
        .assert(predicate::str::contains("<td>Product A</td>"));
    out.child("table_of_contents.html")
        .assert(predicate::str::contains("<a href=\"customers-small_business.html\">Small Business</a>"));
    out.child("index.html")
        .assert(predicate::str::contains("<title>Sales Performance</title>"))
        .assert(predicate::str::contains("href=\"products-categories.html\""))
        .assert(predicate::str::contains("data-active-report=\"Table of Contents\""));
}

#[tokio::test]
async fn test_per_key_depth_report() {
    let out = assert_fs::TempDir::new().unwrap();
    let depth = DepthSpec::PerKey(HashMap::from([
        ("Products".to_string(), 3),
        ("Settings".to_string(), 1),
        ("default".to_string(), 1),
    ]));

    let summary = assembler()
        .generate_report(&sales(), out.path(), "Sales", &depth, Some("Products/Categories/Furniture"))
        .await
        .unwrap();

    // Dashboard, Customers and Settings collapse to one page each
    out.child("dashboard.html").assert(predicate::path::exists());
    out.child("customers.html").assert(predicate::path::exists());
    out.child("customers-enterprise.html").assert(predicate::path::missing());

    // Products expands one level further than the default
    out.child("products-overview.html").assert(predicate::path::exists());
    out.child("products-categories-electronics.html").assert(predicate::path::exists());
    out.child("products-categories-furniture.html").assert(predicate::path::exists());

    out.child("index.html")
        .assert(predicate::str::contains("data-active-report=\"Products&#x2F;Categories&#x2F;Furniture\""));

    assert_eq!(summary.pages_written, 7);
}

#[tokio::test]
async fn test_assembled_menu_shape() {
    let scratch = assert_fs::TempDir::new().unwrap();
    let report = assembler()
        .assemble(&sales(), &DepthSpec::Uniform(1), "Sales", None, scratch.path())
        .await
        .unwrap();

    let menu: Value = serde_json::to_value(&report.linked_menu).unwrap();
    assert_eq!(
        menu,
        serde_json::json!({
            "Dashboard": "dashboard.html",
            "Products": "products.html",
            "Customers": "customers.html",
            "Settings": "settings.html"
        })
    );
}

#[test]
fn test_cli_menu_preview() {
    let dir = assert_fs::TempDir::new().unwrap();
    let data = dir.child("data.json");
    data.write_str(r#"{"A": {"B": {"C": "leaf"}}}"#).unwrap();

    let output = std::process::Command::new(env!("CARGO_BIN_EXE_reportree"))
        .args(["menu", data.path().to_str().unwrap(), "--depth", "2"])
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    let menu: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(menu, serde_json::json!({"A": {"B": "a-b.html"}}));
}
