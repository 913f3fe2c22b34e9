//! package.json inspection and creation

use crate::config::{Framework, Runtime};
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Serialize)]
struct PackageJson {
    name: String,
    version: &'static str,
    description: &'static str,
    main: &'static str,
    scripts: Scripts,
    keywords: Vec<String>,
    author: &'static str,
    license: &'static str,
    dependencies: BTreeMap<String, String>,
}

#[derive(Serialize)]
struct Scripts {
    dev: &'static str,
    build: &'static str,
    start: &'static str,
}

impl Scripts {
    fn for_runtime(runtime: Runtime) -> Self {
        match runtime {
            Runtime::Node => Self {
                dev: "ts-node src/index.ts",
                build: "tsc",
                start: "node dist/index.js",
            },
            Runtime::Bun => Self {
                dev: "bun --watch src/index.ts",
                build: "bun build src/index.ts --outdir dist --target bun",
                start: "bun src/index.ts",
            },
        }
    }
}

pub fn is_node_project(dir: &Path) -> bool {
    dir.join("package.json").is_file()
}

/// `name` field of package.json, if present and non-empty
pub fn package_name(dir: &Path) -> Option<String> {
    let content = std::fs::read_to_string(dir.join("package.json")).ok()?;
    let pkg: Value = serde_json::from_str(&content).ok()?;
    pkg.get("name")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

pub fn has_src_dir(dir: &Path) -> bool {
    dir.join("src").is_dir()
}

/// Lowercase, whitespace runs become `-`, anything outside `[a-z0-9-]` is dropped
pub fn sanitize_package_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_space = false;
    for ch in name.trim().chars() {
        if ch.is_whitespace() {
            if !in_space {
                out.push('-');
            }
            in_space = true;
            continue;
        }
        in_space = false;
        let ch = ch.to_ascii_lowercase();
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-' {
            out.push(ch);
        }
    }
    out
}

/// Write a minimal package.json declaring the framework dependency
pub fn create_package_json(
    dir: &Path,
    name: &str,
    framework: Framework,
    runtime: Runtime,
) -> Result<()> {
    let mut dependencies = BTreeMap::new();
    dependencies.insert(
        framework.package().to_string(),
        framework.version_range().to_string(),
    );

    let manifest = PackageJson {
        name: sanitize_package_name(name),
        version: "1.0.0",
        description: "",
        main: "index.js",
        scripts: Scripts::for_runtime(runtime),
        keywords: Vec::new(),
        author: "",
        license: "ISC",
        dependencies,
    };

    let path = dir.join("package.json");
    let mut content =
        serde_json::to_string_pretty(&manifest).context("Failed to serialize package.json")?;
    content.push('\n');
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::detect_framework;

    #[test]
    fn test_sanitize_package_name() {
        assert_eq!(sanitize_package_name("My Cool  API"), "my-cool-api");
        assert_eq!(sanitize_package_name("shop_api@2"), "shopapi2");
        assert_eq!(sanitize_package_name("already-fine"), "already-fine");
    }

    #[test]
    fn test_create_package_json_is_detectable() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("new-app");
        create_package_json(&dir, "New App", Framework::Fastify, Runtime::Node).unwrap();

        assert!(is_node_project(&dir));
        assert_eq!(package_name(&dir).as_deref(), Some("new-app"));
        assert_eq!(detect_framework(&dir), Some(Framework::Fastify));

        let raw = std::fs::read_to_string(dir.join("package.json")).unwrap();
        assert!(raw.contains("\"dev\": \"ts-node src/index.ts\""));
    }

    #[test]
    fn test_bun_runtime_scripts() {
        let tmp = tempfile::tempdir().unwrap();
        create_package_json(tmp.path(), "api", Framework::Hono, Runtime::Bun).unwrap();
        let raw = std::fs::read_to_string(tmp.path().join("package.json")).unwrap();
        assert!(raw.contains("bun --watch src/index.ts"));
        assert!(raw.contains("\"hono\": \"^4.0.0\""));
    }

    #[test]
    fn test_package_name_ignores_empty_name() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("package.json"), r#"{ "name": "" }"#).unwrap();
        assert_eq!(package_name(tmp.path()), None);
        assert!(!has_src_dir(tmp.path()));
    }
}
