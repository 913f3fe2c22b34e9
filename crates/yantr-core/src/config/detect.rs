//! Framework and package manager detection for existing projects

use super::options::{Framework, PackageManager};
use serde_json::Value;
use std::path::Path;

/// Lockfiles in order of precedence
const LOCKFILES: &[(&str, PackageManager)] = &[
    ("pnpm-lock.yaml", PackageManager::Pnpm),
    ("yarn.lock", PackageManager::Yarn),
    ("bun.lockb", PackageManager::Bun),
    ("bun.lock", PackageManager::Bun),
    ("package-lock.json", PackageManager::Npm),
];

/// Detect the package manager from the lockfile present in `dir`
pub fn detect_package_manager(dir: &Path) -> Option<PackageManager> {
    LOCKFILES
        .iter()
        .find(|(file, _)| dir.join(file).is_file())
        .map(|(_, pm)| *pm)
}

/// Detect the framework from package.json dependencies and devDependencies.
/// Hono and Fastify win over Express when several are listed.
pub fn detect_framework(dir: &Path) -> Option<Framework> {
    let content = std::fs::read_to_string(dir.join("package.json")).ok()?;
    let pkg: Value = serde_json::from_str(&content).ok()?;

    let has_dep = |name: &str| {
        ["dependencies", "devDependencies"]
            .iter()
            .any(|section| pkg.get(section).and_then(|deps| deps.get(name)).is_some())
    };

    [Framework::Hono, Framework::Fastify, Framework::Express]
        .into_iter()
        .find(|fw| has_dep(fw.package()))
}
