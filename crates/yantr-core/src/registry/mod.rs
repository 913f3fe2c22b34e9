//! Component registry: descriptor types, loading, caching and file placement
//!
//! This module provides:
//! - Registry descriptor types (Registry, Component, Variant)
//! - Registry loading from local directories, the file cache or a remote URL
//! - Template placement into the target project
//! - Version compatibility checking
//! - Consistency checks for a local registry directory

pub mod cache;
pub mod copier;
pub mod fetcher;
pub mod manifest;
pub mod version;

use anyhow::{Context, Result};
use colored::Colorize;
use std::collections::BTreeSet;
use std::path::Path;
use walkdir::WalkDir;

pub use cache::RegistryCache;
pub use copier::{plan_files, write_planned, PlannedFile, TemplateVars};
pub use fetcher::{RegistryClient, RegistryOrigin, REGISTRY_FILE, TEMPLATES_DIR};
pub use manifest::{BaseTemplates, Component, ComponentFiles, DependencyList, Registry, Variant};
pub use version::check_compatibility;

/// Result of checking a local registry directory
#[derive(Debug, Default, Clone, PartialEq)]
pub struct VerifyReport {
    /// Referenced by registry.json but absent from templates/
    pub missing: Vec<String>,
    /// Present in templates/ but referenced by nothing
    pub unreferenced: Vec<String>,
    pub checked: usize,
}

impl VerifyReport {
    pub fn is_ok(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Compare registry.json against the files under templates/
pub fn verify_registry(dir: &Path) -> Result<VerifyReport> {
    let registry_path = dir.join(REGISTRY_FILE);
    let content = std::fs::read_to_string(&registry_path)
        .with_context(|| format!("Failed to read {}", registry_path.display()))?;
    let registry: Registry = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", registry_path.display()))?;

    let templates_dir = dir.join(TEMPLATES_DIR);
    let mut on_disk = BTreeSet::new();
    if templates_dir.is_dir() {
        for entry in WalkDir::new(&templates_dir) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(&templates_dir)
                .with_context(|| format!("Unexpected path {}", entry.path().display()))?;
            let key = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            on_disk.insert(key);
        }
    }

    let referenced: BTreeSet<String> = registry
        .referenced_files()
        .into_iter()
        .map(str::to_string)
        .collect();

    Ok(VerifyReport {
        missing: referenced.difference(&on_disk).cloned().collect(),
        unreferenced: on_disk.difference(&referenced).cloned().collect(),
        checked: referenced.len(),
    })
}

/// Print a verify report; fails when referenced templates are missing
pub fn print_verify_report(dir: &Path, report: &VerifyReport) -> Result<()> {
    println!(
        "{}",
        format!("Verifying registry in {}...", dir.display())
            .cyan()
            .bold()
    );
    println!();

    for file in &report.missing {
        println!("  {} {}", "missing".red(), file);
    }
    for file in &report.unreferenced {
        println!("  {} {}", "unreferenced".yellow(), file);
    }
    if !report.missing.is_empty() || !report.unreferenced.is_empty() {
        println!();
    }

    if !report.is_ok() {
        anyhow::bail!(
            "{} referenced template(s) missing from {}",
            report.missing.len(),
            dir.join(TEMPLATES_DIR).display()
        );
    }

    println!(
        "{} {} template reference(s) in {}",
        "Verified".green().bold(),
        report.checked,
        dir.display()
    );
    Ok(())
}
