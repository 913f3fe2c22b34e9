//! Consistency checks for the registry shipped in the repository

use std::path::{Path, PathBuf};
use yantr_core::config::{DatabaseType, Framework};
use yantr_core::registry::{verify_registry, Registry, REGISTRY_FILE, TEMPLATES_DIR};

fn registry_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../registry")
}

fn shipped() -> Registry {
    let content = std::fs::read_to_string(registry_dir().join(REGISTRY_FILE)).unwrap();
    serde_json::from_str(&content).unwrap()
}

#[test]
fn every_referenced_template_exists() {
    let report = verify_registry(&registry_dir()).unwrap();
    assert!(report.missing.is_empty(), "missing: {:?}", report.missing);
    assert!(
        report.unreferenced.is_empty(),
        "unreferenced: {:?}",
        report.unreferenced
    );
    assert!(report.checked > 0);
}

#[test]
fn base_templates_cover_every_framework() {
    let registry = shipped();
    for framework in Framework::ALL {
        let files = registry
            .base
            .files
            .for_framework(framework)
            .unwrap_or_else(|| panic!("no base files for {}", framework.key()));
        assert!(
            files.iter().any(|f| f.ends_with("error-handler.ts")),
            "{} has no error handler",
            framework.key()
        );
    }
    assert!(registry
        .base
        .dependencies
        .for_framework(Framework::Express)
        .contains(&"zod".to_string()));
}

#[test]
fn database_offers_every_orm_combination() {
    let registry = shipped();
    for db in DatabaseType::ALL {
        for orm in db.orms() {
            let variant = registry.variant("database", db, *orm).unwrap();
            assert!(!variant.files.is_empty());
            assert!(!variant.dependencies.is_empty());
        }
    }
}

#[test]
fn shared_components_resolve_for_express_and_hono() {
    let registry = shipped();
    let templates = registry_dir().join(TEMPLATES_DIR);
    for name in ["auth", "logger", "security"] {
        for framework in [Framework::Express, Framework::Hono] {
            let files = registry.component_files(name, framework).unwrap();
            for file in files {
                assert!(templates.join(&file).is_file(), "{file} missing");
            }
        }
    }
}

#[test]
fn registry_is_compatible_with_this_release() {
    let registry = shipped();
    let min = registry.min_cli_version.as_deref().unwrap_or("0.0.0");
    assert!(
        yantr_core::registry::check_compatibility(env!("CARGO_PKG_VERSION"), min, "upgrade")
            .is_none()
    );
}
