//! yantr.json reading and writing

use super::options::{DatabaseType, Framework, Orm, PackageManager, Runtime};
use crate::error::Error;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the project config file
pub const CONFIG_FILE: &str = "yantr.json";

/// JSON schema advertised in freshly written configs
pub const SCHEMA_URL: &str =
    "https://raw.githubusercontent.com/SibilSoren/yantr-js/main/cli/schema.json";

/// Database selection recorded by `yantr add database`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(rename = "type")]
    pub db_type: DatabaseType,
    pub orm: Orm,
}

/// Contents of yantr.json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YantrConfig {
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    pub project_name: String,

    #[serde(default = "default_src_dir")]
    pub src_dir: String,

    #[serde(default = "default_framework")]
    pub framework: Framework,

    #[serde(default)]
    pub runtime: Runtime,

    pub package_manager: PackageManager,

    #[serde(default)]
    pub installed_components: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<DatabaseConfig>,
}

fn default_src_dir() -> String {
    "./src".to_string()
}

fn default_framework() -> Framework {
    Framework::Express
}

impl YantrConfig {
    pub fn new(
        project_name: impl Into<String>,
        src_dir: impl Into<String>,
        framework: Framework,
        runtime: Runtime,
        package_manager: PackageManager,
    ) -> Self {
        Self {
            schema: Some(SCHEMA_URL.to_string()),
            project_name: project_name.into(),
            src_dir: src_dir.into(),
            framework,
            runtime,
            package_manager,
            installed_components: Vec::new(),
            database: None,
        }
    }

    pub fn has_component(&self, name: &str) -> bool {
        self.installed_components.iter().any(|c| c == name)
    }

    /// Record a component; returns false when it was already listed
    pub fn record_component(&mut self, name: &str) -> bool {
        if self.has_component(name) {
            return false;
        }
        self.installed_components.push(name.to_string());
        true
    }
}

pub fn config_path(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILE)
}

pub fn config_exists(dir: &Path) -> bool {
    config_path(dir).is_file()
}

pub fn read_config(dir: &Path) -> Result<YantrConfig> {
    let path = config_path(dir);
    if !path.is_file() {
        return Err(Error::ConfigNotFound(dir.to_path_buf()).into());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config = serde_json::from_str(&content).map_err(|source| Error::ConfigParse {
        path: path.clone(),
        source,
    })?;
    Ok(config)
}

pub fn write_config(dir: &Path, config: &YantrConfig) -> Result<()> {
    let path = config_path(dir);
    let mut content =
        serde_json::to_string_pretty(config).context("Failed to serialize yantr.json")?;
    content.push('\n');
    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::debug!(path = %path.display(), "wrote project config");
    Ok(())
}

/// Add a component to the installed list, rewriting the file only when it changes
pub fn add_installed_component(dir: &Path, component: &str) -> Result<()> {
    let mut config = read_config(dir)?;
    if config.record_component(component) {
        write_config(dir, &config)?;
    }
    Ok(())
}

pub fn is_component_installed(dir: &Path, component: &str) -> Result<bool> {
    Ok(read_config(dir)?.has_component(component))
}

pub fn set_database_config(dir: &Path, db_type: DatabaseType, orm: Orm) -> Result<()> {
    orm.ensure_matches(db_type)?;
    let mut config = read_config(dir)?;
    config.database = Some(DatabaseConfig { db_type, orm });
    write_config(dir, &config)
}
