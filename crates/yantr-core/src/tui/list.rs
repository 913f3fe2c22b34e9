//! `yantr list`

use super::{current_dir, load_registry, RegistryArgs};
use crate::config::{config_exists, read_config, YantrConfig};
use crate::product::ProductConfig;
use crate::registry::{Component, Registry};
use anyhow::Result;
use colored::Colorize;

#[derive(Debug, Clone, Default)]
pub struct ListArgs {
    pub registry: RegistryArgs,
}

pub async fn run_list<C: ProductConfig>(config: &C, args: ListArgs, cli_version: &str) -> Result<()> {
    cliclack::intro(format!("{} components", config.display_name()))?;

    let cwd = current_dir()?;
    let project = if config_exists(&cwd) {
        Some(read_config(&cwd)?)
    } else {
        None
    };

    let (_, registry) = load_registry(config, &args.registry, cli_version).await?;
    cliclack::note("Available components", component_lines(&registry, project.as_ref()))?;

    if project.is_none() {
        cliclack::log::remark(format!(
            "No yantr.json here; run {} to set up this project.",
            format!("{} init", config.name()).cyan()
        ))?;
    }

    cliclack::outro(format!(
        "Add one with: {}",
        format!("{} add <component>", config.name()).cyan()
    ))?;
    Ok(())
}

fn component_lines(registry: &Registry, project: Option<&YantrConfig>) -> String {
    let width = registry
        .components
        .keys()
        .map(String::len)
        .max()
        .unwrap_or(0);

    registry
        .components
        .iter()
        .map(|(key, component)| {
            let installed = project.is_some_and(|p| p.has_component(key));
            let marker = if installed {
                "✓".green()
            } else {
                "•".dimmed()
            };
            let mut line = format!(
                "{} {:<width$}  {}",
                marker,
                key,
                component.description,
                width = width
            );
            if let Some(note) = project.and_then(|p| availability_note(component, p)) {
                line.push_str(&format!(" {}", note.yellow()));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Set when the component has no files for the project's framework
fn availability_note(component: &Component, project: &YantrConfig) -> Option<String> {
    if !component.variants.is_empty() || component.files.for_framework(project.framework).is_some() {
        return None;
    }
    Some(format!(
        "(not yet available for {})",
        project.framework.display_name()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Framework, PackageManager, Runtime};

    const REGISTRY: &str = r#"{
        "version": "0.1.0",
        "baseUrl": "https://example.com/templates",
        "components": {
            "auth": {
                "name": "Authentication",
                "description": "JWT auth",
                "files": { "express": ["express/auth/auth.routes.ts"] }
            },
            "logger": {
                "name": "Logger",
                "description": "Pino logging",
                "files": ["logger/logger.ts"]
            }
        }
    }"#;

    #[test]
    fn test_component_lines_mark_installed_and_unavailable() {
        colored::control::set_override(false);
        let registry: Registry = serde_json::from_str(REGISTRY).unwrap();
        let mut project = YantrConfig::new(
            "api",
            "./src",
            Framework::Fastify,
            Runtime::Node,
            PackageManager::Npm,
        );
        project.record_component("logger");

        let lines = component_lines(&registry, Some(&project));
        assert_eq!(
            lines,
            "• auth    JWT auth (not yet available for Fastify)\n✓ logger  Pino logging"
        );

        let lines = component_lines(&registry, None);
        assert_eq!(lines, "• auth    JWT auth\n• logger  Pino logging");
    }
}
