//! Command flows using cliclack (Charm-style inline prompts)
//!
//! This module is optional and only available when the `tui` feature is enabled.

mod add;
mod generate;
mod init;
mod list;

pub use add::{database_next_steps, run_add, usage_hints, AddArgs};
pub use generate::{run_generate, GenerateArgs};
pub use init::{run_init, InitArgs};
pub use list::{run_list, ListArgs};

use crate::config::PackageManager;
use crate::product::ProductConfig;
use crate::project::display_path;
use crate::registry::{check_compatibility, Registry, RegistryClient};
use crate::runtime::{manual_command, PackageInstaller};
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};

/// Where to load the registry from; shared by every command that needs it
#[derive(Debug, Clone, Default)]
pub struct RegistryArgs {
    /// Local registry directory, preferred over every other source
    pub registry_dir: Option<PathBuf>,

    /// Never touch the network
    pub offline: bool,
}

fn current_dir() -> Result<PathBuf> {
    std::env::current_dir().context("Failed to read the current directory")
}

/// `<srcDir>/lib/yantr` as users write it in import paths
fn lib_path(src_dir: &str) -> String {
    let src = src_dir.trim_end_matches('/');
    let src = if src.is_empty() { "." } else { src };
    format!("{}/lib/yantr", src)
}

/// Load the registry behind a spinner and warn when this CLI is too old for it
async fn load_registry<C: ProductConfig>(
    config: &C,
    args: &RegistryArgs,
    cli_version: &str,
) -> Result<(RegistryClient, Registry)> {
    let mut client = RegistryClient::from_config(config, args.registry_dir.clone(), args.offline)?;

    let spinner = cliclack::spinner();
    spinner.start("Loading registry...");

    let registry = match client.registry().await {
        Ok(registry) => registry.clone(),
        Err(e) => {
            spinner.stop("Failed to load registry");
            return Err(e);
        }
    };

    let origin = client
        .origin()
        .map(ToString::to_string)
        .unwrap_or_default();
    spinner.stop(format!("Registry v{} ({})", registry.version, origin));

    if let Some(min_cli) = &registry.min_cli_version {
        if let Some(warning) = check_compatibility(cli_version, min_cli, config.upgrade_command())
        {
            cliclack::log::warning(format!(
                "Version warning: {}",
                warning.lines().collect::<Vec<_>>().join(" ")
            ))?;
        }
    }

    Ok((client, registry))
}

/// What a dependency install step ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InstallOutcome {
    NothingToInstall,
    Skipped,
    /// The package manager is not in PATH; only the manual command was shown
    Unavailable,
    Finished { failures: usize },
}

/// Install runtime and dev dependencies; failures only produce a warning
async fn install_dependencies(
    pm: PackageManager,
    project_dir: &Path,
    dependencies: &[String],
    dev_dependencies: &[String],
    skip_install: bool,
) -> Result<()> {
    let installer = PackageInstaller::new(pm, project_dir).quiet(true);
    let outcome = run_installs(&installer, dependencies, dev_dependencies, skip_install).await?;
    tracing::debug!(?outcome, "dependency installation");
    Ok(())
}

async fn run_installs(
    installer: &PackageInstaller,
    dependencies: &[String],
    dev_dependencies: &[String],
    skip_install: bool,
) -> Result<InstallOutcome> {
    let pm = installer.package_manager();
    let groups = [(dependencies, false), (dev_dependencies, true)];
    let commands: Vec<String> = groups
        .iter()
        .filter(|(packages, _)| !packages.is_empty())
        .map(|(packages, dev)| manual_command(pm, packages, *dev))
        .collect();
    if commands.is_empty() {
        return Ok(InstallOutcome::NothingToInstall);
    }

    if skip_install {
        cliclack::log::info(format!(
            "Skipping dependency installation. Run: {}",
            commands.join(" && ").cyan()
        ))?;
        return Ok(InstallOutcome::Skipped);
    }

    if !installer.is_available() {
        cliclack::log::warning(format!(
            "{} was not found in PATH. Please run: {}",
            pm,
            commands.join(" && ").cyan()
        ))?;
        return Ok(InstallOutcome::Unavailable);
    }

    let mut failures = 0;
    for (packages, dev) in groups {
        if packages.is_empty() {
            continue;
        }

        let spinner = cliclack::spinner();
        spinner.start(format!("Installing {}...", packages.join(", ")));

        match installer.install(packages, dev).await {
            Ok(()) => spinner.stop(format!("Installed {}", packages.join(", "))),
            Err(e) => {
                failures += 1;
                tracing::debug!("dependency installation failed: {:#}", e);
                spinner.stop("Could not install dependencies automatically");
                cliclack::log::warning(format!(
                    "Please run: {}",
                    manual_command(pm, packages, dev).cyan()
                ))?;
            }
        }
    }

    Ok(InstallOutcome::Finished { failures })
}

/// Body of the "Files created" note
fn files_note(project_dir: &Path, paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|path| format!("{} {}", "✓".green(), display_path(project_dir, path)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn print_steps(title: &str, steps: &[String]) {
    if steps.is_empty() {
        return;
    }

    println!();
    println!("  {}", title.bold());
    println!();

    for (i, step) in steps.iter().enumerate() {
        println!("  {}.  {}", i + 1, step);
    }
    println!();
}
