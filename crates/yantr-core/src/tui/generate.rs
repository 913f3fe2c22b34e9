//! `yantr generate <type> <name>`

use super::{current_dir, files_note, print_steps};
use crate::config::{read_config, YantrConfig};
use crate::generate::{mount_hint, route_files, write_generated, GenerateKind, ResourceNames};
use crate::product::ProductConfig;
use crate::project::display_path;
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Arguments for the generate command
#[derive(Debug, Clone, Default)]
pub struct GenerateArgs {
    /// What to generate (`route`)
    pub kind: String,

    /// Resource name in any casing (`users`, `BlogPost`, `order_items`)
    pub name: String,
}

pub async fn run_generate<C: ProductConfig>(config: &C, args: GenerateArgs) -> Result<()> {
    cliclack::intro(format!("{} generate {}", config.name(), args.kind))?;

    let kind = GenerateKind::parse(&args.kind)?;
    let cwd = current_dir()?;
    let project = read_config(&cwd)?;
    let names = ResourceNames::new(&args.name)?;

    match kind {
        GenerateKind::Route => generate_route(&cwd, &project, &names).await,
    }
}

async fn generate_route(project_dir: &Path, project: &YantrConfig, names: &ResourceNames) -> Result<()> {
    let files = route_files(project_dir, &project.src_dir, names, project.framework);

    let existing: Vec<&PathBuf> = files
        .iter()
        .map(|file| &file.path)
        .filter(|path| path.exists())
        .collect();
    if !existing.is_empty() {
        for path in &existing {
            cliclack::log::warning(format!(
                "{} already exists",
                display_path(project_dir, path)
            ))?;
        }
        let overwrite = cliclack::confirm("Overwrite existing files?")
            .initial_value(false)
            .interact()?;
        if !overwrite {
            cliclack::outro_cancel("Generation cancelled.")?;
            return Ok(());
        }
    }

    let spinner = cliclack::spinner();
    spinner.start(format!("Generating {} route...", names.kebab));
    write_generated(&files).await?;
    spinner.stop(format!(
        "Generated {} route for {}",
        names.kebab,
        project.framework.display_name()
    ));

    let paths: Vec<PathBuf> = files.iter().map(|file| file.path.clone()).collect();
    cliclack::note("Files created", files_note(project_dir, &paths))?;

    print_steps(
        "Mount the router",
        &mount_hint(project.framework, &project.src_dir, names),
    );

    cliclack::outro(format!("{} route ready!", names.pascal))?;
    Ok(())
}
