//! `yantr init`

use super::{
    current_dir, files_note, install_dependencies, lib_path, load_registry, print_steps,
    RegistryArgs,
};
use crate::config::{
    config_exists, config_path, detect_framework, detect_package_manager, write_config,
    Framework, PackageManager, Runtime, YantrConfig,
};
use crate::product::ProductConfig;
use crate::project::{create_package_json, has_src_dir, is_node_project, package_name, yantr_dir};
use crate::registry::{plan_files, write_planned, TemplateVars};
use crate::runtime::check::{check_runtime, install_hint};
use anyhow::{Context, Result};
use std::path::Path;

/// Arguments for the init command
#[derive(Debug, Clone, Default)]
pub struct InitArgs {
    /// Create `./<name>` (and its package.json) instead of using the current directory
    pub project_name: Option<String>,

    pub framework: Option<Framework>,

    pub runtime: Option<Runtime>,

    pub package_manager: Option<PackageManager>,

    /// Directory that receives `lib/yantr`, relative to the project root
    pub src_dir: Option<String>,

    pub skip_install: bool,

    /// Auto-confirm all prompts (non-interactive mode)
    pub yes: bool,

    pub registry: RegistryArgs,
}

/// Set up yantr in a new or existing Node.js project
pub async fn run_init<C: ProductConfig>(config: &C, args: InitArgs, cli_version: &str) -> Result<()> {
    cliclack::intro(format!("{} init", config.display_name()))?;

    // Step 1: Resolve the project directory
    let cwd = current_dir()?;
    let project_dir = match &args.project_name {
        Some(name) => cwd.join(name),
        None => cwd.clone(),
    };

    if args.project_name.is_none() && !is_node_project(&project_dir) {
        cliclack::log::error("No package.json found in current directory.")?;
        cliclack::log::info(
            "Run this command in an existing Node.js project, pass a project name, or run: npm init -y",
        )?;
        cliclack::outro_cancel("Initialization cancelled.")?;
        anyhow::bail!("No package.json found in {}", project_dir.display());
    }

    // Step 2: Existing config
    if config_exists(&project_dir) && !args.yes {
        let overwrite = cliclack::confirm("yantr.json already exists. Overwrite?")
            .initial_value(false)
            .interact()?;
        if !overwrite {
            cliclack::outro_cancel("Initialization cancelled.")?;
            return Ok(());
        }
    }

    // Step 3: Framework and runtime
    let framework = select_framework(&args, &project_dir)?;
    if !framework.is_fully_supported() {
        cliclack::log::warning(format!(
            "{} support is limited to the base templates for now; components will follow.",
            framework.display_name()
        ))?;
    }
    let runtime = select_runtime(&args)?;
    check_runtime_installed(runtime)?;

    // Step 4: Create the project when it does not exist yet
    let created_project = match &args.project_name {
        Some(name) if !is_node_project(&project_dir) => {
            std::fs::create_dir_all(&project_dir).with_context(|| {
                format!("Failed to create directory: {}", project_dir.display())
            })?;
            create_package_json(&project_dir, name, framework, runtime)?;
            cliclack::log::success(format!("Created {}/package.json", name))?;
            true
        }
        _ => false,
    };

    // Step 5: Project settings
    let project_name = select_project_name(&args, &project_dir)?;
    let src_dir = select_src_dir(&args, &project_dir, created_project)?;
    let package_manager = select_package_manager(&args, &project_dir, runtime)?;

    // Step 6: Registry and base templates, then config
    let (mut client, registry) = load_registry(config, &args.registry, cli_version).await?;

    let base_files = registry
        .base
        .files
        .for_framework(framework)
        .map(<[String]>::to_vec)
        .unwrap_or_default();

    let spinner = cliclack::spinner();
    spinner.start("Setting up base templates...");
    let contents = match client.fetch_files(&base_files).await {
        Ok(contents) => contents,
        Err(e) => {
            spinner.stop("Failed to fetch base templates");
            return Err(e);
        }
    };
    let vars = TemplateVars {
        project_name: project_name.clone(),
        src_dir: src_dir.clone(),
    };
    let planned = plan_files(contents, &yantr_dir(&project_dir, &src_dir), &vars)?;

    let yantr_config = YantrConfig::new(
        project_name,
        src_dir.clone(),
        framework,
        runtime,
        package_manager,
    );
    write_config(&project_dir, &yantr_config)?;
    let written = write_planned(&planned).await?;
    spinner.stop("Base templates created");

    // Step 7: Dependencies
    let mut dependencies = registry.base.dependencies.for_framework(framework);
    let mut dev_dependencies = registry.base.dev_dependencies.for_framework(framework);
    if created_project {
        dependencies.insert(0, framework.package().to_string());
        dev_dependencies.extend(framework.dev_dependencies().iter().map(|d| d.to_string()));
    }
    install_dependencies(
        package_manager,
        &project_dir,
        &dependencies,
        &dev_dependencies,
        args.skip_install,
    )
    .await?;

    // Step 8: Summary
    let mut created = vec![config_path(&project_dir)];
    if created_project {
        created.insert(0, project_dir.join("package.json"));
    }
    created.extend(written);
    cliclack::note("Files created", files_note(&project_dir, &created))?;

    let mut steps = Vec::new();
    if let Some(name) = &args.project_name {
        steps.push(format!("cd {}", name));
    }
    steps.extend(config.init_next_steps(framework, &lib_path(&src_dir)));
    print_steps("Next steps", &steps);

    cliclack::outro(format!("{} initialized successfully!", config.display_name()))?;

    Ok(())
}

fn select_framework(args: &InitArgs, project_dir: &Path) -> Result<Framework> {
    if let Some(framework) = args.framework {
        return Ok(framework);
    }

    if let Some(framework) = detect_framework(project_dir) {
        cliclack::log::info(format!("Detected framework: {}", framework.display_name()))?;
        return Ok(framework);
    }

    if args.yes {
        return Ok(Framework::Express);
    }

    let mut select = cliclack::select("Which framework are you using?");
    for framework in Framework::ALL {
        let hint = if framework.is_fully_supported() {
            ""
        } else {
            "base templates only"
        };
        select = select.item(framework, framework.display_name(), hint);
    }
    Ok(select.initial_value(Framework::Express).interact()?)
}

fn select_runtime(args: &InitArgs) -> Result<Runtime> {
    if let Some(runtime) = args.runtime {
        return Ok(runtime);
    }
    if args.yes {
        return Ok(Runtime::default());
    }

    let runtime = cliclack::select("Which runtime?")
        .item(Runtime::Node, Runtime::Node.display_name(), "")
        .item(Runtime::Bun, Runtime::Bun.display_name(), "")
        .initial_value(Runtime::default())
        .interact()?;
    Ok(runtime)
}

/// Advisory only; the project can be set up without the runtime installed
fn check_runtime_installed(runtime: Runtime) -> Result<()> {
    let info = check_runtime(runtime);
    if info.available {
        cliclack::log::success(format!(
            "{} ({})",
            info.name,
            info.version.as_deref().unwrap_or("unknown")
        ))?;
    } else {
        cliclack::log::warning(format!(
            "{} is not installed; {}",
            info.name,
            install_hint(runtime)
        ))?;
    }
    Ok(())
}

fn select_project_name(args: &InitArgs, project_dir: &Path) -> Result<String> {
    let detected = package_name(project_dir)
        .or_else(|| {
            project_dir
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| "my-app".to_string());

    if args.yes || args.project_name.is_some() {
        return Ok(detected);
    }

    let name: String = cliclack::input("Project name")
        .placeholder(&detected)
        .default_input(&detected)
        .interact()?;
    Ok(if name.trim().is_empty() {
        detected
    } else {
        name.trim().to_string()
    })
}

fn select_src_dir(args: &InitArgs, project_dir: &Path, created_project: bool) -> Result<String> {
    if let Some(src_dir) = &args.src_dir {
        return Ok(src_dir.clone());
    }

    let default = if created_project || has_src_dir(project_dir) {
        "./src"
    } else {
        "."
    };
    if args.yes {
        return Ok(default.to_string());
    }

    let src_dir: &str = cliclack::select("Where should yantr put generated files?")
        .item("./src", "./src", "recommended")
        .item(".", ". (project root)", "")
        .item("./lib", "./lib", "")
        .initial_value(default)
        .interact()?;
    Ok(src_dir.to_string())
}

fn select_package_manager(
    args: &InitArgs,
    project_dir: &Path,
    runtime: Runtime,
) -> Result<PackageManager> {
    if let Some(pm) = args.package_manager {
        return Ok(pm);
    }

    let detected = detect_package_manager(project_dir);
    let default = detected.unwrap_or(match runtime {
        Runtime::Bun => PackageManager::Bun,
        Runtime::Node => PackageManager::Npm,
    });
    if args.yes || detected.is_some() {
        if detected.is_some() {
            cliclack::log::info(format!("Detected package manager: {}", default))?;
        }
        return Ok(default);
    }

    let mut select = cliclack::select("Package manager");
    for pm in PackageManager::ALL {
        select = select.item(pm, pm.command(), "");
    }
    Ok(select.initial_value(default).interact()?)
}
