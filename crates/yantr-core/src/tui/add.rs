//! `yantr add <component>`

use super::{
    current_dir, files_note, install_dependencies, lib_path, load_registry, print_steps,
    RegistryArgs,
};
use crate::config::{
    add_installed_component, read_config, set_database_config, DatabaseType, Framework, Orm,
    YantrConfig,
};
use crate::product::ProductConfig;
use crate::project::{display_path, yantr_dir};
use crate::registry::{plan_files, write_planned, Component, PlannedFile, RegistryClient, TemplateVars};
use anyhow::Result;
use colored::Colorize;
use std::path::Path;

/// Arguments for the add command
#[derive(Debug, Clone, Default)]
pub struct AddArgs {
    /// Registry key of the component (auth, logger, security, database)
    pub component: String,

    /// Replace existing files without asking
    pub overwrite: bool,

    /// Database type for components with database variants
    pub db_type: Option<DatabaseType>,

    pub orm: Option<Orm>,

    pub skip_install: bool,

    pub registry: RegistryArgs,
}

pub async fn run_add<C: ProductConfig>(config: &C, args: AddArgs, cli_version: &str) -> Result<()> {
    cliclack::intro(format!("{} add {}", config.name(), args.component))?;

    let cwd = current_dir()?;
    let project = read_config(&cwd)?;

    let (mut client, registry) = load_registry(config, &args.registry, cli_version).await?;
    let component = registry.component(&args.component)?.clone();

    if component.variants.is_empty() {
        add_component(&mut client, &cwd, &project, &component, &args).await
    } else {
        add_variant(&mut client, &cwd, &project, &component, &args).await
    }
}

async fn add_component(
    client: &mut RegistryClient,
    project_dir: &Path,
    project: &YantrConfig,
    component: &Component,
    args: &AddArgs,
) -> Result<()> {
    let key = args.component.as_str();
    let files = component.files_for(key, project.framework)?;

    let mut overwrite = args.overwrite;
    if project.has_component(key) && !overwrite {
        let reinstall = cliclack::confirm(format!(
            "{} is already installed. Overwrite it?",
            component.name
        ))
        .initial_value(false)
        .interact()?;
        if !reinstall {
            cliclack::outro_cancel("Nothing changed.")?;
            return Ok(());
        }
        overwrite = true;
    }

    let dest = yantr_dir(project_dir, &project.src_dir).join(key);
    let planned = fetch_and_plan(client, &files, &dest, project).await?;
    let planned = confirm_overwrites(project_dir, planned, overwrite)?;
    let written = write_planned(&planned).await?;

    let dependencies = component.dependencies.for_framework(project.framework);
    let dev_dependencies = component.dev_dependencies.for_framework(project.framework);
    if !dependencies.is_empty() {
        cliclack::log::info(format!("Dependencies: {}", dependencies.join(", ").cyan()))?;
    }
    install_dependencies(
        project.package_manager,
        project_dir,
        &dependencies,
        &dev_dependencies,
        args.skip_install,
    )
    .await?;

    add_installed_component(project_dir, key)?;

    if !written.is_empty() {
        cliclack::note("Files created", files_note(project_dir, &written))?;
    }
    print_steps(
        "Usage",
        &usage_hints(key, project.framework, &project.src_dir),
    );

    cliclack::outro(format!("{} added successfully!", component.name))?;
    Ok(())
}

async fn add_variant(
    client: &mut RegistryClient,
    project_dir: &Path,
    project: &YantrConfig,
    component: &Component,
    args: &AddArgs,
) -> Result<()> {
    let key = args.component.as_str();
    let Some((db_type, orm)) = select_database(project, args)? else {
        cliclack::outro_cancel("Nothing changed.")?;
        return Ok(());
    };

    let variant_key = Component::variant_key(db_type, orm);
    let variant = component
        .variant(db_type, orm)
        .ok_or_else(|| crate::error::Error::UnknownVariant {
            component: key.to_string(),
            variant: variant_key,
        })?;
    cliclack::log::info(format!("Setting up {}", variant.label))?;

    let dest = yantr_dir(project_dir, &project.src_dir).join(key);
    let planned = fetch_and_plan(client, &variant.files, &dest, project).await?;
    let planned = confirm_overwrites(project_dir, planned, args.overwrite)?;
    let written = write_planned(&planned).await?;

    install_dependencies(
        project.package_manager,
        project_dir,
        &variant.dependencies,
        &variant.dev_dependencies,
        args.skip_install,
    )
    .await?;

    set_database_config(project_dir, db_type, orm)?;
    add_installed_component(project_dir, key)?;

    if !written.is_empty() {
        cliclack::note("Files created", files_note(project_dir, &written))?;
    }
    print_steps("Next steps", &database_next_steps(orm));

    cliclack::outro(format!("Database configured with {}!", variant.label))?;
    Ok(())
}

async fn fetch_and_plan(
    client: &mut RegistryClient,
    files: &[String],
    dest: &Path,
    project: &YantrConfig,
) -> Result<Vec<PlannedFile>> {
    let spinner = cliclack::spinner();
    spinner.start("Fetching templates...");

    let contents = match client.fetch_files(files).await {
        Ok(contents) => contents,
        Err(e) => {
            spinner.stop("Failed to fetch templates");
            return Err(e);
        }
    };
    spinner.stop(format!("Fetched {} template(s)", contents.len()));

    let vars = TemplateVars {
        project_name: project.project_name.clone(),
        src_dir: project.src_dir.clone(),
    };
    plan_files(contents, dest, &vars)
}

/// Ask before replacing each existing file unless `overwrite` is set; declined files are dropped
fn confirm_overwrites(
    project_dir: &Path,
    planned: Vec<PlannedFile>,
    overwrite: bool,
) -> Result<Vec<PlannedFile>> {
    let mut kept = Vec::with_capacity(planned.len());
    for file in planned {
        if file.exists && !overwrite {
            let shown = display_path(project_dir, &file.target);
            let replace = cliclack::confirm(format!("{} already exists. Overwrite?", shown))
                .initial_value(false)
                .interact()?;
            if !replace {
                cliclack::log::remark(format!("Skipped {}", shown))?;
                continue;
            }
        }
        kept.push(file);
    }
    Ok(kept)
}

/// Database type and ORM from flags, else from prompts; `None` when the user keeps the current setup
fn select_database(project: &YantrConfig, args: &AddArgs) -> Result<Option<(DatabaseType, Orm)>> {
    match (args.db_type, args.orm) {
        (Some(db_type), Some(orm)) => {
            orm.ensure_matches(db_type)?;
            return Ok(Some((db_type, orm)));
        }
        (None, Some(orm)) => return Ok(Some((orm.database_type(), orm))),
        (Some(db_type), None) => return Ok(Some((db_type, select_orm(db_type)?))),
        (None, None) => {}
    }

    if let Some(current) = project.database {
        if !args.overwrite {
            let reconfigure = cliclack::confirm(format!(
                "Database already configured ({} + {}). Reconfigure?",
                current.db_type.display_name(),
                current.orm.display_name()
            ))
            .initial_value(false)
            .interact()?;
            if !reconfigure {
                return Ok(None);
            }
        }
    }

    let mut select = cliclack::select("Which database?");
    for db_type in DatabaseType::ALL {
        select = select.item(db_type, db_type.display_name(), "");
    }
    let db_type = select.initial_value(DatabaseType::Postgres).interact()?;

    Ok(Some((db_type, select_orm(db_type)?)))
}

fn select_orm(db_type: DatabaseType) -> Result<Orm> {
    let orms = db_type.orms();
    if let [only] = orms {
        return Ok(*only);
    }

    let mut select = cliclack::select("Which ORM?");
    for orm in orms {
        let hint = if *orm == db_type.default_orm() {
            "recommended"
        } else {
            ""
        };
        select = select.item(*orm, orm.display_name(), hint);
    }
    Ok(select.initial_value(db_type.default_orm()).interact()?)
}

/// How to wire an added component into the application
pub fn usage_hints(component: &str, framework: Framework, src_dir: &str) -> Vec<String> {
    let lib = lib_path(src_dir);
    match (component, framework) {
        ("auth", Framework::Hono) => vec![
            format!("import authRoutes from '{}/auth/auth.routes';", lib),
            "app.route('/api/auth', authRoutes);".to_string(),
        ],
        ("auth", _) => vec![
            format!("import authRoutes from '{}/auth/auth.routes';", lib),
            "app.use('/api/auth', authRoutes);".to_string(),
        ],
        ("logger", Framework::Fastify) => vec![
            format!("import {{ logger }} from '{}/logger/logger';", lib),
            "const app = Fastify({ loggerInstance: logger });".to_string(),
        ],
        ("logger", Framework::Hono) => vec![
            format!("import {{ logger }} from '{}/logger/logger';", lib),
            format!("import {{ httpLogger }} from '{}/logger/http-logger';", lib),
            "app.use('*', httpLogger);".to_string(),
        ],
        ("logger", _) => vec![
            format!("import {{ logger }} from '{}/logger/logger';", lib),
            format!("import {{ httpLogger }} from '{}/logger/http-logger';", lib),
            "app.use(httpLogger);".to_string(),
        ],
        ("security", Framework::Hono) => vec![
            format!("import {{ helmetConfig, rateLimiter }} from '{}/security';", lib),
            "app.use('*', helmetConfig); app.use('*', rateLimiter);".to_string(),
        ],
        ("security", _) => vec![
            format!("import {{ helmetConfig, rateLimiter }} from '{}/security';", lib),
            "app.use(helmetConfig); app.use(rateLimiter);".to_string(),
        ],
        _ => Vec::new(),
    }
}

/// ORM-specific setup left to the user after `add database`
pub fn database_next_steps(orm: Orm) -> Vec<String> {
    let steps: &[&str] = match orm {
        Orm::Prisma => &[
            "Initialize Prisma: npx prisma init",
            "Configure DATABASE_URL in .env",
            "Run migrations: npx prisma migrate dev",
        ],
        Orm::Drizzle => &[
            "Configure DATABASE_URL in .env",
            "Create drizzle.config.ts for migrations",
            "Run migrations: npx drizzle-kit push",
        ],
        Orm::Mongoose => &[
            "Configure MONGODB_URI in .env",
            "Call connectDB() before using models",
            "Create your schemas in models.ts",
        ],
    };
    steps.iter().map(|s| s.to_string()).collect()
}
