//! Yantr CLI - production-ready components for Node.js backends

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use yantr_core::config::{DatabaseType, Framework, Orm, PackageManager, Runtime};
use yantr_core::tui::{AddArgs, GenerateArgs, InitArgs, ListArgs, RegistryArgs};
use yantr_core::ProductConfig;

/// CLI version
pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable holding a tracing filter (e.g. `yantr_core=debug`)
const LOG_ENV: &str = "YANTR_LOG";

/// Yantr product configuration
#[derive(Clone)]
pub struct YantrProduct;

impl ProductConfig for YantrProduct {
    fn name(&self) -> &'static str {
        "yantr"
    }

    fn display_name(&self) -> &'static str {
        "Yantr"
    }

    fn default_registry_url(&self) -> &'static str {
        "https://raw.githubusercontent.com/SibilSoren/yantr-js/main/cli/registry/registry.json"
    }

    fn registry_url_env(&self) -> &'static str {
        "YANTR_REGISTRY_URL"
    }

    fn registry_dir_env(&self) -> &'static str {
        "YANTR_REGISTRY_DIR"
    }

    fn cache_dir_env(&self) -> &'static str {
        "YANTR_CACHE_DIR"
    }

    fn offline_env(&self) -> &'static str {
        "YANTR_OFFLINE"
    }

    fn docs_url(&self) -> &'static str {
        "https://yantr-js.vercel.app/docs"
    }

    fn upgrade_command(&self) -> &'static str {
        "cargo install yantr-cli --force"
    }

    fn init_next_steps(&self, framework: Framework, templates_dir: &str) -> Vec<String> {
        let mount = match framework {
            Framework::Express => "app.use(errorHandler);  // after your routes",
            Framework::Hono => "app.onError(errorHandler);",
            Framework::Fastify => "app.setErrorHandler(errorHandler);",
        };

        vec![
            format!(
                "Add the error handler to your {} app:\n      import {{ errorHandler }} from '{}/error-handler';\n      {}",
                framework.display_name(),
                templates_dir,
                mount
            ),
            format!("Add components: {} add auth", self.name()),
            format!("Generate routes: {} generate route users", self.name()),
        ]
    }

    fn user_agent(&self) -> &'static str {
        concat!("yantr/", env!("CARGO_PKG_VERSION"))
    }
}

#[derive(Parser, Debug)]
#[command(name = "yantr")]
#[command(about = "Add production-ready components to Express, Hono and Fastify backends")]
#[command(version, arg_required_else_help = true)]
pub struct Args {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace); YANTR_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize yantr in a new or existing Node.js project
    Init(CliInitArgs),
    /// Add a component (auth, logger, security, database) to the project
    Add(CliAddArgs),
    /// Generate boilerplate code
    #[command(visible_alias = "g")]
    Generate(CliGenerateArgs),
    /// List the components available in the registry
    List(CliListArgs),
    /// Open the documentation in the browser
    Docs,
    /// Registry maintenance (for development use)
    Registry {
        #[command(subcommand)]
        command: RegistryCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum RegistryCommand {
    /// Check that every template referenced by registry.json exists
    Verify(VerifyArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct RegistrySource {
    /// Local registry directory containing registry.json and templates/ (for development use)
    #[arg(long = "registry-dir")]
    pub registry_dir: Option<PathBuf>,

    /// Do not fetch the registry over the network
    #[arg(long)]
    pub offline: bool,
}

impl From<RegistrySource> for RegistryArgs {
    fn from(source: RegistrySource) -> Self {
        RegistryArgs {
            registry_dir: source.registry_dir,
            offline: source.offline,
        }
    }
}

#[derive(Parser, Debug)]
pub struct CliInitArgs {
    /// Create a new project in ./<PROJECT_NAME> instead of using the current directory
    pub project_name: Option<String>,

    /// Auto-confirm all prompts (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,

    /// Web framework
    #[arg(short, long, value_enum)]
    pub framework: Option<Framework>,

    /// JavaScript runtime
    #[arg(short, long, value_enum)]
    pub runtime: Option<Runtime>,

    /// Package manager used to install dependencies
    #[arg(long = "package-manager", value_enum)]
    pub package_manager: Option<PackageManager>,

    /// Source directory that receives lib/yantr (e.g. ./src)
    #[arg(long = "src-dir")]
    pub src_dir: Option<String>,

    /// Do not install dependencies
    #[arg(long = "skip-install")]
    pub skip_install: bool,

    #[command(flatten)]
    pub source: RegistrySource,
}

impl From<CliInitArgs> for InitArgs {
    fn from(args: CliInitArgs) -> Self {
        InitArgs {
            project_name: args.project_name,
            framework: args.framework,
            runtime: args.runtime,
            package_manager: args.package_manager,
            src_dir: args.src_dir,
            skip_install: args.skip_install,
            yes: args.yes,
            registry: args.source.into(),
        }
    }
}

#[derive(Parser, Debug)]
pub struct CliAddArgs {
    /// Component to add
    pub component: String,

    /// Overwrite existing files without asking
    #[arg(short, long)]
    pub overwrite: bool,

    /// Database type (database component only)
    #[arg(long = "type", value_enum)]
    pub db_type: Option<DatabaseType>,

    /// ORM (database component only)
    #[arg(long, value_enum)]
    pub orm: Option<Orm>,

    /// Do not install dependencies
    #[arg(long = "skip-install")]
    pub skip_install: bool,

    #[command(flatten)]
    pub source: RegistrySource,
}

impl From<CliAddArgs> for AddArgs {
    fn from(args: CliAddArgs) -> Self {
        AddArgs {
            component: args.component,
            overwrite: args.overwrite,
            db_type: args.db_type,
            orm: args.orm,
            skip_install: args.skip_install,
            registry: args.source.into(),
        }
    }
}

#[derive(Parser, Debug)]
pub struct CliGenerateArgs {
    /// What to generate (route)
    pub kind: String,

    /// Resource name (e.g. users, BlogPost)
    pub name: String,
}

impl From<CliGenerateArgs> for GenerateArgs {
    fn from(args: CliGenerateArgs) -> Self {
        GenerateArgs {
            kind: args.kind,
            name: args.name,
        }
    }
}

#[derive(Parser, Debug)]
pub struct CliListArgs {
    #[command(flatten)]
    pub source: RegistrySource,
}

impl From<CliListArgs> for ListArgs {
    fn from(args: CliListArgs) -> Self {
        ListArgs {
            registry: args.source.into(),
        }
    }
}

#[derive(Parser, Debug)]
pub struct VerifyArgs {
    /// Registry directory to check (defaults to $YANTR_REGISTRY_DIR, then ./registry)
    #[arg(long = "registry-dir")]
    pub registry_dir: Option<PathBuf>,
}

fn setup_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .with_env_var(LOG_ENV)
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_env_filter(filter)
        .init();
}

fn open_docs(product: &YantrProduct) -> Result<()> {
    let url = product.docs_url();
    println!("Opening {}", url);
    if let Err(e) = open::that(url) {
        tracing::debug!("failed to open browser: {}", e);
        println!("Could not open a browser; visit {} instead.", url);
    }
    Ok(())
}

fn verify_registry(product: &YantrProduct, args: VerifyArgs) -> Result<()> {
    let dir = args
        .registry_dir
        .or_else(|| std::env::var_os(product.registry_dir_env()).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("registry"));

    let report = yantr_core::registry::verify_registry(&dir)?;
    yantr_core::registry::print_verify_report(&dir, &report)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    setup_logging(args.verbose);
    tracing::debug!(version = CLI_VERSION, "starting");

    let product = YantrProduct;

    let result = match args.command {
        Command::Init(init_args) => {
            yantr_core::tui::run_init(&product, init_args.into(), CLI_VERSION).await
        }
        Command::Add(add_args) => {
            yantr_core::tui::run_add(&product, add_args.into(), CLI_VERSION).await
        }
        Command::Generate(generate_args) => {
            yantr_core::tui::run_generate(&product, generate_args.into()).await
        }
        Command::List(list_args) => {
            yantr_core::tui::run_list(&product, list_args.into(), CLI_VERSION).await
        }
        Command::Docs => open_docs(&product),
        Command::Registry {
            command: RegistryCommand::Verify(verify_args),
        } => verify_registry(&product, verify_args),
    };

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    result
}
